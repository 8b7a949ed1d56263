// 레이스 시뮬레이션 엔진

pub mod commentary;
pub mod field;
pub mod ranking;
pub mod simulator;


pub use field::draw_field;
pub use ranking::{rank, Standing};
pub use simulator::{simulate, RaceSimulator, MAX_FIELD_SIZE, MIN_FIELD_SIZE};
