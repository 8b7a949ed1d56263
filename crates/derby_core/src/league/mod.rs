// 리그 진행: 나이, 은퇴, 신인 영입

pub mod morale;
pub mod newcomer;
pub mod progression;
pub mod retirement;


pub use newcomer::successor_name;
pub use progression::{advance, LeagueManager, ProgressionReport};
