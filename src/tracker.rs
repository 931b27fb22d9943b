pub mod conflicts;
pub mod countdown;
pub mod gate;
pub mod panic;
pub mod streak;
