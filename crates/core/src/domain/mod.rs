pub mod fund;
pub mod recommendation;
