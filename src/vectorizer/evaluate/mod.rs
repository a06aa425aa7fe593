pub mod correlation;
pub mod ranking;
