pub mod classifier;
pub mod token;

pub use classifier::{classify, Classification, Tier};
pub use token::RewardToken;
