pub mod model;
mod submitter;

pub use model::{BidAttempt, BidOutcome, BidPhase, BidResult};
pub use submitter::BidSubmitter;
