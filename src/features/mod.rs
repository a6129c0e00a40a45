//! Built-in feature handlers.
//!
//! Each tracker is an ordinary [`FeatureHandler`](crate::handlers::FeatureHandler)
//! built entirely on the public surface of the crate; applications can use
//! them as-is, wrap them, or treat them as worked examples for their own
//! features.

mod bits;
mod follows;
mod hype_train;
mod raids;
mod subscribers;

pub use bits::BitsTracker;
pub use follows::FollowTracker;
pub use hype_train::HypeTrainTracker;
pub use raids::{OutgoingRaid, RaidApi, RaidWatcher};
pub use subscribers::SubscriberTracker;
