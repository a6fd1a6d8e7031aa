pub mod bucket;
pub mod clock;
pub mod config;
pub mod error;

pub use bucket::TokenBucket;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BucketConfig;
pub use error::BucketError;
