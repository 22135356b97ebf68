//! Persistence model for benchmark results.
//!
//! Each invocation leaves two flat files behind: a JSON record (the
//! [`ResultRecord`]) and a plain-text log. [`ResultStore`] rebuilds the
//! full result set from a directory of such records and answers the
//! lookups the comparator and reports need.

mod axis;
mod record;
mod store;

pub use axis::AxisKey;
pub use record::ResultRecord;
pub use store::{ResultStore, StoreError};
