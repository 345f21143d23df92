//! Composite-commit detection.

pub mod grouper;
pub mod hunks;
pub mod path_filter;

pub use grouper::{CompositeGroup, CompositeGrouper, GrouperConfig, MIN_GROUP_LEN, RejectReason};
pub use hunks::count_hunks;
pub use path_filter::{PathFilter, PathFilterConfig};
