//! Live data: cancellable pollers and the registry that owns them.

mod poller;
mod registry;

pub use poller::{PollHandle, Poller, Snapshot};
pub use registry::{BoardKey, FeedConfig, LiveBoard, LiveFeeds};
