//! Driver layer: executes trades against the simulator and runs the clocks.

pub mod desk;
pub mod feed;

pub use desk::{BatchSummary, Desk, DeskStats, TransactionFilter};
pub use feed::{spawn_batch_poller, spawn_slot_clock, FeedControl};
