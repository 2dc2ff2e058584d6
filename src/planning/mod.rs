//! Derived views computed over the fetched collections. Nothing here touches the store.

pub mod availability;
pub mod board;
pub mod dashboard;

pub use availability::{availability, Availability};
pub use board::{BoardError, BoardEvent, DropResult, Reassignment};
pub use dashboard::DashboardSummary;
