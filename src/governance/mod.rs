//! Governance data module
//!
//! Turns subgraph queries into application records:
//!
//! 1. **Tally**: vote weights summed per side, approval outcome
//! 2. **Reshape**: proposal, delegate and voting-history records
//! 3. **Loader**: per-operation fetch orchestration with bounded fan-out

pub mod loader;
pub mod reshape;
pub mod tally;

// Re-export main types for convenient access
pub use loader::{SubgraphLoader, DEFAULT_MAX_CONCURRENCY};
