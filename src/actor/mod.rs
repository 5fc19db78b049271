//! Actor system for `ego serve`.
//!
//! ```text
//! FsActor --Restart--> SupervisorActor --> Supervisor (cycle workers)
//! (watch)              (serialises restart requests)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `supervisor` - Forwards restart requests to the process supervisor
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod supervisor;

pub use coordinator::Coordinator;
