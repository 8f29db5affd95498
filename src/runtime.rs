//! Runtime for driving a conversation
//!
//! The controller owns transcript and turn state; the session connects it to
//! a terminal and to the completion task.

mod controller;
mod session;

#[cfg(test)]
pub mod testing;

pub use controller::{SessionView, TurnController};
pub use session::ChatSession;
