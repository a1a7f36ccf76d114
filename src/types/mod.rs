//! Core types for Parley.

pub mod conversation;
pub mod message;

pub use conversation::*;
pub use message::*;
