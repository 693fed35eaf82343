//! Utility Module
//!
//! - [`unwind`]: throw / catch / catch-all over Rust unwinding, used to keep
//!   teardown going when a native call panics

pub mod unwind;

pub use unwind::{Signal, catch, catch_all, throw};
