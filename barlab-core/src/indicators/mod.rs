//! Streaming indicator primitives used by the signal generators.

pub mod rolling;

pub use rolling::RollingWindow;
