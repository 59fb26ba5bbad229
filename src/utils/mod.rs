//! Utility Module
//!
//! - [`time`]: frame timing for the render loop

pub mod time;

pub use time::Timer;
