//! Pointer input routed onto scene nodes.

pub mod pointer;

pub use pointer::{ClickTargets, PointerEvent};
