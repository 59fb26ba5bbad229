//! Scene graph.
//!
//! - Node: hierarchy links, transform, visibility, optional light
//! - Transform: position / rotation / scale with a cached world matrix
//! - Scene: node storage, names, lights, model instantiation
//! - Light: ambient, directional and point lights

pub mod node;
pub mod transform;
pub mod scene;
pub mod light;

pub use node::Node;
pub use transform::Transform;
pub use scene::Scene;
pub use light::{Light, LightKind};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct LightKey;
}
