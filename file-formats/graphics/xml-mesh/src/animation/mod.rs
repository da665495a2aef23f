//! Skeletal animation data and sampling
//!
//! An animation is a set of layers, one per animated bone, each holding
//! keys at integer frames. [`get_bone_transformations_at`] samples all
//! layers of one animation at a point in time.
//!
//! # Example
//!
//! ```rust,ignore
//! use xml_mesh::animation::get_bone_transformations_at;
//!
//! // 25 frames per second, looping
//! let pose = get_bone_transformations_at(&mesh, "walk", elapsed_ms, 25.0, true)?;
//! xml_mesh::apply_bone_transformations(&mesh, &pose, &mut state)?;
//! ```

mod sampler;
mod types;

pub use sampler::{BoneTransformations, frame_position, get_bone_transformations_at};
pub use types::{BoneKey, BoneLayer, BoneTransformation, Interpolate, SkeletalAnimation};
