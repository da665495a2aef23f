use thiserror::Error;

use crate::common::EntityKind;

/// Error types for mesh construction, sampling, skinning and shading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// An id was declared twice within its category
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    /// A referenced id has not been declared (yet)
    #[error("No such {kind}: {id}")]
    UnknownReference { kind: EntityKind, id: String },

    /// A face was referenced as the wrong kind of face
    #[error("Face {face} has {actual} corners, expected {expected}")]
    CategoryMismatch {
        face: String,
        expected: usize,
        actual: usize,
    },

    /// Only triangles and quads can be declared
    #[error("Face {face} has {count} corners, only triangles and quads are supported")]
    InvalidCornerCount { face: String, count: usize },

    /// The (animation, bone, frame) triple is already keyed
    #[error("Duplicate key for animation {animation} layer {bone} frame {frame}")]
    DuplicateKey {
        animation: String,
        bone: String,
        frame: u32,
    },

    /// Following the parent links from this bone leads back to it
    #[error("Bone {bone} is its own ancestor")]
    CyclicSkeleton { bone: String },

    /// A layer was declared but never keyed
    #[error("Layer {bone} of animation {animation} has no keys")]
    EmptyLayer { animation: String, bone: String },

    /// A layer holds keys past the end of its animation
    #[error(
        "Layer {bone} of animation {animation} has keys up to frame {last}, beyond animation length {length}"
    )]
    KeyOutOfRange {
        animation: String,
        bone: String,
        last: u32,
        length: u32,
    },

    /// Sampling was requested for an animation the mesh does not have
    #[error("No such animation: {0}")]
    UnknownAnimation(String),

    /// Frame rates must be finite and positive
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f32),

    /// The bones pulling a vertex have a total weight of zero
    #[error("Vertex {vertex} is pulled by bones with a total weight of zero")]
    DegenerateWeight { vertex: String },

    /// A normal, tangent or bitangent sum has zero length
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Render buffers would need indices past `u32::MAX`
    #[error("Render buffers need {0} vertices, more than 32-bit indices can address")]
    IndexOverflow(usize),

    /// The mesh state was not derived from the mesh data it is posed with
    #[error("Mesh state does not mirror mesh data: {0}")]
    StateMismatch(String),
}

/// Result type using MeshError
pub type Result<T> = std::result::Result<T, MeshError>;
