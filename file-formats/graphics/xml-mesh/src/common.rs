//! Shared handle types and math re-exports
//!
//! Every entity of a mesh lives in an arena owned by its [`MeshData`] or
//! [`MeshState`]. Cross-references between entities are stored as the typed
//! indices defined here rather than as addresses, so a copied arena stays
//! valid without any pointer fix-up.
//!
//! [`MeshData`]: crate::MeshData
//! [`MeshState`]: crate::MeshState

use std::fmt;

pub use glam::{Quat, Vec2, Vec3};

/// Texture coordinates of a corner
pub type TexCoords = Vec2;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position of the entity in its arena
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

arena_index!(
    /// Handle of a vertex inside a mesh arena
    VertexIndex
);
arena_index!(
    /// Handle of a face (triangle or quad) inside a mesh arena
    FaceIndex
);
arena_index!(
    /// Handle of a subset inside a mesh arena
    SubsetIndex
);
arena_index!(
    /// Handle of a bone inside a skeleton
    BoneIndex
);
arena_index!(
    /// Handle of a skeletal animation
    AnimationIndex
);

/// Non-owning reference to one corner: the face that owns it and its slot
/// in the face's counter-clockwise cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct CornerRef {
    pub face: FaceIndex,
    pub slot: usize,
}

impl CornerRef {
    pub fn new(face: FaceIndex, slot: usize) -> Self {
        Self { face, slot }
    }
}

/// Id categories. Ids are unique within a category; triangles and quads
/// share the face category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vertex,
    Face,
    Subset,
    Bone,
    Animation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Face => "face",
            Self::Subset => "subset",
            Self::Bone => "bone",
            Self::Animation => "animation",
        };
        f.write_str(name)
    }
}
