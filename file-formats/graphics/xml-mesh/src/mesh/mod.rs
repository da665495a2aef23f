//! Rest-pose data, posable state and the entities they are made of

mod data;
mod geometry;
mod skeleton;
mod state;

pub use data::MeshData;
pub use geometry::{
    Corner, CornerDecl, Face, FaceCorners, FaceKind, MeshGeometry, Subset, Vertex,
};
pub use skeleton::{Bone, Chain, Skeleton};
pub use state::{MeshState, derive_mesh_state};
