//! In-memory representation of skinned, animated polygon meshes
//!
//! A mesh is declared through [`MeshDataBuilder`], which validates every
//! reference and yields an immutable [`MeshData`]: vertices, triangles and
//! quads with per-corner texture coordinates, subsets, a bone forest and
//! keyframed skeletal animations. Each drawable instance derives its own
//! [`MeshState`] and poses it once per frame:
//!
//! ```rust,no_run
//! use xml_mesh::{
//!     MeshData, RenderBuffers, apply_bone_transformations, derive_mesh_state,
//!     get_bone_transformations_at,
//! };
//!
//! fn frame(mesh: &MeshData, elapsed_ms: u64) -> xml_mesh::Result<RenderBuffers> {
//!     let mut state = derive_mesh_state(mesh);
//!     let pose = get_bone_transformations_at(mesh, "walk", elapsed_ms, 25.0, true)?;
//!     apply_bone_transformations(mesh, &pose, &mut state)?;
//!     RenderBuffers::build(&state, &Default::default())
//! }
//! ```

pub mod animation;
pub mod builder;
pub mod common;
pub mod error;
pub mod mesh;
pub mod render_buffers;
pub mod shading;
pub mod skinning;

// Re-export common types
pub use animation::{
    BoneKey, BoneLayer, BoneTransformation, BoneTransformations, SkeletalAnimation,
    get_bone_transformations_at,
};
pub use builder::MeshDataBuilder;
pub use common::{
    AnimationIndex, BoneIndex, CornerRef, FaceIndex, Quat, SubsetIndex, Vec2, Vec3, VertexIndex,
};
pub use error::{MeshError, Result};
pub use mesh::{
    Bone, Corner, CornerDecl, Face, FaceKind, MeshData, MeshGeometry, MeshState, Skeleton, Subset,
    Vertex, derive_mesh_state,
};
pub use render_buffers::{BufferOptions, RenderBuffers, RenderVertex};
pub use shading::{
    GeometryEstimator, ShadingOptions, Winding, calculate_face_normal,
    calculate_face_tangent_bitangent, calculate_vertex_normal, calculate_vertex_tangent_bitangent,
};
pub use skinning::{
    MeshSkinner, SkinningOptions, ZeroWeightPolicy, apply_bone_transformations,
    apply_bone_transformations_with,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
