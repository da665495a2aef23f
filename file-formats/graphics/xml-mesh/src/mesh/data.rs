use std::collections::HashMap;

use super::geometry::{MeshGeometry, Vertex};
use super::skeleton::{Bone, Skeleton};
use super::state::{MeshState, derive_mesh_state};
use crate::animation::SkeletalAnimation;
use crate::common::{AnimationIndex, BoneIndex, VertexIndex};

/// The validated, read-only rest pose of a mesh
///
/// Owns every vertex, face, subset, bone and animation. Only
/// [`MeshDataBuilder`](crate::MeshDataBuilder) creates it, so every
/// cross-reference inside resolves and the skeleton is a forest.
///
/// A `MeshData` can be rendered as is. To animate it, derive one
/// [`MeshState`] per posed instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct MeshData {
    geometry: MeshGeometry,
    skeleton: Skeleton,
    animations: Vec<SkeletalAnimation>,
    #[cfg_attr(feature = "serde-support", serde(skip))]
    animation_ids: HashMap<String, AnimationIndex>,
}

impl AsRef<MeshGeometry> for MeshData {
    fn as_ref(&self) -> &MeshGeometry {
        &self.geometry
    }
}

impl MeshData {
    pub(crate) fn from_parts(
        geometry: MeshGeometry,
        skeleton: Skeleton,
        animations: Vec<SkeletalAnimation>,
        animation_ids: HashMap<String, AnimationIndex>,
    ) -> Self {
        Self {
            geometry,
            skeleton,
            animations,
            animation_ids,
        }
    }

    /// Vertices, faces and subsets in their rest pose
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn vertex_by_id(&self, id: &str) -> Option<&Vertex> {
        self.geometry.vertex_by_id(id)
    }

    pub fn bone_by_id(&self, id: &str) -> Option<&Bone> {
        self.skeleton.bone_by_id(id)
    }

    /// Bones pulling the given vertex
    pub fn bones_pulling(&self, vertex: VertexIndex) -> &[BoneIndex] {
        self.skeleton.bones_pulling(vertex)
    }

    /// Returns `(quads, triangles)`
    pub fn count_quads_triangles(&self) -> (usize, usize) {
        self.geometry.count_quads_triangles()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn animation(&self, index: AnimationIndex) -> Option<&SkeletalAnimation> {
        self.animations.get(index.0)
    }

    pub fn animation_index(&self, id: &str) -> Option<AnimationIndex> {
        self.animation_ids.get(id).copied()
    }

    pub fn has_animation(&self, id: &str) -> bool {
        self.animation_ids.contains_key(id)
    }

    pub fn animation_by_id(&self, id: &str) -> Option<&SkeletalAnimation> {
        self.animation_index(id).and_then(|index| self.animation(index))
    }

    /// Iterate animations in declaration order
    pub fn animations(&self) -> impl ExactSizeIterator<Item = (AnimationIndex, &SkeletalAnimation)> {
        self.animations
            .iter()
            .enumerate()
            .map(|(i, animation)| (AnimationIndex(i), animation))
    }

    /// Creates a posable copy of the geometry, see [`derive_mesh_state`]
    pub fn derive_state(&self) -> MeshState {
        derive_mesh_state(self)
    }
}
