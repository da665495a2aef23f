use super::data::MeshData;
use super::geometry::{MeshGeometry, Vertex};
use crate::common::{EntityKind, Vec3, VertexIndex};
use crate::error::{MeshError, Result};

/// A posable mirror of a [`MeshData`]'s geometry
///
/// Topology, texture coordinates and subsets are fixed when the state is
/// derived. Vertex positions are the only thing that changes afterwards,
/// rewritten by [`apply_bone_transformations`](crate::apply_bone_transformations).
/// A state holds no skeleton; posing always goes through the `MeshData` it
/// was derived from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct MeshState {
    geometry: MeshGeometry,
}

impl AsRef<MeshGeometry> for MeshState {
    fn as_ref(&self) -> &MeshGeometry {
        &self.geometry
    }
}

/// Copies vertices, faces and subsets of `data` into a new [`MeshState`]
///
/// Arena indices are preserved, so every corner, vertex and subset reference
/// of the copy resolves to the copied entity with the same id.
pub fn derive_mesh_state(data: &MeshData) -> MeshState {
    let geometry = data.geometry().clone();
    log::debug!(
        "Derived mesh state with {} vertices, {} faces, {} subsets",
        geometry.vertex_count(),
        geometry.face_count(),
        geometry.subset_count()
    );
    MeshState { geometry }
}

impl MeshState {
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    pub fn vertex_by_id(&self, id: &str) -> Option<&Vertex> {
        self.geometry.vertex_by_id(id)
    }

    /// Returns `(quads, triangles)`
    pub fn count_quads_triangles(&self) -> (usize, usize) {
        self.geometry.count_quads_triangles()
    }

    /// Moves a single vertex
    pub fn set_vertex_position(&mut self, vertex: VertexIndex, position: Vec3) -> Result<()> {
        if self.geometry.vertex(vertex).is_none() {
            return Err(MeshError::UnknownReference {
                kind: EntityKind::Vertex,
                id: vertex.to_string(),
            });
        }
        self.geometry.set_position(vertex, position);
        Ok(())
    }

    /// Puts every vertex back at its rest position
    pub fn reset_to_rest(&mut self, data: &MeshData) -> Result<()> {
        self.check_mirrors(data)?;
        for (i, position) in data.geometry().positions().enumerate() {
            self.geometry.set_position(VertexIndex(i), position);
        }
        Ok(())
    }

    /// Checks that this state was derived from `data`: same vertex and face
    /// counts, and the same id at every vertex and face index
    pub(crate) fn check_mirrors(&self, data: &MeshData) -> Result<()> {
        let ours = &self.geometry;
        let theirs = data.geometry();
        if ours.vertex_count() != theirs.vertex_count() || ours.face_count() != theirs.face_count() {
            return Err(MeshError::StateMismatch(format!(
                "state has {} vertices and {} faces, data has {} vertices and {} faces",
                ours.vertex_count(),
                ours.face_count(),
                theirs.vertex_count(),
                theirs.face_count()
            )));
        }

        let vertex_ids = ours
            .vertices()
            .zip(theirs.vertices())
            .map(|((_, a), (_, b))| (a.id(), b.id()));
        let face_ids = ours
            .faces()
            .zip(theirs.faces())
            .map(|((_, a), (_, b))| (a.id(), b.id()));
        if let Some((state_id, data_id)) = vertex_ids.chain(face_ids).find(|(a, b)| a != b) {
            return Err(MeshError::StateMismatch(format!(
                "state has {state_id} where data has {data_id}"
            )));
        }
        Ok(())
    }

    pub(crate) fn write_position(&mut self, vertex: VertexIndex, position: Vec3) {
        self.geometry.set_position(vertex, position);
    }
}
