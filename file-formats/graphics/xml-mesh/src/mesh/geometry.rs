//! Vertices, faces, corners and subsets
//!
//! [`MeshGeometry`] is the arena both [`MeshData`](crate::MeshData) and
//! [`MeshState`](crate::MeshState) are made of. Faces own their corners;
//! everything else refers to other entities through typed indices.

use std::collections::HashMap;

use crate::common::{CornerRef, EntityKind, FaceIndex, SubsetIndex, TexCoords, Vec3, VertexIndex};
use crate::error::{MeshError, Result};

/// A point of the mesh, shared by the corners of every face that uses it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Vertex {
    id: String,
    position: Vec3,
    corners: Vec<CornerRef>,
}

impl Vertex {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position in mesh space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Every corner, over all faces, that uses this vertex
    pub fn corners(&self) -> &[CornerRef] {
        &self.corners
    }
}

/// One corner of a face
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Corner {
    tex_coords: TexCoords,
    vertex: VertexIndex,
    prev: usize,
    next: usize,
}

impl Corner {
    pub fn tex_coords(&self) -> TexCoords {
        self.tex_coords
    }

    pub fn vertex(&self) -> VertexIndex {
        self.vertex
    }

    /// Slot of the previous corner in the owning face
    pub fn prev(&self) -> usize {
        self.prev
    }

    /// Slot of the next corner in the owning face
    pub fn next(&self) -> usize {
        self.next
    }
}

/// Corner storage of a face, in authoring (counter-clockwise) order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum FaceCorners {
    Triangle([Corner; 3]),
    Quad([Corner; 4]),
}

/// The two supported face shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub enum FaceKind {
    Triangle,
    Quad,
}

impl FaceKind {
    pub fn corner_count(self) -> usize {
        match self {
            Self::Triangle => 3,
            Self::Quad => 4,
        }
    }

    pub fn from_corner_count(count: usize) -> Option<Self> {
        match count {
            3 => Some(Self::Triangle),
            4 => Some(Self::Quad),
            _ => None,
        }
    }
}

/// A triangle or quad
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Face {
    id: String,
    smooth: bool,
    corners: FaceCorners,
}

impl Face {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Smooth faces shade with vertex normals, flat faces with their face normal
    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn kind(&self) -> FaceKind {
        match self.corners {
            FaceCorners::Triangle(_) => FaceKind::Triangle,
            FaceCorners::Quad(_) => FaceKind::Quad,
        }
    }

    /// Corners in counter-clockwise order
    pub fn corners(&self) -> &[Corner] {
        match &self.corners {
            FaceCorners::Triangle(corners) => corners,
            FaceCorners::Quad(corners) => corners,
        }
    }

    pub fn corner(&self, slot: usize) -> Option<&Corner> {
        self.corners().get(slot)
    }

    pub fn corner_count(&self) -> usize {
        self.corners().len()
    }

    /// Vertices of the face in corner order
    pub fn vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.corners().iter().map(Corner::vertex)
    }
}

/// A named group of faces, typically sharing a material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Subset {
    id: String,
    faces: Vec<FaceIndex>,
    quad_count: usize,
    triangle_count: usize,
}

impl Subset {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn faces(&self) -> &[FaceIndex] {
        &self.faces
    }

    /// Returns `(quads, triangles)` in this subset
    pub fn count_quads_triangles(&self) -> (usize, usize) {
        (self.quad_count, self.triangle_count)
    }
}

/// Declaration of a corner: texture coordinates plus the id of its vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerDecl<'a> {
    pub tex_coords: TexCoords,
    pub vertex_id: &'a str,
}

impl<'a> CornerDecl<'a> {
    pub fn new(tex_coords: TexCoords, vertex_id: &'a str) -> Self {
        Self {
            tex_coords,
            vertex_id,
        }
    }
}

/// Arena of vertices, faces and subsets with id lookup
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct MeshGeometry {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    subsets: Vec<Subset>,
    #[cfg_attr(feature = "serde-support", serde(skip))]
    vertex_ids: HashMap<String, VertexIndex>,
    #[cfg_attr(feature = "serde-support", serde(skip))]
    face_ids: HashMap<String, FaceIndex>,
    #[cfg_attr(feature = "serde-support", serde(skip))]
    subset_ids: HashMap<String, SubsetIndex>,
}

impl AsRef<MeshGeometry> for MeshGeometry {
    fn as_ref(&self) -> &MeshGeometry {
        self
    }
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn subset_count(&self) -> usize {
        self.subsets.len()
    }

    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index.0)
    }

    pub fn face(&self, index: FaceIndex) -> Option<&Face> {
        self.faces.get(index.0)
    }

    pub fn subset(&self, index: SubsetIndex) -> Option<&Subset> {
        self.subsets.get(index.0)
    }

    /// Look up the corner a [`CornerRef`] points at
    pub fn corner(&self, corner: CornerRef) -> Option<&Corner> {
        self.face(corner.face)?.corner(corner.slot)
    }

    pub fn vertex_index(&self, id: &str) -> Option<VertexIndex> {
        self.vertex_ids.get(id).copied()
    }

    pub fn face_index(&self, id: &str) -> Option<FaceIndex> {
        self.face_ids.get(id).copied()
    }

    pub fn subset_index(&self, id: &str) -> Option<SubsetIndex> {
        self.subset_ids.get(id).copied()
    }

    pub fn has_vertex(&self, id: &str) -> bool {
        self.vertex_ids.contains_key(id)
    }

    pub fn has_face(&self, id: &str) -> bool {
        self.face_ids.contains_key(id)
    }

    pub fn has_subset(&self, id: &str) -> bool {
        self.subset_ids.contains_key(id)
    }

    pub fn vertex_by_id(&self, id: &str) -> Option<&Vertex> {
        self.vertex_index(id).and_then(|index| self.vertex(index))
    }

    pub fn face_by_id(&self, id: &str) -> Option<&Face> {
        self.face_index(id).and_then(|index| self.face(index))
    }

    pub fn subset_by_id(&self, id: &str) -> Option<&Subset> {
        self.subset_index(id).and_then(|index| self.subset(index))
    }

    /// Iterate vertices in declaration order
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = (VertexIndex, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, vertex)| (VertexIndex(i), vertex))
    }

    /// Iterate faces in declaration order
    pub fn faces(&self) -> impl ExactSizeIterator<Item = (FaceIndex, &Face)> {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, face)| (FaceIndex(i), face))
    }

    /// Iterate subsets in declaration order
    pub fn subsets(&self) -> impl ExactSizeIterator<Item = (SubsetIndex, &Subset)> {
        self.subsets
            .iter()
            .enumerate()
            .map(|(i, subset)| (SubsetIndex(i), subset))
    }

    /// Returns `(quads, triangles)` over the whole mesh
    pub fn count_quads_triangles(&self) -> (usize, usize) {
        self.faces
            .iter()
            .fold((0, 0), |(quads, triangles), face| match face.kind() {
                FaceKind::Quad => (quads + 1, triangles),
                FaceKind::Triangle => (quads, triangles + 1),
            })
    }

    /// Position of a vertex whose index came from this arena
    pub(crate) fn position_of(&self, index: VertexIndex) -> Vec3 {
        self.vertices[index.0].position
    }

    pub(crate) fn set_position(&mut self, index: VertexIndex, position: Vec3) {
        self.vertices[index.0].position = position;
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|vertex| vertex.position)
    }

    pub(crate) fn add_vertex(&mut self, id: String, position: Vec3) -> Result<VertexIndex> {
        if self.vertex_ids.contains_key(&id) {
            return Err(MeshError::DuplicateId {
                kind: EntityKind::Vertex,
                id,
            });
        }

        let index = VertexIndex(self.vertices.len());
        self.vertex_ids.insert(id.clone(), index);
        self.vertices.push(Vertex {
            id,
            position,
            corners: Vec::new(),
        });
        Ok(index)
    }

    /// Adds a face and wires corner to vertex, vertex to corner and the
    /// prev/next cycle. Nothing is modified when an error is returned.
    pub(crate) fn add_face(
        &mut self,
        id: String,
        smooth: bool,
        corners: &[CornerDecl<'_>],
    ) -> Result<FaceIndex> {
        if self.face_ids.contains_key(&id) {
            return Err(MeshError::DuplicateId {
                kind: EntityKind::Face,
                id,
            });
        }

        let resolved = corners
            .iter()
            .map(|decl| {
                self.vertex_index(decl.vertex_id)
                    .map(|vertex| (decl.tex_coords, vertex))
                    .ok_or_else(|| MeshError::UnknownReference {
                        kind: EntityKind::Vertex,
                        id: decl.vertex_id.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let corners = match FaceKind::from_corner_count(resolved.len()) {
            Some(FaceKind::Triangle) => FaceCorners::Triangle(link_corners(&resolved)),
            Some(FaceKind::Quad) => FaceCorners::Quad(link_corners(&resolved)),
            None => {
                return Err(MeshError::InvalidCornerCount {
                    face: id,
                    count: resolved.len(),
                });
            }
        };

        let index = FaceIndex(self.faces.len());
        for (slot, (_, vertex)) in resolved.iter().enumerate() {
            self.vertices[vertex.0]
                .corners
                .push(CornerRef::new(index, slot));
        }

        self.face_ids.insert(id.clone(), index);
        self.faces.push(Face {
            id,
            smooth,
            corners,
        });
        Ok(index)
    }

    pub(crate) fn add_subset(&mut self, id: String) -> Result<SubsetIndex> {
        if self.subset_ids.contains_key(&id) {
            return Err(MeshError::DuplicateId {
                kind: EntityKind::Subset,
                id,
            });
        }

        let index = SubsetIndex(self.subsets.len());
        self.subset_ids.insert(id.clone(), index);
        self.subsets.push(Subset {
            id,
            faces: Vec::new(),
            quad_count: 0,
            triangle_count: 0,
        });
        Ok(index)
    }

    /// Adds a face to a subset. Returns `Ok(false)` when it already was a member.
    pub(crate) fn add_face_to_subset(
        &mut self,
        subset_id: &str,
        face_id: &str,
        expected: FaceKind,
    ) -> Result<bool> {
        let subset = self
            .subset_index(subset_id)
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Subset,
                id: subset_id.to_string(),
            })?;
        let face = self
            .face_index(face_id)
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Face,
                id: face_id.to_string(),
            })?;

        let actual = self.faces[face.0].kind();
        if actual != expected {
            return Err(MeshError::CategoryMismatch {
                face: face_id.to_string(),
                expected: expected.corner_count(),
                actual: actual.corner_count(),
            });
        }

        let subset = &mut self.subsets[subset.0];
        if subset.faces.contains(&face) {
            return Ok(false);
        }

        subset.faces.push(face);
        match actual {
            FaceKind::Quad => subset.quad_count += 1,
            FaceKind::Triangle => subset.triangle_count += 1,
        }
        Ok(true)
    }
}

/// Builds the fixed corner cycle: slot `i` links to `i - 1` and `i + 1` modulo `N`
fn link_corners<const N: usize>(resolved: &[(TexCoords, VertexIndex)]) -> [Corner; N] {
    std::array::from_fn(|i| {
        let (tex_coords, vertex) = resolved[i];
        Corner {
            tex_coords,
            vertex,
            prev: (i + N - 1) % N,
            next: (i + 1) % N,
        }
    })
}
