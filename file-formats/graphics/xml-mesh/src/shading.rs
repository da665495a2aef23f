//! Normals, tangents and bitangents from corner topology
//!
//! Every quantity starts at a corner, using the corner's own vertex and the
//! previous and next corners of its face. Face values sum the corners of
//! one face, vertex values sum every corner that uses the vertex, and both
//! are normalized afterwards.
//!
//! A corner whose neighbours are collinear, or whose texture coordinate
//! deltas have a zero determinant, contributes a zero vector. A sum that
//! stays zero is reported as [`MeshError::DegenerateGeometry`].

use crate::common::{CornerRef, EntityKind, FaceIndex, TexCoords, Vec3, VertexIndex};
use crate::error::{MeshError, Result};
use crate::mesh::MeshGeometry;

/// Orientation of the corner cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Winding {
    /// Front faces list their corners counter-clockwise
    #[default]
    CounterClockwise,
    /// Front faces list their corners clockwise; normals are negated
    Clockwise,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShadingOptions {
    pub winding: Winding,
}

/// Position and texture coordinates of a corner and of its two neighbours
struct CornerFrame {
    position: Vec3,
    tex_coords: TexCoords,
    prev_position: Vec3,
    prev_tex_coords: TexCoords,
    next_position: Vec3,
    next_tex_coords: TexCoords,
}

impl CornerFrame {
    fn normal(&self) -> Vec3 {
        (self.position - self.prev_position)
            .cross(self.next_position - self.position)
            .normalize_or_zero()
    }

    /// Lengyel's method on the two edges leaving this corner
    fn tangent_bitangent(&self) -> (Vec3, Vec3) {
        let dp1 = self.prev_position - self.position;
        let dp2 = self.next_position - self.position;
        let duv1 = self.prev_tex_coords - self.tex_coords;
        let duv2 = self.next_tex_coords - self.tex_coords;

        // Scaled by the texture edge lengths
        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() <= f32::EPSILON * duv1.length() * duv2.length() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let tangent = ((dp1 * duv2.y - dp2 * duv1.y) / det).normalize_or_zero();
        let bitangent = ((dp2 * duv1.x - dp1 * duv2.x) / det).normalize_or_zero();
        (tangent, bitangent)
    }
}

/// Shading vectors of a [`MeshData`](crate::MeshData) or [`MeshState`](crate::MeshState)
#[derive(Debug, Clone, Copy)]
pub struct GeometryEstimator<'a> {
    geometry: &'a MeshGeometry,
    options: ShadingOptions,
}

impl<'a> GeometryEstimator<'a> {
    pub fn new<M: AsRef<MeshGeometry> + ?Sized>(mesh: &'a M) -> Self {
        Self::with_options(mesh, ShadingOptions::default())
    }

    pub fn with_options<M: AsRef<MeshGeometry> + ?Sized>(mesh: &'a M, options: ShadingOptions) -> Self {
        Self {
            geometry: mesh.as_ref(),
            options,
        }
    }

    /// Unit normal of a single corner, or zero when its edges are collinear
    pub fn corner_normal(&self, corner: CornerRef) -> Result<Vec3> {
        Ok(self.oriented(self.frame(corner)?.normal()))
    }

    /// Unit tangent and bitangent of a single corner, or zeros when the
    /// texture mapping is degenerate there
    pub fn corner_tangent_bitangent(&self, corner: CornerRef) -> Result<(Vec3, Vec3)> {
        Ok(self.frame(corner)?.tangent_bitangent())
    }

    /// Flat normal of a face
    pub fn face_normal(&self, face: FaceIndex) -> Result<Vec3> {
        let mut sum = Vec3::ZERO;
        for corner in self.face_corners(face)? {
            sum += self.frame(corner)?.normal();
        }
        let normal = unit(sum, || format!("face {} has no normal", self.face_name(face)))?;
        Ok(self.oriented(normal))
    }

    pub fn face_tangent_bitangent(&self, face: FaceIndex) -> Result<(Vec3, Vec3)> {
        let mut tangent = Vec3::ZERO;
        let mut bitangent = Vec3::ZERO;
        for corner in self.face_corners(face)? {
            let (t, b) = self.frame(corner)?.tangent_bitangent();
            tangent += t;
            bitangent += b;
        }
        let describe = || format!("face {} has no tangent frame", self.face_name(face));
        Ok((unit(tangent, describe)?, unit(bitangent, describe)?))
    }

    /// Smooth normal of a vertex, averaged over every corner using it
    pub fn vertex_normal(&self, vertex: VertexIndex) -> Result<Vec3> {
        let mut sum = Vec3::ZERO;
        for &corner in self.vertex_corners(vertex)? {
            sum += self.frame(corner)?.normal();
        }
        let normal = unit(sum, || format!("vertex {} has no normal", self.vertex_name(vertex)))?;
        Ok(self.oriented(normal))
    }

    pub fn vertex_tangent_bitangent(&self, vertex: VertexIndex) -> Result<(Vec3, Vec3)> {
        let mut tangent = Vec3::ZERO;
        let mut bitangent = Vec3::ZERO;
        for &corner in self.vertex_corners(vertex)? {
            let (t, b) = self.frame(corner)?.tangent_bitangent();
            tangent += t;
            bitangent += b;
        }
        let describe = || format!("vertex {} has no tangent frame", self.vertex_name(vertex));
        Ok((unit(tangent, describe)?, unit(bitangent, describe)?))
    }

    /// Normal to shade a corner with: the vertex normal on smooth faces,
    /// the face normal otherwise
    pub fn shading_normal(&self, face: FaceIndex, slot: usize) -> Result<Vec3> {
        let corner = self.corner_of(face, slot)?;
        if self.face_is_smooth(face)? {
            self.vertex_normal(corner.1)
        } else {
            self.face_normal(face)
        }
    }

    /// Tangent frame matching [`shading_normal`](Self::shading_normal)
    pub fn shading_tangent_bitangent(&self, face: FaceIndex, slot: usize) -> Result<(Vec3, Vec3)> {
        let corner = self.corner_of(face, slot)?;
        if self.face_is_smooth(face)? {
            self.vertex_tangent_bitangent(corner.1)
        } else {
            self.face_tangent_bitangent(face)
        }
    }

    fn oriented(&self, normal: Vec3) -> Vec3 {
        match self.options.winding {
            Winding::CounterClockwise => normal,
            Winding::Clockwise => -normal,
        }
    }

    fn frame(&self, corner: CornerRef) -> Result<CornerFrame> {
        let face = self
            .geometry
            .face(corner.face)
            .ok_or_else(|| unknown(EntityKind::Face, corner.face))?;
        let this = face
            .corner(corner.slot)
            .ok_or_else(|| unknown(EntityKind::Face, corner.face))?;
        let corners = face.corners();
        let prev = &corners[this.prev()];
        let next = &corners[this.next()];

        Ok(CornerFrame {
            position: self.geometry.position_of(this.vertex()),
            tex_coords: this.tex_coords(),
            prev_position: self.geometry.position_of(prev.vertex()),
            prev_tex_coords: prev.tex_coords(),
            next_position: self.geometry.position_of(next.vertex()),
            next_tex_coords: next.tex_coords(),
        })
    }

    fn face_corners(&self, face: FaceIndex) -> Result<impl Iterator<Item = CornerRef>> {
        let count = self
            .geometry
            .face(face)
            .ok_or_else(|| unknown(EntityKind::Face, face))?
            .corner_count();
        Ok((0..count).map(move |slot| CornerRef::new(face, slot)))
    }

    fn vertex_corners(&self, vertex: VertexIndex) -> Result<&'a [CornerRef]> {
        self.geometry
            .vertex(vertex)
            .map(|v| v.corners())
            .ok_or_else(|| unknown(EntityKind::Vertex, vertex))
    }

    fn corner_of(&self, face: FaceIndex, slot: usize) -> Result<(CornerRef, VertexIndex)> {
        let vertex = self
            .geometry
            .corner(CornerRef::new(face, slot))
            .ok_or_else(|| unknown(EntityKind::Face, face))?
            .vertex();
        Ok((CornerRef::new(face, slot), vertex))
    }

    fn face_is_smooth(&self, face: FaceIndex) -> Result<bool> {
        self.geometry
            .face(face)
            .map(|f| f.is_smooth())
            .ok_or_else(|| unknown(EntityKind::Face, face))
    }

    fn face_name(&self, face: FaceIndex) -> String {
        self.geometry
            .face(face)
            .map_or_else(|| face.to_string(), |f| f.id().to_string())
    }

    fn vertex_name(&self, vertex: VertexIndex) -> String {
        self.geometry
            .vertex(vertex)
            .map_or_else(|| vertex.to_string(), |v| v.id().to_string())
    }
}

fn unknown(kind: EntityKind, index: impl ToString) -> MeshError {
    MeshError::UnknownReference {
        kind,
        id: index.to_string(),
    }
}

fn unit(sum: Vec3, describe: impl FnOnce() -> String) -> Result<Vec3> {
    sum.try_normalize()
        .ok_or_else(|| MeshError::DegenerateGeometry(describe()))
}

pub fn calculate_face_normal<M: AsRef<MeshGeometry> + ?Sized>(mesh: &M, face: FaceIndex) -> Result<Vec3> {
    GeometryEstimator::new(mesh).face_normal(face)
}

pub fn calculate_face_tangent_bitangent<M: AsRef<MeshGeometry> + ?Sized>(
    mesh: &M,
    face: FaceIndex,
) -> Result<(Vec3, Vec3)> {
    GeometryEstimator::new(mesh).face_tangent_bitangent(face)
}

pub fn calculate_vertex_normal<M: AsRef<MeshGeometry> + ?Sized>(
    mesh: &M,
    vertex: VertexIndex,
) -> Result<Vec3> {
    GeometryEstimator::new(mesh).vertex_normal(vertex)
}

pub fn calculate_vertex_tangent_bitangent<M: AsRef<MeshGeometry> + ?Sized>(
    mesh: &M,
    vertex: VertexIndex,
) -> Result<(Vec3, Vec3)> {
    GeometryEstimator::new(mesh).vertex_tangent_bitangent(vertex)
}
