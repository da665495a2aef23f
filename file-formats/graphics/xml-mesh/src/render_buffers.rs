//! Flattening a mesh into GPU-style vertex and index lists
//!
//! Each corner becomes one [`RenderVertex`], since texture coordinates and
//! flat normals are per face. Triangles emit three indices and quads are
//! split into the triangles `(0, 1, 2)` and `(0, 2, 3)`.

use crate::common::{EntityKind, FaceIndex, SubsetIndex, TexCoords, Vec3};
use crate::error::{MeshError, Result};
use crate::mesh::{FaceKind, MeshGeometry};
use crate::shading::{GeometryEstimator, ShadingOptions};

#[derive(Debug, Clone, Default)]
pub struct BufferOptions {
    /// Also compute tangents and bitangents; fails on faces without a
    /// usable texture mapping
    pub tangents: bool,
    pub shading: ShadingOptions,
}

/// One corner, ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct RenderVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: TexCoords,
    pub tangent: Option<Vec3>,
    pub bitangent: Option<Vec3>,
}

/// Triangle list over per-corner vertices
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct RenderBuffers {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    /// Buffers for every face, in insertion order
    pub fn build<M: AsRef<MeshGeometry> + ?Sized>(mesh: &M, options: &BufferOptions) -> Result<Self> {
        let geometry = mesh.as_ref();
        let faces: Vec<FaceIndex> = geometry.faces().map(|(index, _)| index).collect();
        Self::from_faces(geometry, &faces, options)
    }

    /// Buffers for the faces of one subset, in subset order
    pub fn build_subset<M: AsRef<MeshGeometry> + ?Sized>(
        mesh: &M,
        subset: SubsetIndex,
        options: &BufferOptions,
    ) -> Result<Self> {
        let geometry = mesh.as_ref();
        let faces = geometry
            .subset(subset)
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Subset,
                id: subset.to_string(),
            })?
            .faces();
        Self::from_faces(geometry, faces, options)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn from_faces(geometry: &MeshGeometry, faces: &[FaceIndex], options: &BufferOptions) -> Result<Self> {
        let estimator = GeometryEstimator::with_options(geometry, options.shading);
        let (quads, triangles) = faces.iter().filter_map(|&f| geometry.face(f)).fold(
            (0, 0),
            |(quads, triangles), face| match face.kind() {
                FaceKind::Quad => (quads + 1, triangles),
                FaceKind::Triangle => (quads, triangles + 1),
            },
        );

        let mut buffers = Self {
            vertices: Vec::with_capacity(quads * 4 + triangles * 3),
            indices: Vec::with_capacity(quads * 6 + triangles * 3),
        };

        for &index in faces {
            let face = geometry.face(index).ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Face,
                id: index.to_string(),
            })?;

            let base = index_base(buffers.vertices.len(), face.corner_count())?;
            match face.kind() {
                FaceKind::Triangle => buffers.indices.extend([base, base + 1, base + 2]),
                FaceKind::Quad => buffers
                    .indices
                    .extend([base, base + 1, base + 2, base, base + 2, base + 3]),
            }

            for (slot, corner) in face.corners().iter().enumerate() {
                let (tangent, bitangent) = if options.tangents {
                    let (t, b) = estimator.shading_tangent_bitangent(index, slot)?;
                    (Some(t), Some(b))
                } else {
                    (None, None)
                };

                buffers.vertices.push(RenderVertex {
                    position: geometry.position_of(corner.vertex()),
                    normal: estimator.shading_normal(index, slot)?,
                    tex_coords: corner.tex_coords(),
                    tangent,
                    bitangent,
                });
            }
        }

        log::debug!(
            "Built render buffers: {} vertices, {} triangles",
            buffers.vertices.len(),
            buffers.triangle_count()
        );
        Ok(buffers)
    }
}

/// First index of a face's corners, provided its last corner still fits in `u32`
fn index_base(vertex_count: usize, corners: usize) -> Result<u32> {
    let needed = vertex_count + corners;
    u32::try_from(needed - 1)
        .map(|last| last - (corners as u32 - 1))
        .map_err(|_| MeshError::IndexOverflow(needed))
}
