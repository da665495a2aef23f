//! Vertex skinning driven by sampled bone transformations
//!
//! Every vertex pulled by at least one bone is moved to the weighted
//! average of the positions each pulling bone would give it. A bone's
//! position for a vertex is found by walking from that bone up to its root
//! and applying, at every bone of the chain that has a transformation, a
//! rotation around the bone's head followed by its translation. Bones
//! without a transformation are in rest pose and do not stop the walk.
//!
//! # Example
//!
//! ```rust,no_run
//! use xml_mesh::skinning::{MeshSkinner, SkinningOptions, ZeroWeightPolicy};
//! use xml_mesh::{MeshData, MeshState, get_bone_transformations_at};
//!
//! fn pose(mesh: &MeshData, state: &mut MeshState, elapsed_ms: u64) -> xml_mesh::Result<()> {
//!     let options = SkinningOptions {
//!         zero_weight: ZeroWeightPolicy::KeepRestPosition,
//!     };
//!     let transforms = get_bone_transformations_at(mesh, "walk", elapsed_ms, 25.0, true)?;
//!     MeshSkinner::new(mesh, options).apply(&transforms, state)
//! }
//! ```

use crate::animation::{BoneTransformation, BoneTransformations};
use crate::common::{Vec3, VertexIndex};
use crate::error::{MeshError, Result};
use crate::mesh::{MeshData, MeshState};

/// What to do with a vertex whose pulling bones have a zero weight sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroWeightPolicy {
    /// Fail the whole pose with [`MeshError::DegenerateWeight`]
    #[default]
    Reject,
    /// Leave the vertex at its rest position
    KeepRestPosition,
}

/// Options for controlling the skinning behavior
#[derive(Debug, Clone, Default)]
pub struct SkinningOptions {
    pub zero_weight: ZeroWeightPolicy,
}

/// Poses [`MeshState`]s derived from one [`MeshData`]
#[derive(Debug, Clone)]
pub struct MeshSkinner<'a> {
    data: &'a MeshData,
    options: SkinningOptions,
}

impl<'a> MeshSkinner<'a> {
    pub fn new(data: &'a MeshData, options: SkinningOptions) -> Self {
        Self { data, options }
    }

    pub fn options(&self) -> &SkinningOptions {
        &self.options
    }

    /// Rewrites the vertex positions of `state`
    ///
    /// Positions are computed first and written only once every vertex
    /// succeeded, so a failed call leaves `state` as it was.
    pub fn apply(&self, transforms: &BoneTransformations, state: &mut MeshState) -> Result<()> {
        state.check_mirrors(self.data)?;
        let slots = self.resolve(transforms);

        let mut posed = Vec::new();
        for vertex in 0..self.data.geometry().vertex_count() {
            let vertex = VertexIndex(vertex);
            if let Some(position) = self.skin_vertex(vertex, &slots)? {
                posed.push((vertex, position));
            }
        }

        self.write(posed, state);
        Ok(())
    }

    /// Same as [`apply`](Self::apply) with vertices spread over the rayon pool
    #[cfg(feature = "parallel")]
    pub fn apply_parallel(
        &self,
        transforms: &BoneTransformations,
        state: &mut MeshState,
    ) -> Result<()> {
        use rayon::prelude::*;

        state.check_mirrors(self.data)?;
        let slots = self.resolve(transforms);

        let posed = (0..self.data.geometry().vertex_count())
            .into_par_iter()
            .map(|vertex| -> Result<Option<(VertexIndex, Vec3)>> {
                let vertex = VertexIndex(vertex);
                Ok(self
                    .skin_vertex(vertex, &slots)?
                    .map(|position| (vertex, position)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.write(posed.into_iter().flatten().collect(), state);
        Ok(())
    }

    /// Posed position of a single vertex, or `None` if no bone pulls it
    pub fn skin_vertex_at(
        &self,
        vertex: VertexIndex,
        transforms: &BoneTransformations,
    ) -> Result<Option<Vec3>> {
        if self.data.geometry().vertex(vertex).is_none() {
            return Err(MeshError::UnknownReference {
                kind: crate::common::EntityKind::Vertex,
                id: vertex.to_string(),
            });
        }
        self.skin_vertex(vertex, &self.resolve(transforms))
    }

    /// Looks up every named transformation once, by bone index
    fn resolve(&self, transforms: &BoneTransformations) -> Vec<Option<BoneTransformation>> {
        let skeleton = self.data.skeleton();
        let mut slots = vec![None; skeleton.bone_count()];
        for (id, transformation) in transforms {
            match skeleton.bone_index(id) {
                Some(bone) => slots[bone.index()] = Some(*transformation),
                None => log::warn!("Ignoring transformation for unknown bone {id}"),
            }
        }
        slots
    }

    fn skin_vertex(
        &self,
        vertex: VertexIndex,
        slots: &[Option<BoneTransformation>],
    ) -> Result<Option<Vec3>> {
        let skeleton = self.data.skeleton();
        let pulling = skeleton.bones_pulling(vertex);
        if pulling.is_empty() {
            return Ok(None);
        }

        let rest = self.data.geometry().position_of(vertex);
        let mut sum_position = Vec3::ZERO;
        let mut sum_weight = 0.0f32;

        for &bone in pulling {
            let mut p = rest;
            for (index, link) in skeleton.chain(bone) {
                if let Some(transformation) = &slots[index.index()] {
                    p = transformation.apply(p, link.head_position());
                }
            }

            let weight = skeleton.bone_at(bone).weight();
            sum_position += p * weight;
            sum_weight += weight;
        }

        if sum_weight == 0.0 {
            return match self.options.zero_weight {
                ZeroWeightPolicy::Reject => Err(MeshError::DegenerateWeight {
                    vertex: self
                        .data
                        .geometry()
                        .vertex(vertex)
                        .map_or_else(|| vertex.to_string(), |v| v.id().to_string()),
                }),
                ZeroWeightPolicy::KeepRestPosition => Ok(Some(rest)),
            };
        }

        Ok(Some(sum_position / sum_weight))
    }

    fn write(&self, posed: Vec<(VertexIndex, Vec3)>, state: &mut MeshState) {
        log::trace!("Writing {} posed vertices", posed.len());
        for (vertex, position) in posed {
            state.write_position(vertex, position);
        }
    }
}

/// Poses `state` with the default [`SkinningOptions`]
///
/// # Errors
///
/// [`MeshError::StateMismatch`] if `state` was not derived from `data`,
/// [`MeshError::DegenerateWeight`] if a vertex's pulling bones weigh zero.
pub fn apply_bone_transformations(
    data: &MeshData,
    transforms: &BoneTransformations,
    state: &mut MeshState,
) -> Result<()> {
    apply_bone_transformations_with(data, transforms, state, &SkinningOptions::default())
}

pub fn apply_bone_transformations_with(
    data: &MeshData,
    transforms: &BoneTransformations,
    state: &mut MeshState,
    options: &SkinningOptions,
) -> Result<()> {
    MeshSkinner::new(data, options.clone()).apply(transforms, state)
}
