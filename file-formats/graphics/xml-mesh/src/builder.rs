//! Validated construction of [`MeshData`]
//!
//! A decoder of the interchange format drives [`MeshDataBuilder`] through one
//! call per declared element. Every call validates its references up front
//! and leaves the builder untouched when it fails. The first failure is also
//! remembered: [`MeshDataBuilder::build`] then reports it instead of
//! returning a mesh, so a half-declared mesh never escapes.
//!
//! # Example
//!
//! ```
//! use xml_mesh::{BoneTransformation, CornerDecl, MeshDataBuilder, Vec2, Vec3};
//!
//! let mut builder = MeshDataBuilder::new();
//! builder.add_vertex("v0", Vec3::new(0.0, 0.0, 0.0))?;
//! builder.add_vertex("v1", Vec3::new(1.0, 0.0, 0.0))?;
//! builder.add_vertex("v2", Vec3::new(0.0, 1.0, 0.0))?;
//! builder.add_triangle(
//!     "t0",
//!     false,
//!     [
//!         CornerDecl::new(Vec2::new(0.0, 0.0), "v0"),
//!         CornerDecl::new(Vec2::new(1.0, 0.0), "v1"),
//!         CornerDecl::new(Vec2::new(0.0, 1.0), "v2"),
//!     ],
//! )?;
//! builder.add_bone("root", Vec3::ZERO, 1.0)?;
//! builder.connect_bone_to_vertex("root", "v1")?;
//! builder.add_animation("wave", 10)?;
//! builder.add_key("wave", "root", 0, BoneTransformation::IDENTITY)?;
//!
//! let mesh = builder.build()?;
//! assert_eq!(mesh.count_quads_triangles(), (0, 1));
//! # Ok::<(), xml_mesh::MeshError>(())
//! ```

use std::collections::HashMap;

use crate::animation::{BoneTransformation, SkeletalAnimation};
use crate::common::{AnimationIndex, BoneIndex, EntityKind, FaceIndex, SubsetIndex, Vec3, VertexIndex};
use crate::error::{MeshError, Result};
use crate::mesh::{CornerDecl, FaceKind, MeshData, MeshGeometry, Skeleton};

/// Builder for [`MeshData`]
#[derive(Debug, Default)]
pub struct MeshDataBuilder {
    geometry: MeshGeometry,
    skeleton: Skeleton,
    animations: Vec<SkeletalAnimation>,
    animation_ids: HashMap<String, AnimationIndex>,
    /// `(child, parent)` links, resolved in `build` once all bones exist
    parent_links: Vec<(BoneIndex, BoneIndex)>,
    failure: Option<MeshError>,
}

impl MeshDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first error any call has returned so far
    pub fn failure(&self) -> Option<&MeshError> {
        self.failure.as_ref()
    }

    pub fn add_vertex(&mut self, id: impl Into<String>, position: Vec3) -> Result<VertexIndex> {
        let result = self.geometry.add_vertex(id.into(), position);
        self.record(result)
    }

    /// Declares a triangle or quad
    ///
    /// Corners are given in counter-clockwise order; that order becomes the
    /// face's fixed corner cycle. Ids are shared between triangles and quads.
    pub fn add_face(
        &mut self,
        id: impl Into<String>,
        smooth: bool,
        corners: &[CornerDecl<'_>],
    ) -> Result<FaceIndex> {
        let result = self.geometry.add_face(id.into(), smooth, corners);
        self.record(result)
    }

    pub fn add_triangle(
        &mut self,
        id: impl Into<String>,
        smooth: bool,
        corners: [CornerDecl<'_>; 3],
    ) -> Result<FaceIndex> {
        self.add_face(id, smooth, &corners)
    }

    pub fn add_quad(
        &mut self,
        id: impl Into<String>,
        smooth: bool,
        corners: [CornerDecl<'_>; 4],
    ) -> Result<FaceIndex> {
        self.add_face(id, smooth, &corners)
    }

    pub fn add_subset(&mut self, id: impl Into<String>) -> Result<SubsetIndex> {
        let result = self.geometry.add_subset(id.into());
        self.record(result)
    }

    /// Adds a declared face to a declared subset
    ///
    /// `expected` must match the face's actual shape. Adding the same face
    /// twice is a no-op.
    pub fn add_face_to_subset(&mut self, subset_id: &str, face_id: &str, expected: FaceKind) -> Result<()> {
        let result = self
            .geometry
            .add_face_to_subset(subset_id, face_id, expected)
            .map(|added| {
                if !added {
                    log::debug!("Face {face_id} is already in subset {subset_id}");
                }
            });
        self.record(result)
    }

    pub fn add_triangle_to_subset(&mut self, subset_id: &str, triangle_id: &str) -> Result<()> {
        self.add_face_to_subset(subset_id, triangle_id, FaceKind::Triangle)
    }

    pub fn add_quad_to_subset(&mut self, subset_id: &str, quad_id: &str) -> Result<()> {
        self.add_face_to_subset(subset_id, quad_id, FaceKind::Quad)
    }

    /// Declares a parentless bone
    pub fn add_bone(&mut self, id: impl Into<String>, head_position: Vec3, weight: f32) -> Result<BoneIndex> {
        let result = self.skeleton.add_bone(id.into(), head_position, weight);
        self.record(result)
    }

    /// Makes `bone_id` pull `vertex_id`. Repeating a connection is a no-op.
    pub fn connect_bone_to_vertex(&mut self, bone_id: &str, vertex_id: &str) -> Result<()> {
        let result = self.try_connect_bone_to_vertex(bone_id, vertex_id);
        self.record(result)
    }

    fn try_connect_bone_to_vertex(&mut self, bone_id: &str, vertex_id: &str) -> Result<()> {
        let bone = self.resolve_bone(bone_id)?;
        let vertex = self.resolve_vertex(vertex_id)?;
        if !self.skeleton.connect_vertex(bone, vertex) {
            log::debug!("Bone {bone_id} already pulls vertex {vertex_id}");
        }
        Ok(())
    }

    /// Makes `parent_id` the parent of `child_id`
    ///
    /// Both bones must be declared. The link itself is applied by
    /// [`build`](Self::build), which also rejects cyclic skeletons.
    pub fn connect_bones(&mut self, parent_id: &str, child_id: &str) -> Result<()> {
        let result = self
            .resolve_bone(parent_id)
            .and_then(|parent| Ok((parent, self.resolve_bone(child_id)?)));
        if let Ok((parent, child)) = result {
            self.parent_links.push((child, parent));
        }
        self.record(result.map(|_| ()))
    }

    /// Declares an animation of `length` frames
    pub fn add_animation(&mut self, id: impl Into<String>, length: u32) -> Result<AnimationIndex> {
        let id = id.into();
        let result = if self.animation_ids.contains_key(&id) {
            Err(MeshError::DuplicateId {
                kind: EntityKind::Animation,
                id,
            })
        } else {
            let index = AnimationIndex(self.animations.len());
            self.animation_ids.insert(id.clone(), index);
            self.animations.push(SkeletalAnimation::new(id, length));
            Ok(index)
        };
        self.record(result)
    }

    /// Declares that `bone_id` is animated by `animation_id`. Idempotent.
    pub fn add_layer(&mut self, animation_id: &str, bone_id: &str) -> Result<()> {
        let result = self.resolve_layer(animation_id, bone_id).map(|(animation, bone)| {
            self.animations[animation.0].layer_mut(bone);
        });
        self.record(result)
    }

    /// Keys `bone_id` at `frame` of `animation_id`, creating the layer if needed
    pub fn add_key(
        &mut self,
        animation_id: &str,
        bone_id: &str,
        frame: u32,
        transformation: BoneTransformation,
    ) -> Result<()> {
        let result = self
            .resolve_layer(animation_id, bone_id)
            .and_then(|(animation, bone)| {
                let layer = self.animations[animation.0].layer_mut(bone);
                if layer.insert(frame, transformation) {
                    Ok(())
                } else {
                    Err(MeshError::DuplicateKey {
                        animation: animation_id.to_string(),
                        bone: bone_id.to_string(),
                        frame,
                    })
                }
            });
        self.record(result)
    }

    /// Finishes construction
    ///
    /// Applies the bone parent links, checks that the skeleton is a forest,
    /// and returns the immutable mesh. Fails with the first error any earlier
    /// call returned.
    pub fn build(mut self) -> Result<MeshData> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }

        for &(child, parent) in &self.parent_links {
            if let Some(previous) = self.skeleton.set_parent(child, parent) {
                if previous != parent {
                    log::warn!(
                        "Bone {} re-parented from {} to {}",
                        self.skeleton.bone_at(child).id(),
                        self.skeleton.bone_at(previous).id(),
                        self.skeleton.bone_at(parent).id()
                    );
                }
            }
        }
        self.skeleton.check_acyclic()?;
        self.skeleton.cover_vertices(self.geometry.vertex_count());

        let (quads, triangles) = self.geometry.count_quads_triangles();
        log::debug!(
            "Built mesh: {} vertices, {} quads, {} triangles, {} subsets, {} bones, {} animations",
            self.geometry.vertex_count(),
            quads,
            triangles,
            self.geometry.subset_count(),
            self.skeleton.bone_count(),
            self.animations.len()
        );

        Ok(MeshData::from_parts(
            self.geometry,
            self.skeleton,
            self.animations,
            self.animation_ids,
        ))
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            log::debug!("Mesh construction call failed: {err}");
            if self.failure.is_none() {
                self.failure = Some(err.clone());
            }
        }
        result
    }

    fn resolve_vertex(&self, id: &str) -> Result<VertexIndex> {
        self.geometry
            .vertex_index(id)
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Vertex,
                id: id.to_string(),
            })
    }

    fn resolve_bone(&self, id: &str) -> Result<BoneIndex> {
        self.skeleton
            .bone_index(id)
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Bone,
                id: id.to_string(),
            })
    }

    fn resolve_layer(&self, animation_id: &str, bone_id: &str) -> Result<(AnimationIndex, BoneIndex)> {
        let animation = self
            .animation_ids
            .get(animation_id)
            .copied()
            .ok_or_else(|| MeshError::UnknownReference {
                kind: EntityKind::Animation,
                id: animation_id.to_string(),
            })?;
        let bone = self.resolve_bone(bone_id)?;
        Ok((animation, bone))
    }
}
