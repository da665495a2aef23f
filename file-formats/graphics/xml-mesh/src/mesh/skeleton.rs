//! Bone forest and the bone/vertex pull relation

use std::collections::HashMap;

use crate::common::{BoneIndex, EntityKind, Vec3, VertexIndex};
use crate::error::{MeshError, Result};

/// A bone of the skeleton
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Bone {
    id: String,
    parent: Option<BoneIndex>,
    head_position: Vec3,
    weight: f32,
    vertices: Vec<VertexIndex>,
}

impl Bone {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<BoneIndex> {
        self.parent
    }

    /// Pivot of the bone's rotation, in mesh space
    pub fn head_position(&self) -> Vec3 {
        self.head_position
    }

    /// Pull strength used when averaging the bones of a vertex
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Vertices this bone pulls
    pub fn vertices(&self) -> &[VertexIndex] {
        &self.vertices
    }
}

/// Bones plus, for every vertex, the bones pulling it
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Skeleton {
    bones: Vec<Bone>,
    vertex_bones: Vec<Vec<BoneIndex>>,
    #[cfg_attr(feature = "serde-support", serde(skip))]
    bone_ids: HashMap<String, BoneIndex>,
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    New,
    InChain,
    Done,
}

impl Skeleton {
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, index: BoneIndex) -> Option<&Bone> {
        self.bones.get(index.0)
    }

    pub fn bone_index(&self, id: &str) -> Option<BoneIndex> {
        self.bone_ids.get(id).copied()
    }

    pub fn has_bone(&self, id: &str) -> bool {
        self.bone_ids.contains_key(id)
    }

    pub fn bone_by_id(&self, id: &str) -> Option<&Bone> {
        self.bone_index(id).and_then(|index| self.bone(index))
    }

    /// Iterate bones in declaration order
    pub fn bones(&self) -> impl ExactSizeIterator<Item = (BoneIndex, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .map(|(i, bone)| (BoneIndex(i), bone))
    }

    /// Bones without a parent
    pub fn roots(&self) -> impl Iterator<Item = BoneIndex> + '_ {
        self.bones()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(index, _)| index)
    }

    /// Bones pulling the given vertex, in connection order
    pub fn bones_pulling(&self, vertex: VertexIndex) -> &[BoneIndex] {
        self.vertex_bones
            .get(vertex.0)
            .map_or(&[][..], Vec::as_slice)
    }

    /// The bone itself followed by its parent, grandparent, up to the root
    pub fn chain(&self, bone: BoneIndex) -> Chain<'_> {
        Chain {
            skeleton: self,
            next: self.bone(bone).map(|_| bone),
        }
    }

    pub(crate) fn bone_at(&self, index: BoneIndex) -> &Bone {
        &self.bones[index.0]
    }

    pub(crate) fn add_bone(&mut self, id: String, head_position: Vec3, weight: f32) -> Result<BoneIndex> {
        if self.bone_ids.contains_key(&id) {
            return Err(MeshError::DuplicateId {
                kind: EntityKind::Bone,
                id,
            });
        }

        let index = BoneIndex(self.bones.len());
        self.bone_ids.insert(id.clone(), index);
        self.bones.push(Bone {
            id,
            parent: None,
            head_position,
            weight,
            vertices: Vec::new(),
        });
        Ok(index)
    }

    /// Records the mutual pull relation. Returns `false` if it already existed.
    pub(crate) fn connect_vertex(&mut self, bone: BoneIndex, vertex: VertexIndex) -> bool {
        if self.vertex_bones.len() <= vertex.0 {
            self.vertex_bones.resize_with(vertex.0 + 1, Vec::new);
        }

        let pulling = &mut self.vertex_bones[vertex.0];
        if pulling.contains(&bone) {
            return false;
        }
        pulling.push(bone);
        self.bones[bone.0].vertices.push(vertex);
        true
    }

    /// Sets the parent link, returning the one it replaced
    pub(crate) fn set_parent(&mut self, child: BoneIndex, parent: BoneIndex) -> Option<BoneIndex> {
        self.bones[child.0].parent.replace(parent)
    }

    /// Pads the vertex table so every vertex of the mesh has an entry
    pub(crate) fn cover_vertices(&mut self, vertex_count: usize) {
        if self.vertex_bones.len() < vertex_count {
            self.vertex_bones.resize_with(vertex_count, Vec::new);
        }
    }

    /// Fails if following parent links from any bone revisits a bone
    pub(crate) fn check_acyclic(&self) -> Result<()> {
        let mut visits = vec![Visit::New; self.bones.len()];

        for start in 0..self.bones.len() {
            let mut walked = Vec::new();
            let mut current = Some(BoneIndex(start));

            while let Some(bone) = current {
                match visits[bone.0] {
                    Visit::Done => break,
                    Visit::InChain => {
                        return Err(MeshError::CyclicSkeleton {
                            bone: self.bones[bone.0].id.clone(),
                        });
                    }
                    Visit::New => {
                        visits[bone.0] = Visit::InChain;
                        walked.push(bone);
                        current = self.bones[bone.0].parent;
                    }
                }
            }

            for bone in walked {
                visits[bone.0] = Visit::Done;
            }
        }

        Ok(())
    }
}

/// Iterator over a bone and its ancestors, see [`Skeleton::chain`]
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    skeleton: &'a Skeleton,
    next: Option<BoneIndex>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (BoneIndex, &'a Bone);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let bone = self.skeleton.bone(index)?;
        self.next = bone.parent;
        Some((index, bone))
    }
}
