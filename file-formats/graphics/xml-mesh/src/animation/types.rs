//! Keyframe data for skeletal animations

use std::collections::BTreeMap;

use crate::common::{BoneIndex, Quat, Vec3};

/// Types that can be blended between two values with a factor in `[0, 1]`
pub trait Interpolate: Clone {
    fn interpolate(&self, other: &Self, s: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, s: f32) -> Self {
        self + (other - self) * s
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, s: f32) -> Self {
        (1.0 - s) * *self + s * *other
    }
}

impl Interpolate for Quat {
    /// Spherical linear interpolation along the shorter arc
    fn interpolate(&self, other: &Self, s: f32) -> Self {
        self.slerp(*other, s)
    }
}

/// Rigid transformation of a bone relative to its rest pose
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneTransformation {
    /// Unit rotation around the bone's head position
    pub rotation: Quat,
    pub translation: Vec3,
}

impl BoneTransformation {
    /// Rest pose: no rotation, no translation
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(rotation, Vec3::ZERO)
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(Quat::IDENTITY, translation)
    }

    /// Rotates `point` around `pivot`, then translates it
    pub fn apply(&self, point: Vec3, pivot: Vec3) -> Vec3 {
        self.rotation * (point - pivot) + pivot + self.translation
    }
}

impl Default for BoneTransformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Interpolate for BoneTransformation {
    fn interpolate(&self, other: &Self, s: f32) -> Self {
        Self {
            rotation: self.rotation.interpolate(&other.rotation, s),
            translation: self.translation.interpolate(&other.translation, s),
        }
    }
}

/// Transformation of one bone at one frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneKey {
    pub frame: u32,
    pub transformation: BoneTransformation,
}

/// Timeline of one bone within an animation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct BoneLayer {
    bone: BoneIndex,
    keys: BTreeMap<u32, BoneKey>,
}

impl BoneLayer {
    pub(crate) fn new(bone: BoneIndex) -> Self {
        Self {
            bone,
            keys: BTreeMap::new(),
        }
    }

    pub fn bone(&self) -> BoneIndex {
        self.bone
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, frame: u32) -> Option<&BoneKey> {
        self.keys.get(&frame)
    }

    /// Keys in ascending frame order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &BoneKey> {
        self.keys.values()
    }

    pub fn first_frame(&self) -> Option<u32> {
        self.keys.keys().next().copied()
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.keys.keys().next_back().copied()
    }

    /// Greatest keyed frame `<= frame`
    pub(crate) fn frame_at_or_before(&self, frame: u32) -> Option<u32> {
        self.keys.range(..=frame).next_back().map(|(&f, _)| f)
    }

    /// Smallest keyed frame `>= frame`
    pub(crate) fn frame_at_or_after(&self, frame: u32) -> Option<u32> {
        self.keys.range(frame..).next().map(|(&f, _)| f)
    }

    /// Inserts a key, returning `false` if the frame was already keyed
    pub(crate) fn insert(&mut self, frame: u32, transformation: BoneTransformation) -> bool {
        if self.keys.contains_key(&frame) {
            return false;
        }
        self.keys.insert(
            frame,
            BoneKey {
                frame,
                transformation,
            },
        );
        true
    }
}

/// A named animation: a length in frames and one layer per animated bone
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct SkeletalAnimation {
    id: String,
    length: u32,
    layers: BTreeMap<BoneIndex, BoneLayer>,
}

impl SkeletalAnimation {
    pub(crate) fn new(id: String, length: u32) -> Self {
        Self {
            id,
            length,
            layers: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Length in frames
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn layer(&self, bone: BoneIndex) -> Option<&BoneLayer> {
        self.layers.get(&bone)
    }

    /// Layers ordered by bone index
    pub fn layers(&self) -> impl ExactSizeIterator<Item = &BoneLayer> {
        self.layers.values()
    }

    /// Returns the layer of `bone`, creating an empty one if needed
    pub(crate) fn layer_mut(&mut self, bone: BoneIndex) -> &mut BoneLayer {
        self.layers
            .entry(bone)
            .or_insert_with(|| BoneLayer::new(bone))
    }
}
