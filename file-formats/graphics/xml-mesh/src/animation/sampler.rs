//! Turning elapsed time into per-bone transformations
//!
//! Time is first mapped to a continuous frame position, either wrapped
//! around the animation length or clamped to its end. Each layer is then
//! sampled on its own: the keys on either side of the frame are picked and
//! blended, slerp for rotation and lerp for translation.

use std::collections::HashMap;

use super::types::{BoneLayer, BoneTransformation, Interpolate, SkeletalAnimation};
use crate::error::{MeshError, Result};
use crate::mesh::MeshData;

/// Bone id to transformation. Bones without an entry are in rest pose.
pub type BoneTransformations = HashMap<String, BoneTransformation>;

/// The keys bracketing a frame position and the distance to each of them
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct KeyPick {
    pub prev: u32,
    pub next: u32,
    pub distance_prev: f64,
    pub distance_next: f64,
}

impl KeyPick {
    /// Blend factor from `prev` towards `next`
    pub fn factor(&self) -> f32 {
        let total = self.distance_prev + self.distance_next;
        if total <= 0.0 {
            return 0.0;
        }
        (self.distance_prev / total).clamp(0.0, 1.0) as f32
    }
}

/// Continuous frame position after `elapsed_ms`
///
/// When looping, time wraps with a period of `1000 * length / fps` ms and
/// the result lies in `[0, length)`. Otherwise time is clamped to that
/// period, so the result never exceeds `length`.
pub fn frame_position(elapsed_ms: u64, fps: f32, length: u32, looping: bool) -> Result<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(MeshError::InvalidFrameRate(fps));
    }

    let ms_per_frame = 1000.0 / f64::from(fps);
    let period_ms = f64::from(length) * ms_per_frame;
    let elapsed = elapsed_ms as f64;

    let ms = if looping {
        if period_ms > 0.0 {
            elapsed % period_ms
        } else {
            0.0
        }
    } else {
        elapsed.min(period_ms)
    };

    Ok((ms / ms_per_frame).min(f64::from(length)))
}

/// Picks the keys around `frame`
///
/// Precondition: the layer is not empty and `frame` lies in `[0, length]`.
pub(crate) fn pick_keys(layer: &BoneLayer, frame: f64, length: u32, looping: bool) -> Option<KeyPick> {
    let first = layer.first_frame()?;
    let last = layer.last_frame()?;
    let frame = frame.max(0.0);
    let length = f64::from(length);

    let (prev, distance_prev) = match layer.frame_at_or_before(frame.floor() as u32) {
        Some(prev) => (prev, frame - f64::from(prev)),
        None if looping => (last, frame + (length - f64::from(last))),
        None => (first, (frame - f64::from(first)).max(0.0)),
    };

    let (next, distance_next) = match layer.frame_at_or_after(frame.ceil() as u32) {
        Some(next) => (next, f64::from(next) - frame),
        None if looping => (first, length - frame + f64::from(first)),
        None => (last, (f64::from(last) - frame).max(0.0)),
    };

    Some(KeyPick {
        prev,
        next,
        distance_prev,
        distance_next,
    })
}

/// Samples one layer at a frame position
pub(crate) fn sample_layer(
    animation: &SkeletalAnimation,
    layer: &BoneLayer,
    bone_id: &str,
    frame: f64,
    looping: bool,
) -> Result<BoneTransformation> {
    let empty = || MeshError::EmptyLayer {
        animation: animation.id().to_string(),
        bone: bone_id.to_string(),
    };

    let last = layer.last_frame().ok_or_else(empty)?;
    if last > animation.length() {
        return Err(MeshError::KeyOutOfRange {
            animation: animation.id().to_string(),
            bone: bone_id.to_string(),
            last,
            length: animation.length(),
        });
    }

    let pick = pick_keys(layer, frame, animation.length(), looping).ok_or_else(empty)?;
    let prev = layer.key(pick.prev).ok_or_else(empty)?;

    if pick.prev == pick.next {
        return Ok(prev.transformation);
    }

    let next = layer.key(pick.next).ok_or_else(empty)?;
    let s = pick.factor();
    log::trace!(
        "Layer {bone_id}: frame {frame:.3} between keys {} and {} (s = {s:.3})",
        pick.prev,
        pick.next
    );
    Ok(prev.transformation.interpolate(&next.transformation, s))
}

/// Samples every layer of an animation after `elapsed_ms`
///
/// Returns one entry per bone that has a layer in the animation; bones
/// without a layer are absent and should be treated as being in rest pose.
///
/// # Errors
///
/// [`MeshError::UnknownAnimation`] for an undeclared animation id,
/// [`MeshError::InvalidFrameRate`] for a non-positive `fps`,
/// [`MeshError::EmptyLayer`] or [`MeshError::KeyOutOfRange`] for a layer
/// without keys or with keys past the animation length.
pub fn get_bone_transformations_at(
    data: &MeshData,
    animation_id: &str,
    elapsed_ms: u64,
    fps: f32,
    looping: bool,
) -> Result<BoneTransformations> {
    let animation = data
        .animation_by_id(animation_id)
        .ok_or_else(|| MeshError::UnknownAnimation(animation_id.to_string()))?;

    let frame = frame_position(elapsed_ms, fps, animation.length(), looping)?;

    let mut transformations = HashMap::with_capacity(animation.layers().len());
    for layer in animation.layers() {
        let bone_id = data.skeleton().bone_at(layer.bone()).id();
        let transformation = sample_layer(animation, layer, bone_id, frame, looping)?;
        transformations.insert(bone_id.to_string(), transformation);
    }

    Ok(transformations)
}
