//! Property tests over generated meshes and sampling times

use proptest::prelude::*;
use xml_mesh::{
    BoneTransformation, BoneTransformations, CornerDecl, MeshData, MeshDataBuilder, Vec2, Vec3,
    apply_bone_transformations, get_bone_transformations_at,
};

/// Frame rates that divide a second into whole milliseconds
const FRAME_RATES: [f32; 5] = [1.0, 10.0, 20.0, 25.0, 50.0];

/// One animated bone moving from `from` at frame 0 to `to` at the last frame
fn linear_animation(length: u32, from: Vec3, to: Vec3) -> MeshData {
    let mut builder = MeshDataBuilder::new();
    builder.add_bone("b", Vec3::ZERO, 1.0).unwrap();
    builder.add_animation("a", length).unwrap();
    builder
        .add_key("a", "b", 0, BoneTransformation::from_translation(from))
        .unwrap();
    builder
        .add_key("a", "b", length, BoneTransformation::from_translation(to))
        .unwrap();
    builder.build().unwrap()
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

/// A fan of faces around a hub vertex; `quads[i]` picks the kind of face i
fn fan(quads: &[bool]) -> MeshData {
    let mut builder = MeshDataBuilder::new();
    builder.add_vertex("hub", Vec3::ZERO).unwrap();
    let rim = quads.len() * 2 + 1;
    for i in 0..rim {
        let angle = i as f32 / rim as f32 * std::f32::consts::TAU;
        builder
            .add_vertex(format!("r{i}"), Vec3::new(angle.cos(), angle.sin(), 0.0))
            .unwrap();
    }

    for (i, &quad) in quads.iter().enumerate() {
        let a = format!("r{}", 2 * i);
        let b = format!("r{}", 2 * i + 1);
        let c = format!("r{}", 2 * i + 2);
        if quad {
            builder
                .add_quad(
                    format!("f{i}"),
                    false,
                    [
                        CornerDecl::new(Vec2::ZERO, "hub"),
                        CornerDecl::new(Vec2::X, &a),
                        CornerDecl::new(Vec2::ONE, &b),
                        CornerDecl::new(Vec2::Y, &c),
                    ],
                )
                .unwrap();
        } else {
            builder
                .add_triangle(
                    format!("f{i}"),
                    true,
                    [
                        CornerDecl::new(Vec2::ZERO, "hub"),
                        CornerDecl::new(Vec2::X, &a),
                        CornerDecl::new(Vec2::Y, &c),
                    ],
                )
                .unwrap();
        }
    }
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn prop_corner_links_form_one_cycle(quads in prop::collection::vec(any::<bool>(), 1..12)) {
        let mesh = fan(&quads);
        prop_assert_eq!(
            mesh.count_quads_triangles(),
            (quads.iter().filter(|&&q| q).count(), quads.iter().filter(|&&q| !q).count())
        );

        for (_, face) in mesh.geometry().faces() {
            let corners = face.corners();
            let mut slot = 0;
            let mut steps = 0;
            loop {
                prop_assert_eq!(corners[corners[slot].next()].prev(), slot);
                slot = corners[slot].next();
                steps += 1;
                if slot == 0 {
                    break;
                }
                prop_assert!(steps < corners.len());
            }
            prop_assert_eq!(steps, face.corner_count());
        }

        let hub = mesh.vertex_by_id("hub").unwrap();
        prop_assert_eq!(hub.corners().len(), quads.len());
    }

    #[test]
    fn prop_looping_repeats_every_period(
        length in 1u32..40,
        rate in 0usize..FRAME_RATES.len(),
        elapsed in 0u64..1_000_000,
        periods in 1u64..5,
    ) {
        let fps = FRAME_RATES[rate];
        let period = u64::from(length) * 1000 / fps as u64;
        let mesh = linear_animation(length, Vec3::ZERO, Vec3::new(4.0, -2.0, 8.0));

        let now = get_bone_transformations_at(&mesh, "a", elapsed, fps, true).unwrap();
        let later =
            get_bone_transformations_at(&mesh, "a", elapsed + periods * period, fps, true).unwrap();
        prop_assert_eq!(now, later);
    }

    #[test]
    fn prop_clamps_after_end(
        length in 1u32..40,
        rate in 0usize..FRAME_RATES.len(),
        overshoot in 0u64..1_000_000,
    ) {
        let fps = FRAME_RATES[rate];
        let period = u64::from(length) * 1000 / fps as u64;
        let to = Vec3::new(-3.0, 5.0, 1.0);
        let mesh = linear_animation(length, Vec3::ZERO, to);

        let pose = get_bone_transformations_at(&mesh, "a", period + overshoot, fps, false).unwrap();
        prop_assert_eq!(pose["b"], BoneTransformation::from_translation(to));
    }

    #[test]
    fn prop_samples_stay_between_keys(
        length in 1u32..40,
        elapsed in 0u64..10_000,
        from in vec3(),
        to in vec3(),
    ) {
        let mesh = linear_animation(length, from, to);
        let pose = get_bone_transformations_at(&mesh, "a", elapsed, 10.0, true).unwrap();
        let t = pose["b"].translation;
        let (low, high) = (from.min(to), from.max(to));
        prop_assert!(t.cmpge(low - 1e-3).all() && t.cmple(high + 1e-3).all());
    }

    #[test]
    fn prop_translations_average_by_weight(
        rest in vec3(),
        moves in prop::collection::vec((vec3(), 0.1f32..10.0), 1..6),
    ) {
        let mut builder = MeshDataBuilder::new();
        builder.add_vertex("v", rest).unwrap();
        let mut pose = BoneTransformations::new();
        let mut expected = Vec3::ZERO;
        let mut total = 0.0;
        for (i, (offset, weight)) in moves.iter().enumerate() {
            let id = format!("b{i}");
            builder.add_bone(id.as_str(), Vec3::ZERO, *weight).unwrap();
            builder.connect_bone_to_vertex(&id, "v").unwrap();
            pose.insert(id, BoneTransformation::from_translation(*offset));
            expected += (rest + *offset) * *weight;
            total += *weight;
        }
        let mesh = builder.build().unwrap();
        let mut state = mesh.derive_state();
        apply_bone_transformations(&mesh, &pose, &mut state).unwrap();

        let actual = state.vertex_by_id("v").unwrap().position();
        prop_assert!(
            actual.abs_diff_eq(expected / total, 1e-2),
            "{:?} != {:?}",
            actual,
            expected / total
        );
    }
}
