//! Common test fixtures

#![allow(dead_code)]

use xml_mesh::{
    BoneTransformation, CornerDecl, MeshData, MeshDataBuilder, Quat, Vec2, Vec3,
};

/// Install a logger once; repeated calls are harmless
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, 1e-5),
        "expected {expected:?}, got {actual:?}"
    );
}

/// Id of the cube vertex at the given corner, e.g. `"v+-+"`
pub fn cube_vertex(x: f32, y: f32, z: f32) -> String {
    let sign = |c: f32| if c > 0.0 { '+' } else { '-' };
    format!("v{}{}{}", sign(x), sign(y), sign(z))
}

/// Faces of the cube `[-1, 1]^3`, corners counter-clockwise seen from outside
pub const CUBE_FACES: [(&str, [[f32; 3]; 4]); 6] = [
    (
        "front",
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    ),
    (
        "back",
        [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    ),
    (
        "right",
        [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
    ),
    (
        "left",
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    ),
    (
        "top",
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    ),
    (
        "bottom",
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    ),
];

const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Declares the cube geometry with the given smoothness on every face
pub fn cube_builder(smooth: bool) -> MeshDataBuilder {
    let mut builder = MeshDataBuilder::new();
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                builder
                    .add_vertex(cube_vertex(x, y, z), Vec3::new(x, y, z))
                    .unwrap();
            }
        }
    }

    builder.add_subset("sides").unwrap();
    builder.add_subset("caps").unwrap();

    for (id, corners) in CUBE_FACES {
        let ids: Vec<String> = corners
            .iter()
            .map(|[x, y, z]| cube_vertex(*x, *y, *z))
            .collect();
        let decls: [CornerDecl<'_>; 4] = std::array::from_fn(|i| {
            CornerDecl::new(Vec2::from_array(QUAD_UVS[i]), ids[i].as_str())
        });
        builder.add_quad(id, smooth, decls).unwrap();

        let subset = if matches!(id, "top" | "bottom") {
            "caps"
        } else {
            "sides"
        };
        builder.add_quad_to_subset(subset, id).unwrap();
    }

    builder
}

pub fn cube(smooth: bool) -> MeshData {
    cube_builder(smooth).build().unwrap()
}

/// The cube split in two halves by the y = 0 plane
///
/// - bone `base` (root, head at the origin) pulls the four bottom vertices
/// - bone `lid` (child of `base`, head at the origin) pulls the four top ones
/// - animation `slide` (10 frames) moves `base` from rest to (2, 0, 0)
/// - animation `twist` (20 frames) turns `lid` a quarter around y at frame 10
///   and back at frame 20
pub fn rigged_cube() -> MeshData {
    let mut builder = cube_builder(true);

    builder.add_bone("lid", Vec3::ZERO, 1.0).unwrap();
    builder.add_bone("base", Vec3::ZERO, 1.0).unwrap();
    builder.connect_bones("base", "lid").unwrap();

    for x in [-1.0, 1.0] {
        for z in [-1.0, 1.0] {
            builder
                .connect_bone_to_vertex("base", &cube_vertex(x, -1.0, z))
                .unwrap();
            builder
                .connect_bone_to_vertex("lid", &cube_vertex(x, 1.0, z))
                .unwrap();
        }
    }

    builder.add_animation("slide", 10).unwrap();
    builder
        .add_key("slide", "base", 0, BoneTransformation::IDENTITY)
        .unwrap();
    builder
        .add_key(
            "slide",
            "base",
            10,
            BoneTransformation::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        )
        .unwrap();

    builder.add_animation("twist", 20).unwrap();
    builder
        .add_key("twist", "lid", 0, BoneTransformation::IDENTITY)
        .unwrap();
    builder
        .add_key(
            "twist",
            "lid",
            10,
            BoneTransformation::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        )
        .unwrap();
    builder
        .add_key("twist", "lid", 20, BoneTransformation::IDENTITY)
        .unwrap();

    builder.build().unwrap()
}

/// One vertex at (1, 0, 0) pulled with equal weight by two root bones
/// `still` and `moving`, plus an animation `push` on `moving` only
pub fn two_bone_vertex() -> MeshData {
    let mut builder = MeshDataBuilder::new();
    builder.add_vertex("v", Vec3::new(1.0, 0.0, 0.0)).unwrap();
    builder.add_bone("still", Vec3::ZERO, 1.0).unwrap();
    builder.add_bone("moving", Vec3::ZERO, 1.0).unwrap();
    builder.connect_bone_to_vertex("still", "v").unwrap();
    builder.connect_bone_to_vertex("moving", "v").unwrap();

    builder.add_animation("push", 10).unwrap();
    builder
        .add_key("push", "moving", 0, BoneTransformation::IDENTITY)
        .unwrap();
    builder
        .add_key(
            "push",
            "moving",
            10,
            BoneTransformation::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        )
        .unwrap();

    builder.build().unwrap()
}
