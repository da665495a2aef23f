//! Example: Rigging, animating and posing a cube
//!
//! Builds a cube whose top half hangs off a child bone, plays a short
//! animation on it and prints the posed corners and normals of the top face.
//!
//! Usage: RUST_LOG=debug cargo run --example pose_cube -- [elapsed_ms]

use std::f32::consts::FRAC_PI_2;

use xml_mesh::{
    BoneTransformation, BufferOptions, CornerDecl, MeshData, MeshDataBuilder, Quat, RenderBuffers,
    Vec2, Vec3, apply_bone_transformations, get_bone_transformations_at,
};

const FACES: [(&str, [[f32; 3]; 4]); 6] = [
    ("front", [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
    ("back", [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]]),
    ("right", [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
    ("left", [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
    ("top", [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
    ("bottom", [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
];

fn vertex_id([x, y, z]: [f32; 3]) -> String {
    format!("v{x}{y}{z}")
}

fn build_cube() -> xml_mesh::Result<MeshData> {
    let mut builder = MeshDataBuilder::new();
    builder.add_bone("hips", Vec3::ZERO, 1.0)?;
    builder.add_bone("chest", Vec3::ZERO, 1.0)?;
    builder.connect_bones("hips", "chest")?;

    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                let id = vertex_id([x, y, z]);
                builder.add_vertex(id.as_str(), Vec3::new(x, y, z))?;
                builder.connect_bone_to_vertex(if y > 0.0 { "chest" } else { "hips" }, &id)?;
            }
        }
    }

    let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
    builder.add_subset("all")?;
    for (id, corners) in FACES {
        let ids = corners.map(vertex_id);
        let decls: [CornerDecl<'_>; 4] =
            std::array::from_fn(|i| CornerDecl::new(uvs[i], ids[i].as_str()));
        builder.add_quad(id, id != "bottom", decls)?;
        builder.add_quad_to_subset("all", id)?;
    }

    builder.add_animation("bow", 40)?;
    builder.add_key("bow", "chest", 0, BoneTransformation::IDENTITY)?;
    builder.add_key(
        "bow",
        "chest",
        20,
        BoneTransformation::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
    )?;
    builder.add_key("bow", "chest", 40, BoneTransformation::IDENTITY)?;

    builder.build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let elapsed_ms = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 500,
    };

    let mesh = build_cube()?;
    let (quads, triangles) = mesh.count_quads_triangles();
    println!("Cube: {quads} quads, {triangles} triangles");
    println!("Bones: {}", mesh.skeleton().bone_count());

    let mut state = mesh.derive_state();
    let pose = get_bone_transformations_at(&mesh, "bow", elapsed_ms, 40.0, true)?;
    for (bone, transformation) in &pose {
        println!(
            "{bone}: rotation {:?}, translation {:?}",
            transformation.rotation, transformation.translation
        );
    }
    apply_bone_transformations(&mesh, &pose, &mut state)?;

    let buffers = RenderBuffers::build(&state, &BufferOptions::default())?;
    println!(
        "\n=== Posed top face at {elapsed_ms} ms ({} triangles total) ===",
        buffers.triangle_count()
    );
    let top = state
        .geometry()
        .face_index("top")
        .ok_or("cube has no top face")?;
    let first = top.index() * 4;
    for vertex in &buffers.vertices[first..first + 4] {
        println!("position {:?} normal {:?}", vertex.position, vertex.normal);
    }

    Ok(())
}
