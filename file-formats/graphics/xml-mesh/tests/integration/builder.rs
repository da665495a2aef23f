//! Declaring meshes and deriving states

use crate::common::{cube, cube_builder, cube_vertex, init_logging, rigged_cube};
use pretty_assertions::assert_eq;
use xml_mesh::common::EntityKind;
use xml_mesh::{BoneTransformation, FaceKind, MeshDataBuilder, MeshError, Vec3, derive_mesh_state};

#[test]
fn test_cube_counts() {
    init_logging();
    let mesh = rigged_cube();

    assert_eq!(mesh.geometry().vertex_count(), 8);
    assert_eq!(mesh.geometry().face_count(), 6);
    assert_eq!(mesh.count_quads_triangles(), (6, 0));
    assert_eq!(mesh.skeleton().bone_count(), 2);
    assert_eq!(mesh.animation_count(), 2);

    let sides = mesh.geometry().subset_by_id("sides").unwrap();
    assert_eq!(sides.count_quads_triangles(), (4, 0));
    let caps = mesh.geometry().subset_by_id("caps").unwrap();
    assert_eq!(caps.faces().len(), 2);
}

#[test]
fn test_every_face_is_one_corner_cycle() {
    let mesh = cube(false);
    for (_, face) in mesh.geometry().faces() {
        let corners = face.corners();
        let mut visited = vec![false; corners.len()];
        let mut slot = 0;
        for _ in 0..corners.len() {
            assert!(!visited[slot], "face {} revisits slot {slot}", face.id());
            visited[slot] = true;
            let next = corners[slot].next();
            assert_eq!(corners[next].prev(), slot);
            slot = next;
        }
        assert_eq!(slot, 0);
        assert!(visited.iter().all(|&v| v));
    }
}

#[test]
fn test_vertex_backreferences() {
    let mesh = rigged_cube();
    let corner = mesh.vertex_by_id(&cube_vertex(1.0, 1.0, 1.0)).unwrap();
    // Every cube vertex is shared by three faces.
    assert_eq!(corner.corners().len(), 3);

    let index = mesh.geometry().vertex_index(&cube_vertex(1.0, 1.0, 1.0)).unwrap();
    let pulling: Vec<&str> = mesh
        .bones_pulling(index)
        .iter()
        .map(|&bone| mesh.skeleton().bone(bone).unwrap().id())
        .collect();
    assert_eq!(pulling, vec!["lid"]);

    let lid = mesh.bone_by_id("lid").unwrap();
    assert_eq!(lid.vertices().len(), 4);
    assert_eq!(
        lid.parent(),
        Some(mesh.skeleton().bone_index("base").unwrap())
    );
}

#[test]
fn test_rejects_reused_vertex_id() {
    let mut builder = cube_builder(false);
    let err = builder
        .add_vertex(cube_vertex(1.0, 1.0, 1.0), Vec3::ZERO)
        .unwrap_err();
    assert_eq!(
        err,
        MeshError::DuplicateId {
            kind: EntityKind::Vertex,
            id: cube_vertex(1.0, 1.0, 1.0)
        }
    );
    assert_eq!(builder.build().unwrap_err(), err);
}

#[test]
fn test_rejects_undeclared_face_in_subset() {
    let mut builder = cube_builder(false);
    assert_eq!(
        builder.add_face_to_subset("sides", "lid", FaceKind::Quad),
        Err(MeshError::UnknownReference {
            kind: EntityKind::Face,
            id: "lid".to_string()
        })
    );
    assert!(builder.build().is_err());
}

#[test]
fn test_rejects_duplicate_key() {
    let mut builder = MeshDataBuilder::new();
    builder.add_bone("b", Vec3::ZERO, 1.0).unwrap();
    builder.add_animation("a", 5).unwrap();
    builder
        .add_key("a", "b", 3, BoneTransformation::IDENTITY)
        .unwrap();
    assert_eq!(
        builder.add_key("a", "b", 3, BoneTransformation::from_translation(Vec3::X)),
        Err(MeshError::DuplicateKey {
            animation: "a".to_string(),
            bone: "b".to_string(),
            frame: 3
        })
    );
    assert!(builder.build().is_err());
}

#[test]
fn test_rejects_triangle_expected_for_quad() {
    let mut builder = cube_builder(false);
    assert!(matches!(
        builder.add_triangle_to_subset("caps", "front"),
        Err(MeshError::CategoryMismatch { .. })
    ));
}

#[test]
fn test_derived_state_mirrors_data() {
    let mesh = rigged_cube();
    let state = derive_mesh_state(&mesh);

    let data = mesh.geometry();
    let copy = state.geometry();
    assert_eq!(copy.vertex_count(), data.vertex_count());
    for ((_, ours), (_, theirs)) in copy.vertices().zip(data.vertices()) {
        assert_eq!(ours.id(), theirs.id());
        assert_eq!(ours.position(), theirs.position());
        assert_eq!(ours.corners(), theirs.corners());
    }

    for ((_, ours), (_, theirs)) in copy.faces().zip(data.faces()) {
        assert_eq!(ours.id(), theirs.id());
        assert_eq!(ours.is_smooth(), theirs.is_smooth());
        assert_eq!(ours.corners(), theirs.corners());
    }

    for ((_, ours), (_, theirs)) in copy.subsets().zip(data.subsets()) {
        assert_eq!(ours.id(), theirs.id());
        let ours: Vec<&str> = ours
            .faces()
            .iter()
            .map(|&f| copy.face(f).unwrap().id())
            .collect();
        let theirs: Vec<&str> = theirs
            .faces()
            .iter()
            .map(|&f| data.face(f).unwrap().id())
            .collect();
        assert_eq!(ours, theirs);
    }

    assert_eq!(state.count_quads_triangles(), mesh.count_quads_triangles());
}

#[test]
fn test_states_are_independent() {
    let mesh = cube(false);
    let mut first = mesh.derive_state();
    let second = mesh.derive_state();
    let index = mesh.geometry().vertex_index(&cube_vertex(-1.0, -1.0, -1.0)).unwrap();

    first.set_vertex_position(index, Vec3::splat(7.0)).unwrap();
    assert_eq!(second.geometry().vertex(index).unwrap().position(), Vec3::splat(-1.0));
    assert_eq!(mesh.geometry().vertex(index).unwrap().position(), Vec3::splat(-1.0));

    first.reset_to_rest(&mesh).unwrap();
    assert_eq!(first, second);
}
