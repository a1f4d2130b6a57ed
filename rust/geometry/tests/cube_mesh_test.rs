// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rodclash_core::decode;
use rodclash_geometry::{
    convex_hull_2d, faces_intersect, Face, Mesh, MeshClipper, Point3, Vertex,
};
use std::fs;
use std::path::PathBuf;

fn cube_mesh() -> Mesh {
    // The fixture lives with the decoder tests
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = PathBuf::from(manifest_dir)
        .join("..")
        .join("core")
        .join("tests")
        .join("fixtures")
        .join("cube_10mm.stl");
    let bytes = fs::read(&path)
        .unwrap_or_else(|e| panic!("fixture not readable at {}: {}", path.display(), e));
    let model = decode(&bytes).unwrap();
    Mesh::from_model(&model).unwrap()
}

#[test]
fn test_cube_topology() {
    let mesh = cube_mesh();

    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.edge_count(), 18);
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.edge_user_total(), 36);

    // Closed surface: every edge shared by exactly 2 triangles
    assert!(mesh.edges().iter().all(|e| e.users.len() == 2));
    assert!(mesh.triangles().iter().all(|t| t.oriented));

    // No two stored vertices are equal
    let v = mesh.vertices();
    for i in 0..v.len() {
        for j in i + 1..v.len() {
            assert_ne!(v[i], v[j]);
        }
    }
}

#[test]
fn test_cube_slice_outline() {
    let mesh = cube_mesh();
    let mut clipper = MeshClipper::new(&mesh);
    clipper.soft_clip(3.0);

    let boundary = clipper.top_boundary_points(1.0);
    let hull = convex_hull_2d(&boundary);
    assert_eq!(
        hull,
        vec![
            Vertex::new(-5.0, -5.0, 3.0),
            Vertex::new(5.0, -5.0, 3.0),
            Vertex::new(5.0, 5.0, 3.0),
            Vertex::new(-5.0, 5.0, 3.0),
        ]
    );
}

#[test]
fn test_rod_through_printed_part() {
    let mesh = cube_mesh();
    let mut clipper = MeshClipper::new(&mesh);
    clipper.soft_clip(4.0);
    let printed = clipper.printed_faces();

    // A slanted blade entering the cube wall below the cut
    let blade = Face::new(
        Point3::new(8.0, 0.0, 1.0),
        Point3::new(3.0, -1.0, 2.0),
        Point3::new(3.0, 1.0, 2.0),
    );
    assert!(printed.iter().any(|f| faces_intersect(f, &blade)));

    // The same blade above the cut misses everything printed so far
    let high = blade.translated(&rodclash_geometry::Vector3::new(0.0, 0.0, 5.0));
    assert!(!printed.iter().any(|f| faces_intersect(f, &high)));
}
