// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RodClash Geometry
//!
//! Mesh topology built from decoded STL facets, horizontal plane clipping,
//! 2D convex hulls and triangle/triangle intersection, using nalgebra for
//! the vector math. All comparisons share one tolerance, [`EPSILON`].

pub mod clipper;
pub mod error;
pub mod face;
pub mod hull;
pub mod intersection;
pub mod mesh;
pub mod primitives;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use clipper::{MeshClipper, Point};
pub use error::{Error, Result};
pub use face::{clip_with_distances, ClipResult, Face};
pub use hull::convex_hull_2d;
pub use intersection::faces_intersect;
pub use mesh::{Mesh, MeshBuilder};
pub use primitives::{Edge, EdgeView, Triangle, TriangleView, Vertex, EPSILON};
