// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RodClash Engine
//!
//! Predicts whether the rods of a delta 3D printer will strike a part while
//! printing it.
//!
//! ```rust,ignore
//! use rodclash_engine::{load_mesh, load_pivots, will_collide, AnchorMode};
//!
//! let mesh = load_mesh("part.stl")?;
//! let pivots = load_pivots("printer.cfg")?;
//! if will_collide(&mesh, &pivots, 0.2, AnchorMode::Fixed)? {
//!     println!("rods will hit the part");
//! }
//! ```
//!
//! The model must stand on the bed (lowest point at z = 0); see
//! [`grounded`] for models that do not.

pub mod error;
pub mod model;
pub mod pivot_config;
pub mod pivots;
pub mod simulator;

pub use error::{ConfigError, Error, Result};
pub use model::{grounded, load_mesh, load_pivots, mesh_from_bytes};
pub use pivot_config::parse_pivots;
pub use pivots::{Arm, Column, Pivots};
pub use simulator::{cone_faces, simulate, will_collide, AnchorMode, CollisionReport};

// Re-export the geometry types callers need to build inputs by hand
pub use rodclash_geometry::{Mesh, Point3, Vector3};
