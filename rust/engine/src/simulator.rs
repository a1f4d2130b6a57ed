// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer-by-layer collision simulation
//!
//! The print is replayed from the top of the model downwards. At each cut
//! the outline of the topmost slab is reduced to its convex hull, which is
//! where the effector can be while printing that layer. Each rod then sweeps
//! a cone from its anchor to that outline (moved by the rod's effector
//! offset), and the cone is tested against everything printed below the cut.
//! The last two layers above the bed are never examined.

use rodclash_geometry::{
    convex_hull_2d, faces_intersect, Face, Mesh, MeshClipper, Point3, Vector3, Vertex, EPSILON,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pivots::{Arm, Column, Pivots};

/// Frame the anchors are expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Anchors are fixed points of the printer frame
    #[default]
    Fixed,
    /// Anchors ride with the layer: each anchor's configured position is
    /// taken relative to the current cut, so the cone apex is
    /// `anchor + (0, 0, height)`. This is a vertical shift of the whole
    /// anchor frame, not a reversal of the anchor direction.
    FollowLayer,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionReport {
    pub collided: bool,
    /// Cutting height of the first colliding layer
    pub height: Option<f64>,
    pub arm: Option<Arm>,
    pub column: Option<Column>,
    /// Number of cuts examined, including the colliding one
    pub layers_checked: usize,
    pub layer_height: f64,
    pub anchor_mode: AnchorMode,
}

/// Triangle fan from `apex` to the closed `outline` moved by `offset`
pub fn cone_faces(apex: &Point3<f64>, outline: &[Vertex], offset: &Vector3<f64>) -> Vec<Face> {
    let n = outline.len();
    (0..n)
        .map(|i| {
            let a = outline[i].point() + offset;
            let b = outline[(i + 1) % n].point() + offset;
            Face::new(*apex, a, b)
        })
        .collect()
}

/// Check whether any rod would hit the part while printing it
pub fn will_collide(
    mesh: &Mesh,
    pivots: &Pivots,
    layer_height: f64,
    mode: AnchorMode,
) -> Result<bool> {
    Ok(simulate(mesh, pivots, layer_height, mode)?.collided)
}

/// Run the simulation and report where the first collision happens
pub fn simulate(
    mesh: &Mesh,
    pivots: &Pivots,
    layer_height: f64,
    mode: AnchorMode,
) -> Result<CollisionReport> {
    // Also rejects NaN
    if !(layer_height > EPSILON) {
        return Err(Error::InvalidLayerHeight {
            layer_height,
            min: EPSILON,
        });
    }

    let mut clipper = MeshClipper::new(mesh);
    let bottom = clipper.min_height();
    if bottom.abs() >= EPSILON {
        return Err(Error::NotOnBed { min_z: bottom });
    }

    let mut report = CollisionReport {
        collided: false,
        height: None,
        arm: None,
        column: None,
        layers_checked: 0,
        layer_height,
        anchor_mode: mode,
    };

    let mut height = clipper.max_height();
    tracing::info!(
        top = height,
        layer_height,
        mode = ?mode,
        triangles = mesh.triangle_count(),
        "simulating print"
    );

    while height > bottom + 2.0 * layer_height {
        height -= layer_height;
        report.layers_checked += 1;
        clipper.soft_clip(height);

        let outline = convex_hull_2d(&clipper.top_boundary_points(layer_height));
        if outline.len() < 3 {
            tracing::debug!(height, points = outline.len(), "layer outline degenerate, skipped");
            continue;
        }

        let printed = clipper.printed_faces();
        tracing::debug!(
            height,
            outline = outline.len(),
            printed = printed.len(),
            "checking layer"
        );

        for arm in Arm::ALL {
            for column in arm.columns() {
                let apex = match mode {
                    AnchorMode::Fixed => pivots.anchor(column),
                    AnchorMode::FollowLayer => pivots.anchor(column) + Vector3::new(0.0, 0.0, height),
                };
                let cone = cone_faces(&apex, &outline, &pivots.effector(column));
                let hit = cone
                    .iter()
                    .any(|c| printed.iter().any(|f| faces_intersect(c, f)));
                if hit {
                    tracing::info!(height, arm = %arm, column = %column, "rod collides with printed part");
                    report.collided = true;
                    report.height = Some(height);
                    report.arm = Some(arm);
                    report.column = Some(column);
                    return Ok(report);
                }
            }
        }
    }

    tracing::info!(layers = report.layers_checked, "no collision");
    Ok(report)
}
