// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregate statistics over decoded facets
//!
//! Bounding box, bounding diameter and a rough scale hint, plus counters for
//! the anomalies the decoder recovered from.

use crate::facet::Facet;

/// Axis-aligned bounds in f64 precision
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
    /// Number of points folded into the bounds
    pub sample_count: usize,
}

impl ModelBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min: [f64::MAX; 3],
            max: [f64::MIN; 3],
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
        self.sample_count += 1;
    }

    /// Norm of `max - min`
    #[inline]
    pub fn diameter(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let dx = self.max[0] - self.min[0];
        let dy = self.max[1] - self.min[1];
        let dz = self.max[2] - self.min[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for ModelBounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics gathered once all facets are read
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StlStats {
    pub bounds: ModelBounds,
    /// Norm of the bounding box diagonal
    pub diameter: f64,
    /// Shortest non-zero axis-aligned edge projection of the first facet.
    /// Only a scale hint, not the shortest edge of the model.
    pub scale_hint: f64,
    /// Facet count written in a binary header, if any
    pub declared_facets: Option<u32>,
    /// Facets whose normal could not be parsed and was replaced with zero
    pub zeroed_normals: usize,
    /// Extra vertex lines dropped from degenerate quad facets
    pub dropped_vertices: usize,
}

impl StlStats {
    /// Compute bounds, diameter and scale hint over the facets
    pub fn compute(facets: &[Facet]) -> Self {
        let mut bounds = ModelBounds::new();
        for facet in facets {
            for v in &facet.vertices {
                bounds.expand(*v);
            }
        }

        Self {
            bounds,
            diameter: bounds.diameter(),
            scale_hint: facets.first().map(first_facet_scale).unwrap_or(0.0),
            ..Self::default()
        }
    }
}

fn first_facet_scale(facet: &Facet) -> f64 {
    let v = &facet.vertices;
    let mut shortest = f64::MAX;
    for (a, b) in [(0, 1), (1, 2), (2, 0)] {
        for axis in 0..3 {
            let projection = (v[b][axis] - v[a][axis]).abs();
            if projection > 0.0 && projection < shortest {
                shortest = projection;
            }
        }
    }
    if shortest == f64::MAX {
        0.0
    } else {
        shortest
    }
}
