// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw facet records as they come out of the decoder.

use crate::model_bounds::StlStats;

/// One triangle record as stored in the file, before any deduplication.
///
/// The normal is taken verbatim from the file and is zero when the file's
/// normal could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facet {
    pub normal: [f64; 3],
    pub vertices: [[f64; 3]; 3],
}

impl Facet {
    /// Create a new facet
    #[inline]
    pub fn new(normal: [f64; 3], vertices: [[f64; 3]; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Check if the stored normal is the zero vector
    #[inline]
    pub fn has_zero_normal(&self) -> bool {
        self.normal.iter().all(|&c| c == 0.0)
    }
}

/// STL encoding variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StlFormat {
    /// `solid ... endsolid` text encoding
    Text,
    /// 80-byte header, facet count, 50-byte records
    Binary,
}

impl StlFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StlFormat::Text => "text",
            StlFormat::Binary => "binary",
        }
    }
}

impl std::fmt::Display for StlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded STL file
#[derive(Debug, Clone)]
pub struct StlModel {
    /// Encoding the facets were actually read from
    pub format: StlFormat,
    pub facets: Vec<Facet>,
    pub stats: StlStats,
}

impl StlModel {
    /// Number of facets
    #[inline]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }
}
