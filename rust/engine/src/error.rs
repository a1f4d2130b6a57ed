// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading inputs or running a simulation
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] rodclash_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] rodclash_geometry::Error),

    #[error("Pivot configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("layer height must be greater than {min}, got {layer_height}")]
    InvalidLayerHeight { layer_height: f64, min: f64 },

    #[error("model must stand on the bed (min z = 0), lowest point is at z = {min_z}")]
    NotOnBed { min_z: f64 },
}

/// Errors in a pivot configuration file
///
/// Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("line {line}: expected `name = x y z`")]
    Syntax { line: usize },

    #[error("line {line}: unknown field `{name}`")]
    UnknownField { line: usize, name: String },

    #[error("line {line}: `{field}` needs exactly 3 numbers")]
    MalformedValue { line: usize, field: String },

    #[error("line {line}: `{field}` is set twice")]
    DuplicateField { line: usize, field: String },

    #[error("missing fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
}
