// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defaults loaded from environment variables, overridden by flags.

/// Run defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Layer height in mm.
    pub layer_height: f64,
    /// Inward anchor shift in mm.
    pub calibration_offset: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            layer_height: std::env::var("RODCLASH_LAYER_HEIGHT")
                .unwrap_or_else(|_| "0.2".into())
                .parse()
                .unwrap_or(0.2),
            calibration_offset: std::env::var("RODCLASH_CALIBRATION_OFFSET")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .unwrap_or(0.0),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            calibration_offset: 0.0,
        }
    }
}
