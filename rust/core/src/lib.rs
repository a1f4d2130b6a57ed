// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # RodClash Core
//!
//! STL decoder built with [nom](https://docs.rs/nom). Reads binary and text
//! STL files into a flat list of independent [`Facet`]s, the raw input of
//! mesh building.
//!
//! ## Overview
//!
//! - **Format detection**: samples the bytes after the 80-byte header
//! - **Text grammar**: line-level nom combinators, [fast-float](https://docs.rs/fast-float) numbers
//! - **Binary records**: fixed 50-byte records, attribute bytes skipped
//! - **Statistics**: bounding box, diameter and a first-facet scale hint
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rodclash_core::decode;
//!
//! let bytes = std::fs::read("part.stl")?;
//! let model = decode(&bytes)?;
//! println!("{} facets, {} encoding", model.facet_count(), model.format);
//! ```
//!
//! ## Failure policy
//!
//! Malformed structure (wrong binary size, missing keywords, unreadable
//! vertices) is an [`Error`]. A non-numeric facet normal or a fourth vertex in
//! a facet is recovered, logged through `tracing` and counted in
//! [`StlStats`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for facets and statistics

pub mod binary;
pub mod decoder;
pub mod error;
pub mod facet;
pub mod model_bounds;
pub mod parser;

pub use binary::encode_binary;
pub use decoder::{decode, decode_binary, decode_reader, decode_text, detect_format};
pub use error::{Error, Result};
pub use facet::{Facet, StlFormat, StlModel};
pub use model_bounds::{ModelBounds, StlStats};
