// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode failures.
//!
//! Every variant except [`Error::Io`] means the input was structurally
//! malformed and no facets were returned. Row-level anomalies that can be
//! recovered (a non-numeric normal, a fourth vertex in a facet) are not
//! errors; they are logged and counted in [`crate::StlStats`].

use thiserror::Error;

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding an STL file
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too small to be an STL: {size} bytes")]
    FileTooSmall { size: usize },

    #[error("binary STL size mismatch: {size} bytes is not 84 + 50 * n with n >= 1")]
    BinarySizeMismatch { size: usize },

    #[error("syntax error on line {line}: expected {expected}")]
    Syntax { line: usize, expected: &'static str },

    #[error("malformed vertex on line {line}")]
    MalformedVertex { line: usize },

    #[error("unexpected end of input inside a facet (expected {expected})")]
    UnexpectedEof { expected: &'static str },

    #[error("no facets found")]
    Empty,
}

impl Error {
    /// Convenience constructor for grammar errors
    pub(crate) fn syntax(line: usize, expected: &'static str) -> Self {
        Error::Syntax { line, expected }
    }
}
