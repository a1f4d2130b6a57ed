// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary STL records
//!
//! ```text
//! UINT8[80]    header (ignored)
//! UINT32       facet count, little-endian
//! foreach facet
//!     REAL32[3] normal
//!     REAL32[3] vertex 0
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     UINT16    attribute byte count (skipped)
//! ```

use crate::error::{Error, Result};
use crate::facet::Facet;

/// Binary STL header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Size of the facet count that follows the header
pub const COUNT_SIZE: usize = 4;

/// Size of one facet record (normal + 3 vertices + attribute)
pub const FACET_SIZE: usize = 50;

/// Smallest facet count a binary file may hold
pub const MIN_FACETS: usize = 1;

/// Compute the facet count implied by the file size
///
/// The record region must be an exact multiple of [`FACET_SIZE`] and hold at
/// least [`MIN_FACETS`] records.
pub fn facet_count_from_size(size: usize) -> Result<usize> {
    if size < HEADER_SIZE + COUNT_SIZE {
        return Err(Error::FileTooSmall { size });
    }
    let body = size - HEADER_SIZE - COUNT_SIZE;
    if body % FACET_SIZE != 0 || body / FACET_SIZE < MIN_FACETS {
        return Err(Error::BinarySizeMismatch { size });
    }
    Ok(body / FACET_SIZE)
}

/// Read the facet count stored after the header
#[inline]
pub fn declared_facet_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + COUNT_SIZE)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Parse every facet record of a binary STL
///
/// Returns the facets and the count declared in the file. A declared count
/// that disagrees with the file size is logged; the size wins.
pub fn parse_binary(bytes: &[u8]) -> Result<(Vec<Facet>, u32)> {
    let count = facet_count_from_size(bytes.len())?;
    let declared = declared_facet_count(bytes).unwrap_or(0);
    if declared as usize != count {
        tracing::warn!(
            declared,
            computed = count,
            "binary STL facet count does not match file size"
        );
    }

    let records = &bytes[HEADER_SIZE + COUNT_SIZE..];
    let facets = records
        .chunks_exact(FACET_SIZE)
        .map(|record| {
            Facet::new(
                read_triple(record, 0),
                [
                    read_triple(record, 12),
                    read_triple(record, 24),
                    read_triple(record, 36),
                ],
            )
        })
        .collect();

    Ok((facets, declared))
}

/// Read 3 little-endian f32 values starting at `offset`
#[inline]
fn read_triple(record: &[u8], offset: usize) -> [f64; 3] {
    let f = |at: usize| {
        f64::from(f32::from_le_bytes([
            record[at],
            record[at + 1],
            record[at + 2],
            record[at + 3],
        ]))
    };
    [f(offset), f(offset + 4), f(offset + 8)]
}

/// Encode facets as a binary STL
///
/// Mostly useful for fixtures: the decoder's inverse for well-formed input.
pub fn encode_binary(facets: &[Facet], header_text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + COUNT_SIZE + facets.len() * FACET_SIZE);

    let mut header = [0u8; HEADER_SIZE];
    let name = header_text.as_bytes();
    let n = name.len().min(HEADER_SIZE);
    header[..n].copy_from_slice(&name[..n]);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(facets.len() as u32).to_le_bytes());

    for facet in facets {
        for triple in std::iter::once(&facet.normal).chain(facet.vertices.iter()) {
            for &c in triple {
                out.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}
