// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL decoder - format detection and dispatch
//!
//! The format is decided by sampling the bytes after the 80-byte header: any
//! byte above 127 means binary. Because the sample can be fooled (a binary
//! file whose floats happen to be 7-bit clean, or a text file with a stray
//! high byte), each probe falls back to the other encoding when it fails
//! structurally.

use std::io::Read;

use crate::binary::{self, HEADER_SIZE};
use crate::error::{Error, Result};
use crate::facet::{StlFormat, StlModel};
use crate::model_bounds::StlStats;
use crate::parser::{self, is_solid_marker};

/// Number of bytes after the header inspected by [`detect_format`]
pub const SAMPLE_SIZE: usize = 128;

/// Classify bytes as text or binary STL
#[inline]
pub fn detect_format(bytes: &[u8]) -> StlFormat {
    let sample = match bytes.get(HEADER_SIZE..) {
        Some(rest) => &rest[..rest.len().min(SAMPLE_SIZE)],
        None => &[],
    };
    if sample.iter().any(|&b| b > 127) {
        StlFormat::Binary
    } else {
        StlFormat::Text
    }
}

/// Decode an STL held in memory
///
/// # Example
///
/// ```
/// use rodclash_core::{decode, StlFormat};
///
/// let text = "solid t
/// facet normal 0 0 1
/// outer loop
/// vertex 0 0 0
/// vertex 1 0 0
/// vertex 0 1 0
/// endloop
/// endfacet
/// endsolid t
/// ";
/// let model = decode(text.as_bytes()).unwrap();
/// assert_eq!(model.format, StlFormat::Text);
/// assert_eq!(model.facet_count(), 1);
/// ```
pub fn decode(bytes: &[u8]) -> Result<StlModel> {
    let model = match detect_format(bytes) {
        StlFormat::Binary => match decode_binary(bytes) {
            Ok(model) => model,
            Err(binary_err) => {
                tracing::debug!(error = %binary_err, "binary probe failed, retrying as text");
                decode_text(bytes).map_err(|_| binary_err)?
            }
        },
        StlFormat::Text => match decode_text(bytes) {
            Ok(model) if !model.facets.is_empty() => model,
            Ok(_) if may_be_binary(bytes) => {
                tracing::debug!("text parse found no facets, retrying as binary");
                decode_binary(bytes).map_err(|_| Error::Empty)?
            }
            Err(text_err) if may_be_binary(bytes) => {
                tracing::debug!(error = %text_err, "text parse failed, retrying as binary");
                decode_binary(bytes).map_err(|_| text_err)?
            }
            result => result?,
        },
    };

    if model.facets.is_empty() {
        return Err(Error::Empty);
    }

    tracing::debug!(
        format = %model.format,
        facets = model.facets.len(),
        diameter = model.stats.diameter,
        "decoded STL"
    );
    Ok(model)
}

/// Decode an STL from a reader, reading it to completion first
pub fn decode_reader<R: Read>(mut reader: R) -> Result<StlModel> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// Decode bytes known to be a binary STL
pub fn decode_binary(bytes: &[u8]) -> Result<StlModel> {
    let (facets, declared) = binary::parse_binary(bytes)?;
    let mut stats = StlStats::compute(&facets);
    stats.declared_facets = Some(declared);
    Ok(StlModel {
        format: StlFormat::Binary,
        facets,
        stats,
    })
}

/// Decode bytes known to be a text STL
pub fn decode_text(bytes: &[u8]) -> Result<StlModel> {
    // Solid names from some exporters are Latin-1; they are never read
    let text = String::from_utf8_lossy(bytes);
    let estimate = parser::estimate_text_facets(bytes);
    let parsed = parser::parse_text(&text, estimate)?;

    if parsed.facets.len() != estimate {
        tracing::debug!(
            estimated = estimate,
            parsed = parsed.facets.len(),
            "text facet estimate differs from parsed count"
        );
    }

    let mut stats = StlStats::compute(&parsed.facets);
    stats.zeroed_normals = parsed.zeroed_normals;
    stats.dropped_vertices = parsed.dropped_vertices;
    Ok(StlModel {
        format: StlFormat::Text,
        facets: parsed.facets,
        stats,
    })
}

/// A text probe may only be retried as binary when the size fits the binary
/// layout. A header starting with `solid` also needs the declared facet count
/// to agree with the size, since many exporters write `solid` into binary
/// headers.
fn may_be_binary(bytes: &[u8]) -> bool {
    let Ok(count) = binary::facet_count_from_size(bytes.len()) else {
        return false;
    };
    let head = String::from_utf8_lossy(&bytes[..HEADER_SIZE]);
    if !is_solid_marker(head.trim_start()) {
        return true;
    }
    binary::declared_facet_count(bytes).is_some_and(|declared| declared as usize == count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::encode_binary;
    use crate::facet::Facet;

    fn facet(z: f64) -> Facet {
        Facet::new(
            [0.0, 0.0, -1.0],
            [[0.0, 0.0, z], [0.0, 1.0, z], [1.0, 0.0, z]],
        )
    }

    #[test]
    fn test_short_input_is_text() {
        assert_eq!(detect_format(b"solid x"), StlFormat::Text);
    }

    #[test]
    fn test_high_byte_after_header_is_binary() {
        let mut bytes = vec![b' '; 100];
        bytes[90] = 0xBF;
        assert_eq!(detect_format(&bytes), StlFormat::Binary);

        // High bytes inside the header do not count
        let mut bytes = vec![b' '; 100];
        bytes[10] = 0xBF;
        assert_eq!(detect_format(&bytes), StlFormat::Text);
    }

    #[test]
    fn test_decodes_binary() {
        // -1.0 normals put 0x80/0xBF bytes into the sample
        let bytes = encode_binary(&[facet(0.0), facet(2.0)], "binary");
        let model = decode(&bytes).unwrap();
        assert_eq!(model.format, StlFormat::Binary);
        assert_eq!(model.facet_count(), 2);
        assert_eq!(model.stats.declared_facets, Some(2));
        assert_eq!(model.stats.bounds.max, [1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_seven_bit_clean_binary_falls_back() {
        // Zero normals and small integer coordinates encode without high bytes
        let flat = Facet::new([0.0; 3], [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [2.0, 0.0, 0.0]]);
        let bytes = encode_binary(&[flat], "clean");
        assert_eq!(detect_format(&bytes), StlFormat::Text);

        let model = decode(&bytes).unwrap();
        assert_eq!(model.format, StlFormat::Binary);
        assert_eq!(model.facets[0], flat);
    }

    #[test]
    fn test_binary_with_solid_header_decodes() {
        let flat = Facet::new([0.0; 3], [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [2.0, 0.0, 0.0]]);
        let bytes = encode_binary(&[flat], "solid exported by CAD");
        assert_eq!(detect_format(&bytes), StlFormat::Text);

        let model = decode(&bytes).unwrap();
        assert_eq!(model.format, StlFormat::Binary);
        assert_eq!(model.facets, vec![flat]);
    }

    #[test]
    fn test_solid_header_with_wrong_count_is_not_binary() {
        let flat = Facet::new([0.0; 3], [[0.0, 0.0, 0.0], [0.0, 2.0, 0.0], [2.0, 0.0, 0.0]]);
        let mut bytes = encode_binary(&[flat], "solid exported by CAD");
        bytes[HEADER_SIZE] = 7;
        assert!(!may_be_binary(&bytes));
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn test_latin1_solid_name_decodes() {
        let bytes = b"solid W\xFCrfel\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid W\xFCrfel\n";
        let model = decode(bytes).unwrap();
        assert_eq!(model.format, StlFormat::Text);
        assert_eq!(model.facet_count(), 1);
        assert_eq!(model.facets[0].vertices[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(matches!(decode(b"solid empty\nendsolid empty\n"), Err(Error::Empty)));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode(b"this is not an stl file at all").is_err());
    }

    #[test]
    fn test_reader_matches_slice() {
        let bytes = encode_binary(&[facet(1.0)], "reader");
        let model = decode_reader(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(model.facet_count(), 1);
    }
}
