// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text STL parser using nom
//!
//! Each line of a facet record is matched by a small combinator; the record
//! structure (normal, loop, three vertices, endloop, endfacet) is driven by
//! [`parse_text`]. Lines are trimmed before matching, so indentation and
//! `\r\n` endings do not matter.

use nom::{
    bytes::complete::{tag_no_case, take_till1},
    character::complete::{space0, space1},
    combinator::{all_consuming, map_res},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::facet::Facet;

/// Number of lines in one well-formed facet record
pub const LINES_PER_FACET: usize = 7;

/// Outcome of parsing a text STL body
#[derive(Debug, Default)]
pub struct TextParse {
    pub facets: Vec<Facet>,
    pub zeroed_normals: usize,
    pub dropped_vertices: usize,
}

/// Parse a whitespace-delimited token
fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Parse a float token: 1, -1.5, 1.5e-10, 2E+3
fn number(input: &str) -> IResult<&str, f64> {
    map_res(token, |s: &str| fast_float::parse::<f64, _>(s))(input)
}

/// Parse `facet normal a b c`, keeping the three components as raw tokens
fn facet_normal(input: &str) -> IResult<&str, [&str; 3]> {
    let (rest, (_, _, _, a, b, c)) = all_consuming(terminated(
        tuple((
            tag_no_case("facet"),
            space1,
            tag_no_case("normal"),
            preceded(space1, token),
            preceded(space1, token),
            preceded(space1, token),
        )),
        space0,
    ))(input)?;
    Ok((rest, [a, b, c]))
}

/// Parse `outer loop`
fn outer_loop(input: &str) -> IResult<&str, ()> {
    let (rest, _) = all_consuming(tuple((
        tag_no_case("outer"),
        space1,
        tag_no_case("loop"),
        space0,
    )))(input)?;
    Ok((rest, ()))
}

/// Parse `vertex x y z`
fn vertex(input: &str) -> IResult<&str, [f64; 3]> {
    let (rest, (_, x, y, z)) = all_consuming(terminated(
        tuple((
            tag_no_case("vertex"),
            preceded(space1, number),
            preceded(space1, number),
            preceded(space1, number),
        )),
        space0,
    ))(input)?;
    Ok((rest, [x, y, z]))
}

/// Parse a bare keyword line such as `endloop`
fn keyword_line<'a>(input: &'a str, keyword: &'static str) -> IResult<&'a str, ()> {
    let (rest, _) = all_consuming(terminated(tag_no_case(keyword), space0))(input)?;
    Ok((rest, ()))
}

/// Check if a line opens or closes a solid block
#[inline]
pub fn is_solid_marker(line: &str) -> bool {
    starts_with_ignore_case(line, "solid") || starts_with_ignore_case(line, "endsolid")
}

#[inline]
fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len() && line.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Check if a line looks like a vertex line, whether or not its numbers parse
#[inline]
fn is_vertex_line(line: &str) -> bool {
    starts_with_ignore_case(line, "vertex")
}

/// Estimate the facet count of a text STL from its line structure
///
/// Lines are measured after trimming surrounding whitespace (so `\r\n`
/// endings and indentation do not count). Lines of four characters or fewer
/// and `solid`/`endsolid` lines are skipped; the rest is divided by
/// [`LINES_PER_FACET`]. Only used to size the facet vector.
pub fn estimate_text_facets(bytes: &[u8]) -> usize {
    let mut counted = 0usize;
    let mut start = 0usize;
    let mut count_line = |line: &[u8]| {
        let trimmed = line.trim_ascii();
        if trimmed.len() > 4
            && !(trimmed.len() >= 5 && trimmed[..5].eq_ignore_ascii_case(b"solid"))
            && !(trimmed.len() >= 8 && trimmed[..8].eq_ignore_ascii_case(b"endsolid"))
        {
            counted += 1;
        }
    };

    for newline in memchr::memchr_iter(b'\n', bytes) {
        count_line(&bytes[start..newline]);
        start = newline + 1;
    }
    if start < bytes.len() {
        count_line(&bytes[start..]);
    }

    if counted % LINES_PER_FACET != 0 {
        tracing::debug!(
            lines = counted,
            "text STL line count is not a multiple of {}",
            LINES_PER_FACET
        );
    }
    counted / LINES_PER_FACET
}

/// Cursor over the non-blank, trimmed lines of a text body
struct Lines<'a> {
    inner: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate().peekable(),
        }
    }

    /// Next non-blank line with its 1-based line number
    fn next(&mut self) -> Option<(usize, &'a str)> {
        for (index, line) in self.inner.by_ref() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Some((index + 1, trimmed));
            }
        }
        None
    }

    /// Next line, failing with `expected` at end of input
    fn expect(&mut self, expected: &'static str) -> Result<(usize, &'a str)> {
        self.next().ok_or(Error::UnexpectedEof { expected })
    }
}

/// Parse the facet records of a text STL
///
/// Structural problems abort with an error. A non-numeric normal component
/// degrades to a zero normal and an extra vertex before `endloop` is dropped;
/// both are logged and counted.
pub fn parse_text(text: &str, capacity: usize) -> Result<TextParse> {
    let mut out = TextParse {
        facets: Vec::with_capacity(capacity),
        ..TextParse::default()
    };
    let mut lines = Lines::new(text);

    while let Some((line_no, line)) = lines.next() {
        // Files may hold several solid blocks back to back
        if is_solid_marker(line) {
            continue;
        }

        let (_, tokens) = facet_normal(line).map_err(|_| Error::syntax(line_no, "facet normal"))?;
        let normal = match parse_normal(&tokens) {
            Some(n) => n,
            None => {
                tracing::warn!(line = line_no, "non-numeric facet normal, using zero normal");
                out.zeroed_normals += 1;
                [0.0; 3]
            }
        };

        let (line_no, line) = lines.expect("outer loop")?;
        outer_loop(line).map_err(|_| Error::syntax(line_no, "outer loop"))?;

        let mut corners: SmallVec<[[f64; 3]; 4]> = SmallVec::new();
        let (close_no, close_line) = loop {
            let (line_no, line) = lines.expect("vertex or endloop")?;
            if !is_vertex_line(line) {
                break (line_no, line);
            }
            let (_, v) = vertex(line).map_err(|_| Error::MalformedVertex { line: line_no })?;
            if corners.len() == 3 {
                // Degenerate quad from some exporters: keep the triangle
                tracing::warn!(line = line_no, "dropping extra vertex in facet");
                out.dropped_vertices += 1;
            } else {
                corners.push(v);
            }
        };

        if corners.len() != 3 {
            return Err(Error::MalformedVertex { line: close_no });
        }
        keyword_line(close_line, "endloop").map_err(|_| Error::syntax(close_no, "endloop"))?;

        let (line_no, line) = lines.expect("endfacet")?;
        keyword_line(line, "endfacet").map_err(|_| Error::syntax(line_no, "endfacet"))?;

        out.facets
            .push(Facet::new(normal, [corners[0], corners[1], corners[2]]));
    }

    Ok(out)
}

fn parse_normal(tokens: &[&str; 3]) -> Option<[f64; 3]> {
    let mut normal = [0.0; 3];
    for (slot, token) in normal.iter_mut().zip(tokens) {
        *slot = fast_float::parse::<f64, _>(token).ok()?;
    }
    Some(normal)
}
