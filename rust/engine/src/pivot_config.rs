// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pivot configuration files
//!
//! ```text
//! # comment
//! anchor_a1   = 40.0  5.0  0.0
//! effector_a1 = 10.0, 5.0, 5.0
//! ```
//!
//! Twelve fields (`anchor_` or `effector_` plus a column name `a1`..`c2`),
//! each set exactly once to three numbers separated by whitespace and/or
//! commas. Names are case-insensitive.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, recognize, rest},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use rodclash_geometry::{Point3, Vector3};

use crate::error::ConfigError;
use crate::pivots::{Column, Pivots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Anchor(Column),
    Effector(Column),
}

impl Field {
    fn from_name(name: &str) -> Option<Field> {
        let (kind, column) = name.split_once('_')?;
        let column = Column::from_name(column)?;
        if kind.eq_ignore_ascii_case("anchor") {
            Some(Field::Anchor(column))
        } else if kind.eq_ignore_ascii_case("effector") {
            Some(Field::Effector(column))
        } else {
            None
        }
    }

    fn name(self) -> String {
        match self {
            Field::Anchor(c) => format!("anchor_{c}"),
            Field::Effector(c) => format!("effector_{c}"),
        }
    }
}

/// Parse a field name: letters, digits and underscores
fn field_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Parse `name = rest`, returning the name and the raw value
fn assignment(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(
        field_name,
        delimited(space0, char('='), space0),
        rest,
    ))(input)
}

/// Whitespace and/or a single comma between numbers
fn separator(input: &str) -> IResult<&str, &str> {
    alt((recognize(tuple((space0, char(','), space0))), space1))(input)
}

/// Parse exactly three numbers
fn triple(input: &str) -> IResult<&str, [f64; 3]> {
    let (rest, (x, y, z)) = all_consuming(delimited(
        space0,
        tuple((
            double,
            preceded(separator, double),
            preceded(separator, double),
        )),
        space0,
    ))(input)?;
    Ok((rest, [x, y, z]))
}

/// Parse a pivot configuration
pub fn parse_pivots(text: &str) -> Result<Pivots, ConfigError> {
    let mut anchors: [Option<Point3<f64>>; 6] = [None; 6];
    let mut effectors: [Option<Vector3<f64>>; 6] = [None; 6];

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let (_, (name, value)) = assignment(content).map_err(|_| ConfigError::Syntax { line })?;
        let field = Field::from_name(name).ok_or_else(|| ConfigError::UnknownField {
            line,
            name: name.to_string(),
        })?;
        let (_, [x, y, z]) = triple(value).map_err(|_| ConfigError::MalformedValue {
            line,
            field: field.name(),
        })?;

        let previous = match field {
            Field::Anchor(c) => anchors[c.index()].replace(Point3::new(x, y, z)).is_some(),
            Field::Effector(c) => effectors[c.index()].replace(Vector3::new(x, y, z)).is_some(),
        };
        if previous {
            return Err(ConfigError::DuplicateField {
                line,
                field: field.name(),
            });
        }
    }

    let mut missing = Vec::new();
    for column in Column::ALL {
        if anchors[column.index()].is_none() {
            missing.push(Field::Anchor(column).name());
        }
    }
    for column in Column::ALL {
        if effectors[column.index()].is_none() {
            missing.push(Field::Effector(column).name());
        }
    }
    if !missing.is_empty() {
        return Err(ConfigError::MissingFields { fields: missing });
    }

    tracing::debug!("parsed pivot configuration");
    Ok(Pivots::new(
        anchors.map(|a| a.unwrap_or_else(Point3::origin)),
        effectors.map(|e| e.unwrap_or_else(Vector3::zeros)),
    ))
}
