// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Printer kinematics: where each arm's rods are anchored and where they
//! meet the effector.
//!
//! A delta printer has three arms, each driving a pair of parallel rods
//! ("columns"). A column has an anchor, a point fixed to the printer frame,
//! and an effector offset, the vector from the nozzle to the rod's joint on
//! the effector.

use std::fmt;

use rodclash_geometry::{Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};

/// One of the three kinematic chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arm {
    A,
    B,
    C,
}

impl Arm {
    pub const ALL: [Arm; 3] = [Arm::A, Arm::B, Arm::C];

    /// The two columns driven by this arm
    #[inline]
    pub fn columns(self) -> [Column; 2] {
        match self {
            Arm::A => [Column::A1, Column::A2],
            Arm::B => [Column::B1, Column::B2],
            Arm::C => [Column::C1, Column::C2],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Arm::A => "a",
            Arm::B => "b",
            Arm::C => "c",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One anchor/effector pivot pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::A1,
        Column::A2,
        Column::B1,
        Column::B2,
        Column::C1,
        Column::C2,
    ];

    /// Position in [`Column::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn arm(self) -> Arm {
        match self {
            Column::A1 | Column::A2 => Arm::A,
            Column::B1 | Column::B2 => Arm::B,
            Column::C1 | Column::C2 => Arm::C,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::A1 => "a1",
            Column::A2 => "a2",
            Column::B1 => "b1",
            Column::B2 => "b2",
            Column::C1 => "c1",
            Column::C2 => "c2",
        }
    }

    /// Case-insensitive lookup by name (`"a1"` .. `"c2"`)
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anchors and effector offsets of all six columns
#[derive(Debug, Clone, PartialEq)]
pub struct Pivots {
    anchors: [Point3<f64>; 6],
    effectors: [Vector3<f64>; 6],
}

impl Pivots {
    /// Arrays are indexed by [`Column::index`]
    pub fn new(anchors: [Point3<f64>; 6], effectors: [Vector3<f64>; 6]) -> Self {
        Self { anchors, effectors }
    }

    #[inline]
    pub fn anchor(&self, column: Column) -> Point3<f64> {
        self.anchors[column.index()]
    }

    #[inline]
    pub fn effector(&self, column: Column) -> Vector3<f64> {
        self.effectors[column.index()]
    }

    /// Pull every arm's anchors towards the Z axis by `offset`
    ///
    /// Both anchors of an arm move along the arm's radial bisector: the XY
    /// direction from the Z axis to the midpoint of the two anchors. A
    /// negative offset pushes them outwards.
    pub fn with_calibration_offset(&self, offset: f64) -> Pivots {
        let mut shifted = self.clone();
        if offset == 0.0 {
            return shifted;
        }

        for arm in Arm::ALL {
            let [c1, c2] = arm.columns();
            let mid = midpoint(&self.anchor(c1), &self.anchor(c2));
            let radial = Vector3::new(mid.x, mid.y, 0.0);
            let Some(bisector) = radial.try_normalize(EPSILON) else {
                tracing::warn!(arm = %arm, "arm anchors centred on the Z axis, calibration offset ignored");
                continue;
            };
            for column in [c1, c2] {
                shifted.anchors[column.index()] -= bisector * offset;
            }
        }
        shifted
    }
}

#[inline]
fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    a + (b - a) * 0.5
}

impl fmt::Display for Pivots {
    /// Writes the pivot configuration format read by
    /// [`crate::parse_pivots`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in Column::ALL {
            let a = self.anchor(column);
            writeln!(f, "anchor_{column} = {} {} {}", a.x, a.y, a.z)?;
        }
        for column in Column::ALL {
            let e = self.effector(column);
            writeln!(f, "effector_{column} = {}, {}, {}", e.x, e.y, e.z)?;
        }
        Ok(())
    }
}
