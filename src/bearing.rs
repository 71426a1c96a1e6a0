use crate::point::{Point, sub};
use std::f64::consts::{PI, TAU};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::{
    ConstZero,
    si::{
        angle::{degree, radian},
        f64::Angle,
    },
};

/// Describes the azimuth from an observer towards a target.
///
/// The angle is measured clockwise from the +y (north) axis and must be
/// between 0.0 and 360.0 degrees.
#[derive(Clone, Copy, Debug, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bearing {
    angle: Angle,
}

impl Bearing {
    /// Creates a new `Bearing` from `angle`.
    ///
    /// Returns `None` if `angle` is not between 0 and 360.
    pub fn from_angle(angle: Angle) -> Option<Self> {
        if !is_valid(angle) {
            return None;
        }

        Some(Self { angle })
    }

    /// Creates a new `Bearing` from `angle` wrapping into 0.0 and 360.0.
    ///
    /// Returns `None` if `angle` is not finite.
    pub fn from_angle_wrapped(angle: Angle) -> Option<Self> {
        if !angle.is_finite() {
            return None;
        }

        // Rounding can land exactly on a full turn, which is still in range.
        Self::from_angle(Angle::new::<radian>(angle.get::<radian>().rem_euclid(TAU)))
    }

    pub fn from_degrees(degrees: f64) -> Option<Self> {
        Self::from_angle(Angle::new::<degree>(degrees))
    }

    /// Returns the bearing of `to` as seen from `from`.
    ///
    /// Returns `None` if the two points coincide.
    pub fn towards(from: &Point, to: &Point) -> Option<Self> {
        let [dx, dy] = sub(to.to_meters(), from.to_meters());
        if dx == 0. && dy == 0. {
            return None;
        }

        Self::from_angle_wrapped(Angle::new::<radian>(dx.atan2(dy)))
    }

    /// Returns the signed clockwise turn from `self` to `other`.
    ///
    /// The result is wrapped into (-180, 180]. A positive turn means `other`
    /// lies to the right of `self` for an observer looking along `self`.
    pub fn turn_to(&self, other: &Bearing) -> Angle {
        wrap_half_turn(other.angle - self.angle)
    }

    pub fn into_inner(self) -> Angle {
        self.angle
    }
}

/// Returns `true` if `angle` is between 0 and 360, `false` otherwise.
fn is_valid(angle: Angle) -> bool {
    Angle::ZERO <= angle && angle <= full_turn()
}

fn full_turn() -> Angle {
    Angle::HALF_TURN * 2.
}

/// Wraps a finite `angle` into (-180, 180].
pub(crate) fn wrap_half_turn(angle: Angle) -> Angle {
    let mut angle = angle.get::<radian>() % TAU;
    if angle > PI {
        angle -= TAU;
    } else if angle <= -PI {
        angle += TAU;
    }

    Angle::new::<radian>(angle)
}

impl std::cmp::PartialEq for Bearing {
    fn eq(&self, other: &Bearing) -> bool {
        let is_north = |angle: Angle| angle == Angle::ZERO || angle == full_turn();
        match is_north(self.angle) && is_north(other.angle) {
            // Handle the case that 0 is the same as 360.
            true => true,
            false => self.angle == other.angle,
        }
    }
}
