#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

/// A location in a planar projected coordinate system.
///
/// `x` grows towards east and `y` grows towards north. Both axes share one
/// unit, so distances computed between points are meaningful.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    x: Length,
    y: Length,
}

impl Point {
    pub fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    /// Creates a new `Point` from coordinates given in meters.
    pub fn from_meters(x: f64, y: f64) -> Self {
        Self::new(Length::new::<meter>(x), Length::new::<meter>(y))
    }

    pub fn x(&self) -> Length {
        self.x
    }

    pub fn y(&self) -> Length {
        self.y
    }

    /// Returns `true` if neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the straight line distance between `self` and `other`.
    pub fn distance_to(&self, other: &Point) -> Length {
        let [dx, dy] = sub(other.to_meters(), self.to_meters());
        Length::new::<meter>(dx.hypot(dy))
    }

    /// Returns the coordinates in meters as `[x, y]`.
    ///
    /// This is the representation the optimizer searches over.
    pub fn to_meters(&self) -> [f64; 2] {
        [self.x.get::<meter>(), self.y.get::<meter>()]
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::from_meters(x, y)
    }
}

impl AsRef<Point> for Point {
    fn as_ref(&self) -> &Point {
        self
    }
}

pub(crate) fn sub(lhs: [f64; 2], rhs: [f64; 2]) -> [f64; 2] {
    [lhs[0] - rhs[0], lhs[1] - rhs[1]]
}
