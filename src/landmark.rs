use crate::{bearing::Bearing, error::Error, point::Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uom::si::{angle::degree, f64::Angle};

/// A landmark of known position together with the bearing measured towards
/// it from the unknown observer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmark {
    id: String,
    position: Point,
    bearing: Bearing,
}

impl Landmark {
    /// Creates a new `Landmark`.
    ///
    /// Returns an error if `position` has a NaN or infinite coordinate.
    pub fn new(id: impl Into<String>, position: Point, bearing: Bearing) -> Result<Self, Error> {
        let id = id.into();
        if !position.is_finite() {
            return Err(Error::NonFiniteCoordinate { id });
        }

        Ok(Self {
            id,
            position,
            bearing,
        })
    }

    /// Creates a new `Landmark` from coordinates in meters and a bearing in
    /// degrees.
    pub fn from_degrees(
        id: impl Into<String>,
        x: f64,
        y: f64,
        bearing: f64,
    ) -> Result<Self, Error> {
        let bearing = Bearing::from_degrees(bearing).ok_or(Error::BearingOutOfBounds {
            angle: Angle::new::<degree>(bearing),
        })?;

        Self::new(id, Point::from_meters(x, y), bearing)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> &Point {
        &self.position
    }

    pub fn bearing(&self) -> &Bearing {
        &self.bearing
    }

    /// Returns a copy of `self` observed under a different `bearing`.
    pub fn with_bearing(&self, bearing: Bearing) -> Self {
        Self {
            bearing,
            ..self.clone()
        }
    }
}

/// The validated set of landmarks used for one resection.
#[derive(Clone, Debug, PartialEq)]
pub struct Landmarks {
    inner: Vec<Landmark>,
}

impl Landmarks {
    /// The fewest landmarks that still define a locus circle.
    pub const MIN_LEN: usize = 2;

    /// Creates a new `Landmarks` from `landmarks`.
    ///
    /// Returns an error if there are fewer than two landmarks or if two of
    /// them share an id.
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, Error> {
        if landmarks.len() < Self::MIN_LEN {
            return Err(Error::TooFewLandmarks {
                count: landmarks.len(),
                required: Self::MIN_LEN,
            });
        }

        let mut seen = HashSet::new();
        for landmark in &landmarks {
            if !seen.insert(landmark.id()) {
                return Err(Error::DuplicateLandmark {
                    id: landmark.id().to_string(),
                });
            }
        }

        Ok(Self { inner: landmarks })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Always `false`, a validated set holds at least [`Landmarks::MIN_LEN`]
    /// landmarks. Provided alongside [`Landmarks::len`] by convention.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.inner.iter()
    }

    /// Returns every unordered pair of landmarks in input order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Landmark, &Landmark)> {
        self.inner.iter().enumerate().flat_map(move |(i, first)| {
            self.inner[i + 1..]
                .iter()
                .map(move |second| (first, second))
        })
    }

    /// Returns the mean position of the landmarks.
    pub fn centroid(&self) -> Point {
        let n = self.inner.len() as f64;
        let [x, y] = self.inner.iter().fold([0., 0.], |[x, y], landmark| {
            let [lx, ly] = landmark.position().to_meters();
            [x + lx, y + ly]
        });

        Point::from_meters(x / n, y / n)
    }

    /// Returns the same landmarks observed under the bearings `bearing`
    /// produces for each of them.
    pub fn with_bearings(&self, mut bearing: impl FnMut(&Landmark) -> Bearing) -> Self {
        Self {
            inner: self
                .inner
                .iter()
                .map(|landmark| landmark.with_bearing(bearing(landmark)))
                .collect(),
        }
    }

    pub fn into_inner(self) -> Vec<Landmark> {
        self.inner
    }
}

impl<'a> IntoIterator for &'a Landmarks {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
