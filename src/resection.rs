use crate::{
    circle::{ArcSelection, LocusCircle},
    error::Error,
    landmark::Landmarks,
    point::Point,
    residual::Residual,
    simplex::{NelderMead, SimplexOptions},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uom::si::{f64::Length, length::meter};

/// What to do with a landmark pair whose bearings differ by a multiple of
/// 180 degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DegeneratePolicy {
    /// Fail the whole resection.
    #[default]
    Abort,
    /// Drop the pair and continue if at least two circles remain.
    Skip,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResectionOptions {
    pub simplex: SimplexOptions,
    pub arc_selection: ArcSelection,
    pub degenerate_pairs: DegeneratePolicy,
}

impl ResectionOptions {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.simplex.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.simplex.tolerance = tolerance;
        self
    }

    pub fn with_arc_selection(mut self, arc_selection: ArcSelection) -> Self {
        self.arc_selection = arc_selection;
        self
    }

    pub fn with_degenerate_pairs(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_pairs = policy;
        self
    }
}

/// The estimated observer position.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResectionResult {
    pub point: Point,
    /// Root of the minimized sum of squared radial deviations.
    pub residual: Length,
    pub iterations: usize,
    /// `false` if the optimizer ran out of iterations.
    pub converged: bool,
    /// Number of locus circles the point was fitted to.
    pub circles: usize,
}

impl fmt::Display for ResectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) ± {:.2} m",
            self.point.x().get::<meter>(),
            self.point.y().get::<meter>(),
            self.residual.get::<meter>()
        )
    }
}

/// Fixes the position of an observer from bearings to known landmarks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Resection {
    options: ResectionOptions,
}

impl Resection {
    /// The fewest circles a fit is attempted on once degenerate pairs are
    /// skipped.
    pub const MIN_CIRCLES: usize = 2;

    pub fn new(options: ResectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResectionOptions {
        &self.options
    }

    /// Constructs one locus circle per unordered pair of `landmarks`.
    ///
    /// `guess` is only consulted by [`ArcSelection::NearestGuess`].
    pub fn locus_circles(
        &self,
        landmarks: &Landmarks,
        guess: &Point,
    ) -> Result<Vec<LocusCircle>, Error> {
        let mut circles = Vec::with_capacity(landmarks.len() * (landmarks.len() - 1) / 2);
        let mut skipped = 0;
        for (first, second) in landmarks.pairs() {
            match LocusCircle::select(first, second, self.options.arc_selection, guess) {
                Ok(circle) => circles.push(circle),
                Err(err @ Error::DegenerateGeometry { .. })
                    if self.options.degenerate_pairs == DegeneratePolicy::Skip =>
                {
                    warn!("skipping landmark pair: {err}");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if skipped > 0 && circles.len() < Self::MIN_CIRCLES {
            return Err(Error::TooFewCircles {
                count: circles.len(),
                required: Self::MIN_CIRCLES,
            });
        }

        debug!(circles = circles.len(), skipped, "constructed locus circles");
        Ok(circles)
    }

    /// Estimates the observer position, refining `guess` until it best fits
    /// every locus circle.
    pub fn fix(&self, landmarks: &Landmarks, guess: Point) -> Result<ResectionResult, Error> {
        if !guess.is_finite() {
            return Err(Error::InvalidInput(
                "initial guess has a non-finite coordinate".into(),
            ));
        }

        let circles = self.locus_circles(landmarks, &guess)?;
        let residual = Residual::new(&circles);
        let minimum = NelderMead::new(self.options.simplex).minimize(&residual, guess.to_meters());

        if !minimum.converged {
            warn!(
                iterations = minimum.iterations,
                "optimizer ran out of iterations, returning best estimate"
            );
        }

        let result = ResectionResult {
            point: Point::from(minimum.point),
            residual: Length::new::<meter>(minimum.value.sqrt()),
            iterations: minimum.iterations,
            converged: minimum.converged,
            circles: circles.len(),
        };
        debug!(%result, iterations = result.iterations, "fixed position");

        Ok(result)
    }
}

/// Estimates the observer position from `landmarks` starting at `guess`.
pub fn resect(
    landmarks: &Landmarks,
    guess: Point,
    options: &ResectionOptions,
) -> Result<ResectionResult, Error> {
    Resection::new(*options).fix(landmarks, guess)
}
