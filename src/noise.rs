//! Synthetic bearing errors for exercising the solver.
//!
//! Nothing in here is used by [`crate::resect`]. Callers that want noisy
//! observations pass their own, explicitly seeded, random number generator.

use crate::{
    bearing::Bearing,
    error::Error,
    landmark::{Landmark, Landmarks},
};
use rand::{
    Rng,
    distr::{Distribution, Uniform},
};
use uom::si::{angle::degree, f64::Angle};

#[derive(Clone, Debug)]
enum Model {
    /// Adds a uniform error, `None` for a zero width.
    Uniform(Option<Uniform<f64>>),
    /// Rounds to the nearest `step` and jitters by up to half a step.
    Quantized { step: f64, jitter: Uniform<f64> },
}

/// Perturbs bearings with random reading errors.
pub struct BearingNoise<R> {
    model: Model,
    rng: R,
}

impl<R> BearingNoise<R> {
    /// Creates a noise source adding zero-mean uniform errors in
    /// `[-half_width, half_width)`.
    pub fn uniform(half_width: Angle, rng: R) -> Result<Self, Error> {
        let width = checked_degrees(half_width, "half width")?;
        let sampler = match width == 0. {
            true => None,
            false => Some(Uniform::new(-width, width).map_err(from_uniform)?),
        };

        Ok(Self {
            model: Model::Uniform(sampler),
            rng,
        })
    }

    /// Creates a noise source mimicking a reading taken off a dial graduated
    /// every `step`: the true bearing is rounded to the nearest graduation
    /// and then misread by up to half a graduation either way.
    pub fn quantized(step: Angle, rng: R) -> Result<Self, Error> {
        let step = checked_degrees(step, "step")?;
        if step == 0. {
            return Err(Error::InvalidInput("noise step must be positive".into()));
        }

        Ok(Self {
            model: Model::Quantized {
                step,
                jitter: Uniform::new(-0.5, 0.5).map_err(from_uniform)?,
            },
            rng,
        })
    }
}

impl<R: Rng> BearingNoise<R> {
    pub fn perturb(&mut self, bearing: &Bearing) -> Bearing {
        let degrees = bearing.into_inner().get::<degree>();
        let perturbed = match &self.model {
            Model::Uniform(None) => return *bearing,
            Model::Uniform(Some(sampler)) => degrees + sampler.sample(&mut self.rng),
            Model::Quantized { step, jitter } => {
                ((degrees / step).round() + jitter.sample(&mut self.rng)) * step
            }
        };

        // Finite inputs produce a finite sum.
        Bearing::from_angle_wrapped(Angle::new::<degree>(perturbed))
            .expect("perturbed bearing is finite")
    }

    /// Returns `landmarks` with every bearing perturbed, in order.
    pub fn apply(&mut self, landmarks: &Landmarks) -> Landmarks {
        landmarks.with_bearings(|landmark: &Landmark| self.perturb(landmark.bearing()))
    }
}

fn checked_degrees(angle: Angle, name: &str) -> Result<f64, Error> {
    let degrees = angle.get::<degree>();
    if !degrees.is_finite() || degrees < 0. {
        return Err(Error::InvalidInput(format!(
            "noise {name} must be finite and not negative but got: {degrees}"
        )));
    }

    Ok(degrees)
}

fn from_uniform(err: rand::distr::uniform::Error) -> Error {
    match err {
        rand::distr::uniform::Error::EmptyRange => {
            Error::InvalidInput("noise range is empty".into())
        }
        rand::distr::uniform::Error::NonFinite => {
            Error::InvalidInput("noise range is not finite".into())
        }
    }
}
