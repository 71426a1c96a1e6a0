use thiserror::Error;
use uom::si::f64::Angle;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("landmarks {first:?} and {second:?} share the same coordinates")]
    CoincidentLandmarks { first: String, second: String },
    #[error(
        "bearings to {first:?} and {second:?} differ by a multiple of 180 degrees: {difference:?}"
    )]
    DegenerateGeometry {
        first: String,
        second: String,
        difference: Angle,
    },
    #[error("expected at least {required} landmarks but got: {count}")]
    TooFewLandmarks { count: usize, required: usize },
    #[error("expected at least {required} locus circles but got: {count}")]
    TooFewCircles { count: usize, required: usize },
    #[error("expected bearing in range [0, 360] degrees but got: {angle:?}")]
    BearingOutOfBounds { angle: Angle },
    #[error("landmark {id:?} has a non-finite coordinate")]
    NonFiniteCoordinate { id: String },
    #[error("landmark {id:?} appears more than once")]
    DuplicateLandmark { id: String },
    #[error("InvalidInput: {0}")]
    InvalidInput(String),
}
