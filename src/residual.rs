use crate::{circle::LocusCircle, point::Point, simplex::Objective};
use uom::si::{
    area::square_meter,
    f64::{Area, Length},
    length::meter,
};

/// Measures how badly a candidate point fits a set of locus circles.
///
/// The fit is the sum of squared radial deviations, which is zero exactly
/// when the point lies on every circle.
#[derive(Clone, Copy, Debug)]
pub struct Residual<'a> {
    circles: &'a [LocusCircle],
}

impl<'a> Residual<'a> {
    pub fn new(circles: &'a [LocusCircle]) -> Self {
        Self { circles }
    }

    pub fn circles(&self) -> &'a [LocusCircle] {
        self.circles
    }

    pub fn sum_of_squares(&self, point: &Point) -> Area {
        Area::new::<square_meter>(self.value(&point.to_meters()))
    }

    /// Returns the square root of [`Residual::sum_of_squares`].
    pub fn root_sum_of_squares(&self, point: &Point) -> Length {
        Length::new::<meter>(self.value(&point.to_meters()).sqrt())
    }
}

impl Objective<2> for Residual<'_> {
    fn value(&self, point: &[f64; 2]) -> f64 {
        let point = Point::from(*point);
        self.circles
            .iter()
            .map(|circle| circle.deviation(&point).get::<meter>().powi(2))
            .sum()
    }
}
