use crate::{
    error::Error,
    landmark::Landmark,
    point::{Point, sub},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;
use uom::{
    ConstZero,
    si::{
        angle::{degree, radian},
        f64::{Angle, Length},
        length::meter,
    },
};

/// Bearing differences whose sine is smaller than this have no locus circle.
const DEGENERATE_SINE: f64 = 1e-9;

/// Relative slack allowed on `r^2 - a^2` before the geometry is rejected.
const OFFSET_TOLERANCE: f64 = 1e-9;

/// Selects which of the two arcs through a pair of landmarks is the locus.
///
/// The chord between two landmarks subtends the measured angle from two arcs
/// that mirror each other across the chord. Only one of them is consistent
/// with the direction of the turn between the two bearings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArcSelection {
    /// Uses the sign of the turn from the first bearing to the second to
    /// decide on which side of the chord the observer stands.
    #[default]
    Signed,
    /// Assumes the first landmark of every pair appears to the left of the
    /// second one as seen from the observer.
    Ordered,
    /// Builds both candidates and keeps the one passing nearer the initial
    /// guess.
    NearestGuess,
}

/// The circle on which every point sees two landmarks separated by a fixed
/// angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocusCircle {
    center: Point,
    radius: Length,
}

impl LocusCircle {
    /// Creates a new `LocusCircle`.
    ///
    /// Returns `None` if `radius` is not positive or anything is not finite.
    pub fn new(center: Point, radius: Length) -> Option<Self> {
        if !center.is_finite() || !radius.is_finite() || radius <= Length::ZERO {
            return None;
        }

        Some(Self { center, radius })
    }

    /// Constructs the locus circle of `first` and `second` using the signed
    /// turn between their bearings.
    pub fn between(first: &Landmark, second: &Landmark) -> Result<Self, Error> {
        let turn = first.bearing().turn_to(second.bearing());
        let chord = Chord::new(first, second, turn)?;
        let side = match turn < Angle::ZERO {
            true => -acute_side(turn.abs()),
            false => acute_side(turn),
        };

        Ok(chord.circle(side))
    }

    /// Constructs the locus circle of `first` and `second` assuming `first`
    /// appears to the left of `second` as seen from the observer.
    ///
    /// The bearing difference is used as is, without wrapping. If the
    /// assumption does not hold the mirrored circle is returned.
    pub fn ordered(first: &Landmark, second: &Landmark) -> Result<Self, Error> {
        let turn = second.bearing().into_inner() - first.bearing().into_inner();
        let chord = Chord::new(first, second, turn)?;

        Ok(chord.circle(acute_side(turn)))
    }

    /// Returns both circles through `first` and `second` consistent with the
    /// magnitude of their bearing difference.
    ///
    /// The circle [`LocusCircle::between`] would pick comes first.
    pub fn candidates(first: &Landmark, second: &Landmark) -> Result<[Self; 2], Error> {
        let preferred = Self::between(first, second)?;
        let turn = first.bearing().turn_to(second.bearing());
        let chord = Chord::new(first, second, turn)?;
        let mirrored = match chord.circle(1.) == preferred {
            true => chord.circle(-1.),
            false => chord.circle(1.),
        };

        Ok([preferred, mirrored])
    }

    /// Constructs whichever candidate circle passes nearer `guess`.
    pub fn nearest_to(first: &Landmark, second: &Landmark, guess: &Point) -> Result<Self, Error> {
        let [preferred, mirrored] = Self::candidates(first, second)?;
        match mirrored.deviation(guess).abs() < preferred.deviation(guess).abs() {
            true => Ok(mirrored),
            false => Ok(preferred),
        }
    }

    /// Constructs the locus circle of a pair according to `selection`.
    pub fn select(
        first: &Landmark,
        second: &Landmark,
        selection: ArcSelection,
        guess: &Point,
    ) -> Result<Self, Error> {
        match selection {
            ArcSelection::Signed => Self::between(first, second),
            ArcSelection::Ordered => Self::ordered(first, second),
            ArcSelection::NearestGuess => Self::nearest_to(first, second, guess),
        }
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn radius(&self) -> Length {
        self.radius
    }

    /// Returns how far `point` lies outside (positive) or inside (negative)
    /// the circle.
    pub fn deviation(&self, point: &Point) -> Length {
        self.center.distance_to(point) - self.radius
    }

    /// Returns `true` if `point` is within `tolerance` of the circumference.
    pub fn passes_through(&self, point: &Point, tolerance: Length) -> bool {
        self.deviation(point).abs() <= tolerance
    }
}

/// Returns the side of the chord the center sits on for a positive turn.
///
/// For an acute angle the center shares the observer's side, which is the
/// right hand side of the chord from the first landmark to the second.
fn acute_side(turn: Angle) -> f64 {
    match turn > Angle::new::<degree>(90.) {
        true => 1.,
        false => -1.,
    }
}

/// The chord between two landmarks and the circle geometry it implies.
struct Chord {
    midpoint: [f64; 2],
    /// Unit vector perpendicular to the chord, pointing to its left.
    normal: [f64; 2],
    /// Distance from the midpoint to the center.
    offset: f64,
    radius: f64,
}

impl Chord {
    fn new(first: &Landmark, second: &Landmark, turn: Angle) -> Result<Self, Error> {
        let origin = first.position().to_meters();
        let [hx, hy] = sub(second.position().to_meters(), origin).map(|v| v / 2.);
        let half_length = hx.hypot(hy);
        if half_length == 0. {
            return Err(Error::CoincidentLandmarks {
                first: first.id().to_string(),
                second: second.id().to_string(),
            });
        }

        let degenerate = || Error::DegenerateGeometry {
            first: first.id().to_string(),
            second: second.id().to_string(),
            difference: turn,
        };

        let theta = turn.get::<radian>();
        if theta.sin().abs() < DEGENERATE_SINE {
            return Err(degenerate());
        }

        // Chord length over 2 |sin(theta)|, written with the double angle.
        let radius = 2. * half_length / (2. - 2. * (2. * theta).cos()).sqrt();
        let offset_sq = radius.powi(2) - half_length.powi(2);
        if !radius.is_finite() || offset_sq < -OFFSET_TOLERANCE * half_length.powi(2) {
            return Err(degenerate());
        }

        trace!(
            first = first.id(),
            second = second.id(),
            turn = turn.get::<degree>(),
            radius,
            "constructed chord"
        );

        Ok(Self {
            midpoint: [origin[0] + hx, origin[1] + hy],
            normal: [-hy / half_length, hx / half_length],
            offset: offset_sq.max(0.).sqrt(),
            radius,
        })
    }

    fn circle(&self, side: f64) -> LocusCircle {
        let center = [
            self.midpoint[0] + side * self.offset * self.normal[0],
            self.midpoint[1] + side * self.offset * self.normal[1],
        ];

        LocusCircle {
            center: Point::from(center),
            radius: Length::new::<meter>(self.radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bearing::Bearing;
    use approx::assert_relative_eq;
    use quickcheck::{TestResult, quickcheck};
    use rstest::rstest;

    fn m(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    fn l(id: &str, x: f64, y: f64, bearing: f64) -> Landmark {
        Landmark::from_degrees(id, x, y, bearing).unwrap()
    }

    /// A landmark at `(x, y)` as seen from `observer`.
    fn seen_from(observer: &Point, id: &str, x: f64, y: f64) -> Landmark {
        let position = Point::from_meters(x, y);
        let bearing = Bearing::towards(observer, &position).unwrap();
        Landmark::new(id, position, bearing).unwrap()
    }

    #[test]
    fn right_angle_centers_on_chord() {
        let circle = LocusCircle::between(&l("a", 0., 0., 0.), &l("b", 1000., 0., 90.)).unwrap();

        assert_relative_eq!(circle.radius().get::<meter>(), 500., epsilon = 1e-9);
        assert_relative_eq!(circle.center().x().get::<meter>(), 500., epsilon = 1e-9);
        assert_relative_eq!(circle.center().y().get::<meter>(), 0., epsilon = 1e-9);
        assert!(circle.passes_through(&Point::from_meters(500., 500.), m(1e-9)));
    }

    #[rstest]
    #[case(10., 10.)]
    #[case(10., 190.)]
    #[case(0., 180.)]
    #[case(270., 90.)]
    #[case(0., 360.)]
    fn degenerate_bearings(#[case] first: f64, #[case] second: f64) {
        let result = LocusCircle::between(&l("a", 0., 0., first), &l("b", 1000., 0., second));
        assert!(matches!(result, Err(Error::DegenerateGeometry { .. })));

        let result = LocusCircle::ordered(&l("a", 0., 0., first), &l("b", 1000., 0., second));
        assert!(matches!(result, Err(Error::DegenerateGeometry { .. })));
    }

    #[rstest]
    #[case(ArcSelection::Signed)]
    #[case(ArcSelection::Ordered)]
    #[case(ArcSelection::NearestGuess)]
    fn coincident_landmarks(#[case] selection: ArcSelection) {
        let result = LocusCircle::select(
            &l("komin", 243457.31, 572056.42, 95.060),
            &l("kopiec", 243457.31, 572056.42, 247.630),
            selection,
            &Point::from_meters(0., 0.),
        );
        assert_eq!(
            result,
            Err(Error::CoincidentLandmarks {
                first: "komin".into(),
                second: "kopiec".into(),
            })
        );
    }

    quickcheck! {
        fn observer_lies_on_circle(observer: (i16, i16), first: (i16, i16), second: (i16, i16)) -> TestResult {
            let observer = Point::from_meters(observer.0 as f64, observer.1 as f64);
            let position = |(x, y): (i16, i16)| Point::from_meters(x as f64, y as f64);
            let (first, second) = (position(first), position(second));
            if first == observer || second == observer || first == second {
                return TestResult::discard();
            }

            let first = seen_from(&observer, "first", first.x().get::<meter>(), first.y().get::<meter>());
            let second = seen_from(&observer, "second", second.x().get::<meter>(), second.y().get::<meter>());
            let turn = first.bearing().turn_to(second.bearing());
            if turn.get::<radian>().sin().abs() < 1e-3 {
                return TestResult::discard();
            }

            let circle = LocusCircle::between(&first, &second).unwrap();
            let tolerance = m(1e-6 * circle.radius().get::<meter>().max(1.));
            TestResult::from_bool(circle.radius() > Length::ZERO && circle.passes_through(&observer, tolerance))
        }
    }

    #[test]
    fn ordered_matches_signed_when_first_is_left() {
        let observer = Point::from_meters(400., 300.);
        let first = seen_from(&observer, "a", 1000., 0.);
        let second = seen_from(&observer, "b", 0., 0.);
        assert!(first.bearing().turn_to(second.bearing()) > Angle::ZERO);

        assert_eq!(
            LocusCircle::ordered(&first, &second).unwrap(),
            LocusCircle::between(&first, &second).unwrap()
        );
    }

    #[test]
    fn ordered_mirrors_when_first_is_right() {
        let observer = Point::from_meters(500., 2000.);
        let first = seen_from(&observer, "a", 0., 0.);
        let second = seen_from(&observer, "b", 1000., 0.);
        assert!(first.bearing().turn_to(second.bearing()) < Angle::ZERO);

        let signed = LocusCircle::between(&first, &second).unwrap();
        let ordered = LocusCircle::ordered(&first, &second).unwrap();
        assert!(signed.passes_through(&observer, m(1e-6)));
        assert!(!ordered.passes_through(&observer, m(1.)));
        assert_relative_eq!(
            signed.center().y().get::<meter>(),
            -ordered.center().y().get::<meter>(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn candidates_mirror_across_chord() {
        let observer = Point::from_meters(500., 2000.);
        let first = seen_from(&observer, "a", 0., 0.);
        let second = seen_from(&observer, "b", 1000., 0.);

        let [preferred, mirrored] = LocusCircle::candidates(&first, &second).unwrap();
        assert_eq!(preferred, LocusCircle::between(&first, &second).unwrap());
        assert_relative_eq!(
            preferred.radius().get::<meter>(),
            mirrored.radius().get::<meter>()
        );
        assert_relative_eq!(
            preferred.center().x().get::<meter>(),
            mirrored.center().x().get::<meter>(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            preferred.center().y().get::<meter>(),
            -mirrored.center().y().get::<meter>(),
            epsilon = 1e-6
        );
    }

    #[rstest]
    #[case(Point::from_meters(500., 1900.), 1.)]
    #[case(Point::from_meters(500., -1900.), -1.)]
    fn nearest_to_guess(#[case] guess: Point, #[case] expected_side: f64) {
        let observer = Point::from_meters(500., 2000.);
        let first = seen_from(&observer, "a", 0., 0.);
        let second = seen_from(&observer, "b", 1000., 0.);

        let circle = LocusCircle::nearest_to(&first, &second, &guess).unwrap();
        assert_eq!(
            circle.center().y().get::<meter>().signum(),
            expected_side
        );
    }

    #[rstest]
    #[case(Point::from_meters(0., 0.), m(0.))]
    #[case(Point::from_meters(0., 0.), m(-1.))]
    #[case(Point::from_meters(f64::NAN, 0.), m(1.))]
    #[case(Point::from_meters(0., 0.), m(f64::INFINITY))]
    fn invalid_circle(#[case] center: Point, #[case] radius: Length) {
        assert_eq!(LocusCircle::new(center, radius), None);
    }

    #[test]
    fn deviation_is_signed() {
        let circle = LocusCircle::new(Point::from_meters(0., 0.), m(10.)).unwrap();
        assert_relative_eq!(circle.deviation(&Point::from_meters(0., 12.)).get::<meter>(), 2.);
        assert_relative_eq!(circle.deviation(&Point::from_meters(6., 0.)).get::<meter>(), -4.);
    }
}
