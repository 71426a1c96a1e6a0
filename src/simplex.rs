//! Derivative-free minimization with the Nelder-Mead simplex method.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

const REFLECTION: f64 = 1.;
const EXPANSION: f64 = 2.;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// A scalar function of an `N` dimensional point to be minimized.
pub trait Objective<const N: usize> {
    fn value(&self, point: &[f64; N]) -> f64;
}

/// Settings that bound the work done by [`NelderMead`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimplexOptions {
    /// Iteration budget after which the best vertex is returned as is.
    pub max_iterations: usize,
    /// Largest coordinate spread between the best vertex and the others
    /// allowed at convergence.
    pub tolerance: f64,
    /// Largest objective spread across the simplex allowed at convergence,
    /// relative to the best value once that exceeds one.
    pub value_tolerance: f64,
    /// Fraction of a nonzero start coordinate used to offset the initial
    /// vertices.
    pub relative_step: f64,
    /// Offset used for start coordinates that are exactly zero.
    pub absolute_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            value_tolerance: 1e-12,
            relative_step: 0.05,
            absolute_step: 1e-3,
        }
    }
}

/// The outcome of a minimization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimum<const N: usize> {
    pub point: [f64; N],
    pub value: f64,
    pub iterations: usize,
    /// `false` if the iteration budget ran out first.
    pub converged: bool,
}

#[derive(Clone, Copy, Debug)]
struct Vertex<const N: usize> {
    point: [f64; N],
    value: f64,
}

impl<const N: usize> Vertex<N> {
    fn new(point: [f64; N], objective: &impl Objective<N>) -> Self {
        let value = objective.value(&point);
        Self { point, value }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NelderMead {
    options: SimplexOptions,
}

impl NelderMead {
    pub fn new(options: SimplexOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SimplexOptions {
        &self.options
    }

    /// Minimizes `objective` starting from `start`.
    ///
    /// The search is deterministic: the initial simplex only depends on
    /// `start` and the options. Running out of iterations is not an error,
    /// the best vertex found so far is returned with `converged` unset.
    pub fn minimize<const N: usize>(
        &self,
        objective: &impl Objective<N>,
        start: [f64; N],
    ) -> Minimum<N> {
        let mut simplex = self.initial_simplex(objective, start);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.options.max_iterations {
            sort(&mut simplex);
            if self.has_converged(&simplex) {
                converged = true;
                break;
            }

            iterations += 1;
            self.step(objective, &mut simplex);

            trace!(
                iteration = iterations,
                best = simplex[0].value,
                worst = simplex[N].value,
                "simplex step"
            );
        }

        sort(&mut simplex);
        Minimum {
            point: simplex[0].point,
            value: simplex[0].value,
            iterations,
            converged,
        }
    }

    fn initial_simplex<const N: usize>(
        &self,
        objective: &impl Objective<N>,
        start: [f64; N],
    ) -> Vec<Vertex<N>> {
        let mut simplex = Vec::with_capacity(N + 1);
        simplex.push(Vertex::new(start, objective));
        for axis in 0..N {
            let mut point = start;
            point[axis] = match point[axis] == 0. {
                true => self.options.absolute_step,
                false => point[axis] * (1. + self.options.relative_step),
            };
            simplex.push(Vertex::new(point, objective));
        }

        simplex
    }

    /// Expects `simplex` to be sorted from best to worst.
    fn has_converged<const N: usize>(&self, simplex: &[Vertex<N>]) -> bool {
        let best = &simplex[0];
        let spread = simplex[1..]
            .iter()
            .flat_map(|vertex| {
                vertex
                    .point
                    .iter()
                    .zip(best.point.iter())
                    .map(|(a, b)| (a - b).abs())
            })
            .fold(0., f64::max);

        // Rounding alone keeps large objective values from agreeing any closer.
        let value_scale = best.value.abs().max(1.);
        spread <= self.options.tolerance
            && (simplex[N].value - best.value).abs() <= self.options.value_tolerance * value_scale
    }

    /// Replaces the worst vertex of the sorted `simplex`, or shrinks it.
    fn step<const N: usize>(&self, objective: &impl Objective<N>, simplex: &mut [Vertex<N>]) {
        let worst = simplex[N];
        let centroid = centroid(&simplex[..N]);
        let towards = |coefficient: f64, from: &[f64; N]| -> [f64; N] {
            std::array::from_fn(|i| centroid[i] + coefficient * (from[i] - centroid[i]))
        };

        let reflected = Vertex::new(towards(-REFLECTION, &worst.point), objective);
        if reflected.value < simplex[0].value {
            let expanded = Vertex::new(towards(EXPANSION, &reflected.point), objective);
            simplex[N] = match expanded.value < reflected.value {
                true => expanded,
                false => reflected,
            };
            return;
        }

        if reflected.value < simplex[N - 1].value {
            simplex[N] = reflected;
            return;
        }

        let (contracted, accepted) = match reflected.value < worst.value {
            true => {
                let outside = Vertex::new(towards(CONTRACTION, &reflected.point), objective);
                (outside, outside.value <= reflected.value)
            }
            false => {
                let inside = Vertex::new(towards(CONTRACTION, &worst.point), objective);
                (inside, inside.value < worst.value)
            }
        };
        if accepted {
            simplex[N] = contracted;
            return;
        }

        let best = simplex[0].point;
        for vertex in simplex[1..].iter_mut() {
            let point = std::array::from_fn(|i| best[i] + SHRINK * (vertex.point[i] - best[i]));
            *vertex = Vertex::new(point, objective);
        }
    }
}

fn sort<const N: usize>(simplex: &mut [Vertex<N>]) {
    simplex.sort_by(|a, b| a.value.total_cmp(&b.value));
}

fn centroid<const N: usize>(vertices: &[Vertex<N>]) -> [f64; N] {
    let n = vertices.len() as f64;
    std::array::from_fn(|i| vertices.iter().map(|vertex| vertex.point[i]).sum::<f64>() / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    struct Rosenbrock;

    impl Objective<2> for Rosenbrock {
        fn value(&self, [x, y]: &[f64; 2]) -> f64 {
            (1. - x).powi(2) + 100. * (y - x.powi(2)).powi(2)
        }
    }

    struct Bowl<const N: usize> {
        center: [f64; N],
    }

    impl<const N: usize> Objective<N> for Bowl<N> {
        fn value(&self, point: &[f64; N]) -> f64 {
            point
                .iter()
                .zip(self.center.iter())
                .map(|(p, c)| (p - c).powi(2))
                .sum()
        }
    }

    #[test]
    fn rosenbrock_valley() {
        let minimum = NelderMead::default().minimize(&Rosenbrock, [-1.2, 1.]);

        assert!(minimum.converged);
        assert_relative_eq!(minimum.point[0], 1., epsilon = 1e-6);
        assert_relative_eq!(minimum.point[1], 1., epsilon = 1e-6);
    }

    #[rstest]
    #[case([0., 0.])]
    #[case([250., -40.])]
    #[case([565300., 243900.])]
    fn bowl_from_anywhere(#[case] start: [f64; 2]) {
        let bowl = Bowl {
            center: [3., -7.],
        };
        let minimum = NelderMead::default().minimize(&bowl, start);

        assert!(minimum.converged);
        assert_relative_eq!(minimum.point[0], 3., epsilon = 1e-6);
        assert_relative_eq!(minimum.point[1], -7., epsilon = 1e-6);
        assert!(minimum.value <= 1e-12);
    }

    #[test]
    fn higher_dimensions() {
        let bowl = Bowl {
            center: [1., 2., 3.],
        };
        let minimum = NelderMead::default().minimize(&bowl, [0., 0., 0.]);

        assert!(minimum.converged);
        for (found, expected) in minimum.point.iter().zip(bowl.center.iter()) {
            assert_relative_eq!(*found, *expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn exhausted_budget_returns_best_vertex() {
        let options = SimplexOptions {
            max_iterations: 3,
            ..Default::default()
        };
        let start = [-1.2, 1.];
        let minimum = NelderMead::new(options).minimize(&Rosenbrock, start);

        assert!(!minimum.converged);
        assert_eq!(minimum.iterations, 3);
        assert!(minimum.value <= Rosenbrock.value(&start));
    }

    #[test]
    fn deterministic() {
        let search = NelderMead::default();
        assert_eq!(
            search.minimize(&Rosenbrock, [-1.2, 1.]),
            search.minimize(&Rosenbrock, [-1.2, 1.])
        );
    }
}
