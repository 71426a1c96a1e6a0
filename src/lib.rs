//! Planar Resection
//!
//! Estimates where an observer stands from the bearings it measured towards
//! landmarks of known position. Every pair of landmarks constrains the
//! observer to a locus circle, and the estimate is the point that best fits
//! all of them.
//!
//! ```
//! use resection::prelude::*;
//!
//! let landmarks = Landmarks::new(vec![
//!     Landmark::from_degrees("a", 0., 0., 233.13010235415598)?,
//!     Landmark::from_degrees("b", 1000., 0., 116.56505117707799)?,
//!     Landmark::from_degrees("c", 500., 866.0254037844386, 10.019088466157418)?,
//! ])?;
//!
//! let result = resect(&landmarks, landmarks.centroid(), &ResectionOptions::default())?;
//! assert!(result.residual.get::<uom::si::length::meter>() < 1e-6);
//! # Ok::<(), resection::error::Error>(())
//! ```

pub mod bearing;
pub mod circle;
pub mod error;
pub mod landmark;
pub mod noise;
pub mod point;
#[cfg(feature = "serde")]
pub mod record;
pub mod residual;
pub mod resection;
pub mod simplex;

pub use resection::resect;

pub mod prelude {
    pub use crate::{
        bearing::Bearing,
        circle::{ArcSelection, LocusCircle},
        landmark::{Landmark, Landmarks},
        point::Point,
        resection::{DegeneratePolicy, Resection, ResectionOptions, ResectionResult, resect},
        simplex::SimplexOptions,
    };
}
