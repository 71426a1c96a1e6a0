//! Plain landmark records as found in observation files.

use crate::{error::Error, landmark::Landmark};
use serde::{Deserialize, Serialize};

/// A landmark observation in meters and degrees.
///
/// ```json
/// { "id": "kopiec", "x": 563933.24, "y": 243454.98, "bearing": 247.63 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Degrees clockwise from north.
    pub bearing: f64,
}

impl TryFrom<LandmarkRecord> for Landmark {
    type Error = Error;

    fn try_from(record: LandmarkRecord) -> Result<Self, Self::Error> {
        Landmark::from_degrees(record.id, record.x, record.y, record.bearing)
    }
}
