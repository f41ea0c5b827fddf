// ABOUTME: Geographic bounding boxes and spatial zone classification for datasets.
// ABOUTME: Enforces world-coordinate ranges and west<=east / south<=north ordering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for spatial extents.
#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("west {west} is greater than east {east}")]
    WestEastInverted { west: f64, east: f64 },

    #[error("south {south} is greater than north {north}")]
    SouthNorthInverted { south: f64, north: f64 },
}

/// A geographic bounding box in decimal degrees.
///
/// Valid once constructed via `validate`: west/east in [-180, 180],
/// south/north in [-90, 90], west <= east and south <= north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// The whole-world extent.
    pub fn global() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    /// Check all range and ordering invariants. Returns the first violation.
    pub fn validate(&self) -> Result<(), SpatialError> {
        check_range("west", self.west, -180.0, 180.0)?;
        check_range("east", self.east, -180.0, 180.0)?;
        check_range("south", self.south, -90.0, 90.0)?;
        check_range("north", self.north, -90.0, 90.0)?;

        if self.west > self.east {
            return Err(SpatialError::WestEastInverted {
                west: self.west,
                east: self.east,
            });
        }
        if self.south > self.north {
            return Err(SpatialError::SouthNorthInverted {
                south: self.south,
                north: self.north,
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), SpatialError> {
    if !value.is_finite() || value < min || value > max {
        return Err(SpatialError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// How a dataset's spatial coverage is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    #[default]
    BoundingBox,
    Global,
    Point,
}

impl ZoneType {
    pub fn from_key(key: &str) -> Option<ZoneType> {
        match key {
            "bounding_box" => Some(ZoneType::BoundingBox),
            "global" => Some(ZoneType::Global),
            "point" => Some(ZoneType::Point),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_box_passes() {
        let bbox = BoundingBox::new(-10.0, 20.0, -60.0, -50.0);
        assert!(bbox.validate().is_ok());
        assert!(BoundingBox::global().validate().is_ok());
    }

    #[test]
    fn west_out_of_range_rejected() {
        let bbox = BoundingBox::new(200.0, 210.0, -10.0, 10.0);
        let err = bbox.validate().unwrap_err();
        assert!(matches!(err, SpatialError::OutOfRange { field: "west", .. }));
    }

    #[test]
    fn inverted_west_east_rejected() {
        let bbox = BoundingBox::new(10.0, 5.0, -10.0, 10.0);
        assert_eq!(
            bbox.validate().unwrap_err(),
            SpatialError::WestEastInverted {
                west: 10.0,
                east: 5.0
            }
        );
    }

    #[test]
    fn inverted_south_north_rejected() {
        let bbox = BoundingBox::new(-10.0, 10.0, 40.0, 20.0);
        assert!(matches!(
            bbox.validate().unwrap_err(),
            SpatialError::SouthNorthInverted { .. }
        ));
    }

    #[test]
    fn non_finite_coordinate_rejected() {
        let bbox = BoundingBox::new(f64::NAN, 10.0, -10.0, 10.0);
        assert!(bbox.validate().is_err());
    }

    #[test]
    fn zone_type_from_key() {
        assert_eq!(ZoneType::from_key("point"), Some(ZoneType::Point));
        assert_eq!(ZoneType::from_key("sphere"), None);
        assert_eq!(ZoneType::default(), ZoneType::BoundingBox);
    }
}
