//! Geographic primitives used to position the viewer camera

use crate::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Width in degrees of the square the camera flies to around a hit
pub const DEFAULT_ZOOM_WIDTH_DEGREES: f64 = 0.01;

/// Default camera flight duration in seconds
pub const DEFAULT_FLIGHT_DURATION_SECS: f64 = 1.5;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> SearchResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SearchError::InvalidInput(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SearchError::InvalidInput(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// An axis-aligned rectangle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "W {:.5} S {:.5} E {:.5} N {:.5}",
            self.west, self.south, self.east, self.north
        )
    }
}

/// Build a square of `width_degrees` centred on a point, clamped to the globe
pub fn zoom_rectangle_from_point(latitude: f64, longitude: f64, width_degrees: f64) -> Rectangle {
    let half = width_degrees / 2.0;

    Rectangle {
        west: (longitude - half).clamp(-180.0, 180.0),
        south: (latitude - half).clamp(-90.0, 90.0),
        east: (longitude + half).clamp(-180.0, 180.0),
        north: (latitude + half).clamp(-90.0, 90.0),
    }
}

/// Where and how fast the camera should move when a result is selected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTarget {
    pub rectangle: Rectangle,
    pub flight_duration: Duration,
}

impl ZoomTarget {
    pub fn around(point: &GeoPoint, width_degrees: f64, flight_duration: Duration) -> Self {
        Self {
            rectangle: zoom_rectangle_from_point(point.latitude, point.longitude, width_degrees),
            flight_duration,
        }
    }
}
