//! Camera control seam between search results and the host map viewer

use crate::geo::Rectangle;
use std::time::Duration;

/// A map viewer whose camera can be flown to a rectangle
pub trait Viewer: Send + Sync {
    fn zoom_to(&self, rectangle: &Rectangle, flight_duration: Duration);
}

/// Viewer without a camera that reports zoom requests through the `log` crate
#[derive(Debug, Default, Clone)]
pub struct LogViewer;

impl Viewer for LogViewer {
    fn zoom_to(&self, rectangle: &Rectangle, flight_duration: Duration) {
        log::info!(
            "Flying camera to [{rectangle}] over {:.2}s",
            flight_duration.as_secs_f64()
        );
    }
}
