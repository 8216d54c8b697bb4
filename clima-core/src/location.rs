//! Location acquisition collaborators.
//!
//! A provider is started with a [`LocationSink`] and pushes fixes or a
//! failure into the app's event queue until it is stopped. Deciding which
//! fix is good enough is the service's job, not the provider's.

use std::fmt::Debug;
use tokio::sync::mpsc::UnboundedSender;

use crate::service::Event;

pub mod ipapi;

pub use ipapi::IpLocationProvider;

/// A single position report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in metres. Zero or negative means the fix is unusable.
    pub horizontal_accuracy: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, horizontal_accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.horizontal_accuracy > 0.0
    }
}

/// Delivery end handed to a provider on start.
#[derive(Debug, Clone)]
pub struct LocationSink {
    events: UnboundedSender<Event>,
}

impl LocationSink {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self { events }
    }

    /// Deliver a batch of fixes, oldest first. Returns `false` once the app is gone.
    pub fn update(&self, fixes: Vec<LocationFix>) -> bool {
        self.events.send(Event::LocationUpdated(fixes)).is_ok()
    }

    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.events.send(Event::LocationFailed(reason.into())).is_ok()
    }
}

pub trait LocationProvider: Send + Debug {
    /// Ask for permission to read the location. Called at most once per app.
    fn request_permission(&mut self) {}

    /// Begin delivering updates to `sink` until [`stop_updates`](Self::stop_updates).
    fn start_updates(&mut self, sink: LocationSink);

    fn stop_updates(&mut self);
}

/// Reports one fixed position, e.g. coordinates given on the command line.
#[derive(Debug, Clone)]
pub struct StaticLocationProvider {
    fix: LocationFix,
}

impl StaticLocationProvider {
    /// Accuracy reported for user-supplied coordinates.
    const EXACT_ACCURACY_M: f64 = 1.0;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: LocationFix::new(latitude, longitude, Self::EXACT_ACCURACY_M),
        }
    }
}

impl LocationProvider for StaticLocationProvider {
    fn start_updates(&mut self, sink: LocationSink) {
        tracing::debug!(fix = ?self.fix, "reporting static location");
        sink.update(vec![self.fix]);
    }

    fn stop_updates(&mut self) {}
}
