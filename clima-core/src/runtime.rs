//! Event loop that drives [`WeatherLookupService`].
//!
//! Every input lands on one queue and is handled in order by a single task,
//! so the service never needs locking. Fetches run on their own tasks and
//! report back through the same queue.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::{
    display::Screen,
    location::{LocationProvider, LocationSink},
    provider::WeatherProvider,
    service::{Command, Event, WeatherLookupService},
};

/// The app task has exited; nothing more can be sent or observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("weather app is no longer running")]
pub struct AppClosed;

pub struct WeatherApp {
    service: WeatherLookupService,
    location: Box<dyn LocationProvider>,
    weather: Arc<dyn WeatherProvider>,
    // Weak so the loop ends once every handle and in-flight task is gone.
    events_tx: mpsc::WeakUnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    screen_tx: watch::Sender<Screen>,
}

impl WeatherApp {
    pub fn new(
        service: WeatherLookupService,
        location: Box<dyn LocationProvider>,
        weather: Arc<dyn WeatherProvider>,
    ) -> (Self, AppHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (screen_tx, screen_rx) = watch::channel(service.screen());

        let app_events = events_tx.downgrade();
        let handle = AppHandle {
            events: events_tx,
            screen: screen_rx,
        };

        let app = Self {
            service,
            location,
            weather,
            events_tx: app_events,
            events_rx,
            screen_tx,
        };

        (app, handle)
    }

    /// Drain the queue until [`Event::Shutdown`], or until no sender is left.
    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            if matches!(event, Event::Shutdown) {
                tracing::debug!("weather app shutting down");
                break;
            }
            self.dispatch(event);
        }

        self.location.stop_updates();
    }

    fn dispatch(&mut self, event: Event) {
        tracing::trace!(?event, "dispatching");

        for command in self.service.handle(event) {
            self.execute(command);
        }

        let next = self.service.screen();
        self.screen_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::RequestLocationPermission => self.location.request_permission(),
            Command::StartLocationUpdates => {
                if let Some(events) = self.events_tx.upgrade() {
                    self.location.start_updates(LocationSink::new(events));
                }
            }
            Command::StopLocationUpdates => self.location.stop_updates(),
            Command::Fetch { id, query } => {
                let Some(events) = self.events_tx.upgrade() else {
                    tracing::debug!(id, "no front end left, skipping fetch");
                    return;
                };
                let weather = Arc::clone(&self.weather);

                tokio::spawn(async move {
                    let result = weather.get_weather(&query).await;
                    // The app may have shut down while the request was out.
                    let _ = events.send(Event::FetchCompleted { id, result });
                });
            }
        }
    }
}

/// Front-end side of a running [`WeatherApp`].
#[derive(Debug, Clone)]
pub struct AppHandle {
    events: mpsc::UnboundedSender<Event>,
    screen: watch::Receiver<Screen>,
}

impl AppHandle {
    /// Queue an event. Marks the current screen as seen so that
    /// [`next_settled`](Self::next_settled) waits for its outcome.
    pub fn send(&mut self, event: Event) -> Result<(), AppClosed> {
        self.screen.borrow_and_update();
        self.events.send(event).map_err(|_| AppClosed)
    }

    pub fn use_location(&mut self) -> Result<(), AppClosed> {
        self.send(Event::LocationRequested)
    }

    pub fn submit_city(&mut self, city: impl Into<String>) -> Result<(), AppClosed> {
        self.send(Event::CitySubmitted(city.into()))
    }

    pub fn toggle_unit(&mut self) -> Result<(), AppClosed> {
        self.send(Event::UnitToggled)
    }

    pub fn shutdown(&self) -> Result<(), AppClosed> {
        self.events.send(Event::Shutdown).map_err(|_| AppClosed)
    }

    /// The latest published screen.
    pub fn screen(&self) -> Screen {
        self.screen.borrow().clone()
    }

    /// Wait for the next published change, settled or not.
    pub async fn next_screen(&mut self) -> Result<Screen, AppClosed> {
        self.screen.changed().await.map_err(|_| AppClosed)?;
        Ok(self.screen.borrow_and_update().clone())
    }

    /// Wait for the next change that leaves the screen settled.
    pub async fn next_settled(&mut self) -> Result<Screen, AppClosed> {
        loop {
            self.screen.changed().await.map_err(|_| AppClosed)?;

            let screen = self.screen.borrow_and_update();
            if screen.status.is_settled() {
                return Ok(screen.clone());
            }
        }
    }
}
