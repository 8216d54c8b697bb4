//! End-to-end tests for WeatherApp: event loop, providers and screen updates.

use async_trait::async_trait;
use clima_core::{
    DisplayUnit, FailureKind, LocationProvider, LocationSink, OpenWeatherProvider,
    StaticLocationProvider, Status, WeatherApp, WeatherError, WeatherLookupService,
    WeatherProvider, WeatherQuery,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every query and answers with a fixed result.
#[derive(Debug)]
struct RecordingProvider {
    queries: Mutex<Vec<WeatherQuery>>,
    response: Result<Value, WeatherError>,
}

impl RecordingProvider {
    fn answering(response: Result<Value, WeatherError>) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            response,
        })
    }

    fn queries(&self) -> Vec<WeatherQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for RecordingProvider {
    async fn get_weather(&self, query: &WeatherQuery) -> Result<Value, WeatherError> {
        self.queries.lock().unwrap().push(query.clone());
        self.response.clone()
    }
}

/// Fails as soon as it is started.
#[derive(Debug)]
struct DeniedLocation;

impl LocationProvider for DeniedLocation {
    fn start_updates(&mut self, sink: LocationSink) {
        sink.fail("permission denied");
    }

    fn stop_updates(&mut self) {}
}

fn tokyo() -> Value {
    json!({"name": "Tokyo", "main": {"temp": 300.15}, "weather": [{"id": 800}]})
}

async fn within<F: std::future::Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("app did not settle in time")
}

#[tokio::test]
async fn test_location_lookup_renders_weather() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(StaticLocationProvider::new(35.68, 139.69)),
        weather.clone(),
    );
    let task = tokio::spawn(app.run());

    handle.use_location().unwrap();
    let screen = within(handle.next_settled()).await.unwrap();

    assert_eq!(screen.status, Status::Ready);
    assert_eq!(screen.display.city, "Tokyo");
    assert_eq!(screen.display.temperature, "91°");
    assert_eq!(screen.display.icon, "sunny");
    assert_eq!(screen.button_label(), "C");
    assert_eq!(
        weather.queries(),
        vec![WeatherQuery::Coordinates { lat: 35.68, lon: 139.69 }]
    );

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_denied_location_issues_no_fetch() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather.clone(),
    );
    let task = tokio::spawn(app.run());

    handle.use_location().unwrap();
    let screen = within(handle.next_settled()).await.unwrap();

    assert_eq!(screen.status, Status::Failed(FailureKind::LocationUnavailable));
    assert_eq!(screen.display.city, "Location Unavailable");
    assert!(weather.queries().is_empty());

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_manual_city_skips_location() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather.clone(),
    );
    let task = tokio::spawn(app.run());

    handle.submit_city("Paris").unwrap();
    let screen = within(handle.next_settled()).await.unwrap();

    assert_eq!(screen.status, Status::Ready);
    assert_eq!(weather.queries(), vec![WeatherQuery::City("Paris".into())]);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_toggle_after_lookup_rerenders() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather.clone(),
    );
    let task = tokio::spawn(app.run());

    handle.submit_city("Tokyo").unwrap();
    let original = within(handle.next_settled()).await.unwrap();

    handle.toggle_unit().unwrap();
    let celsius = within(handle.next_settled()).await.unwrap();
    assert_eq!(celsius.unit, DisplayUnit::Celsius);
    assert_eq!(celsius.display.temperature, "27°");
    assert_eq!(celsius.button_label(), "F");

    handle.toggle_unit().unwrap();
    let back = within(handle.next_settled()).await.unwrap();
    assert_eq!(back, original);

    assert_eq!(weather.queries().len(), 1);

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_connection_failure_shows_no_connection() {
    let weather =
        RecordingProvider::answering(Err(WeatherError::ConnectionFailed("offline".into())));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather,
    );
    let task = tokio::spawn(app.run());

    handle.submit_city("Paris").unwrap();
    let screen = within(handle.next_settled()).await.unwrap();

    assert_eq!(screen.status, Status::Failed(FailureKind::ConnectionFailed));
    assert_eq!(screen.display.city, "No Connection");
    assert_eq!(screen.display.temperature, "");

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_closed_app_rejects_events() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather,
    );
    let task = tokio::spawn(app.run());

    handle.shutdown().unwrap();
    task.await.unwrap();

    assert!(handle.submit_city("Paris").is_err());
    assert!(handle.next_settled().await.is_err());
}

#[tokio::test]
async fn test_missing_temperature_through_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Nowhere"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let weather = OpenWeatherProvider::new(
        "TEST_KEY".into(),
        format!("{}/data/2.5/weather", mock_server.uri()),
    )
    .unwrap();

    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        Arc::new(weather),
    );
    let task = tokio::spawn(app.run());

    handle.submit_city("Nowhere").unwrap();
    let screen = within(handle.next_settled()).await.unwrap();

    assert_eq!(screen.status, Status::Failed(FailureKind::DataUnavailable));
    assert_eq!(screen.display.city, "Weather Unavailable");
    assert_eq!(screen.display.temperature, "");
    assert_eq!(screen.display.icon, "dunno");

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_dropping_every_handle_ends_the_loop() {
    let weather = RecordingProvider::answering(Ok(tokyo()));
    let (app, mut handle) = WeatherApp::new(
        WeatherLookupService::new(),
        Box::new(DeniedLocation),
        weather,
    );
    let task = tokio::spawn(app.run());

    handle.submit_city("Tokyo").unwrap();
    within(handle.next_settled()).await.unwrap();
    drop(handle);

    within(task).await.unwrap();
}
