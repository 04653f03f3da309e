//! Integration tests for AccuWeatherProvider using wiremock.

use weather_core::{
    UpstreamError, WeatherSource,
    provider::accuweather::AccuWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn daily(phrase: &str, max: f64, precipitation: f64) -> serde_json::Value {
    serde_json::json!({
        "Temperature": {"Minimum": {"Value": max - 8.0}, "Maximum": {"Value": max}},
        "RealFeelTemperature": {"Minimum": {"Value": max - 10.0}, "Maximum": {"Value": max - 1.0}},
        "Day": {
            "IconPhrase": phrase,
            "PrecipitationProbability": precipitation,
            "Wind": {"Speed": {"Value": 11.1}, "Direction": {"Localized": "NNE"}}
        }
    })
}

async fn mount_location(server: &MockServer, q: &str, key: &str) {
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"Key": key, "LocalizedName": "London"}
        ])))
        .expect(1)
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> AccuWeatherProvider {
    AccuWeatherProvider::new("test-key", Some(&server.uri())).unwrap()
}

#[tokio::test]
async fn current_resolves_location_key_then_conditions() {
    let server = MockServer::start().await;
    mount_location(&server, "london", "328328").await;

    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/328328"))
        .and(query_param("details", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "WeatherText": "Mostly cloudy",
            "Temperature": {"Metric": {"Value": 14.4}, "Imperial": {"Value": 58.0}},
            "RealFeelTemperature": {"Metric": {"Value": 12.2}},
            "RelativeHumidity": 77,
            "Wind": {"Direction": {"Localized": "WSW"}, "Speed": {"Metric": {"Value": 18.5}}}
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider(&server).current("london").await.unwrap();

    assert_eq!(record.description, "Mostly cloudy");
    assert_eq!(record.temperature, 14.4);
    assert_eq!(record.feels_like, 12.2);
    assert_eq!(record.humidity, 77.0);
    assert_eq!(record.wind_speed, 18.5);
    assert_eq!(record.wind_direction, "WSW");
}

#[tokio::test]
async fn unknown_location_is_location_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = provider(&server).current("atlantis").await.unwrap_err();

    assert!(matches!(err, UpstreamError::LocationNotFound { .. }));
    assert_eq!(err.location(), "atlantis");
    assert_eq!(err.to_string(), "location not found: atlantis");
}

#[tokio::test]
async fn empty_conditions_is_no_data() {
    let server = MockServer::start().await;
    mount_location(&server, "oslo", "254946").await;

    Mock::given(method("GET"))
        .and(path("/currentconditions/v1/254946"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = provider(&server).current("oslo").await.unwrap_err();

    assert!(matches!(err, UpstreamError::NoData { .. }));
    assert!(err.to_string().contains("current conditions"));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("The allowed number of requests has been exceeded."))
        .mount(&server)
        .await;

    let err = provider(&server).current("london").await.unwrap_err();

    match err {
        UpstreamError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 503);
            assert!(body.contains("exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).current("london").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode { .. }));
}

#[tokio::test]
async fn week_forecast_is_capped_at_five_and_padded() {
    let server = MockServer::start().await;
    mount_location(&server, "london", "328328").await;

    let days: Vec<_> = (0..5).map(|i| daily("Showers", 10.0 + i as f64, 40.0)).collect();
    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/328328"))
        .and(query_param("metric", "true"))
        .and(query_param("details", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "DailyForecasts": days
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = provider(&server).forecast("london", 7).await.unwrap();

    assert_eq!(records.len(), 7);
    assert_eq!(records[0].description, "Showers");
    assert_eq!(records[0].temperature, 10.0);
    assert_eq!(records[4].temperature, 14.0);
    assert_eq!(records[0].feels_like, 9.0);
    // Precipitation probability rides in the humidity field.
    assert_eq!(records[0].humidity, 40.0);
    assert_eq!(records[0].wind_direction, "NNE");
    for padded in &records[5..] {
        assert_eq!(padded.description, "Forecast unavailable");
        assert_eq!(padded.temperature, 0.0);
        assert_eq!(padded.feels_like, 0.0);
    }
}

#[tokio::test]
async fn month_forecast_pads_even_when_upstream_returns_fewer() {
    let server = MockServer::start().await;
    mount_location(&server, "london", "328328").await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/328328"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "DailyForecasts": [daily("Sunny", 20.0, 0.0), daily("Cloudy", 18.0, 10.0)]
        })))
        .mount(&server)
        .await;

    let records = provider(&server).forecast("london", 30).await.unwrap();

    assert_eq!(records.len(), 30);
    assert_eq!(records[1].description, "Cloudy");
    assert!(records[2..].iter().all(|r| r.description == "Forecast unavailable"));
}

#[tokio::test]
async fn single_day_forecast_uses_one_day_product() {
    let server = MockServer::start().await;
    mount_location(&server, "rome", "213490").await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/1day/213490"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "DailyForecasts": [daily("Hot", 33.0, 0.0)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = provider(&server).forecast("rome", 1).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "Hot");
}

#[tokio::test]
async fn empty_daily_forecasts_is_no_data() {
    let server = MockServer::start().await;
    mount_location(&server, "london", "328328").await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/328328"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "DailyForecasts": []
        })))
        .mount(&server)
        .await;

    let err = provider(&server).forecast("london", 7).await.unwrap_err();
    assert!(matches!(err, UpstreamError::NoData { .. }));
}
