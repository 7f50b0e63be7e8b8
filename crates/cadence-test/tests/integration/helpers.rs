#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building a Salvo service wired like `main.rs`, backed by an in-memory store
//! - Making HTTP requests and asserting on responses

use std::sync::{Arc, OnceLock};

use salvo::http::{Method, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde::de::DeserializeOwned;

use cadence_test::component::booking::RecurringBookingService;
use cadence_test::component::config::{ConfigHandler, Settings};
use cadence_test::component::constants::RECURRING_ROUTE_PREFIX;
use cadence_test::component::recurrence::ExpansionPolicy;

pub use tracing;

static CONFIG_INIT: OnceLock<Settings> = OnceLock::new();

fn test_config() -> Settings {
    Settings::defaults().expect("Default settings should deserialize")
}

/// ## Summary
/// Creates a fresh service with its own store, wired like `main.rs`.
///
/// ## Panics
/// Panics if the routes cannot be built.
#[must_use]
pub fn create_test_service() -> (Service, Arc<RecurringBookingService>) {
    let config = CONFIG_INIT.get_or_init(test_config);
    let booking_service = Arc::new(RecurringBookingService::in_memory(
        ExpansionPolicy::from(&config.recurrence),
    ));

    let router = Router::new()
        .hoop(
            cadence_test::app::service_handler::BookingServiceHandler {
                service: Arc::clone(&booking_service),
            },
        )
        .hoop(ConfigHandler::new(config.clone()))
        .push(cadence_test::app::api::routes().expect("API routes should be valid"));

    (Service::new(router), booking_service)
}

/// Path under the recurring bookings prefix.
#[must_use]
pub fn booking_path(suffix: &str) -> String {
    format!("{RECURRING_ROUTE_PREFIX}{suffix}")
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    json: Option<serde_json::Value>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            json: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Sends the request to the test service and returns the response.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            "PUT" => TestClient::put(&url),
            "DELETE" => TestClient::delete(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        if let Some(body) = &self.json {
            client = client.json(body);
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse { status, body }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}: {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts that the response body contains the expected substring.
    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    /// Returns the body as a UTF-8 string.
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the JSON body.
    ///
    /// ## Panics
    /// Panics if the body is not valid JSON for `T`.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Response body should be valid JSON")
    }
}
