//! Shared fixtures for integration tests: mocked platform services and a
//! relay bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use destination_relay::config::{RelayConfig, ServiceCredentials};
use destination_relay::{HttpServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "sb-relay-client";
pub const CLIENT_SECRET: &str = "relay-secret";
pub const DESTINATION: &str = "SM_TEST";
pub const DESTINATION_PATH: &str = "/destination-configuration/v1/destinations/SM_TEST";
pub const SERVICE_TOKEN: &str = "dest-service-token";

/// The three outbound services the relay talks to.
pub struct Platform {
    pub auth: MockServer,
    pub destinations: MockServer,
    pub backend: MockServer,
}

impl Platform {
    pub async fn start() -> Self {
        Self {
            auth: MockServer::start().await,
            destinations: MockServer::start().await,
            backend: MockServer::start().await,
        }
    }

    /// Relay configuration pointing at the mocks.
    pub fn config(&self) -> RelayConfig {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.credentials = ServiceCredentials {
            client_id: CLIENT_ID.into(),
            client_secret: CLIENT_SECRET.into(),
            destination_service_uri: self.destinations.uri(),
            auth_server_url: self.auth.uri(),
        };
        config
    }

    /// Base URL handed out by the destination service; ends with `/`.
    pub fn backend_url(&self) -> String {
        format!("{}/", self.backend.uri())
    }

    /// Token endpoint accepting the test client, expected `times` calls.
    pub async fn mount_token(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(basic_auth(CLIENT_ID, CLIENT_SECRET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": SERVICE_TOKEN,
                "token_type": "bearer",
                "expires_in": 43199,
                "scope": "uaa.resource"
            })))
            .expect(times)
            .mount(&self.auth)
            .await;
    }

    /// Destination lookup answering `template`, expected `times` calls.
    pub async fn mount_destination(&self, template: ResponseTemplate, times: u64) {
        Mock::given(method("GET"))
            .and(path(DESTINATION_PATH))
            .and(header("authorization", format!("bearer {}", SERVICE_TOKEN).as_str()))
            .respond_with(template)
            .expect(times)
            .mount(&self.destinations)
            .await;
    }

    /// Downstream endpoint answering `template` for `token`, expected `times` calls.
    pub async fn mount_backend(&self, token: &str, template: ResponseTemplate, times: u64) {
        Mock::given(method("GET"))
            .and(path("/srv/user"))
            .and(header("authorization", format!("bearer {}", token).as_str()))
            .and(header("accept", "application/json"))
            .respond_with(template)
            .expect(times)
            .mount(&self.backend)
            .await;
    }

    /// Destination document pointing at the backend mock with `token`.
    pub fn destination_document(&self, token: &str) -> Value {
        destination_document(&self.backend_url(), token)
    }
}

pub fn destination_document(url: &str, token: &str) -> Value {
    json!({
        "owner": { "SubaccountId": "00000000-0000-0000-0000-000000000000", "InstanceId": null },
        "destinationConfiguration": {
            "Name": DESTINATION,
            "Type": "HTTP",
            "URL": url,
            "Authentication": "OAuth2ClientCredentials",
            "ProxyType": "Internet"
        },
        "authTokens": [
            { "type": "bearer", "value": token, "http_header": { "key": "Authorization", "value": format!("Bearer {}", token) } }
        ]
    })
}

/// A running relay.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningRelay {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the relay on an ephemeral port.
pub async fn spawn_relay(config: RelayConfig) -> RunningRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    RunningRelay { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// `GET /` on the relay; returns status and body text.
pub async fn get_root(relay: &RunningRelay) -> (u16, String) {
    let res = client().get(relay.url()).send().await.expect("Relay unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

/// `GET /` on the relay; returns status and the undecoded body.
pub async fn get_root_bytes(relay: &RunningRelay) -> (u16, Vec<u8>) {
    let res = client().get(relay.url()).send().await.expect("Relay unreachable");
    let status = res.status().as_u16();
    (status, res.bytes().await.unwrap().to_vec())
}
