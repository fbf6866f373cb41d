//! End-to-end behaviour of the Ionic Push channel
//!
//! Most tests drive the channel through a recording transport; the last ones
//! go through `ReqwestTransport` against a local server.

mod common;

use common::{OneShotServer, EXPECTED_EMAIL_BODY, EXPECTED_TOKEN_BODY};
use ionic_push::errors::TransportError;
use ionic_push::{
    Addressable, AppError, Delivery, DestinationKind, HttpRequest, HttpResponse, HttpTransport,
    IonicPushChannel, IonicPushConfig, PushMessage, PushMessageProducer,
};
use std::error::Error as _;
use std::sync::{Arc, Mutex};

struct MockTransport {
    status: u16,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    fn returning(status: u16) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(HttpResponse {
            status: self.status,
            body: if self.status >= 400 {
                r#"{"error":"internal"}"#.to_string()
            } else {
                String::new()
            },
        })
    }
}

struct TestNotifiable;

impl Addressable for TestNotifiable {
    fn route_for_ionic_push(&self) -> Option<String> {
        Some("device_token".to_string())
    }
}

struct TestNotification;

impl PushMessageProducer for TestNotification {
    fn to_ionic_push(&self, _recipient: &dyn Addressable) -> PushMessage {
        PushMessage::create("my-security-profile")
            .message("A message to your user")
            .profile("my-security-profile")
            .ios_badge(1)
            .ios_sound("ping.aiff")
    }
}

struct TestNotificationToEmail;

impl PushMessageProducer for TestNotificationToEmail {
    fn to_ionic_push(&self, _recipient: &dyn Addressable) -> PushMessage {
        PushMessage::create("my-security-profile")
            .send_to(DestinationKind::Emails)
            .message("A message to your user")
            .profile("my-security-profile")
            .ios_badge(1)
            .ios_sound("ping.aiff")
    }
}

fn configured() -> IonicPushConfig {
    IonicPushConfig::with_key("IonicKey")
}

#[test]
fn test_can_send_a_notification() {
    let transport = MockTransport::returning(201);
    let channel = IonicPushChannel::new(configured(), &transport);

    let delivery = channel.send(&TestNotifiable, &TestNotification).unwrap();

    assert_eq!(delivery, Delivery { status: 201 });
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://api.ionic.io/push/notifications");
    assert_eq!(requests[0].body, EXPECTED_TOKEN_BODY);
    assert_eq!(
        requests[0].headers,
        vec![
            ("Authorization".to_string(), "Bearer IonicKey".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    );
}

#[test]
fn test_can_send_a_notification_to_an_email_address() {
    let transport = MockTransport::returning(201);
    let channel = IonicPushChannel::new(configured(), &transport);

    channel.send(&TestNotifiable, &TestNotificationToEmail).unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, EXPECTED_EMAIL_BODY);
}

#[test]
fn test_fails_when_not_configured() {
    let transport = MockTransport::returning(201);
    let channel = IonicPushChannel::new(IonicPushConfig::default(), &transport);

    let err = channel.send(&TestNotifiable, &TestNotification).unwrap_err();

    assert!(matches!(err, AppError::InvalidConfiguration { .. }));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_fails_when_the_notification_could_not_be_sent() {
    let transport = MockTransport::returning(500);
    let channel = IonicPushChannel::new(configured(), &transport);

    let err = channel.send(&TestNotifiable, &TestNotification).unwrap_err();

    assert!(matches!(err, AppError::CouldNotSendNotification { .. }));
    let response = err.response().expect("rejected response should be kept");
    assert_eq!(response.status, 500);
    assert_eq!(response.body, r#"{"error":"internal"}"#);
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn test_shared_transport_across_threads() {
    let transport = Arc::new(MockTransport::returning(200));
    let channel = Arc::new(IonicPushChannel::new(configured(), Arc::clone(&transport)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let channel = Arc::clone(&channel);
            std::thread::spawn(move || channel.send(&TestNotifiable, &TestNotification))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    assert!(requests.iter().all(|r| r.body == EXPECTED_TOKEN_BODY));
}

#[test]
fn test_reqwest_transport_posts_payload() {
    let server = OneShotServer::start(201);
    let config = IonicPushConfig {
        endpoint: server.url.clone(),
        timeout_secs: Some(5),
        ..configured()
    };
    let channel = IonicPushChannel::from_config(config).unwrap();

    let delivery = channel.send(&TestNotifiable, &TestNotification).unwrap();
    let request = server.captured();

    assert_eq!(delivery, Delivery { status: 201 });
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/push/notifications");
    assert_eq!(request.body, EXPECTED_TOKEN_BODY);
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer IonicKey")
    );
    assert_eq!(
        request.headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
}

#[test]
fn test_reqwest_transport_reports_rejection() {
    let server = OneShotServer::start(500);
    let config = IonicPushConfig {
        endpoint: server.url.clone(),
        timeout_secs: Some(5),
        ..configured()
    };
    let channel = IonicPushChannel::from_config(config).unwrap();

    let err = channel.send(&TestNotifiable, &TestNotification).unwrap_err();
    server.captured();

    assert_eq!(err.response().map(|r| r.status), Some(500));
    assert!(err.is_retryable());
}

#[test]
fn test_unreachable_endpoint_is_delivery_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = IonicPushConfig {
        endpoint: format!("http://127.0.0.1:{port}/push/notifications"),
        timeout_secs: Some(5),
        ..configured()
    };
    let channel = IonicPushChannel::from_config(config).unwrap();

    let err = channel.send(&TestNotifiable, &TestNotification).unwrap_err();

    assert_eq!(err.category(), "delivery");
    assert!(err.response().is_none());
    let transport_err = err.transport_error().expect("transport failure");
    assert!(!transport_err.is_timeout());

    let failure = err.source().expect("delivery failure");
    let cause = failure.source().expect("transport error");
    assert!(cause.is::<TransportError>());
}
