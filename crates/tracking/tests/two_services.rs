//! End-to-end tests: two services sharing one tracking context
//!
//! ServiceA sets part of the payload and calls ServiceB, which adds the page
//! URL from a nested `track` call. One payload is dispatched per call to
//! ServiceA.

use std::collections::HashSet;
use std::convert::Infallible;

use trackit_client::{Attribute, BuilderError, Value};
use trackit_tracking::test::RecordingTransport;
use trackit_tracking::{TrackingClient, TrackingContext};

struct ServiceB {
    context: TrackingContext,
}

impl ServiceB {
    async fn call(&self, i: u32) -> String {
        let result = self
            .context
            .track(move |tracker| async move {
                tracker.set(Attribute::PageUrl, format!("{i}_https://test.com"));
                Ok::<_, Infallible>("test".to_string())
            })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

struct ServiceA {
    context: TrackingContext,
    service_b: std::sync::Arc<ServiceB>,
}

impl ServiceA {
    async fn call(&self, i: u32, complete: bool) -> String {
        let service_b = self.service_b.clone();
        let result = self
            .context
            .track(move |tracker| async move {
                tracker.set_all([
                    (Attribute::TealiumEvent, Value::string(format!("Event#{i}"))),
                    (Attribute::PageName, Value::string("Home")),
                    (Attribute::EmailHidden, Value::boolean(true)),
                    (Attribute::Environment, Value::string("env")),
                ]);

                if complete {
                    tracker.set_all([
                        (Attribute::TealiumAccount, Value::string("acme")),
                        (Attribute::TealiumProfile, Value::string("main")),
                        (Attribute::UserVisitorType, Value::string("guest")),
                        (Attribute::UserSignedIn, Value::boolean(true)),
                        (Attribute::DeviceOsVersion, Value::string("17.1")),
                        (Attribute::UserChannel, Value::string("app")),
                        (Attribute::Attribution, Value::string("organic")),
                    ]);
                }

                Ok::<_, Infallible>(service_b.call(i).await)
            })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

fn services(transport: &RecordingTransport) -> (TrackingClient, ServiceA) {
    let client = TrackingClient::new(transport.shared());
    let context = TrackingContext::new(client.clone());
    let service_b = std::sync::Arc::new(ServiceB {
        context: context.clone(),
    });
    (client, ServiceA { context, service_b })
}

#[tokio::test]
async fn test_incomplete_payload_is_rejected_after_result_is_returned() {
    let transport = RecordingTransport::new();
    let (client, service_a) = services(&transport);

    assert_eq!(service_a.call(0, false).await, "test");

    client.drain().await;
    assert!(transport.payloads().is_empty());
    assert_eq!(client.stats().failed_validation, 1);
}

#[tokio::test]
async fn test_incomplete_payload_reports_expected_missing_fields() {
    let transport = RecordingTransport::new();
    let (_client, service_a) = services(&transport);
    let context = service_a.context.clone();

    let missing = context
        .track(move |tracker| async move {
            service_a.call(0, false).await;
            Ok::<_, Infallible>(tracker.build())
        })
        .await
        .unwrap();

    let Err(BuilderError::Validation { missing }) = missing else {
        panic!("expected validation failure");
    };
    let missing: HashSet<String> = missing.into_iter().collect();
    let expected: HashSet<String> = [
        "tealium.account",
        "tealium.profile",
        "attribution",
        "user.visitor_type",
        "user.signed_in",
        "user.device",
        "user.channel",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(missing, expected);
}

#[tokio::test]
async fn test_complete_payload_is_dispatched_once_per_call() {
    let transport = RecordingTransport::new();
    let (client, service_a) = services(&transport);

    for i in 0..3 {
        assert_eq!(service_a.call(i, true).await, "test");
    }

    client.shutdown().await;

    let payloads = transport.json_payloads();
    assert_eq!(payloads.len(), 3);

    let mut urls: Vec<&str> = payloads
        .iter()
        .map(|p| p["page"]["url"].as_str().unwrap())
        .collect();
    urls.sort();
    assert_eq!(
        urls,
        ["0_https://test.com", "1_https://test.com", "2_https://test.com"]
    );

    for payload in &payloads {
        assert_eq!(payload["user"]["email"]["hidden"], true);
        assert_eq!(payload["user"]["device"]["os_version"], "17.1");
        assert_eq!(payload["environment"], "env");
    }
}
