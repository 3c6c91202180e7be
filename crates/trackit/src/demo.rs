//! Two-service demo
//!
//! `ServiceA` records the event, page name, email flag and environment, then
//! calls `ServiceB`, which records the page URL from a nested `track` call on
//! the same context. Each call to `ServiceA` produces one payload.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use trackit_client::{Attribute, Value};
use trackit_config::Config;
use trackit_tracking::{TrackingClient, TrackingContext};

/// Demo arguments
#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Number of concurrent calls to ServiceA
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,

    /// Fill every required field so payloads pass validation
    #[arg(long)]
    pub complete: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            count: 1,
            complete: false,
        }
    }
}

/// Leaf service: records the page URL
pub struct ServiceB {
    context: TrackingContext,
}

impl ServiceB {
    pub fn new(context: TrackingContext) -> Self {
        Self { context }
    }

    pub async fn call(&self, i: u32) -> Result<String> {
        let result = self
            .context
            .track(move |tracker| async move {
                tracker.set(Attribute::PageUrl, format!("{i}_https://test.com"));
                Ok::<_, Infallible>("test".to_string())
            })
            .await;
        Ok(result?)
    }
}

/// Entry service: records the event, then delegates to [`ServiceB`]
pub struct ServiceA {
    context: TrackingContext,
    service_b: Arc<ServiceB>,
    complete: bool,
}

impl ServiceA {
    pub fn new(context: TrackingContext, service_b: Arc<ServiceB>, complete: bool) -> Self {
        Self {
            context,
            service_b,
            complete,
        }
    }

    pub async fn call(&self, i: u32) -> Result<String> {
        let service_b = Arc::clone(&self.service_b);
        let complete = self.complete;

        self.context
            .track(move |tracker| async move {
                tracker.set_all([
                    (Attribute::TealiumEvent, Value::string(format!("Event#{i}"))),
                    (Attribute::PageName, Value::string("Home")),
                    (Attribute::EmailHidden, Value::boolean(true)),
                    (Attribute::Environment, Value::string("env")),
                ]);

                if complete {
                    tracker.set_all([
                        (Attribute::TealiumAccount, Value::string("demo")),
                        (Attribute::TealiumProfile, Value::string("main")),
                        (Attribute::UserVisitorType, Value::string("guest")),
                        (Attribute::UserSignedIn, Value::boolean(false)),
                        (Attribute::DeviceType, Value::string("desktop")),
                        (Attribute::UserChannel, Value::string("web")),
                        (Attribute::Attribution, Value::string("direct")),
                    ]);
                }

                service_b.call(i).await
            })
            .await
    }
}

/// Run the demo and wait for every dispatch before returning
pub async fn run(config: &Config, args: DemoArgs) -> Result<()> {
    let client = TrackingClient::from_config(&config.transport)
        .context("failed to create tracking transport")?;
    info!(
        transport = client.transport_name(),
        count = args.count,
        complete = args.complete,
        "Starting demo"
    );

    let context = TrackingContext::new(client.clone());
    let service_b = Arc::new(ServiceB::new(context.clone()));
    let service_a = Arc::new(ServiceA::new(context, service_b, args.complete));

    let mut calls = Vec::with_capacity(args.count as usize);
    for i in 0..args.count {
        let service_a = Arc::clone(&service_a);
        calls.push(tokio::spawn(async move {
            let started = Instant::now();
            let response = service_a.call(i).await;
            (i, response, started.elapsed())
        }));
    }

    for call in calls {
        let (i, response, elapsed) = call.await?;
        let response = response?;
        info!(call = i, response = %response, elapsed_ms = elapsed.as_millis() as u64, "Call completed");
    }

    client.shutdown().await;
    let stats = client.stats();
    info!(
        dispatched = stats.dispatched,
        failed_validation = stats.failed_validation,
        failed_transport = stats.failed_transport,
        "Demo finished"
    );

    Ok(())
}
