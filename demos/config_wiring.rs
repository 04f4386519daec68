//! Config-driven wiring example
//!
//! Parses an `SdkConfig` from JSON and uses the collaborator registry
//! to build the ad server and analytics transport it names. No network
//! traffic happens here; the transport is only constructed.

use adkit_core::config::SdkConfig;
use adkit_core::traits::{AdServer, AnalyticsTransport};
use adkit_core::{AdUnit, CollaboratorRegistry, EventTracker, Result};

const CONFIG_JSON: &str = r#"
{
    "ad_server": { "type": "canned" },
    "analytics": {
        "type": "http",
        "endpoint": "https://analytics.example.com/v1/events",
        "api_key": null
    },
    "tracker": { "event_channel_capacity": 128 },
    "units": [
        { "size": "banner", "should_autoload": false },
        { "size": "interstitial", "ad_type": "incentivized" }
    ]
}
"#;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Config-Driven Wiring Example ===\n");

    // Parse and validate the configuration
    let config: SdkConfig = serde_json::from_str(CONFIG_JSON)?;
    config.validate()?;
    println!("1. Config parsed: {} unit(s)", config.units.len());

    // Register available collaborators
    let registry = CollaboratorRegistry::new();
    adkit_analytics_http::register(&registry);
    println!("2. Registered transports: {:?}", registry.list_transports());

    // Build collaborators from config
    let ad_server = registry.create_ad_server(&config.ad_server)?;
    let transport = registry.create_transport(&config.analytics)?;
    println!(
        "3. Built server '{}' and transport '{}'",
        ad_server.server_name(),
        transport.transport_name()
    );

    // Build the tracker and one handle per configured unit
    let (_tracker, _events) = EventTracker::new(transport, &config.tracker)?;

    let mut handles = Vec::new();
    for unit_config in &config.units {
        let (unit, handle) = AdUnit::new(unit_config.clone(), ad_server.clone())?;
        tokio::spawn(unit.run());
        handles.push(handle);
    }

    for handle in &handles {
        println!(
            "4. Unit {} serves {} {} ads",
            handle.id(),
            handle.size(),
            handle.ad_type()
        );
    }

    println!("\n=== Wiring Successful ===");
    Ok(())
}
