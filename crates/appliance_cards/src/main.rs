//! Demo binary: mounts the configured cards against a simulated host store
//! and logs every view transition and dispatched service call.

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::prelude::*;

use appliance_cards::cards::view::CardView;
use appliance_cards::config::{CardDefinition, Config};
use appliance_cards::store::{ServiceCallReceiver, StateSnapshot};
use appliance_cards::{mount, CardHandle, CycleCard, Host, StatsCard};

#[derive(Parser)]
#[command(about = "Appliance dashboard cards over a simulated host")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "appliance_cards.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(config.logging.targets()))
        .init();

    info!("appliance_cards starting");
    info!("Loaded config from: {}", args.config);

    let (host, service_rx) = Host::new();
    seed_demo_appliance(&host);
    tokio::spawn(log_service_calls(service_rx));

    let mut handles: Vec<CardHandle> = Vec::new();
    for card in &config.cards {
        let handle = match card {
            CardDefinition::Cycle(c) => {
                let card = CycleCard::new(c.clone(), &config.display.currency)?;
                mount(card, host.clone())
            }
            CardDefinition::Stats(c) => {
                let card = StatsCard::new(c.clone(), &config.display.currency)?;
                mount(card, host.clone())
            }
        };
        info!("mounted card for {}", card.entity());
        tokio::spawn(log_view_transitions(handle.subscribe()));
        handles.push(handle);
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    for handle in handles {
        handle.unmount().await;
    }

    Ok(())
}

/// Populate the store with one washing machine mid-cycle so the cards have
/// something to show.
fn seed_demo_appliance(host: &Host) {
    host.set_state(
        "sensor.washing_machine_state",
        StateSnapshot::new(
            "running",
            json!({
                "friendly_name": "Washing Machine",
                "appliance_type": "washing_machine",
                "current_power": 1850.0,
            }),
        ),
    );
    host.set_state(
        "sensor.washing_machine_cycle_duration",
        StateSnapshot::new("1260", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_cycle_energy",
        StateSnapshot::new("0.42", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_cycle_cost",
        StateSnapshot::new("0.10", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_daily_cycles",
        StateSnapshot::new("2", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_daily_cost",
        StateSnapshot::new("0.38", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_monthly_cost",
        StateSnapshot::new("8.70", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_last_cycle_duration",
        StateSnapshot::new("4980", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_last_cycle_energy",
        StateSnapshot::new("0.8", json!({})),
    );
    host.set_state(
        "sensor.washing_machine_last_cycle_cost",
        StateSnapshot::new("0.19", json!({})),
    );
    host.set_state(
        "binary_sensor.washing_machine_unplugged",
        StateSnapshot::new("off", json!({})),
    );
    host.set_state(
        "binary_sensor.washing_machine_duration_alert",
        StateSnapshot::new("off", json!({})),
    );
    host.set_state(
        "switch.washing_machine_monitoring",
        StateSnapshot::new("on", json!({})),
    );
}

async fn log_view_transitions(mut views: tokio::sync::watch::Receiver<CardView>) {
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        match serde_json::to_string(&view) {
            Ok(rendered) => info!("view: {rendered}"),
            Err(e) => tracing::warn!("view serialization failed: {e}"),
        }
    }
}

async fn log_service_calls(mut calls: ServiceCallReceiver) {
    while let Some(call) = calls.recv().await {
        info!("service call: {}.{} {}", call.domain, call.service, call.data);
    }
}
