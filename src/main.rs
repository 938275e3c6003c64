// MIT License - Copyright (c) 2026 Peter Wright
// MQTT bridge

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rumqttc::{AsyncClient, Event, LastWill, MqttOptions, Outgoing, Packet, QoS};
use serde::Deserialize;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use econnect_bridge::constants::AVAILABILITY_OFFLINE;
use econnect_bridge::{
    Coordinator, EntryConfig, ExperimentalConfig, IntegrationConfig, MqttPlatform, SharedDevice,
    Topics,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "econnect2mqtt")]
#[command(about = "Expose e-Connect / Metronet alarm sectors, inputs and alerts as Home Assistant binary sensors")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Config {
    entry: EntryConfig,
    mqtt: MqttToml,
    #[serde(default)]
    experimental: ExperimentalConfig,
}

#[derive(Debug, Deserialize)]
struct MqttToml {
    url: String,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_base_topic")]
    base_topic: String,
    #[serde(default = "default_discovery_prefix")]
    discovery_prefix: String,
}

fn default_client_id() -> String {
    "econnect-bridge".to_string()
}
fn default_base_topic() -> String {
    "econnect".to_string()
}
fn default_discovery_prefix() -> String {
    "homeassistant".to_string()
}

fn load_config(path: &str) -> Result<Config> {
    let text = std::fs::read_to_string(path).context("Failed to read config file")?;
    let config: Config = toml::from_str(&text).context("Failed to parse config file")?;
    config.entry.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug or RUST_LOG=econnect_bridge=trace).
    // Default: info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // systemd journal already adds timestamps, so omit them when running under systemd
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt().without_time().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let (mqtt_host, mqtt_port) = parse_mqtt_url(&config.mqtt.url)?;

    let entry = Arc::new(config.entry);
    let integration = IntegrationConfig { experimental: config.experimental };
    if integration.force_update() {
        info!("Experimental force_update enabled");
    }
    let device = Arc::new(SharedDevice::default());
    let coordinator = Arc::new(Coordinator::new(integration, device));
    let topics = Topics::new(&config.mqtt.base_topic, &config.mqtt.discovery_prefix);
    let snapshot_topic = topics.snapshot();

    // Set up MQTT
    let mut mqtt_opts = MqttOptions::new(&config.mqtt.client_id, &mqtt_host, mqtt_port);
    mqtt_opts.set_keep_alive(Duration::from_secs(30));
    mqtt_opts.set_last_will(LastWill::new(
        topics.availability(),
        AVAILABILITY_OFFLINE,
        QoS::AtLeastOnce,
        true,
    ));
    let (client, mut eventloop) = AsyncClient::new(mqtt_opts, 256);
    let platform = Arc::new(Mutex::new(MqttPlatform::new(client.clone(), topics, &entry)));

    let mut sigterm = signal(SignalKind::terminate())?;

    // Task 1: coordinator events → entity setup and state publishing
    let mut event_rx = coordinator.subscribe();
    let coordinator_events = Arc::clone(&coordinator);
    let platform_events = Arc::clone(&platform);
    let entry_events = Arc::clone(&entry);
    let event_handle = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let mut platform = platform_events.lock().await;
                    platform.on_event(event, &entry_events, &coordinator_events).await;
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    // Only the newest state matters; the next refresh catches up
                    warn!("Event receiver lagged, missed {n} events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    info!("Event channel closed");
                    break;
                }
            }
        }
    });

    // Task 2: MQTT event loop (receives device snapshots)
    let coordinator_mqtt = Arc::clone(&coordinator);
    let client_mqtt = client.clone();
    let mut mqtt_handle = tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    // rumqttc does not auto-resubscribe after a broker restart
                    info!("MQTT: connected, subscribing to {snapshot_topic}");
                    if let Err(e) = client_mqtt.subscribe(&snapshot_topic, QoS::AtLeastOnce).await {
                        error!("Failed to subscribe to {snapshot_topic}: {e}");
                    }
                }
                Ok(Event::Incoming(Packet::Publish(msg))) => {
                    if msg.topic == snapshot_topic {
                        let payload = String::from_utf8_lossy(&msg.payload);
                        debug!("Snapshot received ({} bytes)", payload.len());
                        if let Err(e) = coordinator_mqtt.apply_json(&payload) {
                            warn!("Failed to apply snapshot: {e}");
                        }
                    }
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    info!("MQTT: disconnected");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("MQTT event loop error: {e}");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    });

    // Wait for a signal
    info!("MQTT bridge running. Send SIGINT/SIGTERM to stop.");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    event_handle.abort();

    platform.lock().await.publish_availability(false).await;
    if let Err(e) = client.disconnect().await {
        warn!("Error disconnecting from MQTT: {e}");
    }
    // Let the event loop flush the offline message and the disconnect
    if tokio::time::timeout(Duration::from_secs(2), &mut mqtt_handle).await.is_err() {
        warn!("MQTT event loop did not stop in time");
        mqtt_handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

/// Parse an MQTT URL like "mqtt://host:port" into (host, port).
fn parse_mqtt_url(url: &str) -> Result<(String, u16)> {
    let stripped = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port_str) = stripped
        .rsplit_once(':')
        .context("MQTT URL must be in format mqtt://host:port")?;

    let port: u16 = port_str
        .parse()
        .context("Invalid MQTT port number")?;

    Ok((host.to_string(), port))
}
