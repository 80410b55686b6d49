//! Thing Console - Main Entry Point
//!
//! Headless console runner: establishes a session, kicks off the initial
//! device fetch and prints service notices as they arrive.

use std::time::Duration;

use chrono::Utc;

use thing_console::connection::load_config;
use thing_console::features::panel::PanelController;
use thing_console::helpers::get_or_create_data_dir;
use thing_console::services::{NoticeLevel, ServiceEvent, ServiceHub};
use thing_console::utils::format::format_datetime;

/// Idle window after which the runner assumes the burst of work is done
const DRAIN_IDLE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = get_or_create_data_dir()?;
    let file_appender = tracing_appender::rolling::daily(&data_dir, "thing-console.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(file_writer)
        .with_ansi(false)
        .init();

    tracing::info!("Starting Thing Console...");

    let config = load_config()?;
    let hub = ServiceHub::new(config)?;
    let events = hub.events();

    let panel = PanelController::new(hub, Utc::now().timestamp_millis());
    panel.startup().await;

    // Print notices until the event stream goes quiet
    while let Ok(event) = events.recv_timeout(DRAIN_IDLE) {
        match event {
            ServiceEvent::Notice { level, message } => match level {
                NoticeLevel::Error => eprintln!("error: {message}"),
                NoticeLevel::Success | NoticeLevel::Info => println!("{message}"),
            },
            ServiceEvent::TokenRefreshed { expires_at } => {
                println!("session valid until {}", format_datetime(&expires_at));
            }
            _ => {}
        }
    }

    Ok(())
}
