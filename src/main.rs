//! Padbridge - Main Application
//!
//! Connects to a configured HID gamepad, decodes its reports into
//! edge-triggered events, and logs the mapped actions. Device disconnects
//! are handled by searching and reconnecting automatically.

use anyhow::Context;
use crossbeam_channel::bounded;
use log::{debug, info};
use padbridge::dispatch::{ChannelDispatcher, DispatchNotice};
use padbridge::mapping::config::Config;
use padbridge::supervisor::Supervisor;
use padbridge::transport::{DeviceCache, HidTransport};
use std::thread;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Padbridge ===");
    println!();
    println!("This application will:");
    println!("1. Search for a configured gamepad (see configs/default.toml)");
    println!("2. Decode its input reports into button/axis events");
    println!("3. Log the mapped actions (unmapped inputs show their index)");
    println!("4. Reconnect automatically if the controller goes away");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Load and validate configuration; an invalid layout refuses to start
    let config = Config::load_default().context("loading configs/default.toml")?;

    let transport = HidTransport::new().context("initializing HID backend")?;

    // Actions fan out over a channel to a consumer thread, which stands in
    // for the remote command endpoint
    let (sender, receiver) = bounded(100);
    let dispatcher = ChannelDispatcher::new(sender);

    let consumer = thread::Builder::new()
        .name("dispatch".to_string())
        .spawn(move || {
            for notice in receiver {
                match notice {
                    DispatchNotice::Action(action) => info!("Action: {}", action.name),
                    DispatchNotice::NoMapping(event) => debug!("No mapping for {:?}", event),
                }
            }
            debug!("Dispatch consumer exited");
        })
        .context("spawning dispatch consumer")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
            signal_token.cancel();
        }
    });

    let mut supervisor =
        Supervisor::new(config, transport, dispatcher, shutdown).with_cache(DeviceCache::load());
    supervisor.run().await;

    // Dropping the supervisor drops the channel sender; the consumer drains
    // whatever is left and exits
    drop(supervisor);
    let _ = consumer.join();

    Ok(())
}
