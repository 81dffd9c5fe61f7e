//! area-frame
//!
//! A minimal decorating window manager: frames every client with a titlebar,
//! handle and border, and keeps the frames in step with their clients.

use anyhow::{Context, Result};
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use x11rb::protocol::Event;

use area_frame::config::Config;
use area_frame::wm::WindowManager;
use area_frame::wm::display::WindowSystem;
use area_frame::wm::x11::X11Display;
use area_frame::x11_async::X11EventStream;

struct Signals {
    hangup: Signal,
    terminate: Signal,
    interrupt: Signal,
}

impl Signals {
    fn new() -> Result<Self> {
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }
}

/// Re-read the config file and restyle every frame
fn reload(wm: &mut WindowManager<X11Display>) -> Result<()> {
    let config = Config::load().context("Failed to reload configuration")?;
    let layout = config.title_layout()?;
    wm.set_layout(layout);
    wm.set_style(config.to_style())
        .context("Failed to apply reloaded style")?;
    info!("Configuration reloaded");
    Ok(())
}

/// Dispatch X11 events until a terminating signal arrives
async fn run(
    wm: &mut WindowManager<X11Display>,
    stream: &X11EventStream,
    signals: &mut Signals,
) -> Result<()> {
    loop {
        // x11rb may already hold events read alongside replies
        for event in stream.drain().context("X11 connection lost")? {
            if let Event::Error(e) = &event {
                debug!("X11 error: {:?}", e);
                continue;
            }
            let Some(event) = wm.display().translate(&event) else {
                continue;
            };
            if let Err(e) = wm.handle_event(&event) {
                warn!("Failed to handle {:?}: {}", event, e);
            }
        }
        stream.flush().context("Failed to flush X11 requests")?;

        tokio::select! {
            () = stream.wait_readable() => {}
            _ = signals.hangup.recv() => {
                info!("Received SIGHUP, reloading configuration");
                if let Err(e) = reload(wm) {
                    error!("{:#}", e);
                }
            }
            _ = signals.terminate.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
                return Ok(());
            }
            _ = signals.interrupt.recv() => {
                info!("Received SIGINT, shutting down gracefully");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "area_frame=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting area-frame");

    let config = Config::load().context("Failed to load configuration")?;
    let layout = config.title_layout()?;

    let display = X11Display::connect(None).context("Failed to connect to X server")?;
    display
        .become_wm()
        .context("Failed to become the window manager")?;
    let stream = X11EventStream::new(display.connection())?;
    let existing = display
        .existing_clients()
        .context("Failed to list existing windows")?;

    let mut wm = WindowManager::new(display, config.to_style(), layout)
        .context("Failed to set up the window manager")?;
    for window in existing {
        if let Err(e) = wm.manage(window, true) {
            warn!("Could not manage existing window 0x{:x}: {}", window, e);
        }
    }
    wm.display().flush()?;

    let mut signals = Signals::new()?;
    let result = run(&mut wm, &stream, &mut signals).await;

    info!("Releasing {} clients", wm.managed_count());
    wm.shutdown().context("Failed to release clients")?;
    result
}
