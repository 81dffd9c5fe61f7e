//! X11 Async Event Stream
//!
//! Wakes the tokio loop when the X11 socket becomes readable, using mio in a
//! blocking-pool thread the way LeftWM does.

use std::os::unix::io::AsRawFd;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use tokio::sync::{Notify, oneshot};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// How often the poll thread checks whether the stream was dropped
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub struct X11EventStream {
    conn: Arc<RustConnection>,
    notify: Arc<Notify>,
    /// Dropping this stops the poll thread
    _task_guard: oneshot::Receiver<()>,
}

impl X11EventStream {
    pub fn new(conn: Arc<RustConnection>) -> Result<Self> {
        let fd = conn.stream().as_raw_fd();
        let notify = Arc::new(Notify::new());
        let task_notify = notify.clone();

        let (guard, task_guard) = oneshot::channel::<()>();
        let mut poll = mio::Poll::new()
            .context("Failed to create mio Poll")?;
        let mut events = mio::Events::with_capacity(1);

        poll.registry()
            .register(
                &mut mio::unix::SourceFd(&fd),
                mio::Token(0),
                mio::Interest::READABLE,
            )
            .context("Failed to register X11 FD with mio")?;

        tokio::task::spawn_blocking(move || {
            loop {
                if guard.is_closed() {
                    tracing::debug!("X11 socket polling thread shutting down");
                    return;
                }

                if let Err(err) = poll.poll(&mut events, Some(POLL_TIMEOUT)) {
                    tracing::warn!("X11 socket poll failed: {:?}", err);
                    continue;
                }

                if events.iter().any(|event| event.token() == mio::Token(0)) {
                    task_notify.notify_one();
                }
            }
        });

        Ok(Self {
            conn,
            notify,
            _task_guard: task_guard,
        })
    }

    /// Everything already queued on the connection, without blocking
    pub fn drain(&self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        while let Some(event) = self.conn.poll_for_event()? {
            events.push(event);
        }
        Ok(events)
    }

    /// Resolves once the poll thread has seen the socket readable
    pub async fn wait_readable(&self) {
        self.notify.notified().await;
    }

    pub fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }
}
