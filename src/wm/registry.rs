//! Window registry
//!
//! Maps every window handle a managed client owns (its own window plus all
//! of its frame's decoration windows) back to the client. The dispatch layer
//! uses it to find which frame an event belongs to.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::wm::display::Window;

#[derive(Debug, Default)]
pub struct WindowRegistry {
    handles: HashMap<Window, Window>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `handles` (and the client window itself) to `client`
    pub fn register(&mut self, client: Window, handles: &[Window]) {
        for &handle in std::iter::once(&client).chain(handles) {
            if let Some(previous) = self.handles.insert(handle, client) {
                if previous != client {
                    warn!(
                        "Window 0x{:x} moved from client 0x{:x} to 0x{:x}",
                        handle, previous, client
                    );
                }
            }
        }
        debug!("Registered {} handles for client 0x{:x}", handles.len() + 1, client);
    }

    /// Drop every handle routed to `client`
    pub fn unregister(&mut self, client: Window) {
        self.handles.retain(|_, owner| *owner != client);
        debug!("Unregistered client 0x{:x}", client);
    }

    /// The client a handle belongs to
    pub fn lookup(&self, handle: Window) -> Option<Window> {
        self.handles.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Forget everything (manager shutdown)
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
