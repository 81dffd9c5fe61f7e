//! Events Module
//!
//! Backend-neutral notifications the dispatch layer routes to frames, and
//! the capability a frame implements to receive the ones aimed at its own
//! windows.

use crate::shared::Rect;
use crate::wm::client::Client;
use crate::wm::client_flags::ClientState;
use crate::wm::display::{Display, FrameError, Window};

/// A notification from the windowing system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    MapRequest {
        window: Window,
    },
    /// Only the fields the client asked to change are set
    ConfigureRequest {
        window: Window,
        x: Option<i32>,
        y: Option<i32>,
        width: Option<u32>,
        height: Option<u32>,
        border_width: Option<u32>,
    },
    UnmapNotify {
        window: Window,
    },
    DestroyNotify {
        window: Window,
    },
    TitleChanged {
        window: Window,
        title: String,
    },
    FocusIn {
        window: Window,
    },
    FocusOut {
        window: Window,
    },
    ShapeChanged {
        window: Window,
        shape: Option<Vec<Rect>>,
    },
    StateChanged {
        window: Window,
        state: ClientState,
    },
    Expose {
        window: Window,
        /// Number of Expose events still following this one
        count: u16,
    },
    EnterNotify {
        window: Window,
    },
    LeaveNotify {
        window: Window,
    },
    ButtonPress {
        window: Window,
        button: u8,
        root_x: i32,
        root_y: i32,
    },
}

impl FrameEvent {
    /// The window the event is about
    pub fn window(&self) -> Window {
        match self {
            FrameEvent::MapRequest { window }
            | FrameEvent::ConfigureRequest { window, .. }
            | FrameEvent::UnmapNotify { window }
            | FrameEvent::DestroyNotify { window }
            | FrameEvent::TitleChanged { window, .. }
            | FrameEvent::FocusIn { window }
            | FrameEvent::FocusOut { window }
            | FrameEvent::ShapeChanged { window, .. }
            | FrameEvent::StateChanged { window, .. }
            | FrameEvent::Expose { window, .. }
            | FrameEvent::EnterNotify { window }
            | FrameEvent::LeaveNotify { window }
            | FrameEvent::ButtonPress { window, .. } => *window,
        }
    }
}

/// Result of event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled successfully
    Handled,
    /// Event should be ignored
    Ignore,
    /// Event needs further processing
    Continue,
}

/// Event handler trait for modular event processing
pub trait EventHandler {
    /// Handle an event aimed at one of this handler's windows
    fn handle_event(
        &mut self,
        display: &dyn Display,
        client: &Client,
        event: &FrameEvent,
    ) -> Result<EventResult, FrameError>;
}
