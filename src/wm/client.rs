use crate::shared::{Rect, Size};
use crate::wm::client_flags::{ClientState, Decorations};
use crate::wm::display::{ClientInfo, Window};
use crate::wm::frame::gravity::Gravity;

/// Window Manager client state
/// Represents a window being managed by the WM
///
/// Frames only ever read a client; all changes go through here.
#[derive(Debug, Clone)]
pub struct Client {
    /// X11 window ID
    pub window: Window,

    /// Requested position (at the gravity reference point) and size,
    /// root coordinates
    pub area: Rect,

    /// Border width the client had before it was framed
    pub border_width: u32,

    pub gravity: Gravity,

    /// Window title
    pub title: String,

    /// Client-relative bounding shape, if shaped
    pub shape: Option<Vec<Rect>>,

    pub state: ClientState,

    pub decorations: Decorations,

    /// Unmap notifications caused by our own reparenting
    pub ignore_unmaps: u32,
}

impl Client {
    pub fn new(window: Window, area: Rect) -> Self {
        Self {
            window,
            area,
            border_width: 0,
            gravity: Gravity::default(),
            title: String::new(),
            shape: None,
            state: ClientState::default(),
            decorations: Decorations::default(),
            ignore_unmaps: 0,
        }
    }

    pub fn from_info(info: ClientInfo) -> Self {
        let mut state = ClientState::default();
        state.set(ClientState::SHAPED, info.shape.is_some());
        state.set(ClientState::ICONIC, info.iconic);
        Self {
            window: info.window,
            area: info.geometry,
            border_width: info.border_width,
            gravity: info.gravity,
            title: info.title,
            shape: info.shape,
            state,
            decorations: Decorations::default(),
            ignore_unmaps: 0,
        }
    }

    pub fn focused(&self) -> bool {
        self.state.contains(ClientState::FOCUSED)
    }

    pub fn shaded(&self) -> bool {
        self.state.contains(ClientState::SHADED)
    }

    pub fn iconic(&self) -> bool {
        self.state.contains(ClientState::ICONIC)
    }

    pub fn shaped(&self) -> bool {
        self.shape.is_some()
    }

    pub fn resize(&mut self, size: Size) {
        self.area = self.area.with_size(size);
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.area = self.area.with_position(x, y);
    }

    pub fn set_shape(&mut self, shape: Option<Vec<Rect>>) {
        self.state.set(ClientState::SHAPED, shape.is_some());
        self.shape = shape;
    }
}
