//! Display Module
//!
//! The windowing-system surface the frame core talks to. Frames never hold a
//! connection; every operation receives a `&dyn Display` and issues its
//! requests through it. `wm::x11` implements this over x11rb.

use bitflags::bitflags;
use thiserror::Error;

use crate::shared::{Rect, Size, Strut};
use crate::wm::frame::gravity::Gravity;
use crate::wm::style::Texture;

/// Opaque window handle, only meaningful to the backend
pub type Window = u32;

/// Errors raised by frame operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("client window 0x{0:x} is already grabbed by its frame")]
    AlreadyGrabbed(Window),
    #[error("client window 0x{0:x} is not grabbed by its frame")]
    NotGrabbed(Window),
    #[error("frame for client 0x{0:x} destroyed while still holding the client")]
    StillGrabbed(Window),
    #[error("frame for client 0x{0:x} has no decoration windows")]
    Destroyed(Window),
    #[error("window 0x{0:x} is not managed")]
    UnknownWindow(Window),
    #[error("invalid title layout: {0}")]
    InvalidLayout(String),
    #[error("windowing system error: {0}")]
    Backend(String),
}

bitflags! {
    /// Events a window asks to be told about
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventMask: u32 {
        const ENTER_WINDOW          = 1 << 0;
        const LEAVE_WINDOW          = 1 << 1;
        const BUTTON_PRESS          = 1 << 2;
        const BUTTON_RELEASE        = 1 << 3;
        const BUTTON_MOTION         = 1 << 4;
        const EXPOSURE              = 1 << 5;
        const STRUCTURE_NOTIFY      = 1 << 6;
        const SUBSTRUCTURE_NOTIFY   = 1 << 7;
        const SUBSTRUCTURE_REDIRECT = 1 << 8;
        const PROPERTY_CHANGE       = 1 << 9;
        const FOCUS_CHANGE          = 1 << 10;
    }
}

/// Attributes for a newly created window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowAttributes {
    pub background: Option<u32>,
    pub border_color: Option<u32>,
    pub event_mask: EventMask,
    pub override_redirect: bool,
}

/// A partial reconfiguration; fields left `None` are not touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
}

impl WindowChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What the backend knows about a window about to be managed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientInfo {
    pub window: Window,
    pub geometry: Rect,
    pub border_width: u32,
    pub gravity: Gravity,
    pub title: String,
    /// Bounding shape rectangles, client-relative, if the client is shaped
    pub shape: Option<Vec<Rect>>,
    pub mapped: bool,
    pub iconic: bool,
}

/// Window tree operations
pub trait WindowSystem {
    fn root(&self) -> Window;

    fn create_window(
        &self,
        parent: Window,
        rect: Rect,
        attrs: &WindowAttributes,
    ) -> Result<Window, FrameError>;
    fn destroy_window(&self, window: Window) -> Result<(), FrameError>;
    fn reparent_window(&self, window: Window, parent: Window, x: i32, y: i32)
    -> Result<(), FrameError>;

    fn map_window(&self, window: Window) -> Result<(), FrameError>;
    fn unmap_window(&self, window: Window) -> Result<(), FrameError>;

    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<(), FrameError>;
    fn resize_window(&self, window: Window, size: Size) -> Result<(), FrameError>;
    fn set_border_width(&self, window: Window, width: u32) -> Result<(), FrameError>;
    fn set_border_color(&self, window: Window, pixel: u32) -> Result<(), FrameError>;
    /// Apply only the fields present in `changes`, in one request
    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<(), FrameError>;

    fn select_input(&self, window: Window, mask: EventMask) -> Result<(), FrameError>;
    fn change_save_set(&self, window: Window, insert: bool) -> Result<(), FrameError>;

    /// Set the bounding shape of `window`; `None` clears it back to a rectangle
    fn set_shape(&self, window: Window, rects: Option<&[Rect]>) -> Result<(), FrameError>;

    /// Publish how much decoration surrounds `client`
    fn set_frame_extents(&self, client: Window, extents: &Strut) -> Result<(), FrameError>;

    /// Tell `client` where it really is, in root coordinates
    fn send_configure_notify(
        &self,
        client: Window,
        rect: Rect,
        border_width: u32,
    ) -> Result<(), FrameError>;

    fn query_client(&self, window: Window) -> Result<ClientInfo, FrameError>;

    fn flush(&self) -> Result<(), FrameError>;
}

/// Paints decoration surfaces
pub trait Painter {
    /// Load the label font; backends fall back to their default on failure.
    ///
    /// `char_width` is the advance assumed for text the font can't measure.
    fn set_font(&self, font: &str, char_width: u32) -> Result<(), FrameError>;

    /// Width of `text` in the label font, in pixels
    fn text_width(&self, text: &str) -> u32;

    /// Fill `window` with `texture`
    fn paint(&self, window: Window, size: Size, texture: &Texture) -> Result<(), FrameError>;

    /// Draw `text` with its top-left corner at `(x, y)`
    fn paint_text(
        &self,
        window: Window,
        x: i32,
        y: i32,
        text: &str,
        color: u32,
    ) -> Result<(), FrameError>;
}

/// A complete backend: window tree plus painting
pub trait Display: WindowSystem + Painter {}

impl<T: WindowSystem + Painter + ?Sized> Display for T {}
