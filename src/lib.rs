//! Window frames for the Area window manager
//!
//! Decorates managed client windows: builds the decoration window tree,
//! reparents the client into it, keeps geometry, shape and look in step with
//! the client, and routes windowing-system events to the right frame.

pub mod config;
pub mod shared;
pub mod wm;
pub mod x11_async;

pub use config::Config;
pub use wm::WindowManager;
pub use wm::display::{Display, FrameError};
pub use wm::frame::Frame;
