//! Mouse contexts
//!
//! Which part of a frame a pointer event landed on. The input layer uses this
//! to decide between drag-move, drag-resize, raise and button activation.

/// Region of a frame a window handle stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseContext {
    /// The container, i.e. the outer border
    Frame,
    Titlebar,
    Label,
    Handle,
    LeftGrip,
    RightGrip,
    /// Titlebar button by index into the frame's buttons
    Button(usize),
    ClientArea,
    /// Not a window of this frame
    None,
}

impl MouseContext {
    pub fn is_none(&self) -> bool {
        matches!(self, MouseContext::None)
    }

    /// Dragging this region moves the window
    pub fn moves(&self) -> bool {
        matches!(self, MouseContext::Titlebar | MouseContext::Label)
    }

    /// Dragging this region resizes the window
    pub fn resizes(&self) -> bool {
        matches!(
            self,
            MouseContext::Handle | MouseContext::LeftGrip | MouseContext::RightGrip
        )
    }
}
