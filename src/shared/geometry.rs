//! Rectangles, sizes and struts
//!
//! All positions are in root-window coordinates unless a caller says
//! otherwise. Sizes are unsigned; positions may be negative (windows can sit
//! partially off-screen).

/// Width and height of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Same size, new top-left corner
    pub fn with_position(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    /// Same top-left corner, new size
    pub fn with_size(&self, size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..*self
        }
    }

    /// Translate by `(dx, dy)`
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Thickness on each side of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strut {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Strut {
    pub fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn uniform(width: u32) -> Self {
        Self::new(width, width, width, width)
    }

    /// Grow every side by `width`
    pub fn grown(&self, width: u32) -> Self {
        Self {
            left: self.left + width,
            right: self.right + width,
            top: self.top + width,
            bottom: self.bottom + width,
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}
