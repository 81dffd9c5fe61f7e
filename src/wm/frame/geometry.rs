/// Geometry settings of the frame decorations
///
/// Base metrics are filled in from the style and by `Frame::adjust_size`;
/// the rest is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameGeometry {
    /// Width of the titlebar and handle
    pub width: u32,
    pub font_height: u32,
    pub label_width: u32,
    /// Static, from the style
    pub handle_height: u32,
    pub handle_y: i32,
    /// Static, from the style
    pub button_size: u32,
    /// Static, from the style
    pub bevel: u32,
    /// Frame elements' border width
    pub bwidth: u32,
    /// Client border width
    pub cbwidth: u32,
}

impl FrameGeometry {
    pub fn title_height(&self) -> u32 {
        self.font_height + self.bevel * 2
    }

    pub fn label_height(&self) -> u32 {
        self.font_height
    }

    pub fn grip_width(&self) -> u32 {
        self.button_size * 2
    }
}
