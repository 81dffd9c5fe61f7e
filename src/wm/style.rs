//! Render style
//!
//! The read-only style resource every frame decorates with, and the
//! capability through which frames hear about theme changes.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::wm::client::Client;
use crate::wm::display::{Display, FrameError};

/// Bevel drawn around a flat fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relief {
    #[default]
    Flat,
    Raised,
    Sunken,
}

/// How a decoration surface is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    /// Pixel value (0xRRGGBB on TrueColor visuals)
    pub color: u32,
    pub relief: Relief,
}

impl Texture {
    pub fn flat(color: u32) -> Self {
        Self {
            color,
            relief: Relief::Flat,
        }
    }

    pub fn raised(color: u32) -> Self {
        Self {
            color,
            relief: Relief::Raised,
        }
    }
}

/// Label text placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Decoration surfaces that carry a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Title,
    Label,
    Handle,
    Grip,
    Button,
}

/// Focused/unfocused pair of textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexturePair {
    pub focused: Texture,
    pub unfocused: Texture,
}

impl TexturePair {
    pub fn pick(&self, focused: bool) -> &Texture {
        if focused {
            &self.focused
        } else {
            &self.unfocused
        }
    }
}

/// Everything a frame needs from the theme
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub frame_border_width: u32,
    pub client_border_width: u32,
    pub bevel: u32,
    pub button_size: u32,
    pub handle_height: u32,
    /// Core font name for the label
    pub font: String,
    pub font_height: u32,
    /// Per-character advance used when the backend can't measure text
    pub font_char_width: u32,
    pub label_justify: Justify,

    pub frame_border_color: u32,
    pub client_border_color: u32,
    pub title: TexturePair,
    pub label: TexturePair,
    pub handle: TexturePair,
    pub grip: TexturePair,
    pub button: TexturePair,
    pub text_focus: u32,
    pub text_unfocus: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        // Nord
        Self {
            frame_border_width: 1,
            client_border_width: 0,
            bevel: 2,
            button_size: 12,
            handle_height: 6,
            font: "fixed".to_string(),
            font_height: 13,
            font_char_width: 6,
            label_justify: Justify::Left,
            frame_border_color: 0x2e3440,
            client_border_color: 0x2e3440,
            title: TexturePair {
                focused: Texture::raised(0x5e81ac),
                unfocused: Texture::raised(0x3b4252),
            },
            label: TexturePair {
                focused: Texture::flat(0x5e81ac),
                unfocused: Texture::flat(0x3b4252),
            },
            handle: TexturePair {
                focused: Texture::raised(0x5e81ac),
                unfocused: Texture::raised(0x3b4252),
            },
            grip: TexturePair {
                focused: Texture::raised(0x81a1c1),
                unfocused: Texture::raised(0x4c566a),
            },
            button: TexturePair {
                focused: Texture::raised(0x81a1c1),
                unfocused: Texture::raised(0x4c566a),
            },
            text_focus: 0xeceff4,
            text_unfocus: 0xd8dee9,
        }
    }
}

impl RenderStyle {
    /// Clamp metrics that would make layout degenerate
    pub fn clamped(mut self) -> Self {
        self.font_height = self.font_height.max(1);
        // a button fits inside the titlebar
        self.button_size = self
            .button_size
            .max(1)
            .min(self.font_height + self.bevel * 2);
        self.handle_height = self.handle_height.max(1);
        self.font_char_width = self.font_char_width.max(1);
        self
    }

    pub fn texture(&self, element: Element, focused: bool) -> &Texture {
        let pair = match element {
            Element::Title => &self.title,
            Element::Label => &self.label,
            Element::Handle => &self.handle,
            Element::Grip => &self.grip,
            Element::Button => &self.button,
        };
        pair.pick(focused)
    }

    pub fn text_color(&self, focused: bool) -> u32 {
        if focused {
            self.text_focus
        } else {
            self.text_unfocus
        }
    }
}

/// Receives theme-change broadcasts
pub trait StyleNotify {
    /// Re-apply `style` and bring every visible element up to date with it
    fn style_changed(
        &mut self,
        display: &dyn Display,
        client: &Client,
        style: Rc<RenderStyle>,
    ) -> Result<(), FrameError>;
}
