//! Window decorations (titlebar, label, handle, grips, buttons)
//!
//! The set of windows a frame is built from, plus the titlebar layout that
//! says in which order buttons and the label appear.

use tracing::{debug, warn};

use crate::shared::Rect;
use crate::wm::client_flags::Decorations;
use crate::wm::context::MouseContext;
use crate::wm::display::{EventMask, FrameError, Window, WindowAttributes, WindowSystem};
use crate::wm::style::RenderStyle;

/// Ordering slot that stands for the label rather than a button index
pub const LABEL: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Iconify,
    Maximize,
    Close,
    AllDesktops,
}

impl ButtonKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ButtonKind::Iconify),
            'M' => Some(ButtonKind::Maximize),
            'C' => Some(ButtonKind::Close),
            'S' => Some(ButtonKind::AllDesktops),
            _ => None,
        }
    }

    /// Decoration flag that enables this button
    pub fn decoration(&self) -> Decorations {
        match self {
            ButtonKind::Iconify => Decorations::ICONIFY,
            ButtonKind::Maximize => Decorations::MAXIMIZE,
            ButtonKind::Close => Decorations::CLOSE,
            ButtonKind::AllDesktops => Decorations::ALL_DESKTOPS,
        }
    }
}

/// Left-to-right arrangement of the titlebar
///
/// `order` always holds `buttons.len() + 1` entries: button indices plus one
/// `LABEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLayout {
    buttons: Vec<ButtonKind>,
    order: Vec<usize>,
}

impl TitleLayout {
    /// Parse a layout string such as `"ILMC"`
    pub fn parse(layout: &str) -> Result<Self, FrameError> {
        let mut buttons = Vec::new();
        let mut order = Vec::new();
        let mut seen_label = false;

        for c in layout.chars() {
            if c == 'L' {
                if seen_label {
                    return Err(FrameError::InvalidLayout(format!("duplicate label in {:?}", layout)));
                }
                seen_label = true;
                order.push(LABEL);
                continue;
            }
            let kind = ButtonKind::from_char(c).ok_or_else(|| {
                FrameError::InvalidLayout(format!("unknown element {:?} in {:?}", c, layout))
            })?;
            if buttons.contains(&kind) {
                return Err(FrameError::InvalidLayout(format!(
                    "duplicate button {:?} in {:?}",
                    c, layout
                )));
            }
            order.push(buttons.len());
            buttons.push(kind);
        }

        if !seen_label {
            return Err(FrameError::InvalidLayout(format!("no label in {:?}", layout)));
        }

        Ok(Self { buttons, order })
    }

    pub fn buttons(&self) -> &[ButtonKind] {
        &self.buttons
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl Default for TitleLayout {
    fn default() -> Self {
        Self {
            buttons: vec![ButtonKind::Iconify, ButtonKind::Maximize, ButtonKind::Close],
            order: vec![0, LABEL, 1, 2],
        }
    }
}

/// Event mask of the container window
pub const FRAME_EVENT_MASK: EventMask = EventMask::ENTER_WINDOW
    .union(EventMask::LEAVE_WINDOW)
    .union(EventMask::BUTTON_PRESS)
    .union(EventMask::BUTTON_RELEASE)
    .union(EventMask::BUTTON_MOTION);

/// Event mask of the painted decoration windows
pub const ELEMENT_EVENT_MASK: EventMask = EventMask::EXPOSURE
    .union(EventMask::BUTTON_PRESS)
    .union(EventMask::BUTTON_RELEASE)
    .union(EventMask::BUTTON_MOTION);

/// Every window a frame owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationWindows {
    /// Sits under everything
    pub frame: Window,
    /// Sits entirely under the client window
    pub plate: Window,
    pub title: Window,
    /// The part of the titlebar showing the window name
    pub label: Window,
    /// Bottom bar
    pub handle: Window,
    pub lgrip: Window,
    pub rgrip: Window,
    pub buttons: Vec<Window>,
    pub kinds: Vec<ButtonKind>,
    pub order: Vec<usize>,
}

impl DecorationWindows {
    /// Create the whole window set, or nothing at all
    pub fn create(
        ws: &dyn WindowSystem,
        layout: &TitleLayout,
        style: &RenderStyle,
    ) -> Result<Self, FrameError> {
        let mut created: Vec<Window> = Vec::with_capacity(7 + layout.buttons().len());
        match Self::create_all(ws, layout, style, &mut created) {
            Ok(windows) => Ok(windows),
            Err(e) => {
                warn!(
                    "Decoration creation failed after {} windows, rolling back: {}",
                    created.len(),
                    e
                );
                for &window in created.iter().rev() {
                    if let Err(err) = ws.destroy_window(window) {
                        warn!("Failed to destroy partial decoration 0x{:x}: {}", window, err);
                    }
                }
                Err(e)
            }
        }
    }

    fn create_all(
        ws: &dyn WindowSystem,
        layout: &TitleLayout,
        style: &RenderStyle,
        created: &mut Vec<Window>,
    ) -> Result<Self, FrameError> {
        let unit = Rect::new(0, 0, 1, 1);
        let mut create = |parent: Window, attrs: WindowAttributes| -> Result<Window, FrameError> {
            let window = ws.create_window(parent, unit, &attrs)?;
            created.push(window);
            Ok(window)
        };

        let element = WindowAttributes {
            background: None,
            border_color: Some(style.frame_border_color),
            event_mask: ELEMENT_EVENT_MASK,
            override_redirect: false,
        };

        let frame = create(
            ws.root(),
            WindowAttributes {
                background: Some(style.frame_border_color),
                border_color: Some(style.frame_border_color),
                event_mask: FRAME_EVENT_MASK,
                override_redirect: true,
            },
        )?;
        let plate = create(
            frame,
            WindowAttributes {
                background: None,
                border_color: Some(style.client_border_color),
                event_mask: EventMask::empty(),
                override_redirect: false,
            },
        )?;
        let title = create(frame, element)?;
        let label = create(title, element)?;
        let handle = create(frame, element)?;
        let lgrip = create(handle, element)?;
        let rgrip = create(handle, element)?;

        let mut buttons = Vec::with_capacity(layout.buttons().len());
        for _ in layout.buttons() {
            buttons.push(create(title, element)?);
        }

        // always shown; their parents decide visibility
        for window in [plate, label, lgrip, rgrip] {
            ws.map_window(window)?;
        }

        debug!(
            "Created decorations: frame=0x{:x} plate=0x{:x} title=0x{:x} ({} buttons)",
            frame,
            plate,
            title,
            buttons.len()
        );

        Ok(Self {
            frame,
            plate,
            title,
            label,
            handle,
            lgrip,
            rgrip,
            buttons,
            kinds: layout.buttons().to_vec(),
            order: layout.order().to_vec(),
        })
    }

    /// Destroy every window, children before parents
    pub fn destroy(&self, ws: &dyn WindowSystem) -> Result<(), FrameError> {
        for &window in self.all().iter().rev() {
            ws.destroy_window(window)?;
        }
        Ok(())
    }

    /// All handles, container first
    pub fn all(&self) -> Vec<Window> {
        let mut windows = vec![
            self.frame,
            self.plate,
            self.title,
            self.label,
            self.handle,
            self.lgrip,
            self.rgrip,
        ];
        windows.extend_from_slice(&self.buttons);
        windows
    }

    /// Check if a window ID belongs to this frame
    pub fn contains(&self, window: Window) -> bool {
        !self.context(window).is_none()
    }

    pub fn context(&self, window: Window) -> MouseContext {
        if window == self.frame {
            MouseContext::Frame
        } else if window == self.title {
            MouseContext::Titlebar
        } else if window == self.label {
            MouseContext::Label
        } else if window == self.handle {
            MouseContext::Handle
        } else if window == self.lgrip {
            MouseContext::LeftGrip
        } else if window == self.rgrip {
            MouseContext::RightGrip
        } else if window == self.plate {
            MouseContext::ClientArea
        } else if let Some(index) = self.buttons.iter().position(|&b| b == window) {
            MouseContext::Button(index)
        } else {
            MouseContext::None
        }
    }
}
