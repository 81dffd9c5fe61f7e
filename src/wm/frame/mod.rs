//! Frames
//!
//! A frame holds and decorates one client window. It owns the decoration
//! windows, reparents the client into its plate, and keeps its own geometry,
//! shape and look in step with the client.
//!
//! The frame only refers to its client by window id; callers hand in the
//! `Client` for every operation that reads client state.

pub mod decorations;
pub mod geometry;
pub mod gravity;
pub mod label;

use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::shared::{Rect, Size, Strut};
use crate::wm::client::Client;
use crate::wm::client_flags::Decorations;
use crate::wm::context::MouseContext;
use crate::wm::display::{Display, EventMask, FrameError, Window};
use crate::wm::events::{EventHandler, EventResult, FrameEvent};
use crate::wm::style::{Element, RenderStyle, StyleNotify, Texture};

use decorations::{ButtonKind, DecorationWindows, LABEL, TitleLayout};
use geometry::FrameGeometry;
use label::FittedTitle;

/// Event mask selected on the plate while it holds a client
pub const PLATE_EVENT_MASK: EventMask =
    EventMask::SUBSTRUCTURE_REDIRECT.union(EventMask::SUBSTRUCTURE_NOTIFY);

/// What was last painted on a decoration window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub size: Size,
    pub texture: Texture,
    pub text: Option<FittedTitle>,
    pub text_color: u32,
}

impl Surface {
    fn plain(size: Size, texture: Texture) -> Self {
        Self {
            size,
            texture,
            text: None,
            text_color: 0,
        }
    }

    fn paint(&self, display: &dyn Display, window: Window) -> Result<(), FrameError> {
        display.paint(window, self.size, &self.texture)?;
        if let Some(text) = &self.text {
            display.paint_text(window, text.x, 0, &text.text, self.text_color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Surfaces {
    title: Option<Surface>,
    label: Option<Surface>,
    handle: Option<Surface>,
    grip: Option<Surface>,
    /// One slot per button, same order as the button windows
    buttons: Vec<Option<Surface>>,
}

/// Holds and decorates a frame around a client window
#[derive(Debug)]
pub struct Frame {
    client: Window,

    style: Rc<RenderStyle>,

    /// The size of the frame on each side of the client window
    size: Strut,

    /// The size of the frame on each side of the client window inside the border
    inner_size: Strut,

    /// The position and size of the entire frame (including borders)
    area: Rect,

    visible: bool,
    grabbed: bool,
    destroyed: bool,

    windows: DecorationWindows,
    surfaces: Surfaces,
    geom: FrameGeometry,
}

impl Frame {
    /// Build the decorations for `client` and grab it.
    ///
    /// The new frame is hidden. Nothing is left allocated if this fails.
    pub fn new(
        display: &dyn Display,
        client: &Client,
        style: Rc<RenderStyle>,
        layout: &TitleLayout,
    ) -> Result<Self, FrameError> {
        let windows = DecorationWindows::create(display, layout, &style)?;
        let surfaces = Surfaces {
            buttons: vec![None; windows.buttons.len()],
            ..Default::default()
        };

        let mut frame = Self {
            client: client.window,
            style: style.clone(),
            size: Strut::default(),
            inner_size: Strut::default(),
            area: Rect::new(client.area.x, client.area.y, 0, 0),
            visible: false,
            grabbed: false,
            destroyed: false,
            windows,
            surfaces,
            geom: FrameGeometry::default(),
        };

        let result = frame
            .load_style(display, style)
            .and_then(|()| frame.grab_client(display, client));
        if let Err(e) = result {
            // undo everything, including a half-done grab
            if frame.grabbed {
                if let Err(release) = frame.release_client(display, client) {
                    warn!(
                        "Failed to release client 0x{:x} after a failed frame: {}",
                        client.window, release
                    );
                }
            }
            frame.discard(display);
            return Err(e);
        }

        info!(
            "Framed client 0x{:x} in 0x{:x} at {:?}",
            client.window, frame.windows.frame, frame.area
        );
        Ok(frame)
    }

    /// The client window this frame decorates
    pub fn client(&self) -> Window {
        self.client
    }

    /// The frame's base top-level window
    pub fn window(&self) -> Window {
        self.windows.frame
    }

    /// The client's parent window
    pub fn plate(&self) -> Window {
        self.windows.plate
    }

    /// Size of the frame on each side of the client
    pub fn size(&self) -> &Strut {
        &self.size
    }

    pub fn inner_size(&self) -> &Strut {
        &self.inner_size
    }

    /// Position and size of the frame window, root coordinates
    pub fn area(&self) -> &Rect {
        &self.area
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn grabbed(&self) -> bool {
        self.grabbed
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geom
    }

    pub fn style(&self) -> &Rc<RenderStyle> {
        &self.style
    }

    pub fn button_kind(&self, index: usize) -> Option<ButtonKind> {
        self.windows.kinds.get(index).copied()
    }

    /// Buttons and the label (`LABEL`), left to right
    pub fn title_order(&self) -> &[usize] {
        &self.windows.order
    }

    pub fn label_surface(&self) -> Option<&Surface> {
        self.surfaces.label.as_ref()
    }

    pub fn button_surfaces(&self) -> &[Option<Surface>] {
        &self.surfaces.buttons
    }

    /// Every window that makes up the decorations; the caller gets no
    /// ownership
    pub fn all_windows(&self) -> Vec<Window> {
        self.windows.all()
    }

    /// Which part of the frame `window` is
    pub fn mouse_context(&self, window: Window) -> MouseContext {
        self.windows.context(window)
    }

    /// Switch to `style` and redo layout, rendering and position with it
    pub fn apply_style(
        &mut self,
        display: &dyn Display,
        client: &Client,
        style: Rc<RenderStyle>,
    ) -> Result<(), FrameError> {
        if self.destroyed {
            return Err(FrameError::Destroyed(self.client));
        }
        let previous = Snapshot::of(self);
        let Err(e) = self.restyle(display, client, style) else {
            return Ok(());
        };

        // put the old style back whole rather than leave a mix of both
        warn!("Restyling frame 0x{:x} failed: {}", self.windows.frame, e);
        if let Err(undo) = self.restyle(display, client, previous.style.clone()) {
            error!(
                "Frame 0x{:x} could not return to its previous style: {}",
                self.windows.frame, undo
            );
        }
        previous.restore(self);
        Err(e)
    }

    fn restyle(
        &mut self,
        display: &dyn Display,
        client: &Client,
        style: Rc<RenderStyle>,
    ) -> Result<(), FrameError> {
        self.load_style(display, style)?;
        self.adjust_size(display, client)?;
        self.adjust_position(display, client)
    }

    /// Take the metrics of `style` without touching layout
    fn load_style(
        &mut self,
        display: &dyn Display,
        style: Rc<RenderStyle>,
    ) -> Result<(), FrameError> {
        self.style = style;
        let style = self.style.clone();
        let w = &self.windows;

        for window in [w.frame, w.title, w.handle, w.lgrip, w.rgrip] {
            display.set_border_color(window, style.frame_border_color)?;
        }
        for &button in &w.buttons {
            display.set_border_color(button, style.frame_border_color)?;
        }
        display.set_border_color(w.plate, style.client_border_color)?;

        self.geom.font_height = style.font_height.max(1);
        self.geom.handle_height = style.handle_height.max(1);
        self.geom.bevel = style.bevel;
        // buttons never stick out of the titlebar
        self.geom.button_size = style.button_size.max(1).min(self.geom.title_height());

        let grip = Size::new(self.geom.grip_width(), self.geom.handle_height);
        display.resize_window(w.lgrip, grip)?;
        display.resize_window(w.rgrip, grip)?;
        let button = Size::new(self.geom.button_size, self.geom.button_size);
        for &window in &w.buttons {
            display.resize_window(window, button)?;
        }

        debug!(
            "Frame 0x{:x}: style applied (title {}px, grip {}px)",
            w.frame,
            self.geom.title_height(),
            self.geom.grip_width()
        );
        Ok(())
    }

    /// Reparent the client window from the root onto the plate
    pub fn grab_client(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        if self.destroyed {
            return Err(FrameError::Destroyed(self.client));
        }
        if self.grabbed {
            error!("Client 0x{:x} grabbed twice", client.window);
            return Err(FrameError::AlreadyGrabbed(client.window));
        }

        display.change_save_set(client.window, true)?;
        display.reparent_window(client.window, self.windows.plate, 0, 0)?;
        self.grabbed = true;

        // config and map requests from the client now come to us
        display.select_input(self.windows.plate, PLATE_EVENT_MASK)?;

        self.adjust_size(display, client)?;
        self.adjust_position(display, client)?;
        Ok(())
    }

    /// Reparent the client window back to the root, at its absolute position
    pub fn release_client(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        if !self.grabbed {
            error!("Releasing client 0x{:x} which was never grabbed", client.window);
            return Err(FrameError::NotGrabbed(client.window));
        }

        // stop redirecting before the window leaves the plate
        display.select_input(self.windows.plate, EventMask::empty())?;
        display.reparent_window(client.window, display.root(), client.area.x, client.area.y)?;
        display.change_save_set(client.window, false)?;
        self.grabbed = false;

        debug!(
            "Released client 0x{:x} to root at ({}, {})",
            client.window, client.area.x, client.area.y
        );
        Ok(())
    }

    /// The client window was destroyed while grabbed; the server already
    /// took it off the plate, so there is nothing left to release.
    pub fn forget_client(&mut self) {
        if self.grabbed {
            debug!("Client 0x{:x} vanished from frame 0x{:x}", self.client, self.windows.frame);
            self.grabbed = false;
        }
    }

    /// Update the frame's size to match the client
    pub fn adjust_size(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let decorations = client.decorations;
        let DecorationWindows {
            frame,
            plate,
            title,
            handle,
            lgrip,
            rgrip,
            ..
        } = self.windows;

        if decorations.contains(Decorations::BORDER) {
            self.geom.bwidth = self.style.frame_border_width;
            self.geom.cbwidth = self.style.client_border_width;
        } else {
            self.geom.bwidth = 0;
            self.geom.cbwidth = 0;
        }
        let bwidth = self.geom.bwidth;
        let cbwidth = self.geom.cbwidth;

        self.inner_size = Strut::uniform(cbwidth);
        self.geom.width = client.area.width.max(1) + cbwidth * 2;

        display.set_border_width(plate, cbwidth)?;
        for window in [frame, title, handle, lgrip, rgrip] {
            display.set_border_width(window, bwidth)?;
        }

        let edge = -(bwidth as i32);

        if decorations.contains(Decorations::TITLEBAR) {
            display.move_window(title, edge, edge)?;
            display.resize_window(title, Size::new(self.geom.width, self.geom.title_height()))?;
            self.inner_size.top += self.geom.title_height() + bwidth;
            display.map_window(title)?;
            self.layout_title(display, client)?;
        } else {
            display.unmap_window(title)?;
        }

        if decorations.contains(Decorations::HANDLE) {
            self.geom.handle_y = (self.inner_size.top + client.area.height + cbwidth) as i32;
            display.move_window(handle, edge, self.geom.handle_y)?;
            display.resize_window(handle, Size::new(self.geom.width, self.geom.handle_height))?;
            display.move_window(lgrip, edge, edge)?;
            display.move_window(
                rgrip,
                edge + self.geom.width as i32 - self.geom.grip_width() as i32,
                edge,
            )?;
            self.inner_size.bottom += self.geom.handle_height + bwidth;
            display.map_window(handle)?;
        } else {
            display.unmap_window(handle)?;
        }

        let frame_height = if client.shaded() {
            self.geom.title_height()
        } else {
            self.inner_size.vertical() + client.area.height
        };
        display.resize_window(frame, Size::new(self.geom.width, frame_height.max(1)))?;

        // two steps: a static-gravity client would not move with a move-resize
        display.move_window(
            plate,
            self.inner_size.left as i32 - cbwidth as i32,
            self.inner_size.top as i32 - cbwidth as i32,
        )?;
        display.resize_window(plate, client.area.size())?;

        self.size = self.inner_size.grown(bwidth);

        let area_size = if client.shaded() {
            Size::new(
                client.area.width + self.size.horizontal(),
                self.geom.title_height() + bwidth * 2,
            )
        } else {
            Size::new(
                client.area.width + self.size.horizontal(),
                client.area.height + self.size.vertical(),
            )
        };
        self.area = self.area.with_size(area_size);

        debug!(
            "Frame 0x{:x}: size {:?}, area {:?}",
            frame, self.size, self.area
        );

        display.set_frame_extents(client.window, &self.size)?;
        self.render(display, client)?;
        self.adjust_shape(display, client)?;
        Ok(())
    }

    /// Update the frame's position to match the client
    pub fn adjust_position(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let (x, y) = self.client_gravity(client, client.area.x, client.area.y);
        display.move_window(self.windows.frame, x, y)?;
        self.area = self.area.with_position(x, y);
        debug!("Frame 0x{:x}: moved to ({}, {})", self.windows.frame, x, y);
        Ok(())
    }

    /// Shape the frame window to the client window
    pub fn adjust_shape(&self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let shape = self.shape_for(client);
        display.set_shape(self.windows.frame, shape.as_deref())
    }

    /// Bounding shape of the frame, frame-relative; `None` when the client
    /// is rectangular
    pub fn shape_for(&self, client: &Client) -> Option<Vec<Rect>> {
        let client_shape = client.shape.as_ref()?;
        let decorations = client.decorations;

        let mut rects: Vec<Rect> = client_shape
            .iter()
            .map(|r| r.offset(self.inner_size.left as i32, self.inner_size.top as i32))
            .collect();

        let bevel = self.geom.bevel as i32;
        let outer_width = self.geom.width + self.geom.bwidth * 2;
        if decorations.contains(Decorations::TITLEBAR) {
            rects.push(Rect::new(
                -bevel,
                -bevel,
                outer_width,
                self.geom.title_height() + self.geom.bwidth * 2,
            ));
        }
        if decorations.contains(Decorations::HANDLE) {
            rects.push(Rect::new(
                -bevel,
                self.geom.handle_y,
                outer_width,
                self.geom.handle_height + self.geom.bwidth * 2,
            ));
        }
        Some(rects)
    }

    /// Re-sync with everything about the client that affects the look
    /// (shade, maximize, focus, title)
    pub fn adjust_state(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        // shading changes the layout, which repaints focus and title with it
        self.adjust_size(display, client)
    }

    /// Repaint everything that depends on focus
    pub fn adjust_focus(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        self.render(display, client)
    }

    /// Repaint the label from the client's title
    pub fn adjust_title(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        if client.decorations.contains(Decorations::TITLEBAR) {
            self.render_label(display, client)?;
        }
        Ok(())
    }

    /// Frame position for a client asking to be at `(x, y)`
    pub fn client_gravity(&self, client: &Client, x: i32, y: i32) -> (i32, i32) {
        gravity::client_gravity(client.gravity, &self.size, x, y)
    }

    /// Client reference position for a frame at `(x, y)`
    pub fn frame_gravity(&self, client: &Client, x: i32, y: i32) -> (i32, i32) {
        gravity::frame_gravity(client.gravity, &self.size, x, y)
    }

    /// Absolute root position of the client window's top-left pixel
    pub fn client_root_position(&self) -> (i32, i32) {
        (
            self.area.x + self.size.left as i32,
            self.area.y + self.size.top as i32,
        )
    }

    pub fn show(&mut self, display: &dyn Display) -> Result<(), FrameError> {
        if !self.visible {
            display.map_window(self.windows.frame)?;
            self.visible = true;
        }
        Ok(())
    }

    pub fn hide(&mut self, display: &dyn Display) -> Result<(), FrameError> {
        if self.visible {
            display.unmap_window(self.windows.frame)?;
            self.visible = false;
        }
        Ok(())
    }

    /// Destroy the decorations. The client must have been released first,
    /// or it would be destroyed along with the plate.
    pub fn destroy(mut self, display: &dyn Display) -> Result<(), FrameError> {
        if self.grabbed {
            error!(
                "Frame 0x{:x} destroyed while still holding client 0x{:x}",
                self.windows.frame, self.client
            );
            return Err(FrameError::StillGrabbed(self.client));
        }
        self.windows.destroy(display)?;
        self.destroyed = true;
        info!("Destroyed frame for client 0x{:x}", self.client);
        Ok(())
    }

    /// Best-effort teardown after a failed construction
    fn discard(&mut self, display: &dyn Display) {
        if let Err(e) = self.windows.destroy(display) {
            error!("Failed to discard decorations of 0x{:x}: {}", self.client, e);
        }
        self.destroyed = true;
    }

    /// Place buttons and label along the titlebar
    fn layout_title(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let w = &self.windows;
        let geom = &mut self.geom;

        let shown: Vec<bool> = w
            .kinds
            .iter()
            .map(|kind| client.decorations.contains(kind.decoration()))
            .collect();
        let nshown = shown.iter().filter(|&&s| s).count() as u32;

        geom.label_width = geom
            .width
            .saturating_sub(geom.bevel * 2)
            .saturating_sub((geom.button_size + geom.bevel) * nshown)
            .max(1);

        let button_y = (geom.title_height().saturating_sub(geom.button_size) / 2) as i32;
        let mut x = geom.bevel as i32;
        for &slot in &w.order {
            if slot == LABEL {
                display.move_window(w.label, x, geom.bevel as i32)?;
                display.resize_window(w.label, Size::new(geom.label_width, geom.label_height()))?;
                x += (geom.label_width + geom.bevel) as i32;
            } else if shown[slot] {
                display.move_window(w.buttons[slot], x, button_y)?;
                display.map_window(w.buttons[slot])?;
                x += (geom.button_size + geom.bevel) as i32;
            } else {
                display.unmap_window(w.buttons[slot])?;
            }
        }
        Ok(())
    }

    /// Paint every decoration element for the client's current focus
    fn render(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let focused = client.focused();
        let style = self.style.clone();
        let geom = self.geom;
        let decorations = client.decorations;

        if decorations.contains(Decorations::TITLEBAR) {
            let title = Surface::plain(
                Size::new(geom.width, geom.title_height()),
                *style.texture(Element::Title, focused),
            );
            title.paint(display, self.windows.title)?;
            self.surfaces.title = Some(title);

            self.render_label(display, client)?;

            let button_size = Size::new(geom.button_size, geom.button_size);
            for (index, &window) in self.windows.buttons.iter().enumerate() {
                if !decorations.contains(self.windows.kinds[index].decoration()) {
                    self.surfaces.buttons[index] = None;
                    continue;
                }
                let surface = Surface::plain(button_size, *style.texture(Element::Button, focused));
                surface.paint(display, window)?;
                self.surfaces.buttons[index] = Some(surface);
            }
        }

        if decorations.contains(Decorations::HANDLE) {
            let handle = Surface::plain(
                Size::new(geom.width, geom.handle_height),
                *style.texture(Element::Handle, focused),
            );
            handle.paint(display, self.windows.handle)?;
            self.surfaces.handle = Some(handle);

            let grip = Surface::plain(
                Size::new(geom.grip_width(), geom.handle_height),
                *style.texture(Element::Grip, focused),
            );
            grip.paint(display, self.windows.lgrip)?;
            grip.paint(display, self.windows.rgrip)?;
            self.surfaces.grip = Some(grip);
        }
        Ok(())
    }

    fn render_label(&mut self, display: &dyn Display, client: &Client) -> Result<(), FrameError> {
        let focused = client.focused();
        let geom = self.geom;
        let text = label::fit_title(
            &client.title,
            geom.label_width,
            geom.bevel,
            self.style.label_justify,
            |s| display.text_width(s),
        );
        let surface = Surface {
            size: Size::new(geom.label_width, geom.label_height()),
            texture: *self.style.texture(Element::Label, focused),
            text,
            text_color: self.style.text_color(focused),
        };
        surface.paint(display, self.windows.label)?;
        self.surfaces.label = Some(surface);
        Ok(())
    }

    /// Repaint one element from what was last rendered on it
    fn repaint(&self, display: &dyn Display, window: Window) -> Result<bool, FrameError> {
        let w = &self.windows;
        let surface = if window == w.title {
            self.surfaces.title.as_ref()
        } else if window == w.label {
            self.surfaces.label.as_ref()
        } else if window == w.handle {
            self.surfaces.handle.as_ref()
        } else if window == w.lgrip || window == w.rgrip {
            self.surfaces.grip.as_ref()
        } else if let Some(index) = w.buttons.iter().position(|&b| b == window) {
            self.surfaces.buttons[index].as_ref()
        } else {
            None
        };

        match surface {
            Some(surface) => {
                surface.paint(display, window)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Frame state a failed restyle must not leave half-changed
struct Snapshot {
    style: Rc<RenderStyle>,
    geom: FrameGeometry,
    size: Strut,
    inner_size: Strut,
    area: Rect,
}

impl Snapshot {
    fn of(frame: &Frame) -> Self {
        Self {
            style: frame.style.clone(),
            geom: frame.geom,
            size: frame.size,
            inner_size: frame.inner_size,
            area: frame.area,
        }
    }

    fn restore(self, frame: &mut Frame) {
        frame.style = self.style;
        frame.geom = self.geom;
        frame.size = self.size;
        frame.inner_size = self.inner_size;
        frame.area = self.area;
    }
}

impl StyleNotify for Frame {
    fn style_changed(
        &mut self,
        display: &dyn Display,
        client: &Client,
        style: Rc<RenderStyle>,
    ) -> Result<(), FrameError> {
        self.apply_style(display, client, style)
    }
}

impl EventHandler for Frame {
    fn handle_event(
        &mut self,
        display: &dyn Display,
        client: &Client,
        event: &FrameEvent,
    ) -> Result<EventResult, FrameError> {
        match event {
            FrameEvent::Expose { window, count } => {
                // wait for the last of a batch
                if *count > 0 {
                    return Ok(EventResult::Handled);
                }
                if self.repaint(display, *window)? {
                    Ok(EventResult::Handled)
                } else {
                    Ok(EventResult::Ignore)
                }
            }
            FrameEvent::EnterNotify { window } | FrameEvent::LeaveNotify { window } => {
                debug!(
                    "Pointer crossing on {:?} of client 0x{:x}",
                    self.mouse_context(*window),
                    client.window
                );
                // focus policy lives elsewhere
                Ok(EventResult::Continue)
            }
            _ => Ok(EventResult::Continue),
        }
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if !self.destroyed {
            error!(
                "Frame for client 0x{:x} dropped without destroy; decoration windows leaked",
                self.client
            );
        }
    }
}
