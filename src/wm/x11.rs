//! X11 backend
//!
//! Implements the display traits over an x11rb `RustConnection`, and turns
//! raw protocol events into `FrameEvent`s for the manager.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use tracing::{debug, info, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::Event;
use x11rb::protocol::shape::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{self, *};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::shared::{Rect, Size, Strut};
use crate::wm::client_flags::ClientState;
use crate::wm::display::{
    ClientInfo, EventMask, FrameError, Painter, Window, WindowAttributes, WindowChanges,
    WindowSystem,
};
use crate::wm::events::FrameEvent;
use crate::wm::frame::gravity::Gravity;
use crate::wm::style::{Relief, Texture};

/// PWinGravity in WM_SIZE_HINTS.flags
const P_WIN_GRAVITY: u32 = 1 << 9;
/// StateHint in WM_HINTS.flags
const STATE_HINT: u32 = 1 << 1;
const ICONIC_STATE: u32 = 3;
/// TEXTITEM8 strings are length-prefixed with a byte
const MAX_TEXT_ITEM: usize = 254;
/// Every X server has this one
const FALLBACK_FONT: &str = "fixed";

impl From<ConnectError> for FrameError {
    fn from(e: ConnectError) -> Self {
        FrameError::Backend(format!("connect: {}", e))
    }
}

impl From<ConnectionError> for FrameError {
    fn from(e: ConnectionError) -> Self {
        FrameError::Backend(e.to_string())
    }
}

impl From<ReplyError> for FrameError {
    fn from(e: ReplyError) -> Self {
        FrameError::Backend(e.to_string())
    }
}

impl From<ReplyOrIdError> for FrameError {
    fn from(e: ReplyOrIdError) -> Self {
        FrameError::Backend(e.to_string())
    }
}

/// Atoms the backend reads or writes
#[derive(Debug, Clone, Copy)]
struct Atoms {
    net_frame_extents: Atom,
    net_wm_name: Atom,
    utf8_string: Atom,
    wm_change_state: Atom,
}

impl Atoms {
    fn new(conn: &RustConnection) -> Result<Self, FrameError> {
        let intern = |name: &str| -> Result<Atom, FrameError> {
            Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
        };
        Ok(Self {
            net_frame_extents: intern("_NET_FRAME_EXTENTS")?,
            net_wm_name: intern("_NET_WM_NAME")?,
            utf8_string: intern("UTF8_STRING")?,
            wm_change_state: intern("WM_CHANGE_STATE")?,
        })
    }
}

/// Display backed by a live X server connection
pub struct X11Display {
    conn: Arc<RustConnection>,
    root: Window,
    depth: u8,
    visual: Visualid,
    gc: Gcontext,
    atoms: Atoms,
    has_shape: bool,
    font: Cell<Option<Font>>,
    font_ascent: Cell<i16>,
    /// Advance of every Latin-1 code in the label font, empty until a font
    /// is loaded
    advances: RefCell<Vec<u32>>,
    /// Per-character advance used without a font
    char_width: Cell<u32>,
}

impl X11Display {
    /// Connect to `display_name` (or `$DISPLAY`)
    pub fn connect(display_name: Option<&str>) -> Result<Self, FrameError> {
        let (conn, screen_num) = x11rb::connect(display_name)?;
        let conn = Arc::new(conn);

        let screen = &conn.setup().roots[screen_num];
        let (root, depth, visual) = (screen.root, screen.root_depth, screen.root_visual);

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            root,
            &CreateGCAux::new()
                .foreground(screen.black_pixel)
                .graphics_exposures(0u32),
        )?;

        let atoms = Atoms::new(&conn)?;
        let has_shape = conn
            .extension_information(shape::X11_EXTENSION_NAME)?
            .is_some();
        if !has_shape {
            warn!("SHAPE extension missing; shaped clients get rectangular frames");
        }

        info!(
            "Connected to X11 screen {} (root 0x{:x}, depth {})",
            screen_num, root, depth
        );
        Ok(Self {
            conn,
            root,
            depth,
            visual,
            gc,
            atoms,
            has_shape,
            font: Cell::new(None),
            font_ascent: Cell::new(0),
            advances: RefCell::new(Vec::new()),
            char_width: Cell::new(6),
        })
    }

    /// Shared handle for the event stream
    pub fn connection(&self) -> Arc<RustConnection> {
        self.conn.clone()
    }

    /// Take over window management on the root window.
    ///
    /// Fails if another window manager already holds SubstructureRedirect.
    pub fn become_wm(&self) -> Result<(), FrameError> {
        let mask = xproto::EventMask::SUBSTRUCTURE_REDIRECT
            | xproto::EventMask::SUBSTRUCTURE_NOTIFY
            | xproto::EventMask::PROPERTY_CHANGE
            | xproto::EventMask::FOCUS_CHANGE;
        self.conn
            .change_window_attributes(self.root, &ChangeWindowAttributesAux::new().event_mask(mask))?
            .check()
            .map_err(|e| {
                FrameError::Backend(format!("another window manager is running? ({})", e))
            })?;
        self.conn.flush()?;
        debug!("Selected SubstructureRedirect on root 0x{:x}", self.root);
        Ok(())
    }

    /// Top-level windows that were already on screen before we started
    pub fn existing_clients(&self) -> Result<Vec<Window>, FrameError> {
        let tree = self.conn.query_tree(self.root)?.reply()?;
        let mut clients = Vec::new();
        for window in tree.children {
            let Ok(attrs) = self.conn.get_window_attributes(window)?.reply() else {
                continue;
            };
            if attrs.override_redirect || attrs.map_state != MapState::VIEWABLE {
                continue;
            }
            clients.push(window);
        }
        debug!("Found {} existing clients", clients.len());
        Ok(clients)
    }

    /// Convert a protocol event into what the manager understands
    pub fn translate(&self, event: &Event) -> Option<FrameEvent> {
        match event {
            Event::MapRequest(e) => Some(FrameEvent::MapRequest { window: e.window }),
            Event::ConfigureRequest(e) => {
                let mask = e.value_mask;
                Some(FrameEvent::ConfigureRequest {
                    window: e.window,
                    x: mask.contains(ConfigWindow::X).then_some(i32::from(e.x)),
                    y: mask.contains(ConfigWindow::Y).then_some(i32::from(e.y)),
                    width: mask.contains(ConfigWindow::WIDTH).then_some(u32::from(e.width)),
                    height: mask.contains(ConfigWindow::HEIGHT).then_some(u32::from(e.height)),
                    border_width: mask
                        .contains(ConfigWindow::BORDER_WIDTH)
                        .then_some(u32::from(e.border_width)),
                })
            }
            Event::UnmapNotify(e) => Some(FrameEvent::UnmapNotify { window: e.window }),
            Event::DestroyNotify(e) => Some(FrameEvent::DestroyNotify { window: e.window }),
            Event::PropertyNotify(e) => {
                let atom = e.atom;
                if atom != u32::from(AtomEnum::WM_NAME) && atom != self.atoms.net_wm_name {
                    return None;
                }
                match self.read_title(e.window) {
                    Ok(title) => Some(FrameEvent::TitleChanged {
                        window: e.window,
                        title,
                    }),
                    Err(err) => {
                        debug!("Title of 0x{:x} unreadable: {}", e.window, err);
                        None
                    }
                }
            }
            Event::FocusIn(e) if e.detail != NotifyDetail::POINTER => {
                Some(FrameEvent::FocusIn { window: e.event })
            }
            Event::FocusOut(e) if e.detail != NotifyDetail::POINTER => {
                Some(FrameEvent::FocusOut { window: e.event })
            }
            Event::ShapeNotify(e) if e.shape_kind == shape::SK::BOUNDING => {
                let shape = if e.shaped {
                    match self.read_shape(e.affected_window) {
                        Ok(shape) => shape,
                        Err(err) => {
                            debug!("Shape of 0x{:x} unreadable: {}", e.affected_window, err);
                            return None;
                        }
                    }
                } else {
                    None
                };
                Some(FrameEvent::ShapeChanged {
                    window: e.affected_window,
                    shape,
                })
            }
            Event::ClientMessage(e) if e.type_ == self.atoms.wm_change_state => {
                // ICCCM 4.1.4: only the iconify request exists
                let data = e.data.as_data32();
                (data[0] == ICONIC_STATE).then_some(FrameEvent::StateChanged {
                    window: e.window,
                    state: ClientState::ICONIC,
                })
            }
            Event::Expose(e) => Some(FrameEvent::Expose {
                window: e.window,
                count: e.count,
            }),
            Event::EnterNotify(e) => Some(FrameEvent::EnterNotify { window: e.event }),
            Event::LeaveNotify(e) => Some(FrameEvent::LeaveNotify { window: e.event }),
            Event::ButtonPress(e) => Some(FrameEvent::ButtonPress {
                window: e.event,
                button: e.detail,
                root_x: i32::from(e.root_x),
                root_y: i32::from(e.root_y),
            }),
            _ => None,
        }
    }

    fn read_title(&self, window: Window) -> Result<String, FrameError> {
        let utf8 = self
            .conn
            .get_property(false, window, self.atoms.net_wm_name, self.atoms.utf8_string, 0, 1024)?
            .reply()?;
        if !utf8.value.is_empty() {
            return Ok(String::from_utf8_lossy(&utf8.value).into_owned());
        }
        let legacy = self
            .conn
            .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        // STRING is Latin-1
        Ok(legacy.value.iter().map(|&b| char::from(b)).collect())
    }

    fn read_gravity(&self, window: Window) -> Result<Gravity, FrameError> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                AtomEnum::WM_NORMAL_HINTS,
                AtomEnum::WM_SIZE_HINTS,
                0,
                18,
            )?
            .reply()?;
        let values: Vec<u32> = reply.value32().map(|v| v.collect()).unwrap_or_default();
        if values.len() >= 18 && values[0] & P_WIN_GRAVITY != 0 {
            return Ok(Gravity::from_wire(values[17]));
        }
        Ok(Gravity::NorthWest)
    }

    fn read_initially_iconic(&self, window: Window) -> Result<bool, FrameError> {
        let reply = self
            .conn
            .get_property(false, window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, 0, 9)?
            .reply()?;
        let values: Vec<u32> = reply.value32().map(|v| v.collect()).unwrap_or_default();
        Ok(values.len() >= 3 && values[0] & STATE_HINT != 0 && values[2] == ICONIC_STATE)
    }

    fn read_shape(&self, window: Window) -> Result<Option<Vec<Rect>>, FrameError> {
        if !self.has_shape {
            return Ok(None);
        }
        let extents = self.conn.shape_query_extents(window)?.reply()?;
        if !extents.bounding_shaped {
            return Ok(None);
        }
        let reply = self
            .conn
            .shape_get_rectangles(window, shape::SK::BOUNDING)?
            .reply()?;
        Ok(Some(
            reply
                .rectangles
                .iter()
                .map(|r| {
                    Rect::new(
                        i32::from(r.x),
                        i32::from(r.y),
                        u32::from(r.width),
                        u32::from(r.height),
                    )
                })
                .collect(),
        ))
    }

    fn open_font(&self, name: &str) -> Result<(Font, QueryFontReply), FrameError> {
        let font = self.conn.generate_id()?;
        self.conn.open_font(font, name.as_bytes())?.check()?;
        let info = self.conn.query_font(font)?.reply()?;
        Ok((font, info))
    }

    fn set_foreground(&self, pixel: u32) -> Result<(), FrameError> {
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(pixel))?;
        Ok(())
    }
}

/// Advance width of each of the 256 single-byte codes of a core font.
///
/// Codes outside `first..=last`, or without metrics, take the default
/// character's advance. Fonts that send no per-character metrics are
/// monospaced at `uniform`.
fn advance_table(first: u16, last: u16, default_char: u16, infos: &[Charinfo], uniform: i16) -> Vec<u32> {
    let width = |info: &Charinfo| info.character_width.max(0) as u32;
    if infos.is_empty() {
        return vec![uniform.max(0) as u32; 256];
    }
    let lookup = |code: u16| -> Option<u32> {
        if code < first || code > last {
            return None;
        }
        infos
            .get(usize::from(code - first))
            .map(width)
            .filter(|&w| w > 0)
    };
    let fallback = lookup(default_char).unwrap_or(0);
    (0..256u16).map(|code| lookup(code).unwrap_or(fallback)).collect()
}

fn to_x_mask(mask: EventMask) -> xproto::EventMask {
    let pairs = [
        (EventMask::ENTER_WINDOW, xproto::EventMask::ENTER_WINDOW),
        (EventMask::LEAVE_WINDOW, xproto::EventMask::LEAVE_WINDOW),
        (EventMask::BUTTON_PRESS, xproto::EventMask::BUTTON_PRESS),
        (EventMask::BUTTON_RELEASE, xproto::EventMask::BUTTON_RELEASE),
        (EventMask::BUTTON_MOTION, xproto::EventMask::BUTTON_MOTION),
        (EventMask::EXPOSURE, xproto::EventMask::EXPOSURE),
        (EventMask::STRUCTURE_NOTIFY, xproto::EventMask::STRUCTURE_NOTIFY),
        (EventMask::SUBSTRUCTURE_NOTIFY, xproto::EventMask::SUBSTRUCTURE_NOTIFY),
        (EventMask::SUBSTRUCTURE_REDIRECT, xproto::EventMask::SUBSTRUCTURE_REDIRECT),
        (EventMask::PROPERTY_CHANGE, xproto::EventMask::PROPERTY_CHANGE),
        (EventMask::FOCUS_CHANGE, xproto::EventMask::FOCUS_CHANGE),
    ];
    pairs
        .iter()
        .filter(|(ours, _)| mask.contains(*ours))
        .fold(xproto::EventMask::NO_EVENT, |acc, (_, theirs)| acc | *theirs)
}

fn to_x_rect(rect: &Rect) -> Rectangle {
    Rectangle {
        x: rect.x as i16,
        y: rect.y as i16,
        width: rect.width as u16,
        height: rect.height as u16,
    }
}

/// Core fonts take 8-bit strings; anything outside Latin-1 becomes '?'
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn shade(color: u32, percent: u32) -> u32 {
    let channel = |shift: u32| ((((color >> shift) & 0xff) * percent / 100).min(0xff)) << shift;
    channel(16) | channel(8) | channel(0)
}

impl WindowSystem for X11Display {
    fn root(&self) -> Window {
        self.root
    }

    fn create_window(
        &self,
        parent: Window,
        rect: Rect,
        attrs: &WindowAttributes,
    ) -> Result<Window, FrameError> {
        let window = self.conn.generate_id()?;
        let mut aux = CreateWindowAux::new()
            .event_mask(to_x_mask(attrs.event_mask))
            .override_redirect(u32::from(attrs.override_redirect));
        if let Some(pixel) = attrs.background {
            aux = aux.background_pixel(pixel);
        }
        if let Some(pixel) = attrs.border_color {
            aux = aux.border_pixel(pixel);
        }
        self.conn.create_window(
            self.depth,
            window,
            parent,
            rect.x as i16,
            rect.y as i16,
            rect.width.max(1) as u16,
            rect.height.max(1) as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            self.visual,
            &aux,
        )?;
        Ok(window)
    }

    fn destroy_window(&self, window: Window) -> Result<(), FrameError> {
        self.conn.destroy_window(window)?;
        Ok(())
    }

    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        x: i32,
        y: i32,
    ) -> Result<(), FrameError> {
        self.conn.reparent_window(window, parent, x as i16, y as i16)?;
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<(), FrameError> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<(), FrameError> {
        self.conn.unmap_window(window)?;
        Ok(())
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<(), FrameError> {
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().x(x).y(y))?;
        Ok(())
    }

    fn resize_window(&self, window: Window, size: Size) -> Result<(), FrameError> {
        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new()
                .width(size.width.max(1))
                .height(size.height.max(1)),
        )?;
        Ok(())
    }

    fn set_border_width(&self, window: Window, width: u32) -> Result<(), FrameError> {
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().border_width(width))?;
        Ok(())
    }

    fn set_border_color(&self, window: Window, pixel: u32) -> Result<(), FrameError> {
        self.conn
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().border_pixel(pixel))?;
        Ok(())
    }

    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<(), FrameError> {
        let mut aux = ConfigureWindowAux::new();
        if let Some(x) = changes.x {
            aux = aux.x(x);
        }
        if let Some(y) = changes.y {
            aux = aux.y(y);
        }
        if let Some(width) = changes.width {
            aux = aux.width(width.max(1));
        }
        if let Some(height) = changes.height {
            aux = aux.height(height.max(1));
        }
        if let Some(border_width) = changes.border_width {
            aux = aux.border_width(border_width);
        }
        self.conn.configure_window(window, &aux)?;
        Ok(())
    }

    fn select_input(&self, window: Window, mask: EventMask) -> Result<(), FrameError> {
        self.conn.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::new().event_mask(to_x_mask(mask)),
        )?;
        Ok(())
    }

    fn change_save_set(&self, window: Window, insert: bool) -> Result<(), FrameError> {
        let mode = if insert { SetMode::INSERT } else { SetMode::DELETE };
        self.conn.change_save_set(mode, window)?;
        Ok(())
    }

    fn set_shape(&self, window: Window, rects: Option<&[Rect]>) -> Result<(), FrameError> {
        if !self.has_shape {
            return Ok(());
        }
        match rects {
            Some(rects) => {
                let rects: Vec<Rectangle> = rects.iter().map(to_x_rect).collect();
                self.conn.shape_rectangles(
                    shape::SO::SET,
                    shape::SK::BOUNDING,
                    ClipOrdering::UNSORTED,
                    window,
                    0,
                    0,
                    &rects,
                )?;
            }
            None => {
                self.conn
                    .shape_mask(shape::SO::SET, shape::SK::BOUNDING, window, 0, 0, x11rb::NONE)?;
            }
        }
        Ok(())
    }

    fn set_frame_extents(&self, client: Window, extents: &Strut) -> Result<(), FrameError> {
        self.conn.change_property32(
            PropMode::REPLACE,
            client,
            self.atoms.net_frame_extents,
            AtomEnum::CARDINAL,
            &[extents.left, extents.right, extents.top, extents.bottom],
        )?;
        Ok(())
    }

    fn send_configure_notify(
        &self,
        client: Window,
        rect: Rect,
        border_width: u32,
    ) -> Result<(), FrameError> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: client,
            window: client,
            above_sibling: x11rb::NONE,
            x: rect.x as i16,
            y: rect.y as i16,
            width: rect.width as u16,
            height: rect.height as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };
        self.conn
            .send_event(false, client, xproto::EventMask::STRUCTURE_NOTIFY, event)?;
        Ok(())
    }

    fn query_client(&self, window: Window) -> Result<ClientInfo, FrameError> {
        let geometry = self.conn.get_geometry(window)?.reply()?;
        let attrs = self.conn.get_window_attributes(window)?.reply()?;

        if self.has_shape {
            // ShapeNotify for this client from now on
            self.conn.shape_select_input(window, true)?;
        }

        Ok(ClientInfo {
            window,
            geometry: Rect::new(
                i32::from(geometry.x),
                i32::from(geometry.y),
                u32::from(geometry.width),
                u32::from(geometry.height),
            ),
            border_width: u32::from(geometry.border_width),
            gravity: self.read_gravity(window)?,
            title: self.read_title(window)?,
            shape: self.read_shape(window)?,
            mapped: attrs.map_state != MapState::UNMAPPED,
            iconic: self.read_initially_iconic(window)?,
        })
    }

    fn flush(&self) -> Result<(), FrameError> {
        self.conn.flush()?;
        Ok(())
    }
}

impl Painter for X11Display {
    fn set_font(&self, name: &str, char_width: u32) -> Result<(), FrameError> {
        self.char_width.set(char_width.max(1));
        let (font, info) = match self.open_font(name) {
            Ok(opened) => opened,
            Err(e) if name != FALLBACK_FONT => {
                warn!("Font {:?} unavailable ({}), using {}", name, e, FALLBACK_FONT);
                self.open_font(FALLBACK_FONT)?
            }
            Err(e) => return Err(e),
        };

        self.conn.change_gc(self.gc, &ChangeGCAux::new().font(font))?;
        if let Some(old) = self.font.replace(Some(font)) {
            self.conn.close_font(old)?;
        }
        self.font_ascent.set(info.font_ascent);
        // single-row fonts only; wider fonts are measured by their first row
        self.advances.replace(advance_table(
            info.min_char_or_byte2,
            info.max_char_or_byte2,
            info.default_char,
            &info.char_infos,
            info.max_bounds.character_width,
        ));
        debug!("Label font {} (ascent {})", name, info.font_ascent);
        Ok(())
    }

    fn text_width(&self, text: &str) -> u32 {
        let bytes = latin1(text);
        let advances = self.advances.borrow();
        if advances.is_empty() {
            return bytes.len() as u32 * self.char_width.get();
        }
        bytes.iter().map(|&b| advances[usize::from(b)]).sum()
    }

    fn paint(&self, window: Window, size: Size, texture: &Texture) -> Result<(), FrameError> {
        let (w, h) = (size.width as i16, size.height as i16);
        self.set_foreground(texture.color)?;
        self.conn.poly_fill_rectangle(
            window,
            self.gc,
            &[Rectangle {
                x: 0,
                y: 0,
                width: size.width as u16,
                height: size.height as u16,
            }],
        )?;

        let (light, dark) = (shade(texture.color, 150), shade(texture.color, 60));
        let (top_left, bottom_right) = match texture.relief {
            Relief::Flat => return Ok(()),
            Relief::Raised => (light, dark),
            Relief::Sunken => (dark, light),
        };
        self.set_foreground(top_left)?;
        self.conn.poly_segment(
            window,
            self.gc,
            &[
                Segment { x1: 0, y1: 0, x2: w - 1, y2: 0 },
                Segment { x1: 0, y1: 0, x2: 0, y2: h - 1 },
            ],
        )?;
        self.set_foreground(bottom_right)?;
        self.conn.poly_segment(
            window,
            self.gc,
            &[
                Segment { x1: 0, y1: h - 1, x2: w - 1, y2: h - 1 },
                Segment { x1: w - 1, y1: 0, x2: w - 1, y2: h - 1 },
            ],
        )?;
        Ok(())
    }

    fn paint_text(
        &self,
        window: Window,
        x: i32,
        y: i32,
        text: &str,
        color: u32,
    ) -> Result<(), FrameError> {
        let mut bytes = latin1(text);
        bytes.truncate(MAX_TEXT_ITEM);
        let mut item = Vec::with_capacity(bytes.len() + 2);
        item.push(bytes.len() as u8);
        item.push(0); // delta
        item.extend_from_slice(&bytes);

        self.set_foreground(color)?;
        self.conn.poly_text8(
            window,
            self.gc,
            x as i16,
            y as i16 + self.font_ascent.get(),
            &item,
        )?;
        Ok(())
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        if let Some(font) = self.font.take() {
            let _ = self.conn.close_font(font);
        }
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.flush();
    }
}
