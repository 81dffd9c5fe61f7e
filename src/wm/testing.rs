//! In-memory display for unit tests
//!
//! Keeps a window tree the way an X server would (parents, geometry, map
//! state, shapes) and remembers what was painted where.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::shared::{Rect, Size, Strut};
use crate::wm::display::{
    ClientInfo, EventMask, FrameError, Painter, Window, WindowAttributes, WindowChanges,
    WindowSystem,
};
use crate::wm::style::Texture;

const ROOT: Window = 0x100;
const CHAR_WIDTH: u32 = 6;

#[derive(Debug, Clone, Default)]
struct MockWindow {
    parent: Window,
    rect: Rect,
    border_width: u32,
    border_color: Option<u32>,
    mapped: bool,
    event_mask: EventMask,
    override_redirect: bool,
    shape: Option<Vec<Rect>>,
}

#[derive(Debug, Default)]
struct State {
    next_id: Window,
    windows: HashMap<Window, MockWindow>,
    /// Windows registered through `add_client`, with their client data
    clients: HashMap<Window, ClientInfo>,
    save_set: HashSet<Window>,
    extents: HashMap<Window, Strut>,
    configure_notifies: Vec<(Window, Rect)>,
    paints: HashMap<Window, Texture>,
    texts: HashMap<Window, String>,
    created: usize,
    fail_after: Option<usize>,
    /// Requests on these windows fail as if the server rejected them
    broken: HashSet<Window>,
    fail_paints: bool,
    font: String,
    char_width: u32,
}

#[derive(Debug)]
pub struct MockDisplay {
    state: RefCell<State>,
}

impl MockDisplay {
    pub fn new() -> Self {
        let mut state = State {
            next_id: 0x200,
            char_width: CHAR_WIDTH,
            ..Default::default()
        };
        state.windows.insert(
            ROOT,
            MockWindow {
                rect: Rect::new(0, 0, 1920, 1080),
                mapped: true,
                ..Default::default()
            },
        );
        Self {
            state: RefCell::new(state),
        }
    }

    pub fn root_window(&self) -> Window {
        ROOT
    }

    /// Create a top-level client window described by `info`
    pub fn add_client(&self, mut info: ClientInfo) -> Window {
        let mut state = self.state.borrow_mut();
        let window = state.next_id;
        state.next_id += 1;
        info.window = window;
        state.windows.insert(
            window,
            MockWindow {
                parent: ROOT,
                rect: info.geometry,
                border_width: info.border_width,
                mapped: info.mapped,
                shape: info.shape.clone(),
                ..Default::default()
            },
        );
        state.clients.insert(window, info);
        window
    }

    pub fn query_client_info(&self, window: Window) -> ClientInfo {
        self.query_client(window).expect("unknown client")
    }

    /// Fail every window creation once `count` windows have been created
    pub fn fail_create_after(&self, count: usize) {
        self.state.borrow_mut().fail_after = Some(count);
    }

    /// Make every request that touches `window` fail until `repair_window`
    pub fn break_window(&self, window: Window) {
        self.state.borrow_mut().broken.insert(window);
    }

    pub fn repair_window(&self, window: Window) {
        self.state.borrow_mut().broken.remove(&window);
    }

    /// Make every paint request fail
    pub fn fail_paints(&self, fail: bool) {
        self.state.borrow_mut().fail_paints = fail;
    }

    pub fn created_count(&self) -> usize {
        self.state.borrow().created
    }

    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    pub fn exists(&self, window: Window) -> bool {
        self.state.borrow().windows.contains_key(&window)
    }

    pub fn parent(&self, window: Window) -> Option<Window> {
        self.state.borrow().windows.get(&window).map(|w| w.parent)
    }

    pub fn geometry(&self, window: Window) -> Rect {
        self.window(window).rect
    }

    pub fn border_width(&self, window: Window) -> u32 {
        self.window(window).border_width
    }

    pub fn border_color(&self, window: Window) -> Option<u32> {
        self.window(window).border_color
    }

    pub fn is_mapped(&self, window: Window) -> bool {
        self.window(window).mapped
    }

    /// Mapped, and every ancestor mapped too
    pub fn is_viewable(&self, window: Window) -> bool {
        let state = self.state.borrow();
        let mut current = window;
        loop {
            let Some(w) = state.windows.get(&current) else {
                return false;
            };
            if !w.mapped {
                return false;
            }
            if current == ROOT {
                return true;
            }
            current = w.parent;
        }
    }

    pub fn is_override_redirect(&self, window: Window) -> bool {
        self.window(window).override_redirect
    }

    pub fn event_mask(&self, window: Window) -> EventMask {
        self.window(window).event_mask
    }

    pub fn shape(&self, window: Window) -> Option<Vec<Rect>> {
        self.window(window).shape
    }

    pub fn in_save_set(&self, window: Window) -> bool {
        self.state.borrow().save_set.contains(&window)
    }

    pub fn frame_extents(&self, window: Window) -> Option<Strut> {
        self.state.borrow().extents.get(&window).copied()
    }

    pub fn configure_notifies(&self) -> Vec<(Window, Rect)> {
        self.state.borrow().configure_notifies.clone()
    }

    pub fn last_paint(&self, window: Window) -> Option<Texture> {
        self.state.borrow().paints.get(&window).copied()
    }

    pub fn last_text(&self, window: Window) -> Option<String> {
        self.state.borrow().texts.get(&window).cloned()
    }

    pub fn clear_paints(&self) {
        let mut state = self.state.borrow_mut();
        state.paints.clear();
        state.texts.clear();
    }

    pub fn font(&self) -> String {
        self.state.borrow().font.clone()
    }

    fn window(&self, window: Window) -> MockWindow {
        self.state
            .borrow()
            .windows
            .get(&window)
            .cloned()
            .unwrap_or_else(|| panic!("no window 0x{:x}", window))
    }

    fn with_window<T>(
        &self,
        window: Window,
        f: impl FnOnce(&mut MockWindow) -> T,
    ) -> Result<T, FrameError> {
        let mut state = self.state.borrow_mut();
        if state.broken.contains(&window) {
            return Err(FrameError::Backend(format!("BadMatch 0x{:x}", window)));
        }
        let w = state
            .windows
            .get_mut(&window)
            .ok_or_else(|| FrameError::Backend(format!("BadWindow 0x{:x}", window)))?;
        Ok(f(w))
    }
}

impl WindowSystem for MockDisplay {
    fn root(&self) -> Window {
        ROOT
    }

    fn create_window(
        &self,
        parent: Window,
        rect: Rect,
        attrs: &WindowAttributes,
    ) -> Result<Window, FrameError> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = state.fail_after {
            if state.created >= limit {
                return Err(FrameError::Backend("BadAlloc".into()));
            }
        }
        if !state.windows.contains_key(&parent) {
            return Err(FrameError::Backend(format!("BadWindow 0x{:x}", parent)));
        }
        let window = state.next_id;
        state.next_id += 1;
        state.created += 1;
        state.windows.insert(
            window,
            MockWindow {
                parent,
                rect,
                border_color: attrs.border_color,
                event_mask: attrs.event_mask,
                override_redirect: attrs.override_redirect,
                ..Default::default()
            },
        );
        Ok(window)
    }

    fn destroy_window(&self, window: Window) -> Result<(), FrameError> {
        let mut state = self.state.borrow_mut();
        if !state.windows.contains_key(&window) {
            return Err(FrameError::Backend(format!("BadWindow 0x{:x}", window)));
        }
        // the whole subtree goes, like on a real server
        let mut doomed = vec![window];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(
                state
                    .windows
                    .iter()
                    .filter(|(_, w)| w.parent == parent)
                    .map(|(&id, _)| id)
                    .filter(|id| *id != ROOT),
            );
            i += 1;
        }
        for id in doomed {
            state.windows.remove(&id);
            state.save_set.remove(&id);
        }
        Ok(())
    }

    fn reparent_window(
        &self,
        window: Window,
        parent: Window,
        x: i32,
        y: i32,
    ) -> Result<(), FrameError> {
        if !self.exists(parent) {
            return Err(FrameError::Backend(format!("BadWindow 0x{:x}", parent)));
        }
        self.with_window(window, |w| {
            w.parent = parent;
            w.rect = w.rect.with_position(x, y);
        })
    }

    fn map_window(&self, window: Window) -> Result<(), FrameError> {
        self.with_window(window, |w| w.mapped = true)
    }

    fn unmap_window(&self, window: Window) -> Result<(), FrameError> {
        self.with_window(window, |w| w.mapped = false)
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> Result<(), FrameError> {
        self.with_window(window, |w| w.rect = w.rect.with_position(x, y))
    }

    fn resize_window(&self, window: Window, size: Size) -> Result<(), FrameError> {
        self.with_window(window, |w| w.rect = w.rect.with_size(size))
    }

    fn set_border_width(&self, window: Window, width: u32) -> Result<(), FrameError> {
        self.with_window(window, |w| w.border_width = width)
    }

    fn set_border_color(&self, window: Window, pixel: u32) -> Result<(), FrameError> {
        self.with_window(window, |w| w.border_color = Some(pixel))
    }

    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<(), FrameError> {
        self.with_window(window, |w| {
            let rect = w.rect;
            w.rect = Rect::new(
                changes.x.unwrap_or(rect.x),
                changes.y.unwrap_or(rect.y),
                changes.width.unwrap_or(rect.width),
                changes.height.unwrap_or(rect.height),
            );
            if let Some(bw) = changes.border_width {
                w.border_width = bw;
            }
        })
    }

    fn select_input(&self, window: Window, mask: EventMask) -> Result<(), FrameError> {
        self.with_window(window, |w| w.event_mask = mask)
    }

    fn change_save_set(&self, window: Window, insert: bool) -> Result<(), FrameError> {
        if !self.exists(window) {
            return Err(FrameError::Backend(format!("BadWindow 0x{:x}", window)));
        }
        let mut state = self.state.borrow_mut();
        if insert {
            state.save_set.insert(window);
        } else {
            state.save_set.remove(&window);
        }
        Ok(())
    }

    fn set_shape(&self, window: Window, rects: Option<&[Rect]>) -> Result<(), FrameError> {
        self.with_window(window, |w| w.shape = rects.map(|r| r.to_vec()))
    }

    fn set_frame_extents(&self, client: Window, extents: &Strut) -> Result<(), FrameError> {
        self.state.borrow_mut().extents.insert(client, *extents);
        Ok(())
    }

    fn send_configure_notify(
        &self,
        client: Window,
        rect: Rect,
        _border_width: u32,
    ) -> Result<(), FrameError> {
        self.state.borrow_mut().configure_notifies.push((client, rect));
        Ok(())
    }

    fn query_client(&self, window: Window) -> Result<ClientInfo, FrameError> {
        let state = self.state.borrow();
        let info = state
            .clients
            .get(&window)
            .ok_or_else(|| FrameError::Backend(format!("BadWindow 0x{:x}", window)))?;
        let w = state
            .windows
            .get(&window)
            .ok_or_else(|| FrameError::Backend(format!("BadWindow 0x{:x}", window)))?;
        Ok(ClientInfo {
            geometry: w.rect,
            border_width: w.border_width,
            mapped: w.mapped,
            shape: w.shape.clone(),
            ..info.clone()
        })
    }

    fn flush(&self) -> Result<(), FrameError> {
        Ok(())
    }
}

impl Painter for MockDisplay {
    fn set_font(&self, font: &str, char_width: u32) -> Result<(), FrameError> {
        let mut state = self.state.borrow_mut();
        state.font = font.to_string();
        state.char_width = char_width;
        Ok(())
    }

    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.state.borrow().char_width
    }

    fn paint(&self, window: Window, _size: Size, texture: &Texture) -> Result<(), FrameError> {
        let mut state = self.state.borrow_mut();
        if state.fail_paints || !state.windows.contains_key(&window) || state.broken.contains(&window)
        {
            return Err(FrameError::Backend(format!("BadDrawable 0x{:x}", window)));
        }
        state.paints.insert(window, *texture);
        state.texts.remove(&window);
        Ok(())
    }

    fn paint_text(
        &self,
        window: Window,
        _x: i32,
        _y: i32,
        text: &str,
        _color: u32,
    ) -> Result<(), FrameError> {
        self.state.borrow_mut().texts.insert(window, text.to_string());
        Ok(())
    }
}
