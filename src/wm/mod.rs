//! Window Manager Module
//!
//! Frames every managed client and routes windowing-system events to the
//! frame they belong to.

pub mod client;
pub mod client_flags;
pub mod context;
pub mod display;
pub mod events;
pub mod frame;
pub mod registry;
pub mod style;
pub mod x11;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::shared::{Rect, Size};
use crate::wm::client::Client;
use crate::wm::client_flags::ClientState;
use crate::wm::context::MouseContext;
use crate::wm::display::{Display, EventMask, FrameError, Window, WindowChanges};
use crate::wm::events::{EventHandler, EventResult, FrameEvent};
use crate::wm::frame::Frame;
use crate::wm::frame::decorations::TitleLayout;
use crate::wm::registry::WindowRegistry;
use crate::wm::style::{RenderStyle, StyleNotify};

/// Selected on every managed client window
pub const CLIENT_EVENT_MASK: EventMask =
    EventMask::PROPERTY_CHANGE.union(EventMask::FOCUS_CHANGE);

pub struct WindowManager<D: Display> {
    display: D,
    style: Rc<RenderStyle>,
    layout: TitleLayout,
    clients: HashMap<Window, Client>,
    /// Keyed by client window
    frames: HashMap<Window, Frame>,
    registry: WindowRegistry,
    focused: Option<Window>,
}

impl<D: Display> WindowManager<D> {
    pub fn new(display: D, style: RenderStyle, layout: TitleLayout) -> Result<Self, FrameError> {
        let style = Rc::new(style.clamped());
        display.set_font(&style.font, style.font_char_width)?;
        info!(
            "Window manager ready (font {}, {} titlebar buttons)",
            style.font,
            layout.buttons().len()
        );
        Ok(Self {
            display,
            style,
            layout,
            clients: HashMap::new(),
            frames: HashMap::new(),
            registry: WindowRegistry::new(),
            focused: None,
        })
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn style(&self) -> &Rc<RenderStyle> {
        &self.style
    }

    pub fn client(&self, window: Window) -> Option<&Client> {
        self.clients.get(&window)
    }

    pub fn frame(&self, window: Window) -> Option<&Frame> {
        self.frames.get(&window)
    }

    pub fn is_managed(&self, window: Window) -> bool {
        self.clients.contains_key(&window)
    }

    pub fn managed_count(&self) -> usize {
        self.clients.len()
    }

    /// The client owning `handle`, which is either the client window itself
    /// or one of its decoration windows
    pub fn owner_of(&self, handle: Window) -> Option<Window> {
        self.registry.lookup(handle)
    }

    /// Frame a client window.
    ///
    /// `startup` is set for windows that already existed when the manager
    /// started; those may already be mapped, and reparenting a mapped window
    /// produces an unmap we must not take for a withdraw.
    pub fn manage(&mut self, window: Window, startup: bool) -> Result<(), FrameError> {
        if self.clients.contains_key(&window) {
            warn!("Window 0x{:x} is already managed", window);
            return Ok(());
        }

        let info = self.display.query_client(window)?;
        let mapped = info.mapped;
        let mut client = Client::from_info(info);
        if startup && mapped {
            client.ignore_unmaps += 1;
        }

        self.display.select_input(window, CLIENT_EVENT_MASK)?;
        // the frame draws the border from here on
        if client.border_width != 0 {
            self.display.set_border_width(window, 0)?;
        }

        let mut frame = match Frame::new(&self.display, &client, self.style.clone(), &self.layout) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to frame window 0x{:x}: {}", window, e);
                let _ = self.display.select_input(window, EventMask::empty());
                if client.border_width != 0 {
                    let _ = self.display.set_border_width(window, client.border_width);
                }
                return Err(e);
            }
        };
        self.registry.register(window, &frame.all_windows());

        self.display.map_window(window)?;
        if !client.iconic() {
            frame.show(&self.display)?;
        }
        self.send_configure(&client, &frame)?;

        info!(
            "Managing 0x{:x} \"{}\" ({}x{}{})",
            window,
            client.title,
            client.area.width,
            client.area.height,
            if client.iconic() { ", iconic" } else { "" }
        );
        self.clients.insert(window, client);
        self.frames.insert(window, frame);
        Ok(())
    }

    /// Give a client back to the root window and drop its frame
    pub fn unmanage(&mut self, window: Window) -> Result<(), FrameError> {
        self.unmanage_client(window, true)
    }

    /// The client stays managed until it is off the plate; after that the
    /// rest of the teardown is best-effort and reports its first failure.
    fn unmanage_client(&mut self, window: Window, alive: bool) -> Result<(), FrameError> {
        let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, window) else {
            return Err(FrameError::UnknownWindow(window));
        };

        let mut first_error = None;
        if let Err(e) = frame.hide(&self.display) {
            warn!("Failed to hide frame of 0x{:x}: {}", window, e);
            first_error = Some(e);
        }
        if alive {
            if let Err(e) = frame.release_client(&self.display, client) {
                error!("Failed to release 0x{:x}, keeping it managed: {}", window, e);
                return Err(e);
            }
        } else {
            frame.forget_client();
        }

        let (Some(client), Some(frame)) = (self.clients.remove(&window), self.frames.remove(&window))
        else {
            return Err(FrameError::UnknownWindow(window));
        };
        self.registry.unregister(window);
        if self.focused == Some(window) {
            self.focused = None;
        }

        let mut note = |result: Result<(), FrameError>, what: &str| {
            if let Err(e) = result {
                warn!("Failed to {} for 0x{:x}: {}", what, window, e);
                first_error.get_or_insert(e);
            }
        };
        if alive {
            note(self.display.select_input(window, EventMask::empty()), "clear the event mask");
            if client.border_width != 0 {
                note(
                    self.display.set_border_width(window, client.border_width),
                    "restore the border",
                );
            }
        }
        note(frame.destroy(&self.display), "destroy the frame");

        info!("Unmanaged 0x{:x} \"{}\"", window, client.title);
        first_error.map_or(Ok(()), Err)
    }

    /// Route one event to the frame it belongs to
    pub fn handle_event(&mut self, event: &FrameEvent) -> Result<EventResult, FrameError> {
        match event {
            FrameEvent::MapRequest { window } => self.on_map_request(*window),
            FrameEvent::ConfigureRequest {
                window,
                x,
                y,
                width,
                height,
                border_width,
            } => self.on_configure_request(*window, *x, *y, *width, *height, *border_width),
            FrameEvent::UnmapNotify { window } => self.on_unmap(*window),
            FrameEvent::DestroyNotify { window } => {
                if !self.is_managed(*window) {
                    return Ok(EventResult::Ignore);
                }
                debug!("Client 0x{:x} destroyed", window);
                self.unmanage_client(*window, false)?;
                Ok(EventResult::Handled)
            }
            FrameEvent::TitleChanged { window, title } => {
                let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, *window) else {
                    return Ok(EventResult::Ignore);
                };
                client.title = title.clone();
                frame.adjust_title(&self.display, client)?;
                Ok(EventResult::Handled)
            }
            FrameEvent::FocusIn { window } => self.on_focus(*window, true),
            FrameEvent::FocusOut { window } => self.on_focus(*window, false),
            FrameEvent::ShapeChanged { window, shape } => {
                let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, *window) else {
                    return Ok(EventResult::Ignore);
                };
                client.set_shape(shape.clone());
                frame.adjust_shape(&self.display, client)?;
                Ok(EventResult::Handled)
            }
            FrameEvent::StateChanged { window, state } => self.on_state(*window, *state),
            FrameEvent::Expose { window, .. }
            | FrameEvent::EnterNotify { window }
            | FrameEvent::LeaveNotify { window } => {
                let Some(owner) = self.registry.lookup(*window) else {
                    return Ok(EventResult::Ignore);
                };
                let (Some(client), Some(frame)) =
                    (self.clients.get(&owner), self.frames.get_mut(&owner))
                else {
                    return Ok(EventResult::Ignore);
                };
                frame.handle_event(&self.display, client, event)
            }
            FrameEvent::ButtonPress {
                window,
                button,
                root_x,
                root_y,
            } => {
                let context = self.mouse_context(*window);
                if context.is_none() {
                    return Ok(EventResult::Ignore);
                }
                debug!(
                    "Button {} on {:?} of 0x{:x} at ({}, {}){}",
                    button,
                    context,
                    window,
                    root_x,
                    root_y,
                    if context.moves() {
                        " [move]"
                    } else if context.resizes() {
                        " [resize]"
                    } else {
                        ""
                    }
                );
                Ok(EventResult::Continue)
            }
        }
    }

    /// Which part of which frame `window` is
    pub fn mouse_context(&self, window: Window) -> MouseContext {
        let Some(owner) = self.registry.lookup(window) else {
            return MouseContext::None;
        };
        if owner == window {
            return MouseContext::ClientArea;
        }
        self.frames
            .get(&owner)
            .map_or(MouseContext::None, |frame| frame.mouse_context(window))
    }

    /// Switch every frame to a new style.
    ///
    /// Every frame is offered the style even if an earlier one fails; a frame
    /// that can't take it keeps its previous style whole. Returns the first
    /// failure.
    pub fn set_style(&mut self, style: RenderStyle) -> Result<(), FrameError> {
        let style = Rc::new(style.clamped());
        self.display.set_font(&style.font, style.font_char_width)?;
        self.style = style.clone();

        let mut first_error = None;
        let mut failed = 0;
        for (window, frame) in self.frames.iter_mut() {
            let Some(client) = self.clients.get(window) else {
                continue;
            };
            if let Err(e) = frame.style_changed(&self.display, client, style.clone()) {
                error!("Failed to restyle frame of 0x{:x}: {}", window, e);
                failed += 1;
                first_error.get_or_insert(e);
            }
        }
        self.display.flush()?;
        info!(
            "Style applied to {} of {} frames",
            self.frames.len() - failed,
            self.frames.len()
        );
        first_error.map_or(Ok(()), Err)
    }

    /// Titlebar layout for frames created from now on; existing frames keep
    /// the buttons they were built with
    pub fn set_layout(&mut self, layout: TitleLayout) {
        debug!("Title layout now has {} buttons", layout.buttons().len());
        self.layout = layout;
    }

    pub fn layout(&self) -> &TitleLayout {
        &self.layout
    }

    /// Release every client and destroy every frame
    pub fn shutdown(&mut self) -> Result<(), FrameError> {
        let windows: Vec<Window> = self.clients.keys().copied().collect();
        let mut first_error = None;
        for window in windows {
            if let Err(e) = self.unmanage(window) {
                error!("Failed to unmanage 0x{:x} on shutdown: {}", window, e);
                first_error.get_or_insert(e);
            }
        }
        self.registry.clear();
        self.display.flush()?;
        info!("Window manager shut down");
        first_error.map_or(Ok(()), Err)
    }

    fn on_map_request(&mut self, window: Window) -> Result<EventResult, FrameError> {
        if let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, window) {
            // a managed client asking to be mapped is leaving iconic state
            client.state.remove(ClientState::ICONIC);
            self.display.map_window(window)?;
            frame.show(&self.display)?;
            debug!("Client 0x{:x} restored", window);
            return Ok(EventResult::Handled);
        }
        self.manage(window, false)?;
        Ok(EventResult::Handled)
    }

    fn on_configure_request(
        &mut self,
        window: Window,
        x: Option<i32>,
        y: Option<i32>,
        width: Option<u32>,
        height: Option<u32>,
        border_width: Option<u32>,
    ) -> Result<EventResult, FrameError> {
        let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, window) else {
            // not ours; let it have exactly what it asked for
            let changes = WindowChanges {
                x,
                y,
                width,
                height,
                border_width,
            };
            if !changes.is_empty() {
                self.display.configure_window(window, &changes)?;
            }
            return Ok(EventResult::Handled);
        };

        let area = client.area;
        client.move_to(x.unwrap_or(area.x), y.unwrap_or(area.y));
        client.resize(Size::new(
            width.unwrap_or(area.width).max(1),
            height.unwrap_or(area.height).max(1),
        ));
        if let Some(bw) = border_width {
            // kept for when the client is released
            client.border_width = bw;
        }

        if client.area.size() != area.size() {
            frame.adjust_size(&self.display, client)?;
        }
        if client.area.size() != area.size() || (client.area.x, client.area.y) != (area.x, area.y) {
            frame.adjust_position(&self.display, client)?;
        }

        let (client, frame) = (&self.clients[&window], &self.frames[&window]);
        self.send_configure(client, frame)?;
        debug!("Client 0x{:x} configured to {:?}", window, client.area);
        Ok(EventResult::Handled)
    }

    fn on_unmap(&mut self, window: Window) -> Result<EventResult, FrameError> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(EventResult::Ignore);
        };
        if client.ignore_unmaps > 0 {
            client.ignore_unmaps -= 1;
            debug!(
                "Ignoring unmap of 0x{:x} ({} left)",
                window, client.ignore_unmaps
            );
            return Ok(EventResult::Ignore);
        }
        self.unmanage(window)?;
        Ok(EventResult::Handled)
    }

    fn on_focus(&mut self, window: Window, focused: bool) -> Result<EventResult, FrameError> {
        if !self.is_managed(window) {
            return Ok(EventResult::Ignore);
        }
        if focused {
            if let Some(previous) = self.focused.filter(|&w| w != window) {
                if let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, previous) {
                    client.state.remove(ClientState::FOCUSED);
                    frame.adjust_focus(&self.display, client)?;
                }
            }
            self.focused = Some(window);
        } else if self.focused == Some(window) {
            self.focused = None;
        }

        let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, window) else {
            return Ok(EventResult::Ignore);
        };
        if client.focused() == focused {
            return Ok(EventResult::Handled);
        }
        client.state.set(ClientState::FOCUSED, focused);
        frame.adjust_focus(&self.display, client)?;
        Ok(EventResult::Handled)
    }

    fn on_state(&mut self, window: Window, state: ClientState) -> Result<EventResult, FrameError> {
        let Some((client, frame)) = managed_mut(&mut self.clients, &mut self.frames, window) else {
            return Ok(EventResult::Ignore);
        };
        let was_iconic = client.iconic();

        // shape and focus are tracked from their own events
        let kept = client.state & (ClientState::SHAPED | ClientState::FOCUSED);
        client.state = (state - ClientState::SHAPED - ClientState::FOCUSED) | kept;

        match (was_iconic, client.iconic()) {
            (false, true) => {
                frame.hide(&self.display)?;
                // our own unmap of the client must not read as a withdraw
                client.ignore_unmaps += 1;
                self.display.unmap_window(window)?;
            }
            (true, false) => {
                self.display.map_window(window)?;
                frame.show(&self.display)?;
            }
            _ => {}
        }

        frame.adjust_state(&self.display, client)?;
        debug!("Client 0x{:x} state {:?}", window, client.state);
        Ok(EventResult::Handled)
    }

    /// Tell the client where it really is (ICCCM 4.1.5)
    fn send_configure(&self, client: &Client, frame: &Frame) -> Result<(), FrameError> {
        let (x, y) = frame.client_root_position();
        self.display.send_configure_notify(
            client.window,
            Rect::new(x, y, client.area.width, client.area.height),
            0,
        )
    }
}

/// A managed client together with its frame
fn managed_mut<'a>(
    clients: &'a mut HashMap<Window, Client>,
    frames: &'a mut HashMap<Window, Frame>,
    window: Window,
) -> Option<(&'a mut Client, &'a mut Frame)> {
    match (clients.get_mut(&window), frames.get_mut(&window)) {
        (Some(client), Some(frame)) => Some((client, frame)),
        _ => None,
    }
}

impl<D: Display> Drop for WindowManager<D> {
    fn drop(&mut self) {
        if !self.clients.is_empty() {
            warn!(
                "Window manager dropped with {} clients still framed",
                self.clients.len()
            );
            if let Err(e) = self.shutdown() {
                error!("Shutdown on drop failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::display::{ClientInfo, Painter, WindowSystem};
    use crate::wm::frame::gravity::Gravity;
    use crate::wm::testing::MockDisplay;

    fn manager() -> WindowManager<MockDisplay> {
        WindowManager::new(MockDisplay::new(), RenderStyle::default(), TitleLayout::default())
            .unwrap()
    }

    fn add(wm: &WindowManager<MockDisplay>, rect: Rect, mapped: bool) -> Window {
        wm.display().add_client(ClientInfo {
            geometry: rect,
            gravity: Gravity::NorthWest,
            title: "term".into(),
            mapped,
            ..Default::default()
        })
    }

    #[test]
    fn test_map_request_manages_and_shows() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(40, 40, 300, 200), false);

        let result = wm.handle_event(&FrameEvent::MapRequest { window }).unwrap();
        assert_eq!(result, EventResult::Handled);
        assert!(wm.is_managed(window));

        let frame = wm.frame(window).unwrap();
        assert!(frame.visible());
        assert!(wm.display().is_viewable(window));
        assert_eq!(wm.display().event_mask(window), CLIENT_EVENT_MASK);
        assert_eq!(wm.display().parent(window), Some(frame.plate()));
        for handle in frame.all_windows() {
            assert_eq!(wm.owner_of(handle), Some(window));
        }
        assert_eq!(wm.owner_of(window), Some(window));
        assert_eq!(wm.display().frame_extents(window), Some(*frame.size()));

        let (x, y) = frame.client_root_position();
        let notifies = wm.display().configure_notifies();
        assert_eq!(notifies.last(), Some(&(window, Rect::new(x, y, 300, 200))));

        wm.shutdown().unwrap();
    }

    #[test]
    fn test_startup_unmap_is_ignored() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 100, 100), true);
        wm.manage(window, true).unwrap();

        // the unmap our reparent caused
        let result = wm.handle_event(&FrameEvent::UnmapNotify { window }).unwrap();
        assert_eq!(result, EventResult::Ignore);
        assert!(wm.is_managed(window));

        // a real withdraw
        let result = wm.handle_event(&FrameEvent::UnmapNotify { window }).unwrap();
        assert_eq!(result, EventResult::Handled);
        assert!(!wm.is_managed(window));
        assert_eq!(wm.display().parent(window), Some(wm.display().root_window()));
        assert_eq!(wm.display().window_count(), 2);
    }

    #[test]
    fn test_destroyed_client_drops_frame() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(window, false).unwrap();
        let frame_window = wm.frame(window).unwrap().window();

        wm.display().destroy_window(window).unwrap();
        let result = wm.handle_event(&FrameEvent::DestroyNotify { window }).unwrap();
        assert_eq!(result, EventResult::Handled);
        assert!(!wm.display().exists(frame_window));
        assert_eq!(wm.owner_of(frame_window), None);
        assert_eq!(wm.display().window_count(), 1);
    }

    #[test]
    fn test_configure_request_resizes_frame() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(10, 10, 100, 100), false);
        wm.manage(window, false).unwrap();
        let before = *wm.frame(window).unwrap().area();

        wm.handle_event(&FrameEvent::ConfigureRequest {
            window,
            x: None,
            y: None,
            width: Some(250),
            height: None,
            border_width: None,
        })
        .unwrap();

        let frame = wm.frame(window).unwrap();
        assert_eq!(wm.client(window).unwrap().area.size(), Size::new(250, 100));
        assert_eq!(frame.area().width, before.width + 150);
        assert_eq!(frame.area().height, before.height);
        assert_eq!(wm.display().geometry(frame.plate()).size(), Size::new(250, 100));
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_configure_request_for_unmanaged_window_passes_through() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(10, 10, 100, 100), false);
        wm.handle_event(&FrameEvent::ConfigureRequest {
            window,
            x: Some(20),
            y: Some(30),
            width: Some(50),
            height: Some(60),
            border_width: None,
        })
        .unwrap();
        assert_eq!(wm.display().geometry(window), Rect::new(20, 30, 50, 60));
    }

    #[test]
    fn test_partial_configure_request_keeps_other_fields() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(10, 10, 100, 100), false);
        let request = |x, width| FrameEvent::ConfigureRequest {
            window,
            x,
            y: None,
            width,
            height: None,
            border_width: None,
        };

        wm.handle_event(&request(Some(20), None)).unwrap();
        assert_eq!(wm.display().geometry(window), Rect::new(20, 10, 100, 100));

        wm.handle_event(&request(None, Some(50))).unwrap();
        assert_eq!(wm.display().geometry(window), Rect::new(20, 10, 50, 100));
    }

    #[test]
    fn test_focus_moves_between_frames() {
        let mut wm = manager();
        let a = add(&wm, Rect::new(0, 0, 100, 100), false);
        let b = add(&wm, Rect::new(200, 0, 100, 100), false);
        wm.manage(a, false).unwrap();
        wm.manage(b, false).unwrap();
        let focused = wm.style().label.focused;
        let unfocused = wm.style().label.unfocused;

        wm.handle_event(&FrameEvent::FocusIn { window: a }).unwrap();
        assert!(wm.client(a).unwrap().focused());
        assert_eq!(wm.frame(a).unwrap().label_surface().unwrap().texture, focused);

        wm.handle_event(&FrameEvent::FocusIn { window: b }).unwrap();
        assert!(!wm.client(a).unwrap().focused());
        assert!(wm.client(b).unwrap().focused());
        assert_eq!(wm.frame(a).unwrap().label_surface().unwrap().texture, unfocused);
        assert_eq!(wm.frame(b).unwrap().label_surface().unwrap().texture, focused);
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_title_change_reaches_label() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 400, 100), false);
        wm.manage(window, false).unwrap();

        wm.handle_event(&FrameEvent::TitleChanged {
            window,
            title: "make check".into(),
        })
        .unwrap();
        let label = wm.frame(window).unwrap().label_surface().unwrap();
        assert_eq!(label.text.as_ref().unwrap().text, "make check");
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_iconify_and_restore() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(window, false).unwrap();

        wm.handle_event(&FrameEvent::StateChanged {
            window,
            state: ClientState::ICONIC,
        })
        .unwrap();
        assert!(!wm.frame(window).unwrap().visible());
        // the unmap we just did
        assert_eq!(
            wm.handle_event(&FrameEvent::UnmapNotify { window }).unwrap(),
            EventResult::Ignore
        );
        assert!(wm.is_managed(window));

        wm.handle_event(&FrameEvent::MapRequest { window }).unwrap();
        assert!(!wm.client(window).unwrap().iconic());
        assert!(wm.display().is_viewable(window));
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_button_press_resolves_context() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(window, false).unwrap();
        let frame = wm.frame(window).unwrap();
        let plate = frame.plate();

        assert_eq!(wm.mouse_context(window), MouseContext::ClientArea);
        assert_eq!(wm.mouse_context(plate), frame.mouse_context(plate));
        assert_eq!(wm.mouse_context(0xdead), MouseContext::None);

        let press = |w| FrameEvent::ButtonPress {
            window: w,
            button: 1,
            root_x: 5,
            root_y: 5,
        };
        assert_eq!(wm.handle_event(&press(plate)).unwrap(), EventResult::Continue);
        assert_eq!(wm.handle_event(&press(0xdead)).unwrap(), EventResult::Ignore);
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_unknown_windows_are_ignored() {
        let mut wm = manager();
        for event in [
            FrameEvent::UnmapNotify { window: 0xdead },
            FrameEvent::DestroyNotify { window: 0xdead },
            FrameEvent::FocusIn { window: 0xdead },
            FrameEvent::Expose { window: 0xdead, count: 0 },
            FrameEvent::TitleChanged {
                window: 0xdead,
                title: "x".into(),
            },
        ] {
            assert_eq!(wm.handle_event(&event).unwrap(), EventResult::Ignore);
        }
        assert_eq!(wm.unmanage(0xdead), Err(FrameError::UnknownWindow(0xdead)));
    }

    #[test]
    fn test_set_style_restyles_every_frame() {
        let mut wm = manager();
        let a = add(&wm, Rect::new(0, 0, 100, 100), false);
        let b = add(&wm, Rect::new(0, 0, 200, 100), false);
        wm.manage(a, false).unwrap();
        wm.manage(b, false).unwrap();

        let style = RenderStyle {
            font: "9x15".into(),
            font_height: 20,
            handle_height: 10,
            ..Default::default()
        };
        wm.set_style(style).unwrap();

        assert_eq!(wm.display().font(), "9x15");
        for window in [a, b] {
            let frame = wm.frame(window).unwrap();
            assert_eq!(frame.geometry().font_height, 20);
            assert_eq!(frame.geometry().handle_height, 10);
            assert!(Rc::ptr_eq(frame.style(), wm.style()));
            assert_eq!(wm.display().frame_extents(window), Some(*frame.size()));
        }
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_set_style_reaches_frames_after_a_failure() {
        let mut wm = manager();
        let a = add(&wm, Rect::new(0, 0, 100, 100), false);
        let b = add(&wm, Rect::new(200, 0, 100, 100), false);
        wm.manage(a, false).unwrap();
        wm.manage(b, false).unwrap();
        let old = wm.style().clone();
        let broken = wm.frame(a).unwrap().window();
        let old_geometry = *wm.frame(a).unwrap().geometry();

        wm.display().break_window(broken);
        let result = wm.set_style(RenderStyle {
            font_height: 20,
            ..Default::default()
        });
        assert!(matches!(result, Err(FrameError::Backend(_))));

        // the broken frame keeps the old style whole, the other one restyles
        let frame = wm.frame(a).unwrap();
        assert!(Rc::ptr_eq(frame.style(), &old));
        assert_eq!(*frame.geometry(), old_geometry);
        let frame = wm.frame(b).unwrap();
        assert!(Rc::ptr_eq(frame.style(), wm.style()));
        assert_eq!(frame.geometry().font_height, 20);

        wm.display().repair_window(broken);
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_failed_release_keeps_client_managed() {
        let mut wm = manager();
        let window = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(window, false).unwrap();
        let frame_window = wm.frame(window).unwrap().window();

        wm.display().break_window(window);
        assert!(matches!(wm.unmanage(window), Err(FrameError::Backend(_))));
        assert!(wm.is_managed(window));
        assert!(wm.frame(window).unwrap().grabbed());
        assert_eq!(wm.owner_of(frame_window), Some(window));
        assert!(wm.display().exists(frame_window));

        wm.display().repair_window(window);
        wm.unmanage(window).unwrap();
        assert_eq!(wm.display().parent(window), Some(wm.display().root_window()));
        assert!(!wm.display().exists(frame_window));
        assert_eq!(wm.owner_of(frame_window), None);
    }

    #[test]
    fn test_teardown_after_release_reports_but_finishes() {
        let mut wm = manager();
        let window = wm.display().add_client(ClientInfo {
            geometry: Rect::new(0, 0, 100, 100),
            border_width: 2,
            ..Default::default()
        });
        wm.manage(window, false).unwrap();
        let frame_window = wm.frame(window).unwrap().window();

        // hiding fails, the release still goes through
        wm.display().break_window(frame_window);
        assert!(matches!(wm.unmanage(window), Err(FrameError::Backend(_))));
        assert!(!wm.is_managed(window));
        assert_eq!(wm.owner_of(frame_window), None);
        assert_eq!(wm.display().parent(window), Some(wm.display().root_window()));
        assert_eq!(wm.display().border_width(window), 2);
        assert!(!wm.display().exists(frame_window));
    }

    #[test]
    fn test_fallback_char_width_reaches_display() {
        let style = RenderStyle {
            font_char_width: 10,
            ..Default::default()
        };
        let mut wm = WindowManager::new(MockDisplay::new(), style, TitleLayout::default()).unwrap();
        assert_eq!(wm.display().text_width("abc"), 30);

        wm.set_style(RenderStyle {
            font_char_width: 7,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(wm.display().text_width("abc"), 21);
    }

    #[test]
    fn test_new_layout_applies_to_new_frames() {
        let mut wm = manager();
        let a = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(a, false).unwrap();

        wm.set_layout(TitleLayout::parse("LC").unwrap());
        let b = add(&wm, Rect::new(0, 0, 100, 100), false);
        wm.manage(b, false).unwrap();

        assert_eq!(wm.frame(a).unwrap().title_order().len(), 4);
        assert_eq!(wm.frame(b).unwrap().title_order().len(), 2);
        wm.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut wm = manager();
        let windows: Vec<Window> = (0..3)
            .map(|i| add(&wm, Rect::new(i * 50, i * 50, 100, 100), false))
            .collect();
        for &window in &windows {
            wm.manage(window, false).unwrap();
        }
        assert_eq!(wm.managed_count(), 3);

        wm.shutdown().unwrap();
        assert_eq!(wm.managed_count(), 0);
        for &window in &windows {
            assert_eq!(wm.display().parent(window), Some(wm.display().root_window()));
            assert_eq!(wm.owner_of(window), None);
        }
        // root plus the three clients
        assert_eq!(wm.display().window_count(), 4);
    }

    #[test]
    fn test_client_border_restored_on_unmanage() {
        let mut wm = manager();
        let window = wm.display().add_client(ClientInfo {
            geometry: Rect::new(0, 0, 100, 100),
            border_width: 3,
            ..Default::default()
        });
        wm.manage(window, false).unwrap();
        assert_eq!(wm.display().border_width(window), 0);

        wm.unmanage(window).unwrap();
        assert_eq!(wm.display().border_width(window), 3);
    }
}
