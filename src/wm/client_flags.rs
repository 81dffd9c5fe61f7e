//! Client Flags
//!
//! Bitfield flags for client state and requested decorations.

use bitflags::bitflags;

bitflags! {
    /// Client state flags the frame renders from
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClientState: u32 {
        const FOCUSED          = 1 << 0;
        const ICONIC           = 1 << 1;
        const SHADED           = 1 << 2;
        const MAXIMIZED_VERT   = 1 << 3;
        const MAXIMIZED_HORZ   = 1 << 4;
        const SHAPED           = 1 << 5;
        const ALL_DESKTOPS     = 1 << 6;
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ClientState {
    pub fn is_maximized(&self) -> bool {
        self.contains(Self::MAXIMIZED_VERT | Self::MAXIMIZED_HORZ)
    }
}

bitflags! {
    /// Decorations a client gets inside its frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Decorations: u32 {
        const TITLEBAR      = 1 << 0;
        const HANDLE        = 1 << 1;
        const BORDER        = 1 << 2;
        const ICONIFY       = 1 << 3;
        const MAXIMIZE      = 1 << 4;
        const CLOSE         = 1 << 5;
        const ALL_DESKTOPS  = 1 << 6;
    }
}

impl Default for Decorations {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decorations_are_full() {
        let decor = Decorations::default();
        assert!(decor.contains(Decorations::TITLEBAR | Decorations::HANDLE | Decorations::BORDER));
        assert!(decor.contains(Decorations::CLOSE));
    }

    #[test]
    fn test_maximized_needs_both_axes() {
        let mut state = ClientState::MAXIMIZED_VERT;
        assert!(!state.is_maximized());
        state |= ClientState::MAXIMIZED_HORZ;
        assert!(state.is_maximized());
    }
}
