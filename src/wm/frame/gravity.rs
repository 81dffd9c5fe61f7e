//! Window gravity
//!
//! A client asks for a position relative to one reference point (its
//! `win_gravity`). Once decorations are wrapped around it, that point has to
//! stay where the client asked for it, so the frame's top-left corner is
//! shifted by some share of the frame strut.

use crate::shared::Strut;

/// Anchor reference of a window (ICCCM `win_gravity`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    Static,
}

impl Gravity {
    pub const ALL: [Gravity; 10] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
        Gravity::Static,
    ];

    /// Decode the wire value from WM_NORMAL_HINTS.
    ///
    /// `ForgetGravity` (0) and out-of-range values fall back to the ICCCM
    /// default of NorthWest.
    pub fn from_wire(value: u32) -> Self {
        match value {
            2 => Gravity::North,
            3 => Gravity::NorthEast,
            4 => Gravity::West,
            5 => Gravity::Center,
            6 => Gravity::East,
            7 => Gravity::SouthWest,
            8 => Gravity::South,
            9 => Gravity::SouthEast,
            10 => Gravity::Static,
            _ => Gravity::NorthWest,
        }
    }

    /// Horizontal shift from client reference point to frame x
    fn dx(&self, size: &Strut) -> i32 {
        match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => 0,
            Gravity::North | Gravity::Center | Gravity::South => (size.horizontal() / 2) as i32,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => size.horizontal() as i32,
            Gravity::Static => size.left as i32,
        }
    }

    /// Vertical shift from client reference point to frame y
    fn dy(&self, size: &Strut) -> i32 {
        match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => 0,
            Gravity::West | Gravity::Center | Gravity::East => (size.vertical() / 2) as i32,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => size.vertical() as i32,
            Gravity::Static => size.top as i32,
        }
    }
}

/// Where the frame goes for a client that asked for `(x, y)`
pub fn client_gravity(gravity: Gravity, size: &Strut, x: i32, y: i32) -> (i32, i32) {
    (x - gravity.dx(size), y - gravity.dy(size))
}

/// Where the client reference point is for a frame sitting at `(x, y)`
pub fn frame_gravity(gravity: Gravity, size: &Strut, x: i32, y: i32) -> (i32, i32) {
    (x + gravity.dx(size), y + gravity.dy(size))
}
