//! Plain geometry types shared by the frame core and the WM glue.

pub mod geometry;

pub use geometry::{Rect, Size, Strut};
