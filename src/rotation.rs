//! Rotation to memory-access-control mapping
//!
//! The ST7789V rotates in hardware: the MADCTL register decides in which
//! order the controller walks its frame memory while pixel data streams in.
//! Rotating therefore never touches the pixel buffer, only this one byte.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation, no exchange or mirroring
//! - **Rotate90**: Rows and columns exchanged, columns mirrored
//! - **Rotate180**: Rows and columns both mirrored
//! - **Rotate270**: Rows and columns exchanged, rows mirrored
//!
//! ## Example
//!
//! ```
//! use badge_bsp::{rotation::madctl, Rotation};
//!
//! assert_eq!(madctl(Rotation::Rotate0), 0x00);
//! assert_eq!(madctl(Rotation::Rotate180), 0xC0);
//! ```

use crate::command::{MADCTL_MV, MADCTL_MX, MADCTL_MY};
use crate::config::Rotation;

/// MADCTL flags for a rotation
pub fn madctl(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Rotate0 => 0x00,
        Rotation::Rotate90 => MADCTL_MX | MADCTL_MV,
        Rotation::Rotate180 => MADCTL_MX | MADCTL_MY,
        Rotation::Rotate270 => MADCTL_MY | MADCTL_MV,
    }
}

/// Whether a rotation exchanges rows and columns
pub fn swaps_axes(rotation: Rotation) -> bool {
    madctl(rotation) & MADCTL_MV != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orientation_has_no_swap_or_mirror() {
        assert_eq!(madctl(Rotation::default()), 0x00);
        assert!(!swaps_axes(Rotation::default()));
    }

    #[test]
    fn test_quarter_turns_swap_axes() {
        assert!(swaps_axes(Rotation::Rotate90));
        assert!(swaps_axes(Rotation::Rotate270));
        assert!(!swaps_axes(Rotation::Rotate180));
    }

    #[test]
    fn test_madctl_values() {
        assert_eq!(madctl(Rotation::Rotate90), 0x60);
        assert_eq!(madctl(Rotation::Rotate180), 0xC0);
        assert_eq!(madctl(Rotation::Rotate270), 0xA0);
    }
}
