//! Platform abstraction layer
//!
//! Browser plumbing reduced to plain state the simulation can use:
//! - Keyboard and touch intents (`input`)
//! - Canvas sizing for desktop and mobile viewports

pub mod input;

pub use input::{InputState, Intent};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Viewports at or below this width get the compact canvas
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Canvas size for a window of the given inner size
pub fn canvas_size(window_width: f32, window_height: f32) -> (f32, f32) {
    if window_width <= MOBILE_BREAKPOINT {
        let width = (window_width - 40.0).clamp(1.0, 600.0);
        let height = (window_height * 0.5).clamp(1.0, 450.0);
        (width.floor(), height.floor())
    } else {
        (ARENA_WIDTH, ARENA_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size() {
        assert_eq!(canvas_size(1920.0, 1080.0), (800.0, 600.0));
        assert_eq!(canvas_size(390.0, 844.0), (350.0, 422.0));
        assert_eq!(canvas_size(768.0, 2000.0), (600.0, 450.0));
    }
}
