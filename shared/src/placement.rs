//! Geometry for placing the participant context menu next to the cursor.

use serde::{Deserialize, Serialize};

/// Gap kept between the menu and the viewport edge, in CSS pixels.
pub const VIEWPORT_MARGIN: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Top-left corner for a menu of `menu` size opened at `cursor`, kept inside
/// `viewport`. A menu larger than the viewport is pinned to the top-left margin.
pub fn clamp_to_viewport(cursor: Point, menu: Size, viewport: Size) -> Point {
    Point {
        x: clamp_axis(cursor.x, menu.width, viewport.width),
        y: clamp_axis(cursor.y, menu.height, viewport.height),
    }
}

fn clamp_axis(at: f64, extent: f64, limit: f64) -> f64 {
    let at = if at.is_finite() { at } else { 0.0 };
    let max = limit - extent - VIEWPORT_MARGIN;
    if max < VIEWPORT_MARGIN {
        return VIEWPORT_MARGIN;
    }
    at.clamp(VIEWPORT_MARGIN, max)
}
