//! Canvas dimensions and the safe drawing area inside them.

use crate::geometry::{Position, clamp};

/// Smallest canvas edge the engine lays out for.
pub const MIN_EXTENT: f32 = 200.0;
const FALLBACK_WIDTH: f32 = 600.0;
const FALLBACK_HEIGHT: f32 = 400.0;

/// Fractions of the canvas kept free on each side so labels do not clip.
const MARGIN_X_FRACTION: f32 = 0.08;
const MARGIN_Y_FRACTION: f32 = 0.10;

/// Per-side margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    /// The default margins for a canvas of the given size.
    pub fn proportional(width: f32, height: f32) -> Self {
        Self {
            left: width * MARGIN_X_FRACTION,
            right: width * MARGIN_X_FRACTION,
            top: height * MARGIN_Y_FRACTION,
            bottom: height * MARGIN_Y_FRACTION,
        }
    }
}

/// The canvas a session draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
}

impl Viewport {
    /// A viewport with proportional margins.
    ///
    /// Missing (zero or non-finite) dimensions fall back to 600x400, and both
    /// edges are floored at [`MIN_EXTENT`].
    pub fn new(width: f32, height: f32) -> Self {
        let width = sanitize(width, FALLBACK_WIDTH);
        let height = sanitize(height, FALLBACK_HEIGHT);
        Self {
            width,
            height,
            margins: Margins::proportional(width, height),
        }
    }

    /// A viewport with explicit pixel margins.
    pub fn with_margins(width: f32, height: f32, margins: Margins) -> Self {
        Self {
            margins,
            ..Self::new(width, height)
        }
    }

    /// The rectangle node centers must stay inside.
    pub fn safe_area(&self) -> SafeArea {
        let left = self.margins.left.max(0.0);
        let top = self.margins.top.max(0.0);
        SafeArea {
            left,
            top,
            right: (self.width - self.margins.right.max(0.0)).max(left),
            bottom: (self.height - self.margins.bottom.max(0.0)).max(top),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(FALLBACK_WIDTH, FALLBACK_HEIGHT)
    }
}

fn sanitize(extent: f32, fallback: f32) -> f32 {
    let extent = if extent.is_finite() && extent > 0.0 {
        extent
    } else {
        fallback
    };
    extent.max(MIN_EXTENT)
}

/// Viewport rectangle inset by its margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl SafeArea {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Bounds for the center of a node that must keep `distance` from every
    /// edge of the safe area.
    pub fn inset(&self, distance: f32) -> Bounds {
        Bounds {
            min_x: self.left + distance,
            min_y: self.top + distance,
            max_x: self.right - distance,
            max_y: self.bottom - distance,
        }
    }

    /// The closest point of the safe area to `at`.
    pub fn clamp(&self, at: Position) -> Position {
        self.inset(0.0).clamp(at)
    }

    pub fn contains(&self, at: Position) -> bool {
        at.x >= self.left && at.x <= self.right && at.y >= self.top && at.y <= self.bottom
    }
}

/// Allowed range for a node center. May be inverted on tiny canvases, in
/// which case clamping pins to the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn clamp(&self, at: Position) -> Position {
        Position::new(
            clamp(at.x, self.min_x, self.max_x),
            clamp(at.y, self.min_y, self.max_y),
        )
    }
}
