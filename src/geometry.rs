//! Viewport geometry and intersection-ratio evaluation.

/// Axis-aligned rectangle in logical pixels, relative to the viewport origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area in square pixels. Negative sizes count as empty.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grow the rectangle by `margin` on all four sides.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Check whether a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Overlapping region of two rectangles.
    ///
    /// Returns None when they do not touch. Rectangles that only share an
    /// edge produce a zero-area intersection.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Size of the visible rendering area.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The root box used for intersection tests, expanded by `margin`.
    pub fn root_rect(&self, margin: f64) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height).expand(margin)
    }
}

/// Fraction (0.0 - 1.0) of `element` that lies inside the margin-expanded viewport.
///
/// Zero-area elements have no meaningful fraction: they count as fully
/// visible when their origin lies inside the root box and as hidden otherwise.
///
/// ## Example
///
/// ```rust
/// use scroll_reveal_core::{intersection_ratio, Rect, Viewport};
///
/// let viewport = Viewport::new(800.0, 600.0);
/// // Half of the element hangs below the expanded viewport (600 + 50 = 650).
/// let element = Rect::new(0.0, 600.0, 100.0, 100.0);
/// assert_eq!(intersection_ratio(&element, &viewport, 50.0), 0.5);
/// ```
pub fn intersection_ratio(element: &Rect, viewport: &Viewport, margin: f64) -> f64 {
    let root = viewport.root_rect(margin);
    let area = element.area();

    if area <= 0.0 {
        return if root.contains(element.x, element.y) { 1.0 } else { 0.0 };
    }

    match element.intersection(&root) {
        Some(overlap) => (overlap.area() / area).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Visibility test against a threshold. The boundary is inclusive.
///
/// A ratio of zero is never visible, even with a zero threshold: the element
/// has to overlap the root box at least a little.
#[inline]
pub fn is_visible_enough(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio >= threshold
}
