//! Inline presentation properties and the element style seam.

/// A single CSS transform function.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    #[default]
    None,
    /// Horizontal offset in pixels
    TranslateX(f64),
    /// Vertical offset in pixels
    TranslateY(f64),
    /// Uniform scale factor
    Scale(f64),
}

impl Transform {
    /// Render as a CSS `transform` value.
    pub fn to_css(&self) -> String {
        match *self {
            Transform::None => "none".to_string(),
            Transform::TranslateX(px) => format!("translateX({})", px_value(px)),
            Transform::TranslateY(px) => format!("translateY({})", px_value(px)),
            Transform::Scale(s) => format!("scale({})", s),
        }
    }

    /// Check whether the transform leaves the element where it is.
    pub fn is_identity(&self) -> bool {
        match *self {
            Transform::None => true,
            Transform::TranslateX(px) | Transform::TranslateY(px) => px == 0.0,
            Transform::Scale(s) => s == 1.0,
        }
    }

    /// Interpolate between two transforms of the same kind.
    ///
    /// Mismatched kinds snap to `to` once `progress` reaches 1.0.
    pub fn lerp(&self, to: &Transform, progress: f64) -> Transform {
        match (*self, *to) {
            (Transform::TranslateX(a), Transform::TranslateX(b)) => Transform::TranslateX(lerp(a, b, progress)),
            (Transform::TranslateY(a), Transform::TranslateY(b)) => Transform::TranslateY(lerp(a, b, progress)),
            (Transform::Scale(a), Transform::Scale(b)) => Transform::Scale(lerp(a, b, progress)),
            _ if progress >= 1.0 => *to,
            _ => *self,
        }
    }
}

fn px_value(px: f64) -> String {
    if px == 0.0 {
        "0".to_string()
    } else {
        format!("{}px", px)
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Opacity and transform of an element at one point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualState {
    pub opacity: f64,
    pub transform: Transform,
}

impl VisualState {
    /// Blend two states. `progress` is the already-eased fraction.
    pub fn interpolate(from: &VisualState, to: &VisualState, progress: f64) -> VisualState {
        let t = progress.clamp(0.0, 1.0);
        VisualState {
            opacity: lerp(from.opacity, to.opacity, t),
            transform: from.transform.lerp(&to.transform, t),
        }
    }

    /// CSS `opacity` value.
    pub fn opacity_css(&self) -> String {
        format!("{}", self.opacity)
    }

    /// Write opacity and transform to an element.
    ///
    /// Returns false when the element is gone.
    pub fn write_to<K, S: ElementStyles<K> + ?Sized>(&self, styles: &mut S, element: &K) -> bool {
        styles.set_style(element, StyleProperty::Opacity, &self.opacity_css())
            && styles.set_style(element, StyleProperty::Transform, &self.transform.to_css())
    }
}

/// CSS timing functions usable for reveal transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Ease {
    /// CSS `ease`: cubic-bezier(0.25, 0.1, 0.25, 1)
    #[default]
    Ease,
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Ease {
    /// CSS keyword for this timing function.
    pub fn css_name(self) -> &'static str {
        match self {
            Ease::Ease => "ease",
            Ease::Linear => "linear",
            Ease::EaseIn => "ease-in",
            Ease::EaseOut => "ease-out",
            Ease::EaseInOut => "ease-in-out",
        }
    }

    /// Cubic-bezier control points (x1, y1, x2, y2).
    pub fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Ease::Ease => (0.25, 0.1, 0.25, 1.0),
            Ease::Linear => (0.0, 0.0, 1.0, 1.0),
            Ease::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Ease::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Ease::EaseInOut => (0.42, 0.0, 0.58, 1.0),
        }
    }

    /// Map linear time progress (0.0 - 1.0) to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if self == Ease::Linear || t == 0.0 || t == 1.0 {
            return t;
        }
        let (x1, y1, x2, y2) = self.control_points();
        let s = solve_bezier_x(x1, x2, t);
        bezier(y1, y2, s)
    }
}

/// One-dimensional cubic bezier with fixed endpoints 0 and 1.
#[inline]
fn bezier(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate is `x`.
fn solve_bezier_x(x1: f64, x2: f64, x: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    // Newton first; falls back to bisection on flat slopes
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > EPSILON {
        let value = bezier(x1, x2, s);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// Opacity and transform transition applied before the resting state is written.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub duration_ms: u32,
    pub ease: Ease,
}

impl Transition {
    pub fn new(duration_ms: u32, ease: Ease) -> Self {
        Self { duration_ms, ease }
    }

    /// CSS `transition` value covering opacity and transform.
    ///
    /// ```rust
    /// use scroll_reveal_core::{Ease, Transition};
    ///
    /// assert_eq!(
    ///     Transition::new(800, Ease::Ease).to_css(),
    ///     "opacity 800ms ease, transform 800ms ease"
    /// );
    /// ```
    pub fn to_css(&self) -> String {
        let ease = self.ease.css_name();
        format!(
            "opacity {d}ms {ease}, transform {d}ms {ease}",
            d = self.duration_ms
        )
    }

    /// Visual state `elapsed_ms` after the transition from `from` to `to` started.
    pub fn sample(&self, from: &VisualState, to: &VisualState, elapsed_ms: f64) -> VisualState {
        let linear = if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms / self.duration_ms as f64).clamp(0.0, 1.0)
        };
        VisualState::interpolate(from, to, self.ease.apply(linear))
    }
}

/// Inline style properties the crate writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Opacity,
    Transform,
    Transition,
    BoxShadow,
    Background,
    Color,
    Position,
    Overflow,
}

impl StyleProperty {
    /// CSS property name, as accepted by `style.setProperty`.
    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::Opacity => "opacity",
            StyleProperty::Transform => "transform",
            StyleProperty::Transition => "transition",
            StyleProperty::BoxShadow => "box-shadow",
            StyleProperty::Background => "background",
            StyleProperty::Color => "color",
            StyleProperty::Position => "position",
            StyleProperty::Overflow => "overflow",
        }
    }
}

/// Write access to the inline styles of elements identified by `K`.
///
/// Implement this for your rendering host (DOM, retained-mode UI, test
/// recorder). Writes to elements that no longer exist must be ignored and
/// reported by returning `false`; callers never treat that as an error.
pub trait ElementStyles<K> {
    /// Set one inline style property. An empty value clears the property.
    fn set_style(&mut self, element: &K, property: StyleProperty, value: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_css() {
        assert_eq!(Transform::TranslateY(20.0).to_css(), "translateY(20px)");
        assert_eq!(Transform::TranslateY(0.0).to_css(), "translateY(0)");
        assert_eq!(Transform::TranslateX(-50.0).to_css(), "translateX(-50px)");
        assert_eq!(Transform::Scale(1.0).to_css(), "scale(1)");
        assert_eq!(Transform::None.to_css(), "none");
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Ease, Ease::Linear, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_monotonic() {
        for ease in [Ease::Ease, Ease::EaseIn, Ease::EaseOut, Ease::EaseInOut] {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b && b < c, "{:?} not monotonic", ease);
        }
    }

    #[test]
    fn test_ease_front_loaded() {
        // CSS `ease` is well past halfway at the midpoint (~0.80)
        let mid = Ease::Ease.apply(0.5);
        assert!((mid - 0.8024).abs() < 0.01, "got {}", mid);
    }

    #[test]
    fn test_transition_sample() {
        let transition = Transition::new(800, Ease::Ease);
        let from = VisualState { opacity: 0.0, transform: Transform::TranslateY(20.0) };
        let to = VisualState { opacity: 1.0, transform: Transform::TranslateY(0.0) };

        assert_eq!(transition.sample(&from, &to, 0.0), from);
        assert_eq!(transition.sample(&from, &to, 800.0), to);
        assert_eq!(transition.sample(&from, &to, 5000.0), to);

        let mid = transition.sample(&from, &to, 400.0);
        assert!(mid.opacity > 0.5 && mid.opacity < 1.0);
    }

    #[test]
    fn test_mismatched_transform_snaps() {
        let a = Transform::Scale(0.8);
        let b = Transform::TranslateX(0.0);
        assert_eq!(a.lerp(&b, 0.5), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }
}
