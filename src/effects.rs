//! Hover, ripple and stagger effects for cards, buttons and list items.
//!
//! These are plain style recipes. The host wires them to pointer events;
//! with the `web` feature, the `web` module does that for `.card`, `.btn` and
//! `.list-group-item` elements.

use crate::geometry::Rect;
use crate::style::{ElementStyles, StyleProperty};
use crate::timing::stagger_delay_ms;

/// A pair of style sets applied on pointer enter and pointer leave.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverEffect {
    pub enter: Vec<(StyleProperty, String)>,
    pub leave: Vec<(StyleProperty, String)>,
}

impl HoverEffect {
    /// Lift and enlarge a card, deepening its shadow.
    pub fn card() -> Self {
        Self {
            enter: vec![
                (StyleProperty::Transform, "translateY(-8px) scale(1.02)".into()),
                (StyleProperty::BoxShadow, "0 20px 50px rgba(0, 0, 0, 0.25)".into()),
            ],
            leave: vec![
                (StyleProperty::Transform, "translateY(0) scale(1)".into()),
                (StyleProperty::BoxShadow, "0 10px 30px rgba(0, 0, 0, 0.15)".into()),
            ],
        }
    }

    /// Raise a button with a stronger accent glow.
    pub fn button() -> Self {
        Self {
            enter: vec![
                (StyleProperty::Transform, "translateY(-3px) scale(1.05)".into()),
                (StyleProperty::BoxShadow, "0 8px 25px rgba(102, 126, 234, 0.8)".into()),
            ],
            leave: vec![
                (StyleProperty::Transform, "translateY(0) scale(1)".into()),
                (StyleProperty::BoxShadow, "0 4px 15px rgba(102, 126, 234, 0.4)".into()),
            ],
        }
    }

    /// Nudge a list item right and highlight it with the accent gradient.
    ///
    /// Leaving clears the background and text color back to the stylesheet.
    pub fn list_item() -> Self {
        Self {
            enter: vec![
                (StyleProperty::Transform, "translateX(8px) scale(1.02)".into()),
                (
                    StyleProperty::Background,
                    "linear-gradient(135deg, #667eea 0%, #764ba2 100%)".into(),
                ),
                (StyleProperty::Color, "white".into()),
            ],
            leave: vec![
                (StyleProperty::Transform, "translateX(0) scale(1)".into()),
                (StyleProperty::Background, String::new()),
                (StyleProperty::Color, String::new()),
            ],
        }
    }

    pub fn apply_enter<K, S: ElementStyles<K> + ?Sized>(&self, styles: &mut S, element: &K) -> bool {
        apply_all(&self.enter, styles, element)
    }

    pub fn apply_leave<K, S: ElementStyles<K> + ?Sized>(&self, styles: &mut S, element: &K) -> bool {
        apply_all(&self.leave, styles, element)
    }
}

fn apply_all<K, S: ElementStyles<K> + ?Sized>(
    properties: &[(StyleProperty, String)],
    styles: &mut S,
    element: &K,
) -> bool {
    properties
        .iter()
        .all(|(property, value)| styles.set_style(element, *property, value))
}

/// Which click ripple to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RippleKind {
    Card,
    Button,
}

impl RippleKind {
    /// Fill color of the ripple circle.
    pub fn color(self) -> &'static str {
        match self {
            RippleKind::Card => "rgba(255, 255, 255, 0.6)",
            RippleKind::Button => "rgba(255, 255, 255, 0.8)",
        }
    }

    /// How long the ripple lives before it is removed.
    pub fn duration_ms(self) -> u32 {
        match self {
            RippleKind::Card => 600,
            RippleKind::Button => 400,
        }
    }

    /// Name of the stylesheet keyframes that animate the ripple.
    pub fn keyframes(self) -> &'static str {
        match self {
            RippleKind::Card => "ripple",
            RippleKind::Button => "buttonRipple",
        }
    }

    /// Styles the host element needs so the ripple is positioned and clipped.
    pub fn host_styles(self) -> &'static [(StyleProperty, &'static str)] {
        match self {
            RippleKind::Card => &[(StyleProperty::Position, "relative")],
            RippleKind::Button => &[
                (StyleProperty::Position, "relative"),
                (StyleProperty::Overflow, "hidden"),
            ],
        }
    }
}

/// Geometry and look of one ripple, relative to its host element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleSpec {
    pub kind: RippleKind,
    /// Diameter in pixels
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleSpec {
    /// Center a ripple on a click.
    ///
    /// `client_x`/`client_y` and `host` share the same coordinate space. The
    /// ripple is as large as the host's longer side.
    ///
    /// ```rust
    /// use scroll_reveal_core::{Rect, RippleKind, RippleSpec};
    ///
    /// let host = Rect::new(100.0, 50.0, 200.0, 80.0);
    /// let ripple = RippleSpec::at_click(150.0, 90.0, &host, RippleKind::Button);
    /// assert_eq!(ripple.size, 200.0);
    /// assert_eq!((ripple.left, ripple.top), (-50.0, -60.0));
    /// ```
    pub fn at_click(client_x: f64, client_y: f64, host: &Rect, kind: RippleKind) -> Self {
        let size = host.width.max(host.height);
        Self {
            kind,
            size,
            left: client_x - host.x - size / 2.0,
            top: client_y - host.y - size / 2.0,
        }
    }

    /// Inline `cssText` for the ripple span.
    pub fn css_text(&self) -> String {
        format!(
            "position: absolute; width: {size}px; height: {size}px; left: {left}px; top: {top}px; \
             background: {color}; border-radius: 50%; transform: scale(0); \
             animation: {keyframes} {secs}s linear; pointer-events: none;",
            size = self.size,
            left = self.left,
            top = self.top,
            color = self.kind.color(),
            keyframes = self.kind.keyframes(),
            secs = self.kind.duration_ms() as f64 / 1000.0,
        )
    }
}

/// Card clicks on links navigate instead of rippling.
pub fn should_ripple_card(target_tag_name: &str) -> bool {
    !target_tag_name.eq_ignore_ascii_case("a")
}

/// Staggered entrance for a list: item `i` gets `class_name` after `i * step_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaggerPlan {
    pub step_ms: u32,
    pub class_name: &'static str,
}

impl Default for StaggerPlan {
    fn default() -> Self {
        Self {
            step_ms: 100,
            class_name: "fade-in",
        }
    }
}

impl StaggerPlan {
    /// Delay for each of `count` items, in order.
    pub fn delays(&self, count: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        (0..count).map(move |i| (i, stagger_delay_ms(i, self.step_ms)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct Styles(HashMap<StyleProperty, String>);

    impl ElementStyles<()> for Styles {
        fn set_style(&mut self, _: &(), property: StyleProperty, value: &str) -> bool {
            if value.is_empty() {
                self.0.remove(&property);
            } else {
                self.0.insert(property, value.to_string());
            }
            true
        }
    }

    #[test]
    fn test_card_hover_round_trip() {
        let mut styles = Styles::default();
        let card = HoverEffect::card();

        card.apply_enter(&mut styles, &());
        assert_eq!(styles.0[&StyleProperty::Transform], "translateY(-8px) scale(1.02)");

        card.apply_leave(&mut styles, &());
        assert_eq!(styles.0[&StyleProperty::Transform], "translateY(0) scale(1)");
        assert_eq!(styles.0[&StyleProperty::BoxShadow], "0 10px 30px rgba(0, 0, 0, 0.15)");
    }

    #[test]
    fn test_list_item_leave_clears_highlight() {
        let mut styles = Styles::default();
        let item = HoverEffect::list_item();

        item.apply_enter(&mut styles, &());
        assert_eq!(styles.0[&StyleProperty::Color], "white");

        item.apply_leave(&mut styles, &());
        assert!(!styles.0.contains_key(&StyleProperty::Background));
        assert!(!styles.0.contains_key(&StyleProperty::Color));
    }

    #[test]
    fn test_ripple_geometry() {
        let host = Rect::new(0.0, 0.0, 300.0, 120.0);
        let ripple = RippleSpec::at_click(10.0, 10.0, &host, RippleKind::Card);
        assert_eq!(ripple.size, 300.0);
        assert_eq!(ripple.left, -140.0);
        assert_eq!(ripple.top, -140.0);
    }

    #[test]
    fn test_ripple_css() {
        let host = Rect::new(0.0, 0.0, 100.0, 40.0);
        let css = RippleSpec::at_click(50.0, 20.0, &host, RippleKind::Button).css_text();
        assert!(css.contains("width: 100px"));
        assert!(css.contains("left: 0px"));
        assert!(css.contains("top: -30px"));
        assert!(css.contains("animation: buttonRipple 0.4s linear"));
        assert!(css.contains("rgba(255, 255, 255, 0.8)"));
    }

    #[test]
    fn test_ripple_kinds() {
        assert_eq!(RippleKind::Card.duration_ms(), 600);
        assert_eq!(RippleKind::Button.duration_ms(), 400);
        assert_eq!(RippleKind::Card.host_styles().len(), 1);
        assert!(RippleKind::Button
            .host_styles()
            .contains(&(StyleProperty::Overflow, "hidden")));
    }

    #[test]
    fn test_anchor_clicks_skip_card_ripple() {
        assert!(!should_ripple_card("A"));
        assert!(!should_ripple_card("a"));
        assert!(should_ripple_card("DIV"));
        assert!(should_ripple_card("SPAN"));
    }

    #[test]
    fn test_stagger_plan() {
        let plan = StaggerPlan::default();
        let delays: Vec<_> = plan.delays(4).collect();
        assert_eq!(delays, vec![(0, 0), (1, 100), (2, 200), (3, 300)]);
        assert_eq!(plan.class_name, "fade-in");
    }
}
