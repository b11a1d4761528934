//! Geometry-driven visibility source.
//!
//! Browsers deliver visibility changes through their own intersection
//! observer. Hosts without one (native UI shells, headless tests) can use
//! [`VisibilityTracker`] instead: mark it dirty on every scroll, resize or
//! layout change, then evaluate once per frame.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use crate::config::RevealConfig;
use crate::geometry::{intersection_ratio, is_visible_enough, Rect, Viewport};
use crate::style::ElementStyles;
use crate::trigger::{Membership, VisibilityAnimationTrigger};

/// Tracks the last known visibility of each observed element.
///
/// Any number of [`invalidate`](Self::invalidate) calls between two
/// evaluations collapse into a single pass. Newly observed elements are
/// always evaluated on the next pass, so an element that is visible from the
/// start is reported even if nothing ever scrolls.
///
/// ## Example
///
/// ```rust
/// use scroll_reveal_core::{Rect, Viewport, VisibilityTracker};
///
/// let mut tracker = VisibilityTracker::new(0.1, 50.0);
/// tracker.observe("hero");
/// tracker.observe("footer");
///
/// let viewport = Viewport::new(800.0, 600.0);
/// let changes = tracker.evaluate(&viewport, |id| match *id {
///     "hero" => Some(Rect::new(0.0, 0.0, 800.0, 400.0)),
///     _ => Some(Rect::new(0.0, 2000.0, 800.0, 200.0)),
/// });
/// assert_eq!(changes, vec![("hero", true)]);
///
/// // Nothing changed since, so nothing to evaluate
/// assert!(!tracker.is_dirty());
/// ```
#[derive(Clone, Debug)]
pub struct VisibilityTracker<K> {
    threshold: f64,
    margin: f64,
    visible: HashMap<K, bool>,
    order: Vec<K>,
    dirty: bool,
}

impl<K: Eq + Hash + Clone> VisibilityTracker<K> {
    /// Create a tracker with the given threshold fraction and margin in pixels.
    ///
    /// Out-of-range values are clamped the same way [`RevealConfig::normalized`]
    /// clamps them for the trigger.
    pub fn new(threshold: f64, margin: f64) -> Self {
        let config = RevealConfig::default()
            .with_threshold(threshold)
            .with_margin(margin)
            .normalized();
        Self {
            threshold: config.threshold,
            margin: config.margin,
            visible: HashMap::new(),
            order: Vec::new(),
            dirty: false,
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Create a tracker using a trigger's threshold and margin.
    pub fn for_trigger(trigger: &VisibilityAnimationTrigger<K>) -> Self {
        let config = trigger.config();
        Self::new(config.threshold, config.margin)
    }

    /// Start observing an element. Already observed elements are left alone.
    pub fn observe(&mut self, element: K) {
        if self.visible.contains_key(&element) {
            return;
        }
        self.visible.insert(element.clone(), false);
        self.order.push(element);
        self.dirty = true;
    }

    /// Stop observing an element.
    pub fn unobserve(&mut self, element: &K) {
        if self.visible.remove(element).is_some() {
            self.order.retain(|k| k != element);
        }
    }

    /// Number of observed elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Last evaluated visibility of an element.
    pub fn is_visible(&self, element: &K) -> Option<bool> {
        self.visible.get(element).copied()
    }

    /// Note that scroll position, layout or viewport size changed.
    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute visibility if anything changed since the last pass.
    ///
    /// `rects` returns each element's bounding box relative to the viewport,
    /// or None if the element no longer exists (counted as hidden). Returns
    /// only the elements whose visibility flipped, in observation order.
    pub fn evaluate<F>(&mut self, viewport: &Viewport, rects: F) -> Vec<(K, bool)>
    where
        F: Fn(&K) -> Option<Rect>,
    {
        if !self.dirty {
            return Vec::new();
        }
        self.dirty = false;

        let mut changes = Vec::new();
        for element in &self.order {
            let now = rects(element)
                .map(|rect| is_visible_enough(intersection_ratio(&rect, viewport, self.margin), self.threshold))
                .unwrap_or(false);
            if let Some(was) = self.visible.get_mut(element) {
                if *was != now {
                    *was = now;
                    changes.push((element.clone(), now));
                }
            }
        }
        trace!(observed = self.order.len(), changed = changes.len(), "visibility pass");
        changes
    }

    /// Evaluate and forward every change to a trigger.
    ///
    /// Elements the trigger still holds as pending are also forwarded while
    /// they stay visible, so an element registered (or re-registered) after
    /// it scrolled into view fires on the next pump instead of waiting for
    /// it to leave and come back.
    ///
    /// Returns the number of reveals dispatched.
    pub fn pump<F, S>(
        &mut self,
        trigger: &mut VisibilityAnimationTrigger<K>,
        viewport: &Viewport,
        rects: F,
        styles: &mut S,
    ) -> usize
    where
        F: Fn(&K) -> Option<Rect>,
        S: ElementStyles<K> + ?Sized,
    {
        let mut dispatched = self
            .evaluate(viewport, rects)
            .into_iter()
            .filter(|(element, visible)| trigger.handle_visibility(element, *visible, styles).is_some())
            .count();

        let waiting: Vec<K> = self
            .order
            .iter()
            .filter(|element| self.visible.get(*element) == Some(&true))
            .filter(|element| trigger.membership(element) == Some(Membership::Pending))
            .cloned()
            .collect();
        for element in waiting {
            if trigger.handle_visibility(&element, true, styles).is_some() {
                dispatched += 1;
            }
        }
        dispatched
    }
}
