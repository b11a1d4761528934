//! One-shot reveal animations driven by visibility notifications.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::RevealConfig;
use crate::style::{ElementStyles, StyleProperty, Transition};
use crate::variant::AnimationVariant;

/// Where a tracked element is in its reveal lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// Registered, waiting to become visible
    Pending,
    /// Revealed; never dispatched again until unregistered
    Fired,
}

/// Progress of a [`RevealTask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Entry state not written yet
    Entry,
    /// Entry state written, waiting for the next frame
    Resting,
    /// Resting state written
    Done,
}

/// The two-step style update that reveals one element.
///
/// Step one writes the transparent, offset entry state together with the
/// transition. Step two writes the resting state and must run on a later
/// frame than step one, otherwise the host never paints the entry state and
/// the transition collapses.
#[derive(Clone, Debug)]
pub struct RevealTask<K> {
    element: K,
    variant: AnimationVariant,
    transition: Transition,
    phase: RevealPhase,
}

impl<K> RevealTask<K> {
    pub fn new(element: K, variant: AnimationVariant, transition: Transition) -> Self {
        Self {
            element,
            variant,
            transition,
            phase: RevealPhase::Entry,
        }
    }

    #[inline]
    pub fn element(&self) -> &K {
        &self.element
    }

    #[inline]
    pub fn variant(&self) -> AnimationVariant {
        self.variant
    }

    #[inline]
    pub fn transition(&self) -> Transition {
        self.transition
    }

    #[inline]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Write the entry state and transition, then advance to [`RevealPhase::Resting`].
    ///
    /// Does nothing outside [`RevealPhase::Entry`]. Returns false if the
    /// element was missing; the task advances either way.
    pub fn apply_entry<S: ElementStyles<K> + ?Sized>(&mut self, styles: &mut S) -> bool {
        if self.phase != RevealPhase::Entry {
            return false;
        }
        self.phase = RevealPhase::Resting;
        self.variant.entry_state().write_to(styles, &self.element)
            && styles.set_style(&self.element, StyleProperty::Transition, &self.transition.to_css())
    }

    /// Write the resting state, then advance to [`RevealPhase::Done`].
    ///
    /// Does nothing outside [`RevealPhase::Resting`].
    pub fn apply_resting<S: ElementStyles<K> + ?Sized>(&mut self, styles: &mut S) -> bool {
        if self.phase != RevealPhase::Resting {
            return false;
        }
        self.phase = RevealPhase::Done;
        self.variant.resting_state().write_to(styles, &self.element)
    }
}

#[derive(Clone, Copy, Debug)]
struct Tracked {
    variant: AnimationVariant,
    membership: Membership,
}

/// Reveals registered elements the first time they become visible.
///
/// Each element moves `unregistered -> pending -> fired`. A fired element
/// never animates again; [`unregister`](Self::unregister) is a full reset, so
/// registering it afterwards lets it fire once more.
///
/// The trigger does not observe anything itself. The host feeds it
/// visibility transitions through [`handle_visibility`](Self::handle_visibility)
/// and rendering opportunities through
/// [`handle_animation_frame`](Self::handle_animation_frame). Nothing here
/// fails: unknown elements, repeated registration and unrecognized tags are
/// all absorbed silently.
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use scroll_reveal_core::{
///     AnimationVariant, ElementStyles, Membership, RevealConfig, StyleProperty,
///     VisibilityAnimationTrigger,
/// };
///
/// #[derive(Default)]
/// struct Styles(HashMap<(u32, StyleProperty), String>);
///
/// impl ElementStyles<u32> for Styles {
///     fn set_style(&mut self, element: &u32, property: StyleProperty, value: &str) -> bool {
///         self.0.insert((*element, property), value.to_string());
///         true
///     }
/// }
///
/// let mut styles = Styles::default();
/// let mut trigger = VisibilityAnimationTrigger::<u32>::new(RevealConfig::default());
/// trigger.register([(1, Some("slideIn"))]);
///
/// let fired = trigger.handle_visibility(&1, true, &mut styles);
/// assert_eq!(fired, Some(AnimationVariant::SlideIn));
/// assert_eq!(styles.0[&(1, StyleProperty::Transform)], "translateX(-50px)");
///
/// // Next frame: settle into the resting state
/// trigger.handle_animation_frame(&mut styles);
/// assert_eq!(styles.0[&(1, StyleProperty::Transform)], "translateX(0)");
/// assert_eq!(trigger.membership(&1), Some(Membership::Fired));
/// ```
#[derive(Clone, Debug)]
pub struct VisibilityAnimationTrigger<K> {
    config: RevealConfig,
    tracked: HashMap<K, Tracked>,
    queued: Vec<RevealTask<K>>,
}

impl<K: Eq + Hash + Clone> Default for VisibilityAnimationTrigger<K> {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl<K: Eq + Hash + Clone> VisibilityAnimationTrigger<K> {
    /// Create a trigger. Out-of-range options are clamped.
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config: config.normalized(),
            tracked: HashMap::new(),
            queued: Vec::new(),
        }
    }

    /// Get the active configuration.
    #[inline]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Start tracking elements, each with its optional `data-animation` tag.
    ///
    /// Elements that are already tracked, pending or fired, keep their
    /// current state. Returns how many elements were newly added.
    pub fn register<'a, I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = (K, Option<&'a str>)>,
    {
        let mut added = 0;
        for (element, tag) in elements {
            if self.register_one(element, AnimationVariant::from_tag(tag)) {
                added += 1;
            }
        }
        added
    }

    /// Start tracking one element with an already resolved variant.
    ///
    /// Returns false if the element was already tracked.
    pub fn register_one(&mut self, element: K, variant: AnimationVariant) -> bool {
        if self.tracked.contains_key(&element) {
            return false;
        }
        self.tracked.insert(
            element,
            Tracked {
                variant,
                membership: Membership::Pending,
            },
        );
        true
    }

    /// Stop tracking an element, whatever its state.
    ///
    /// A resting-state write already queued for the element still runs on
    /// the next frame. Returns false if the element was not tracked.
    pub fn unregister(&mut self, element: &K) -> bool {
        self.tracked.remove(element).is_some()
    }

    /// Forget every element, e.g. when the document is torn down.
    pub fn clear(&mut self) {
        self.tracked.clear();
        self.queued.clear();
    }

    /// Current lifecycle state, or None if the element is not tracked.
    pub fn membership(&self, element: &K) -> Option<Membership> {
        self.tracked.get(element).map(|t| t.membership)
    }

    /// Variant resolved for a tracked element at registration.
    pub fn variant(&self, element: &K) -> Option<AnimationVariant> {
        self.tracked.get(element).map(|t| t.variant)
    }

    #[inline]
    pub fn is_tracked(&self, element: &K) -> bool {
        self.tracked.contains_key(element)
    }

    pub fn pending_count(&self) -> usize {
        self.count(Membership::Pending)
    }

    pub fn fired_count(&self) -> usize {
        self.count(Membership::Fired)
    }

    fn count(&self, membership: Membership) -> usize {
        self.tracked
            .values()
            .filter(|t| t.membership == membership)
            .count()
    }

    /// Elements still waiting to be revealed.
    pub fn pending(&self) -> impl Iterator<Item = &K> {
        self.tracked
            .iter()
            .filter(|(_, t)| t.membership == Membership::Pending)
            .map(|(k, _)| k)
    }

    /// Feed one visibility notification from the host.
    ///
    /// When a pending element becomes visible it is marked fired, its entry
    /// state is written and the resting state is queued for the next frame.
    /// Returns the dispatched variant, or None when nothing happened.
    pub fn handle_visibility<S>(&mut self, element: &K, visible: bool, styles: &mut S) -> Option<AnimationVariant>
    where
        S: ElementStyles<K> + ?Sized,
    {
        if !visible {
            return None;
        }
        let tracked = self.tracked.get_mut(element)?;
        if tracked.membership == Membership::Fired {
            return None;
        }
        tracked.membership = Membership::Fired;
        let variant = tracked.variant;

        let mut task = RevealTask::new(element.clone(), variant, self.config.transition_for(variant));
        if !task.apply_entry(styles) {
            debug!(%variant, "reveal target missing, entry state skipped");
        }
        debug!(%variant, duration_ms = task.transition().duration_ms, "reveal dispatched");
        self.queued.push(task);
        Some(variant)
    }

    /// Run the second step of every reveal queued before this frame.
    ///
    /// Call this from the host's next rendering opportunity after
    /// [`handle_visibility`](Self::handle_visibility) dispatched something.
    /// Returns the number of tasks completed.
    pub fn handle_animation_frame<S>(&mut self, styles: &mut S) -> usize
    where
        S: ElementStyles<K> + ?Sized,
    {
        let tasks = std::mem::take(&mut self.queued);
        let completed = tasks.len();
        for mut task in tasks {
            task.apply_resting(styles);
        }
        if completed > 0 {
            trace!(completed, "reveal frame");
        }
        completed
    }

    /// Check whether a frame callback is still needed.
    #[inline]
    pub fn has_queued_frames(&self) -> bool {
        !self.queued.is_empty()
    }

    /// Check whether a resting-state write is still queued for an element.
    ///
    /// Hosts use this to decide when an unregistered element's handle can be
    /// released.
    pub fn has_queued_task(&self, element: &K) -> bool {
        self.queued.iter().any(|task| task.element() == element)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::style::{Transform, VisualState};

    /// In-memory style host. Elements not in `alive` reject writes.
    #[derive(Default)]
    struct Recorder {
        alive: HashSet<u32>,
        styles: HashMap<(u32, StyleProperty), String>,
        writes: Vec<(u32, StyleProperty, String)>,
    }

    impl Recorder {
        fn with_elements(ids: &[u32]) -> Self {
            Self {
                alive: ids.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn get(&self, id: u32, property: StyleProperty) -> Option<&str> {
            self.styles.get(&(id, property)).map(|s| s.as_str())
        }

        fn writes_for(&self, id: u32) -> usize {
            self.writes.iter().filter(|(e, _, _)| *e == id).count()
        }
    }

    impl ElementStyles<u32> for Recorder {
        fn set_style(&mut self, element: &u32, property: StyleProperty, value: &str) -> bool {
            if !self.alive.contains(element) {
                return false;
            }
            self.styles.insert((*element, property), value.to_string());
            self.writes.push((*element, property, value.to_string()));
            true
        }
    }

    fn trigger() -> VisibilityAnimationTrigger<u32> {
        VisibilityAnimationTrigger::new(RevealConfig::default())
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut t = trigger();
        assert_eq!(t.register([(1, None)]), 1);
        assert_eq!(t.register([(1, None)]), 0);
        assert_eq!(t.pending_count(), 1);
        assert_eq!(t.membership(&1), Some(Membership::Pending));
    }

    #[test]
    fn test_register_keeps_fired_state() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, None)]);
        t.handle_visibility(&1, true, &mut styles);

        assert_eq!(t.register([(1, Some("scaleIn"))]), 0);
        assert_eq!(t.membership(&1), Some(Membership::Fired));
        assert_eq!(t.variant(&1), Some(AnimationVariant::FadeIn));
    }

    #[test]
    fn test_fires_once() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, None)]);

        assert_eq!(t.handle_visibility(&1, true, &mut styles), Some(AnimationVariant::FadeIn));
        assert_eq!(t.handle_animation_frame(&mut styles), 1);
        let writes = styles.writes_for(1);

        // Visibility keeps fluctuating afterwards
        for visible in [false, true, false, true] {
            assert_eq!(t.handle_visibility(&1, visible, &mut styles), None);
        }
        assert_eq!(t.handle_animation_frame(&mut styles), 0);
        assert_eq!(styles.writes_for(1), writes);
        assert_eq!(t.fired_count(), 1);
        assert_eq!(t.pending_count(), 0);
    }

    #[test]
    fn test_not_visible_is_ignored() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, None)]);
        assert_eq!(t.handle_visibility(&1, false, &mut styles), None);
        assert_eq!(t.membership(&1), Some(Membership::Pending));
        assert!(styles.writes.is_empty());
    }

    #[test]
    fn test_untagged_and_unknown_default_to_fade_in() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1, 2]);
        t.register([(1, None), (2, Some("wobble"))]);

        assert_eq!(t.handle_visibility(&1, true, &mut styles), Some(AnimationVariant::FadeIn));
        assert_eq!(t.handle_visibility(&2, true, &mut styles), Some(AnimationVariant::FadeIn));
        assert_eq!(styles.get(2, StyleProperty::Transform), Some("translateY(20px)"));
    }

    #[test]
    fn test_three_variants_settle_to_resting_state() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1, 2, 3]);
        t.register([(1, Some("fadeIn")), (2, Some("slideIn")), (3, Some("scaleIn"))]);

        for id in [1, 2, 3] {
            assert!(t.handle_visibility(&id, true, &mut styles).is_some());
        }

        // Entry state is committed before any resting write
        assert_eq!(styles.get(1, StyleProperty::Opacity), Some("0"));
        assert_eq!(styles.get(2, StyleProperty::Transform), Some("translateX(-50px)"));
        assert_eq!(styles.get(3, StyleProperty::Transform), Some("scale(0.8)"));
        for id in [1, 2, 3] {
            assert_eq!(
                styles.get(id, StyleProperty::Transition),
                Some("opacity 800ms ease, transform 800ms ease")
            );
        }
        assert!(t.has_queued_frames());

        assert_eq!(t.handle_animation_frame(&mut styles), 3);
        assert!(!t.has_queued_frames());
        assert_eq!(t.fired_count(), 3);

        assert_eq!(styles.get(1, StyleProperty::Transform), Some("translateY(0)"));
        assert_eq!(styles.get(2, StyleProperty::Transform), Some("translateX(0)"));
        assert_eq!(styles.get(3, StyleProperty::Transform), Some("scale(1)"));

        // Once the configured duration has elapsed every element is at rest
        for variant in AnimationVariant::ALL {
            let transition = t.config().transition_for(variant);
            let settled = transition.sample(&variant.entry_state(), &variant.resting_state(), 800.0);
            assert_eq!(settled.opacity, 1.0);
            assert!(settled.transform.is_identity());
        }
        for id in [1, 2, 3] {
            assert_eq!(styles.get(id, StyleProperty::Opacity), Some("1"));
        }
    }

    #[test]
    fn test_unregister_before_visible() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, None)]);
        assert!(t.unregister(&1));

        assert_eq!(t.handle_visibility(&1, true, &mut styles), None);
        assert_eq!(t.handle_animation_frame(&mut styles), 0);
        assert!(styles.writes.is_empty());
        assert!(!t.is_tracked(&1));
    }

    #[test]
    fn test_unregister_untracked_is_noop() {
        let mut t = trigger();
        assert!(!t.unregister(&42));
    }

    #[test]
    fn test_unregister_resets_fired() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, Some("scaleIn"))]);
        assert!(t.handle_visibility(&1, true, &mut styles).is_some());
        t.handle_animation_frame(&mut styles);

        assert!(t.unregister(&1));
        assert_eq!(t.register([(1, Some("scaleIn"))]), 1);
        assert_eq!(t.handle_visibility(&1, true, &mut styles), Some(AnimationVariant::ScaleIn));
        assert_eq!(styles.get(1, StyleProperty::Transform), Some("scale(0.8)"));
    }

    #[test]
    fn test_unknown_element_is_noop() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[7]);
        assert_eq!(t.handle_visibility(&7, true, &mut styles), None);
        assert!(styles.writes.is_empty());
    }

    #[test]
    fn test_missing_element_still_fires() {
        let mut t = trigger();
        // Element 1 is registered but absent from the host
        let mut styles = Recorder::default();
        t.register([(1, None)]);

        assert_eq!(t.handle_visibility(&1, true, &mut styles), Some(AnimationVariant::FadeIn));
        assert_eq!(t.handle_animation_frame(&mut styles), 1);
        assert_eq!(t.membership(&1), Some(Membership::Fired));
        assert!(styles.writes.is_empty());
    }

    #[test]
    fn test_frame_only_runs_earlier_tasks() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1, 2]);
        t.register([(1, None), (2, None)]);

        t.handle_visibility(&1, true, &mut styles);
        assert_eq!(t.handle_animation_frame(&mut styles), 1);
        t.handle_visibility(&2, true, &mut styles);

        assert_eq!(styles.get(1, StyleProperty::Opacity), Some("1"));
        assert_eq!(styles.get(2, StyleProperty::Opacity), Some("0"));
        assert_eq!(t.handle_animation_frame(&mut styles), 1);
        assert_eq!(styles.get(2, StyleProperty::Opacity), Some("1"));
    }

    #[test]
    fn test_variant_duration_override() {
        let config = RevealConfig::default().with_variant_duration(AnimationVariant::SlideIn, 300);
        let mut t = VisibilityAnimationTrigger::new(config);
        let mut styles = Recorder::with_elements(&[1]);
        t.register([(1, Some("slideIn"))]);
        t.handle_visibility(&1, true, &mut styles);
        assert_eq!(
            styles.get(1, StyleProperty::Transition),
            Some("opacity 300ms ease, transform 300ms ease")
        );
    }

    #[test]
    fn test_task_phases() {
        let mut styles = Recorder::with_elements(&[1]);
        let mut task = RevealTask::new(1u32, AnimationVariant::FadeIn, Transition::new(800, Default::default()));
        assert_eq!(task.phase(), RevealPhase::Entry);

        // Resting cannot run before entry
        assert!(!task.apply_resting(&mut styles));
        assert_eq!(task.phase(), RevealPhase::Entry);

        assert!(task.apply_entry(&mut styles));
        assert_eq!(task.phase(), RevealPhase::Resting);
        assert!(!task.apply_entry(&mut styles));

        assert!(task.apply_resting(&mut styles));
        assert_eq!(task.phase(), RevealPhase::Done);

        let rest = VisualState {
            opacity: 1.0,
            transform: Transform::TranslateY(0.0),
        };
        assert_eq!(styles.get(1, StyleProperty::Transform), Some(rest.transform.to_css().as_str()));
    }

    #[test]
    fn test_clear() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1, 2]);
        t.register([(1, None), (2, None)]);
        t.handle_visibility(&1, true, &mut styles);
        t.clear();
        assert!(!t.is_tracked(&1));
        assert!(!t.has_queued_frames());
        assert_eq!(t.pending().count(), 0);
    }

    #[test]
    fn test_queued_task_survives_unregister_until_frame() {
        let mut t = trigger();
        let mut styles = Recorder::with_elements(&[1, 2]);
        t.register([(1, None), (2, None)]);
        assert!(!t.has_queued_task(&1));

        t.handle_visibility(&1, true, &mut styles);
        assert!(t.has_queued_task(&1));
        assert!(!t.has_queued_task(&2));

        // Unregistering does not cancel the resting-state write
        t.unregister(&1);
        assert!(t.has_queued_task(&1));

        t.handle_animation_frame(&mut styles);
        assert!(!t.has_queued_task(&1));
        assert_eq!(styles.get(1, StyleProperty::Opacity), Some("1"));
    }
}
