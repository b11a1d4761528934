//! Browser bindings.
//!
//! Connects [`VisibilityAnimationTrigger`] to the DOM: visibility comes
//! from an `IntersectionObserver`, the resting-state step runs in a
//! `requestAnimationFrame` callback, and styles are written inline. DOM
//! exceptions are logged at debug level and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent};

use crate::config::RevealConfig;
use crate::effects::{should_ripple_card, HoverEffect, RippleKind, RippleSpec, StaggerPlan};
use crate::geometry::{is_visible_enough, Rect};
use crate::style::{ElementStyles, StyleProperty};
use crate::timing::{FrameCountdown, FrameStep};
use crate::trigger::VisibilityAnimationTrigger;

/// Attribute holding the id assigned to a registered element.
pub const ID_ATTRIBUTE: &str = "data-reveal-id";
/// Attribute selecting the reveal variant.
pub const ANIMATION_ATTRIBUTE: &str = "data-animation";

/// Handle for an element registered with [`WebReveal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(u32);

/// Elements known to a [`WebReveal`], indexed by [`ElementId`].
///
/// A released slot is reused by the next insert. [`WebReveal`] only
/// releases an element once no resting-state write is queued for it.
#[derive(Debug, Default)]
pub struct ElementTable {
    elements: Vec<Option<HtmlElement>>,
}

impl ElementTable {
    /// Look up the id stored on an element, if it belongs to this table.
    pub fn id_of(&self, element: &Element) -> Option<ElementId> {
        let id = element.get_attribute(ID_ATTRIBUTE)?.parse::<u32>().ok()?;
        let known = self.elements.get(id as usize)?.as_ref()?;
        // Ids are per table; a copied attribute must not alias another element
        if known.is_same_node(Some(&**element)) {
            Some(ElementId(id))
        } else {
            None
        }
    }

    /// Add an element, reusing its id if it was added before.
    pub fn insert(&mut self, element: &HtmlElement) -> ElementId {
        if let Some(id) = self.id_of(element) {
            return id;
        }
        let slot = match self.elements.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                self.elements.push(None);
                self.elements.len() - 1
            }
        };
        let id = ElementId(slot as u32);
        if element.set_attribute(ID_ATTRIBUTE, &id.0.to_string()).is_err() {
            debug!("could not tag element with reveal id");
        }
        self.elements[slot] = Some(element.clone());
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&HtmlElement> {
        self.elements.get(id.0 as usize)?.as_ref()
    }

    /// Drop an element and its id attribute. The id may be handed out again.
    pub fn release(&mut self, id: ElementId) -> bool {
        let Some(element) = self.elements.get_mut(id.0 as usize).and_then(Option::take) else {
            return false;
        };
        if element.remove_attribute(ID_ATTRIBUTE).is_err() {
            debug!("could not remove reveal id");
        }
        true
    }

    /// Release every element for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        let released: Vec<ElementId> = self
            .ids()
            .filter(|id| !keep(*id))
            .collect();
        for id in released {
            self.release(id);
        }
    }

    /// Ids of all live elements.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| ElementId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.elements.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ElementStyles<ElementId> for ElementTable {
    fn set_style(&mut self, element: &ElementId, property: StyleProperty, value: &str) -> bool {
        match self.get(*element) {
            Some(el) => write_inline(el, property, value),
            None => false,
        }
    }
}

/// Writes straight to an element's inline style.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineStyles;

impl ElementStyles<HtmlElement> for InlineStyles {
    fn set_style(&mut self, element: &HtmlElement, property: StyleProperty, value: &str) -> bool {
        write_inline(element, property, value)
    }
}

fn write_inline(element: &HtmlElement, property: StyleProperty, value: &str) -> bool {
    if !element.is_connected() {
        return false;
    }
    let style = element.style();
    let result = if value.is_empty() {
        style.remove_property(property.css_name()).map(|_| ())
    } else {
        style.set_property(property.css_name(), value)
    };
    if result.is_err() {
        debug!(property = property.css_name(), "inline style write rejected");
    }
    result.is_ok()
}

struct Inner {
    trigger: VisibilityAnimationTrigger<ElementId>,
    elements: ElementTable,
    frames: FrameCountdown,
}

impl Inner {
    /// Release elements that were unobserved and have no write left to land.
    fn release_untracked(&mut self) {
        let trigger = &self.trigger;
        self.elements
            .retain(|id| trigger.is_tracked(&id) || trigger.has_queued_task(&id));
    }
}

/// Frames between the entry-state write and the resting-state write.
///
/// Intersection callbacks run after a frame's rendering step, so the first
/// animation frame after them can resolve both states in one style pass.
const RESTING_DELAY_FRAMES: u32 = 2;

/// Extra observer threshold used when the configured one is zero.
const MIN_VISIBLE_RATIO: f64 = 0.01;

type FrameCallback = Closure<dyn FnMut()>;
type FrameSlot = Rc<RefCell<Option<FrameCallback>>>;
type IntersectCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Reveal-on-scroll for a document.
///
/// The observer callbacks live as long as this value; dropping it
/// disconnects the observer and cancels any outstanding animation frame.
/// Call [`forget`](Self::forget) to keep it running for the lifetime of the
/// page.
///
/// ```rust,ignore
/// use scroll_reveal_core::{web::WebReveal, RevealConfig};
///
/// if let Some(reveal) = WebReveal::new(RevealConfig::default()) {
///     reveal.observe_selector(".card, .reveal");
///     reveal.forget();
/// }
/// ```
pub struct WebReveal {
    inner: Rc<RefCell<Inner>>,
    observer: IntersectionObserver,
    _on_intersect: IntersectCallback,
    _on_frame: FrameSlot,
}

impl WebReveal {
    /// Create the observer. Returns None if the browser refuses it.
    pub fn new(config: RevealConfig) -> Option<Self> {
        let trigger = VisibilityAnimationTrigger::new(config);
        let threshold = trigger.config().threshold;
        let margin = trigger.config().margin;

        let inner = Rc::new(RefCell::new(Inner {
            trigger,
            elements: ElementTable::default(),
            frames: FrameCountdown::new(RESTING_DELAY_FRAMES),
        }));

        // The frame callback re-requests itself while waiting, through a weak
        // handle so the slot does not own itself.
        let on_frame: FrameSlot = Rc::new(RefCell::new(None));
        let frame_inner = inner.clone();
        let frame_slot = Rc::downgrade(&on_frame);
        let callback = Closure::<dyn FnMut()>::new(move || {
            let mut guard = frame_inner.borrow_mut();
            let inner = &mut *guard;
            match inner.frames.on_frame() {
                FrameStep::Run => {
                    inner.trigger.handle_animation_frame(&mut inner.elements);
                    inner.release_untracked();
                }
                FrameStep::Wait => {
                    if let Some(id) = frame_slot.upgrade().and_then(|slot| request_frame(&slot)) {
                        inner.frames.set_request(id);
                    }
                }
                FrameStep::Idle => {}
            }
        });
        *on_frame.borrow_mut() = Some(callback);

        let io_inner = inner.clone();
        let io_frame = on_frame.clone();
        let on_intersect: IntersectCallback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            let mut guard = io_inner.borrow_mut();
            let inner = &mut *guard;
            let mut dispatched = false;
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(id) = inner.elements.id_of(&entry.target()) else {
                    continue;
                };
                // isIntersecting is already true on edge contact; hold to the threshold
                let visible = is_visible_enough(entry.intersection_ratio(), threshold);
                if inner
                    .trigger
                    .handle_visibility(&id, visible, &mut inner.elements)
                    .is_some()
                {
                    dispatched = true;
                }
            }
            if dispatched && inner.frames.arm() {
                if let Some(id) = request_frame(&io_frame) {
                    inner.frames.set_request(id);
                }
            }
        });

        let options = IntersectionObserverInit::new();
        let thresholds = js_sys::Array::of1(&JsValue::from_f64(threshold));
        if threshold == 0.0 {
            // Edge contact reports ratio 0, which never counts as visible
            thresholds.push(&JsValue::from_f64(MIN_VISIBLE_RATIO));
        }
        options.set_threshold(&thresholds);
        options.set_root_margin(&format!("{}px", margin));

        let observer = match IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options) {
            Ok(observer) => observer,
            Err(_) => {
                debug!("IntersectionObserver unavailable, reveal disabled");
                return None;
            }
        };

        Some(Self {
            inner,
            observer,
            _on_intersect: on_intersect,
            _on_frame: on_frame,
        })
    }

    /// Register and observe every element matching `selector`.
    ///
    /// Returns the number of newly registered elements. An invalid selector
    /// registers nothing.
    pub fn observe_selector(&self, selector: &str) -> usize {
        query_html_elements(selector)
            .iter()
            .filter(|element| self.observe(element))
            .count()
    }

    /// Register and observe one element, reading its `data-animation` tag.
    pub fn observe(&self, element: &HtmlElement) -> bool {
        let tag = element.get_attribute(ANIMATION_ATTRIBUTE);
        let added = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.elements.insert(element);
            inner.trigger.register([(id, tag.as_deref())]) == 1
        };
        self.observer.observe(element);
        added
    }

    /// Stop observing an element and reset its reveal state.
    ///
    /// The element is released right away unless its resting-state write is
    /// still queued, in which case it goes after that frame.
    pub fn unobserve(&self, element: &HtmlElement) -> bool {
        self.observer.unobserve(element);
        let mut inner = self.inner.borrow_mut();
        let Some(id) = inner.elements.id_of(element) else {
            return false;
        };
        let removed = inner.trigger.unregister(&id);
        if !inner.trigger.has_queued_task(&id) {
            inner.elements.release(id);
        }
        removed
    }

    /// Number of elements still waiting to be revealed.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().trigger.pending_count()
    }

    /// Keep the observer alive for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for WebReveal {
    fn drop(&mut self) {
        self.observer.disconnect();
        let mut inner = self.inner.borrow_mut();
        // A frame callback must not run once the closure is gone
        if let Some(request) = inner.frames.take_request() {
            if let Some(window) = web_sys::window() {
                if window.cancel_animation_frame(request).is_err() {
                    debug!("cancelAnimationFrame failed");
                }
            }
        }
        inner.trigger.clear();
    }
}

/// Request an animation frame, returning its id.
fn request_frame(slot: &RefCell<Option<FrameCallback>>) -> Option<i32> {
    let window = web_sys::window()?;
    let slot = slot.borrow();
    let callback = slot.as_ref()?;
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(_) => {
            debug!("requestAnimationFrame failed");
            None
        }
    }
}

fn set_timeout(callback: impl FnOnce() + 'static, delay_ms: u32) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let callback = Closure::once_into_js(callback);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        )
        .is_ok()
}

/// All `HtmlElement`s matching `selector`, in document order.
pub fn query_html_elements(selector: &str) -> Vec<HtmlElement> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let nodes = match document.query_selector_all(selector) {
        Ok(nodes) => nodes,
        Err(_) => {
            debug!(selector, "invalid selector");
            return Vec::new();
        }
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn add_listener<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    element: &HtmlElement,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> bool {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    let added = element
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok();
    // Listeners stay attached for the life of the page
    closure.forget();
    added
}

/// Apply `effect` on `mouseenter` and undo it on `mouseleave`.
///
/// Returns the number of elements wired up.
pub fn install_hover_effect(selector: &str, effect: HoverEffect) -> usize {
    let effect = Rc::new(effect);
    let mut installed = 0;
    for element in query_html_elements(selector) {
        let (enter_fx, enter_el) = (effect.clone(), element.clone());
        let (leave_fx, leave_el) = (effect.clone(), element.clone());
        let enter = add_listener(&element, "mouseenter", move |_: web_sys::Event| {
            enter_fx.apply_enter(&mut InlineStyles, &enter_el);
        });
        let leave = add_listener(&element, "mouseleave", move |_: web_sys::Event| {
            leave_fx.apply_leave(&mut InlineStyles, &leave_el);
        });
        if enter && leave {
            installed += 1;
        }
    }
    installed
}

/// Spawn a ripple on every click.
///
/// Card ripples are skipped when the click landed directly on a link.
pub fn install_ripples(selector: &str, kind: RippleKind) -> usize {
    let mut installed = 0;
    for element in query_html_elements(selector) {
        let host = element.clone();
        let added = add_listener(&element, "click", move |event: MouseEvent| {
            if kind == RippleKind::Card {
                let tag = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|t| t.tag_name())
                    .unwrap_or_default();
                if !should_ripple_card(&tag) {
                    return;
                }
            }
            spawn_ripple(&host, event.client_x() as f64, event.client_y() as f64, kind);
        });
        if added {
            installed += 1;
        }
    }
    installed
}

fn spawn_ripple(host: &HtmlElement, client_x: f64, client_y: f64, kind: RippleKind) -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(ripple) = document
        .create_element("span")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return false;
    };

    let bounds = host.get_bounding_client_rect();
    let rect = Rect::new(bounds.x(), bounds.y(), bounds.width(), bounds.height());
    let spec = RippleSpec::at_click(client_x, client_y, &rect, kind);

    ripple.style().set_css_text(&spec.css_text());
    for (property, value) in kind.host_styles() {
        write_inline(host, *property, value);
    }
    if host.append_child(&ripple).is_err() {
        debug!("could not attach ripple");
        return false;
    }
    set_timeout(move || ripple.remove(), kind.duration_ms())
}

/// Add the plan's class to each matching element, one step apart.
pub fn install_list_stagger(selector: &str, plan: &StaggerPlan) -> usize {
    let elements = query_html_elements(selector);
    let class_name = plan.class_name;
    plan.delays(elements.len())
        .filter(|&(index, delay_ms)| {
            let element = elements[index].clone();
            set_timeout(
                move || {
                    if element.class_list().add_1(class_name).is_err() {
                        debug!(class_name, "could not add stagger class");
                    }
                },
                delay_ms,
            )
        })
        .count()
}

/// Wire up the full page: reveal-on-scroll for `reveal_selector`, hover and
/// ripple feedback on `.card` and `.btn`, hover and staggered entrance on
/// `.list-group-item`.
///
/// The returned [`WebReveal`] must be kept alive or forgotten.
pub fn install_page_effects(config: RevealConfig, reveal_selector: &str) -> Option<WebReveal> {
    install_hover_effect(".card", HoverEffect::card());
    install_ripples(".card", RippleKind::Card);
    install_hover_effect(".btn", HoverEffect::button());
    install_ripples(".btn", RippleKind::Button);
    install_hover_effect(".list-group-item", HoverEffect::list_item());
    install_list_stagger(".list-group-item", &StaggerPlan::default());

    let reveal = WebReveal::new(config)?;
    let observed = reveal.observe_selector(reveal_selector);
    debug!(observed, "page effects installed");
    Some(reveal)
}
