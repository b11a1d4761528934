//! # scroll-reveal-core
//!
//! Reveal-on-scroll animations and pointer feedback effects for web pages.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Revealing elements once, the first time they scroll into view
//! - Evaluating element visibility against a margin-expanded viewport
//! - Hover, ripple and staggered-entrance style recipes
//! - Debounce and throttle helpers driven by a caller-supplied clock
//!
//! The host supplies visibility notifications, rendering opportunities and
//! style writes; the crate never fails on missing elements or unknown tags.
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration types
//! - `toml` - Load [`RevealConfig`] from TOML
//! - `web` - Browser bindings (IntersectionObserver, requestAnimationFrame, inline styles)
//!
//! ## Example
//!
//! ```rust,ignore
//! use scroll_reveal_core::{RevealConfig, VisibilityAnimationTrigger};
//!
//! let mut trigger = VisibilityAnimationTrigger::new(RevealConfig::default());
//! trigger.register([(element_id, Some("slideIn"))]);
//!
//! // From the host's visibility callback
//! trigger.handle_visibility(&element_id, true, &mut styles);
//!
//! // From the next animation frame
//! trigger.handle_animation_frame(&mut styles);
//! ```

mod config;
pub mod effects;
mod geometry;
mod observer;
mod style;
pub mod timing;
mod trigger;
mod variant;

#[cfg(feature = "web")]
pub mod web;

pub use config::{ConfigError, RevealConfig, VariantDurations};
pub use effects::{HoverEffect, RippleKind, RippleSpec, StaggerPlan};
pub use geometry::{intersection_ratio, is_visible_enough, Rect, Viewport};
pub use observer::VisibilityTracker;
pub use style::{Ease, ElementStyles, StyleProperty, Transform, Transition, VisualState};
pub use timing::{Debouncer, FrameCountdown, FrameStep, Throttle, TimingDefaults};
pub use trigger::{Membership, RevealPhase, RevealTask, VisibilityAnimationTrigger};
pub use variant::AnimationVariant;

#[cfg(feature = "web")]
pub use web::{install_page_effects, WebReveal};
