//! Reveal animation variants and their `data-animation` tags.

use crate::style::{Transform, VisualState};

/// Which entrance animation an element plays when it is revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AnimationVariant {
    /// Fade in while rising from 20px below
    #[default]
    FadeIn,
    /// Fade in while sliding from 50px to the left
    SlideIn,
    /// Fade in while growing from 80% scale
    ScaleIn,
}

impl AnimationVariant {
    /// All variants, in tag order.
    pub const ALL: [AnimationVariant; 3] = [Self::FadeIn, Self::SlideIn, Self::ScaleIn];

    /// Resolve a `data-animation` tag.
    ///
    /// Tags are matched exactly. A missing or unrecognized tag selects
    /// [`AnimationVariant::FadeIn`].
    ///
    /// ```rust
    /// use scroll_reveal_core::AnimationVariant;
    ///
    /// assert_eq!(AnimationVariant::from_tag(Some("scaleIn")), AnimationVariant::ScaleIn);
    /// assert_eq!(AnimationVariant::from_tag(Some("bounce")), AnimationVariant::FadeIn);
    /// assert_eq!(AnimationVariant::from_tag(None), AnimationVariant::FadeIn);
    /// ```
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("slideIn") => Self::SlideIn,
            Some("scaleIn") => Self::ScaleIn,
            _ => Self::FadeIn,
        }
    }

    /// The tag that selects this variant.
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::SlideIn => "slideIn",
            Self::ScaleIn => "scaleIn",
        }
    }

    /// Offset applied while the element is waiting to transition in.
    pub fn entry_transform(self) -> Transform {
        match self {
            Self::FadeIn => Transform::TranslateY(20.0),
            Self::SlideIn => Transform::TranslateX(-50.0),
            Self::ScaleIn => Transform::Scale(0.8),
        }
    }

    /// Zero-offset transform of the same kind as the entry transform.
    pub fn resting_transform(self) -> Transform {
        match self {
            Self::FadeIn => Transform::TranslateY(0.0),
            Self::SlideIn => Transform::TranslateX(0.0),
            Self::ScaleIn => Transform::Scale(1.0),
        }
    }

    /// Transparent, offset state painted before the transition starts.
    pub fn entry_state(self) -> VisualState {
        VisualState {
            opacity: 0.0,
            transform: self.entry_transform(),
        }
    }

    /// Opaque, zero-offset state the element settles into.
    pub fn resting_state(self) -> VisualState {
        VisualState {
            opacity: 1.0,
            transform: self.resting_transform(),
        }
    }
}

impl std::fmt::Display for AnimationVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}
