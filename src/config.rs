//! Reveal configuration.

use crate::style::{Ease, Transition};
use crate::variant::AnimationVariant;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric option is outside its accepted range
    #[error("invalid {field}: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    /// The TOML document could not be decoded
    #[cfg(feature = "toml")]
    #[error("invalid reveal config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Per-variant transition duration overrides.
///
/// Unset entries use [`RevealConfig::duration_ms`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VariantDurations {
    pub fade_in: Option<u32>,
    pub slide_in: Option<u32>,
    pub scale_in: Option<u32>,
}

impl VariantDurations {
    /// Get the override for a variant.
    pub fn get(&self, variant: AnimationVariant) -> Option<u32> {
        match variant {
            AnimationVariant::FadeIn => self.fade_in,
            AnimationVariant::SlideIn => self.slide_in,
            AnimationVariant::ScaleIn => self.scale_in,
        }
    }

    /// Set the override for a variant.
    pub fn set(&mut self, variant: AnimationVariant, duration_ms: Option<u32>) {
        match variant {
            AnimationVariant::FadeIn => self.fade_in = duration_ms,
            AnimationVariant::SlideIn => self.slide_in = duration_ms,
            AnimationVariant::ScaleIn => self.scale_in = duration_ms,
        }
    }
}

/// Options for a [`VisibilityAnimationTrigger`](crate::VisibilityAnimationTrigger).
///
/// ## Example
///
/// ```rust
/// use scroll_reveal_core::{AnimationVariant, RevealConfig};
///
/// let config = RevealConfig::default()
///     .with_threshold(0.25)
///     .with_variant_duration(AnimationVariant::ScaleIn, 400);
///
/// assert_eq!(config.margin, 50.0);
/// assert_eq!(config.duration_for(AnimationVariant::FadeIn), 800);
/// assert_eq!(config.duration_for(AnimationVariant::ScaleIn), 400);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealConfig {
    /// Minimum visible fraction of an element (0.0 - 1.0, inclusive)
    pub threshold: f64,
    /// Margin in logical pixels added to every side of the viewport
    pub margin: f64,
    /// Transition duration used when a variant has no override
    pub duration_ms: u32,
    /// Per-variant duration overrides
    pub variant_durations: VariantDurations,
    /// Timing curve for the opacity and transform transition
    pub ease: Ease,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            margin: 50.0,
            duration_ms: 800,
            variant_durations: VariantDurations::default(),
            ease: Ease::Ease,
        }
    }
}

impl RevealConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_variant_duration(mut self, variant: AnimationVariant, duration_ms: u32) -> Self {
        self.variant_durations.set(variant, Some(duration_ms));
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Transition duration for a variant.
    pub fn duration_for(&self, variant: AnimationVariant) -> u32 {
        self.variant_durations
            .get(variant)
            .unwrap_or(self.duration_ms)
    }

    /// Transition used when revealing a variant.
    pub fn transition_for(&self, variant: AnimationVariant) -> Transition {
        Transition::new(self.duration_for(variant), self.ease)
    }

    /// Clamp out-of-range values into something usable.
    ///
    /// Thresholds are clamped to 0.0 - 1.0 (NaN becomes the default 0.1).
    /// Negative or non-finite margins become 0.
    pub fn normalized(mut self) -> Self {
        self.threshold = if self.threshold.is_nan() {
            Self::default().threshold
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        if !self.margin.is_finite() || self.margin < 0.0 {
            self.margin = 0.0;
        }
        self
    }

    /// Strict check for callers that want to reject bad input instead of clamping it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::OutOfRange {
                field: "threshold",
                value: self.threshold,
            });
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "margin",
                value: self.margin,
            });
        }
        Ok(())
    }

    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// ```toml
    /// threshold = 0.2
    /// margin = 0.0
    /// duration_ms = 600
    /// ease = "ease-out"
    ///
    /// [variant_durations]
    /// scale_in = 400
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RevealConfig::default();
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.margin, 50.0);
        assert_eq!(config.duration_ms, 800);
        assert_eq!(config.ease, Ease::Ease);
        for variant in AnimationVariant::ALL {
            assert_eq!(config.duration_for(variant), 800);
        }
    }

    #[test]
    fn test_variant_override() {
        let config = RevealConfig::default()
            .with_duration_ms(500)
            .with_variant_duration(AnimationVariant::SlideIn, 300);
        assert_eq!(config.duration_for(AnimationVariant::FadeIn), 500);
        assert_eq!(config.duration_for(AnimationVariant::SlideIn), 300);
        assert_eq!(
            config.transition_for(AnimationVariant::SlideIn).to_css(),
            "opacity 300ms ease, transform 300ms ease"
        );
    }

    #[test]
    fn test_normalized() {
        let config = RevealConfig::default()
            .with_threshold(1.5)
            .with_margin(-10.0)
            .normalized();
        assert_eq!(config.threshold, 1.0);
        assert_eq!(config.margin, 0.0);

        let nan = RevealConfig::default()
            .with_threshold(f64::NAN)
            .with_margin(f64::INFINITY)
            .normalized();
        assert_eq!(nan.threshold, 0.1);
        assert_eq!(nan.margin, 0.0);
    }

    #[test]
    fn test_validate() {
        assert!(RevealConfig::default().validate().is_ok());

        let err = RevealConfig::default()
            .with_threshold(-0.1)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("threshold"));

        assert!(RevealConfig::default().with_margin(f64::NAN).validate().is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml() {
        let config = RevealConfig::from_toml_str(
            r#"
            threshold = 0.2
            duration_ms = 600
            ease = "ease-out"

            [variant_durations]
            scale_in = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.threshold, 0.2);
        assert_eq!(config.margin, 50.0);
        assert_eq!(config.ease, Ease::EaseOut);
        assert_eq!(config.duration_for(AnimationVariant::ScaleIn), 400);
        assert_eq!(config.duration_for(AnimationVariant::FadeIn), 600);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_rejects_bad_threshold() {
        let result = RevealConfig::from_toml_str("threshold = 2.0");
        assert!(matches!(result, Err(ConfigError::OutOfRange { field: "threshold", .. })));
    }
}
