//! Debounce, throttle and stagger helpers.
//!
//! Like [`VisibilityTracker`](crate::VisibilityTracker), these do not own a
//! clock. The caller passes the current time in milliseconds (for example
//! `performance.now()` in a browser) and acts on the result.

/// Timing constants used across the page effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingDefaults {
    /// Duration of hover and press feedback
    pub animation_ms: u32,
    /// Scroll distance before scroll-dependent effects kick in
    pub scroll_threshold_px: u32,
    /// Quiet period for debounced handlers
    pub debounce_ms: u32,
    /// Duration of reveal transitions
    pub reveal_ms: u32,
    /// Delay between consecutive staggered list items
    pub stagger_step_ms: u32,
}

impl Default for TimingDefaults {
    fn default() -> Self {
        Self {
            animation_ms: 300,
            scroll_threshold_px: 100,
            debounce_ms: 250,
            reveal_ms: 800,
            stagger_step_ms: 100,
        }
    }
}

/// Trailing-edge debounce.
///
/// Every [`call`](Self::call) pushes the deadline back; [`poll`](Self::poll)
/// reports true exactly once after the caller has been quiet for `wait_ms`.
///
/// ## Example
///
/// ```rust
/// use scroll_reveal_core::Debouncer;
///
/// let mut resize = Debouncer::new(250);
/// resize.call(0.0);
/// resize.call(100.0);
/// assert!(!resize.poll(300.0)); // deadline moved to 350
/// assert!(resize.poll(350.0));
/// assert!(!resize.poll(400.0)); // already fired
/// ```
#[derive(Clone, Debug)]
pub struct Debouncer {
    wait_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms: wait_ms as f64,
            deadline: None,
        }
    }

    /// Record an invocation at `now_ms`, restarting the quiet period.
    pub fn call(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.wait_ms);
    }

    /// Check whether the debounced action should run now.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time at which the pending action becomes due, if any.
    #[inline]
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending action without running it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Leading-edge throttle: at most one pass per `limit_ms`.
#[derive(Clone, Debug)]
pub struct Throttle {
    limit_ms: f64,
    blocked_until: Option<f64>,
}

impl Throttle {
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms: limit_ms as f64,
            blocked_until: None,
        }
    }

    /// Returns true if the action may run at `now_ms`, and starts a new
    /// blocking window when it does.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        if let Some(until) = self.blocked_until {
            if now_ms < until {
                return false;
            }
        }
        self.blocked_until = Some(now_ms + self.limit_ms);
        true
    }

    /// Clear the blocking window.
    pub fn reset(&mut self) {
        self.blocked_until = None;
    }
}

/// What a frame callback driven by [`FrameCountdown`] should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
    /// Nothing armed
    Idle,
    /// Request another frame and keep waiting
    Wait,
    /// Run the deferred work now
    Run,
}

/// Defers work by a number of animation frames and remembers the host's
/// outstanding frame request.
///
/// A browser may deliver a style write and the following
/// `requestAnimationFrame` callback inside the same rendering step, so work
/// that must see a painted frame first waits two frames. Arming again while
/// waiting restarts the count, which keeps the newest write two frames away
/// from the deferred work as well.
///
/// ## Example
///
/// ```rust
/// use scroll_reveal_core::timing::{FrameCountdown, FrameStep};
///
/// let mut frames = FrameCountdown::new(2);
/// assert!(frames.arm()); // nothing outstanding, so request a frame
/// frames.set_request(7);
/// assert!(!frames.arm()); // request 7 will come back anyway
///
/// assert_eq!(frames.on_frame(), FrameStep::Wait);
/// assert_eq!(frames.on_frame(), FrameStep::Run);
/// assert_eq!(frames.on_frame(), FrameStep::Idle);
/// ```
#[derive(Clone, Debug)]
pub struct FrameCountdown {
    frames: u32,
    remaining: u32,
    request: Option<i32>,
}

impl FrameCountdown {
    pub fn new(frames: u32) -> Self {
        Self {
            frames: frames.max(1),
            remaining: 0,
            request: None,
        }
    }

    /// Start or restart the countdown.
    ///
    /// Returns true when no frame request is outstanding and the host must
    /// make one.
    pub fn arm(&mut self) -> bool {
        self.remaining = self.frames;
        self.request.is_none()
    }

    /// Remember the id of a frame request the host just made.
    #[inline]
    pub fn set_request(&mut self, id: i32) {
        self.request = Some(id);
    }

    /// Advance by one frame. The outstanding request is consumed.
    pub fn on_frame(&mut self) -> FrameStep {
        self.request = None;
        match self.remaining {
            0 => FrameStep::Idle,
            1 => {
                self.remaining = 0;
                FrameStep::Run
            }
            _ => {
                self.remaining -= 1;
                FrameStep::Wait
            }
        }
    }

    /// Disarm and hand back the outstanding request so the host can cancel it.
    pub fn take_request(&mut self) -> Option<i32> {
        self.remaining = 0;
        self.request.take()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.remaining > 0
    }
}

/// Delay for the item at `index` in a staggered sequence.
#[inline]
pub fn stagger_delay_ms(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(step_ms)
}
