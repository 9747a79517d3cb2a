// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap classification state machine for a single interactive surface.
//!
//! This module turns raw press/move/release input from two channels (touch
//! and mouse) into tap classifications. It tracks the pointer path length
//! between press and release and counts consecutive taps against a timing
//! window to recognize doubles.
//!
//! ## Primary Use Case
//!
//! **Unified tap recognition on hybrid surfaces**: a surface that receives
//! both touch and synthetic mouse events for the same physical contact must
//! not report one tap twice. The machine honors exactly one channel: the
//! first touch press locks the session to touch input permanently.
//!
//! ## Usage
//!
//! Basic single-tap recognition:
//! ```
//! use taproot_gesture::tap::{PointerEvent, TapResult, TapState};
//! use kurbo::Point;
//!
//! let mut state = TapState::new();
//!
//! // Press, a small wiggle, release.
//! state.handle(PointerEvent::MouseDown { position: Point::new(40.0, 40.0) }, 1000);
//! state.handle(
//!     PointerEvent::MouseMove { position: Point::new(42.0, 41.0), primary_held: true },
//!     1016,
//! );
//! let result = state.handle(PointerEvent::MouseUp, 1032);
//!
//! assert_eq!(
//!     result,
//!     Some(TapResult::Tap {
//!         event: taproot_gesture::tap::TapEvent { position: Point::new(42.0, 41.0) },
//!         double: false,
//!     })
//! );
//! ```
//!
//! Double-tap recognition over the touch channel:
//! ```
//! # use taproot_gesture::tap::{PointerEvent, TapResult, TapState};
//! # use kurbo::Point;
//! let mut state = TapState::new();
//! let finger = [Point::new(10.0, 20.0)];
//!
//! state.handle(PointerEvent::TouchStart { touches: &finger }, 1000);
//! let first = state.handle(PointerEvent::TouchEnd { touches: &[] }, 1050);
//! assert!(matches!(first, Some(TapResult::Tap { double: false, .. })));
//!
//! state.handle(PointerEvent::TouchStart { touches: &finger }, 1200);
//! let second = state.handle(PointerEvent::TouchEnd { touches: &[] }, 1250);
//! // The second release reports the tap again, now completing a double.
//! assert!(matches!(second, Some(TapResult::Tap { double: true, .. })));
//! assert_eq!(state.tap_count(), 0);
//! ```
//!
//! ## Classification Rules
//!
//! On every recognized release:
//!
//! 1. **Slide rejection**: if the accumulated path length since the press is
//!    at least [`TapState::movement_threshold`], the gesture is a drag and
//!    [`TapResult::Slide`] is returned. Counters do not change.
//! 2. **Tap counting**: otherwise the release is a tap. If it lands within
//!    [`TapState::double_tap_window`] of the previous tap, the consecutive
//!    counter advances; otherwise it restarts at one.
//! 3. **Double completion**: when the counter reaches two, the returned
//!    [`TapResult::Tap`] has `double` set and the counter resets to zero.
//!
//! The zero reset after a double is load-bearing: three rapid taps yield
//! `false, true, false` for the `double` flag (the third starts a fresh
//! streak), while four rapid taps yield two doubles.
//!
//! Movement is accumulated path-length style over every move sample, not as
//! net displacement from the press origin. A pointer that jitters back and
//! forth accumulates movement even if it ends where it started.
//!
//! ## Channel Arbitration
//!
//! - Any touch press-start locks the session into touch mode, even a
//!   multi-contact start that is otherwise ignored.
//! - While locked, mouse events are dropped with no state change.
//! - Before any touch is seen, the first mouse event marks the session as
//!   mouse-driven; a later touch press still takes the lock.
//! - Only single-contact touch input is tracked; a release is recognized
//!   when the contact count returns to zero.
//!
//! ## Known Quirks
//!
//! There is no pressed-state guard: a release that arrives without a
//! preceding press still classifies against the last-known position and a
//! zero path length, and therefore reports a tap. Hosts that can deliver
//! unpaired releases should filter them upstream.

use kurbo::Point;

/// Which input channel the session honors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// No input seen yet; either channel may claim the session.
    #[default]
    Undetermined,
    /// Touch input observed; mouse events are ignored for the session's life.
    Touch,
    /// Mouse input observed; remains live unless a touch press arrives.
    Mouse,
}

/// A raw pointer event from the host's input source.
///
/// Touch variants carry the full contact list of the underlying event;
/// coordinates are surface-local. Timestamps are supplied separately to
/// [`TapState::handle`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent<'a> {
    /// One or more contacts went down.
    TouchStart {
        /// All contact points currently on the surface.
        touches: &'a [Point],
    },
    /// One or more contacts moved.
    TouchMove {
        /// All contact points currently on the surface.
        touches: &'a [Point],
    },
    /// One or more contacts lifted; `touches` holds the remaining contacts.
    TouchEnd {
        /// Contact points still on the surface after the lift.
        touches: &'a [Point],
    },
    /// A mouse button went down.
    MouseDown {
        /// Pointer position at press time.
        position: Point,
    },
    /// The mouse moved.
    MouseMove {
        /// Current pointer position.
        position: Point,
        /// True while the primary button is held; moves are only tracked then.
        primary_held: bool,
    },
    /// The mouse button was released. Position is taken from the last
    /// tracked sample.
    MouseUp,
}

/// The release position handed to subscribers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapEvent {
    /// Pointer position at release time, in surface-local coordinates.
    pub position: Point,
}

/// Classification of a recognized release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TapResult {
    /// The pointer traveled too far between press and release; not a tap.
    Slide,
    /// A qualifying tap.
    Tap {
        /// Release position.
        event: TapEvent,
        /// True when this tap completed a double.
        double: bool,
    },
}

/// Tap recognition state machine for one attached surface.
///
/// Owns the per-session gesture state: the live input channel, the last
/// pointer position, the accumulated path length since the last press, and
/// the consecutive-tap counter with its timestamp. All transitions happen
/// synchronously inside [`TapState::handle`]; there are no timers, and a
/// double is recognized lazily on the release that completes it.
///
/// Timestamps are caller-provided milliseconds from a monotonic source, so
/// the machine is deterministic and testable without real elapsed time.
#[derive(Clone, Debug)]
pub struct TapState {
    /// Live input channel for this session.
    mode: InputMode,
    /// Last tracked pointer position.
    last_position: Point,
    /// Path length accumulated since the last press.
    moved_length: f64,
    /// Consecutive-tap counter.
    tap_count: u32,
    /// Timestamp of the most recent qualifying tap (milliseconds).
    last_tap_time: u64,
    /// Path length at or above which a release is a slide, not a tap.
    pub movement_threshold: f64,
    /// Maximum gap between consecutive taps of a double (milliseconds).
    pub double_tap_window: u64,
}

impl TapState {
    /// Create a tap state with default thresholds.
    ///
    /// Defaults are a 10-unit movement threshold and a 300ms double-tap
    /// window: a release counts as a tap only when the pointer traveled less
    /// than 10 surface units since the press, and two taps pair into a
    /// double only when less than 300ms apart.
    pub fn new() -> Self {
        Self::with_thresholds(10.0, 300)
    }

    /// Create a tap state with custom thresholds.
    ///
    /// # Arguments
    /// * `movement_threshold` - Path length at or above which a release is
    ///   rejected as a slide
    /// * `double_tap_window` - Maximum milliseconds between consecutive taps
    ///   of a double
    pub fn with_thresholds(movement_threshold: f64, double_tap_window: u64) -> Self {
        Self {
            mode: InputMode::Undetermined,
            last_position: Point::ZERO,
            moved_length: 0.0,
            tap_count: 0,
            last_tap_time: 0,
            movement_threshold,
            double_tap_window,
        }
    }

    /// Feed one raw pointer event into the machine.
    ///
    /// Applies channel arbitration, updates movement tracking, and on a
    /// recognized release returns the classification. Non-release events and
    /// events filtered by arbitration or the contact-count rules return
    /// `None`.
    ///
    /// # Arguments
    /// * `event` - The raw event, with surface-local coordinates
    /// * `now` - Event timestamp in milliseconds from a monotonic source
    pub fn handle(&mut self, event: PointerEvent<'_>, now: u64) -> Option<TapResult> {
        match event {
            PointerEvent::TouchStart { touches } => {
                // The lock is taken on every touch start, even multi-contact
                // ones whose tracking is filtered below.
                self.mode = InputMode::Touch;
                if let [position] = touches {
                    self.press(*position);
                }
                None
            }
            PointerEvent::TouchMove { touches } => {
                if let [position] = touches {
                    self.movement(*position);
                }
                None
            }
            PointerEvent::TouchEnd { touches } => {
                if touches.is_empty() {
                    Some(self.release(now))
                } else {
                    None
                }
            }
            PointerEvent::MouseDown { position } => {
                if self.mouse_live() {
                    self.press(position);
                }
                None
            }
            PointerEvent::MouseMove {
                position,
                primary_held,
            } => {
                if self.mouse_live() && primary_held {
                    self.movement(position);
                }
                None
            }
            PointerEvent::MouseUp => {
                if self.mouse_live() {
                    Some(self.release(now))
                } else {
                    None
                }
            }
        }
    }

    /// Arbitrate the mouse channel: true when mouse input is live.
    ///
    /// The first mouse event seen while undetermined claims the session for
    /// the mouse; a touch lock silences the channel permanently.
    fn mouse_live(&mut self) -> bool {
        match self.mode {
            InputMode::Touch => false,
            InputMode::Mouse => true,
            InputMode::Undetermined => {
                self.mode = InputMode::Mouse;
                true
            }
        }
    }

    /// Record a press: pin the position and zero the accumulated path.
    fn press(&mut self, position: Point) {
        self.last_position = position;
        self.moved_length = 0.0;
    }

    /// Record a move sample: extend the accumulated path to the new position.
    fn movement(&mut self, position: Point) {
        self.moved_length += self.last_position.distance(position);
        self.last_position = position;
    }

    /// Classify a release and advance the tap counter.
    fn release(&mut self, now: u64) -> TapResult {
        let result = if self.moved_length < self.movement_threshold {
            if now.saturating_sub(self.last_tap_time) < self.double_tap_window {
                self.tap_count += 1;
            } else {
                self.tap_count = 1;
            }
            self.last_tap_time = now;
            let event = TapEvent {
                position: self.last_position,
            };
            let double = self.tap_count == 2;
            if double {
                // Clear on the maximum count, not back to one: the next tap
                // starts a fresh streak, so four rapid taps yield two
                // doubles but three rapid taps yield only one.
                self.tap_count = 0;
            }
            TapResult::Tap { event, double }
        } else {
            TapResult::Slide
        };
        self.moved_length = 0.0;
        result
    }

    /// The channel this session currently honors.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Last tracked pointer position.
    pub fn last_position(&self) -> Point {
        self.last_position
    }

    /// Path length accumulated since the last press.
    pub fn moved_length(&self) -> f64 {
        self.moved_length
    }

    /// Current consecutive-tap count.
    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// Re-initialize the session, keeping the configured thresholds.
    ///
    /// Returns the machine to the undetermined channel with cleared tracking
    /// and counters, as if freshly attached.
    pub fn reset(&mut self) {
        *self = Self::with_thresholds(self.movement_threshold, self.double_tap_window);
    }
}

impl Default for TapState {
    fn default() -> Self {
        Self::new()
    }
}
