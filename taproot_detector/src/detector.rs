// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The detector: one gesture session, one attachment, one subscriber registry.
//!
//! ## Lifecycle
//!
//! A [`TapDetector`] is constructed once and then attached to a surface with
//! [`TapDetector::attach`]. Attachment starts a fresh gesture session; the
//! session lives until [`TapDetector::detach`] (or a replacing `attach`), and
//! no gesture state survives across attachments. Subscriptions are
//! independent of attachment and may be made at any time.
//!
//! ## Event pump
//!
//! The host forwards every raw pointer event of the attached surface into
//! [`TapDetector::handle_event`], stamped with a monotonic millisecond
//! timestamp. Events carrying any other [`SurfaceId`] are dropped, which is
//! what makes delivery after detach unreachable rather than an error case.
//!
//! ## Re-entrancy
//!
//! Dispatch borrows the detector mutably, so a subscriber cannot feed
//! another event into the same detector from inside its callback; the
//! borrow checker rejects the capture it would need. Queue such work on the
//! host side and run it after `handle_event` returns.

use taproot_gesture::tap::{InputMode, PointerEvent, TapEvent, TapResult, TapState};

use crate::registry::{CallbackRegistry, TapHandler};
use crate::types::{DetachError, DispatchError, SubscriberError, Surface, SurfaceId};

use alloc::boxed::Box;

/// Tap gesture detector for one interactive surface.
///
/// Normalizes touch and mouse input into a single stream of single-tap and
/// double-tap notifications. `K` is the subscriber key type; registering
/// under an existing key is a no-op, so subscription is idempotent per key.
///
/// ## Usage
///
/// - Subscribe handlers with [`TapDetector::subscribe_single_tap`] /
///   [`TapDetector::subscribe_double_tap`].
/// - Attach to a surface with [`TapDetector::attach`].
/// - Forward the surface's raw pointer events into
///   [`TapDetector::handle_event`].
///
/// Every qualifying release notifies the single-tap subscribers; the release
/// that completes a double additionally notifies the double-tap subscribers,
/// after the single-tap set, with the same payload.
pub struct TapDetector<K = u32> {
    attachment: Option<SurfaceId>,
    state: TapState,
    registry: CallbackRegistry<K>,
}

impl<K> core::fmt::Debug for TapDetector<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TapDetector")
            .field("attachment", &self.attachment)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<K: PartialEq + Clone> TapDetector<K> {
    /// Create a detector with default classification thresholds.
    pub fn new() -> Self {
        Self::with_state(TapState::new())
    }

    /// Create a detector with custom classification thresholds.
    ///
    /// # Arguments
    /// * `movement_threshold` - Path length at or above which a release is a
    ///   slide rather than a tap
    /// * `double_tap_window` - Maximum milliseconds between the taps of a
    ///   double
    pub fn with_thresholds(movement_threshold: f64, double_tap_window: u64) -> Self {
        Self::with_state(TapState::with_thresholds(movement_threshold, double_tap_window))
    }

    fn with_state(state: TapState) -> Self {
        Self {
            attachment: None,
            state,
            registry: CallbackRegistry::new(),
        }
    }

    /// Register a single-tap subscriber under `key`.
    ///
    /// Returns `false` (and drops `handler`) when `key` already has a
    /// single-tap subscriber: per-key registration is idempotent.
    pub fn subscribe_single_tap<F>(&mut self, key: K, handler: F) -> bool
    where
        F: FnMut(TapEvent) -> Result<(), SubscriberError> + 'static,
    {
        self.registry.subscribe_single(key, Box::new(handler) as TapHandler)
    }

    /// Register a double-tap subscriber under `key`.
    ///
    /// Returns `false` (and drops `handler`) when `key` already has a
    /// double-tap subscriber.
    pub fn subscribe_double_tap<F>(&mut self, key: K, handler: F) -> bool
    where
        F: FnMut(TapEvent) -> Result<(), SubscriberError> + 'static,
    {
        self.registry.subscribe_double(key, Box::new(handler) as TapHandler)
    }

    /// Remove the single-tap subscriber under `key`; returns whether one was
    /// registered.
    pub fn unsubscribe_single_tap(&mut self, key: &K) -> bool {
        self.registry.unsubscribe_single(key)
    }

    /// Remove the double-tap subscriber under `key`; returns whether one was
    /// registered.
    pub fn unsubscribe_double_tap(&mut self, key: &K) -> bool {
        self.registry.unsubscribe_double(key)
    }

    /// Attach to `surface` and start a fresh gesture session.
    ///
    /// A surface that reports itself unattachable is skipped with a logged
    /// warning and `false` is returned; this is not an error. Attaching
    /// while already attached re-targets the detector: the old session is
    /// discarded along with its channel lock and tap counter. Configured
    /// thresholds survive.
    pub fn attach<S: Surface + ?Sized>(&mut self, surface: &S) -> bool {
        let id = surface.id();
        if !surface.is_attachable() {
            log::warn!("attach skipped: surface {id:?} cannot deliver pointer events");
            return false;
        }
        self.state.reset();
        self.attachment = Some(id);
        log::debug!("attached to surface {id:?}");
        true
    }

    /// Detach from `surface` and end the gesture session.
    ///
    /// Detaching a surface the detector never attached to (or a different
    /// one than is currently attached) is a reported error, not a silent
    /// no-op.
    pub fn detach<S: Surface + ?Sized>(&mut self, surface: &S) -> Result<(), DetachError> {
        let requested = surface.id();
        match self.attachment {
            None => Err(DetachError::NotAttached(requested)),
            Some(attached) if attached != requested => Err(DetachError::WrongSurface {
                attached,
                requested,
            }),
            Some(attached) => {
                self.attachment = None;
                self.state.reset();
                log::debug!("detached from surface {attached:?}");
                Ok(())
            }
        }
    }

    /// Feed one raw pointer event from `surface` into the detector.
    ///
    /// Events from surfaces other than the current attachment are dropped.
    /// On a release that classifies as a tap, single-tap subscribers are
    /// notified in registration order, then double-tap subscribers when the
    /// tap completed a double. The first subscriber error aborts the
    /// remaining notifications and is returned; the classifier state is
    /// already committed and is not rolled back.
    ///
    /// # Arguments
    /// * `surface` - Origin of the event
    /// * `event` - The raw event, surface-local coordinates
    /// * `now` - Event timestamp in milliseconds from a monotonic source
    ///
    /// # Returns
    /// `Ok(true)` when subscribers were notified, `Ok(false)` otherwise.
    pub fn handle_event(
        &mut self,
        surface: SurfaceId,
        event: PointerEvent<'_>,
        now: u64,
    ) -> Result<bool, DispatchError<K>> {
        if self.attachment != Some(surface) {
            return Ok(false);
        }
        match self.state.handle(event, now) {
            Some(TapResult::Tap { event, double }) => {
                self.registry.notify_single(event)?;
                if double {
                    self.registry.notify_double(event)?;
                }
                Ok(true)
            }
            Some(TapResult::Slide) | None => Ok(false),
        }
    }

    /// The surface currently attached, if any.
    pub fn attachment(&self) -> Option<SurfaceId> {
        self.attachment
    }

    /// The input channel the current session honors.
    pub fn mode(&self) -> InputMode {
        self.state.mode()
    }

    /// Read-only view of the gesture session.
    pub fn state(&self) -> &TapState {
        &self.state
    }
}

impl<K: PartialEq + Clone> Default for TapDetector<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::fmt;
    use kurbo::Point;

    struct Panel {
        id: SurfaceId,
        attachable: bool,
    }

    impl Surface for Panel {
        fn id(&self) -> SurfaceId {
            self.id
        }

        fn is_attachable(&self) -> bool {
            self.attachable
        }
    }

    fn panel(id: u64) -> Panel {
        Panel {
            id: SurfaceId(id),
            attachable: true,
        }
    }

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl core::error::Error for Boom {}

    /// Drives a press/release pair over the mouse channel.
    fn click(
        detector: &mut TapDetector<&'static str>,
        surface: SurfaceId,
        at: Point,
        down: u64,
        up: u64,
    ) -> Result<bool, DispatchError<&'static str>> {
        detector
            .handle_event(surface, PointerEvent::MouseDown { position: at }, down)
            .unwrap();
        detector.handle_event(surface, PointerEvent::MouseUp, up)
    }

    fn recording_detector() -> (TapDetector<&'static str>, Rc<RefCell<Vec<&'static str>>>) {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let mut detector = TapDetector::new();

        let single = Rc::clone(&log);
        detector.subscribe_single_tap("single", move |_| {
            single.borrow_mut().push("single");
            Ok(())
        });
        let double = Rc::clone(&log);
        detector.subscribe_double_tap("double", move |_| {
            double.borrow_mut().push("double");
            Ok(())
        });
        (detector, log)
    }

    #[test]
    fn tap_notifies_single_subscribers() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        assert!(detector.attach(&surface));

        let notified = click(&mut detector, surface.id(), Point::new(5.0, 5.0), 0, 40).unwrap();
        assert!(notified);
        assert_eq!(*log.borrow(), ["single"]);
    }

    #[test]
    fn double_tap_notifies_single_then_double() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);

        click(&mut detector, surface.id(), Point::new(5.0, 5.0), 0, 40).unwrap();
        click(&mut detector, surface.id(), Point::new(5.0, 5.0), 150, 190).unwrap();

        assert_eq!(*log.borrow(), ["single", "single", "double"]);
    }

    #[test]
    fn three_taps_never_fire_two_doubles() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);

        let at = Point::new(5.0, 5.0);
        click(&mut detector, surface.id(), at, 0, 40).unwrap();
        click(&mut detector, surface.id(), at, 120, 160).unwrap();
        click(&mut detector, surface.id(), at, 240, 280).unwrap();

        assert_eq!(*log.borrow(), ["single", "single", "double", "single"]);
    }

    #[test]
    fn slide_notifies_nobody() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);
        let id = surface.id();

        detector
            .handle_event(
                id,
                PointerEvent::MouseDown {
                    position: Point::new(0.0, 0.0),
                },
                0,
            )
            .unwrap();
        detector
            .handle_event(
                id,
                PointerEvent::MouseMove {
                    position: Point::new(40.0, 0.0),
                    primary_held: true,
                },
                20,
            )
            .unwrap();
        let notified = detector.handle_event(id, PointerEvent::MouseUp, 40).unwrap();

        assert!(!notified);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn events_from_other_surfaces_are_dropped() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);

        let stranger = SurfaceId(99);
        let notified = click(&mut detector, stranger, Point::new(5.0, 5.0), 0, 40).unwrap();
        assert!(!notified);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn no_notifications_after_detach() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);
        detector.detach(&surface).unwrap();

        let notified = click(&mut detector, surface.id(), Point::new(5.0, 5.0), 0, 40).unwrap();
        assert!(!notified);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unattachable_surface_is_skipped() {
        let (mut detector, log) = recording_detector();
        let bad = Panel {
            id: SurfaceId(1),
            attachable: false,
        };

        assert!(!detector.attach(&bad));
        assert_eq!(detector.attachment(), None);

        let notified = click(&mut detector, bad.id(), Point::new(5.0, 5.0), 0, 40).unwrap();
        assert!(!notified);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn detach_without_attach_is_reported() {
        let mut detector: TapDetector<&str> = TapDetector::new();
        let surface = panel(3);

        assert_eq!(
            detector.detach(&surface),
            Err(DetachError::NotAttached(SurfaceId(3)))
        );
    }

    #[test]
    fn detach_of_wrong_surface_is_reported() {
        let mut detector: TapDetector<&str> = TapDetector::new();
        detector.attach(&panel(1));

        assert_eq!(
            detector.detach(&panel(2)),
            Err(DetachError::WrongSurface {
                attached: SurfaceId(1),
                requested: SurfaceId(2),
            })
        );
        // The original attachment is untouched.
        assert_eq!(detector.attachment(), Some(SurfaceId(1)));
    }

    #[test]
    fn reattach_starts_a_fresh_session() {
        let (mut detector, log) = recording_detector();
        let first = panel(1);
        let second = panel(2);
        detector.attach(&first);

        // Lock the first session into touch mode and bank one tap.
        let touches = [Point::new(5.0, 5.0)];
        detector
            .handle_event(first.id(), PointerEvent::TouchStart { touches: &touches }, 0)
            .unwrap();
        detector
            .handle_event(first.id(), PointerEvent::TouchEnd { touches: &[] }, 40)
            .unwrap();
        assert_eq!(detector.mode(), InputMode::Touch);

        detector.attach(&second);

        // New session: channel undetermined again, counter cleared, and the
        // old surface no longer reaches the detector.
        assert_eq!(detector.mode(), InputMode::Undetermined);
        assert_eq!(detector.state().tap_count(), 0);
        assert!(
            !click(&mut detector, first.id(), Point::new(5.0, 5.0), 100, 140).unwrap()
        );
        assert!(
            click(&mut detector, second.id(), Point::new(5.0, 5.0), 200, 240).unwrap()
        );
        assert_eq!(*log.borrow(), ["single", "single"]);
    }

    #[test]
    fn duplicate_subscription_is_invoked_once() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let mut detector: TapDetector<&'static str> = TapDetector::new();

        let a = Rc::clone(&log);
        assert!(detector.subscribe_single_tap("handler", move |_| {
            a.borrow_mut().push("kept");
            Ok(())
        }));
        let b = Rc::clone(&log);
        assert!(!detector.subscribe_single_tap("handler", move |_| {
            b.borrow_mut().push("dropped");
            Ok(())
        }));

        let surface = panel(1);
        detector.attach(&surface);
        click(&mut detector, surface.id(), Point::new(5.0, 5.0), 0, 40).unwrap();

        assert_eq!(*log.borrow(), ["kept"]);
    }

    #[test]
    fn unsubscribed_handler_no_longer_fires() {
        let (mut detector, log) = recording_detector();
        let surface = panel(1);
        detector.attach(&surface);

        assert!(detector.unsubscribe_single_tap(&"single"));
        click(&mut detector, surface.id(), Point::new(5.0, 5.0), 0, 40).unwrap();
        // Only wired for singles, so nothing fired.
        assert!(log.borrow().is_empty());

        // The double-tap subscription is unaffected.
        click(&mut detector, surface.id(), Point::new(5.0, 5.0), 100, 140).unwrap();
        assert_eq!(*log.borrow(), ["double"]);
    }

    #[test]
    fn failing_single_subscriber_suppresses_the_double_dispatch() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let mut detector: TapDetector<&'static str> = TapDetector::new();

        detector.subscribe_single_tap("bad", |_| Err(Boom.into()));
        let d = Rc::clone(&log);
        detector.subscribe_double_tap("double", move |_| {
            d.borrow_mut().push("double");
            Ok(())
        });

        let surface = panel(1);
        detector.attach(&surface);

        let at = Point::new(5.0, 5.0);
        let err = click(&mut detector, surface.id(), at, 0, 40).unwrap_err();
        assert_eq!(err.key, "bad");

        // Second tap inside the window: the single dispatch fails again, so
        // the double set is never reached, but the classifier had already
        // counted the tap.
        let err = click(&mut detector, surface.id(), at, 150, 190).unwrap_err();
        assert_eq!(err.key, "bad");
        assert!(log.borrow().is_empty());
        // Committed transition: the counter completed a double and cleared.
        assert_eq!(detector.state().tap_count(), 0);
    }

    #[test]
    fn tap_event_carries_release_coordinates() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut detector: TapDetector<u32> = TapDetector::new();

        let sink = Rc::clone(&seen);
        detector.subscribe_single_tap(1, move |ev| {
            sink.borrow_mut().push(ev.position);
            Ok(())
        });

        let surface = panel(1);
        detector.attach(&surface);
        let id = surface.id();

        detector
            .handle_event(
                id,
                PointerEvent::MouseDown {
                    position: Point::new(10.0, 10.0),
                },
                0,
            )
            .unwrap();
        detector
            .handle_event(
                id,
                PointerEvent::MouseMove {
                    position: Point::new(12.0, 11.0),
                    primary_held: true,
                },
                20,
            )
            .unwrap();
        detector.handle_event(id, PointerEvent::MouseUp, 40).unwrap();

        assert_eq!(*seen.borrow(), [Point::new(12.0, 11.0)]);
    }
}
