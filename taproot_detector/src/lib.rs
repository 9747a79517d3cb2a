// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Taproot Detector: single/double tap notifications for an attached surface.
//!
//! ## Overview
//!
//! This crate is the outer layer over the [`taproot_gesture`] state machine.
//! It owns the subscriber registry, the surface attachment lifecycle, and the
//! event pump that turns raw pointer input into synchronous single-tap and
//! double-tap notifications. Classification itself — channel arbitration,
//! movement accumulation, tap counting — lives in
//! [`taproot_gesture::tap::TapState`]; this crate decides who hears about it.
//!
//! ## Workflow
//!
//! 1) Implement [`Surface`](crate::types::Surface) for whatever your
//!    windowing layer hands you — it only needs a stable
//!    [`SurfaceId`](crate::types::SurfaceId) and an attachability check.
//! 2) Subscribe handlers under caller-chosen keys. Registration is
//!    idempotent per key and order-preserving; keys also support removal.
//! 3) Attach, then forward the surface's raw pointer events into
//!    [`TapDetector::handle_event`](crate::detector::TapDetector::handle_event),
//!    each stamped with a monotonic millisecond timestamp.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use taproot_detector::detector::TapDetector;
//! use taproot_detector::types::{Surface, SurfaceId};
//! use taproot_gesture::tap::PointerEvent;
//!
//! struct Panel;
//!
//! impl Surface for Panel {
//!     fn id(&self) -> SurfaceId {
//!         SurfaceId(1)
//!     }
//! }
//!
//! let taps = Rc::new(RefCell::new(Vec::new()));
//! let mut detector: TapDetector<&str> = TapDetector::new();
//!
//! let sink = Rc::clone(&taps);
//! detector.subscribe_single_tap("log", move |ev| {
//!     sink.borrow_mut().push(ev.position);
//!     Ok(())
//! });
//!
//! let panel = Panel;
//! assert!(detector.attach(&panel));
//!
//! // One touch tap: press, release, 50ms apart.
//! let finger = [Point::new(30.0, 40.0)];
//! detector
//!     .handle_event(panel.id(), PointerEvent::TouchStart { touches: &finger }, 1000)
//!     .unwrap();
//! detector
//!     .handle_event(panel.id(), PointerEvent::TouchEnd { touches: &[] }, 1050)
//!     .unwrap();
//!
//! assert_eq!(*taps.borrow(), [Point::new(30.0, 40.0)]);
//! detector.detach(&panel).unwrap();
//! ```
//!
//! ## Dispatch policy
//!
//! Subscribers run synchronously, in registration order, single-tap set
//! first, double-tap set second. Failure handling is fail-fast: the first
//! subscriber returning an error aborts the remaining notifications of that
//! dispatch and surfaces as a
//! [`DispatchError`](crate::types::DispatchError). The gesture state machine
//! commits its transition before dispatch, so a subscriber failure never
//! rewinds the tap counter.
//!
//! ## Logging
//!
//! The crate emits through the [`log`] facade: a `warn!` when `attach` skips
//! an unattachable surface, `debug!` on attachment changes. Hosts choose the
//! logger; nothing is emitted without one installed.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod detector;
pub mod registry;
pub mod types;
