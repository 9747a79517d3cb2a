// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Taproot Gesture: a deterministic tap-recognition state machine.
//!
//! ## Overview
//!
//! This crate classifies single and double taps from raw pointer input. It
//! does not listen to any event source. Instead, feed it
//! [`PointerEvent`](crate::tap::PointerEvent) values (for example from a
//! windowing layer or a DOM-like surface), and it tells you on each release
//! whether the gesture was a tap, and whether that tap completed a double.
//!
//! ## Inputs
//!
//! Provide touch events (with their full contact lists) and mouse events, each
//! stamped with a monotonic millisecond timestamp by the caller. The machine
//! arbitrates between the two channels: the first touch press locks the
//! session into touch mode and mouse input is ignored from then on, which
//! avoids the double-fire where one physical touch raises both a touch release
//! and a synthetic mouse release.
//!
//! ## Outputs
//!
//! [`TapState::handle`](crate::tap::TapState::handle) returns a
//! [`TapResult`](crate::tap::TapResult) for every recognized release:
//! [`Slide`](crate::tap::TapResult::Slide) when the pointer traveled too far
//! to count as a tap, or [`Tap`](crate::tap::TapResult::Tap) with the release
//! position and a `double` flag. A single tap is reported for every
//! qualifying release; the `double` flag is additionally set on the release
//! that completes a pair.
//!
//! ## Layering
//!
//! The machine only classifies. A higher-level detector (see
//! `taproot_detector`) owns subscriber registration, surface attachment, and
//! notification dispatch.
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

pub mod tap;
