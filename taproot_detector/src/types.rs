// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the detector: surface identity, handler signatures, and errors.

use alloc::boxed::Box;
use core::fmt;

/// Stable identity of an attachable surface.
///
/// Hosts mint these however they like (window ids, widget keys, pointers cast
/// to integers); the detector only compares them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// An interactive surface the detector can attach to.
///
/// This is the boundary to the host's windowing layer. The detector never
/// talks to the surface beyond these two queries; the host forwards the
/// surface's raw pointer events into
/// [`TapDetector::handle_event`](crate::detector::TapDetector::handle_event)
/// itself.
pub trait Surface {
    /// Stable identity used for attachment bookkeeping.
    fn id(&self) -> SurfaceId;

    /// Whether this surface can deliver pointer events at all.
    ///
    /// Attaching to a surface that reports `false` is skipped and logged,
    /// never an error.
    fn is_attachable(&self) -> bool {
        true
    }
}

/// Error type subscribers may return to abort a dispatch.
pub type SubscriberError = Box<dyn core::error::Error>;

/// A tap failed to dispatch because a subscriber returned an error.
///
/// Dispatch is fail-fast: the failing subscriber's key is reported and any
/// subscribers registered after it were not invoked. The classifier has
/// already committed its transition by the time notification runs, so the
/// tap counter is not rolled back.
#[derive(Debug)]
pub struct DispatchError<K> {
    /// Key of the failing subscriber.
    pub key: K,
    /// The error it returned.
    pub source: SubscriberError,
}

impl<K: fmt::Debug> fmt::Display for DispatchError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber {:?} failed: {}", self.key, self.source)
    }
}

impl<K: fmt::Debug> core::error::Error for DispatchError<K> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Detach was requested for a surface the detector is not listening to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DetachError {
    /// The detector is not attached to anything.
    NotAttached(SurfaceId),
    /// The detector is attached, but to a different surface.
    WrongSurface {
        /// Surface the detector is actually attached to.
        attached: SurfaceId,
        /// Surface the caller asked to detach from.
        requested: SurfaceId,
    },
}

impl fmt::Display for DetachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAttached(id) => {
                write!(f, "detach {id:?}: detector is not attached")
            }
            Self::WrongSurface {
                attached,
                requested,
            } => {
                write!(
                    f,
                    "detach {requested:?}: detector is attached to {attached:?}"
                )
            }
        }
    }
}

impl core::error::Error for DetachError {}
