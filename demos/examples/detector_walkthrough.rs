// Copyright 2025 the Taproot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted tour of the tap detector.
//!
//! This example attaches a detector to a pretend surface and replays a
//! scripted event timeline covering:
//! - a clean single tap,
//! - a double tap (single fires twice, double once),
//! - a drag that is rejected as a slide,
//! - a touch tap followed by its synthetic mouse echo, which the channel
//!   lock silences.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p taproot_demos --example detector_walkthrough`

use kurbo::Point;
use std::cell::RefCell;
use std::rc::Rc;
use taproot_detector::detector::TapDetector;
use taproot_detector::types::{Surface, SurfaceId};
use taproot_gesture::tap::PointerEvent;

/// Stand-in for a host window or widget.
struct Canvas {
    id: SurfaceId,
}

impl Surface for Canvas {
    fn id(&self) -> SurfaceId {
        self.id
    }
}

fn main() {
    env_logger::init();

    let canvas = Canvas { id: SurfaceId(1) };
    let mut detector: TapDetector<&str> = TapDetector::new();

    let taps = Rc::new(RefCell::new(0_u32));
    let doubles = Rc::new(RefCell::new(0_u32));

    let tap_count = Rc::clone(&taps);
    detector.subscribe_single_tap("console", move |ev| {
        *tap_count.borrow_mut() += 1;
        println!("single tap at ({:.1}, {:.1})", ev.position.x, ev.position.y);
        Ok(())
    });
    let double_count = Rc::clone(&doubles);
    detector.subscribe_double_tap("console", move |ev| {
        *double_count.borrow_mut() += 1;
        println!("double tap at ({:.1}, {:.1})", ev.position.x, ev.position.y);
        Ok(())
    });

    assert!(detector.attach(&canvas));
    let id = canvas.id();

    // --- A clean mouse tap. ---------------------------------------------
    println!("\n-- single tap --");
    detector
        .handle_event(id, PointerEvent::MouseDown { position: Point::new(40.0, 40.0) }, 1_000)
        .unwrap();
    detector.handle_event(id, PointerEvent::MouseUp, 1_060).unwrap();

    // --- A double tap: two quick presses at the same spot. --------------
    println!("\n-- double tap --");
    for (down, up) in [(2_000, 2_050), (2_180, 2_230)] {
        detector
            .handle_event(id, PointerEvent::MouseDown { position: Point::new(80.0, 40.0) }, down)
            .unwrap();
        detector.handle_event(id, PointerEvent::MouseUp, up).unwrap();
    }

    // --- A drag: plenty of path length, so no notification. -------------
    println!("\n-- drag (no output expected) --");
    detector
        .handle_event(id, PointerEvent::MouseDown { position: Point::new(10.0, 10.0) }, 3_000)
        .unwrap();
    for step in 1_u32..=5 {
        let x = 10.0 + f64::from(step) * 8.0;
        detector
            .handle_event(
                id,
                PointerEvent::MouseMove { position: Point::new(x, 10.0), primary_held: true },
                3_000 + u64::from(step) * 16,
            )
            .unwrap();
    }
    detector.handle_event(id, PointerEvent::MouseUp, 3_120).unwrap();

    // --- A touch tap and its synthetic mouse echo. -----------------------
    // Browsers and some toolkits re-deliver a touch as mouse events; the
    // channel lock keeps the echo from double-firing.
    println!("\n-- touch tap with mouse echo --");
    let finger = [Point::new(120.0, 90.0)];
    detector
        .handle_event(id, PointerEvent::TouchStart { touches: &finger }, 4_000)
        .unwrap();
    detector
        .handle_event(id, PointerEvent::TouchEnd { touches: &[] }, 4_050)
        .unwrap();
    detector
        .handle_event(id, PointerEvent::MouseDown { position: Point::new(120.0, 90.0) }, 4_051)
        .unwrap();
    detector.handle_event(id, PointerEvent::MouseUp, 4_052).unwrap();

    detector.detach(&canvas).unwrap();

    println!("\ntotal: {} single, {} double", taps.borrow(), doubles.borrow());
    assert_eq!(*taps.borrow(), 4); // 1 + 2 + 0 + 1
    assert_eq!(*doubles.borrow(), 1);
}
