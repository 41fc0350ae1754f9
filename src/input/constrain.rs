//! Pointer constraint engine
//!
//! Every pointer motion sample goes through [`constrain`] before it is
//! applied. The proposed position is processed in three steps, each working on
//! the result of the previous one:
//!
//! 1. the [`BarrierManager`] clamps it against every barrier the motion crosses,
//! 2. if any monitor contains the result it is accepted as is,
//! 3. otherwise the pointer is trying to escape into a gap of the layout and is
//!    clamped to the monitor it is coming from.
//!
//! Containment uses exclusive right and bottom edges, while the escape clamp
//! targets the last pixel row and column (`right - 1`, `bottom - 1`).
//!
//! The algorithm follows `RRConstrainCursorHarder` of the X server.

use tracing::trace;

use crate::{
    input::{barrier::BarrierManager, PointerMotion},
    monitor::{contains_point, monitor_at, MonitorInfo},
    utils::{Logical, Point},
};

/// Compute the position a motion sample is allowed to move the pointer to
#[profiling::function]
pub fn constrain(
    barriers: &mut BarrierManager,
    monitors: &[MonitorInfo],
    motion: &PointerMotion,
) -> Point<f64, Logical> {
    let position = barriers.process(motion);
    constrain_to_monitors(monitors, motion.current, position)
}

/// Keep the pointer from leaving all monitors
///
/// Returns `proposed` if it lies on any monitor. Otherwise it is clamped to the
/// monitor containing `current`, or passed through if there is none.
pub fn constrain_to_monitors(
    monitors: &[MonitorInfo],
    current: Point<f64, Logical>,
    proposed: Point<f64, Logical>,
) -> Point<f64, Logical> {
    if contains_point(monitors, proposed) {
        return proposed;
    }

    match monitor_at(monitors, current) {
        Some(monitor) => {
            let clamped = monitor.rect.to_f64().clamp_point(proposed);
            trace!(monitor = monitor.index, ?proposed, ?clamped, "Pointer escape clamped");
            clamped
        }
        None => {
            trace!(?current, ?proposed, "Pointer outside of all monitors, not clamping");
            proposed
        }
    }
}
