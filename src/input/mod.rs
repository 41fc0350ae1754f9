//! Pointer input handling
//!
//! This module contains the pointer constraint engine. It sits between the
//! raw motion samples delivered by an input backend and the position the
//! compositor actually applies:
//!
//! - [`barrier`] holds the dynamic barriers registered by higher level code,
//!   for example edge resistance while dragging.
//! - [`constrain`] combines the barrier pass with the monitor layout and keeps
//!   the pointer from escaping into gaps of the layout.

pub mod barrier;
pub mod constrain;

use crate::utils::{Logical, Point};

/// Identifier of an input device, as assigned by the input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

impl From<u32> for DeviceId {
    #[inline]
    fn from(id: u32) -> Self {
        DeviceId(id)
    }
}

/// The pointer device of the input backend
///
/// This is what the native backend needs from the input stack: the current
/// location of the core pointer and a way to move it.
pub trait PointerDevice {
    /// Identifier of the device
    fn id(&self) -> DeviceId;

    /// Current location of the pointer
    ///
    /// Returns `None` if the device cannot report a position yet.
    fn location(&self) -> Option<Point<f64, Logical>>;

    /// Move the pointer to an absolute position
    ///
    /// Failures are handled by the input backend, this is fire and forget.
    fn warp(&mut self, time: u32, location: Point<i32, Logical>);
}

/// A single pointer motion sample, before it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMotion {
    /// Device the sample originates from
    pub device: DeviceId,
    /// Timestamp of the sample in milliseconds
    pub time: u32,
    /// Position of the pointer before the motion
    pub current: Point<f64, Logical>,
    /// Position the motion would move the pointer to
    pub proposed: Point<f64, Logical>,
}

impl PointerMotion {
    /// Relative motion of this sample
    #[inline]
    pub fn delta(&self) -> Point<f64, Logical> {
        self.proposed - self.current
    }
}
