//! Backend running as a client of another windowing system
//!
//! The host window system confines the pointer to the compositor window, so
//! motion is applied unchanged and there are no barriers.

use tracing::{debug, info};

use crate::{
    backend::{Backend, BackendKind},
    input::{barrier::BarrierManager, DeviceId, PointerDevice},
    monitor::MonitorLayout,
    utils::{Logical, Point},
};

/// The nested backend
#[derive(Debug)]
pub struct NestedBackend<P> {
    pointer: P,
    layout: MonitorLayout,
}

impl<P: PointerDevice> NestedBackend<P> {
    /// Create a nested backend driving the given pointer
    pub fn new(pointer: P) -> NestedBackend<P> {
        info!(pointer = pointer.id().0, "Initializing the nested backend");
        NestedBackend {
            pointer,
            layout: MonitorLayout::empty(),
        }
    }

    /// The pointer device
    pub fn pointer(&self) -> &P {
        &self.pointer
    }
}

impl<P: PointerDevice> Backend for NestedBackend<P> {
    fn kind(&self) -> BackendKind {
        BackendKind::Nested
    }

    fn post_init(&mut self, layout: MonitorLayout) {
        self.layout = layout;
    }

    fn constrain_motion(
        &mut self,
        _device: DeviceId,
        _time: u32,
        proposed: Point<f64, Logical>,
    ) -> Point<f64, Logical> {
        proposed
    }

    fn monitors_changed(&mut self, layout: MonitorLayout) {
        debug!(monitors = layout.monitors().len(), "Monitor layout changed");
        self.layout = layout;
    }

    fn monitor_layout(&self) -> &MonitorLayout {
        &self.layout
    }

    fn warp_pointer(&mut self, location: Point<i32, Logical>) {
        self.pointer.warp(0, location);
    }

    fn barrier_manager(&mut self) -> Option<&mut BarrierManager> {
        None
    }
}
