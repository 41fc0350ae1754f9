//! Backend running as the display server
//!
//! Owns the pointer barriers and the current monitor layout. Every motion
//! sample goes through [`constrain`], and whenever the layout changes the
//! pointer is moved back onto a monitor if it was left in a gap.

use tracing::{debug, debug_span, info, instrument, trace};

use crate::{
    backend::{Backend, BackendKind},
    input::{barrier::BarrierManager, constrain::constrain, DeviceId, PointerDevice, PointerMotion},
    monitor::MonitorLayout,
    utils::{Logical, Point},
};

/// The native backend
#[derive(Debug)]
pub struct NativeBackend<P> {
    pointer: P,
    layout: MonitorLayout,
    barriers: BarrierManager,
    span: tracing::Span,
}

impl<P: PointerDevice> NativeBackend<P> {
    /// Create a native backend driving the given pointer
    ///
    /// The layout stays empty until [`post_init`](Backend::post_init).
    pub fn new(pointer: P) -> NativeBackend<P> {
        let span = debug_span!("backend_native", pointer = pointer.id().0);
        let _guard = span.enter();

        info!("Initializing the native backend");

        drop(_guard);
        NativeBackend {
            pointer,
            layout: MonitorLayout::empty(),
            barriers: BarrierManager::new(),
            span,
        }
    }

    /// The pointer device
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// The pointer barriers
    pub fn barriers(&self) -> &BarrierManager {
        &self.barriers
    }

    /// Mutable access to the pointer barriers
    pub fn barriers_mut(&mut self) -> &mut BarrierManager {
        &mut self.barriers
    }

    /// Install a new monitor layout and keep the pointer reachable
    ///
    /// If the pointer is left outside every monitor it is warped once to the
    /// center of the primary monitor. Returns the warp target, if any.
    #[instrument(level = "debug", parent = &self.span, skip_all, fields(monitors = layout.monitors().len()))]
    pub fn reconcile_after_layout_change(&mut self, layout: MonitorLayout) -> Option<Point<i32, Logical>> {
        self.layout = layout;
        self.reconcile()
    }

    fn reconcile(&mut self) -> Option<Point<i32, Logical>> {
        let Some(location) = self.pointer.location() else {
            debug!("Pointer location unknown, not reconciling");
            return None;
        };

        if self.layout.is_empty() {
            debug!("No monitors connected, not reconciling");
            return None;
        }

        if self.layout.contains(location) {
            trace!(?location, "Pointer still on a monitor");
            return None;
        }

        let primary = self.layout.primary()?;
        let target = primary.rect.center();
        info!(
            ?location,
            ?target,
            monitor = primary.index,
            "Pointer outside of all monitors, warping to the primary monitor"
        );
        self.warp_pointer(target);
        Some(target)
    }
}

impl<P: PointerDevice> Backend for NativeBackend<P> {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn post_init(&mut self, layout: MonitorLayout) {
        self.reconcile_after_layout_change(layout);
    }

    fn constrain_motion(
        &mut self,
        device: DeviceId,
        time: u32,
        proposed: Point<f64, Logical>,
    ) -> Point<f64, Logical> {
        let motion = PointerMotion {
            device,
            time,
            current: self.pointer.location().unwrap_or(proposed),
            proposed,
        };
        constrain(&mut self.barriers, self.layout.monitors(), &motion)
    }

    fn monitors_changed(&mut self, layout: MonitorLayout) {
        self.reconcile_after_layout_change(layout);
    }

    fn monitor_layout(&self) -> &MonitorLayout {
        &self.layout
    }

    fn warp_pointer(&mut self, location: Point<i32, Logical>) {
        // warps are not tied to an input event
        self.pointer.warp(0, location);
    }

    fn barrier_manager(&mut self) -> Option<&mut BarrierManager> {
        Some(&mut self.barriers)
    }
}
