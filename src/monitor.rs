//! Monitor layout snapshots
//!
//! The monitor manager of the host compositor owns the real outputs. This
//! module only describes what the pointer constraint code needs to know about
//! them: the logical extent of every monitor in the global coordinate space and
//! which one is the primary monitor.
//!
//! A [`MonitorLayout`] is an immutable snapshot. Whenever the configuration
//! changes (hotplug, mode change, rearrangement) the host builds a new layout
//! and hands it over as a whole, there is no partial mutation.
//!
//! ```
//! use barricade::monitor::{MonitorInfo, MonitorLayout};
//! use barricade::utils::Rectangle;
//!
//! let layout = MonitorLayout::new(
//!     vec![
//!         MonitorInfo::new(0, Rectangle::new((0, 0).into(), (1920, 1080).into())),
//!         MonitorInfo::new(1, Rectangle::new((1920, 0).into(), (1280, 1024).into())),
//!     ],
//!     1,
//! );
//!
//! assert!(layout.contains((1919.5, 1079.0).into()));
//! assert!(!layout.contains((3000.0, 1030.0).into()));
//! assert_eq!(layout.primary().map(|m| m.index), Some(1));
//! ```

use tracing::warn;

use crate::utils::{Logical, Point, Rectangle};

/// Logical extent of a single physical display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Index of the monitor as reported by the monitor manager
    pub index: usize,
    /// Position and size of the monitor in the global logical space
    pub rect: Rectangle<i32, Logical>,
}

impl MonitorInfo {
    /// Create a new monitor description
    pub fn new(index: usize, rect: Rectangle<i32, Logical>) -> MonitorInfo {
        MonitorInfo { index, rect }
    }

    /// Whether the point lies on this monitor
    ///
    /// Right and bottom edges are exclusive.
    #[inline]
    pub fn contains(&self, point: Point<f64, Logical>) -> bool {
        self.rect.to_f64().contains(point)
    }
}

/// A snapshot of the monitor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorLayout {
    monitors: Vec<MonitorInfo>,
    primary: usize,
}

impl MonitorLayout {
    /// Create a layout from a list of monitors and the position of the primary one in that list
    pub fn new(monitors: Vec<MonitorInfo>, primary: usize) -> MonitorLayout {
        MonitorLayout { monitors, primary }
    }

    /// A layout without any monitor, as seen while all outputs are disconnected
    pub fn empty() -> MonitorLayout {
        MonitorLayout::default()
    }

    /// The monitors of this layout
    pub fn monitors(&self) -> &[MonitorInfo] {
        &self.monitors
    }

    /// Returns true if the layout contains no monitor
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Position of the primary monitor in [`monitors`](MonitorLayout::monitors)
    pub fn primary_index(&self) -> usize {
        self.primary
    }

    /// The primary monitor
    ///
    /// Falls back to the first monitor if the primary index does not point into
    /// the layout. Returns `None` only for an empty layout.
    pub fn primary(&self) -> Option<&MonitorInfo> {
        match self.monitors.get(self.primary) {
            Some(monitor) => Some(monitor),
            None => {
                if !self.monitors.is_empty() {
                    warn!(
                        primary = self.primary,
                        monitors = self.monitors.len(),
                        "Primary monitor index out of range, using the first monitor"
                    );
                }
                self.monitors.first()
            }
        }
    }

    /// Whether any monitor of the layout contains the point
    pub fn contains(&self, point: Point<f64, Logical>) -> bool {
        contains_point(&self.monitors, point)
    }

    /// The first monitor containing the point, in layout order
    pub fn monitor_at(&self, point: Point<f64, Logical>) -> Option<&MonitorInfo> {
        monitor_at(&self.monitors, point)
    }
}

/// Whether any of the given monitors contains the point
pub fn contains_point(monitors: &[MonitorInfo], point: Point<f64, Logical>) -> bool {
    monitors.iter().any(|monitor| monitor.contains(point))
}

/// The first of the given monitors containing the point
pub fn monitor_at(monitors: &[MonitorInfo], point: Point<f64, Logical>) -> Option<&MonitorInfo> {
    monitors.iter().find(|monitor| monitor.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_head() -> MonitorLayout {
        MonitorLayout::new(
            vec![
                MonitorInfo::new(0, Rectangle::new((0, 0).into(), (1920, 1080).into())),
                MonitorInfo::new(1, Rectangle::new((1920, 0).into(), (1280, 1024).into())),
            ],
            0,
        )
    }

    #[test]
    fn containment_across_monitors() {
        let layout = dual_head();

        assert!(layout.contains((0.0, 0.0).into()));
        assert!(layout.contains((1920.0, 1023.0).into()));
        assert!(!layout.contains((1920.0, 1024.0).into()));
        assert!(!layout.contains((3200.0, 10.0).into()));
        assert!(!layout.contains((-0.5, 10.0).into()));
    }

    #[test]
    fn monitor_at_returns_first_match() {
        let layout = dual_head();

        assert_eq!(layout.monitor_at((1919.9, 5.0).into()).map(|m| m.index), Some(0));
        assert_eq!(layout.monitor_at((1920.0, 5.0).into()).map(|m| m.index), Some(1));
        assert_eq!(layout.monitor_at((2000.0, 1050.0).into()), None);
    }

    #[test]
    fn primary_falls_back_to_first_monitor() {
        let mut layout = dual_head();
        assert_eq!(layout.primary().map(|m| m.index), Some(0));

        layout.primary = 7;
        assert_eq!(layout.primary().map(|m| m.index), Some(0));

        assert_eq!(MonitorLayout::empty().primary(), None);
    }
}
