//! Pointer barriers
//!
//! A barrier is a horizontal or vertical line segment the pointer cannot cross
//! in some directions. Barriers are registered dynamically by higher level code
//! (edge resistance while dragging, hot corners, ...) in a [`BarrierManager`],
//! which is consulted for every pointer motion sample before the monitor
//! layout is.
//!
//! Barriers follow pixel columns and rows: a vertical barrier at `x = b`
//! separates the pixels `x < b` from the pixels `x >= b`. A blocked motion
//! towards positive x stops on `b - 1`, a blocked motion towards negative x
//! stops on `b`. Horizontal barriers do the same on the y axis.
//!
//! When several barriers block the same motion they are applied in
//! registration order, each one seeing the position already clamped by the
//! previous ones. On each axis the last applied clamp wins.
//!
//! Owners of barriers are told about the pointer pushing against them through
//! [`BarrierEvent`]s, and may [`release`](BarrierManager::release) a barrier
//! to let the pointer through.
//!
//! ```
//! use barricade::input::{
//!     barrier::{Barrier, BarrierDirections, BarrierManager, BarrierOwner},
//!     DeviceId, PointerMotion,
//! };
//! use barricade::utils::Point;
//!
//! let mut barriers = BarrierManager::new();
//! let barrier = Barrier::new(
//!     (100, 0).into(),
//!     (100, 500).into(),
//!     BarrierDirections::NEGATIVE_X,
//!     BarrierOwner(1),
//! )?;
//! let id = barriers.add(barrier);
//!
//! let motion = PointerMotion {
//!     device: DeviceId(2),
//!     time: 16,
//!     current: (50.0, 100.0).into(),
//!     proposed: (150.0, 100.0).into(),
//! };
//! assert_eq!(barriers.process(&motion), Point::from((99.0, 100.0)));
//! assert_eq!(barriers.take_events()[0].barrier, id);
//! # Ok::<(), barricade::input::barrier::BarrierError>(())
//! ```

use std::collections::VecDeque;

use bitflags::bitflags;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    input::{DeviceId, PointerMotion},
    utils::{Logical, Point},
};

crate::utils::ids::id_gen!(barrier_ids);

/// Upper bound of events kept until the owners drain them
const MAX_PENDING_EVENTS: usize = 256;

bitflags! {
    /// Directions of pointer motion
    ///
    /// A barrier lets motion in the contained directions pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BarrierDirections: u32 {
        /// Motion towards increasing x
        const POSITIVE_X = 1 << 0;
        /// Motion towards increasing y
        const POSITIVE_Y = 1 << 1;
        /// Motion towards decreasing x
        const NEGATIVE_X = 1 << 2;
        /// Motion towards decreasing y
        const NEGATIVE_Y = 1 << 3;
    }
}

/// Unique identifier of a registered barrier
///
/// Identifiers are unique process-wide while the barrier is registered and
/// are recycled once it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BarrierId(u32);

impl BarrierId {
    /// Raw value of the identifier, never 0
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

/// Tag identifying who registered a barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarrierOwner(pub u64);

/// Errors of barrier creation and management
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BarrierError {
    /// Barriers must be horizontal or vertical
    #[error("Barrier from {p1:?} to {p2:?} is neither horizontal nor vertical")]
    NotAxisAligned {
        /// First end point
        p1: Point<i32, Logical>,
        /// Second end point
        p2: Point<i32, Logical>,
    },
    /// Both end points are the same
    #[error("Barrier at {0:?} has no extent")]
    Degenerate(Point<i32, Logical>),
    /// The barrier is not registered with this manager
    #[error("Unknown barrier {0:?}")]
    UnknownBarrier(BarrierId),
    /// The barrier is not being hit, or by a different hit sequence
    #[error("Barrier {barrier:?} has no hit sequence {event_id}")]
    NoSuchHit {
        /// The barrier asked to release
        barrier: BarrierId,
        /// The event id that was passed
        event_id: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Vertical { x: i32, y1: i32, y2: i32 },
    Horizontal { y: i32, x1: i32, x2: i32 },
}

/// A line segment blocking pointer motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barrier {
    line: Line,
    directions: BarrierDirections,
    owner: BarrierOwner,
}

/// A motion crossing a barrier line
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crossing {
    direction: BarrierDirections,
    clamped: Point<f64, Logical>,
}

impl Barrier {
    /// Create a new barrier between two end points
    ///
    /// `directions` are the directions of motion the barrier lets through; the
    /// ones along the barrier are meaningless and ignored.
    pub fn new(
        p1: Point<i32, Logical>,
        p2: Point<i32, Logical>,
        directions: BarrierDirections,
        owner: BarrierOwner,
    ) -> Result<Barrier, BarrierError> {
        let line = if p1 == p2 {
            return Err(BarrierError::Degenerate(p1));
        } else if p1.x == p2.x {
            Line::Vertical {
                x: p1.x,
                y1: p1.y.min(p2.y),
                y2: p1.y.max(p2.y),
            }
        } else if p1.y == p2.y {
            Line::Horizontal {
                y: p1.y,
                x1: p1.x.min(p2.x),
                x2: p1.x.max(p2.x),
            }
        } else {
            return Err(BarrierError::NotAxisAligned { p1, p2 });
        };

        Ok(Barrier {
            line,
            directions,
            owner,
        })
    }

    /// Whether the barrier is a vertical segment
    pub fn is_vertical(&self) -> bool {
        matches!(self.line, Line::Vertical { .. })
    }

    /// Directions of motion the barrier lets through
    pub fn directions(&self) -> BarrierDirections {
        self.directions
    }

    /// Owner of the barrier
    pub fn owner(&self) -> BarrierOwner {
        self.owner
    }

    /// End points of the barrier, top-left first
    pub fn end_points(&self) -> (Point<i32, Logical>, Point<i32, Logical>) {
        match self.line {
            Line::Vertical { x, y1, y2 } => ((x, y1).into(), (x, y2).into()),
            Line::Horizontal { y, x1, x2 } => ((x1, y).into(), (x2, y).into()),
        }
    }

    /// Checks whether the motion from `current` to `proposed` crosses the line
    /// inside its extent, regardless of the allowed directions.
    fn crossing(&self, current: Point<f64, Logical>, proposed: Point<f64, Logical>) -> Option<Crossing> {
        let (line, start, end, cur, prop, cross_cur, cross_prop, positive, negative) = match self.line {
            Line::Vertical { x, y1, y2 } => (
                x as f64,
                y1 as f64,
                y2 as f64,
                current.x,
                proposed.x,
                current.y,
                proposed.y,
                BarrierDirections::POSITIVE_X,
                BarrierDirections::NEGATIVE_X,
            ),
            Line::Horizontal { y, x1, x2 } => (
                y as f64,
                x1 as f64,
                x2 as f64,
                current.y,
                proposed.y,
                current.x,
                proposed.x,
                BarrierDirections::POSITIVE_Y,
                BarrierDirections::NEGATIVE_Y,
            ),
        };

        let (direction, stop) = if cur < line && prop >= line {
            // never push the pointer back behind where it already is
            (positive, (line - 1.0).max(cur))
        } else if cur >= line && prop < line {
            (negative, line)
        } else {
            return None;
        };

        // cur != prop on both branches
        let t = (line - cur) / (prop - cur);
        let at = cross_cur + t * (cross_prop - cross_cur);
        if at < start || at > end {
            return None;
        }

        let clamped = if self.is_vertical() {
            (stop, proposed.y).into()
        } else {
            (proposed.x, stop).into()
        };
        Some(Crossing { direction, clamped })
    }
}

/// Kind of a [`BarrierEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierEventKind {
    /// The pointer pushed against the barrier
    Hit,
    /// The pointer stopped pushing against the barrier
    Left,
}

/// Notification for the owner of a barrier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierEvent {
    /// What happened
    pub kind: BarrierEventKind,
    /// The barrier concerned
    pub barrier: BarrierId,
    /// Owner of the barrier
    pub owner: BarrierOwner,
    /// Identifier of the hit sequence, stable from the first hit until the pointer leaves
    pub event_id: u32,
    /// Device that generated the motion
    pub device: DeviceId,
    /// Timestamp of the motion
    pub time: u32,
    /// Milliseconds since the previous hit of the same sequence, 0 for the first one
    pub dt: u32,
    /// Pointer position after the barrier was applied
    pub position: Point<f64, Logical>,
    /// Unclamped relative motion
    pub delta: Point<f64, Logical>,
    /// Whether the barrier was released and let the pointer through
    pub released: bool,
}

#[derive(Debug, Clone, Copy)]
struct HitState {
    event_id: u32,
    last_time: u32,
    released: bool,
    // a released crossing went through, the release is used up
    consumed: bool,
}

#[derive(Debug)]
struct BarrierState {
    barrier: Barrier,
    hit: Option<HitState>,
}

/// The set of active barriers
///
/// Barriers are kept and applied in registration order.
#[derive(Debug)]
pub struct BarrierManager {
    barriers: IndexMap<BarrierId, BarrierState>,
    events: VecDeque<BarrierEvent>,
    next_event_id: u32,
}

impl Default for BarrierManager {
    fn default() -> Self {
        BarrierManager::new()
    }
}

impl BarrierManager {
    /// Create an empty barrier manager
    pub fn new() -> BarrierManager {
        BarrierManager {
            barriers: IndexMap::new(),
            events: VecDeque::new(),
            next_event_id: 1,
        }
    }

    /// Register a barrier
    pub fn add(&mut self, barrier: Barrier) -> BarrierId {
        let id = BarrierId(barrier_ids::next());
        debug!(?id, ?barrier, "Adding pointer barrier");
        self.barriers.insert(id, BarrierState { barrier, hit: None });
        id
    }

    /// Remove a barrier
    ///
    /// The order of the remaining barriers is preserved.
    pub fn remove(&mut self, id: BarrierId) -> Result<Barrier, BarrierError> {
        let state = self
            .barriers
            .shift_remove(&id)
            .ok_or(BarrierError::UnknownBarrier(id))?;
        barrier_ids::remove(id.0);
        debug!(?id, "Removed pointer barrier");
        Ok(state.barrier)
    }

    /// Remove all barriers of an owner
    pub fn remove_owned_by(&mut self, owner: BarrierOwner) {
        self.barriers.retain(|id, state| {
            let keep = state.barrier.owner != owner;
            if !keep {
                barrier_ids::remove(id.0);
            }
            keep
        });
    }

    /// Access a registered barrier
    pub fn get(&self, id: BarrierId) -> Option<&Barrier> {
        self.barriers.get(&id).map(|state| &state.barrier)
    }

    /// Iterate over the barriers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (BarrierId, &Barrier)> {
        self.barriers.iter().map(|(id, state)| (*id, &state.barrier))
    }

    /// Number of registered barriers
    pub fn len(&self) -> usize {
        self.barriers.len()
    }

    /// Returns true if no barrier is registered
    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }

    /// Let the pointer pass through a barrier it is currently hitting
    ///
    /// `event_id` has to match the hit sequence reported by the last
    /// [`BarrierEvent`] of this barrier.
    pub fn release(&mut self, id: BarrierId, event_id: u32) -> Result<(), BarrierError> {
        let state = self
            .barriers
            .get_mut(&id)
            .ok_or(BarrierError::UnknownBarrier(id))?;
        match state.hit.as_mut() {
            Some(hit) if hit.event_id == event_id => {
                debug!(?id, event_id, "Releasing pointer barrier");
                hit.released = true;
                Ok(())
            }
            _ => Err(BarrierError::NoSuchHit { barrier: id, event_id }),
        }
    }

    /// Drain the events recorded since the last call
    pub fn take_events(&mut self) -> Vec<BarrierEvent> {
        self.events.drain(..).collect()
    }

    /// Apply all barriers to a motion sample
    ///
    /// Returns the proposed position, clamped by every barrier the motion
    /// crosses in a direction it does not let through.
    #[profiling::function]
    pub fn process(&mut self, motion: &PointerMotion) -> Point<f64, Logical> {
        let BarrierManager {
            barriers,
            events,
            next_event_id,
        } = self;

        let mut position = motion.proposed;
        for (id, state) in barriers.iter_mut() {
            let crossing = state
                .barrier
                .crossing(motion.current, position)
                .filter(|crossing| !state.barrier.directions.contains(crossing.direction));

            let Some(crossing) = crossing else {
                if let Some(hit) = state.hit.take() {
                    push_left(events, *id, state.barrier.owner, hit, motion, position);
                }
                continue;
            };

            // the next crossing after a released one starts a new, blocking sequence
            if let Some(hit) = state.hit.filter(|hit| hit.consumed) {
                state.hit = None;
                push_left(events, *id, state.barrier.owner, hit, motion, position);
            }

            let hit = state.hit.get_or_insert_with(|| {
                let event_id = *next_event_id;
                *next_event_id = next_event_id.wrapping_add(1).max(1);
                HitState {
                    event_id,
                    last_time: motion.time,
                    released: false,
                    consumed: false,
                }
            });
            let dt = motion.time.wrapping_sub(hit.last_time);
            hit.last_time = motion.time;

            if hit.released {
                hit.consumed = true;
            } else {
                position = crossing.clamped;
            }
            trace!(
                ?id,
                event_id = hit.event_id,
                released = hit.released,
                ?position,
                "Pointer hit barrier"
            );

            push_event(
                events,
                BarrierEvent {
                    kind: BarrierEventKind::Hit,
                    barrier: *id,
                    owner: state.barrier.owner,
                    event_id: hit.event_id,
                    device: motion.device,
                    time: motion.time,
                    dt,
                    position,
                    delta: motion.delta(),
                    released: hit.released,
                },
            );
        }

        position
    }
}

impl Drop for BarrierManager {
    fn drop(&mut self) {
        for id in self.barriers.keys() {
            barrier_ids::remove(id.0);
        }
    }
}

fn push_left(
    events: &mut VecDeque<BarrierEvent>,
    barrier: BarrierId,
    owner: BarrierOwner,
    hit: HitState,
    motion: &PointerMotion,
    position: Point<f64, Logical>,
) {
    trace!(?barrier, event_id = hit.event_id, "Pointer left barrier");
    push_event(
        events,
        BarrierEvent {
            kind: BarrierEventKind::Left,
            barrier,
            owner,
            event_id: hit.event_id,
            device: motion.device,
            time: motion.time,
            dt: motion.time.wrapping_sub(hit.last_time),
            position,
            delta: motion.delta(),
            released: hit.released,
        },
    );
}

fn push_event(events: &mut VecDeque<BarrierEvent>, event: BarrierEvent) {
    if events.len() >= MAX_PENDING_EVENTS {
        events.pop_front();
    }
    events.push_back(event);
}
