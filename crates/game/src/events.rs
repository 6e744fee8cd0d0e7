//! Game events and the per-tick event queue.
//!
//! Everything an entity wants to tell another entity, or the outside world,
//! goes through the [`EventQueue`]. The simulation drains it once per tick,
//! delivering stomp notifications to their targets on the way out.

use std::collections::VecDeque;

use glam::Vec2;
use plunge_physics::MotionMode;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationState;

/// Unique identifier for entities.
pub type EntityId = u32;

/// Why an entity died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Touched a hazard without stomping it.
    Hazard { source: EntityId },
    /// Stomped by another actor.
    Stomped { by: EntityId },
    /// Flew into a wall.
    Wall,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeChanged {
        entity: EntityId,
        from: MotionMode,
        to: MotionMode,
        animation: AnimationState,
    },
    Landed {
        entity: EntityId,
        position: Vec2,
    },
    Jumped {
        entity: EntityId,
        position: Vec2,
    },
    /// `target` must be notified exactly once.
    Stomped {
        stomper: EntityId,
        target: EntityId,
    },
    Bounced {
        entity: EntityId,
        velocity: f32,
    },
    Died {
        entity: EntityId,
        cause: DeathCause,
    },
    Collected {
        entity: EntityId,
        by: EntityId,
        points: u32,
    },
    BlockBroken {
        entity: EntityId,
    },
    DaggerLaunched {
        dagger: EntityId,
        spawner: Option<EntityId>,
        direction: Vec2,
    },
    Despawned {
        entity: EntityId,
    },
    /// Reached a goal while grounded. Fires once per simulation.
    Finished {
        by: EntityId,
        /// Simulated seconds since the start.
        elapsed: f32,
        score: u32,
    },
}

/// FIFO queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Take the oldest event.
    #[inline]
    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Take every pending event in order.
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::BlockBroken { entity: 1 });
        queue.push(GameEvent::Despawned { entity: 2 });

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(GameEvent::BlockBroken { entity: 1 }));
        assert_eq!(queue.pop(), Some(GameEvent::Despawned { entity: 2 }));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::BlockBroken { entity: 1 });
        queue.push(GameEvent::BlockBroken { entity: 2 });

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
    }
}
