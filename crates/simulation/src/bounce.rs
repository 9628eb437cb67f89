//! Cosmetic scale bounce played on a building when it is placed or upgraded.
//!
//! Runs across frames on its own system; placement never waits for it.

use std::collections::HashMap;
use std::f32::consts::PI;

use bevy::prelude::*;

use crate::config::{BOUNCE_DURATION, BOUNCE_HEIGHT, BOUNCE_WIDTH};
use crate::placed_structure::StructureId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub elapsed: f32,
    pub duration: f32,
    pub height: f32,
    pub width: f32,
}

impl Default for Bounce {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            duration: BOUNCE_DURATION,
            height: BOUNCE_HEIGHT,
            width: BOUNCE_WIDTH,
        }
    }
}

impl Bounce {
    /// Added to the visual's resting scale. Zero at both ends of the bounce.
    pub fn scale_offset(&self) -> Vec2 {
        if self.is_finished() {
            return Vec2::ZERO;
        }
        let wave = (self.elapsed / self.duration * PI).sin();
        Vec2::new(wave * self.width, wave * self.height)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Running bounces keyed by structure.
#[derive(Resource, Debug, Default)]
pub struct BounceAnimations {
    active: HashMap<StructureId, Bounce>,
}

impl BounceAnimations {
    /// Start a bounce, replacing one already running for the same structure.
    pub fn start(&mut self, id: StructureId) {
        self.active.insert(id, Bounce::default());
    }

    pub fn advance(&mut self, dt: f32) {
        for bounce in self.active.values_mut() {
            bounce.elapsed += dt;
        }
        self.active.retain(|_, bounce| !bounce.is_finished());
    }

    pub fn scale_offset(&self, id: StructureId) -> Vec2 {
        self.active
            .get(&id)
            .map(Bounce::scale_offset)
            .unwrap_or(Vec2::ZERO)
    }

    pub fn is_running(&self, id: StructureId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

pub fn advance_bounce_animations(time: Res<Time>, mut bounces: ResMut<BounceAnimations>) {
    if bounces.is_empty() {
        return;
    }
    bounces.advance(time.delta_secs());
}
