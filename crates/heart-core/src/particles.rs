//! Pooled burst particles.
//!
//! Every effect owns a fixed pool created up front. Spawning claims the first
//! inactive slot and is silently dropped when the pool is full, so memory is
//! bounded no matter how long a gesture is held.

use crate::constants::{
    BURST_SPAWN_CHANCE, BURST_UPWARD_DRIFT, HAND_SCENE_RANGE_X, HAND_SCENE_RANGE_Y, HAND_SCENE_Z,
};
use crate::state::{InteractionState, Mode, SpecialGesture};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BurstKind {
    /// Hearts floating from the hand while the heart is assembled.
    HeartBurst,
    /// Gold sparkles while scattered.
    ChaosSparkle,
    /// Dense heart explosion on the I-love-you sign.
    LoveExplosion,
    /// Golden rain on a thumbs up.
    ThumbsUpRain,
}

impl BurstKind {
    pub const ALL: [BurstKind; 4] = [
        BurstKind::HeartBurst,
        BurstKind::ChaosSparkle,
        BurstKind::LoveExplosion,
        BurstKind::ThumbsUpRain,
    ];

    /// Whether the interaction state currently calls for this effect.
    pub fn is_driven_by(self, state: &InteractionState) -> bool {
        match self {
            BurstKind::HeartBurst => {
                state.mode == Mode::Formed
                    && state.special_gesture != Some(SpecialGesture::ILoveYou)
            }
            BurstKind::ChaosSparkle => state.mode == Mode::Chaos,
            BurstKind::LoveExplosion => state.special_gesture == Some(SpecialGesture::ILoveYou),
            BurstKind::ThumbsUpRain => state.special_gesture == Some(SpecialGesture::ThumbUp),
        }
    }
}

/// Per-effect tuning.
///
/// `speed` is the full width of the per-axis velocity range (scene units per
/// tick); `life_sec` is how long a particle takes to fade from 1 to 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstEffect {
    pub kind: BurstKind,
    pub capacity: usize,
    pub color: [f32; 4],
    pub speed: f32,
    pub life_sec: f32,
    pub spawn_chance: f32,
    pub upward_drift: f32,
}

impl BurstEffect {
    pub fn preset(kind: BurstKind) -> Self {
        let (capacity, color, speed, life_sec) = match kind {
            BurstKind::HeartBurst => (50, [1.0, 0.0, 0.333, 0.6], 5.0, 1.0),
            BurstKind::ChaosSparkle => (50, [1.0, 0.843, 0.0, 0.6], 8.0, 1.0),
            BurstKind::LoveExplosion => (200, [1.0, 0.2, 0.4, 0.6], 15.0, 2.0),
            BurstKind::ThumbsUpRain => (100, [1.0, 0.867, 0.0, 0.6], 10.0, 1.5),
        };
        Self {
            kind,
            capacity,
            color,
            speed,
            life_sec,
            spawn_chance: BURST_SPAWN_CHANCE,
            upward_drift: BURST_UPWARD_DRIFT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BurstParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life fraction, 1.0 at spawn.
    pub life: f32,
    pub active: bool,
}

pub struct ParticlePool {
    particles: Vec<BurstParticle>,
    life_sec: f32,
    upward_drift: f32,
}

impl ParticlePool {
    pub fn new(capacity: usize, life_sec: f32, upward_drift: f32) -> Self {
        Self {
            particles: vec![BurstParticle::default(); capacity],
            life_sec: life_sec.max(f32::EPSILON),
            upward_drift,
        }
    }

    /// Spawn at `origin` with each velocity component uniform in
    /// `[-velocity_range / 2, velocity_range / 2]`.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        origin: Vec3,
        velocity_range: f32,
        rng: &mut R,
    ) -> bool {
        let velocity = Vec3::new(
            (rng.gen::<f32>() - 0.5) * velocity_range,
            (rng.gen::<f32>() - 0.5) * velocity_range,
            (rng.gen::<f32>() - 0.5) * velocity_range,
        );
        self.spawn_with_velocity(origin, velocity)
    }

    /// Claim the first free slot. Returns false (and does nothing) when every
    /// slot is active.
    pub fn spawn_with_velocity(&mut self, origin: Vec3, velocity: Vec3) -> bool {
        let Some(p) = self.particles.iter_mut().find(|p| !p.active) else {
            return false;
        };
        *p = BurstParticle {
            position: origin,
            velocity,
            life: 1.0,
            active: true,
        };
        true
    }

    /// Advance active particles by one tick. A tick with no elapsed time
    /// (zero, negative or NaN) leaves the pool untouched.
    pub fn advance(&mut self, dt_sec: f32) {
        if dt_sec.is_nan() || dt_sec <= 0.0 {
            return;
        }
        let fade = dt_sec / self.life_sec;
        for p in self.particles.iter_mut().filter(|p| p.active) {
            p.life -= fade;
            p.position += p.velocity;
            p.velocity.y += self.upward_drift;
            if p.life <= 0.0 {
                p.active = false;
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }
}

/// Renderer record for one pool slot. Inactive slots have zero scale.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
}

/// Scene-space spawn point for a normalized hand position.
#[inline]
pub fn hand_to_scene(hand: Vec2) -> Vec3 {
    Vec3::new(
        (hand.x - 0.5) * HAND_SCENE_RANGE_X,
        (hand.y - 0.5) * HAND_SCENE_RANGE_Y,
        HAND_SCENE_Z,
    )
}

pub struct BurstEmitter {
    effect: BurstEffect,
    pool: ParticlePool,
}

impl BurstEmitter {
    pub fn new(effect: BurstEffect) -> Self {
        Self {
            pool: ParticlePool::new(effect.capacity, effect.life_sec, effect.upward_drift),
            effect,
        }
    }

    /// Maybe spawn from the hand, then advance the pool. Particles already
    /// in flight keep fading after the effect stops being driven. Nothing
    /// spawns on a tick with no elapsed time.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt_sec: f32,
        state: &InteractionState,
        rng: &mut R,
    ) {
        if dt_sec.is_nan() || dt_sec <= 0.0 {
            return;
        }
        if state.is_hand_detected
            && self.effect.kind.is_driven_by(state)
            && rng.gen::<f32>() < self.effect.spawn_chance
        {
            self.pool
                .spawn(hand_to_scene(state.hand_position), self.effect.speed, rng);
        }
        self.pool.advance(dt_sec);
    }

    pub fn effect(&self) -> &BurstEffect {
        &self.effect
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Append one record per slot; active particles shrink with their life
    /// and flicker by a random factor in [0.5, 1).
    pub fn write_instances<R: Rng + ?Sized>(
        &self,
        out: &mut Vec<ParticleInstance>,
        rng: &mut R,
    ) {
        for p in self.pool.particles() {
            if p.active {
                out.push(ParticleInstance {
                    pos: p.position.to_array(),
                    scale: p.life * (rng.gen::<f32>() * 0.5 + 0.5),
                    color: self.effect.color,
                });
            } else {
                out.push(ParticleInstance {
                    color: self.effect.color,
                    ..Default::default()
                });
            }
        }
    }
}

/// All configured burst effects; pools are independent.
pub struct BurstSystem {
    emitters: Vec<BurstEmitter>,
}

impl BurstSystem {
    pub fn new(effects: &[BurstEffect]) -> Self {
        Self {
            emitters: effects.iter().copied().map(BurstEmitter::new).collect(),
        }
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt_sec: f32,
        state: &InteractionState,
        rng: &mut R,
    ) {
        for emitter in &mut self.emitters {
            emitter.tick(dt_sec, state, rng);
        }
    }

    pub fn emitter(&self, kind: BurstKind) -> Option<&BurstEmitter> {
        self.emitters.iter().find(|e| e.effect.kind == kind)
    }

    pub fn emitters(&self) -> &[BurstEmitter] {
        &self.emitters
    }

    pub fn active_count(&self) -> usize {
        self.emitters.iter().map(|e| e.pool.active_count()).sum()
    }

    pub fn write_instances<R: Rng + ?Sized>(
        &self,
        out: &mut Vec<ParticleInstance>,
        rng: &mut R,
    ) {
        for emitter in &self.emitters {
            emitter.write_instances(out, rng);
        }
    }
}
