//! Rigid-body-on-heightfield physics for the observer.
//!
//! The integrator advances the observer's velocity under gravity, ground
//! friction and air resistance, resolves collision against the terrain
//! height beneath the observer, and exposes jump/impulse/teleport
//! operations. It does not own the observer's position: the external
//! camera passes itself in through the [`Observer`] trait each tick and
//! receives the resolved position back.
//!
//! Two physical states exist per observer, grounded and airborne; the
//! grounded flag is re-derived from the terrain every tick, so teleports
//! need no special-case collision logic.

use glam::{Vec2, Vec3};
use meridian_common::HeightSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// External camera/entity whose position this integrator resolves.
pub trait Observer {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Writes the resolved world position back.
    fn set_position(&mut self, position: Vec3);
}

/// Observer test double holding a bare position.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockObserver {
    position: Vec3,
}

impl MockObserver {
    /// Creates an observer at the given position.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl Observer for MockObserver {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

/// Physical constants for observer movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration while airborne (negative = down).
    pub gravity: f32,
    /// Most negative vertical velocity allowed while falling.
    pub terminal_velocity: f32,
    /// Per-tick horizontal velocity retention while grounded.
    pub ground_friction: f32,
    /// Per-tick velocity retention while airborne.
    pub air_resistance: f32,
    /// Collision offset: the observer rests this far above the ground.
    pub player_height: f32,
    /// Margin for the grounded test.
    pub ground_epsilon: f32,
    /// Horizontal speed cap while grounded.
    pub max_ground_speed: f32,
    /// Horizontal speed cap while airborne.
    pub max_air_speed: f32,
    /// Upper bound on one integration step, to survive frame stalls.
    pub max_delta_time: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -98.1,
            terminal_velocity: -50.0,
            ground_friction: 0.8,
            air_resistance: 0.98,
            player_height: 2.0,
            ground_epsilon: 0.1,
            max_ground_speed: 20.0,
            max_air_speed: 10.0,
            max_delta_time: 0.25,
        }
    }
}

/// Advances the observer's physical state against a terrain height source.
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    config: PhysicsConfig,
    velocity: Vec3,
    grounded: bool,
    ground_height: f32,
}

impl PhysicsIntegrator {
    /// Creates an integrator with the given constants.
    #[must_use]
    pub const fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            grounded: false,
            ground_height: 0.0,
        }
    }

    /// The physical constants in use.
    #[must_use]
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the observer rested on the ground after the last update.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Ground height beneath the observer at the last update, including
    /// the player-height offset.
    #[must_use]
    pub const fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Advances one tick: gravity or friction, integration, ground clamp.
    ///
    /// `delta_time` is clamped to `max_delta_time` so a stalled frame
    /// cannot tunnel the observer through the terrain.
    pub fn update<O: Observer, H: HeightSource>(
        &mut self,
        observer: &mut O,
        terrain: &H,
        delta_time: f32,
    ) {
        let dt = delta_time.clamp(0.0, self.config.max_delta_time);
        let position = observer.position();

        let terrain_height = terrain.height_at(position.x, position.z);
        self.ground_height = terrain_height + self.config.player_height;

        let was_grounded = self.grounded;
        self.grounded = position.y <= self.ground_height + self.config.ground_epsilon;

        if self.grounded {
            // Resting: kill residual fall, bleed horizontal speed.
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            self.velocity.x *= self.config.ground_friction;
            self.velocity.z *= self.config.ground_friction;

            if !was_grounded {
                debug!("observer landed at height {:.2}", position.y);
            }
        } else {
            self.velocity.y += self.config.gravity * dt;
            if self.velocity.y < self.config.terminal_velocity {
                self.velocity.y = self.config.terminal_velocity;
            }
            self.velocity *= self.config.air_resistance;
        }

        // Semi-implicit Euler: position follows the updated velocity.
        let mut next = position + self.velocity * dt;

        if next.y < self.ground_height {
            next.y = self.ground_height;
            self.velocity.y = 0.0;
            self.grounded = true;
        }

        observer.set_position(next);
    }

    /// Starts a jump if the observer is grounded; mid-air calls no-op.
    pub fn jump(&mut self, force: f32) {
        if self.grounded {
            self.velocity.y = force;
            self.grounded = false;
        }
    }

    /// Integrates a horizontal force into velocity, then clamps the
    /// horizontal speed to the grounded or airborne cap.
    pub fn add_horizontal_force(&mut self, force: Vec3, delta_time: f32) {
        let max_speed = if self.grounded {
            self.config.max_ground_speed
        } else {
            self.config.max_air_speed
        };

        let mut next = self.velocity;
        next.x += force.x * delta_time;
        next.z += force.z * delta_time;

        let horizontal = Vec2::new(next.x, next.z);
        let speed = horizontal.length();
        if speed > max_speed {
            let scale = max_speed / speed;
            next.x *= scale;
            next.z *= scale;
        }

        self.velocity.x = next.x;
        self.velocity.z = next.z;
    }

    /// Adds a raw impulse to the velocity.
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    /// Moves the observer instantly, zeroing velocity.
    ///
    /// The grounded flag is cleared so the next update re-derives it from
    /// the terrain at the destination rather than the departure point.
    pub fn teleport_to<O: Observer>(&mut self, observer: &mut O, position: Vec3) {
        observer.set_position(position);
        self.reset_velocity();
        self.grounded = false;
    }

    /// Zeroes velocity without moving the observer.
    pub fn reset_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
    }
}
