use glam::Vec2;
use tessera_math::{approach, VectorExt};
use tessera_scene::{ColliderRef, Component, ComponentContext, ComponentId};

use crate::Hitbox;

/// A blocked movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub horizontal: bool,
    /// The solid that blocked the step
    pub collider: ColliderRef,
}

pub type CollisionCallback = Box<dyn FnMut(&mut Physics, &mut ComponentContext, Collision)>;

/// Kinematic mover of an entity
///
/// Moves the entity one unit at a time, probing the hitbox `hitbox` of the
/// same entity against the colliders tagged with one of `solids` before every
/// step. Fractions of a unit are carried over to the next move so slow speeds
/// still add up to whole steps.
///
/// Axes are resolved one after the other: x first, y second.
pub struct Physics {
    hitbox: ComponentId,
    pub speed: Vec2,
    remainder: Vec2,
    pub solids: Vec<String>,
    pub active: bool,
    on_collide_x: Option<CollisionCallback>,
    on_collide_y: Option<CollisionCallback>,
    on_collide: Vec<CollisionCallback>,
}

impl std::fmt::Debug for Physics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Physics")
            .field("hitbox", &self.hitbox)
            .field("speed", &self.speed)
            .field("remainder", &self.remainder)
            .field("solids", &self.solids)
            .field("active", &self.active)
            .finish()
    }
}

impl Physics {
    /// `hitbox` must be a [Hitbox] of the entity the mover is attached to
    pub fn new(hitbox: ComponentId) -> Self {
        Self {
            hitbox,
            speed: Vec2::ZERO,
            remainder: Vec2::ZERO,
            solids: Vec::new(),
            active: true,
            on_collide_x: None,
            on_collide_y: None,
            on_collide: Vec::new(),
        }
    }

    pub fn with_solids(mut self, solids: &[&str]) -> Self {
        self.solids = solids.iter().map(|solid| solid.to_string()).collect();
        self
    }

    pub fn hitbox(&self) -> ComponentId {
        self.hitbox
    }

    pub fn remainder(&self) -> Vec2 {
        self.remainder
    }

    /// Called when a horizontal step is blocked
    pub fn on_collide_x(
        &mut self,
        callback: impl FnMut(&mut Physics, &mut ComponentContext, Collision) + 'static,
    ) {
        self.on_collide_x = Some(Box::new(callback));
    }

    /// Called when a vertical step is blocked
    pub fn on_collide_y(
        &mut self,
        callback: impl FnMut(&mut Physics, &mut ComponentContext, Collision) + 'static,
    ) {
        self.on_collide_y = Some(Box::new(callback));
    }

    /// Called when any step is blocked, after the axis callback
    pub fn on_collide(
        &mut self,
        callback: impl FnMut(&mut Physics, &mut ComponentContext, Collision) + 'static,
    ) {
        self.on_collide.push(Box::new(callback));
    }

    /// Adds `amount` to the horizontal remainder and moves by its whole part
    ///
    /// Returns `false` when a solid blocked the move.
    pub fn move_x(&mut self, ctx: &mut ComponentContext, amount: f32) -> bool {
        self.remainder.x += amount;
        let fraction = self.remainder.x % 1.0;
        let move_by = self.remainder.x - fraction;
        self.remainder.x = fraction;

        self.move_x_absolute(ctx, move_by)
    }

    pub fn move_y(&mut self, ctx: &mut ComponentContext, amount: f32) -> bool {
        self.remainder.y += amount;
        let fraction = self.remainder.y % 1.0;
        let move_by = self.remainder.y - fraction;
        self.remainder.y = fraction;

        self.move_y_absolute(ctx, move_by)
    }

    /// Moves by `amount` rounded to whole units, ignoring the remainder
    pub fn move_x_absolute(&mut self, ctx: &mut ComponentContext, amount: f32) -> bool {
        self.sweep(ctx, amount, true)
    }

    pub fn move_y_absolute(&mut self, ctx: &mut ComponentContext, amount: f32) -> bool {
        self.sweep(ctx, amount, false)
    }

    fn sweep(&mut self, ctx: &mut ComponentContext, amount: f32, horizontal: bool) -> bool {
        let amount = amount.round();

        if self.solids.is_empty() {
            let position = &mut ctx.entity_mut().position;
            if horizontal {
                position.x += amount;
            } else {
                position.y += amount;
            }
            return true;
        }

        if ctx.sibling::<Hitbox>(self.hitbox).is_none() {
            panic!(
                "physics of entity {:?} has no hitbox {:?}",
                ctx.entity_id(),
                self.hitbox
            );
        }

        let sign = amount.signum();
        let (dx, dy) = if horizontal { (sign, 0.0) } else { (0.0, sign) };
        for _ in 0..amount.abs() as u32 {
            let hit = ctx
                .collider_query(self.hitbox)
                .collides(&self.solids, dx, dy);

            if let Some(collider) = hit {
                if horizontal {
                    self.remainder.x = 0.0;
                } else {
                    self.remainder.y = 0.0;
                }
                self.collided(
                    ctx,
                    Collision {
                        horizontal,
                        collider,
                    },
                );
                return false;
            }

            let position = &mut ctx.entity_mut().position;
            position.x += dx;
            position.y += dy;
        }

        true
    }

    fn collided(&mut self, ctx: &mut ComponentContext, collision: Collision) {
        log::trace!("{:?} blocked by {:?}", ctx.entity_id(), collision.collider);

        let axis = if collision.horizontal {
            self.on_collide_x.take()
        } else {
            self.on_collide_y.take()
        };
        if let Some(mut callback) = axis {
            callback(self, ctx, collision);
            let slot = if collision.horizontal {
                &mut self.on_collide_x
            } else {
                &mut self.on_collide_y
            };
            if slot.is_none() {
                *slot = Some(callback);
            }
        }

        let mut callbacks = std::mem::take(&mut self.on_collide);
        for callback in callbacks.iter_mut() {
            callback(self, ctx, collision);
        }
        callbacks.append(&mut self.on_collide);
        self.on_collide = callbacks;
    }

    /// Moves both speed axes toward zero by the given amounts
    pub fn friction(&mut self, x: f32, y: f32) {
        self.speed.x = approach(self.speed.x, 0.0, x);
        self.speed.y = approach(self.speed.y, 0.0, y);
    }

    /// Clamps each speed axis on its own
    pub fn maxspeed(&mut self, x: f32, y: f32) {
        self.speed.x = self.speed.x.clamp(-x, x);
        self.speed.y = self.speed.y.clamp(-y, y);
    }

    /// Clamps the length of the speed, keeping its direction
    pub fn circular_maxspeed(&mut self, length: f32) {
        self.speed = self.speed.clamped_length(length);
    }

    pub fn stop(&mut self) {
        self.speed = Vec2::ZERO;
        self.remainder = Vec2::ZERO;
    }
}

impl Component for Physics {
    fn active(&self) -> bool {
        self.active
    }

    fn update(&mut self, ctx: &mut ComponentContext) {
        let delta = ctx.delta();
        if self.speed.x != 0.0 {
            self.move_x(ctx, self.speed.x * delta);
        }
        if self.speed.y != 0.0 {
            self.move_y(ctx, self.speed.y * delta);
        }
    }
}
