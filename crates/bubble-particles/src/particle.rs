//! Bubble particle state and its Bezier path

use crate::config::BubbleConfig;
use crate::curves::{accel_decel, cubic_bezier, lerp_f32, linear};
use crate::rand::RandomSource;
use bubble_core::{Point, Size};
use serde::Serialize;

/// Motion path of one bubble.
///
/// A bubble is `Spawned` until its first tick, when [`derive_path`] turns it
/// into `Moving`. The four points never change after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BubblePath {
    Spawned {
        start: Point,
    },
    Moving {
        start: Point,
        ctrl1: Point,
        ctrl2: Point,
        end: Point,
    },
}

impl BubblePath {
    pub fn start(&self) -> Point {
        match *self {
            BubblePath::Spawned { start } | BubblePath::Moving { start, .. } => start,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, BubblePath::Moving { .. })
    }

    /// Position along the path at `t` in [0, 1]. A spawned path sits at its start.
    pub fn point_at(&self, t: f32) -> Point {
        match *self {
            BubblePath::Spawned { start } => start,
            BubblePath::Moving {
                start,
                ctrl1,
                ctrl2,
                end,
            } => cubic_bezier(t, start, ctrl1, ctrl2, end),
        }
    }
}

/// Inputs that shape a new path
#[derive(Debug, Clone, Copy)]
pub struct PathParams {
    /// Nominal bubble image size
    pub bubble_size: Size,
    pub horizontal_offset: f32,
    pub vertical_offset: f32,
    /// Width of the owning surface; paths that would cross it are mirrored left
    pub surface_width: i32,
}

/// Build the curve a bubble follows from its spawn point.
///
/// `jitter` in [0, 1) places the endpoint between the two control columns.
pub fn derive_path(start: Point, params: &PathParams, jitter: f32) -> BubblePath {
    let dx = params.bubble_size.width as f32 * params.horizontal_offset;
    let dy = params.bubble_size.height as f32 * params.vertical_offset;

    let mut start = start;
    let x_max = (start.x as f32 + dx) as i32;
    if x_max > params.surface_width {
        start.x = (start.x as f32 - dx) as i32;
    }

    let ctrl1 = Point::new((start.x as f32 + dx) as i32, (start.y as f32 - dy) as i32);
    let ctrl2 = Point::new(
        (start.x as f32 - dx * 0.5) as i32,
        (ctrl1.y as f32 - dy) as i32,
    );
    let end = Point::new(
        (ctrl2.x as f32 + jitter * (ctrl1.x - ctrl2.x) as f32 * 0.5) as i32,
        (ctrl2.y as f32 - dy) as i32,
    );

    BubblePath::Moving {
        start,
        ctrl1,
        ctrl2,
        end,
    }
}

/// One live bubble
#[derive(Debug, Clone)]
pub struct Particle<I> {
    pub path: BubblePath,
    pub position: Point,
    /// Milliseconds since spawn
    pub age_ms: u32,
    pub scale: f32,
    /// 0-255
    pub alpha: u8,
    /// This bubble's own copy of the engine image at spawn time
    pub image: Option<I>,
}

impl<I> Particle<I> {
    pub fn new(x: i32, y: i32, image: Option<I>, config: &BubbleConfig) -> Self {
        let start = Point::new(x, y);
        Self {
            path: BubblePath::Spawned { start },
            position: start,
            age_ms: 0,
            scale: config.scale_init,
            alpha: config.alpha_init,
            image,
        }
    }

    /// Advance by one step: derive the path if needed, then age, scale, move and fade.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        config: &BubbleConfig,
        params: &PathParams,
        rng: &mut R,
    ) {
        if let BubblePath::Spawned { start } = self.path {
            self.path = derive_path(start, params, rng.next_f32());
        }

        self.age_ms += config.step_ms;

        let t = (self.age_ms as f32 / config.duration_ms as f32).min(1.0);
        let factor = accel_decel(t);
        self.scale = lerp_f32(config.scale_init, config.scale_target, factor);
        self.position = self.path.point_at(factor);

        // Fade only during the second half of the lifetime
        let half = config.half_duration_ms();
        if self.age_ms > half {
            let alpha_factor = linear((self.age_ms - half) as f32 / half as f32);
            let range = config.alpha_target as f32 - config.alpha_init as f32;
            let alpha = config.alpha_init as i32 + (range * alpha_factor) as i32;
            self.alpha = alpha.clamp(0, u8::MAX as i32) as u8;
        }
    }

    pub fn is_expired(&self, config: &BubbleConfig) -> bool {
        self.age_ms > config.duration_ms
    }

    /// Drawn only between its first tick and the end of its lifetime
    pub fn is_visible(&self, config: &BubbleConfig) -> bool {
        self.age_ms > 0 && self.age_ms <= config.duration_ms
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position,
            age_ms: self.age_ms,
            scale: self.scale,
            alpha: self.alpha,
            path: self.path,
        }
    }
}

/// Serializable view of a particle, without its image
#[derive(Debug, Clone, Serialize)]
pub struct ParticleSnapshot {
    pub position: Point,
    pub age_ms: u32,
    pub scale: f32,
    pub alpha: u8,
    pub path: BubblePath,
}
