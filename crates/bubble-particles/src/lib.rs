//! Bubble Particles - "like" bubble animation engine
//!
//! Bubbles spawn at a tap point and drift upward along a randomized cubic
//! Bezier path while growing and fading out:
//! - Lazily derived per-bubble paths (`Spawned` → `Moving`)
//! - Ease-in-ease-out scale and position, linear fade over the second half
//! - Self-arming tick loop with start/end notification
//! - Host capabilities injected as ports: `DrawSurface`, `Scheduler`, `RandomSource`

pub mod config;
pub mod curves;
pub mod engine;
pub mod particle;
pub mod rand;
pub mod surface;

pub use config::BubbleConfig;
pub use engine::BubbleEngine;
pub use particle::{BubblePath, Particle, ParticleSnapshot, PathParams};
pub use rand::{FixedRandom, ParticleRng, RandomSource};
pub use surface::{DrawCall, DrawSurface, RecordingSurface};
