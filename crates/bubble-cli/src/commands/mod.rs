pub mod config;
pub mod render;
pub mod simulate;

use anyhow::{Context, Result};
use bubble_core::Point;
use bubble_particles::{BubbleConfig, BubbleEngine, DrawSurface, ParticleRng};
use bubble_runtime::{EventBus, ManualScheduler};
use clap::Args;
use tracing::info;

pub type HostEngine<D> = BubbleEngine<D, ManualScheduler, ParticleRng>;

/// Options shared by every command that runs a session
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Tap point (comma-separated x,y); repeat for more bubbles
    #[arg(long = "tap", value_parser = parse_pair)]
    pub taps: Vec<(i32, i32)>,

    /// Ticks between consecutive taps
    #[arg(long, default_value = "1")]
    pub stagger: u32,

    /// Seed for endpoint jitter
    #[arg(long, default_value = "3735928559")]
    pub seed: u32,

    /// Surface width in pixels
    #[arg(long, default_value = "360")]
    pub width: i32,

    /// Surface height in pixels
    #[arg(long, default_value = "640")]
    pub height: i32,

    /// Nominal bubble size (comma-separated width,height)
    #[arg(long, default_value = "60,50", value_parser = parse_pair)]
    pub bubble_size: (i32, i32),
}

impl SessionArgs {
    /// Tap points, defaulting to a single tap near the bottom-right corner
    pub fn tap_points(&self) -> Vec<Point> {
        if self.taps.is_empty() {
            return vec![Point::new(self.width * 3 / 4, self.height - self.bubble_size.1)];
        }
        self.taps.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    pub fn load_config(&self) -> Result<BubbleConfig> {
        match &self.config {
            Some(path) => BubbleConfig::load(path)
                .with_context(|| format!("Failed to load config '{}'", path)),
            None => Ok(BubbleConfig::default()),
        }
    }

    /// Build an engine around `surface` with `image` as the bubble sprite
    pub fn build_engine<D: DrawSurface>(
        &self,
        surface: D,
        image: D::Image,
    ) -> Result<(HostEngine<D>, EventBus)> {
        let config = self.load_config()?;
        let mut engine = BubbleEngine::with_config(
            config,
            surface,
            ManualScheduler::new(),
            ParticleRng::new(self.seed),
        );
        engine.set_bubble_image(Some(image), self.bubble_size.0, self.bubble_size.1);
        engine.on_surface_resized(self.width, self.height);

        let events = EventBus::new();
        engine.set_animation_listener(Box::new(events.clone()));
        Ok((engine, events))
    }
}

/// Drive `engine` on its virtual clock until every tap has spawned and every bubble expired.
///
/// `on_tick` runs after each tick with the tick number (1-based). Returns the tick count.
pub fn run_session<D: DrawSurface>(
    engine: &mut HostEngine<D>,
    taps: &[Point],
    stagger: u32,
    mut on_tick: impl FnMut(&mut HostEngine<D>, u32) -> Result<()>,
) -> Result<u32> {
    let stagger = stagger.max(1);
    let mut next_tap = 0usize;
    let mut tick = 0u32;

    loop {
        while next_tap < taps.len() && next_tap as u32 * stagger <= tick {
            let p = taps[next_tap];
            engine.spawn(p.x, p.y);
            next_tap += 1;
        }

        let Some(handle) = engine.scheduler_mut().advance_to_next() else {
            if next_tap < taps.len() {
                // Idle gap before the next tap
                tick = next_tap as u32 * stagger;
                continue;
            }
            break;
        };

        engine.on_timer(handle);
        tick += 1;
        on_tick(engine, tick)?;
    }

    info!(ticks = tick, taps = taps.len(), "session finished");
    Ok(tick)
}

pub fn parse_pair(s: &str) -> Result<(i32, i32), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let a: i32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let b: i32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_particles::RecordingSurface;
    use bubble_runtime::AnimationEvent;

    fn session(taps: Vec<(i32, i32)>, stagger: u32) -> SessionArgs {
        SessionArgs {
            config: None,
            taps,
            stagger,
            seed: 1,
            width: 360,
            height: 640,
            bubble_size: (60, 50),
        }
    }

    #[test]
    fn parse_pair_accepts_spaces() {
        assert_eq!(parse_pair("10, -20"), Ok((10, -20)));
        assert!(parse_pair("10").is_err());
        assert!(parse_pair("a,b").is_err());
    }

    #[test]
    fn default_tap_near_bottom_right() {
        let args = session(Vec::new(), 1);
        assert_eq!(args.tap_points(), vec![Point::new(270, 590)]);
    }

    #[test]
    fn single_tap_session_runs_one_lifetime() {
        let args = session(vec![(100, 500)], 1);
        let (mut engine, events) = args
            .build_engine(RecordingSurface::<String>::new(), "like".to_string())
            .unwrap();
        let ticks = run_session(&mut engine, &args.tap_points(), 1, |_, _| Ok(())).unwrap();
        assert_eq!(ticks, 67);
        assert_eq!(
            events.drain(),
            vec![AnimationEvent::Started, AnimationEvent::Ended]
        );
    }

    #[test]
    fn idle_gap_restarts_loop() {
        // Second tap lands long after the first bubble expired
        let args = session(vec![(100, 500), (120, 500)], 100);
        let (mut engine, events) = args
            .build_engine(RecordingSurface::<String>::new(), "like".to_string())
            .unwrap();
        let ticks = run_session(&mut engine, &args.tap_points(), 100, |_, _| Ok(())).unwrap();
        assert_eq!(ticks, 167);
        assert_eq!(events.count(AnimationEvent::Started), 2);
        assert_eq!(events.count(AnimationEvent::Ended), 2);
    }
}
