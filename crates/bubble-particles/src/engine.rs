//! The bubble engine: particle collection, tick loop and start/end notification

use crate::config::BubbleConfig;
use crate::particle::{Particle, PathParams};
use crate::rand::RandomSource;
use crate::surface::DrawSurface;
use bubble_core::Size;
use bubble_runtime::{AnimationListener, Scheduler, TimerHandle};
use tracing::{debug, trace};

/// Owns the live bubbles of one view and drives their animation.
///
/// The engine never blocks. Each tick is a single-shot timer armed through
/// the [`Scheduler`]; the host routes due timers back via [`on_timer`](Self::on_timer).
/// At most one tick is pending at any time, and the loop disarms itself once
/// the last bubble expires.
pub struct BubbleEngine<D: DrawSurface, S: Scheduler, R: RandomSource> {
    config: BubbleConfig,
    particles: Vec<Particle<D::Image>>,
    running: bool,
    image: Option<D::Image>,
    bubble_size: Size,
    surface_size: Size,
    pending_tick: Option<TimerHandle>,
    listener: Option<Box<dyn AnimationListener>>,
    surface: D,
    scheduler: S,
    rng: R,
}

impl<D: DrawSurface, S: Scheduler, R: RandomSource> BubbleEngine<D, S, R> {
    pub fn new(surface: D, scheduler: S, rng: R) -> Self {
        Self::with_config(BubbleConfig::default(), surface, scheduler, rng)
    }

    pub fn with_config(config: BubbleConfig, surface: D, scheduler: S, rng: R) -> Self {
        Self {
            config,
            particles: Vec::new(),
            running: false,
            image: None,
            bubble_size: Size::ZERO,
            surface_size: Size::ZERO,
            pending_tick: None,
            listener: None,
            surface,
            scheduler,
            rng,
        }
    }

    pub fn set_animation_listener(&mut self, listener: Box<dyn AnimationListener>) {
        self.listener = Some(listener);
    }

    pub fn clear_animation_listener(&mut self) {
        self.listener = None;
    }

    /// Replace the image used by bubbles spawned from now on. `None` is ignored.
    pub fn set_bubble_image(&mut self, image: Option<D::Image>, width: i32, height: i32) {
        let Some(image) = image else {
            return;
        };
        self.image = Some(image);
        self.bubble_size = Size::new(width, height);
    }

    pub fn on_surface_resized(&mut self, width: i32, height: i32) {
        self.surface_size = Size::new(width, height);
    }

    /// Change drift factors for paths derived from now on
    pub fn set_offsets(&mut self, horizontal: f32, vertical: f32) {
        self.config.horizontal_offset = horizontal;
        self.config.vertical_offset = vertical;
    }

    /// Add a bubble at `(x, y)` and make sure the loop is running
    pub fn spawn(&mut self, x: i32, y: i32) {
        let particle = Particle::new(x, y, self.image.clone(), &self.config);
        self.particles.push(particle);
        trace!(x, y, live = self.particles.len(), "spawned bubble");
        self.ensure_running();
    }

    /// Arm an immediate tick unless one is already pending.
    ///
    /// Fires the start notification only on that idle-to-running transition.
    pub fn ensure_running(&mut self) {
        if self.pending_tick.is_some() {
            return;
        }
        self.running = true;
        self.pending_tick = Some(self.scheduler.schedule(0));
        debug!(live = self.particles.len(), "bubble animation started");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_animation_start();
        }
    }

    /// Freeze in place: disarm the loop but keep every bubble. No notification.
    pub fn pause(&mut self) {
        self.running = false;
        self.cancel_pending();
        debug!(live = self.particles.len(), "bubble animation paused");
    }

    /// Drop every bubble, disarm the loop and always notify the end.
    pub fn stop(&mut self) {
        self.running = false;
        self.particles.clear();
        self.cancel_pending();
        debug!("bubble animation stopped");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_animation_end();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Route a due timer to the engine. Handles other than the pending tick are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.pending_tick != Some(handle) {
            trace!(timer = handle.raw(), "ignoring stale timer");
            return;
        }
        self.pending_tick = None;
        if self.running {
            self.tick();
        }
    }

    /// Paint every visible bubble onto the surface
    pub fn draw(&mut self) {
        for p in &self.particles {
            if !p.is_visible(&self.config) {
                continue;
            }
            let Some(image) = p.image.as_ref() else {
                continue;
            };
            let size = self.bubble_size.scaled(p.scale);
            self.surface
                .draw(image, p.position.x, p.position.y, size.width, size.height, p.alpha);
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle<D::Image>] {
        &self.particles
    }

    pub fn config(&self) -> &BubbleConfig {
        &self.config
    }

    pub fn bubble_size(&self) -> Size {
        self.bubble_size
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn path_params(&self) -> PathParams {
        PathParams {
            bubble_size: self.bubble_size,
            horizontal_offset: self.config.horizontal_offset,
            vertical_offset: self.config.vertical_offset,
            surface_width: self.surface_size.width,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Advance every bubble one step, then evict the expired ones
    fn tick(&mut self) {
        let params = self.path_params();
        for p in &mut self.particles {
            p.advance(&self.config, &params, &mut self.rng);
        }

        let config = &self.config;
        self.particles.retain(|p| !p.is_expired(config));
        trace!(live = self.particles.len(), "tick");

        if !self.particles.is_empty() {
            self.surface.request_redraw();
            self.pending_tick = Some(self.scheduler.schedule(self.config.step_ms));
        } else {
            self.running = false;
            debug!("bubble animation ended");
            if let Some(listener) = self.listener.as_mut() {
                listener.on_animation_end();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::BubblePath;
    use crate::rand::FixedRandom;
    use crate::surface::RecordingSurface;
    use bubble_core::Point;
    use bubble_runtime::{AnimationEvent, EventBus, ManualScheduler};

    type TestEngine = BubbleEngine<RecordingSurface, ManualScheduler, FixedRandom>;

    fn engine() -> (TestEngine, EventBus) {
        let mut engine = BubbleEngine::new(
            RecordingSurface::new(),
            ManualScheduler::new(),
            FixedRandom::new(0.5),
        );
        engine.set_bubble_image(Some("like".to_string()), 30, 25);
        engine.on_surface_resized(400, 800);
        let bus = EventBus::new();
        engine.set_animation_listener(Box::new(bus.clone()));
        (engine, bus)
    }

    /// Fire the next due timer, returning false once nothing is armed
    fn step(engine: &mut TestEngine) -> bool {
        match engine.scheduler_mut().advance_to_next() {
            Some(handle) => {
                engine.on_timer(handle);
                true
            }
            None => false,
        }
    }

    fn run_until_idle(engine: &mut TestEngine) -> u32 {
        let mut ticks = 0;
        while step(engine) {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn spawn_on_idle_engine_starts_once() {
        let (mut engine, bus) = engine();
        assert!(!engine.is_running());

        engine.spawn(100, 600);
        assert!(engine.is_running());
        assert_eq!(bus.count(AnimationEvent::Started), 1);

        engine.spawn(120, 600);
        assert_eq!(bus.count(AnimationEvent::Started), 1);
        assert_eq!(engine.particle_count(), 2);
    }

    #[test]
    fn last_expiry_ends_once() {
        let (mut engine, bus) = engine();
        engine.spawn(100, 600);

        let ticks = run_until_idle(&mut engine);
        assert_eq!(ticks, engine.config().eviction_tick());
        assert_eq!(engine.particle_count(), 0);
        assert!(!engine.is_running());
        assert_eq!(
            bus.drain(),
            vec![AnimationEvent::Started, AnimationEvent::Ended]
        );
        assert_eq!(engine.scheduler().pending_count(), 0);
    }

    #[test]
    fn age_steps_until_eviction() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        let step_ms = engine.config().step_ms;

        let mut expected = 0;
        while step(&mut engine) {
            expected += step_ms;
            match engine.particles().first() {
                Some(p) => {
                    assert_eq!(p.age_ms, expected);
                    assert!(p.age_ms <= engine.config().duration_ms);
                }
                None => assert!(expected > engine.config().duration_ms),
            }
        }
    }

    #[test]
    fn staggered_bubbles_keep_loop_alive() {
        let (mut engine, bus) = engine();
        engine.spawn(100, 600);
        for _ in 0..10 {
            step(&mut engine);
        }
        engine.spawn(200, 600);
        assert_eq!(engine.scheduler().pending_count(), 1);

        let ticks = run_until_idle(&mut engine);
        assert_eq!(ticks, engine.config().eviction_tick());
        assert_eq!(bus.count(AnimationEvent::Started), 1);
        assert_eq!(bus.count(AnimationEvent::Ended), 1);
    }

    #[test]
    fn never_more_than_one_pending_tick() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        engine.spawn(110, 600);
        engine.spawn(120, 600);
        assert_eq!(engine.scheduler().pending_count(), 1);

        while step(&mut engine) {
            assert!(engine.scheduler().pending_count() <= 1);
            if engine.particle_count() > 0 {
                engine.spawn(130, 600);
                assert_eq!(engine.scheduler().pending_count(), 1);
            }
            if engine.scheduler().now_ms() > 600 {
                engine.stop();
            }
        }
    }

    #[test]
    fn stop_always_notifies_end() {
        let (mut engine, bus) = engine();
        engine.stop();
        assert_eq!(bus.drain(), vec![AnimationEvent::Ended]);

        engine.spawn(100, 600);
        step(&mut engine);
        engine.stop();
        assert_eq!(
            bus.drain(),
            vec![AnimationEvent::Started, AnimationEvent::Ended]
        );
        assert_eq!(engine.particle_count(), 0);
        assert!(!engine.is_running());
        assert_eq!(engine.scheduler().pending_count(), 0);
        assert!(!step(&mut engine));
    }

    #[test]
    fn pause_freezes_without_notification() {
        let (mut engine, bus) = engine();
        engine.spawn(100, 600);
        step(&mut engine);
        step(&mut engine);
        let age = engine.particles()[0].age_ms;

        engine.pause();
        assert!(!engine.is_running());
        assert_eq!(engine.particle_count(), 1);
        assert_eq!(engine.scheduler().pending_count(), 0);
        assert!(!step(&mut engine));
        assert_eq!(engine.particles()[0].age_ms, age);
        assert_eq!(bus.drain(), vec![AnimationEvent::Started]);
    }

    #[test]
    fn spawn_after_pause_rearms_loop() {
        let (mut engine, bus) = engine();
        engine.spawn(100, 600);
        step(&mut engine);
        engine.pause();
        bus.drain();

        engine.spawn(200, 600);
        assert!(engine.is_running());
        assert_eq!(bus.drain(), vec![AnimationEvent::Started]);
        step(&mut engine);
        assert_eq!(engine.particles()[0].age_ms, 60);
        assert_eq!(engine.particles()[1].age_ms, 30);
    }

    #[test]
    fn timer_after_cancel_is_ignored() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        let handle = engine.scheduler_mut().advance_to_next().unwrap();
        engine.pause();
        engine.on_timer(handle);
        assert_eq!(engine.particles()[0].age_ms, 0);
        assert!(!engine.particles()[0].path.is_moving());
    }

    #[test]
    fn path_derived_once_and_stable() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        assert!(!engine.particles()[0].path.is_moving());

        step(&mut engine);
        let path = engine.particles()[0].path;
        assert_eq!(
            path,
            BubblePath::Moving {
                start: Point::new(100, 600),
                ctrl1: Point::new(160, 550),
                ctrl2: Point::new(70, 500),
                end: Point::new(92, 450),
            }
        );

        while step(&mut engine) {
            if let Some(p) = engine.particles().first() {
                assert_eq!(p.path, path);
            }
        }
    }

    #[test]
    fn narrow_surface_shifts_start_left() {
        let (mut engine, _bus) = engine();
        engine.on_surface_resized(100, 800);
        engine.spawn(90, 600);
        step(&mut engine);
        assert_eq!(engine.particles()[0].path.start(), Point::new(30, 600));
    }

    #[test]
    fn offsets_apply_to_new_paths() {
        let (mut engine, _bus) = engine();
        engine.set_offsets(1.0, 1.0);
        engine.spawn(100, 600);
        step(&mut engine);
        let BubblePath::Moving { ctrl1, .. } = engine.particles()[0].path else {
            panic!("expected moving path");
        };
        assert_eq!(ctrl1, Point::new(130, 575));
    }

    #[test]
    fn alpha_holds_then_fades() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        let half = engine.config().half_duration_ms();
        let mut prev_alpha = u8::MAX;
        let mut prev_scale = 0.0;

        while step(&mut engine) {
            let Some(p) = engine.particles().first() else {
                continue;
            };
            if p.age_ms <= half {
                assert_eq!(p.alpha, 255);
            }
            assert!(p.alpha <= prev_alpha);
            assert!(p.scale >= prev_scale);
            assert!(p.scale >= 0.3 && p.scale <= 1.3 + 1e-4);
            prev_alpha = p.alpha;
            prev_scale = p.scale;
        }
        assert!(prev_alpha < 10);
    }

    #[test]
    fn redraw_requested_only_while_alive() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        let ticks = run_until_idle(&mut engine);
        assert_eq!(engine.surface().redraw_requests() as u32, ticks - 1);
    }

    #[test]
    fn draw_pass_skips_unticked_and_imageless() {
        let mut engine = BubbleEngine::new(
            RecordingSurface::<String>::new(),
            ManualScheduler::new(),
            FixedRandom::new(0.5),
        );
        engine.on_surface_resized(400, 800);
        engine.spawn(50, 600);
        engine.set_bubble_image(Some("like".to_string()), 30, 25);
        engine.spawn(100, 600);

        engine.draw();
        assert!(engine.surface().draws().is_empty());

        step(&mut engine);
        engine.draw();
        let draws = engine.surface_mut().take_draws();
        assert_eq!(draws.len(), 1);
        let call = &draws[0];
        let p = &engine.particles()[1];
        assert_eq!(call.image, "like");
        assert_eq!((call.x, call.y), (p.position.x, p.position.y));
        assert_eq!(call.width, (30.0 * p.scale) as i32);
        assert_eq!(call.height, (25.0 * p.scale) as i32);
        assert_eq!(call.alpha, 255);
    }

    #[test]
    fn image_swap_affects_only_new_bubbles() {
        let (mut engine, _bus) = engine();
        engine.spawn(100, 600);
        engine.set_bubble_image(None, 99, 99);
        engine.set_bubble_image(Some("heart".to_string()), 30, 25);
        engine.spawn(200, 600);
        step(&mut engine);

        engine.draw();
        let images: Vec<String> = engine
            .surface()
            .draws()
            .iter()
            .map(|d| d.image.clone())
            .collect();
        assert_eq!(images, vec!["like".to_string(), "heart".to_string()]);
    }

    #[test]
    fn null_image_keeps_previous_size() {
        let (mut engine, _bus) = engine();
        engine.set_bubble_image(None, 99, 99);
        assert_eq!(engine.bubble_size(), Size::new(30, 25));
    }
}
