//! Virtual-clock simulation with a per-tick trace

use super::{run_session, SessionArgs};
use anyhow::Result;
use bubble_particles::{ParticleSnapshot, RecordingSurface};
use bubble_runtime::AnimationEvent;
use serde::Serialize;

#[derive(Serialize)]
struct Frame {
    tick: u32,
    time_ms: u64,
    /// Draw calls issued by the redraw after this tick
    draws: usize,
    events: Vec<AnimationEvent>,
    particles: Vec<ParticleSnapshot>,
}

#[derive(Serialize)]
struct Report {
    ticks: u32,
    started: usize,
    ended: usize,
    frames: Vec<Frame>,
}

pub fn run(args: &SessionArgs, format: &str) -> Result<()> {
    let (mut engine, events) = args.build_engine(RecordingSurface::<String>::new(), "like".to_string())?;
    let taps = args.tap_points();

    let mut frames = Vec::new();
    let mut redraws_seen = 0;
    let ticks = run_session(&mut engine, &taps, args.stagger, |engine, tick| {
        // Redraw only when the engine asked for one
        if engine.surface().redraw_requests() > redraws_seen {
            redraws_seen = engine.surface().redraw_requests();
            engine.draw();
        }
        frames.push(Frame {
            tick,
            time_ms: engine.scheduler().now_ms(),
            draws: engine.surface_mut().take_draws().len(),
            events: events.drain(),
            particles: engine.particles().iter().map(|p| p.snapshot()).collect(),
        });
        Ok(())
    })?;

    let count = |kind| {
        frames
            .iter()
            .flat_map(|f| f.events.iter())
            .filter(|e| **e == kind)
            .count()
    };
    let report = Report {
        ticks,
        started: count(AnimationEvent::Started),
        ended: count(AnimationEvent::Ended),
        frames,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    for frame in &report.frames {
        println!(
            "tick {:>4}  t={:>6}ms  live={:<3} draws={:<3}{}",
            frame.tick,
            frame.time_ms,
            frame.particles.len(),
            frame.draws,
            frame
                .events
                .iter()
                .map(|e| format!(" [{:?}]", e))
                .collect::<String>(),
        );
        for (i, p) in frame.particles.iter().enumerate() {
            println!(
                "    #{:<3} pos=({:>5},{:>5})  age={:>5}ms  scale={:.3}  alpha={:>3}",
                i, p.position.x, p.position.y, p.age_ms, p.scale, p.alpha
            );
        }
    }
    println!();
    println!(
        "{} ticks, {} start event(s), {} end event(s)",
        report.ticks, report.started, report.ended
    );
}
