//! Headless session-to-PNG render command

use super::{run_session, SessionArgs};
use crate::surface::{generated_sprite, ImageSurface};
use anyhow::{bail, Context, Result};
use image::Rgba;
use std::path::Path;
use std::rc::Rc;

pub struct RenderArgs {
    pub session: SessionArgs,
    pub sprite: Option<String>,
    pub every: u32,
    pub output: String,
}

const BACKGROUND: Rgba<u8> = Rgba([250, 248, 245, 255]);

pub fn run(args: RenderArgs) -> Result<()> {
    let session = &args.session;
    if session.width <= 0 || session.height <= 0 {
        bail!(
            "surface size must be positive, got {}x{}",
            session.width,
            session.height
        );
    }

    let sprite = match &args.sprite {
        Some(path) => image::open(path)
            .with_context(|| format!("Failed to load sprite '{}'", path))?
            .to_rgba8(),
        None => generated_sprite(64),
    };
    println!("Sprite: {}x{}", sprite.width(), sprite.height());

    let out_dir = Path::new(&args.output);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", args.output))?;

    let surface = ImageSurface::new(session.width as u32, session.height as u32, BACKGROUND);
    let (mut engine, events) = session.build_engine(surface, Rc::new(sprite))?;

    let every = args.every.max(1);
    let mut redraws = 0u32;
    let mut written = 0u32;
    let ticks = run_session(&mut engine, &session.tap_points(), session.stagger, |engine, _| {
        if !engine.surface_mut().take_dirty() {
            return Ok(());
        }
        redraws += 1;
        if redraws % every != 0 {
            return Ok(());
        }
        engine.surface_mut().clear();
        engine.draw();
        written += 1;
        let path = out_dir.join(format!("frame_{:04}.png", written));
        engine.surface().save(&path)
    })?;

    let events = events.drain();
    println!("Ticks: {}", ticks);
    println!("Animation events: {:?}", events);
    println!("Wrote {} frame(s) to {}", written, out_dir.display());
    Ok(())
}
