// One owned context for everything a frame touches.
// Visual: `tick()` produces the next image in `screen()`; `present()` hands it to the window.

use image::Rgb;
use log::{debug, info};

use crate::config::{Burst, Config};
use crate::error::Result;
use crate::particles::ParticleSystem;
use crate::surface::{PixelSurface, PresentTarget};
use crate::types::{Coord, Rect};

pub struct Simulation {
    screen: PixelSurface,
    background: Option<PixelSurface>,
    particles: ParticleSystem,
    clear_color: u32,
    camera: (f32, f32),
    tick_budget: u32,
    ticks_left: u32,
    ticks: u64,
}

impl Simulation {
    pub fn new(width: usize, height: usize, particles: ParticleSystem) -> Self {
        Self {
            screen: PixelSurface::new(width, height),
            background: None,
            particles,
            clear_color: 0,
            camera: (0.0, 0.0),
            tick_budget: u32::MAX,
            ticks_left: 0,
            ticks: 0,
        }
    }

    /// Build the screen, pool and optional background described by `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let cap = cfg.particles.max_particles;
        let particles = match cfg.particles.seed {
            Some(seed) => ParticleSystem::with_seed(cap, seed),
            None => ParticleSystem::new(cap),
        };

        let mut sim = Self::new(cfg.screen.width, cfg.screen.height, particles);
        sim.clear_color = cfg.screen.clear_color;
        sim.tick_budget = cfg.particles.tick_budget;
        if let Some(path) = &cfg.background {
            sim.set_background(PixelSurface::load(path)?);
        }

        info!(
            "simulation ready: {}x{} screen, {} particle slots, {} ticks per explosion",
            cfg.screen.width, cfg.screen.height, cap, sim.tick_budget
        );
        Ok(sim)
    }

    pub fn set_background(&mut self, background: PixelSurface) {
        self.background = Some(background);
    }

    pub fn set_camera(&mut self, x: f32, y: f32) {
        self.camera = (x, y);
    }

    pub fn screen(&self) -> &PixelSurface {
        &self.screen
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the driver should keep calling [`tick`](Self::tick).
    pub fn is_running(&self) -> bool {
        self.ticks_left > 0
    }

    /// Fire every layer in `bursts` at `(x, y)` and restart the tick budget.
    /// Returns the number of particles that fit in the pool.
    pub fn explode(&mut self, x: f32, y: f32, bursts: &[Burst]) -> usize {
        let added: usize = bursts
            .iter()
            .map(|b| self.particles.spawn_explosion(x, y, Rgb(b.color), b.energy, b.count))
            .sum();
        self.ticks_left = self.tick_budget;
        debug!("explosion at ({x}, {y}): +{added}, {} live", self.particles.len());
        added
    }

    /// One frame: clear (or paint the background), move the particles, draw them.
    pub fn tick(&mut self) -> Result<()> {
        self.screen.clear(self.clear_color, 255);
        if let Some(bg) = &self.background {
            // Backgrounds larger than the screen are cropped to its top-left corner.
            let w = bg.width().min(self.screen.width());
            let h = bg.height().min(self.screen.height());
            if w > 0 && h > 0 {
                bg.copy_region_to(&mut self.screen, Rect::new(0, 0, w, h), Coord::ORIGIN)?;
            }
        }

        self.particles.update();
        let (cx, cy) = self.camera;
        self.particles.draw(&mut self.screen, cx, cy);

        self.ticks += 1;
        self.ticks_left = self.ticks_left.saturating_sub(1);
        Ok(())
    }

    /// Copy the whole screen to `target` at its top-left corner.
    pub fn present<T: PresentTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        self.screen.present_to(target, self.screen.full_rect(), Coord::ORIGIN)
    }
}
