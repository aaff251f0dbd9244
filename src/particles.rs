// Particle bursts: spawn, fade, rasterize.
// Visual outcomes:
// - A click throws out a ring of single-pixel sparks that fly in straight lines.
// - Every tick each spark loses one step of red, green and blue, so white goes
//   yellow, then red, then black, and the spark vanishes when it reaches black.

use image::Rgb;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::PixelSurface;

/// Default pool size, enough for a few dozen layered explosions.
pub const MAX_PARTICLES: usize = 30_000;

/// One spark. Visual: a single opaque pixel moving in a straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32, pub y: f32,  // world position in pixels
    pub angle: u16,          // degrees, counter-clockwise from +x, never changes
    pub energy: u32,         // speed in pixels per tick, never changes
    pub r: u8, pub g: u8, pub b: u8,
}

impl Particle {
    /// Per-tick displacement. Each axis is truncated toward zero, so motion is
    /// blocky and an axis with less than one pixel of speed never moves.
    /// The trig runs in f64: in f32, cos(60) lands just under 0.5 and truncation
    /// loses a whole pixel.
    pub fn step(&self) -> (f32, f32) {
        let rad = (self.angle as f64).to_radians();
        let e = self.energy as f64;
        ((e * rad.cos()).trunc() as f32, (-e * rad.sin()).trunc() as f32)
    }

    #[inline]
    fn faded_out(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    #[inline]
    fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Fixed-capacity pool of live particles.
///
/// The active range is always `0..len()`; removal moves the last live particle
/// into the hole, so order is not preserved. The backing `Vec` is allocated once
/// and never grows past `capacity`.
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self { particles: Vec::with_capacity(capacity), capacity }
    }

    /// Store `p`, or drop it if the pool is full. Returns whether it was kept.
    #[inline]
    pub fn add(&mut self, p: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(p);
        true
    }

    /// O(1) removal: the last live particle takes slot `i`.
    #[inline]
    pub fn remove(&mut self, i: usize) -> Particle {
        self.particles.swap_remove(i)
    }

    pub fn len(&self) -> usize { self.particles.len() }
    pub fn is_empty(&self) -> bool { self.particles.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
    pub fn free(&self) -> usize { self.capacity - self.particles.len() }
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> { self.particles.iter() }
    pub fn clear(&mut self) { self.particles.clear(); }
}

/// Pool plus the RNG that seeds new sparks.
pub struct ParticleSystem {
    pool: ParticlePool,
    rng: StdRng,
}

impl ParticleSystem {
    /// Create with capacity for N particles, seeded from the OS.
    /// Visual: nothing on screen until the first explosion.
    pub fn new(capacity: usize) -> Self {
        Self { pool: ParticlePool::new(capacity), rng: StdRng::from_os_rng() }
    }

    /// Same as [`new`](Self::new) but with a fixed seed, so runs are repeatable.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self { pool: ParticlePool::new(capacity), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Insert an already-built particle (subject to the same capacity limit).
    pub fn add(&mut self, p: Particle) -> bool {
        self.pool.add(p)
    }

    /// Drop every live particle.
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    /// Throw `count` sparks out of `(x, y)` in `color`.
    ///
    /// Each spark gets a random whole-degree angle in `[0, 360)` and a random
    /// whole-pixel speed in `[0, energy_spread)`; a spread of 0 gives motionless
    /// sparks. Sparks that do not fit in the pool are dropped without an error:
    /// under pressure the effect just gets thinner. Returns how many were added.
    pub fn spawn_explosion(&mut self, x: f32, y: f32, color: Rgb<u8>, energy_spread: u32, count: usize) -> usize {
        let Rgb([r, g, b]) = color;
        let mut added = 0;
        for _ in 0..count {
            let angle = self.rng.random_range(0..360u16);
            let energy = if energy_spread == 0 { 0 } else { self.rng.random_range(0..energy_spread) };
            if !self.pool.add(Particle { x, y, angle, energy, r, g, b }) { break; }
            added += 1;
        }

        if added < count {
            debug!("explosion at ({x}, {y}): pool full, kept {added} of {count} particles");
        }
        added
    }

    /// Advance every live particle one tick: move, fade, and drop the black ones.
    pub fn update(&mut self) {
        let mut i = 0;
        while i < self.pool.particles.len() {
            let p = &mut self.pool.particles[i];

            let (dx, dy) = p.step();
            p.x += dx;
            p.y += dy;

            p.r = p.r.saturating_sub(1);
            p.g = p.g.saturating_sub(1);
            p.b = p.b.saturating_sub(1);

            if p.faded_out() {
                // Slot i now holds what was the last particle; look at it again.
                self.pool.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Plot each live particle onto `surface`, shifted by the camera offset.
    /// Off-screen particles are skipped; on-screen ones overwrite the pixel.
    pub fn draw(&self, surface: &mut PixelSurface, camera_x: f32, camera_y: f32) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        for p in self.pool.iter() {
            let sx = p.x - camera_x;
            let sy = p.y - camera_y;
            // NaN fails both comparisons and is skipped too.
            if !(sx >= 0.0 && sx < w && sy >= 0.0 && sy < h) { continue; }

            surface.put_pixel(sx as usize, sy as usize, p.rgba());
        }
    }
}
