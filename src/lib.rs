//! Particle bursts rendered in software.
//!
//! [`ParticleSystem`] keeps a fixed-size pool of single-pixel sparks, moves and
//! fades them once per tick, and plots them onto a [`PixelSurface`], a flat
//! RGBA buffer that can be blitted onto other surfaces or presented to a
//! window. [`Simulation`] ties the two together with the per-frame order
//! clear → update → draw, and [`Drawer`] is the minifb window the binary uses.
//!
//! Everything is single-threaded: spawn, update and draw all take `&mut`, so a
//! host that shares a simulation across threads wraps the whole thing in one lock.

pub mod config;
pub mod draw;
pub mod error;
pub mod particles;
pub mod sim;
pub mod surface;
pub mod types;

pub use config::{Burst, Config};
pub use draw::Drawer;
pub use error::{Error, OutOfBounds, Result};
pub use particles::{MAX_PARTICLES, Particle, ParticlePool, ParticleSystem};
pub use sim::Simulation;
pub use surface::{PixelSurface, PresentTarget};
pub use types::{Coord, FrameBuffer, Rect};
