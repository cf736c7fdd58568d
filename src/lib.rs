//! A drifting particle network: particles bounce around the viewport and are
//! joined by faint lines when they come close.
//!
//! The simulator only talks to the outside world through [`DrawSurface`];
//! the binary in this package hosts it in a wgpu window or headlessly.

pub mod config;
pub mod driver;
pub mod error;
pub mod linker;
pub mod particle;
pub mod stepper;
pub mod store;
pub mod surface;
pub mod theme;
pub mod viewport;

pub use config::{FieldConfig, LinkParams};
pub use driver::{
    seeded_rng, FrameBudget, FrameDriver, FrameStats, Refresh, RefreshHost, Schedule, StopHandle,
};
pub use particle::{Particle, Rgba};
pub use store::ParticleStore;
pub use surface::{DrawCommand, DrawList, DrawSurface};
pub use theme::Theme;
pub use viewport::Viewport;
