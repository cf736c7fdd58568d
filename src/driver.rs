//! Per-refresh loop over the particle field.
//!
//! The host owns the scheduling primitive (a winit redraw request, a paced
//! sleep, a test harness) and calls [`FrameDriver::frame`] once per refresh.
//! [`FrameDriver::run`] wraps that in an explicit loop for hosts that can
//! hand out refreshes synchronously.

use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{FieldConfig, LinkParams};
use crate::error::Result;
use crate::linker::link_all;
use crate::stepper::step;
use crate::store::ParticleStore;
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

/// How many frames a driver may render before it stops on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameBudget {
    #[default]
    Unlimited,
    Frames(u64),
}

/// Whether the host should schedule another refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// What the host hands the driver on each wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refresh {
    Frame,
    Resized(Viewport),
    Closed,
}

/// Source of display refreshes for [`FrameDriver::run`].
pub trait RefreshHost {
    /// Block until the next refresh or viewport change.
    fn next_refresh(&mut self) -> Refresh;
}

/// Cancels a running driver. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// 1-based index of the frame just rendered.
    pub frame: u64,
    pub particles: usize,
    pub links: usize,
}

pub struct FrameDriver<R = StdRng> {
    config: FieldConfig,
    viewport: Viewport,
    store: ParticleStore,
    rng: R,
    frames: u64,
    budget: FrameBudget,
    stop: StopHandle,
    last: FrameStats,
}

/// Seeded when `seed` is given, from entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl FrameDriver<StdRng> {
    pub fn from_seed(config: FieldConfig, viewport: Viewport, seed: Option<u64>) -> Result<Self> {
        Self::new(config, viewport, seeded_rng(seed))
    }
}

impl<R: Rng> FrameDriver<R> {
    pub fn new(config: FieldConfig, viewport: Viewport, mut rng: R) -> Result<Self> {
        config.validate()?;
        let store = ParticleStore::initialize(viewport, &config, &mut rng);
        debug!(
            "Initialized {} particles for {}x{}",
            store.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            config,
            viewport,
            store,
            rng,
            frames: 0,
            budget: FrameBudget::Unlimited,
            stop: StopHandle::default(),
            last: FrameStats::default(),
        })
    }

    /// Only builds a driver when there is something to draw on.
    pub fn start<S: DrawSurface + ?Sized>(
        surface: Option<&S>,
        config: FieldConfig,
        viewport: Viewport,
        rng: R,
    ) -> Result<Option<Self>> {
        if surface.is_none() {
            debug!("No drawing surface, particle field disabled");
            return Ok(None);
        }
        Self::new(config, viewport, rng).map(Some)
    }

    pub fn with_budget(mut self, budget: FrameBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last
    }

    pub fn link_params_mut(&mut self) -> &mut LinkParams {
        &mut self.config.link
    }

    /// Replace the whole generation for the new extents.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.store = ParticleStore::initialize(viewport, &self.config, &mut self.rng);
        debug!(
            "Rebuilt {} particles for {}x{}",
            self.store.len(),
            viewport.width,
            viewport.height
        );
    }

    /// Clear, step every particle in store order, then link the whole store.
    pub fn tick<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear();
        for particle in self.store.iter_mut() {
            step(particle, self.viewport, surface);
        }
        let links = link_all(self.store.as_slice(), self.viewport, &self.config.link, surface);

        self.frames += 1;
        self.last = FrameStats {
            frame: self.frames,
            particles: self.store.len(),
            links,
        };
        self.last
    }

    pub fn is_finished(&self) -> bool {
        if self.stop.is_stopped() {
            return true;
        }
        match self.budget {
            FrameBudget::Unlimited => false,
            FrameBudget::Frames(limit) => self.frames >= limit,
        }
    }

    /// One display-refresh callback.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> Schedule {
        if self.is_finished() {
            return Schedule::Stop;
        }
        self.tick(surface);
        if self.is_finished() {
            Schedule::Stop
        } else {
            Schedule::Continue
        }
    }

    /// Drive frames from `host` until stopped, out of budget or closed.
    /// Returns the number of frames rendered by this call.
    pub fn run<S, H>(&mut self, surface: &mut S, host: &mut H) -> u64
    where
        S: DrawSurface + ?Sized,
        H: RefreshHost + ?Sized,
    {
        let start = self.frames;
        while !self.is_finished() {
            match host.next_refresh() {
                Refresh::Frame => {
                    if self.frame(surface) == Schedule::Stop {
                        break;
                    }
                }
                Refresh::Resized(viewport) => self.resize(viewport),
                Refresh::Closed => break,
            }
        }
        self.frames - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;

    fn driver(width: f32, height: f32) -> FrameDriver {
        FrameDriver::from_seed(FieldConfig::default(), Viewport::new(width, height), Some(7))
            .unwrap()
    }

    #[test]
    fn tick_draws_every_particle_after_clearing() {
        let mut driver = driver(420.0, 420.0);
        let mut list = DrawList::new();

        let stats = driver.tick(&mut list);
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.particles, 9);
        assert_eq!(list.clears(), 1);
        assert_eq!(list.disk_count(), 9);
        assert_eq!(list.line_count(), stats.links);
        // self-links are on by default
        assert!(stats.links >= 9);
    }

    #[test]
    fn disks_are_drawn_before_links() {
        let mut driver = driver(420.0, 420.0);
        let mut list = DrawList::new();
        driver.tick(&mut list);

        let first_line = list
            .commands()
            .iter()
            .position(|c| matches!(c, crate::surface::DrawCommand::Line { .. }))
            .unwrap();
        assert_eq!(first_line, 9);
    }

    #[test]
    fn missing_surface_never_starts() -> Result<()> {
        let driver = FrameDriver::start::<DrawList>(
            None,
            FieldConfig::default(),
            Viewport::new(800.0, 600.0),
            StdRng::seed_from_u64(1),
        )?;
        assert!(driver.is_none());
        Ok(())
    }

    #[test]
    fn present_surface_starts_seeded_field() -> Result<()> {
        let surface = DrawList::new();
        let viewport = Viewport::new(420.0, 420.0);
        let started = FrameDriver::start(
            Some(&surface),
            FieldConfig::default(),
            viewport,
            seeded_rng(Some(7)),
        )?
        .unwrap();
        let seeded = driver(420.0, 420.0);

        assert_eq!(started.store().len(), 9);
        assert_eq!(started.store().as_slice(), seeded.store().as_slice());
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = FieldConfig {
            density: 0.0,
            ..FieldConfig::default()
        };
        assert!(FrameDriver::from_seed(config, Viewport::new(10.0, 10.0), Some(1)).is_err());
    }

    #[test]
    fn resize_rebuilds_the_store() {
        let mut driver = driver(420.0, 420.0);
        driver.resize(Viewport::new(600.0, 600.0));
        assert_eq!(driver.store().len(), 20);
        assert_eq!(driver.viewport(), Viewport::new(600.0, 600.0));

        driver.resize(Viewport::new(0.0, 0.0));
        let mut list = DrawList::new();
        let stats = driver.tick(&mut list);
        assert_eq!(stats.particles, 0);
        assert_eq!(stats.links, 0);
    }

    #[test]
    fn budget_stops_frames() {
        let mut driver = driver(420.0, 420.0).with_budget(FrameBudget::Frames(2));
        let mut list = DrawList::new();
        assert_eq!(driver.frame(&mut list), Schedule::Continue);
        assert_eq!(driver.frame(&mut list), Schedule::Stop);
        assert_eq!(driver.frame(&mut list), Schedule::Stop);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn stop_handle_cancels() {
        let mut driver = driver(420.0, 420.0);
        let stop = driver.stop_handle();
        let mut list = DrawList::new();
        assert_eq!(driver.frame(&mut list), Schedule::Continue);
        stop.stop();
        assert_eq!(driver.frame(&mut list), Schedule::Stop);
        assert_eq!(driver.frames(), 1);
    }
}
