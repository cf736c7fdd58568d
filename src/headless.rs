//! Runs the field without a window, recording into a [`DrawList`].

use log::{info, warn};
use particle_network::{
    DrawList, FieldConfig, FrameBudget, FrameDriver, Refresh, RefreshHost, Viewport,
};

use crate::framepace::Framepacer;

/// Hands out one refresh per paced frame.
struct PacedRefresh {
    pacer: Framepacer,
    started: bool,
}

impl RefreshHost for PacedRefresh {
    fn next_refresh(&mut self) -> Refresh {
        if self.started {
            self.pacer.end_frame();
        }
        self.started = true;
        self.pacer.begin_frame();
        Refresh::Frame
    }
}

pub fn run(
    config: FieldConfig,
    viewport: Viewport,
    seed: Option<u64>,
    framerate: Option<u32>,
    budget: FrameBudget,
) -> anyhow::Result<()> {
    if budget == FrameBudget::Unlimited {
        warn!("Running headless without --frames; this only ends when the process is killed");
    }

    let mut driver = FrameDriver::from_seed(config, viewport, seed)?.with_budget(budget);
    let mut surface = DrawList::new();
    let mut host = PacedRefresh {
        pacer: Framepacer::new(framerate),
        started: false,
    };

    info!(
        "Headless field {}x{} with {} particles",
        viewport.width,
        viewport.height,
        driver.store().len()
    );
    if !host.pacer.is_limited() {
        info!("Headless frames are unpaced");
    }

    let frames = driver.run(&mut surface, &mut host);
    let stats = driver.last_stats();
    info!(
        "Rendered {frames} frames; last frame drew {} disks and {} links",
        surface.disk_count(),
        stats.links
    );

    Ok(())
}
