use std::path::PathBuf;

use clap::Parser;
use particle_network::{
    config::{FieldConfig, DEFAULT_DENSITY},
    FrameBudget, Rgba,
};

/// A drifting particle network background
#[derive(Parser)]
#[command()]
pub struct Args {
    /// Initial viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial viewport height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// The framerate the simulation will run at
    ///
    /// if unset the window follows the display refresh
    /// and headless runs as fast as possible
    #[arg(short, long)]
    pub framerate: Option<u32>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Seed for particle placement, random if unset
    #[arg(long)]
    pub seed: Option<u64>,

    /// Viewport area (px²) per particle
    #[arg(long, default_value_t = DEFAULT_DENSITY)]
    pub density: f32,

    /// Particle and link color as `#rrggbb` or `#rrggbbaa`
    #[arg(long, default_value = "#6366f1")]
    pub color: Rgba,

    /// Don't draw the zero-length link from each particle to itself
    #[arg(long)]
    pub no_self_links: bool,

    /// File holding the dark/light preference
    #[arg(long, default_value = "./theme")]
    pub theme_file: PathBuf,

    /// Run without opening a window
    #[arg(long)]
    pub headless: bool,
}

impl Args {
    pub fn field_config(&self) -> particle_network::error::Result<FieldConfig> {
        let mut config = FieldConfig {
            density: self.density,
            ..FieldConfig::default()
        }
        .with_color(self.color);
        config.link.self_pairs = !self.no_self_links;
        config.validate()?;
        Ok(config)
    }

    pub fn budget(&self) -> FrameBudget {
        self.frames.map_or(FrameBudget::Unlimited, FrameBudget::Frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_defaults() {
        let args = Args::parse_from(["particle_network"]);
        let config = args.field_config().unwrap();
        assert_eq!(config.density, DEFAULT_DENSITY);
        assert!(config.link.self_pairs);
        assert_eq!(args.budget(), FrameBudget::Unlimited);
    }

    #[test]
    fn flags_reach_the_config() {
        let args = Args::parse_from([
            "particle_network",
            "--density",
            "9000",
            "--color",
            "#ff0000",
            "--no-self-links",
            "--frames",
            "3",
        ]);
        let config = args.field_config().unwrap();
        assert_eq!(config.density, 9000.0);
        assert_eq!(config.link.color, Rgba::rgb(1.0, 0.0, 0.0));
        assert!(!config.link.self_pairs);
        assert_eq!(args.budget(), FrameBudget::Frames(3));
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        assert!(Args::try_parse_from(["particle_network", "--color", "red"]).is_err());
    }
}
