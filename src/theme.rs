//! Dark/light preference, persisted as a single string flag.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};
use crate::particle::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Color the surface is cleared to each frame.
    pub fn background(self) -> Rgba {
        match self {
            Theme::Dark => Rgba::rgb(0.043, 0.051, 0.078),
            Theme::Light => Rgba::rgb(0.976, 0.980, 0.984),
        }
    }

    /// The saved preference. Missing or empty means dark; any saved value
    /// other than `"dark"` shows as light.
    pub fn preferred<S: ThemeStore + ?Sized>(store: &S) -> Self {
        match store.load() {
            Ok(Some(flag)) => match flag.trim() {
                "" => Theme::Dark,
                flag => flag.parse().unwrap_or_else(|_| {
                    warn!("Unknown theme flag {flag:?}, showing light");
                    Theme::Light
                }),
            },
            Ok(None) => Theme::Dark,
            Err(e) => {
                warn!("Failed to read theme flag: {e}");
                Theme::Dark
            }
        }
    }

    /// Persist this theme as the preference.
    pub fn save<S: ThemeStore + ?Sized>(self, store: &mut S) -> Result<()> {
        store.store(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(Error::InvalidConfig(format!("unknown theme {other:?}"))),
        }
    }
}

/// Key-value slot holding the theme flag.
pub trait ThemeStore {
    fn load(&self) -> Result<Option<String>>;
    fn store(&mut self, flag: &str) -> Result<()>;
}

/// Keeps the flag in a small text file.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(flag) => Ok(Some(flag)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&mut self, flag: &str) -> Result<()> {
        std::fs::write(&self.path, flag)?;
        Ok(())
    }
}

/// In-process store, lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    flag: Option<String>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.flag.clone())
    }

    fn store(&mut self, flag: &str) -> Result<()> {
        self.flag = Some(flag.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dark() {
        assert_eq!(Theme::preferred(&MemoryThemeStore::default()), Theme::Dark);
    }

    #[test]
    fn unknown_flag_shows_light() -> Result<()> {
        let mut store = MemoryThemeStore::default();
        store.store("sepia")?;
        assert_eq!(Theme::preferred(&store), Theme::Light);
        Ok(())
    }

    #[test]
    fn empty_flag_is_dark() -> Result<()> {
        let mut store = MemoryThemeStore::default();
        store.store("  ")?;
        assert_eq!(Theme::preferred(&store), Theme::Dark);
        Ok(())
    }

    #[test]
    fn toggle_and_persist() -> Result<()> {
        let mut store = MemoryThemeStore::default();
        let theme = Theme::preferred(&store).toggled();
        theme.save(&mut store)?;
        assert_eq!(store.load()?.as_deref(), Some("light"));
        assert_eq!(Theme::preferred(&store), Theme::Light);
        Ok(())
    }

    #[test]
    fn file_store_round_trips() -> Result<()> {
        let path = std::env::temp_dir().join(format!("particle_network_theme_{}", std::process::id()));
        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.load()?, None);

        Theme::Light.save(&mut store)?;
        assert_eq!(Theme::preferred(&store), Theme::Light);

        std::fs::remove_file(&path)?;
        Ok(())
    }
}
