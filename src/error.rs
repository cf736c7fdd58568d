use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the particle field.
///
/// The per-frame path never fails; everything here happens before a
/// [`FrameDriver`](crate::driver::FrameDriver) exists.
#[derive(Debug, Error)]
pub enum Error {
    /// A tuning value was rejected by [`FieldConfig::validate`](crate::config::FieldConfig::validate).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string was not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing the theme flag failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
