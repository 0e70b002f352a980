//! Runtime errors

use std::io;
use std::path::PathBuf;

use fdspkr_core::ConfigError;
use fdspkr_hal_bcm2835::{MmioError, PinError};

/// Errors from the speaker runtime
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reported by the tone core
    #[error("{0}")]
    Core(fdspkr_core::Error),

    /// Pin not usable on this SoC
    #[error("GPIO{pin} cannot be used: {reason:?}")]
    Pin { pin: u8, reason: PinError },

    /// Pin name in the configuration not recognised
    #[error("invalid pin {name:?}: {reason:?}")]
    PinName { name: String, reason: PinError },

    /// Mapped region cannot be used as a register block
    #[error("invalid register mapping: {0:?}")]
    Mapping(MmioError),

    /// Timer dispatch thread could not be started
    #[error("failed to spawn timer thread")]
    Spawn(#[source] io::Error),

    /// Configuration file could not be read
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML for a speaker config
    #[error("failed to parse configuration")]
    Toml(#[from] toml::de::Error),

    /// Engine still referenced after the dispatcher stopped
    #[error("speaker engine still shared at shutdown")]
    StillShared,
}

impl From<fdspkr_core::Error> for Error {
    fn from(e: fdspkr_core::Error) -> Self {
        Error::Core(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Core(fdspkr_core::Error::Configuration(e))
    }
}
