use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] builder::BuildError),

    #[error(transparent)]
    Read(#[from] reader::ReadError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
