use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    ///
    /// Usually a missing file or a permissions problem. The path is included so the
    /// critical log line points at the file that was expected.
    #[error("Couldn't read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or doesn't match the expected shape.
    #[error("Couldn't parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Shard arguments passed on the command line are inconsistent.
    #[error("Invalid sharding arguments: {0}")]
    InvalidSharding(String),
}
