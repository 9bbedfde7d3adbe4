use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;

pub const DEFAULT_BIND: &str = "0.0.0.0:4221";
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "http-server", version, about = "Minimal HTTP/1.1 server")]
pub struct Args {
    /// Absolute path served under `/files/`. The route is disabled otherwise.
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Size of the single read that must hold the whole request.
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    pub read_buffer_size: usize,
}

/// Server settings, fixed before the first connection is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    directory: Option<PathBuf>,
    pub read_buffer_size: usize,
}

impl Config {
    pub fn new(bind: SocketAddr, directory: Option<PathBuf>) -> Config {
        Config {
            bind,
            directory: directory.filter(|d| serving_root_is_usable(d)),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Config {
        self.read_buffer_size = size.max(1);

        self
    }

    /// The serving root, present only when it was given as an absolute path.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config::new(args.bind, args.directory).with_read_buffer_size(args.read_buffer_size)
    }
}

fn serving_root_is_usable(directory: &Path) -> bool {
    if directory.is_absolute() {
        return true;
    }

    tracing::warn!(
        directory = %directory.display(),
        "serving directory is not absolute, /files/ is disabled"
    );
    false
}
