use std::path::PathBuf;

use clap::Parser;

/// SyncClip command line arguments
#[derive(Debug, Default, Parser)]
#[command(
    name = "syncclip",
    version,
    about = "Share clipboard snippets between devices on the local network"
)]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the platform config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for history, identity and logs
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Name stamped on clips created on this device
    #[arg(long)]
    pub device_name: Option<String>,

    /// Share link of another instance to connect to on startup (repeatable)
    #[arg(long, value_name = "LINK")]
    pub connect: Vec<String>,

    /// Run without peer-to-peer networking
    #[arg(long)]
    pub no_network: bool,
}
