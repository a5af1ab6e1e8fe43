use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fetch pins and download their media
#[derive(Parser)]
#[command(name = "pinfetch")]
#[command(about = "Look up a pin and download its images and videos", long_about = None)]
pub struct Cli {
    /// Provider config file (defaults to provider.toml in the user config dir)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the media found for a pin
    Info {
        /// Pin link (pin.it or pinterest.com)
        url: String,
        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download every image and video of a pin
    Download {
        /// Pin link (pin.it or pinterest.com)
        url: String,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Run the HTTP relay endpoint
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}
