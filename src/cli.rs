//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Government office locator on an interactive map
#[derive(Parser, Debug)]
#[command(name = "officemap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/officemap/config.toml)
    #[arg(long, global = true, env = "OFFICEMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Serve the dashboard (default)
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Render one place name once and exit
    Render {
        /// Free-text place name, e.g. 県庁
        place: String,
        /// Write a standalone HTML map to this file instead of printing JSON
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
