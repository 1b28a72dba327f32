//! CLI module - Command-line interface for Watchlist
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Watchlist - a personal movie list
#[derive(Parser)]
#[command(name = "watchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (default: search ./config.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    Init,

    /// Create the database tables
    Initdb {
        /// Drop all tables before creating them again
        #[arg(long)]
        drop: bool,
    },

    /// Fill the database with demo data
    Forge,

    /// Create the administrator, or rename it and reset its password
    Admin {
        /// Login name
        #[arg(long)]
        username: String,
        /// Login password
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
