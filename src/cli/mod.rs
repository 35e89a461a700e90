//! Command-line interface for the recipe API server.

mod commands;

use clap::{Parser, Subcommand};

/// Recipe API - recipes, tags and ingredients per account
#[derive(Parser)]
#[command(name = "recipe-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "runserver")]
    Serve {
        /// Port to listen on, overriding the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an administrative account
    #[command(name = "create-superuser", alias = "createsuperuser")]
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
}

pub use commands::*;
