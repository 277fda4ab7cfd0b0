//! CLI module - Command-line interface for Bookshelf

use clap::{Parser, Subcommand};

/// Bookshelf - Book catalog manager
#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    #[command(alias = "daemon")]
    Serve,

    /// List every book in the catalog
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show details about one book
    #[command(alias = "i", alias = "info")]
    Show {
        /// Book ID
        id: i32,
    },

    /// Create default config file
    Init,
}
