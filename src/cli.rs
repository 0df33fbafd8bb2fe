//! Command-line interface for accountd.

use clap::{Parser, Subcommand};

/// accountd - a small user-account service
#[derive(Parser)]
#[command(name = "accountd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    #[command(alias = "daemon")]
    Serve,

    /// Create a staff/superuser account for the admin surface
    CreateAdmin {
        /// Email address for the new administrator
        email: String,

        /// Optional display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Create default config file
    Init,
}
