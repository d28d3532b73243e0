//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "portalkeeper")]
#[command(version, about = "Campus portal auto-login daemon", long_about = None)]
pub struct Cli {
    /// Run the keep-alive daemon instead of a one-shot login
    #[arg(short = 'D', long = "loop")]
    pub keep_alive: bool,

    /// Override the connectivity check interval in seconds
    #[arg(short = 't', long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Override the configured network zone (teaching or dorm)
    #[arg(short = 'z', long, value_name = "ZONE")]
    pub zone: Option<String>,

    /// Load portal settings from this env file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<String>,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Try a single login with explicit credentials without saving them
    Verify {
        /// Portal account name
        #[arg(short, long)]
        username: String,

        /// Portal account password
        #[arg(short, long)]
        password: String,
    },
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
