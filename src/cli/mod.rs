//! Command-line surface: argument definitions and the workflows they drive.

pub mod orchestration;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "module-release",
    version,
    about = "Build, version and tag a module for release"
)]
pub struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project directory"
    )]
    pub project: PathBuf,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Remove stale output, then copy static files into the dist folder
    Build,

    /// Remove stale build output from the dist folder
    Clean,

    /// Copy static files now and again whenever the manifest changes
    Watch,

    /// Link the dist folder into the user data directory
    Link {
        #[arg(long, help = "Remove the link instead of creating it")]
        remove: bool,
    },

    /// Bump the manifest version and rewrite its URLs
    Update {
        #[arg(help = "X.Y.Z, major, minor or patch (default: version in package.json)")]
        version: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Update the manifest, then commit and tag the release
    Publish {
        #[arg(help = "X.Y.Z, major, minor or patch (default: version in package.json)")]
        version: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },
}
