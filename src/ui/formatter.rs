//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::cli::orchestration::UpdateOutcome;
use crate::dist::LinkOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show the version transition and the URLs written into the manifest.
pub fn display_version_change(outcome: &UpdateOutcome) {
    println!("\n{}", style("Version Change:").bold());
    println!("  From: {}", style(&outcome.previous).red());
    println!("  To:   {}", style(&outcome.version).green());
    println!("  Download: {}", outcome.download_url);
}

/// Describe what `publish --dry-run` would do.
pub fn display_publish_plan(outcome: &UpdateOutcome) {
    display_status("Dry run:");
    display_success(&format!(
        "  Step 1: write {} to the manifest",
        outcome.version
    ));
    display_success(&format!(
        "  Step 2: commit tracked files as '{}'",
        outcome.commit_message()
    ));
    display_success(&format!(
        "  Step 3: create tag {} ('{}')",
        outcome.tag_name(),
        outcome.tag_message()
    ));
}

pub fn display_link_outcome(outcome: &LinkOutcome) {
    match outcome {
        LinkOutcome::Created(path) => {
            display_success(&format!("Linked dist folder to {}", path.display()))
        }
        LinkOutcome::AlreadyLinked(path) => {
            display_status(&format!("{} is already linked", path.display()))
        }
        LinkOutcome::Removed(path) => {
            display_success(&format!("Removed link {}", path.display()))
        }
        LinkOutcome::NotLinked(path) => {
            display_status(&format!("Nothing to remove at {}", path.display()))
        }
    }
}
