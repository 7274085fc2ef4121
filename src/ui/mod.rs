//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

pub mod formatter;

pub use formatter::{
    display_error, display_link_outcome, display_publish_plan, display_status, display_success,
    display_version_change,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive). Default is "no" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("  YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }
}
