//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Every command reports through these helpers so messages share one look:
//! red for errors, green for completed mutations, white for everything else.

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints a header followed by one indented entry per line
///
/// # Format
/// ```text
///
/// <header>:
///   <entry>
///   <entry>
/// ```
pub fn print_section<I, S>(header: &str, entries: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    println!("\n{}:", header.white());
    for entry in entries {
        println!("  {}", entry.as_ref().bright_black());
    }
}
