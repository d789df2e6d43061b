//! Output helpers shared by the CLI commands.
//!
//! Errors, successes and headers are printed the same way by every command,
//! and the captured output of a finished version control command is echoed
//! through [`print_command_output`].
//!
//! # Color Scheme
//! - **Errors**: red prefix, white message
//! - **Usage**: blue headings, bright_black options
//! - **Command output**: stdout as-is, stderr dimmed

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
///
/// # Colors
/// - "✕ Error:" in red
/// - Message in white
/// - Newlines before and after for spacing
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints an error with structured usage information
///
/// # Format
/// ```text
///
/// ✕ Error: <message>.
/// Usage:
///   <usage_pattern1>
///   <usage_pattern2>
///   ...
///
/// Options:
///   <option1>  <description1>
///   <option2>  <description2>
///   ...
///
/// ```
///
/// # Colors
/// - Error prefix in red
/// - Message in white
/// - Usage patterns in blue
/// - Options in bright_black (muted)
pub fn print_error_with_structured_usage(
    message: &str,
    usage_patterns: &[&str],
    options: &[(&str, &str)],
) {
    println!("\n{} {}.\n", "✕ Error:".red(), message.white());
    println!("{}", "Usage:".blue());

    for pattern in usage_patterns {
        println!("  {}", pattern.white());
    }

    if !options.is_empty() {
        println!("\n{}", "Options:".blue());
        for (flag, description) in options {
            println!("  {}  {}", flag.bright_black(), description.bright_black());
        }
    }

    println!();
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
///
/// ```
///
/// # Colors
/// - Checkmark in green, message in white
/// - Newlines before and after for spacing
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
///
/// # Format
/// ```text
///
/// <message>
///
/// ```
///
/// # Colors
/// - Message in white
/// - Newlines before and after for spacing
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Echo what a finished command printed. Cancelled commands have no output.
pub fn print_command_output(stdout: Option<&str>, stderr: Option<&str>) {
    if let Some(stdout) = stdout.map(str::trim_end).filter(|s| !s.is_empty()) {
        println!("{stdout}");
    }
    if let Some(stderr) = stderr.map(str::trim_end).filter(|s| !s.is_empty()) {
        println!("{}", stderr.bright_black());
    }
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
///
/// # Colors
/// - Header in white
/// - Newlines before and after for spacing
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}
