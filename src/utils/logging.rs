// file: src/utils/logging.rs
// description: Tracing subscriber initialization with optional ANSI coloring

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_keyword(keyword: &str, similarity: f32) -> String {
    format!(
        "{} {}",
        keyword.bold(),
        format!("({:.1}%)", similarity * 100.0).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_helpers_keep_message() {
        colored::control::set_override(false);
        assert_eq!(format_success("saved"), "✓ saved");
        assert_eq!(format_warning("no match"), "⚠ no match");
        assert_eq!(format_keyword("large datasets", 0.8123), "large datasets (81.2%)");
        colored::control::unset_override();
    }
}
