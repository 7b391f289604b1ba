//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render rows as a rounded table
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print a section heading with an underline
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(60));
}

/// Format a demand figure with thousands separators
pub fn format_quantity(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Color a load percentage relative to the configured ceiling
pub fn color_load(load_percent: u32, max_load_percent: f64) -> String {
    let formatted = format!("{}%", load_percent);
    let load = f64::from(load_percent);
    if load > max_load_percent {
        formatted.red().to_string()
    } else if load >= max_load_percent * 0.8 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

/// Render a yes/no flag
pub fn format_flag(enabled: bool) -> String {
    if enabled {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity_groups_thousands() {
        assert_eq!(format_quantity(0.0), "0");
        assert_eq!(format_quantity(999.0), "999");
        assert_eq!(format_quantity(22_500.0), "22,500");
        assert_eq!(format_quantity(1_234_567.4), "1,234,567");
        assert_eq!(format_quantity(-1_500.0), "-1,500");
    }

    #[test]
    fn test_color_load_keeps_value() {
        colored::control::set_override(false);
        assert_eq!(color_load(45, 85.0), "45%");
        assert_eq!(color_load(90, 85.0), "90%");
    }
}
