//! Colored terminal output for chart commands
//!
//! `colored` honours NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: impl Display) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: impl Display) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Zoning explanation for a refused move, printed under the error line.
pub fn zoning(msg: impl Display) {
    eprintln!("{}: {}", "zoning".magenta().bold(), msg);
}

pub fn success(msg: impl Display) {
    println!("{} {}", "✓".green(), msg);
}

/// `label: value` with a green label (share ids, config paths).
pub fn action(label: &str, msg: impl Display) {
    println!("{}: {}", label.green(), msg);
}

pub fn header(msg: impl Display) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn detail(msg: impl Display) {
    println!("  {}", msg);
}

/// One department line: name, head count and an optional layout hint.
pub fn department(name: &str, count: usize, layout: Option<&str>) {
    let count = format!("{count:>3}").bold();
    match layout {
        Some(layout) => println!("{:<24} {} {}", name.green(), count, layout.dimmed()),
        None => println!("{:<24} {}", name.green(), count),
    }
}

/// Uncolored payload: trees and `#data=` fragments.
pub fn info(msg: impl Display) {
    println!("{}", msg);
}
