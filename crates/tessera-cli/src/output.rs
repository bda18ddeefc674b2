use colored::Colorize;

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints a machine-readable result on stdout.
pub fn print_value(value: &str) {
    println!("{value}");
}
