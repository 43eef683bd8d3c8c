//! Console output utilities.

use std::io::{self, BufRead, Write};
use std::path::Path;

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     DeviantArt Downloader                             ║
║     Galleries, folders and collections to disk        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(
    account: &str,
    download_mode: &str,
    api: &str,
    download_dir: &Path,
    concurrency: Option<usize>,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Account:   {}", account);
    println!("  Mode:      {}", download_mode);
    println!("  API:       {}", api);
    println!("  Directory: {}", download_dir.display());
    if let Some(concurrency) = concurrency {
        println!("  Parallel:  {}", concurrency);
    }
    println!();
}

/// Print one folder line of the folder listing.
pub fn print_folder_entry(name: &str, folder_id: &str) {
    println!("{} [{}]", style(name).bold(), folder_id);
}

/// Ask a yes/no question on stdin. Only `y` or `Y` counts as yes.
pub fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{} [Y/N]: ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
