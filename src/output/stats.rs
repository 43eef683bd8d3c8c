//! Statistics reporting.

use console::style;

use crate::download::{DownloadState, GlobalState};

/// Print statistics for a single destination.
pub fn print_destination_stats(state: &DownloadState) {
    println!();
    println!("{}", style(format!("Statistics for {}:", state.label)).bold());
    println!("  Pages:            {}", state.pages);
    println!("  Downloaded:       {}", state.downloaded);
    println!("  Already on disk:  {}", state.already_existing);
    println!("  Not downloadable: {}", state.not_downloadable);
    println!("  Missing metadata: {}", state.missing_metadata);
    if state.interrupted > 0 {
        println!("  Interrupted:      {}", state.interrupted);
    }
    if state.failed > 0 {
        println!("  Failed:           {}", style(state.failed).red());
    }
}

/// Print run totals and elapsed time.
pub fn print_global_stats(state: &GlobalState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    println!("  Destinations: {}", state.destinations_processed);
    println!("  Downloaded:   {}", style(state.downloaded).green());
    println!("  Skipped:      {}", state.skipped);
    if state.failed > 0 {
        println!("  Failed:       {}", style(state.failed).red());
    }
    println!(
        "  scraped in {:.2} seconds!",
        state.elapsed().as_secs_f64()
    );
    println!("{}", style("═".repeat(50)).dim());
}
