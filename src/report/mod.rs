pub mod table;
pub mod json;

use crate::config::Config;
use crate::reconcile::Comparison;

pub fn print(comparison: &Comparison, config: &Config) {
    if config.json_output {
        println!("{}", json::render(comparison));
    } else {
        print!("{}", table::render(comparison, config.archive_interval));
    }
}

pub fn print_checkup(comparison: &Comparison, config: &Config) {
    if !config.json_output {
        print!("{}", table::render_checkup(comparison));
    }
}

pub fn mismatch_warning(comparison: &Comparison) -> String {
    format!(
        "warning: playlist IDs do not match ({} vs {}).\n  The two snapshots do not appear to be from the same playlist.",
        comparison.older.playlist_id, comparison.newer.playlist_id
    )
}

pub fn reversed_warning() -> &'static str {
    "warning: archive dates reversed.\n  The older snapshot is not older than the newer one, pass the oldest archive as --base."
}
