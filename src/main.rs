use clap::Parser;
use pldiff::archive;
use pldiff::cli::{ArchivesArgs, Cli, Command, DumpArgs, LocalArgs, UpstreamArgs};
use pldiff::config::{Config, FileConfig};
use pldiff::fetch::{self, YtDlp};
use pldiff::prompt;
use pldiff::reconcile;
use pldiff::report;
use pldiff::snapshot::Snapshot;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "pldiff=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

fn read_archive(path: &Path) -> Snapshot {
    archive::read(path).unwrap_or_else(|e| fail(format!("could not read archive {}: {e}", path.display())))
}

fn write_archive(path: &Path, snapshot: &Snapshot) {
    if let Err(e) = archive::write(path, snapshot) {
        fail(format!("could not write archive {}: {e}", path.display()));
    }
}

fn default_dump_path(config: &Config, dump: &fetch::Dump) -> PathBuf {
    let today = chrono::Local::now().date_naive();
    config.archive_dir_or_current().join(dump.suggested_file_name(today))
}

fn fetch_playlist(config: &Config, playlist_id: &str) -> fetch::Dump {
    let source = YtDlp::new(&config.ytdlp_path, config.browser.clone());
    fetch::dump(&source, playlist_id).unwrap_or_else(|e| fail(e))
}

fn run_comparison(older: &Snapshot, newer: &Snapshot, config: &Config) {
    let comparison = reconcile::compare(older, newer);

    report::print_checkup(&comparison, config);

    if comparison.playlist_mismatch {
        eprintln!("\n{}", report::mismatch_warning(&comparison));
        if !config.assume_yes && !prompt::confirm("Do you wish to continue anyway?") {
            eprintln!("Aborted.");
            std::process::exit(1);
        }
    }

    if comparison.chronology_reversed {
        eprintln!("\n{}", report::reversed_warning());
    }

    report::print(&comparison, config);

    if !config.json_output
        && !config.assume_yes
        && !comparison.summary.is_empty()
        && prompt::confirm("\nShow instructions on what to do next?")
    {
        print!("{}", report::table::render_instructions(&comparison.summary));
    }
}

fn dump(args: DumpArgs, file: &FileConfig) {
    let config = Config::from_dump_args(&args, file).unwrap_or_else(|e| fail(e));

    println!("Fetching playlist {}...", args.id);
    let dump = fetch_playlist(&config, &args.id);

    let path = args.output.clone().unwrap_or_else(|| default_dump_path(&config, &dump));
    write_archive(&path, &dump.snapshot);

    println!(
        "Archived {} entries ({} unavailable) to {}",
        dump.snapshot.entries.len(),
        dump.snapshot.unavailable_count(),
        path.display()
    );
}

fn upstream(args: UpstreamArgs, file: &FileConfig) {
    let config = Config::from_upstream_args(&args, file).unwrap_or_else(|e| fail(e));

    let base_path = match (&args.base, &args.id) {
        (Some(base), _) => base.clone(),
        (None, Some(id)) => {
            let dir = config.archive_dir_or_current();
            match archive::latest_for(&dir, id) {
                Some(found) => found.path,
                None => fail(format!("no archive of playlist {id} found in {}", dir.display())),
            }
        }
        (None, None) => fail("either --base or --id must be given"),
    };

    let older = read_archive(&base_path);
    if !config.json_output {
        println!("Read archive {}", base_path.display());
    }

    let playlist_id = args.id.clone().unwrap_or_else(|| older.playlist_id.clone());
    if !config.json_output {
        println!("Fetching playlist {playlist_id}...");
    }
    let dump = fetch_playlist(&config, &playlist_id);

    if let Some(save) = &args.save {
        let path = save.clone().unwrap_or_else(|| default_dump_path(&config, &dump));
        write_archive(&path, &dump.snapshot);
        if !config.json_output {
            println!("Saved fetched playlist to {}", path.display());
        }
    }

    run_comparison(&older, &dump.snapshot, &config);
}

fn local(args: LocalArgs, file: &FileConfig) {
    let config = Config::from_local_args(&args, file).unwrap_or_else(|e| fail(e));

    let older = read_archive(&args.base);
    let newer = read_archive(&args.with);

    run_comparison(&older, &newer, &config);
}

fn archives(args: ArchivesArgs, file: &FileConfig) {
    let config = Config::from_archives_args(&args, file).unwrap_or_else(|e| fail(e));
    let dir = config.archive_dir_or_current();

    if !dir.is_dir() {
        fail(format!("{} is not a directory", dir.display()));
    }

    print!("{}", report::table::render_archives(&archive::list(&dir)));
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = FileConfig::load().unwrap_or_else(|e| fail(e));

    match cli.command {
        Command::Dump(args) => dump(args, &file),
        Command::Upstream(args) => upstream(args, &file),
        Command::Local(args) => local(args, &file),
        Command::Archives(args) => archives(args, &file),
    }
}
