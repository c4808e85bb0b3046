use clap::Parser;
use librarian::console::{Collaborators, Console, run_session};
use librarian::core::config::{self, CliOverrides};
use librarian::core::state::App;
use librarian::library::JsonStore;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "librarian", about = "Console front desk for a small library")]
struct Args {
    /// Directory holding Patrons.json, Books.json and friends
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {e}");
        Default::default()
    });
    let cli = CliOverrides {
        data_dir: args.data_dir,
        log_file: args.log_file,
        log_level: args.log_level,
    };
    let resolved = config::resolve(&file_config, &cli);

    // File logger keeps the console clean
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("Librarian starting up with data from {}", resolved.data_dir.display());

    let store = match JsonStore::open(&resolved.data_dir) {
        Ok(store) => store.with_policy(resolved.policy),
        Err(e) => {
            log::error!("Could not open library data: {}", e);
            eprintln!("Could not open library data: {e}");
            std::process::exit(1);
        }
    };

    let library = Collaborators {
        patrons: &store,
        loans: &store,
        loan_service: &store,
        patron_service: &store,
        catalog: Some(&store),
    };
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    run_session(&mut App::new(), &library, &mut console)
}
