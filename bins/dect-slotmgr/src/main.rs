use clap::Parser;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use dect_config::{SharedConfig, toml_config};
use dect_core::debug;
use dect_mac::MacSlotMgr;

mod commands;
use commands::{Command, parse_line};

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> SharedConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

fn run_command(mgr: &mut MacSlotMgr, cmd: Command) {
    match cmd {
        Command::Admit { client_id, num_slots } => {
            let defaults = mgr.config().config().client_defaults;
            let result = match (num_slots, defaults) {
                (Some(n), _) => mgr.admit_client(client_id, n),
                (None, Some(tdma)) => mgr.admit_client_tdma(client_id, &tdma),
                (None, None) => {
                    tracing::error!(client = client_id, "no slot count given and no client_defaults configured");
                    return;
                }
            };
            match result {
                Ok(range) => tracing::info!(client = client_id, "admitted with slots {}", range),
                Err(e) => tracing::warn!(client = client_id, "denied: {}", e),
            }
        }
        Command::Release { client_id } => match mgr.teardown_client(client_id) {
            Some(range) => tracing::info!(client = client_id, "released slots {}", range),
            None => tracing::info!(client = client_id, "released, held no slots"),
        },
        Command::Status => {
            tracing::info!("status: {}", mgr.status());
        }
    }
}

fn run_script<R: BufRead>(mgr: &mut MacSlotMgr, reader: R) -> io::Result<()> {
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(cmd)) => run_command(mgr, cmd),
            Ok(None) => {}
            Err(e) => tracing::error!("line {}: {}", lineno + 1, e),
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DECT MAC frame slot manager",
    long_about = "Admits and releases clients on a TDMA frame using the provided TOML configuration, driven by a command script"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with frame and client parameters")]
    config: String,

    #[arg(
        short = 's',
        long = "script",
        help = "Command script: one of [ admit <id> [slots] | release <id> | status ] per line. Reads stdin if omitted"
    )]
    script: Option<String>,
}

fn main() {
    eprintln!("[+] DECT MAC slot manager");

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.config().debug_log.clone());

    tracing::info!(
        "frame of {} slots, up to {} clients",
        cfg.config().frame.max_slots,
        cfg.config().clients.max_clients
    );
    let mut mgr = MacSlotMgr::new(cfg);

    let result = match args.script {
        Some(path) => match File::open(&path) {
            Ok(f) => run_script(&mut mgr, BufReader::new(f)),
            Err(e) => {
                eprintln!("Failed to open script {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => run_script(&mut mgr, io::stdin().lock()),
    };

    if let Err(e) = result {
        eprintln!("Failed to read commands: {}", e);
        std::process::exit(1);
    }
    tracing::info!("final status: {}", mgr.status());
}
