//! # kiper demo application
//!
//! A sample CLI tool that shows how to wire [kiper](https://docs.rs/kiper)
//! into an application. It exists to demonstrate and manually verify the
//! merge, not to do anything useful.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example kiper_demo
//! cargo run --example kiper_demo -- --help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                        |
//! |--------------------------|---------------------------------------------------------------------------|
//! | Flag defaults            | `cargo run --example kiper_demo`                                          |
//! | Explicit flags           | `cargo run --example kiper_demo -- --server.port 8080 --verbose`          |
//! | Config file (cwd)        | Create `kiper-demo.json` in cwd, then run                                 |
//! | Config file (flag)       | `cargo run --example kiper_demo -- --config ./demo.yaml`                  |
//! | Env var override         | `KIPER_DEMO_DISPLAY_COLOR=red cargo run --example kiper_demo`             |
//! | Sequence from env        | `KIPER_DEMO_DISPLAY_TAGS="a, b, c" cargo run --example kiper_demo`        |
//! | Custom value validation  | `cargo run --example kiper_demo -- --server.address not-an-ip`            |
//! | Single key               | `cargo run --example kiper_demo -- --key server.port`                     |
//! | Merge logs               | `cargo run --example kiper_demo -- --verbose` or `RUST_LOG=kiper=debug`   |

mod config;

use kiper::{Kiper, KiperError, SearchPath};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

fn make_kiper() -> Kiper {
    Kiper::new("kiper-demo", "A sample CLI app for showcasing kiper")
        .search_paths(vec![
            SearchPath::Platform,
            SearchPath::Home(".kiper-demo"),
            SearchPath::Cwd,
        ])
        .config_file_flag("config", "path to an extra config file", "")
        .env_prefix("KIPER_DEMO")
}

/// Logs emitted during the merge need a subscriber before flags are parsed,
/// so `--verbose` is read from the raw arguments.
fn init_tracing(args: &[String]) {
    let verbose = args.iter().any(|a| a == "--verbose" || a == "--verbose=true");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "kiper=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn print_all(config: &mut DemoConfig) -> Result<(), KiperError> {
    let color = ansi_color_code(&config.display.color).to_string();
    println!("{color}{}{RESET}", config.name);
    if !config.display.tags.is_empty() {
        println!("[{}]", config.display.tags.join("] ["));
    }
    println!();

    let entries = kiper::list_values(config)?;
    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &entries {
        println!("{color}{key:<max_key_len$}{RESET}  {value}");
    }
    Ok(())
}

fn run(args: Vec<String>) -> Result<(), KiperError> {
    let mut config = DemoConfig::default();
    make_kiper().parse(&mut config, args)?;

    match config.key.clone() {
        Some(key) => {
            let color = ansi_color_code(&config.display.color).to_string();
            let value = kiper::get_value(&mut config, &key)?;
            println!("{color}{key}{RESET}  {value}");
            Ok(())
        }
        None => print_all(&mut config),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_tracing(&args);

    if let Err(e) = run(args) {
        match e {
            KiperError::Flags(err) => err.exit(),
            other => {
                eprintln!("Failed to load config:\n{other}");
                std::process::exit(1);
            }
        }
    }
}
