//! CLI entry point for the semantic component classifier.
//!
//! Reads a snapshot file, classifies it, and prints the components as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Classify a snapshot; the rule set follows the snapshot's process_name
//! sc-classify --snapshot window.json
//!
//! # Force the rules of another application
//! sc-classify --snapshot window.json --app explorer.exe
//!
//! # Use a specific configuration file
//! sc-classify --snapshot window.json --config ./config.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::process;

use semantic_components::snapshot::SnapshotFile;
use semantic_components::{AppKind, ComponentAnalyzer, Config};

/// Parsed command line options
#[derive(Debug, Clone, PartialEq, Default)]
struct Options {
    snapshot: Option<PathBuf>,
    app: Option<String>,
    config: Option<PathBuf>,
    help: bool,
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();

    if args.is_empty() {
        options.help = true;
        return Ok(options);
    }

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--snapshot" | "-s" => {
                let path = iter
                    .next()
                    .ok_or("--snapshot requires a file argument (e.g., --snapshot window.json)")?;
                options.snapshot = Some(PathBuf::from(path));
            }
            "--app" | "-a" => {
                let app = iter
                    .next()
                    .ok_or("--app requires a process name argument (e.g., --app explorer.exe)")?;
                options.app = Some(app.clone());
            }
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or("--config requires a file argument")?;
                options.config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => options.help = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    if !options.help && options.snapshot.is_none() {
        return Err("--snapshot is required".into());
    }

    Ok(options)
}

/// Print help message to stdout
fn print_help() {
    println!("sc-classify - Partition an accessibility snapshot into semantic components");
    println!();
    println!("USAGE:");
    println!("    sc-classify --snapshot <FILE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -s, --snapshot <FILE>    Snapshot JSON: {{ \"process_name\": ..., \"elements\": [...] }}");
    println!("    -a, --app <PROCESS>      Use the rules for this process instead of the snapshot's");
    println!("    -c, --config <FILE>      Configuration file (default: {})", Config::default_config_path().display());
    println!("    -h, --help               Print this help message");
    println!();
    println!("APPLICATIONS:");
    println!("    explorer.exe             Windows File Explorer");
    println!("    Code.exe, codium         Visual Studio Code and forks");
    println!("    anything else            Title bar only");
    println!();
    println!("OUTPUT:");
    println!("    All output is JSON formatted to stdout.");
    println!("    Errors are written to stderr.");
}

/// Classify the snapshot and print the report
fn handle_classify(options: &Options, config: &Config) -> i32 {
    let Some(path) = options.snapshot.as_ref() else {
        eprintln!("[SC-CLASSIFY] No snapshot given");
        return 1;
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("[SC-CLASSIFY] Could not read {}: {}", path.display(), e);
            return 1;
        }
    };

    let snapshot: SnapshotFile = match serde_json::from_str(&contents) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("[SC-CLASSIFY] Invalid snapshot {}: {}", path.display(), e);
            return 1;
        }
    };

    let analyzer = match ComponentAnalyzer::from_config(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("[SC-CLASSIFY] Invalid rule configuration: {}", e);
            return 1;
        }
    };

    let app_kind = match options.app.as_deref() {
        Some(app) => AppKind::from_process_name(app),
        None => snapshot.app_kind(),
    };

    eprintln!(
        "[SC-CLASSIFY] Classifying {} elements as {}",
        snapshot.elements.len(),
        app_kind
    );

    let report = analyzer.analyze(&snapshot.elements, app_kind).report();
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("[SC-CLASSIFY] Error serializing output: {}", e);
            1
        }
    }
}

/// Load the configuration named on the command line, strictly, or the
/// default file with fallback to defaults.
fn load_config(options: &Options) -> Result<Config, String> {
    match options.config.as_ref() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
            Config::from_toml_str(&contents)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))
        }
        None => Ok(Config::load()),
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            process::exit(1);
        }
    };

    if options.help {
        print_help();
        process::exit(0);
    }

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.general.log_level.as_str()),
    )
    .init();

    log::debug!("Executing with options: {:?}", options);

    let exit_code = handle_classify(&options, &config);

    log::debug!("Exiting with code: {}", exit_code);

    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_empty_shows_help() {
        assert!(parse_args(&[]).unwrap().help);
    }

    #[test]
    fn test_parse_args_all_options() {
        let options = parse_args(&args(&[
            "--snapshot",
            "w.json",
            "-a",
            "explorer.exe",
            "--config",
            "c.toml",
        ]))
        .unwrap();

        assert_eq!(options.snapshot, Some(PathBuf::from("w.json")));
        assert_eq!(options.app.as_deref(), Some("explorer.exe"));
        assert_eq!(options.config, Some(PathBuf::from("c.toml")));
        assert!(!options.help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--snapshot"])).is_err());
        assert!(parse_args(&args(&["--app", "code"])).is_err());
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
    }
}
