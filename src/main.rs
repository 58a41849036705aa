//! uber-pom CLI
//!
//! Entry point for the `uber-pom` command-line tool.

use clap::{Parser, Subcommand};
use serde_json::{json, Map};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uber_pom::config::DEFAULT_CONFIG_FILE;
use uber_pom::descriptor::dedup_text;
use uber_pom::{flatten, Descriptor, DescriptorFormat, EffectiveConfig, Hierarchy, Value};

#[derive(Parser)]
#[command(name = "uber-pom")]
#[command(about = "Flatten a project descriptor hierarchy", version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a descriptor with its parents into one descriptor
    Flatten {
        /// Descriptor to flatten; several files are taken as the hierarchy,
        /// root first
        #[arg(required = true)]
        descriptors: Vec<PathBuf>,

        /// Path to config file (default: uber-pom.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Path whose value in the project itself survives the merge
        #[arg(long)]
        keep: Vec<String>,

        /// Path to clear in the result
        #[arg(long)]
        remove: Vec<String>,

        /// Assignment PATH=VALUE applied to the result
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,

        /// Number of ancestor levels to merge (-1 for all)
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i32>,

        /// Remove duplicated sibling elements from the result
        #[arg(long)]
        dedup: bool,

        /// Output format (toml or json)
        #[arg(long)]
        format: Option<DescriptorFormat>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the effective configuration with its sources and exit
        #[arg(long)]
        print_config: bool,
    },

    /// Print the value at a path
    Get {
        descriptor: PathBuf,
        path: String,
    },

    /// Assign a string value at a path
    Set {
        descriptor: PathBuf,
        path: String,
        value: String,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Clear the value at a path
    Remove {
        descriptor: PathBuf,
        path: String,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Remove duplicated sibling elements from a descriptor file
    Dedup {
        file: PathBuf,

        /// Input and output format (default: from the file extension)
        #[arg(long)]
        format: Option<DescriptorFormat>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Flatten {
            descriptors,
            config,
            keep,
            remove,
            assignments,
            depth,
            dedup,
            format,
            output,
            print_config,
        } => {
            let overrides = cli_overrides(keep, remove, assignments, depth, dedup, format, output);
            run_flatten(&descriptors, config, overrides, print_config);
        }
        Commands::Get { descriptor, path } => {
            run_get(&descriptor, &path);
        }
        Commands::Set {
            descriptor,
            path,
            value,
            output,
        } => {
            run_update(&descriptor, output.as_deref(), |d| d.set(&path, value.as_str()));
        }
        Commands::Remove {
            descriptor,
            path,
            output,
        } => {
            run_update(&descriptor, output.as_deref(), |d| d.remove(&path));
        }
        Commands::Dedup {
            file,
            format,
            output,
        } => {
            run_dedup(&file, format, output.as_deref());
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected PATH=VALUE, got '{}'", s)),
    }
}

/// Build the CLI config layer; flags that were not given are left out
fn cli_overrides(
    keep: Vec<String>,
    remove: Vec<String>,
    assignments: Vec<(String, String)>,
    depth: Option<i32>,
    dedup: bool,
    format: Option<DescriptorFormat>,
    output: Option<PathBuf>,
) -> serde_json::Value {
    let mut layer = Map::new();
    if !keep.is_empty() {
        layer.insert("keep".to_string(), json!(keep));
    }
    if !remove.is_empty() {
        layer.insert("remove".to_string(), json!(remove));
    }
    if !assignments.is_empty() {
        let set: Map<String, serde_json::Value> = assignments
            .into_iter()
            .map(|(path, value)| (path, json!(value)))
            .collect();
        layer.insert("set".to_string(), serde_json::Value::Object(set));
    }
    if dedup {
        layer.insert("remove_duplicates".to_string(), json!(true));
    }
    layer.insert("depth".to_string(), json!(depth));
    layer.insert("format".to_string(), json!(format));
    layer.insert(
        "output".to_string(),
        json!(output.map(|p| p.to_string_lossy().into_owned())),
    );
    serde_json::Value::Object(layer)
}

fn run_flatten(
    descriptors: &[PathBuf],
    config_path: Option<PathBuf>,
    overrides: serde_json::Value,
    print_config: bool,
) {
    if let Some(path) = &config_path {
        if !path.exists() {
            eprintln!("Error loading config: {} not found", path.display());
            process::exit(1);
        }
    }
    let config_path = config_path.unwrap_or_else(|| default_config_path(descriptors));

    let effective = match EffectiveConfig::build(Some(&config_path), Some(overrides)) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    let json = match effective.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(1);
        }
    };
    if print_config {
        println!("{}", json);
        return;
    }
    debug!("Effective config: {}", json);

    let config = match effective.flatten_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    let hierarchy = match load_hierarchy(descriptors) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error loading descriptors: {}", e);
            process::exit(1);
        }
    };

    let report = match flatten(hierarchy, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    emit(&report.text, config.output.as_deref());
    if let Some(path) = &config.output {
        info!("Flattened descriptor saved as '{}'", path.display());
    }
}

/// `uber-pom.toml` in the directory of the descriptor being flattened
fn default_config_path(descriptors: &[PathBuf]) -> PathBuf {
    descriptors
        .last()
        .and_then(|file| file.parent())
        .map_or_else(
            || PathBuf::from(DEFAULT_CONFIG_FILE),
            |dir| dir.join(DEFAULT_CONFIG_FILE),
        )
}

fn load_hierarchy(descriptors: &[PathBuf]) -> Result<Hierarchy, uber_pom::DescriptorError> {
    match descriptors {
        [single] => Hierarchy::discover(single),
        many => {
            let levels = many
                .iter()
                .map(|path| Descriptor::from_file(path))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Hierarchy::from_levels(levels))
        }
    }
}

fn load_descriptor(path: &Path) -> Descriptor {
    match Descriptor::from_file(path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading descriptor: {}", e);
            process::exit(1);
        }
    }
}

fn run_get(descriptor: &Path, path: &str) {
    let descriptor = load_descriptor(descriptor);

    match descriptor.get(path) {
        Ok(Some(Value::Scalar(s))) => println!("{}", s),
        Ok(Some(value)) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing value: {}", e);
                process::exit(1);
            }
        },
        Ok(None) => process::exit(3),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run_update<F>(file: &Path, output: Option<&Path>, update: F)
where
    F: FnOnce(&mut Descriptor) -> Result<bool, uber_pom::PathError>,
{
    let mut descriptor = load_descriptor(file);

    match update(&mut descriptor) {
        Ok(true) => {}
        Ok(false) => warn!("Path not present in {}, nothing changed", file.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }

    let text = DescriptorFormat::from_path(file).and_then(|format| descriptor.to_text(format, false));
    match text {
        Ok(text) => emit(&text, output),
        Err(e) => {
            eprintln!("Error rendering descriptor: {}", e);
            process::exit(1);
        }
    }
}

fn run_dedup(file: &Path, format: Option<DescriptorFormat>, output: Option<&Path>) {
    let result = fs::read_to_string(file)
        .map_err(|e| e.to_string())
        .and_then(|text| {
            let format = match format {
                Some(f) => f,
                None => DescriptorFormat::from_path(file).map_err(|e| e.to_string())?,
            };
            dedup_text(&text, format).map_err(|e| e.to_string())
        });

    match result {
        Ok((text, removed)) => {
            info!("Removed {} duplicated element(s)", removed.len());
            emit(&text, output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Write to `output`, or stdout when none is given
fn emit(text: &str, output: Option<&Path>) {
    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, text) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", text),
    }
}
