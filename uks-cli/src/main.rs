//! UKS CLI
//!
//! Command-line tool for working with 160-bit object keys.
//!
//! # Commands
//! - `inspect` - Decode the fields of a key
//! - `replicas` - List the replica set of a key
//! - `next` / `prev` - Step through the replica set
//! - `between` - Test ring membership
//! - `overlap` - Intersect two key ranges
//! - `cos` - Re-encode a key under a class of service
//! - `arc` - Build an erasure-coded key from a hash
//! - `random` - Generate random keys
//! - `txid` - Generate transaction ids
//! - `config` - Show or edit configuration
//!
//! # Configuration
//! Config file: ~/.uks/config.toml

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod symbols;

use commands::{arc, cos, ids, inspect, range, replicas};
use config::OutputFormat;

#[derive(Parser)]
#[command(name = "uks")]
#[command(about = "Object key toolkit: replicas, ranges and class-of-service transforms")]
#[command(version)]
struct Cli {
    /// Print results as JSON (overrides config file)
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode class, replica and RAIN fields of a key
    Inspect {
        /// Key in hex
        key: String,
    },

    /// List the replicas or fragments of a key
    Replicas {
        /// Key in hex
        key: String,

        /// Include the key itself in the listing
        #[arg(short, long)]
        include_self: bool,

        /// Treat class 1 as the three-replica layout (default: only for keys ending in 12)
        #[arg(long)]
        translate_class1: Option<bool>,
    },

    /// Show the next replica of a key
    Next {
        /// Key in hex
        key: String,
    },

    /// Show the previous replica of a key
    Prev {
        /// Key in hex
        key: String,
    },

    /// Check whether a key lies in [lo, hi] on the ring
    Between {
        /// Key in hex
        key: String,
        /// Range start
        lo: String,
        /// Range end
        hi: String,
    },

    /// Intersect two key ranges
    Overlap {
        /// First range start
        a_start: String,
        /// First range end
        a_end: String,
        /// Second range start
        b_start: String,
        /// Second range end
        b_end: String,
    },

    /// Re-encode a key under a class of service ("0".."7" or "ARC<k>+<m>")
    Cos {
        /// Class of service
        spec: String,

        /// Key in hex
        key: String,

        /// Ring divisor for ARC specs (default: [arc] schema from config)
        #[arg(short, long)]
        schema: Option<u32>,
    },

    /// Build an erasure-coded key from a content hash
    Arc {
        /// Content hash in hex (at most 88 bits)
        hash: String,

        /// Object version
        #[arg(long)]
        version: Option<u64>,

        /// Service id
        #[arg(long)]
        sid: Option<u32>,

        /// Data fragments
        #[arg(short)]
        k: Option<u32>,

        /// Coding fragments
        #[arg(short)]
        m: Option<u32>,

        /// Ring divisor
        #[arg(long)]
        schema: Option<u32>,

        /// Fragment number
        #[arg(long)]
        replica: Option<u32>,

        /// List every fragment of the key
        #[arg(short, long)]
        all: bool,
    },

    /// Generate random keys
    Random {
        /// Fixed class (default: any plain class 0-5)
        #[arg(short, long, conflicts_with = "arc")]
        class: Option<u8>,

        /// Erasure-coded key with the configured ARC parameters
        #[arg(long)]
        arc: bool,

        /// Number of keys
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Generate transaction ids
    Txid {
        /// Number of ids
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Start from this id instead of a random one
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., arc.schema, output.format)
        key: String,
        /// Value to set
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration from ~/.uks/config.toml
    let cfg = config::load_config();

    // --json overrides config file
    let format = if cli.json {
        OutputFormat::Json
    } else {
        cfg.output.format
    };

    match cli.command {
        Commands::Inspect { key } => {
            inspect::run(inspect::InspectConfig { key, format })?;
        }

        Commands::Replicas {
            key,
            include_self,
            translate_class1,
        } => {
            let config = replicas::ReplicasConfig {
                key,
                include_self,
                translate_class1,
                format,
            };
            replicas::run(config)?;
        }

        Commands::Next { key } => {
            replicas::run_step(&key, replicas::Step::Next, format)?;
        }

        Commands::Prev { key } => {
            replicas::run_step(&key, replicas::Step::Prev, format)?;
        }

        Commands::Between { key, lo, hi } => {
            range::run_between(range::BetweenConfig {
                key,
                lo,
                hi,
                format,
            })?;
        }

        Commands::Overlap {
            a_start,
            a_end,
            b_start,
            b_end,
        } => {
            range::run_overlap(range::OverlapConfig {
                a: (a_start, a_end),
                b: (b_start, b_end),
                format,
            })?;
        }

        Commands::Cos { spec, key, schema } => {
            let config = cos::CosConfig {
                spec,
                key,
                schema: schema.or(Some(cfg.arc.schema)),
                format,
            };
            cos::run(config)?;
        }

        Commands::Arc {
            hash,
            version,
            sid,
            k,
            m,
            schema,
            replica,
            all,
        } => {
            let config = arc::ArcConfig {
                hash,
                defaults: cfg.arc.options(),
                version,
                service_id: sid,
                data_fragments: k,
                coding_fragments: m,
                schema,
                replica,
                all_fragments: all,
                format,
            };
            arc::run(config)?;
        }

        Commands::Random { class, arc, count } => {
            let kind = match (class, arc) {
                (_, true) => ids::RandomKind::Arc(cfg.arc.options()),
                (Some(class), false) => ids::RandomKind::Class(class),
                (None, false) => ids::RandomKind::Plain,
            };
            ids::run_random(ids::RandomConfig {
                kind,
                count,
                format,
            })?;
        }

        Commands::Txid { count, seed } => {
            ids::run_txid(count, seed, format)?;
        }

        Commands::Config { command } => {
            handle_config_command(command)?;
        }
    }

    Ok(())
}

/// Handle config subcommands
fn handle_config_command(command: Option<ConfigCommands>) -> Result<()> {
    use console::style;

    match command {
        None | Some(ConfigCommands::Show) => {
            let cfg = config::load_config();
            println!();
            println!("{}", style("UKS Configuration").bold().underlined());
            println!();
            println!("{}", style("[arc]").cyan());
            println!("  service_id = {}", cfg.arc.service_id);
            println!("  data_fragments = {}", cfg.arc.data_fragments);
            println!("  coding_fragments = {}", cfg.arc.coding_fragments);
            println!("  schema = {}", cfg.arc.schema);
            println!("  version = {}", cfg.arc.version);
            println!();
            println!("{}", style("[output]").cyan());
            let format = match cfg.output.format {
                OutputFormat::Text => "text",
                OutputFormat::Json => "json",
            };
            println!("  format = \"{}\"", format);
            println!();

            if let Err(e) = cfg.arc.options().validate() {
                println!(
                    "{} [arc] defaults are not a valid key shape: {}",
                    style(symbols::WARN).yellow(),
                    e
                );
                println!();
            }

            if let Ok(path) = config::config_file_path() {
                println!("{} {}", style("Config file:").dim(), path.display());
                if !path.exists() {
                    println!(
                        "{} Run '{}' to create it",
                        style("(not created yet)").yellow(),
                        style("uks config init").green()
                    );
                }
            }
        }

        Some(ConfigCommands::Path) => {
            if let Ok(path) = config::config_file_path() {
                println!("{}", path.display());
            }
        }

        Some(ConfigCommands::Init { force }) => {
            let path = config::config_file_path()?;
            if path.exists() && !force {
                println!(
                    "{} Config file already exists at {}",
                    style(symbols::WARN).yellow(),
                    path.display()
                );
                println!("Use --force to overwrite");
                return Ok(());
            }

            config::save_config(&config::UksConfig::default())?;
            println!(
                "{} Config file created at {}",
                style(symbols::CHECK).green(),
                path.display()
            );
        }

        Some(ConfigCommands::Set { key, value }) => {
            let mut cfg = config::load_config();
            cfg.set(&key, &value)?;
            config::save_config(&cfg)?;
            println!("{} Configuration updated", style(symbols::CHECK).green());
        }
    }

    Ok(())
}
