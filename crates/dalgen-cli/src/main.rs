use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dalgen_core::{Config, ImportSpec, SchemaBuilder};
use dalgen_document::Document;
use dalgen_naming::{Case, Naming};

/// dalgen - schema definitions and identifier naming
#[derive(Parser)]
#[command(name = "dalgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dalgen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every rendering of one or more identifiers
    Name {
        /// Raw identifiers
        #[arg(required = true)]
        identifiers: Vec<String>,

        /// Print renderings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a definition file and list its tables in dependency order
    Check {
        /// Definition file
        definition: PathBuf,
    },

    /// Rewrite a definition file in canonical form
    Normalize {
        /// Definition file
        definition: PathBuf,

        /// Output file (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a definition file from a TOML table description
    Import {
        /// Import description (TOML)
        spec: PathBuf,

        /// Definition file to write
        #[arg(short, long, default_value = "definition.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;
    let naming = config
        .load_naming()
        .context("Failed to load dictionaries")?;

    match cli.command {
        Commands::Name { identifiers, json } => name_command(&naming, &identifiers, json),
        Commands::Check { definition } => check_command(&naming, &definition, cli.verbose),
        Commands::Normalize { definition, output } => {
            let output = output.unwrap_or_else(|| definition.clone());
            normalize_command(&config, &naming, &definition, &output)
        }
        Commands::Import { spec, output } => import_command(&config, &naming, &spec, &output),
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let mut config = if let Some(config_path) = path {
        Config::from_file(config_path)?
    } else if Path::new("dalgen.toml").exists() {
        Config::from_file(Path::new("dalgen.toml"))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    config.apply_env();
    tracing::debug!(
        dictionaries = ?config.dictionaries,
        root = %config.project_root.display(),
        "loaded config"
    );

    if verbose {
        eprintln!(
            "{} {} + {}",
            "Dictionaries:".cyan(),
            config.dictionaries.primary.display(),
            config.dictionaries.supplementary.display()
        );
    }

    Ok(config)
}

/// Name command - print the renderings of each identifier
fn name_command(naming: &Naming, identifiers: &[String], json: bool) -> Result<()> {
    let names = identifiers
        .iter()
        .map(|raw| naming.string_to_name(raw))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let renderings: Vec<_> = names.iter().map(|n| n.renderings()).collect();
        println!("{}", serde_json::to_string_pretty(&renderings)?);
        return Ok(());
    }

    for name in &names {
        println!("{}", name.raw().bold());
        println!("  {:<12} {}", "tokens".dimmed(), name.tokens().join(" "));
        for case in Case::ALL {
            println!("  {:<12} {}", case.as_str().dimmed(), name.render(case));
        }
    }

    Ok(())
}

/// Check command - validate a definition file
fn check_command(naming: &Naming, definition: &Path, verbose: bool) -> Result<()> {
    let document = Document::for_schema()?;
    let database = document
        .load(definition, naming)
        .with_context(|| format!("Failed to load {}", definition.display()))?;

    println!(
        "{} {} ({} tables)",
        "✓".green(),
        database.name.pascal().bold(),
        database.tables.len()
    );

    for table in database.ordered_tables() {
        println!(
            "  {} {} fields, {} keys, {} queries",
            table.name.pascal().cyan(),
            table.fields.len(),
            table.keys.len(),
            table.custom_queries.len()
        );

        if verbose {
            for field in &table.fields {
                println!("    {}", field);
            }
            for key in table.pk.iter().chain(&table.keys) {
                println!("    {}", key);
            }
        }
    }

    Ok(())
}

/// Normalize command - load and rewrite a definition file
fn normalize_command(
    config: &Config,
    naming: &Naming,
    definition: &Path,
    output: &Path,
) -> Result<()> {
    let document = Document::for_schema()?;
    let database = document
        .load(definition, naming)
        .with_context(|| format!("Failed to load {}", definition.display()))?;

    document.save(output, &database, config.document.pretty)?;
    println!("{} {}", "Wrote".green(), output.display());
    Ok(())
}

/// Import command - build a definition from a TOML description
fn import_command(config: &Config, naming: &Naming, spec: &Path, output: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(spec)
        .with_context(|| format!("Failed to read {}", spec.display()))?;
    let spec = ImportSpec::from_toml(&contents)?;

    let database = SchemaBuilder::new(naming).database(&spec)?;

    let document = Document::for_schema()?;
    document.save(output, &database, config.document.pretty)?;
    println!(
        "{} {} ({} tables) to {}",
        "Imported".green(),
        database.name.pascal().bold(),
        database.tables.len(),
        output.display()
    );
    Ok(())
}
