mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rhtmx_navigator::NavigatorConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rhtmx-nav")]
#[command(version, about = "Match pathnames against route patterns and build paths", long_about = None)]
struct Cli {
    /// Configuration file (default: ./rhtmx-nav.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a pathname against one or more patterns and print the result as JSON
    Match {
        /// Pathname to match (e.g. /users/42)
        pathname: String,

        /// Patterns tried in order (e.g. /users/:id)
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Require the whole pathname to match
        #[arg(long)]
        exact: bool,

        /// Treat trailing slashes as significant
        #[arg(long)]
        strict: bool,

        /// Match case-sensitively
        #[arg(long)]
        sensitive: bool,
    },

    /// Build a path from a pattern and name=value parameters
    Generate {
        /// Pattern to fill (e.g. /users/:id)
        pattern: String,

        /// Parameter values (e.g. id=42)
        params: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NavigatorConfig::load(path)?,
        None => NavigatorConfig::load_default()?,
    };

    let output = match cli.command {
        Commands::Match {
            pathname,
            patterns,
            exact,
            strict,
            sensitive,
        } => {
            let flags = commands::matching::Flags {
                exact,
                strict,
                sensitive,
            };
            commands::matching::execute(&config, &pathname, patterns, flags)?
        }
        Commands::Generate { pattern, params } => {
            commands::generate::execute(&config, &pattern, &params)?
        }
    };

    println!("{output}");
    Ok(())
}
