// SPDX-FileCopyrightText: © 2024 Hugues Bruant <hugues.bruant@gmail.com>

mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use common::graph::{describe_module_dependencies, to_graphviz_dot, to_json};
use common::orchestrator::{self, ParseOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Dot,
}

/// Static import resolver and dependency-graph builder for a single Python
/// entry-point file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the entry source file.
    entry: PathBuf,

    /// Switch output from the code-generation stub to a dependency graph.
    #[arg(long = "describe-modules", visible_alias = "dm")]
    describe_modules: bool,

    /// Graph serialization format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write output to PATH (parents created as needed); default is stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Enable the persistent standard-library cache at PATH.
    #[arg(long = "cache")]
    cache: Option<PathBuf>,

    /// Do not expand submodules of standard-library packages.
    #[arg(long = "shallow-std")]
    shallow_std: bool,

    /// Raise the log level to DEBUG.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if !cli.entry.exists() {
        anyhow::bail!("entry file does not exist: {}", cli.entry.display());
    }

    let project = orchestrator::parse_project(
        &cli.entry,
        cli.cache.as_deref(),
        ParseOptions {
            shallow_stdlib: cli.shallow_std,
        },
    )
    .context("failed to parse project")?;

    if let Some(cache_path) = &cli.cache {
        if let Err(e) = common::cache::save(cache_path, &project) {
            log::warn!("failed to save cache to {}: {}", cache_path.display(), e);
        }
    }

    if !cli.describe_modules {
        // Code-generation is out of scope for this tool's core contract;
        // the stub preserves the original CLI's "describe vs. generate"
        // switch without implementing the generator itself.
        anyhow::bail!("code generation is not supported; pass --describe-modules");
    }

    let descriptor = describe_module_dependencies(&project);
    let rendered = match cli.format {
        OutputFormat::Json => to_json(&descriptor).context("failed to serialize graph as JSON")?,
        OutputFormat::Dot => to_graphviz_dot(&descriptor),
    };

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
