//! `timetab` CLI - Reconstruct weekly timetables from rendered schedule pages

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use timetab::output::{self, OutputFormat};
use timetab::render::RendererRouter;
use timetab::schedule::{extract_fragments, FieldMode, ParserConfig, ScheduleParser, Timetable};

#[derive(Parser)]
#[command(name = "timetab")]
#[command(about = "Reconstruct weekly class timetables from rendered schedule pages")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/timetab/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse schedule pages into lesson entries
    Parse {
        /// Rendered pages (.html) or PDFs (with the `pdf` feature)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// How lines after a lesson's subject are stored
        #[arg(short, long, value_enum)]
        mode: Option<FieldMode>,

        /// Fail on axis collisions or an unbounded time axis
        #[arg(long)]
        strict: bool,

        /// Time label that bounds the time axis
        #[arg(long)]
        day_start: Option<String>,

        /// Accept pages without a period header
        #[arg(long)]
        allow_missing_period: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the positioned fragments extracted from a page
    Fragments {
        /// Rendered page or PDF
        path: PathBuf,
    },

    /// Show the day columns and time rows located on a page
    Axes {
        /// Rendered page or PDF
        path: PathBuf,

        /// Time label that bounds the time axis
        #[arg(long)]
        day_start: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let mut config = timetab::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse {
            paths,
            format,
            mode,
            strict,
            day_start,
            allow_missing_period,
            output,
        } => {
            if let Some(mode) = mode {
                config.field_mode = mode;
            }
            if let Some(day_start) = day_start {
                config.day_start = day_start;
            }
            config.strict |= strict;
            config.require_period &= !allow_missing_period;
            cmd_parse(&paths, &config, format, output.as_deref())?;
        }
        Commands::Fragments { path } => {
            cmd_fragments(&path)?;
        }
        Commands::Axes { path, day_start } => {
            if let Some(day_start) = day_start {
                config.day_start = day_start;
            }
            cmd_axes(&path, &config)?;
        }
    }

    Ok(())
}

fn cmd_parse(
    paths: &[PathBuf],
    config: &ParserConfig,
    format: OutputFormat,
    output_file: Option<&Path>,
) -> Result<()> {
    let timetables = paths
        .iter()
        .map(|path| {
            let timetable = timetab::parse_document(path, config)?;
            report_diagnostics(path, &timetable);
            Ok(timetable)
        })
        .collect::<Result<Vec<Timetable>>>()?;

    let rendered = output::render(&timetables, format)?;

    if let Some(path) = output_file {
        let mut file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(rendered.as_bytes())?;
        file.write_all(b"\n")?;
        let lessons: usize = timetables.iter().map(|t| t.entries.len()).sum();
        eprintln!("Saved {lessons} lessons to {}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

fn report_diagnostics(path: &Path, timetable: &Timetable) {
    let diagnostics = &timetable.diagnostics;
    tracing::info!(
        "{}: {} lessons, {} skipped lines, {} dropped fragments, {} axis collisions",
        path.display(),
        timetable.entries.len(),
        diagnostics.skipped_lines,
        diagnostics.dropped.total(),
        diagnostics.collisions.len()
    );
    if !diagnostics.time_axis_bounded {
        tracing::warn!("{}: time axis not bounded, no lessons could be timed", path.display());
    }
}

fn cmd_fragments(path: &Path) -> Result<()> {
    let page = RendererRouter::new().render(path)?;
    let extraction = extract_fragments(&page.markup);

    println!("{}", serde_json::to_string_pretty(&extraction.fragments)?);
    eprintln!(
        "{} fragments, {} skipped lines",
        extraction.fragments.len(),
        extraction.skipped
    );
    Ok(())
}

fn cmd_axes(path: &Path, config: &ParserConfig) -> Result<()> {
    let page = RendererRouter::new().render(path)?;
    let extraction = extract_fragments(&page.markup);
    let axes = ScheduleParser::new(config.clone()).locate_axes(&extraction.fragments)?;

    println!("Days:");
    for (threshold, day) in axes.days.thresholds() {
        println!("  {threshold:>5}  {day}");
    }

    println!("\nTimes (bounded by {:?}: {}):", config.day_start, axes.times.bounded);
    for (label, top) in axes.times.rows() {
        println!("  {label:>5}  {top}");
    }

    for collision in &axes.collisions {
        println!("\nCollision: {collision}");
    }

    Ok(())
}
