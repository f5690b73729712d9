//! onSAT CLI - check, render and simulate the statistics section.

use clap::{Parser, Subcommand, ValueEnum};
use onsat::{Brick, ManifestError, Report, Simulation, StatsManifest, StatsSection};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "onsat")]
#[command(about = "onSAT statistics section CLI")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace); `RUST_LOG` overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check manifest validity
    Check {
        /// Path to manifest file (default: built-in section)
        manifest: Option<PathBuf>,
    },

    /// Print the section's HTML
    Render {
        /// Path to manifest file (default: built-in section)
        manifest: Option<PathBuf>,

        /// Counter state to render
        #[arg(short, long, value_enum, default_value_t = RenderState::Initial)]
        state: RenderState,

        /// Also print the stylesheet
        #[arg(long)]
        css: bool,
    },

    /// Run the section headless and print counter values per frame
    Simulate {
        /// Path to manifest file (default: built-in section)
        manifest: Option<PathBuf>,

        /// Display refresh rate
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// When the section scrolls into view, in ms (omit to never scroll)
        #[arg(long, default_value_t = 0.0)]
        visible_at: f64,

        /// Never scroll the section into view
        #[arg(long, conflicts_with = "visible_at")]
        never_visible: bool,

        /// Simulated time to run, in ms
        #[arg(long, default_value_t = 3000.0)]
        until: f64,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 800.0)]
        viewport_height: f32,

        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        viewport_width: f32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderState {
    /// Every counter at 0
    Initial,
    /// Every counter at its target
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("manifest invalid: {0}")]
    Manifest(#[from] ManifestError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("section cannot render: {0}")]
    Render(String),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { manifest } => check(manifest.as_deref()),
        Commands::Render {
            manifest,
            state,
            css,
        } => render(manifest.as_deref(), state, css),
        Commands::Simulate {
            manifest,
            fps,
            visible_at,
            never_visible,
            until,
            viewport_height,
            viewport_width,
            format,
        } => {
            let sim = Simulation {
                fps,
                visible_at_ms: (!never_visible).then_some(visible_at),
                until_ms: until,
                viewport_width,
                viewport_height,
            };
            simulate(manifest.as_deref(), &sim, format)
        }
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load(path: Option<&Path>) -> Result<StatsManifest, CliError> {
    match path {
        Some(path) => {
            log::debug!("loading manifest {}", path.display());
            Ok(StatsManifest::from_path(path)?)
        }
        None => {
            log::debug!("using built-in section");
            Ok(StatsManifest::default())
        }
    }
}

fn check(path: Option<&Path>) -> Result<String, CliError> {
    let manifest = load(path)?;
    let stats = &manifest.stats;

    let mut out = String::from("Manifest valid!\n");
    out.push_str(&format!("  Section: {} ({})\n", stats.heading, stats.id));
    out.push_str(&format!("  Threshold: {}\n", stats.threshold));
    out.push_str(&format!("  Counters: {}", stats.counters.len()));
    for counter in &stats.counters {
        out.push_str(&format!(
            "\n    - {}: {}{} over {}ms",
            counter.label, counter.end, counter.suffix, counter.duration_ms
        ));
    }
    Ok(out)
}

fn render(path: Option<&Path>, state: RenderState, css: bool) -> Result<String, CliError> {
    let mut section = StatsSection::from_manifest(&load(path)?);
    let verification = section.verify();
    if !verification.is_valid() {
        return Err(CliError::Render(verification.failure_summary()));
    }
    if state == RenderState::Final {
        section.run_to_completion();
    }

    let html = section.to_html();
    Ok(if css {
        format!("<style>\n{}\n</style>\n{html}", section.to_css())
    } else {
        html
    })
}

fn simulate(
    path: Option<&Path>,
    sim: &Simulation,
    format: OutputFormat,
) -> Result<String, CliError> {
    let mut section = StatsSection::from_manifest(&load(path)?);
    let report = sim.run(&mut section);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => Ok(format_report(&report)),
    }
}

fn format_report(report: &Report) -> String {
    let mut out = format!("{:>9}  {}", "t (ms)", report.labels.join(" | "));
    for sample in &report.samples {
        out.push_str(&format!(
            "\n{:>9.1}  {}",
            sample.t_ms,
            sample.values.join(" | ")
        ));
    }
    out.push('\n');
    match report.settled_at_ms {
        Some(t) => out.push_str(&format!("settled at {t:.1}ms after {} frames", report.frames)),
        None => out.push_str(&format!("not settled ({} frames)", report.frames)),
    }
    out
}
