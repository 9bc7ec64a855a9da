use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

mod bench;
mod diagnostics;
mod journal;
mod render;
mod session;
mod stats;

use render::{RenderMode, Renderer};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "nslp-bench-eval")]
#[command(about = "Latency statistics from NSLP benchmark journals", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct FormatArgs {
    /// Render LaTeX table rows instead of plain columns.
    #[arg(short = 'l', long)]
    latex: bool,

    /// Use a decimal comma in LaTeX numbers.
    #[arg(long, requires = "latex")]
    decimal_comma: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Statistics for one start/stop measuring point pair.
    Pair {
        start: u32,
        stop: u32,
        /// Row label (default: #START-#STOP).
        label: Option<String>,

        #[command(flatten)]
        format: FormatArgs,

        /// Print `index value` pairs for plotting instead of statistics.
        #[arg(long, conflicts_with = "latex")]
        plot: bool,

        /// Journal file (default: stdin).
        #[arg(long)]
        journal: Option<String>,
    },

    /// Statistics for every benchmark definition in one pass.
    Batch {
        #[command(flatten)]
        format: FormatArgs,

        /// JSON benchmark definitions (default: built-in NSLP stages).
        #[arg(long)]
        points: Option<String>,

        /// Journal file (default: stdin).
        #[arg(long)]
        journal: Option<String>,
    },

    /// Session setup latency from a daemon text log.
    Session {
        #[command(flatten)]
        format: FormatArgs,

        /// Print `index value` pairs for plotting instead of statistics.
        #[arg(long, conflicts_with = "latex")]
        plot: bool,

        #[arg(long, default_value = "Session setup")]
        label: String,

        /// Log file (default: stdin).
        #[arg(long)]
        log: Option<String>,
    },
}

impl FormatArgs {
    fn mode(&self, plot: bool) -> RenderMode {
        if plot {
            RenderMode::Plot
        } else if self.latex {
            RenderMode::Latex {
                decimal_comma: self.decimal_comma,
            }
        } else {
            RenderMode::Plain
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help / --version exit 0.
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print().ok();
            return ExitCode::from(code);
        }
    };

    diagnostics::init(cli.verbose);

    match run(cli.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Pair {
            start,
            stop,
            label,
            format,
            plot,
            journal: journal_path,
        } => {
            let journal = journal::read_journal_file(journal_path.as_deref())?;
            let label = label.unwrap_or_else(|| bench::BenchmarkDefinition::default_label(start, stop));

            log::info!(
                "{}: {} -> {}",
                label,
                journal.point_name(start),
                journal.point_name(stop)
            );

            let samples = bench::correlate_pair(&journal.events, start, stop)?;
            let mut renderer = Renderer::new(format.mode(plot));
            match renderer.render(&label, &samples) {
                Some(out) => println!("{}", out),
                None => log::info!("{}: no matching measuring points", label),
            }
        }

        Commands::Batch {
            format,
            points,
            journal: journal_path,
        } => {
            let definitions = bench::load_definitions(points.as_deref())?;
            let journal = journal::read_journal_file(journal_path.as_deref())?;

            if !journal.points.is_empty() {
                for def in &definitions {
                    for id in [def.start, def.stop] {
                        if !journal.points.contains_key(&id) {
                            diagnostics::warn(format!(
                                "benchmark '{}' uses measuring point {} not declared in the journal header",
                                def.label, id
                            ));
                        }
                    }
                }
            }

            let samples = bench::correlate(&journal.events, &definitions)?;

            let mut renderer = Renderer::new(format.mode(false));
            if let Some(header) = renderer.header() {
                println!("{}", header);
            }
            for (label, set) in &samples {
                match renderer.render(label, set) {
                    Some(row) => println!("{}", row),
                    None => log::info!("{}: no matching measuring points", label),
                }
            }
            if let Some(footer) = renderer.footer() {
                println!("{}", footer);
            }
        }

        Commands::Session {
            format,
            plot,
            label,
            log: log_path,
        } => {
            let text = journal::read_input(log_path.as_deref())?;
            let events = session::parse_session_log(&text)?;
            let samples = session::correlate_sessions(&events)?;

            let mut renderer = Renderer::new(format.mode(plot));
            match renderer.render(&label, &samples) {
                Some(out) => println!("{}", out),
                None => log::info!("{}: no completed sessions", label),
            }
        }
    }

    Ok(())
}
