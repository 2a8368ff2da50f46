use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use walle::constants::DEFAULT_CANVAS_SIZE;
use walle::{Color, Config, Diagnostic, Interpreter};

mod error;
mod render;

use error::CliError;

const DEFAULT_MAX_STEPS: usize = 1_000_000;

#[derive(Parser)]
#[command(name = "walle")]
#[command(about = "Interpreter for the Pixel Wall-E drawing language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directives
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs a program and reports its diagnostics
    Run {
        /// Program file
        input: PathBuf,

        /// Canvas side length
        #[arg(short, long, default_value_t = DEFAULT_CANVAS_SIZE)]
        size: usize,

        /// Stop after this many executed lines
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Write the canvas as a PPM image
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the canvas as text
        #[arg(long)]
        show_canvas: bool,

        /// Print the variables left after the run
        #[arg(long)]
        show_variables: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validates a program without running it
    Check {
        /// Program file
        input: PathBuf,

        /// Canvas side length used for bounds checks
        #[arg(short, long, default_value_t = DEFAULT_CANVAS_SIZE)]
        size: usize,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lists the palette
    Colors,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the program came through without diagnostics.
fn dispatch(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Run {
            input,
            size,
            max_steps,
            output,
            show_canvas,
            show_variables,
            json,
        } => {
            let source = read_source(&input)?;
            let config = Config::default()
                .with_canvas_size(size)
                .with_max_steps(max_steps);
            let mut interpreter = Interpreter::new(config)?;
            info!(input = %input.display(), size, "running");
            let result = interpreter.execute(&source);

            if let Some(path) = &output {
                let file = File::create(path).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                render::write_ppm(&interpreter.snapshot(), BufWriter::new(file))?;
                debug!(output = %path.display(), "canvas written");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_diagnostics(&result.diagnostics);
                if result.success {
                    println!("ok: {} steps", result.steps);
                }
                if let Some(value) = result.last_value {
                    println!("value: {value}");
                }
            }
            if show_variables {
                for (name, value) in interpreter.variables().iter() {
                    println!("{name} = {value}");
                }
            }
            if show_canvas {
                print!("{}", render::text(&interpreter.snapshot()));
            }
            Ok(result.success)
        }
        Commands::Check { input, size, json } => {
            let source = read_source(&input)?;
            let diagnostics = walle::check(&source, &Config::default().with_canvas_size(size))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&diagnostics)?);
            } else if diagnostics.is_empty() {
                println!("no problems found");
            } else {
                print_diagnostics(&diagnostics);
            }
            Ok(diagnostics.is_empty())
        }
        Commands::Colors => {
            println!("Available colors:");
            for color in Color::all() {
                println!("  {:12} #{:06X}  '{}'", color.name(), color.rgb(), color.symbol());
            }
            Ok(true)
        }
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        println!("{diagnostic}");
    }
    if !diagnostics.is_empty() {
        println!("{} problem(s) found", diagnostics.len());
    }
}
