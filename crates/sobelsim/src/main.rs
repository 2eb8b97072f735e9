use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use sobelsim::{CompareJob, DEFAULT_GOLDEN_DIR};
use sobelsim_pipeline::harness::{trace_windows_from_env, EXPECTED_FILE};
use sobelsim_pipeline::{BorderMode, HarnessConfig};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Golden vectors and output comparison for the Sobel line-buffer pipeline",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate one random frame and write its input and expected vectors
    Generate {
        #[arg(long, default_value_t = 64)]
        width: u32,
        #[arg(long, default_value_t = 48)]
        height: u32,
        #[arg(long, default_value_t = 123)]
        seed: u64,
        #[arg(long, value_name = "DIR", default_value = DEFAULT_GOLDEN_DIR)]
        out_dir: PathBuf,
    },
    /// Compare a captured output stream against the model
    Compare {
        /// RGB565 input stream (.mem hex, or .rgb/.raw/.bin little-endian)
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
        /// Output stream from the hardware simulation
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
        /// key=value metadata (frames, width, height, fps)
        #[arg(long, value_name = "PATH")]
        meta: PathBuf,
        /// Write a TOML report here
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Border::Exclude)]
        border: Border,
    },
    /// Check a single-frame simulation output against expected vectors
    Check {
        #[arg(long, value_name = "PATH")]
        actual: PathBuf,
        /// Defaults to the expected output in the golden directory
        #[arg(long, value_name = "PATH")]
        expected: Option<PathBuf>,
        #[arg(long, default_value_t = 64)]
        width: u32,
        #[arg(long, default_value_t = 48)]
        height: u32,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Border {
    /// Skip windows that touch the frame edge (streaming pipeline behaviour)
    Exclude,
    /// Right neighbour of the last column wraps to column 0
    Wrap,
}

impl From<Border> for BorderMode {
    fn from(border: Border) -> Self {
        match border {
            Border::Exclude => BorderMode::Exclude,
            Border::Wrap => BorderMode::Wrap,
        }
    }
}

fn init_logging() {
    let filter = if trace_windows_from_env() {
        "info,sobelsim=debug,sobelsim_pipeline=debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

/// Returns whether the command passed.
fn run(command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Generate {
            width,
            height,
            seed,
            out_dir,
        } => {
            let config = HarnessConfig::builder()
                .width(width)
                .height(height)
                .seed(seed)
                .build();
            sobelsim::run_generate(config, &out_dir)?;
            Ok(true)
        }
        Command::Compare {
            input,
            output,
            meta,
            report,
            border,
        } => {
            let job = CompareJob {
                input,
                output,
                meta,
                border: border.into(),
                report,
            };
            let report = sobelsim::run_compare(&job)?;
            println!("{}", report.summary());
            Ok(report.passed)
        }
        Command::Check {
            actual,
            expected,
            width,
            height,
        } => {
            let expected =
                expected.unwrap_or_else(|| PathBuf::from(DEFAULT_GOLDEN_DIR).join(EXPECTED_FILE));
            let report = sobelsim::run_check(&actual, &expected, width, height)?;
            println!("{}", report.summary());
            Ok(report.passed)
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
