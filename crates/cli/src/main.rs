mod commands;

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "route-kit")]
#[command(
    version,
    about = "Per-route social meta tags for single-page applications",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create a starter routes.toml
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Check routes.toml and the built base document
    Validate {
        /// Project directory containing routes.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Write an index.html for every route
    Build {
        /// Project directory containing routes.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Built root HTML document (overrides build.input)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output root directory (overrides build.output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Filter for the log subscriber: a non-empty `RUST_LOG` wins, otherwise `-v`.
fn env_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("⚠️  Ignoring invalid {}: {}", EnvFilter::DEFAULT_ENV, e),
        }
    }

    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy("")
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(env_filter(verbose, rust_log.as_deref()))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path, strict } => commands::validate::run(path, strict).await,
        Command::Build {
            path,
            input,
            output,
        } => commands::build::run(path, input, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "route-kit", &mut io::stdout());
            Ok(())
        }
    }
}
