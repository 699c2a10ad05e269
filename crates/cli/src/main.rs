//! Jobflow CLI - thin glue around the coordination core
//!
//! Parses the four positional startup values, prints the startup banner,
//! runs the engine, and exits with the code the run surfaced.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobflow_core::{Engine, RunConfig};

#[derive(Parser)]
#[command(name = "jobflow")]
#[command(about = "Bounded-buffer producer/consumer runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Capacity of the job queue
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    queue_size: u64,

    /// Jobs each producer generates
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    number_of_jobs: u64,

    /// Number of producer workers
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    number_of_producers: u64,

    /// Number of consumer workers
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    number_of_consumers: u64,
}

fn init_logging() {
    let log_format = std::env::var("JOBFLOW_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("jobflow=warn"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

/// Parse arguments, exiting with the usage error code on failure.
///
/// Clap's default error exit code is 2, which this program reserves for
/// clock failures; usage errors exit 1.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli();
    init_logging();

    info!("Jobflow v{} starting", jobflow_core::VERSION);

    println!(
        "Queue size is: {}\nNumber of jobs is: {}\nNumber of producers is: {}\nNumber of consumers is: {}\n\n",
        cli.queue_size, cli.number_of_jobs, cli.number_of_producers, cli.number_of_consumers
    );

    let config = RunConfig::new(
        cli.queue_size as usize,
        cli.number_of_jobs,
        cli.number_of_producers as usize,
        cli.number_of_consumers as usize,
    );

    let report = Engine::new(config).run().await?;
    std::process::exit(report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_positive_arguments_parse() {
        let cli = Cli::try_parse_from(["jobflow", "5", "6", "2", "3"]).unwrap();
        assert_eq!(cli.queue_size, 5);
        assert_eq!(cli.number_of_jobs, 6);
        assert_eq!(cli.number_of_producers, 2);
        assert_eq!(cli.number_of_consumers, 3);
    }

    #[test]
    fn wrong_argument_count_is_a_usage_error() {
        // Parse failure routes through parse_cli's exit(1) path, keeping
        // exit code 2 reserved for clock failures.
        assert!(Cli::try_parse_from(["jobflow", "5", "6"]).is_err());
        assert!(Cli::try_parse_from(["jobflow", "5", "6", "2", "3", "9"]).is_err());
    }

    #[test]
    fn zero_and_non_numeric_values_are_usage_errors() {
        assert!(Cli::try_parse_from(["jobflow", "0", "6", "2", "3"]).is_err());
        assert!(Cli::try_parse_from(["jobflow", "5", "six", "2", "3"]).is_err());
    }
}
