use clap::Parser;
use product_sales::args::{Args, Command};
use product_sales::{commands, Config, ErrorType, IntoResult, Mode, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // When PRODUCT_SALES_IN_TEST_MODE is set and non-empty the seed feed is the canned sample
    // feed instead of the configured URL.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.seed_url()).await?.print(),

        Command::Seed => commands::seed(load(home).await?, mode).await?.print(),

        Command::Serve => commands::serve(load(home).await?, mode).await?.print(),

        Command::List(list_args) => commands::list(load(home).await?, list_args)
            .await?
            .print(),

        Command::Statistics(month_args) => {
            commands::statistics(load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::BarChart(month_args) => {
            commands::bar_chart(load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::PieChart(month_args) => {
            commands::pie_chart(load(home).await?, month_args.month())
                .await?
                .print()
        }

        Command::Combined(month_args) => {
            commands::combined(load(home).await?, month_args.month())
                .await?
                .print()
        }
    };
    Ok(())
}

async fn load(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            // The library and the binary share the crate name.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
