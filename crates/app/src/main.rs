mod args;

use std::error::Error;

use quiz_core::Clock;
use services::AppServices;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, Database, print_usage, prepare_sqlite_file};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn build_services(args: &Args) -> Result<AppServices, Box<dyn Error>> {
    let clock = Clock::default();
    match &args.database {
        Database::Memory => Ok(AppServices::in_memory(clock, args.rng_seed)),
        Database::Sqlite(url) => {
            // sqlx does not create missing database files from a URL.
            prepare_sqlite_file(url)?;
            Ok(AppServices::new_sqlite(url, clock, args.rng_seed).await?)
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    init_tracing();
    let services = build_services(&args).await?;

    // Seed before accepting requests so the first caller does not pay for it.
    let report = services.content().seed().await?;
    info!(
        math = report.math_inserted,
        english = report.english_inserted,
        "content ready"
    );

    match args.command {
        Command::Seed | Command::Help => Ok(()),
        Command::Serve => {
            let listener = TcpListener::bind(args.addr).await?;
            info!(addr = %listener.local_addr()?, "listening");
            axum::serve(listener, api::router(services))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
