use std::{net::SocketAddr, path::PathBuf, process::exit};

use axum::middleware;
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use expense_tracker::{
    AppState, LocalClock, add_tracing_layer, build_router, graceful_shutdown, logging_middleware,
    setup_logging,
};

/// The web server for expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The IP address to serve the app from.
    #[arg(long, default_value = "127.0.0.1")]
    address: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    ///
    /// Used to decide what "today" is for new expenses and monthly totals.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Append debug logs to this file.
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Log the body of every request and response.
    #[arg(long, default_value_t = false)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.log_path.as_deref()) {
        eprintln!("Could not open log file {:?}: {error}", args.log_path);
        exit(1);
    }

    let addr: SocketAddr = match format!("{}:{}", args.address, args.port).parse() {
        Ok(addr) => addr,
        Err(error) => {
            tracing::error!("Invalid address {}:{}: {error}", args.address, args.port);
            exit(1);
        }
    };

    let clock = match LocalClock::new(&args.timezone) {
        Ok(clock) => clock,
        Err(error) => {
            tracing::error!("{error}");
            exit(1);
        }
    };

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not open database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    let state = match AppState::new(connection, clock) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not initialize database: {error}");
            exit(1);
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let mut router = add_tracing_layer(build_router(state));

    if args.log_bodies {
        router = router.layer(middleware::from_fn(logging_middleware));
    }

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on http://{addr}");
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}
