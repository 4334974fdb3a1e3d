//! # GradeMaster
//!
//! Tracks BTEC-style vocational qualification grades: unit points, overall
//! grade, UCAS tariff and the distance to the next boundary.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/grademaster (THE BINARY)            │
//! │                                                          │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐   │
//! │  │   CLI       │    │   HTTP API  │    │   Advisor   │   │
//! │  │  (clap)     │    │   (axum)    │    │  (reqwest)  │   │
//! │  └──────┬──────┘    └──────┬──────┘    └──────┬──────┘   │
//! │         └──────────────────┼──────────────────┘          │
//! │                            ▼                             │
//! │                  ┌──────────────────┐                    │
//! │                  │ grademaster-core │                    │
//! │                  │   (THE LOGIC)    │                    │
//! │                  └──────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! grademaster server --port 8080
//! grademaster points --glh 120 --kind external --grade D
//! grademaster evaluate --file course.toml --student Ada
//! grademaster boundaries --qualification extended_diploma
//! ```

use clap::Parser;
use grademaster::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Selects JSON log lines when set to `json`.
const LOG_FORMAT_ENV: &str = "GRADEMASTER_LOG_FORMAT";

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "grademaster=debug,grademaster_core=debug,tower_http=debug"
    } else {
        "grademaster=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the GradeMaster startup banner.
fn print_banner() {
    println!(
        r#"
   ___               _     __  __         _
  / __|_ _ __ _ __| |___|  \/  |__ _ __| |_ ___ _ _
 | (_ | '_/ _` / _` / -_) |\/| / _` (_-<  _/ -_) '_|
  \___|_| \__,_\__,_\___|_|  |_\__,_/__/\__\___|_|

  Qualification Tracker v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
