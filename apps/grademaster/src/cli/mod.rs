//! # GradeMaster CLI Module
//!
//! This module implements the CLI interface for GradeMaster.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `points` - Points for one unit
//! - `evaluate` - Evaluate every student in a course file
//! - `boundaries` - Boundary table of a qualification
//! - `qualifications` - List the supported qualifications (default)

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use grademaster_core::{Grade, QualificationType, UnitKind};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// GradeMaster - vocational qualification tracker
///
/// Converts unit grades into qualification points, overall grade and UCAS
/// tariff points.
#[derive(Parser, Debug)]
#[command(name = "grademaster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides configuration)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Points awarded for one unit
    Points {
        /// Guided learning hours
        #[arg(short, long)]
        glh: u32,

        /// Assessment kind (internal, external)
        #[arg(short, long)]
        kind: UnitKind,

        /// Grade (U, NP, P, M, D)
        #[arg(short = 'G', long)]
        grade: Grade,
    },

    /// Evaluate every student in a course file (TOML or JSON)
    Evaluate {
        /// Path to the course file
        #[arg(short, long)]
        file: PathBuf,

        /// Only students whose name contains this text (case-insensitive)
        #[arg(short, long)]
        student: Option<String>,

        /// Ask the configured advisor for written feedback
        #[arg(short, long)]
        advice: bool,
    },

    /// Show a qualification's boundary table
    Boundaries {
        /// Qualification (extended_certificate, foundation_diploma, diploma,
        /// extended_diploma)
        #[arg(short = 'Q', long, default_value = "extended_diploma")]
        qualification: QualificationType,
    },

    /// List the supported qualifications
    Qualifications,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::Points { glh, kind, grade }) => cmd_points(glh, kind, grade, json_mode),
        Some(Commands::Evaluate {
            file,
            student,
            advice,
        }) => cmd_evaluate(&config, &file, student.as_deref(), advice, json_mode).await,
        Some(Commands::Boundaries { qualification }) => cmd_boundaries(qualification, json_mode),
        Some(Commands::Qualifications) | None => cmd_qualifications(json_mode),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_command() {
        let cli = Cli::try_parse_from([
            "grademaster",
            "points",
            "--glh",
            "120",
            "--kind",
            "external",
            "--grade",
            "D",
        ])
        .expect("parse");
        match cli.command {
            Some(Commands::Points { glh, kind, grade }) => {
                assert_eq!(glh, 120);
                assert_eq!(kind, UnitKind::External);
                assert_eq!(grade, Grade::D);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_grade() {
        let parsed = Cli::try_parse_from([
            "grademaster",
            "points",
            "--glh",
            "60",
            "--kind",
            "internal",
            "--grade",
            "Z",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["grademaster", "boundaries", "--json-mode", "-q"])
            .expect("parse");
        assert!(cli.json_mode);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Some(Commands::Boundaries {
                qualification: QualificationType::ExtendedDiploma
            })
        ));
    }
}
