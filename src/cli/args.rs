//! Command line argument parsing for the Lightcalc CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::{LightcalcError, Result};
use crate::input::LengthInput;

/// Lightcalc - find segment combinations with the least leftover
#[derive(Parser, Debug, Clone)]
#[command(name = "lightcalc")]
#[command(about = "Find lighting segment combinations that cover a length with minimal leftover")]
#[command(version = crate::VERSION)]
#[command(long_about = None)]
pub struct LightcalcArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Search configuration file (JSON)
    #[arg(long, env = "LIGHTCALC_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file (JSON), overrides the catalog of the configuration
    #[arg(long, env = "LIGHTCALC_CATALOG", value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory where saved calculations are kept
    #[arg(
        long,
        env = "LIGHTCALC_STORE",
        value_name = "DIR",
        default_value = ".lightcalc",
        global = true
    )]
    pub store: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LightcalcArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute the best combinations for a length
    Calc(CalcArgs),

    /// Compute the best fit for a range of lengths
    Sweep(SweepArgs),

    /// Show a saved calculation
    Show(ShowArgs),

    /// List recent saved calculations
    List(ListArgs),

    /// Delete a saved calculation
    Delete(DeleteArgs),

    /// Rename a saved calculation
    Rename(RenameArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Calc(_) => "calc",
            Command::Sweep(_) => "sweep",
            Command::Show(_) => "show",
            Command::List(_) => "list",
            Command::Delete(_) => "delete",
            Command::Rename(_) => "rename",
        }
    }
}

/// Arguments for a calculation
#[derive(Parser, Debug, Clone)]
pub struct CalcArgs {
    /// Total length in millimeters
    #[arg(
        value_name = "LENGTH",
        allow_negative_numbers = true,
        conflicts_with_all = ["width", "height"],
        required_unless_present_all = ["width", "height"]
    )]
    pub length: Option<i64>,

    /// Width in millimeters; the target becomes the perimeter
    #[arg(long, requires = "height", allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Height in millimeters; the target becomes the perimeter
    #[arg(long, requires = "width", allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// Reserve one power cord
    #[arg(short = 'p', long)]
    pub power_cord: bool,

    /// Maximum number of combinations to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Save the result
    #[arg(short, long)]
    pub save: bool,

    /// Name for the saved result
    #[arg(short, long, requires = "save")]
    pub name: Option<String>,

    /// Base URL used to print a share link for the saved result
    #[arg(long, requires = "save", value_name = "URL")]
    pub share_base: Option<String>,
}

impl CalcArgs {
    /// The length input described by the arguments.
    pub fn length_input(&self) -> Result<LengthInput> {
        match (self.length, self.width, self.height) {
            (Some(length), None, None) => Ok(LengthInput::total(length)),
            (None, Some(width), Some(height)) => Ok(LengthInput::perimeter(width, height)),
            _ => Err(LightcalcError::invalid_input(
                "give either LENGTH or both --width and --height",
            )),
        }
    }
}

/// Arguments for a sweep over lengths
#[derive(Parser, Debug, Clone)]
pub struct SweepArgs {
    /// First length in millimeters
    #[arg(value_name = "FROM")]
    pub from: i64,

    /// Last length in millimeters (inclusive)
    #[arg(value_name = "TO")]
    pub to: i64,

    /// Step between lengths
    #[arg(long, default_value = "10")]
    pub step: i64,

    /// Reserve one power cord
    #[arg(short = 'p', long)]
    pub power_cord: bool,
}

impl SweepArgs {
    /// The lengths covered by the sweep.
    pub fn targets(&self) -> Result<Vec<i64>> {
        if self.step <= 0 {
            return Err(LightcalcError::invalid_input("step must be positive"));
        }
        if self.to < self.from {
            return Err(LightcalcError::invalid_input(format!(
                "empty range {}..={}",
                self.from, self.to
            )));
        }
        let step = usize::try_from(self.step)
            .map_err(|_| LightcalcError::invalid_input("step is too large"))?;
        Ok((self.from..=self.to).step_by(step).collect())
    }
}

/// Arguments for showing a saved calculation
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Id of the calculation
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for listing saved calculations
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Maximum number of calculations to list
    #[arg(short, long, default_value = "5")]
    pub limit: usize,
}

/// Arguments for deleting a saved calculation
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Id of the calculation
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for renaming a saved calculation
#[derive(Parser, Debug, Clone)]
pub struct RenameArgs {
    /// Id of the calculation
    #[arg(value_name = "ID")]
    pub id: String,

    /// New name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
