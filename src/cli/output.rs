//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::cli::args::{LightcalcArgs, OutputFormat};
use crate::combination::Combination;
use crate::error::{LightcalcError, Result};
use crate::search::SearchResults;
use crate::storage::CalculationRecord;

/// Result structure for the calc command.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcOutput {
    #[serde(flatten)]
    pub results: SearchResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// One row of a sweep.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRow {
    pub target: i64,
    /// Leftover of the tightest fit, `None` when nothing fits.
    pub best_remaining: Option<i64>,
    pub enumerated: u64,
}

/// Result structure for the sweep command.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepOutput {
    pub include_accessory: bool,
    pub rows: Vec<SweepRow>,
}

/// Result structure for commands that only acknowledge.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub id: String,
    pub status: String,
}

/// Output a result in the specified format.
///
/// `render_human` produces the human-readable body.
pub fn output_result<T, F>(message: &str, result: &T, args: &LightcalcArgs, render_human: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> Result<String>,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 && !message.is_empty() {
                println!("{message}");
                println!();
            }
            print!("{}", render_human(result)?);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LightcalcArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn fmt_err(_: std::fmt::Error) -> LightcalcError {
    LightcalcError::other("failed to format output")
}

/// Render one combination as a table with one row per installed unit.
pub fn render_combination(index: usize, combination: &Combination, catalog: &Catalog) -> Result<String> {
    let rows = combination.unit_rows(catalog)?;
    let label_width = rows
        .iter()
        .map(|row| row.display_label().chars().count())
        .chain(std::iter::once("Total used".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    writeln!(out, "# Combination {}", index + 1).map_err(fmt_err)?;
    writeln!(out, "{:<label_width$}  {:>3}  {:>9}", "Type", "Qty", "Used (mm)").map_err(fmt_err)?;
    writeln!(out, "{}  {}  {}", "─".repeat(label_width), "─".repeat(3), "─".repeat(9))
        .map_err(fmt_err)?;
    for row in &rows {
        writeln!(
            out,
            "{:<label_width$}  {:>3}  {:>9}",
            row.display_label(),
            1,
            row.used_length
        )
        .map_err(fmt_err)?;
    }
    writeln!(
        out,
        "{:<label_width$}  {:>3}  {:>9}",
        "Total used",
        "",
        combination.total_used_length()
    )
    .map_err(fmt_err)?;
    writeln!(out, "(remaining: {}mm)", combination.remaining_length()).map_err(fmt_err)?;
    Ok(out)
}

/// Render the combinations of a search.
pub fn render_search_results(results: &SearchResults, catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    let cord = if results.include_accessory {
        format!(" (with {})", catalog.accessory().label)
    } else {
        String::new()
    };
    writeln!(out, "Target: {}mm{cord}", results.target).map_err(fmt_err)?;

    if results.is_no_solution() {
        writeln!(out, "No combination fits.").map_err(fmt_err)?;
        return Ok(out);
    }

    for (index, combination) in results.combinations.iter().enumerate() {
        writeln!(out).map_err(fmt_err)?;
        out.push_str(&render_combination(index, combination, catalog)?);
    }
    Ok(out)
}

/// Render the output of the calc command.
pub fn render_calc_output(output: &CalcOutput, catalog: &Catalog) -> Result<String> {
    let mut out = render_search_results(&output.results, catalog)?;
    if let Some(id) = &output.saved_id {
        writeln!(out).map_err(fmt_err)?;
        writeln!(out, "Saved as {id}").map_err(fmt_err)?;
    }
    if let Some(url) = &output.share_url {
        writeln!(out, "Share: {url}").map_err(fmt_err)?;
    }
    Ok(out)
}

/// Render a saved calculation with its combinations.
pub fn render_record(record: &CalculationRecord, catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", record.display_name()).map_err(fmt_err)?;
    writeln!(out, "id: {}", record.id).map_err(fmt_err)?;
    writeln!(out, "created: {}", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"))
        .map_err(fmt_err)?;
    if let (Some(width), Some(height)) = (record.width, record.height) {
        writeln!(out, "size: {width}x{height}mm").map_err(fmt_err)?;
    }
    writeln!(
        out,
        "length: {}mm, power cord: {}",
        record.total_length,
        if record.include_power_cord { "yes" } else { "no" }
    )
    .map_err(fmt_err)?;

    for (index, combination) in record.combinations.iter().enumerate() {
        writeln!(out).map_err(fmt_err)?;
        out.push_str(&render_combination(index, combination, catalog)?);
    }
    Ok(out)
}

/// Render a list of saved calculations, one per line.
pub fn render_record_list(records: &[CalculationRecord]) -> Result<String> {
    let mut out = String::new();
    if records.is_empty() {
        writeln!(out, "No saved calculations.").map_err(fmt_err)?;
        return Ok(out);
    }
    for record in records {
        let best = record
            .combinations
            .first()
            .map(|c| format!("{}mm left", c.remaining_length()))
            .unwrap_or_else(|| "no fit".to_string());
        writeln!(
            out,
            "{}  {}  {}  ({})",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.display_name(),
            best
        )
        .map_err(fmt_err)?;
    }
    Ok(out)
}

/// Render a sweep as a two-column table.
pub fn render_sweep(output: &SweepOutput) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:>10}  {:>14}", "Target", "Best leftover").map_err(fmt_err)?;
    for row in &output.rows {
        let best = row
            .best_remaining
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "{:>10}  {:>14}", row.target, best).map_err(fmt_err)?;
    }
    Ok(out)
}

/// Render an acknowledgement.
pub fn render_ack(ack: &Ack) -> Result<String> {
    Ok(format!("{} {}\n", ack.status, ack.id))
}
