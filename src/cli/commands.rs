//! Command implementations for the Lightcalc CLI.

use log::{debug, info};

use crate::catalog::Catalog;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::search::{CombinationSearchEngine, SearchConfig};
use crate::storage::{CalculationRecord, CalculationStore, FileCalculationStore, share_url};

/// Execute a CLI command.
pub fn execute_command(args: LightcalcArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Calc(calc_args) => run_calc(calc_args, config, &args),
        Command::Sweep(sweep_args) => run_sweep(sweep_args, config, &args),
        Command::Show(show_args) => show_calculation(show_args, &config.catalog, &args),
        Command::List(list_args) => list_calculations(list_args, &args),
        Command::Delete(delete_args) => delete_calculation(delete_args, &args),
        Command::Rename(rename_args) => rename_calculation(rename_args, &args),
    }
}

/// Build the search configuration from files and flags.
pub fn load_config(args: &LightcalcArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            SearchConfig::from_json_file(path)?
        }
        None => SearchConfig::default(),
    };
    if let Some(path) = &args.catalog {
        debug!("loading catalog from {}", path.display());
        config.catalog = Catalog::from_json_file(path)?;
    }
    Ok(config)
}

fn open_store(args: &LightcalcArgs) -> Result<FileCalculationStore> {
    debug!("using store at {}", args.store.display());
    FileCalculationStore::new(&args.store)
}

/// Compute the best combinations for one length.
fn run_calc(calc_args: &CalcArgs, mut config: SearchConfig, cli_args: &LightcalcArgs) -> Result<()> {
    if let Some(limit) = calc_args.limit {
        config.max_results = limit;
    }
    let engine = CombinationSearchEngine::new(config)?;

    let input = calc_args.length_input()?;
    let target = input.target()?;
    info!(
        "searching {target}mm ({} input), power cord: {}",
        input.mode(),
        calc_args.power_cord
    );
    let results = engine.search(target, calc_args.power_cord)?;

    let mut output = CalcOutput {
        results,
        saved_id: None,
        share_url: None,
    };

    if calc_args.save {
        let store = open_store(cli_args)?;
        let record =
            CalculationRecord::new(input, output.results.clone(), calc_args.name.as_deref())?;
        let id = store.save(record)?;
        info!("saved calculation {id}");
        output.share_url = calc_args.share_base.as_deref().map(|base| share_url(base, &id));
        output.saved_id = Some(id);
    }

    let catalog = engine.catalog();
    output_result("Best combinations", &output, cli_args, |output| {
        render_calc_output(output, catalog)
    })
}

/// Compute the best leftover for each length of a range.
fn run_sweep(sweep_args: &SweepArgs, config: SearchConfig, cli_args: &LightcalcArgs) -> Result<()> {
    let engine = CombinationSearchEngine::new(config)?;
    let targets = sweep_args.targets()?;
    info!("sweeping {} targets", targets.len());

    let rows = engine
        .search_many(&targets, sweep_args.power_cord)
        .into_iter()
        .map(|result| {
            result.map(|results| SweepRow {
                target: results.target,
                best_remaining: results.best().map(|c| c.remaining_length()),
                enumerated: results.enumerated,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let output = SweepOutput {
        include_accessory: sweep_args.power_cord,
        rows,
    };
    output_result("Sweep", &output, cli_args, render_sweep)
}

fn show_calculation(show_args: &ShowArgs, catalog: &Catalog, cli_args: &LightcalcArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    let record = store.get(&show_args.id)?;
    record.validate(catalog)?;
    output_result("", &record, cli_args, |record| render_record(record, catalog))
}

fn list_calculations(list_args: &ListArgs, cli_args: &LightcalcArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    let records = store.list_recent(list_args.limit)?;
    output_result("Recent calculations", &records, cli_args, |records| {
        render_record_list(records)
    })
}

fn delete_calculation(delete_args: &DeleteArgs, cli_args: &LightcalcArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    store.delete(&delete_args.id)?;
    let ack = Ack {
        id: delete_args.id.clone(),
        status: "deleted".to_string(),
    };
    output_result("", &ack, cli_args, render_ack)
}

fn rename_calculation(rename_args: &RenameArgs, cli_args: &LightcalcArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    let record = store.rename(&rename_args.id, &rename_args.name)?;
    let ack = Ack {
        id: record.id,
        status: "renamed".to_string(),
    };
    output_result("", &ack, cli_args, render_ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(temp_dir: &TempDir, extra: &[&str]) -> LightcalcArgs {
        let store = temp_dir.path().to_str().unwrap().to_string();
        let mut argv = vec!["lightcalc", "--quiet", "--store", store.as_str()];
        argv.extend_from_slice(extra);
        LightcalcArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_calc_and_save() {
        let temp_dir = TempDir::new().unwrap();
        execute_command(parse(&temp_dir, &["calc", "620", "--power-cord", "--save"])).unwrap();

        let store = FileCalculationStore::new(temp_dir.path()).unwrap();
        let records = store.list_recent(5).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("620mm"));
        assert_eq!(records[0].combinations[0].remaining_length(), 0);

        let id = records[0].id.clone();
        execute_command(parse(&temp_dir, &["rename", id.as_str(), "hallway"])).unwrap();
        assert_eq!(store.get(&id).unwrap().name.as_deref(), Some("hallway"));

        execute_command(parse(&temp_dir, &["show", id.as_str()])).unwrap();
        execute_command(parse(&temp_dir, &["delete", id.as_str()])).unwrap();
        assert!(store.get(&id).is_err());
    }

    #[test]
    fn test_show_rejects_inconsistent_record() {
        let temp_dir = TempDir::new().unwrap();
        execute_command(parse(&temp_dir, &["calc", "620", "--power-cord", "--save"])).unwrap();
        let store = FileCalculationStore::new(temp_dir.path()).unwrap();
        let id = store.list_recent(1).unwrap()[0].id.clone();

        // 600 installs as 560mm; claim 600 and keep the totals consistent.
        let path = temp_dir.path().join(format!("{id}.json"));
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["combinations"][0]["combinations"][0]["usedLength"] = serde_json::json!(600);
        value["combinations"][0]["totalUsedLength"] = serde_json::json!(660);
        value["combinations"][0]["remainingLength"] = serde_json::json!(0);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = execute_command(parse(&temp_dir, &["show", id.as_str()])).unwrap_err();
        assert!(err.is_invalid_input());
        let err =
            execute_command(parse(&temp_dir, &["--format", "json", "show", id.as_str()])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_calc_invalid_target() {
        let temp_dir = TempDir::new().unwrap();
        let err = execute_command(parse(&temp_dir, &["calc", "0"])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_save_without_solution_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err =
            execute_command(parse(&temp_dir, &["calc", "30", "--power-cord", "--save"])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_catalog_override() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_path = temp_dir.path().join("catalog.json");
        let mut file = std::fs::File::create(&catalog_path).unwrap();
        write!(
            file,
            r#"{{
                "segments": [ {{ "label": "A", "nominalLength": 500, "actualLength": 500 }} ],
                "accessory": {{ "label": "cord", "nominalLength": 10, "actualLength": 10 }}
            }}"#
        )
        .unwrap();

        let args = parse(
            &temp_dir,
            &["--catalog", catalog_path.to_str().unwrap(), "calc", "1000"],
        );
        let config = load_config(&args).unwrap();
        assert_eq!(config.catalog.segments()[0].label, "A");
        execute_command(args).unwrap();
    }

    #[test]
    fn test_sweep() {
        let temp_dir = TempDir::new().unwrap();
        execute_command(parse(&temp_dir, &["sweep", "600", "700", "--step", "50"])).unwrap();
        let err = execute_command(parse(&temp_dir, &["sweep", "0", "100"])).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
