#![deny(warnings)]

//! Headless CLI: load a snapshot, validate it and print the production plan.

use anyhow::{bail, Context, Result};
use myco_core::{validate_user_state, Catalog, ItemDefinition, ItemId, PlanResult, UserState};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Catalog plus user state, as stored in a snapshot file.
#[derive(Debug, Deserialize)]
struct Snapshot {
    catalog: Vec<ItemDefinition>,
    #[serde(default)]
    state: UserState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, PartialEq)]
struct Args {
    snapshot: Option<PathBuf>,
    format: Format,
    collect: Vec<ItemId>,
    version: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        snapshot: None,
        format: Format::Text,
        collect: vec![],
        version: false,
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--snapshot" => parsed.snapshot = it.next().map(PathBuf::from),
            "--format" => {
                parsed.format = match it.next().as_deref() {
                    Some("text") => Format::Text,
                    Some("json") => Format::Json,
                    other => bail!("unknown format: {:?}", other),
                }
            }
            "--collect" => {
                if let Some(id) = it.next() {
                    parsed.collect.push(ItemId::new(id));
                }
            }
            "--version" => parsed.version = true,
            _ => {}
        }
    }
    Ok(parsed)
}

fn parse_snapshot(path: &Path, text: &str) -> Result<Snapshot> {
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let snapshot = if yaml {
        serde_yaml::from_str(text).context("invalid YAML snapshot")?
    } else {
        serde_json::from_str(text).context("invalid JSON snapshot")?
    };
    Ok(snapshot)
}

fn load_snapshot(path: &Path) -> Result<(UserState, Catalog)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = parse_snapshot(path, &text)?;
    let catalog = Catalog::new(snapshot.catalog)?;
    validate_user_state(&snapshot.state)?;
    Ok((snapshot.state, catalog))
}

/// Collect each item's planned task in turn, replanning after every one.
fn collect_and_replan(
    mut state: UserState,
    catalog: &Catalog,
    ids: &[ItemId],
) -> (UserState, PlanResult) {
    let mut result = myco_plan::plan(&state, catalog);
    for id in ids {
        match result.native_task(id) {
            Some(task) => {
                state = state.with_collected(task);
                result = myco_plan::plan(&state, catalog);
            }
            None => warn!(item = %id, "no planned task to collect"),
        }
    }
    (state, result)
}

fn render_text(result: &PlanResult) -> String {
    if result.is_empty() {
        return "Nothing to grow: all active orders are covered by inventory.\n".to_string();
    }
    let mut out = String::new();
    for (i, batch) in result.batches.iter().enumerate() {
        let status = if batch.is_completable() {
            "ready".to_string()
        } else {
            let missing: Vec<String> = batch.missing.iter().map(|m| m.to_string()).collect();
            format!("needs {}", missing.join(", "))
        };
        out.push_str(&format!(
            "#{} {} | strictness {} | total {} | {}\n",
            i + 1,
            batch.id,
            batch.strictness,
            batch.total_count,
            status
        ));
        for task in &batch.tasks {
            match &task.origin_batch_id {
                Some(origin) => out.push_str(&format!(
                    "    + {} x{} (rides from {})\n",
                    task.item.id, task.count_needed, origin
                )),
                None => out.push_str(&format!("    - {} x{}\n", task.item.id, task.count_needed)),
            }
        }
    }
    if !result.missing_summary.is_empty() {
        let missing: Vec<String> = result.missing_summary.iter().map(|m| m.to_string()).collect();
        out.push_str(&format!("Missing equipment: {}\n", missing.join(", ")));
    }
    out
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "myco {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    let Some(path) = args.snapshot.as_deref() else {
        bail!("usage: myco --snapshot <file> [--format text|json] [--collect <item-id>]...");
    };
    info!(snapshot = %path.display(), format = ?args.format, "starting CLI");

    let (state, catalog) = load_snapshot(path)?;
    let (_, result) = collect_and_replan(state, &catalog, &args.collect);

    match args.format {
        Format::Text => print!("{}", render_text(&result)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags() {
        let a = args(&["--snapshot", "s.yaml", "--format", "json", "--collect", "x", "--collect", "y"]).unwrap();
        assert_eq!(a.snapshot, Some(PathBuf::from("s.yaml")));
        assert_eq!(a.format, Format::Json);
        assert_eq!(a.collect, vec![ItemId::from("x"), ItemId::from("y")]);
        assert!(!a.version);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(args(&["--format", "xml"]).is_err());
    }

    #[test]
    fn demo_snapshot_plans() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/snapshot.yaml");
        let (state, catalog) = load_snapshot(&path).unwrap();
        assert!(!catalog.is_empty());
        let result = myco_plan::plan(&state, &catalog);
        assert!(!result.batches.is_empty());
        let text = render_text(&result);
        assert!(text.starts_with("#1 "));
    }

    #[test]
    fn repeated_collect_adds_stock_once() {
        let catalog = Catalog::new(vec![ItemDefinition::new("y")]).unwrap();
        let state = UserState {
            orders: vec![myco_core::Order::new("o").line("y", 2)],
            ..Default::default()
        };
        let ids = [ItemId::from("y"), ItemId::from("y")];
        let (state, result) = collect_and_replan(state, &catalog, &ids);
        assert_eq!(state.stock(&ItemId::from("y")), 2);
        assert!(result.is_empty());
    }

    #[test]
    fn json_snapshot_parses() {
        let text = r#"{"catalog": [{"id": "a", "primary": "oak"}],
                       "state": {"orders": [{"id": "o", "lines": [{"item": "a", "count": 2}]}]}}"#;
        let snap = parse_snapshot(Path::new("s.json"), text).unwrap();
        assert_eq!(snap.catalog.len(), 1);
        assert_eq!(snap.state.orders[0].lines[0].count, 2);
    }

    #[test]
    fn empty_plan_text() {
        assert!(render_text(&PlanResult::default()).starts_with("Nothing to grow"));
    }
}
