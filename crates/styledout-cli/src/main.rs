//! Command-line front end for the styled output engine.
//!
//! Loads a JSON workspace file (settings + data + definitions) and renders,
//! lists, or validates styled outputs:
//!
//! ```text
//! styledout -w shop.json render 10 --page 1 --per-page 25 --strip
//! styledout -w shop.json render 10 --items 1,2,3 --require status=active
//! styledout -w shop.json list
//! styledout -w shop.json check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use styledout::builtins::{self, NESTED_KEYWORD};
use styledout::{
    ConditionKind, RenderRequest, RenderScope, Resolver, ResultCondition, ReturnFormat,
    StyledOutput,
};
use styledout_format::scan_directives;
use styledout_query::{Params, Row};

mod workspace;

use workspace::Workspace;

#[derive(Parser)]
#[command(name = "styledout")]
#[command(version)]
#[command(about = "Render styled outputs from a workspace file")]
struct Cli {
    /// Path to the workspace JSON file
    #[arg(short, long, global = true, default_value = "styledout.json")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a styled output
    Render(RenderArgs),

    /// List styled output definitions
    List,

    /// Validate definitions without rendering them
    Check(CheckArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Styled output id
    id: u64,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// Rows per page (clamped by definition options and engine limits)
    #[arg(long)]
    per_page: Option<u32>,

    /// Strip newlines and tabs from the final output
    #[arg(long)]
    strip: bool,

    /// Query parameter as name=value; the value is parsed as JSON when
    /// possible and kept as text otherwise
    #[arg(long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// Render once per item id instead of once overall
    #[arg(long, value_delimiter = ',', value_name = "ID,ID,...")]
    items: Vec<u64>,

    /// Skip batch items whose fields fail this selector=value condition
    #[arg(long, value_name = "SELECTOR=VALUE", requires = "items")]
    require: Option<String>,

    /// Allow restricted definitions
    #[arg(long)]
    allow_restricted: bool,

    /// Refuse non-JSON definitions, nested references included
    #[arg(long, conflicts_with = "raw_only")]
    json_only: bool,

    /// Refuse non-raw definitions, nested references included
    #[arg(long)]
    raw_only: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Definition to check; all of them when omitted
    id: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let workspace = Workspace::load(&cli.workspace)?;
    match cli.command {
        Commands::Render(args) => run_render(&workspace, &args),
        Commands::List => run_list(&workspace),
        Commands::Check(args) => run_check(&workspace, args.id),
    }
}

fn run_render(workspace: &Workspace, args: &RenderArgs) -> Result<()> {
    let resolver = Resolver::with_limits(&workspace.catalog, &workspace.store, workspace.limits);
    let scope = RenderScope {
        tenant: None,
        allow_restricted: args.allow_restricted,
    };
    let request = RenderRequest {
        strip_newlines_and_tabs: args.strip,
        results_per_page: args.per_page,
        page: args.page,
        allowed_formats: allowed_formats(args),
    };
    let params = parse_params(&args.params)?;

    if args.items.is_empty() {
        let output = resolver.render(&scope, args.id, &params, &request)?;
        println!("{output}");
        return Ok(());
    }

    let items = match &args.require {
        Some(require) => {
            let condition = parse_condition(require)?;
            filter_items(workspace, &args.items, &condition)
        }
        None => args.items.clone(),
    };

    let outcome = resolver.render_for_items(&scope, args.id, &items, &params, &request);
    for (item_id, output) in &outcome.rendered {
        println!("{item_id}\t{output}");
    }
    for (item_id, err) in &outcome.failed {
        eprintln!("item {item_id}: {err}");
    }
    if !outcome.is_complete() {
        bail!("{} of {} items failed", outcome.failed.len(), outcome.len());
    }
    Ok(())
}

fn run_list(workspace: &Workspace) -> Result<()> {
    let mut outputs: Vec<&StyledOutput> = workspace.catalog.iter().collect();
    outputs.sort_by_key(|o| o.id);

    for output in outputs {
        let format = match output.return_type {
            ReturnFormat::Json => "json",
            ReturnFormat::Raw => "raw",
        };
        let mut flags = Vec::new();
        if !output.enabled {
            flags.push("disabled");
        }
        if output.restricted {
            flags.push("restricted");
        }
        println!(
            "{}\t{}\t{}\tquery={}\t{}",
            output.id,
            output.name,
            format,
            output.query_id,
            flags.join(",")
        );
    }
    Ok(())
}

fn run_check(workspace: &Workspace, id: Option<u64>) -> Result<()> {
    let mut targets: Vec<&StyledOutput> = match id {
        Some(id) => vec![workspace
            .catalog
            .get(id)
            .ok_or_else(|| anyhow!("styled output {id} does not exist"))?],
        None => workspace.catalog.iter().collect(),
    };
    targets.sort_by_key(|o| o.id);

    let mut problems = Vec::new();
    for output in targets {
        check_output(workspace, output, &mut problems);
    }

    if problems.is_empty() {
        println!("ok");
        return Ok(());
    }
    for problem in &problems {
        eprintln!("{problem}");
    }
    bail!("{} problem(s) found", problems.len());
}

fn check_output(workspace: &Workspace, output: &StyledOutput, problems: &mut Vec<String>) {
    if workspace.store.query(output.query_id).is_none() {
        problems.push(format!(
            "output {}: stored query {} does not exist",
            output.id, output.query_id
        ));
    }

    if let Err(err) = styledout::OutputOptions::parse(&output.options) {
        problems.push(format!("output {}: {err}", output.id));
    }

    match scan_directives(&output.format_item) {
        Err(err) => problems.push(format!("output {}: {err}", output.id)),
        Ok(directives) => {
            for directive in directives {
                if directive.name == NESTED_KEYWORD {
                    match directive.args.first().and_then(|a| a.parse::<u64>().ok()) {
                        Some(nested) if workspace.catalog.get(nested).is_none() => {
                            problems.push(format!(
                                "output {}: nested styled output {nested} does not exist",
                                output.id
                            ));
                        }
                        Some(_) => {}
                        None => problems.push(format!(
                            "output {}: `{NESTED_KEYWORD}` needs a numeric id",
                            output.id
                        )),
                    }
                } else if builtins::find(&directive.name).is_none() {
                    problems.push(format!(
                        "output {}: unknown placeholder keyword `{}`",
                        output.id, directive.name
                    ));
                }
            }
        }
    }
}

/// Parses `name=value` parameters; values that read as JSON stay typed,
/// everything else becomes a string.
fn parse_params(raw: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for entry in raw {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("parameter `{entry}` is not of the form name=value"))?;
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        params.set(name, value);
    }
    Ok(params)
}

/// Parses `selector=value` into an arbitrary-value condition.
fn parse_condition(raw: &str) -> Result<ResultCondition> {
    let (selector, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("condition `{raw}` is not of the form selector=value"))?;
    Ok(ResultCondition::new(ConditionKind::Value, selector, value))
}

/// Keeps the items whose fields satisfy the condition; unknown items fail
/// it by definition.
fn filter_items(workspace: &Workspace, items: &[u64], condition: &ResultCondition) -> Vec<u64> {
    items
        .iter()
        .copied()
        .filter(|id| {
            workspace
                .store
                .item(*id)
                .is_some_and(|item| {
                    let mut row: Row = item.fields.clone();
                    row.insert("id".to_string(), Value::from(item.id));
                    condition.evaluate(&row)
                })
        })
        .collect()
}

fn allowed_formats(args: &RenderArgs) -> Option<Vec<ReturnFormat>> {
    if args.json_only {
        Some(vec![ReturnFormat::Json])
    } else if args.raw_only {
        Some(vec![ReturnFormat::Raw])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_parse_json_values_and_fall_back_to_text() {
        let params = parse_params(&[
            "count=3".to_string(),
            "name=Red Shoes".to_string(),
            "flag=true".to_string(),
        ])
        .unwrap();
        assert_eq!(params.get("count"), Some(&json!(3)));
        assert_eq!(params.get("name"), Some(&json!("Red Shoes")));
        assert_eq!(params.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn params_without_an_equals_sign_are_rejected() {
        assert!(parse_params(&["nonsense".to_string()]).is_err());
    }

    #[test]
    fn condition_parses_selector_and_value() {
        let condition = parse_condition("status=active").unwrap();
        assert_eq!(condition.kind, ConditionKind::Value);
        assert_eq!(condition.selector, "status");
        assert_eq!(condition.value_for_comparison, "active");
    }

    #[test]
    fn condition_requires_an_equals_sign() {
        assert!(parse_condition("status").is_err());
    }
}
