use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value as JsonValue};
use strsim::levenshtein;
use tracing::debug;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::filters::{decorate, FilterError, FilterKind, Highlighted};

use super::completions::{self, CompletionShell};
use super::exit_codes;
use super::output::{
    self, AppliedFilter, FilterData, OperatorsData, OutputMode, StateData, SwitchData,
};
use super::table::{self, ActiveFilter, ColumnBinding, ColumnFilter, Row, Table, WhereClause};

/// maximum edit distance for "did you mean" suggestions
const SUGGESTION_DISTANCE: usize = 2;

const HIGHLIGHT_OPEN: &str = "[";
const HIGHLIGHT_CLOSE: &str = "]";

#[derive(Parser)]
#[command(name = "gridfilter")]
#[command(about = "Operator-based column filters for tabular JSON data")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides GRIDFILTER_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log filter activity to stderr (GRIDFILTER_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the operators of a filter kind (string, date, boolean)
    Operators {
        /// Filter kind
        kind: String,
    },

    /// Filter the rows of a JSON file
    Filter {
        /// JSON file holding an array of row objects
        #[arg(short, long)]
        rows: PathBuf,

        /// Column filter as COLUMN:OP[:VALUE], repeatable (all must match)
        #[arg(short = 'w', long = "where", action = clap::ArgAction::Append)]
        filters: Vec<String>,

        /// Table-wide search term (case-insensitive, any cell)
        #[arg(short, long)]
        search: Option<String>,

        /// Mark filter and search matches in cells
        #[arg(long)]
        highlight: bool,

        /// Print only the number of matching rows
        #[arg(long, conflicts_with = "format")]
        count: bool,

        /// Print each matching row with a template, e.g. "{name} ({joined})"
        #[arg(long)]
        format: Option<String>,
    },

    /// Show how a filter value is reshaped when the operator changes
    Switch {
        /// Filter kind
        kind: String,

        /// Operator the value was entered under
        #[arg(long)]
        from: String,

        /// Operator to switch to
        #[arg(long)]
        to: String,

        /// Value as typed into the first operator's widget (dates: START..END for ranges)
        #[arg(long)]
        value: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print a shell completion script (bash, zsh, fish; detected from $SHELL if omitted)
    Completions {
        shell: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Show the default configuration with example columns
    Default,
    /// Verify configuration file for errors
    Verify,
}

/// candidates close to `query`: prefix/substring hits and small edit distances
pub fn suggest<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<String> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(&str, usize)> = candidates
        .iter()
        .map(|c| c.as_ref())
        .filter_map(|c| {
            let lower = c.to_lowercase();
            let distance = levenshtein(&query_lower, &lower);
            let related = !query_lower.is_empty()
                && (lower.starts_with(&query_lower) || lower.contains(&query_lower));
            if distance <= SUGGESTION_DISTANCE || related {
                Some((c, distance))
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
    });
    scored.into_iter().map(|(c, _)| c.to_string()).collect()
}

/// report an error in the active output mode and exit with `code`
fn fail(output_mode: OutputMode, code: i32, message: &str, suggestions: Vec<String>) -> ! {
    if output_mode.is_json() {
        output::print_json_error_with_suggestions(code, message, suggestions);
    } else {
        eprintln!("Error: {}", message);
        if !suggestions.is_empty() {
            eprintln!("Did you mean: {}?", suggestions.join(", "));
        }
    }
    std::process::exit(code);
}

fn fail_filter(output_mode: OutputMode, err: FilterError, column: Option<&str>) -> ! {
    match err {
        FilterError::UnknownOperator { code, available } => {
            let mut suggestions = suggest(&code, &available);
            if suggestions.is_empty() {
                suggestions = available;
            }
            let message = match column {
                Some(column) => format!("unknown operator '{}' for column '{}'", code, column),
                None => format!("unknown operator '{}'", code),
            };
            fail(output_mode, exit_codes::UNKNOWN_OPERATOR, &message, suggestions)
        }
        FilterError::InvalidValue { value, expected } => {
            let message = match column {
                Some(column) => format!(
                    "invalid value '{}' for column '{}' (expected {})",
                    value, column, expected
                ),
                None => format!("invalid value '{}' (expected {})", value, expected),
            };
            fail(output_mode, exit_codes::INVALID_ARGS, &message, vec![])
        }
        other => fail(output_mode, exit_codes::ERROR, &other.to_string(), vec![]),
    }
}

fn parse_kind(kind: &str, output_mode: OutputMode) -> FilterKind {
    match FilterKind::parse(kind) {
        Some(kind) => kind,
        None => {
            let kinds = [FilterKind::String, FilterKind::Date, FilterKind::Boolean]
                .map(|k| k.as_str().to_string());
            let mut suggestions = suggest(kind, &kinds);
            if suggestions.is_empty() {
                suggestions = kinds.to_vec();
            }
            fail(
                output_mode,
                exit_codes::INVALID_ARGS,
                &format!("unknown filter kind '{}'", kind),
                suggestions,
            )
        }
    }
}

fn load_config(config_path: Option<&Path>, output_mode: OutputMode) -> Config {
    match config::load_with_override(config_path) {
        Ok(config) => config,
        Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![]),
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let format_requested = matches!(&cli.command, Commands::Filter { format: Some(_), .. });
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet, format_requested);

    match cli.command {
        Commands::Operators { kind } => {
            let config = load_config(config_path, output_mode);
            let kind = parse_kind(&kind, output_mode);
            let filter = ColumnFilter::new(kind, None, &config.settings);
            let operators = filter.operators();
            let default = operators
                .first()
                .map(|op| op.code.clone())
                .unwrap_or_default();

            match output_mode {
                OutputMode::Json => output::print_json(&OperatorsData {
                    kind: kind.to_string(),
                    default,
                    operators,
                }),
                OutputMode::Quiet => {}
                _ => {
                    let header = ["code", "label", "widget"].map(String::from).to_vec();
                    let rows: Vec<Vec<String>> = operators
                        .into_iter()
                        .map(|op| {
                            let code = if op.code == default {
                                format!("{} *", op.code)
                            } else {
                                op.code
                            };
                            vec![code, op.label, op.widget]
                        })
                        .collect();
                    println!("{}", output::render_table(&header, &rows));
                }
            }
            Ok(())
        }

        Commands::Filter {
            rows,
            filters,
            search,
            highlight,
            count,
            format,
        } => {
            let config = load_config(config_path, output_mode);
            let table = match Table::load(&rows) {
                Ok(table) => table,
                Err(e) => fail(output_mode, exit_codes::ROWS_ERROR, &format!("{:#}", e), vec![]),
            };

            let bindings = bind_filters(&table, &config, &filters, output_mode);
            let search = search.filter(|s| !s.is_empty());

            let kept = match table::filter_rows(&table, &bindings, search.as_deref()) {
                Ok(kept) => kept,
                Err(e) => fail_filter(output_mode, e, None),
            };
            let matched: Vec<&Row> = kept.iter().map(|&i| &table.rows()[i]).collect();

            match output_mode {
                OutputMode::Quiet => {}
                OutputMode::Json => {
                    let highlights = highlight.then(|| {
                        matched
                            .iter()
                            .map(|row| highlight_row(row, &bindings, search.as_deref()))
                            .collect()
                    });
                    output::print_json(&FilterData {
                        total: table.rows().len(),
                        matched: matched.len(),
                        filters: bindings.iter().map(applied_filter).collect(),
                        search: search.clone(),
                        rows: matched
                            .iter()
                            .map(|row| JsonValue::Object((*row).clone()))
                            .collect(),
                        highlights,
                    });
                }
                OutputMode::Format => {
                    let template = format.unwrap_or_default();
                    for row in &matched {
                        println!("{}", output::format_template(&template, row));
                    }
                }
                OutputMode::Text if count => println!("{}", matched.len()),
                OutputMode::Text => {
                    let header: Vec<String> = table
                        .columns()
                        .iter()
                        .map(|c| {
                            config
                                .column(c)
                                .map(|cfg| cfg.display_name().to_string())
                                .unwrap_or_else(|| c.clone())
                        })
                        .collect();

                    let cells: Vec<Vec<String>> = matched
                        .iter()
                        .map(|row| {
                            table
                                .columns()
                                .iter()
                                .map(|column| {
                                    let text = table::cell_text(row.get(column));
                                    if highlight {
                                        cell_highlight(&text, column, &bindings, search.as_deref())
                                            .render(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
                                    } else {
                                        text
                                    }
                                })
                                .collect()
                        })
                        .collect();

                    if cells.is_empty() {
                        eprintln!("No matching rows ({} total)", table.rows().len());
                    } else {
                        println!("{}", output::render_table(&header, &cells));
                    }
                }
            }
            Ok(())
        }

        Commands::Switch {
            kind,
            from,
            to,
            value,
        } => {
            let config = load_config(config_path, output_mode);
            let kind = parse_kind(&kind, output_mode);
            let filter = ColumnFilter::new(kind, None, &config.settings);

            let (before, after) = match filter.transition(&from, &to, value.as_deref()) {
                Ok(values) => values,
                Err(e) => fail_filter(output_mode, e, None),
            };

            let widget_of = |code: &str| {
                filter
                    .operators()
                    .into_iter()
                    .find(|op| op.code == code)
                    .map(|op| op.widget)
                    .unwrap_or_default()
            };
            let data = SwitchData {
                kind: kind.to_string(),
                from: StateData {
                    widget: widget_of(&from),
                    op: from,
                    value: before,
                },
                to: StateData {
                    widget: widget_of(&to),
                    op: to,
                    value: after,
                },
            };

            match output_mode {
                OutputMode::Json => output::print_json(&data),
                OutputMode::Quiet => {}
                _ => {
                    let header = ["", "op", "value", "widget"].map(String::from).to_vec();
                    let rows = [("from", &data.from), ("to", &data.to)]
                        .into_iter()
                        .map(|(side, state)| {
                            vec![
                                side.to_string(),
                                state.op.clone(),
                                state.value.to_string(),
                                state.widget.clone(),
                            ]
                        })
                        .collect::<Vec<_>>();
                    println!("{}", output::render_table(&header, &rows));
                }
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = load_config(config_path, output_mode);
                if output_mode.is_json() {
                    output::print_json(&config);
                } else if !output_mode.is_quiet() {
                    let json = serde_json::to_string_pretty(&config)
                        .context("Failed to serialize config")?;
                    println!("{}", json);
                }
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::resolve_path(config_path);
                if output_mode.is_json() {
                    output::print_json(&json!({ "path": path }));
                } else if !output_mode.is_quiet() {
                    println!("{}", path.display());
                }
                Ok(())
            }
            ConfigCommands::Default => {
                let config = config::default_with_examples();
                if output_mode.is_json() {
                    output::print_json(&config);
                } else {
                    let json = serde_json::to_string_pretty(&config)
                        .context("Failed to serialize config")?;
                    println!("{}", json);
                }
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::resolve_path(config_path);
                let errors = match config::verify(&path) {
                    Ok(errors) => errors,
                    Err(e) => fail(output_mode, exit_codes::CONFIG_ERROR, &format!("{:#}", e), vec![]),
                };

                if errors.is_empty() {
                    if output_mode.is_json() {
                        output::print_json(&json!({ "valid": true, "path": path }));
                    } else if !output_mode.is_quiet() {
                        println!("✓ Configuration is valid: {}", path.display());
                    }
                    return Ok(());
                }

                let message = format!(
                    "configuration has {} error(s): {}",
                    errors.len(),
                    path.display()
                );
                if output_mode.is_json() {
                    output::print_json_error_with_details(exit_codes::CONFIG_ERROR, &message, &errors);
                } else {
                    eprintln!("✗ {}", message);
                    for error in &errors {
                        eprintln!("  - {}", error);
                    }
                }
                std::process::exit(exit_codes::CONFIG_ERROR);
            }
        },

        Commands::Completions { shell } => {
            let shell = match shell {
                Some(name) => match name.parse::<CompletionShell>() {
                    Ok(shell) => shell,
                    Err(()) => fail(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &format!("unsupported shell '{}'", name),
                        CompletionShell::all().map(|s| s.name().to_string()).to_vec(),
                    ),
                },
                None => match completions::detect_shell() {
                    Some(shell) => shell,
                    None => fail(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        "could not detect shell from $SHELL",
                        CompletionShell::all().map(|s| s.name().to_string()).to_vec(),
                    ),
                },
            };

            debug!(shell = shell.name(), "generating completions");
            std::io::stdout()
                .write_all(&completions::generate_completion(shell))
                .context("Failed to write completion script")?;
            Ok(())
        }
    }
}

/// resolve each `--where` clause to a column and activate its filter
fn bind_filters(
    table: &Table,
    config: &Config,
    clauses: &[String],
    output_mode: OutputMode,
) -> Vec<ColumnBinding> {
    let mut bindings = Vec::with_capacity(clauses.len());

    for raw in clauses {
        let clause = match WhereClause::parse(raw) {
            Ok(clause) => clause,
            Err(e) => fail(output_mode, exit_codes::INVALID_ARGS, &e.to_string(), vec![]),
        };

        let column = match table.find_column(&clause.column) {
            Some(column) => column.to_string(),
            None => fail(
                output_mode,
                exit_codes::COLUMN_NOT_FOUND,
                &format!("column '{}' not found", clause.column),
                suggest(&clause.column, table.columns()),
            ),
        };

        let column_config = config.column(&column);
        let kind = table.column_kind(&column, column_config);
        let filter = ColumnFilter::new(kind, column_config, &config.settings);

        let active = match filter.activate(clause.op.as_deref(), clause.value.as_deref()) {
            Ok(active) => active,
            Err(e) => fail_filter(output_mode, e, Some(&column)),
        };

        debug!(
            column = %column,
            kind = %kind,
            op = active.operator(),
            "activated column filter"
        );
        bindings.push(ColumnBinding {
            column,
            filter: active,
        });
    }

    bindings
}

fn applied_filter(binding: &ColumnBinding) -> AppliedFilter {
    AppliedFilter {
        column: binding.column.clone(),
        kind: binding.filter.kind().to_string(),
        op: binding.filter.operator().to_string(),
        value: binding.filter.value_json(),
    }
}

/// the first text filter bound to `column`
fn column_filter<'a>(column: &str, bindings: &'a [ColumnBinding]) -> Option<&'a ActiveFilter> {
    bindings
        .iter()
        .filter(|b| b.column == column)
        .map(|b| &b.filter)
        .find(|f| f.highlight_text().is_some())
}

fn cell_highlight(
    text: &str,
    column: &str,
    bindings: &[ColumnBinding],
    search: Option<&str>,
) -> Highlighted {
    let filter_text = column_filter(column, bindings).and_then(|f| f.highlight_text());
    decorate(text, filter_text, search)
}

fn highlight_row(
    row: &Row,
    bindings: &[ColumnBinding],
    search: Option<&str>,
) -> BTreeMap<String, Highlighted> {
    row.iter()
        .filter_map(|(column, value)| {
            let text = table::cell_text(Some(value));
            let highlighted = cell_highlight(&text, column, bindings, search);
            highlighted
                .has_matches()
                .then(|| (column.clone(), highlighted))
        })
        .collect()
}
