//! CLI argument definitions for the RMA report tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rma_model::{ReportId, Role, SemanticField, TimePart};

#[derive(Parser)]
#[command(
    name = "rma",
    version,
    about = "Warranty and repair reports over RMA intake exports",
    long_about = "Warranty and repair reports over RMA intake exports.\n\n\
                  Loads a CSV export, locates columns by their meaning rather than\n\
                  their exact spelling, and runs parameterized reports on it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: rma.toml in the working directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the reports a role may run.
    Reports(ReportsArgs),

    /// Show which header each semantic field resolves to.
    Columns(ColumnsArgs),

    /// Run one report on a CSV export.
    Report(ReportArgs),
}

#[derive(Args)]
pub struct ReportsArgs {
    /// Caller role (user, mod, admin).
    #[arg(long = "role")]
    pub role: Option<Role>,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// CSV export to inspect.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct ReportArgs {
    /// CSV export to report on.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Report identifier, as listed by `rma reports`.
    #[arg(value_name = "REPORT")]
    pub report: ReportId,

    /// Caller role (user, mod, admin).
    #[arg(long = "role")]
    pub role: Option<Role>,

    /// Write the result table to a CSV file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Report parameters.
#[derive(Args)]
#[command(next_help_heading = "Report parameters")]
pub struct ParamArgs {
    /// Time part to group by (year, month, quarter).
    #[arg(long = "group-by", value_name = "PART")]
    pub group_by: Option<TimePart>,

    #[arg(long = "customer", value_name = "NAME")]
    pub customer: Option<String>,

    #[arg(long = "product", value_name = "NAME")]
    pub product: Option<String>,

    #[arg(long = "product-group", value_name = "NAME")]
    pub product_group: Option<String>,

    /// Month number (1-12).
    #[arg(long = "month", value_name = "N")]
    pub month: Option<u32>,

    /// Quarter number (1-4).
    #[arg(long = "quarter", value_name = "N")]
    pub quarter: Option<u32>,

    /// Number of ranked rows to keep.
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,
}

/// Row filters applied before the report runs.
#[derive(Args)]
#[command(next_help_heading = "Filters")]
pub struct FilterArgs {
    /// Earliest intake date, inclusive (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Latest intake date, inclusive (YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Keep rows whose FIELD equals VALUE; repeat to allow several values.
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_field_value)]
    pub filter: Vec<(SemanticField, String)>,

    /// Keep rows whose FIELD contains KEYWORD, ignoring case; repeats combine with AND.
    #[arg(long = "search", value_name = "FIELD=KEYWORD", value_parser = parse_field_value)]
    pub search: Vec<(SemanticField, String)>,
}

/// Parses `field=value`, where `field` is a semantic field id.
pub fn parse_field_value(raw: &str) -> Result<(SemanticField, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim().parse::<SemanticField>().map_err(|e| e.to_string())?;
    Ok((field, value.trim().to_string()))
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_pairs_are_trimmed() {
        assert_eq!(
            parse_field_value("customer = Acme Corp ").unwrap(),
            (SemanticField::Customer, "Acme Corp".to_string())
        );
        assert!(parse_field_value("customer").is_err());
        assert!(parse_field_value("colour=red").is_err());
    }

    #[test]
    fn report_command_parses_params_and_filters() {
        let cli = Cli::try_parse_from([
            "rma",
            "report",
            "export.csv",
            "top-products-by-customer",
            "--customer",
            "Acme",
            "--top-n",
            "5",
            "--from",
            "2024-01-01",
            "--filter",
            "product=X",
            "--filter",
            "product=Y",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.report, ReportId::TopProductsByCustomer);
        assert_eq!(args.params.top_n, Some(5));
        assert_eq!(args.filters.filter.len(), 2);
        assert_eq!(args.filters.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }
}
