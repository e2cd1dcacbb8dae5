use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, trace};

use rma_cli::config::Config;
use rma_cli::export::write_csv_file;
use rma_ingest::read_csv_dataset;
use rma_map::closest_header;
use rma_model::{
    DateRange, FilterSpec, ReportOutcome, ReportParams, ReportRequest, ReportResult, Role,
    SemanticField,
};
use rma_report::ReportCatalog;
use rma_transform::frame::column_names;
use rma_transform::{FilteredDataset, apply_filter_with_report, normalize};

use crate::cli::{ColumnsArgs, FilterArgs, ParamArgs, ReportArgs, ReportsArgs};
use crate::summary::{print_columns, print_reports, print_result};

/// Exit code when a report could not find the columns it needs.
pub const EXIT_MISSING_COLUMNS: i32 = 2;

pub fn run_reports(args: &ReportsArgs, config: &Config) -> Result<()> {
    let role = effective_role(args.role, config);
    let catalog = ReportCatalog::new(config.resolver());
    print_reports(&catalog.visible(role), role);
    Ok(())
}

pub fn run_columns(args: &ColumnsArgs, config: &Config) -> Result<()> {
    let df = read_csv_dataset(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;
    let headers = column_names(&df);
    let resolver = config.resolver();
    let rows: Vec<_> = resolver
        .resolve_all(&headers)
        .into_iter()
        .map(|(field, header)| {
            let hint = if header.is_none() {
                closest_header(&resolver, &headers, field)
            } else {
                None
            };
            (field, header, hint)
        })
        .collect();
    print_columns(&rows);
    Ok(())
}

/// Runs one report and returns the process exit code.
pub fn run_report(args: &ReportArgs, config: &Config) -> Result<i32> {
    let role = effective_role(args.role, config);
    let span = info_span!("report", id = %args.report, role = %role);
    let _guard = span.enter();
    let resolver = config.resolver();

    let raw = {
        let _stage = info_span!("load").entered();
        let df = read_csv_dataset(&args.input)
            .with_context(|| format!("load {}", args.input.display()))?;
        info!(rows = df.height(), columns = df.width(), "dataset loaded");
        df
    };
    let normalized = {
        let _stage = info_span!("normalize").entered();
        normalize(&raw, &resolver).context("normalize dataset")?
    };
    let FilteredDataset { data, ignored } = {
        let _stage = info_span!("filter").entered();
        let spec = filter_spec(&args.filters);
        let filtered =
            apply_filter_with_report(&normalized, &spec, &resolver).context("apply filters")?;
        info!(
            rows_in = normalized.height(),
            rows_out = filtered.data.height(),
            "filters applied"
        );
        filtered
    };

    let request = ReportRequest::new(args.report).with_params(report_params(&args.params, config));
    trace!(customer = ?request.params.customer, product = ?request.params.product, "report parameters");
    let catalog = ReportCatalog::new(resolver);
    let result = {
        let _stage = info_span!("run").entered();
        catalog
            .run(&data, &request, role)
            .with_context(|| format!("run report {}", args.report))?
    };

    print_result(&result, &ignored);
    if let Some(path) = &args.output {
        export(&result, path)?;
    }
    Ok(exit_code(&result))
}

fn export(result: &ReportResult, path: &std::path::Path) -> Result<()> {
    match &result.outcome {
        ReportOutcome::Table(frame) => {
            write_csv_file(frame, path)?;
            info!(path = %path.display(), rows = frame.height(), "result written");
        }
        ReportOutcome::Empty | ReportOutcome::MissingColumns(_) => {
            debug!(path = %path.display(), "no table to write");
        }
    }
    Ok(())
}

fn exit_code(result: &ReportResult) -> i32 {
    match result.outcome {
        ReportOutcome::Table(_) | ReportOutcome::Empty => 0,
        ReportOutcome::MissingColumns(_) => EXIT_MISSING_COLUMNS,
    }
}

fn effective_role(flag: Option<Role>, config: &Config) -> Role {
    flag.or(config.role).unwrap_or_default()
}

fn report_params(args: &ParamArgs, config: &Config) -> ReportParams {
    ReportParams {
        group_by: args.group_by,
        customer: args.customer.clone(),
        product: args.product.clone(),
        product_group: args.product_group.clone(),
        month: args.month,
        quarter: args.quarter,
        top_n: args.top_n.or(config.default_top_n),
    }
}

fn filter_spec(args: &FilterArgs) -> FilterSpec {
    let mut spec = FilterSpec::new();
    if args.from.is_some() || args.to.is_some() {
        spec = spec.with_date_range(DateRange::new(args.from, args.to));
    }
    let mut categories: BTreeMap<SemanticField, Vec<String>> = BTreeMap::new();
    for (field, value) in &args.filter {
        categories.entry(*field).or_default().push(value.clone());
    }
    for (field, values) in categories {
        spec = spec.with_category(field, values);
    }
    for (field, keyword) in &args.search {
        spec = spec.with_search(*field, keyword.clone());
    }
    spec
}
