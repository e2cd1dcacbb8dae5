//! Report lookup, access control and execution.

use polars::prelude::DataFrame;
use rma_map::ColumnResolver;
use rma_model::{
    ColumnRef, ReportId, ReportParams, ReportRequest, ReportResult, Role, SemanticField, TimePart,
};
use rma_transform::frame::{filter_rows, flag_column, has_column};
use tracing::{debug, debug_span};

use crate::error::{ReportError, Result};
use crate::ops::{
    Condition, GroupKey, GroupSpec, Measure, OutcomeColumns, RankSpec, average_processing_days,
    average_processing_days_by, group_outcomes, listing, repeated_serials, select_rows,
    status_breakdown, top_n,
};
use crate::templates::{Param, TemplateInfo, template, title};

/// The report catalog.
///
/// Holds the column resolver used to locate each report's inputs. Datasets
/// are expected to be normalized, so derived `year`/`month`/`quarter`
/// columns are present when the intake date resolved.
#[derive(Debug, Clone, Default)]
pub struct ReportCatalog {
    resolver: ColumnResolver,
}

/// Columns resolved for one run, keyed by what the report asked for.
struct Resolved {
    columns: Vec<(ColumnRef, String)>,
}

impl Resolved {
    /// Header for `column`. Only called for columns listed by the template,
    /// which are all present once resolution succeeded.
    fn get(&self, column: impl Into<ColumnRef>) -> &str {
        let column = column.into();
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map_or("", |(_, name)| name.as_str())
    }

    fn key(&self, column: impl Into<ColumnRef>) -> GroupKey {
        let column = column.into();
        GroupKey::new(self.get(column), column.label())
    }

    fn outcomes(&self) -> OutcomeColumns {
        OutcomeColumns {
            repaired: self.get(SemanticField::Repaired).to_string(),
            unrepairable: self.get(SemanticField::Unrepairable).to_string(),
            rejected: self.get(SemanticField::WarrantyRejected).to_string(),
        }
    }
}

impl ReportCatalog {
    pub fn new(resolver: ColumnResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ColumnResolver {
        &self.resolver
    }

    /// Reports `role` may run, in catalog order.
    pub fn visible(&self, role: Role) -> Vec<TemplateInfo> {
        ReportId::ALL
            .iter()
            .map(|id| template(*id))
            .filter(|info| role.allows(info.min_role))
            .collect()
    }

    /// Runs `request` against `df` on behalf of `role`.
    ///
    /// Unresolvable columns yield [`ReportOutcome::MissingColumns`]; role and
    /// parameter problems are errors.
    ///
    /// [`ReportOutcome::MissingColumns`]: rma_model::ReportOutcome::MissingColumns
    pub fn run(&self, df: &DataFrame, request: &ReportRequest, role: Role) -> Result<ReportResult> {
        let info = template(request.id);
        let _span = debug_span!("report", id = %request.id).entered();
        check_request(&info, &request.params, role)?;

        let title = title(request.id, &request.params);
        let resolved = match self.resolve_columns(df, &info, &request.params) {
            Ok(resolved) => resolved,
            Err(missing) => {
                debug!(missing = missing.len(), "report columns not resolved");
                return Ok(ReportResult::missing(title, missing));
            }
        };
        let frame = execute(df, &info, &request.params, &resolved)?;
        debug!(rows_in = df.height(), rows_out = frame.height(), "report computed");
        Ok(ReportResult::from_frame(title, frame))
    }

    fn resolve_columns(
        &self,
        df: &DataFrame,
        info: &TemplateInfo,
        params: &ReportParams,
    ) -> std::result::Result<Resolved, Vec<ColumnRef>> {
        let mut columns = Vec::new();
        let mut missing = Vec::new();
        for column in info.required_columns(params) {
            let found = match column {
                ColumnRef::Field(field) => self.resolver.resolve_in(df, field),
                ColumnRef::Derived(part) => {
                    let name = part.column_name();
                    has_column(df, name).then(|| name.to_string())
                }
            };
            match found {
                Some(name) => columns.push((column, name)),
                None => missing.push(column),
            }
        }
        if missing.is_empty() {
            Ok(Resolved { columns })
        } else {
            Err(missing)
        }
    }
}

fn check_request(info: &TemplateInfo, params: &ReportParams, role: Role) -> Result<()> {
    if !role.allows(info.min_role) {
        return Err(ReportError::InsufficientRole {
            report: info.id,
            required: info.min_role,
            role,
        });
    }
    if let Some(param) = info.required.iter().find(|p| !p.is_set(params)) {
        return Err(ReportError::MissingParameter {
            report: info.id,
            param: *param,
        });
    }
    let invalid = |param, value: String, reason| ReportError::InvalidParameter {
        report: info.id,
        param,
        value,
        reason,
    };
    if info.accepts(Param::Month)
        && let Some(month) = params.month
        && !(1..=12).contains(&month)
    {
        return Err(invalid(Param::Month, month.to_string(), "expected 1-12"));
    }
    if info.accepts(Param::Quarter)
        && let Some(quarter) = params.quarter
        && !(1..=4).contains(&quarter)
    {
        return Err(invalid(Param::Quarter, quarter.to_string(), "expected 1-4"));
    }
    if info.accepts(Param::TopN) && params.top_n == Some(0) {
        return Err(invalid(Param::TopN, "0".to_string(), "expected at least 1"));
    }
    Ok(())
}

fn text<'a>(column: &'a str, value: Option<&'a String>) -> Condition<'a> {
    Condition::Text {
        column,
        value: value.map_or("", String::as_str),
    }
}

fn execute(
    df: &DataFrame,
    info: &TemplateInfo,
    params: &ReportParams,
    cols: &Resolved,
) -> Result<DataFrame> {
    use SemanticField::{
        Customer, ErrorName, IntakeDate, Product, ProductGroup, Repaired, ReturnDate, Serial,
        Technician, WarrantyRejected,
    };

    let n = info.top_n(params).unwrap_or(usize::MAX);
    let part_key = || params.group_by.map(|part| cols.key(part));
    let grouped = |data: &DataFrame, keys: Vec<GroupKey>, measures: &[Measure], precision| {
        group_outcomes(
            data,
            &GroupSpec {
                keys,
                outcomes: measures
                    .iter()
                    .any(Measure::reads_outcomes)
                    .then(|| cols.outcomes()),
                measures: measures.to_vec(),
                precision,
            },
        )
    };
    let ranked = |data: &DataFrame, field: SemanticField, repaired: bool| {
        top_n(
            data,
            &RankSpec {
                key: cols.key(field),
                n,
                repaired: repaired.then(|| cols.get(Repaired).to_string()),
            },
        )
    };
    let rates = [Measure::Ok, Measure::Fail, Measure::Tcbh, Measure::SuccessRate];

    let frame = match info.id {
        ReportId::TotalByTime => {
            grouped(df, part_key().into_iter().collect(), &[Measure::Count], 2)?
        }
        ReportId::SuccessRateByTime => grouped(df, part_key().into_iter().collect(), &rates, 2)?,
        ReportId::UnrepairedProducts => {
            let keep: Vec<bool> = flag_column(df, cols.get(Repaired))?
                .into_iter()
                .map(|fixed| !fixed)
                .collect();
            let columns = [
                cols.key(IntakeDate),
                cols.key(Customer),
                cols.key(Product),
                cols.key(Repaired),
            ];
            listing(df, &columns, &keep)?
        }
        ReportId::TopCustomers => ranked(df, Customer, false)?,
        ReportId::TopProductsByCustomer => {
            let subset = select_rows(df, &[text(cols.get(Customer), params.customer.as_ref())])?;
            ranked(&subset, Product, true)?
        }
        ReportId::TotalByCustomerAndTime => {
            let subset = select_rows(df, &[text(cols.get(Customer), params.customer.as_ref())])?;
            grouped(
                &subset,
                part_key().into_iter().collect(),
                &[Measure::Count],
                2,
            )?
        }
        ReportId::TopProducts => ranked(df, Product, true)?,
        ReportId::TopRejectedProducts => {
            let keep = flag_column(df, cols.get(WarrantyRejected))?;
            let subset = filter_rows(df, &keep)?;
            ranked(&subset, Product, false)?
        }
        ReportId::ProductStatus => {
            let subset = select_rows(df, &[text(cols.get(Product), params.product.as_ref())])?;
            status_breakdown(&subset, &cols.outcomes())?
        }
        ReportId::TopErrors => ranked(df, ErrorName, false)?,
        ReportId::TopErrorsByProduct => {
            let subset = select_rows(df, &[text(cols.get(Product), params.product.as_ref())])?;
            ranked(&subset, ErrorName, false)?
        }
        ReportId::TopErrorsByCustomerProduct => {
            let subset = select_rows(
                df,
                &[
                    text(cols.get(Customer), params.customer.as_ref()),
                    text(cols.get(Product), params.product.as_ref()),
                ],
            )?;
            ranked(&subset, ErrorName, false)?
        }
        ReportId::StatusSummary => status_breakdown(df, &cols.outcomes())?,
        ReportId::OverallSuccessRate => {
            grouped(df, Vec::new(), &[Measure::Total, Measure::SuccessRate], 2)?
        }
        ReportId::RejectedProducts => {
            let keep = flag_column(df, cols.get(WarrantyRejected))?;
            let columns = [
                cols.key(Product),
                cols.key(Customer),
                cols.key(TimePart::Month),
                cols.key(TimePart::Year),
            ];
            listing(df, &columns, &keep)?
        }
        ReportId::TopCustomersByProduct => {
            let subset = select_rows(df, &[text(cols.get(Product), params.product.as_ref())])?;
            ranked(&subset, Customer, true)?
        }
        ReportId::TopErrorsByCustomerQuarter => {
            let subset = select_rows(
                df,
                &[
                    text(cols.get(Customer), params.customer.as_ref()),
                    Condition::Number {
                        column: cols.get(TimePart::Quarter),
                        value: params.quarter.unwrap_or_default(),
                    },
                ],
            )?;
            ranked(&subset, ErrorName, false)?
        }
        ReportId::SuccessRateByCustomerProductMonth => {
            let subset = select_rows(
                df,
                &[
                    text(cols.get(Customer), params.customer.as_ref()),
                    text(cols.get(Product), params.product.as_ref()),
                    Condition::Number {
                        column: cols.get(TimePart::Month),
                        value: params.month.unwrap_or_default(),
                    },
                ],
            )?;
            grouped(
                &subset,
                Vec::new(),
                &[Measure::Total, Measure::SuccessRate],
                2,
            )?
        }
        ReportId::TopTechnicians => ranked(df, Technician, false)?,
        ReportId::TechnicianSuccessRateByTime => {
            let keys = part_key()
                .into_iter()
                .chain([cols.key(Technician)])
                .collect();
            grouped(df, keys, &rates, 2)?
        }
        ReportId::TechnicianSummary => grouped(
            df,
            vec![cols.key(Technician)],
            &[
                Measure::Ok,
                Measure::Fail,
                Measure::Tcbh,
                Measure::Total,
                Measure::SuccessRate,
            ],
            1,
        )?,
        ReportId::SuccessRateByProduct => grouped(df, vec![cols.key(Product)], &rates, 1)?,
        ReportId::CountByProduct => grouped(df, vec![cols.key(Product)], &[Measure::Count], 1)?,
        ReportId::AvgProcessingTime => {
            average_processing_days(df, cols.get(IntakeDate), cols.get(ReturnDate))?
        }
        ReportId::TopProductsInGroup => {
            let subset = select_rows(
                df,
                &[text(cols.get(ProductGroup), params.product_group.as_ref())],
            )?;
            ranked(&subset, Product, true)?
        }
        ReportId::AvgProcessingTimeByCustomer => {
            let subset = match params.customer.as_ref() {
                Some(customer) if !customer.trim().is_empty() => {
                    select_rows(df, &[text(cols.get(Customer), Some(customer))])?
                }
                _ => df.clone(),
            };
            average_processing_days_by(
                &subset,
                cols.get(IntakeDate),
                cols.get(ReturnDate),
                &cols.key(Customer),
            )?
        }
        ReportId::RepeatedSerials => repeated_serials(df, cols.get(Serial))?,
        ReportId::ProductVolume => {
            let subset = select_rows(df, &[text(cols.get(Product), params.product.as_ref())])?;
            if subset.height() == 0 {
                DataFrame::empty()
            } else {
                ranked(&subset, Product, true)?
            }
        }
    };
    Ok(frame)
}
