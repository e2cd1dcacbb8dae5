//! Static description of every report: parameters, columns and access level.

use std::fmt;

use rma_model::{ColumnRef, ReportId, ReportParams, Role, SemanticField, TimePart};

/// A request parameter a report can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    GroupBy,
    Customer,
    Product,
    ProductGroup,
    Month,
    Quarter,
    TopN,
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::GroupBy => "group-by",
            Param::Customer => "customer",
            Param::Product => "product",
            Param::ProductGroup => "product-group",
            Param::Month => "month",
            Param::Quarter => "quarter",
            Param::TopN => "top-n",
        }
    }

    /// Returns true when `params` carries a usable value for this parameter.
    pub fn is_set(&self, params: &ReportParams) -> bool {
        fn text(value: Option<&String>) -> bool {
            value.is_some_and(|v| !v.trim().is_empty())
        }
        match self {
            Param::GroupBy => params.group_by.is_some(),
            Param::Customer => text(params.customer.as_ref()),
            Param::Product => text(params.product.as_ref()),
            Param::ProductGroup => text(params.product_group.as_ref()),
            Param::Month => params.month.is_some(),
            Param::Quarter => params.quarter.is_some(),
            Param::TopN => params.top_n.is_some(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog entry for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: ReportId,
    /// One-line description for menus.
    pub summary: &'static str,
    pub required: &'static [Param],
    pub optional: &'static [Param],
    /// Dataset columns the report reads, besides the `group_by` time part.
    pub columns: &'static [ColumnRef],
    pub min_role: Role,
    pub default_top_n: Option<usize>,
}

impl TemplateInfo {
    /// Every column the report needs for `params`, in declaration order.
    pub fn required_columns(&self, params: &ReportParams) -> Vec<ColumnRef> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        if self.required.contains(&Param::GroupBy)
            && let Some(part) = params.group_by
        {
            columns.push(ColumnRef::Derived(part));
        }
        columns.extend_from_slice(self.columns);
        columns
    }

    /// Effective top-N for `params`.
    pub fn top_n(&self, params: &ReportParams) -> Option<usize> {
        params.top_n.or(self.default_top_n)
    }

    pub fn accepts(&self, param: Param) -> bool {
        self.required.contains(&param) || self.optional.contains(&param)
    }
}

const CUSTOMER: ColumnRef = ColumnRef::Field(SemanticField::Customer);
const PRODUCT: ColumnRef = ColumnRef::Field(SemanticField::Product);
const PRODUCT_GROUP: ColumnRef = ColumnRef::Field(SemanticField::ProductGroup);
const REPAIRED: ColumnRef = ColumnRef::Field(SemanticField::Repaired);
const UNREPAIRABLE: ColumnRef = ColumnRef::Field(SemanticField::Unrepairable);
const REJECTED: ColumnRef = ColumnRef::Field(SemanticField::WarrantyRejected);
const INTAKE_DATE: ColumnRef = ColumnRef::Field(SemanticField::IntakeDate);
const RETURN_DATE: ColumnRef = ColumnRef::Field(SemanticField::ReturnDate);
const TECHNICIAN: ColumnRef = ColumnRef::Field(SemanticField::Technician);
const SERIAL: ColumnRef = ColumnRef::Field(SemanticField::Serial);
const ERROR_NAME: ColumnRef = ColumnRef::Field(SemanticField::ErrorName);
const MONTH: ColumnRef = ColumnRef::Derived(TimePart::Month);
const QUARTER: ColumnRef = ColumnRef::Derived(TimePart::Quarter);
const YEAR: ColumnRef = ColumnRef::Derived(TimePart::Year);

const OUTCOMES: &[ColumnRef] = &[REPAIRED, UNREPAIRABLE, REJECTED];

/// Catalog entry for `id`.
pub fn template(id: ReportId) -> TemplateInfo {
    use Param::{Customer, GroupBy, Month, Product, ProductGroup, Quarter, TopN};

    let info = |summary: &'static str,
                required: &'static [Param],
                optional: &'static [Param],
                columns: &'static [ColumnRef],
                min_role: Role,
                default_top_n: Option<usize>| TemplateInfo {
        id,
        summary,
        required,
        optional,
        columns,
        min_role,
        default_top_n,
    };
    match id {
        ReportId::TotalByTime => info(
            "Intake volume per year, month or quarter",
            &[GroupBy],
            &[],
            &[],
            Role::Mod,
            None,
        ),
        ReportId::SuccessRateByTime => info(
            "Repair success rate per year, month or quarter",
            &[GroupBy],
            &[],
            OUTCOMES,
            Role::Admin,
            None,
        ),
        ReportId::UnrepairedProducts => info(
            "Units whose repaired flag is not set",
            &[],
            &[],
            &[INTAKE_DATE, CUSTOMER, PRODUCT, REPAIRED],
            Role::Admin,
            None,
        ),
        ReportId::TopCustomers => info(
            "Customers sending the most units",
            &[],
            &[TopN],
            &[CUSTOMER],
            Role::Mod,
            Some(10),
        ),
        ReportId::TopProductsByCustomer => info(
            "Products a customer sends most, with repaired counts",
            &[Customer],
            &[TopN],
            &[CUSTOMER, PRODUCT, REPAIRED],
            Role::User,
            Some(30),
        ),
        ReportId::TotalByCustomerAndTime => info(
            "Intake volume of one customer per time part",
            &[Customer, GroupBy],
            &[],
            &[CUSTOMER],
            Role::Admin,
            None,
        ),
        ReportId::TopProducts => info(
            "Products with the most warranty intakes, with repaired counts",
            &[],
            &[TopN],
            &[PRODUCT, REPAIRED],
            Role::Mod,
            Some(10),
        ),
        ReportId::TopRejectedProducts => info(
            "Products with the most rejected warranty claims",
            &[],
            &[TopN],
            &[PRODUCT, REJECTED],
            Role::Admin,
            Some(5),
        ),
        ReportId::ProductStatus => info(
            "Outcome counts for one product",
            &[Product],
            &[],
            &[PRODUCT, REPAIRED, UNREPAIRABLE, REJECTED],
            Role::Admin,
            None,
        ),
        ReportId::TopErrors => info(
            "Most frequently reported errors",
            &[],
            &[TopN],
            &[ERROR_NAME],
            Role::User,
            Some(10),
        ),
        ReportId::TopErrorsByProduct => info(
            "Most frequent errors for one product",
            &[Product],
            &[TopN],
            &[PRODUCT, ERROR_NAME],
            Role::Admin,
            Some(5),
        ),
        ReportId::TopErrorsByCustomerProduct => info(
            "Most frequent errors for one customer and product",
            &[Customer, Product],
            &[TopN],
            &[CUSTOMER, PRODUCT, ERROR_NAME],
            Role::Admin,
            Some(5),
        ),
        ReportId::StatusSummary => info(
            "Outcome counts over all units",
            &[],
            &[],
            OUTCOMES,
            Role::Admin,
            None,
        ),
        ReportId::OverallSuccessRate => info(
            "Processed total and repair success rate",
            &[],
            &[],
            OUTCOMES,
            Role::Admin,
            None,
        ),
        ReportId::RejectedProducts => info(
            "Units with rejected warranty claims, with month and year",
            &[],
            &[],
            &[PRODUCT, CUSTOMER, REJECTED, MONTH, YEAR],
            Role::Admin,
            None,
        ),
        ReportId::TopCustomersByProduct => info(
            "Customers sending one product most, with repaired counts",
            &[Product],
            &[TopN],
            &[PRODUCT, CUSTOMER, REPAIRED],
            Role::User,
            Some(10),
        ),
        ReportId::TopErrorsByCustomerQuarter => info(
            "Most frequent errors for one customer in one quarter",
            &[Customer, Quarter],
            &[TopN],
            &[CUSTOMER, ERROR_NAME, QUARTER],
            Role::Admin,
            Some(5),
        ),
        ReportId::SuccessRateByCustomerProductMonth => info(
            "Repair success rate for one customer and product in one month",
            &[Customer, Product, Month],
            &[],
            &[CUSTOMER, PRODUCT, REPAIRED, UNREPAIRABLE, REJECTED, MONTH],
            Role::Admin,
            None,
        ),
        ReportId::TopTechnicians => info(
            "Technicians handling the most units",
            &[],
            &[TopN],
            &[TECHNICIAN],
            Role::Admin,
            Some(5),
        ),
        ReportId::TechnicianSuccessRateByTime => info(
            "Technician repair success rate per time part",
            &[GroupBy],
            &[],
            &[TECHNICIAN, REPAIRED, UNREPAIRABLE, REJECTED],
            Role::Admin,
            None,
        ),
        ReportId::TechnicianSummary => info(
            "Outcome counts and success rate per technician",
            &[],
            &[],
            &[TECHNICIAN, REPAIRED, UNREPAIRABLE, REJECTED],
            Role::Mod,
            None,
        ),
        ReportId::SuccessRateByProduct => info(
            "Outcome counts and success rate per product",
            &[],
            &[],
            &[PRODUCT, REPAIRED, UNREPAIRABLE, REJECTED],
            Role::Admin,
            None,
        ),
        ReportId::CountByProduct => info(
            "Intake volume per product",
            &[],
            &[],
            &[PRODUCT],
            Role::Admin,
            None,
        ),
        ReportId::AvgProcessingTime => info(
            "Average days from intake to return",
            &[],
            &[],
            &[INTAKE_DATE, RETURN_DATE],
            Role::Admin,
            None,
        ),
        ReportId::TopProductsInGroup => info(
            "Products sent most within one product group",
            &[ProductGroup],
            &[TopN],
            &[PRODUCT_GROUP, PRODUCT, REPAIRED],
            Role::User,
            Some(20),
        ),
        ReportId::AvgProcessingTimeByCustomer => info(
            "Average days from intake to return per customer",
            &[],
            &[Customer],
            &[INTAKE_DATE, RETURN_DATE, CUSTOMER],
            Role::Admin,
            None,
        ),
        ReportId::RepeatedSerials => info(
            "Serial numbers received more than once",
            &[],
            &[],
            &[SERIAL],
            Role::Mod,
            None,
        ),
        ReportId::ProductVolume => info(
            "Intake volume and repaired count for one product",
            &[Product],
            &[],
            &[PRODUCT, REPAIRED],
            Role::User,
            None,
        ),
    }
}

/// Human-readable title of a report run with `params`.
pub fn title(id: ReportId, params: &ReportParams) -> String {
    let info = template(id);
    let n = info.top_n(params).unwrap_or_default();
    let part = params.group_by.map_or("period", |p| p.column_name());
    let customer = params.customer.as_deref().unwrap_or_default().trim();
    let product = params.product.as_deref().unwrap_or_default().trim();
    let group = params.product_group.as_deref().unwrap_or_default().trim();
    let month = params.month.unwrap_or_default();
    let quarter = params.quarter.unwrap_or_default();
    match id {
        ReportId::TotalByTime => format!("Intake volume by {part}"),
        ReportId::SuccessRateByTime => format!("Repair success rate by {part}"),
        ReportId::UnrepairedProducts => "Units not yet repaired".to_string(),
        ReportId::TopCustomers => format!("Top {n} customers by intake volume"),
        ReportId::TopProductsByCustomer => format!("Top {n} products sent by {customer}"),
        ReportId::TotalByCustomerAndTime => format!("Intake volume from {customer} by {part}"),
        ReportId::TopProducts => format!("Top {n} products by warranty volume"),
        ReportId::TopRejectedProducts => {
            format!("Top {n} products with rejected warranty claims")
        }
        ReportId::ProductStatus => format!("Outcome counts for {product}"),
        ReportId::TopErrors => format!("Top {n} reported errors"),
        ReportId::TopErrorsByProduct => format!("Top {n} errors for {product}"),
        ReportId::TopErrorsByCustomerProduct => {
            format!("Top {n} errors reported by {customer} for {product}")
        }
        ReportId::StatusSummary => "Outcome counts".to_string(),
        ReportId::OverallSuccessRate => "Overall repair success rate".to_string(),
        ReportId::RejectedProducts => "Units with rejected warranty claims".to_string(),
        ReportId::TopCustomersByProduct => format!("Top {n} customers sending {product}"),
        ReportId::TopErrorsByCustomerQuarter => {
            format!("Top {n} errors for {customer} in quarter {quarter}")
        }
        ReportId::SuccessRateByCustomerProductMonth => {
            format!("Repair success rate for {product} from {customer} in month {month}")
        }
        ReportId::TopTechnicians => format!("Top {n} technicians by units handled"),
        ReportId::TechnicianSuccessRateByTime => {
            format!("Technician repair success rate by {part}")
        }
        ReportId::TechnicianSummary => "Units handled per technician".to_string(),
        ReportId::SuccessRateByProduct => "Repair success rate by product".to_string(),
        ReportId::CountByProduct => "Intake volume by product".to_string(),
        ReportId::AvgProcessingTime => "Average processing time (days)".to_string(),
        ReportId::TopProductsInGroup => format!("Top {n} products in group {group}"),
        ReportId::AvgProcessingTimeByCustomer if !customer.is_empty() => {
            format!("Average processing time for {customer} (days)")
        }
        ReportId::AvgProcessingTimeByCustomer => {
            "Average processing time by customer (days)".to_string()
        }
        ReportId::RepeatedSerials => "Serial numbers received more than once".to_string(),
        ReportId::ProductVolume => format!("Warranty volume for {product}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_matches_its_id() {
        for id in ReportId::ALL {
            let info = template(*id);
            assert_eq!(info.id, *id);
            if info.accepts(Param::TopN) {
                assert!(info.default_top_n.is_some(), "{id} lacks a default top-n");
            }
            for param in info.required {
                assert!(!info.optional.contains(param), "{id}: {param}");
            }
        }
    }

    #[test]
    fn group_by_part_is_required_first() {
        let params = ReportParams {
            group_by: Some(TimePart::Quarter),
            ..ReportParams::default()
        };
        let columns = template(ReportId::SuccessRateByTime).required_columns(&params);
        assert_eq!(columns[0], ColumnRef::Derived(TimePart::Quarter));
        assert_eq!(&columns[1..], OUTCOMES);
    }

    #[test]
    fn titles_include_parameters() {
        let params = ReportParams {
            customer: Some("Acme".to_string()),
            ..ReportParams::default()
        };
        assert_eq!(
            title(ReportId::TopProductsByCustomer, &params),
            "Top 30 products sent by Acme"
        );
    }
}
