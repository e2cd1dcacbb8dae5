//! Semantic fields and derived time parts.
//!
//! A [`SemanticField`] names a logical role in an intake export (the customer,
//! the repaired flag, ...) independent of how a particular export spells the
//! column header. Resolution against real headers lives in `rma-map`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Logical column roles the report engine needs to locate in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticField {
    /// Customer (account) name.
    Customer,
    /// Product name or model.
    Product,
    /// Product group / category.
    ProductGroup,
    /// Outcome flag: repaired successfully.
    Repaired,
    /// Outcome flag: could not be repaired.
    Unrepairable,
    /// Outcome flag: warranty claim rejected.
    WarrantyRejected,
    /// Date the unit was received.
    IntakeDate,
    /// Date the unit was returned to the customer.
    ReturnDate,
    /// Technician who handled the unit.
    Technician,
    /// Unit serial number.
    Serial,
    /// Reported fault / error name.
    ErrorName,
    /// Service type (warranty, paid repair, ...).
    ServiceType,
}

impl SemanticField {
    /// Every field, in catalog order.
    pub const ALL: [SemanticField; 12] = [
        SemanticField::Customer,
        SemanticField::Product,
        SemanticField::ProductGroup,
        SemanticField::Repaired,
        SemanticField::Unrepairable,
        SemanticField::WarrantyRejected,
        SemanticField::IntakeDate,
        SemanticField::ReturnDate,
        SemanticField::Technician,
        SemanticField::Serial,
        SemanticField::ErrorName,
        SemanticField::ServiceType,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            SemanticField::Customer => "customer",
            SemanticField::Product => "product",
            SemanticField::ProductGroup => "product-group",
            SemanticField::Repaired => "repaired",
            SemanticField::Unrepairable => "unrepairable",
            SemanticField::WarrantyRejected => "warranty-rejected",
            SemanticField::IntakeDate => "intake-date",
            SemanticField::ReturnDate => "return-date",
            SemanticField::Technician => "technician",
            SemanticField::Serial => "serial",
            SemanticField::ErrorName => "error-name",
            SemanticField::ServiceType => "service-type",
        }
    }

    /// Header used for this field in result tables.
    pub fn label(&self) -> &'static str {
        match self {
            SemanticField::Customer => "customer",
            SemanticField::Product => "product",
            SemanticField::ProductGroup => "product_group",
            SemanticField::Repaired => "repaired",
            SemanticField::Unrepairable => "unrepairable",
            SemanticField::WarrantyRejected => "warranty_rejected",
            SemanticField::IntakeDate => "intake_date",
            SemanticField::ReturnDate => "return_date",
            SemanticField::Technician => "technician",
            SemanticField::Serial => "serial",
            SemanticField::ErrorName => "error",
            SemanticField::ServiceType => "service_type",
        }
    }

    /// Returns true for the three 0/1 outcome flag fields.
    pub fn is_outcome_flag(&self) -> bool {
        matches!(
            self,
            SemanticField::Repaired | SemanticField::Unrepairable | SemanticField::WarrantyRejected
        )
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SemanticField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SemanticField::ALL
            .into_iter()
            .find(|field| field.id() == wanted)
            .ok_or_else(|| ParseError::UnknownField(s.to_string()))
    }
}

/// Calendar bucket derived from the intake date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePart {
    Year,
    Month,
    Quarter,
}

impl TimePart {
    pub const ALL: [TimePart; 3] = [TimePart::Year, TimePart::Month, TimePart::Quarter];

    /// Name of the derived column holding this part.
    pub fn column_name(&self) -> &'static str {
        match self {
            TimePart::Year => "year",
            TimePart::Month => "month",
            TimePart::Quarter => "quarter",
        }
    }
}

impl fmt::Display for TimePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for TimePart {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" => Ok(TimePart::Year),
            "month" => Ok(TimePart::Month),
            "quarter" => Ok(TimePart::Quarter),
            _ => Err(ParseError::UnknownTimePart(s.to_string())),
        }
    }
}

/// A column a report depends on: either a semantic field or a derived time part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Field(SemanticField),
    Derived(TimePart),
}

impl ColumnRef {
    /// Header used for this column in result tables.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnRef::Field(field) => field.label(),
            ColumnRef::Derived(part) => part.column_name(),
        }
    }
}

impl From<SemanticField> for ColumnRef {
    fn from(field: SemanticField) -> Self {
        ColumnRef::Field(field)
    }
}

impl From<TimePart> for ColumnRef {
    fn from(part: TimePart) -> Self {
        ColumnRef::Derived(part)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Field(field) => write!(f, "{field}"),
            ColumnRef::Derived(part) => write!(f, "{part} (derived from intake-date)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_ids_round_trip_through_from_str() {
        for field in SemanticField::ALL {
            assert_eq!(field.id().parse::<SemanticField>(), Ok(field));
        }
        assert_eq!(
            "Product_Group".parse::<SemanticField>(),
            Ok(SemanticField::ProductGroup)
        );
        assert!("colour".parse::<SemanticField>().is_err());
    }

    #[test]
    fn outcome_flags() {
        let flags: Vec<_> = SemanticField::ALL
            .into_iter()
            .filter(SemanticField::is_outcome_flag)
            .collect();
        assert_eq!(
            flags,
            vec![
                SemanticField::Repaired,
                SemanticField::Unrepairable,
                SemanticField::WarrantyRejected
            ]
        );
    }

    #[test]
    fn time_part_parses_case_insensitively() {
        assert_eq!(" Quarter ".parse::<TimePart>(), Ok(TimePart::Quarter));
        assert!("week".parse::<TimePart>().is_err());
    }
}
