//! Generic aggregate operations.
//!
//! Every report template is a configuration of one of these operations over
//! already-resolved column names. Results are small frames built column by
//! column; row order is part of the contract (first-seen partitions, stable
//! descending ranks).

use std::collections::HashMap;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use rma_common::{any_to_f64, round_to};
use rma_transform::frame::{
    column_names, date_column, filter_rows, flag_column, raw_text_column, text_column,
};

/// Header of count columns.
pub const COUNT: &str = "count";
/// Header of success-rate columns.
pub const SUCCESS_RATE: &str = "success_rate_pct";

/// A source column and the header it gets in the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub column: String,
    pub label: String,
}

impl GroupKey {
    pub fn new(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: label.into(),
        }
    }
}

/// Resolved names of the three outcome flag columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeColumns {
    pub repaired: String,
    pub unrepairable: String,
    pub rejected: String,
}

/// A per-partition value emitted by [`group_outcomes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Rows in the partition.
    Count,
    /// Rows with the repaired flag set.
    Ok,
    /// Rows with the unrepairable flag set.
    Fail,
    /// Rows with the warranty-rejected flag set.
    Tcbh,
    /// `ok + fail + tcbh`.
    Total,
    /// `ok / (ok + fail + tcbh) * 100`, 0 when nothing was processed.
    SuccessRate,
}

impl Measure {
    pub fn header(&self) -> &'static str {
        match self {
            Measure::Count => COUNT,
            Measure::Ok => "ok",
            Measure::Fail => "fail",
            Measure::Tcbh => "tcbh",
            Measure::Total => "total",
            Measure::SuccessRate => SUCCESS_RATE,
        }
    }

    /// Returns true when the measure needs the outcome flag columns.
    pub fn reads_outcomes(&self) -> bool {
        !matches!(self, Measure::Count)
    }
}

/// Configuration of a grouped aggregate.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub keys: Vec<GroupKey>,
    pub outcomes: Option<OutcomeColumns>,
    pub measures: Vec<Measure>,
    /// Decimal places of the success rate.
    pub precision: u32,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    count: u32,
    ok: u32,
    fail: u32,
    tcbh: u32,
}

impl Tally {
    fn total(&self) -> u32 {
        self.ok + self.fail + self.tcbh
    }
}

struct OutcomeFlags {
    ok: Vec<bool>,
    fail: Vec<bool>,
    tcbh: Vec<bool>,
}

impl OutcomeFlags {
    fn read(df: &DataFrame, columns: &OutcomeColumns) -> PolarsResult<Self> {
        Ok(Self {
            ok: flag_column(df, &columns.repaired)?,
            fail: flag_column(df, &columns.unrepairable)?,
            tcbh: flag_column(df, &columns.rejected)?,
        })
    }
}

/// Repair success rate in percent, rounded to `precision` places.
///
/// Defined as 0 when no row has any outcome flag set.
///
/// # Examples
///
/// ```
/// use rma_report::ops::success_rate;
///
/// assert_eq!(success_rate(2, 1, 0, 1), 66.7);
/// assert_eq!(success_rate(0, 0, 0, 2), 0.0);
/// ```
pub fn success_rate(ok: u32, fail: u32, tcbh: u32, precision: u32) -> f64 {
    percentage(ok, ok + fail + tcbh, precision)
}

/// `part / whole * 100` rounded to `precision` places, 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32, precision: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(f64::from(part) / f64::from(whole) * 100.0, precision)
}

/// Partitions rows by `spec.keys` and computes `spec.measures` per partition.
///
/// Rows with a null or blank key are dropped. Partitions appear in the order
/// their first row appears. With no keys the whole frame is one partition,
/// which is emitted even when the frame has no rows.
pub fn group_outcomes(df: &DataFrame, spec: &GroupSpec) -> PolarsResult<DataFrame> {
    let key_values = spec
        .keys
        .iter()
        .map(|key| text_column(df, &key.column))
        .collect::<PolarsResult<Vec<_>>>()?;
    let flags = match &spec.outcomes {
        Some(columns) => Some(OutcomeFlags::read(df, columns)?),
        None => None,
    };

    let mut partitions: Vec<Vec<String>> = Vec::new();
    let mut tallies: Vec<Tally> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    if spec.keys.is_empty() {
        partitions.push(Vec::new());
        tallies.push(Tally::default());
        index.insert(Vec::new(), 0);
    }

    'rows: for row in 0..df.height() {
        let mut key = Vec::with_capacity(key_values.len());
        for values in &key_values {
            match &values[row] {
                Some(value) => key.push(value.clone()),
                None => continue 'rows,
            }
        }
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                index.insert(key.clone(), partitions.len());
                partitions.push(key);
                tallies.push(Tally::default());
                partitions.len() - 1
            }
        };
        let tally = &mut tallies[slot];
        tally.count += 1;
        if let Some(flags) = &flags {
            tally.ok += u32::from(flags.ok[row]);
            tally.fail += u32::from(flags.fail[row]);
            tally.tcbh += u32::from(flags.tcbh[row]);
        }
    }

    let mut columns = Vec::with_capacity(spec.keys.len() + spec.measures.len());
    for (pos, key) in spec.keys.iter().enumerate() {
        let values: Vec<&str> = partitions.iter().map(|p| p[pos].as_str()).collect();
        columns.push(Series::new(key.label.as_str().into(), values).into_column());
    }
    for measure in &spec.measures {
        let name = measure.header().into();
        let column = match measure {
            Measure::Count => Series::new(name, tallies.iter().map(|t| t.count).collect::<Vec<_>>()),
            Measure::Ok => Series::new(name, tallies.iter().map(|t| t.ok).collect::<Vec<_>>()),
            Measure::Fail => Series::new(name, tallies.iter().map(|t| t.fail).collect::<Vec<_>>()),
            Measure::Tcbh => Series::new(name, tallies.iter().map(|t| t.tcbh).collect::<Vec<_>>()),
            Measure::Total => {
                Series::new(name, tallies.iter().map(Tally::total).collect::<Vec<_>>())
            }
            Measure::SuccessRate => Series::new(
                name,
                tallies
                    .iter()
                    .map(|t| success_rate(t.ok, t.fail, t.tcbh, spec.precision))
                    .collect::<Vec<_>>(),
            ),
        };
        columns.push(column.into_column());
    }
    DataFrame::new(columns)
}

/// Configuration of a top-N ranking.
#[derive(Debug, Clone)]
pub struct RankSpec {
    pub key: GroupKey,
    pub n: usize,
    /// Repaired flag column; adds `repaired` and success-rate columns.
    pub repaired: Option<String>,
}

/// Counts non-blank values, most frequent first.
///
/// The sort is stable, so equal counts keep first-seen order.
pub fn rank_values(values: &[Option<String>]) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().flatten() {
        match index.get(value.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.as_str(), counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Ranks the values of `spec.key` by frequency and keeps the first `spec.n`.
///
/// Repaired counts are summed only for the categories chosen by volume.
pub fn top_n(df: &DataFrame, spec: &RankSpec) -> PolarsResult<DataFrame> {
    let values = text_column(df, &spec.key.column)?;
    let mut ranked = rank_values(&values);
    ranked.truncate(spec.n);

    let labels: Vec<&str> = ranked.iter().map(|(value, _)| value.as_str()).collect();
    let counts: Vec<u32> = ranked.iter().map(|(_, count)| *count).collect();
    let mut columns = vec![
        Series::new(spec.key.label.as_str().into(), labels).into_column(),
        Series::new(COUNT.into(), counts.clone()).into_column(),
    ];

    if let Some(repaired_col) = &spec.repaired {
        let position: HashMap<&str, usize> = ranked
            .iter()
            .enumerate()
            .map(|(pos, (value, _))| (value.as_str(), pos))
            .collect();
        let mut repaired = vec![0u32; ranked.len()];
        for (value, fixed) in values.iter().zip(flag_column(df, repaired_col)?) {
            if let Some(&pos) = value.as_deref().and_then(|v| position.get(v)) {
                repaired[pos] += u32::from(fixed);
            }
        }
        let rates: Vec<f64> = repaired
            .iter()
            .zip(&counts)
            .map(|(fixed, count)| percentage(*fixed, *count, 1))
            .collect();
        columns.push(Series::new("repaired".into(), repaired).into_column());
        columns.push(Series::new(SUCCESS_RATE.into(), rates).into_column());
    }
    DataFrame::new(columns)
}

/// Whole days between the received and returned dates of each row.
///
/// `None` when either date is missing or does not parse.
pub fn processing_days(
    df: &DataFrame,
    received: &str,
    returned: &str,
) -> PolarsResult<Vec<Option<i64>>> {
    let received = date_column(df, received)?;
    let returned = date_column(df, returned)?;
    Ok(received
        .into_iter()
        .zip(returned)
        .map(|(start, end)| Some((end? - start?).num_days()))
        .collect())
}

/// Average processing time over rows where both dates parse.
///
/// One row with `avg_days` (2 places) and `rows`, or no rows at all when
/// nothing survives.
pub fn average_processing_days(
    df: &DataFrame,
    received: &str,
    returned: &str,
) -> PolarsResult<DataFrame> {
    let days: Vec<i64> = processing_days(df, received, returned)?
        .into_iter()
        .flatten()
        .collect();
    let (averages, rows) = if days.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let mean = days.iter().sum::<i64>() as f64 / days.len() as f64;
        (vec![round_to(mean, 2)], vec![days.len() as u32])
    };
    DataFrame::new(vec![
        Series::new("avg_days".into(), averages).into_column(),
        Series::new("rows".into(), rows).into_column(),
    ])
}

/// Average processing time per value of `key`, slowest first.
///
/// Rows without a key or without both dates are dropped. Averages are
/// rounded to 1 place; equal averages keep first-seen order.
pub fn average_processing_days_by(
    df: &DataFrame,
    received: &str,
    returned: &str,
    key: &GroupKey,
) -> PolarsResult<DataFrame> {
    let days = processing_days(df, received, returned)?;
    let keys = text_column(df, &key.column)?;
    let mut groups: Vec<(String, i64, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (key_value, delta) in keys.into_iter().zip(days) {
        let (Some(key_value), Some(delta)) = (key_value, delta) else {
            continue;
        };
        match index.get(&key_value) {
            Some(&slot) => {
                groups[slot].1 += delta;
                groups[slot].2 += 1;
            }
            None => {
                index.insert(key_value.clone(), groups.len());
                groups.push((key_value, delta, 1));
            }
        }
    }
    let mut averages: Vec<(String, f64, u32)> = groups
        .into_iter()
        .map(|(name, sum, rows)| (name, round_to(sum as f64 / f64::from(rows), 1), rows))
        .collect();
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    DataFrame::new(vec![
        Series::new(
            key.label.as_str().into(),
            averages.iter().map(|(name, _, _)| name.as_str()).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "avg_days".into(),
            averages.iter().map(|(_, avg, _)| *avg).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "rows".into(),
            averages.iter().map(|(_, _, rows)| *rows).collect::<Vec<_>>(),
        )
        .into_column(),
    ])
}

/// Counts of each outcome flag, one row per outcome.
pub fn status_breakdown(df: &DataFrame, outcomes: &OutcomeColumns) -> PolarsResult<DataFrame> {
    let flags = OutcomeFlags::read(df, outcomes)?;
    fn count(values: &[bool]) -> u32 {
        values.iter().filter(|set| **set).count() as u32
    }
    DataFrame::new(vec![
        Series::new(
            "status".into(),
            ["repaired", "unrepairable", "warranty rejected"],
        )
        .into_column(),
        Series::new(
            COUNT.into(),
            [
                count(&flags.ok),
                count(&flags.fail),
                count(&flags.tcbh),
            ],
        )
        .into_column(),
    ])
}

/// Rows where `keep` is true, projected onto `columns` and relabelled.
pub fn listing(df: &DataFrame, columns: &[GroupKey], keep: &[bool]) -> PolarsResult<DataFrame> {
    let selected = filter_rows(df, keep)?;
    let mut out = Vec::with_capacity(columns.len());
    for key in columns {
        out.push(
            selected
                .column(&key.column)?
                .clone()
                .with_name(key.label.as_str().into()),
        );
    }
    DataFrame::new(out)
}

/// Rows whose serial occurs more than once.
///
/// Serials are ordered by occurrence count, most frequent first; each
/// serial's rows follow in dataset order. Output columns are `serial`,
/// `occurrences`, then every other dataset column as text. A dataset column
/// whose name is already taken gets a numeric suffix (`serial_2`).
pub fn repeated_serials(df: &DataFrame, serial_column: &str) -> PolarsResult<DataFrame> {
    let serials = text_column(df, serial_column)?;
    let repeated: Vec<(String, u32)> = rank_values(&serials)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();

    let mut order: Vec<(usize, u32)> = Vec::new();
    for (serial, count) in &repeated {
        for (row, value) in serials.iter().enumerate() {
            if value.as_deref() == Some(serial.as_str()) {
                order.push((row, *count));
            }
        }
    }

    let mut columns = vec![
        Series::new(
            "serial".into(),
            order
                .iter()
                .map(|(row, _)| serials[*row].clone())
                .collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "occurrences".into(),
            order.iter().map(|(_, count)| *count).collect::<Vec<_>>(),
        )
        .into_column(),
    ];
    let mut taken = vec!["serial".to_string(), "occurrences".to_string()];
    for name in column_names(df) {
        if name == serial_column {
            continue;
        }
        let values = raw_text_column(df, &name)?;
        let picked: Vec<Option<String>> =
            order.iter().map(|(row, _)| values[*row].clone()).collect();
        let output = unique_name(&name, &taken);
        columns.push(Series::new(output.as_str().into(), picked).into_column());
        taken.push(output);
    }
    DataFrame::new(columns)
}

fn unique_name(name: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == name) {
        return name.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{name}_{suffix}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// A row condition on a single column.
#[derive(Debug, Clone, Copy)]
pub enum Condition<'a> {
    /// Trimmed cell text equals the trimmed value.
    Text { column: &'a str, value: &'a str },
    /// Cell parses to the given number.
    Number { column: &'a str, value: u32 },
}

/// Rows satisfying every condition.
pub fn select_rows(df: &DataFrame, conditions: &[Condition<'_>]) -> PolarsResult<DataFrame> {
    let mut keep = vec![true; df.height()];
    for condition in conditions {
        match *condition {
            Condition::Text { column, value } => {
                let wanted = value.trim();
                for (slot, cell) in keep.iter_mut().zip(text_column(df, column)?) {
                    *slot &= cell.as_deref() == Some(wanted);
                }
            }
            Condition::Number { column, value } => {
                let series = df.column(column)?;
                for (idx, slot) in keep.iter_mut().enumerate() {
                    let cell = series.get(idx).ok().and_then(any_to_f64);
                    *slot &= cell == Some(f64::from(value));
                }
            }
        }
    }
    filter_rows(df, &keep)
}
