//! Core tabular types: fields, records, per-item fetch results and the final table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scalar cell of a [`Record`].
///
/// Missing optional data is represented by the explicit [`Field::Absent`] marker,
/// never by a default value or a numeric NaN, so downstream numeric aggregation
/// can distinguish "no value" from "zero".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// Free-form text (names, links, descriptions, raw price strings)
    Text(String),
    /// Integer value (durations in minutes, stop counts)
    Int(i64),
    /// Floating-point value (prices, ratings, distances)
    Float(f64),
    /// Calendar date (check-in/check-out)
    Date(NaiveDate),
    /// Explicit "no value" marker
    Absent,
}

impl Field {
    /// Whether this field carries no value
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// The text content, if this is a [`Field::Text`]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The numeric value as f64, if this is a [`Field::Int`] or [`Field::Float`]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Int(n) => Some(*n as f64),
            Field::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Build a field from an optional text value, mapping `None` to [`Field::Absent`]
    pub fn from_opt_text(value: Option<String>) -> Self {
        value.map(Field::Text).unwrap_or(Field::Absent)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(s) => write!(f, "{}", s),
            Field::Int(n) => write!(f, "{}", n),
            Field::Float(x) => write!(f, "{}", x),
            Field::Date(d) => write!(f, "{}", d),
            Field::Absent => write!(f, ""),
        }
    }
}

/// One flat row of named scalar fields.
///
/// Column order is insertion order; the schema is fixed per collector module
/// (activities, flights, hotels), not enforced here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    columns: Vec<(String, Field)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any existing value under the same name
    pub fn set(&mut self, name: impl Into<String>, value: Field) {
        let name = name.into();
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.columns.push((name, value));
        }
    }

    /// Builder-style variant of [`Record::set`]
    pub fn with(mut self, name: impl Into<String>, value: Field) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a column by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(name, field)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.columns
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// The records produced from processing one work item.
///
/// A transparently-failed item carries zero records and a failure flag. The
/// flag exists for observation only (tests, diagnostics); an item that
/// legitimately yielded nothing looks the same in the aggregate.
#[derive(Clone, Debug, Default)]
pub struct FetchResult {
    records: Vec<Record>,
    failed: bool,
}

impl FetchResult {
    /// A successful result carrying the given records (possibly none)
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            failed: false,
        }
    }

    /// An empty result marking an isolated per-item failure
    pub fn failed() -> Self {
        Self {
            records: Vec::new(),
            failed: true,
        }
    }

    /// Whether this result marks a failed item
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Number of records in this result
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether this result carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the result, yielding its records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// The concatenation of all records from one pipeline run, in arrival order.
///
/// This is the only value whose lifetime extends past the pipeline call. It is a
/// raw structural merge: no deduplication, sorting or validation happens here;
/// cleaning is a separate post-processing step (see [`crate::clean`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateTable {
    rows: Vec<Record>,
}

impl AggregateTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row
    pub fn push(&mut self, row: Record) {
        self.rows.push(row);
    }

    /// Append all given rows, preserving their order
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Record>) {
        self.rows.extend(rows);
    }

    /// Concatenate two tables
    pub fn concat(mut self, other: AggregateTable) -> AggregateTable {
        self.rows.extend(other.rows);
        self
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows in order
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Mutable access to the rows, for post-processing passes
    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }

    /// All values of one column, in row order ([`Field::Absent`] where a row
    /// lacks the column)
    pub fn column(&self, name: &str) -> Vec<&Field> {
        self.rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&Field::Absent))
            .collect()
    }
}

impl IntoIterator for AggregateTable {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl FromIterator<Record> for AggregateTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
