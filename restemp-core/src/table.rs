//! Tabular time series produced by a finalized simulation.

use crate::errors::{RunError, RunResult};
use chrono::NaiveDate;
use numpy::ndarray::{Array2, ArrayView1, Axis};
use std::collections::HashSet;
use std::io::Write;

pub type FloatValue = f64;

/// Date format used when tables are written out.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A table of values indexed by date.
///
/// Each row holds the values of every column for a single date.
/// The profiles table for example has one column per depth and one row per simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    index: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Array2<FloatValue>,
}

impl ResultTable {
    /// Create a new table.
    ///
    /// `values` must have one row per date in `index` and one column per name in `columns`.
    /// Column names must be unique.
    pub fn new(
        index: Vec<NaiveDate>,
        columns: Vec<String>,
        values: Array2<FloatValue>,
    ) -> RunResult<Self> {
        if values.dim() != (index.len(), columns.len()) {
            return Err(RunError::MalformedTable(format!(
                "expected values of shape ({}, {}), got {:?}",
                index.len(),
                columns.len(),
                values.dim()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(RunError::MalformedTable(format!(
                "column '{}' appears more than once",
                duplicate
            )));
        }

        Ok(Self {
            index,
            columns,
            values,
        })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<FloatValue> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Values of a single column, one per date.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, FloatValue>> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values.index_axis(Axis(1), i))
    }

    /// The first and last dates of the table, if it has any rows.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.index.first(), self.index.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    /// Write the table as CSV with a leading `date` column.
    pub fn write_csv<W: Write>(&self, writer: W) -> RunResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| RunError::Export(e.to_string());

        writer
            .write_record(std::iter::once("date").chain(self.columns.iter().map(String::as_str)))
            .map_err(export_err)?;
        for (date, row) in self.index.iter().zip(self.values.rows()) {
            let record = std::iter::once(date.format(DATE_FORMAT).to_string())
                .chain(row.iter().map(|v| v.to_string()));
            writer.write_record(record).map_err(export_err)?;
        }
        writer
            .flush()
            .map_err(|e| RunError::Export(e.to_string()))
    }
}
