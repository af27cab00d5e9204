use std::{collections::HashMap, io::Read, path::Path};

use anyhow::Context;

use crate::foundation::error::{CertError, CertResult};

/// One record of the input table: column name -> cell text.
///
/// Short records simply lack the trailing keys, which the batch loop treats as a skipped row.
pub type DataRow = HashMap<String, String>;

/// Header substrings that mark a column as holding names (matched on the lower-cased header).
pub const NAME_COLUMN_HINTS: [&str; 3] = ["name", "nama", "full"];

/// Parsed delimited text: ordered column names plus ordered rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl Table {
    /// Build a table directly from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<DataRow>) -> Self {
        Self { columns, rows }
    }

    /// Parse CSV text with a header row.
    ///
    /// Blank lines are dropped by the reader; records of empty fields (`,,`) are kept so they
    /// count as rows and are later skipped for lacking a name.
    pub fn from_reader(reader: impl Read) -> CertResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()
            .context("read csv header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("read csv record {}", i + 1))?;
            let row: DataRow = columns
                .iter()
                .zip(record.iter())
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Read and parse a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> CertResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open data file '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `name` is one of the header columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Resolve the column to read names from: `requested` if given (must exist), otherwise the
    /// auto-selected one.
    pub fn resolve_name_column(&self, requested: Option<&str>) -> CertResult<String> {
        match requested {
            Some(col) if col.is_empty() => Err(CertError::missing_input(
                "no name column selected",
            )),
            Some(col) if self.has_column(col) => Ok(col.to_string()),
            Some(col) => Err(CertError::missing_input(format!(
                "name column '{col}' is not in the data header ({})",
                self.columns.join(", ")
            ))),
            None => select_name_column(&self.columns)
                .map(str::to_string)
                .ok_or_else(|| CertError::missing_input("data file has no columns")),
        }
    }
}

/// Pick the first column whose lower-cased name contains a [`NAME_COLUMN_HINTS`] entry, falling
/// back to the first column.
pub fn select_name_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            NAME_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .or_else(|| columns.first())
        .map(String::as_str)
}

#[cfg(test)]
#[path = "../../tests/unit/data/table.rs"]
mod tests;
