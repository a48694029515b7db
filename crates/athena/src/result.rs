use serde::{Deserialize, Serialize};

use offences_core::Record;

/// Column definition returned by an Athena query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthenaColumn {
    /// Column name as declared in the result set.
    pub name: String,
    /// Athena data type (e.g. "varchar", "integer"). Carried for logging only.
    pub data_type: String,
}

impl AthenaColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Raw result set of a SELECT as returned by `GetQueryResults`.
///
/// `rows` still contains the header echo as its first entry. `None` cells are
/// SQL NULL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthenaQueryResult {
    /// Athena query execution ID.
    pub query_id: String,
    /// Column definitions in result-set order.
    pub columns: Vec<AthenaColumn>,
    /// Raw rows, header first.
    pub rows: Vec<Vec<Option<String>>>,
}

impl AthenaQueryResult {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of data rows, not counting the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Reshape into one record per data row.
    pub fn into_records(self) -> Vec<Record> {
        let names = self.column_names();
        reshape(&names, &self.rows)
    }
}

/// Zip column names with each row's cells, skipping the first (header) row.
///
/// Values stay strings; NULL becomes `""`. Cells past the last column are
/// dropped and short rows produce short records.
pub fn reshape<S: AsRef<str>>(columns: &[S], rows: &[Vec<Option<String>>]) -> Vec<Record> {
    rows.iter()
        .skip(1)
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .map(|(name, cell)| {
                    (
                        name.as_ref().to_string(),
                        cell.clone().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .collect()
}
