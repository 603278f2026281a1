//! The per-donor trait table
//!
//! A [`TraitTable`] has one row per donor and one column per computed trait. It is
//! assembled column by column with a [`TraitTableBuilder`] and is immutable
//! afterwards. Missing traits are `None`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use crate::data::series::SchemaError;
use crate::error::TraitError;

/// Name of the donor identifier column in exported tables
pub const DONOR_ID_COLUMN: &str = "Donor ID";

/// Trait values per donor, column-major
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitTable {
    donors: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl TraitTable {
    /// Start building a table for the given donors
    pub fn builder(donors: Vec<String>) -> TraitTableBuilder {
        TraitTableBuilder::new(donors)
    }

    /// Donor identifiers, in row order
    pub fn donors(&self) -> &[String] {
        &self.donors
    }

    /// Trait column names, in column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values of one trait column, in donor order
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(&self.values[idx])
    }

    /// A single trait value; `None` if missing or if the donor or column is unknown
    pub fn get(&self, donor: &str, column: &str) -> Option<f64> {
        let row = self.donors.iter().position(|d| d == donor)?;
        self.column(column)?[row]
    }

    /// All `(column, value)` pairs of one donor, in column order
    pub fn row(&self, donor: &str) -> Option<Vec<(&str, Option<f64>)>> {
        let row = self.donors.iter().position(|d| d == donor)?;
        Some(
            self.columns
                .iter()
                .zip(&self.values)
                .map(|(name, values)| (name.as_str(), values[row]))
                .collect(),
        )
    }

    /// Number of donors
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    /// Whether the table has no donors
    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    /// Join tables column-wise on donor identifier
    ///
    /// Donors appear in first-seen order across `tables`, columns in table order.
    /// A donor absent from a table gets missing values for that table's columns.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] if two tables share a column name.
    pub fn concat(tables: &[TraitTable]) -> Result<TraitTable, SchemaError> {
        let mut donors: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for donor in tables.iter().flat_map(|t| t.donors.iter()) {
            if seen.insert(donor.as_str()) {
                donors.push(donor.clone());
            }
        }

        let mut builder = TraitTableBuilder::new(donors.clone());
        for table in tables {
            let rows: HashMap<&str, usize> = table
                .donors
                .iter()
                .enumerate()
                .map(|(i, d)| (d.as_str(), i))
                .collect();
            for (name, values) in table.columns.iter().zip(&table.values) {
                let aligned = donors
                    .iter()
                    .map(|d| rows.get(d.as_str()).and_then(|&i| values[i]))
                    .collect();
                builder.push_column(name.clone(), aligned)?;
            }
        }
        Ok(builder.build())
    }

    /// Write the table as CSV: `Donor ID` followed by the trait columns
    ///
    /// Missing values are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TraitError> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(DONOR_ID_COLUMN);
        header.extend(self.columns.iter().map(String::as_str));
        writer.write_record(&header)?;

        for (row, donor) in self.donors.iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(donor.clone());
            record.extend(
                self.values
                    .iter()
                    .map(|column| column[row].map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }

        writer
            .flush()
            .map_err(|e| TraitError::Csv(e.to_string()))?;
        Ok(())
    }

    /// Write the table to a CSV file
    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> Result<(), TraitError> {
        let file = std::fs::File::create(path).map_err(|e| TraitError::Csv(e.to_string()))?;
        self.write_csv(file)
    }

    /// Row-oriented JSON: one object per donor, `null` for missing values
    pub fn to_json(&self) -> Value {
        let rows = self
            .donors
            .iter()
            .enumerate()
            .map(|(row, donor)| {
                let mut object = Map::new();
                object.insert(DONOR_ID_COLUMN.to_string(), Value::from(donor.as_str()));
                for (name, values) in self.columns.iter().zip(&self.values) {
                    let value = values[row]
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    object.insert(name.clone(), value);
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

/// Column-at-a-time builder for [`TraitTable`]
#[derive(Debug, Clone)]
pub struct TraitTableBuilder {
    donors: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl TraitTableBuilder {
    fn new(donors: Vec<String>) -> Self {
        Self {
            donors,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a trait column; `Some(NaN)` is stored as missing
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the column name is taken or the column does
    /// not have one value per donor.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if values.len() != self.donors.len() {
            return Err(SchemaError::LengthMismatch {
                column: name,
                expected: self.donors.len(),
                found: values.len(),
            });
        }
        if self.columns.contains(&name) {
            return Err(SchemaError::DuplicateColumn { name });
        }
        self.columns.push(name);
        self.values
            .push(values.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect());
        Ok(())
    }

    /// Finish the table
    pub fn build(self) -> TraitTable {
        TraitTable {
            donors: self.donors,
            columns: self.columns,
            values: self.values,
        }
    }
}
