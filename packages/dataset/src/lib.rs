#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-of-interest table loader.
//!
//! The POI table is a delimited text file (semicolon by default) with a
//! header row. It is read once at startup into an immutable [`Dataset`]
//! that the server shares across all workers. Coordinates are exported
//! with decimal commas and are normalized with
//! [`decimal::parse_locale_decimal`]. A single unparsable coordinate fails
//! the whole load; there is no per-row skip policy.

pub mod decimal;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use poi_map_dataset_models::{FilterCriteria, PointOfInterest};

/// Errors that can occur while loading the POI table.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be opened.
    #[error("Failed to open dataset {}: {source}", path.display())]
    Open {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The delimited text could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing column '{column}' in dataset header")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// A coordinate value is not numeric after decimal normalization.
    #[error("Invalid coordinate '{value}' in column '{column}' on line {line}")]
    InvalidCoordinate {
        /// Column the value came from.
        column: String,
        /// Line number in the source file (1-based, header is line 1).
        line: u64,
        /// The raw field text.
        value: String,
    },
}

/// Header names of the seven columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Display name column.
    pub name: String,
    /// Category column.
    pub category: String,
    /// Municipality column.
    pub municipality: String,
    /// Street column.
    pub street: String,
    /// External link column.
    pub link: String,
    /// Latitude column (decimal comma).
    pub latitude: String,
    /// Longitude column (decimal comma).
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "NAAM".to_string(),
            category: "CATEGORIE".to_string(),
            municipality: "GEMEENTE".to_string(),
            street: "STRAAT".to_string(),
            link: "LINK".to_string(),
            latitude: "WGS84_LATITUDE".to_string(),
            longitude: "WGS84_LONGITUDE".to_string(),
        }
    }
}

/// Options controlling how the POI table is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Column header names.
    pub columns: ColumnMapping,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            columns: ColumnMapping::default(),
        }
    }
}

/// Positions of the mapped columns within a header row.
struct ColumnIndices {
    name: usize,
    category: usize,
    municipality: usize,
    street: usize,
    link: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord, columns: &ColumnMapping) -> Result<Self, DatasetError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| DatasetError::MissingColumn {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            name: find(&columns.name)?,
            category: find(&columns.category)?,
            municipality: find(&columns.municipality)?,
            street: find(&columns.street)?,
            link: find(&columns.link)?,
            latitude: find(&columns.latitude)?,
            longitude: find(&columns.longitude)?,
        })
    }
}

/// The immutable, in-memory POI table plus its derived lookup lists.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PointOfInterest>,
    categories: Vec<String>,
    municipalities: Vec<String>,
}

impl Dataset {
    /// Loads the POI table from a file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be opened, a required
    /// column is missing, or any coordinate fails to parse.
    pub fn load(path: &Path, options: &DatasetOptions) -> Result<Self, DatasetError> {
        log::info!("Loading POI dataset from {}", path.display());

        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_reader(file, options)?;

        log::info!(
            "Loaded {} POIs ({} categories, {} municipalities)",
            dataset.len(),
            dataset.categories.len(),
            dataset.municipalities.len()
        );

        Ok(dataset)
    }

    /// Parses the POI table from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if a required column is missing, the text
    /// is not valid delimited data, or any coordinate fails to parse.
    pub fn from_reader<R: Read>(reader: R, options: &DatasetOptions) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let idx = ColumnIndices::resolve(&headers, &options.columns)?;

        let mut records = Vec::new();

        for result in reader.records() {
            let row = result?;
            let line = row.position().map_or(0, csv::Position::line);
            let field = |i: usize| row.get(i).unwrap_or("");

            let coordinate = |i: usize, column: &str| {
                let raw = field(i);
                decimal::parse_locale_decimal(raw).map_err(|_| DatasetError::InvalidCoordinate {
                    column: column.to_string(),
                    line,
                    value: raw.to_string(),
                })
            };

            let latitude = coordinate(idx.latitude, options.columns.latitude.as_str())?;
            let longitude = coordinate(idx.longitude, options.columns.longitude.as_str())?;

            records.push(PointOfInterest {
                name: field(idx.name).to_string(),
                category: field(idx.category).to_string(),
                municipality: field(idx.municipality).to_string(),
                street: field(idx.street).to_string(),
                link: field(idx.link).to_string(),
                latitude,
                longitude,
            });
        }

        Ok(Self::from_records(records))
    }

    /// Builds a dataset from already-parsed records, deriving the distinct
    /// category and municipality lists.
    #[must_use]
    pub fn from_records(records: Vec<PointOfInterest>) -> Self {
        let categories = distinct(records.iter().map(|r| r.category.as_str()));
        let municipalities = distinct(records.iter().map(|r| r.municipality.as_str()));

        Self {
            records,
            categories,
            municipalities,
        }
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[PointOfInterest] {
        &self.records
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct municipalities in first-seen order.
    #[must_use]
    pub fn municipalities(&self) -> &[String] {
        &self.municipalities
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records whose category and municipality both equal the
    /// criteria exactly, in file order.
    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&PointOfInterest> {
        self.records.iter().filter(|r| criteria.matches(r)).collect()
    }
}

/// Collects distinct values preserving first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(ToString::to_string)
        .collect()
}
