#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hazard ("dangerous locations") layer loader.
//!
//! Reads a shapefile of hazard features, reprojects every geometry to
//! WGS84, and reduces each feature to its centroid. The layer is read from
//! disk on every call to [`HazardSource::load`]; nothing is cached between
//! requests.

pub mod crs;
pub mod geometry;

use std::path::{Path, PathBuf};

use poi_map_hazards_models::HazardRecord;
use shapefile::dbase::FieldValue;

use crate::crs::{Reprojector, SourceCrs};

/// Errors that can occur while loading the hazard layer.
#[derive(Debug, thiserror::Error)]
pub enum HazardError {
    /// The shapefile could not be read.
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// I/O error reading the `.prj` sidecar.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The layer's CRS could not be determined.
    #[error("Unknown CRS for {}: {message}", path.display())]
    UnknownCrs {
        /// Path of the shapefile.
        path: PathBuf,
        /// Why detection failed.
        message: String,
    },

    /// Reprojection failed.
    #[error("Projection error: {message}")]
    Projection {
        /// Description of the failure.
        message: String,
    },

    /// A shape could not be converted to a geometry.
    #[error("Geometry error: {message}")]
    Geometry {
        /// Description of the failure.
        message: String,
    },
}

/// Provides the hazard records shown on every map.
pub trait HazardSource: Send + Sync {
    /// Loads all hazard records.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError`] if the layer cannot be read or reprojected.
    fn load(&self) -> Result<Vec<HazardRecord>, HazardError>;
}

/// Attribute columns read from the shapefile's dBASE table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeColumns {
    /// Municipality column.
    pub municipality: String,
    /// Description column (dBASE truncates names to ten characters).
    pub description: String,
}

impl Default for AttributeColumns {
    fn default() -> Self {
        Self {
            municipality: "gemeente".to_string(),
            description: "beschrijvi".to_string(),
        }
    }
}

/// A hazard layer backed by a shapefile on disk.
#[derive(Debug, Clone)]
pub struct ShapefileHazards {
    /// Path to the `.shp` file.
    pub path: PathBuf,
    /// Attribute columns to read.
    pub attributes: AttributeColumns,
    /// PROJ definition overriding `.prj` detection.
    pub crs_override: Option<String>,
}

impl ShapefileHazards {
    /// Creates a source for the shapefile at `path` with default attribute
    /// columns and `.prj`-based CRS detection.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attributes: AttributeColumns::default(),
            crs_override: None,
        }
    }

    /// Uses `proj` as the source CRS instead of reading the `.prj` file.
    #[must_use]
    pub fn with_crs_override(mut self, proj: Option<String>) -> Self {
        self.crs_override = proj;
        self
    }

    /// Determines the layer's CRS from the override or the `.prj` sidecar.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::UnknownCrs`] if there is no override and the
    /// `.prj` file is missing or names an unrecognised projection.
    pub fn source_crs(&self) -> Result<SourceCrs, HazardError> {
        if let Some(proj) = &self.crs_override {
            return Ok(SourceCrs::Proj(proj.clone()));
        }

        let prj_path = self.path.with_extension("prj");
        if !prj_path.exists() {
            return Err(HazardError::UnknownCrs {
                path: self.path.clone(),
                message: "no .prj file and no CRS override".to_string(),
            });
        }

        let wkt = std::fs::read_to_string(&prj_path)?;
        SourceCrs::from_prj(&wkt).ok_or_else(|| HazardError::UnknownCrs {
            path: self.path.clone(),
            message: "unrecognised projection; set an explicit PROJ definition".to_string(),
        })
    }
}

impl HazardSource for ShapefileHazards {
    fn load(&self) -> Result<Vec<HazardRecord>, HazardError> {
        let source = self.source_crs()?;
        load_shapefile(&self.path, &self.attributes, &source)
    }
}

/// Reads every feature of the shapefile at `path` into WGS84 hazard
/// records.
///
/// Features without geometry are skipped.
///
/// # Errors
///
/// Returns [`HazardError`] if the file cannot be read or a geometry fails
/// to reproject.
pub fn load_shapefile(
    path: &Path,
    attributes: &AttributeColumns,
    source: &SourceCrs,
) -> Result<Vec<HazardRecord>, HazardError> {
    log::debug!("Reading hazard layer {} ({source:?})", path.display());

    let reprojector = Reprojector::new(source)?;
    let mut reader = shapefile::Reader::from_path(path)?;
    let mut hazards = Vec::new();
    let mut skipped = 0_usize;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let Some(geometry) = geometry::shape_to_geometry(shape)? else {
            skipped += 1;
            continue;
        };
        let Some(location) = geometry::wgs84_centroid(&geometry, &reprojector)? else {
            skipped += 1;
            continue;
        };

        hazards.push(HazardRecord {
            municipality: field_text(record.get(&attributes.municipality)),
            description: field_text(record.get(&attributes.description)),
            location,
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} hazard features without geometry");
    }
    log::info!("Loaded {} hazards from {}", hazards.len(), path.display());

    Ok(hazards)
}

/// Renders a dBASE attribute as display text. Missing and null values are
/// empty.
fn field_text(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Character(Some(s)) | FieldValue::Memo(s)) => s.trim_end().to_string(),
        Some(FieldValue::Numeric(Some(n))) => n.to_string(),
        Some(FieldValue::Integer(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_text_renders_character_values() {
        let value = FieldValue::Character(Some("Gent  ".to_string()));
        assert_eq!(field_text(Some(&value)), "Gent");
    }

    #[test]
    fn field_text_renders_numbers() {
        assert_eq!(field_text(Some(&FieldValue::Numeric(Some(12.5)))), "12.5");
        assert_eq!(field_text(Some(&FieldValue::Integer(7))), "7");
    }

    #[test]
    fn field_text_of_null_or_missing_is_empty() {
        assert_eq!(field_text(Some(&FieldValue::Character(None))), "");
        assert_eq!(field_text(None), "");
    }

    #[test]
    fn default_attribute_columns() {
        let columns = AttributeColumns::default();
        assert_eq!(columns.municipality, "gemeente");
        assert_eq!(columns.description, "beschrijvi");
    }

    #[test]
    fn override_takes_precedence_over_prj() {
        let source = ShapefileHazards::new("does/not/exist.shp")
            .with_crs_override(Some(crs::BELGIAN_LAMBERT_72.to_string()));
        assert_eq!(
            source.source_crs().unwrap(),
            SourceCrs::Proj(crs::BELGIAN_LAMBERT_72.to_string())
        );
    }

    #[test]
    fn missing_prj_without_override_is_unknown_crs() {
        let source = ShapefileHazards::new("does/not/exist.shp");
        assert!(matches!(
            source.source_crs(),
            Err(HazardError::UnknownCrs { .. })
        ));
    }

    #[test]
    fn reads_crs_from_prj_sidecar() {
        let dir = std::env::temp_dir().join("poi_map_hazards_prj_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("hazards.prj"),
            r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984"]]"#,
        )
        .unwrap();

        let source = ShapefileHazards::new(dir.join("hazards.shp"));
        assert_eq!(source.source_crs().unwrap(), SourceCrs::Geographic);

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn write_lambert_72_layer(dir: &Path) -> PathBuf {
        use shapefile::dbase::{FieldName, Record, TableWriterBuilder};

        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("hazards.shp");

        let table = TableWriterBuilder::new()
            .add_character_field(FieldName::try_from("gemeente").unwrap(), 50)
            .add_character_field(FieldName::try_from("beschrijvi").unwrap(), 100);
        let mut writer = shapefile::Writer::from_path(&path, table).unwrap();

        let mut record = Record::default();
        record.insert(
            "gemeente".to_string(),
            FieldValue::Character(Some("Gent".to_string())),
        );
        record.insert(
            "beschrijvi".to_string(),
            FieldValue::Character(Some("Kruispunt".to_string())),
        );
        writer
            .write_shape_and_record(&shapefile::Point::new(104_000.0, 194_000.0), &record)
            .unwrap();
        drop(writer);

        std::fs::write(
            path.with_extension("prj"),
            r#"PROJCS["Belge_1972_Belgian_Lambert_72",GEOGCS["GCS_Belge_1972",DATUM["D_Belge_1972",SPHEROID["International_1924",6378388.0,297.0]]],PROJECTION["Lambert_Conformal_Conic"],UNIT["Meter",1.0]]"#,
        )
        .unwrap();

        path
    }

    #[test]
    fn loads_lambert_72_layer_as_wgs84_records() {
        let dir = std::env::temp_dir().join("poi_map_hazards_load_test");
        let path = write_lambert_72_layer(&dir);

        let hazards = ShapefileHazards::new(&path).load().unwrap();

        assert_eq!(hazards.len(), 1);
        let hazard = &hazards[0];
        assert_eq!(hazard.municipality, "Gent");
        assert_eq!(hazard.description, "Kruispunt");
        assert!(
            (hazard.location.latitude - 51.055).abs() < 0.01,
            "latitude {}",
            hazard.location.latitude
        );
        assert!(
            (hazard.location.longitude - 3.711).abs() < 0.01,
            "longitude {}",
            hazard.location.longitude
        );

        // Read again from disk on every call.
        assert_eq!(ShapefileHazards::new(&path).load().unwrap(), hazards);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_shapefile_fails_to_load() {
        let source = ShapefileHazards::new("does/not/exist.shp")
            .with_crs_override(Some(crs::BELGIAN_LAMBERT_72.to_string()));
        assert!(source.load().is_err());
    }
}
