//! Source CRS detection and reprojection to WGS84.
//!
//! Shapefiles carry their coordinate reference system as ESRI WKT in a
//! sibling `.prj` file. Rather than parse WKT, the handful of systems the
//! hazard layer is published in are recognised by name and mapped to a
//! PROJ definition. Anything else needs an explicit PROJ string.
//!
//! Geographic `.prj` files are taken as WGS84 unless they name the Belge
//! 1972 datum, which is shifted with the same `towgs84` parameters as
//! Lambert 72. Other non-WGS84 geographic datums are not detected and need
//! an explicit PROJ string to be shifted.

use geo::Coord;
use proj4rs::proj::Proj;

use crate::HazardError;

/// EPSG:31370, Belge 1972 / Belgian Lambert 72.
pub const BELGIAN_LAMBERT_72: &str = "+proj=lcc +lat_0=90 +lon_0=4.36748666666667 \
     +lat_1=51.1666672333333 +lat_2=49.8333339 +x_0=150000.013 +y_0=5400088.438 \
     +ellps=intl +towgs84=-106.8686,52.2978,-103.7239,0.3366,-0.457,1.8422,-1.2747 \
     +units=m +no_defs";

/// EPSG:3812, ETRS89 / Belgian Lambert 2008.
pub const BELGIAN_LAMBERT_2008: &str = "+proj=lcc +lat_0=50.797815 +lon_0=4.35921583333333 \
     +lat_1=49.8333333333333 +lat_2=51.1666666666667 +x_0=649328 +y_0=665262 \
     +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// EPSG:3857, WGS 84 / Pseudo-Mercator.
pub const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";

/// EPSG:4313, Belge 1972 geographic.
pub const BELGE_1972_GEOGRAPHIC: &str = "+proj=longlat +ellps=intl \
     +towgs84=-106.8686,52.2978,-103.7239,0.3366,-0.457,1.8422,-1.2747 +no_defs";

/// EPSG:4326, the target of every reprojection.
pub const WGS84: &str = "+proj=longlat +ellps=WGS84 +towgs84=0,0,0,0,0,0,0 +no_defs";

/// Geographic datum name fragments that need a datum shift.
const KNOWN_GEOGRAPHIC: &[(&[&str], &str)] = &[(
    &["Belge_1972", "Belge 1972", "4313"],
    BELGE_1972_GEOGRAPHIC,
)];

/// `.prj` name fragments and the PROJ definitions they map to.
const KNOWN_PROJECTED: &[(&[&str], &str)] = &[
    (
        &["Lambert_72", "Lambert 72", "Belge_1972", "Belge 1972", "31370"],
        BELGIAN_LAMBERT_72,
    ),
    (&["Lambert_2008", "Lambert 2008", "3812"], BELGIAN_LAMBERT_2008),
    (
        &["Pseudo_Mercator", "Pseudo-Mercator", "Web_Mercator", "3857"],
        WEB_MERCATOR,
    ),
];

/// The coordinate reference system of a hazard layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCrs {
    /// WGS84 longitude/latitude degrees; no reprojection.
    Geographic,
    /// Any other system described by a PROJ string.
    Proj(String),
}

impl SourceCrs {
    /// Identifies the CRS from the text of a `.prj` file.
    ///
    /// Returns `None` for projected systems that are not recognised.
    #[must_use]
    pub fn from_prj(wkt: &str) -> Option<Self> {
        let wkt = wkt.trim();

        if wkt.starts_with("GEOGCS") {
            return Some(find_known(KNOWN_GEOGRAPHIC, wkt).unwrap_or(Self::Geographic));
        }

        find_known(KNOWN_PROJECTED, wkt)
    }
}

fn find_known(known: &[(&[&str], &str)], wkt: &str) -> Option<SourceCrs> {
    known
        .iter()
        .find(|(names, _)| names.iter().any(|name| wkt.contains(name)))
        .map(|(_, proj)| SourceCrs::Proj((*proj).to_string()))
}

/// Converts coordinates from a source CRS to WGS84 degrees.
pub struct Reprojector {
    projection: Option<(Proj, Proj)>,
}

impl Reprojector {
    /// Prepares a reprojection from `source` to WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::Projection`] if a PROJ string is invalid.
    pub fn new(source: &SourceCrs) -> Result<Self, HazardError> {
        let projection = match source {
            SourceCrs::Geographic => None,
            SourceCrs::Proj(definition) => {
                let from = parse_proj(definition)?;
                let to = parse_proj(WGS84)?;
                Some((from, to))
            }
        };

        Ok(Self { projection })
    }

    /// Reprojects one `(x, y)` coordinate to `(longitude, latitude)`
    /// degrees.
    ///
    /// # Errors
    ///
    /// Returns [`HazardError::Projection`] if the point cannot be
    /// transformed.
    pub fn to_wgs84(&self, coord: Coord<f64>) -> Result<Coord<f64>, HazardError> {
        let Some((from, to)) = &self.projection else {
            return Ok(coord);
        };

        // proj4rs takes and returns geographic coordinates in radians.
        let mut point = if from.is_latlong() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        proj4rs::transform::transform(from, to, &mut point).map_err(|e| {
            HazardError::Projection {
                message: format!("failed to transform ({}, {}): {e:?}", coord.x, coord.y),
            }
        })?;

        Ok(Coord {
            x: point.0.to_degrees(),
            y: point.1.to_degrees(),
        })
    }
}

fn parse_proj(definition: &str) -> Result<Proj, HazardError> {
    Proj::from_proj_string(definition).map_err(|e| HazardError::Projection {
        message: format!("invalid PROJ definition '{definition}': {e:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAMBERT_72_PRJ: &str = r#"PROJCS["Belge_1972_Belgian_Lambert_72",GEOGCS["GCS_Belge_1972",DATUM["D_Belge_1972",SPHEROID["International_1924",6378388.0,297.0]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Lambert_Conformal_Conic"],PARAMETER["False_Easting",150000.013],PARAMETER["False_Northing",5400088.438],PARAMETER["Central_Meridian",4.367486666666666],PARAMETER["Standard_Parallel_1",49.8333339],PARAMETER["Standard_Parallel_2",51.16666723333333],PARAMETER["Latitude_Of_Origin",90.0],UNIT["Meter",1.0]]"#;

    const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

    #[test]
    fn detects_geographic_prj() {
        assert_eq!(SourceCrs::from_prj(WGS84_PRJ), Some(SourceCrs::Geographic));
    }

    #[test]
    fn detects_belgian_lambert_72() {
        assert_eq!(
            SourceCrs::from_prj(LAMBERT_72_PRJ),
            Some(SourceCrs::Proj(BELGIAN_LAMBERT_72.to_string()))
        );
    }

    #[test]
    fn unknown_projection_is_not_guessed() {
        let prj = r#"PROJCS["NAD_1983_UTM_Zone_16N",GEOGCS["GCS_North_American_1983"]]"#;
        assert_eq!(SourceCrs::from_prj(prj), None);
    }

    #[test]
    fn geographic_is_identity() {
        let reprojector = Reprojector::new(&SourceCrs::Geographic).unwrap();
        let out = reprojector.to_wgs84(Coord { x: 3.72, y: 51.05 }).unwrap();
        assert!((out.x - 3.72).abs() < f64::EPSILON);
        assert!((out.y - 51.05).abs() < f64::EPSILON);
    }

    #[test]
    fn lambert_72_reprojects_to_ghent() {
        let reprojector =
            Reprojector::new(&SourceCrs::Proj(BELGIAN_LAMBERT_72.to_string())).unwrap();
        let out = reprojector
            .to_wgs84(Coord {
                x: 104_000.0,
                y: 194_000.0,
            })
            .unwrap();
        // Ghent city centre, within the datum shift tolerance.
        assert!((out.y - 51.055).abs() < 0.005, "latitude {}", out.y);
        assert!((out.x - 3.711).abs() < 0.005, "longitude {}", out.x);
    }

    #[test]
    fn detects_belge_1972_geographic_prj() {
        let prj = r#"GEOGCS["GCS_Belge_1972",DATUM["D_Belge_1972",SPHEROID["International_1924",6378388.0,297.0]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
        assert_eq!(
            SourceCrs::from_prj(prj),
            Some(SourceCrs::Proj(BELGE_1972_GEOGRAPHIC.to_string()))
        );
    }

    #[test]
    fn geographic_override_keeps_wgs84_degrees() {
        let reprojector =
            Reprojector::new(&SourceCrs::Proj("+proj=longlat +datum=WGS84".to_string())).unwrap();
        let out = reprojector.to_wgs84(Coord { x: 3.72, y: 51.05 }).unwrap();
        assert!((out.x - 3.72).abs() < 1e-9, "longitude {}", out.x);
        assert!((out.y - 51.05).abs() < 1e-9, "latitude {}", out.y);
    }

    #[test]
    fn belge_1972_geographic_is_datum_shifted() {
        let reprojector =
            Reprojector::new(&SourceCrs::Proj(BELGE_1972_GEOGRAPHIC.to_string())).unwrap();
        let out = reprojector.to_wgs84(Coord { x: 3.72, y: 51.05 }).unwrap();
        assert!((out.x - 3.72).abs() < 0.005, "longitude {}", out.x);
        assert!((out.y - 51.05).abs() < 0.005, "latitude {}", out.y);
        assert!((out.x - 3.72).abs() + (out.y - 51.05).abs() > 1e-5);
    }

    #[test]
    fn invalid_proj_string_is_an_error() {
        assert!(matches!(
            Reprojector::new(&SourceCrs::Proj("+proj=doesnotexist".to_string())),
            Err(HazardError::Projection { .. })
        ));
    }
}
