//! Shapefile shape to `geo` geometry conversion and centroid reduction.

use geo::{
    Centroid, Geometry, LineString, MapCoords, MultiLineString, MultiPoint, MultiPolygon, Point,
};
use poi_map_geography_models::LatLon;
use shapefile::Shape;

use crate::HazardError;
use crate::crs::Reprojector;

/// Converts a shapefile shape into a `geo` geometry in the layer's native
/// coordinates.
///
/// Returns `Ok(None)` for null shapes and for multipatch surfaces, which
/// have no meaningful planar centroid.
///
/// # Errors
///
/// Returns [`HazardError::Geometry`] if a polygon cannot be converted.
pub fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>, HazardError> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Multipatch(_) => {
            log::debug!("Skipping multipatch shape");
            return Ok(None);
        }
        Shape::Point(p) => Point::new(p.x, p.y).into(),
        Shape::PointM(p) => Point::new(p.x, p.y).into(),
        Shape::PointZ(p) => Point::new(p.x, p.y).into(),
        Shape::Multipoint(mp) => multi_point(mp.points().iter().map(|p| (p.x, p.y))).into(),
        Shape::MultipointM(mp) => multi_point(mp.points().iter().map(|p| (p.x, p.y))).into(),
        Shape::MultipointZ(mp) => multi_point(mp.points().iter().map(|p| (p.x, p.y))).into(),
        Shape::Polyline(line) => multi_line(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()),
        )
        .into(),
        Shape::PolylineM(line) => multi_line(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()),
        )
        .into(),
        Shape::PolylineZ(line) => multi_line(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()),
        )
        .into(),
        Shape::Polygon(polygon) => {
            let polygon: MultiPolygon<f64> =
                polygon.try_into().map_err(|e| HazardError::Geometry {
                    message: format!("Failed to convert polygon: {e:?}"),
                })?;
            polygon.into()
        }
        Shape::PolygonM(polygon) => {
            let polygon: MultiPolygon<f64> =
                polygon.try_into().map_err(|e| HazardError::Geometry {
                    message: format!("Failed to convert polygonM: {e:?}"),
                })?;
            polygon.into()
        }
        Shape::PolygonZ(polygon) => {
            let polygon: MultiPolygon<f64> =
                polygon.try_into().map_err(|e| HazardError::Geometry {
                    message: format!("Failed to convert polygonZ: {e:?}"),
                })?;
            polygon.into()
        }
    };

    Ok(Some(geometry))
}

/// Reprojects `geometry` to WGS84 and returns its centroid.
///
/// Returns `Ok(None)` for empty geometries.
///
/// # Errors
///
/// Returns [`HazardError::Projection`] if any coordinate fails to
/// reproject.
pub fn wgs84_centroid(
    geometry: &Geometry<f64>,
    reprojector: &Reprojector,
) -> Result<Option<LatLon>, HazardError> {
    let geographic = geometry.try_map_coords(|coord| reprojector.to_wgs84(coord))?;
    Ok(geographic.centroid().map(|c| LatLon::from_xy(c.x(), c.y())))
}

fn multi_point(points: impl Iterator<Item = (f64, f64)>) -> MultiPoint<f64> {
    MultiPoint::new(points.map(|(x, y)| Point::new(x, y)).collect())
}

fn multi_line(parts: impl Iterator<Item = Vec<(f64, f64)>>) -> MultiLineString<f64> {
    MultiLineString::new(parts.map(LineString::from).collect())
}

#[cfg(test)]
mod tests {
    use shapefile::PolygonRing;

    use super::*;
    use crate::crs::SourceCrs;

    fn identity() -> Reprojector {
        Reprojector::new(&SourceCrs::Geographic).unwrap()
    }

    #[test]
    fn null_shape_has_no_geometry() {
        assert!(shape_to_geometry(Shape::NullShape).unwrap().is_none());
    }

    #[test]
    fn point_centroid_is_the_point() {
        let geometry = shape_to_geometry(Shape::Point(shapefile::Point::new(3.72, 51.05)))
            .unwrap()
            .unwrap();
        let centroid = wgs84_centroid(&geometry, &identity()).unwrap().unwrap();
        assert_eq!(centroid, LatLon::new(51.05, 3.72));
    }

    #[test]
    fn polygon_centroid_is_its_center() {
        let ring = PolygonRing::Outer(vec![
            shapefile::Point::new(0.0, 0.0),
            shapefile::Point::new(0.0, 2.0),
            shapefile::Point::new(2.0, 2.0),
            shapefile::Point::new(2.0, 0.0),
            shapefile::Point::new(0.0, 0.0),
        ]);
        let shape = Shape::Polygon(shapefile::Polygon::new(ring));
        let geometry = shape_to_geometry(shape).unwrap().unwrap();
        let centroid = wgs84_centroid(&geometry, &identity()).unwrap().unwrap();
        assert!((centroid.latitude - 1.0).abs() < 1e-9);
        assert!((centroid.longitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn polyline_centroid_is_its_midpoint() {
        let shape = Shape::Polyline(shapefile::Polyline::new(vec![
            shapefile::Point::new(0.0, 0.0),
            shapefile::Point::new(4.0, 0.0),
        ]));
        let geometry = shape_to_geometry(shape).unwrap().unwrap();
        let centroid = wgs84_centroid(&geometry, &identity()).unwrap().unwrap();
        assert!((centroid.longitude - 2.0).abs() < 1e-9);
        assert!(centroid.latitude.abs() < 1e-9);
    }

    #[test]
    fn empty_multipoint_has_no_centroid() {
        let geometry: Geometry<f64> = MultiPoint::<f64>::new(Vec::new()).into();
        assert!(wgs84_centroid(&geometry, &identity()).unwrap().is_none());
    }
}
