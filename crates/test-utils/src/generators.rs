//! Synthetic feature generators.
//!
//! These create predictable street grids and area patterns inside a
//! bounding box so rendering tests and benchmarks do not depend on live
//! map data.

use poster_common::{BoundingBox, FeatureSet, GeoPoint, Way};

/// Highway values cycled through by [`road_grid`].
const GRID_HIGHWAYS: [&str; 6] = [
    "motorway",
    "primary",
    "secondary",
    "tertiary",
    "residential",
    "service",
];

/// Creates an evenly spaced street grid.
///
/// `lines` horizontal and `lines` vertical roads span the whole box. Each
/// road gets a `highway` tag cycling through all classifier tiers, and
/// `segments` points so joins are exercised.
///
/// # Example
///
/// ```
/// use poster_common::BoundingBox;
/// use test_utils::road_grid;
///
/// let ways = road_grid(&BoundingBox::new(0.0, 1.0, 0.0, 1.0), 4, 3);
/// assert_eq!(ways.len(), 8);
/// assert_eq!(ways[0].geometry.len(), 4);
/// ```
pub fn road_grid(bounds: &BoundingBox, lines: usize, segments: usize) -> Vec<Way> {
    let mut ways = Vec::with_capacity(lines * 2);
    let step = |extent: f64, i: usize| extent * (i as f64 + 0.5) / lines as f64;

    for i in 0..lines {
        let lat = bounds.min_lat + step(bounds.height(), i);
        let points = (0..=segments)
            .map(|s| GeoPoint::new(lat, bounds.min_lon + bounds.width() * s as f64 / segments as f64))
            .collect();
        ways.push(tagged_road(ways.len(), points));
    }

    for i in 0..lines {
        let lon = bounds.min_lon + step(bounds.width(), i);
        let points = (0..=segments)
            .map(|s| GeoPoint::new(bounds.min_lat + bounds.height() * s as f64 / segments as f64, lon))
            .collect();
        ways.push(tagged_road(ways.len(), points));
    }

    ways
}

fn tagged_road(index: usize, points: Vec<GeoPoint>) -> Way {
    let mut way = Way::new(points).with_tag("highway", GRID_HIGHWAYS[index % GRID_HIGHWAYS.len()]);
    way.id = index as i64 + 1;
    way
}

/// Creates a checkerboard of square areas covering `cells` x `cells` tiles
/// of the box, returning every other tile.
pub fn area_checkerboard(bounds: &BoundingBox, cells: usize) -> Vec<Way> {
    let mut ways = Vec::new();
    let dlat = bounds.height() / cells as f64;
    let dlon = bounds.width() / cells as f64;
    for row in 0..cells {
        for col in 0..cells {
            if (row + col) % 2 != 0 {
                continue;
            }
            let lat0 = bounds.min_lat + dlat * row as f64;
            let lon0 = bounds.min_lon + dlon * col as f64;
            ways.push(Way::new(vec![
                GeoPoint::new(lat0, lon0),
                GeoPoint::new(lat0, lon0 + dlon),
                GeoPoint::new(lat0 + dlat, lon0 + dlon),
                GeoPoint::new(lat0 + dlat, lon0),
            ]));
        }
    }
    ways
}

/// A feature set with a street grid, water checkerboard and a few parks.
pub fn sample_city(bounds: &BoundingBox) -> FeatureSet {
    let parks = vec![crate::fixtures::rectangle(bounds, 0.40, 0.60)];
    FeatureSet::new(
        road_grid(bounds, 12, 8),
        area_checkerboard(bounds, 4),
        parks,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BoundingBox {
        BoundingBox::new(0.0, 1.0, 0.0, 1.0)
    }

    #[test]
    fn test_road_grid_stays_in_box() {
        let bounds = unit();
        for way in road_grid(&bounds, 5, 4) {
            assert_eq!(way.geometry.len(), 5);
            for p in &way.geometry {
                assert!(bounds.contains_point(p.lat, p.lon), "{:?} outside box", p);
            }
        }
    }

    #[test]
    fn test_road_grid_cycles_highways() {
        let ways = road_grid(&unit(), 6, 1);
        let tags: Vec<_> = ways.iter().take(6).map(|w| w.tag("highway").unwrap()).collect();
        assert_eq!(tags, GRID_HIGHWAYS);
    }

    #[test]
    fn test_area_checkerboard() {
        let ways = area_checkerboard(&unit(), 4);
        assert_eq!(ways.len(), 8);
        assert!(ways.iter().all(|w| w.geometry.len() == 4));
    }

    #[test]
    fn test_sample_city_is_populated() {
        let features = sample_city(&unit());
        assert_eq!(features.roads.len(), 24);
        assert_eq!(features.water.len(), 8);
        assert_eq!(features.parks.len(), 1);
    }
}
