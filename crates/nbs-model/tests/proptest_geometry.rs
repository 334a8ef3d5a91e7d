// SPDX-License-Identifier: Apache-2.0

use geo::Geometry;
use nbs_model::{BBox, Footprint, GeoJsonGeometry, Region, Score};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn ordered_bbox_always_builds_a_region(
        west in -180.0_f64..179.0,
        south in -90.0_f64..89.0,
        dx in 0.0_f64..1.0,
        dy in 0.0_f64..1.0,
    ) {
        let bbox = BBox::new(west, south, west + dx, south + dy).expect("ordered bbox");
        let region = Region::from_bbox(bbox).expect("region");
        prop_assert_eq!(region.envelope(), bbox.envelope());
    }

    #[test]
    fn single_vertex_polygon_is_a_point(lon in -180.0_f64..=180.0, lat in -90.0_f64..=90.0) {
        let ring = vec![[lon, lat]; 5];
        let footprint = Footprint::from_geojson(GeoJsonGeometry::Polygon(vec![ring]))
            .expect("degenerate polygon");
        prop_assert!(matches!(footprint.shape(), Geometry::Point(_)));
    }

    #[test]
    fn score_accepts_exactly_zero_to_hundred(value in -1_000_i64..1_000) {
        prop_assert_eq!(Score::new(value).is_ok(), (0..=100).contains(&value));
    }
}
