use egui::Color32;
use geo::{Contains, Point};
use rstar::{RTree, RTreeObject, AABB};

use crate::data::geometry::RegionCollection;
use crate::data::records::{RecordStore, TripStatus, VisitRecord};
use crate::map::projection::lonlat_to_world;

/// Regions present in the geometry but missing from the record store.
pub const COLOR_FALLBACK: Color32 = Color32::from_rgb(0xFF, 0xBE, 0x2E);
/// Record present but not visited.
pub const COLOR_NOT_VISITED: Color32 = Color32::from_rgb(0xAD, 0xAD, 0xAD);
pub const COLOR_PLANNED: Color32 = Color32::from_rgb(0xF3, 0xCF, 0x45);
pub const COLOR_VISITED_MULTI: Color32 = Color32::from_rgb(0x16, 0x2E, 0x51);
pub const COLOR_VISITED_ONCE: Color32 = Color32::from_rgb(0x58, 0xB4, 0xFF);
/// Visited but the count is zero or was unparsable; still rendered as visited.
pub const COLOR_VISITED_UNCOUNTED: Color32 = Color32::from_rgb(0x90, 0xEE, 0x90);

/// Fill for a region that has a record. Pure function of the inputs; the
/// match order is the tie-break order of the color policy.
pub fn status_fill(status: TripStatus, visit_count: u32) -> Color32 {
    match status {
        TripStatus::Planned => COLOR_PLANNED,
        TripStatus::Visited if visit_count > 1 => COLOR_VISITED_MULTI,
        TripStatus::Visited if visit_count == 1 => COLOR_VISITED_ONCE,
        TripStatus::Visited => COLOR_VISITED_UNCOUNTED,
        TripStatus::NotVisited => COLOR_NOT_VISITED,
    }
}

/// Fill for a region given its (possibly absent) record.
pub fn record_fill(record: Option<&VisitRecord>) -> Color32 {
    match record {
        Some(r) => status_fill(r.status, r.visit_count),
        None => COLOR_FALLBACK,
    }
}

/// One region ready to paint: world-space exterior rings plus the fill
/// derived from the record store at build time.
pub struct RegionShape {
    pub name: String,
    pub fill: Color32,
    /// One exterior ring per polygon of the boundary, projected to world
    /// space once at build time.
    pub rings: Vec<Vec<(f64, f64)>>,
}

struct RegionEnvelope {
    bbox: AABB<[f64; 2]>,
    index: usize,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox
    }
}

/// The styled map layer. Built from the current geometry and record stores;
/// an edit commit replaces the whole layer via a fresh [`RegionLayer::build`]
/// (no incremental restyling, no stale layers to accumulate). Building twice
/// from unchanged stores yields an identical layer.
pub struct RegionLayer {
    shapes: Vec<RegionShape>,
    index: RTree<RegionEnvelope>,
}

impl RegionLayer {
    pub fn build(regions: &RegionCollection, store: &RecordStore) -> Self {
        let mut shapes = Vec::with_capacity(regions.len());
        let mut envelopes = Vec::with_capacity(regions.len());

        for (i, region) in regions.iter().enumerate() {
            let rings = region
                .boundary
                .iter()
                .map(|polygon| {
                    polygon
                        .exterior()
                        .coords()
                        .map(|c| lonlat_to_world(c.x, c.y))
                        .collect()
                })
                .collect();
            shapes.push(RegionShape {
                name: region.name.clone(),
                fill: record_fill(store.lookup(&region.name)),
                rings,
            });

            if let Some(rect) = region.bounding_rect() {
                envelopes.push(RegionEnvelope {
                    bbox: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                    index: i,
                });
            }
        }

        Self {
            shapes,
            index: RTree::bulk_load(envelopes),
        }
    }

    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    /// Region containing the given lon/lat, if any. The R-tree narrows the
    /// candidates by bounding box, exact containment decides.
    pub fn hit_test<'a>(
        &self,
        regions: &'a RegionCollection,
        lon: f64,
        lat: f64,
    ) -> Option<&'a str> {
        let point = Point::new(lon, lat);
        self.index
            .locate_in_envelope_intersecting(&AABB::from_point([lon, lat]))
            .filter_map(|env| regions.iter().nth(env.index))
            .find(|region| region.boundary.contains(&point))
            .map(|region| region.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geometry::tests::SAMPLE_GEOJSON;
    use crate::data::records::RecordDraft;

    fn sample_regions() -> RegionCollection {
        RegionCollection::from_geojson(SAMPLE_GEOJSON).unwrap()
    }

    #[test]
    fn status_fill_is_pure_and_ordered() {
        assert_eq!(status_fill(TripStatus::Planned, 5), COLOR_PLANNED);
        assert_eq!(status_fill(TripStatus::Visited, 2), COLOR_VISITED_MULTI);
        assert_eq!(status_fill(TripStatus::Visited, 1), COLOR_VISITED_ONCE);
        assert_eq!(status_fill(TripStatus::Visited, 0), COLOR_VISITED_UNCOUNTED);
        assert_eq!(status_fill(TripStatus::NotVisited, 3), COLOR_NOT_VISITED);
        // same inputs, same color
        assert_eq!(
            status_fill(TripStatus::Visited, 2),
            status_fill(TripStatus::Visited, 2)
        );
    }

    #[test]
    fn unmatched_region_gets_fallback_color() {
        let regions = sample_regions();
        let store = RecordStore::default();
        assert!(store.lookup("Texas").is_none());

        let layer = RegionLayer::build(&regions, &store);
        let texas = layer.shapes().iter().find(|s| s.name == "Texas").unwrap();
        assert_eq!(texas.fill, COLOR_FALLBACK);
    }

    #[test]
    fn rebuild_after_upsert_recolors_the_region() {
        let regions = sample_regions();
        let mut store = RecordStore::default();
        store.upsert(
            "Texas",
            &RecordDraft {
                status: TripStatus::Visited,
                visit_count: 2,
                ..Default::default()
            },
            regions.code_for("Texas"),
        );
        assert_eq!(store.lookup("Texas").unwrap().visit_count, 2);

        let layer = RegionLayer::build(&regions, &store);
        let texas = layer.shapes().iter().find(|s| s.name == "Texas").unwrap();
        assert_eq!(texas.fill, COLOR_VISITED_MULTI);
    }

    #[test]
    fn build_is_idempotent_for_unchanged_stores() {
        let regions = sample_regions();
        let store = RecordStore::default();
        let a = RegionLayer::build(&regions, &store);
        let b = RegionLayer::build(&regions, &store);

        assert_eq!(a.shapes().len(), b.shapes().len());
        for (sa, sb) in a.shapes().iter().zip(b.shapes()) {
            assert_eq!(sa.name, sb.name);
            assert_eq!(sa.fill, sb.fill);
            assert_eq!(sa.rings, sb.rings);
        }
    }

    #[test]
    fn hit_test_finds_the_containing_region() {
        let regions = sample_regions();
        let layer = RegionLayer::build(&regions, &RecordStore::default());

        assert_eq!(layer.hit_test(&regions, -99.0, 31.0), Some("Texas"));
        assert_eq!(layer.hit_test(&regions, -82.9, 40.0), Some("Ohio"));
        // Atlantic ocean
        assert_eq!(layer.hit_test(&regions, -40.0, 30.0), None);
    }
}
