use geo::{BoundingRect, MultiPolygon, Rect};
use geojson::{FeatureCollection, GeoJson, JsonValue};

use crate::error::DataError;

/// GeoJSON property carrying the display name of a region. Must match the
/// `state_name` column of the CSV source for the join to work.
const NAME_PROPERTY: &str = "NAME";
/// Optional stable numeric code (FIPS for US states). Used as the record id
/// for regions that have no CSV row yet.
const CODE_PROPERTY: &str = "STATEFP";

/// A named region with its boundary. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub code: Option<String>,
    pub boundary: MultiPolygon<f64>,
}

impl Region {
    /// Axis-aligned lon/lat bounds, used to seed the hit-test index.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.boundary.bounding_rect()
    }
}

/// The Geometry Store: every named region of the loaded feature collection,
/// in source order. Features without a usable name or polygon boundary are
/// skipped at this boundary with a warning rather than carried as untyped
/// property bags.
#[derive(Clone, Debug, Default)]
pub struct RegionCollection {
    regions: Vec<Region>,
}

impl RegionCollection {
    pub fn from_geojson(text: &str) -> Result<Self, DataError> {
        let geojson: GeoJson = text.parse()?;
        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => return Err(DataError::NotFeatureCollection),
        };
        Ok(Self::from_feature_collection(collection))
    }

    fn from_feature_collection(collection: FeatureCollection) -> Self {
        let mut regions = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let Some(name) = feature
                .property(NAME_PROPERTY)
                .and_then(property_as_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
            else {
                log::warn!("skipping feature without a {NAME_PROPERTY} property");
                continue;
            };

            let code = feature.property(CODE_PROPERTY).and_then(property_as_string);

            let Some(geometry) = feature.geometry else {
                log::warn!("skipping {name}: feature has no geometry");
                continue;
            };
            let boundary = match geo::Geometry::<f64>::try_from(geometry) {
                Ok(geo::Geometry::Polygon(polygon)) => MultiPolygon(vec![polygon]),
                Ok(geo::Geometry::MultiPolygon(multi)) => multi,
                Ok(other) => {
                    log::warn!("skipping {name}: unsupported geometry {other:?}");
                    continue;
                }
                Err(e) => {
                    log::warn!("skipping {name}: invalid geometry ({e})");
                    continue;
                }
            };

            regions.push(Region {
                name,
                code,
                boundary,
            });
        }
        Self { regions }
    }

    /// Region names in source order, for the selection UI.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        let key = name.trim();
        self.regions.iter().find(|r| r.name == key)
    }

    /// Stable code for a region name, when the geometry source exposes one.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|r| r.code.as_deref())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Property values come in as arbitrary JSON; names are strings but codes may
/// be encoded as numbers depending on the source.
fn property_as_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
