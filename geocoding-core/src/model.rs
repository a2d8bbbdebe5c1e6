use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Known Mapbox geocoding datasets.
///
/// The client accepts any dataset string; this enum only names the two the
/// API documents so callers don't have to spell them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Places,
    PlacesPermanent,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Places => "mapbox.places",
            Dataset::PlacesPermanent => "mapbox.places-permanent",
        }
    }

    pub const fn all() -> &'static [Dataset] {
        &[Dataset::Places, Dataset::PlacesPermanent]
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Dataset {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A longitude/latitude pair, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl FromStr for LngLat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let [lng, lat] = parse_numbers::<2>(s).context("Expected coordinates as 'lng,lat'")?;
        Ok(Self { lng, lat })
    }
}

/// Rectangular filter: `minLng,minLat,maxLng,maxLat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.min_lng, self.min_lat, self.max_lng, self.max_lat)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }
}

impl FromStr for BoundingBox {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = parse_numbers::<4>(s)
            .context("Expected bounding box as 'minLng,minLat,maxLng,maxLat'")?;
        Ok(parts.into())
    }
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(anyhow!("Expected {N} comma-separated numbers, got {}", parts.len()));
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse().with_context(|| format!("Invalid number '{part}'"))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lnglat_formats_like_the_query_segment() {
        assert_eq!(LngLat::new(-122.4, 37.8).to_string(), "-122.4,37.8");
        assert_eq!(LngLat::new(-10.0, 5.0).to_string(), "-10,5");
    }

    #[test]
    fn tiny_coordinates_are_written_without_exponent() {
        assert_eq!(LngLat::new(1e-7, -2.5e-8).to_string(), "0.0000001,-0.000000025");
    }

    #[test]
    fn bbox_formats_in_min_max_order() {
        let bbox = BoundingBox::from([-10.0, -10.0, 10.0, 10.0]);
        assert_eq!(bbox.to_string(), "-10,-10,10,10");
    }

    #[test]
    fn parse_lnglat_and_bbox() {
        let c: LngLat = " -73.99, 40.73 ".parse().expect("valid pair");
        assert_eq!(c, LngLat::new(-73.99, 40.73));

        let b: BoundingBox = "-1,-2,3,4".parse().expect("valid bbox");
        assert_eq!(b, BoundingBox::new(-1.0, -2.0, 3.0, 4.0));
    }

    #[test]
    fn parse_rejects_wrong_arity_and_garbage() {
        let err = "1,2,3".parse::<BoundingBox>().unwrap_err();
        assert!(format!("{err:#}").contains("Expected 4 comma-separated numbers"));

        let err = "1,north".parse::<LngLat>().unwrap_err();
        assert!(format!("{err:#}").contains("Invalid number 'north'"));
    }

    #[test]
    fn dataset_names() {
        let names: Vec<&str> = Dataset::all().iter().map(Dataset::as_str).collect();
        assert_eq!(names, ["mapbox.places", "mapbox.places-permanent"]);
        assert_eq!(Dataset::Places.to_string(), "mapbox.places");
    }
}
