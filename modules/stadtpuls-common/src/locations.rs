use serde::Serialize;

use crate::types::GeoPoint;

/// A reference location the filter bar offers by name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedLocation {
    pub name: &'static str,
    pub point: GeoPoint,
}

/// Predefined reference locations, in filter-bar menu order.
pub const PREDEFINED_LOCATIONS: &[NamedLocation] = &[
    NamedLocation {
        name: "Alexanderplatz",
        point: GeoPoint { lat: 52.5219, lng: 13.4132 },
    },
    NamedLocation {
        name: "Brandenburger Tor",
        point: GeoPoint { lat: 52.5163, lng: 13.3777 },
    },
    NamedLocation {
        name: "Kreuzberg",
        point: GeoPoint { lat: 52.4987, lng: 13.4180 },
    },
    NamedLocation {
        name: "Prenzlauer Berg",
        point: GeoPoint { lat: 52.5429, lng: 13.4243 },
    },
    NamedLocation {
        name: "Friedrichshain",
        point: GeoPoint { lat: 52.5159, lng: 13.4548 },
    },
    NamedLocation {
        name: "Neukölln",
        point: GeoPoint { lat: 52.4811, lng: 13.4352 },
    },
    NamedLocation {
        name: "Charlottenburg",
        point: GeoPoint { lat: 52.5167, lng: 13.3041 },
    },
    NamedLocation {
        name: "Tempelhofer Feld",
        point: GeoPoint { lat: 52.4754, lng: 13.4029 },
    },
];

/// Look up a predefined location by menu index. Out-of-range indices
/// resolve to `None` rather than erroring.
pub fn predefined(index: usize) -> Option<GeoPoint> {
    PREDEFINED_LOCATIONS.get(index).map(|l| l.point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_resolves_to_point() {
        let point = predefined(0).unwrap();
        assert!((point.lat - 52.5219).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_index_is_none() {
        assert!(predefined(PREDEFINED_LOCATIONS.len()).is_none());
    }

    #[test]
    fn all_locations_are_within_the_city() {
        // Everything in the menu should sit within ~25 km of Alexanderplatz.
        let center = PREDEFINED_LOCATIONS[0].point;
        for loc in PREDEFINED_LOCATIONS {
            assert!(
                center.distance_km(&loc.point) < 25.0,
                "{} is implausibly far from the center",
                loc.name
            );
        }
    }
}
