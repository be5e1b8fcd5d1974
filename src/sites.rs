/// Launch site registry for the dashboard.
///
/// Defines the canonical list of launch sites shown on the map and offered
/// by the detail panels, along with their coordinates and descriptions.
/// This is the single source of truth for site metadata; all other modules
/// should reference sites from here rather than hardcoding coordinates.

use crate::model::Location;

// ---------------------------------------------------------------------------
// Site metadata
// ---------------------------------------------------------------------------

/// Metadata for a single launch site.
#[derive(Debug)]
pub struct Site {
    pub location: Location,
    /// Short description shown in the map popup.
    pub description: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// All launch sites known to the backend, east coast first.
pub static SITE_REGISTRY: &[Site] = &[
    Site {
        location: Location::KennedySpaceCenter,
        description: "NASA's primary launch center",
        latitude: 28.573255,
        longitude: -80.646895,
    },
    Site {
        location: Location::CapeCanaveral,
        description: "Historic launch site",
        latitude: 28.4889,
        longitude: -80.5778,
    },
    Site {
        location: Location::VandenbergSfb,
        description: "West coast polar and sun-synchronous launches",
        latitude: 34.7420,
        longitude: -120.5724,
    },
    Site {
        location: Location::WallopsFlightFacility,
        description: "NASA range on the Virginia Eastern Shore",
        latitude: 37.9402,
        longitude: -75.4664,
    },
    Site {
        location: Location::KodiakLaunchComplex,
        description: "High-inclination launches from Kodiak Island, Alaska",
        latitude: 57.4356,
        longitude: -152.3378,
    },
    Site {
        location: Location::SpaceportAmerica,
        description: "Commercial spaceport in the New Mexico desert",
        latitude: 32.9903,
        longitude: -106.9750,
    },
];

/// Names of all registered sites, in registry order.
pub fn all_site_names() -> Vec<&'static str> {
    SITE_REGISTRY.iter().map(|s| s.location.as_str()).collect()
}

/// All registered locations, in registry order.
pub fn all_locations() -> Vec<Location> {
    SITE_REGISTRY.iter().map(|s| s.location).collect()
}

/// Looks up a site by its exact backend name. Returns `None` if not found.
pub fn find_site(name: &str) -> Option<&'static Site> {
    SITE_REGISTRY.iter().find(|s| s.location.as_str() == name)
}

/// Registry entry for a location. Every `Location` has one.
pub fn site_for(location: Location) -> Option<&'static Site> {
    SITE_REGISTRY.iter().find(|s| s.location == location)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
