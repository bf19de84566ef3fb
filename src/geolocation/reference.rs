use crate::models::GeolocationData;
use once_cell::sync::Lazy;

/// Built-in reference locations. The slice order is fixed, so scans over
/// it resolve ties deterministically.
pub static REFERENCE_LOCATIONS: Lazy<Vec<GeolocationData>> = Lazy::new(|| {
    vec![
        GeolocationData {
            country: "Canada".to_string(),
            country_code: "CA".to_string(),
            city: "Vancouver".to_string(),
            region: "British Columbia".to_string(),
            latitude: 49.2827,
            longitude: -123.1207,
            timezone: "America/Vancouver".to_string(),
            postal_code: None,
        },
        GeolocationData {
            country: "United States".to_string(),
            country_code: "US".to_string(),
            city: "New York".to_string(),
            region: "New York".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
            timezone: "America/New_York".to_string(),
            postal_code: None,
        },
        GeolocationData {
            country: "United Kingdom".to_string(),
            country_code: "GB".to_string(),
            city: "London".to_string(),
            region: "England".to_string(),
            latitude: 51.5074,
            longitude: -0.1278,
            timezone: "Europe/London".to_string(),
            postal_code: None,
        },
        GeolocationData {
            country: "Hungary".to_string(),
            country_code: "HU".to_string(),
            city: "Budapest".to_string(),
            region: "Central Hungary".to_string(),
            latitude: 47.4979,
            longitude: 19.0402,
            timezone: "Europe/Budapest".to_string(),
            postal_code: None,
        },
    ]
});

/// First reference entry whose city name occurs in the given text,
/// case-insensitive
pub fn find_by_city_substring(text: &str) -> Option<&'static GeolocationData> {
    let normalized = text.to_lowercase();
    REFERENCE_LOCATIONS
        .iter()
        .find(|location| normalized.contains(&location.city.to_lowercase()))
}
