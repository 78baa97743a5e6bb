//! Overpass QL query builders.

use citywalk_core::BoundingBox;

/// Server-side timeout requested in every query, in seconds.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

/// Tag filters fetched by [`pois_query`].
const POI_FILTERS: [&str; 6] = [
    r#"["tourism"="attraction"]"#,
    r#"["tourism"="museum"]"#,
    r#"["historic"]"#,
    r#"["leisure"="park"]"#,
    r#"["amenity"="restaurant"]"#,
    r#"["amenity"="cafe"]"#,
];

/// Query for sightseeing and food features inside `bbox`.
///
/// Nodes, ways and relations are all requested; `out center;` gives areas a
/// representative point.
///
/// # Examples
/// ```
/// use citywalk_core::BoundingBox;
/// use citywalk_data::overpass::query::pois_query;
///
/// # fn main() -> Result<(), citywalk_core::BoundingBoxError> {
/// let query = pois_query(&BoundingBox::new(48.0, 49.0, 2.0, 3.0)?);
/// assert!(query.starts_with("[out:json][timeout:25];"));
/// assert!(query.contains(r#"nwr["leisure"="park"](48,2,49,3);"#));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn pois_query(bbox: &BoundingBox) -> String {
    let area = bbox.overpass_filter();
    let clauses: String = POI_FILTERS
        .iter()
        .map(|filter| format!("  nwr{filter}({area});\n"))
        .collect();
    format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n{clauses});\nout center;\n")
}

/// Query for railway stations inside `bbox`.
#[must_use]
pub fn station_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\nnwr[\"railway\"=\"station\"]({});\nout center;\n",
        bbox.overpass_filter()
    )
}
