//! CSV normalization: raw feed text into typed records

use std::collections::BTreeMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use qv_core::Record;

use crate::config::{CoordinatePolicy, NormalizerConfig};

/// Normalize with the default configuration
pub fn normalize(raw: &str) -> Vec<Record> {
    normalize_with(raw, &NormalizerConfig::default())
}

/// Turn delimited text with a header row into records, in input order.
///
/// Never fails: malformed numbers become 0, missing ids are synthesized,
/// missing places get the placeholder. Only rows the CSV reader cannot decode,
/// and rows dropped by [`CoordinatePolicy::DropRow`], are left out.
pub fn normalize_with(raw: &str, config: &NormalizerConfig) -> Vec<Record> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::debug!("Unreadable CSV header: {}", e);
            return Vec::new();
        }
    };

    let columns = ColumnMap::resolve(&headers);
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!("Skipping undecodable row {}: {}", row_idx + 1, e);
                continue;
            }
        };

        match columns.to_record(&row, config) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} rows without usable coordinates", dropped);
    }

    records
}

/// Header positions of the known columns
#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    time: Option<usize>,
    latitude: Option<usize>,
    lat: Option<usize>,
    longitude: Option<usize>,
    lon: Option<usize>,
    depth: Option<usize>,
    mag: Option<usize>,
    magnitude: Option<usize>,
    place: Option<usize>,
    location: Option<usize>,
    /// Every other column, passed through untouched
    extra: Vec<(usize, String)>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Self {
        let mut map = ColumnMap::default();

        for (idx, name) in headers.iter().enumerate() {
            let slot = match name {
                "id" => &mut map.id,
                "time" => &mut map.time,
                "latitude" => &mut map.latitude,
                "lat" => &mut map.lat,
                "longitude" => &mut map.longitude,
                "lon" => &mut map.lon,
                "depth" => &mut map.depth,
                "mag" => &mut map.mag,
                "magnitude" => &mut map.magnitude,
                "place" => &mut map.place,
                "location" => &mut map.location,
                _ => {
                    map.extra.push((idx, name.to_string()));
                    continue;
                }
            };
            // First occurrence of a duplicated header wins
            slot.get_or_insert(idx);
        }

        map
    }

    fn to_record(&self, row: &StringRecord, config: &NormalizerConfig) -> Option<Record> {
        let lat_raw = pick(row, self.latitude, self.lat);
        let lon_raw = pick(row, self.longitude, self.lon);
        let latitude = parse_number(lat_raw);
        let longitude = parse_number(lon_raw);

        if config.coordinate_policy == CoordinatePolicy::DropRow
            && (latitude.is_none() || longitude.is_none())
        {
            return None;
        }

        let time = pick(row, self.time, None).unwrap_or_default();
        let id = match pick(row, self.id, None) {
            Some(id) => id.to_string(),
            None => synthesize_id(time, lat_raw.unwrap_or_default(), lon_raw.unwrap_or_default()),
        };

        let place = pick(row, self.place, self.location)
            .map(str::to_string)
            .unwrap_or_else(|| config.placeholder_place.clone());

        let extra = self
            .extra
            .iter()
            .filter_map(|(idx, name)| row.get(*idx).map(|value| (name.clone(), value.to_string())))
            .collect::<BTreeMap<_, _>>();

        Some(Record {
            id,
            time: time.to_string(),
            latitude: latitude.unwrap_or(0.0),
            longitude: longitude.unwrap_or(0.0),
            depth: parse_number(pick(row, self.depth, None)).unwrap_or(0.0),
            magnitude: parse_number(pick(row, self.mag, self.magnitude)).unwrap_or(0.0),
            place,
            extra,
        })
    }
}

/// First non-blank value among the primary and fallback columns
fn pick<'r>(row: &'r StringRecord, primary: Option<usize>, fallback: Option<usize>) -> Option<&'r str> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .filter_map(|idx| row.get(idx))
        .find(|value| !value.is_empty())
}

/// Permissive number parsing. `None` for blank, garbage and non-finite input.
fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Id for rows without one, built from the raw upstream text so that the same
/// row always yields the same id
fn synthesize_id(time: &str, latitude: &str, longitude: &str) -> String {
    format!("{}-{}-{}", time, latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "time,latitude,longitude,depth,mag,place";

    #[test]
    fn test_single_row_end_to_end() {
        let raw = format!("{}\n2024-01-01T00:00:00Z,34.1,-118.2,10.5,4.3,Los Angeles\n", HEADER);
        let records = normalize(&raw);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.place, "Los Angeles");
        assert_eq!(r.magnitude, 4.3);
        assert_eq!(r.depth, 10.5);
        assert_eq!(r.latitude, 34.1);
        assert_eq!(r.longitude, -118.2);
        assert_eq!(r.time, "2024-01-01T00:00:00Z");
        assert_eq!(r.id, "2024-01-01T00:00:00Z-34.1--118.2");
    }

    #[test]
    fn test_order_and_length_preserved() {
        let raw = format!(
            "{}\nt1,1,1,1,1,A\nt2,2,2,2,2,B\nt3,3,3,3,3,C\n",
            HEADER
        );
        let places: Vec<_> = normalize(&raw).into_iter().map(|r| r.place).collect();
        assert_eq!(places, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_id_synthesis_is_deterministic() {
        let raw = format!("{}\nt1,12.5,-3,1,1,A\n", HEADER);
        let first = normalize(&raw);
        let second = normalize(&raw);
        assert_eq!(first[0].id, second[0].id);
        assert!(!first[0].id.is_empty());
    }

    #[test]
    fn test_upstream_id_is_kept() {
        let raw = "id,time,latitude,longitude,mag,place\nak0245abc,t1,61.2,-150.1,2.1,Alaska\n";
        assert_eq!(normalize(raw)[0].id, "ak0245abc");
    }

    #[test]
    fn test_blank_id_falls_back_to_synthesis() {
        let raw = "id,time,latitude,longitude\n,t1,1,2\n";
        assert_eq!(normalize(raw)[0].id, "t1-1-2");
    }

    #[test]
    fn test_id_is_never_empty() {
        let raw = "depth\n5\n";
        let records = normalize(raw);
        assert_eq!(records.len(), 1);
        assert!(!records[0].id.is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let raw = format!("{}\nt1,abc,12.5, 7 ,,Somewhere\n", HEADER);
        let r = &normalize(&raw)[0];
        assert_eq!(r.latitude, 0.0);
        assert_eq!(r.longitude, 12.5);
        assert_eq!(r.depth, 7.0);
        assert_eq!(r.magnitude, 0.0);
    }

    #[test]
    fn test_non_finite_values_become_zero() {
        let raw = format!("{}\nt1,NaN,inf,-infinity,1e400,X\n", HEADER);
        let r = &normalize(&raw)[0];
        assert_eq!(r.latitude, 0.0);
        assert_eq!(r.longitude, 0.0);
        assert_eq!(r.depth, 0.0);
        assert_eq!(r.magnitude, 0.0);
    }

    #[test]
    fn test_alternate_column_names() {
        let raw = "time,lat,lon,depth,magnitude,location\nt1,1.5,2.5,3,4.5,Offshore\n";
        let r = &normalize(raw)[0];
        assert_eq!(r.latitude, 1.5);
        assert_eq!(r.longitude, 2.5);
        assert_eq!(r.magnitude, 4.5);
        assert_eq!(r.place, "Offshore");
        assert_eq!(r.id, "t1-1.5-2.5");
    }

    #[test]
    fn test_primary_column_wins_over_fallback() {
        let raw = "mag,magnitude,place,location\n2.0,9.9,Primary,Fallback\n,3.3,,Fallback\n";
        let records = normalize(raw);
        assert_eq!(records[0].magnitude, 2.0);
        assert_eq!(records[0].place, "Primary");
        assert_eq!(records[1].magnitude, 3.3);
        assert_eq!(records[1].place, "Fallback");
    }

    #[test]
    fn test_missing_place_gets_placeholder() {
        let raw = "time,latitude,longitude\nt1,1,2\n";
        assert_eq!(normalize(raw)[0].place, "Unknown");

        let config = NormalizerConfig {
            placeholder_place: "(no place)".to_string(),
            ..NormalizerConfig::default()
        };
        assert_eq!(normalize_with(raw, &config)[0].place, "(no place)");
    }

    #[test]
    fn test_coordinate_policies() {
        let raw = format!("{}\nt1,1,2,3,4,Good\nt2,,2,3,4,NoLat\nt3,1,east,3,4,BadLon\n", HEADER);

        let kept = normalize(&raw);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1].latitude, 0.0);

        let config = NormalizerConfig {
            coordinate_policy: CoordinatePolicy::DropRow,
            ..NormalizerConfig::default()
        };
        let dropped = normalize_with(&raw, &config);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].place, "Good");
    }

    #[test]
    fn test_short_and_long_rows_are_tolerated() {
        let raw = format!("{}\nt1,1\nt2,1,2,3,4,P,surplus\n", HEADER);
        let records = normalize(&raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].longitude, 0.0);
        assert_eq!(records[0].place, "Unknown");
        assert_eq!(records[1].place, "P");
    }

    #[test]
    fn test_unknown_columns_pass_through() {
        let raw = "time,latitude,longitude,mag,magType,net,place\nt1,1,2,3.1,ml,ak,\"5 km S of Town, AK\"\n";
        let r = &normalize(raw)[0];
        assert_eq!(r.extra.get("magType").map(String::as_str), Some("ml"));
        assert_eq!(r.extra.get("net").map(String::as_str), Some("ak"));
        assert_eq!(r.place, "5 km S of Town, AK");
        assert!(!r.extra.contains_key("place"));
    }

    #[test]
    fn test_empty_and_header_only_input() {
        assert!(normalize("").is_empty());
        assert!(normalize(HEADER).is_empty());
        assert!(normalize(&format!("{}\n\n", HEADER)).is_empty());
    }
}
