//! Station name/ID lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::StationId;
use crate::tdx::{StationDto, TdxClient, TdxError};

/// A station the table knows about.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub name_zh: String,
    pub name_en: String,
}

impl Station {
    /// Preferred display name.
    pub fn display_name(&self) -> &str {
        if self.name_zh.is_empty() {
            &self.name_en
        } else {
            &self.name_zh
        }
    }
}

/// Thread-safe station lookup with support for background refresh.
#[derive(Clone)]
pub struct StationTable {
    inner: Arc<RwLock<HashMap<StationId, Station>>>,
    client: TdxClient,
}

impl StationTable {
    /// Create a new table by fetching the station list from TDX.
    ///
    /// Fails if the API is unreachable; the service cannot resolve
    /// request parameters without it.
    pub async fn fetch(client: TdxClient) -> Result<Self, TdxError> {
        let stations = client.fetch_stations().await?;
        let map = build_map(stations);

        Ok(Self {
            inner: Arc::new(RwLock::new(map)),
            client,
        })
    }

    /// Resolve a request parameter to a station.
    ///
    /// Accepts a station ID, a Chinese name (台/臺 interchangeable), or a
    /// romanised name (case-insensitive).
    pub async fn resolve(&self, query: &str) -> Option<Station> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let guard = self.inner.read().await;

        if let Ok(id) = StationId::parse(query) {
            if let Some(station) = guard.get(&id) {
                return Some(station.clone());
            }
        }

        let zh_query = normalize_zh(query);
        let en_query = query.to_lowercase();

        guard
            .values()
            .find(|s| {
                normalize_zh(&s.name_zh) == zh_query || s.name_en.to_lowercase() == en_query
            })
            .cloned()
    }

    /// Substring search over names and IDs, for the lookup endpoint.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Station> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let zh_query = normalize_zh(query);
        let en_query = query.to_lowercase();

        let guard = self.inner.read().await;
        let mut matches: Vec<Station> = guard
            .values()
            .filter(|s| {
                s.id.as_str().starts_with(query)
                    || normalize_zh(&s.name_zh).contains(&zh_query)
                    || s.name_en.to_lowercase().contains(&en_query)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        matches.truncate(limit);
        matches
    }

    /// Number of stations in the table.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Refresh from TDX. On failure the existing table is preserved and
    /// the error returned.
    pub async fn refresh(&self) -> Result<usize, TdxError> {
        let stations = self.client.fetch_stations().await?;
        let map = build_map(stations);
        let count = map.len();

        let mut guard = self.inner.write().await;
        *guard = map;

        Ok(count)
    }
}

/// Build the lookup map, dropping DTOs with malformed IDs.
fn build_map(stations: Vec<StationDto>) -> HashMap<StationId, Station> {
    stations
        .into_iter()
        .filter_map(|dto| {
            let id = StationId::parse(&dto.station_id).ok()?;
            let name = dto.station_name.unwrap_or_default();
            Some((
                id.clone(),
                Station {
                    id,
                    name_zh: name.zh.unwrap_or_default(),
                    name_en: name.en.unwrap_or_default(),
                },
            ))
        })
        .collect()
}

/// Fold the 台/臺 variant so either spelling matches.
fn normalize_zh(s: &str) -> String {
    s.chars().map(|c| if c == '台' { '臺' } else { c }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tdx::NameType;

    fn dto(id: &str, zh: &str, en: &str) -> StationDto {
        StationDto {
            station_id: id.to_string(),
            station_name: Some(NameType {
                zh: Some(zh.to_string()),
                en: Some(en.to_string()),
            }),
        }
    }

    #[test]
    fn build_map_filters_invalid_ids() {
        let map = build_map(vec![
            dto("1000", "臺北", "Taipei"),
            dto("not-an-id", "壞站", "Bad"),
            dto("1100", "桃園", "Taoyuan"),
        ]);

        assert_eq!(map.len(), 2);
        let taipei = map.get(&StationId::parse("1000").unwrap()).unwrap();
        assert_eq!(taipei.name_zh, "臺北");
        assert_eq!(taipei.name_en, "Taipei");
    }

    #[test]
    fn build_map_tolerates_missing_names() {
        let map = build_map(vec![StationDto {
            station_id: "0900".to_string(),
            station_name: None,
        }]);

        let keelung = map.get(&StationId::parse("0900").unwrap()).unwrap();
        assert_eq!(keelung.name_zh, "");
        assert_eq!(keelung.display_name(), "");
    }

    #[test]
    fn zh_normalization_folds_variant() {
        assert_eq!(normalize_zh("台北"), "臺北");
        assert_eq!(normalize_zh("臺北"), "臺北");
        assert_eq!(normalize_zh("Taipei"), "Taipei");
    }

    #[test]
    fn display_name_prefers_chinese() {
        let s = Station {
            id: StationId::parse("1000").unwrap(),
            name_zh: "臺北".to_string(),
            name_en: "Taipei".to_string(),
        };
        assert_eq!(s.display_name(), "臺北");

        let s = Station {
            id: StationId::parse("1000").unwrap(),
            name_zh: String::new(),
            name_en: "Taipei".to_string(),
        };
        assert_eq!(s.display_name(), "Taipei");
    }
}
