use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kind::MarkerType;

/// Icon used when even the building entry is missing from a table.
pub const FALLBACK_ICON: &str = "/marker.svg";

/// Marker-type to icon-asset lookup.
///
/// Types without an entry resolve to the building icon, so a partial table
/// (e.g. from an older config file) never fails a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconTable {
    icons: BTreeMap<MarkerType, String>,
}

impl Default for IconTable {
    fn default() -> Self {
        let icons = MarkerType::ALL
            .into_iter()
            .map(|kind| (kind, format!("/markers/{}.svg", kind.as_str())))
            .collect();
        Self { icons }
    }
}

impl IconTable {
    pub fn empty() -> Self {
        Self {
            icons: BTreeMap::new(),
        }
    }

    pub fn icon_for(&self, kind: MarkerType) -> &str {
        self.icons
            .get(&kind)
            .or_else(|| self.icons.get(&MarkerType::Building))
            .map(String::as_str)
            .unwrap_or(FALLBACK_ICON)
    }
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_ICON, IconTable};
    use crate::kind::MarkerType;

    #[test]
    fn default_table_has_distinct_icons() {
        let table = IconTable::default();
        let mut icons: Vec<_> = MarkerType::ALL.iter().map(|k| table.icon_for(*k)).collect();
        icons.sort();
        icons.dedup();
        assert_eq!(icons.len(), 4);
        assert_eq!(table.icon_for(MarkerType::Road), "/markers/road.svg");
    }

    #[test]
    fn missing_entry_falls_back_to_building() {
        let table: IconTable = serde_json::from_str(r#"{ "building": "/b.svg" }"#).expect("parse");
        assert_eq!(table.icon_for(MarkerType::Utility), "/b.svg");
        assert_eq!(IconTable::empty().icon_for(MarkerType::Road), FALLBACK_ICON);
    }

    #[test]
    fn partial_table_deserializes() {
        let table: IconTable =
            serde_json::from_str(r#"{ "building": "/site/b.png", "road": "/site/r.png" }"#)
                .expect("parse");
        assert_eq!(table.icon_for(MarkerType::Road), "/site/r.png");
        assert_eq!(table.icon_for(MarkerType::Measurement), "/site/b.png");
    }
}
