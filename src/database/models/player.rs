use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::database::DatabaseError;

/// Player state as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub points: Option<i64>,
    pub challenges: Value,
    pub inventory: Value,
}

/// Raw `playerdata` row; the document columns hold serialized JSON text
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub points: Option<i64>,
    pub challenges: Option<String>,
    pub inventory: Option<String>,
}

impl TryFrom<PlayerRow> for PlayerRecord {
    type Error = DatabaseError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            points: row.points,
            challenges: decode_document("challenges", row.challenges.as_deref())?,
            inventory: decode_document("inventory", row.inventory.as_deref())?,
        })
    }
}

/// Update payload for `PUT /v1/player-data/update/:id`.
///
/// Every field is optional. An absent field is written as SQL `NULL`, while an
/// explicit JSON `null` is stored as the text `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerUpdate {
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub inventory: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub challenges: Option<Value>,
}

impl PlayerUpdate {
    pub fn inventory_text(&self) -> Result<Option<String>, DatabaseError> {
        encode_document("inventory", self.inventory.as_ref())
    }

    pub fn challenges_text(&self) -> Result<Option<String>, DatabaseError> {
        encode_document("challenges", self.challenges.as_ref())
    }
}

// Keeps an explicit `null` distinct from a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn encode_document(column: &'static str, value: Option<&Value>) -> Result<Option<String>, DatabaseError> {
    value
        .map(|v| serde_json::to_string(v).map_err(|source| DatabaseError::Serialization { column, source }))
        .transpose()
}

fn decode_document(column: &'static str, text: Option<&str>) -> Result<Value, DatabaseError> {
    match text {
        None => Ok(Value::Null),
        Some(text) => serde_json::from_str(text).map_err(|source| DatabaseError::InvalidStoredJson { column, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_documents_decode_to_structures() {
        let row = PlayerRow {
            points: Some(120),
            challenges: Some(r#"[{"id":"daily","done":true}]"#.to_string()),
            inventory: Some(r#"{"sword":1}"#.to_string()),
        };

        let record = PlayerRecord::try_from(row).unwrap();
        assert_eq!(record.points, Some(120));
        assert_eq!(record.inventory, json!({ "sword": 1 }));
        assert_eq!(record.challenges, json!([{ "id": "daily", "done": true }]));
    }

    #[test]
    fn null_columns_decode_to_json_null() {
        let row = PlayerRow { points: None, challenges: None, inventory: None };
        let record = PlayerRecord::try_from(row).unwrap();
        assert_eq!(record.inventory, Value::Null);
        assert_eq!(record.challenges, Value::Null);
    }

    #[test]
    fn malformed_stored_json_is_an_error() {
        let row = PlayerRow {
            points: Some(1),
            challenges: Some("[]".to_string()),
            inventory: Some("{sword".to_string()),
        };
        let err = PlayerRecord::try_from(row).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidStoredJson { column: "inventory", .. }));
    }

    #[test]
    fn record_serializes_in_column_order() {
        let record = PlayerRecord {
            points: Some(3),
            challenges: json!({}),
            inventory: json!({ "shield": 2 }),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"points":3,"challenges":{},"inventory":{"shield":2}}"#
        );
    }

    #[test]
    fn update_distinguishes_missing_from_null() {
        let update: PlayerUpdate = serde_json::from_str(r#"{"points": 5, "inventory": null}"#).unwrap();
        assert_eq!(update.points, Some(5));
        assert_eq!(update.inventory, Some(Value::Null));
        assert_eq!(update.challenges, None);

        assert_eq!(update.inventory_text().unwrap(), Some("null".to_string()));
        assert_eq!(update.challenges_text().unwrap(), None);
    }

    #[test]
    fn update_documents_encode_as_compact_json() {
        let update: PlayerUpdate =
            serde_json::from_str(r#"{"inventory": {"sword": 1}, "challenges": ["a", "b"]}"#).unwrap();
        assert_eq!(update.inventory_text().unwrap().as_deref(), Some(r#"{"sword":1}"#));
        assert_eq!(update.challenges_text().unwrap().as_deref(), Some(r#"["a","b"]"#));
    }

    #[test]
    fn empty_body_is_a_valid_update() {
        let update: PlayerUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, PlayerUpdate::default());
    }
}
