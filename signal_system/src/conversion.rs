use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::types::PostgresValue;

impl From<String> for PostgresValue {
    fn from(val: String) -> Self {
        PostgresValue::Text(val)
    }
}

impl From<&str> for PostgresValue {
    fn from(val: &str) -> Self {
        PostgresValue::Text(val.to_string())
    }
}

impl From<i32> for PostgresValue {
    fn from(val: i32) -> Self {
        PostgresValue::Integer(val)
    }
}

impl From<i64> for PostgresValue {
    fn from(val: i64) -> Self {
        PostgresValue::BigInt(val)
    }
}

impl From<f64> for PostgresValue {
    fn from(val: f64) -> Self {
        PostgresValue::Double(val)
    }
}

impl From<bool> for PostgresValue {
    fn from(val: bool) -> Self {
        PostgresValue::Boolean(val)
    }
}

impl From<Uuid> for PostgresValue {
    fn from(val: Uuid) -> Self {
        PostgresValue::Uuid(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for PostgresValue {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        PostgresValue::Timestamp(val)
    }
}

impl From<serde_json::Value> for PostgresValue {
    fn from(val: serde_json::Value) -> Self {
        PostgresValue::Json(val)
    }
}

impl<T> From<Option<T>> for PostgresValue
where
    T: Into<PostgresValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => PostgresValue::Null,
        }
    }
}

/// Convert serializable data to PostgresValue::Record
pub fn serialize_to_postgres_record<T: Serialize>(data: &T) -> PostgresValue {
    PostgresValue::Record(serialize_to_postgres_payload(data))
}

/// Convert a serializable value into a field-name -> PostgresValue payload
///
/// Serializes through serde_json and maps each top-level object field onto the
/// closest PostgresValue variant; non-object values yield an empty payload.
pub fn serialize_to_postgres_payload<T: Serialize>(data: &T) -> HashMap<String, PostgresValue> {
    let mut payload = HashMap::new();

    if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(data) {
        for (key, value) in map {
            let postgres_value = match value {
                serde_json::Value::String(s) => PostgresValue::Text(s),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                            PostgresValue::Integer(i as i32)
                        } else {
                            PostgresValue::BigInt(i)
                        }
                    } else if let Some(f) = n.as_f64() {
                        PostgresValue::Double(f)
                    } else {
                        PostgresValue::Json(serde_json::Value::Number(n))
                    }
                }
                serde_json::Value::Bool(b) => PostgresValue::Boolean(b),
                serde_json::Value::Null => PostgresValue::Null,
                other => PostgresValue::Json(other),
            };
            payload.insert(key, postgres_value);
        }
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        price: f64,
        stock: i32,
        archived: bool,
        note: Option<String>,
    }

    #[test]
    fn test_payload_maps_scalar_fields() {
        let payload = serialize_to_postgres_payload(&Sample {
            name: "Shoe".to_string(),
            price: 10.5,
            stock: 3,
            archived: false,
            note: None,
        });

        assert_eq!(
            payload.get("name"),
            Some(&PostgresValue::Text("Shoe".to_string()))
        );
        assert_eq!(payload.get("price"), Some(&PostgresValue::Double(10.5)));
        assert_eq!(payload.get("stock"), Some(&PostgresValue::Integer(3)));
        assert_eq!(payload.get("archived"), Some(&PostgresValue::Boolean(false)));
        assert_eq!(payload.get("note"), Some(&PostgresValue::Null));
    }

    #[test]
    fn test_non_object_serializes_to_empty_payload() {
        let payload = serialize_to_postgres_payload(&42_i32);
        assert!(payload.is_empty());
    }
}
