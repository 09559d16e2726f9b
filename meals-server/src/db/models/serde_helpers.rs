//! Record-id (de)serialization helpers
//!
//! 记录 id 在两个世界间往返:API JSON 用 "table:key" 字符串,
//! 嵌入式 SurrealDB 返回原生 RecordId 结构。模型统一存
//! `Option<RecordId>`,序列化输出字符串形式。

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use surrealdb::RecordId;

/// `Option<RecordId>`, serialized as a "table:key" string.
///
/// Deserialization accepts both the string form and the engine's native
/// RecordId representation.
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Flexible>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

struct Flexible(RecordId);

impl<'de> Deserialize<'de> for Flexible {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = Flexible;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a 'table:key' string or a native record id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(Flexible)
                    .map_err(|_| de::Error::custom(format!("invalid record id: {value}")))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map)).map(Flexible)
            }
        }

        d.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use surrealdb::RecordId;

    #[derive(Serialize, Deserialize)]
    struct Doc {
        #[serde(default, with = "super::option_record_id")]
        id: Option<RecordId>,
    }

    #[test]
    fn string_form_round_trips() {
        let doc: Doc = serde_json::from_str(r#"{"id": "food:abc"}"#).unwrap();
        assert_eq!(doc.id.as_ref().unwrap().to_string(), "food:abc");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"id":"food:abc"}"#);
    }

    #[test]
    fn missing_id_is_none() {
        let doc: Doc = serde_json::from_str("{}").unwrap();
        assert!(doc.id.is_none());
    }
}
