use mongodb::bson::{oid::ObjectId, Bson};
use serde::{de, Deserialize, Deserializer};

/// Reads an id stored either as an ObjectId or as a plain string. ObjectIds
/// come back as their hex form.
pub fn string_or_object_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s),
        Bson::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("expected an id, found {other}"))),
    }
}

/// Query value matching `id` in either stored form.
pub fn id_filter(id: &str) -> Bson {
    match ObjectId::parse_str(id) {
        Ok(oid) => mongodb::bson::bson!({ "$in": [id, oid] }),
        Err(_) => Bson::String(id.to_string()),
    }
}
