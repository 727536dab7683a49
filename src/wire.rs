//! Lenient field decoders shared by the auth and diary wire types

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl IdRepr {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            IdRepr::Number(id) => Ok(id),
            IdRepr::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id {:?}", text))),
        }
    }
}

/// Accepts `42` as well as `"42"`.
pub(crate) fn id_from_str_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer)?.into_id()
}

/// Like [`id_from_str_or_number`], treating `null` and `""` as absent.
pub(crate) fn opt_id_from_str_or_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(repr) => repr.into_id().map(Some),
    }
}
