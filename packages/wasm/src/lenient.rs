//! Forgiving field deserializers for host-supplied JSON.
//!
//! Hosts hand over loosely typed objects. A recognized field holding a value of
//! the wrong type is treated as absent instead of rejecting the whole payload.

use serde::de::{Deserialize, Deserializer, IgnoredAny};

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Maybe<T> {
    Value(T),
    Other(IgnoredAny),
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

/// `Some(value)` when the field has the expected type, `None` otherwise.
pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Maybe::<T>::deserialize(deserializer)? {
        Maybe::Value(value) => Some(value),
        Maybe::Other(_) => None,
    })
}

/// Like [`option`] but falls back to `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(option(deserializer)?.unwrap_or_default())
}

/// A finite number, or `None`.
pub fn finite<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(option::<D, f64>(deserializer)?.filter(|v| v.is_finite()))
}

/// An identifier given as a string or a number. Numbers are stringified.
pub fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(option::<D, RawId>(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    }))
}

/// A string that is absent when empty or whitespace.
pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(option::<D, String>(deserializer)?.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize, Default)]
    struct Fields {
        #[serde(default, deserialize_with = "super::finite")]
        size: Option<f64>,
        #[serde(default, deserialize_with = "super::id")]
        id: Option<String>,
        #[serde(default, deserialize_with = "super::non_empty")]
        url: Option<String>,
        #[serde(default, deserialize_with = "super::or_default")]
        flags: Vec<u8>,
    }

    #[test]
    fn test_wrong_types_become_absent() {
        let parsed: Fields =
            serde_json::from_str(r#"{"size":"big","id":true,"url":"  ","flags":"x"}"#).unwrap();
        assert_eq!(parsed.size, None);
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.url, None);
        assert!(parsed.flags.is_empty());
    }

    #[test]
    fn test_numeric_ids_are_stringified() {
        let parsed: Fields = serde_json::from_str(r#"{"id":7,"size":3.5}"#).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("7"));
        assert_eq!(parsed.size, Some(3.5));
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: Fields = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.size, None);
        assert_eq!(parsed.id, None);
    }
}
