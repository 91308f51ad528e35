//! Conversions from configuration records into template [`Value`]s.

use crate::config::{Feature, Site};
use gtmpl_value::Value;
use std::collections::HashMap;

/// Builds a [`Value::Object`] from `(field, value)` pairs.
pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<HashMap<String, Value>>(),
    )
}

/// Shorthand for a [`Value::String`].
pub fn string(s: impl Into<String>) -> Value {
    Value::String(s.into())
}

impl From<&Feature> for Value {
    fn from(f: &Feature) -> Value {
        object(vec![
            ("icon", string(&f.icon)),
            ("title", string(&f.title)),
            ("description", string(&f.description)),
        ])
    }
}

impl From<&Site> for Value {
    fn from(site: &Site) -> Value {
        object(vec![
            ("title", string(&site.title)),
            ("subtitle", string(&site.subtitle)),
            ("brand", string(&site.brand)),
            ("tagline", string(&site.tagline)),
            ("quote", string(&site.quote)),
            ("description", string(&site.description)),
            (
                "features",
                Value::Array(site.features.iter().map(Value::from).collect()),
            ),
            ("copyright", string(&site.copyright)),
            ("language", string(&site.language)),
            ("storage_prefix", string(&site.storage_prefix)),
        ])
    }
}
