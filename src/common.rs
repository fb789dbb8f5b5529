// Copyright 2025 the osvt authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reusable serialization bits.

use serde::de::{DeserializeOwned, Error as DeserError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a value where `null` or an empty string is replaced by the `Default` value.
///
/// Some Block Storage API fields (most notably descriptions) come back as `null` or `""`
/// depending on the server version.
pub fn empty_as_default<'de, D, T>(des: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(des)?;
    match value {
        Value::Null => Ok(T::default()),
        Value::String(ref s) if s.is_empty() => Ok(T::default()),
        _ => serde_json::from_value(value).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::empty_as_default;

    #[derive(Debug, Deserialize)]
    struct EmptyAsDefault {
        #[serde(deserialize_with = "empty_as_default")]
        string: String,
        #[serde(deserialize_with = "empty_as_default")]
        number: u8,
    }

    #[test]
    fn test_empty_as_default_with_values() {
        let s = r#"{"string": "value", "number": 42}"#;
        let r: EmptyAsDefault = serde_json::from_str(s).unwrap();
        assert_eq!(r.string, "value");
        assert_eq!(r.number, 42);
    }

    #[test]
    fn test_empty_as_default_with_empty_string() {
        let s = r#"{"string": "", "number": ""}"#;
        let r: EmptyAsDefault = serde_json::from_str(s).unwrap();
        assert_eq!(r.string, "");
        assert_eq!(r.number, 0);
    }

    #[test]
    fn test_empty_as_default_with_null() {
        let s = r#"{"string": null, "number": null}"#;
        let r: EmptyAsDefault = serde_json::from_str(s).unwrap();
        assert_eq!(r.string, "");
        assert_eq!(r.number, 0);
    }
}
