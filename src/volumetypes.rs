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

//! Listing of Block Storage volume types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::empty_as_default;
use super::services::BLOCK_STORAGE;
use super::{Error, Session};

/// A named storage-tier definition of the Block Storage service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VolumeType {
    /// Unique identifier.
    pub id: String,
    /// Volume type name.
    pub name: String,
    /// Human-readable description (may be empty).
    #[serde(default, deserialize_with = "empty_as_default")]
    pub description: String,
    /// Whether the volume type is visible to all projects.
    #[serde(default)]
    pub is_public: bool,
    /// Free-form key/value metadata consumed by the storage scheduler.
    #[serde(default)]
    pub extra_specs: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct VolumeTypesRoot {
    volume_types: Vec<VolumeType>,
}

/// List all volume types.
///
/// A single delegated call; the server returns the complete listing in its own order.
pub async fn list(session: &Session) -> Result<Vec<VolumeType>, Error> {
    let root: VolumeTypesRoot = session.get_json(BLOCK_STORAGE, &["types"]).await?;
    Ok(root.volume_types)
}

/// Render volume types as a human-readable listing.
///
/// Records are numbered from 1 in the order received.
pub fn render_listing(types: &[VolumeType]) -> String {
    let mut output = format!("Found {} volume type(s):\n\n", types.len());
    for (index, vt) in types.iter().enumerate() {
        output.push_str(&format!("Volume Type #{}:\n", index + 1));
        output.push_str(&format!("  ID: {}\n", vt.id));
        output.push_str(&format!("  Name: {}\n", vt.name));
        output.push_str(&format!("  Description: {}\n", vt.description));
        output.push_str(&format!("  Is Public: {}\n", vt.is_public));
        output.push_str(&format!("  Extra Specs: {:?}\n", vt.extra_specs));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod test {
    use maplit::hashmap;

    use super::{render_listing, VolumeType, VolumeTypesRoot};

    const TYPES_RESPONSE: &str = r#"{
        "volume_types": [
            {
                "id": "6685584b-1eac-4da6-b5c3-555430cf68ff",
                "name": "SSD",
                "description": null,
                "is_public": true,
                "extra_specs": {"volume_backend_name": "lvmdriver-1"},
                "qos_specs_id": null
            },
            {
                "id": "8eb69a46-df97-4e41-9586-9a40a7533803",
                "name": "SATA",
                "description": "cheap and spacious",
                "is_public": false,
                "extra_specs": {}
            }
        ]
    }"#;

    fn sample(id: &str, name: &str) -> VolumeType {
        VolumeType {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            is_public: true,
            extra_specs: hashmap! {},
        }
    }

    #[test]
    fn test_parse_listing() {
        let root: VolumeTypesRoot = serde_json::from_str(TYPES_RESPONSE).unwrap();
        assert_eq!(root.volume_types.len(), 2);

        let ssd = &root.volume_types[0];
        assert_eq!(ssd.name, "SSD");
        assert_eq!(ssd.description, "");
        assert!(ssd.is_public);
        assert_eq!(
            ssd.extra_specs,
            hashmap! {"volume_backend_name".to_string() => "lvmdriver-1".to_string()}
        );

        let sata = &root.volume_types[1];
        assert_eq!(sata.name, "SATA");
        assert_eq!(sata.description, "cheap and spacious");
        assert!(!sata.is_public);
        assert!(sata.extra_specs.is_empty());
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_listing(&[]), "Found 0 volume type(s):\n\n");
    }

    #[test]
    fn test_render_order_and_numbering() {
        let types = vec![sample("id-one", "SSD"), sample("id-two", "SATA")];
        let rendered = render_listing(&types);
        assert!(rendered.starts_with("Found 2 volume type(s):\n\n"));
        let first = rendered.find("Volume Type #1:\n  ID: id-one\n  Name: SSD").unwrap();
        let second = rendered
            .find("Volume Type #2:\n  ID: id-two\n  Name: SATA")
            .unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_fields() {
        let mut vt = sample("id-one", "SSD");
        vt.description = "fast".to_string();
        vt.extra_specs = hashmap! {"volume_backend_name".to_string() => "lvmdriver-1".to_string()};
        let rendered = render_listing(&[vt]);
        assert!(rendered.contains("  Description: fast\n"));
        assert!(rendered.contains("  Is Public: true\n"));
        assert!(rendered.contains(r#"  Extra Specs: {"volume_backend_name": "lvmdriver-1"}"#));
    }

    #[test]
    fn test_json_output_preserves_order() {
        let types = vec![sample("id-one", "SSD"), sample("id-two", "SATA")];
        let rendered = serde_json::to_string_pretty(&types).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|vt| vt["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["id-one", "id-two"]);
    }

    #[test]
    fn test_json_output_empty() {
        let types: Vec<VolumeType> = Vec::new();
        assert_eq!(serde_json::to_string_pretty(&types).unwrap(), "[]");
    }
}
