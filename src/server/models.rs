//! Tool parameter models

use crate::tools::GroupRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Group given either as its number or as its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum GroupId {
    #[schemars(description = "Group number")]
    Number(u32),
    #[schemars(description = "Group number as text, or the exact group name")]
    Name(String),
}

impl From<GroupId> for GroupRef {
    fn from(id: GroupId) -> Self {
        match id {
            GroupId::Number(number) => GroupRef::Id(number),
            GroupId::Name(name) => GroupRef::from(name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_id_accepts_numbers_and_names() {
        let number: GroupId = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(GroupRef::from(number), GroupRef::Id(5));

        let numeric_text: GroupId = serde_json::from_value(json!("5")).unwrap();
        assert_eq!(GroupRef::from(numeric_text), GroupRef::Id(5));

        let name: GroupId = serde_json::from_value(json!("Kitchen")).unwrap();
        assert_eq!(GroupRef::from(name), GroupRef::Name("Kitchen".to_string()));
    }

    #[test]
    fn test_group_id_schema_allows_both_forms() {
        let schema = serde_json::to_value(schemars::schema_for!(GroupId)).unwrap();
        let variants = schema["anyOf"].as_array().unwrap();
        let types: Vec<_> = variants.iter().map(|v| v["type"].clone()).collect();
        assert_eq!(types, vec![json!("integer"), json!("string")]);
    }
}
