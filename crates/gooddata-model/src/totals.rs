use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalType {
    Sum,
    Avg,
    Max,
    Min,
    Nat,
    Med,
}

impl TotalType {
    /// Native totals are rolled up by the backend instead of aggregating the computed values.
    pub fn is_native(self) -> bool {
        self == TotalType::Nat
    }
}

/// Total row or column computed for one measure, placed at the level of one attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Total {
    #[serde(rename = "type")]
    pub total_type: TotalType,
    pub measure_identifier: String,
    pub attribute_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

pub fn new_total(
    total_type: TotalType,
    measure_identifier: impl Into<String>,
    attribute_identifier: impl Into<String>,
) -> Total {
    Total {
        total_type,
        measure_identifier: measure_identifier.into(),
        attribute_identifier: attribute_identifier.into(),
        alias: None,
    }
}

impl Total {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn is_native(&self) -> bool {
        self.total_type.is_native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn total_json_uses_type_key() {
        let total = new_total(TotalType::Nat, "m1", "a1");
        assert!(total.is_native());
        assert_eq!(
            serde_json::to_value(&total).unwrap(),
            json!({"type": "nat", "measureIdentifier": "m1", "attributeIdentifier": "a1"})
        );
    }
}
