//! Result dimensions and totals placement.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::totals::Total;

/// Placeholder item standing for all measures of the execution.
pub const MEASURE_GROUP_IDENTIFIER: &str = "measureGroup";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub item_identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<Total>,
}

impl Dimension {
    pub fn contains(&self, local_id: &str) -> bool {
        self.item_identifiers.iter().any(|item| item == local_id)
    }

    pub fn has_measure_group(&self) -> bool {
        self.contains(MEASURE_GROUP_IDENTIFIER)
    }
}

pub fn new_dimension<S: Into<String>>(
    item_identifiers: impl IntoIterator<Item = S>,
    totals: Vec<Total>,
) -> Dimension {
    Dimension {
        item_identifiers: item_identifiers.into_iter().map(Into::into).collect(),
        totals,
    }
}

pub fn new_two_dimensional<S: Into<String>, T: Into<String>>(
    first: impl IntoIterator<Item = S>,
    second: impl IntoIterator<Item = T>,
) -> Result<Vec<Dimension>> {
    let dimensions = vec![
        new_dimension(first, Vec::new()),
        new_dimension(second, Vec::new()),
    ];
    check_measure_group(&dimensions)?;
    Ok(dimensions)
}

/// Builds one dimension per attribute group, attaching the matching totals group.
///
/// Items are kept exactly as given; an identifier listed in both groups stays in both.
pub fn assemble(attribute_groups: &[Vec<String>], totals_groups: &[Vec<Total>]) -> Result<Vec<Dimension>> {
    if attribute_groups.is_empty() || attribute_groups.len() > 2 {
        return Err(ModelError::invalid(format!(
            "expected one or two dimension groups, got {}",
            attribute_groups.len()
        )));
    }
    if totals_groups.len() > attribute_groups.len() {
        return Err(ModelError::invalid(format!(
            "{} totals groups for {} dimensions",
            totals_groups.len(),
            attribute_groups.len()
        )));
    }

    let dimensions = attribute_groups
        .iter()
        .enumerate()
        .map(|(idx, items)| {
            new_dimension(
                items.iter().cloned(),
                totals_groups.get(idx).cloned().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();

    check_measure_group(&dimensions)?;
    for (idx, dimension) in dimensions.iter().enumerate() {
        check_totals(idx, dimension)?;
    }
    Ok(dimensions)
}

pub(crate) fn check_measure_group(dimensions: &[Dimension]) -> Result<()> {
    let count = dimensions.iter().filter(|d| d.has_measure_group()).count();
    if count > 1 {
        return Err(ModelError::invalid("measure group placed in both dimensions"));
    }
    Ok(())
}

pub(crate) fn check_totals(idx: usize, dimension: &Dimension) -> Result<()> {
    for total in &dimension.totals {
        if !dimension.contains(&total.attribute_identifier) {
            return Err(ModelError::invalid(format!(
                "total references attribute '{}' missing from dimension {idx}",
                total.attribute_identifier
            )));
        }
    }
    Ok(())
}

/// Replaces the totals of a dimension. Empty `totals` clears them.
pub fn dimension_set_totals(dimension: &Dimension, totals: Vec<Total>) -> Dimension {
    Dimension {
        item_identifiers: dimension.item_identifiers.clone(),
        totals,
    }
}

/// First `(dimension index, item index)` holding the identifier.
pub fn dimensions_find_item(dimensions: &[Dimension], local_id: &str) -> Option<(usize, usize)> {
    dimensions.iter().enumerate().find_map(|(dim_idx, dimension)| {
        dimension
            .item_identifiers
            .iter()
            .position(|item| item == local_id)
            .map(|item_idx| (dim_idx, item_idx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totals::{new_total, TotalType};

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assemble_rejects_three_groups() {
        let err = assemble(&[ids(&["a1"]), ids(&["a2"]), ids(&["a3"])], &[]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }

    #[test]
    fn assemble_rejects_totals_outside_their_dimension() {
        let err = assemble(
            &[ids(&["a1"]), ids(&["a2", MEASURE_GROUP_IDENTIFIER])],
            &[vec![new_total(TotalType::Sum, "m1", "a2")]],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_items_are_kept_and_lookup_returns_first() {
        let dims = assemble(&[ids(&["a1", "a2"]), ids(&["a2", MEASURE_GROUP_IDENTIFIER])], &[])
            .unwrap();
        assert_eq!(dims[1].item_identifiers, ids(&["a2", MEASURE_GROUP_IDENTIFIER]));
        assert_eq!(dimensions_find_item(&dims, "a2"), Some((0, 1)));
        assert_eq!(dimensions_find_item(&dims, MEASURE_GROUP_IDENTIFIER), Some((1, 1)));
        assert_eq!(dimensions_find_item(&dims, "missing"), None);
    }
}
