use std::collections::{HashMap, HashSet};

use super::ExecutionDefinition;
use crate::dimension::{check_measure_group, check_totals, MEASURE_GROUP_IDENTIFIER};
use crate::error::{ModelError, Result};
use crate::filter::filter_local_references;
use crate::measure::{measure_dependencies, Measure};

/// Checks that every cross reference inside the definition resolves.
///
/// Local identifiers must be unique across attributes, measures and auxiliary measures; derived
/// measures must reference existing measures without cycles; dimensions, totals, filters and sorts
/// may only reference items of the definition.
pub fn validate_execution_definition(def: &ExecutionDefinition) -> Result<()> {
    let mut seen = HashSet::new();
    let mut attribute_ids = HashSet::new();
    for attribute in &def.attributes {
        let id = attribute.local_identifier().ok_or_else(|| {
            ModelError::invalid(format!("attribute {} has no local identifier", attribute.display_form))
        })?;
        if !seen.insert(id) {
            return Err(duplicate(id));
        }
        attribute_ids.insert(id);
    }

    let mut measures_by_id: HashMap<&str, &Measure> = HashMap::new();
    for measure in def.measures.iter().chain(def.aux_measures.iter()) {
        let id = measure
            .local_identifier()
            .ok_or_else(|| ModelError::invalid("measure has no local identifier"))?;
        if !seen.insert(id) {
            return Err(duplicate(id));
        }
        measures_by_id.insert(id, measure);
    }

    check_dependencies(&measures_by_id)?;

    check_measure_group(&def.dimensions)?;
    for (idx, dimension) in def.dimensions.iter().enumerate() {
        for item in &dimension.item_identifiers {
            if item != MEASURE_GROUP_IDENTIFIER && !attribute_ids.contains(item.as_str()) {
                return Err(ModelError::invalid(format!(
                    "dimension {idx} references unknown attribute '{item}'"
                )));
            }
        }
        check_totals(idx, dimension)?;
        for total in &dimension.totals {
            if !measures_by_id.contains_key(total.measure_identifier.as_str()) {
                return Err(ModelError::invalid(format!(
                    "total references unknown measure '{}'",
                    total.measure_identifier
                )));
            }
        }
    }

    for filter in &def.filters {
        let (measures, attributes) = filter_local_references(filter);
        for id in measures {
            if !measures_by_id.contains_key(id) {
                return Err(ModelError::invalid(format!(
                    "filter references unknown measure '{id}'"
                )));
            }
        }
        for id in attributes {
            if !attribute_ids.contains(id) {
                return Err(ModelError::invalid(format!(
                    "filter references unknown attribute '{id}'"
                )));
            }
        }
    }

    for sort in &def.sort_by {
        for id in sort.attribute_identifiers() {
            if !attribute_ids.contains(id) {
                return Err(ModelError::invalid(format!(
                    "sort references unknown attribute '{id}'"
                )));
            }
        }
        for id in sort.measure_identifiers() {
            if !measures_by_id.contains_key(id) {
                return Err(ModelError::invalid(format!(
                    "sort references unknown measure '{id}'"
                )));
            }
        }
    }

    Ok(())
}

fn duplicate(id: &str) -> ModelError {
    ModelError::invalid(format!("duplicate local identifier '{id}'"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn check_dependencies(measures: &HashMap<&str, &Measure>) -> Result<()> {
    let mut state: HashMap<&str, Visit> = HashMap::new();
    // Sorted for a deterministic error message.
    let mut ids: Vec<&str> = measures.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        visit(id, measures, &mut state)?;
    }
    Ok(())
}

fn visit<'a>(
    id: &'a str,
    measures: &HashMap<&'a str, &'a Measure>,
    state: &mut HashMap<&'a str, Visit>,
) -> Result<()> {
    match state.get(id) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            return Err(ModelError::invalid(format!(
                "measure '{id}' depends on itself"
            )))
        }
        None => {}
    }

    let measure: &'a Measure = measures
        .get(id)
        .copied()
        .ok_or_else(|| ModelError::invalid(format!("unknown measure '{id}'")))?;
    state.insert(id, Visit::InProgress);
    for dependency in measure_dependencies(measure) {
        if !measures.contains_key(dependency) {
            return Err(ModelError::invalid(format!(
                "measure '{id}' references unknown measure '{dependency}'"
            )));
        }
        visit(dependency, measures, state)?;
    }
    state.insert(id, Visit::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{new_arithmetic_measure, new_measure, ArithmeticMeasureOperator};

    fn def_with_measures(measures: Vec<Measure>) -> ExecutionDefinition {
        ExecutionDefinition {
            measures,
            ..ExecutionDefinition::default()
        }
    }

    #[test]
    fn cyclic_arithmetic_is_rejected() {
        let m1 = new_arithmetic_measure(&["m2".into()], ArithmeticMeasureOperator::Sum)
            .unwrap()
            .local_id("m1")
            .build();
        let m2 = new_arithmetic_measure(&["m1".into()], ArithmeticMeasureOperator::Sum)
            .unwrap()
            .local_id("m2")
            .build();
        let err = validate_execution_definition(&def_with_measures(vec![m1, m2])).unwrap_err();
        assert!(err.to_string().contains("depends on itself"));
    }

    #[test]
    fn missing_operand_is_rejected() {
        let m1 = new_arithmetic_measure(&["m9".into()], ArithmeticMeasureOperator::Sum)
            .unwrap()
            .local_id("m1")
            .build();
        let err = validate_execution_definition(&def_with_measures(vec![m1])).unwrap_err();
        assert!(err.to_string().contains("unknown measure 'm9'"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let def = def_with_measures(vec![
            new_measure("m.a").local_id("m1").build(),
            new_measure("m.b").local_id("m1").build(),
        ]);
        assert!(validate_execution_definition(&def).is_err());
    }
}
