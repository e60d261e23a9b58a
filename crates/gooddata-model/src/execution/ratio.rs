//! Filters targeting ratio measures.
//!
//! A measure value or ranking filter on a measure with compute ratio must filter source rows:
//! applied on the result, the numerator would be filtered while the denominator is not. Such
//! filters are redirected to an auxiliary copy of the measure with ratio disabled, evaluated on
//! source data.

use std::collections::{HashMap, HashSet};

use crate::filter::{Filter, MeasureValueFilterBody, RankingFilterBody};
use crate::measure::{measure_disable_compute_ratio, measure_does_compute_ratio, Measure};
use crate::objref::{local_id_ref, ObjRef};

/// Rewritten execution filters plus the auxiliary measures they now reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AfmFilters {
    pub filters: Vec<Filter>,
    pub aux_measures: Vec<Measure>,
}

/// Redirects filters on ratio measures to auxiliary measures and drops negative attribute filters
/// that exclude nothing (unless `keep_empty_attribute_filters`). Inputs are left untouched.
pub fn convert_afm_filters(
    measures: &[Measure],
    filters: &[Filter],
    keep_empty_attribute_filters: bool,
) -> AfmFilters {
    let ratio_measures: HashMap<&str, &Measure> = measures
        .iter()
        .filter(|measure| measure_does_compute_ratio(measure))
        .filter_map(|measure| measure.local_identifier().map(|id| (id, measure)))
        .collect();
    let mut used_ids: HashSet<String> = measures
        .iter()
        .filter_map(|measure| measure.local_identifier().map(str::to_string))
        .collect();

    let mut aux_ids: HashMap<String, String> = HashMap::new();
    let mut aux_measures = Vec::new();
    let mut converted = Vec::with_capacity(filters.len());

    for filter in filters {
        if let Filter::NegativeAttributeFilter(body) = filter {
            if body.not_in.is_empty() && !keep_empty_attribute_filters {
                log::warn!(
                    "dropping negative attribute filter on {} that excludes nothing",
                    body.display_form
                );
                continue;
            }
        }

        let Some(target) = ratio_target(filter, &ratio_measures) else {
            converted.push(filter.clone());
            continue;
        };

        let aux_id = match aux_ids.get(target) {
            Some(id) => id.clone(),
            None => {
                let id = fresh_aux_id(target, &used_ids);
                used_ids.insert(id.clone());
                aux_ids.insert(target.to_string(), id.clone());
                if let Some(measure) = ratio_measures.get(target) {
                    let mut aux = measure_disable_compute_ratio(measure);
                    aux.local_identifier = Some(id.clone());
                    aux_measures.push(aux);
                }
                id
            }
        };
        converted.push(redirect(filter, aux_id));
    }

    if !aux_measures.is_empty() {
        log::debug!("created {} auxiliary measures for ratio filters", aux_measures.len());
    }

    AfmFilters {
        filters: converted,
        aux_measures,
    }
}

/// Local identifier of the ratio measure a filter targets, if any.
fn ratio_target<'a>(filter: &'a Filter, ratio_measures: &HashMap<&str, &Measure>) -> Option<&'a str> {
    let measure_ref = match filter {
        Filter::MeasureValueFilter(body) => &body.measure,
        Filter::RankingFilter(body) => &body.measure,
        _ => return None,
    };
    measure_ref
        .local_identifier()
        .filter(|id| ratio_measures.contains_key(id))
}

fn fresh_aux_id(local_id: &str, used_ids: &HashSet<String>) -> String {
    let base = format!("{local_id}_aux");
    if !used_ids.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !used_ids.contains(candidate))
        .unwrap_or(base)
}

fn redirect(filter: &Filter, aux_id: String) -> Filter {
    let measure: ObjRef = local_id_ref(aux_id);
    match filter {
        Filter::MeasureValueFilter(body) => Filter::MeasureValueFilter(MeasureValueFilterBody {
            measure,
            apply_on_result: Some(false),
            ..body.clone()
        }),
        Filter::RankingFilter(body) => Filter::RankingFilter(RankingFilterBody {
            measure,
            apply_on_result: Some(false),
            ..body.clone()
        }),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{new_ranking_filter, RankingFilterOperator};
    use crate::measure::new_measure;

    #[test]
    fn aux_ids_avoid_collisions() {
        let measures = vec![
            new_measure("m.revenue").local_id("m1").ratio().build(),
            new_measure("m.other").local_id("m1_aux").build(),
        ];
        let filters = vec![
            new_ranking_filter(local_id_ref("m1"), vec![], RankingFilterOperator::Top, 5),
            new_ranking_filter(local_id_ref("m1"), vec![], RankingFilterOperator::Bottom, 5),
        ];

        let result = convert_afm_filters(&measures, &filters, false);
        assert_eq!(result.aux_measures.len(), 1);
        assert_eq!(result.aux_measures[0].local_identifier(), Some("m1_aux_1"));
        for filter in &result.filters {
            let Filter::RankingFilter(body) = filter else {
                panic!("expected ranking filter");
            };
            assert_eq!(body.measure, local_id_ref("m1_aux_1"));
            assert_eq!(body.apply_on_result, Some(false));
        }
    }

    #[test]
    fn filters_by_object_ref_are_left_alone() {
        let measures = vec![new_measure("m.revenue").local_id("m1").ratio().build()];
        let filters = vec![new_ranking_filter(
            crate::objref::id_ref("m.revenue", None),
            vec![],
            RankingFilterOperator::Top,
            5,
        )];
        let result = convert_afm_filters(&measures, &filters, false);
        assert!(result.aux_measures.is_empty());
        assert_eq!(result.filters, filters);
    }
}
