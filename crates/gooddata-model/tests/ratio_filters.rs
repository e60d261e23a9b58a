use gooddata_model::{
    convert_afm_filters, local_id_ref, measure_does_compute_ratio, new_measure,
    new_measure_value_filter, new_negative_attribute_filter, AttributeElements, Filter,
    MeasureValueFilterCondition, RangeCondition, RangeConditionOperator,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn between(from: f64, to: f64) -> Option<MeasureValueFilterCondition> {
    Some(MeasureValueFilterCondition::Range(RangeCondition {
        operator: RangeConditionOperator::Between,
        from,
        to,
        treat_null_values_as: None,
    }))
}

#[test]
fn filter_on_ratio_measure_is_redirected_to_aux_measure() {
    let m1 = new_measure("m.revenue").local_id("m1").ratio().build();
    let filter = new_measure_value_filter(local_id_ref("m1"), between(0.1, 0.9));

    let result = convert_afm_filters(std::slice::from_ref(&m1), &[filter], false);

    assert_eq!(result.aux_measures.len(), 1);
    let aux = &result.aux_measures[0];
    assert_eq!(aux.local_identifier(), Some("m1_aux"));
    assert!(!measure_does_compute_ratio(aux));
    assert_eq!(aux.definition, gooddata_model::measure_disable_compute_ratio(&m1).definition);

    // Input measure is untouched.
    assert!(measure_does_compute_ratio(&m1));

    assert_eq!(
        serde_json::to_value(&result.filters).unwrap(),
        json!([{
            "measureValueFilter": {
                "measure": {"localIdentifier": "m1_aux"},
                "condition": {"range": {"operator": "BETWEEN", "from": 0.1, "to": 0.9}},
                "applyOnResult": false
            }
        }])
    );
}

#[test]
fn filter_on_plain_measure_is_unchanged() {
    let m1 = new_measure("m.revenue").local_id("m1").build();
    let filter = new_measure_value_filter(local_id_ref("m1"), between(1.0, 2.0));

    let result = convert_afm_filters(&[m1], std::slice::from_ref(&filter), false);

    assert!(result.aux_measures.is_empty());
    assert_eq!(result.filters, vec![filter]);
}

#[test]
fn one_aux_measure_per_ratio_measure() {
    let measures = vec![
        new_measure("m.revenue").local_id("m1").ratio().build(),
        new_measure("m.cost").local_id("m2").ratio().build(),
    ];
    let filters = vec![
        new_measure_value_filter(local_id_ref("m1"), between(0.0, 0.5)),
        new_measure_value_filter(local_id_ref("m1"), between(0.2, 0.3)),
    ];

    let result = convert_afm_filters(&measures, &filters, false);

    // m2 is not filtered, so it needs no aux measure.
    assert_eq!(result.aux_measures.len(), 1);
    for filter in &result.filters {
        let Filter::MeasureValueFilter(body) = filter else {
            panic!("expected measure value filter");
        };
        assert_eq!(body.measure, local_id_ref("m1_aux"));
    }
}

#[test]
fn empty_negative_attribute_filters() {
    let all = new_negative_attribute_filter("label.region", AttributeElements::Uris { uris: vec![] });

    let dropped = convert_afm_filters(&[], std::slice::from_ref(&all), false);
    assert!(dropped.filters.is_empty());

    let kept = convert_afm_filters(&[], std::slice::from_ref(&all), true);
    assert_eq!(kept.filters, vec![all]);
}
