use gooddata_model::{
    are_obj_refs_equal, assemble, dimension_set_totals, id_ref, new_dimension, new_total,
    new_two_dimensional, uri_ref, ModelError, ObjRef, ObjectType, TotalType,
    MEASURE_GROUP_IDENTIFIER,
};
use pretty_assertions::assert_eq;

#[test]
fn measure_group_is_exclusive_to_one_dimension() {
    let err = new_two_dimensional([MEASURE_GROUP_IDENTIFIER], [MEASURE_GROUP_IDENTIFIER]).unwrap_err();
    assert_eq!(
        err,
        ModelError::InvalidInput("measure group placed in both dimensions".to_string())
    );

    let dims = new_two_dimensional([MEASURE_GROUP_IDENTIFIER], Vec::<String>::new()).unwrap();
    assert_eq!(dims.len(), 2);
    assert!(dims[0].has_measure_group());
    assert!(dims[1].item_identifiers.is_empty());
}

#[test]
fn assemble_enforces_measure_group_exclusivity() {
    let groups = vec![
        vec!["a1".to_string(), MEASURE_GROUP_IDENTIFIER.to_string()],
        vec![MEASURE_GROUP_IDENTIFIER.to_string()],
    ];
    assert!(assemble(&groups, &[]).is_err());
}

#[test]
fn clearing_totals_is_idempotent() {
    let dim = new_dimension(
        ["a1", "a2"],
        vec![
            new_total(TotalType::Sum, "m1", "a1"),
            new_total(TotalType::Nat, "m1", "a2"),
        ],
    );

    let once = dimension_set_totals(&dim, vec![]);
    let twice = dimension_set_totals(&once, vec![]);
    assert_eq!(twice, once);
    assert!(once.totals.is_empty());
    assert_eq!(once.item_identifiers, dim.item_identifiers);
}

#[test]
fn setting_totals_twice_yields_the_same_dimension() {
    let dim = new_dimension(["a1"], vec![]);
    let totals = vec![new_total(TotalType::Avg, "m1", "a1")];
    let once = dimension_set_totals(&dim, totals.clone());
    assert_eq!(dimension_set_totals(&once, totals), once);
}

#[test]
fn ref_equality_tolerates_partial_refs() {
    let full = ObjRef::UriAndIdentifier {
        uri: "/gdc/md/p/obj/7".to_string(),
        identifier: "fact.amount".to_string(),
        object_type: Some(ObjectType::Fact),
    };
    let by_uri = uri_ref("/gdc/md/p/obj/7");
    let by_id = id_ref("fact.amount", None);

    assert!(are_obj_refs_equal(Some(&full), Some(&full)));
    assert!(are_obj_refs_equal(Some(&full), Some(&by_uri)));
    assert!(are_obj_refs_equal(Some(&by_id), Some(&full)));
    assert!(!are_obj_refs_equal(Some(&by_uri), Some(&by_id)));
    assert!(are_obj_refs_equal(None, None));
    assert!(!are_obj_refs_equal(None, Some(&uri_ref("x"))));
}
