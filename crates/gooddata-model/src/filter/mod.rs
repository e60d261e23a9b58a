use serde::{Deserialize, Serialize};

use crate::objref::ObjRef;

mod factory;

pub use factory::{
    new_absolute_date_filter, new_absolute_date_filter_from_dates, new_all_time_filter,
    new_measure_value_filter, new_negative_attribute_filter, new_positive_attribute_filter,
    new_ranking_filter, new_relative_date_filter,
};

/// Selected attribute elements, either by element URI or by element value.
///
/// `null` entries select the empty (`NULL`) element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeElements {
    Uris { uris: Vec<Option<String>> },
    Values { values: Vec<Option<String>> },
}

impl AttributeElements {
    pub fn items(&self) -> &[Option<String>] {
        match self {
            AttributeElements::Uris { uris } => uris,
            AttributeElements::Values { values } => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveAttributeFilterBody {
    pub display_form: ObjRef,
    #[serde(rename = "in")]
    pub in_elements: AttributeElements,
}

/// Negative filter; an empty `notIn` selection is the "all elements" wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeAttributeFilterBody {
    pub display_form: ObjRef,
    pub not_in: AttributeElements,
}

/// Date range filter; bounds are `yyyy-MM-dd` strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteDateFilterBody {
    pub data_set: ObjRef,
    pub from: String,
    pub to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateGranularity {
    #[serde(rename = "GDC.time.minute")]
    Minute,
    #[serde(rename = "GDC.time.hour")]
    Hour,
    #[serde(rename = "GDC.time.date")]
    Date,
    #[serde(rename = "GDC.time.week_us")]
    Week,
    #[serde(rename = "GDC.time.month")]
    Month,
    #[serde(rename = "GDC.time.quarter")]
    Quarter,
    #[serde(rename = "GDC.time.year")]
    Year,
    #[serde(rename = "ALL_TIME_GRANULARITY")]
    AllTime,
}

/// Date filter relative to "now"; `from`/`to` are period offsets (`0` is the current period).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeDateFilterBody {
    pub data_set: ObjRef,
    pub granularity: DateGranularity,
    pub from: i32,
    pub to: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonConditionOperator {
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    EqualTo,
    NotEqualTo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeConditionOperator {
    Between,
    NotBetween,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonCondition {
    pub operator: ComparisonConditionOperator,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_null_values_as: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeCondition {
    pub operator: RangeConditionOperator,
    pub from: f64,
    pub to: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_null_values_as: Option<f64>,
}

/// Conditions of a compound measure value filter; a row passes when any condition holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundCondition {
    pub conditions: Vec<MeasureValueFilterCondition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureValueFilterCondition {
    Comparison(ComparisonCondition),
    Range(RangeCondition),
    Compound(CompoundCondition),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureValueFilterBody {
    pub measure: ObjRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<MeasureValueFilterCondition>,
    /// Attributes the filtered values are grouped by; empty means the execution's own grouping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensionality: Vec<ObjRef>,
    /// `Some(false)` applies the filter on source data instead of the computed result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingFilterOperator {
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingFilterBody {
    pub measure: ObjRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<ObjRef>,
    pub operator: RankingFilterOperator,
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

/// Execution filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    PositiveAttributeFilter(PositiveAttributeFilterBody),
    NegativeAttributeFilter(NegativeAttributeFilterBody),
    AbsoluteDateFilter(AbsoluteDateFilterBody),
    RelativeDateFilter(RelativeDateFilterBody),
    MeasureValueFilter(MeasureValueFilterBody),
    RankingFilter(RankingFilterBody),
}

/// Filters allowed in the scope of a single simple measure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureFilter {
    PositiveAttributeFilter(PositiveAttributeFilterBody),
    NegativeAttributeFilter(NegativeAttributeFilterBody),
    AbsoluteDateFilter(AbsoluteDateFilterBody),
    RelativeDateFilter(RelativeDateFilterBody),
}

impl From<MeasureFilter> for Filter {
    fn from(value: MeasureFilter) -> Self {
        match value {
            MeasureFilter::PositiveAttributeFilter(body) => Filter::PositiveAttributeFilter(body),
            MeasureFilter::NegativeAttributeFilter(body) => Filter::NegativeAttributeFilter(body),
            MeasureFilter::AbsoluteDateFilter(body) => Filter::AbsoluteDateFilter(body),
            MeasureFilter::RelativeDateFilter(body) => Filter::RelativeDateFilter(body),
        }
    }
}

impl TryFrom<Filter> for MeasureFilter {
    type Error = Filter;

    /// Fails (handing the filter back) for measure value and ranking filters.
    fn try_from(value: Filter) -> Result<Self, Self::Error> {
        match value {
            Filter::PositiveAttributeFilter(body) => Ok(MeasureFilter::PositiveAttributeFilter(body)),
            Filter::NegativeAttributeFilter(body) => Ok(MeasureFilter::NegativeAttributeFilter(body)),
            Filter::AbsoluteDateFilter(body) => Ok(MeasureFilter::AbsoluteDateFilter(body)),
            Filter::RelativeDateFilter(body) => Ok(MeasureFilter::RelativeDateFilter(body)),
            other => Err(other),
        }
    }
}

impl Filter {
    pub fn is_attribute_filter(&self) -> bool {
        matches!(
            self,
            Filter::PositiveAttributeFilter(_) | Filter::NegativeAttributeFilter(_)
        )
    }

    pub fn is_date_filter(&self) -> bool {
        matches!(
            self,
            Filter::AbsoluteDateFilter(_) | Filter::RelativeDateFilter(_)
        )
    }

    pub fn is_all_time_date_filter(&self) -> bool {
        matches!(
            self,
            Filter::RelativeDateFilter(body) if body.granularity == DateGranularity::AllTime
        )
    }
}

/// Attribute filter selecting no elements. For negative filters this means "everything".
pub fn filter_is_empty(filter: &Filter) -> bool {
    match filter {
        Filter::PositiveAttributeFilter(body) => body.in_elements.is_empty(),
        Filter::NegativeAttributeFilter(body) => body.not_in.is_empty(),
        _ => false,
    }
}

/// Filters that do not restrict the execution at all: negative attribute filters with nothing
/// excluded, all-time date filters and measure value filters without a condition.
pub fn is_no_op_filter(filter: &Filter) -> bool {
    match filter {
        Filter::NegativeAttributeFilter(body) => body.not_in.is_empty(),
        Filter::RelativeDateFilter(body) => body.granularity == DateGranularity::AllTime,
        Filter::MeasureValueFilter(body) => body.condition.is_none(),
        _ => false,
    }
}

/// Display form or data set the filter applies to.
pub fn filter_obj_ref(filter: &Filter) -> Option<&ObjRef> {
    match filter {
        Filter::PositiveAttributeFilter(body) => Some(&body.display_form),
        Filter::NegativeAttributeFilter(body) => Some(&body.display_form),
        Filter::AbsoluteDateFilter(body) => Some(&body.data_set),
        Filter::RelativeDateFilter(body) => Some(&body.data_set),
        Filter::MeasureValueFilter(_) | Filter::RankingFilter(_) => None,
    }
}

/// Measure targeted by a measure value or ranking filter.
pub fn filter_measure_ref(filter: &Filter) -> Option<&ObjRef> {
    match filter {
        Filter::MeasureValueFilter(body) => Some(&body.measure),
        Filter::RankingFilter(body) => Some(&body.measure),
        _ => None,
    }
}

/// Every local-id reference a filter makes to items of the execution.
pub(crate) fn filter_local_references(filter: &Filter) -> (Vec<&str>, Vec<&str>) {
    let mut measures = Vec::new();
    let mut attributes = Vec::new();
    match filter {
        Filter::MeasureValueFilter(body) => {
            measures.extend(body.measure.local_identifier());
            attributes.extend(body.dimensionality.iter().filter_map(ObjRef::local_identifier));
        }
        Filter::RankingFilter(body) => {
            measures.extend(body.measure.local_identifier());
            attributes.extend(body.attributes.iter().filter_map(ObjRef::local_identifier));
        }
        _ => {}
    }
    (measures, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objref::{id_ref, local_id_ref};
    use serde_json::json;

    #[test]
    fn filters_use_wrapper_keys() {
        let filter = new_positive_attribute_filter(
            id_ref("label.region", None),
            AttributeElements::Values {
                values: vec![Some("East".to_string()), None],
            },
        );
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "positiveAttributeFilter": {
                    "displayForm": {"identifier": "label.region"},
                    "in": {"values": ["East", null]}
                }
            })
        );
    }

    #[test]
    fn measure_value_filter_omits_empty_dimensionality() {
        let filter = Filter::MeasureValueFilter(MeasureValueFilterBody {
            measure: local_id_ref("m1"),
            condition: Some(MeasureValueFilterCondition::Comparison(ComparisonCondition {
                operator: ComparisonConditionOperator::GreaterThan,
                value: 10.0,
                treat_null_values_as: None,
            })),
            dimensionality: Vec::new(),
            apply_on_result: None,
        });

        let value = serde_json::to_value(&filter).unwrap();
        assert!(value["measureValueFilter"].get("dimensionality").is_none());
        assert_eq!(
            value["measureValueFilter"]["condition"],
            json!({"comparison": {"operator": "GREATER_THAN", "value": 10.0}})
        );
    }

    #[test]
    fn no_op_filters() {
        let all = new_negative_attribute_filter(
            id_ref("label.region", None),
            AttributeElements::Uris { uris: vec![] },
        );
        assert!(is_no_op_filter(&all));
        assert!(filter_is_empty(&all));

        let all_time = new_all_time_filter(id_ref("date", None));
        assert!(is_no_op_filter(&all_time));
        assert!(all_time.is_all_time_date_filter());

        let nothing = new_positive_attribute_filter(
            id_ref("label.region", None),
            AttributeElements::Uris { uris: vec![] },
        );
        assert!(!is_no_op_filter(&nothing));
        assert!(filter_is_empty(&nothing));
    }

    #[test]
    fn measure_filters_convert_both_ways() {
        let filter = new_relative_date_filter(id_ref("date", None), DateGranularity::Month, -3, 0);
        let measure_filter = MeasureFilter::try_from(filter.clone()).unwrap();
        assert_eq!(Filter::from(measure_filter), filter);

        let ranking = new_ranking_filter(local_id_ref("m1"), vec![], RankingFilterOperator::Top, 3);
        assert!(MeasureFilter::try_from(ranking).is_err());
    }
}
