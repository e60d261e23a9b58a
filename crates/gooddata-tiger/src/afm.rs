//! Tiger execution request payload.
//!
//! Tiger spells enumerations in upper case and references metadata objects as
//! `{"identifier": {"id": .., "type": ..}}`.

use std::collections::BTreeMap;

use gooddata_model::{
    ComparisonCondition, ComparisonConditionOperator, RangeCondition, RangeConditionOperator,
    RankingFilterOperator,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TigerObjectType {
    Label,
    Attribute,
    Metric,
    Fact,
    Dataset,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: TigerObjectType,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifierRef {
    pub identifier: ObjectIdentifier,
}

impl IdentifierRef {
    pub fn new(id: impl Into<String>, object_type: TigerObjectType) -> Self {
        Self {
            identifier: ObjectIdentifier {
                id: id.into(),
                object_type,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdRef {
    pub local_identifier: String,
}

impl LocalIdRef {
    pub fn new(local_identifier: impl Into<String>) -> Self {
        Self {
            local_identifier: local_identifier.into(),
        }
    }
}

/// Metadata object or item of the same execution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AfmIdentifier {
    Identifier(IdentifierRef),
    Local(LocalIdRef),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeItem {
    pub local_identifier: String,
    pub label: IdentifierRef,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_all_values: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregation {
    Sum,
    Count,
    Avg,
    Min,
    Max,
    Median,
    Runsum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArithmeticOperator {
    Sum,
    Difference,
    Multiplication,
    Ratio,
    Change,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMeasure {
    pub item: IdentifierRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compute_ratio: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticMeasure {
    pub measure_identifiers: Vec<LocalIdRef>,
    pub operator: ArithmeticOperator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateAttributeShift {
    pub attribute: IdentifierRef,
    pub periods_ago: i32,
}

/// Same-period-previous-year style comparison keyed by a date attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverPeriodMeasure {
    pub measure_identifier: LocalIdRef,
    pub date_attributes: Vec<DateAttributeShift>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetShift {
    pub dataset: IdentifierRef,
    pub periods_ago: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPeriodMeasure {
    pub measure_identifier: LocalIdRef,
    pub date_datasets: Vec<DatasetShift>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureDefinition {
    Measure(SimpleMeasure),
    ArithmeticMeasure(ArithmeticMeasure),
    OverPeriodMeasure(OverPeriodMeasure),
    PreviousPeriodMeasure(PreviousPeriodMeasure),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureItem {
    pub local_identifier: String,
    pub definition: MeasureDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Tiger has no element URIs; both URI and value selections travel as values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilterElements {
    pub values: Vec<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveAttributeFilter {
    pub label: IdentifierRef,
    #[serde(rename = "in")]
    pub in_elements: AttributeFilterElements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeAttributeFilter {
    pub label: IdentifierRef,
    pub not_in: AttributeFilterElements,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsoluteDateFilter {
    pub dataset: IdentifierRef,
    pub from: String,
    pub to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeDateFilter {
    pub dataset: IdentifierRef,
    pub granularity: Granularity,
    pub from: i32,
    pub to: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMeasureValueFilter {
    pub measure: AfmIdentifier,
    pub operator: ComparisonConditionOperator,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_null_values_as: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensionality: Vec<AfmIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMeasureValueFilter {
    pub measure: AfmIdentifier,
    pub operator: RangeConditionOperator,
    pub from: f64,
    pub to: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_null_values_as: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensionality: Vec<AfmIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

/// One flat condition of a compound filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueCondition {
    Comparison(ComparisonCondition),
    Range(RangeCondition),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundMeasureValueFilter {
    pub measure: AfmIdentifier,
    pub conditions: Vec<ValueCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensionality: Vec<AfmIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingFilter {
    pub measures: Vec<AfmIdentifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensionality: Vec<AfmIdentifier>,
    pub operator: RankingFilterOperator,
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_on_result: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDefinition {
    PositiveAttributeFilter(PositiveAttributeFilter),
    NegativeAttributeFilter(NegativeAttributeFilter),
    AbsoluteDateFilter(AbsoluteDateFilter),
    RelativeDateFilter(RelativeDateFilter),
    ComparisonMeasureValueFilter(ComparisonMeasureValueFilter),
    RangeMeasureValueFilter(RangeMeasureValueFilter),
    CompoundMeasureValueFilter(CompoundMeasureValueFilter),
    RankingFilter(RankingFilter),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfmExecution {
    #[serde(default)]
    pub attributes: Vec<AttributeItem>,
    #[serde(default)]
    pub measures: Vec<MeasureItem>,
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aux_measures: Vec<MeasureItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// `Area` orders attribute elements by the sum of the measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeSortType {
    Default,
    Area,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSortKey {
    pub attribute_identifier: String,
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<AttributeSortType>,
}

/// Dimension id to `{attribute local id: element, "measureGroup": measure local id}`.
pub type DataColumnLocators = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSortKey {
    pub data_column_locators: DataColumnLocators,
    pub direction: SortDirection,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Attribute(AttributeSortKey),
    Value(ValueSortKey),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TigerDimension {
    pub local_identifier: String,
    pub item_identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortKey>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalFunction {
    Sum,
    Avg,
    Max,
    Min,
    Med,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalDimension {
    pub dimension_identifier: String,
    pub total_dimension_items: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TigerTotal {
    pub local_identifier: String,
    pub function: TotalFunction,
    pub metric: String,
    pub total_dimensions: Vec<TotalDimension>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TigerResultSpec {
    pub dimensions: Vec<TigerDimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<TigerTotal>,
}

/// `{"execution": {..}, "resultSpec": {..}}`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TigerExecution {
    pub execution: AfmExecution,
    pub result_spec: TigerResultSpec,
}
