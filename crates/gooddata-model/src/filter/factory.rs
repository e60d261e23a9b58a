use super::{
    AbsoluteDateFilterBody, AttributeElements, DateGranularity, Filter, MeasureValueFilterBody,
    MeasureValueFilterCondition, NegativeAttributeFilterBody, PositiveAttributeFilterBody,
    RankingFilterBody, RankingFilterOperator, RelativeDateFilterBody,
};
use crate::date_format::{format_date, parse_date, DateFormat};
use crate::error::Result;
use crate::objref::ObjRef;

pub fn new_positive_attribute_filter(
    display_form: impl Into<ObjRef>,
    in_elements: AttributeElements,
) -> Filter {
    Filter::PositiveAttributeFilter(PositiveAttributeFilterBody {
        display_form: display_form.into(),
        in_elements,
    })
}

pub fn new_negative_attribute_filter(
    display_form: impl Into<ObjRef>,
    not_in: AttributeElements,
) -> Filter {
    Filter::NegativeAttributeFilter(NegativeAttributeFilterBody {
        display_form: display_form.into(),
        not_in,
    })
}

/// `from` and `to` are `yyyy-MM-dd` dates.
pub fn new_absolute_date_filter(
    data_set: impl Into<ObjRef>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> Filter {
    Filter::AbsoluteDateFilter(AbsoluteDateFilterBody {
        data_set: data_set.into(),
        from: from.into(),
        to: to.into(),
    })
}

/// Absolute date filter from user-formatted dates, normalized to `yyyy-MM-dd`.
pub fn new_absolute_date_filter_from_dates(
    data_set: impl Into<ObjRef>,
    from: &str,
    to: &str,
    format: DateFormat,
) -> Result<Filter> {
    let from = format_date(parse_date(from, format)?, DateFormat::Iso);
    let to = format_date(parse_date(to, format)?, DateFormat::Iso);
    Ok(new_absolute_date_filter(data_set, from, to))
}

pub fn new_relative_date_filter(
    data_set: impl Into<ObjRef>,
    granularity: DateGranularity,
    from: i32,
    to: i32,
) -> Filter {
    Filter::RelativeDateFilter(RelativeDateFilterBody {
        data_set: data_set.into(),
        granularity,
        from,
        to,
    })
}

pub fn new_all_time_filter(data_set: impl Into<ObjRef>) -> Filter {
    new_relative_date_filter(data_set, DateGranularity::AllTime, 0, 0)
}

pub fn new_measure_value_filter(
    measure: impl Into<ObjRef>,
    condition: Option<MeasureValueFilterCondition>,
) -> Filter {
    Filter::MeasureValueFilter(MeasureValueFilterBody {
        measure: measure.into(),
        condition,
        dimensionality: Vec::new(),
        apply_on_result: None,
    })
}

pub fn new_ranking_filter(
    measure: impl Into<ObjRef>,
    attributes: Vec<ObjRef>,
    operator: RankingFilterOperator,
    value: u32,
) -> Filter {
    Filter::RankingFilter(RankingFilterBody {
        measure: measure.into(),
        attributes,
        operator,
        value,
        apply_on_result: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::objref::id_ref;

    #[test]
    fn absolute_filter_from_us_dates_is_normalized() {
        let filter = new_absolute_date_filter_from_dates(
            id_ref("date", None),
            "01/31/2024",
            "02/29/2024",
            DateFormat::MonthDayYear,
        )
        .unwrap();

        let Filter::AbsoluteDateFilter(body) = filter else {
            panic!("expected absolute date filter");
        };
        assert_eq!(body.from, "2024-01-31");
        assert_eq!(body.to, "2024-02-29");
    }

    #[test]
    fn absolute_filter_rejects_malformed_dates() {
        let err = new_absolute_date_filter_from_dates(
            id_ref("date", None),
            "2024-01-31",
            "2024-02-29",
            DateFormat::DayMonthYearDots,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidDate { .. }));
    }
}
