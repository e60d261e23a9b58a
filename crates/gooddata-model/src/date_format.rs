//! Date formats accepted for user-entered dates.
//!
//! The set is closed: any format string outside of it is rejected instead of being guessed at.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/dd/yyyy")]
    MonthDayYear,
    #[serde(rename = "dd/MM/yyyy")]
    DayMonthYear,
    #[serde(rename = "dd-MM-yyyy")]
    DayMonthYearDashes,
    #[serde(rename = "yyyy-MM-dd")]
    Iso,
    #[serde(rename = "M/d/yy")]
    ShortMonthDayYear,
    #[serde(rename = "dd.MM.yyyy")]
    DayMonthYearDots,
}

impl DateFormat {
    pub const ALL: [DateFormat; 6] = [
        DateFormat::MonthDayYear,
        DateFormat::DayMonthYear,
        DateFormat::DayMonthYearDashes,
        DateFormat::Iso,
        DateFormat::ShortMonthDayYear,
        DateFormat::DayMonthYearDots,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "MM/dd/yyyy",
            DateFormat::DayMonthYear => "dd/MM/yyyy",
            DateFormat::DayMonthYearDashes => "dd-MM-yyyy",
            DateFormat::Iso => "yyyy-MM-dd",
            DateFormat::ShortMonthDayYear => "M/d/yy",
            DateFormat::DayMonthYearDots => "dd.MM.yyyy",
        }
    }

    fn parse_pattern(self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::DayMonthYearDashes => "%d-%m-%Y",
            DateFormat::Iso => "%Y-%m-%d",
            // chrono's numeric parsers accept single digits, the padding flags only affect output.
            DateFormat::ShortMonthDayYear => "%m/%d/%y",
            DateFormat::DayMonthYearDots => "%d.%m.%Y",
        }
    }

    fn format_pattern(self) -> &'static str {
        match self {
            DateFormat::ShortMonthDayYear => "%-m/%-d/%y",
            other => other.parse_pattern(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        DateFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ModelError::UnsupportedFormat(s.to_string()))
    }
}

pub fn parse_date(value: &str, format: DateFormat) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format.parse_pattern()).map_err(|_| {
        ModelError::InvalidDate {
            value: value.to_string(),
            format: format.to_string(),
        }
    })
}

pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.format_pattern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_name_parses_back() {
        for format in DateFormat::ALL {
            assert_eq!(format.as_str().parse::<DateFormat>(), Ok(format));
        }
    }

    #[test]
    fn short_format_drops_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date, DateFormat::ShortMonthDayYear), "3/7/24");
        assert_eq!(parse_date("3/7/24", DateFormat::ShortMonthDayYear), Ok(date));
    }
}
