//! Financial result announcement types.

use std::fmt;

use chrono::Datelike;
use ronda_traits::Date;
use serde::{Deserialize, Serialize};

/// Kind of financial result an announcement carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    /// Full-year results.
    #[serde(rename = "FY")]
    FullYear,
    /// Half-year results.
    #[serde(rename = "HY")]
    HalfYear,
    /// First fiscal quarter (Jul to Sep).
    Q1,
    /// Second fiscal quarter (Oct to Dec).
    Q2,
    /// Third fiscal quarter (Jan to Mar).
    Q3,
    /// Fourth fiscal quarter (Apr to Jun).
    Q4,
    /// Appendix 4C quarterly cash flow report.
    #[serde(rename = "4C")]
    Appendix4C,
    /// Appendix 4D half-year report.
    #[serde(rename = "4D")]
    Appendix4D,
    /// Appendix 4E preliminary final report.
    #[serde(rename = "4E")]
    Appendix4E,
    /// Guidance or earnings update.
    #[serde(rename = "AG")]
    Guidance,
}

/// Statement granularity a result type is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// Annual statements.
    Annual,
    /// The quarter that closes a half year.
    HalfYear,
    /// A single quarter.
    Quarterly,
}

impl ResultType {
    /// Short code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FullYear => "FY",
            Self::HalfYear => "HY",
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
            Self::Appendix4C => "4C",
            Self::Appendix4D => "4D",
            Self::Appendix4E => "4E",
            Self::Guidance => "AG",
        }
    }

    /// Statements this result is compared with; `None` for guidance.
    #[must_use]
    pub const fn period_kind(&self) -> Option<PeriodKind> {
        match self {
            Self::FullYear | Self::Appendix4E => Some(PeriodKind::Annual),
            Self::HalfYear | Self::Appendix4D => Some(PeriodKind::HalfYear),
            Self::Q1 | Self::Q2 | Self::Q3 | Self::Q4 | Self::Appendix4C => {
                Some(PeriodKind::Quarterly)
            }
            Self::Guidance => None,
        }
    }

    /// Recognise a result announcement and label its fiscal period.
    ///
    /// Labels name the fiscal period (years ending 30 June) the announcement
    /// falls in, unless the headline names a half or quarter explicitly.
    /// Returns `None` for headlines that are not financial results.
    #[must_use]
    pub fn from_headline(headline: &str, date: Date) -> Option<(Self, String)> {
        let h = headline.to_uppercase();
        let has = |needle: &str| h.contains(needle);
        let fy = fiscal_year_label(date);

        if has("APPENDIX 4E") || has("PRELIMINARY FINAL") {
            return Some((Self::Appendix4E, fy));
        }
        if has("APPENDIX 4D") || has("HALF YEARLY") {
            return Some((Self::Appendix4D, format!("{} {fy}", half_of(date))));
        }
        if has("APPENDIX 4C") || (has("4C") && has("CASH")) {
            return Some((Self::Appendix4C, format!("Q{} {fy}", fiscal_quarter(date))));
        }
        if has("FULL YEAR") || has("ANNUAL") || (has("FY") && has("RESULT")) {
            return Some((Self::FullYear, fy));
        }
        if has("HALF YEAR") || has("1H") || has("2H") || has("H1") || has("H2") {
            let half = if has("2H") || has("H2") {
                "H2"
            } else if has("1H") || has("H1") {
                "H1"
            } else {
                half_of(date)
            };
            return Some((Self::HalfYear, format!("{half} {fy}")));
        }
        if has("QUARTER") {
            let quarter = [
                ("Q1", "FIRST QUARTER"),
                ("Q2", "SECOND QUARTER"),
                ("Q3", "THIRD QUARTER"),
                ("Q4", "FOURTH QUARTER"),
            ]
            .iter()
            .position(|(code, words)| has(*code) || has(*words))
            .map_or_else(|| fiscal_quarter(date), |i| i as u32 + 1);
            let result_type = match quarter {
                1 => Self::Q1,
                2 => Self::Q2,
                3 => Self::Q3,
                _ => Self::Q4,
            };
            return Some((result_type, format!("Q{quarter} {fy}")));
        }
        if has("GUIDANCE")
            || has("EARNINGS UPDATE")
            || has("PROFIT UPGRADE")
            || has("PROFIT DOWNGRADE")
        {
            return Some((Self::Guidance, fy));
        }
        if has("RESULT") {
            if (1..=3).contains(&date.month()) {
                return Some((Self::HalfYear, format!("H1 {fy}")));
            }
            return Some((Self::FullYear, fy));
        }
        None
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fiscal year (ending 30 June) containing `date`.
#[must_use]
pub fn fiscal_year(date: Date) -> i32 {
    if date.month() >= 7 {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Fiscal quarter (1 = Jul to Sep) containing `date`.
#[must_use]
pub fn fiscal_quarter(date: Date) -> u32 {
    match date.month() {
        7..=9 => 1,
        10..=12 => 2,
        1..=3 => 3,
        _ => 4,
    }
}

fn fiscal_year_label(date: Date) -> String {
    format!("FY{:02}", fiscal_year(date).rem_euclid(100))
}

fn half_of(date: Date) -> &'static str {
    if date.month() >= 7 { "H1" } else { "H2" }
}
