//! Statement period matching and enrichment.

use chrono::{Datelike, Months};
use ronda_traits::{Date, FundamentalPeriod, Fundamentals};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::result_type::{PeriodKind, ResultType};

/// Annual period ends may sit this many days either side of the target.
pub const ANNUAL_TOLERANCE_DAYS: i64 = 90;
/// Half-year results may follow the quarter end by up to this many days.
pub const HALF_YEAR_LAG_DAYS: i64 = 90;
/// Quarterly results may follow the quarter end by up to this many days.
pub const QUARTERLY_LAG_DAYS: i64 = 60;
/// Prior-year quarterly ends may sit this many days either side of the target.
pub const PRIOR_QUARTER_TOLERANCE_DAYS: i64 = 45;

/// Statement periods an announcement reports on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodMatch<'a> {
    /// The reported period.
    pub current: Option<&'a FundamentalPeriod>,
    /// The same period a year earlier.
    pub prior: Option<&'a FundamentalPeriod>,
}

/// Find the statement periods a result announcement reports on.
///
/// Periods whose end date does not parse are skipped. Guidance never matches.
#[must_use]
pub fn match_period(
    fundamentals: &Fundamentals,
    result_type: ResultType,
    announced: Date,
) -> PeriodMatch<'_> {
    match result_type.period_kind() {
        Some(PeriodKind::Annual) => match_annual(&fundamentals.annual, announced),
        Some(PeriodKind::HalfYear) => {
            match_quarter(&fundamentals.quarterly, announced, HALF_YEAR_LAG_DAYS)
        }
        Some(PeriodKind::Quarterly) => {
            match_quarter(&fundamentals.quarterly, announced, QUARTERLY_LAG_DAYS)
        }
        None => PeriodMatch::default(),
    }
}

fn parsed(periods: &[FundamentalPeriod]) -> Vec<(Date, &FundamentalPeriod)> {
    let mut skipped = 0usize;
    let dated = periods
        .iter()
        .filter_map(|p| {
            let end = p.parsed_end_date();
            if end.is_none() {
                skipped += 1;
            }
            end.map(|d| (d, p))
        })
        .collect();
    if skipped > 0 {
        warn!(skipped, "statement periods with unparsable end dates ignored");
    }
    dated
}

/// Period closest to `target`, within `tolerance` days either side.
fn nearest<'a>(
    periods: &[(Date, &'a FundamentalPeriod)],
    target: Date,
    tolerance: i64,
) -> Option<&'a FundamentalPeriod> {
    periods
        .iter()
        .map(|(end, p)| ((*end - target).num_days().abs(), *p))
        .filter(|(gap, _)| *gap <= tolerance)
        .min_by_key(|(gap, _)| *gap)
        .map(|(_, p)| p)
}

/// First candidate target with a period in range wins.
fn nearest_of<'a>(
    periods: &[(Date, &'a FundamentalPeriod)],
    targets: &[Date],
    tolerance: i64,
) -> Option<&'a FundamentalPeriod> {
    targets
        .iter()
        .find_map(|target| nearest(periods, *target, tolerance))
}

fn match_annual(periods: &[FundamentalPeriod], announced: Date) -> PeriodMatch<'_> {
    let periods = parsed(periods);
    if periods.is_empty() {
        return PeriodMatch::default();
    }

    // Announcements before July report on the year that ended last June or December.
    let year = if announced.month() >= 7 {
        announced.year()
    } else {
        announced.year() - 1
    };
    let targets: Vec<Date> = [(year, 6, 30), (year, 12, 31)]
        .into_iter()
        .filter_map(|(y, m, d)| Date::from_ymd_opt(y, m, d))
        .collect();
    let prior_targets: Vec<Date> = targets
        .iter()
        .filter_map(|t| t.checked_sub_months(Months::new(12)))
        .collect();

    PeriodMatch {
        current: nearest_of(&periods, &targets, ANNUAL_TOLERANCE_DAYS),
        prior: nearest_of(&periods, &prior_targets, ANNUAL_TOLERANCE_DAYS),
    }
}

fn match_quarter(periods: &[FundamentalPeriod], announced: Date, max_lag: i64) -> PeriodMatch<'_> {
    let periods = parsed(periods);

    let current = periods
        .iter()
        .map(|(end, p)| (*end, (announced - *end).num_days(), *p))
        .filter(|(_, lag, _)| (0..=max_lag).contains(lag))
        .min_by_key(|(_, lag, _)| *lag);

    let Some((end, _, current)) = current else {
        return PeriodMatch::default();
    };
    let prior = end
        .checked_sub_months(Months::new(12))
        .and_then(|target| nearest(&periods, target, PRIOR_QUARTER_TOLERANCE_DAYS));

    PeriodMatch {
        current: Some(current),
        prior,
    }
}

/// Reported figures for a matched period, with year-on-year growth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    /// End date of the matched period.
    pub period_end: String,
    /// Revenue.
    pub revenue: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,
    /// EBITDA.
    pub ebitda: Option<f64>,
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Free cash flow.
    pub free_cash_flow: Option<f64>,
    /// Gross margin in percent.
    pub gross_margin: Option<f64>,
    /// Operating margin in percent.
    pub operating_margin: Option<f64>,
    /// Net margin in percent.
    pub net_margin: Option<f64>,
    /// Revenue growth against the prior period, in percent.
    pub revenue_yoy_pct: Option<f64>,
    /// Net income growth against the prior period, in percent.
    pub net_income_yoy_pct: Option<f64>,
}

impl Enrichment {
    /// Build from a match; `None` when nothing matched.
    ///
    /// Growth is only reported against a positive prior figure.
    #[must_use]
    pub fn from_match(matched: &PeriodMatch<'_>) -> Option<Self> {
        let current = matched.current?;
        let prior = matched.prior;
        Some(Self {
            period_end: current.end_date.clone(),
            revenue: current.revenue,
            operating_income: current.operating_income,
            net_income: current.net_income,
            ebitda: current.ebitda,
            operating_cash_flow: current.operating_cash_flow,
            free_cash_flow: current.free_cash_flow,
            gross_margin: current.gross_margin(),
            operating_margin: current.operating_margin(),
            net_margin: current.net_margin(),
            revenue_yoy_pct: growth(current.revenue, prior.and_then(|p| p.revenue)),
            net_income_yoy_pct: growth(current.net_income, prior.and_then(|p| p.net_income)),
        })
    }
}

fn growth(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    match (current, prior) {
        (Some(now), Some(then)) if then > 0.0 => Some((now - then) / then * 100.0),
        _ => None,
    }
}
