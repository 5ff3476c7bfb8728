use crate::models::{
    DashboardView, OfferSubmission, PersonalPosition, SalaryBucket, StatisticsSnapshot,
    SALARY_RANGES,
};
use chrono::{DateTime, Local};

pub fn build_dashboard(
    snapshot: &StatisticsSnapshot,
    submission: Option<OfferSubmission>,
) -> DashboardView {
    build_dashboard_at(Local::now(), snapshot, submission)
}

pub fn build_dashboard_at(
    fetched_at: DateTime<Local>,
    snapshot: &StatisticsSnapshot,
    submission: Option<OfferSubmission>,
) -> DashboardView {
    DashboardView {
        submission,
        total_submissions: snapshot.total_submissions,
        offer_rate: round_percent(snapshot.offer_rate),
        avg_offers: round_to_tenth(snapshot.avg_offers),
        today_new: snapshot.today_new,
        salary_buckets: salary_buckets(snapshot),
        personal: personal_position(snapshot),
        fetched_at: fetched_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// One bucket per canonical salary range, in canonical order. Labels the
/// backend did not report count as zero; labels it reports that are not
/// canonical are dropped.
pub fn salary_buckets(snapshot: &StatisticsSnapshot) -> Vec<SalaryBucket> {
    SALARY_RANGES
        .iter()
        .map(|&label| {
            let count = snapshot
                .salary_distribution
                .iter()
                .find(|entry| entry.salary_range == label)
                .map_or(0, |entry| entry.count);
            SalaryBucket {
                label,
                count,
                percent: percent_of(count, snapshot.total_submissions),
            }
        })
        .collect()
}

pub fn personal_position(snapshot: &StatisticsSnapshot) -> PersonalPosition {
    snapshot
        .personal_stats
        .as_ref()
        .map(|stats| PersonalPosition {
            above_average_percent: round_percent(stats.above_average_percent),
            industry_percentile: round_percent(stats.industry_percentile),
        })
        .unwrap_or_default()
}

/// `round(100 * count / total)`, or 0 when `total` is 0.
pub fn percent_of(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (100.0 * count as f64 / total as f64).round() as u64
}

/// Rounds half away from zero to a whole percentage.
pub fn round_percent(value: f64) -> i64 {
    if value.is_finite() { value.round() as i64 } else { 0 }
}

pub fn round_to_tenth(value: f64) -> f64 {
    if value.is_finite() { (value * 10.0).round() / 10.0 } else { 0.0 }
}
