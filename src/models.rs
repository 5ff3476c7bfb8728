use crate::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};

pub const SALARY_RANGES: [&str; 8] = [
    "5-10K", "10-15K", "15-20K", "20-25K", "25-30K", "30-40K", "40-50K", "50K以上",
];

pub const INDUSTRIES: [&str; 11] = [
    "互联网", "金融", "教育", "医疗", "人工智能", "区块链", "游戏", "电商", "制造业", "咨询", "其他",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferSubmission {
    pub offer_count: u32,
    pub salary_range: String,
    pub industry: String,
}

/// Partial update for the draft. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OfferDraftPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl OfferSubmission {
    pub fn apply(&mut self, patch: OfferDraftPatch) {
        if let Some(offer_count) = patch.offer_count {
            self.offer_count = offer_count;
        }
        if let Some(salary_range) = patch.salary_range {
            self.salary_range = salary_range;
        }
        if let Some(industry) = patch.industry {
            self.industry = industry;
        }
    }
}

impl From<OfferSubmission> for OfferDraftPatch {
    fn from(submission: OfferSubmission) -> Self {
        Self {
            offer_count: Some(submission.offer_count),
            salary_range: Some(submission.salary_range),
            industry: Some(submission.industry),
        }
    }
}

// Signed so a negative count reaches validation instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferInput {
    pub offer_count: i64,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub industry: String,
}

impl OfferInput {
    pub fn validate(self) -> Result<OfferSubmission, ValidationError> {
        if self.offer_count < 0 {
            return Err(ValidationError::NegativeOfferCount);
        }
        let offer_count =
            u32::try_from(self.offer_count).map_err(|_| ValidationError::OfferCountOutOfRange)?;

        let salary_range = self.salary_range.trim();
        if salary_range.is_empty() {
            return Err(ValidationError::MissingSalaryRange);
        }
        if !SALARY_RANGES.contains(&salary_range) {
            return Err(ValidationError::UnknownSalaryRange(salary_range.to_string()));
        }

        let industry = self.industry.trim();
        if industry.is_empty() {
            return Err(ValidationError::MissingIndustry);
        }
        if !INDUSTRIES.contains(&industry) {
            return Err(ValidationError::UnknownIndustry(industry.to_string()));
        }

        Ok(OfferSubmission {
            offer_count,
            salary_range: salary_range.to_string(),
            industry: industry.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Form,
    Dashboard,
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "form" => Ok(View::Form),
            "dashboard" => Ok(View::Dashboard),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub current_view: View,
    pub draft: OfferSubmission,
    pub is_submitting: bool,
    pub last_submitted: Option<OfferSubmission>,
    /// Bumped on every reset; a submit response from an older epoch is stale.
    #[serde(skip)]
    pub(crate) epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SalaryCount {
    #[serde(default, deserialize_with = "null_as_default")]
    pub salary_range: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersonalStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub above_average_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industry_percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_submissions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offer_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_offers: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub today_new: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub salary_distribution: Vec<SalaryCount>,
    #[serde(default)]
    pub personal_stats: Option<PersonalStats>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBucket {
    pub label: &'static str,
    pub count: u64,
    pub percent: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct PersonalPosition {
    pub above_average_percent: i64,
    pub industry_percentile: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub submission: Option<OfferSubmission>,
    pub total_submissions: u64,
    pub offer_rate: i64,
    pub avg_offers: f64,
    pub today_new: u64,
    pub salary_buckets: Vec<SalaryBucket>,
    pub personal: PersonalPosition,
    pub fetched_at: String,
}
