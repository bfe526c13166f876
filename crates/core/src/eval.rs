//! Bias evaluations: LLM-produced judgments over a result set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eval type tag for brand-bias judgments.
pub const EVAL_TYPE_BRAND_BIAS: &str = "brand_bias";

/// 0-10 ratings of a search result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasRatings {
    /// 0 = no commercial bias, 10 = heavily commercial.
    pub commercial_bias: u8,
    /// 0 = heavily biased, 10 = completely neutral.
    pub neutrality_score: u8,
    /// 0 = pure marketing, 10 = highly educational.
    pub educational_value: u8,
}

/// Whether to keep the current results or re-search neutral domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasAction {
    UseCurrent,
    FetchNeutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasRecommendation {
    pub recommendation: BiasAction,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// A persisted evaluation row linked to an entry.
///
/// `ratings` and `recommendation` are stored as JSON columns; the typed
/// accessors deserialize on demand so corrupt rows surface as errors at the
/// call site rather than at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub id: i64,
    pub entry_id: i64,
    pub eval_type: String,
    pub ratings: serde_json::Value,
    pub recommendation: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl EvalRecord {
    /// Typed view of the ratings JSON.
    ///
    /// # Errors
    /// Returns the serde error if the stored JSON does not match
    /// [`BiasRatings`].
    pub fn bias_ratings(&self) -> Result<BiasRatings, serde_json::Error> {
        serde_json::from_value(self.ratings.clone())
    }

    /// Typed view of the recommendation JSON.
    ///
    /// # Errors
    /// Returns the serde error if the stored JSON does not match
    /// [`BiasRecommendation`].
    pub fn bias_recommendation(&self) -> Result<BiasRecommendation, serde_json::Error> {
        serde_json::from_value(self.recommendation.clone())
    }
}
