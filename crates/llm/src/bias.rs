//! Two-stage brand-bias judgment over a search result set.
//!
//! First call rates the results on three 0-10 axes; second call turns the
//! ratings into a use-current vs fetch-neutral recommendation. Two calls
//! rather than one keeps each judgment small enough for the model to stay
//! consistent with its own ratings.

use termforge_core::{BiasRatings, BiasRecommendation, OrganicResult};

use crate::client::LlmClient;
use crate::error::LlmError;

fn describe_results(results: &[OrganicResult]) -> String {
    results
        .iter()
        .map(|r| format!("Title: {}\nURL: {}\nDescription: {}\n", r.title, r.link, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

impl LlmClient {
    /// Rates commercial bias, neutrality, and educational value (0-10 each).
    ///
    /// # Errors
    /// Returns an error if the API call fails or the reply does not match
    /// [`BiasRatings`].
    pub async fn rate_bias(&self, results: &[OrganicResult]) -> Result<BiasRatings, LlmError> {
        let system = "You are an expert at detecting commercial bias in search results. \
                      Rate the following aspects from 0-10:\n\
                      - Commercial Bias (0 = no commercial bias, 10 = heavily commercial)\n\
                      - Neutrality Score (0 = heavily biased, 10 = completely neutral)\n\
                      - Educational Value (0 = pure marketing, 10 = highly educational)\n\
                      Return JSON: {\"commercialBias\": n, \"neutralityScore\": n, \"educationalValue\": n}";
        let user = format!("Analyze these search results:\n{}", describe_results(results));
        self.json_completion("bias ratings", system, &user).await
    }

    /// Recommends keeping the results or re-searching neutral domains.
    ///
    /// # Errors
    /// Returns an error if the API call fails or the reply does not match
    /// [`BiasRecommendation`].
    pub async fn recommend_bias_action(
        &self,
        ratings: &BiasRatings,
        results: &[OrganicResult],
    ) -> Result<BiasRecommendation, LlmError> {
        let system = "Based on the bias analysis, recommend whether to use current results or \
                      fetch neutral sources. If commercial bias > 7 or neutrality < 4, recommend \
                      fetching neutral sources. \
                      Return JSON: {\"recommendation\": \"use_current\" | \"fetch_neutral\", \
                      \"reasoning\": \"...\"}";
        let titles = results.iter().map(|r| r.title.as_str()).collect::<Vec<_>>().join("\n");
        let user = format!(
            "Given these ratings:\n\
             Commercial Bias: {}\n\
             Neutrality Score: {}\n\
             Educational Value: {}\n\n\
             Analyze the results:\n{titles}",
            ratings.commercial_bias, ratings.neutrality_score, ratings.educational_value,
        );
        self.json_completion("bias recommendation", system, &user).await
    }
}
