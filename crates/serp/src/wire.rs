//! Wire shapes for the search provider's JSON, separate from the persisted
//! core types so provider renames stay contained here.

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireResponse {
    #[serde(default)]
    pub organic: Vec<WireOrganic>,
    #[serde(default)]
    pub related_searches: Vec<WireRelated>,
    #[serde(default)]
    pub people_also_ask: Vec<WireQuestion>,
    #[serde(default)]
    pub top_stories: Vec<WireStory>,
}

#[derive(Deserialize)]
pub(crate) struct WireOrganic {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    pub position: i32,
    #[serde(default)]
    pub sitelinks: Vec<WireSitelink>,
}

#[derive(Deserialize)]
pub(crate) struct WireSitelink {
    pub title: String,
    pub link: String,
}

#[derive(Deserialize)]
pub(crate) struct WireRelated {
    pub query: String,
}

#[derive(Deserialize)]
pub(crate) struct WireQuestion {
    pub question: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct WireStory {
    pub title: String,
    pub link: String,
    pub source: String,
    #[serde(default)]
    pub date: Option<String>,
}
