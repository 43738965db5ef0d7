//! Search result types as emitted by `gh search prs --json`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::PrStatus;

/// JSON fields requested from `gh search prs`.
pub const SEARCH_FIELDS: &str = "id,url,title,repository,updatedAt,isDraft,number,labels,author";

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    /// PRs where the user is a requested reviewer
    ReviewRequested,
    /// PRs assigned to the user
    Assigned,
}

impl SearchFilter {
    /// The `gh search prs` qualifier flag for this filter
    pub fn flag(&self) -> &'static str {
        match self {
            SearchFilter::ReviewRequested => "--review-requested=@me",
            SearchFilter::Assigned => "--assignee=@me",
        }
    }
}

/// One raw search hit.
///
/// Every field tolerates `null` or absence so one odd hit cannot fail the
/// whole search. A hit without an `id` is dropped at merge time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repository: Repository,
    /// ISO-8601 timestamp, parsed later so a bad value cannot fail the whole search
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_draft: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_with_owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
}

/// Deserialize `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A search hit that survived filtering, tagged with why it needs attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedPr {
    pub result: SearchResult,
    pub status: PrStatus,
}
