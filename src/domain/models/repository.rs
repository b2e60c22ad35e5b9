//! Repository records as delivered by the upstream popular-repository list,
//! plus the enriched and simplified shapes served to clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::analysis::RepositoryAnalysis;

/// Repository owner as reported upstream. Every field is optional because the
/// upstream list is not consistent about which ones it fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

/// License block as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Remaining license attributes (`key`, `url`, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An immutable repository record from the upstream list.
///
/// Identity is `full_name` (`owner/name`) and the version is `updated_at`.
/// Everything else is opaque payload: it is formatted into the LLM input and
/// handed back to clients, but never interpreted by the caching pipeline.
/// Unknown upstream attributes are preserved in `extra` so a cached list
/// round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub created_at: String,

    /// ISO-8601 timestamp; the version component of the analysis cache key.
    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub stargazers_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks_count: Option<u64>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub license: Option<License>,

    /// Either a string array or an object keyed by stringified indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,

    /// Pre-rendered file tree text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repository {
    /// Minimal record with only identity and version set.
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            description: None,
            owner: None,
            homepage: None,
            created_at: String::new(),
            updated_at: updated_at.into(),
            stargazers_count: 0,
            forks_count: None,
            language: None,
            license: None,
            topics: None,
            readme: None,
            tree: None,
            extra: Map::new(),
        }
    }
}

/// Response body of the upstream list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularRepositoriesResponse {
    pub repositories: Vec<Repository>,
}

/// A repository paired with its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedRepository {
    #[serde(flatten)]
    pub repository: Repository,
    pub analysis: RepositoryAnalysis,
}

/// Owner block of a [`SimplifiedRepository`]; always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedOwner {
    pub login: String,
    pub avatar_url: String,
    #[serde(rename = "type")]
    pub owner_type: String,
}

/// License block of a [`SimplifiedRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedLicense {
    pub name: String,
}

/// Client-facing repository shape with the analysis flattened to top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedRepository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub owner: SimplifiedOwner,
    pub homepage: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub language: Option<String>,
    pub license: Option<SimplifiedLicense>,
    pub topics: Vec<String>,
    pub category: String,
    pub summary: String,
}

impl From<EnhancedRepository> for SimplifiedRepository {
    fn from(enhanced: EnhancedRepository) -> Self {
        let EnhancedRepository {
            repository: repo,
            analysis,
        } = enhanced;

        let owner = repo.owner.unwrap_or_default();

        Self {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            owner: SimplifiedOwner {
                login: owner.login.unwrap_or_default(),
                avatar_url: owner.avatar_url.unwrap_or_default(),
                owner_type: owner.owner_type.unwrap_or_default(),
            },
            homepage: repo.homepage,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count.unwrap_or(0),
            language: repo.language,
            license: repo.license.map(|license| SimplifiedLicense {
                name: license.name.unwrap_or_default(),
            }),
            topics: normalize_topics(repo.topics.as_ref()),
            category: analysis.category,
            summary: analysis.summary,
        }
    }
}

/// Flatten upstream topics into a plain string list.
///
/// Arrays keep their string elements. Objects are read in numeric key order
/// (`"0"`, `"1"`, ...), keeping only string values.
pub fn normalize_topics(topics: Option<&Value>) -> Vec<String> {
    match topics {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(map)) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| {
                match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => a.cmp(b),
                }
            });
            entries
                .into_iter()
                .filter_map(|(_, value)| value.as_str().map(str::to_string))
                .collect()
        }
        _ => Vec::new(),
    }
}
