//! Upstream popular-repository source against a mock endpoint.

use popular_repos_analyzer::domain::errors::FetchError;
use popular_repos_analyzer::domain::models::UpstreamConfig;
use popular_repos_analyzer::domain::ports::RepositorySource;
use popular_repos_analyzer::infrastructure::upstream::HttpRepositorySource;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpRepositorySource {
    HttpRepositorySource::new(&UpstreamConfig {
        url: format!("{}/index.json", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetches_and_decodes_repositories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repositories": [
                {
                    "name": "repo1",
                    "full_name": "user/repo1",
                    "description": "Test repository",
                    "owner": { "login": "user", "avatar_url": "https://example.com/a.png", "type": "User" },
                    "created_at": "2020-01-01T00:00:00Z",
                    "updated_at": "2023-06-15T12:00:00Z",
                    "stargazers_count": 100,
                    "forks_count": 20,
                    "language": "JavaScript",
                    "license": { "key": "mit", "name": "MIT License" },
                    "topics": ["web", "api"],
                    "readme": "# Repo 1",
                    "watchers": 100
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let repos = source_for(&mock_server).fetch_popular().await.unwrap();

    assert_eq!(repos.len(), 1);
    let repo = &repos[0];
    assert_eq!(repo.full_name, "user/repo1");
    assert_eq!(repo.updated_at, "2023-06-15T12:00:00Z");
    assert_eq!(repo.stargazers_count, 100);
    assert_eq!(repo.readme.as_deref(), Some("# Repo 1"));
    assert_eq!(
        repo.owner.as_ref().and_then(|o| o.owner_type.as_deref()),
        Some("User")
    );
    // Unknown upstream fields are carried along.
    assert_eq!(repo.extra.get("watchers"), Some(&json!(100)));
}

#[tokio::test]
async fn test_non_success_status_is_a_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server).fetch_popular().await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(
        err.to_string(),
        "Failed to fetch popular repositories: Popular repos API returned 500: Internal Server Error"
    );
}

#[tokio::test]
async fn test_invalid_body_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = source_for(&mock_server).fetch_popular().await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}
