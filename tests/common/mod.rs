//! Shared helpers for service tests against a mock platform server
#![allow(dead_code)]

use gooddata::client::{Endpoint, RestClient};
use gooddata::config::{HttpConfig, PollingConfig, RetryConfig};
use gooddata::project::Project;
use secrecy::Secret;

/// Transport against the mock server with fast polling and no retries
pub fn rest_client(server_url: &str) -> RestClient {
    let http = HttpConfig {
        retry: RetryConfig {
            max_retries: 1,
            initial_delay_ms: 1,
            ..RetryConfig::default()
        },
        ..HttpConfig::default()
    };
    let polling = PollingConfig {
        interval_ms: 10,
        max_attempts: 10,
    };

    RestClient::new(
        &Endpoint::parse(server_url).unwrap(),
        "user@example.com",
        Secret::new("secret".into()),
        &http,
        &polling,
    )
    .unwrap()
}

/// Project fixture with id `PROJECT_ID`
pub fn project() -> Project {
    serde_json::from_value(serde_json::json!({
        "content": {"state": "ENABLED"},
        "meta": {"title": "Test project", "uri": "/gdc/projects/PROJECT_ID"},
        "links": {"self": "/gdc/projects/PROJECT_ID"}
    }))
    .unwrap()
}

/// Account profile body with id `ACCOUNT_ID`
pub fn account_body() -> String {
    serde_json::json!({
        "accountSetting": {
            "login": "user@example.com",
            "links": {
                "self": "/gdc/account/profile/ACCOUNT_ID",
                "projects": "/gdc/account/profile/ACCOUNT_ID/projects"
            }
        }
    })
    .to_string()
}
