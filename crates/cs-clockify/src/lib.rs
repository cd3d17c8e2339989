//! Clockify API client.
//!
//! Covers the three calls a sync needs: listing workspaces, listing the
//! projects of a workspace, and creating time entries.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use cs_core::{NewTimeEntry, Project, TimeSink, Workspace};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.clockify.me/api/v1";
const API_KEY_HEADER: &str = "X-Api-Key";
const PAGE_SIZE: usize = 50;

/// Clockify client errors.
#[derive(Debug, Error)]
pub enum ClockifyError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Clockify API client.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the public Clockify API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClockifyError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client against another API root, e.g. a regional endpoint.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ClockifyError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(ClockifyError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(ClockifyError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ClockifyError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Lists every workspace the key can see.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        let url = format!("{}/workspaces", self.base_url);
        let items: Vec<NamedItem> = self.get(&url, &[]).await?;
        Ok(items
            .into_iter()
            .map(|item| Workspace {
                id: item.id,
                name: item.name,
            })
            .collect())
    }

    /// Lists all projects of a workspace, following pages until a short one.
    ///
    /// Stops early if a page starts with the same project as the one before
    /// it, which happens when the server ignores the `page` parameter.
    pub async fn projects(&self, workspace_id: &str) -> Result<Vec<Project>, ClockifyError> {
        let url = format!("{}/workspaces/{workspace_id}/projects", self.base_url);
        let page_size = PAGE_SIZE.to_string();
        let mut projects = Vec::new();
        let mut previous_first: Option<String> = None;

        for page in 1.. {
            let page = page.to_string();
            let items: Vec<NamedItem> = self
                .get(&url, &[("page", page.as_str()), ("page-size", page_size.as_str())])
                .await?;
            let first = items.first().map(|item| item.id.clone());
            if first.is_some() && first == previous_first {
                tracing::warn!(%workspace_id, %page, "project page repeated, stopping pagination");
                break;
            }
            let fetched = items.len();
            projects.extend(items.into_iter().map(|item| Project::new(item.name, item.id)));
            if fetched < PAGE_SIZE {
                break;
            }
            previous_first = first;
        }

        Ok(projects)
    }

    /// Creates a time entry and returns its id.
    pub async fn create_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<String, ClockifyError> {
        let url = format!("{}/workspaces/{workspace_id}/time-entries", self.base_url);
        let request = CreateTimeEntryRequest::from(entry);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;
        let created: CreatedEntry = read_json(response).await?;
        Ok(created.id)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClockifyError> {
        tracing::debug!(%url, ?query, "clockify request");
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }
}

impl TimeSink for Client {
    type Error = ClockifyError;

    async fn list_workspaces(&self) -> Result<Vec<Workspace>, ClockifyError> {
        self.workspaces().await
    }

    async fn list_projects(&self, workspace_id: &str) -> Result<Vec<Project>, ClockifyError> {
        self.projects(workspace_id).await
    }

    async fn create_time_entry(
        &self,
        workspace_id: &str,
        entry: &NewTimeEntry,
    ) -> Result<String, ClockifyError> {
        self.create_entry(workspace_id, entry).await
    }
}

/// Body of `POST /workspaces/{id}/time-entries`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTimeEntryRequest<'a> {
    start: String,
    end: String,
    billable: bool,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

impl<'a> From<&'a NewTimeEntry> for CreateTimeEntryRequest<'a> {
    fn from(entry: &'a NewTimeEntry) -> Self {
        Self {
            start: format_time(entry.start),
            end: format_time(entry.end),
            billable: entry.billable,
            description: &entry.description,
            project_id: entry.project_id.as_deref(),
        }
    }
}

/// Workspaces and projects share the fields we need.
#[derive(Debug, Deserialize)]
struct NamedItem {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedEntry {
    id: String,
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClockifyError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClockifyError::Api {
            status,
            message: parse_api_error(&body).unwrap_or(body),
        });
    }
    serde_json::from_str(&body).map_err(|err| ClockifyError::InvalidResponse(err.to_string()))
}

fn parse_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn entry(project_id: Option<&str>) -> NewTimeEntry {
        NewTimeEntry {
            start: at("2025-01-28T09:00:00Z"),
            end: at("2025-01-28T10:30:00Z"),
            billable: true,
            description: "Coding on time-tracker".to_string(),
            project_id: project_id.map(str::to_string),
        }
    }

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new(""),
            Err(ClockifyError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_rejects_whitespace_api_key() {
        assert!(matches!(
            Client::new(" \t "),
            Err(ClockifyError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("clockify-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("clockify-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn request_omits_missing_project() {
        let value = serde_json::to_value(CreateTimeEntryRequest::from(&entry(None))).unwrap();
        assert_eq!(
            value,
            json!({
                "start": "2025-01-28T09:00:00Z",
                "end": "2025-01-28T10:30:00Z",
                "billable": true,
                "description": "Coding on time-tracker",
            })
        );
    }

    #[test]
    fn request_includes_project_id() {
        let value = serde_json::to_value(CreateTimeEntryRequest::from(&entry(Some("p-1")))).unwrap();
        assert_eq!(value["projectId"], "p-1");
    }

    #[tokio::test]
    async fn workspaces_are_listed_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces"))
            .and(header("x-api-key", "clock-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "ws-1", "name": "Acme", "hourlyRate": null},
                {"id": "ws-2", "name": "Personal"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::with_base_url("clock-key", server.uri()).unwrap();
        let workspaces = client.workspaces().await.unwrap();

        assert_eq!(
            workspaces,
            vec![
                Workspace {
                    id: "ws-1".to_string(),
                    name: "Acme".to_string()
                },
                Workspace {
                    id: "ws-2".to_string(),
                    name: "Personal".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn projects_follow_pages_until_short_page() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..PAGE_SIZE)
            .map(|i| json!({"id": format!("p-{i}"), "name": format!("Project {i}")}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/workspaces/ws-1/projects"))
            .and(query_param("page", "1"))
            .and(query_param("page-size", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workspaces/ws-1/projects"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": "p-last", "name": "Last"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::with_base_url("clock-key", server.uri()).unwrap();
        let projects = client.projects("ws-1").await.unwrap();

        assert_eq!(projects.len(), PAGE_SIZE + 1);
        assert_eq!(projects[0], Project::new("Project 0", "p-0"));
        assert_eq!(projects[PAGE_SIZE], Project::new("Last", "p-last"));
    }

    #[tokio::test]
    async fn projects_stop_when_server_ignores_page() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..PAGE_SIZE)
            .map(|i| json!({"id": format!("p-{i}"), "name": format!("Project {i}")}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/workspaces/ws-1/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
            .expect(2)
            .mount(&server)
            .await;

        let client = Client::with_base_url("clock-key", server.uri()).unwrap();
        let projects = client.projects("ws-1").await.unwrap();

        assert_eq!(projects.len(), PAGE_SIZE);
        assert_eq!(projects[PAGE_SIZE - 1], Project::new("Project 49", "p-49"));
    }

    #[tokio::test]
    async fn create_entry_posts_body_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/ws-1/time-entries"))
            .and(header("x-api-key", "clock-key"))
            .and(body_json(json!({
                "start": "2025-01-28T09:00:00Z",
                "end": "2025-01-28T10:30:00Z",
                "billable": true,
                "description": "Coding on time-tracker",
                "projectId": "p-1",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "te-42"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::with_base_url("clock-key", server.uri()).unwrap();
        let id = client.create_entry("ws-1", &entry(Some("p-1"))).await.unwrap();

        assert_eq!(id, "te-42");
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/ws-1/time-entries"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"message": "Project is archived", "code": 501})),
            )
            .mount(&server)
            .await;

        let client = Client::with_base_url("clock-key", server.uri()).unwrap();
        let err = client.create_entry("ws-1", &entry(None)).await.unwrap_err();

        match err {
            ClockifyError::Api { status, message } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(message, "Project is archived");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
