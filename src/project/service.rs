//! Project service

use super::Project;
use crate::account::AccountService;
use crate::client::RestClient;
use crate::domain::{GoodDataError, Result};
use crate::gdc;
use serde::Deserialize;
use serde_json::Value;

/// Service for projects (workspaces)
#[derive(Debug, Clone)]
pub struct ProjectService {
    client: RestClient,
    accounts: AccountService,
}

impl ProjectService {
    pub fn new(client: RestClient, accounts: AccountService) -> Self {
        Self { client, accounts }
    }

    /// Lists all projects the authenticated account can access
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let account = self.accounts.get_current().await?;
        let uri = match account.projects_uri() {
            Some(uri) => uri.to_string(),
            None => {
                let id = account.id().ok_or_else(|| {
                    GoodDataError::Validation("current account has no id".to_string())
                })?;
                format!("/gdc/account/profile/{id}/projects")
            }
        };

        let listing: ProjectsListing = self.client.get_json(&uri).await?;
        listing
            .projects
            .into_iter()
            .map(gdc::unwrap::<Project>)
            .collect()
    }

    /// Fetches a project by its id
    pub async fn get_project_by_id(&self, project_id: &str) -> Result<Project> {
        self.get_project_by_uri(&format!("/gdc/projects/{project_id}"))
            .await
    }

    /// Fetches a project by its URI
    pub async fn get_project_by_uri(&self, uri: &str) -> Result<Project> {
        let value: Value = self.client.get_json(uri).await?;
        gdc::unwrap(value)
    }
}

#[derive(Deserialize)]
struct ProjectsListing {
    projects: Vec<Value>,
}
