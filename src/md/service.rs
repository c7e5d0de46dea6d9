//! Metadata service: create, fetch and query metadata objects

use super::models::{Entry, Obj, Query, Queryable};
use super::restriction::Restriction;
use crate::client::RestClient;
use crate::domain::{GoodDataError, MetadataError, Result};
use crate::gdc;
use crate::project::Project;
use crate::util::uri;
use serde_json::Value;

/// Template of a metadata object URI
pub const OBJ_URI_TEMPLATE: &str = "/gdc/md/{projectId}/obj/{objId}";

/// Service for metadata objects (reports, metrics, attributes, ...)
#[derive(Debug, Clone)]
pub struct MetadataService {
    client: RestClient,
}

impl MetadataService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Creates a metadata object in the project
    ///
    /// The platform answers the POST with the URI of the created object,
    /// which is then fetched to return the server-assigned representation.
    pub async fn create_obj<T: Obj>(&self, project: &Project, obj: &T) -> Result<T> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/md/{project_id}/obj");
        let body = gdc::wrap(obj)?;

        let created_uri = self.client.post_for_uri(&path, &body).await?;
        tracing::debug!(uri = %created_uri, type_name = T::TYPE_NAME, "Created metadata object");

        self.get_obj_by_uri(&created_uri).await
    }

    /// Fetches a metadata object by its URI
    pub async fn get_obj_by_uri<T: Obj>(&self, uri: &str) -> Result<T> {
        let value: Value = self.client.get_json(uri).await?;
        gdc::unwrap(value)
    }

    /// Fetches a metadata object by project and object id
    pub async fn get_obj_by_id<T: Obj>(&self, project: &Project, id: &str) -> Result<T> {
        let project_id = project_id(project)?;
        self.get_obj_by_uri(&format!("/gdc/md/{project_id}/obj/{id}"))
            .await
    }

    /// Lists objects of a type, filtered by the given restrictions
    ///
    /// Restrictions are applied client-side to the query listing; an empty
    /// slice lists everything.
    pub async fn find<T: Queryable>(
        &self,
        project: &Project,
        restrictions: &[Restriction],
    ) -> Result<Vec<Entry>> {
        let project_id = project_id(project)?;
        let path = format!("/gdc/md/{}/query/{}", project_id, T::QUERY_TYPE);

        let value: Value = self.client.get_json(&path).await?;
        let query: Query = gdc::unwrap(value)?;

        Ok(query
            .entries
            .into_iter()
            .filter(|entry| restrictions.iter().all(|r| r.matches(entry)))
            .collect())
    }

    /// Lists URIs of objects of a type, filtered by the given restrictions
    pub async fn find_uris<T: Queryable>(
        &self,
        project: &Project,
        restrictions: &[Restriction],
    ) -> Result<Vec<String>> {
        let entries = self.find::<T>(project, restrictions).await?;
        Ok(entries.into_iter().map(|entry| entry.link).collect())
    }

    /// Returns the URI of the single object matching the restrictions
    ///
    /// # Errors
    ///
    /// [`MetadataError::NotFound`] when nothing matches and
    /// [`MetadataError::Ambiguous`] when more than one object does.
    pub async fn get_obj_uri<T: Queryable>(
        &self,
        project: &Project,
        restrictions: &[Restriction],
    ) -> Result<String> {
        let mut uris = self.find_uris::<T>(project, restrictions).await?;
        match uris.len() {
            1 => Ok(uris.remove(0)),
            0 => Err(MetadataError::NotFound {
                type_name: T::TYPE_NAME,
                project_id: project_id(project)?.to_string(),
            }
            .into()),
            count => Err(MetadataError::Ambiguous {
                type_name: T::TYPE_NAME,
                count,
            }
            .into()),
        }
    }

    /// Fetches the single object matching the restrictions
    pub async fn get_obj<T: Queryable>(
        &self,
        project: &Project,
        restrictions: &[Restriction],
    ) -> Result<T> {
        let uri = self.get_obj_uri::<T>(project, restrictions).await?;
        self.get_obj_by_uri(&uri).await
    }
}

/// Extracts the project id of a metadata object URI
///
/// Matches `/gdc/md/{projectId}/obj/{objId}`.
pub fn project_id_of_obj_uri(obj_uri: &str) -> Result<String> {
    uri::match_template(OBJ_URI_TEMPLATE, obj_uri)
        .and_then(|mut values| values.remove("projectId"))
        .ok_or_else(|| {
            GoodDataError::Validation(format!("not a metadata object URI: {obj_uri}"))
        })
}

fn project_id(project: &Project) -> Result<&str> {
    project
        .id()
        .ok_or_else(|| GoodDataError::Validation("project has no id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_of_obj_uri() {
        let id = project_id_of_obj_uri("/gdc/md/b27pwwvlz5fnvdpiy4w3q257t1yvbw18/obj/42447")
            .unwrap();
        assert_eq!(id, "b27pwwvlz5fnvdpiy4w3q257t1yvbw18");
    }

    #[test]
    fn test_project_id_of_non_obj_uri_fails() {
        let result = project_id_of_obj_uri("/gdc/projects/p1");
        assert!(matches!(result, Err(GoodDataError::Validation(_))));
    }
}
