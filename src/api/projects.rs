use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiResult, Items, MessageResponse, Project, ProjectPayload};

#[derive(Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

impl ApiClient {
    pub async fn list_projects(&self, params: &[(&str, &str)]) -> ApiResult<Vec<Project>> {
        let page: Items<Project> = self.get_with("/projects", params).await?;
        Ok(page.items)
    }

    pub async fn get_project(&self, id: i64) -> ApiResult<Project> {
        let envelope: ProjectEnvelope = self.get(&format!("/projects/{id}")).await?;
        Ok(envelope.project)
    }

    pub async fn create_project(&self, project: &ProjectPayload) -> ApiResult<Project> {
        self.post("/projects", project).await
    }

    pub async fn update_project(&self, id: i64, project: &ProjectPayload) -> ApiResult<MessageResponse> {
        self.put(&format!("/projects/{id}"), project).await
    }

    pub async fn delete_project(&self, id: i64) -> ApiResult<MessageResponse> {
        self.delete(&format!("/projects/{id}")).await
    }

    pub async fn update_project_status(&self, id: i64, status: &str) -> ApiResult<MessageResponse> {
        self.patch(&format!("/projects/{id}/status"), &json!({ "status": status }))
            .await
    }
}
