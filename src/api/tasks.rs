use serde::Deserialize;

use super::{ApiClient, ApiResult, MessageResponse, Task, TaskPayload};

#[derive(Deserialize)]
struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl ApiClient {
    pub async fn list_tasks(&self) -> ApiResult<serde_json::Value> {
        self.get("/tasks/").await
    }

    pub async fn get_task(&self, id: i64) -> ApiResult<Task> {
        self.get(&format!("/tasks/{id}")).await
    }

    /// All tasks of a project, in the order the server returns them.
    pub async fn project_tasks(&self, project_id: i64) -> ApiResult<Vec<Task>> {
        let list: Option<TaskList> = self.get(&format!("/tasks/project/{project_id}")).await?;
        Ok(list.map(|list| list.tasks).unwrap_or_default())
    }

    pub async fn create_task(&self, task: &TaskPayload) -> ApiResult<serde_json::Value> {
        self.post("/tasks/", task).await
    }

    pub async fn update_task(&self, id: i64, task: &TaskPayload) -> ApiResult<serde_json::Value> {
        self.put(&format!("/tasks/{id}"), task).await
    }

    pub async fn delete_task(&self, id: i64) -> ApiResult<MessageResponse> {
        self.delete(&format!("/tasks/{id}")).await
    }
}
