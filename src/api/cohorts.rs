use super::{ApiClient, ApiResult, Cohort, CohortPayload, Items, MessageResponse};

impl ApiClient {
    pub async fn list_cohorts(&self, params: &[(&str, &str)]) -> ApiResult<Vec<Cohort>> {
        let page: Items<Cohort> = self.get_with("/cohorts/", params).await?;
        Ok(page.items)
    }

    pub async fn create_cohort(&self, cohort: &CohortPayload) -> ApiResult<MessageResponse> {
        self.post("/cohorts/", cohort).await
    }

    pub async fn update_cohort(&self, id: i64, cohort: &CohortPayload) -> ApiResult<MessageResponse> {
        self.put(&format!("/cohorts/{id}"), cohort).await
    }

    pub async fn delete_cohort(&self, id: i64) -> ApiResult<MessageResponse> {
        self.delete(&format!("/cohorts/{id}")).await
    }

    pub async fn join_cohort(&self, id: i64) -> ApiResult<MessageResponse> {
        self.post_empty(&format!("/cohorts/{id}/join")).await
    }
}
