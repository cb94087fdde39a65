use super::{ApiClient, ApiResult, Class, ClassPayload, MessageResponse, User};

impl ApiClient {
    pub async fn list_classes(&self, params: &[(&str, &str)]) -> ApiResult<Vec<Class>> {
        self.get_list("/classes/", params).await
    }

    pub async fn get_class(&self, id: i64) -> ApiResult<Class> {
        self.get(&format!("/classes/{id}")).await
    }

    pub async fn create_class(&self, class: &ClassPayload) -> ApiResult<MessageResponse> {
        self.post("/classes/", class).await
    }

    pub async fn update_class(&self, id: i64, class: &ClassPayload) -> ApiResult<MessageResponse> {
        self.put(&format!("/classes/{id}"), class).await
    }

    pub async fn delete_class(&self, id: i64) -> ApiResult<MessageResponse> {
        self.delete(&format!("/classes/{id}")).await
    }

    pub async fn class_students(&self, id: i64) -> ApiResult<Vec<User>> {
        self.get(&format!("/classes/{id}/students")).await
    }
}
