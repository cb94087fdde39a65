use super::{ApiClient, ApiResult, MessageResponse, User, UserPayload};

impl ApiClient {
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get("/users/").await
    }

    pub async fn get_user(&self, id: i64) -> ApiResult<User> {
        self.get(&format!("/users/{id}")).await
    }

    pub async fn create_user(&self, user: &UserPayload) -> ApiResult<MessageResponse> {
        self.post("/users/", user).await
    }

    pub async fn update_user(&self, id: i64, user: &UserPayload) -> ApiResult<MessageResponse> {
        self.put(&format!("/users/{id}"), user).await
    }

    pub async fn delete_user(&self, id: i64) -> ApiResult<MessageResponse> {
        self.delete(&format!("/users/{id}")).await
    }
}
