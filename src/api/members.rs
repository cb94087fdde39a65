use serde_json::json;

use super::{ApiClient, ApiResult, Invitation, InvitationAction, MessageResponse};

pub const DEFAULT_MEMBER_ROLE: &str = "collaborator";

impl ApiClient {
    pub async fn invite_member(&self, project_id: i64, email: &str, role: &str) -> ApiResult<MessageResponse> {
        self.post(
            &format!("/members/projects/{project_id}/invite"),
            &json!({ "email": email, "role": role }),
        )
        .await
    }

    pub async fn remove_member(&self, project_id: i64, user_id: i64) -> ApiResult<MessageResponse> {
        self.post(
            &format!("/members/projects/{project_id}/remove"),
            &json!({ "user_id": user_id }),
        )
        .await
    }

    pub async fn respond_invitation(&self, project_id: i64, action: InvitationAction) -> ApiResult<MessageResponse> {
        self.post(
            &format!("/members/projects/{project_id}/respond"),
            &json!({ "action": action }),
        )
        .await
    }

    pub async fn pending_invitations(&self) -> ApiResult<Vec<Invitation>> {
        self.get_list("/members/invitations/pending", &[]).await
    }
}
