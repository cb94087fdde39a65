mod auth;
mod classes;
mod client;
mod cohorts;
mod members;
mod projects;
mod tasks;
mod users;

pub use client::*;
pub use members::DEFAULT_MEMBER_ROLE;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Admin => "Admin",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub two_factor_enabled: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: MemberStatus,
}

/// A `{ id, name }` reference embedded in another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub github_link: Option<String>,
    pub cover_image: Option<String>,
    pub owner_id: i64,
    pub owner_name: Option<String>,
    pub owner: Option<NamedRef>,
    pub class_id: Option<i64>,
    pub cohort_id: Option<i64>,
    pub class: Option<NamedRef>,
    pub cohort: Option<NamedRef>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Project {
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.owner_id == user.id
    }

    pub fn has_accepted_member(&self, user: &User) -> bool {
        self.members
            .iter()
            .any(|member| member.id == user.id && member.status == MemberStatus::Accepted)
    }

    pub fn class_name(&self) -> &str {
        self.class.as_ref().map_or("", |class| class.name.as_str())
    }

    pub fn cohort_name(&self) -> &str {
        self.cohort.as_ref().map_or("", |cohort| cohort.name.as_str())
    }
}

/// The three board columns. A task's status is its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub const COLUMNS: [TaskStatus; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "To Do" => Ok(Self::ToDo),
            "In Progress" => Ok(Self::InProgress),
            "Done" => Ok(Self::Done),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assignee_id: Option<i64>,
    pub assignee: Option<NamedRef>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub track: Option<String>,
}

impl Class {
    pub fn label(&self) -> String {
        match self.track.as_deref() {
            Some(track) if !track.is_empty() => format!("{} - {}", self.name, track),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub id: i64,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A pending project membership, seen from the invitee's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default)]
    pub id: i64,
    pub project_id: i64,
    pub project_name: String,
    pub project_description: Option<String>,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
    Accept,
    Decline,
}

impl InvitationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
        }
    }
}

impl FromStr for InvitationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            _ => Err(format!("Invalid invitation action: {}", s)),
        }
    }
}

// Request payloads

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberName {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectPayload {
    pub name: String,
    pub description: String,
    pub github_link: String,
    pub class_id: Option<i64>,
    pub cohort_id: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberName>,
}

/// Task create/update body. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPayload {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassPayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CohortPayload {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub role: Role,
}

// Response envelopes

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub two_factor_enabled: bool,
    pub user_id: Option<i64>,
    pub token: Option<String>,
    pub user: Option<User>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_without_items_is_empty() {
        let page: Items<Cohort> = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());

        let page: Items<Project> = serde_json::from_str(r#"{"items": [{"id": 1, "name": "Planner", "owner_id": 4}]}"#).unwrap();
        assert_eq!(page.items[0].name, "Planner");
    }

    #[test]
    fn task_status_uses_column_keys_on_the_wire() {
        let task: Task = serde_json::from_str(
            r#"{"id": 3, "title": "Wireframes", "status": "In Progress"}"#,
        )
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.description, None);

        let body = serde_json::to_value(TaskPayload::status(TaskStatus::Done)).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "Done" }));
    }

    #[test]
    fn task_status_parse() {
        for column in TaskStatus::COLUMNS {
            assert_eq!(column.as_str().parse::<TaskStatus>().unwrap(), column);
        }
        assert!("Blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn missing_or_unknown_role_is_not_admin() {
        let user: User = serde_json::from_str(r#"{"id": 1, "name": "No Role"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(!user.is_admin());

        let user: User =
            serde_json::from_str(r#"{"id": 1, "name": "Mentor", "role": "User"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);

        let user: User = serde_json::from_str(r#"{"id": 1, "role": "Admin"}"#).unwrap();
        assert!(user.is_admin());
    }

    #[test]
    fn accepted_membership_is_required_for_collaboration() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 9,
            "name": "Planner",
            "owner_id": 1,
            "members": [
                { "id": 2, "name": "Ada", "status": "accepted" },
                { "id": 3, "name": "Lin", "status": "pending" }
            ]
        }))
        .unwrap();

        let ada = User { id: 2, name: "Ada".into(), email: String::new(), role: Role::Student, two_factor_enabled: false };
        let lin = User { id: 3, ..ada.clone() };

        assert!(project.has_accepted_member(&ada));
        assert!(!project.has_accepted_member(&lin));
        assert_eq!(project.class_name(), "");
    }

    #[test]
    fn class_label_includes_track() {
        let class = Class { id: 1, name: "SE".into(), description: None, track: Some("Full Stack".into()) };
        assert_eq!(class.label(), "SE - Full Stack");
    }
}
