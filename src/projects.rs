//! Project forms, creation with invitations, and dashboard listing rules.

use futures::future::join_all;

use crate::{
    api::{ApiClient, ApiErr, ApiResult, MemberName, Project, ProjectPayload, User, DEFAULT_MEMBER_ROLE},
    forms::InviteList,
};

pub const CLASS_REQUIRED: &str = "Please select a class";
pub const COHORT_REQUIRED: &str = "Please select a cohort";
pub const PROJECT_NAME_REQUIRED: &str = "Project name is required";

/// The create/edit project modal. Class and cohort hold raw `<select>`
/// values; empty means nothing selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub github_link: String,
    pub class_id: String,
    pub cohort_id: String,
}

impl ProjectForm {
    pub fn edit(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            github_link: project.github_link.clone().unwrap_or_default(),
            class_id: project.class_id.map(|id| id.to_string()).unwrap_or_default(),
            cohort_id: project.cohort_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Modal rules: class and cohort must both be chosen.
    pub fn payload(&self) -> ApiResult<ProjectPayload> {
        let class_id = parse_selection(&self.class_id)
            .ok_or_else(|| ApiErr::Validation(CLASS_REQUIRED.to_string()))?;
        let cohort_id = parse_selection(&self.cohort_id)
            .ok_or_else(|| ApiErr::Validation(COHORT_REQUIRED.to_string()))?;

        Ok(ProjectPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            github_link: self.github_link.clone(),
            class_id: Some(class_id),
            cohort_id: Some(cohort_id),
            members: Vec::new(),
        })
    }

    /// Edit page rules: a name is required, class and cohort are optional,
    /// and extra member names ride along with the update.
    pub fn edit_payload(&self, member_names: &[String]) -> ApiResult<ProjectPayload> {
        if self.name.trim().is_empty() {
            return Err(ApiErr::Validation(PROJECT_NAME_REQUIRED.to_string()));
        }

        Ok(ProjectPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            github_link: self.github_link.clone(),
            class_id: parse_selection(&self.class_id),
            cohort_id: parse_selection(&self.cohort_id),
            members: member_names
                .iter()
                .map(|name| MemberName { name: name.clone() })
                .collect(),
        })
    }
}

fn parse_selection(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct InviteOutcome {
    pub email: String,
    pub result: Result<(), ApiErr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCreated {
    pub project: Project,
    pub invitations: Vec<InviteOutcome>,
}

impl ProjectCreated {
    pub fn failed_invitations(&self) -> impl Iterator<Item = &InviteOutcome> {
        self.invitations.iter().filter(|outcome| outcome.result.is_err())
    }
}

/// Creates the project, then invites every queued email concurrently.
/// Invitations are best effort: each outcome is reported on its own and none
/// of them can fail the creation.
pub async fn create_with_invitations(
    api: &ApiClient,
    form: &ProjectForm,
    invites: &InviteList,
) -> ApiResult<ProjectCreated> {
    let payload = form.payload()?;
    let project = api.create_project(&payload).await?;
    let project_id = project.id;

    let sends = invites.emails().iter().map(|email| async move {
        let result = api
            .invite_member(project_id, email, DEFAULT_MEMBER_ROLE)
            .await
            .map(|_| ());

        if let Err(e) = &result {
            leptos::logging::warn!("invitation to {email} failed: {e}");
        }

        InviteOutcome {
            email: email.clone(),
            result,
        }
    });

    let invitations = join_all(sends).await;

    Ok(ProjectCreated {
        project,
        invitations,
    })
}

pub async fn update_from_modal(api: &ApiClient, project_id: i64, form: &ProjectForm) -> ApiResult<()> {
    let payload = form.payload()?;
    api.update_project(project_id, &payload).await?;
    Ok(())
}

/// Student dashboard split: "mine" is owned plus accepted membership, in
/// that order; everything else is "others".
pub fn partition_projects(projects: Vec<Project>, user: &User) -> (Vec<Project>, Vec<Project>) {
    let (owned, rest): (Vec<_>, Vec<_>) = projects
        .into_iter()
        .partition(|project| project.is_owned_by(user));

    let (joined, others): (Vec<_>, Vec<_>) = rest
        .into_iter()
        .partition(|project| project.has_accepted_member(user));

    let mut mine = owned;
    mine.extend(joined);

    (mine, others)
}

/// Case-insensitive substring filters on class and cohort names. Empty
/// filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub class: String,
    pub cohort: String,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        contains_ci(project.class_name(), &self.class) && contains_ci(project.cohort_name(), &self.cohort)
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|project| self.matches(project)).collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;

    fn project(value: serde_json::Value) -> Project {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_class_is_reported_first() {
        let form = ProjectForm { name: "Planner".into(), ..Default::default() };
        assert_eq!(form.payload(), Err(ApiErr::Validation(CLASS_REQUIRED.into())));

        let form = ProjectForm { class_id: "2".into(), ..form };
        assert_eq!(form.payload(), Err(ApiErr::Validation(COHORT_REQUIRED.into())));

        let form = ProjectForm { cohort_id: "5".into(), ..form };
        let payload = form.payload().unwrap();
        assert_eq!((payload.class_id, payload.cohort_id), (Some(2), Some(5)));
    }

    #[test]
    fn edit_payload_needs_name_only() {
        let form = ProjectForm { name: " ".into(), ..Default::default() };
        assert_eq!(form.edit_payload(&[]), Err(ApiErr::Validation(PROJECT_NAME_REQUIRED.into())));

        let form = ProjectForm { name: "Planner".into(), ..Default::default() };
        let payload = form.edit_payload(&["Ada".to_string()]).unwrap();
        assert_eq!(payload.class_id, None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap()["members"],
            serde_json::json!([{ "name": "Ada" }])
        );
    }

    #[test]
    fn partition_puts_owned_first_then_accepted() {
        let user = User { id: 1, name: "Me".into(), email: String::new(), role: Role::Student, two_factor_enabled: false };
        let projects = vec![
            project(serde_json::json!({ "id": 10, "name": "joined", "owner_id": 2,
                "members": [{ "id": 1, "status": "accepted" }] })),
            project(serde_json::json!({ "id": 11, "name": "invited", "owner_id": 2,
                "members": [{ "id": 1, "status": "pending" }] })),
            project(serde_json::json!({ "id": 12, "name": "mine", "owner_id": 1 })),
            project(serde_json::json!({ "id": 13, "name": "theirs", "owner_id": 3 })),
        ];

        let (mine, others) = partition_projects(projects, &user);

        assert_eq!(mine.iter().map(|p| p.id).collect::<Vec<_>>(), vec![12, 10]);
        assert_eq!(others.iter().map(|p| p.id).collect::<Vec<_>>(), vec![11, 13]);
    }

    #[test]
    fn filters_are_case_insensitive_substrings() {
        let projects = vec![
            project(serde_json::json!({ "id": 1, "name": "a", "owner_id": 1,
                "class": { "name": "Software Engineering" }, "cohort": { "name": "SE-Sept" } })),
            project(serde_json::json!({ "id": 2, "name": "b", "owner_id": 1 })),
        ];

        let filter = ProjectFilter { class: "software".into(), cohort: String::new() };
        assert_eq!(filter.apply(&projects).len(), 1);

        let filter = ProjectFilter { class: String::new(), cohort: "sept".into() };
        assert_eq!(filter.apply(&projects)[0].id, 1);

        assert_eq!(ProjectFilter::default().apply(&projects).len(), 2);
    }
}
