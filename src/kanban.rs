//! Kanban board state.
//!
//! Each task has a committed status (last fetch or confirmed write) and may
//! carry a pending override set while a card is dragged. Column membership is
//! decided by the effective status only, so a task is always in exactly one
//! column. Overrides collapse back to committed once the write is confirmed
//! or fails.

use std::collections::HashMap;

use itertools::Itertools;

use crate::api::{
    ApiClient, ApiErr, ApiResult, Member, Project, Task, TaskPayload, TaskStatus, User,
};

/// What a dragged card is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Task(i64),
    Column(TaskStatus),
    None,
}

/// A status write the board wants persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStatus {
    pub task_id: i64,
    pub status: TaskStatus,
}

/// How a drop ended once the server answered.
#[derive(Debug, Clone, PartialEq)]
pub enum DropSettlement {
    Persisted(PersistStatus),
    /// The write failed; this is the server's list as refetched.
    Reloaded(Vec<Task>),
    /// The write failed and so did the refetch.
    ReloadFailed(ApiErr),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    committed: Vec<Task>,
    pending: HashMap<i64, TaskStatus>,
    active: Option<i64>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            committed: tasks,
            ..Default::default()
        }
    }

    /// Last fetch wins: overrides are dropped along with the old list.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.committed = tasks;
        self.pending.clear();

        if let Some(id) = self.active {
            if !self.contains(id) {
                self.active = None;
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.committed.iter().any(|task| task.id == id)
    }

    pub fn status_of(&self, id: i64) -> Option<TaskStatus> {
        self.pending.get(&id).copied().or_else(|| {
            self.committed
                .iter()
                .find(|task| task.id == id)
                .map(|task| task.status)
        })
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.contains_key(&id)
    }

    /// All tasks as displayed, in fetch order.
    pub fn tasks(&self) -> Vec<Task> {
        self.committed.iter().map(|task| self.effective(task)).collect()
    }

    /// The tasks of one column, in fetch order.
    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.committed
            .iter()
            .map(|task| self.effective(task))
            .filter(|task| task.status == status)
            .collect()
    }

    /// The cards a column renders. While a card is hovered over another
    /// column its committed copy stays here as the drag source, so the
    /// element that started the drag is never unmounted mid-drag.
    pub fn rendered_column(&self, status: TaskStatus) -> Vec<Task> {
        self.committed
            .iter()
            .filter(|task| {
                let source = self.active == Some(task.id) && task.status == status;
                source || self.effective(task).status == status
            })
            .map(|task| self.effective(task))
            .collect()
    }

    /// Whether `id` is the dragged card's source copy in `status`'s column.
    pub fn is_drag_source(&self, id: i64, status: TaskStatus) -> bool {
        self.active == Some(id) && self.status_of(id) != Some(status)
    }

    pub fn counts(&self) -> HashMap<TaskStatus, usize> {
        let mut counts = self
            .committed
            .iter()
            .map(|task| self.effective(task).status)
            .counts();

        for column in TaskStatus::COLUMNS {
            counts.entry(column).or_insert(0);
        }

        counts
    }

    pub fn active(&self) -> Option<Task> {
        let id = self.active?;
        self.committed
            .iter()
            .find(|task| task.id == id)
            .map(|task| self.effective(task))
    }

    pub fn drag_start(&mut self, id: i64) {
        if self.contains(id) {
            self.active = Some(id);
        }
    }

    /// The status a card dropped on `target` should end up with.
    pub fn resolve(&self, target: DropTarget) -> Option<TaskStatus> {
        match target {
            DropTarget::Task(id) => self.status_of(id),
            DropTarget::Column(status) => Some(status),
            DropTarget::None => None,
        }
    }

    /// Whether hovering `target` would move the dragged card.
    pub fn would_move(&self, target: DropTarget) -> bool {
        match (self.active, self.resolve(target)) {
            (Some(id), Some(status)) => self.status_of(id) != Some(status),
            _ => false,
        }
    }

    /// Optimistically moves the dragged card to the target's column. Returns
    /// whether anything changed. No request is made here.
    pub fn drag_over(&mut self, target: DropTarget) -> bool {
        if !self.would_move(target) {
            return false;
        }

        let (Some(id), Some(status)) = (self.active, self.resolve(target)) else {
            return false;
        };

        self.set_pending(id, status);
        true
    }

    /// Finishes the drag. The active marker is always cleared. A drop on a
    /// recognized target yields the single write to perform; a drop on
    /// nothing reverts the card to its committed column.
    pub fn drag_end(&mut self, target: DropTarget) -> Option<PersistStatus> {
        let id = self.active.take()?;

        let Some(status) = self.resolve(target) else {
            self.pending.remove(&id);
            return None;
        };

        self.set_pending(id, status);

        Some(PersistStatus { task_id: id, status })
    }

    pub fn cancel_drag(&mut self) {
        if let Some(id) = self.active.take() {
            self.pending.remove(&id);
        }
    }

    pub fn persist_succeeded(&mut self, change: PersistStatus) {
        if let Some(task) = self.committed.iter_mut().find(|task| task.id == change.task_id) {
            task.status = change.status;
        }

        if self.pending.get(&change.task_id) == Some(&change.status) {
            self.pending.remove(&change.task_id);
        }
    }

    /// Drops every optimistic change; the caller refetches.
    pub fn persist_failed(&mut self) {
        self.pending.clear();
    }

    pub fn settle(&mut self, settlement: DropSettlement) {
        match settlement {
            DropSettlement::Persisted(change) => self.persist_succeeded(change),
            DropSettlement::Reloaded(tasks) => self.replace_tasks(tasks),
            DropSettlement::ReloadFailed(_) => self.persist_failed(),
        }
    }

    fn set_pending(&mut self, id: i64, status: TaskStatus) {
        let committed = self
            .committed
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.status);

        if committed == Some(status) {
            self.pending.remove(&id);
        } else {
            self.pending.insert(id, status);
        }
    }

    fn effective(&self, task: &Task) -> Task {
        match self.pending.get(&task.id) {
            Some(status) => Task {
                status: *status,
                ..task.clone()
            },
            None => task.clone(),
        }
    }
}

/// Writes a dropped card's status. On failure the optimistic state is not
/// patched up by hand: the authoritative list is fetched again.
pub async fn persist_drop(api: &ApiClient, project_id: i64, change: PersistStatus) -> DropSettlement {
    match api
        .update_task(change.task_id, &TaskPayload::status(change.status))
        .await
    {
        Ok(_) => DropSettlement::Persisted(change),
        Err(e) => {
            leptos::logging::error!("Error updating task: {e}");

            match api.project_tasks(project_id).await {
                Ok(tasks) => DropSettlement::Reloaded(tasks),
                Err(e) => {
                    leptos::logging::error!("Error fetching tasks: {e}");
                    DropSettlement::ReloadFailed(e)
                }
            }
        }
    }
}

pub const TITLE_REQUIRED: &str = "Task title is required";

/// The add/edit task modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    /// Raw `<select>` value; empty means unassigned.
    pub assignee_id: String,
    pub description: String,
}

impl TaskForm {
    pub fn edit(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            assignee_id: task.assignee_id.map(|id| id.to_string()).unwrap_or_default(),
            description: task.description.clone().unwrap_or_default(),
        }
    }

    fn assignee(&self, members: &[Member]) -> ApiResult<Option<i64>> {
        let raw = self.assignee_id.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let id = raw
            .parse::<i64>()
            .ok()
            .filter(|id| members.iter().any(|member| member.id == *id))
            .ok_or_else(|| ApiErr::Validation("Assignee must be a project member".to_string()))?;

        Ok(Some(id))
    }

    fn checked_title(&self) -> ApiResult<String> {
        if self.title.trim().is_empty() {
            return Err(ApiErr::Validation(TITLE_REQUIRED.to_string()));
        }
        Ok(self.title.clone())
    }

    /// Body for a new task; new tasks always start in the first column.
    pub fn create_payload(&self, project_id: i64, members: &[Member]) -> ApiResult<TaskPayload> {
        Ok(TaskPayload {
            title: Some(self.checked_title()?),
            description: Some(self.description.clone()),
            assignee_id: self.assignee(members)?,
            project_id: Some(project_id),
            status: Some(TaskStatus::COLUMNS[0]),
        })
    }

    pub fn update_payload(&self, members: &[Member]) -> ApiResult<TaskPayload> {
        Ok(TaskPayload {
            title: Some(self.checked_title()?),
            description: Some(self.description.clone()),
            assignee_id: self.assignee(members)?,
            ..Default::default()
        })
    }
}

/// What the signed-in user may do on a project page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub can_edit: bool,
    pub can_drag: bool,
}

impl Permissions {
    pub fn for_project(user: Option<&User>, project: &Project) -> Self {
        let Some(user) = user else {
            return Self::default();
        };

        let can_edit = project.is_owned_by(user) || user.is_admin();
        let can_drag = can_edit || project.has_accepted_member(user);

        Self { can_edit, can_drag }
    }

    pub fn read_only(&self) -> bool {
        !self.can_edit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MemberStatus, Role};

    fn task(id: i64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status,
            assignee_id: None,
            assignee: None,
            project_id: Some(1),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn every_task_is_in_exactly_one_column() {
        let board = Board::new(vec![
            task(1, TaskStatus::ToDo),
            task(2, TaskStatus::Done),
            task(3, TaskStatus::ToDo),
            task(4, TaskStatus::InProgress),
        ]);

        let total: usize = TaskStatus::COLUMNS.iter().map(|c| board.column(*c).len()).sum();
        assert_eq!(total, 4);
        for t in board.tasks() {
            let homes = TaskStatus::COLUMNS
                .iter()
                .filter(|c| board.column(**c).iter().any(|x| x.id == t.id))
                .count();
            assert_eq!(homes, 1);
        }
        assert_eq!(ids(&board.column(TaskStatus::ToDo)), vec![1, 3]);
        assert_eq!(board.counts()[&TaskStatus::InProgress], 1);
    }

    #[test]
    fn dragging_onto_a_task_takes_its_status() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::Done)]);

        board.drag_start(1);
        assert!(board.drag_over(DropTarget::Task(2)));
        assert_eq!(board.status_of(1), Some(TaskStatus::Done));
        assert!(board.column(TaskStatus::ToDo).is_empty());

        let change = board.drag_end(DropTarget::Task(2));
        assert_eq!(change, Some(PersistStatus { task_id: 1, status: TaskStatus::Done }));
        assert_eq!(board.active(), None);
    }

    #[test]
    fn dragging_onto_an_empty_column_uses_the_column_key() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo)]);

        board.drag_start(1);
        board.drag_over(DropTarget::Column(TaskStatus::InProgress));
        let change = board.drag_end(DropTarget::Column(TaskStatus::InProgress));

        assert_eq!(change, Some(PersistStatus { task_id: 1, status: TaskStatus::InProgress }));
        assert_eq!(ids(&board.column(TaskStatus::InProgress)), vec![1]);
    }

    #[test]
    fn drag_source_stays_rendered_until_the_drag_ends() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::Done)]);

        board.drag_start(1);
        board.drag_over(DropTarget::Task(2));

        assert_eq!(ids(&board.rendered_column(TaskStatus::ToDo)), vec![1]);
        assert_eq!(ids(&board.rendered_column(TaskStatus::Done)), vec![1, 2]);
        assert!(board.is_drag_source(1, TaskStatus::ToDo));
        assert!(!board.is_drag_source(1, TaskStatus::Done));
        assert!(board.column(TaskStatus::ToDo).is_empty());

        board.cancel_drag();
        assert_eq!(ids(&board.rendered_column(TaskStatus::ToDo)), vec![1]);
        assert_eq!(ids(&board.rendered_column(TaskStatus::Done)), vec![2]);
        assert!(!board.is_drag_source(1, TaskStatus::ToDo));
    }

    #[test]
    fn dropping_on_nothing_changes_nothing() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::Done)]);

        board.drag_start(1);
        board.drag_over(DropTarget::Task(2));
        assert_eq!(board.drag_end(DropTarget::None), None);

        assert_eq!(board.status_of(1), Some(TaskStatus::ToDo));
        assert_eq!(board.active(), None);
        assert!(!board.is_pending(1));
    }

    #[test]
    fn drag_over_without_active_card_is_ignored() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo)]);
        assert!(!board.drag_over(DropTarget::Column(TaskStatus::Done)));
        assert_eq!(board.drag_end(DropTarget::Column(TaskStatus::Done)), None);

        board.drag_start(99);
        assert_eq!(board.active(), None);
    }

    #[test]
    fn dropping_in_the_same_column_still_persists_once() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::ToDo)]);

        board.drag_start(2);
        assert!(!board.drag_over(DropTarget::Task(1)));
        let change = board.drag_end(DropTarget::Task(1));

        assert_eq!(change, Some(PersistStatus { task_id: 2, status: TaskStatus::ToDo }));
        assert!(!board.is_pending(2));
    }

    #[test]
    fn confirmed_write_becomes_committed() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo)]);
        board.drag_start(1);
        let change = board.drag_end(DropTarget::Column(TaskStatus::Done)).unwrap();
        assert!(board.is_pending(1));

        board.settle(DropSettlement::Persisted(change));

        assert!(!board.is_pending(1));
        assert_eq!(board.status_of(1), Some(TaskStatus::Done));
    }

    #[test]
    fn failed_write_shows_exactly_the_refetched_list() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::Done)]);
        board.drag_start(1);
        board.drag_over(DropTarget::Task(2));
        board.drag_end(DropTarget::Task(2));

        let server = vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::InProgress), task(5, TaskStatus::Done)];
        board.settle(DropSettlement::Reloaded(server.clone()));

        assert_eq!(board.tasks(), server);
    }

    #[test]
    fn failed_write_without_refetch_reverts_to_committed() {
        let mut board = Board::new(vec![task(1, TaskStatus::ToDo)]);
        board.drag_start(1);
        board.drag_end(DropTarget::Column(TaskStatus::Done));

        board.settle(DropSettlement::ReloadFailed(ApiErr::Transport("offline".into())));

        assert_eq!(board.status_of(1), Some(TaskStatus::ToDo));
    }

    fn members() -> Vec<Member> {
        vec![Member { id: 7, name: "Ada".into(), email: "ada@example.com".into(), status: MemberStatus::Accepted }]
    }

    #[test]
    fn task_form_requires_title() {
        let form = TaskForm { title: "   ".into(), ..Default::default() };
        assert_eq!(
            form.create_payload(1, &members()),
            Err(ApiErr::Validation(TITLE_REQUIRED.into()))
        );
    }

    #[test]
    fn new_tasks_start_in_first_column() {
        let form = TaskForm { title: "Write README".into(), assignee_id: "7".into(), description: "intro".into() };
        let payload = form.create_payload(3, &members()).unwrap();

        assert_eq!(payload.status, Some(TaskStatus::ToDo));
        assert_eq!(payload.project_id, Some(3));
        assert_eq!(payload.assignee_id, Some(7));
    }

    #[test]
    fn assignee_must_be_a_member() {
        let form = TaskForm { title: "x".into(), assignee_id: "8".into(), description: String::new() };
        assert!(form.update_payload(&members()).is_err());

        let form = TaskForm { assignee_id: String::new(), ..form };
        assert_eq!(form.update_payload(&members()).unwrap().assignee_id, None);
    }

    #[test]
    fn permissions() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "P", "owner_id": 1,
            "members": [
                { "id": 2, "status": "accepted" },
                { "id": 3, "status": "pending" }
            ]
        }))
        .unwrap();
        let user = |id, role| User { id, name: String::new(), email: String::new(), role, two_factor_enabled: false };

        let owner = Permissions::for_project(Some(&user(1, Role::Student)), &project);
        assert_eq!(owner, Permissions { can_edit: true, can_drag: true });

        let admin = Permissions::for_project(Some(&user(9, Role::Admin)), &project);
        assert!(admin.can_edit && admin.can_drag);

        let collaborator = Permissions::for_project(Some(&user(2, Role::Student)), &project);
        assert_eq!(collaborator, Permissions { can_edit: false, can_drag: true });
        assert!(collaborator.read_only());

        let invitee = Permissions::for_project(Some(&user(3, Role::Student)), &project);
        assert_eq!(invitee, Permissions::default());

        assert_eq!(Permissions::for_project(None, &project), Permissions::default());
    }
}
