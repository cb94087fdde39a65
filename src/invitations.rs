use crate::api::{Invitation, InvitationAction};

/// Pending invitations as shown in the notification bell and the dashboard
/// panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationList {
    invitations: Vec<Invitation>,
    /// Project whose response is in flight; its buttons are disabled.
    processing: Option<i64>,
    open: bool,
}

impl InvitationList {
    pub fn new(invitations: Vec<Invitation>) -> Self {
        Self {
            invitations,
            ..Default::default()
        }
    }

    pub fn invitations(&self) -> &[Invitation] {
        &self.invitations
    }

    pub fn len(&self) -> usize {
        self.invitations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn replace(&mut self, invitations: Vec<Invitation>) {
        self.invitations = invitations;
    }

    pub fn is_processing(&self, project_id: i64) -> bool {
        self.processing == Some(project_id)
    }

    /// Marks a response as started. Returns `false` if one is already in
    /// flight for that project.
    pub fn begin(&mut self, project_id: i64) -> bool {
        if self.is_processing(project_id) {
            return false;
        }
        self.processing = Some(project_id);
        true
    }

    /// The server accepted the response: drop exactly that project's
    /// invitation, and close the dropdown once nothing is left.
    pub fn responded(&mut self, project_id: i64) {
        self.invitations.retain(|invitation| invitation.project_id != project_id);
        self.processing = None;

        if self.invitations.is_empty() {
            self.open = false;
        }
    }

    pub fn failed(&mut self) {
        self.processing = None;
    }
}

pub fn response_message(action: InvitationAction) -> &'static str {
    match action {
        InvitationAction::Accept => "Invitation accepted! The project is now in your projects list.",
        InvitationAction::Decline => "Invitation declined.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(id: i64, project_id: i64) -> Invitation {
        Invitation {
            id,
            project_id,
            project_name: format!("Project {project_id}"),
            project_description: None,
            owner_name: "Owner".into(),
            role: "collaborator".into(),
        }
    }

    #[test]
    fn responding_removes_only_that_project() {
        let mut list = InvitationList::new(vec![invitation(1, 10), invitation(2, 20), invitation(3, 30)]);
        list.toggle();

        assert!(list.begin(20));
        assert!(list.is_processing(20));
        assert!(!list.begin(20));

        list.responded(20);

        assert_eq!(list.invitations().iter().map(|i| i.project_id).collect::<Vec<_>>(), vec![10, 30]);
        assert!(!list.is_processing(20));
        assert!(list.is_open());
    }

    #[test]
    fn last_response_closes_dropdown() {
        let mut list = InvitationList::new(vec![invitation(1, 10)]);
        list.toggle();

        list.begin(10);
        list.responded(10);

        assert!(list.is_empty());
        assert!(!list.is_open());
    }

    #[test]
    fn failure_keeps_invitation() {
        let mut list = InvitationList::new(vec![invitation(1, 10)]);
        list.begin(10);
        list.failed();

        assert_eq!(list.len(), 1);
        assert!(!list.is_processing(10));
    }
}
