//! Who may see which message or report, and which actions need the admin role.
//!
//! Every predicate takes the [`Viewer`] explicitly. Nothing here touches the
//! database; the same rules are mirrored as SQL filters by [`MESSAGE_VISIBLE_SQL`]
//! so list and detail queries never return rows the viewer cannot read.

use crate::{
    auth::Viewer,
    db::{Message, Role, VisitReport},
};

/// Visibility filter for `messages m`, binding the viewer id twice.
pub const MESSAGE_VISIBLE_SQL: &str = "(m.is_broadcast = 1 OR m.recipient_id = ? OR m.sender_id = ?)";

pub fn is_admin(viewer: &Viewer) -> bool {
    viewer.role == Role::Admin
}

pub fn can_view_message(viewer: &Viewer, message: &Message) -> bool {
    message.is_broadcast
        || message.recipient_id == Some(viewer.id)
        || message.sender_id == viewer.id
}

pub fn can_compose_broadcast(viewer: &Viewer) -> bool {
    is_admin(viewer)
}

/// Reports are readable by every signed-in volunteer.
pub fn can_view_report(_viewer: &Viewer, _report: &VisitReport) -> bool {
    true
}

/// Which reports, besides the viewer's own, the reports page lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Others,
}

impl ReportScope {
    pub fn for_viewer(viewer: &Viewer) -> Self {
        if is_admin(viewer) {
            ReportScope::All
        } else {
            ReportScope::Others
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            ReportScope::All => "All reports",
            ReportScope::Others => "Other volunteers' reports",
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    fn viewer(role: Role) -> Viewer {
        Viewer {
            id: Uuid::now_v7(),
            email: format!("{}@example.org", Uuid::now_v7().simple()),
            full_name: None,
            role,
        }
    }

    fn message(sender: Uuid, recipient: Option<Uuid>) -> Message {
        Message {
            id: Uuid::now_v7(),
            sender_id: sender,
            recipient_id: recipient,
            subject: "Meeting Friday".into(),
            content: "See you there".into(),
            is_broadcast: recipient.is_none(),
            read_at: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn broadcast_is_visible_to_everyone() {
        let admin = viewer(Role::Admin);
        let broadcast = message(admin.id, None);
        for v in [viewer(Role::Volunteer), viewer(Role::Volunteer), admin.clone()] {
            assert!(can_view_message(&v, &broadcast));
        }
    }

    #[test]
    fn direct_message_is_visible_only_to_its_two_ends() {
        let sender = viewer(Role::Admin);
        let recipient = viewer(Role::Volunteer);
        let bystander = viewer(Role::Volunteer);
        let other_admin = viewer(Role::Admin);
        let direct = message(sender.id, Some(recipient.id));

        assert!(can_view_message(&sender, &direct));
        assert!(can_view_message(&recipient, &direct));
        assert!(!can_view_message(&bystander, &direct));
        assert!(!can_view_message(&other_admin, &direct));
    }

    #[test]
    fn visibility_matches_the_membership_rule() {
        let people: Vec<Viewer> = (0..4)
            .map(|i| viewer(if i == 0 { Role::Admin } else { Role::Volunteer }))
            .collect();
        let mut messages = Vec::new();
        for sender in &people {
            messages.push(message(sender.id, None));
            for recipient in &people {
                messages.push(message(sender.id, Some(recipient.id)));
            }
        }

        for v in &people {
            for m in &messages {
                let expected = m.is_broadcast || v.id == m.sender_id || Some(v.id) == m.recipient_id;
                assert_eq!(can_view_message(v, m), expected);
            }
        }
    }

    #[test]
    fn only_admins_compose_broadcasts() {
        assert!(can_compose_broadcast(&viewer(Role::Admin)));
        assert!(!can_compose_broadcast(&viewer(Role::Volunteer)));
    }

    #[test]
    fn report_scope_follows_role() {
        assert_eq!(ReportScope::for_viewer(&viewer(Role::Admin)), ReportScope::All);
        assert_eq!(ReportScope::for_viewer(&viewer(Role::Volunteer)), ReportScope::Others);
    }
}
