use crate::models::{Participant, User, UserRole};
use crate::session::SessionState;
use std::fmt::Write;

pub fn render_participants(viewer: &User, state: &SessionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Participants ({})", state.participants.len());

    if state.participants.is_empty() {
        out.push_str("  No participants yet.\n");
        return out;
    }

    for participant in &state.participants {
        let you = if participant.id == viewer.id { " (you)" } else { "" };
        let _ = writeln!(
            out,
            "  [{}] {}{} - {}{}",
            participant.initial(),
            participant.username,
            you,
            participant.role,
            voting_status(participant, state.votes_revealed)
                .map(|s| format!(" | {}", s))
                .unwrap_or_default()
        );
    }
    out
}

// Admins and observers never vote, so they get no status
fn voting_status(participant: &Participant, votes_revealed: bool) -> Option<String> {
    if participant.role != UserRole::Voter {
        return None;
    }
    if votes_revealed {
        return Some(participant.vote.clone().unwrap_or_else(|| "-".to_string()));
    }
    Some(if participant.has_voted { "voted" } else { "thinking" }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, role: UserRole) -> User {
        User {
            id: format!("id-{}", name),
            username: name.to_string(),
            role,
        }
    }

    #[test]
    fn hides_votes_until_revealed() {
        let vic = user("vic", UserRole::Voter);
        let ada = user("ada", UserRole::Admin);
        let mut state = SessionState::default();
        state.add_participant(&ada);
        state.add_participant(&vic);
        state.add_participant(&user("val", UserRole::Voter));
        state.start_new_story("US-1");
        state.cast_vote(&vic.id, "8");

        let hidden = render_participants(&ada, &state);
        assert!(hidden.contains("Participants (3)"));
        assert!(hidden.contains("[V] vic - voter | voted"));
        assert!(hidden.contains("val - voter | thinking"));
        assert!(hidden.contains("ada (you) - admin\n"));
        assert!(!hidden.contains("| 8"));

        state.reveal_votes();
        let shown = render_participants(&ada, &state);
        assert!(shown.contains("vic - voter | 8"));
        assert!(shown.contains("val - voter | -"));
    }

    #[test]
    fn empty_room() {
        let screen = render_participants(&user("ada", UserRole::Admin), &SessionState::default());
        assert!(screen.contains("No participants yet."));
    }
}
