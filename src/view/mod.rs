//! Plain-text rendering of the login screen and the poker room.

mod participants;
mod results;

pub use participants::render_participants;
pub use results::render_results;

use crate::app::{PokerApp, Route};
use crate::handlers::Notice;
use crate::models::{User, UserRole, POKER_VALUES};
use crate::session::{RoundPhase, SessionState};
use std::fmt::Write;

pub fn render(app: &PokerApp) -> String {
    match (app.route(), app.user(), app.session()) {
        (Route::Room, Some(user), Some(session)) => render_room(user, session.state()),
        (Route::Loading, _, _) => "Loading...\n".to_string(),
        _ => render_login(),
    }
}

pub fn render_login() -> String {
    let roles: Vec<String> = UserRole::ALL.iter().map(|r| r.to_string()).collect();
    format!(
        "== Scrum Point ==\nEnter your name and select your role to join.\n  login <name> as <{}>\n",
        roles.join("|")
    )
}

pub fn render_notice(notice: &Notice) -> String {
    let marker = if notice.is_destructive() { "!!" } else { "--" };
    format!("{} {}: {}", marker, notice.title, notice.description)
}

pub fn render_room(user: &User, state: &SessionState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Scrum Point == {} ({})", user.username, user.role);
    out.push('\n');
    out.push_str(&render_participants(user, state));
    out.push('\n');

    if user.role == UserRole::Admin {
        out.push_str("Admin controls: story <name> | reveal | reset | kick <name>\n\n");
    }

    out.push_str(&render_current_story(state));

    let phase = state.phase();
    if user.role == UserRole::Voter && phase == RoundPhase::Voting {
        out.push('\n');
        out.push_str(&render_cards(state.participant_vote(&user.id)));
    }

    if phase == RoundPhase::Revealed || (user.role == UserRole::Admin && !state.voting_open) {
        out.push('\n');
        out.push_str(&render_results(state));
    }

    match (user.role, phase) {
        (UserRole::Observer, _) => {
            out.push_str("\nYou are observing. Voting is done by voters; results appear once revealed.\n");
        }
        (UserRole::Voter, RoundPhase::Idle) => {
            let _ = writeln!(out, "\n{}", waiting_message(state));
        }
        _ => {}
    }

    out
}

fn render_current_story(state: &SessionState) -> String {
    match state.story_name.as_deref() {
        None => "No active story. The admin needs to start a new story to begin voting.\n".to_string(),
        Some(story) => {
            let status = match state.phase() {
                RoundPhase::Voting => "Voting is open.",
                RoundPhase::Revealed => "Voting is closed. Results are shown.",
                RoundPhase::Idle => "Waiting for admin to start or reveal votes.",
            };
            format!("Current story: {}\n{}\n", story, status)
        }
    }
}

// The selected card is bracketed with asterisks
fn render_cards(selected: Option<&str>) -> String {
    let cards: Vec<String> = POKER_VALUES
        .iter()
        .map(|value| {
            if Some(*value) == selected {
                format!("*[{}]*", value)
            } else {
                format!("[{}]", value)
            }
        })
        .collect();
    format!("Cast your vote (vote <card>):\n  {}\n", cards.join(" "))
}

pub(crate) fn waiting_message(state: &SessionState) -> String {
    match state.story_name.as_deref() {
        Some(story) => format!("Waiting for admin to start voting or reveal results for \"{}\".", story),
        None => "Waiting for admin to start a new story.".to_string(),
    }
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
    fn voter_sees_cards_with_selection() {
        let vic = user("vic", UserRole::Voter);
        let mut state = SessionState::default();
        state.add_participant(&vic);
        state.start_new_story("US-5");
        state.cast_vote(&vic.id, "13");

        let screen = render_room(&vic, &state);
        assert!(screen.contains("Current story: US-5"));
        assert!(screen.contains("*[13]*"));
        assert!(screen.contains("[?]"));
    }

    #[test]
    fn admin_and_observer_do_not_see_cards() {
        let mut state = SessionState::default();
        state.start_new_story("US-5");

        let admin_screen = render_room(&user("ada", UserRole::Admin), &state);
        assert!(admin_screen.contains("Admin controls"));
        assert!(!admin_screen.contains("Cast your vote"));

        let observer_screen = render_room(&user("olga", UserRole::Observer), &state);
        assert!(observer_screen.contains("You are observing"));
        assert!(!observer_screen.contains("Cast your vote"));
    }

    #[test]
    fn idle_voter_is_told_to_wait() {
        let screen = render_room(&user("vic", UserRole::Voter), &SessionState::default());
        assert!(screen.contains("Waiting for admin to start a new story."));
    }

    #[test]
    fn notices_are_marked_by_kind() {
        assert_eq!(render_notice(&Notice::info("A", "b")), "-- A: b");
        assert_eq!(render_notice(&Notice::destructive("A", "b")), "!! A: b");
    }
}
