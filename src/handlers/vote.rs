use super::Notice;
use crate::app::PokerApp;
use crate::error::SessionError;
use crate::models::{is_poker_value, UserRole, POKER_VALUES};
use crate::session::RoundPhase;

pub async fn handle_vote(app: &mut PokerApp, value: &str) -> Result<Vec<Notice>, SessionError> {
    let Some(user) = app.user().cloned() else {
        return Ok(Vec::new());
    };
    if user.role != UserRole::Voter {
        return Ok(vec![Notice::destructive("Cannot vote", "Only voters can cast votes.")]);
    }
    if !is_poker_value(value) {
        return Ok(vec![Notice::destructive(
            "Invalid card",
            format!("Pick one of: {}", POKER_VALUES.join(", ")),
        )]);
    }
    let Some(session) = app.session_mut() else {
        return Ok(Vec::new());
    };
    if session.state().phase() != RoundPhase::Voting {
        return Ok(vec![Notice::destructive("Voting closed", "Wait for the admin to open voting.")]);
    }

    let previous = session.participant_vote(&user.id).map(str::to_string);
    let changed = session.cast_vote(&user.id, value).await?;

    // Kicked, or the session was cleared from another tab
    if !changed && session.participant_vote(&user.id) != Some(value) {
        return Ok(vec![Notice::destructive(
            "Not in session",
            "You are no longer a participant. Log out and join again to vote.",
        )]);
    }

    let description = match previous {
        Some(previous) if previous != value => format!("Changed your vote from {} to {}.", previous, value),
        _ => format!("You voted {}.", value),
    };
    Ok(vec![Notice::info("Vote Cast", description)])
}
