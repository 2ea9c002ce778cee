use super::Notice;
use crate::app::PokerApp;
use crate::error::SessionError;
use crate::models::UserRole;
use crate::session::RoundPhase;
use crate::validation::StoryForm;
use log::{info, warn};

fn require_admin(app: &PokerApp) -> Result<(), Notice> {
    match app.user() {
        Some(user) if user.role == UserRole::Admin => Ok(()),
        _ => Err(Notice::destructive("Admins only", "Only the admin can manage the session.")),
    }
}

pub async fn handle_start_story(app: &mut PokerApp, story_name: String) -> Result<Vec<Notice>, SessionError> {
    if let Err(notice) = require_admin(app) {
        return Ok(vec![notice]);
    }
    let story_name = match (StoryForm { story_name }).validate() {
        Ok(name) => name,
        Err(e) => return Ok(vec![Notice::destructive("Invalid story", e.to_string())]),
    };
    let Some(session) = app.session_mut() else {
        return Ok(Vec::new());
    };

    session.start_new_story(&story_name).await?;
    info!("Started story '{}'", story_name);
    Ok(vec![Notice::info(
        "New Story Started",
        format!("Voting for \"{}\" is now open.", story_name),
    )])
}

pub async fn handle_reveal(app: &mut PokerApp) -> Result<Vec<Notice>, SessionError> {
    if let Err(notice) = require_admin(app) {
        return Ok(vec![notice]);
    }
    let Some(session) = app.session_mut() else {
        return Ok(Vec::new());
    };
    let Some(story_name) = session.state().story_name.clone() else {
        return Ok(vec![Notice::destructive("Error", "Please start a story first.")]);
    };

    match session.state().phase() {
        RoundPhase::Revealed => Ok(vec![Notice::info(
            "Votes Already Revealed",
            "Votes for this round are already visible.",
        )]),
        RoundPhase::Voting => {
            session.reveal_votes().await?;
            Ok(vec![Notice::info(
                "Votes Revealed!",
                format!("Results for \"{}\" are now visible.", story_name),
            )])
        }
        RoundPhase::Idle => Ok(vec![Notice::destructive(
            "Cannot Reveal",
            "Voting is not open or votes already revealed.",
        )]),
    }
}

pub async fn handle_reset(app: &mut PokerApp) -> Result<Vec<Notice>, SessionError> {
    if let Err(notice) = require_admin(app) {
        return Ok(vec![notice]);
    }
    let Some(session) = app.session_mut() else {
        return Ok(Vec::new());
    };
    let Some(story_name) = session.state().story_name.clone() else {
        return Ok(vec![Notice::destructive("Error", "No active story to reset.")]);
    };
    // Reset only becomes available once voting has closed
    if session.state().voting_open {
        return Ok(vec![Notice::destructive(
            "Cannot Reset",
            "Voting is still open. Reveal the votes first.",
        )]);
    }

    session.reset_round().await?;
    Ok(vec![Notice::info(
        "Round Reset",
        format!("Voting for \"{}\" has been reset.", story_name),
    )])
}

pub async fn handle_kick(app: &mut PokerApp, who: &str) -> Result<Vec<Notice>, SessionError> {
    if let Err(notice) = require_admin(app) {
        return Ok(vec![notice]);
    }
    let Some(session) = app.session_mut() else {
        return Ok(Vec::new());
    };

    // Match on id first, then on a case-insensitive username
    let target = session
        .state()
        .participants
        .iter()
        .find(|p| p.id == who)
        .or_else(|| {
            session
                .state()
                .participants
                .iter()
                .find(|p| p.username.eq_ignore_ascii_case(who))
        })
        .map(|p| (p.id.clone(), p.username.clone()));

    match target {
        Some((id, username)) => {
            session.remove_participant(&id).await?;
            Ok(vec![Notice::info("Participant Removed", format!("{} left the session.", username))])
        }
        None => {
            warn!("Kick requested for unknown participant '{}'", who);
            Ok(vec![Notice::destructive("Not found", format!("No participant named \"{}\".", who))])
        }
    }
}
