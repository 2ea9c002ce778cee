mod admin;
mod vote;

use crate::app::{PokerApp, Route};
use crate::commands::Command;
use crate::error::SessionError;
use crate::validation::LoginForm;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Destructive,
}

/// Transient message shown after a command, like a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.kind == NoticeKind::Destructive
    }
}

// Route a parsed command to its handler. Invalid requests never reach the
// session; they come back as notices.
pub async fn handle_command(app: &mut PokerApp, command: Command) -> Result<Vec<Notice>, SessionError> {
    info!("Handling command {:?} on tab {}", command, app.tab());

    match (app.route(), command) {
        (_, Command::Show) | (_, Command::Help) | (_, Command::Quit) => Ok(Vec::new()),
        (Route::Loading, _) => Ok(vec![Notice::info("Loading", "Reading your identity, try again in a moment.")]),
        (Route::Login, Command::Login { username, role }) => handle_login(app, LoginForm { username, role }).await,
        (Route::Login, _) => Ok(vec![Notice::destructive(
            "Not logged in",
            "Join the session first: login <name> as <role>",
        )]),
        (Route::Room, Command::Login { .. }) => {
            let name = app.user().map(|u| u.username.clone()).unwrap_or_default();
            Ok(vec![Notice::info("Already logged in", format!("You are logged in as {}. Log out first.", name))])
        }
        (Route::Room, Command::Logout) => {
            app.leave_room().await?;
            Ok(vec![Notice::info("Logged out", "Identity and session state cleared.")])
        }
        (Route::Room, Command::Story(name)) => admin::handle_start_story(app, name).await,
        (Route::Room, Command::Reveal) => admin::handle_reveal(app).await,
        (Route::Room, Command::Reset) => admin::handle_reset(app).await,
        (Route::Room, Command::Kick(who)) => admin::handle_kick(app, &who).await,
        (Route::Room, Command::Vote(value)) => vote::handle_vote(app, &value).await,
    }
}

async fn handle_login(app: &mut PokerApp, form: LoginForm) -> Result<Vec<Notice>, SessionError> {
    let (username, role) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(errors
                .into_iter()
                .map(|e| Notice::destructive("Invalid login", e.to_string()))
                .collect());
        }
    };

    let user = app.identity_mut().login(&username, role).await?;
    app.enter_room().await?;
    Ok(vec![Notice::info("Welcome", format!("Joined as {} ({}).", user.username, user.role))])
}
