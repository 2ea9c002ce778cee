use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref LOGIN_RE: Regex =
        Regex::new(r"(?i)^login(?:\s+(?P<name>.+?))?(?:\s+as\s+(?P<role>\w+))?\s*$").expect("login pattern");
    static ref STORY_RE: Regex = Regex::new(r"(?i)^story(?:\s+(?P<name>.*?))?\s*$").expect("story pattern");
    static ref VOTE_RE: Regex = Regex::new(r"(?i)^vote(?:\s+(?P<value>\S+))?\s*$").expect("vote pattern");
    static ref KICK_RE: Regex = Regex::new(r"(?i)^(?:kick|remove)(?:\s+(?P<who>.+?))?\s*$").expect("kick pattern");
}

pub const HELP: &str = "\
Commands:
  login <name> as <admin|voter|observer>   join the session
  logout                                   leave and clear the session
  story <name>                             (admin) start a new story and open voting
  reveal                                   (admin) reveal the votes
  reset                                    (admin) clear votes and reopen voting
  kick <name|id>                           (admin) remove a participant
  vote <card>                              (voter) cast or change your vote
  show                                     redraw the room
  help                                     this text
  quit                                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String, role: Option<String> },
    Logout,
    Story(String),
    Reveal,
    Reset,
    Vote(String),
    Kick(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let keyword = line.split_whitespace().next().unwrap_or_default().to_ascii_lowercase();

    match keyword.as_str() {
        "login" => {
            let caps = LOGIN_RE.captures(line).ok_or(ParseError::Usage("login <name> as <role>"))?;
            Ok(Command::Login {
                username: caps.name("name").map(|m| m.as_str().to_string()).unwrap_or_default(),
                role: caps.name("role").map(|m| m.as_str().to_string()),
            })
        }
        // Empty names are left for the story form to reject
        "story" => {
            let caps = STORY_RE.captures(line).ok_or(ParseError::Usage("story <name>"))?;
            Ok(Command::Story(
                caps.name("name").map(|m| m.as_str().to_string()).unwrap_or_default(),
            ))
        }
        "vote" => VOTE_RE
            .captures(line)
            .and_then(|caps| caps.name("value"))
            .map(|m| Command::Vote(m.as_str().to_string()))
            .ok_or(ParseError::Usage("vote <card>")),
        "kick" | "remove" => KICK_RE
            .captures(line)
            .and_then(|caps| caps.name("who"))
            .map(|m| Command::Kick(m.as_str().to_string()))
            .ok_or(ParseError::Usage("kick <name|id>")),
        "logout" => Ok(Command::Logout),
        "reveal" => Ok(Command::Reveal),
        "reset" => Ok(Command::Reset),
        "show" | "" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
