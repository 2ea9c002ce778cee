use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Story-point cards in display order. `?` marks "unknown".
pub const POKER_VALUES: [&str; 11] = ["0", "1", "2", "3", "5", "8", "13", "20", "40", "100", "?"];

pub fn is_poker_value(value: &str) -> bool {
    POKER_VALUES.contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Voter,
    Observer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Voter, UserRole::Observer];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Voter => "VOTER",
            UserRole::Observer => "OBSERVER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_lowercase())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "voter" => Ok(UserRole::Voter),
            "observer" => Ok(UserRole::Observer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl User {
    pub fn new(username: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "vote_label"
    )]
    pub vote: Option<String>,
    #[serde(default)]
    pub has_voted: bool,
}

impl Participant {
    pub fn clear_vote(&mut self) {
        self.vote = None;
        self.has_voted = false;
    }

    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

impl From<&User> for Participant {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            vote: None,
            has_voted: false,
        }
    }
}

// Older snapshots may carry votes as JSON numbers; read them back as card labels.
fn vote_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVote {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawVote>::deserialize(deserializer)?.map(|raw| match raw {
        RawVote::Text(text) => text,
        RawVote::Number(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!(" voter ".parse::<UserRole>(), Ok(UserRole::Voter));
        assert_eq!("OBSERVER".parse::<UserRole>(), Ok(UserRole::Observer));
        assert!("captain".parse::<UserRole>().is_err());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&UserRole::Observer).unwrap(), "\"OBSERVER\"");
    }

    #[test]
    fn participant_reads_numeric_vote_as_label() {
        let json = r#"{"id":"a","username":"Ann","role":"VOTER","vote":8,"hasVoted":true}"#;
        let participant: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(participant.vote.as_deref(), Some("8"));
        assert!(participant.has_voted);
    }

    #[test]
    fn participant_without_vote_omits_field() {
        let user = User::new("Bob".to_string(), UserRole::Voter);
        let json = serde_json::to_value(Participant::from(&user)).unwrap();
        assert!(json.get("vote").is_none());
        assert_eq!(json["hasVoted"], false);
    }

    #[test]
    fn new_users_get_distinct_ids() {
        let a = User::new("Ann".to_string(), UserRole::Admin);
        let b = User::new("Ann".to_string(), UserRole::Admin);
        assert_ne!(a.id, b.id);
    }
}
