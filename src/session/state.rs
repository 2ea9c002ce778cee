use crate::models::{is_poker_value, Participant, User};
use crate::voting::calculate_results;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Voting,
    Revealed,
}

/// Shared round snapshot. Missing fields fall back to their defaults when a
/// stored snapshot is read back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub participants: Vec<Participant>,
    pub story_name: Option<String>,
    pub voting_open: bool,
    pub votes_revealed: bool,
    pub average_vote: Option<f64>,
    pub vote_counts: BTreeMap<String, u32>,
}

// Every mutator returns whether the snapshot changed.
impl SessionState {
    pub fn phase(&self) -> RoundPhase {
        if self.votes_revealed {
            RoundPhase::Revealed
        } else if self.voting_open {
            RoundPhase::Voting
        } else {
            RoundPhase::Idle
        }
    }

    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == user_id)
    }

    pub fn participant_vote(&self, user_id: &str) -> Option<&str> {
        self.participant(user_id).and_then(|p| p.vote.as_deref())
    }

    pub fn add_participant(&mut self, user: &User) -> bool {
        if self.participant(&user.id).is_some() {
            return false;
        }
        debug!("Adding participant {} ({})", user.username, user.id);
        self.participants.push(Participant::from(user));
        true
    }

    pub fn remove_participant(&mut self, user_id: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != user_id);
        self.participants.len() != before
    }

    pub fn cast_vote(&mut self, user_id: &str, value: &str) -> bool {
        if self.phase() != RoundPhase::Voting || !is_poker_value(value) {
            return false;
        }
        match self.participants.iter_mut().find(|p| p.id == user_id) {
            Some(participant) => {
                let changed = !participant.has_voted || participant.vote.as_deref() != Some(value);
                participant.vote = Some(value.to_string());
                participant.has_voted = true;
                changed
            }
            None => false,
        }
    }

    pub fn start_new_story(&mut self, story_name: &str) -> bool {
        let participants = std::mem::take(&mut self.participants);
        *self = SessionState {
            participants,
            story_name: Some(story_name.to_string()),
            voting_open: true,
            ..SessionState::default()
        };
        self.clear_votes();
        true
    }

    pub fn reveal_votes(&mut self) -> bool {
        if self.phase() != RoundPhase::Voting {
            return false;
        }
        let results = calculate_results(&self.participants);
        self.voting_open = false;
        self.votes_revealed = true;
        self.average_vote = results.average_vote;
        self.vote_counts = results.vote_counts;
        true
    }

    pub fn reset_round(&mut self) -> bool {
        self.voting_open = true;
        self.votes_revealed = false;
        self.average_vote = None;
        self.vote_counts.clear();
        self.clear_votes();
        true
    }

    pub fn voted_count(&self) -> usize {
        self.participants.iter().filter(|p| p.has_voted).count()
    }

    fn clear_votes(&mut self) {
        for participant in &mut self.participants {
            participant.clear_vote();
        }
    }
}
