use crate::session::{RoundPhase, SessionState};
use crate::models::UserRole;
use crate::view::waiting_message;
use crate::voting::histogram::{chart_bars, sorted_counts};
use crate::voting::total_votes;
use std::fmt::Write;

const BAR_WIDTH: u64 = 30;

pub fn render_results(state: &SessionState) -> String {
    match state.phase() {
        RoundPhase::Voting => {
            let voters = state
                .participants
                .iter()
                .filter(|p| p.role == UserRole::Voter)
                .count();
            format!(
                "Voting in Progress\nVotes will be shown here once the admin reveals them.\n{} / {} voters have cast their vote.\n",
                state.voted_count(),
                voters
            )
        }
        RoundPhase::Idle => format!("Ready to Vote?\n{}\n", waiting_message(state)),
        RoundPhase::Revealed => render_revealed(state),
    }
}

fn render_revealed(state: &SessionState) -> String {
    let mut out = String::from("Voting Results\n");
    if let Some(story) = state.story_name.as_deref() {
        let _ = writeln!(out, "Results for: {}", story);
    }
    if let Some(average) = state.average_vote {
        let _ = writeln!(out, "Average Vote: {}", average);
    }

    if total_votes(&state.vote_counts) == 0 {
        out.push_str("No votes were cast for this story.\n");
        return out;
    }

    // Histogram scaled to the most popular card
    let bars = chart_bars(&state.vote_counts);
    let max = bars.iter().map(|b| b.votes).max().unwrap_or(1).max(1);
    out.push('\n');
    for bar in &bars {
        let width = ((u64::from(bar.votes) * BAR_WIDTH) / u64::from(max)).max(1) as usize;
        let _ = writeln!(out, "{:>4} | {} {}", bar.label, "#".repeat(width), bar.votes);
    }

    out.push('\n');
    let summary: Vec<String> = sorted_counts(&state.vote_counts)
        .into_iter()
        .map(|(value, count)| format!("{}: {} vote{}", value, count, if count > 1 { "s" } else { "" }))
        .collect();
    let _ = writeln!(out, "{}", summary.join("  "));
    out
}
