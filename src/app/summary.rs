use crate::domain::model::{Participant, RepeatedPairing, Roster};

pub fn render_summary(roster: &Roster) -> String {
    let mut out = String::from("==  Summary  ==\n");
    out.push_str(&format!("Input persons: {}\n", roster.total()));
    out.push_str(&format!("Participants: {}\n", roster.participants.len()));
    out.push_str(&format!(
        "Non-participants: {}\n\n",
        roster.non_participants.len()
    ));
    out.push_str("Non-participants: \n");
    out.push_str(&render_people(&roster.non_participants));
    out.push_str("\nParticipants: \n");
    out.push_str(&render_people(&roster.participants));
    out
}

fn render_people(people: &[Participant]) -> String {
    people
        .iter()
        .map(|person| format!("{} -> {}\n", person.full_name(), person.email()))
        .collect()
}

pub fn print_summary(roster: &Roster) {
    print!("{}", render_summary(roster));
}

/// 與上期重複時的說明：列出重複的配對，提醒重新抽籤
pub fn render_abort(repeats: &[RepeatedPairing]) -> String {
    let mut out: String = repeats
        .iter()
        .map(|repeat| format!("Same as last time: {}\n", repeat))
        .collect();
    out.push_str("⛔ Nothing was saved or sent. Run the draw again.\n");
    out
}

pub fn print_abort(repeats: &[RepeatedPairing], prior_len: usize) {
    tracing::warn!(
        "⛔ Draw repeats {} pairing(s) out of {} from the previous period",
        repeats.len(),
        prior_len
    );
    print!("{}", render_abort(repeats));
}
