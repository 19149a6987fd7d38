use crate::domain::model::{Participant, Roster};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_email;
use std::collections::HashSet;

const EXCLUDED_MARKER: char = '#';

/// 從 Storage 讀取名單檔案並解析
pub async fn load_roster<S: Storage>(storage: &S, path: &str) -> Result<Roster> {
    tracing::debug!("Reading roster from: {}", path);
    let bytes = storage.read_file(path).await?;
    let content = String::from_utf8(bytes).map_err(|_| SantaError::EncodingError {
        path: path.to_string(),
    })?;

    let roster = parse_roster(path, &content)?;
    tracing::info!(
        "👥 Roster loaded: {} participants, {} excluded",
        roster.participants.len(),
        roster.non_participants.len()
    );
    Ok(roster)
}

/// Parses `First Last, email` lines. A leading `#` keeps the person on the
/// roster but out of the draw. Both lists come back sorted by first name.
pub fn parse_roster(source_name: &str, content: &str) -> Result<Roster> {
    let mut roster = Roster::default();
    let mut seen = HashSet::new();

    for (index, raw) in content.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        let line_error = |reason: &str| SantaError::ParseError {
            source_name: source_name.to_string(),
            line: index + 1,
            content: raw.to_string(),
            reason: reason.to_string(),
        };

        let (name, email) =
            split_line(raw).ok_or_else(|| line_error("expected 'First Last, email'"))?;
        if name.contains("->") {
            return Err(line_error("name cannot contain '->'"));
        }

        let excluded = raw.starts_with(EXCLUDED_MARKER);
        let mut words = name.split_whitespace();
        let first_name = words
            .next()
            .map(|word| {
                if excluded {
                    word.trim_matches(EXCLUDED_MARKER)
                } else {
                    word
                }
            })
            .filter(|word| !word.is_empty())
            .ok_or_else(|| line_error("name is empty"))?;
        let last_name = words.collect::<Vec<_>>().join(" ");

        let participant = Participant::new(first_name, last_name, email);
        validate_email("email", participant.email())
            .map_err(|_| line_error("email must look like 'name@domain'"))?;

        if !seen.insert(participant.email().to_string()) {
            return Err(SantaError::DuplicateParticipant {
                email: participant.email().to_string(),
            });
        }

        if excluded {
            roster.non_participants.push(participant);
        } else {
            roster.participants.push(participant);
        }
    }

    // 穩定排序：同名者維持檔案中的順序
    roster.participants.sort_by(|a, b| a.first_name().cmp(b.first_name()));
    roster.non_participants.sort_by(|a, b| a.first_name().cmp(b.first_name()));

    Ok(roster)
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(email), None) => Some((name, email)),
        _ => None,
    }
}
