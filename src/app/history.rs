//! Reading last period's pairings and writing this period's.
//!
//! Written lines look like `Alice Smith <alice@x> -> Bob Jones <bob@x>`.
//! The reader takes the text inside the last `<...>` on each side of the
//! arrow. The older `Alice Smith -> alice@x -> Bob Jones -> bob@x` layout
//! is still accepted.

use crate::domain::model::{Assignment, PriorAssignments};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SantaError};
use chrono::{DateTime, Local};

const ARROW: &str = "->";

pub async fn load_history<S: Storage>(storage: &S, path: &str) -> Result<PriorAssignments> {
    tracing::debug!("Reading previous assignments from: {}", path);
    let bytes = storage.read_file(path).await?;
    let content = String::from_utf8(bytes).map_err(|_| SantaError::EncodingError {
        path: path.to_string(),
    })?;

    let prior = parse_history(path, &content)?;
    tracing::info!("📜 Loaded {} pairings from the previous period", prior.len());
    Ok(prior)
}

pub fn parse_history(source_name: &str, content: &str) -> Result<PriorAssignments> {
    let mut prior = PriorAssignments::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_error = |reason: &str| SantaError::ParseError {
            source_name: source_name.to_string(),
            line: index + 1,
            content: raw.to_string(),
            reason: reason.to_string(),
        };

        if !line.contains(ARROW) {
            return Err(line_error("expected '<gifter> -> <giftee>'"));
        }

        let (gifter, giftee) = parse_pairing(line)
            .ok_or_else(|| line_error("expected 'Name <email> -> Name <email>'"))?;

        if prior.insert(gifter, giftee).is_some() {
            return Err(line_error("gifter already has a pairing"));
        }
    }

    Ok(prior)
}

/// `Name <email> -> Name <email>`, or the legacy four-part layout.
fn parse_pairing(line: &str) -> Option<(&str, &str)> {
    let sides: Vec<&str> = line.split(ARROW).collect();
    match sides.as_slice() {
        [gifter, giftee] => Some((bracketed_email(*gifter)?, bracketed_email(*giftee)?)),
        [_, gifter, _, giftee] => Some((bare_email(*gifter)?, bare_email(*giftee)?)),
        _ => None,
    }
}

fn bracketed_email(side: &str) -> Option<&str> {
    let (_, rest) = side.rsplit_once('<')?;
    let (email, tail) = rest.split_once('>')?;
    let email = email.trim();
    (tail.trim().is_empty() && email.contains('@')).then_some(email)
}

fn bare_email(part: &str) -> Option<&str> {
    let email = part.trim();
    (email.contains('@') && !email.contains(char::is_whitespace)).then_some(email)
}

pub fn render_assignment(assignment: &Assignment, generated_at: DateTime<Local>) -> String {
    let mut out = format!(
        "# Generated on {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S%.6f")
    );
    for pairing in assignment.iter() {
        out.push_str(&format!("{} {} {}\n", pairing.gifter, ARROW, pairing.giftee));
    }
    out
}

pub async fn save_assignment<S: Storage>(
    storage: &S,
    path: &str,
    assignment: &Assignment,
) -> Result<()> {
    let content = render_assignment(assignment, Local::now());
    tracing::debug!(
        "Writing {} pairings ({} bytes) to {}",
        assignment.len(),
        content.len(),
        path
    );
    storage.write_file(path, content.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Pairing, Participant};

    fn sample_assignment() -> Assignment {
        let alice = Participant::new("Alice", "Smith", "alice@x");
        let bob = Participant::new("Bob", "Jones", "bob@x");
        let cara = Participant::new("Cara", "", "cara@x");
        Assignment::from_pairings(vec![
            Pairing {
                gifter: alice.clone(),
                giftee: bob.clone(),
            },
            Pairing {
                gifter: bob,
                giftee: cara.clone(),
            },
            Pairing {
                gifter: cara,
                giftee: alice,
            },
        ])
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# Generated on 2025-12-01\n\nAlice Smith <alice@x> -> Bob Jones <BOB@x>\n";
        let prior = parse_history("assignations.txt", content).unwrap();
        assert_eq!(prior.len(), 1);
        assert_eq!(prior.giftee_of("alice@x"), Some("bob@x"));
    }

    #[test]
    fn test_parse_legacy_layout() {
        let content = "Alice Smith -> alice@x -> Bob Jones -> bob@x\n";
        let prior = parse_history("assignations.txt", content).unwrap();
        assert_eq!(prior.giftee_of("alice@x"), Some("bob@x"));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(parse_history("h", "Alice Smith alice@x bob@x").is_err());
        assert!(parse_history("h", "Alice <alice@x> -> Bob").is_err());
        assert!(parse_history("h", "a@x -> b@x -> c@x").is_err());
        assert!(parse_history("h", "Alice <alice@x> Smith -> Bob <bob@x>").is_err());
    }

    #[test]
    fn test_parse_takes_email_from_brackets_only() {
        let content = "Alice @home <alice@x> -> Bob <b@rn> Jones <bob@x>\n";
        let prior = parse_history("h", content).unwrap();
        assert_eq!(prior.len(), 1);
        assert_eq!(prior.giftee_of("alice@x"), Some("bob@x"));
    }

    #[test]
    fn test_parse_rejects_duplicate_gifter() {
        let content = "A <a@x> -> B <b@x>\nA <a@x> -> C <c@x>\n";
        let err = parse_history("h", content).unwrap_err();
        assert!(matches!(err, SantaError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_render_layout() {
        let generated_at = Local::now();
        let text = render_assignment(&sample_assignment(), generated_at);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("# Generated on "));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Alice Smith <alice@x> -> Bob Jones <bob@x>");
        assert_eq!(lines[4], "Cara <cara@x> -> Alice Smith <alice@x>");
    }

    #[test]
    fn test_render_then_parse_keeps_pairs() {
        let assignment = sample_assignment();
        let text = render_assignment(&assignment, Local::now());
        let prior = parse_history("assignations.txt", &text).unwrap();
        assert_eq!(prior, assignment.to_prior());
    }

    #[test]
    fn test_names_with_at_sign_round_trip() {
        let alice = Participant::new("Alice", "@home", "alice@x");
        let bob = Participant::new("Bob", "Jones", "bob@x");
        let assignment = Assignment::from_pairings(vec![
            Pairing {
                gifter: alice.clone(),
                giftee: bob.clone(),
            },
            Pairing {
                gifter: bob,
                giftee: alice,
            },
        ]);

        let text = render_assignment(&assignment, Local::now());
        let prior = parse_history("assignations.txt", &text).unwrap();
        assert_eq!(prior, assignment.to_prior());
    }
}
