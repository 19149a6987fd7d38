use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A person from the roster. Identity is the normalized email address only.
#[derive(Debug, Clone)]
pub struct Participant {
    first_name: String,
    last_name: String,
    email: String,
}

impl Participant {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: normalize_email(email.as_ref()),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.full_name(), self.email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Everyone read from the roster file, split by participation.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub participants: Vec<Participant>,
    pub non_participants: Vec<Participant>,
}

impl Roster {
    pub fn total(&self) -> usize {
        self.participants.len() + self.non_participants.len()
    }
}

/// Previous period's gifter email -> giftee email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorAssignments {
    pairs: HashMap<String, String>,
}

impl PriorAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// 回傳舊值 (若 gifter 已存在)
    pub fn insert(&mut self, gifter_email: &str, giftee_email: &str) -> Option<String> {
        self.pairs
            .insert(normalize_email(gifter_email), normalize_email(giftee_email))
    }

    pub fn giftee_of(&self, gifter_email: &str) -> Option<&str> {
        self.pairs.get(gifter_email).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for PriorAssignments {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut prior = Self::new();
        for (gifter, giftee) in iter {
            prior.insert(gifter, giftee);
        }
        prior
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub gifter: Participant,
    pub giftee: Participant,
}

/// The current run's assignment, kept in the order the cycle was built.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pairings: Vec<Pairing>,
}

impl Assignment {
    pub fn from_pairings(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter()
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn giftee_of(&self, gifter_email: &str) -> Option<&Participant> {
        let email = normalize_email(gifter_email);
        self.pairings
            .iter()
            .find(|p| p.gifter.email() == email)
            .map(|p| &p.giftee)
    }

    /// Email pairs, used to compare with a [`PriorAssignments`].
    pub fn to_prior(&self) -> PriorAssignments {
        self.pairings
            .iter()
            .map(|p| (p.gifter.email(), p.giftee.email()))
            .collect()
    }
}

/// A pairing that repeats the previous period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedPairing {
    pub gifter: Participant,
    pub giftee: Participant,
}

impl fmt::Display for RepeatedPairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.gifter.full_name(),
            self.giftee.full_name()
        )
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Assigned(Assignment),
    Aborted { repeats: Vec<RepeatedPairing> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_participant_identity_is_email() {
        let a = Participant::new("Alice", "Smith", "Alice@X.com ");
        let b = Participant::new("Ally", "Other", "alice@x.com");

        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_full_name_and_display() {
        let p = Participant::new("Bob", "van Dijk", "bob@x");
        assert_eq!(p.full_name(), "Bob van Dijk");
        assert_eq!(p.to_string(), "Bob van Dijk <bob@x>");

        let single = Participant::new("Cher", "", "cher@x");
        assert_eq!(single.full_name(), "Cher");
    }

    #[test]
    fn test_prior_assignments_normalizes() {
        let mut prior = PriorAssignments::new();
        assert!(prior.insert("ALICE@x", " bob@X ").is_none());
        assert_eq!(prior.giftee_of("alice@x"), Some("bob@x"));
        assert_eq!(prior.insert("alice@x", "cara@x").as_deref(), Some("bob@x"));
        assert_eq!(prior.len(), 1);
    }

    #[test]
    fn test_assignment_lookup() {
        let alice = Participant::new("Alice", "A", "alice@x");
        let bob = Participant::new("Bob", "B", "bob@x");
        let assignment = Assignment::from_pairings(vec![
            Pairing {
                gifter: alice.clone(),
                giftee: bob.clone(),
            },
            Pairing {
                gifter: bob.clone(),
                giftee: alice.clone(),
            },
        ]);

        assert_eq!(assignment.giftee_of("ALICE@x"), Some(&bob));
        assert_eq!(assignment.giftee_of("nobody@x"), None);
        assert_eq!(assignment.to_prior().giftee_of("bob@x"), Some("alice@x"));
    }
}
