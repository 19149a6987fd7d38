//! Cyclic gift assignment and the prior-period check.
//!
//! A single shuffle followed by "everyone gives to the next person" always
//! yields one cycle through the whole group, so nobody draws themselves.
//! A history conflict is reported, never repaired: the caller aborts and the
//! operator runs the tool again.

use crate::domain::model::{
    Assignment, Pairing, Participant, PriorAssignments, RepeatedPairing, RunOutcome,
};
use crate::utils::error::{Result, SantaError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Shuffles the participants and links each one to its successor, the last
/// one wrapping around to the first.
pub fn build_cycle<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<Assignment> {
    ensure_drawable(participants)?;

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let pairings = shuffled
        .iter()
        .zip(shuffled.iter().cycle().skip(1))
        .map(|(gifter, giftee)| Pairing {
            gifter: gifter.clone(),
            giftee: giftee.clone(),
        })
        .collect();

    Ok(Assignment::from_pairings(pairings))
}

fn ensure_drawable(participants: &[Participant]) -> Result<()> {
    if participants.len() < 2 {
        return Err(SantaError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.email()) {
            return Err(SantaError::DuplicateParticipant {
                email: participant.email().to_string(),
            });
        }
    }

    Ok(())
}

/// Pairings identical to the previous period, in assignment order.
pub fn find_repeats(assignment: &Assignment, prior: &PriorAssignments) -> Vec<RepeatedPairing> {
    assignment
        .iter()
        .filter(|p| prior.giftee_of(p.gifter.email()) == Some(p.giftee.email()))
        .map(|p| RepeatedPairing {
            gifter: p.gifter.clone(),
            giftee: p.giftee.clone(),
        })
        .collect()
}

/// Returns `false` if any pairing repeats the previous period. Each
/// offending pairing is logged with both full names.
pub fn validate_against_history(assignment: &Assignment, prior: &PriorAssignments) -> bool {
    check_history(assignment, prior).is_empty()
}

/// Finds and logs the repeats; shared by `validate_against_history` and `run_once`.
fn check_history(assignment: &Assignment, prior: &PriorAssignments) -> Vec<RepeatedPairing> {
    let repeats = find_repeats(assignment, prior);
    for repeat in &repeats {
        tracing::warn!(
            "🔁 {} would give to {} again, same as last time",
            repeat.gifter.full_name(),
            repeat.giftee.full_name()
        );
    }
    repeats
}

/// One draw, one check. No reshuffle on conflict.
pub fn run_once<R: Rng + ?Sized>(
    participants: &[Participant],
    prior: Option<&PriorAssignments>,
    rng: &mut R,
) -> Result<RunOutcome> {
    let assignment = build_cycle(participants, rng)?;
    tracing::debug!("Built a cycle over {} participants", assignment.len());

    if let Some(prior) = prior {
        let repeats = check_history(&assignment, prior);
        if !repeats.is_empty() {
            return Ok(RunOutcome::Aborted { repeats });
        }
        tracing::debug!("No pairing repeats the {} prior pairings", prior.len());
    }

    Ok(RunOutcome::Assigned(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn people(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant::new(format!("P{}", i), "Test", format!("p{}@x", i)))
            .collect()
    }

    #[test]
    fn test_build_cycle_rejects_small_groups() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            build_cycle(&[], &mut rng),
            Err(SantaError::InsufficientParticipants { count: 0 })
        ));
        assert!(matches!(
            build_cycle(&people(1), &mut rng),
            Err(SantaError::InsufficientParticipants { count: 1 })
        ));
    }

    #[test]
    fn test_build_cycle_rejects_duplicates() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut group = people(3);
        group.push(Participant::new("Again", "Test", "P1@X"));

        assert!(matches!(
            build_cycle(&group, &mut rng),
            Err(SantaError::DuplicateParticipant { email }) if email == "p1@x"
        ));
    }

    #[test]
    fn test_build_cycle_is_reproducible_with_seed() {
        let group = people(8);
        let a = build_cycle(&group, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = build_cycle(&group, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.pairings(), b.pairings());
    }

    #[test]
    fn test_successor_links() {
        let group = people(5);
        let assignment = build_cycle(&group, &mut StdRng::seed_from_u64(7)).unwrap();
        let pairings = assignment.pairings();

        for window in pairings.windows(2) {
            assert_eq!(window[0].giftee, window[1].gifter);
        }
        assert_eq!(pairings[pairings.len() - 1].giftee, pairings[0].gifter);
    }

    #[test]
    fn test_two_people_with_history_always_abort() {
        let group = vec![
            Participant::new("Alice", "A", "alice@x"),
            Participant::new("Bob", "B", "bob@x"),
        ];
        let prior: PriorAssignments = [("alice@x", "bob@x")].into_iter().collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = run_once(&group, Some(&prior), &mut rng).unwrap();
            match outcome {
                RunOutcome::Aborted { repeats } => {
                    assert_eq!(repeats.len(), 1);
                    assert_eq!(repeats[0].gifter.email(), "alice@x");
                    assert_eq!(repeats[0].to_string(), "Alice A -> Bob B");
                }
                RunOutcome::Assigned(_) => panic!("two people can only swap"),
            }
        }
    }

    #[test]
    fn test_run_once_without_history_is_assigned() {
        let outcome = run_once(&people(4), None, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(matches!(outcome, RunOutcome::Assigned(a) if a.len() == 4));
    }

    #[test]
    fn test_stale_history_entries_never_match() {
        let group = people(4);
        let prior: PriorAssignments = [("gone@x", "p1@x"), ("p0@x", "gone@x")]
            .into_iter()
            .collect();
        let assignment = build_cycle(&group, &mut StdRng::seed_from_u64(9)).unwrap();

        assert!(find_repeats(&assignment, &prior).is_empty());
        assert!(validate_against_history(&assignment, &prior));
    }

    #[test]
    fn test_run_once_agrees_with_validation() {
        let group = people(3);
        let prior: PriorAssignments = [("p0@x", "p1@x"), ("p1@x", "p2@x")].into_iter().collect();

        for seed in 0..20 {
            let assignment = build_cycle(&group, &mut StdRng::seed_from_u64(seed)).unwrap();
            let outcome = run_once(&group, Some(&prior), &mut StdRng::seed_from_u64(seed)).unwrap();
            match outcome {
                RunOutcome::Assigned(drawn) => {
                    assert_eq!(drawn.pairings(), assignment.pairings());
                    assert!(validate_against_history(&assignment, &prior));
                }
                RunOutcome::Aborted { repeats } => {
                    assert_eq!(repeats, find_repeats(&assignment, &prior));
                    assert!(!validate_against_history(&assignment, &prior));
                }
            }
        }
    }
}
