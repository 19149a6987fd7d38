use crate::app::history::save_assignment;
use crate::app::message::MessageTemplate;
use crate::core::assignment::run_once;
use crate::core::{Notifier, Storage};
use crate::domain::model::{
    Assignment, PriorAssignments, RepeatedPairing, Roster, RunOutcome,
};
use crate::utils::error::Result;
use rand::Rng;

/// Where a run currently is. Nothing goes back to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Shuffled,
    ValidatedOk,
    Persisted,
    Notified,
    Done,
    ValidationFailed,
    Aborted,
}

#[derive(Debug, Clone)]
pub enum RunReport {
    Completed {
        assignment: Assignment,
        output_path: String,
        notified: usize,
    },
    Aborted {
        repeats: Vec<RepeatedPairing>,
    },
}

pub struct SecretSanta<S: Storage, N: Notifier> {
    storage: S,
    notifier: N,
    template: MessageTemplate,
    output_path: String,
}

impl<S: Storage, N: Notifier> SecretSanta<S, N> {
    pub fn new(storage: S, notifier: N, template: MessageTemplate, output_path: String) -> Self {
        Self {
            storage,
            notifier,
            template,
            output_path,
        }
    }

    /// Draws, checks, writes the assignment file, then sends one message
    /// per gifter. A history conflict stops the run before anything is
    /// written or sent.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        roster: &Roster,
        prior: Option<&PriorAssignments>,
        rng: &mut R,
    ) -> Result<RunReport> {
        transition(RunState::Start);

        let outcome = run_once(&roster.participants, prior, rng)?;
        transition(RunState::Shuffled);

        let assignment = match outcome {
            RunOutcome::Assigned(assignment) => assignment,
            RunOutcome::Aborted { repeats } => {
                transition(RunState::ValidationFailed);
                transition(RunState::Aborted);
                return Ok(RunReport::Aborted { repeats });
            }
        };
        transition(RunState::ValidatedOk);

        save_assignment(&self.storage, &self.output_path, &assignment).await?;
        transition(RunState::Persisted);
        tracing::info!("📁 Assignment saved to: {}", self.output_path);

        let notified = self.notify_all(&assignment).await?;
        transition(RunState::Notified);

        transition(RunState::Done);
        Ok(RunReport::Completed {
            assignment,
            output_path: self.output_path.clone(),
            notified,
        })
    }

    async fn notify_all(&self, assignment: &Assignment) -> Result<usize> {
        tracing::info!("✉️ Sending {} notifications...", assignment.len());
        self.notifier.connect().await?;

        // 不論寄送成功與否都要關閉連線
        let sent = self.send_each(assignment).await;
        let closed = self.notifier.disconnect().await;

        let sent = sent?;
        closed?;
        Ok(sent)
    }

    async fn send_each(&self, assignment: &Assignment) -> Result<usize> {
        let mut sent = 0;
        for pairing in assignment.iter() {
            let notification = self.template.render(&pairing.gifter, &pairing.giftee);
            // 第一封失敗即中止，其餘不再寄送
            self.notifier.send(&notification).await?;
            sent += 1;
            tracing::debug!("Sent {}/{} to {}", sent, assignment.len(), notification.to);
        }
        Ok(sent)
    }
}

/// Draw and check only.
pub fn preview<R: Rng + ?Sized>(
    roster: &Roster,
    prior: Option<&PriorAssignments>,
    rng: &mut R,
) -> Result<RunOutcome> {
    run_once(&roster.participants, prior, rng)
}

fn transition(state: RunState) {
    tracing::debug!("Run state -> {:?}", state);
}
