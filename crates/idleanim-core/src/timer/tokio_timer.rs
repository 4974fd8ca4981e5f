use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{IdleTimer, TimerToken};
use crate::manager::{InputSender, ManagerInput};

/// Timer that posts its expiry onto the manager's input queue.
///
/// Each arm spawns a sleeping task on the current tokio runtime, so `arm`
/// must be called from within one.
#[derive(Debug)]
pub struct TokioTimer {
    inputs: InputSender,
    generation: u64,
    deadline: Option<Instant>,
    task: Option<JoinHandle<()>>,
}

impl TokioTimer {
    pub fn new(inputs: InputSender) -> Self {
        Self {
            inputs,
            generation: 0,
            deadline: None,
            task: None,
        }
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl IdleTimer for TokioTimer {
    fn arm(&mut self, duration_ms: u64) -> TimerToken {
        self.abort_task();
        self.generation += 1;
        let token = TimerToken::new(self.generation);
        let deadline = Instant::now() + Duration::from_millis(duration_ms);
        self.deadline = Some(deadline);

        let inputs = self.inputs.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The queue is gone once the service loop has shut down.
            let _ = inputs.send(ManagerInput::TimerExpired(token));
        }));
        token
    }

    fn cancel(&mut self) {
        self.abort_task();
        self.deadline = None;
    }

    fn remaining_ms(&self) -> u64 {
        self.deadline
            .map(|deadline| {
                let left = deadline.saturating_duration_since(Instant::now());
                u64::try_from(left.as_millis()).unwrap_or(u64::MAX)
            })
            .unwrap_or(0)
    }

    fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    fn claim_expiry(&mut self, token: TimerToken) -> bool {
        if self.deadline.is_some() && token.generation() == self.generation {
            self.deadline = None;
            self.task = None;
            return true;
        }
        false
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.abort_task();
    }
}
