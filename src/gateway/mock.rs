//! In-memory gateway double for store and coordinator tests.

use super::backend::ApplicationGateway;
use crate::domain::{Application, Result, TrackerError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    List,
    Create,
    Update,
    Remove,
}

struct Gate {
    release: oneshot::Receiver<()>,
    /// Wait before the remote effect instead of after it.
    before_effect: bool,
}

#[derive(Default)]
struct MockState {
    records: Vec<Application>,
    next_id: i64,
    failing: HashSet<Op>,
    calls: HashMap<Op, usize>,
    gates: HashMap<Op, VecDeque<Gate>>,
    last_update: Option<Application>,
}

/// Behaves like a well-mannered remote store: assigns ids on create, replaces
/// on update, deletes on remove. Operations can be made to fail, and individual
/// calls can be held until the test releases them.
#[derive(Default)]
pub(crate) struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub(crate) fn with_records(records: Vec<Application>) -> Self {
        let next_id = records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(MockState {
                records,
                next_id,
                ..MockState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every later call of `op` fail with status 500.
    pub(crate) fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub(crate) fn recover(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    /// Holds the next call of `op` after it has been processed remotely; the
    /// response is delivered only once the returned sender fires.
    pub(crate) fn hold_next(&self, op: Op) -> oneshot::Sender<()> {
        self.gate(op, false)
    }

    /// Holds the next call of `op` before it reaches the remote state, as if
    /// the request were delayed in transit.
    pub(crate) fn defer_next(&self, op: Op) -> oneshot::Sender<()> {
        self.gate(op, true)
    }

    fn gate(&self, op: Op, before_effect: bool) -> oneshot::Sender<()> {
        let (tx, release) = oneshot::channel();
        self.lock().gates.entry(op).or_default().push_back(Gate {
            release,
            before_effect,
        });
        tx
    }

    pub(crate) fn calls(&self, op: Op) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub(crate) fn set_next_id(&self, id: i64) {
        self.lock().next_id = id;
    }

    pub(crate) fn last_update(&self) -> Option<Application> {
        self.lock().last_update.clone()
    }

    /// Records the call, waits out a deferring gate, and returns the gate to
    /// wait on after the effect, or the failure to report.
    async fn begin(&self, op: Op) -> Result<Option<oneshot::Receiver<()>>> {
        let gate = {
            let mut state = self.lock();
            *state.calls.entry(op).or_insert(0) += 1;
            state.gates.get_mut(&op).and_then(VecDeque::pop_front)
        };
        let after = match gate {
            Some(Gate {
                release,
                before_effect: true,
            }) => {
                let _ = release.await;
                None
            }
            Some(Gate { release, .. }) => Some(release),
            None => None,
        };
        if self.lock().failing.contains(&op) {
            return Err(TrackerError::status(op_name(op), 500));
        }
        Ok(after)
    }
}

const fn op_name(op: Op) -> &'static str {
    match op {
        Op::List => "list",
        Op::Create => "create",
        Op::Update => "update",
        Op::Remove => "remove",
    }
}

async fn wait(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

#[async_trait]
impl ApplicationGateway for MockGateway {
    async fn list(&self) -> Result<Vec<Application>> {
        let gate = self.begin(Op::List).await?;
        let records = self.lock().records.clone();
        wait(gate).await;
        Ok(records)
    }

    async fn create(&self, draft: &Application) -> Result<Application> {
        if draft.id.is_some() {
            return Err(TrackerError::precondition("create requires a draft without an id"));
        }
        let gate = self.begin(Op::Create).await?;
        let created = {
            let mut state = self.lock();
            let created = draft.clone().with_id(state.next_id);
            state.next_id += 1;
            state.records.push(created.clone());
            created
        };
        wait(gate).await;
        Ok(created)
    }

    async fn update(&self, application: &Application) -> Result<Application> {
        let id = application
            .id
            .ok_or_else(|| TrackerError::precondition("update requires an application id"))?;
        let gate = self.begin(Op::Update).await?;
        {
            let mut state = self.lock();
            state.last_update = Some(application.clone());
            let slot = state
                .records
                .iter_mut()
                .find(|r| r.id == Some(id))
                .ok_or_else(|| TrackerError::status("update", 404))?;
            *slot = application.clone();
        }
        wait(gate).await;
        Ok(application.clone())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let gate = self.begin(Op::Remove).await?;
        {
            let mut state = self.lock();
            let before = state.records.len();
            state.records.retain(|r| r.id != Some(id));
            if state.records.len() == before {
                return Err(TrackerError::status("remove", 404));
            }
        }
        wait(gate).await;
        Ok(())
    }
}
