// TestDependencies - mock implementations for testing
//
// Provides scripted backends and recording sinks that can be injected
// into TournamentKernel for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{ApiOutcome, BaseNotifier, BaseTournamentApi, Notification, TournamentKernel};
use crate::api::{ApiProblem, ApiResult};
use crate::domains::tournament::models::{Tournament, TournamentDraft};

// =============================================================================
// Mock Tournament API
// =============================================================================

/// A backend call captured by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetTournaments,
    CreateTournament(TournamentDraft),
    UpdateTournament(Tournament),
}

/// Scripted responses for one endpoint, keyed by a per-call label
/// (draft name for create, id for update, "" for fetch).
struct Script<T> {
    responses: Mutex<HashMap<String, VecDeque<ApiOutcome<T>>>>,
    holds: Mutex<HashMap<String, VecDeque<oneshot::Receiver<()>>>>,
}

impl<T> Script<T> {
    fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            holds: Mutex::new(HashMap::new()),
        }
    }

    fn push(&self, key: &str, outcome: ApiOutcome<T>) {
        self.responses
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(outcome);
    }

    fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (release, held) = oneshot::channel();
        self.holds
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(held);
        release
    }

    /// Wait for a pending hold on `key` (if any), then pop its response.
    async fn respond(&self, key: &str) -> Option<ApiOutcome<T>> {
        let held = self
            .holds
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(VecDeque::pop_front);
        if let Some(held) = held {
            // A dropped sender releases the call as well.
            let _ = held.await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
    }
}

/// In-memory backend.
///
/// Without a scripted response it behaves like a well-mannered server:
/// fetch returns nothing, create assigns `mock-N` ids, update echoes.
pub struct MockTournamentApi {
    get: Script<HashMap<String, Tournament>>,
    create: Script<Tournament>,
    update: Script<Tournament>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
    next_id: AtomicUsize,
}

impl MockTournamentApi {
    pub fn new() -> Self {
        Self {
            get: Script::new(),
            create: Script::new(),
            update: Script::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Queue a fetch-all outcome
    pub fn with_tournaments(self, outcome: ApiOutcome<HashMap<String, Tournament>>) -> Self {
        self.get.push("", outcome);
        self
    }

    /// Queue a create outcome for drafts named `name`
    pub fn with_create_response(self, name: &str, outcome: ApiOutcome<Tournament>) -> Self {
        self.create.push(name, outcome);
        self
    }

    /// Queue an update outcome for tournament `id`
    pub fn with_update_response(self, id: &str, outcome: ApiOutcome<Tournament>) -> Self {
        self.update.push(id, outcome);
        self
    }

    /// Hold the next fetch until the returned sender fires
    pub fn hold_fetch(&self) -> oneshot::Sender<()> {
        self.get.hold("")
    }

    /// Hold the next create of a draft named `name`
    pub fn hold_create(&self, name: &str) -> oneshot::Sender<()> {
        self.create.hold(name)
    }

    /// Hold the next update of tournament `id`
    pub fn hold_update(&self, id: &str) -> oneshot::Sender<()> {
        self.update.hold(id)
    }

    /// Get all calls in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockTournamentApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTournamentApi for MockTournamentApi {
    async fn get_tournaments(&self) -> ApiOutcome<HashMap<String, Tournament>> {
        self.calls.lock().unwrap().push(ApiCall::GetTournaments);

        match self.get.respond("").await {
            Some(outcome) => outcome,
            None => Ok(ApiResult::Ok(HashMap::new())),
        }
    }

    async fn create_tournament(&self, draft: &TournamentDraft) -> ApiOutcome<Tournament> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::CreateTournament(draft.clone()));

        let key = draft.name.clone().unwrap_or_default();
        if let Some(outcome) = self.create.respond(&key).await {
            return outcome;
        }

        let mut created = draft.clone();
        if created.id.is_none() {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            created.id = Some(format!("mock-{}", n));
        }
        match Tournament::try_from(created) {
            Ok(tournament) => Ok(ApiResult::Ok(tournament)),
            Err(e) => Ok(ApiResult::Problem(ApiProblem::new("invalid", e.to_string()))),
        }
    }

    async fn update_tournament(&self, tournament: &Tournament) -> ApiOutcome<Tournament> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::UpdateTournament(tournament.clone()));

        match self.update.respond(&tournament.id).await {
            Some(outcome) => outcome,
            None => Ok(ApiResult::Ok(tournament.clone())),
        }
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get all notifications that were delivered
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Just the descriptions, in delivery order
    pub fn descriptions(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.description.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().unwrap().is_empty()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        self.notifications.lock().unwrap().push(notification);
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub api: Arc<MockTournamentApi>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            api: Arc::new(MockTournamentApi::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    /// Set a mock backend
    pub fn mock_api(mut self, api: MockTournamentApi) -> Self {
        self.api = Arc::new(api);
        self
    }

    /// Build a kernel over an empty store using these mocks
    pub fn into_kernel(self) -> TournamentKernel {
        TournamentKernel::new(self.api, self.notifier)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
