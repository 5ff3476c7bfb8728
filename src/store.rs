use crate::client::OfferApi;
use crate::errors::StoreError;
use crate::models::{ApplicationState, OfferDraftPatch, OfferSubmission, View};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct AppStore {
    state: watch::Sender<ApplicationState>,
    api: Arc<dyn OfferApi>,
}

impl AppStore {
    pub fn new(api: Arc<dyn OfferApi>) -> Self {
        let (state, _) = watch::channel(ApplicationState::default());
        Self { state, api }
    }

    pub fn snapshot(&self) -> ApplicationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApplicationState> {
        self.state.subscribe()
    }

    pub fn update_form_data(&self, patch: OfferDraftPatch) {
        self.state.send_modify(|state| state.draft.apply(patch));
    }

    pub fn set_current_view(&self, view: View) {
        self.state.send_modify(|state| state.current_view = view);
    }

    pub fn set_submitted_data(&self, data: Option<OfferSubmission>) {
        self.state.send_modify(|state| state.last_submitted = data);
    }

    pub fn reset_form(&self) {
        self.state.send_modify(|state| {
            state.draft = OfferSubmission::default();
            state.current_view = View::Form;
            state.last_submitted = None;
            state.is_submitting = false;
            state.epoch = state.epoch.wrapping_add(1);
        });
    }

    /// Validation is the caller's job. A response that lands after a reset is
    /// not applied.
    pub async fn submit_form(&self, data: OfferSubmission) -> Result<(), StoreError> {
        let mut epoch = None;
        self.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            state.is_submitting = true;
            epoch = Some(state.epoch);
            true
        });
        let Some(epoch) = epoch else {
            warn!("rejecting submission while another is in flight");
            return Err(StoreError::SubmissionInFlight);
        };

        let pending = PendingSubmit {
            state: &self.state,
            epoch,
            settled: false,
        };
        let result = self.api.submit(&data).await;
        pending.settle(result.as_ref().ok().map(|_| &data));

        match result {
            Ok(response) => {
                info!(
                    offer_count = data.offer_count,
                    salary_range = %data.salary_range,
                    industry = %data.industry,
                    reply = %response.message,
                    "offer submitted"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

// Clears `is_submitting` for its epoch even when the submit future is dropped
// before the backend answers.
struct PendingSubmit<'a> {
    state: &'a watch::Sender<ApplicationState>,
    epoch: u64,
    settled: bool,
}

impl PendingSubmit<'_> {
    fn settle(mut self, accepted: Option<&OfferSubmission>) {
        let epoch = self.epoch;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.is_submitting = false;
            if let Some(data) = accepted {
                state.last_submitted = Some(data.clone());
                state.current_view = View::Dashboard;
            }
            true
        });
        self.settled = true;
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let epoch = self.epoch;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch || !state.is_submitting {
                return false;
            }
            state.is_submitting = false;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use crate::models::{ApiResponse, StatisticsSnapshot};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeApi {
        fail_with: Option<u16>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OfferApi for FakeApi {
        async fn submit(
            &self,
            submission: &OfferSubmission,
        ) -> Result<ApiResponse<OfferSubmission>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.fail_with {
                Some(status) => Err(ApiError::Server {
                    status,
                    message: "boom".into(),
                }),
                None => Ok(ApiResponse {
                    message: "ok".into(),
                    data: Some(submission.clone()),
                    error: None,
                }),
            }
        }

        async fn check_health(&self) -> Result<ApiResponse<serde_json::Value>, ApiError> {
            unreachable!("store never checks health")
        }

        async fn get_stats(
            &self,
            _industry: Option<&str>,
            _salary_range: Option<&str>,
        ) -> Result<ApiResponse<StatisticsSnapshot>, ApiError> {
            unreachable!("store never fetches stats")
        }
    }

    fn sample() -> OfferSubmission {
        OfferSubmission {
            offer_count: 2,
            salary_range: "15-20K".into(),
            industry: "互联网".into(),
        }
    }

    #[test]
    fn draft_is_last_write_wins_merge() {
        let store = AppStore::new(Arc::new(FakeApi::default()));
        store.update_form_data(OfferDraftPatch {
            offer_count: Some(1),
            salary_range: Some("5-10K".into()),
            ..Default::default()
        });
        store.update_form_data(OfferDraftPatch {
            salary_range: Some("30-40K".into()),
            industry: Some("金融".into()),
            ..Default::default()
        });
        store.update_form_data(OfferDraftPatch {
            offer_count: Some(4),
            ..Default::default()
        });

        let draft = store.snapshot().draft;
        assert_eq!(draft.offer_count, 4);
        assert_eq!(draft.salary_range, "30-40K");
        assert_eq!(draft.industry, "金融");
    }

    #[tokio::test]
    async fn successful_submit_switches_to_dashboard() {
        let store = AppStore::new(Arc::new(FakeApi::default()));
        store.submit_form(sample()).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_view, View::Dashboard);
        assert_eq!(state.last_submitted, Some(sample()));
        assert!(!state.is_submitting);
    }

    #[tokio::test]
    async fn failed_submit_keeps_previous_record() {
        let store = AppStore::new(Arc::new(FakeApi {
            fail_with: Some(500),
            ..Default::default()
        }));
        let previous = OfferSubmission {
            offer_count: 1,
            salary_range: "5-10K".into(),
            industry: "教育".into(),
        };
        store.set_submitted_data(Some(previous.clone()));

        let err = store.submit_form(sample()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Api(ApiError::Server { status: 500, .. })
        ));

        let state = store.snapshot();
        assert!(!state.is_submitting);
        assert_eq!(state.last_submitted, Some(previous));
        assert_eq!(state.current_view, View::Form);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let store = AppStore::new(Arc::new(FakeApi::default()));
        store.update_form_data(sample().into());
        store.submit_form(sample()).await.unwrap();

        store.reset_form();
        store.reset_form();

        let state = store.snapshot();
        assert_eq!(state.draft, OfferSubmission::default());
        assert_eq!(state.current_view, View::Form);
        assert_eq!(state.last_submitted, None);
    }

    #[tokio::test]
    async fn second_submit_is_rejected_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let store = Arc::new(AppStore::new(api.clone()));

        let mut rx = store.subscribe();
        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.submit_form(sample()).await }
        });
        rx.wait_for(|state| state.is_submitting).await.unwrap();

        let second = store.submit_form(sample()).await;
        assert!(matches!(second, Err(StoreError::SubmissionInFlight)));

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(!store.snapshot().is_submitting);
    }

    #[tokio::test]
    async fn response_after_reset_is_ignored() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(AppStore::new(Arc::new(FakeApi {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        })));

        let mut rx = store.subscribe();
        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.submit_form(sample()).await }
        });
        rx.wait_for(|state| state.is_submitting).await.unwrap();

        store.reset_form();
        gate.notify_one();
        pending.await.unwrap().unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_view, View::Form);
        assert_eq!(state.last_submitted, None);
        assert!(!state.is_submitting);
    }

    #[tokio::test]
    async fn dropped_submit_does_not_block_the_next_one() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let store = Arc::new(AppStore::new(api.clone()));

        let mut rx = store.subscribe();
        let abandoned = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.submit_form(sample()).await }
        });
        rx.wait_for(|state| state.is_submitting).await.unwrap();

        abandoned.abort();
        assert!(abandoned.await.unwrap_err().is_cancelled());
        let state = store.snapshot();
        assert!(!state.is_submitting);
        assert_eq!(state.last_submitted, None);
        assert_eq!(state.current_view, View::Form);

        gate.notify_one();
        store.submit_form(sample()).await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.snapshot().last_submitted, Some(sample()));
    }

    #[tokio::test]
    async fn reset_releases_a_pending_submission() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let store = Arc::new(AppStore::new(api.clone()));

        let mut rx = store.subscribe();
        let stuck = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.submit_form(sample()).await }
        });
        rx.wait_for(|state| state.is_submitting).await.unwrap();

        store.reset_form();
        assert!(!store.snapshot().is_submitting);

        let retry = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.submit_form(sample()).await }
        });
        rx.wait_for(|state| state.is_submitting).await.unwrap();
        stuck.abort();
        let _ = stuck.await;
        assert!(store.snapshot().is_submitting);

        gate.notify_one();
        retry.await.unwrap().unwrap();
        let state = store.snapshot();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.current_view, View::Dashboard);
        assert!(!state.is_submitting);
    }

    #[tokio::test]
    async fn observers_see_view_changes() {
        let store = AppStore::new(Arc::new(FakeApi::default()));
        let mut rx = store.subscribe();
        store.set_current_view(View::Dashboard);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().current_view, View::Dashboard);
    }
}
