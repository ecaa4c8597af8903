use super::*;
use std::sync::Mutex;
use tokio::time::{Duration, timeout};

/// Backend that replays canned outcomes and records the queries it saw.
struct MockBackend {
    outcomes: Mutex<Vec<Result<AnswerResult, AskError>>>,
    queries: Mutex<Vec<String>>,
}

impl MockBackend {
    fn new(outcomes: Vec<Result<AnswerResult, AskError>>) -> Self {
        Self { outcomes: Mutex::new(outcomes), queries: Mutex::new(Vec::new()) }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("mock mutex should lock").clone()
    }
}

#[async_trait::async_trait]
impl AskBackend for MockBackend {
    async fn ask(&self, query: &str) -> Result<AnswerResult, AskError> {
        self.queries.lock().expect("mock mutex should lock").push(query.to_owned());
        let mut outcomes = self.outcomes.lock().expect("mock mutex should lock");
        if outcomes.is_empty() {
            Err(AskError::Transport("no canned outcome".into()))
        } else {
            outcomes.remove(0)
        }
    }
}

/// Backend whose call never resolves.
struct HangingBackend;

#[async_trait::async_trait]
impl AskBackend for HangingBackend {
    async fn ask(&self, _query: &str) -> Result<AnswerResult, AskError> {
        std::future::pending().await
    }
}

fn answer(text: &str) -> AnswerResult {
    AnswerResult::new(text, Some(vec!["doc1.pdf".into()]), Some(0.5)).unwrap()
}

// =============================================================
// update_question
// =============================================================

#[test]
fn new_form_is_idle_with_empty_question() {
    let form = QueryForm::new();
    assert_eq!(form.question(), "");
    assert_eq!(form.state(), &RequestState::Idle);
    assert!(!form.is_loading());
}

#[test]
fn update_question_replaces_text_without_touching_state() {
    let mut form = QueryForm::new();
    form.update_question("first");
    form.update_question("second");
    assert_eq!(form.question(), "second");
    assert_eq!(form.state(), &RequestState::Idle);
}

// =============================================================
// submit
// =============================================================

#[tokio::test]
async fn submit_success_lands_in_succeeded() {
    let backend = MockBackend::new(vec![Ok(answer("Paris"))]);
    let mut form = QueryForm::new();
    form.update_question("capital of France?");

    let state = form.submit(&backend).await.unwrap();
    assert_eq!(state.answer().map(AnswerResult::answer), Some("Paris"));
    assert!(state.error().is_none());
    assert!(!form.is_loading());
    assert_eq!(backend.queries(), vec!["capital of France?".to_owned()]);
}

#[tokio::test]
async fn submit_status_failure_lands_in_failed_without_answer() {
    let backend = MockBackend::new(vec![Err(AskError::Status { status: 500 })]);
    let mut form = QueryForm::new();

    let state = form.submit(&backend).await.unwrap();
    assert!(state.answer().is_none());
    assert!(!state.error().unwrap().is_empty());
    assert!(!form.is_loading());
}

#[tokio::test]
async fn submit_parse_failure_lands_in_failed() {
    let backend = MockBackend::new(vec![Err(AskError::Parse("expected value".into()))]);
    let mut form = QueryForm::new();

    form.submit(&backend).await.unwrap();
    assert!(matches!(form.state(), RequestState::Failed(_)));
}

#[tokio::test]
async fn submit_sends_empty_question_as_is() {
    let backend = MockBackend::new(vec![Ok(answer("?"))]);
    let mut form = QueryForm::new();

    form.submit(&backend).await.unwrap();
    assert_eq!(backend.queries(), vec![String::new()]);
}

#[tokio::test]
async fn resubmit_after_failure_replaces_error() {
    let backend = MockBackend::new(vec![Err(AskError::Timeout), Ok(answer("second try"))]);
    let mut form = QueryForm::new();

    form.submit(&backend).await.unwrap();
    assert!(form.state().error().is_some());

    form.submit(&backend).await.unwrap();
    assert!(form.state().error().is_none());
    assert_eq!(form.state().answer().map(AnswerResult::answer), Some("second try"));
}

#[tokio::test]
async fn resubmit_after_success_replaces_answer_wholesale() {
    let backend = MockBackend::new(vec![Ok(answer("one")), Err(AskError::Status { status: 404 })]);
    let mut form = QueryForm::new();

    form.submit(&backend).await.unwrap();
    form.submit(&backend).await.unwrap();
    assert!(form.state().answer().is_none());
    assert!(form.state().error().is_some());
}

#[tokio::test]
async fn submit_works_through_trait_object() {
    let backend: Box<dyn AskBackend> = Box::new(MockBackend::new(vec![Ok(answer("dyn"))]));
    let mut form = QueryForm::new();

    let state = form.submit(backend.as_ref()).await.unwrap();
    assert_eq!(state.answer().map(AnswerResult::answer), Some("dyn"));
}

#[tokio::test]
async fn dropped_submission_does_not_stay_loading() {
    let mut form = QueryForm::new();
    form.update_question("slow");

    let elapsed = timeout(Duration::from_millis(20), form.submit(&HangingBackend)).await;
    assert!(elapsed.is_err());
    assert!(!form.is_loading());
    assert_eq!(form.state(), &RequestState::Failed(AskError::Cancelled.to_string()));
}

#[tokio::test]
async fn submit_refused_while_split_submission_in_flight() {
    let backend = MockBackend::new(vec![Ok(answer("unused"))]);
    let mut form = QueryForm::new();
    form.begin_submit().unwrap();

    let err = form.submit(&backend).await.unwrap_err();
    assert_eq!(err, FormError::Busy);
    assert!(form.is_loading());
    assert!(backend.queries().is_empty());
}

// =============================================================
// begin_submit / complete
// =============================================================

#[test]
fn loading_only_between_begin_and_complete() {
    let mut form = QueryForm::new();
    assert!(!form.is_loading());

    let submission = form.begin_submit().unwrap();
    assert!(form.is_loading());

    form.complete(submission.ticket, Err(AskError::Status { status: 502 })).unwrap();
    assert!(!form.is_loading());
}

#[test]
fn begin_submit_clears_previous_outcome() {
    let mut form = QueryForm::new();
    let first = form.begin_submit().unwrap();
    form.complete(first.ticket, Err(AskError::Timeout)).unwrap();

    form.begin_submit().unwrap();
    assert_eq!(form.state(), &RequestState::Loading);
    assert!(form.state().error().is_none());
}

#[test]
fn begin_submit_captures_question_and_increments_ticket() {
    let mut form = QueryForm::new();
    form.update_question("a");
    let first = form.begin_submit().unwrap();
    form.complete(first.ticket, Ok(answer("x"))).unwrap();

    form.update_question("b");
    let second = form.begin_submit().unwrap();
    assert_eq!(first.query, "a");
    assert_eq!(second.query, "b");
    assert!(second.ticket > first.ticket);
}

#[test]
fn begin_submit_while_loading_is_busy() {
    let mut form = QueryForm::new();
    form.begin_submit().unwrap();
    assert_eq!(form.begin_submit(), Err(FormError::Busy));
}

#[test]
fn editing_question_while_loading_does_not_change_in_flight_query() {
    let mut form = QueryForm::new();
    form.update_question("original");
    let submission = form.begin_submit().unwrap();
    form.update_question("edited");
    assert_eq!(submission.query, "original");
    assert!(form.is_loading());
}

#[test]
fn stale_ticket_is_rejected() {
    let mut form = QueryForm::new();
    let first = form.begin_submit().unwrap();
    form.complete(first.ticket, Ok(answer("first"))).unwrap();
    let second = form.begin_submit().unwrap();

    let err = form.complete(first.ticket, Ok(answer("late"))).unwrap_err();
    assert_eq!(err, FormError::StaleTicket { ticket: first.ticket });
    assert_eq!(form.state(), &RequestState::Loading);

    form.complete(second.ticket, Ok(answer("second"))).unwrap();
    assert_eq!(form.state().answer().map(AnswerResult::answer), Some("second"));
}

#[test]
fn completing_twice_is_rejected() {
    let mut form = QueryForm::new();
    let submission = form.begin_submit().unwrap();
    form.complete(submission.ticket, Ok(answer("once"))).unwrap();

    let err = form.complete(submission.ticket, Err(AskError::Timeout)).unwrap_err();
    assert!(matches!(err, FormError::StaleTicket { .. }));
    assert_eq!(form.state().answer().map(AnswerResult::answer), Some("once"));
}
