use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::*;
use crate::api::{ApiError, CardGateway, UserGateway};
use crate::feedback::{NoticeKind, NoticeLog};
use crate::form::{FieldLens, FormModel, SubmitOutcome, SubmitState};
use crate::model::{AddressDraft, CardDraft, NameDraft, SignupPayload};

#[derive(Default)]
struct RecordingCardGateway {
    calls: AtomicUsize,
    last: Mutex<Option<CardDraft>>,
}

#[async_trait]
impl CardGateway for RecordingCardGateway {
    async fn create_card(&self, card: &CardDraft) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(card.clone());
        Ok(())
    }
}

struct RejectingUserGateway {
    calls: AtomicUsize,
    message: Option<&'static str>,
}

impl RejectingUserGateway {
    fn new(message: Option<&'static str>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            message,
        }
    }
}

#[async_trait]
impl UserGateway for RejectingUserGateway {
    async fn create_user(&self, _user: &SignupPayload) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::Rejected {
            status: 400,
            message: self.message.map(str::to_string),
        })
    }
}

#[derive(Default)]
struct RecordingUserGateway {
    calls: AtomicUsize,
    last: Mutex<Option<SignupPayload>>,
}

#[async_trait]
impl UserGateway for RecordingUserGateway {
    async fn create_user(&self, user: &SignupPayload) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(user.clone());
        Ok(())
    }
}

/// Card gateway that holds the request open until the test releases it.
struct GatedCardGateway {
    calls: AtomicUsize,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedCardGateway {
    fn new(gate: oneshot::Receiver<()>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: Mutex::new(Some(gate)),
        }
    }
}

#[async_trait]
impl CardGateway for GatedCardGateway {
    async fn create_card(&self, _card: &CardDraft) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(())
    }
}

fn fill_valid_card(form: &CardForm) {
    let fields = CardForm::fields();
    let address = AddressDraft::fields();
    let controller = form.controller();
    controller
        .set(fields.title(), "Dev Studio".to_string())
        .expect("set title");
    controller
        .set(fields.subtitle(), "Software".to_string())
        .expect("set subtitle");
    controller
        .set(fields.description(), "We build business software".to_string())
        .expect("set description");
    controller
        .set(fields.phone(), "0501234567".to_string())
        .expect("set phone");
    controller
        .set(fields.email(), "owner@example.com".to_string())
        .expect("set email");
    controller
        .set(fields.address().then(address.country()), "Israel".to_string())
        .expect("set country");
    controller
        .set(fields.address().then(address.city()), "Tel Aviv".to_string())
        .expect("set city");
    controller
        .set(fields.address().then(address.street()), "Herzl".to_string())
        .expect("set street");
    controller
        .set(fields.address().then(address.house_number()), 7u32)
        .expect("set house number");
    controller
        .set(fields.address().then(address.zip()), 12345u32)
        .expect("set zip");
}

fn fill_valid_signup(form: &SignupForm) {
    let fields = SignupForm::fields();
    let name = NameDraft::fields();
    let address = AddressDraft::fields();
    let controller = form.controller();
    controller
        .set(fields.name().then(name.first()), "Dana".to_string())
        .expect("set first name");
    controller
        .set(fields.name().then(name.last()), "Levi".to_string())
        .expect("set last name");
    controller
        .set(fields.phone(), "0501234567".to_string())
        .expect("set phone");
    controller
        .set(fields.email(), "dana@example.com".to_string())
        .expect("set email");
    controller
        .set(fields.password(), "Abcdef1!".to_string())
        .expect("set password");
    controller
        .set(fields.confirm_password(), "Abcdef1!".to_string())
        .expect("set confirm password");
    controller
        .set(fields.address().then(address.country()), "Israel".to_string())
        .expect("set country");
    controller
        .set(fields.address().then(address.city()), "Tel Aviv".to_string())
        .expect("set city");
    controller
        .set(fields.address().then(address.street()), "Herzl".to_string())
        .expect("set street");
    controller
        .set(fields.address().then(address.house_number()), 7u32)
        .expect("set house number");
    controller
        .set(fields.address().then(address.zip()), 12345u32)
        .expect("set zip");
}

#[tokio::test]
async fn card_submit_posts_once_then_resets_and_closes() {
    let form = CardForm::new().expect("card form");
    fill_valid_card(&form);
    assert!(form.submit_allowed().expect("submit allowed"));

    let gateway = RecordingCardGateway::default();
    let notices = NoticeLog::new();
    let closed = AtomicBool::new(false);

    let outcome = form
        .submit(&gateway, &notices, || {
            closed.store(true, Ordering::SeqCst);
        })
        .await
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    assert!(closed.load(Ordering::SeqCst));

    let sent = gateway.last.lock().unwrap().clone().expect("captured draft");
    assert_eq!(sent.title, "Dev Studio");
    assert_eq!(sent.address.house_number, 7);

    let notice = notices.latest().expect("a notice was pushed");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, CARD_CREATED_MESSAGE);

    let snapshot = form.controller().snapshot().expect("snapshot");
    assert_eq!(snapshot.model, CardDraft::default());
    assert_eq!(snapshot.submit_state, SubmitState::Succeeded);
}

#[tokio::test]
async fn card_rejection_uses_generic_message() {
    struct FailingCardGateway;

    #[async_trait]
    impl CardGateway for FailingCardGateway {
        async fn create_card(&self, _card: &CardDraft) -> Result<(), ApiError> {
            Err(ApiError::Rejected {
                status: 500,
                message: Some("internal stack trace".to_string()),
            })
        }
    }

    let form = CardForm::new().expect("card form");
    fill_valid_card(&form);
    let notices = NoticeLog::new();
    let closed = AtomicBool::new(false);

    let outcome = form
        .submit(&FailingCardGateway, &notices, || {
            closed.store(true, Ordering::SeqCst);
        })
        .await
        .expect("submit");

    // Card failures never leak the server body; the message is always generic.
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(CARD_CREATE_FAILED_MESSAGE.to_string())
    );
    assert!(!closed.load(Ordering::SeqCst));
    let notice = notices.latest().expect("a notice was pushed");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, CARD_CREATE_FAILED_MESSAGE);

    let snapshot = form.controller().snapshot().expect("snapshot");
    assert_eq!(snapshot.model.title, "Dev Studio");
}

#[tokio::test]
async fn signup_password_mismatch_blocks_without_any_call() {
    let form = SignupForm::new().expect("signup form");
    fill_valid_signup(&form);
    let fields = SignupForm::fields();
    form.controller()
        .set(fields.confirm_password(), "Different1!".to_string())
        .expect("set mismatching confirmation");

    let gateway = RecordingUserGateway::default();
    let notices = NoticeLog::new();
    let navigated = AtomicBool::new(false);

    let outcome = form
        .submit(&gateway, &notices, || {
            navigated.store(true, Ordering::SeqCst);
        })
        .await
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Blocked);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    assert!(!navigated.load(Ordering::SeqCst));
    assert!(notices.entries().is_empty());
    assert_eq!(
        form.controller().submit_state().expect("submit state"),
        SubmitState::Idle
    );
    assert_eq!(
        form.controller()
            .field_error(fields.confirm_password())
            .expect("field error"),
        Some("Passwords do not match".to_string())
    );
}

#[tokio::test]
async fn signup_success_strips_client_only_fields_and_navigates() {
    let form = SignupForm::new().expect("signup form");
    fill_valid_signup(&form);
    let fields = SignupForm::fields();
    form.controller()
        .set(fields.is_business(), true)
        .expect("set business flag");

    let gateway = RecordingUserGateway::default();
    let notices = NoticeLog::new();
    let navigated = AtomicBool::new(false);

    let outcome = form
        .submit(&gateway, &notices, || {
            navigated.store(true, Ordering::SeqCst);
        })
        .await
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Completed);
    assert!(navigated.load(Ordering::SeqCst));
    assert_eq!(
        notices.latest().map(|notice| notice.message),
        Some(SIGNUP_COMPLETED_MESSAGE.to_string())
    );

    let payload = gateway.last.lock().unwrap().clone().expect("captured payload");
    assert_eq!(payload.email, "dana@example.com");
    assert!(payload.is_business);
    let body = serde_json::to_value(&payload).expect("payload serializes");
    let object = body.as_object().expect("payload is a json object");
    assert!(!object.contains_key("confirmPassword"));
    assert!(!object.contains_key("isAdmin"));
}

#[tokio::test]
async fn signup_rejection_surfaces_server_message_verbatim() {
    let form = SignupForm::new().expect("signup form");
    fill_valid_signup(&form);

    let gateway = RejectingUserGateway::new(Some("Email exists"));
    let notices = NoticeLog::new();

    let outcome = form
        .submit(&gateway, &notices, || {})
        .await
        .expect("submit");

    assert_eq!(outcome, SubmitOutcome::Rejected("Email exists".to_string()));
    let notice = notices.latest().expect("a notice was pushed");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Email exists");

    // Draft retained for retry.
    let snapshot = form.controller().snapshot().expect("snapshot");
    assert_eq!(snapshot.model.email, "dana@example.com");
    assert_eq!(
        snapshot.submit_state,
        SubmitState::Failed("Email exists".to_string())
    );
}

#[tokio::test]
async fn signup_rejection_without_body_falls_back_to_generic_message() {
    let form = SignupForm::new().expect("signup form");
    fill_valid_signup(&form);

    let gateway = RejectingUserGateway::new(None);
    let notices = NoticeLog::new();

    let outcome = form
        .submit(&gateway, &notices, || {})
        .await
        .expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(SIGNUP_FAILED_MESSAGE.to_string())
    );
    assert_eq!(
        notices.latest().map(|notice| notice.message),
        Some(SIGNUP_FAILED_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn second_submit_while_in_flight_is_a_noop() {
    let (release, gate) = oneshot::channel();
    let gateway = Arc::new(GatedCardGateway::new(gate));
    let form = Arc::new(CardForm::new().expect("card form"));
    fill_valid_card(&form);
    let notices = NoticeLog::new();

    let first = {
        let form = form.clone();
        let gateway = gateway.clone();
        let notices = notices.clone();
        tokio::spawn(async move {
            form.submit(gateway.as_ref(), &notices, || {})
                .await
                .expect("first submit")
        })
    };

    while !form.controller().is_submitting().expect("submitting flag") {
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert!(!form.submit_allowed().expect("submit allowed"));

    let second = form
        .submit(gateway.as_ref(), &notices, || {})
        .await
        .expect("second submit");
    assert_eq!(second, SubmitOutcome::AlreadyInFlight);

    release.send(()).expect("release the gated request");
    let first = first.await.expect("first submit task");
    assert_eq!(first, SubmitOutcome::Completed);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    assert_eq!(notices.entries().len(), 1);
}
