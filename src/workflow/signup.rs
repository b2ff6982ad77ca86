use tracing::info;

use crate::api::UserGateway;
use crate::feedback::Notifier;
use crate::form::{FormController, FormModel, FormOptions, FormResult, SubmitOutcome};
use crate::model::{SignupDraft, SignupDraftFields, SignupPayload};
use crate::schema::{RuleError, apply_signup_schema};

pub const SIGNUP_COMPLETED_MESSAGE: &str = "Registration completed successfully";
pub const SIGNUP_FAILED_MESSAGE: &str = "Registration failed. Please try again";

/// The user-registration workflow. Before anything reaches the wire the
/// draft is narrowed to [`SignupPayload`], which drops the password
/// confirmation and the admin flag.
pub struct SignupForm {
    controller: FormController<SignupDraft, RuleError>,
}

impl SignupForm {
    pub fn new() -> FormResult<Self> {
        let controller = FormController::new(SignupDraft::default(), FormOptions::default());
        apply_signup_schema(&controller)?;
        Ok(Self { controller })
    }

    pub fn fields() -> SignupDraftFields {
        SignupDraft::fields()
    }

    pub fn controller(&self) -> &FormController<SignupDraft, RuleError> {
        &self.controller
    }

    pub fn submit_allowed(&self) -> FormResult<bool> {
        self.controller.submit_allowed()
    }

    /// Runs one registration round trip. On success the draft resets and
    /// `on_navigate` fires (the shell moves to the login view). A rejection
    /// surfaces the server-supplied message when one is present, otherwise
    /// the generic fallback, and keeps the draft for retry.
    pub async fn submit<G, N, F>(
        &self,
        gateway: &G,
        notifier: &N,
        on_navigate: F,
    ) -> FormResult<SubmitOutcome>
    where
        G: UserGateway + ?Sized,
        N: Notifier + ?Sized,
        F: FnOnce(),
    {
        let outcome = self
            .controller
            .submit_async(|draft| async move {
                let payload = SignupPayload::from(&draft);
                gateway.create_user(&payload).await.map_err(|err| {
                    err.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| SIGNUP_FAILED_MESSAGE.to_string())
                })
            })
            .await?;

        match &outcome {
            SubmitOutcome::Completed => {
                info!("user registered");
                notifier.success(SIGNUP_COMPLETED_MESSAGE);
                on_navigate();
            }
            SubmitOutcome::Rejected(message) => notifier.error(message),
            SubmitOutcome::Blocked | SubmitOutcome::AlreadyInFlight => {}
        }
        Ok(outcome)
    }
}
