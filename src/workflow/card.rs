use tracing::info;

use crate::api::CardGateway;
use crate::feedback::Notifier;
use crate::form::{FormController, FormModel, FormOptions, FormResult, SubmitOutcome};
use crate::model::{CardDraft, CardDraftFields};
use crate::schema::{RuleError, apply_card_schema};

pub const CARD_CREATED_MESSAGE: &str = "The card was created successfully";
pub const CARD_CREATE_FAILED_MESSAGE: &str = "Something went wrong while creating the card";

/// The card-creation workflow: one draft, the card schema, and a single
/// in-flight submission to the card endpoint.
pub struct CardForm {
    controller: FormController<CardDraft, RuleError>,
}

impl CardForm {
    pub fn new() -> FormResult<Self> {
        let controller = FormController::new(CardDraft::default(), FormOptions::default());
        apply_card_schema(&controller)?;
        Ok(Self { controller })
    }

    pub fn fields() -> CardDraftFields {
        CardDraft::fields()
    }

    pub fn controller(&self) -> &FormController<CardDraft, RuleError> {
        &self.controller
    }

    /// Whether the submit trigger should be enabled right now.
    pub fn submit_allowed(&self) -> FormResult<bool> {
        self.controller.submit_allowed()
    }

    /// Runs one submission round trip. On success the draft resets and
    /// `on_close` fires (the hosting overlay closes); on rejection the
    /// notifier gets the generic card failure message and the draft stays
    /// for retry. Errors never escape past this call.
    pub async fn submit<G, N, F>(
        &self,
        gateway: &G,
        notifier: &N,
        on_close: F,
    ) -> FormResult<SubmitOutcome>
    where
        G: CardGateway + ?Sized,
        N: Notifier + ?Sized,
        F: FnOnce(),
    {
        let outcome = self
            .controller
            .submit_async(|draft| async move {
                gateway
                    .create_card(&draft)
                    .await
                    .map_err(|_| CARD_CREATE_FAILED_MESSAGE.to_string())
            })
            .await?;

        match &outcome {
            SubmitOutcome::Completed => {
                info!("card created");
                notifier.success(CARD_CREATED_MESSAGE);
                on_close();
            }
            SubmitOutcome::Rejected(message) => notifier.error(message),
            SubmitOutcome::Blocked | SubmitOutcome::AlreadyInFlight => {}
        }
        Ok(outcome)
    }
}
