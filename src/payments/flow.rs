use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::PaymentRequest;
use crate::forms::PhonePolicy;
use crate::geo::LivenessFlag;

/// Screens of the confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    PhoneEntry,
    Confirm,
    Processing,
    Success,
    Failed,
}

impl PaymentStage {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStage::PhoneEntry => "phone_entry",
            PaymentStage::Confirm => "confirm",
            PaymentStage::Processing => "processing",
            PaymentStage::Success => "success",
            PaymentStage::Failed => "failed",
        }
    }
}

/// The provider's two possible answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success { reference: String },
    Cancelled,
}

/// Where payment outcomes come from: a real provider callback or a test script.
pub trait PaymentOutcomeSource: Send + Sync {
    fn resolve(&self, request: &PaymentRequest) -> impl Future<Output = PaymentOutcome> + Send;
}

/// Answers every request the same way, echoing the request reference on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedProvider {
    Approve,
    Decline,
}

impl PaymentOutcomeSource for SimulatedProvider {
    fn resolve(&self, request: &PaymentRequest) -> impl Future<Output = PaymentOutcome> + Send {
        let outcome = match self {
            SimulatedProvider::Approve => PaymentOutcome::Success {
                reference: request.reference.clone(),
            },
            SimulatedProvider::Decline => PaymentOutcome::Cancelled,
        };
        std::future::ready(outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Please enter a valid M-Pesa phone number.")]
    InvalidPhone,
    #[error("cannot {action} while payment is in the {} stage", .stage.label())]
    InvalidTransition {
        stage: PaymentStage,
        action: &'static str,
    },
    #[error("payment modal was closed before the provider answered")]
    Closed,
}

/// Tells the UI to dismiss the modal once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseSignal {
    pub after: Duration,
}

impl CloseSignal {
    pub async fn wait(self) {
        tokio::time::sleep(self.after).await;
    }
}

/// State of one payment attempt. Dropping it discards the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentFlow {
    request: PaymentRequest,
    stage: PaymentStage,
    phone: Option<String>,
    reference: Option<String>,
    attempts: u32,
}

impl PaymentFlow {
    pub fn new(request: PaymentRequest) -> Self {
        Self {
            request,
            stage: PaymentStage::PhoneEntry,
            phone: None,
            reference: None,
            attempts: 0,
        }
    }

    pub fn stage(&self) -> PaymentStage {
        self.stage
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    /// Canonical payer number once accepted.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Provider reference after a successful payment.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn expect_stage(&self, stage: PaymentStage, action: &'static str) -> Result<(), PaymentError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(PaymentError::InvalidTransition {
                stage: self.stage,
                action,
            })
        }
    }

    /// phone-entry → confirm when the number passes `policy`. A bad number keeps the stage.
    pub fn submit_phone(&mut self, phone: &str, policy: &PhonePolicy) -> Result<(), PaymentError> {
        self.expect_stage(PaymentStage::PhoneEntry, "submit a phone number")?;
        let canonical = policy
            .canonical(phone.trim())
            .ok_or(PaymentError::InvalidPhone)?;
        self.phone = Some(canonical);
        self.stage = PaymentStage::Confirm;
        Ok(())
    }

    /// confirm → phone-entry, to correct the number.
    pub fn back(&mut self) -> Result<(), PaymentError> {
        self.expect_stage(PaymentStage::Confirm, "go back")?;
        self.stage = PaymentStage::PhoneEntry;
        Ok(())
    }

    /// confirm → processing.
    pub fn confirm(&mut self) -> Result<(), PaymentError> {
        self.expect_stage(PaymentStage::Confirm, "confirm")?;
        self.attempts += 1;
        self.stage = PaymentStage::Processing;
        Ok(())
    }

    /// processing → success | failed.
    pub fn complete(&mut self, outcome: PaymentOutcome) -> Result<PaymentStage, PaymentError> {
        self.expect_stage(PaymentStage::Processing, "record an outcome")?;
        self.stage = match outcome {
            PaymentOutcome::Success { reference } => {
                self.reference = Some(reference);
                PaymentStage::Success
            }
            PaymentOutcome::Cancelled => PaymentStage::Failed,
        };
        Ok(self.stage)
    }

    /// failed → phone-entry.
    pub fn retry(&mut self) -> Result<(), PaymentError> {
        self.expect_stage(PaymentStage::Failed, "retry")?;
        self.stage = PaymentStage::PhoneEntry;
        Ok(())
    }

    /// User-facing summary of a finished attempt.
    pub fn message(&self) -> Option<String> {
        match self.stage {
            PaymentStage::Success => self
                .reference
                .as_ref()
                .map(|reference| format!("Transaction {reference} completed successfully.")),
            PaymentStage::Failed => Some("Payment was cancelled. You can try again.".to_string()),
            _ => None,
        }
    }
}

/// Drives a confirmed flow through the outcome source.
pub struct PaymentProcessor<O> {
    source: O,
    close_delay: Duration,
}

impl<O: PaymentOutcomeSource> PaymentProcessor<O> {
    pub fn new(source: O, close_delay: Duration) -> Self {
        Self {
            source,
            close_delay,
        }
    }

    /// Confirm, wait for the provider, and record the answer.
    ///
    /// Returns a [`CloseSignal`] on success. An answer that arrives after
    /// `liveness` was closed is dropped and the flow is left untouched.
    pub async fn process(
        &self,
        flow: &mut PaymentFlow,
        liveness: &LivenessFlag,
    ) -> Result<Option<CloseSignal>, PaymentError> {
        flow.confirm()?;
        info!(
            reference = %flow.request().reference,
            attempt = flow.attempts(),
            "payment processing"
        );

        let outcome = self.source.resolve(flow.request()).await;
        let outcome = liveness.deliver(outcome).ok_or(PaymentError::Closed)?;

        match flow.complete(outcome)? {
            PaymentStage::Success => {
                info!(reference = flow.reference().unwrap_or_default(), "payment succeeded");
                Ok(Some(CloseSignal {
                    after: self.close_delay,
                }))
            }
            stage => {
                warn!(stage = stage.label(), "payment not completed");
                Ok(None)
            }
        }
    }
}
