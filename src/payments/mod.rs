//! Job posting plans, checkout requests, and the mobile-money confirmation flow.

pub mod flow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::User;

pub use flow::{
    CloseSignal, PaymentError, PaymentFlow, PaymentOutcome, PaymentOutcomeSource,
    PaymentProcessor, PaymentStage, SimulatedProvider,
};

pub const CURRENCY: &str = "KES";
/// Payer email used when nobody is signed in.
pub const FALLBACK_PAYER_EMAIL: &str = "customer@example.com";
pub const REFERENCE_PREFIX: &str = "KWA";

/// A job posting tier as offered on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Whole shillings.
    pub price: u32,
    pub description: &'static str,
    pub listed_days: u16,
    pub features: &'static [&'static str],
    pub popular: bool,
}

impl PostingPlan {
    pub fn is_free(&self) -> bool {
        self.price == 0
    }
}

const PLANS: [PostingPlan; 3] = [
    PostingPlan {
        id: "basic",
        name: "Basic Post",
        price: 0,
        description: "Standard job posting",
        listed_days: 7,
        features: &[
            "Posted for 7 days",
            "Basic visibility",
            "Email notifications",
            "Basic support",
        ],
        popular: false,
    },
    PostingPlan {
        id: "premium",
        name: "Premium Post",
        price: 500,
        description: "Enhanced visibility & features",
        listed_days: 30,
        features: &[
            "Posted for 30 days",
            "Featured placement",
            "Priority notifications",
            "Analytics dashboard",
            "Premium support",
            "Top search results",
        ],
        popular: true,
    },
    PostingPlan {
        id: "enterprise",
        name: "Enterprise",
        price: 2000,
        description: "Maximum reach & support",
        listed_days: 90,
        features: &[
            "Posted for 90 days",
            "Top featured placement",
            "Dedicated account manager",
            "Custom branding",
            "Advanced analytics",
            "24/7 priority support",
            "Bulk posting discount",
        ],
        popular: false,
    },
];

pub fn plans() -> &'static [PostingPlan] {
    &PLANS
}

pub fn find_plan(id: &str) -> Option<&'static PostingPlan> {
    PLANS.iter().find(|plan| plan.id.eq_ignore_ascii_case(id.trim()))
}

/// What the provider widget is initialised with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub reference: String,
    pub email: String,
    /// Smallest currency unit (cents).
    pub amount_minor: u64,
    pub currency: String,
    pub plan_id: String,
}

impl PaymentRequest {
    pub fn for_plan(plan: &PostingPlan, payer: Option<&User>, now: DateTime<Utc>) -> Self {
        Self {
            reference: format!("{REFERENCE_PREFIX}-{}", now.timestamp_millis()),
            email: payer
                .map(|user| user.email.clone())
                .unwrap_or_else(|| FALLBACK_PAYER_EMAIL.to_string()),
            amount_minor: u64::from(plan.price) * 100,
            currency: CURRENCY.to_string(),
            plan_id: plan.id.to_string(),
        }
    }

    pub fn amount_major(&self) -> u64 {
        self.amount_minor / 100
    }
}

/// Next step once a plan is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "next", rename_all = "snake_case")]
pub enum Checkout {
    /// Free plan: straight to the job post form.
    PostDirectly { plan_id: &'static str },
    Payment(PaymentRequest),
}

impl Checkout {
    pub fn begin(plan: &PostingPlan, payer: Option<&User>, now: DateTime<Utc>) -> Self {
        if plan.is_free() {
            Checkout::PostDirectly { plan_id: plan.id }
        } else {
            Checkout::Payment(PaymentRequest::for_plan(plan, payer, now))
        }
    }
}
