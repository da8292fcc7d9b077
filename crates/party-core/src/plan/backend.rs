//! The `PlanBackend` trait -- the seam between request handling and plan
//! production.
//!
//! Only [`MockPlanBackend`] exists today: it waits for a configurable delay
//! (standing in for a remote generation call) and returns the template-fill
//! plan. The trait is object-safe so servers can hold `Arc<dyn PlanBackend>`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::i18n::{Dictionary, Language};
use crate::selection::FormSelection;

use super::Plan;
use super::generate::generate_plan;

/// A plan together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub plan: Plan,
    /// `true` when the plan is templated sample data rather than the output
    /// of a real generator.
    pub is_mock: bool,
}

/// Producer of party plans.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    /// Short name used in logs (e.g. "mock").
    fn name(&self) -> &str;

    /// Produce a plan for `selection` in `language`.
    async fn generate(&self, selection: &FormSelection, language: Language)
    -> Result<GeneratedPlan>;
}

// Compile-time assertion: PlanBackend must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanBackend) {}
};

/// Template-fill backend with a simulated network delay.
#[derive(Debug, Clone, Default)]
pub struct MockPlanBackend {
    delay: Duration,
}

impl MockPlanBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PlanBackend for MockPlanBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        selection: &FormSelection,
        language: Language,
    ) -> Result<GeneratedPlan> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let plan = generate_plan(selection, &Dictionary::load(language));
        Ok(GeneratedPlan {
            plan,
            is_mock: true,
        })
    }
}
