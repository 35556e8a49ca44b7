//! Report generation seam.

use async_trait::async_trait;
use tracing::debug;

use super::context::ReportContext;
use super::profile::CapitalProfile;
use crate::core::{ReportError, Side};

/// Turns a `ReportContext` into plain text.
///
/// The engine makes no assumption about the text's content or structure.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, context: &ReportContext) -> Result<String, ReportError>;
}

/// Deterministic capital-profile reporter for one side.
#[derive(Clone, Copy, Debug)]
pub struct ProfileReporter {
    side: Side,
}

impl Default for ProfileReporter {
    fn default() -> Self {
        Self::new(Side::Player)
    }
}

impl ProfileReporter {
    pub fn new(side: Side) -> Self {
        Self { side }
    }

    /// Classify without rendering.
    #[must_use]
    pub fn profile(&self, context: &ReportContext) -> CapitalProfile {
        CapitalProfile::from_context(context, self.side)
    }
}

#[async_trait]
impl ReportGenerator for ProfileReporter {
    async fn generate(&self, context: &ReportContext) -> Result<String, ReportError> {
        let profile = self.profile(context);
        debug!(
            side = %self.side,
            rounds = context.rounds,
            archetype = profile.archetype,
            "rendered capital profile"
        );
        Ok(profile.to_string())
    }
}
