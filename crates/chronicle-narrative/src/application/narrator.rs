//! Narrative-provider boundary.
//!
//! Prose for a situation comes from an external provider under a bounded
//! timeout. Any failure, timeout or blank answer falls back to deterministic
//! text built from the resolved entities, so a situation is never left
//! without a description.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chronicle_content::domain::archetypes::SceneArchetype;
use chronicle_content::domain::placement::PersonalityType;
use chronicle_content::domain::templates::{NarrativeHints, SceneTemplate};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::situation::Situation;

/// Default bound on a provider call.
pub const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Errors a narrative provider can report.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative provider unavailable: {0}")]
    Unavailable(String),

    #[error("narrative provider rejected the request: {0}")]
    Rejected(String),
}

/// Everything a provider needs to describe one situation.
#[derive(Debug, Clone, Serialize)]
pub struct SituationContext {
    pub scene_name: String,
    pub archetype: SceneArchetype,
    pub framing: Option<String>,
    pub situation_name: String,
    pub hints: NarrativeHints,
    pub location_name: String,
    pub location_description: String,
    pub region: String,
    pub npc_name: Option<String>,
    pub npc_personality: Option<PersonalityType>,
}

impl SituationContext {
    /// Builds the context for a resolved situation.
    #[must_use]
    pub fn new(template: &SceneTemplate, situation: &Situation) -> Self {
        Self {
            scene_name: template.display_name.clone(),
            archetype: template.scene_archetype,
            framing: template.narrative_framing.clone(),
            situation_name: situation.name.clone(),
            hints: situation.narrative_hints.clone(),
            location_name: situation.location.name.clone(),
            location_description: situation.location.description.clone(),
            region: situation.location.region.clone(),
            npc_name: situation.npc.as_ref().map(|n| n.name.clone()),
            npc_personality: situation.npc.as_ref().map(|n| n.personality),
        }
    }
}

/// External text generator.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Describes a situation in prose.
    async fn generate_description(
        &self,
        context: &SituationContext,
    ) -> Result<String, NarrativeError>;
}

/// Calls the provider, if any, and substitutes fallback text on failure.
#[derive(Clone)]
pub struct Narrator {
    provider: Option<Arc<dyn NarrativeProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("has_provider", &self.provider.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::fallback_only()
    }
}

impl Narrator {
    #[must_use]
    pub fn new(provider: Arc<dyn NarrativeProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// A narrator that always uses deterministic text.
    #[must_use]
    pub fn fallback_only() -> Self {
        Self {
            provider: None,
            timeout: DEFAULT_NARRATIVE_TIMEOUT,
        }
    }

    /// Returns prose for `situation`; never empty.
    pub async fn describe(&self, context: &SituationContext, situation: &Situation) -> String {
        let Some(provider) = &self.provider else {
            return situation.fallback_description();
        };

        match tokio::time::timeout(self.timeout, provider.generate_description(context)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text,
            Ok(Ok(_)) => {
                warn!(
                    situation = %situation.template_id,
                    "narrative provider returned blank text, using fallback"
                );
                situation.fallback_description()
            }
            Ok(Err(err)) => {
                warn!(
                    situation = %situation.template_id,
                    error = %err,
                    "narrative provider failed, using fallback"
                );
                situation.fallback_description()
            }
            Err(_) => {
                warn!(
                    situation = %situation.template_id,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "narrative provider timed out, using fallback"
                );
                situation.fallback_description()
            }
        }
    }
}
