//! Dependent resources a finalized scene asks the world to create.

use chronicle_content::domain::templates::SceneTemplate;
use serde::Serialize;
use uuid::Uuid;

use super::situation::Situation;

/// A sub-location to create for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentLocation {
    /// Scene-scoped id, `{scene_id}:{template_id}`.
    pub scoped_id: String,
    pub template_id: String,
    pub name: String,
    pub tags: Vec<String>,
    /// Where the sub-location hangs off.
    pub parent_location_id: Uuid,
    pub region: String,
}

/// An item to create for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentItem {
    /// Scene-scoped id, `{scene_id}:{template_id}`.
    pub scoped_id: String,
    pub template_id: String,
    pub name: String,
}

/// Everything a finalized scene needs created by a separate orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependentResourceManifest {
    pub scene_id: Uuid,
    pub locations: Vec<DependentLocation>,
    pub items: Vec<DependentItem>,
}

impl DependentResourceManifest {
    /// Builds the manifest for `scene_id`, anchoring sub-locations at the
    /// first situation's location.
    #[must_use]
    pub fn build(scene_id: Uuid, template: &SceneTemplate, situations: &[Situation]) -> Self {
        let anchor = situations.first().map(|s| &s.location);
        let locations = anchor
            .map(|anchor| {
                template
                    .dependent_locations
                    .iter()
                    .map(|spec| DependentLocation {
                        scoped_id: format!("{scene_id}:{}", spec.template_id),
                        template_id: spec.template_id.clone(),
                        name: spec.name_pattern.replace("{location}", &anchor.name),
                        tags: spec.tags.clone(),
                        parent_location_id: anchor.id,
                        region: anchor.region.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let items = template
            .dependent_items
            .iter()
            .map(|spec| DependentItem {
                scoped_id: format!("{scene_id}:{}", spec.template_id),
                template_id: spec.template_id.clone(),
                name: spec.name.clone(),
            })
            .collect();

        Self {
            scene_id,
            locations,
            items,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.items.is_empty()
    }
}
