//! Entity resolution and situation materialisation.
//!
//! Pure with respect to its inputs: the same template against the same world
//! always yields the same situations, which is what lets a scene be restored
//! from its persisted record.

use chronicle_content::domain::templates::{SceneTemplate, SituationTemplate};
use chronicle_core::error::DomainError;
use chronicle_world::domain::resolver::EntityResolver;

use super::situation::{BoundLocation, BoundNpc, Choice, Situation};

/// Resolves and builds one situation.
///
/// # Errors
///
/// Returns `DomainError::Unresolved` if no location satisfies the
/// situation's location filter.
pub fn materialize_situation(
    template: &SceneTemplate,
    situation: &SituationTemplate,
    resolver: &dyn EntityResolver,
) -> Result<Situation, DomainError> {
    let location_filter = template.location_filter_for(situation);
    let location = resolver.resolve_location(&location_filter).ok_or_else(|| {
        DomainError::Unresolved(format!(
            "{}/{}: no location matches tags {:?} in regions {:?}",
            template.id, situation.id, location_filter.location_tags, location_filter.regions
        ))
    })?;
    let npc = resolver.resolve_npc(&template.npc_filter_for(situation), Some(&location));

    Ok(Situation {
        template_id: situation.id.clone(),
        name: situation.name.clone(),
        narrative_hints: situation.narrative_hints.clone(),
        location: BoundLocation::from(&location),
        npc: npc.as_ref().map(BoundNpc::from),
        description: String::new(),
        choices: situation
            .choices
            .iter()
            .map(|c| Choice::from_template(c, location.difficulty))
            .collect(),
        completed: false,
    })
}

/// Resolves and builds every situation of `template`, in template order.
///
/// All or nothing: the first unresolvable situation fails the whole call.
///
/// # Errors
///
/// Returns `DomainError::Unresolved` if any mandatory location is missing.
pub fn materialize_situations(
    template: &SceneTemplate,
    resolver: &dyn EntityResolver,
) -> Result<Vec<Situation>, DomainError> {
    template
        .situations
        .iter()
        .map(|situation| materialize_situation(template, situation, resolver))
        .collect()
}
