//! The Template Store.
//!
//! Read-mostly and append-only: packages are validated as a whole and then
//! inserted atomically. A template is never replaced or mutated once loaded.
//! Ingestion through `load_package` is the only way a template becomes
//! queryable, for authored and generated content alike.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chronicle_core::error::DomainError;
use serde::Serialize;
use tracing::info;

use crate::domain::package::TemplatePackage;
use crate::domain::templates::SceneTemplate;
use crate::domain::validation::validate_template;

/// Summary of a loaded package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedPackage {
    pub package_id: String,
    pub version: String,
    pub template_ids: Vec<String>,
}

/// In-memory registry of scene templates keyed by id.
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: RwLock<HashMap<String, Arc<SceneTemplate>>>,
}

impl TemplateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses, validates and inserts every template of a package.
    ///
    /// Nothing is inserted unless the whole package is sound.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` for malformed JSON, a template
    /// defect, a template id already present, or a main-story sequence
    /// already claimed by another template.
    pub fn load_package(&self, json: &str) -> Result<LoadedPackage, DomainError> {
        let package = TemplatePackage::parse(json)?;
        for template in &package.scene_templates {
            validate_template(template)?;
        }

        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut template_ids = Vec::with_capacity(package.scene_templates.len());
        for (index, template) in package.scene_templates.iter().enumerate() {
            let duplicate_in_package = package.scene_templates[..index]
                .iter()
                .any(|earlier| earlier.id == template.id);
            if duplicate_in_package || templates.contains_key(&template.id) {
                return Err(DomainError::ContentDefect(format!(
                    "template {} is already loaded",
                    template.id
                )));
            }
            if let Some(sequence) = template.main_story_sequence {
                let claimed = templates
                    .values()
                    .map(Arc::as_ref)
                    .chain(package.scene_templates[..index].iter())
                    .any(|t| t.is_main_story() && t.main_story_sequence == Some(sequence));
                if template.is_main_story() && claimed {
                    return Err(DomainError::ContentDefect(format!(
                        "main story sequence {sequence} is already claimed"
                    )));
                }
            }
            template_ids.push(template.id.clone());
        }

        let version = package.version.clone().unwrap_or_default();
        for template in package.scene_templates {
            templates.insert(template.id.clone(), Arc::new(template));
        }

        info!(
            package_id = %package.package_id,
            version = %version,
            templates = template_ids.len(),
            "loaded template package"
        );

        Ok(LoadedPackage {
            package_id: package.package_id,
            version,
            template_ids,
        })
    }

    /// Loads a package holding exactly one template and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` if the package does not hold
    /// exactly one template, or for any `load_package` failure.
    pub fn load_template(&self, json: &str) -> Result<String, DomainError> {
        let package = TemplatePackage::parse(json)?;
        if package.scene_templates.len() != 1 {
            return Err(DomainError::ContentDefect(format!(
                "package {} must hold exactly one template, found {}",
                package.package_id,
                package.scene_templates.len()
            )));
        }
        let mut loaded = self.load_package(json)?;
        Ok(loaded.template_ids.remove(0))
    }

    /// Returns the template with `id`, if loaded.
    #[must_use]
    pub fn get_template(&self, id: &str) -> Option<Arc<SceneTemplate>> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Returns the template with `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TemplateNotFound` if it is not loaded.
    pub fn require_template(&self, id: &str) -> Result<Arc<SceneTemplate>, DomainError> {
        self.get_template(id)
            .ok_or_else(|| DomainError::TemplateNotFound(id.to_owned()))
    }

    /// Returns the main-story template for `sequence`, if loaded.
    #[must_use]
    pub fn main_story_template(&self, sequence: u32) -> Option<Arc<SceneTemplate>> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|t| t.is_main_story() && t.main_story_sequence == Some(sequence))
            .cloned()
    }

    /// Returns `true` if a main-story template exists for `sequence`.
    #[must_use]
    pub fn next_template_exists(&self, sequence: u32) -> bool {
        self.main_story_template(sequence).is_some()
    }

    /// Templates flagged as starters, ordered by id.
    #[must_use]
    pub fn starter_templates(&self) -> Vec<Arc<SceneTemplate>> {
        let mut starters: Vec<_> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|t| t.is_starter)
            .cloned()
            .collect();
        starters.sort_by(|a, b| a.id.cmp(&b.id));
        starters
    }

    /// Every loaded main-story template, ordered by sequence.
    #[must_use]
    pub fn main_story_templates(&self) -> Vec<Arc<SceneTemplate>> {
        let mut chain: Vec<_> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|t| t.is_main_story())
            .cloned()
            .collect();
        chain.sort_by_key(|t| t.main_story_sequence);
        chain
    }

    /// Every loaded template id, sorted.
    #[must_use]
    pub fn template_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
