//! In-memory model of `imsmanifest.xml`.

use super::ids::COMMON_RESOURCE_ID;
use crate::error::PackError;
use std::collections::HashMap;

/// The whole manifest: envelope, one organization, resources.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    /// `<manifest identifier=..>`
    pub identifier: String,
    pub organization: Organization,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub identifier: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// A menu entry pointing at a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub identifier: String,
    pub identifierref: String,
    pub title: String,
    pub sequencing: ItemSequencing,
}

/// Mastery rule: the primary objective is satisfied by a normalized measure,
/// completion and objective status are reported by the content.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSequencing {
    pub objective_id: String,
    pub min_normalized_measure: f64,
}

impl ItemSequencing {
    pub fn mastery(score: f64) -> Self {
        Self {
            objective_id: "PRIMARYOBJ".to_string(),
            min_normalized_measure: score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// Launchable content at `href`
    Sco { href: String },
    /// Supporting files only
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub identifier: String,
    pub kind: ResourceKind,
    pub files: Vec<String>,
    pub dependencies: Vec<String>,
}

impl Resource {
    pub fn scorm_type(&self) -> &'static str {
        match self.kind {
            ResourceKind::Sco { .. } => "sco",
            ResourceKind::Asset => "asset",
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self.kind {
            ResourceKind::Sco { ref href } => Some(href),
            ResourceKind::Asset => None,
        }
    }
}

impl ManifestDocument {
    /// Check the cross-references a SCORM player relies on.
    ///
    /// - resource and item identifiers are unique,
    /// - each item's `identifierref` names exactly one resource,
    /// - each dependency names an existing resource,
    /// - the shared `common_files` resource is present exactly once.
    pub fn validate(&self) -> Result<(), PackError> {
        let mut resource_counts: HashMap<&str, usize> = HashMap::new();
        for resource in &self.resources {
            *resource_counts.entry(resource.identifier.as_str()).or_insert(0) += 1;
        }
        if let Some((id, _)) = resource_counts.iter().find(|(_, count)| **count > 1) {
            return Err(PackError::Manifest(format!(
                "resource identifier '{}' is declared more than once",
                id
            )));
        }
        if !resource_counts.contains_key(COMMON_RESOURCE_ID) {
            return Err(PackError::Manifest(format!(
                "shared resource '{}' is missing",
                COMMON_RESOURCE_ID
            )));
        }

        let mut item_ids = HashMap::new();
        for item in &self.organization.items {
            if item_ids.insert(item.identifier.as_str(), ()).is_some() {
                return Err(PackError::Manifest(format!(
                    "item identifier '{}' is declared more than once",
                    item.identifier
                )));
            }
            if !resource_counts.contains_key(item.identifierref.as_str()) {
                return Err(PackError::Manifest(format!(
                    "item '{}' references unknown resource '{}'",
                    item.identifier, item.identifierref
                )));
            }
        }

        for resource in &self.resources {
            for dependency in &resource.dependencies {
                if !resource_counts.contains_key(dependency.as_str()) {
                    return Err(PackError::Manifest(format!(
                        "resource '{}' depends on unknown resource '{}'",
                        resource.identifier, dependency
                    )));
                }
            }
        }
        Ok(())
    }
}
