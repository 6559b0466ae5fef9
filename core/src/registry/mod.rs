//! Model registry: string ids mapped to recipe records and display metadata.
//!
//! The registry is filled once at start-up and read-only afterwards, so it
//! can be shared between concurrent builds behind an `Arc`.

mod builtin;

#[cfg(test)]
mod tests_registry;

use crate::error::BuildError;
use crate::kernel::Kernel;
use crate::params::Parameters;
use crate::recipes::{GridfinityBin, HexagonParams, OrnamentParams, Recipe, RingParams, StrapParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A recipe record tagged by family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum Model {
    Ring(RingParams),
    Hexagon(HexagonParams),
    Strap(StrapParams),
    Ornament(OrnamentParams),
    Gridfinity(GridfinityBin),
}

impl Model {
    pub fn family(&self) -> &'static str {
        match self {
            Model::Ring(_) => "ring",
            Model::Hexagon(_) => "hexagon",
            Model::Strap(_) => "strap",
            Model::Ornament(_) => "ornament",
            Model::Gridfinity(_) => "gridfinity",
        }
    }
}

impl Recipe for Model {
    fn validate(&self) -> Result<(), BuildError> {
        match self {
            Model::Ring(r) => r.validate(),
            Model::Hexagon(r) => r.validate(),
            Model::Strap(r) => r.validate(),
            Model::Ornament(r) => r.validate(),
            Model::Gridfinity(r) => r.validate(),
        }
    }

    fn construct<K: Kernel>(&self, kernel: &K) -> Result<K::Solid, BuildError> {
        match self {
            Model::Ring(r) => r.construct(kernel),
            Model::Hexagon(r) => r.construct(kernel),
            Model::Strap(r) => r.construct(kernel),
            Model::Ornament(r) => r.construct(kernel),
            Model::Gridfinity(r) => r.construct(kernel),
        }
    }

    fn parameters(&self) -> Parameters {
        match self {
            Model::Ring(r) => r.parameters(),
            Model::Hexagon(r) => r.parameters(),
            Model::Strap(r) => r.parameters(),
            Model::Ornament(r) => r.parameters(),
            Model::Gridfinity(r) => r.parameters(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub model: Model,
}

impl ModelDescriptor {
    pub fn new(id: &str, name: &str, description: &str, model: Model) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            model,
        }
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            family: self.model.family().to_string(),
            parameters: self.model.parameters(),
        }
    }
}

/// What clients see in the model list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub family: String,
    pub parameters: Parameters,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Model id registered twice: {0}")]
    DuplicateModelId(String),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in builtin::descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: ModelDescriptor) -> Result<(), RegistryError> {
        if self.index.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateModelId(descriptor.id));
        }
        self.index.insert(descriptor.id.clone(), self.models.len());
        self.models.push(descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.index.get(id).map(|&i| &self.models[i])
    }

    pub fn recipe(&self, id: &str) -> Result<&Model, BuildError> {
        self.get(id)
            .map(|d| &d.model)
            .ok_or_else(|| BuildError::UnknownModelId(id.to_string()))
    }

    /// Summaries in registration order.
    pub fn list(&self) -> Vec<ModelSummary> {
        self.models.iter().map(ModelDescriptor::summary).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
