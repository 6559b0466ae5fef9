//! Flat parameter listings and validation helpers shared by the recipes.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single parameter value, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Integer(i64),
    Bool(bool),
    List(Vec<ParamValue>),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Integer(v as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Named parameters in a stable (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

/// Finite and strictly positive.
pub fn positive(field: &'static str, value: f64) -> Result<f64, BuildError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BuildError::invalid(field, format!("must be a positive length, got {}", value)))
    }
}

/// Finite and zero or more.
pub fn non_negative(field: &'static str, value: f64) -> Result<f64, BuildError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BuildError::invalid(field, format!("must not be negative, got {}", value)))
    }
}

/// `value < limit`, written so NaN fails.
pub fn less_than(field: &'static str, value: f64, limit: f64, what: &str) -> Result<f64, BuildError> {
    if value < limit {
        Ok(value)
    } else {
        Err(BuildError::invalid(field, format!("{} must be below {} ({}), got {}", field, what, limit, value)))
    }
}

pub fn at_least(field: &'static str, value: u32, min: u32) -> Result<u32, BuildError> {
    if value >= min {
        Ok(value)
    } else {
        Err(BuildError::invalid(field, format!("must be at least {}, got {}", min, value)))
    }
}
