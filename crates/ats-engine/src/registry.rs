//! Rule registry
//!
//! The built-in catalog is assembled once per process and shared read-only.
//! Registration order is significant: it breaks ties when findings share a
//! severity and line, and it orders advisory recommendations.

use crate::error::RegistryError;
use crate::rules::{self, Rule, RuleScope};
use ats_types::{Category, Severity};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

lazy_static! {
    static ref BUILTIN: Result<Registry, RegistryError> = Registry::from_rules(builtin_rules());
}

/// All built-in rules in registration order
pub fn builtin_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(rules::characters::rules());
    rules.extend(rules::contact::rules());
    rules.extend(rules::dates::rules());
    rules.extend(rules::layout::rules());
    rules.extend(rules::structure::rules());
    rules.extend(rules::style::rules());
    rules.extend(rules::keywords::rules());
    rules.extend(rules::language::rules());
    rules
}

/// Immutable rule catalog addressed by id
#[derive(Debug, Clone)]
pub struct Registry {
    rules: Vec<Rule>,
    index: HashMap<&'static str, usize>,
}

/// Catalog entry for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub scope: RuleScope,
}

impl Registry {
    /// Build a registry, rejecting duplicate ids
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(rules.len());
        for (position, rule) in rules.iter().enumerate() {
            if index.insert(rule.id, position).is_some() {
                return Err(RegistryError::DuplicateRule(rule.id.to_string()));
            }
        }
        Ok(Self { rules, index })
    }

    /// The process-wide built-in catalog
    pub fn builtin() -> Result<&'static Registry, RegistryError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&position| &self.rules[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Id, category, severity and scope of every rule, in registration order
    pub fn listing(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|rule| RuleInfo {
                id: rule.id,
                category: rule.category,
                severity: rule.severity,
                scope: rule.scope,
            })
            .collect()
    }
}
