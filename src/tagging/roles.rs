//! Role normalization.
//!
//! Custom roles are mapped onto standard structure types before nesting
//! rules are applied, the same way a PDF `/RoleMap` maps custom structure
//! types (ISO 32000-1:2008, Section 14.7.3).

use crate::structure::StructType;
use std::collections::HashMap;

/// Longest role map chain followed before giving up (guards against cycles).
const MAX_ROLE_MAP_DEPTH: usize = 16;

/// Maps a role (and optional namespace) onto its canonical role.
pub trait RoleNormalizer {
    /// Canonical role for `role` in `namespace`.
    fn normalize(&self, role: &str, namespace: Option<&str>) -> String;
}

/// Role normalizer backed by a role map.
///
/// Namespaced entries take precedence over plain entries. Chains are
/// followed until a standard role or an unmapped role is reached.
#[derive(Debug, Clone, Default)]
pub struct RoleMapNormalizer {
    role_map: HashMap<String, String>,
    namespaced: HashMap<(String, String), String>,
}

impl RoleMapNormalizer {
    /// Create a normalizer with an empty role map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a custom role onto another role.
    pub fn with_mapping(mut self, role: impl Into<String>, target: impl Into<String>) -> Self {
        self.role_map.insert(role.into(), target.into());
        self
    }

    /// Map a custom role of a specific namespace onto another role.
    pub fn with_namespaced_mapping(
        mut self,
        namespace: impl Into<String>,
        role: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.namespaced
            .insert((namespace.into(), role.into()), target.into());
        self
    }

    fn lookup(&self, role: &str, namespace: Option<&str>) -> Option<&String> {
        namespace
            .and_then(|ns| self.namespaced.get(&(ns.to_string(), role.to_string())))
            .or_else(|| self.role_map.get(role))
    }
}

impl RoleNormalizer for RoleMapNormalizer {
    fn normalize(&self, role: &str, namespace: Option<&str>) -> String {
        let mut current = role.to_string();
        for _ in 0..MAX_ROLE_MAP_DEPTH {
            if !matches!(StructType::from_str(&current), StructType::Custom(_)) {
                break;
            }
            match self.lookup(&current, namespace) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }
        current
    }
}

/// Check if a (normalized) role is a transparent grouping role.
pub fn is_transparent_role(role: &str) -> bool {
    StructType::from_str(role).is_transparent()
}
