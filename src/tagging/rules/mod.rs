//! Tagging rules run when a hint is finished.
//!
//! Rules are registered per role. When a hint with that (effective) role is
//! finished, its rules run in registration order. A rule may restructure the
//! hint tree and may veto finishing by returning `false`; the hint then stays
//! unfinished until `finish` is called again.
//!
//! # Built-in Rules
//!
//! - [`TableTaggingRule`]: groups table cells into rows and row groups
//! - [`ThTaggingRule`]: gives header cells a default scope
//! - [`LegacyGroupingRule`]: removes row groups for PDF versions before 1.5

mod legacy;
mod table;
mod th;

pub use legacy::LegacyGroupingRule;
pub use table::TableTaggingRule;
pub use th::ThTaggingRule;

use super::{HintKey, LayoutTaggingHelper};
use crate::config::PdfVersion;
use crate::structure::StructType;
use std::collections::HashMap;
use std::rc::Rc;

/// A callback run when a hint of a registered role is finished.
pub trait TaggingRule {
    /// Inspect and restructure around `hint`. Return false to keep the hint
    /// unfinished.
    fn on_finish(&self, helper: &mut LayoutTaggingHelper, hint: HintKey) -> bool;

    /// Return the name of this rule for debugging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> TaggingRule for F
where
    F: Fn(&mut LayoutTaggingHelper, HintKey) -> bool,
{
    fn on_finish(&self, helper: &mut LayoutTaggingHelper, hint: HintKey) -> bool {
        self(helper, hint)
    }
}

/// Role-keyed registry of tagging rules.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Vec<Rc<dyn TaggingRule>>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in rules for a PDF version.
    pub fn with_builtin_rules(version: PdfVersion) -> Self {
        let mut registry = Self::new();

        let table_rule: Rc<dyn TaggingRule> = Rc::new(TableTaggingRule);
        for role in [StructType::Table, StructType::THead, StructType::TFoot] {
            registry.register(role.as_str(), Rc::clone(&table_rule));
        }

        if !version.supports_table_grouping() {
            // One instance for all three roles: it remembers vetoed row groups.
            let legacy_rule: Rc<dyn TaggingRule> = Rc::new(LegacyGroupingRule::new());
            for role in [StructType::Table, StructType::THead, StructType::TFoot] {
                registry.register(role.as_str(), Rc::clone(&legacy_rule));
            }
        }

        registry.register(StructType::TH.as_str(), Rc::new(ThTaggingRule));
        registry
    }

    /// Append a rule for a role.
    pub fn register(&mut self, role: impl Into<String>, rule: Rc<dyn TaggingRule>) {
        self.rules.entry(role.into()).or_default().push(rule);
    }

    /// Rules registered for a role, in registration order.
    pub fn rules_for(&self, role: &str) -> Vec<Rc<dyn TaggingRule>> {
        self.rules.get(role).cloned().unwrap_or_default()
    }

    /// Names of the rules registered for a role.
    pub fn rule_names(&self, role: &str) -> Vec<&'static str> {
        self.rules
            .get(role)
            .map(|rules| rules.iter().map(|r| r.name()).collect())
            .unwrap_or_default()
    }

    /// Check if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut roles: Vec<&String> = self.rules.keys().collect();
        roles.sort();
        f.debug_struct("RuleRegistry").field("roles", &roles).finish()
    }
}
