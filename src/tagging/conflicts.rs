//! Role conflict resolution.
//!
//! Some parent/kid role pairs are not allowed by the structure grammar, most
//! commonly a paragraph nested in a heading or in another paragraph. Such
//! kids get a replacement role. Which pairs conflict depends on the grammar:
//! PDF 2.0 has `Sub`, older versions fall back to `Span`.

use super::helper::LayoutTaggingHelper;
use super::hint::HintKey;
use super::roles::is_transparent_role;
use crate::config::{PdfVersion, RoleConflictOverride};
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;

/// Parent role -> kid role -> replacement
type ConflictMap = HashMap<&'static str, HashMap<&'static str, &'static str>>;

const HEADINGS: [&str; 7] = ["H", "H1", "H2", "H3", "H4", "H5", "H6"];
const INLINE_PARENTS: [&str; 4] = ["Lbl", "Link", "Span", "Reference"];

fn build_conflicts(nested_paragraph: &'static str) -> ConflictMap {
    let mut map: ConflictMap = HashMap::new();
    for heading in HEADINGS {
        map.entry(heading).or_default().insert("P", nested_paragraph);
    }
    map.entry("P").or_default().insert("P", nested_paragraph);
    map.entry("Form").or_default().insert("P", "Lbl");
    for parent in INLINE_PARENTS {
        map.entry(parent).or_default().insert("P", "Span");
    }
    map
}

lazy_static! {
    /// Conflicts under the PDF 2.0 grammar
    static ref CURRENT_CONFLICTS: ConflictMap = build_conflicts("Sub");

    /// Conflicts under the PDF 1.x grammar
    static ref LEGACY_CONFLICTS: ConflictMap = build_conflicts("Span");
}

/// Version-selected conflict table plus caller overrides.
#[derive(Debug, Clone)]
pub struct RoleConflictTable {
    builtin: &'static ConflictMap,
    overrides: HashMap<(String, String), String>,
}

impl RoleConflictTable {
    /// Table for a PDF version with caller overrides on top.
    pub fn new(version: PdfVersion, overrides: &[RoleConflictOverride]) -> Self {
        let builtin: &'static ConflictMap = if version.uses_current_grammar() {
            &CURRENT_CONFLICTS
        } else {
            &LEGACY_CONFLICTS
        };
        let overrides = overrides
            .iter()
            .map(|o| ((o.parent.clone(), o.child.clone()), o.replacement.clone()))
            .collect();
        Self { builtin, overrides }
    }

    /// Replacement role for `child` under `parent`, if the pair conflicts.
    pub fn lookup(&self, parent: &str, child: &str) -> Option<&str> {
        self.overrides
            .get(&(parent.to_string(), child.to_string()))
            .map(String::as_str)
            .or_else(|| self.builtin.get(parent)?.get(child).copied())
    }
}

impl LayoutTaggingHelper {
    /// Replace the roles of the direct accessible kids of `parent` that
    /// conflict with the parent's role.
    ///
    /// A transparent parent (`NonStruct`, `Div`) or a parent without a role
    /// is looked through to its nearest accessible ancestor. Returns the
    /// number of kids that got a new role.
    pub fn resolve_role_conflicts(&mut self, parent: HintKey) -> usize {
        let Some(parent_role) = self.conflict_parent_role(parent) else {
            return 0;
        };

        let mut replaced = 0;
        for kid in self.tree.accessible_kids(parent) {
            let data = self.tree.data(kid);
            let Some(role) = data.effective_role() else {
                continue;
            };
            let kid_role = self.normalizer.normalize(role, data.namespace());
            let Some(replacement) = self
                .conflicts
                .lookup(&parent_role, &kid_role)
                .map(str::to_string)
            else {
                continue;
            };

            debug!(
                "Role conflict /{} in /{}: hint {} becomes /{}",
                kid_role, parent_role, kid, replacement
            );
            self.tree.data_mut(kid).set_overridden_role(&replacement);
            if let Some(node) = self.node_of(kid) {
                self.structure.set_role(node, &replacement);
            }
            replaced += 1;
        }
        replaced
    }

    /// Run [`resolve_role_conflicts`](Self::resolve_role_conflicts) for
    /// `root` and every accessible hint below it, top-down.
    pub fn resolve_role_conflicts_in_subtree(&mut self, root: HintKey) -> usize {
        let mut parents = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            if key == root || self.tree.is_accessible(key) {
                parents.push(key);
            }
            stack.extend(self.tree.kids(key).iter().rev().copied());
        }
        parents
            .into_iter()
            .map(|parent| self.resolve_role_conflicts(parent))
            .sum()
    }

    /// Normalized role the kids of `parent` are checked against.
    fn conflict_parent_role(&self, parent: HintKey) -> Option<String> {
        let mut current = Some(parent);
        while let Some(key) = current {
            let data = self.tree.data(key);
            if let Some(role) = data.effective_role().filter(|_| data.is_accessible()) {
                let normalized = self.normalizer.normalize(role, data.namespace());
                if !is_transparent_role(&normalized) {
                    return Some(normalized);
                }
            }
            current = self.tree.accessible_parent(key);
        }
        None
    }
}
