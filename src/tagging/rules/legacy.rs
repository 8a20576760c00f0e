//! Row groups for PDF versions without `THead`/`TBody`/`TFoot`.

use super::TaggingRule;
use crate::structure::StructType;
use crate::tagging::{HintKey, LayoutTaggingHelper};
use log::debug;
use std::cell::RefCell;
use std::collections::HashSet;

/// Removes table row groups before PDF 1.5.
///
/// Header and footer hints are kept open until their table finishes. The
/// table then splices every row group out, putting its rows in its place,
/// drops the row group's structure element and closes the header and
/// footer hints it kept open.
///
/// One instance has to be registered for `Table`, `THead` and `TFoot`
/// together, since it remembers the hints it kept open.
#[derive(Debug, Default)]
pub struct LegacyGroupingRule {
    pending: RefCell<HashSet<HintKey>>,
}

impl LegacyGroupingRule {
    /// Create a rule with no pending row groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of header and footer hints kept open.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl TaggingRule for LegacyGroupingRule {
    fn on_finish(&self, helper: &mut LayoutTaggingHelper, hint: HintKey) -> bool {
        let role = StructType::from_str(helper.hint(hint).effective_role().unwrap_or_default());
        match role {
            StructType::THead | StructType::TFoot => {
                self.pending.borrow_mut().insert(hint);
                false
            },
            StructType::Table => {
                for kid in helper.get_accessible_kids(hint) {
                    let kid_role = StructType::from_str(helper.hint(kid).effective_role().unwrap_or_default());
                    if !kid_role.is_table_row_group() {
                        continue;
                    }
                    let rows = helper.get_accessible_kids(kid);
                    helper.replace_kid(kid, &rows);
                    helper.discard_node(kid);
                    if self.pending.borrow_mut().remove(&kid) {
                        helper.set_finished(kid);
                    }
                    debug!("Removed /{} {} from table {}", kid_role, kid, hint);
                }
                true
            },
            _ => true,
        }
    }

    fn name(&self) -> &'static str {
        "legacy-grouping"
    }
}
