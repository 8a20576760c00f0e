//! Table row grouping.

use super::TaggingRule;
use crate::structure::StructType;
use crate::tagging::{ElementKind, HintKey, LayoutTaggingHelper};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Groups the cells of a finished table into rows and row groups.
///
/// When a table finishes, its accessible kids are sorted out:
/// - cells with grid coordinates go into one `TR` per row, columns in order
/// - cells without coordinates go into the first row, in encounter order
/// - other kids stay directly under the table: plain kids first, then
///   `THead` kids, then the body wrapper, then `TFoot` kids
///
/// The body wrapper is a `TBody` when the table draws a header or a footer;
/// otherwise it is a role-less wrapper and the rows end up directly under the
/// table element.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableTaggingRule;

impl TaggingRule for TableTaggingRule {
    fn on_finish(&self, helper: &mut LayoutTaggingHelper, table: HintKey) -> bool {
        let mut rows: BTreeMap<usize, BTreeMap<usize, HintKey>> = BTreeMap::new();
        let mut unindexed_cells = Vec::new();
        let mut other_kids = Vec::new();

        for kid in helper.get_accessible_kids(table) {
            let data = helper.hint(kid);
            let role = StructType::from_str(data.effective_role().unwrap_or_default());
            let kind = data.element().map(|e| e.kind).unwrap_or_default();
            match (role.is_table_cell(), kind) {
                (true, ElementKind::TableCell { row, col }) => {
                    let cells = rows.entry(row).or_default();
                    if cells.contains_key(&col) {
                        warn!("Table {} has two cells at ({}, {}); keeping {} unindexed", table, row, col, kid);
                        unindexed_cells.push(kid);
                    } else {
                        cells.insert(col, kid);
                    }
                },
                (true, _) => unindexed_cells.push(kid),
                (false, _) => other_kids.push((kid, role)),
            }
        }

        // Rows from an earlier run, when a later rule vetoed the finish.
        let already_grouped = other_kids.iter().any(|(kid, role)| {
            matches!(role, StructType::TR | StructType::TBody) && helper.hint(*kid).is_dummy()
        });
        if already_grouped && rows.is_empty() && unindexed_cells.is_empty() {
            debug!("Table {} is already grouped into rows", table);
            return true;
        }

        let uses_row_groups = match helper.hint(table).element().map(|e| e.kind) {
            Some(ElementKind::Table {
                header_in_use,
                footer_in_use,
            }) => header_in_use || footer_in_use,
            _ => false,
        };
        let body = helper.create_dummy(if uses_row_groups { Some("TBody") } else { None });

        for (kid, role) in &other_kids {
            if *role != StructType::THead && *role != StructType::TFoot {
                helper.move_kid(*kid, table, None);
            }
        }
        for (kid, role) in &other_kids {
            if *role == StructType::THead {
                helper.move_kid(*kid, table, None);
            }
        }
        helper.add_kids(table, &[body], None);
        for (kid, role) in &other_kids {
            if *role == StructType::TFoot {
                helper.move_kid(*kid, table, None);
            }
        }

        if rows.is_empty() && !unindexed_cells.is_empty() {
            rows.insert(0, BTreeMap::new());
        }
        let mut unindexed = Some(unindexed_cells);
        for cells in rows.values() {
            let row = helper.create_dummy(Some(StructType::TR.as_str()));
            for cell in cells.values() {
                helper.move_kid(*cell, row, None);
            }
            for cell in unindexed.take().unwrap_or_default() {
                helper.move_kid(cell, row, None);
            }
            helper.add_kids(body, &[row], None);
        }

        debug!(
            "Grouped table {} into {} row(s) ({})",
            table,
            rows.len(),
            if uses_row_groups { "TBody" } else { "no row groups" }
        );
        true
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
