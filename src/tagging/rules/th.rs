//! Default scope of header cells.

use super::TaggingRule;
use crate::structure::StructAttributes;
use crate::tagging::{HintKey, LayoutTaggingHelper};

const SCOPE: &str = "Scope";
const SCOPE_NONE: &str = "None";

/// Gives `TH` elements a `Scope` of `Column` unless one is set.
///
/// An explicit `Scope` of `None` means "no scope" and is removed. The rule
/// works on the structure element and does nothing while the element does
/// not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThTaggingRule;

impl TaggingRule for ThTaggingRule {
    fn on_finish(&self, helper: &mut LayoutTaggingHelper, hint: HintKey) -> bool {
        let Ok(node) = helper.structure_node(hint) else {
            return true;
        };
        let Some(attributes) = helper.structure_mut().attributes_mut(node) else {
            return true;
        };

        match attributes.iter_mut().find(|a| a.get(SCOPE).is_some()) {
            Some(scoped) if scoped.get(SCOPE) == Some(SCOPE_NONE) => {
                scoped.remove(SCOPE);
            },
            Some(_) => {},
            None => attributes.push(StructAttributes::new("Table").with_enum(SCOPE, "Column")),
        }
        true
    }

    fn name(&self) -> &'static str {
        "th"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaggingConfig;
    use crate::structure::{StructTree, StructureTree, TagCursor};
    use crate::tagging::{AccessibleElement, TaggableNode};

    fn materialized_th(attributes: Option<StructAttributes>) -> (LayoutTaggingHelper, HintKey) {
        let mut helper = LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new());
        let mut element = AccessibleElement::cell("TH", 0, 0);
        if let Some(attributes) = attributes {
            element = element.with_attributes(attributes);
        }
        let key = helper.get_or_create(&TaggableNode::renderer(Some(element)));
        let mut cursor = TagCursor::at_root(helper.structure());
        helper.create_node(key, &mut cursor);
        (helper, key)
    }

    fn scope(helper: &LayoutTaggingHelper, key: HintKey) -> Vec<Option<String>> {
        let node = helper.structure_node(key).unwrap();
        helper
            .structure()
            .attributes(node)
            .iter()
            .map(|a| a.get(SCOPE).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_default_scope_is_column() {
        let (mut helper, key) = materialized_th(None);
        assert!(ThTaggingRule.on_finish(&mut helper, key));
        assert_eq!(scope(&helper, key), vec![Some("Column".to_string())]);
    }

    #[test]
    fn test_explicit_scope_is_kept() {
        let (mut helper, key) = materialized_th(Some(StructAttributes::new("Table").with_enum(SCOPE, "Row")));
        ThTaggingRule.on_finish(&mut helper, key);
        assert_eq!(scope(&helper, key), vec![Some("Row".to_string())]);
    }

    #[test]
    fn test_scope_none_is_removed() {
        let (mut helper, key) = materialized_th(Some(StructAttributes::new("Table").with_enum(SCOPE, SCOPE_NONE)));
        ThTaggingRule.on_finish(&mut helper, key);
        assert_eq!(scope(&helper, key), vec![None]);
    }

    #[test]
    fn test_without_element_is_no_op() {
        let mut helper = LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new());
        let key = helper.get_or_create(&TaggableNode::renderer(Some(AccessibleElement::cell("TH", 0, 0))));
        assert!(ThTaggingRule.on_finish(&mut helper, key));
        assert!(!helper.has_node(key));
    }
}
