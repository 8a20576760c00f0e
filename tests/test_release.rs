//! Integration tests for releasing finished hints.

use pdf_tagging::config::TaggingConfig;
use pdf_tagging::structure::{StructAttributes, StructTree, StructureTree, TagCursor};
use pdf_tagging::tagging::{AccessibleElement, HintKey, LayoutTaggingHelper, TaggableNode};

fn new_helper() -> LayoutTaggingHelper {
    LayoutTaggingHelper::new(TaggingConfig::default(), StructTree::new())
}

fn hint(helper: &mut LayoutTaggingHelper, role: &str) -> HintKey {
    helper.get_or_create(&TaggableNode::renderer(Some(AccessibleElement::new(role))))
}

fn materialize(helper: &mut LayoutTaggingHelper, key: HintKey) -> TagCursor {
    let mut cursor = TagCursor::at_root(helper.structure());
    helper.create_node(key, &mut cursor);
    cursor
}

// =============================================================================
// DOCUMENT ORDER
// =============================================================================

mod order_tests {
    use super::*;

    #[test]
    fn test_unfinished_sibling_holds_later_siblings() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let a = hint(&mut helper, "P");
        let b = hint(&mut helper, "P");
        let c = hint(&mut helper, "P");
        helper.add_kids(sect, &[a, b, c], None);

        helper.finish(sect);
        helper.finish(a);
        helper.finish(c);
        assert_eq!(helper.release_finished(), vec![a]);
        assert_eq!(helper.get_kids(sect), &[b, c]);

        helper.finish(b);
        assert_eq!(helper.release_finished(), vec![sect, b, c]);
        assert!(helper.get_kids(sect).is_empty());
    }

    #[test]
    fn test_open_parent_holds_finished_kids() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let a = hint(&mut helper, "P");
        let b = hint(&mut helper, "P");
        helper.add_kids(sect, &[a, b], None);

        helper.finish(a);
        assert!(helper.release_finished().is_empty());
        assert_eq!(helper.get_kids(sect), &[a, b]);

        helper.finish(sect);
        assert_eq!(helper.release_finished(), vec![a]);
    }

    #[test]
    fn test_unfinished_grandkid_blocks_ancestors() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let list = hint(&mut helper, "L");
        let item = hint(&mut helper, "LI");
        helper.add_kids(sect, &[list], None);
        helper.add_kids(list, &[item], None);
        helper.finish(sect);
        helper.finish(list);

        assert!(helper.release_finished().is_empty());
        helper.finish(item);
        assert_eq!(helper.release_finished(), vec![sect, list, item]);
    }

    #[test]
    fn test_roots_are_held_like_kids() {
        let mut helper = new_helper();
        let root = helper.create_dummy(None);
        let first = hint(&mut helper, "P");
        let second = hint(&mut helper, "P");
        helper.add_kids(root, &[first, second], None);
        helper.finish(root);
        helper.finish(second);

        assert!(helper.release_finished().is_empty());
        helper.finish(first);
        assert_eq!(helper.release_finished(), vec![root, first, second]);
    }

    #[test]
    fn test_unlinked_hint_is_released() {
        let mut helper = new_helper();
        let lone = hint(&mut helper, "Figure");
        materialize(&mut helper, lone);
        helper.finish(lone);

        assert_eq!(helper.release_finished(), vec![lone]);
        assert!(helper.release_finished().is_empty());
        assert!(helper.hint(lone).is_released());
    }

    #[test]
    fn test_released_hints_are_unlinked() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let kids: Vec<HintKey> = (0..4).map(|_| hint(&mut helper, "P")).collect();
        helper.add_kids(sect, &kids, None);
        helper.finish(sect);
        for kid in &kids {
            helper.finish(*kid);
        }

        let released = helper.release_finished();
        assert_eq!(released[0], sect);
        assert_eq!(&released[1..], kids.as_slice());
        for kid in &kids {
            assert!(!helper.tree().is_linked(*kid));
        }
    }
}

// =============================================================================
// FLUSHING
// =============================================================================

mod flush_tests {
    use super::*;

    #[test]
    fn test_parent_flushed_after_last_kid() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let first = hint(&mut helper, "P");
        let second = hint(&mut helper, "P");
        helper.add_kids(sect, &[first, second], None);
        let sect_node = materialize(&mut helper, sect).node();
        let first_node = materialize(&mut helper, first).node();
        let second_node = materialize(&mut helper, second).node();

        helper.finish(sect);
        helper.finish(first);
        helper.release_finished();
        assert!(helper.structure().is_flushed(first_node));
        assert!(!helper.structure().is_flushed(sect_node));

        helper.finish(second);
        helper.release_finished();
        assert!(helper.structure().is_flushed(second_node));
        assert!(helper.structure().is_flushed(sect_node));
    }

    #[test]
    fn test_waiting_parent_is_not_flushed() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let p = hint(&mut helper, "P");
        let pending = hint(&mut helper, "P");
        helper.add_kids(sect, &[p, pending], None);
        let sect_node = materialize(&mut helper, sect).node();
        let p_node = materialize(&mut helper, p).node();

        helper.finish(sect);
        helper.finish(p);
        assert_eq!(helper.release_finished(), vec![p]);
        assert!(helper.structure().is_flushed(p_node));
        assert!(!helper.structure().is_flushed(sect_node));
        assert!(helper.has_node(sect));
    }

    #[test]
    fn test_kid_drawn_before_open_parent_is_adopted() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let a = hint(&mut helper, "P");
        let b = hint(&mut helper, "P");
        helper.add_kids(sect, &[a, b], None);

        let a_node = materialize(&mut helper, a).node();
        helper.finish(a);
        assert!(helper.release_finished().is_empty());

        let sect_node = materialize(&mut helper, sect).node();
        let b_node = materialize(&mut helper, b).node();
        let structure = helper.structure();
        assert_eq!(structure.parent(a_node), Some(sect_node));
        assert_eq!(structure.kids(sect_node), &[a_node, b_node]);
        assert_eq!(structure.kids(structure.root()), &[sect_node]);
        assert!(!structure.is_flushed(a_node));
    }

    #[test]
    fn test_kid_inserted_before_kept_kid() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let p = hint(&mut helper, "P");
        helper.add_kids(sect, &[p], None);
        let sect_node = materialize(&mut helper, sect).node();
        materialize(&mut helper, p);
        helper.finish(p);
        assert!(helper.release_finished().is_empty());

        let heading = hint(&mut helper, "H1");
        helper.add_kids(sect, &[heading], Some(0));
        materialize(&mut helper, heading);
        let structure = helper.structure_as::<StructTree>().unwrap();
        assert_eq!(structure.kid_roles(sect_node), vec!["H1", "P"]);
    }

    #[test]
    fn test_existing_element_receives_kids() {
        let mut helper = new_helper();
        let external = {
            let structure = helper.structure_mut();
            let mut cursor = TagCursor::at_root(&*structure);
            structure.add_tag(&mut cursor, "Document", vec![StructAttributes::new("Layout")]);
            cursor
        };
        let p = hint(&mut helper, "P");
        helper.add_kids_to_existing_tag(&external, &[p]);
        let p_node = materialize(&mut helper, p).node();
        assert_eq!(helper.structure().parent(p_node), Some(external.node()));

        // The existing element stays open until the document is closed.
        helper.finish(p);
        assert!(helper.release_finished().is_empty());
        assert!(!helper.structure().is_flushed(external.node()));

        helper.release_all().unwrap();
        assert!(helper.structure().is_flushed(p_node));
        assert!(helper.structure().is_flushed(external.node()));
    }

    #[test]
    fn test_existing_element_uses_one_dummy() {
        let mut helper = new_helper();
        let external = {
            let structure = helper.structure_mut();
            let mut cursor = TagCursor::at_root(&*structure);
            structure.add_tag(&mut cursor, "Part", Vec::new());
            cursor
        };
        let first = hint(&mut helper, "P");
        let second = hint(&mut helper, "P");
        helper.add_kids_to_existing_tag(&external, &[first]);
        helper.add_kids_to_existing_tag(&external, &[second]);

        let dummy = helper.get_parent(first).unwrap();
        assert_eq!(helper.get_parent(second), Some(dummy));
        assert_eq!(helper.hint(dummy).role(), Some("Part"));
    }
}

// =============================================================================
// DOCUMENT CLOSE
// =============================================================================

mod release_all_tests {
    use super::*;

    #[test]
    fn test_no_orphans_after_release_all() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let wrapper = helper.create_dummy(None);
        let kids: Vec<HintKey> = (0..3).map(|_| hint(&mut helper, "P")).collect();
        helper.add_kids(sect, &[kids[0], wrapper], None);
        helper.add_kids(wrapper, &kids[1..], None);
        helper.finish(kids[2]);
        materialize(&mut helper, kids[1]);

        helper.release_all().unwrap();
        assert_eq!(helper.tree().link_counts(), (0, 0));
        assert!(helper.hint_tree_dump().is_empty());
        assert!(!helper.has_node(kids[1]));
    }

    #[test]
    fn test_release_all_flushes_everything() {
        let mut helper = new_helper();
        let sect = hint(&mut helper, "Sect");
        let p = hint(&mut helper, "P");
        helper.add_kids(sect, &[p], None);
        let sect_node = materialize(&mut helper, sect).node();
        let p_node = materialize(&mut helper, p).node();
        helper.finish(sect);
        helper.finish(p);

        helper.release_all().unwrap();
        let structure = helper.structure_as::<StructTree>().unwrap();
        assert_eq!(structure.flush_order(), &[p_node, sect_node]);
        assert_eq!(structure.waiting_count(), 0);
    }
}
