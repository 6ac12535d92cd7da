//! Tab collection and tab group behaviour through the public API
//!
//! Covers the identity-preserving active selection (close and move), the
//! no-op setter contract, and group deletion ungrouping its tabs.

mod common;

use common::{TestContext, active_tab_ids};
use tabshell::events::ChangeEvent;
use tabshell::tab::TabCollection;
use tabshell::tab_group::NO_GROUP;

fn collection_with_ids(ids: &[u64]) -> TabCollection {
    let mut tabs = TabCollection::new(1);
    for &id in ids {
        tabs.add_tab_with_id(id, &format!("https://site/{id}"), "", true);
    }
    tabs.take_events();
    tabs
}

// ============================================================================
// Active selection
// ============================================================================

#[test]
fn test_move_keeps_active_identity() {
    // A(1), B(2) with B active; moving A after B keeps B active at index 0
    let mut tabs = collection_with_ids(&[1, 2]);
    assert_eq!(tabs.active_tab_id(), Some(2));

    assert!(tabs.move_tab(0, 1));
    assert_eq!(tabs.ids(), vec![2, 1]);
    assert_eq!(tabs.active_tab_id(), Some(2));
    assert_eq!(tabs.active_index(), Some(0));
}

#[test]
fn test_active_index_stays_in_bounds_for_any_sequence() {
    let mut tabs = TabCollection::new(1);
    let mut seed = 0x2545_f491_u64;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let len = tabs.len();
        match seed % 4 {
            0 | 1 => {
                tabs.add_tab("about:blank");
            }
            2 => {
                tabs.close_tab((seed as usize / 4) % (len + 1));
            }
            _ => {
                tabs.move_tab((seed as usize / 4) % (len + 1), (seed as usize / 16) % (len + 2));
            }
        }
        match tabs.active_index() {
            None => assert!(tabs.is_empty()),
            Some(index) => assert!(index < tabs.len()),
        }
    }
}

#[test]
fn test_moves_never_change_active_id() {
    let mut tabs = collection_with_ids(&[10, 11, 12, 13, 14]);
    tabs.set_active_index(2);
    for (from, to) in [(0, 4), (4, 0), (2, 3), (1, 1), (3, 100)] {
        tabs.move_tab(from, to);
        assert_eq!(tabs.active_tab_id(), Some(12));
    }
}

#[test]
fn test_close_reports_removed_row() {
    let mut tabs = collection_with_ids(&[1, 2, 3]);
    tabs.set_active_index(0);
    tabs.take_events();
    tabs.close_tab(1);
    assert_eq!(
        tabs.take_events(),
        vec![ChangeEvent::RowsRemoved {
            workspace: 1,
            range: 1..2
        }]
    );
}

#[test]
fn test_setters_without_change_fire_nothing() {
    let mut tabs = collection_with_ids(&[1]);
    tabs.set_url(0, "https://site/1");
    tabs.set_custom_title(0, "");
    tabs.set_muted(0, false);
    assert!(!tabs.has_pending_events());
}

#[test]
fn test_display_title_precedence() {
    let mut tabs = collection_with_ids(&[1]);
    assert_eq!(tabs.get(0).unwrap().display_title(), "New Tab");
    tabs.set_title(0, "Page");
    assert_eq!(tabs.get(0).unwrap().display_title(), "Page");
    tabs.set_custom_title(0, "Mine");
    assert_eq!(tabs.get(0).unwrap().display_title(), "Mine");
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_removing_group_ungroups_its_tabs() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    browser.add_tab("https://a");
    browser.add_tab("https://b");

    let work = browser.add_group("Work").unwrap();
    let play = browser.add_group("Play").unwrap();
    assert!(browser.set_tab_group(0, work));
    assert!(browser.set_tab_group(1, work));
    assert!(browser.set_tab_group(2, play));

    let work_index = browser.active_workspace().unwrap().groups.index_of(work).unwrap();
    assert!(browser.remove_group(work_index));

    let workspace = browser.active_workspace().unwrap();
    let groups: Vec<u64> = workspace.tabs.tabs().iter().map(|t| t.group_id()).collect();
    assert_eq!(groups, vec![NO_GROUP, NO_GROUP, play]);
    for tab in workspace.tabs.tabs() {
        assert!(tab.group_id() == NO_GROUP || workspace.groups.contains(tab.group_id()));
    }
}

#[test]
fn test_group_setters_through_browser() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    browser.add_group("Docs");
    assert!(browser.rename_group(0, "Reference"));
    assert!(browser.set_group_collapsed(0, true));
    assert!(browser.set_group_color(0, "#123456"));
    let group = &browser.active_workspace().unwrap().groups.groups()[0];
    assert_eq!(group.name(), "Reference");
    assert!(group.is_collapsed());
    assert_eq!(group.color(), "#123456");
    assert!(!browser.rename_group(5, "missing"));
}

#[test]
fn test_browser_tab_commands_target_active_workspace() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let first = active_tab_ids(&browser)[0];
    let second = browser.add_tab("https://b").unwrap();
    assert!(browser.move_tab(1, 0));
    assert_eq!(active_tab_ids(&browser), vec![second, first]);
    assert!(browser.set_active_tab(1));
    assert_eq!(
        browser.active_workspace().unwrap().tabs.active_tab_id(),
        Some(first)
    );
    assert!(!browser.set_active_tab(9));
}

#[test]
fn test_browser_move_past_end_is_ignored() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    browser.add_tab("https://b");
    browser.add_tab("https://c");
    let before = active_tab_ids(&browser);

    assert!(!browser.move_tab(0, 99));
    assert_eq!(active_tab_ids(&browser), before);
    assert!(!browser.move_workspace(0, 4));
}
