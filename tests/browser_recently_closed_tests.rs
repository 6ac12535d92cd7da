//! Closing and reopening tabs through the browser

mod common;

use common::{TestContext, active_tab_ids};
use tabshell::CloseOutcome;

#[test]
fn test_history_saturates_and_reopens_latest() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    for i in 0..60 {
        let tab = browser.add_tab(&format!("https://site/{i}")).unwrap();
        assert_eq!(browser.close_tab_by_id(tab), CloseOutcome::Removed);
    }
    assert_eq!(browser.recently_closed().len(), 50);
    assert_eq!(browser.recently_closed().get(49).unwrap().url, "https://site/10");

    let reopened = browser.restore_last_closed_tab().unwrap();
    let workspace = browser.active_workspace().unwrap();
    assert_eq!(workspace.tabs.active_tab_id(), Some(reopened));
    assert_eq!(workspace.tabs.get_by_id(reopened).unwrap().url(), "https://site/59");
    assert_eq!(browser.recently_closed().len(), 49);
}

#[test]
fn test_reopen_returns_to_original_workspace() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let tab = browser.add_tab("https://home.example").unwrap();
    browser.close_tab_by_id(tab);

    browser.add_workspace("Elsewhere");
    browser.set_active_workspace(1);
    browser.take_navigation_requests();

    let reopened = browser.restore_last_closed_tab().unwrap();
    assert_eq!(browser.workspaces().active_index(), Some(0));
    assert!(active_tab_ids(&browser).contains(&reopened));
    assert_ne!(reopened, tab);

    let navigation = browser.take_navigation_requests();
    assert_eq!(navigation.len(), 1);
    assert_eq!(navigation[0].tab, reopened);
    assert_eq!(navigation[0].url, "https://home.example");
}

#[test]
fn test_reopen_falls_back_to_active_workspace() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    browser.add_workspace("Doomed");
    browser.set_active_workspace(1);
    let tab = browser.add_tab("https://doomed.example").unwrap();
    browser.close_tab_by_id(tab);
    browser.close_workspace(1);

    let reopened = browser.restore_last_closed_tab().unwrap();
    assert_eq!(browser.workspaces().len(), 1);
    assert!(active_tab_ids(&browser).contains(&reopened));
}

#[test]
fn test_reopen_drops_deleted_group() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let group = browser.add_group("Reading").unwrap();
    browser.add_tab("https://grouped.example");
    let index = browser.active_workspace().unwrap().tabs.active_index().unwrap();
    assert!(browser.set_tab_group(index, group));
    browser.close_tab(index);
    assert_eq!(browser.recently_closed().get(0).unwrap().group_id, group);

    browser.remove_group(0);
    let reopened = browser.restore_last_closed_tab().unwrap();
    let tab = browser
        .active_workspace()
        .unwrap()
        .tabs
        .get_by_id(reopened)
        .unwrap();
    assert!(!tab.is_grouped());
}

#[test]
fn test_fallback_workspace_group_is_not_adopted() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let home_group = browser.add_group("Home group").unwrap();

    browser.add_workspace("Doomed");
    browser.set_active_workspace(1);
    let doomed_group = browser.add_group("Doomed group").unwrap();
    // Group ids are numbered per workspace, so the two collide
    assert_eq!(home_group, doomed_group);
    browser.add_tab("https://doomed.example");
    let index = browser.active_workspace().unwrap().tabs.active_index().unwrap();
    assert!(browser.set_tab_group(index, doomed_group));
    browser.close_tab(index);
    browser.close_workspace(1);

    let reopened = browser.restore_last_closed_tab().unwrap();
    let tab = browser
        .active_workspace()
        .unwrap()
        .tabs
        .get_by_id(reopened)
        .unwrap();
    assert!(!tab.is_grouped());
}

#[test]
fn test_reopen_keeps_group_in_original_workspace() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let group = browser.add_group("Reading").unwrap();
    browser.add_tab("https://grouped.example");
    let index = browser.active_workspace().unwrap().tabs.active_index().unwrap();
    browser.set_tab_group(index, group);
    browser.close_tab(index);

    let reopened = browser.restore_last_closed_tab().unwrap();
    let tab = browser
        .active_workspace()
        .unwrap()
        .tabs
        .get_by_id(reopened)
        .unwrap();
    assert_eq!(tab.group_id(), group);
}

#[test]
fn test_essential_tab_is_not_recorded() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let tab = browser.add_tab("https://pinned.example").unwrap();
    browser.set_tab_essential(tab, true);
    browser.set_tab_url(tab, "https://pinned.example/deep/link");

    assert_eq!(browser.close_tab_by_id(tab), CloseOutcome::Reset);
    assert!(browser.recently_closed().is_empty());
    let workspace = browser.active_workspace().unwrap();
    assert_eq!(
        workspace.tabs.get_by_id(tab).unwrap().url(),
        "https://pinned.example"
    );
}

#[test]
fn test_restore_from_empty_history() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    assert!(browser.restore_last_closed_tab().is_none());
    assert!(browser.restore_closed_tab(3).is_none());
}

#[test]
fn test_search_spans_open_and_closed_tabs() {
    let ctx = TestContext::new();
    let mut browser = ctx.browser();
    let open = browser.add_tab("https://docs.rust-lang.org/std").unwrap();
    let closed = browser.add_tab("https://doc.rust-lang.org/book").unwrap();
    browser.close_tab_by_id(closed);

    let results = browser.search("rust-lang", 10);
    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0].source,
        tabshell::SearchSource::OpenTab { tab, .. } if tab == open
    ));
    assert!(matches!(
        results[1].source,
        tabshell::SearchSource::RecentlyClosed { index: 0 }
    ));
}
