// SPDX-License-Identifier: MIT OR Apache-2.0

// End-to-end chat tests: raw plugin output in, recorded edits and queued
// commands out.

#[path = "common/mod.rs"]
mod common;
use common::SessionRunner;

use blockwatch_rust::core::config::SessionConfig;
use blockwatch_rust::core::model::Coords;

#[test]
fn test_logblock_creation_is_recorded_but_not_clustered() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes at 10:20:30 in world:")
        .chat(50, "01-15 08:00:00 Alice created diamond_ore");

    let set = run.edits();
    assert_eq!(set.edit_count(), 1);
    let edit = set.find_edit(Coords::new(10, 20, 30), Some("alice")).unwrap();
    assert!(edit.creation);
    assert_eq!(edit.block.name(), "diamond_ore");
    assert!(set.ore_db().is_empty());
}

#[test]
fn test_logblock_destruction_becomes_a_deposit() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes at 10:20:30 in world:")
        .chat(50, "01-15 08:00:00 Alice destroyed diamond_ore");

    let ore_db = run.edits().ore_db();
    assert_eq!(ore_db.deposit_count(), 1);
    assert_eq!(ore_db.get_deposit(1).unwrap().key_coords(), Coords::new(10, 20, 30));
    assert_eq!(run.session.selection().get("player").as_deref(), Some("Alice"));
}

#[test]
fn test_detail_after_timeout_is_dropped() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes at 1:2:3 in world:")
        .chat(250, "01-15 08:00:00 Alice destroyed stone");
    assert!(run.session.edits().is_none());
}

#[test]
fn test_detail_just_inside_timeout_is_kept() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes at 1:2:3 in world:")
        .chat(249, "01-15 08:00:00 Alice destroyed stone");
    assert_eq!(run.edits().edit_count(), 1);
}

#[test]
fn test_configured_timeout_is_honoured() {
    let config = SessionConfig {
        correlation_timeout_ms: 1_000,
        ..SessionConfig::default()
    };
    let mut run = SessionRunner::with_config(config);
    run.chat(0, "Block changes at 1:2:3 in world:")
        .chat(900, "01-15 08:00:00 Alice destroyed stone");
    assert_eq!(run.edits().edit_count(), 1);
}

#[test]
fn test_only_first_result_of_a_query_is_selected() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes in world:")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9")
        .chat(10, "(2) 05-30 09:00:00 Carol destroyed iron_ore at 4:13:-9");

    assert_eq!(run.edits().edit_count(), 2);
    assert_eq!(run.session.selection().get("player").as_deref(), Some("Bob"));
    assert_eq!(run.session.selection().get("y").as_deref(), Some("12"));
}

#[test]
fn test_filter_rejects_other_players() {
    let mut run = SessionRunner::new();
    run.session.filter_mut().add("carol");
    run.chat(0, "Block changes in world:")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9")
        .chat(10, "(2) 05-30 09:00:00 Carol destroyed iron_ore at 4:13:-9");

    let set = run.edits();
    assert_eq!(set.edit_count(), 1);
    assert!(set.player_set("bob").is_none());
    assert!(set.player_set("Carol").is_some());
    // The rejected first result still used up the selection.
    assert!(run.session.selection().is_empty());
}

#[test]
fn test_prism_lookup_pairs_detail_and_location() {
    let mut run = SessionRunner::new();
    run.chat(0, "Prism // Showing 1 results. Page 1 of 1")
        .chat(10, "- steve broke gold_ore 5m ago (a:block-break)")
        .chat(5, "-- 1 - 6/1/24 11:50:30am - world @ -7 33 18");

    let set = run.edits();
    assert_eq!(set.edit_count(), 1);
    let edit = set.find_edit(Coords::new(-7, 33, 18), None).unwrap();
    assert!(!edit.creation);
    assert_eq!(edit.block.name(), "gold_ore");
    assert_eq!(set.ore_db().deposit_count(), 1);
}

#[test]
fn test_coreprotect_inspector_uses_header_coordinates() {
    let mut run = SessionRunner::new();
    run.chat(0, "----- CoreProtect ----- (x3/y-40/z9)")
        .chat(20, "0.10/h ago - notch broke emerald_ore.");

    let set = run.edits();
    let edit = set.find_edit(Coords::new(3, -40, 9), Some("notch")).unwrap();
    assert!(!edit.creation);
    assert_eq!(set.ore_db().deposit_count(), 1);
}

#[test]
fn test_multi_page_results_request_next_page_once_spaced() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes in world:")
        .chat(10, "Page 1/5")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed stone at 0:0:0")
        .drain();
    assert_eq!(run.sent, vec!["/lb page 2".to_string()]);
    assert_eq!(run.edits().edit_count(), 1);
}

#[test]
fn test_later_page_results_are_recorded() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes in world:")
        .chat(10, "Page 1/3")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9")
        .chat(1_000, "Page 2/3")
        .chat(10, "(11) 05-29 10:00:00 Bob destroyed iron_ore at 40:12:-9")
        .drain();

    let set = run.edits();
    assert_eq!(set.edit_count(), 2);
    assert!(set.find_edit(Coords::new(40, 12, -9), Some("bob")).is_some());
    assert_eq!(run.session.selection().get("x").as_deref(), Some("4"));
    assert_eq!(run.sent, vec!["/lb page 2".to_string(), "/lb page 3".to_string()]);
}

#[test]
fn test_lookup_row_after_inspector_header_is_ignored() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes at 1:2:3 in world:")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9");
    assert!(run.session.edits().is_none());
}

#[test]
fn test_header_alone_creates_no_edit_set() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes in world:").chat(10, "Page 1/1");
    assert!(run.session.edits().is_none());
}

#[test]
fn test_auto_page_stops_at_configured_limit() {
    let config = SessionConfig {
        max_auto_pages: 2,
        ..SessionConfig::default()
    };
    let mut run = SessionRunner::with_config(config);
    run.chat(0, "Page 2/5").drain();
    assert!(run.sent.is_empty());
}

#[test]
fn test_unrecognised_chat_is_ignored() {
    let mut run = SessionRunner::new();
    run.chat(0, "<steve> has anyone seen my diamonds?")
        .chat(10, "01-15 08:00:00 Alice destroyed stone");
    // No header was seen, so the detail line records nothing.
    assert!(run.session.edits().is_none());
}
