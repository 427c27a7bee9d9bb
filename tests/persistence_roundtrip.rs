// SPDX-License-Identifier: MIT OR Apache-2.0

// Saving an edit set to disk and loading it into a fresh session.

#[path = "common/mod.rs"]
mod common;
use common::{noon, EditFeeder, SessionRunner};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use blockwatch_rust::core::db::persistence;
use blockwatch_rust::core::db::{BlockEditSet, EditContext, PlayerFilter};
use blockwatch_rust::core::model::{Annotation, Coords};

#[test]
fn test_session_save_and_reload() {
    let mut run = SessionRunner::new();
    run.chat(0, "Block changes in world:")
        .chat(10, "(1) 05-30 10:00:00 Bob destroyed iron_ore at 4:12:-9")
        .chat(10, "(2) 05-30 09:30:00 Bob destroyed iron_ore at 4:13:-9")
        .chat(10, "(3) 05-30 09:00:00 Carol created torch at 4:14:-9");
    run.session
        .edits_mut()
        .add_annotation(Annotation::new(Coords::new(4, 12, -9), "iron | vein"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edits.txt");
    let written = run
        .session
        .save_edits(BufWriter::new(File::create(&path).unwrap()))
        .unwrap();
    assert_eq!(written, 4);

    let mut fresh = SessionRunner::new();
    let report = fresh
        .session
        .load_edits(BufReader::new(File::open(&path).unwrap()))
        .unwrap();
    assert_eq!((report.edits, report.annotations, report.skipped), (3, 1, 0));

    let set = fresh.edits();
    assert_eq!(set.edit_count(), 3);
    assert_eq!(set.ore_db().deposit_count(), 1);
    assert_eq!(set.annotations()[0].text, "iron | vein");
    let torch = set.find_edit(Coords::new(4, 14, -9), Some("carol")).unwrap();
    assert!(torch.creation);
    assert_eq!(torch.block.name(), "torch");
}

#[test]
fn test_times_are_stored_to_the_second() {
    let mut feeder = EditFeeder::new();
    feeder.destroy(noon() + 1_234, "alice", (1, 2, 3), "coal_ore");

    let mut buffer = Vec::new();
    persistence::save(&feeder.set, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text, "2024-06-01|12:00:01|alice|d|16|0|1|2|3\n");

    let mut set = BlockEditSet::new();
    let filter = PlayerFilter::new();
    let mut ctx = EditContext::new(&filter, true);
    persistence::load(text.as_bytes(), &feeder.blocks, &mut ctx, &mut set).unwrap();
    let edit = set.edits().next().unwrap();
    assert_eq!(edit.time, noon() + 1_000);
}

#[test]
fn test_bad_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edits.txt");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "2024-06-01|12:00:00|alice|d|56|0|1|2|3").unwrap();
    writeln!(file, "2024-06-01|12:00:00|alice|x|56|0|1|2|3").unwrap();
    writeln!(file, "not an edit").unwrap();
    writeln!(file, "#1|2").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "#1|2|3|note").unwrap();
    drop(file);

    let mut run = SessionRunner::new();
    let report = run
        .session
        .load_edits(BufReader::new(File::open(&path).unwrap()))
        .unwrap();
    assert_eq!((report.edits, report.annotations, report.skipped), (1, 1, 3));
    assert_eq!(run.edits().ore_db().deposit_count(), 1);
}

#[test]
fn test_load_respects_player_filter() {
    let text = "2024-06-01|12:00:00|alice|d|56|0|1|2|3\n\
                2024-06-01|12:00:05|bob|d|56|0|1|3|3\n";
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edits.txt");
    fs::write(&path, text).unwrap();

    let mut run = SessionRunner::new();
    run.session.filter_mut().add("bob");
    let report = run
        .session
        .load_edits(BufReader::new(File::open(&path).unwrap()))
        .unwrap();
    assert_eq!(report.edits, 1);
    assert!(run.edits().player_set("alice").is_none());
}

#[test]
fn test_multi_line_annotation_and_odd_player_reload() {
    let mut feeder = EditFeeder::new();
    feeder.destroy(noon(), "pipe|man", (1, 2, 3), "coal_ore");
    feeder
        .set
        .add_annotation(Annotation::new(Coords::new(1, 2, 3), "line one\nline two \\ end"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edits.txt");
    persistence::save(&feeder.set, BufWriter::new(File::create(&path).unwrap())).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);

    let mut run = SessionRunner::new();
    let report = run
        .session
        .load_edits(BufReader::new(File::open(&path).unwrap()))
        .unwrap();
    assert_eq!((report.edits, report.annotations, report.skipped), (1, 1, 0));
    let set = run.edits();
    assert!(set.player_set("pipe|man").is_some());
    assert_eq!(set.annotations()[0].text, "line one\nline two \\ end");
}
