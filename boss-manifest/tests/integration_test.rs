//! Integration tests covering the filelist update scenario

use boss_manifest::{Manifest, ManifestEntry};

const FIRST_RUN: &str = "Foo\tX\tEvent\tID123\tY\t1024\t1700000000";
const SECOND_RUN: &str = "Foo\tX\tEvent\tID123\tY\t1024\t1700000500";

#[test]
fn two_run_update_cycle() {
    // First run: no stored snapshot, everything is new.
    let first = Manifest::parse(FIRST_RUN).unwrap();
    assert_eq!(first.entries().len(), 1);

    // Second run: the snapshot text differs, so the source is considered
    // changed (exact text comparison is the change signal).
    assert_ne!(FIRST_RUN, SECOND_RUN);

    let second = Manifest::parse(SECOND_RUN).unwrap();
    let worklist = Manifest::diff(&first, &second);
    assert_eq!(worklist.len(), 1);

    // The new entry supersedes the old one: same name/kind/id, larger
    // timestamp.
    let updates = second.updates_of(&first);
    assert_eq!(updates.len(), 1);
    assert!(updates[0].is_updated_version_of(&first.entries()[0]));
}

#[test]
fn archive_id_round_trip_preserves_identity_tuple() {
    let entry = ManifestEntry::from_line(FIRST_RUN).unwrap();
    let reparsed = ManifestEntry::from_archive_id(&entry.archive_id()).unwrap();

    assert_eq!(
        (&reparsed.name, &reparsed.kind, &reparsed.id, reparsed.timestamp),
        (&entry.name, &entry.kind, &entry.id, entry.timestamp),
    );
    // content_size is intentionally not round-tripped.
    assert_eq!(reparsed.content_size, None);
}
