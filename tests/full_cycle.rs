//! End-to-end `addFact -> retrieve -> reflect` cycle against a
//! `tempfile`-backed SQLite database (spec §2 data-flow diagram).

use cortexpool::CortexEngine;
use cortexpool_core::config::CortexConfig;
use cortexpool_memory::AddFactInput;

#[test]
fn full_cycle_against_an_on_disk_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("cortexpool.sqlite3");
    let db_path = db_path.to_str().unwrap();

    let mut engine = CortexEngine::open(db_path, CortexConfig::default()).expect("open engine");

    engine
        .add_fact(AddFactInput::new("William", "created", "created OpenLiam").with_object("OpenLiam"))
        .unwrap();
    engine
        .add_fact(AddFactInput::new("OpenLiam", "runs-on", "runs on Rust").with_object("Rust"))
        .unwrap();
    engine
        .add_fact(AddFactInput::new("William", "prefers", "dark mode"))
        .unwrap();

    let results = engine.retrieve(&["William".to_string()]).unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().any(|r| r.subject.canonical_name == "william"));

    let report = engine.reflect().unwrap();
    assert_eq!(report.contradictions, 0);

    let export = engine.export().unwrap();
    assert!(!export.entities.is_empty());
    assert!(!export.facts.is_empty());

    // Re-opening the same file sees the persisted state.
    drop(engine);
    let mut reopened = CortexEngine::open(db_path, CortexConfig::default()).expect("reopen engine");
    let reopened_results = reopened.retrieve(&["William".to_string()]).unwrap();
    assert!(!reopened_results.is_empty());
}
