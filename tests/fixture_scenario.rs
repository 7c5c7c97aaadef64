//! Exercises the shared in-memory fixture (`cortexpool-test-fixtures`)
//! directly against the subsystem crates, independent of the `CortexEngine`
//! facade — spec §8 scenario 3: seeding a fact, binding topics, spreading
//! activation, and retrieving it back above the stated score threshold.

use cortexpool_memory::AddFactInput;
use cortexpool_test_fixtures::Fixture;

#[test]
fn seeded_fact_surfaces_above_threshold_after_retrieve() {
    let mut fixture = Fixture::new();

    fixture
        .facts
        .add_fact(AddFactInput::new("William", "created", "created OpenLiam").with_object("OpenLiam"))
        .unwrap();

    let open_liam = fixture.resolver.resolve_entity("OpenLiam").unwrap().unwrap();
    let results = fixture.retrieval.retrieve(&["OpenLiam".to_string()], 15).unwrap();

    let seeded = results
        .iter()
        .find(|hf| hf.fact.predicate == "created")
        .expect("the seeded fact is in the pool");
    assert!(seeded.score > 0.4, "score was {}", seeded.score);
    assert!(fixture.retrieval.activation_of(open_liam.id) > 0.0);
}

#[test]
fn reflect_runs_against_the_shared_fixture_without_topics() {
    let fixture = Fixture::new();
    fixture
        .facts
        .add_fact(AddFactInput::new("William", "prefers", "tabs"))
        .unwrap();

    let report = fixture.consolidator.reflect(None, None, 15).unwrap();
    assert_eq!(report.contradictions, 0);
}
