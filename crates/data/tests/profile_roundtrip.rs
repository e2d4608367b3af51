use std::collections::BTreeSet;
use twinmatch_core::{ProfileStore, UserProfile};
use twinmatch_data::JsonProfileStore;

#[test]
fn empty_profile_survives_save_and_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = JsonProfileStore::in_dir(dir.path());
    store.save(&UserProfile::default()).expect("save");
    assert_eq!(store.load().expect("load"), UserProfile::default());
}

#[test]
fn filled_profile_survives_save_and_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = JsonProfileStore::in_dir(dir.path());
    let profile = UserProfile {
        best_score: 4000,
        solved_variants: ["u3_b", "u1_a", "u2_a"]
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<_>>(),
    };
    store.save(&profile).expect("save");
    assert_eq!(store.load().expect("load"), profile);
}

#[test]
fn array_order_and_repeats_do_not_matter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonProfileStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        r#"{"highScore":1500,"correctCards":["b","a","b"]}"#,
    )
    .expect("write");
    let profile = store.load().expect("load");
    assert_eq!(profile.best_score, 1500);
    assert_eq!(
        profile.solved_variants.iter().collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn save_overwrites_previous_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = JsonProfileStore::in_dir(dir.path());
    let mut profile = UserProfile::default();
    profile.record_solved("u1_a");
    store.save(&profile).expect("first save");
    profile.best_score = 2500;
    store.save(&profile).expect("second save");
    let raw = std::fs::read_to_string(store.path()).expect("read");
    assert!(raw.contains("\"highScore\": 2500"));
    assert_eq!(store.load().expect("load"), profile);
}
