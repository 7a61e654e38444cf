use dayplan_core::{DateRecordStore, OnThisDayFact};
use std::sync::{Arc, Barrier};
use std::thread;

fn fact(title: &str, year: i64, wiki_link: &str) -> OnThisDayFact {
    OnThisDayFact {
        title: title.to_string(),
        year,
        wiki_link: wiki_link.to_string(),
    }
}

#[test]
fn first_set_wins_and_later_calls_are_rejected_no_ops() {
    let store = DateRecordStore::new();
    let date = "2024-03-01";

    assert!(store.set_on_this_day(date, fact("T", 1999, "url")));
    assert!(!store.set_on_this_day(date, fact("Other", 2001, "other-url")));
    assert!(!store.set_on_this_day(date, fact("T", 1999, "url")));

    assert_eq!(store.get_on_this_day(date), Some(fact("T", 1999, "url")));
}

#[test]
fn fact_cache_is_per_date() {
    let store = DateRecordStore::new();

    assert!(store.set_on_this_day("2024-03-01", fact("A", 1901, "a")));
    assert!(store.set_on_this_day("2024-03-02", fact("B", 1902, "b")));

    assert_eq!(store.get_on_this_day("2024-03-01"), Some(fact("A", 1901, "a")));
    assert_eq!(store.get_on_this_day("2024-03-02"), Some(fact("B", 1902, "b")));
}

#[test]
fn fact_caching_does_not_touch_notes() {
    let store = DateRecordStore::new();
    let id = store.add_note("2024-03-01", "existing");

    assert!(store.set_on_this_day("2024-03-01", fact("T", 1999, "url")));

    let notes = store.get_notes("2024-03-01");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, id);
    assert_eq!(store.get_incomplete_note_count("2024-03-01"), 1);
}

#[test]
fn racing_setters_for_one_uncached_date_yield_exactly_one_success() {
    // Models two UI tabs finishing the same fetch at the same time.
    let store = Arc::new(DateRecordStore::new());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|worker| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.set_on_this_day(
                    "2024-07-20",
                    OnThisDayFact {
                        title: format!("worker {worker}"),
                        year: 1969,
                        wiki_link: format!("https://example.com/{worker}"),
                    },
                )
            })
        })
        .collect();

    let accepted: Vec<bool> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(accepted.iter().filter(|accepted| **accepted).count(), 1);

    // The cached fact is exactly the one whose set call reported success.
    let winner = accepted.iter().position(|accepted| *accepted).unwrap();
    let cached = store.get_on_this_day("2024-07-20").unwrap();
    assert_eq!(cached.title, format!("worker {winner}"));
}
