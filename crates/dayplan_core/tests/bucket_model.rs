use dayplan_core::{BucketValidationError, DateBucket, Note, OnThisDayFact};

#[test]
fn new_bucket_sets_defaults() {
    let bucket = DateBucket::new();

    assert!(bucket.notes.is_empty());
    assert_eq!(bucket.fact, None);
    assert_eq!(bucket.next_note_id, 1);
    assert_eq!(bucket.incomplete_count(), 0);
}

#[test]
fn bucket_serialization_uses_expected_wire_fields() {
    let mut bucket = DateBucket::new();
    bucket.add_note("Buy milk");
    bucket.toggle_note(1);
    bucket.set_fact(OnThisDayFact {
        title: "Treaty signed".to_string(),
        year: -27,
        wiki_link: "https://en.wikipedia.org/wiki/Augustus".to_string(),
    });

    let json = serde_json::to_value(&bucket).unwrap();
    assert_eq!(json["next_note_id"], 2);
    assert_eq!(json["notes"][0]["id"], 1);
    assert_eq!(json["notes"][0]["content"], "Buy milk");
    assert_eq!(json["notes"][0]["is_complete"], true);
    assert_eq!(json["fact"]["title"], "Treaty signed");
    assert_eq!(json["fact"]["year"], -27);
    assert_eq!(
        json["fact"]["wiki_link"],
        "https://en.wikipedia.org/wiki/Augustus"
    );

    let decoded: DateBucket = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, bucket);
}

#[test]
fn fact_year_supports_values_before_year_zero() {
    let mut bucket = DateBucket::new();
    assert!(bucket.set_fact(OnThisDayFact {
        title: "Battle".to_string(),
        year: -480,
        wiki_link: "https://en.wikipedia.org/wiki/Battle_of_Salamis".to_string(),
    }));
    assert_eq!(bucket.fact.as_ref().unwrap().year, -480);
}

#[test]
fn validate_accepts_buckets_produced_by_normal_use() {
    let mut bucket = DateBucket::new();
    for index in 0..5 {
        bucket.add_note(format!("note {index}"));
    }
    bucket.toggle_note(3);

    bucket.validate().unwrap();
}

#[test]
fn validate_rejects_counter_not_above_issued_ids() {
    let bucket = DateBucket {
        notes: vec![Note {
            id: 7,
            content: "stray".to_string(),
            is_complete: false,
        }],
        fact: None,
        next_note_id: 3,
    };

    let err = bucket.validate().unwrap_err();
    assert_eq!(
        err,
        BucketValidationError::NextIdNotAboveIssued {
            next_note_id: 3,
            issued: 7,
        }
    );
}

#[test]
fn validate_rejects_duplicate_ids() {
    let note = Note {
        id: 1,
        content: "dup".to_string(),
        is_complete: false,
    };
    let bucket = DateBucket {
        notes: vec![note.clone(), note],
        fact: None,
        next_note_id: 2,
    };

    let err = bucket.validate().unwrap_err();
    assert_eq!(
        err,
        BucketValidationError::NoteIdsNotIncreasing {
            previous: 1,
            current: 1,
        }
    );
}
