//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's capacity, expiry and sampling rules
//! over generated inputs. Time is frozen with a `ManualClock`.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{
    CacheSettings, CachedExercise, Exercise, ExerciseCache, ExerciseType, ManualClock,
    EXERCISE_STORE_KEY,
};
use crate::storage::{KeyValueStore, MemoryStore};

// == Test Configuration ==
const NOW: u64 = 1_700_000_000_000;
const TEST_TTL_MS: u64 = 24 * 60 * 60 * 1000;
const TEST_MAX_PER_TYPE: usize = 20;

// == Helpers ==
fn settings() -> CacheSettings {
    CacheSettings {
        ttl_ms: TEST_TTL_MS,
        max_per_type: TEST_MAX_PER_TYPE,
    }
}

fn build_cache(seed: u64) -> (ExerciseCache, Arc<MemoryStore>, Arc<ManualClock>) {
    let storage = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let cache = ExerciseCache::with_parts(
        storage.clone(),
        clock.clone(),
        StdRng::seed_from_u64(seed),
        settings(),
    );
    (cache, storage, clock)
}

fn exercise(id: &str, kind: ExerciseType, title: &str) -> Exercise {
    Exercise {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        prompt_text: "Prompt".to_string(),
        body_text: None,
        audio_url: None,
        audio_script: None,
        timer_seconds: 120,
        questions: Vec::new(),
        min_words: None,
        max_words: None,
    }
}

fn stored_exercises(storage: &MemoryStore) -> Vec<CachedExercise> {
    storage
        .get(EXERCISE_STORE_KEY)
        .unwrap()
        .map(|blob| crate::cache::decode(&blob).unwrap())
        .unwrap_or_default()
}

// == Strategies ==
fn exercise_type_strategy() -> impl Strategy<Value = ExerciseType> {
    prop_oneof![
        Just(ExerciseType::Listening),
        Just(ExerciseType::Reading),
        Just(ExerciseType::Writing),
        Just(ExerciseType::Speaking),
    ]
}

fn user_input_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,äöüß]{0,64}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // A record one millisecond past the TTL is never served; one millisecond
    // inside it is.
    #[test]
    fn prop_ttl_boundary(kind in exercise_type_strategy(), seed in any::<u64>()) {
        let (mut cache, _, clock) = build_cache(seed);

        clock.set(NOW - TEST_TTL_MS - 1);
        cache.add_exercise(exercise("stale", kind, "stale"));
        clock.set(NOW - TEST_TTL_MS + 1);
        cache.add_exercise(exercise("fresh", kind, "fresh"));
        clock.set(NOW);

        let ids: Vec<String> = cache
            .get_exercises_by_type(kind, 10)
            .into_iter()
            .map(|r| r.exercise.id)
            .collect();

        prop_assert_eq!(ids, vec!["fresh".to_string()]);
    }

    // Inserting max + extra distinct exercises of one type keeps exactly max,
    // drops the oldest, and leaves other types alone.
    #[test]
    fn prop_per_type_capacity(
        kind in exercise_type_strategy(),
        extra in 1usize..10,
        bystanders in 0usize..5,
    ) {
        let (cache, storage, clock) = build_cache(0);
        let other = ExerciseType::ALL
            .into_iter()
            .find(|t| *t != kind)
            .unwrap();

        for i in 0..bystanders {
            cache.add_exercise(exercise(&format!("other-{}", i), other, "other"));
        }

        let total = TEST_MAX_PER_TYPE + extra;
        for i in 0..total {
            clock.advance(1);
            cache.add_exercise(exercise(&format!("ex-{}", i), kind, "t"));
        }

        let stored = stored_exercises(&storage);
        let kept: HashSet<String> = stored
            .iter()
            .filter(|r| r.kind() == kind)
            .map(|r| r.exercise.id.clone())
            .collect();

        prop_assert_eq!(kept.len(), TEST_MAX_PER_TYPE);
        for i in 0..extra {
            let evicted = format!("ex-{}", i);
            prop_assert!(!kept.contains(&evicted), "{} should have been evicted", evicted);
        }
        prop_assert_eq!(
            stored.iter().filter(|r| r.kind() == other).count(),
            bystanders
        );
    }

    // Writing the same id twice keeps a single record with the second values.
    #[test]
    fn prop_upsert_idempotence(
        kind in exercise_type_strategy(),
        first in "[a-z]{1,16}",
        second in "[a-z]{1,16}",
        others in 0usize..TEST_MAX_PER_TYPE,
    ) {
        let (cache, storage, _) = build_cache(0);
        for i in 0..others {
            cache.add_exercise(exercise(&format!("o{}", i), kind, "o"));
        }

        cache.add_exercise(exercise("same", kind, &first));
        cache.add_exercise(exercise("same", kind, &second));

        let stored = stored_exercises(&storage);
        let same: Vec<&CachedExercise> = stored.iter().filter(|r| r.id() == "same").collect();

        prop_assert_eq!(same.len(), 1);
        prop_assert_eq!(&same[0].exercise.title, &second);
        prop_assert_eq!(stored.len(), others + 1);
    }

    // Sampling never exceeds the requested count and never pads.
    #[test]
    fn prop_sample_count_bound(
        kind in exercise_type_strategy(),
        cached in 0usize..TEST_MAX_PER_TYPE,
        requested in 0usize..40,
        seed in any::<u64>(),
    ) {
        let (mut cache, _, _) = build_cache(seed);
        for i in 0..cached {
            cache.add_exercise(exercise(&format!("e{}", i), kind, "t"));
        }

        let served = cache.get_exercises_by_type(kind, requested);
        let unique: HashSet<&str> = served.iter().map(|r| r.id()).collect();

        prop_assert_eq!(served.len(), requested.min(cached));
        prop_assert_eq!(unique.len(), served.len());
    }

    // Stats count exactly the live records written.
    #[test]
    fn prop_stats_consistency(
        per_type in prop::collection::vec(0usize..TEST_MAX_PER_TYPE, 4),
        inputs in prop::collection::hash_set(user_input_strategy(), 0..20),
    ) {
        let (cache, _, _) = build_cache(0);

        for (kind, n) in ExerciseType::ALL.into_iter().zip(per_type.iter()) {
            for i in 0..*n {
                cache.add_exercise(exercise(&format!("{}-{}", kind, i), kind, "t"));
            }
        }
        for input in &inputs {
            cache.add_feedback("e1", input, json!({"input": input}));
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.exercise_count, per_type.iter().sum::<usize>());
        prop_assert_eq!(stats.feedback_count, inputs.len());
    }

    // Feedback hits require the exact input string.
    #[test]
    fn prop_feedback_exact_match(input in user_input_strategy(), suffix in "[a-z ]{1,4}") {
        let (cache, _, _) = build_cache(0);
        cache.add_feedback("e1", &input, json!(input.clone()));

        let altered = format!("{}{}", input, suffix);
        prop_assert_eq!(cache.get_feedback("e1", &input), Some(json!(input.clone())));
        prop_assert_eq!(cache.get_feedback("e1", &altered), None);
        prop_assert_eq!(cache.get_feedback("e2", &input), None);
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error variant renders as JSON with a string "error" field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::CacheError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::Storage(error_msg.clone()),
            CacheError::Malformed(error_msg.clone()),
            CacheError::Internal(error_msg.clone()),
        ];

        let rt = tokio::runtime::Runtime::new().unwrap();
        for error in error_variants {
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async { to_bytes(response.into_body(), usize::MAX).await.unwrap() });
            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(error_msg.as_str()));
        }
    }
}
