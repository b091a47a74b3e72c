//! Property tests for batch aggregation and range checks.

use std::sync::Arc;

use proptest::prelude::*;

use gait_core::config::GaitConfig;
use gait_core::types::{Stride, Task, Variable};
use gait_validation::batch::{BatchValidationEngine, PartialTally};
use gait_validation::classify::StrideClassifier;
use gait_validation::spec::{Range, SpecRevision, SpecificationStore};
use test_fixtures::{level_walking_spec, phase, stride_inside, stride_with_length, stride_with_value};

/// 0 = passing, 1 = knee out of range at 50%, 2 = truncated knee curve.
fn build_strides(codes: &[u8]) -> Vec<Stride> {
    let spec = level_walking_spec();
    codes
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let base = stride_inside(&spec, &format!("S{:02}", i % 7), Task::LevelWalking, &i.to_string());
            match code {
                0 => base,
                1 => stride_with_value(&base, Variable::KneeFlexionAngle, phase(50), 1.5),
                _ => stride_with_length(&base, Variable::KneeFlexionAngle, 149),
            }
        })
        .collect()
}

fn tally(strides: &[Stride], offset: usize, revision: &SpecRevision) -> PartialTally {
    let classifier = StrideClassifier::default();
    let mut tally = PartialTally::new();
    for (i, stride) in strides.iter().enumerate() {
        match classifier.classify(stride, revision) {
            Ok(verdict) => tally.record_verdict(offset + i, verdict),
            Err(error) => tally.record_structural(offset + i, stride, error),
        }
    }
    tally
}

fn revision() -> Arc<SpecRevision> {
    SpecificationStore::new(level_walking_spec(), "initial")
        .unwrap()
        .pin()
}

fn codes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..3, 1..60)
}

proptest! {
    #[test]
    fn combine_is_order_and_split_independent(
        codes in codes_strategy(),
        a in 0usize..60,
        b in 0usize..60,
    ) {
        let revision = revision();
        let strides = build_strides(&codes);
        let n = strides.len();
        let (lo, hi) = (a.min(b).min(n), a.max(b).min(n));

        let whole = tally(&strides, 0, &revision);
        let first = tally(&strides[..lo], 0, &revision);
        let second = tally(&strides[lo..hi], lo, &revision);
        let third = tally(&strides[hi..], hi, &revision);

        let left = first.clone().combine(second.clone()).combine(third.clone());
        let right = first.clone().combine(second.clone().combine(third.clone()));
        let reversed = third.combine(second).combine(first);

        prop_assert_eq!(&left, &whole);
        prop_assert_eq!(&right, &whole);
        prop_assert_eq!(&reversed, &whole);
    }

    #[test]
    fn counts_partition_the_batch(codes in codes_strategy()) {
        let revision = revision();
        let strides = build_strides(&codes);
        let t = tally(&strides, 0, &revision);

        let expect = |c: u8| codes.iter().filter(|&&x| x == c).count() as u64;
        prop_assert_eq!(t.total, codes.len() as u64);
        prop_assert_eq!(t.valid, expect(0));
        prop_assert_eq!(t.invalid, expect(1) + expect(2));
        prop_assert_eq!(t.structural, expect(2));
        prop_assert_eq!(t.valid + t.invalid, t.total);
    }

    #[test]
    fn engine_result_ignores_chunking(
        codes in codes_strategy(),
        chunk_size in 1usize..20,
        threads in 1usize..4,
    ) {
        let store = Arc::new(SpecificationStore::new(level_walking_spec(), "initial").unwrap());
        let strides = build_strides(&codes);

        let mut config = GaitConfig::default();
        config.batch.chunk_size = Some(chunk_size);
        config.batch.min_chunk_size = Some(1);
        config.batch.threads = Some(threads);
        let chunked = BatchValidationEngine::new(Arc::clone(&store), &config)
            .evaluate(&strides, &store.pin())
            .unwrap();

        config.batch.chunk_size = Some(strides.len());
        config.batch.threads = Some(1);
        let serial = BatchValidationEngine::new(Arc::clone(&store), &config)
            .evaluate(&strides, &store.pin())
            .unwrap();

        prop_assert_eq!(chunked, serial);
    }

    #[test]
    fn in_range_values_never_violate(
        min in -10.0f64..10.0,
        width in 0.001f64..5.0,
        t in 0.0f64..=1.0,
    ) {
        let range = Range::new(min, min + width, "");
        let value = min + t * width;
        let classifier = StrideClassifier::default();
        prop_assert!(classifier.check_value(&range, value).is_none());
    }

    #[test]
    fn out_of_range_values_always_violate(
        min in -10.0f64..10.0,
        width in 0.001f64..5.0,
        excess in 0.0001f64..5.0,
        above in any::<bool>(),
    ) {
        let range = Range::new(min, min + width, "");
        let value = if above { min + width + excess } else { min - excess };
        let classifier = StrideClassifier::default();
        prop_assert!(classifier.check_value(&range, value).is_some());
    }
}
