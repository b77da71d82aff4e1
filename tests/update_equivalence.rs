mod common;

use common::{assert_query_exact, buildable_len, wave};
use ola::{HierarchicalBuffer, OlaError, RangedPolynomial};
use test_case::test_case;

#[test]
fn binary_linear_point_update() {
    let engine = HierarchicalBuffer::<f64>::new(2, 1).expect("valid parameters");
    let mut data: Vec<f64> = (0..9).map(|x| x as f64).collect();
    let mut buffer = engine.build(&data).expect("build succeeds");

    engine.update(&mut buffer, 3, 10.0).expect("update succeeds");
    data[3] += 10.0;

    let sum = engine
        .query(&RangedPolynomial::range_sum(0, 5), &data, &buffer)
        .expect("query succeeds");
    assert!((sum - 20.0).abs() < 1e-9, "sum was {}", sum);
}

#[test_case(2, 1, 33 ; "binary linear")]
#[test_case(2, 2, 65 ; "binary cubic")]
#[test_case(3, 2, 55 ; "ternary cubic")]
#[test_case(4, 2, 33 ; "quartic cubic")]
#[test_case(2, 3, 41 ; "binary quintic")]
fn update_matches_rebuild_at_every_position(basis: usize, order: usize, requested: usize) {
    let engine = HierarchicalBuffer::<f64>::new(basis, order).expect("valid parameters");
    let len = buildable_len(&engine, requested);
    let data = wave(len);
    let built = engine.build(&data).expect("build succeeds");

    for position in 0..len {
        let mut updated = built.clone();
        engine
            .update(&mut updated, position, 2.5)
            .expect("update succeeds");

        let mut changed = data.clone();
        changed[position] += 2.5;
        let rebuilt = engine.build(&changed).expect("build succeeds");

        for (slot, (a, b)) in updated.values().iter().zip(rebuilt.values()).enumerate() {
            assert!(
                (a - b).abs() <= 1e-9 * b.abs().max(1.0),
                "position {} slot {}: {} vs {}",
                position,
                slot,
                a,
                b
            );
        }
    }
}

#[test]
fn queries_follow_a_stream_of_updates() {
    let engine = HierarchicalBuffer::<f64>::new(3, 2).expect("valid parameters");
    let len = buildable_len(&engine, 100);
    let mut data = wave(len);
    let mut buffer = engine.build(&data).expect("build succeeds");

    let mut state = 12345u64;
    for step in 0..40 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let position = ((state >> 33) % len as u64) as usize;
        let delta = ((state >> 13) % 1000) as f64 / 100.0 - 5.0;
        engine
            .update(&mut buffer, position, delta)
            .expect("update succeeds");
        data[position] += delta;

        let start = ((state >> 7) % len as u64) as usize;
        let end = start + ((state >> 21) % (len - start + 1) as u64) as usize;
        let f = RangedPolynomial::monomial(step % 4, start, end);
        assert_query_exact(&engine, &f, &data, &buffer);
    }
}

#[test]
fn batch_update_equals_sequential() {
    let engine = HierarchicalBuffer::<f64>::new(2, 2).expect("valid parameters");
    let len = buildable_len(&engine, 65);
    let data = wave(len);
    let mut batched = engine.build(&data).expect("build succeeds");
    let mut sequential = batched.clone();

    let deltas = [(0, 1.0), (17, -3.0), (64, 0.5), (17, 1.0), (33, 2.0)];
    engine
        .update_many(&mut batched, &deltas)
        .expect("update succeeds");
    for &(position, delta) in &deltas {
        engine
            .update(&mut sequential, position, delta)
            .expect("update succeeds");
    }

    for (a, b) in batched.values().iter().zip(sequential.values()) {
        assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
    }
}

#[test]
fn update_outside_array_is_rejected() {
    let engine = HierarchicalBuffer::<f64>::new(2, 1).expect("valid parameters");
    let data = wave(9);
    let mut buffer = engine.build(&data).expect("build succeeds");
    let err = engine.update(&mut buffer, 9, 1.0).unwrap_err();
    assert_eq!(err, OlaError::PositionOutOfRange { position: 9, len: 9 });
}

#[test]
fn update_and_revert_restores_buffer() {
    let engine = HierarchicalBuffer::<f64>::new(4, 2).expect("valid parameters");
    let data = wave(33);
    let original = engine.build(&data).expect("build succeeds");
    let mut buffer = original.clone();
    engine.update(&mut buffer, 13, 7.0).expect("update succeeds");
    engine.update(&mut buffer, 13, -7.0).expect("update succeeds");
    for (a, b) in buffer.values().iter().zip(original.values()) {
        assert!((a - b).abs() < 1e-9);
    }
}
