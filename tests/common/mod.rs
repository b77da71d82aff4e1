#![allow(dead_code)]

use ola::{direct_product, DataSource, HierarchicalBuffer, RangedFunction};

/// Deterministic, sign-changing test signal in roughly [-2, 2].
pub fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            (x * 0.731).sin() + 0.5 * (x * 0.173 + 1.0).cos() + ((i * 37) % 11) as f64 / 11.0
        })
        .collect()
}

/// Smallest admissible length at least `requested` that also builds.
pub fn buildable_len(engine: &HierarchicalBuffer<f64>, requested: usize) -> usize {
    engine.recommended_padded_length(requested.max(engine.min_buildable_len()))
}

/// Σ |f(x)·data[x]| over the support, for scaling tolerances.
pub fn magnitude<F, S>(f: &F, data: &S) -> f64
where
    F: RangedFunction<f64> + ?Sized,
    S: DataSource<f64> + ?Sized,
{
    (f.start()..f.end().min(data.len()))
        .map(|x| (f.eval(x) * data.value(x)).abs())
        .sum()
}

/// Query through the buffer and compare with the direct scan.
pub fn assert_query_exact<F, S>(
    engine: &HierarchicalBuffer<f64>,
    f: &F,
    data: &S,
    buffer: &ola::AggregateBuffer<f64>,
) where
    F: RangedFunction<f64> + ?Sized,
    S: DataSource<f64> + ?Sized,
{
    let got = engine.query(f, data, buffer).expect("query succeeds");
    let want = direct_product(f, data);
    let tolerance = 1e-9 * magnitude(f, data).max(1.0);
    assert!(
        (got - want).abs() <= tolerance,
        "b={} N={} n={} range=[{}, {}) degree={}: buffer {} vs direct {}",
        engine.basis(),
        engine.order(),
        data.len(),
        f.start(),
        f.end(),
        f.degree(),
        got,
        want
    );
}
