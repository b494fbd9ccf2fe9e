/// Asserts that an [Evaluation](crate::Evaluation) converged, optionally after exactly
/// `expected` relaxation passes.
#[macro_export]
macro_rules! assert_stable {
    ($evaluation:expr) => {
        let evaluation = &$evaluation;
        assert!(
            evaluation.stable,
            "Circuit didn't stabilize after {} passes, oscillating pins: {:?}",
            evaluation.iterations,
            evaluation.unstable
        );
    };
    ($evaluation:expr, $expected:expr) => {
        let evaluation = &$evaluation;
        $crate::assert_stable!(evaluation);
        assert!(
            evaluation.iterations == $expected,
            "Circuit stabilized after {} passes, expected: {}",
            evaluation.iterations,
            $expected
        );
    };
}

/// Asserts that an [Evaluation](crate::Evaluation) did not converge and, optionally, that
/// every given pin key is reported as oscillating.
#[macro_export]
macro_rules! assert_oscillates {
    ($evaluation:expr) => {
        let evaluation = &$evaluation;
        assert!(
            !evaluation.stable,
            "Circuit stabilized after {} passes, expected it to oscillate",
            evaluation.iterations
        );
    };
    ($evaluation:expr, $($key:expr),+) => {
        let evaluation = &$evaluation;
        $crate::assert_oscillates!(evaluation);
        $(
            let key = &$key;
            assert!(
                evaluation.unstable.contains(key),
                "{} is not oscillating, oscillating pins: {:?}",
                key,
                evaluation.unstable
            );
        )+
    };
}
