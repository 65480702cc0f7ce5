/// Asserts that two `Arc`s point to the same allocation.
#[macro_export]
macro_rules! assert_same {
    ($lhs:expr, $rhs:expr $(,)?) => {{
        let lhs = &$lhs;
        let rhs = &$rhs;
        assert!(
            std::sync::Arc::ptr_eq(lhs, rhs),
            "expected `{}` and `{}` to be the same instance",
            stringify!($lhs),
            stringify!($rhs),
        );
    }};
}
