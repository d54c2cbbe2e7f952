#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// Relative error `|approx - exact| / |exact|`, falling back to the absolute error when `exact` is zero.
pub fn relative_error(approx: f64, exact: f64) -> f64 {
    let abs_error = (approx - exact).abs();
    if exact == 0.0 {
        abs_error
    } else {
        abs_error / exact.abs()
    }
}
