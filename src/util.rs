/// Checks that a numerical value is in the provided interval `[a,b]`, returning early with
/// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if not
///
/// ### Example
/// ```ignore
/// let epsilon = 2.0;
/// check_interval!(epsilon, 0.0, 1.0);
/// ```
/// This returns an error with the message "Invalid value for \`epsilon\`: 2. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::InvalidConfiguration {
                message: format!(
                    "Invalid value for `{}`: {}. Must be in the interval [{}, {}].",
                    stringify!($var),
                    $var,
                    $a,
                    $b,
                ),
            });
        }
    };
}
