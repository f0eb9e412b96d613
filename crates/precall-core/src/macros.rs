/// Return early with a configuration error
#[macro_export]
macro_rules! config_bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Config(format!($($arg)*)))
    };
}

/// Ensure a configuration invariant holds, or return a configuration error
#[macro_export]
macro_rules! config_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::config_bail!($($arg)*);
        }
    };
}
