// defmt needs the RTT logger that only exists on the target, so host builds
// compile these away.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        defmt::info!($($arg)*);
    }};
}

// `warn` would clash with the builtin lint attribute
macro_rules! warning {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        defmt::warn!($($arg)*);
    }};
}

pub(crate) use {debug, info, warning};
