//! Logging macros shared by every crate in the workspace.
//!
//! The backend is picked by the features of the crate that *invokes* the
//! macro (`cfg` attributes inside a `macro_rules!` body are evaluated at the
//! expansion site):
//!
//! | Feature   | Backend                         | Target                |
//! |-----------|---------------------------------|-----------------------|
//! | `defmt`   | `defmt` over RTT                | STM32F407 hardware    |
//! | `tracing` | `tracing` + `tracing-subscriber` | desktop emulator     |
//! | neither   | discarded (arguments still evaluated by reference) | host unit tests |
//!
//! A crate using these macros must therefore declare both features and the
//! matching optional dependencies.
//!
//! Format strings must stick to plain `{}` placeholders with primitive or
//! `&str` arguments so they are valid for both `defmt` and `core::fmt`.

/// Log at trace level.
#[macro_export]
macro_rules! log_trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::trace!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

/// Log at debug level.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::debug!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

/// Log at info level.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($fmt $(, $arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::info!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

/// Log at warn level.
#[macro_export]
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::warn!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

/// Log at error level.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($fmt $(, $arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        ::tracing::error!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}
