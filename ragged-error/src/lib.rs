#![deny(missing_docs)]

//! Error handling for the ragged array crates.
//!
//! Every fallible operation returns a [`RaggedResult`]. Errors are constructed through the
//! [`ragged_err!`] and [`ragged_bail!`] macros, which capture a backtrace at the point of
//! construction.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::{env, fmt};

/// A string that may be borrowed from static storage or owned.
///
/// Constructing an [`ErrString`] panics instead when `RAGGED_PANIC_ON_ERR=1` is set, which is
/// useful for locating where an error first arises.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    #[allow(clippy::panic)]
    fn from(msg: T) -> Self {
        if env::var("RAGGED_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}\nBacktrace:\n{}", msg.into(), Backtrace::capture());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

// Alias so `thiserror` does not treat these fields as backtrace sources, which would emit a
// nightly-only `Error::provide` impl.
type CapturedBacktrace = Backtrace;

/// The top-level error type for ragged arrays and forms.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum RaggedError {
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, CapturedBacktrace),
    /// The requested axis does not exist, or cannot be resolved unambiguously.
    #[error("{0}\nBacktrace:\n{1}")]
    AxisError(ErrString, CapturedBacktrace),
    /// A constructor or function was handed malformed arguments.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, CapturedBacktrace),
    /// A structural transformation was requested that cannot be performed.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidTransform(ErrString, CapturedBacktrace),
    /// A form or buffer map is inconsistent with the layout it claims to describe.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidSerde(ErrString, CapturedBacktrace),
    /// A capability is not implemented by the named component.
    #[error("function {0} not implemented for {1}\nBacktrace:\n{2}")]
    NotImplemented(ErrString, ErrString, CapturedBacktrace),
    /// A type did not match the expected type.
    #[error("expected type: {0} but instead got {1}\nBacktrace:\n{2}")]
    MismatchedTypes(ErrString, ErrString, CapturedBacktrace),
    /// Wraps an inner error with additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<RaggedError>),
    /// A wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    /// A wrapper for integer conversion errors.
    #[error(transparent)]
    TryFromIntError(#[from] std::num::TryFromIntError),
}

impl RaggedError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        RaggedError::Context(msg.into(), Box::new(self))
    }

    /// Returns true if this error (or the error it wraps) is an [`RaggedError::AxisError`].
    pub fn is_axis_error(&self) -> bool {
        match self {
            RaggedError::AxisError(..) => true,
            RaggedError::Context(_, inner) => inner.is_axis_error(),
            _ => false,
        }
    }
}

impl Debug for RaggedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return [`RaggedError`]s as their error type.
pub type RaggedResult<T> = Result<T, RaggedError>;

/// A trait for unwrapping a value, panicking with a [`RaggedError`] on failure.
pub trait RaggedUnwrap {
    /// The type of the value being unwrapped.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug.
    fn ragged_unwrap(self) -> Self::Output;
}

impl<T, E> RaggedUnwrap for Result<T, E>
where
    E: Into<RaggedError>,
{
    type Output = T;

    #[inline(always)]
    fn ragged_unwrap(self) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|err| crate::ragged_panic!(err))
    }
}

/// A trait for expecting a value, panicking with a [`RaggedError`] and a message on failure.
pub trait RaggedExpect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error and the
    /// given message. Should be called only where the failure represents a bug.
    fn ragged_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> RaggedExpect for Result<T, E>
where
    E: Into<RaggedError>,
{
    type Output = T;

    #[inline(always)]
    fn ragged_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| crate::ragged_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> RaggedExpect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn ragged_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = RaggedError::InvalidArgument(msg.to_string().into(), Backtrace::capture());
            crate::ragged_panic!(err)
        })
    }
}

/// A convenient macro for creating a [`RaggedError`].
#[macro_export]
macro_rules! ragged_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::RaggedError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
    }};
    (NotImplemented: $func:expr, $by_whom:expr) => {{
        use std::backtrace::Backtrace;
        $crate::RaggedError::NotImplemented($func.into(), format!("{}", $by_whom).into(), Backtrace::capture())
    }};
    (MismatchedTypes: $expected:literal, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::RaggedError::MismatchedTypes($expected.into(), $actual.to_string().into(), Backtrace::capture())
    }};
    (MismatchedTypes: $expected:expr, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::RaggedError::MismatchedTypes($expected.to_string().into(), $actual.to_string().into(), Backtrace::capture())
    }};
    (Context: $msg:literal, $err:expr) => {{
        $crate::RaggedError::Context($msg.into(), Box::new($err))
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::RaggedError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ragged_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a [`RaggedError`] from the current function.
#[macro_export]
macro_rules! ragged_bail {
    ($($tt:tt)+) => {
        return Err($crate::ragged_err!($($tt)+))
    };
}

/// A convenient macro for panicking with a [`RaggedError`] in the presence of a programmer error
/// (e.g., an invariant has been violated).
#[macro_export]
macro_rules! ragged_panic {
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ragged_panic!($crate::ragged_err!($variant: $fmt, $($arg),*))
    };
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err: $crate::RaggedError = $err;
        panic!("{}", err.with_context(format!($fmt, $($arg),*)))
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ragged_panic!($crate::ragged_err!($fmt, $($arg),*))
    };
    ($err:expr) => {{
        let err: $crate::RaggedError = $err;
        panic!("{}", err)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bails(axis: i64) -> RaggedResult<usize> {
        if axis < 0 {
            ragged_bail!(AxisError: "axis={axis} exceeds the depth of this array");
        }
        Ok(usize::try_from(axis).map_err(|e| ragged_err!("{e}"))?)
    }

    #[test]
    fn bail_produces_variant() {
        let err = bails(-3).unwrap_err();
        assert!(err.is_axis_error());
        assert!(err.to_string().starts_with("axis=-3 exceeds the depth"));
        assert_eq!(bails(2).unwrap(), 2);
    }

    #[test]
    fn context_preserves_kind() {
        let err = ragged_err!(AxisError: "no axis 4").with_context("from_regular");
        assert!(err.is_axis_error());
        assert!(err.to_string().starts_with("from_regular: no axis 4"));
    }

    #[test]
    fn default_variant_is_invalid_argument() {
        let err = ragged_err!("bad offsets {}", 3);
        assert!(matches!(err, RaggedError::InvalidArgument(..)));
    }

    #[test]
    fn out_of_bounds_message() {
        let err = ragged_err!(OutOfBounds: 10, 0, 5);
        assert!(err.to_string().starts_with("index 10 out of bounds from 0 to 5"));
    }

    #[test]
    #[should_panic]
    fn expect_none_panics() {
        let value: Option<usize> = None;
        value.ragged_expect("missing");
    }
}
