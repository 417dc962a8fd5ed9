//! Physical type definitions and behavior.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use num_traits::{FromPrimitive, NumCast, ToPrimitive};
use ragged_error::{RaggedError, RaggedResult, ragged_err};
use serde_json::Value;

/// The scalar kind stored in the leaf buffer of a `NumpyArray`.
///
/// Booleans are stored as one byte per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PType {
    /// A boolean, stored as one byte per value
    Bool,
    /// An 8-bit signed integer
    Int8,
    /// An 8-bit unsigned integer
    UInt8,
    /// A 16-bit signed integer
    Int16,
    /// A 16-bit unsigned integer
    UInt16,
    /// A 32-bit signed integer
    Int32,
    /// A 32-bit unsigned integer
    UInt32,
    /// A 64-bit signed integer
    Int64,
    /// A 64-bit unsigned integer
    UInt64,
    /// A 32-bit floating point number
    Float32,
    /// A 64-bit floating point number
    Float64,
}

/// A trait for native Rust types that correspond 1:1 to a numeric [`PType`].
pub trait NativePType:
    Send
    + Sync
    + Clone
    + Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + PartialOrd
    + NumCast
    + FromPrimitive
    + ToPrimitive
    + 'static
{
    /// The PType that corresponds to this native type
    const PTYPE: PType;

    /// Render the value as a JSON scalar.
    fn json_value(self) -> Value;
}

macro_rules! native_ptype {
    ($T:ty, $ptype:tt) => {
        impl NativePType for $T {
            const PTYPE: PType = PType::$ptype;

            fn json_value(self) -> Value {
                Value::from(self)
            }
        }
    };
}

native_ptype!(i8, Int8);
native_ptype!(u8, UInt8);
native_ptype!(i16, Int16);
native_ptype!(u16, UInt16);
native_ptype!(i32, Int32);
native_ptype!(u32, UInt32);
native_ptype!(i64, Int64);
native_ptype!(u64, UInt64);
native_ptype!(f32, Float32);
native_ptype!(f64, Float64);

/// Macro to match over each numeric PType, binding the corresponding native type.
///
/// `Bool` binds `u8`, its storage type.
#[macro_export]
macro_rules! match_each_native_ptype {
    ($self:expr, | $_:tt $enc:ident | $($body:tt)*) => ({
        macro_rules! __with__ {( $_ $enc:ident ) => ( $($body)* )}
        use $crate::PType;
        match $self {
            PType::Bool => __with__! { u8 },
            PType::Int8 => __with__! { i8 },
            PType::UInt8 => __with__! { u8 },
            PType::Int16 => __with__! { i16 },
            PType::UInt16 => __with__! { u16 },
            PType::Int32 => __with__! { i32 },
            PType::UInt32 => __with__! { u32 },
            PType::Int64 => __with__! { i64 },
            PType::UInt64 => __with__! { u64 },
            PType::Float32 => __with__! { f32 },
            PType::Float64 => __with__! { f64 },
        }
    })
}

impl PType {
    /// Returns the number of bytes of one value of this PType.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns `true` iff this PType is an integer type, signed or unsigned.
    pub const fn is_int(self) -> bool {
        self.is_unsigned_int() || self.is_signed_int()
    }

    /// Returns `true` iff this PType is an unsigned integer type.
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns `true` iff this PType is a signed integer type.
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns `true` iff this PType is a floating point type.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// The name used for this PType in serialized forms and type strings.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Decode the value at position `idx` of a little-endian byte slice as JSON.
    pub fn json_value_at(&self, bytes: &[u8], idx: usize) -> RaggedResult<Value> {
        let width = self.byte_width();
        let raw = bytes
            .get(idx * width..(idx + 1) * width)
            .ok_or_else(|| ragged_err!(OutOfBounds: idx, 0, bytes.len() / width))?;
        if *self == PType::Bool {
            return Ok(Value::Bool(raw[0] != 0));
        }
        Ok(match_each_native_ptype!(self, |$T| {
            let mut le = [0u8; size_of::<$T>()];
            le.copy_from_slice(raw);
            <$T>::from_le_bytes(le).json_value()
        }))
    }
}

impl Display for PType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PType {
    type Err = RaggedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            _ => return Err(ragged_err!(InvalidSerde: "unknown primitive {s}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(PType::Bool, 1)]
    #[case(PType::UInt16, 2)]
    #[case(PType::Float32, 4)]
    #[case(PType::Int64, 8)]
    fn widths(#[case] ptype: PType, #[case] width: usize) {
        assert_eq!(ptype.byte_width(), width);
    }

    #[test]
    fn serde_names_match_display() {
        for ptype in [PType::Bool, PType::UInt8, PType::Int32, PType::Float64] {
            let json = serde_json::to_value(ptype).unwrap();
            assert_eq!(json, Value::String(ptype.to_string()));
            assert_eq!(ptype.to_string().parse::<PType>().unwrap(), ptype);
        }
    }

    #[test]
    fn decode_values() {
        let bytes = [(-7i32).to_le_bytes(), 9i32.to_le_bytes()].concat();
        assert_eq!(PType::Int32.json_value_at(&bytes, 1).unwrap(), Value::from(9));
        assert_eq!(PType::Int32.json_value_at(&bytes, 0).unwrap(), Value::from(-7));
        assert!(PType::Int32.json_value_at(&bytes, 2).is_err());
        assert_eq!(PType::Bool.json_value_at(&[0, 1], 1).unwrap(), Value::Bool(true));
    }
}
