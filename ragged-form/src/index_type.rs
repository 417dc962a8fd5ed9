use std::fmt::{Display, Formatter};

use ragged_error::{RaggedResult, ragged_bail};

/// The integer kind of an index buffer (offsets, starts, stops, index, tags, mask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    /// Signed bytes, used for byte masks and union tags
    I8,
    /// Unsigned bytes, used for packed bit masks
    U8,
    /// Signed 32-bit integers
    I32,
    /// Unsigned 32-bit integers
    U32,
    /// Signed 64-bit integers
    I64,
}

impl IndexType {
    /// The kinds accepted for list offsets, starts/stops, dense gathers, and union indices.
    pub const LIST_KINDS: &'static [IndexType] = &[Self::I32, Self::U32, Self::I64];
    /// The kinds accepted for option gathers, where negative entries mark missing values.
    pub const OPTION_KINDS: &'static [IndexType] = &[Self::I32, Self::I64];

    /// Returns the number of bytes of one index entry.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I32 | Self::U32 => 4,
            Self::I64 => 8,
        }
    }

    /// The name used for this kind in serialized forms.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
        }
    }

    /// Fails with a type mismatch unless `self` is one of `allowed`.
    pub fn check(self, what: &str, allowed: &[IndexType]) -> RaggedResult<()> {
        if !allowed.contains(&self) {
            ragged_bail!(
                MismatchedTypes: format!(
                    "{what} of kind {}",
                    allowed.iter().map(IndexType::name).collect::<Vec<_>>().join("|")
                ),
                self
            );
        }
        Ok(())
    }
}

impl Display for IndexType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
