use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// The alignment of a buffer, always a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alignment(usize);

impl Alignment {
    /// Create a new alignment.
    ///
    /// ## Panics
    ///
    /// Panics if `align` is not a power of two.
    #[inline]
    pub const fn new(align: usize) -> Self {
        assert!(align > 0, "Alignment must be greater than 0");
        assert!(align.is_power_of_two(), "Alignment must be a power of 2");
        Self(align)
    }

    /// An alignment of one byte, i.e. no alignment requirement.
    #[inline]
    pub const fn none() -> Self {
        Self::new(1)
    }

    /// The alignment required by values of type `T`.
    #[inline]
    pub const fn of<T>() -> Self {
        Self::new(align_of::<T>())
    }

    /// Check whether this alignment also satisfies `other`.
    ///
    /// For example, an alignment of 8 is aligned to 4, but an alignment of 4 is not aligned to 8.
    #[inline]
    pub fn is_aligned_to(&self, other: Alignment) -> bool {
        self.0 % other.0 == 0
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Alignment {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Alignment> for usize {
    fn from(value: Alignment) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alignment_of() {
        assert_eq!(*Alignment::of::<u8>(), 1);
        assert_eq!(*Alignment::of::<i32>(), 4);
        assert_eq!(*Alignment::of::<i64>(), 8);
    }

    #[test]
    fn aligned_to() {
        assert!(Alignment::new(8).is_aligned_to(Alignment::new(4)));
        assert!(!Alignment::new(4).is_aligned_to(Alignment::new(8)));
        assert!(Alignment::none().is_aligned_to(Alignment::none()));
    }

    #[test]
    #[should_panic]
    fn not_power_of_two() {
        Alignment::new(3);
    }
}
