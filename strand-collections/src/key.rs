//! Key trait for storage indices.
//!
//! Lists store keys instead of pointers. A reserved sentinel (`NONE`) stands
//! for "no node", which inside a list means "the list header".

/// A copyable key type with a sentinel "none" value.
///
/// Implemented for the unsigned integer types. Custom keys (e.g. strongly
/// typed ids) implement it by picking a value that is never handed out.
///
/// # Example
///
/// ```
/// use strand_collections::Key;
///
/// #[derive(Copy, Clone, PartialEq, Eq)]
/// struct TaskId(u32);
///
/// impl Key for TaskId {
///     const NONE: Self = TaskId(u32::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         TaskId(val as u32)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
///
/// assert!(TaskId::NONE.is_none());
/// assert!(TaskId(7).is_some());
/// ```
pub trait Key: Copy + Eq {
    /// Sentinel value representing "no key".
    const NONE: Self;

    /// Creates a key from a `usize` value.
    fn from_usize(val: usize) -> Self;

    /// Returns the key as a `usize`.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts to `Option`, mapping the sentinel to `None`.
    #[inline]
    fn get(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_key_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                    assert_eq!(<$ty>::NONE.get(), None);
                    assert_eq!((3 as $ty).get(), Some(3));
                }
            )*
        };
    }

    test_key_sentinel!(
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn as_usize() {
        assert_eq!(42u32.as_usize(), 42);
        assert_eq!(u32::from_usize(1000), 1000);
    }
}
