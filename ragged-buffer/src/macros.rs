/// Builds a [`Buffer`](crate::Buffer) from listed values, or from `n` copies of one value.
///
/// ```
/// use ragged_buffer::buffer;
///
/// assert_eq!(buffer![1i32, 2, 3].as_slice(), &[1, 2, 3]);
/// assert_eq!(buffer![0u8; 4].len(), 4);
/// ```
#[macro_export]
macro_rules! buffer {
    ($value:expr; $n:expr) => {
        $crate::Buffer::from_iter(::std::iter::repeat_n($value, $n))
    };
    ($($value:expr),* $(,)?) => {
        $crate::Buffer::from_iter([$($value),*])
    };
}
