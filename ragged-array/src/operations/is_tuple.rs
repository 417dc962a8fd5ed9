use crate::Content;

/// Whether `content` holds tuples: looking through list dimensions and wrappers, the first
/// record reached has positional fields. A union holds tuples only when every branch does.
pub fn is_tuple(content: &Content) -> bool {
    content.is_tuple()
}
