use std::fmt::{Debug, Formatter};

const PREVIEW_LEN: usize = 16;

/// Formats at most the first few items of a slice, marking the rest as elided.
pub(crate) struct Preview<'a, T>(pub(crate) &'a [T]);

impl<T: Debug> Debug for Preview<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        list.entries(self.0.iter().take(PREVIEW_LEN));
        if self.0.len() > PREVIEW_LEN {
            list.finish_non_exhaustive()
        } else {
            list.finish()
        }
    }
}
