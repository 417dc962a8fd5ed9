use ragged_error::RaggedResult;

use crate::backend::{Backend, Device};
use crate::{Action, ApplyOptions, Content, Index, NumpyArray, recursively_apply_with_indexes};

/// Copy every buffer of `content` to `device`, keeping the node structure.
pub fn to_device(content: &Content, device: Device, backend: &dyn Backend) -> RaggedResult<Content> {
    log::debug!("moving {} bytes to {device}", content.nbytes());
    let index = |index: &Index| {
        Index::from_byte_buffer(
            index.index_type(),
            backend.to_device(&index.to_byte_buffer(), device)?,
        )
    };
    recursively_apply_with_indexes(
        content,
        &(),
        &ApplyOptions::default(),
        &mut |node, _, _| match node {
            Content::Numpy(leaf) => {
                let moved = NumpyArray::try_new(
                    backend.to_device(leaf.data(), device)?,
                    leaf.ptype(),
                    leaf.shape().to_vec(),
                )?;
                Ok(Action::Replace(
                    Content::from(moved).with_parameters(leaf.parameters().clone()),
                ))
            }
            _ => Ok(Action::Continue),
        },
        &index,
    )
}
