//! A generic depth-first walk that rebuilds a layout through a caller-supplied function.
//!
//! At every node the function sees the node, its depth and the current user state, and picks
//! an [`Action`]. The root sits at depth 1. List and regular nodes hand `depth + 1` to their
//! content; indexed, option, masked, union and record nodes are transparent and hand on the
//! same depth.

use ragged_error::RaggedResult;
use ragged_form::Parameters;

use crate::{
    BitMaskedArray, ByteMaskedArray, Content, Index, IndexedArray, IndexedOptionArray, ListArray,
    ListOffsetArray, RecordArray, RegularArray, UnionArray,
};

/// Options for [`recursively_apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Offer rank-N leaves to the function as nested [`RegularArray`]s.
    pub numpy_to_regular: bool,
    /// Carry each node's parameters over to its rebuilt counterpart.
    pub keep_parameters: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            numpy_to_regular: false,
            keep_parameters: true,
        }
    }
}

/// What the traversal does with the node it just offered to the function.
#[derive(Debug, Clone)]
pub enum Action<U> {
    /// Use this subtree in place of the node and stop descending.
    Replace(Content),
    /// Descend into the children with the same user state and rebuild the node from them.
    Continue,
    /// Descend into the children with new user state and rebuild the node from them.
    Descend(U),
}

/// Rebuild `content` by offering each node, outermost first, to `f`.
///
/// Errors returned by `f` abort the whole walk and are returned unchanged.
pub fn recursively_apply<U, F>(
    content: &Content,
    user: &U,
    options: &ApplyOptions,
    f: &mut F,
) -> RaggedResult<Content>
where
    F: FnMut(&Content, usize, &U) -> RaggedResult<Action<U>>,
{
    apply(content, 1, user, options, f, &|index: &Index| Ok(index.clone()))
}

/// Like [`recursively_apply`], but every integer buffer of a rebuilt node is replaced by
/// `index` applied to it.
pub fn recursively_apply_with_indexes<U, F>(
    content: &Content,
    user: &U,
    options: &ApplyOptions,
    f: &mut F,
    index: &dyn Fn(&Index) -> RaggedResult<Index>,
) -> RaggedResult<Content>
where
    F: FnMut(&Content, usize, &U) -> RaggedResult<Action<U>>,
{
    apply(content, 1, user, options, f, index)
}

fn apply<U, F>(
    content: &Content,
    depth: usize,
    user: &U,
    options: &ApplyOptions,
    f: &mut F,
    index: &dyn Fn(&Index) -> RaggedResult<Index>,
) -> RaggedResult<Content>
where
    F: FnMut(&Content, usize, &U) -> RaggedResult<Action<U>>,
{
    log::trace!("offering {} at depth {depth}", content.class_name());
    let promoted = match content {
        Content::Numpy(leaf) if options.numpy_to_regular && leaf.shape().len() > 1 => {
            Some(leaf.to_regular_array()?)
        }
        _ => None,
    };
    let content = promoted.as_ref().unwrap_or(content);

    match f(content, depth, user)? {
        Action::Replace(replacement) => Ok(replacement),
        Action::Continue => rebuild(content, depth, user, options, f, index),
        Action::Descend(next) => rebuild(content, depth, &next, options, f, index),
    }
}

fn rebuild<U, F>(
    content: &Content,
    depth: usize,
    user: &U,
    options: &ApplyOptions,
    f: &mut F,
    index: &dyn Fn(&Index) -> RaggedResult<Index>,
) -> RaggedResult<Content>
where
    F: FnMut(&Content, usize, &U) -> RaggedResult<Action<U>>,
{
    let mut child = |c: &Content, depth: usize| apply(c, depth, user, options, f, index);

    let rebuilt: Content = match content {
        Content::Numpy(c) => c.clone().into(),
        Content::Regular(c) => {
            RegularArray::try_with_length(child(c.content(), depth + 1)?, c.size(), c.len())?.into()
        }
        Content::ListOffset(c) => {
            ListOffsetArray::try_new(index(c.offsets())?, child(c.content(), depth + 1)?)?.into()
        }
        Content::List(c) => ListArray::try_new(
            index(c.starts())?,
            index(c.stops())?,
            child(c.content(), depth + 1)?,
        )?
        .into(),
        Content::Indexed(c) => {
            IndexedArray::try_new(index(c.index())?, child(c.content(), depth)?)?.into()
        }
        Content::IndexedOption(c) => {
            IndexedOptionArray::try_new(index(c.index())?, child(c.content(), depth)?)?.into()
        }
        Content::ByteMasked(c) => ByteMaskedArray::try_new(
            index(c.mask())?,
            child(c.content(), depth)?,
            c.valid_when(),
        )?
        .into(),
        Content::BitMasked(c) => BitMaskedArray::try_new(
            index(c.mask())?,
            child(c.content(), depth)?,
            c.valid_when(),
            c.len(),
            c.lsb_order(),
        )?
        .into(),
        Content::Union(c) => UnionArray::try_new(
            index(c.tags())?,
            index(c.index())?,
            c.contents()
                .iter()
                .map(|branch| child(branch, depth))
                .collect::<RaggedResult<Vec<_>>>()?,
        )?
        .into(),
        Content::Record(c) => RecordArray::try_new(
            c.contents()
                .iter()
                .map(|field| child(field, depth))
                .collect::<RaggedResult<Vec<_>>>()?,
            c.field_names().map(<[String]>::to_vec),
            Some(c.len()),
        )?
        .into(),
    };

    let parameters = if options.keep_parameters {
        content.parameters().clone()
    } else {
        Parameters::default()
    };
    Ok(rebuilt.with_parameters(parameters))
}
