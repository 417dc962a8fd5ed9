use ragged_error::{RaggedResult, ragged_bail};
use ragged_form::{IndexType, Parameters};

use crate::{Content, Index};

/// A tagged union: element `i` is `contents[tags[i]][index[i]]`.
#[derive(Debug, Clone)]
pub struct UnionArray {
    tags: Index,
    index: Index,
    contents: Vec<Content>,
    parameters: Parameters,
}

impl UnionArray {
    /// A union of at most 127 branches, selected per element by `tags` and addressed within
    /// the branch by `index`.
    pub fn try_new(tags: Index, index: Index, contents: Vec<Content>) -> RaggedResult<Self> {
        tags.index_type()
            .check("UnionArray tags", &[IndexType::I8])?;
        index
            .index_type()
            .check("UnionArray index", IndexType::LIST_KINDS)?;
        if contents.is_empty() || contents.len() > 127 {
            ragged_bail!(
                "UnionArray needs between 1 and 127 contents, found {}",
                contents.len()
            );
        }
        if tags.len() != index.len() {
            ragged_bail!(
                "UnionArray has {} tags but {} index entries",
                tags.len(),
                index.len()
            );
        }
        for (i, (tag, position)) in tags.iter().zip(index.iter()).enumerate() {
            let Some(branch) = usize::try_from(tag).ok().and_then(|t| contents.get(t)) else {
                ragged_bail!("UnionArray tag {i} is {tag}, not one of {} contents", contents.len());
            };
            if !usize::try_from(position).is_ok_and(|p| p < branch.len()) {
                ragged_bail!(
                    "UnionArray index {i} is {position}, outside content {tag} of length {}",
                    branch.len()
                );
            }
        }
        Ok(Self {
            tags,
            index,
            contents,
            parameters: Parameters::default(),
        })
    }

    /// The branch of each element.
    pub fn tags(&self) -> &Index {
        &self.tags
    }

    /// The position of each element within its branch.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The branches.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The positions, within branch `tag`, of the elements that select it, in order.
    pub fn branch_positions(&self, tag: usize) -> Vec<i64> {
        let tag = i64::try_from(tag).unwrap_or(i64::MAX);
        self.tags
            .iter()
            .zip(self.index.iter())
            .filter(|(t, _)| *t == tag)
            .map(|(_, position)| position)
            .collect()
    }
}

impl_content_common!(UnionArray, Union);
