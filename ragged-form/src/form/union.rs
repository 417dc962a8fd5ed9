use ragged_error::{RaggedResult, ragged_bail};

use crate::{Form, IndexType, Parameters};

/// The form of a tagged union: `tags` selects the branch, `index` the position within it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UnionForm {
    pub(crate) tags: IndexType,
    pub(crate) index: IndexType,
    pub(crate) contents: Vec<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl UnionForm {
    /// A union over `contents`, which must not be empty.
    pub fn try_new(tags: IndexType, index: IndexType, contents: Vec<Form>) -> RaggedResult<Self> {
        let form = Self {
            tags,
            index,
            contents,
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the tags buffer.
    pub fn tags(&self) -> IndexType {
        self.tags
    }

    /// The kind of the index buffer.
    pub fn index(&self) -> IndexType {
        self.index
    }

    /// The branch forms.
    pub fn contents(&self) -> &[Form] {
        &self.contents
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.tags.check("UnionArray tags", &[IndexType::I8])?;
        self.index.check("UnionArray index", IndexType::LIST_KINDS)?;
        if self.contents.is_empty() {
            ragged_bail!("UnionArray must have at least one branch");
        }
        if self.contents.len() > i8::MAX as usize {
            ragged_bail!(
                "UnionArray has {} branches, more than its tags can select",
                self.contents.len()
            );
        }
        Ok(())
    }
}

impl_form_common!(UnionForm);

impl PartialEq for UnionForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.tags == other.tags
            && self.index == other.index
            && self.parameters.array_record_eq(&other.parameters)
            && self.contents == other.contents
    }
}
