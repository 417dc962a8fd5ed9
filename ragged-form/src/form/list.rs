use ragged_error::{RaggedResult, ragged_bail};

use crate::{Form, IndexType, Parameters};

/// The form of lists that all have length `size`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegularForm {
    pub(crate) size: usize,
    pub(crate) content: Box<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl RegularForm {
    /// Lists of `size` elements of `content`.
    pub fn new(content: Form, size: usize) -> Self {
        Self {
            size,
            content: Box::new(content),
            parameters: Parameters::default(),
            form_key: None,
        }
    }

    /// The fixed list length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The form of the list elements.
    pub fn content(&self) -> &Form {
        &self.content
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        Ok(())
    }
}

impl_form_common!(RegularForm);

impl PartialEq for RegularForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.size == other.size
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}

/// The form of variable-length lists described by `length + 1` monotonic offsets.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListOffsetForm {
    pub(crate) offsets: IndexType,
    pub(crate) content: Box<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl ListOffsetForm {
    /// Variable-length lists of `content` with offsets of kind `offsets`.
    pub fn try_new(offsets: IndexType, content: Form) -> RaggedResult<Self> {
        let form = Self {
            offsets,
            content: Box::new(content),
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the offsets buffer.
    pub fn offsets(&self) -> IndexType {
        self.offsets
    }

    /// The form of the list elements.
    pub fn content(&self) -> &Form {
        &self.content
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.offsets
            .check("ListOffsetArray offsets", IndexType::LIST_KINDS)
    }
}

impl_form_common!(ListOffsetForm);

impl PartialEq for ListOffsetForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.offsets == other.offsets
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}

/// The form of variable-length lists described by parallel starts and stops.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListForm {
    pub(crate) starts: IndexType,
    pub(crate) stops: IndexType,
    pub(crate) content: Box<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl ListForm {
    /// Variable-length lists of `content` with starts and stops of the given kinds.
    pub fn try_new(starts: IndexType, stops: IndexType, content: Form) -> RaggedResult<Self> {
        let form = Self {
            starts,
            stops,
            content: Box::new(content),
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the starts buffer.
    pub fn starts(&self) -> IndexType {
        self.starts
    }

    /// The kind of the stops buffer.
    pub fn stops(&self) -> IndexType {
        self.stops
    }

    /// The form of the list elements.
    pub fn content(&self) -> &Form {
        &self.content
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.starts
            .check("ListArray starts", IndexType::LIST_KINDS)?;
        if self.starts != self.stops {
            ragged_bail!(MismatchedTypes: self.starts, self.stops);
        }
        Ok(())
    }
}

impl_form_common!(ListForm);

impl PartialEq for ListForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.starts == other.starts
            && self.stops == other.stops
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}
