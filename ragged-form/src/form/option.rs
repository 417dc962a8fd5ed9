use ragged_error::RaggedResult;

use crate::{Form, IndexType, Parameters};

/// The form of a dense gather over its content.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IndexedForm {
    pub(crate) index: IndexType,
    pub(crate) content: Box<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl IndexedForm {
    /// A gather over `content` with an index of kind `index`.
    pub fn try_new(index: IndexType, content: Form) -> RaggedResult<Self> {
        let form = Self {
            index,
            content: Box::new(content),
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the index buffer.
    pub fn index(&self) -> IndexType {
        self.index
    }

    /// The form being gathered from.
    pub fn content(&self) -> &Form {
        &self.content
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.index.check("IndexedArray index", IndexType::LIST_KINDS)
    }
}

impl_form_common!(IndexedForm);

impl PartialEq for IndexedForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.index == other.index
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}

/// The form of a gather whose negative entries are missing values.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IndexedOptionForm {
    pub(crate) index: IndexType,
    pub(crate) content: Box<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl IndexedOptionForm {
    /// An optional gather over `content` with a signed index of kind `index`.
    pub fn try_new(index: IndexType, content: Form) -> RaggedResult<Self> {
        let form = Self {
            index,
            content: Box::new(content),
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the index buffer.
    pub fn index(&self) -> IndexType {
        self.index
    }

    /// The form being gathered from.
    pub fn content(&self) -> &Form {
        &self.content
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.index
            .check("IndexedOptionArray index", IndexType::OPTION_KINDS)
    }
}

impl_form_common!(IndexedOptionForm);

impl PartialEq for IndexedOptionForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.index == other.index
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}

/// The form of missing values marked by one byte per element.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ByteMaskedForm {
    pub(crate) mask: IndexType,
    pub(crate) content: Box<Form>,
    pub(crate) valid_when: bool,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl ByteMaskedForm {
    /// Byte-masked `content`; an element is valid when its mask byte is `valid_when`.
    pub fn try_new(mask: IndexType, content: Form, valid_when: bool) -> RaggedResult<Self> {
        let form = Self {
            mask,
            content: Box::new(content),
            valid_when,
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the mask buffer.
    pub fn mask(&self) -> IndexType {
        self.mask
    }

    /// The masked form.
    pub fn content(&self) -> &Form {
        &self.content
    }

    /// The mask value that marks an element as valid.
    pub fn valid_when(&self) -> bool {
        self.valid_when
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.mask.check("ByteMaskedArray mask", &[IndexType::I8])
    }
}

impl_form_common!(ByteMaskedForm);

impl PartialEq for ByteMaskedForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.mask == other.mask
            && self.valid_when == other.valid_when
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}

/// The form of missing values marked by one packed bit per element.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BitMaskedForm {
    pub(crate) mask: IndexType,
    pub(crate) content: Box<Form>,
    pub(crate) valid_when: bool,
    pub(crate) lsb_order: bool,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl BitMaskedForm {
    /// Bit-masked `content`; bits are read least-significant first when `lsb_order`.
    pub fn try_new(
        mask: IndexType,
        content: Form,
        valid_when: bool,
        lsb_order: bool,
    ) -> RaggedResult<Self> {
        let form = Self {
            mask,
            content: Box::new(content),
            valid_when,
            lsb_order,
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The kind of the mask buffer.
    pub fn mask(&self) -> IndexType {
        self.mask
    }

    /// The masked form.
    pub fn content(&self) -> &Form {
        &self.content
    }

    /// The bit value that marks an element as valid.
    pub fn valid_when(&self) -> bool {
        self.valid_when
    }

    /// Whether bits are numbered from the least significant bit of each byte.
    pub fn lsb_order(&self) -> bool {
        self.lsb_order
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.mask.check("BitMaskedArray mask", &[IndexType::U8])
    }
}

impl_form_common!(BitMaskedForm);

impl PartialEq for BitMaskedForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.mask == other.mask
            && self.valid_when == other.valid_when
            && self.lsb_order == other.lsb_order
            && self.parameters.array_record_eq(&other.parameters)
            && self.content == other.content
    }
}
