use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail};

use crate::{Form, Parameters};

/// The form of a record (named fields) or a tuple (`fields` is `None`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecordForm {
    pub(crate) fields: Option<Vec<String>>,
    pub(crate) contents: Vec<Form>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl RecordForm {
    /// A record over `contents`, named by `fields`, or a tuple when `fields` is `None`.
    pub fn try_new(contents: Vec<Form>, fields: Option<Vec<String>>) -> RaggedResult<Self> {
        let form = Self {
            fields,
            contents,
            parameters: Parameters::default(),
            form_key: None,
        };
        form.check()?;
        Ok(form)
    }

    /// The field forms, in field order.
    pub fn contents(&self) -> &[Form] {
        &self.contents
    }

    /// The declared field names, or `None` for a tuple.
    pub fn field_names(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Whether the fields are positional.
    pub fn is_tuple(&self) -> bool {
        self.fields.is_none()
    }

    /// The field names, numbering tuple fields `"0"`, `"1"`, ...
    pub fn fields(&self) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields.clone(),
            None => (0..self.contents.len()).map(|i| i.to_string()).collect(),
        }
    }

    /// The position of the field called `field`; tuple fields are addressed by number.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        match &self.fields {
            Some(fields) => fields.iter().position(|f| f == field),
            None => field
                .parse::<usize>()
                .ok()
                .filter(|i| *i < self.contents.len()),
        }
    }

    /// The form of the field called `field`.
    pub fn content(&self, field: &str) -> Option<&Form> {
        self.field_index(field).map(|i| &self.contents[i])
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        if let Some(fields) = &self.fields {
            if fields.len() != self.contents.len() {
                ragged_bail!(
                    "RecordArray has {} fields but {} contents",
                    fields.len(),
                    self.contents.len()
                );
            }
            if let Some(dup) = fields.iter().duplicates().next() {
                ragged_bail!("RecordArray field {dup} is declared twice");
            }
        }
        Ok(())
    }
}

impl_form_common!(RecordForm);

impl PartialEq for RecordForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.fields == other.fields
            && self.parameters.array_record_eq(&other.parameters)
            && self.contents == other.contents
    }
}
