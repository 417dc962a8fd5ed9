use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail};
use ragged_form::Parameters;

use crate::Content;

/// A fixed set of fields sharing one length. Without field names the record is a tuple whose
/// fields are numbered `"0"`, `"1"`, ...
#[derive(Debug, Clone)]
pub struct RecordArray {
    contents: Vec<Content>,
    fields: Option<Vec<String>>,
    length: usize,
    parameters: Parameters,
}

impl RecordArray {
    /// A record of `contents`, named by `fields` or positional when `fields` is `None`.
    ///
    /// `length` defaults to the shortest content and must be given when there are no contents.
    pub fn try_new(
        contents: Vec<Content>,
        fields: Option<Vec<String>>,
        length: Option<usize>,
    ) -> RaggedResult<Self> {
        if let Some(fields) = &fields {
            if fields.len() != contents.len() {
                ragged_bail!(
                    "RecordArray has {} fields but {} contents",
                    fields.len(),
                    contents.len()
                );
            }
            if let Some(duplicate) = fields.iter().duplicates().next() {
                ragged_bail!("RecordArray field {duplicate} appears more than once");
            }
        }
        let shortest = contents.iter().map(Content::len).min();
        let length = match (length, shortest) {
            (Some(length), Some(shortest)) if length > shortest => {
                ragged_bail!("RecordArray length {length} exceeds a content of length {shortest}")
            }
            (Some(length), _) => length,
            (None, Some(shortest)) => shortest,
            (None, None) => ragged_bail!("RecordArray without contents needs an explicit length"),
        };
        Ok(Self {
            contents,
            fields,
            length,
            parameters: Parameters::default(),
        })
    }

    /// The field contents, in field order.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// The field names, or `None` for a tuple.
    pub fn field_names(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Whether the fields are positional.
    pub fn is_tuple(&self) -> bool {
        self.fields.is_none()
    }

    /// The field names, numbering the fields of a tuple.
    pub fn fields(&self) -> Vec<String> {
        match &self.fields {
            Some(fields) => fields.clone(),
            None => (0..self.contents.len()).map(|i| i.to_string()).collect(),
        }
    }

    /// The content of `field`, by name or by tuple position.
    pub fn content(&self, field: &str) -> Option<&Content> {
        let position = match &self.fields {
            Some(fields) => fields.iter().position(|f| f == field),
            None => field.parse::<usize>().ok(),
        };
        position.and_then(|i| self.contents.get(i))
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl_content_common!(RecordArray, Record);
