use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_err};

use crate::{PType, Parameters};

/// The form of a leaf buffer of scalars.
///
/// `inner_shape` lists the fixed dimensions below the outermost one, so a leaf of shape
/// `(3, 0)` has an inner shape of `[0]`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NumpyForm {
    pub(crate) primitive: PType,
    #[serde(default)]
    pub(crate) inner_shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub(crate) parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_key: Option<String>,
}

impl NumpyForm {
    /// A leaf of `primitive` scalars with the given inner dimensions.
    pub fn new(primitive: PType, inner_shape: Vec<usize>) -> Self {
        Self {
            primitive,
            inner_shape,
            parameters: Parameters::default(),
            form_key: None,
        }
    }

    /// The scalar kind.
    pub fn primitive(&self) -> PType {
        self.primitive
    }

    /// The fixed dimensions below the outermost one.
    pub fn inner_shape(&self) -> &[usize] {
        &self.inner_shape
    }

    /// The number of bytes making up one outermost element.
    pub fn item_width(&self) -> RaggedResult<usize> {
        self.inner_shape
            .iter()
            .try_fold(self.primitive.byte_width(), |width, dim| width.checked_mul(*dim))
            .ok_or_else(|| {
                ragged_err!(
                    InvalidSerde: "inner shape {} of {} overflows",
                    self.inner_shape.iter().join("x"),
                    self.primitive
                )
            })
    }

    pub(crate) fn check(&self) -> RaggedResult<()> {
        self.item_width().map(drop)
    }
}

impl_form_common!(NumpyForm);

impl PartialEq for NumpyForm {
    fn eq(&self, other: &Self) -> bool {
        self.form_key == other.form_key
            && self.primitive == other.primitive
            && self.inner_shape == other.inner_shape
            && self.parameters.array_record_eq(&other.parameters)
    }
}
