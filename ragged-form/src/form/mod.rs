//! The schema-only mirror of a layout: buffer kinds and names, no data.

use ragged_error::RaggedResult;
use serde_json::Value;

use crate::Parameters;

macro_rules! impl_form_common {
    ($T:ident) => {
        impl $T {
            /// The parameters attached to this node.
            pub fn parameters(&self) -> &$crate::Parameters {
                &self.parameters
            }

            /// The identity label used to name this node's buffers.
            pub fn form_key(&self) -> Option<&str> {
                self.form_key.as_deref()
            }

            /// Replace the parameters of this node.
            pub fn with_parameters(mut self, parameters: $crate::Parameters) -> Self {
                self.parameters = parameters;
                self
            }

            /// Replace the form key of this node.
            pub fn with_form_key(mut self, form_key: impl Into<String>) -> Self {
                self.form_key = Some(form_key.into());
                self
            }
        }

        impl From<$T> for $crate::Form {
            fn from(value: $T) -> Self {
                $crate::Form::from_node(value)
            }
        }
    };
}

mod list;
mod numpy;
mod option;
mod record;
mod union;

pub use list::*;
pub use numpy::*;
pub use option::*;
pub use record::*;
pub use union::*;

/// A node of a form tree. One variant per layout node kind.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "class")]
pub enum Form {
    /// A leaf of scalars, possibly with fixed inner dimensions.
    #[serde(rename = "NumpyArray")]
    Numpy(NumpyForm),
    /// Lists of one fixed size.
    #[serde(rename = "RegularArray")]
    Regular(RegularForm),
    /// Variable-length lists described by a monotonic offsets buffer.
    #[serde(rename = "ListOffsetArray")]
    ListOffset(ListOffsetForm),
    /// Variable-length lists described by parallel starts and stops buffers.
    #[serde(rename = "ListArray")]
    List(ListForm),
    /// A dense gather over its content.
    #[serde(rename = "IndexedArray")]
    Indexed(IndexedForm),
    /// A gather over its content where negative entries are missing values.
    #[serde(rename = "IndexedOptionArray")]
    IndexedOption(IndexedOptionForm),
    /// Missing values marked by one byte per element.
    #[serde(rename = "ByteMaskedArray")]
    ByteMasked(ByteMaskedForm),
    /// Missing values marked by one packed bit per element.
    #[serde(rename = "BitMaskedArray")]
    BitMasked(BitMaskedForm),
    /// A tagged union of heterogeneous branches.
    #[serde(rename = "UnionArray")]
    Union(UnionForm),
    /// A fixed set of named fields (a record) or unnamed fields (a tuple).
    #[serde(rename = "RecordArray")]
    Record(RecordForm),
}

/// Conversion of a concrete form node into a [`Form`].
pub trait FormNode {
    /// Wrap this node in its [`Form`] variant.
    fn into_form(self) -> Form;
}

macro_rules! form_node {
    ($T:ident, $variant:ident) => {
        impl FormNode for $T {
            fn into_form(self) -> Form {
                Form::$variant(self)
            }
        }
    };
}

form_node!(NumpyForm, Numpy);
form_node!(RegularForm, Regular);
form_node!(ListOffsetForm, ListOffset);
form_node!(ListForm, List);
form_node!(IndexedForm, Indexed);
form_node!(IndexedOptionForm, IndexedOption);
form_node!(ByteMaskedForm, ByteMasked);
form_node!(BitMaskedForm, BitMasked);
form_node!(UnionForm, Union);
form_node!(RecordForm, Record);

macro_rules! match_each_form {
    ($self:expr, | $f:ident | $body:expr) => {
        match $self {
            Form::Numpy($f) => $body,
            Form::Regular($f) => $body,
            Form::ListOffset($f) => $body,
            Form::List($f) => $body,
            Form::Indexed($f) => $body,
            Form::IndexedOption($f) => $body,
            Form::ByteMasked($f) => $body,
            Form::BitMasked($f) => $body,
            Form::Union($f) => $body,
            Form::Record($f) => $body,
        }
    };
}

impl Form {
    /// Wrap a concrete node.
    pub fn from_node(node: impl FormNode) -> Self {
        node.into_form()
    }

    /// The serialized class name of this node.
    pub fn class_name(&self) -> &'static str {
        match self {
            Form::Numpy(_) => "NumpyArray",
            Form::Regular(_) => "RegularArray",
            Form::ListOffset(_) => "ListOffsetArray",
            Form::List(_) => "ListArray",
            Form::Indexed(_) => "IndexedArray",
            Form::IndexedOption(_) => "IndexedOptionArray",
            Form::ByteMasked(_) => "ByteMaskedArray",
            Form::BitMasked(_) => "BitMaskedArray",
            Form::Union(_) => "UnionArray",
            Form::Record(_) => "RecordArray",
        }
    }

    /// The parameters attached to this node.
    pub fn parameters(&self) -> &Parameters {
        match_each_form!(self, |f| f.parameters())
    }

    /// A single parameter of this node.
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters().get(key)
    }

    /// Replace the parameters of this node.
    pub fn with_parameters(self, parameters: Parameters) -> Self {
        match_each_form!(self, |f| f.with_parameters(parameters).into_form())
    }

    /// The identity label used to name this node's buffers.
    pub fn form_key(&self) -> Option<&str> {
        match_each_form!(self, |f| f.form_key())
    }

    pub(crate) fn set_form_key(&mut self, form_key: Option<String>) {
        match_each_form!(self, |f| f.form_key = form_key)
    }

    /// The direct children of this node, in buffer-naming order.
    pub fn children(&self) -> Vec<&Form> {
        match self {
            Form::Numpy(_) => vec![],
            Form::Regular(f) => vec![f.content()],
            Form::ListOffset(f) => vec![f.content()],
            Form::List(f) => vec![f.content()],
            Form::Indexed(f) => vec![f.content()],
            Form::IndexedOption(f) => vec![f.content()],
            Form::ByteMasked(f) => vec![f.content()],
            Form::BitMasked(f) => vec![f.content()],
            Form::Union(f) => f.contents().iter().collect(),
            Form::Record(f) => f.contents().iter().collect(),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut Form> {
        match self {
            Form::Numpy(_) => vec![],
            Form::Regular(f) => vec![f.content.as_mut()],
            Form::ListOffset(f) => vec![f.content.as_mut()],
            Form::List(f) => vec![f.content.as_mut()],
            Form::Indexed(f) => vec![f.content.as_mut()],
            Form::IndexedOption(f) => vec![f.content.as_mut()],
            Form::ByteMasked(f) => vec![f.content.as_mut()],
            Form::BitMasked(f) => vec![f.content.as_mut()],
            Form::Union(f) => f.contents.iter_mut().collect(),
            Form::Record(f) => f.contents.iter_mut().collect(),
        }
    }

    /// The buffer attributes this node contributes, in buffer-naming order.
    pub fn buffer_attributes(&self) -> &'static [&'static str] {
        match self {
            Form::Numpy(_) => &["data"],
            Form::Regular(_) | Form::Record(_) => &[],
            Form::ListOffset(_) => &["offsets"],
            Form::List(_) => &["starts", "stops"],
            Form::Indexed(_) | Form::IndexedOption(_) => &["index"],
            Form::ByteMasked(_) | Form::BitMasked(_) => &["mask"],
            Form::Union(_) => &["tags", "index"],
        }
    }

    /// Whether this node adds a list dimension.
    pub fn is_list(&self) -> bool {
        matches!(self, Form::Regular(_) | Form::ListOffset(_) | Form::List(_))
    }

    /// Whether this node may hold missing values.
    pub fn is_option(&self) -> bool {
        matches!(
            self,
            Form::IndexedOption(_) | Form::ByteMasked(_) | Form::BitMasked(_)
        )
    }

    /// Check the node kinds and arities of the whole tree, as the constructors do.
    pub fn validate(&self) -> RaggedResult<()> {
        match_each_form!(self, |f| f.check())?;
        self.children().into_iter().try_for_each(Form::validate)
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Form::Numpy(l), Form::Numpy(r)) => l == r,
            (Form::Regular(l), Form::Regular(r)) => l == r,
            (Form::ListOffset(l), Form::ListOffset(r)) => l == r,
            (Form::List(l), Form::List(r)) => l == r,
            (Form::Indexed(l), Form::Indexed(r)) => l == r,
            (Form::IndexedOption(l), Form::IndexedOption(r)) => l == r,
            (Form::ByteMasked(l), Form::ByteMasked(r)) => l == r,
            (Form::BitMasked(l), Form::BitMasked(r)) => l == r,
            (Form::Union(l), Form::Union(r)) => l == r,
            (Form::Record(l), Form::Record(r)) => l == r,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ARRAY_PARAMETER, IndexType, PType};

    fn strings() -> Form {
        ListOffsetForm::try_new(IndexType::I64, NumpyForm::new(PType::UInt8, vec![]).into())
            .unwrap()
            .with_parameters(Parameters::new().with(ARRAY_PARAMETER, "string"))
            .into()
    }

    #[test]
    fn equality_ignores_unrelated_parameters() {
        let annotated = strings().with_parameters(
            Parameters::new()
                .with(ARRAY_PARAMETER, "string")
                .with("encoding", "utf-8"),
        );
        assert_eq!(strings(), annotated);
    }

    #[test]
    fn equality_compares_form_keys_and_structure() {
        let keyed = match strings() {
            Form::ListOffset(f) => Form::from(f.with_form_key("node0")),
            _ => unreachable!(),
        };
        assert_ne!(strings(), keyed);

        let narrow: Form =
            ListOffsetForm::try_new(IndexType::I32, NumpyForm::new(PType::UInt8, vec![]).into())
                .unwrap()
                .with_parameters(Parameters::new().with(ARRAY_PARAMETER, "string"))
                .into();
        assert_ne!(strings(), narrow);
        assert_ne!(strings(), Form::from(NumpyForm::new(PType::UInt8, vec![])));
    }

    #[test]
    fn children_in_order() {
        let record: Form = RecordForm::try_new(
            vec![NumpyForm::new(PType::Int64, vec![]).into(), strings()],
            Some(vec!["x".into(), "y".into()]),
        )
        .unwrap()
        .into();
        let names = record
            .children()
            .iter()
            .map(|c| c.class_name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["NumpyArray", "ListOffsetArray"]);
        assert!(strings().is_list());
        assert!(!record.is_option());
    }
}
