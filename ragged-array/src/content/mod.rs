//! The node family of a ragged layout.
//!
//! A [`Content`] is one structural layer of a nested array: a leaf of scalars, a list
//! dimension, an indirection, an option mask, a tagged union, or a record. Nodes own their
//! children exclusively and share their buffers by reference. Every constructor validates
//! the node, so downstream operations assume structural validity.

use std::fmt::{Display, Formatter};

use ragged_error::{RaggedExpect, RaggedResult};
use ragged_form::{
    BitMaskedForm, ByteMaskedForm, Form, IndexedForm, IndexedOptionForm, ListForm,
    ListOffsetForm, NumpyForm, Parameters, RecordForm, RegularForm, UnionForm,
};
use serde_json::Value;

use crate::visitor::ContentVisitor;

macro_rules! impl_content_common {
    ($T:ident, $variant:ident) => {
        impl $T {
            /// The parameters attached to this node.
            pub fn parameters(&self) -> &ragged_form::Parameters {
                &self.parameters
            }

            /// Replace the parameters of this node.
            pub fn with_parameters(mut self, parameters: ragged_form::Parameters) -> Self {
                self.parameters = parameters;
                self
            }
        }

        impl From<$T> for $crate::Content {
            fn from(value: $T) -> Self {
                $crate::Content::$variant(value)
            }
        }
    };
}

mod list;
mod list_offset;
mod masked;
mod numpy;
mod option;
mod record;
mod regular;
mod union;

pub use list::*;
pub use list_offset::*;
pub use masked::*;
pub use numpy::*;
pub use option::*;
pub use record::*;
pub use regular::*;
pub use union::*;

/// A node of a ragged layout.
#[derive(Debug, Clone)]
pub enum Content {
    /// A leaf of scalars of arbitrary rank.
    Numpy(NumpyArray),
    /// Lists of one fixed size.
    Regular(RegularArray),
    /// Variable-length lists described by monotonic offsets.
    ListOffset(ListOffsetArray),
    /// Variable-length lists described by parallel starts and stops.
    List(ListArray),
    /// A dense gather over the content.
    Indexed(IndexedArray),
    /// A gather where negative entries are missing values.
    IndexedOption(IndexedOptionArray),
    /// Missing values marked by one byte per element.
    ByteMasked(ByteMaskedArray),
    /// Missing values marked by one packed bit per element.
    BitMasked(BitMaskedArray),
    /// A tagged union of heterogeneous branches.
    Union(UnionArray),
    /// A fixed set of named fields, or positional fields for a tuple.
    Record(RecordArray),
}

macro_rules! match_each_content {
    ($self:expr, | $c:ident | $body:expr) => {
        match $self {
            Content::Numpy($c) => $body,
            Content::Regular($c) => $body,
            Content::ListOffset($c) => $body,
            Content::List($c) => $body,
            Content::Indexed($c) => $body,
            Content::IndexedOption($c) => $body,
            Content::ByteMasked($c) => $body,
            Content::BitMasked($c) => $body,
            Content::Union($c) => $body,
            Content::Record($c) => $body,
        }
    };
}

impl Content {
    /// The number of top-level elements.
    pub fn len(&self) -> usize {
        match_each_content!(self, |c| c.len())
    }

    /// Whether there are no top-level elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The class name of this node, as used in serialized forms.
    pub fn class_name(&self) -> &'static str {
        match self {
            Content::Numpy(_) => "NumpyArray",
            Content::Regular(_) => "RegularArray",
            Content::ListOffset(_) => "ListOffsetArray",
            Content::List(_) => "ListArray",
            Content::Indexed(_) => "IndexedArray",
            Content::IndexedOption(_) => "IndexedOptionArray",
            Content::ByteMasked(_) => "ByteMaskedArray",
            Content::BitMasked(_) => "BitMaskedArray",
            Content::Union(_) => "UnionArray",
            Content::Record(_) => "RecordArray",
        }
    }

    /// The parameters attached to this node.
    pub fn parameters(&self) -> &Parameters {
        match_each_content!(self, |c| c.parameters())
    }

    /// A single parameter of this node.
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters().get(key)
    }

    /// Replace the parameters of this node.
    pub fn with_parameters(self, parameters: Parameters) -> Self {
        match_each_content!(self, |c| Content::from(c.with_parameters(parameters)))
    }

    /// The direct children of this node, in buffer-naming order.
    pub fn children(&self) -> Vec<&Content> {
        match self {
            Content::Numpy(_) => vec![],
            Content::Regular(c) => vec![c.content()],
            Content::ListOffset(c) => vec![c.content()],
            Content::List(c) => vec![c.content()],
            Content::Indexed(c) => vec![c.content()],
            Content::IndexedOption(c) => vec![c.content()],
            Content::ByteMasked(c) => vec![c.content()],
            Content::BitMasked(c) => vec![c.content()],
            Content::Union(c) => c.contents().iter().collect(),
            Content::Record(c) => c.contents().iter().collect(),
        }
    }

    /// Offer this node's buffers and children to `visitor`, in buffer-naming order.
    pub fn accept(&self, visitor: &mut dyn ContentVisitor) -> RaggedResult<()> {
        match self {
            Content::Numpy(c) => visitor.visit_buffer("data", c.data()),
            Content::Regular(c) => visitor.visit_child("content", c.content()),
            Content::ListOffset(c) => {
                visitor.visit_index("offsets", c.offsets())?;
                visitor.visit_child("content", c.content())
            }
            Content::List(c) => {
                visitor.visit_index("starts", c.starts())?;
                visitor.visit_index("stops", c.stops())?;
                visitor.visit_child("content", c.content())
            }
            Content::Indexed(c) => {
                visitor.visit_index("index", c.index())?;
                visitor.visit_child("content", c.content())
            }
            Content::IndexedOption(c) => {
                visitor.visit_index("index", c.index())?;
                visitor.visit_child("content", c.content())
            }
            Content::ByteMasked(c) => {
                visitor.visit_index("mask", c.mask())?;
                visitor.visit_child("content", c.content())
            }
            Content::BitMasked(c) => {
                visitor.visit_index("mask", c.mask())?;
                visitor.visit_child("content", c.content())
            }
            Content::Union(c) => {
                visitor.visit_index("tags", c.tags())?;
                visitor.visit_index("index", c.index())?;
                c.contents()
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, child)| visitor.visit_child(&format!("content{i}"), child))
            }
            Content::Record(c) => c
                .fields()
                .iter()
                .zip(c.contents())
                .try_for_each(|(field, child)| visitor.visit_child(field, child)),
        }
    }

    /// The form describing this layout, without form keys.
    pub fn form(&self) -> Form {
        let form: Form = match self {
            Content::Numpy(c) => NumpyForm::new(c.ptype(), c.inner_shape().to_vec()).into(),
            Content::Regular(c) => RegularForm::new(c.content().form(), c.size()).into(),
            Content::ListOffset(c) => {
                ListOffsetForm::try_new(c.offsets().index_type(), c.content().form())
                    .ragged_expect("offsets kind checked at construction")
                    .into()
            }
            Content::List(c) => ListForm::try_new(
                c.starts().index_type(),
                c.stops().index_type(),
                c.content().form(),
            )
            .ragged_expect("starts and stops kinds checked at construction")
            .into(),
            Content::Indexed(c) => IndexedForm::try_new(c.index().index_type(), c.content().form())
                .ragged_expect("index kind checked at construction")
                .into(),
            Content::IndexedOption(c) => {
                IndexedOptionForm::try_new(c.index().index_type(), c.content().form())
                    .ragged_expect("index kind checked at construction")
                    .into()
            }
            Content::ByteMasked(c) => ByteMaskedForm::try_new(
                c.mask().index_type(),
                c.content().form(),
                c.valid_when(),
            )
            .ragged_expect("mask kind checked at construction")
            .into(),
            Content::BitMasked(c) => BitMaskedForm::try_new(
                c.mask().index_type(),
                c.content().form(),
                c.valid_when(),
                c.lsb_order(),
            )
            .ragged_expect("mask kind checked at construction")
            .into(),
            Content::Union(c) => UnionForm::try_new(
                c.tags().index_type(),
                c.index().index_type(),
                c.contents().iter().map(Content::form).collect(),
            )
            .ragged_expect("tags and index kinds checked at construction")
            .into(),
            Content::Record(c) => RecordForm::try_new(
                c.contents().iter().map(Content::form).collect(),
                c.field_names().map(<[String]>::to_vec),
            )
            .ragged_expect("fields checked at construction")
            .into(),
        };
        form.with_parameters(self.parameters().clone())
    }

    /// The form of this layout with every node keyed `{prefix}{n}` in preorder from `start`.
    pub fn form_with_keys(&self, prefix: &str, start: usize) -> Form {
        self.form().with_form_keys(prefix, start)
    }

    /// Whether this node, looking through list dimensions and wrappers, holds a tuple. A
    /// union holds a tuple only when every branch does.
    pub fn is_tuple(&self) -> bool {
        match self {
            Content::Numpy(_) => false,
            Content::Record(c) => c.is_tuple(),
            Content::Union(c) => c.contents().iter().all(Content::is_tuple),
            _ => self.children()[0].is_tuple(),
        }
    }

    /// The field names of the first record reached. See [`Form::fields`].
    pub fn fields(&self) -> Vec<String> {
        self.form().fields()
    }

    /// The number of list dimensions. See [`Form::purelist_depth`].
    pub fn purelist_depth(&self) -> Option<usize> {
        self.form().purelist_depth()
    }

    /// The least and greatest reachable depth. See [`Form::minmax_depth`].
    pub fn minmax_depth(&self) -> (usize, usize) {
        self.form().minmax_depth()
    }

    /// Whether the depth branches, and the least depth. See [`Form::branch_depth`].
    pub fn branch_depth(&self) -> (bool, usize) {
        self.form().branch_depth()
    }

    /// Resolve a possibly negative axis against the depth of this layout.
    pub fn resolve_axis(&self, axis: i64) -> RaggedResult<usize> {
        self.form().resolve_axis(axis)
    }
}

impl Display for Content {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} * {}", self.len(), self.form())
    }
}
