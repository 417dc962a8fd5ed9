//! Depth and field algebra over forms.

use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail};
use serde_json::Value;

use crate::Form;

impl Form {
    /// The value of `key` on the nearest node carrying it, looking through list dimensions
    /// and wrappers. A union answers only when all of its branches agree.
    pub fn purelist_parameter(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.parameter(key) {
            return Some(value);
        }
        match self {
            Form::Numpy(_) | Form::Record(_) => None,
            Form::Union(f) => {
                let mut values = f.contents().iter().map(|c| c.purelist_parameter(key));
                let first = values.next().flatten();
                values.all(|v| v == first).then_some(first).flatten()
            }
            _ => self.children()[0].purelist_parameter(key),
        }
    }

    /// Whether every list dimension, down to the first record or leaf, is regular.
    pub fn purelist_isregular(&self) -> bool {
        match self {
            Form::Numpy(_) | Form::Record(_) => true,
            Form::ListOffset(_) | Form::List(_) => false,
            Form::Union(f) => f.contents().iter().all(Form::purelist_isregular),
            _ => self.children()[0].purelist_isregular(),
        }
    }

    /// The number of list dimensions, counting the outermost, down to the first record or
    /// leaf. `None` when union branches disagree.
    pub fn purelist_depth(&self) -> Option<usize> {
        match self {
            Form::Numpy(f) => Some(f.inner_shape().len() + 1),
            Form::Record(_) => Some(1),
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_) => {
                if self.parameters().is_string_like() {
                    Some(1)
                } else {
                    self.children()[0].purelist_depth().map(|d| d + 1)
                }
            }
            Form::Union(f) => f
                .contents()
                .iter()
                .map(Form::purelist_depth)
                .all_equal_value()
                .ok()
                .flatten(),
            _ => self.children()[0].purelist_depth(),
        }
    }

    /// The least and greatest depth reachable from this node, looking through records.
    pub fn minmax_depth(&self) -> (usize, usize) {
        match self {
            Form::Numpy(f) => {
                let depth = f.inner_shape().len() + 1;
                (depth, depth)
            }
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_) => {
                if self.parameters().is_string_like() {
                    (1, 1)
                } else {
                    let (min, max) = self.children()[0].minmax_depth();
                    (min + 1, max + 1)
                }
            }
            Form::Union(_) | Form::Record(_) => {
                let children = self.children();
                if children.is_empty() {
                    return (1, 1);
                }
                children
                    .into_iter()
                    .map(Form::minmax_depth)
                    .fold((usize::MAX, 0), |(lo, hi), (min, max)| {
                        (lo.min(min), hi.max(max))
                    })
            }
            _ => self.children()[0].minmax_depth(),
        }
    }

    /// Whether the depth branches below this node, and the least depth reached.
    pub fn branch_depth(&self) -> (bool, usize) {
        match self {
            Form::Numpy(f) => (false, f.inner_shape().len() + 1),
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_) => {
                if self.parameters().is_string_like() {
                    (false, 1)
                } else {
                    let (branch, depth) = self.children()[0].branch_depth();
                    (branch, depth + 1)
                }
            }
            Form::Union(_) | Form::Record(_) => {
                let mut any_branch = false;
                let mut min_depth: Option<usize> = None;
                for child in self.children() {
                    let (branch, depth) = child.branch_depth();
                    let current = *min_depth.get_or_insert(depth);
                    if branch || current != depth {
                        any_branch = true;
                    }
                    min_depth = Some(current.min(depth));
                }
                (any_branch, min_depth.unwrap_or(1))
            }
            _ => self.children()[0].branch_depth(),
        }
    }

    /// Resolve a possibly negative axis against the depth of this form.
    ///
    /// Negative axes count from the innermost dimension and require a uniform depth.
    pub fn resolve_axis(&self, axis: i64) -> RaggedResult<usize> {
        let (min_depth, max_depth) = self.minmax_depth();
        if axis >= 0 {
            let axis = usize::try_from(axis).unwrap_or(usize::MAX);
            if axis >= max_depth {
                ragged_bail!(
                    AxisError: "axis={axis} exceeds the depth of this array ({max_depth})"
                );
            }
            return Ok(axis);
        }
        let (branching, depth) = self.branch_depth();
        if branching || min_depth != max_depth {
            ragged_bail!(
                AxisError: "cannot use axis={axis} because the depth of this array branches between {min_depth} and {max_depth}"
            );
        }
        let wrapped = i64::try_from(depth).unwrap_or(i64::MAX) + axis;
        if wrapped < 0 {
            ragged_bail!(AxisError: "axis={axis} exceeds the depth of this array ({depth})");
        }
        Ok(usize::try_from(wrapped).unwrap_or_default())
    }

    /// The field names of the first record reached, looking through list dimensions and
    /// wrappers. A union reports the fields shared by all of its branches.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Form::Numpy(_) => vec![],
            Form::Record(f) => f.fields(),
            Form::Union(f) => {
                let mut branches = f.contents().iter().map(Form::fields);
                let first = branches.next().unwrap_or_default();
                branches.fold(first, |shared, fields| {
                    shared.into_iter().filter(|f| fields.contains(f)).collect()
                })
            }
            _ => self.children()[0].fields(),
        }
    }

    /// Whether the first record reached has positional fields. A union is a tuple only when
    /// every branch is.
    pub fn is_tuple(&self) -> bool {
        match self {
            Form::Numpy(_) => false,
            Form::Record(f) => f.is_tuple(),
            Form::Union(f) => f.contents().iter().all(Form::is_tuple),
            _ => self.children()[0].is_tuple(),
        }
    }

    /// Whether the outermost dimension may hold missing values.
    pub fn dimension_optiontype(&self) -> bool {
        match self {
            Form::IndexedOption(_) | Form::ByteMasked(_) | Form::BitMasked(_) => true,
            Form::Indexed(f) => f.content().dimension_optiontype(),
            Form::Union(f) => f.contents().iter().any(Form::dimension_optiontype),
            _ => false,
        }
    }
}
