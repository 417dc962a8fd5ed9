use ragged_error::{RaggedResult, ragged_bail};

use crate::backend::Backend;
use crate::traversal::{Action, ApplyOptions, recursively_apply};
use crate::Content;

/// What [`to_regular`] does with lists that do not all have the same length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToRegularPolicy {
    /// Return an [`InvalidTransform`](ragged_error::RaggedError::InvalidTransform) error.
    #[default]
    Fail,
    /// Keep the variable-length lists as they are.
    LeaveIrregular,
}

/// Convert the variable-length dimension at `axis` into a regular one.
///
/// Axis 0 is the outer sequence, which has no list to convert.
pub fn to_regular(
    content: &Content,
    axis: i64,
    policy: ToRegularPolicy,
    backend: &dyn Backend,
) -> RaggedResult<Content> {
    let posaxis = content.resolve_axis(axis)?;
    if posaxis == 0 {
        ragged_bail!(InvalidTransform: "axis={axis} is the outer sequence and cannot be made regular");
    }

    recursively_apply(content, &(), &ApplyOptions::default(), &mut |node, depth, _| {
        if node.parameters().is_string_like() || depth > posaxis {
            return Ok(Action::Replace(node.clone()));
        }
        let regular = match node {
            Content::ListOffset(list) if depth == posaxis => list.to_regular_array(backend)?,
            Content::List(list) if depth == posaxis => {
                list.to_list_offset_array64(backend)?.to_regular_array(backend)?
            }
            Content::Regular(_) if depth == posaxis => return Ok(Action::Replace(node.clone())),
            Content::Numpy(_) => return Ok(Action::Replace(node.clone())),
            _ => return Ok(Action::Continue),
        };
        match (regular, policy) {
            (Some(regular), _) => Ok(Action::Replace(regular.into())),
            (None, ToRegularPolicy::LeaveIrregular) => Ok(Action::Replace(node.clone())),
            (None, ToRegularPolicy::Fail) => ragged_bail!(
                InvalidTransform: "lists at axis={axis} do not all have the same length"
            ),
        }
    })
}

/// Convert every variable-length dimension into a regular one.
pub fn to_regular_all(
    content: &Content,
    policy: ToRegularPolicy,
    backend: &dyn Backend,
) -> RaggedResult<Content> {
    let (_, max_depth) = content.minmax_depth();
    (1..max_depth).try_fold(content.clone(), |acc, axis| {
        to_regular(&acc, i64::try_from(axis)?, policy, backend)
    })
}

#[cfg(test)]
mod tests {
    use ragged_buffer::Buffer;
    use rstest::rstest;

    use super::*;
    use crate::backend::CpuBackend;
    use crate::{Index, ListArray, ListOffsetArray, NumpyArray, RegularArray};

    fn lists(offsets: Vec<i64>) -> Content {
        let n = offsets.last().copied().unwrap_or_default();
        ListOffsetArray::try_new(
            Index::from(offsets),
            NumpyArray::new(Buffer::from_iter(0..n)).into(),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn uniform_lists() {
        let out = to_regular(&lists(vec![0, 3, 6]), 1, ToRegularPolicy::Fail, &CpuBackend).unwrap();
        assert_eq!(out.to_string(), "2 * 3 * int64");
        assert_eq!(out.to_json().unwrap(), lists(vec![0, 3, 6]).to_json().unwrap());
    }

    #[test]
    fn scattered_lists() {
        let list: Content = ListArray::try_new(
            Index::from(vec![4i64, 0]),
            Index::from(vec![6i64, 2]),
            NumpyArray::new(Buffer::from_iter(0i64..6)).into(),
        )
        .unwrap()
        .into();
        let out = to_regular(&list, -1, ToRegularPolicy::Fail, &CpuBackend).unwrap();
        assert_eq!(out.to_string(), "2 * 2 * int64");
        assert_eq!(out.to_json().unwrap(), list.to_json().unwrap());
    }

    #[rstest]
    #[case(ToRegularPolicy::Fail, None)]
    #[case(ToRegularPolicy::LeaveIrregular, Some("3 * var * int64"))]
    fn ragged_policy(#[case] policy: ToRegularPolicy, #[case] expected: Option<&str>) {
        let out = to_regular(&lists(vec![0, 1, 1, 4]), 1, policy, &CpuBackend);
        assert_eq!(out.ok().map(|c| c.to_string()).as_deref(), expected);
    }

    #[test]
    fn round_trips_with_from_regular() {
        let regular: Content = RegularArray::try_new(lists(vec![0, 2, 4, 6, 8]), 2, 0)
            .unwrap()
            .into();
        let irregular = crate::operations::from_regular_all(&regular, &CpuBackend).unwrap();
        assert_eq!(irregular.to_string(), "2 * var * var * int64");
        let back = to_regular_all(&irregular, ToRegularPolicy::Fail, &CpuBackend).unwrap();
        assert_eq!(back.to_string(), "2 * 2 * 2 * int64");
        assert_eq!(back.to_json().unwrap(), regular.to_json().unwrap());
    }

    #[test]
    fn axis_zero() {
        let err = to_regular(&lists(vec![0, 1]), 0, ToRegularPolicy::Fail, &CpuBackend).unwrap_err();
        assert!(err.to_string().starts_with("axis=0 is the outer sequence"));
    }
}
