use ragged_error::{RaggedResult, ragged_bail};

use crate::backend::Backend;
use crate::traversal::{Action, ApplyOptions, recursively_apply};
use crate::Content;

/// Convert the regular dimension at `axis` into a variable-length one.
///
/// Lists that are already variable-length are left as they are, so applying this twice is the
/// same as applying it once. Axis 0 is the outer sequence, which has no list to convert.
pub fn from_regular(content: &Content, axis: i64, backend: &dyn Backend) -> RaggedResult<Content> {
    let posaxis = content.resolve_axis(axis)?;
    if posaxis == 0 {
        ragged_bail!(InvalidTransform: "axis={axis} is the outer sequence and cannot be made irregular");
    }

    let options = ApplyOptions {
        numpy_to_regular: true,
        ..ApplyOptions::default()
    };
    recursively_apply(content, &(), &options, &mut |node, depth, _| {
        if node.parameters().is_string_like() || depth > posaxis {
            return Ok(Action::Replace(node.clone()));
        }
        Ok(match node {
            Content::Regular(regular) if depth == posaxis => {
                Action::Replace(regular.to_list_offset_array64(backend)?.into())
            }
            Content::List(_) | Content::ListOffset(_) if depth == posaxis => {
                Action::Replace(node.clone())
            }
            Content::Numpy(_) => Action::Replace(node.clone()),
            _ => Action::Continue,
        })
    })
}

/// Convert every regular dimension into a variable-length one.
pub fn from_regular_all(content: &Content, backend: &dyn Backend) -> RaggedResult<Content> {
    let (_, max_depth) = content.minmax_depth();
    (1..max_depth).try_fold(content.clone(), |acc, axis| {
        from_regular(&acc, i64::try_from(axis)?, backend)
    })
}

#[cfg(test)]
mod tests {
    use ragged_buffer::Buffer;
    use ragged_form::PType;
    use rstest::rstest;

    use super::*;
    use crate::backend::CpuBackend;
    use crate::{Index, NumpyArray, RegularArray};

    fn cube() -> Content {
        let data = Buffer::from_iter(0i64..30).into_byte_buffer();
        NumpyArray::try_new(data, PType::Int64, vec![2, 3, 5])
            .unwrap()
            .into()
    }

    #[rstest]
    #[case(1, "2 * var * 5 * int64")]
    #[case(2, "2 * 3 * var * int64")]
    #[case(-1, "2 * 3 * var * int64")]
    #[case(-2, "2 * var * 5 * int64")]
    fn converts_one_axis(#[case] axis: i64, #[case] expected: &str) {
        let out = from_regular(&cube(), axis, &CpuBackend).unwrap();
        assert_eq!(out.to_string(), expected);
        assert_eq!(out.to_json().unwrap(), cube().to_json().unwrap());
    }

    #[test]
    fn converts_all_axes() {
        let out = from_regular_all(&cube(), &CpuBackend).unwrap();
        assert_eq!(out.to_string(), "2 * var * var * int64");
        assert_eq!(out.to_json().unwrap(), cube().to_json().unwrap());
    }

    #[test]
    fn stride_becomes_offsets() {
        let regular: Content =
            RegularArray::try_new(NumpyArray::new(Buffer::from_iter(0i32..20)).into(), 5, 0)
                .unwrap()
                .into();
        let Content::ListOffset(list) = from_regular(&regular, 1, &CpuBackend).unwrap() else {
            panic!("expected a ListOffsetArray");
        };
        assert_eq!(list.offsets(), &Index::from(vec![0i64, 5, 10, 15, 20]));
        assert_eq!(list.content().len(), 20);
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(-4)]
    fn rejects_bad_axes(#[case] axis: i64) {
        assert!(from_regular(&cube(), axis, &CpuBackend).is_err());
    }
}
