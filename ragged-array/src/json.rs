//! Value-level rendering of layouts as JSON.
//!
//! Two layouts hold the same values exactly when their renderings are equal, whatever their
//! node structure.

use ragged_error::{RaggedResult, ragged_err};
use ragged_form::{PType, Parameters};
use serde_json::{Map, Value};

use crate::{Content, NumpyArray};

impl Content {
    /// Render every top-level element. Lists become arrays, records objects, tuples arrays,
    /// missing values `null`, and string-like lists strings.
    pub fn to_json(&self) -> RaggedResult<Vec<Value>> {
        (0..self.len()).map(|i| self.value_at(i)).collect()
    }

    /// Render the top-level element at `idx`.
    pub fn value_at(&self, idx: usize) -> RaggedResult<Value> {
        if idx >= self.len() {
            return Err(ragged_err!(OutOfBounds: idx, 0, self.len()));
        }
        match self {
            Content::Numpy(c) => numpy_value(c, idx),
            Content::Regular(c) => {
                list_value(self.parameters(), c.content(), idx * c.size(), (idx + 1) * c.size())
            }
            Content::ListOffset(c) => list_value(
                self.parameters(),
                c.content(),
                position(c.offsets().get(idx))?,
                position(c.offsets().get(idx + 1))?,
            ),
            Content::List(c) => list_value(
                self.parameters(),
                c.content(),
                position(c.starts().get(idx))?,
                position(c.stops().get(idx))?,
            ),
            Content::Indexed(c) => c.content().value_at(position(c.index().get(idx))?),
            Content::IndexedOption(c) => match c.index().get(idx) {
                missing if missing < 0 => Ok(Value::Null),
                present => c.content().value_at(position(present)?),
            },
            Content::ByteMasked(c) => {
                if c.is_valid(idx) {
                    c.content().value_at(idx)
                } else {
                    Ok(Value::Null)
                }
            }
            Content::BitMasked(c) => {
                if c.is_valid(idx) {
                    c.content().value_at(idx)
                } else {
                    Ok(Value::Null)
                }
            }
            Content::Union(c) => {
                let tag = position(c.tags().get(idx))?;
                c.contents()[tag].value_at(position(c.index().get(idx))?)
            }
            Content::Record(c) => {
                if c.is_tuple() {
                    return c
                        .contents()
                        .iter()
                        .map(|field| field.value_at(idx))
                        .collect::<RaggedResult<Vec<_>>>()
                        .map(Value::Array);
                }
                c.fields()
                    .into_iter()
                    .zip(c.contents())
                    .map(|(name, field)| Ok((name, field.value_at(idx)?)))
                    .collect::<RaggedResult<Map<String, Value>>>()
                    .map(Value::Object)
            }
        }
    }
}

fn position(value: i64) -> RaggedResult<usize> {
    Ok(usize::try_from(value)?)
}

fn list_value(
    parameters: &Parameters,
    content: &Content,
    start: usize,
    stop: usize,
) -> RaggedResult<Value> {
    if parameters.is_string_like() {
        if start >= stop {
            return Ok(Value::String(String::new()));
        }
        if let Some(bytes) = string_bytes(content, start, stop) {
            return Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()));
        }
    }
    if start >= stop {
        return Ok(Value::Array(vec![]));
    }
    (start..stop)
        .map(|i| content.value_at(i))
        .collect::<RaggedResult<Vec<_>>>()
        .map(Value::Array)
}

fn string_bytes(content: &Content, start: usize, stop: usize) -> Option<&[u8]> {
    match content {
        Content::Numpy(chars) if chars.item_width() == 1 => chars.data().as_slice().get(start..stop),
        _ => None,
    }
}

fn numpy_value(array: &NumpyArray, idx: usize) -> RaggedResult<Value> {
    let inner = array.inner_shape();
    let scalars = inner.iter().product::<usize>();
    nested_scalars(array.ptype(), array.data().as_slice(), inner, idx * scalars)
}

fn nested_scalars(ptype: PType, bytes: &[u8], shape: &[usize], first: usize) -> RaggedResult<Value> {
    let Some((&dim, rest)) = shape.split_first() else {
        return ptype.json_value_at(bytes, first);
    };
    let stride = rest.iter().product::<usize>();
    (0..dim)
        .map(|i| nested_scalars(ptype, bytes, rest, first + i * stride))
        .collect::<RaggedResult<Vec<_>>>()
        .map(Value::Array)
}
