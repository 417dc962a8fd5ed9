//! Column listing and projection over forms.
//!
//! A column is the dotted path of record fields leading to a leaf or a string. Projection
//! prunes a form down to the requested columns without touching any data, so a reader can
//! fetch just the buffers those columns need.

use itertools::Itertools;
use ragged_error::{RaggedResult, ragged_bail, ragged_err};
use regex::Regex;

use crate::{Form, RecordForm, UnionForm};

/// A column specifier split into one compiled glob per dotted segment.
struct Specifier {
    segments: Vec<Regex>,
}

impl Specifier {
    fn parse(specifier: &str) -> RaggedResult<Self> {
        if specifier.is_empty() {
            return Ok(Self { segments: vec![] });
        }
        let segments = specifier
            .split('.')
            .map(|segment| {
                if segment.is_empty() {
                    ragged_bail!("column specifier \"{specifier}\" has an empty segment");
                }
                let pattern = segment
                    .chars()
                    .map(|c| match c {
                        '*' => ".*".to_string(),
                        '?' => ".".to_string(),
                        c => regex::escape(&c.to_string()),
                    })
                    .join("");
                Regex::new(&format!("^{pattern}$"))
                    .map_err(|e| ragged_err!("invalid column specifier \"{specifier}\": {e}"))
            })
            .collect::<RaggedResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    fn len(&self) -> usize {
        self.segments.len()
    }

    fn matches(&self, index: usize, field: &str) -> bool {
        self.segments
            .get(index)
            .is_none_or(|segment| segment.is_match(field))
    }
}

impl Form {
    /// The dotted paths of every leaf column. When `list_indicator` is given, it is inserted
    /// as a path segment for each list dimension.
    pub fn columns(&self, list_indicator: Option<&str>) -> Vec<String> {
        let mut output = vec![];
        self.collect_columns(&mut vec![], &mut output, list_indicator);
        output
    }

    fn collect_columns(
        &self,
        path: &mut Vec<String>,
        output: &mut Vec<String>,
        list_indicator: Option<&str>,
    ) {
        match self {
            Form::Numpy(n) => {
                let depth = path.len();
                if let Some(indicator) = list_indicator {
                    path.extend(n.inner_shape().iter().map(|_| indicator.to_string()));
                }
                let column = path.join(".");
                if !output.contains(&column) {
                    output.push(column);
                }
                path.truncate(depth);
            }
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_)
                if self.parameters().is_string_like() =>
            {
                let column = path.join(".");
                if !output.contains(&column) {
                    output.push(column);
                }
            }
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_) => {
                if let Some(indicator) = list_indicator {
                    path.push(indicator.to_string());
                    self.children()[0].collect_columns(path, output, list_indicator);
                    path.pop();
                } else {
                    self.children()[0].collect_columns(path, output, list_indicator);
                }
            }
            Form::Record(r) => {
                for (field, content) in r.fields().into_iter().zip(r.contents()) {
                    path.push(field);
                    content.collect_columns(path, output, list_indicator);
                    path.pop();
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_columns(path, output, list_indicator);
                }
            }
        }
    }

    /// The scalar kind of every leaf column, in column order. Strings report `"string"`.
    pub fn column_types(&self) -> Vec<String> {
        match self {
            Form::Numpy(n) => vec![n.primitive().to_string()],
            Form::Regular(_) | Form::ListOffset(_) | Form::List(_)
                if self.parameters().is_string_like() =>
            {
                vec!["string".to_string()]
            }
            _ => self
                .children()
                .into_iter()
                .flat_map(Form::column_types)
                .collect(),
        }
    }

    /// Prune this form to the columns named by `specifiers`.
    ///
    /// Each specifier is a dotted path of field names; each segment may use `*` and `?`
    /// wildcards. A specifier naming a record selects every column below it. Returns the
    /// pruned form together with the buffer keys needed to materialize it, which requires
    /// form keys to have been assigned.
    pub fn select_columns(&self, specifiers: &[&str]) -> RaggedResult<(Form, Vec<String>)> {
        let specifiers: Vec<Specifier> = specifiers
            .iter()
            .unique()
            .map(|s| Specifier::parse(s))
            .collect::<RaggedResult<_>>()?;
        let matches = vec![true; specifiers.len()];
        let mut output = 0;
        let pruned = self.select_columns_at(0, &specifiers, &matches, &mut output);
        let keys = pruned.buffer_keys()?;
        Ok((pruned, keys))
    }

    /// Prune the subtree at path depth `index`. `matches[i]` records whether the path so far
    /// agrees with `specifiers[i]`; `output` counts the leaf columns kept.
    fn select_columns_at(
        &self,
        index: usize,
        specifiers: &[Specifier],
        matches: &[bool],
        output: &mut usize,
    ) -> Form {
        match self {
            Form::Record(r) => {
                let mut contents = vec![];
                let mut fields = vec![];
                for (field, content) in r.fields().into_iter().zip(r.contents()) {
                    let next_matches = specifiers
                        .iter()
                        .zip(matches)
                        .map(|(specifier, matched)| *matched && specifier.matches(index, &field))
                        .collect_vec();
                    if next_matches.iter().any(|m| *m) {
                        let before = *output;
                        let next_content =
                            content.select_columns_at(index + 1, specifiers, &next_matches, output);
                        if before != *output {
                            contents.push(next_content);
                            fields.push(field);
                        }
                    }
                }
                Form::Record(RecordForm {
                    fields: (!r.is_tuple()).then_some(fields),
                    contents,
                    parameters: r.parameters().clone(),
                    form_key: r.form_key.clone(),
                })
            }
            Form::Union(u) => Form::Union(UnionForm {
                tags: u.tags(),
                index: u.index(),
                contents: u
                    .contents()
                    .iter()
                    .map(|c| c.select_columns_at(index, specifiers, matches, output))
                    .collect(),
                parameters: u.parameters().clone(),
                form_key: u.form_key.clone(),
            }),
            Form::Numpy(_) => {
                self.count_if_selected(index, specifiers, matches, output);
                self.clone()
            }
            _ if self.parameters().is_string_like() => {
                self.count_if_selected(index, specifiers, matches, output);
                self.clone()
            }
            _ => {
                let mut pruned = self.clone();
                if let Some(child) = pruned.children_mut().into_iter().next() {
                    *child = child.select_columns_at(index, specifiers, matches, output);
                }
                pruned
            }
        }
    }

    fn count_if_selected(
        &self,
        index: usize,
        specifiers: &[Specifier],
        matches: &[bool],
        output: &mut usize,
    ) {
        if specifiers
            .iter()
            .zip(matches)
            .any(|(specifier, matched)| *matched && index >= specifier.len())
        {
            *output += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        ARRAY_PARAMETER, Form, IndexType, ListOffsetForm, NumpyForm, PType, Parameters, RecordForm,
    };

    fn leaf(ptype: PType) -> Form {
        NumpyForm::new(ptype, vec![]).into()
    }

    fn var(content: Form) -> Form {
        ListOffsetForm::try_new(IndexType::I64, content)
            .unwrap()
            .into()
    }

    fn record(fields: &[&str], contents: Vec<Form>) -> Form {
        RecordForm::try_new(contents, Some(fields.iter().map(|f| f.to_string()).collect()))
            .unwrap()
            .into()
    }

    /// `var * {x: int64, y: {a: float64, b: var * string}}`
    fn nested() -> Form {
        let string = var(leaf(PType::UInt8))
            .with_parameters(Parameters::new().with(ARRAY_PARAMETER, "string"));
        var(record(
            &["x", "y"],
            vec![
                leaf(PType::Int64),
                record(&["a", "b"], vec![leaf(PType::Float64), var(string)]),
            ],
        ))
        .with_form_keys("node", 0)
    }

    #[test]
    fn columns() {
        assert_eq!(nested().columns(None), vec!["x", "y.a", "y.b"]);
        assert_eq!(
            nested().columns(Some("list")),
            vec!["list.x", "list.y.a", "list.y.b.list"]
        );
        assert_eq!(nested().column_types(), vec!["int64", "float64", "string"]);
    }

    #[rstest]
    #[case(&["x"], "var * {x: int64}")]
    #[case(&["y"], "var * {y: {a: float64, b: var * string}}")]
    #[case(&["y.b"], "var * {y: {b: var * string}}")]
    #[case(&["x", "y.a"], "var * {x: int64, y: {a: float64}}")]
    #[case(&["*.a"], "var * {y: {a: float64}}")]
    #[case(&["?"], "var * {x: int64, y: {a: float64, b: var * string}}")]
    #[case(&["z"], "var * {}")]
    #[case(&["x.a"], "var * {}")]
    fn select(#[case] specifiers: &[&str], #[case] expected: &str) {
        let (pruned, _) = nested().select_columns(specifiers).unwrap();
        assert_eq!(pruned.to_string(), expected);
    }

    #[test]
    fn selected_buffer_keys() {
        let (_, keys) = nested().select_columns(&["y.b"]).unwrap();
        assert_eq!(keys, vec!["node0-offsets", "node5-offsets", "node6-offsets", "node7-data"]);
    }

    #[test]
    fn tuple_fields_by_position() {
        let tuple: Form = RecordForm::try_new(vec![leaf(PType::Int64), leaf(PType::Bool)], None)
            .unwrap()
            .into();
        let (pruned, _) = tuple
            .with_form_keys("node", 0)
            .select_columns(&["1"])
            .unwrap();
        assert_eq!(pruned.to_string(), "(bool)");
    }

    #[test]
    fn select_requires_form_keys() {
        assert!(var(leaf(PType::Int64)).select_columns(&[""]).is_err());
    }
}
