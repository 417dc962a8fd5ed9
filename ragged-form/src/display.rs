use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::Form;

/// Quote a field name unless it is a plain identifier.
fn field_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    }
}

impl Display for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Form::Numpy(n) => {
                for dim in n.inner_shape() {
                    write!(f, "{dim} * ")?;
                }
                write!(f, "{}", n.primitive())
            }
            Form::Regular(r) => write!(f, "{} * {}", r.size(), r.content()),
            Form::ListOffset(_) | Form::List(_) => match self.parameters().array() {
                Some("string") => write!(f, "string"),
                Some("bytestring") => write!(f, "bytes"),
                _ => write!(f, "var * {}", self.children()[0]),
            },
            Form::Indexed(i) => write!(f, "{}", i.content()),
            Form::IndexedOption(_) | Form::ByteMasked(_) | Form::BitMasked(_) => {
                let content = self.children()[0];
                let is_dimension = content.is_list()
                    || matches!(content, Form::Numpy(n) if !n.inner_shape().is_empty());
                if is_dimension {
                    write!(f, "option[{content}]")
                } else {
                    write!(f, "?{content}")
                }
            }
            Form::Union(u) => write!(f, "union[{}]", u.contents().iter().join(", ")),
            Form::Record(r) => {
                let items = match r.field_names() {
                    None => r.contents().iter().map(|c| c.to_string()).collect_vec(),
                    Some(fields) => fields
                        .iter()
                        .zip(r.contents())
                        .map(|(name, c)| format!("{}: {}", field_name(name), c))
                        .collect_vec(),
                };
                match (self.parameters().record(), r.is_tuple()) {
                    (Some(name), _) => write!(f, "{}[{}]", name, items.join(", ")),
                    (None, true) => write!(f, "({})", items.join(", ")),
                    (None, false) => write!(f, "{{{}}}", items.join(", ")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{
        ARRAY_PARAMETER, BitMaskedForm, Form, IndexType, IndexedOptionForm, ListOffsetForm,
        NumpyForm, PType, Parameters, RECORD_PARAMETER, RecordForm, RegularForm, UnionForm,
    };

    fn leaf(ptype: PType) -> Form {
        NumpyForm::new(ptype, vec![]).into()
    }

    fn var(content: Form) -> Form {
        ListOffsetForm::try_new(IndexType::I64, content)
            .unwrap()
            .into()
    }

    fn string() -> Form {
        var(leaf(PType::UInt8)).with_parameters(Parameters::new().with(ARRAY_PARAMETER, "string"))
    }

    #[rstest]
    #[case(var(leaf(PType::Int64)), "var * int64")]
    #[case(RegularForm::new(leaf(PType::Float64), 3).into(), "3 * float64")]
    #[case(NumpyForm::new(PType::Int32, vec![3, 0]).into(), "3 * 0 * int32")]
    #[case(
        IndexedOptionForm::try_new(IndexType::I64, leaf(PType::Int64)).unwrap().into(),
        "?int64"
    )]
    #[case(
        BitMaskedForm::try_new(IndexType::U8, var(leaf(PType::Int64)), true, true).unwrap().into(),
        "option[var * int64]"
    )]
    #[case(var(string()), "var * string")]
    #[case(
        RecordForm::try_new(vec![leaf(PType::Int64), leaf(PType::Bool)], None).unwrap().into(),
        "(int64, bool)"
    )]
    #[case(
        RecordForm::try_new(vec![leaf(PType::Int64), string()], Some(vec!["x".into(), "first name".into()]))
            .unwrap()
            .into(),
        "{x: int64, \"first name\": string}"
    )]
    #[case(
        UnionForm::try_new(IndexType::I8, IndexType::I64, vec![leaf(PType::Int64), string()]).unwrap().into(),
        "union[int64, string]"
    )]
    fn type_strings(#[case] form: Form, #[case] expected: &str) {
        assert_eq!(form.to_string(), expected);
    }

    #[test]
    fn named_record() {
        let form = Form::from(
            RecordForm::try_new(vec![leaf(PType::Float64)], Some(vec!["x".into()])).unwrap(),
        )
        .with_parameters(Parameters::new().with(RECORD_PARAMETER, "Point"));
        assert_eq!(form.to_string(), "Point[x: float64]");
    }
}
