//! JSON (de)serialization of forms.

use ragged_error::{RaggedResult, RaggedError};
use serde_json::Value;

use crate::Form;

impl Form {
    /// Serialize this form as a JSON string.
    pub fn to_json(&self) -> RaggedResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize this form as a JSON value.
    pub fn to_json_value(&self) -> RaggedResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a form from a JSON string, validating it as the constructors would.
    pub fn from_json(json: &str) -> RaggedResult<Self> {
        let form: Form = serde_json::from_str(json)?;
        form.validate()
            .map_err(|e: RaggedError| e.with_context("invalid form"))?;
        Ok(form)
    }

    /// Parse a form from a JSON value, validating it as the constructors would.
    pub fn from_json_value(json: Value) -> RaggedResult<Self> {
        let form: Form = serde_json::from_value(json)?;
        form.validate()
            .map_err(|e: RaggedError| e.with_context("invalid form"))?;
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        ARRAY_PARAMETER, BitMaskedForm, Form, IndexType, ListOffsetForm, NumpyForm, PType,
        Parameters, RecordForm, RegularForm,
    };

    #[test]
    fn serialized_layout() {
        let form: Form = ListOffsetForm::try_new(
            IndexType::I64,
            RecordForm::try_new(
                vec![
                    NumpyForm::new(PType::Int32, vec![2]).into(),
                    RegularForm::new(NumpyForm::new(PType::Float64, vec![]).into(), 3).into(),
                ],
                None,
            )
            .unwrap()
            .into(),
        )
        .unwrap()
        .into();
        let keyed = form.with_form_keys("node", 0);
        assert_eq!(
            keyed.to_json_value().unwrap(),
            json!({
                "class": "ListOffsetArray",
                "offsets": "i64",
                "form_key": "node0",
                "content": {
                    "class": "RecordArray",
                    "fields": null,
                    "form_key": "node1",
                    "contents": [
                        {"class": "NumpyArray", "primitive": "int32", "inner_shape": [2], "form_key": "node2"},
                        {
                            "class": "RegularArray",
                            "size": 3,
                            "form_key": "node3",
                            "content": {"class": "NumpyArray", "primitive": "float64", "inner_shape": [], "form_key": "node4"}
                        }
                    ]
                }
            })
        );
        let parsed = Form::from_json(&keyed.to_json().unwrap()).unwrap();
        assert_eq!(parsed, keyed);
    }

    #[test]
    fn parameters_survive() {
        let form: Form = BitMaskedForm::try_new(
            IndexType::U8,
            NumpyForm::new(PType::UInt8, vec![]).into(),
            false,
            true,
        )
        .unwrap()
        .into();
        let form = form.with_parameters(Parameters::new().with(ARRAY_PARAMETER, "categorical"));
        let parsed = Form::from_json(&form.to_json().unwrap()).unwrap();
        assert_eq!(parsed.parameters(), form.parameters());
        assert_eq!(parsed.to_string(), "?uint8");
    }

    #[test]
    fn optional_fields_default() {
        let parsed = Form::from_json(r#"{"class": "NumpyArray", "primitive": "bool"}"#).unwrap();
        assert_eq!(parsed, Form::from(NumpyForm::new(PType::Bool, vec![])));
    }

    #[test]
    fn rejects_invalid_index_kinds() {
        let err = Form::from_json(
            r#"{"class": "IndexedOptionArray", "index": "u32",
                "content": {"class": "NumpyArray", "primitive": "int64"}}"#,
        )
        .unwrap_err();
        assert!(
            err.to_string()
                .starts_with("invalid form: expected type: IndexedOptionArray index of kind i32|i64")
        );

        let err = Form::from_json(
            r#"{"class": "ByteMaskedArray", "mask": "u8", "valid_when": true,
                "content": {"class": "NumpyArray", "primitive": "int64"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ByteMaskedArray mask of kind i8"), "{err}");

        let err = Form::from_json(
            r#"{"class": "RecordArray", "fields": ["x", "y"],
                "contents": [{"class": "NumpyArray", "primitive": "int64"}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_overflowing_inner_shape() {
        let err = Form::from_json(
            r#"{"class": "NumpyArray", "primitive": "int8", "inner_shape": [4294967296, 4294967296]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn rejects_unknown_classes() {
        assert!(Form::from_json(r#"{"class": "EmptyArray"}"#).is_err());
        assert!(Form::from_json(r#"{"class": "NumpyArray", "primitive": "complex64"}"#).is_err());
    }
}
