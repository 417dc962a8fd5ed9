//! Naming of the buffers that back a form.

use ragged_error::{RaggedResult, ragged_err};

use crate::Form;

impl Form {
    /// A copy of this form whose nodes are keyed `{prefix}{n}`, numbered in preorder from
    /// `start`.
    pub fn with_form_keys(&self, prefix: &str, start: usize) -> Form {
        let mut form = self.clone();
        let mut next = start;
        form.assign_form_keys(prefix, &mut next);
        form
    }

    fn assign_form_keys(&mut self, prefix: &str, next: &mut usize) {
        self.set_form_key(Some(format!("{prefix}{next}")));
        *next += 1;
        for child in self.children_mut() {
            child.assign_form_keys(prefix, next);
        }
    }

    /// The name of this node's buffer holding `attribute`, e.g. `node3-offsets`.
    pub fn buffer_key(&self, attribute: &str) -> RaggedResult<String> {
        let form_key = self.form_key().ok_or_else(|| {
            ragged_err!(
                InvalidSerde: "{} has no form_key to name its {attribute} buffer",
                self.class_name()
            )
        })?;
        Ok(format!("{form_key}-{attribute}"))
    }

    /// The names of every buffer backing this form, in preorder.
    pub fn buffer_keys(&self) -> RaggedResult<Vec<String>> {
        let mut keys = vec![];
        self.collect_buffer_keys(&mut keys)?;
        Ok(keys)
    }

    fn collect_buffer_keys(&self, keys: &mut Vec<String>) -> RaggedResult<()> {
        for attribute in self.buffer_attributes() {
            keys.push(self.buffer_key(attribute)?);
        }
        self.children()
            .into_iter()
            .try_for_each(|child| child.collect_buffer_keys(keys))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Form, IndexType, ListForm, NumpyForm, PType, RecordForm, UnionForm};

    #[test]
    fn preorder_keys() {
        let form: Form = UnionForm::try_new(
            IndexType::I8,
            IndexType::I64,
            vec![
                ListForm::try_new(
                    IndexType::I32,
                    IndexType::I32,
                    NumpyForm::new(PType::Float32, vec![]).into(),
                )
                .unwrap()
                .into(),
                RecordForm::try_new(vec![NumpyForm::new(PType::Bool, vec![]).into()], None)
                    .unwrap()
                    .into(),
            ],
        )
        .unwrap()
        .into();
        let keyed = form.with_form_keys("part", 10);
        assert_eq!(keyed.form_key(), Some("part10"));
        assert_eq!(
            keyed.buffer_keys().unwrap(),
            vec![
                "part10-tags",
                "part10-index",
                "part11-starts",
                "part11-stops",
                "part12-data",
                "part14-data"
            ]
        );
    }

    #[test]
    fn missing_form_key() {
        let form: Form = NumpyForm::new(PType::Int64, vec![]).into();
        assert!(form.buffer_keys().is_err());
        assert!(form.buffer_key("data").is_err());
    }
}
