use ragged_array::{
    BufferOptions, Content, CpuBackend, Index, ListOffsetArray, NumpyArray, RecordArray,
    ToBuffers, from_buffers, to_buffers,
};
use ragged_buffer::{ByteBuffer, buffer};
use ragged_form::{Form, PType};
use serde_json::json;

fn round_trip(content: &Content) -> Content {
    let ToBuffers {
        form,
        length,
        buffers,
    } = to_buffers(content, &BufferOptions::default(), &CpuBackend).unwrap();
    from_buffers(&form, length, &buffers, &CpuBackend).unwrap()
}

#[test]
fn empty_inner_dimension_survives() {
    let array: Content = NumpyArray::try_new(ByteBuffer::empty(), PType::Int32, vec![3, 0])
        .unwrap()
        .into();
    let back = round_trip(&array);
    assert_eq!(back.to_json().unwrap(), vec![json!([]), json!([]), json!([])]);
    assert_eq!(back.to_string(), "3 * 0 * int32");
}

#[test]
fn form_travels_as_json() {
    let list: Content = ListOffsetArray::try_new(
        Index::from(vec![0i64, 3, 3, 5]),
        NumpyArray::new(buffer![1.1f64, 2.2, 3.3, 4.4, 5.5]).into(),
    )
    .unwrap()
    .into();
    let out = to_buffers(&list, &BufferOptions::default(), &CpuBackend).unwrap();
    let form = Form::from_json(&out.form.to_json().unwrap()).unwrap();
    let back = from_buffers(&form, out.length, &out.buffers, &CpuBackend).unwrap();
    assert_eq!(
        back.to_json().unwrap(),
        vec![json!([1.1, 2.2, 3.3]), json!([]), json!([4.4, 5.5])]
    );
}

#[test]
fn selected_columns_read_only_their_buffers() {
    let record: Content = RecordArray::try_new(
        vec![
            NumpyArray::new(buffer![1i32, 2, 3]).into(),
            ListOffsetArray::try_new(
                Index::from(vec![0i32, 1, 1, 2]),
                NumpyArray::new(buffer![0.5f32, 1.5]).into(),
            )
            .unwrap()
            .into(),
        ],
        Some(vec!["id".to_string(), "hits".to_string()]),
        None,
    )
    .unwrap()
    .into();
    let out = to_buffers(&record, &BufferOptions::default(), &CpuBackend).unwrap();
    let (pruned, keys) = out.form.select_columns(&["id"]).unwrap();
    assert_eq!(keys, vec!["node1-data".to_string()]);

    let partial = out
        .buffers
        .into_iter()
        .filter(|(key, _)| keys.contains(key))
        .collect();
    let back = from_buffers(&pruned, out.length, &partial, &CpuBackend).unwrap();
    assert_eq!(
        back.to_json().unwrap(),
        vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
    );
}
