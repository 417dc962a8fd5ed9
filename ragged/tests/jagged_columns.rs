use ragged::buffer::{Buffer, buffer};
use ragged::form::Form;
use ragged::{
    BufferOptions, Content, CpuBackend, Index, IndexedOptionArray, ListOffsetArray, NumpyArray,
    RecordArray, RegularArray, from_buffers, from_regular_all, to_buffers,
};
use serde_json::json;

fn events() -> Content {
    let hits: Content = ListOffsetArray::try_new(
        Index::from(vec![0i64, 2, 2, 5]),
        NumpyArray::new(buffer![0.1f64, 0.2, 0.3, 0.4, 0.5]).into(),
    )
    .unwrap()
    .into();
    let position: Content =
        RegularArray::try_new(NumpyArray::new(Buffer::from_iter(0i32..9)).into(), 3, 0)
            .unwrap()
            .into();
    let trigger: Content = IndexedOptionArray::try_new(
        Index::from(vec![0i64, -1, 1]),
        NumpyArray::from_bools([true, false]).into(),
    )
    .unwrap()
    .into();
    RecordArray::try_new(
        vec![hits, position, trigger],
        Some(vec!["hits".into(), "position".into(), "trigger".into()]),
        None,
    )
    .unwrap()
    .into()
}

#[test]
fn flatten_ship_and_rebuild() {
    let irregular = from_regular_all(&events(), &CpuBackend).unwrap();
    assert_eq!(
        irregular.to_string(),
        "3 * {hits: var * float64, position: var * int32, trigger: ?bool}"
    );

    let out = to_buffers(&irregular, &BufferOptions::default(), &CpuBackend).unwrap();
    let form = Form::from_json(&out.form.to_json().unwrap()).unwrap();
    let back = from_buffers(&form, out.length, &out.buffers, &CpuBackend).unwrap();

    assert_eq!(back.form(), irregular.form());
    assert_eq!(
        back.to_json().unwrap(),
        vec![
            json!({"hits": [0.1, 0.2], "position": [0, 1, 2], "trigger": true}),
            json!({"hits": [], "position": [3, 4, 5], "trigger": null}),
            json!({"hits": [0.3, 0.4, 0.5], "position": [6, 7, 8], "trigger": false}),
        ]
    );
}
