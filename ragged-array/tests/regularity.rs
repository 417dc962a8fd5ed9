use ragged_array::{
    Content, CpuBackend, Index, ListOffsetArray, NumpyArray, RecordArray, RegularArray,
    ToRegularPolicy, from_regular, from_regular_all, to_regular,
};
use ragged_buffer::{Buffer, ByteBuffer};
use ragged_form::{ARRAY_PARAMETER, Parameters};
use rstest::rstest;
use serde_json::{Value, json};

fn mixed() -> Content {
    let pairs: Content =
        RegularArray::try_new(NumpyArray::new(Buffer::from_iter(0i16..6)).into(), 2, 0)
            .unwrap()
            .into();
    let ragged: Content = ListOffsetArray::try_new(
        Index::from(vec![0i64, 1, 1, 4]),
        NumpyArray::new(Buffer::from_iter(10u32..14)).into(),
    )
    .unwrap()
    .into();
    let codes: Content =
        RegularArray::try_new(NumpyArray::new(ByteBuffer::from(b"abcdefghi".to_vec())).into(), 3, 0)
            .unwrap()
            .with_parameters(Parameters::new().with(ARRAY_PARAMETER, "bytestring"))
            .into();
    RecordArray::try_new(
        vec![pairs, ragged, codes],
        Some(vec!["pairs".into(), "ragged".into(), "codes".into()]),
        None,
    )
    .unwrap()
    .into()
}

#[test]
fn record_fields_convert_independently() {
    let out = from_regular(&mixed(), 1, &CpuBackend).unwrap();
    let Content::Record(record) = &out else {
        panic!("expected a record, got {}", out.class_name());
    };
    assert_eq!(record.content("pairs").unwrap().class_name(), "ListOffsetArray");
    assert_eq!(record.content("ragged").unwrap().class_name(), "ListOffsetArray");
    assert_eq!(record.content("codes").unwrap().class_name(), "RegularArray");
    assert_eq!(out.to_json().unwrap(), mixed().to_json().unwrap());
}

#[test]
fn from_regular_is_idempotent() {
    let once = from_regular(&mixed(), 1, &CpuBackend).unwrap();
    let twice = from_regular(&once, 1, &CpuBackend).unwrap();
    assert_eq!(once.form(), twice.form());
    assert_eq!(once.to_json().unwrap(), twice.to_json().unwrap());
}

#[test]
fn branching_depth_has_no_innermost_axis() {
    let err = from_regular(&mixed(), -1, &CpuBackend).unwrap_err();
    assert!(err.is_axis_error(), "{err}");
    assert!(err.to_string().contains("branches between 1 and 2"), "{err}");
    let err = to_regular(&mixed(), -1, ToRegularPolicy::Fail, &CpuBackend).unwrap_err();
    assert!(err.is_axis_error(), "{err}");
}

fn lists(offsets: Vec<i64>, content_len: i64) -> Content {
    ListOffsetArray::try_new(
        Index::from(offsets),
        NumpyArray::new(Buffer::from_iter(0i64..content_len)).into(),
    )
    .unwrap()
    .into()
}

#[rstest]
#[case::content_past_last_offset(lists(vec![0, 2, 4], 10), json!([[0, 1], [2, 3]]))]
#[case::offsets_start_late(lists(vec![2, 4, 6], 6), json!([[2, 3], [4, 5]]))]
#[case::both(lists(vec![3, 5, 7], 10), json!([[3, 4], [5, 6]]))]
fn to_regular_reads_only_listed_content(#[case] list: Content, #[case] expected: Value) {
    let regular = to_regular(&list, 1, ToRegularPolicy::Fail, &CpuBackend).unwrap();
    assert_eq!(regular.to_string(), "2 * 2 * int64");
    assert_eq!(Value::from(regular.to_json().unwrap()), expected);

    let Content::Regular(inner) = &regular else {
        panic!("expected a RegularArray, got {}", regular.class_name());
    };
    assert_eq!(inner.content().len(), 4);

    let back = from_regular(&regular, 1, &CpuBackend).unwrap();
    assert_eq!(back.to_string(), "2 * var * int64");
    assert_eq!(Value::from(back.to_json().unwrap()), expected);
}

#[rstest]
#[case::content_past_last_list(
    RegularArray::try_with_length(NumpyArray::new(Buffer::from_iter(0i64..10)).into(), 2, 2)
        .unwrap()
        .into(),
    1,
    json!([[0, 1], [2, 3]])
)]
#[case::outer_offsets_start_late(
    ListOffsetArray::try_new(
        Index::from(vec![1i64, 3]),
        RegularArray::try_new(NumpyArray::new(Buffer::from_iter(0i64..10)).into(), 2, 0)
            .unwrap()
            .into(),
    )
    .unwrap()
    .into(),
    2,
    json!([[[2, 3], [4, 5]]])
)]
fn from_regular_reads_only_listed_content(
    #[case] content: Content,
    #[case] axis: i64,
    #[case] expected: Value,
) {
    let out = from_regular(&content, axis, &CpuBackend).unwrap();
    assert_eq!(Value::from(out.to_json().unwrap()), expected);
    assert_eq!(out.len(), content.len());

    let back = to_regular(&out, axis, ToRegularPolicy::Fail, &CpuBackend).unwrap();
    assert_eq!(back.form(), content.form());
    assert_eq!(Value::from(back.to_json().unwrap()), expected);
}

#[test]
fn regular_round_trip_keeps_values() {
    let irregular = from_regular_all(&mixed(), &CpuBackend).unwrap();
    let err = to_regular(&irregular, 1, ToRegularPolicy::Fail, &CpuBackend).unwrap_err();
    assert!(err.to_string().starts_with("lists at axis=1 do not all have the same length"));

    let back = to_regular(&irregular, 1, ToRegularPolicy::LeaveIrregular, &CpuBackend).unwrap();
    let Content::Record(record) = &back else {
        panic!("expected a record, got {}", back.class_name());
    };
    assert_eq!(record.content("pairs").unwrap().to_string(), "3 * 2 * int16");
    assert_eq!(record.content("ragged").unwrap().to_string(), "3 * var * uint32");
    assert_eq!(
        back.value_at(2).unwrap(),
        json!({"pairs": [4, 5], "ragged": [11, 12, 13], "codes": "ghi"})
    );
}
