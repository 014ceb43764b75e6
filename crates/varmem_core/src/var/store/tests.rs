use crate::var::{
	ArrayValue, CONTENT_HEADER_LEN, DataType, Field, HeapMemory, MemoryLayout, Payload, ScalarValue, SharedMemory, Structure, VarError, VarStore,
};

const CAPACITY: usize = 0x1000;

fn sample_structure() -> Structure {
	Structure::local(
		"",
		vec![
			Field::scalar(DataType::UInt16, "vUInt16").expect("field builds"),
			Field::scalar(DataType::Int32, "vInt32").expect("field builds"),
			Field::scalar(DataType::Int64, "vInt64").expect("field builds"),
			Field::scalar(DataType::Float64, "vFloat64").expect("field builds"),
			Field::array(DataType::UInt8, "vString").expect("field builds"),
			Field::array(DataType::Int32, "vInt32Arr").expect("field builds"),
		],
	)
}

fn sample_values(structure: &Structure) -> Vec<Field> {
	let f = &structure.fields;
	vec![
		f[0].with_scalar(ScalarValue::U16(2)).expect("value fits"),
		f[1].with_scalar(ScalarValue::I32(-2)).expect("value fits"),
		f[2].with_scalar(ScalarValue::I64(0x7F_FFFF_FF12)).expect("value fits"),
		f[3].with_scalar(ScalarValue::F64(1.234_567_89)).expect("value fits"),
		f[4].with_array(ArrayValue::from("testString😀")).expect("value fits"),
		f[5].with_array(ArrayValue::Values(vec![ScalarValue::I32(1), ScalarValue::I32(2), ScalarValue::I32(3)]))
			.expect("value fits"),
	]
}

#[test]
fn create_writes_header_schema_padding_and_default_content() {
	let memory = HeapMemory::new("test", CAPACITY);
	let structure = sample_structure();
	let store = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");

	let schema = structure.schema_bytes();
	assert_eq!(&schema[..5], &[0xFF, 0xFF, 0xFF, 0xFF, 0x00], "local id then empty name");

	let offset = store.content_offset();
	assert_eq!(offset, 112);
	assert_eq!(offset % 16, 0);

	let bytes = memory.snapshot();
	assert_eq!(&bytes[0..8], &(offset as i64).to_le_bytes());
	assert_eq!(&bytes[8..16], &(schema.len() as i64).to_le_bytes());
	assert_eq!(&bytes[16..16 + schema.len()], schema.as_slice());
	assert!(bytes[16 + schema.len()..offset].iter().all(|byte| *byte == 0), "padding is zeroed");

	let default_content_len: i64 = 2 + 4 + 8 + 8 + 4 + 4;
	assert_eq!(&bytes[offset..offset + 8], &default_content_len.to_le_bytes());
	assert!(bytes[offset + 8..].iter().all(|byte| *byte == 0), "default values are zero");
}

#[test]
fn write_produces_packed_content_region() {
	let memory = HeapMemory::new("test", CAPACITY);
	let structure = sample_structure();
	let mut store = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");

	store.write_fields(&sample_values(&structure)).expect("content fits");

	let mut expected = vec![0x38, 0, 0, 0, 0, 0, 0, 0];
	expected.extend_from_slice(&[0x02, 0x00]);
	expected.extend_from_slice(&[0xFE, 0xFF, 0xFF, 0xFF]);
	expected.extend_from_slice(&[0x12, 0xFF, 0xFF, 0xFF, 0x7F, 0x00, 0x00, 0x00]);
	expected.extend_from_slice(&[0x1B, 0xDE, 0x83, 0x42, 0xCA, 0xC0, 0xF3, 0x3F]);
	expected.extend_from_slice(&[0x0E, 0, 0, 0]);
	expected.extend_from_slice("testString😀".as_bytes());
	expected.extend_from_slice(&[3, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]);

	let offset = store.content_offset();
	assert_eq!(&memory.snapshot()[offset..offset + expected.len()], expected.as_slice());
}

#[test]
fn second_handle_reads_written_values() {
	let memory = HeapMemory::new("test", CAPACITY);
	let structure = sample_structure();
	let mut writer = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");
	let reader = VarStore::attach(memory.clone(), structure.clone()).expect("layout matches");

	let values = sample_values(&structure);
	writer.write_fields(&values).expect("content fits");

	let payload = reader.read().expect("content decodes");
	assert_eq!(payload.len(), 6);
	assert_eq!(payload.structure_id, -1);
	for field in &values {
		assert_eq!(payload.get(field.name()), Some(field), "field {}", field.name());
	}
}

#[test]
fn open_without_type_reconstructs_structure() {
	let memory = HeapMemory::new("test", CAPACITY);
	let structure = sample_structure();
	let created = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");

	let opened = VarStore::open_without_type(memory.clone()).expect("schema parses");
	assert_eq!(opened.structure(), &structure);
	assert_eq!(opened.content_offset(), created.content_offset());
	assert_eq!(opened.read().expect("content decodes"), Payload::from_structure(&structure));
}

#[test]
fn open_without_type_keeps_trailing_empty_boolean_field() {
	let memory = HeapMemory::new("flags", CAPACITY);
	let structure = Structure::new(
		5,
		"Flags",
		vec![
			Field::scalar(DataType::Boolean, "a").expect("field builds"),
			Field::scalar(DataType::Boolean, "").expect("field builds"),
		],
	);
	VarStore::create(memory.clone(), structure.clone()).expect("layout fits");

	let opened = VarStore::open_without_type(memory).expect("schema parses");
	assert_eq!(opened.structure(), &structure);
}

#[test]
fn open_without_type_falls_back_when_schema_length_is_unrecorded() {
	let mut memory = HeapMemory::new("legacy", CAPACITY);
	let structure = Structure::new(3, "Legacy", vec![Field::scalar(DataType::Int32, "value").expect("field builds")]);
	VarStore::create(memory.clone(), structure.clone()).expect("layout fits");
	memory.write(8, &[0; 8]).expect("clear schema length");

	let opened = VarStore::open_without_type(memory).expect("schema parses");
	assert_eq!(opened.structure(), &structure);
}

fn open_with_cleared_schema_length(name: &str, structure: &Structure) -> crate::var::Result<VarStore<HeapMemory>> {
	let mut memory = HeapMemory::new(name, CAPACITY);
	VarStore::create(memory.clone(), structure.clone()).expect("layout fits");
	memory.write(8, &[0; 8]).expect("clear schema length");
	VarStore::open_without_type(memory)
}

#[test]
fn unrecorded_schema_length_keeps_trailing_empty_named_fields() {
	let scalar_tail = Structure::local(
		"",
		vec![
			Field::scalar(DataType::Int32, "a").expect("field builds"),
			Field::scalar(DataType::UInt16, "").expect("field builds"),
		],
	);
	let opened = open_with_cleared_schema_length("scalar-tail", &scalar_tail).expect("schema parses");
	assert_eq!(opened.structure(), &scalar_tail);

	let array_tail = Structure::local(
		"tail",
		vec![
			Field::scalar(DataType::Boolean, "a").expect("field builds"),
			Field::array(DataType::Boolean, "").expect("field builds"),
		],
	);
	let opened = open_with_cleared_schema_length("array-tail", &array_tail).expect("schema parses");
	assert_eq!(opened.structure(), &array_tail);
	assert_eq!(opened.read().expect("content decodes"), Payload::from_structure(&array_tail));
}

#[test]
fn unrecorded_schema_length_treats_all_zero_tail_as_padding() {
	let structure = Structure::local("", vec![Field::scalar(DataType::Boolean, "").expect("field builds")]);
	let opened = open_with_cleared_schema_length("zero-tail", &structure).expect("schema parses");
	assert_eq!(opened.structure().id, -1);
	assert!(opened.structure().fields.is_empty());
}

#[test]
fn open_without_type_rejects_blank_region() {
	let memory = HeapMemory::new("blank", CAPACITY);
	let err = VarStore::open_without_type(memory).expect_err("no layout");
	assert!(matches!(err, VarError::InvalidContentOffset { offset: 0, .. }));
}

#[test]
fn create_fails_before_writing_when_layout_exceeds_capacity() {
	let memory = HeapMemory::new("tiny", 32);
	let err = VarStore::create(memory.clone(), sample_structure()).expect_err("too small");
	assert!(matches!(err, VarError::CapacityExceeded { capacity: 32, .. }));
	assert!(memory.snapshot().iter().all(|byte| *byte == 0));
}

#[test]
fn write_fails_before_writing_when_content_exceeds_capacity() {
	let structure = Structure::local("big", vec![Field::array(DataType::UInt8, "blob").expect("field builds")]);
	let layout = MemoryLayout::for_structure(&structure);
	let capacity = layout.content_offset + CONTENT_HEADER_LEN + 4 + 8;
	let memory = HeapMemory::new("big", capacity);
	let mut store = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");
	let before = memory.snapshot();

	let blob = structure.fields[0].with_array(ArrayValue::Bytes(vec![7; 9])).expect("value fits");
	let err = store.write_fields(&[blob]).expect_err("content too large");
	assert!(matches!(err, VarError::CapacityExceeded { .. }));
	assert_eq!(memory.snapshot(), before, "all-or-nothing write");

	let blob = structure.fields[0].with_array(ArrayValue::Bytes(vec![7; 8])).expect("value fits");
	store.write_fields(&[blob]).expect("exactly fits");
}

#[test]
fn write_rejects_fields_out_of_order() {
	let structure = sample_structure();
	let mut store = VarStore::create(HeapMemory::new("test", CAPACITY), structure.clone()).expect("layout fits");

	let mut values = sample_values(&structure);
	values.swap(0, 1);
	let err = store.write_fields(&values).expect_err("order mismatch");
	assert!(matches!(err, VarError::FieldShapeMismatch { index: 0, .. }));
}

#[test]
fn write_payload_merges_with_stored_values() {
	let memory = HeapMemory::new("test", CAPACITY);
	let structure = sample_structure();
	let mut store = VarStore::create(memory.clone(), structure.clone()).expect("layout fits");
	let values = sample_values(&structure);
	store.write_fields(&values).expect("content fits");

	let longer = structure.fields[4].with_array(ArrayValue::from("a much longer string")).expect("value fits");
	let mut payload = Payload::new(structure.id);
	payload.insert(longer.clone());
	store.write_payload(&payload).expect("merge fits");

	let read = store.read().expect("content decodes");
	assert_eq!(read.get("vString"), Some(&longer));
	for field in values.iter().filter(|field| field.name() != "vString") {
		assert_eq!(read.get(field.name()), Some(field), "untouched field {}", field.name());
	}
}

#[test]
fn write_payload_rejects_unknown_and_mistyped_fields() {
	let structure = sample_structure();
	let mut store = VarStore::create(HeapMemory::new("test", CAPACITY), structure).expect("layout fits");

	let mut payload = Payload::new(-1);
	payload.insert(Field::scalar(DataType::Int8, "missing").expect("field builds"));
	let err = store.write_payload(&payload).expect_err("unknown field");
	assert!(matches!(err, VarError::FieldNotFound { .. }));

	let mut payload = Payload::new(-1);
	payload.insert(Field::scalar(DataType::Int8, "vUInt16").expect("field builds"));
	let err = store.write_payload(&payload).expect_err("mistyped field");
	assert!(matches!(err, VarError::FieldShapeMismatch { index: 0, .. }));
}
