use crate::var::bytes::Cursor;
use crate::var::{ArrayValue, DataType, Field, ScalarValue, VarError};

#[test]
fn scalar_schema_bytes_are_tag_then_name() {
	let field = Field::scalar(DataType::Int32, "vInt32").expect("field builds");
	assert_eq!(field.schema_bytes(), b"\x03\x00\x00\x00vInt32\0");
}

#[test]
fn array_schema_bytes_carry_element_tag() {
	let field = Field::array(DataType::Int32, "a").expect("field builds");
	assert_eq!(field.schema_bytes(), [17, 0, 0, 0, 3, 0, 0, 0, b'a', 0]);
}

#[test]
fn nested_array_is_rejected() {
	let err = Field::array(DataType::Array, "nested").expect_err("nested array");
	assert!(matches!(err, VarError::NestedArray { ref name } if name == "nested"));
}

#[test]
fn scalar_cannot_be_declared_as_array_type() {
	let err = Field::scalar(DataType::Array, "bad").expect_err("array is not scalar");
	assert!(matches!(err, VarError::UnsupportedType { tag: 17 }));
}

#[test]
fn absent_values_encode_as_defaults() {
	let scalar = Field::scalar(DataType::UInt16, "u").expect("field builds").cleared();
	assert_eq!(scalar.value_bytes().expect("encodes"), [0, 0]);

	let array = Field::array(DataType::Float64, "d").expect("field builds").cleared();
	assert_eq!(array.value_bytes().expect("encodes"), [0, 0, 0, 0]);
}

#[test]
fn byte_array_value_is_count_then_raw_bytes() {
	let field = Field::text("s", "testString😀");
	let bytes = field.value_bytes().expect("encodes");
	assert_eq!(&bytes[..4], &[0x0E, 0, 0, 0]);
	assert_eq!(&bytes[4..], "testString😀".as_bytes());
}

#[test]
fn typed_array_value_is_count_then_elements() {
	let field = Field::array(DataType::Int32, "arr")
		.expect("field builds")
		.with_array(ArrayValue::Values(vec![ScalarValue::I32(1), ScalarValue::I32(2), ScalarValue::I32(3)]))
		.expect("value fits");
	assert_eq!(
		field.value_bytes().expect("encodes"),
		[3, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
	);
}

#[test]
fn read_value_consumes_exactly_one_field() {
	let template = Field::array(DataType::Int16, "arr").expect("field builds");
	let bytes = [2, 0, 0, 0, 0xFF, 0xFF, 0x07, 0x00, 0xAA];
	let mut cursor = Cursor::new(&bytes);

	let updated = template.read_value(&mut cursor).expect("decodes");
	assert_eq!(cursor.remaining(), 1);

	let Field::Array(array) = updated else {
		panic!("expected array field");
	};
	assert_eq!(array.value, Some(ArrayValue::Values(vec![ScalarValue::I16(-1), ScalarValue::I16(7)])));
}

#[test]
fn read_value_keeps_uint8_arrays_as_bytes() {
	let template = Field::array(DataType::UInt8, "s").expect("field builds");
	let bytes = [3, 0, 0, 0, b'a', b'b', b'c'];
	let updated = template.read_value(&mut Cursor::new(&bytes)).expect("decodes");

	let Field::Array(array) = updated else {
		panic!("expected array field");
	};
	assert_eq!(array.value, Some(ArrayValue::Bytes(b"abc".to_vec())));
}

#[test]
fn read_value_rejects_counts_beyond_input() {
	let template = Field::array(DataType::Int64, "arr").expect("field builds");
	let bytes = [2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];
	let err = template.read_value(&mut Cursor::new(&bytes)).expect_err("count exceeds input");
	assert!(matches!(err, VarError::UnexpectedEof { need: 16, rem: 8, .. }));
}

#[test]
fn read_value_rejects_negative_counts() {
	let template = Field::array(DataType::Int8, "arr").expect("field builds");
	let bytes = (-1_i32).to_le_bytes();
	let err = template.read_value(&mut Cursor::new(&bytes)).expect_err("negative count");
	assert!(matches!(err, VarError::NegativeLength { len: -1 }));
}

#[test]
fn with_scalar_checks_declared_type() {
	let field = Field::scalar(DataType::Int32, "i").expect("field builds");
	let err = field.with_scalar(ScalarValue::U32(1)).expect_err("kind mismatch");
	assert!(matches!(err, VarError::ValueTypeMismatch { expected: "int32", got: "uint32", .. }));
}

#[test]
fn array_comparison_is_elementwise() {
	let base = Field::array(DataType::Int32, "a").expect("field builds");
	let values = |items: &[i32]| {
		base.with_array(ArrayValue::Values(items.iter().copied().map(ScalarValue::I32).collect()))
			.expect("value fits")
	};

	assert!(values(&[1, 2, 3]).same_value(&values(&[1, 2, 3])));
	assert!(!values(&[1, 2, 3]).same_value(&values(&[1, 2, 3, 4])));
	assert!(!values(&[1, 2, 3]).same_value(&values(&[1, 2])));
	assert!(!values(&[1, 2, 3]).same_value(&values(&[1, 9, 3])));
}

#[test]
fn display_renders_type_name_and_value() {
	let field = Field::scalar(DataType::Int32, "x")
		.expect("field builds")
		.with_scalar(ScalarValue::I32(-4))
		.expect("value fits");
	assert_eq!(field.to_string(), "int32 x = -4");
	assert_eq!(Field::text("s", "hi").to_string(), "uint8[] s = \"hi\"");
}

#[test]
fn array_count_rejects_lengths_beyond_i32() {
	assert_eq!(super::array_count("xs", 3).expect("count fits"), 3);
	assert_eq!(super::array_count("xs", i32::MAX as usize).expect("count fits"), i32::MAX);

	let err = super::array_count("xs", i32::MAX as usize + 1).expect_err("count overflows");
	assert!(matches!(err, VarError::ArrayTooLong { ref name, len } if name == "xs" && len == i32::MAX as usize + 1));
	assert!(!err.to_string().contains("negative"));
}
