#![allow(missing_docs)]

use varmem::var::{
	ArrayValue, Command, CommandParser, DataType, Field, HeapMemory, ScalarValue, Structure, StructureWatcher, VarError, VarStore, field_for,
};

fn sensor_structure() -> Structure {
	Structure::new(
		7,
		"Sensor",
		vec![
			field_for::<u32>("seq"),
			field_for::<f64>("value"),
			Field::array(DataType::Float32, "history").expect("field builds"),
		],
	)
}

#[test]
fn registered_updates_flow_into_a_store() {
	let mut sender = sensor_structure();
	let mut parser = CommandParser::new();

	let registered = parser.handle(&sender.register_command()).expect("registration parses");
	let Command::Registered(structure) = registered else {
		panic!("expected registration, got {registered:?}");
	};
	assert!(structure.same_shape(&sender));

	let memory = HeapMemory::new("Sensor", 0x400);
	let store = VarStore::create(memory.clone(), structure.clone()).expect("store lays out");
	let mut watcher = StructureWatcher::new(store);
	assert_eq!(watcher.check_for_changes().expect("check succeeds").len(), 3);

	sender.fields[0] = sender.fields[0].with_scalar(ScalarValue::U32(1)).expect("value matches");
	sender.fields[2] = sender.fields[2]
		.with_array(ArrayValue::Values(vec![ScalarValue::F32(0.25), ScalarValue::F32(0.5)]))
		.expect("value matches");

	let update = parser.handle(&sender.update_command().expect("update encodes")).expect("update parses");
	assert_eq!(update.structure_id(), 7);
	let payload = update.payload().expect("update carries values");

	let mut writer = VarStore::attach(memory, structure).expect("writer attaches");
	writer.write_payload(&payload).expect("payload writes");

	let changes = watcher.check_for_changes().expect("check succeeds");
	assert_eq!(changes.names().collect::<Vec<_>>(), vec!["seq", "history"]);
	assert_eq!(changes.get("history"), Some(&sender.fields[2]));
}

#[test]
fn updates_for_unknown_ids_are_reported() {
	let mut parser = CommandParser::new();
	let sender = sensor_structure();

	let command = parser.handle(&sender.update_command().expect("update encodes")).expect("message parses");
	assert_eq!(command, Command::UnknownId(7));
	assert!(command.payload().is_none());
	assert!(matches!(parser.handle(&[1, 0]), Err(VarError::MessageTooShort { len: 2 })));
}
