#![allow(missing_docs)]

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use varmem_testkit::scratch_dir;

#[test]
fn create_schema_set_dump_round() {
	let dir = scratch_dir();

	let created = run_json(
		dir.path(),
		&["create", "robot", "--field", "int32:x", "--field", "float64:speed", "--field", "uint8[]:label", "--field", "int16[]:joints"],
	);
	assert_eq!(created["name"], "robot");
	assert_eq!(created["id"], -1);
	assert_eq!(created["fields"][0]["type"], "int32");
	assert_eq!(created["fields"][0]["value"], 0);
	assert_eq!(created["fields"][2]["value"], "");

	let schema = run_json(dir.path(), &["schema", "robot", "--json"]);
	assert_eq!(schema["structure"], "robot");
	assert_eq!(schema["content_offset"].as_u64().map(|offset| offset % 16), Some(0));
	assert_eq!(schema["fields"][3]["type"], "int16[]");
	assert_eq!(schema["fields"][3]["tag"], 17);

	let updated = run_json(dir.path(), &["set", "robot", "x=-5", "label=arm", "joints=1,2,3"]);
	assert_eq!(updated["fields"][0]["value"], -5);
	assert_eq!(updated["fields"][1]["value"], 0.0);
	assert_eq!(updated["fields"][2]["value"], "arm");
	assert_eq!(updated["fields"][3]["value"], serde_json::json!([1, 2, 3]));

	let dumped = run_json(dir.path(), &["dump", "robot"]);
	assert_eq!(dumped["fields"], updated["fields"]);
}

#[test]
fn watch_reports_discovery_as_json_lines() {
	let dir = scratch_dir();
	run_json(dir.path(), &["create", "probe", "--field", "bool:on"]);

	let output = run(dir.path(), &["watch", "--ticks", "1"]);
	assert!(output.status.success(), "watch failed: {}", String::from_utf8_lossy(&output.stderr));

	let lines: Vec<Value> = String::from_utf8_lossy(&output.stdout)
		.lines()
		.map(|line| serde_json::from_str(line).expect("line should be valid json"))
		.collect();
	assert_eq!(lines.len(), 2);
	assert_eq!(lines[0]["event"], "name_added");
	assert_eq!(lines[0]["name"], "probe");
	assert_eq!(lines[0]["fields"], serde_json::json!(["bool on"]));
	assert_eq!(lines[1]["event"], "changed");
	assert_eq!(lines[1]["fields"][0]["value"], false);
}

#[test]
fn missing_region_fails_with_message() {
	let dir = scratch_dir();
	let output = run(dir.path(), &["dump", "absent"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("region not found"));
}

fn run(dir: &Path, args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_varmem"))
		.args(args)
		.arg("--dir")
		.arg(dir)
		.env_remove("RUST_LOG")
		.output()
		.expect("command executes")
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
	let output = run(dir, args);
	assert!(output.status.success(), "command failed: {}", String::from_utf8_lossy(&output.stderr));
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
