use predicates::prelude::*;
use serde_json::{json, Value};
use shred_test_utils::{EnvelopeBuilder, TestDataGenerator};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct SampleFile {
    _dir: TempDir,
    path: PathBuf,
}

fn write_sample(name: &str, contents: &str) -> Result<SampleFile, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(SampleFile { _dir: dir, path })
}

fn shred_cmd() -> Result<assert_cmd::Command, Box<dyn Error>> {
    Ok(assert_cmd::Command::cargo_bin("shred")?)
}

#[test]
fn contexts_prints_grouped_fields() -> Result<(), Box<dyn Error>> {
    let sample = write_sample(
        "contexts.json",
        &TestDataGenerator::duplicated_contexts().to_string(),
    )?;
    let output = shred_cmd()?
        .args(["contexts", sample.path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(
        value,
        json!({
            "contexts_com_acme_duplicated_20": [{"value": 1}, {"value": 2}],
            "contexts_com_acme_unduplicated_1": [{"type": "test"}]
        })
    );
    Ok(())
}

#[test]
fn unstruct_reads_stdin() -> Result<(), Box<dyn Error>> {
    let output = shred_cmd()?
        .args(["unstruct", "-"])
        .write_stdin(TestDataGenerator::social_interaction().to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(
        value["unstruct_event_com_snowplowanalytics_snowplow_social_interaction_1"]["network"],
        "fb"
    );
    Ok(())
}

#[test]
fn malformed_contexts_fail_with_every_message() -> Result<(), Box<dyn Error>> {
    let sample = write_sample(
        "bad.json",
        &TestDataGenerator::malformed_contexts().to_string(),
    )?;
    shred_cmd()?
        .args(["contexts", sample.path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shredding failed with 3 error(s)"))
        .stderr(predicate::str::contains(
            "Could not extract inner data field from custom context.",
        ));
    Ok(())
}

#[test]
fn invalid_json_is_reported_as_malformed_input() -> Result<(), Box<dyn Error>> {
    shred_cmd()?
        .args(["contexts", "-"])
        .write_stdin("{'schema': 'any'}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed input"));
    Ok(())
}

#[test]
fn ndjson_writes_one_line_per_envelope() -> Result<(), Box<dyn Error>> {
    let good = EnvelopeBuilder::new()
        .context("iglu:com.acme/a/jsonschema/1-0-0", json!({"n": 1}))
        .build_text();
    let bad = EnvelopeBuilder::new()
        .missing_schema(json!({"n": 2}))
        .build_text();
    let sample = write_sample("events.ndjson", &format!("{}\n{}\n", good, bad))?;
    let out_dir = tempfile::tempdir()?;
    let out_path = out_dir.path().join("out.ndjson");

    shred_cmd()?
        .args([
            "contexts",
            sample.path.to_str().unwrap(),
            "--ndjson",
            "-o",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 envelopes failed"));

    let written = fs::read_to_string(&out_path)?;
    let lines: Vec<Value> = written
        .lines()
        .map(|l| serde_json::from_str(l))
        .collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"contexts_com_acme_a_1": [{"n": 1}]}));
    assert_eq!(lines[1]["line"], 2);
    Ok(())
}

#[test]
fn max_entries_limit_is_enforced() -> Result<(), Box<dyn Error>> {
    let sample = write_sample(
        "contexts.json",
        &TestDataGenerator::duplicated_contexts().to_string(),
    )?;
    shred_cmd()?
        .args([
            "contexts",
            sample.path.to_str().unwrap(),
            "--max-entries",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Limit exceeded"));
    Ok(())
}

#[test]
fn key_prints_field_name() -> Result<(), Box<dyn Error>> {
    shred_cmd()?
        .args([
            "key",
            "iglu:com.snowplowanalytics.snowplow/link_click/jsonschema/1-0-1",
            "--kind",
            "unstruct",
        ])
        .assert()
        .success()
        .stdout("unstruct_event_com_snowplowanalytics_snowplow_link_click_1\n");
    Ok(())
}

#[test]
fn key_rejects_bad_uri() -> Result<(), Box<dyn Error>> {
    shred_cmd()?
        .args(["key", "iglu:com.acme/x/jsonschema/1-0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 3"));
    Ok(())
}
