// End-to-end tests for `idflags run|classify|validate`.
// Run with: cargo test -p idflags-cli --test recon_cli_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

const RECORDS: &str = "\
empid,login_id,emp_type,deleted_flag,status
100,user1,T1,Y,A
100,user1,T1,N,L
100,user2,T2,Y,T
100,user2,T2,N,I
102,user4,T1,Y,T
102,user4,T1,Y,T
";

const CONFLICT_HEADER: &str =
    "empid,login_id,emp_type,conflict_type,has_deleted,has_active,status_summary";
const NON_CONFLICT_HEADER: &str =
    "empid,login_id,emp_type,status_summary,deletion_marker_summary,reason";

fn idflags() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_idflags"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn classify(dir: &Path, input: &Path, extra: &[&str]) -> Output {
    idflags()
        .arg("classify")
        .arg(input)
        .arg("--conflicts")
        .arg(dir.join("conflicts.csv"))
        .arg("--non-conflicts")
        .arg(dir.join("non_conflicts.csv"))
        .args(extra)
        .output()
        .unwrap()
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_writes_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", RECORDS);

    let output = classify(dir.path(), &input, &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        read_lines(&dir.path().join("conflicts.csv")),
        vec![
            CONFLICT_HEADER.to_string(),
            "100,user1,T1,Deleted flag conflict with Active/Leave status,Yes,Yes,\"A, L\"".to_string(),
        ]
    );
    assert_eq!(
        read_lines(&dir.path().join("non_conflicts.csv")),
        vec![
            NON_CONFLICT_HEADER.to_string(),
            "100,user2,T2,\"I, T\",\"N, Y\",No Active/Leave status found".to_string(),
            "102,user4,T1,T,Y,No deleted flag conflict".to_string(),
        ]
    );
    assert!(stderr(&output).contains("6 record(s) in 3 group(s): 1 conflict(s), 2 excluded"));
}

#[test]
fn classify_json_report_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", RECORDS);

    let output = classify(dir.path(), &input, &["--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["conflicts"], 1);
    assert_eq!(report["summary"]["non_conflicts"], 2);
    assert_eq!(report["conflicts"][0]["status_summary"], "A, L");
    assert_eq!(report["non_conflicts"][1]["reason"], "No deleted flag conflict");
    assert!(report["meta"]["engine_version"].is_string());
}

#[test]
fn fail_on_conflict_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", RECORDS);

    let output = classify(dir.path(), &input, &["--fail-on-conflict"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("1 conflict(s) found"));
    // Tables are still written before the exit.
    assert!(dir.path().join("conflicts.csv").exists());
}

#[test]
fn empty_input_writes_header_only_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", "empid,login_id,emp_type,deleted_flag,status\n");

    let output = classify(dir.path(), &input, &["--fail-on-conflict"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(read_lines(&dir.path().join("conflicts.csv")), vec![CONFLICT_HEADER]);
    assert_eq!(read_lines(&dir.path().join("non_conflicts.csv")), vec![NON_CONFLICT_HEADER]);
}

#[test]
fn tab_delimited_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "records.tsv",
        "empid\tlogin_id\temp_type\tdeleted_flag\tstatus\n7\tx\tT1\tY\tL\n7\tx\tT1\tN\tT\n",
    );

    let output = classify(dir.path(), &input, &["--delimiter", "\\t"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines = read_lines(&dir.path().join("conflicts.csv"));
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("7,x,T1,"));
    assert!(lines[1].ends_with(",Yes,Yes,\"L, T\""));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn missing_columns_exit_four() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", "empid,login_id\n1,a\n");

    let output = classify(dir.path(), &input, &[]);
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("emp_type, deleted_flag, status"), "stderr: {err}");
    assert!(err.contains("hint:"));
    assert!(!dir.path().join("conflicts.csv").exists(), "no partial output");
}

#[test]
fn bad_flag_exit_five() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "records.csv",
        "empid,login_id,emp_type,deleted_flag,status\n1,a,T1,D,A\n",
    );

    let output = classify(dir.path(), &input, &[]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("\"D\""));
}

#[test]
fn missing_input_exit_six() {
    let dir = tempfile::tempdir().unwrap();
    let output = classify(dir.path(), &dir.path().join("absent.csv"), &[]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn same_output_paths_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", RECORDS);
    let out = dir.path().join("out.csv");

    let output = idflags()
        .arg("classify")
        .arg(&input)
        .arg("--conflicts")
        .arg(&out)
        .arg("--non-conflicts")
        .arg(&out)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn report_over_table_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "records.csv", RECORDS);
    let report = dir.path().join("conflicts.csv");

    let output = classify(dir.path(), &input, &["--report", report.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--report must not point at"));
    assert!(!report.exists(), "nothing written before the check");
}

// ---------------------------------------------------------------------------
// run / validate
// ---------------------------------------------------------------------------

const CONFIG: &str = r#"
name = "Nightly identity feed"

[input]
file = "records.csv"

[output]
conflicts = "out/conflicts.csv"
non_conflicts = "out/non_conflicts.csv"
report = "out/report.json"
"#;

#[test]
fn run_resolves_paths_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "records.csv", RECORDS);
    let config = write(dir.path(), "nightly.recon.toml", CONFIG);

    let output = idflags().arg("run").arg(&config).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = dir.path().join("out");
    assert_eq!(read_lines(&out.join("conflicts.csv")).len(), 2);
    assert_eq!(read_lines(&out.join("non_conflicts.csv")).len(), 3);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["meta"]["config_name"], "Nightly identity feed");
    assert_eq!(report["summary"]["total_records"], 6);
}

#[test]
fn run_rejects_report_over_table() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "records.csv", RECORDS);
    let config = write(
        dir.path(),
        "clash.recon.toml",
        "name = \"Clash\"\n[input]\nfile = \"records.csv\"\n[output]\nconflicts = \"c.csv\"\nnon_conflicts = \"n.csv\"\nreport = \"c.csv\"\n",
    );

    let validate = idflags().arg("validate").arg(&config).output().unwrap();
    assert_eq!(validate.status.code(), Some(3));

    let run = idflags().arg("run").arg(&config).output().unwrap();
    assert_eq!(run.status.code(), Some(3));
    assert!(stderr(&run).contains("would overwrite an output table"));
    assert!(!dir.path().join("c.csv").exists());
}

#[test]
fn validate_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "nightly.recon.toml", CONFIG);

    let output = idflags().arg("validate").arg(&config).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("valid: 'Nightly identity feed'"));
}

#[test]
fn validate_bad_config_exit_three() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "bad.recon.toml",
        "name = \"Bad\"\n[input]\nfile = \"a.csv\"\n[output]\nconflicts = \"x.csv\"\nnon_conflicts = \"x.csv\"\n",
    );

    let output = idflags().arg("validate").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("config validation error"));
}
