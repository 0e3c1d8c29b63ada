mod common;

use common::QaTest;

const SAMPLE_CSV: &str = "Title,Description,Steps,Expected Result,Status,Notes,Priority
Login,Valid credentials,\"1. open
2. submit\",Dashboard shown,pass,,High
,orphan row without title,,,,,

\"Search, advanced\",,,Results,FAIL,\"says \"\"oops\"\"\",
Logout,,,,unknown,,low
";

#[test]
fn test_import_reports_imported_and_skipped() {
    let qa = QaTest::new();
    let path = qa.write_file("cases.csv", SAMPLE_CSV);

    let stdout = qa.run_success(&["import", path.to_str().unwrap()]);
    assert!(
        stdout.contains("Imported 3 test case(s), skipped 1 row(s)"),
        "stdout: {stdout}"
    );

    let json = qa.run_json(&["ls"]);
    let cases = json["cases"].as_array().unwrap();
    let titles: Vec<&str> = cases.iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Login", "Search, advanced", "Logout"]);

    assert_eq!(cases[0]["steps"], "1. open\n2. submit");
    assert_eq!(cases[0]["status"], "Pass");
    assert_eq!(cases[0]["priority"], "High");
    assert_eq!(cases[1]["status"], "Fail");
    assert_eq!(cases[1]["notes"], "says \"oops\"");
    assert_eq!(cases[2]["status"], "Unset");
    assert_eq!(cases[2]["priority"], "Low");
    assert_eq!(cases[0]["history"][0]["kind"], "imported");
}

#[test]
fn test_import_appends_to_existing_cases() {
    let qa = QaTest::new();
    qa.add("Existing", &[]);
    let path = qa.write_file("cases.csv", SAMPLE_CSV);
    qa.run_success(&["import", path.to_str().unwrap()]);

    let json = qa.run_json(&["stats"]);
    assert_eq!(json["total"], 4);
}

#[test]
fn test_import_missing_file_fails() {
    let qa = QaTest::new();
    let stderr = qa.run_failure(&["import", "nope.csv"]);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
}

#[test]
fn test_import_header_only_imports_nothing() {
    let qa = QaTest::new();
    let path = qa.write_file("empty.csv", "Title,Description\n");
    let json = qa.run_json(&["import", path.to_str().unwrap()]);
    assert_eq!(json["imported"], 0);
    assert_eq!(json["skipped"], 0);
}

#[test]
fn test_export_csv_to_stdout() {
    let qa = QaTest::new();
    qa.add("Login", &["-s", "pass", "-p", "High", "--steps", "a\nb"]);
    qa.add("Draft", &[]);

    let stdout = qa.run_success(&["export"]);
    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("Title,Description,Steps,Expected Result,Status,Notes,Priority")
    );
    assert!(stdout.contains("\"Login\",\"\",\"a\nb\",\"\",\"Pass\",\"\",\"High\""));
    assert!(stdout.contains("\"Draft\",\"\",\"\",\"\",\"\",\"\",\"\""));
}

#[test]
fn test_export_then_import_into_another_user() {
    let qa = QaTest::new();
    qa.add("Login", &["-s", "fail", "-d", "with, commas", "-n", "quote \" here"]);
    qa.add("Logout", &["-s", "pass"]);

    let stdout = qa.run_success(&["export", "-o", "out.csv"]);
    assert!(stdout.contains("Exported 2 test case(s)"), "stdout: {stdout}");

    qa.run_success(&["--user", "bob", "import", "out.csv"]);
    let json = qa.run_json(&["--user", "bob", "ls", "--sort", "title"]);
    let cases = json["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0]["title"], "Login");
    assert_eq!(cases[0]["description"], "with, commas");
    assert_eq!(cases[0]["notes"], "quote \" here");
    assert_eq!(cases[0]["status"], "Fail");
    assert_eq!(cases[1]["status"], "Pass");
}

#[test]
fn test_export_import_keeps_multiline_and_padded_fields() {
    let qa = QaTest::new();
    qa.add(
        "Multiline",
        &["--steps", "1. open\n2. submit\n", "-d", "  indented", "-n", "inner  spaces "],
    );

    qa.run_success(&["export", "-o", "out.csv"]);
    qa.run_success(&["--user", "bob", "import", "out.csv"]);

    let alice = qa.run_json(&["ls"]);
    let bob = qa.run_json(&["--user", "bob", "ls"]);
    for field in ["title", "description", "steps", "expected_result", "status", "notes", "priority"] {
        assert_eq!(alice["cases"][0][field], bob["cases"][0][field], "field {field}");
    }
    assert_eq!(bob["cases"][0]["steps"], "1. open\n2. submit");
    assert_eq!(bob["cases"][0]["notes"], "inner  spaces");
}

#[test]
fn test_export_markdown_table() {
    let qa = QaTest::new();
    qa.add("Pipe | title", &["--steps", "one\ntwo"]);

    qa.run_success(&["export", "--format", "table", "-o", "cases.md"]);
    let content = qa.read_file("cases.md");
    assert!(content.contains("Title"));
    assert!(content.contains("Pipe \\| title"));
    assert!(content.contains("one<br>two"));
}

#[test]
fn test_export_invalid_format() {
    let qa = QaTest::new();
    let stderr = qa.run_failure(&["export", "--format", "pdf"]);
    assert!(stderr.contains("Invalid export format"), "stderr: {stderr}");
}
