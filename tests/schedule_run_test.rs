use course_schedule_etl::{CsvDirectorySource, EtlError, LocalStorage, ScheduleRun, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

fn write_sheet(base: &Path, spreadsheet: &str, worksheet: &str, content: &str) {
    let dir = base.join(spreadsheet);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{}.csv", worksheet)), content).unwrap();
}

fn config(sheets: &Path, output: &Path, electives: bool) -> TomlConfig {
    let mut toml_content = format!(
        r#"
[source]
type = "csv"
base_path = "{sheets}"

[[semesters]]
display_title = "Fall 2026"
spreadsheet = "CHEN Schedule"
worksheet = "Fall 2026"
output_json_file = "data/fall2026.json"

[[semesters]]
display_title = "Spring 2027"
spreadsheet = "CHEN Schedule"
worksheet = "Spring 2027"
output_json_file = "data/spring2027.json"

[[semesters]]
display_title = "Summer 2027"
spreadsheet = "CHEN Schedule"
worksheet = "Summer 2027"
output_json_file = "data/summer2027.json"

[load]
output_path = "{output}"
"#,
        sheets = sheets.display(),
        output = output.display()
    );

    if electives {
        toml_content.push_str(
            r#"
[electives]
spreadsheet = "CHEN Electives"
worksheet = "Electives"
output_json_file = "electives.json"
"#,
        );
    }

    TomlConfig::from_toml_str(&toml_content).unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_semester_failures_do_not_stop_the_run() {
    let sheets = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_sheet(
        sheets.path(),
        "CHEN Schedule",
        "Fall 2026",
        "Chemical Engineering Fall 2026,,,,,,,,\n\
         COURSE,INSTRUCTOR,DAYS,TIME,LOCATION,TYPE,NOTES,ENROLL,\n\
         CHEN 1703,Lee,MWF,9:40AM-10:30AM,WEB L104,Lecture,,120,\n\
         ,,,,,,,,\n\
         CHEN 5253,Park,TR,TBA,,Online,recorded,,\n",
    );
    // header row is missing the marker
    write_sheet(
        sheets.path(),
        "CHEN Schedule",
        "Spring 2027",
        "Course,Time\nCHEN 2800,TBA\n",
    );
    // Summer 2027 has no export at all

    let run = ScheduleRun::new(
        config(sheets.path(), output.path(), false),
        CsvDirectorySource::new(sheets.path()),
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        2026,
    );

    let summary = run.run_semesters().await.unwrap();

    assert_eq!(summary.completed.len(), 1);
    assert_eq!(summary.failed.len(), 2);
    assert!(matches!(summary.failed[0].1, EtlError::HeaderNotFound { .. }));
    assert!(matches!(summary.failed[1].1, EtlError::Source { .. }));
    assert!(!summary.all_succeeded());

    let fall = read_json(&output.path().join("data/fall2026.json"));
    assert_eq!(
        fall,
        serde_json::json!([
            {
                "course_number": "CHEN 1703",
                "instructors": "Lee",
                "days": "MWF",
                "time_of_day": "9:40AM-10:30AM",
                "duration": 50,
                "location": "WEB L104",
                "type": "Lecture",
                "notes": "",
                "anticipated_enrollment": "120"
            },
            {
                "course_number": "CHEN 5253",
                "instructors": "Park",
                "days": "",
                "time_of_day": "Online/Asynchronous",
                "duration": 0,
                "location": "TBD",
                "type": "Online",
                "notes": "recorded",
                "anticipated_enrollment": 0
            }
        ])
    );

    let manifest = read_json(&output.path().join("data/semesters.json"));
    assert_eq!(
        manifest,
        serde_json::json!([{ "display_title": "Fall 2026", "data_file": "data/fall2026.json" }])
    );
    assert!(!output.path().join("data/spring2027.json").exists());
}

#[tokio::test]
async fn test_run_all_writes_electives() {
    let sheets = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_sheet(
        sheets.path(),
        "CHEN Schedule",
        "Fall 2026",
        "COURSE,TIME\nCHEN 1703,9:00 AM-10:15 AM\n",
    );
    write_sheet(
        sheets.path(),
        "CHEN Electives",
        "Electives",
        "Elective planning,,,,\n\
         Course Number (UG),Course Title,Offering Frequency,Last Offered,Certainty\n\
         CHEN 5151,Polymer Engineering,Fall - Every,FA25,High\n\
         CHEN 5205,Electrochemical Engineering,Every Other Year (Fall),FA 2024,Medium\n\
         CHEN 5653,Biotransport,Spring -Even Years,,\n\
         CHEN 5901,Special Topics,On Demand,,Low\n",
    );

    let run = ScheduleRun::new(
        config(sheets.path(), output.path(), true),
        CsvDirectorySource::new(sheets.path()),
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        2026,
    );

    run.run_all().await.unwrap();

    let electives = read_json(&output.path().join("electives.json"));
    let electives = electives.as_array().unwrap();
    assert_eq!(electives.len(), 4);

    assert_eq!(electives[0]["Course Title"], "Polymer Engineering");
    assert_eq!(
        electives[0]["predicted_schedule"],
        serde_json::json!(["FA26", "FA27", "FA28", "FA29", "FA30", "FA31"])
    );
    assert_eq!(electives[0]["Next Offering"], "FA26");
    assert_eq!(electives[0]["Certainty"], "High");

    assert_eq!(
        electives[1]["predicted_schedule"],
        serde_json::json!(["FA26", "FA28", "FA30"])
    );

    assert_eq!(
        electives[2]["predicted_schedule"],
        serde_json::json!(["SP28", "SP30", "SP32"])
    );
    assert_eq!(electives[2]["Certainty"], "");

    assert_eq!(electives[3]["predicted_schedule"], serde_json::json!([]));
    assert_eq!(electives[3]["Next Offering"], "On Demand");
}

#[tokio::test]
async fn test_elective_header_missing_is_fatal() {
    let sheets = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_sheet(
        sheets.path(),
        "CHEN Electives",
        "Electives",
        "Course Title,Frequency\nPolymers,Fall - Every\n",
    );

    let run = ScheduleRun::new(
        config(sheets.path(), output.path(), true),
        CsvDirectorySource::new(sheets.path()),
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        2026,
    );

    let err = run.run_electives().await.unwrap_err();
    match err {
        EtlError::BatchFatal { pipeline, source } => {
            assert_eq!(pipeline, "Electives");
            assert!(matches!(*source, EtlError::HeaderNotFound { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.path().join("electives.json").exists());
}

#[tokio::test]
async fn test_empty_elective_sheet_is_fatal() {
    let sheets = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_sheet(sheets.path(), "CHEN Electives", "Electives", "");

    let run = ScheduleRun::new(
        config(sheets.path(), output.path(), true),
        CsvDirectorySource::new(sheets.path()),
        LocalStorage::new(output.path().to_str().unwrap().to_string()),
        2026,
    );

    let err = run.run_electives().await.unwrap_err();
    assert!(matches!(err, EtlError::BatchFatal { source, .. } if matches!(*source, EtlError::EmptyTable { .. })));
}
