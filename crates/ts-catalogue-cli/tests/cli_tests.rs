use assert_fs::prelude::*;
use insta::assert_snapshot;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INPUT_HR: LazyLock<PathBuf> =
    LazyLock::new(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/input_hr_HR.ts"));

const CANCEL: &str = "<TS language=\"hr_HR\" version=\"2.1\"><context><name>PanelHeader</name>\
    <message><source>Cancel</source><translation>Odustani</translation></message>\
    </context></TS>";

const DAYS_AGO: &str = r#"<TS language="hr_HR">
<context>
    <name>InputUtils</name>
    <message><source>%1 day ago</source><translation>prije %1 dan</translation></message>
    <message><source>%1 day ago</source><translation>prije %1 dana</translation></message>
</context>
</TS>
"#;

fn ts_catalogue() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ts-catalogue");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn project(files: &[(&str, &str)]) -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    for (name, content) in files {
        temp.child(name).write_str(content).unwrap();
    }
    temp
}

#[test]
fn test_check_fixture() {
    ts_catalogue()
        .arg("check")
        .arg(&*INPUT_HR)
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found!"));
}

#[test]
fn test_check_malformed() {
    let temp = project(&[(
        "app_hr.ts",
        "<TS><context><name>A</name><bogus/></context></TS>",
    )]);

    ts_catalogue()
        .arg("check")
        .arg(temp.child("app_hr.ts").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("check found 1 error(s) and 0 warning(s)"))
        .stderr(predicate::str::contains("unexpected element <bogus> inside <context>"));
}

#[test]
fn test_check_placeholder_warning_and_strict() {
    let temp = project(&[(
        "app_hr.ts",
        "<TS language=\"hr\"><context><name>AccountPage</name><message>\
         <source>Using %1 / %2</source><translation>Iskorišteno %1</translation>\
         </message></context></TS>",
    )]);
    let file = temp.child("app_hr.ts");

    ts_catalogue()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning(s), no errors"))
        .stderr(predicate::str::contains("placeholder mismatch in context 'AccountPage'"));

    ts_catalogue()
        .args(["check", "--strict"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("check found 1 error(s) and 0 warning(s)"));
}

#[test]
fn test_check_uses_config_assets() {
    let temp = project(&[
        (
            "i18n.toml",
            "fallback_language = \"en\"\nassets_dir = \"i18n\"\ndomain = \"input\"\n",
        ),
        ("i18n/input_hr_HR.ts", CANCEL),
        ("i18n/input_de.ts", CANCEL),
        ("i18n/other_fr.ts", "not a catalogue"),
    ]);

    ts_catalogue()
        .arg("check")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("input_de.ts"))
        .stdout(predicate::str::contains("input_hr_HR.ts"))
        .stdout(predicate::str::contains("other_fr.ts").not());
}

#[test]
fn test_check_without_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    ts_catalogue()
        .arg("check")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("i18n.toml configuration file not found"));
}

#[test]
fn test_lookup_translation() {
    ts_catalogue()
        .arg("lookup")
        .arg(&*INPUT_HR)
        .args(["--context", "PanelHeader", "--source", "Cancel"])
        .assert()
        .success()
        .stdout("Odustani\n");
}

#[test]
fn test_lookup_with_arguments() {
    ts_catalogue()
        .arg("lookup")
        .arg(&*INPUT_HR)
        .args(["--context", "AccountPage", "--source", "Using %1 / %2", "3", "10"])
        .assert()
        .success()
        .stdout("Iskorišteno 3/10\n");
}

#[test]
fn test_lookup_missing_falls_back_to_source() {
    ts_catalogue()
        .arg("lookup")
        .arg(&*INPUT_HR)
        .args(["--context", "PanelHeader", "--source", "NonExistent"])
        .assert()
        .success()
        .stdout("NonExistent\n")
        .stderr(predicate::str::contains("Not translated:"));
}

#[test]
fn test_lookup_plural() {
    let temp = project(&[("app_hr.ts", DAYS_AGO)]);
    let file = temp.child("app_hr.ts");

    for (count, expected) in [("1", "prije 1 dan\n"), ("5", "prije 5 dana\n")] {
        ts_catalogue()
            .arg("lookup")
            .arg(file.path())
            .args(["--context", "InputUtils", "--source", "%1 day ago", "--count", count, count])
            .assert()
            .success()
            .stdout(expected);
    }
}

#[test]
fn test_lookup_malformed() {
    let temp = project(&[("app_hr.ts", "<TS><context></TS>")]);

    ts_catalogue()
        .arg("lookup")
        .arg(temp.child("app_hr.ts").path())
        .args(["--context", "A", "--source", "B"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed catalogue"));
}

#[test]
fn test_stats_table() {
    ts_catalogue()
        .arg("stats")
        .arg(&*INPUT_HR)
        .assert()
        .success()
        .stdout(predicate::str::contains("(hr_HR)"))
        .stdout(predicate::str::contains("PanelHeader"))
        .stdout(predicate::str::contains("218/218"));
}

#[test]
fn test_stats_json() {
    let temp = project(&[(
        "app_hr.ts",
        "<TS language=\"hr\"><context><name>PanelHeader</name>\
         <message><source>Cancel</source><translation>Odustani</translation></message>\
         <message><source>Save</source><translation type=\"unfinished\">Spremi</translation></message>\
         <message><source>Close</source><translation type=\"unfinished\"/></message>\
         <message><source>Old</source><translation type=\"obsolete\">Staro</translation></message>\
         </context></TS>",
    )]);

    let output = ts_catalogue()
        .args(["stats", "--json"])
        .arg(temp.child("app_hr.ts").path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let context = &json[0]["contexts"][0];
    assert_eq!(json[0]["language"], "hr");
    assert_eq!(context["name"], "PanelHeader");
    assert_eq!(context["finished"], 1);
    assert_eq!(context["unfinished"], 1);
    assert_eq!(context["untranslated"], 1);
    assert_eq!(context["inactive"], 1);
}

#[test]
fn test_format_check_then_format() {
    let temp = project(&[("app_hr.ts", CANCEL)]);
    let file = temp.child("app_hr.ts");

    ts_catalogue()
        .args(["format", "--check"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Would format:"))
        .stderr(predicate::str::contains("1 file(s) would be reformatted"));
    file.assert(CANCEL);

    ts_catalogue()
        .arg("format")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 formatted, 0 unchanged"));

    assert_snapshot!(std::fs::read_to_string(file.path()).unwrap(), @r#"
    <?xml version="1.0" encoding="utf-8"?>
    <!DOCTYPE TS>
    <TS version="2.1" language="hr_HR">
        <context>
            <name>PanelHeader</name>
            <message>
                <source>Cancel</source>
                <translation>Odustani</translation>
            </message>
        </context>
    </TS>
    "#);

    ts_catalogue()
        .args(["format", "--check"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 formatted, 1 unchanged"));
}

#[test]
fn test_format_reports_malformed_files() {
    let temp = project(&[("app_hr.ts", "<TS><context></TS>")]);

    ts_catalogue()
        .arg("format")
        .arg(temp.child("app_hr.ts").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("formatted 0 file(s), 1 error(s)"));
}

#[test]
fn test_format_keeps_unmodelled_attributes() {
    let source = r#"<TS version="2.1" language="hr_HR"><context><name>A</name><message utf8="true"><source>a</source><translation>b</translation></message></context></TS>"#;
    let temp = project(&[("app_hr.ts", source)]);
    let file = temp.child("app_hr.ts");

    ts_catalogue().arg("format").arg(file.path()).assert().success();

    assert_snapshot!(std::fs::read_to_string(file.path()).unwrap(), @r#"
    <?xml version="1.0" encoding="utf-8"?>
    <!DOCTYPE TS>
    <TS version="2.1" language="hr_HR">
        <context>
            <name>A</name>
            <message utf8="true">
                <source>a</source>
                <translation>b</translation>
            </message>
        </context>
    </TS>
    "#);
}

#[test]
fn test_format_refuses_files_with_comments() {
    let source = r#"<TS version="2.1" language="hr_HR"><!-- keep me --><context><name>A</name><message utf8="true"><source>a</source><translation>b</translation></message></context></TS>"#;
    let temp = project(&[("app_hr.ts", source)]);
    let file = temp.child("app_hr.ts");

    ts_catalogue()
        .arg("format")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("formatted 0 file(s), 1 error(s)"))
        .stderr(predicate::str::contains("XML comment"));
    file.assert(source);
}
