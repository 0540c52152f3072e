use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::cargo_bin("arelle-client").expect("binary exists")
}

#[test]
fn displays_help() {
    let mut cmd = cargo_bin();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Run Arelle XBRL validations"));
}

#[test]
fn displays_version() {
    let mut cmd = cargo_bin();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn get_prints_validation_body_and_saves_it() {
    let temp = assert_fs::TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/xbrl/report.xbrl/validation/xbrl")
            .query_param("media", "text");
        then.status(200).body("[info] loaded report.xbrl\n");
    });

    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path())
        .args(["--host", "127.0.0.1", "--port"])
        .arg(server.port().to_string())
        .args(["--output", "out", "get", "report.xbrl"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[info] loaded report.xbrl"))
        .stderr(predicate::str::contains("Status:"));

    mock.assert();
    temp.child("out/report.xbrl/000.txt")
        .assert(predicate::str::contains("loaded report.xbrl"));
}

#[test]
fn post_uploads_archive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let archive = temp.child("filing.zip");
    archive.write_binary(b"zip-bytes").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/xbrl/filing-42/validation/xbrl")
            .query_param_exists("formulaAsserResultCounts")
            .query_param("import", "formula.xml")
            .header("content-type", "application/zip");
        then.status(200).body("validated");
    });

    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path())
        .args(["--host", "127.0.0.1", "--port"])
        .arg(server.port().to_string())
        .args([
            "post",
            "filing.zip",
            "--instance",
            "filing-42",
            "--import",
            "formula.xml",
        ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("validated"));
    mock.assert();
}

#[test]
fn http_error_fails_with_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/about");
        then.status(503).body("busy");
    });

    let mut cmd = cargo_bin();
    cmd.args(["--host", "127.0.0.1", "--port"])
        .arg(server.port().to_string())
        .arg("about");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 503"));
}

#[cfg(unix)]
#[test]
fn run_streams_output_and_propagates_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("fake-arelle.sh")
        .write_str(
            "echo \"validating $2\"\n\
             echo \"home=$XDG_CONFIG_HOME\"\n\
             echo \"lang=$ARELLE_LANG\"\n\
             exit 3\n",
        )
        .unwrap();
    temp.child("arelle.env").write_str("ARELLE_LANG=en\n").unwrap();
    temp.child("arelle-client.json")
        .write_str(r#"{"executable": "sh", "extraArgs": "fake-arelle.sh", "env": "arelle.env"}"#)
        .unwrap();

    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path())
        .args(["run", "report.xbrl", "--config-home", "/tmp/arelle-home"]);

    cmd.assert()
        .code(3)
        .stdout(predicate::str::contains("validating report.xbrl"))
        .stdout(predicate::str::contains("home=/tmp/arelle-home"))
        .stdout(predicate::str::contains("lang=en"))
        .stderr(predicate::str::contains("Exit code:"));
}

#[test]
fn run_reports_missing_executable() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path())
        .args(["run", "report.xbrl", "--exe", "/nonexistent/arelleCmdLine"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch"));
}
