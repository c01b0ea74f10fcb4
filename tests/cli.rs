//! Integration tests for the `blueprint` binary.
//!
//! Every test runs with a cleared environment, a scratch working directory,
//! and a scratch HOME so no user config or CI variable leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use backlog_blueprint::core::policy::CONTROL_LABELS;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN: &str = "\
labels: [release]
epics:
  - title: Login
    description: Users can sign in
    children: [Add form, Add validation]
";

/// Get a command for running blueprint inside `dir`.
fn blueprint(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blueprint").unwrap();
    cmd.env_clear().env("HOME", dir).current_dir(dir);
    cmd
}

/// A scratch directory holding `zenhub/blueprint.yml`.
fn workspace(document: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("zenhub")).unwrap();
    fs::write(dir.path().join("zenhub/blueprint.yml"), document).unwrap();
    dir
}

mod basics {
    use super::*;

    #[test]
    fn version_flag_works() {
        let dir = TempDir::new().unwrap();
        blueprint(dir.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("blueprint"));
    }

    #[test]
    fn usage_error_exits_1() {
        let dir = TempDir::new().unwrap();
        blueprint(dir.path())
            .arg("bogus")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("bogus"));
    }

    #[test]
    fn help_exits_0() {
        let dir = TempDir::new().unwrap();
        blueprint(dir.path()).arg("--help").assert().success();
    }

    #[test]
    fn completion_generates_script() {
        let dir = TempDir::new().unwrap();
        blueprint(dir.path())
            .args(["completion", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("blueprint"));
    }

    #[test]
    fn check_summarizes_document() {
        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Labels: 1 declared, 9 with control labels"))
            .stdout(predicate::str::contains("Epics: 1 (2 child issue(s), 3 issue(s) total)"));
    }

    #[test]
    fn check_warns_about_skipped_entries() {
        let dir = workspace("labels: [ok, 42]\nepics:\n  - description: no title\n");
        blueprint(dir.path())
            .arg("check")
            .assert()
            .success()
            .stderr(predicate::str::contains("warning: skipped labels[1]"))
            .stderr(predicate::str::contains("warning: skipped epics[0]"));
    }
}

mod preflight {
    use super::*;

    #[test]
    fn missing_document_exits_1() {
        let dir = TempDir::new().unwrap();
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error: blueprint document not found"));
    }

    #[test]
    fn malformed_document_exits_1() {
        let dir = workspace("labels: {not: a list}\n");
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("malformed blueprint document"));
    }

    #[test]
    fn missing_repository_exits_1() {
        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("repository not resolved"));
    }

    #[test]
    fn half_set_owner_repo_exits_1() {
        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("OWNER", "octo")
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("repository not resolved"));
    }

    #[test]
    fn missing_credential_exits_1() {
        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("OWNER", "octo")
            .env("REPO", "hello")
            .env("GITHUB_TOKEN", "")
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("credential missing"));
    }

    #[test]
    fn invalid_config_exits_1() {
        let dir = workspace(LOGIN);
        fs::write(dir.path().join("config.toml"), "unknown_key = true\n").unwrap();
        blueprint(dir.path())
            .args(["--config", "config.toml", "check"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed to parse config file"));
    }
}

mod against_server {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    async fn mount_empty_labels(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }

    #[test]
    fn apply_creates_labels_then_issues() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            mount_empty_labels(&server).await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/labels"))
                .respond_with(
                    ResponseTemplate::new(201).set_body_json(json!({ "name": "x", "color": "ededed" })),
                )
                .expect(9)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/issues"))
                .respond_with(
                    ResponseTemplate::new(201).set_body_json(json!({ "number": 12, "title": "Login (EPIC)" })),
                )
                .expect(3)
                .mount(&server)
                .await;
            server
        });

        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .env("GITHUB_API_URL", server.uri())
            .arg("apply")
            .assert()
            .success()
            .stdout(predicate::str::contains("Applying blueprint to octo/hello"))
            .stdout(predicate::str::contains("Labels ensured."))
            .stdout(predicate::str::contains("Epic issue created: #12"))
            .stdout(predicate::str::contains(
                "Blueprint application completed: 9 label(s) created, 1 epic(s), 2 child issue(s)",
            ));

        rt.block_on(server.verify());
    }

    #[test]
    fn label_failure_warns_but_succeeds() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            mount_empty_labels(&server).await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/labels"))
                .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/issues"))
                .respond_with(
                    ResponseTemplate::new(201).set_body_json(json!({ "number": 1, "title": "t" })),
                )
                .mount(&server)
                .await;
            server
        });

        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .arg("apply")
            .arg("--api-base")
            .arg(server.uri())
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "warning: Label release creation warning: POST /repos/octo/hello/labels failed: 403 :: Forbidden",
            ));
    }

    /// Every label the LOGIN document needs, so no label is created.
    fn existing_labels() -> serde_json::Value {
        let names = std::iter::once("release").chain(CONTROL_LABELS);
        serde_json::Value::Array(names.map(|n| json!({ "name": n })).collect())
    }

    #[test]
    fn issue_failure_exits_1() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/repos/octo/hello/labels"))
                .respond_with(ResponseTemplate::new(200).set_body_json(existing_labels()))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/issues"))
                .respond_with(ResponseTemplate::new(410).set_body_string("Issues are disabled"))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .env("GITHUB_API_URL", server.uri())
            .arg("apply")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed to create epic issue for 'Login'"))
            .stderr(predicate::str::contains("410 :: Issues are disabled"));

        rt.block_on(server.verify());
    }

    #[test]
    fn child_failure_exits_1_and_stops_later_epics() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/repos/octo/hello/labels"))
                .respond_with(ResponseTemplate::new(200).set_body_json(existing_labels()))
                .mount(&server)
                .await;
            for (title, number) in [("Login (EPIC)", 1), ("Add form", 2)] {
                Mock::given(method("POST"))
                    .and(path("/repos/octo/hello/issues"))
                    .and(body_partial_json(json!({ "title": title })))
                    .respond_with(
                        ResponseTemplate::new(201)
                            .set_body_json(json!({ "number": number, "title": title })),
                    )
                    .expect(1)
                    .mount(&server)
                    .await;
            }
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/issues"))
                .and(body_partial_json(json!({ "title": "Add validation" })))
                .respond_with(ResponseTemplate::new(500).set_body_string("Server Error"))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/repos/octo/hello/issues"))
                .and(body_partial_json(json!({ "title": "Signup (EPIC)" })))
                .respond_with(ResponseTemplate::new(201))
                .expect(0)
                .mount(&server)
                .await;
            server
        });

        let dir = workspace(&format!(
            "{}  - title: Signup\n    children: [Add page]\n",
            LOGIN
        ));
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .env("GITHUB_API_URL", server.uri())
            .arg("apply")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Child issue created: #2 Add form"))
            .stderr(predicate::str::contains(
                "failed to create child issue 'Add validation' of epic #1",
            ))
            .stderr(predicate::str::contains("500 :: Server Error"));

        rt.block_on(server.verify());
    }

    #[test]
    fn quiet_dry_run_still_prints_plan() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            mount_empty_labels(&server).await;
            server
        });

        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .env("GITHUB_API_URL", server.uri())
            .args(["-q", "apply", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Plan for octo/hello:"))
            .stdout(predicate::str::contains("Issues to create (3):"));
    }

    #[test]
    fn dry_run_creates_nothing() {
        let rt = runtime();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            mount_empty_labels(&server).await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(&server)
                .await;
            server
        });

        let dir = workspace(LOGIN);
        blueprint(dir.path())
            .env("GITHUB_TOKEN", "t")
            .env("GITHUB_REPOSITORY", "octo/hello")
            .env("GITHUB_API_URL", server.uri())
            .args(["apply", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Labels to create (9):"))
            .stdout(predicate::str::contains("Issues to create (3):"));

        rt.block_on(server.verify());
    }
}
