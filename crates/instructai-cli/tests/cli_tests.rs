//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A command isolated from any config in the working or home directory.
fn instructai(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("instructai").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("INSTRUCTAI_BASE_URL");
    cmd
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    instructai(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI-generated quizzes and coding exercises"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    instructai(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("instructai"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created instructai.toml"));

    let content = std::fs::read_to_string(dir.path().join("instructai.toml")).unwrap();
    assert!(content.contains("base_url"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    instructai(&dir).arg("init").assert().success();

    instructai(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn quiz_with_mock_runs_to_completion() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["quiz", "--topic", "capitals", "--count", "2", "--mock"])
        .write_stdin("3\n\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 2"))
        .stdout(predicate::str::contains("What is the capital of France?"))
        .stdout(predicate::str::contains("  3. Paris"))
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Grade: A"))
        .stdout(predicate::str::contains("All questions answered."))
        .stdout(predicate::str::contains("Answered 2 of 2"));
}

#[test]
fn quiz_rejects_unknown_option_and_blank_answer() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["quiz", "--topic", "capitals", "--mock"])
        .write_stdin("7\n\nBerlin\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'7' is not one of the 4 options"))
        .stdout(predicate::str::contains("answer must not be empty"))
        .stdout(predicate::str::contains("Grade: F"))
        .stdout(predicate::str::contains("Expected: Paris"));
}

#[test]
fn quiz_writes_transcript() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("runs/quiz.json");

    instructai(&dir)
        .args(["quiz", "--topic", "capitals", "--mock", "--output"])
        .arg(&output)
        .write_stdin("paris\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcript written to"));

    let transcript: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(transcript["assessment"]["kind"], "quiz");
    assert_eq!(transcript["assessment"]["config"]["topic"], "capitals");
    assert_eq!(transcript["question_count"], 1);
    assert_eq!(transcript["entries"][0]["answer"], "Paris");
    assert_eq!(transcript["entries"][0]["grade"], "A");
}

#[test]
fn numeric_option_text_wins_over_position() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quiz.json");

    instructai(&dir)
        .args(["quiz", "--topic", "capitals", "--count", "2", "--mock", "--output"])
        .arg(&output)
        .write_stdin("paris\n\n4\n4\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer again, or press Enter to finish"))
        .stdout(predicate::str::contains("Answered 2 of 2"));

    let transcript: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let entries = transcript["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1]["answer"], "4");
    assert_eq!(entries[2]["answer"], "4");
    assert_eq!(entries[2]["grade"], "A");
}

#[test]
fn quiz_quit_without_answers() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["quiz", "--topic", "capitals", "--mock", "--count", "3"])
        .write_stdin(":quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No answers were graded."));
}

#[test]
fn questions_as_json() {
    let dir = TempDir::new().unwrap();

    let output = instructai(&dir)
        .args(["questions", "--topic", "basics", "--count", "2", "--mock", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let set: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(set["config"]["question_type"], "MCQ");
    assert_eq!(set["config"]["subject"], "python");
    let questions = set["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["type"], "MCQ");
    assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);
    assert_eq!(questions[0]["model_answer"], "Paris");
}

#[test]
fn questions_count_is_clamped() {
    let dir = TempDir::new().unwrap();

    let output = instructai(&dir)
        .args(["questions", "--topic", "basics", "--count", "9", "--mock", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("using 5"));

    let set: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(set["questions"].as_array().unwrap().len(), 5);
}

#[test]
fn subjective_questions_table() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args([
            "questions",
            "--topic",
            "recursion",
            "--question-type",
            "subjective",
            "--count",
            "2",
            "--mock",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 Subjective question(s)"))
        .stdout(predicate::str::contains("Explain the core idea behind recursion."));
}

#[test]
fn unknown_question_type_fails() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["questions", "--topic", "x", "--question-type", "essay", "--mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question type: essay"));
}

#[test]
fn coding_with_mock() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["coding", "--language", "python", "--topic", "arrays", "--mock"])
        .write_stdin("def find_pair(nums, target):\n    return [0, 1]\n:end\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise 1 of 1"))
        .stdout(predicate::str::contains("find_pair(nums, target) in Python"))
        .stdout(predicate::str::contains("Passed: yes"))
        .stdout(predicate::str::contains("Solved 1 of 1"));
}

#[test]
fn coding_unsupported_language_fails() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["coding", "--language", "cobol", "--mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported programming language: cobol"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    instructai(&dir)
        .args(["quiz", "--topic", "x", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn config_defaults_are_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("instructai.toml"),
        "default_subject = \"databases\"\ndefault_question_type = \"Subjective\"\n",
    )
    .unwrap();

    let output = instructai(&dir)
        .args(["questions", "--topic", "indexes", "--mock", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let set: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(set["config"]["subject"], "databases");
    assert_eq!(set["config"]["question_type"], "Subjective");
}

#[tokio::test(flavor = "multi_thread")]
async fn quiz_against_http_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "questions": [{
                "type": "MCQ",
                "question": "Which keyword defines a function in Python?",
                "options": ["func", "def", "fn", "lambda"],
                "correct_answer": "def"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/evaluate_answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "grade": "A",
            "feedback": "Right, def starts a function definition."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    instructai(&dir)
        .env("INSTRUCTAI_BASE_URL", server.uri())
        .args(["quiz", "--topic", "functions"])
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("  2. def"))
        .stdout(predicate::str::contains("Right, def starts a function definition."));

    let requests = server.received_requests().await.unwrap();
    let evaluate: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(evaluate["user_answer"], "def");
    assert_eq!(evaluate["model_answer"], "def");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_evaluation_lets_user_continue() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "questions": [{
                "type": "Subjective",
                "question": "What is a closure?",
                "model_answer": "A function that captures its environment."
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/evaluate_answer"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(serde_json::json!({"detail": "grader offline"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    instructai(&dir)
        .env("INSTRUCTAI_BASE_URL", server.uri())
        .args(["quiz", "--topic", "closures", "--question-type", "subjective"])
        .write_stdin("a function with state\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Evaluation failed"))
        .stdout(predicate::str::contains("grader offline"))
        .stdout(predicate::str::contains("No answers were graded."));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_generation_exits_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_questions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    instructai(&dir)
        .env("INSTRUCTAI_BASE_URL", server.uri())
        .args(["quiz", "--topic", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: could not generate questions"))
        .stderr(predicate::str::contains("HTTP 500"));
}
