use std::fs;
use std::path::{Path, PathBuf};

use da_kal_align::pipeline::defaults::DateAwareSplitter;
use da_kal_align::{ErrorKind, SentenceSplitter};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;

const SUITE_NAME: &str = "sentence_segmentation_matches_reference";
const FIXTURE_PATH: &str = "test-data/segmentation_cases.json";
const DEFAULT_MIN_SENTENCE_LENGTH: usize = 5;

#[derive(Debug, Deserialize)]
struct SegmentationCase {
    id: String,
    text: String,
    #[serde(default)]
    min_sentence_length: Option<usize>,
    #[serde(default)]
    expected: Option<Vec<String>>,
    #[serde(default)]
    expected_error: Option<String>,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let cases = match load_cases(&repo_root.join(FIXTURE_PATH)) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(&args, format!("No segmentation cases found in {FIXTURE_PATH}."));
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::{}", case.id);
            Trial::test(test_name, move || run_case(&case).map_err(Failed::from))
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_cases(path: &Path) -> Result<Vec<SegmentationCase>, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read fixture '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}

fn run_case(case: &SegmentationCase) -> Result<(), String> {
    let splitter = DateAwareSplitter {
        min_sentence_length: case
            .min_sentence_length
            .unwrap_or(DEFAULT_MIN_SENTENCE_LENGTH),
    };
    let result = splitter.split(&case.text);

    match (&case.expected, &case.expected_error, result) {
        (Some(expected), None, Ok(actual)) => {
            if &actual == expected {
                Ok(())
            } else {
                Err(format!(
                    "{}: expected {} sentences {expected:?}, got {} sentences {actual:?}",
                    case.id,
                    expected.len(),
                    actual.len()
                ))
            }
        }
        (None, Some(expected), Err(err)) => {
            let actual = kind_name(err.kind());
            if actual == expected.as_str() {
                Ok(())
            } else {
                Err(format!("{}: expected {expected} error, got {actual}: {err}", case.id))
            }
        }
        (None, Some(expected), Ok(actual)) => Err(format!(
            "{}: expected {expected} error, got sentences {actual:?}",
            case.id
        )),
        (Some(_), None, Err(err)) => Err(format!("{}: split failed: {err}", case.id)),
        _ => Err(format!(
            "{}: fixture must set exactly one of `expected` or `expected_error`",
            case.id
        )),
    }
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "not_found",
        ErrorKind::InvalidFormat => "invalid_format",
        ErrorKind::EmptyInput => "empty_input",
        ErrorKind::ToolFailure => "tool_failure",
        ErrorKind::Io => "io",
        ErrorKind::InvalidArgument => "invalid_argument",
    }
}
