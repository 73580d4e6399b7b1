use std::env;
use std::fs;
use std::path::PathBuf;

use html5::{InitialState, TokenizerConfig};
use html5_test_support::{
    TOKEN_FORMAT_V1, build_chunk_plans, diff_lines, run_borrowed, run_chunked, run_shared,
};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
enum FixtureStatus {
    #[default]
    Active,
    Xfail,
    Skip,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FixtureState {
    #[default]
    Data,
    Rcdata,
    Rawtext,
    #[serde(rename = "script-data")]
    ScriptData,
    Plaintext,
}

impl From<FixtureState> for InitialState {
    fn from(state: FixtureState) -> Self {
        match state {
            FixtureState::Data => InitialState::Data,
            FixtureState::Rcdata => InitialState::Rcdata,
            FixtureState::Rawtext => InitialState::Rawtext,
            FixtureState::ScriptData => InitialState::ScriptData,
            FixtureState::Plaintext => InitialState::Plaintext,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    format: String,
    #[serde(rename = "case")]
    cases: Vec<Fixture>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    name: String,
    input: String,
    tokens: Vec<String>,
    #[serde(default)]
    status: FixtureStatus,
    reason: Option<String>,
    #[serde(default)]
    initial_state: FixtureState,
    last_start_tag: Option<String>,
    #[serde(default)]
    exact_errors: bool,
}

impl Fixture {
    fn config(&self) -> TokenizerConfig {
        TokenizerConfig {
            exact_errors: self.exact_errors,
            initial_state: self.initial_state.into(),
            last_start_tag_name: self.last_start_tag.clone(),
            ..TokenizerConfig::default()
        }
    }

    /// Stable per-fixture salt so each case gets its own random plans.
    fn salt(&self) -> u64 {
        self.name
            .bytes()
            .fold(0xcbf29ce484222325u64, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x100000001b3)
            })
    }
}

#[test]
fn golden_tokenizer_whole_input() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for fixture in load_fixtures() {
        if !filter.matches(&fixture.name) {
            continue;
        }
        ran += 1;
        if fixture.status == FixtureStatus::Skip {
            continue;
        }
        let actual = run_borrowed(&fixture.config(), fixture.input.as_bytes());
        enforce_expected(&fixture, &actual, "whole");
    }
    assert!(ran > 0, "no fixtures matched filter");
}

#[test]
fn golden_tokenizer_chunked_input() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for fixture in load_fixtures() {
        if !filter.matches(&fixture.name) {
            continue;
        }
        ran += 1;
        if fixture.status == FixtureStatus::Skip {
            continue;
        }
        let config = fixture.config();
        let input = fixture.input.as_bytes();
        let whole = run_borrowed(&config, input);
        for (plan, label) in build_chunk_plans(input.len(), fixture.salt()) {
            let actual = run_chunked(&config, input, &plan);
            if actual != whole {
                panic!(
                    "chunked output mismatch in fixture '{}'\nplan: {label}\n{}",
                    fixture.name,
                    diff_lines(&whole, &actual)
                );
            }
            enforce_expected(&fixture, &actual, &format!("chunked ({label})"));
        }
    }
    assert!(ran > 0, "no fixtures matched filter");
}

#[test]
fn golden_tokenizer_shared_surface() {
    let filter = fixture_filter();
    for fixture in load_fixtures() {
        if !filter.matches(&fixture.name) || fixture.status == FixtureStatus::Skip {
            continue;
        }
        let actual = run_shared(&fixture.config(), fixture.input.as_bytes());
        enforce_expected(&fixture, &actual, "shared");
    }
}

fn enforce_expected(fixture: &Fixture, actual: &[String], mode: &str) {
    let mismatch = actual != fixture.tokens.as_slice();
    match fixture.status {
        FixtureStatus::Active => {
            if mismatch {
                panic!(
                    "token mismatch in fixture '{}' [{mode}]\n{}",
                    fixture.name,
                    diff_lines(&fixture.tokens, actual)
                );
            }
        }
        FixtureStatus::Xfail => {
            if !mismatch {
                panic!(
                    "fixture '{}' [{mode}] matched expected tokens but is marked xfail; reason: {}",
                    fixture.name,
                    fixture.reason.as_deref().unwrap_or("<missing reason>")
                );
            }
        }
        FixtureStatus::Skip => {}
    }
}

struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    fn matches(&self, name: &str) -> bool {
        self.raw.as_deref().is_none_or(|filter| name.contains(filter))
    }
}

fn fixture_filter() -> FixtureFilter {
    FixtureFilter {
        raw: env::var("H5STREAM_FIXTURE").ok(),
    }
}

fn manifest_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tokenizer.toml")
}

fn load_fixtures() -> Vec<Fixture> {
    let path = manifest_path();
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture manifest {path:?}: {err}"));
    let manifest: Manifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture manifest {path:?}: {err}"));
    assert_eq!(
        manifest.format, TOKEN_FORMAT_V1,
        "unsupported format in {path:?}"
    );
    for fixture in &manifest.cases {
        assert!(
            fixture.tokens.last().map(String::as_str) == Some("EOF"),
            "fixture '{}' must end with EOF",
            fixture.name
        );
        match fixture.status {
            FixtureStatus::Active => assert!(
                fixture.reason.is_none(),
                "fixture '{}' has a reason but is not xfail/skip",
                fixture.name
            ),
            FixtureStatus::Xfail | FixtureStatus::Skip => assert!(
                fixture.reason.as_deref().is_some_and(|r| !r.is_empty()),
                "fixture '{}' with status {:?} is missing a reason",
                fixture.name,
                fixture.status
            ),
        }
    }
    manifest.cases
}
