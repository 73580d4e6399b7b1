#![no_main]

use html5::{InitialState, TokenizerConfig};
use html5_test_support::{ChunkPlan, run_borrowed, run_chunked, run_shared_chunked};
use libfuzzer_sys::fuzz_target;

// Layout: [state, split seed, ..input]. The first two bytes pick the
// initial state and chunk boundaries; the rest is tokenized.
fuzz_target!(|data: &[u8]| {
    let [state, seed, input @ ..] = data else {
        return;
    };
    let initial_state = match state % 5 {
        0 => InitialState::Data,
        1 => InitialState::Rcdata,
        2 => InitialState::Rawtext,
        3 => InitialState::ScriptData,
        _ => InitialState::Plaintext,
    };
    let config = TokenizerConfig {
        initial_state,
        last_start_tag_name: Some("script".to_string()),
        exact_errors: seed & 1 == 1,
        ..TokenizerConfig::default()
    };

    let whole = run_borrowed(&config, input);
    let mut boundaries = Vec::new();
    let step = usize::from(*seed % 13) + 1;
    let mut at = step;
    while at < input.len() {
        boundaries.push(at);
        at += step + (at % 3);
    }
    let plan = ChunkPlan::boundaries_unaligned(boundaries);
    assert_eq!(run_chunked(&config, input, &plan), whole);
    assert_eq!(run_shared_chunked(&config, input, &plan), whole);
});
