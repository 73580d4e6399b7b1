//! Chunk-equivalence: every split of the same bytes must produce the same
//! callback stream as feeding them at once.
//!
//! Set `H5STREAM_CHUNK_FUZZ_RUNS` / `H5STREAM_CHUNK_FUZZ_SEED` to widen or
//! replay the random plans.

use html5::{InitialState, TokenizerConfig};
use html5_test_support::{
    ChunkPlan, build_chunk_plans, diff_lines, run_borrowed, run_chunked, run_shared_chunked,
};

const CASES: &[&[u8]] = &[
    b"<!DOCTYPE html><html lang=en><head><title>T</title></head><body>",
    b"<p class=\"a b\" id=x>caf\xC3\xA9 &amp; &notin; &#x1F600; &#128512;</p>",
    b"<!-- c -- d --!><!x><?y><![CDATA[z]]></ a><!--->",
    b"a\r\n\r\nb\rc<br/>\0&#0;&bogus;&#x80&#xD800;&#99999999;",
    b"<a href='x&copy=1' title=\"&lt;\">t</a><div\n\tdata-x\n=\n'1'>",
    b"\xEF\xBB\xBF<p>\xF0\x9F\x98\x80\xE2\x88\x89\xFF\xC3(</p>",
    b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0//EN\"\r\n \"x.dtd\"><x>",
    b"&CounterClockwiseContourIntegral;&NotEqualTilde;&amp&ampx&#x;&#",
    b"<a b c=d e='f' g=\"h\"/><a b=1 b=2></x y=z><a\0=\0>",
    b"\xE2\x82",
];

fn assert_parity(config: &TokenizerConfig, input: &[u8], plan: &ChunkPlan, label: &str) {
    let whole = run_borrowed(config, input);
    let borrowed = run_chunked(config, input, plan);
    assert!(
        borrowed == whole,
        "borrowed surface diverged for {:?}\nplan: {label}\n{}",
        String::from_utf8_lossy(input),
        diff_lines(&whole, &borrowed)
    );
    let shared = run_shared_chunked(config, input, plan);
    assert!(
        shared == whole,
        "shared surface diverged for {:?}\nplan: {label}\n{}",
        String::from_utf8_lossy(input),
        diff_lines(&whole, &shared)
    );
}

#[test]
fn every_plan_matches_whole_input() {
    let config = TokenizerConfig::default();
    for (idx, input) in CASES.iter().enumerate() {
        for (plan, label) in build_chunk_plans(input.len(), idx as u64) {
            assert_parity(&config, input, &plan, &label);
        }
    }
}

#[test]
fn every_single_split_point_matches_whole_input() {
    let config = TokenizerConfig::default();
    for input in CASES {
        for split in 1..input.len() {
            let plan = ChunkPlan::boundaries_unaligned(vec![split]);
            assert_parity(&config, input, &plan, &format!("split at {split}"));
        }
    }
}

#[test]
fn raw_text_states_are_chunk_invariant() {
    let inputs: [&[u8]; 3] = [
        b"x</scrip></script\t>y</SCRIPT >z",
        b"<!--<script>a</script>-- -><!-x\0</Script/>",
        b"<!-- <a> -\0--<x>-></script--!><!--<SCRIPT x></scriptx></script></script",
    ];
    let states = [
        InitialState::Rcdata,
        InitialState::Rawtext,
        InitialState::ScriptData,
        InitialState::Plaintext,
    ];
    for (input, state) in inputs.iter().flat_map(|input| states.map(|state| (*input, state))) {
        let config = TokenizerConfig {
            initial_state: state,
            last_start_tag_name: Some("script".to_string()),
            ..TokenizerConfig::default()
        };
        for (plan, label) in build_chunk_plans(input.len(), 7) {
            assert_parity(&config, input, &plan, &format!("{state:?} {label}"));
        }
    }
}

#[test]
fn exact_error_positions_are_chunk_invariant() {
    let config = TokenizerConfig {
        exact_errors: true,
        ..TokenizerConfig::default()
    };
    let input = b"\xC3\xA9\r\n<a b=1 b=2>&#0;</a x>";
    for size in 1..=4 {
        let plan = ChunkPlan::fixed_unaligned(size);
        assert_parity(&config, input, &plan, &plan.to_string());
    }
}
