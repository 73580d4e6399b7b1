use super::{InitialState, SharedTokenizer, Tokenizer, TokenizerConfig};
use crate::atom::Atom;
use crate::buf::{BorrowedBuf, ByteSpan, SharedBuf};
use crate::sink::{ContractCheck, SharedTokenSink, TokenSink};

/// Records every callback as one line, in the same shape for both surfaces.
#[derive(Default)]
struct Lines(Vec<String>);

fn text(buf: &impl ByteSpan) -> String {
    buf.to_str_lossy().into_owned()
}

impl TokenSink for Lines {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        self.0.push(format!(
            "DOCTYPE name={:?} public={:?} system={:?} quirks={force_quirks}",
            text(&name),
            text(&public_id),
            text(&system_id)
        ));
    }
    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        self.0.push(format!(
            "START {} self_closing={self_closing} attrs={num_attrs}",
            text(&name)
        ));
    }
    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        self.0
            .push(format!("ATTR {}={:?}", text(&name), text(&value)));
    }
    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        self.0.push(format!("END {}", text(&name)));
    }
    fn comment(&mut self, body: BorrowedBuf<'_>) {
        self.0.push(format!("COMMENT {:?}", text(&body)));
    }
    fn chars(&mut self, body: BorrowedBuf<'_>) {
        self.0.push(format!("CHARS {:?}", text(&body)));
    }
    fn null_char(&mut self) {
        self.0.push("NULL".to_string());
    }
    fn eof(&mut self) {
        self.0.push("EOF".to_string());
    }
    fn error(&mut self, message: BorrowedBuf<'_>) {
        self.0.push(format!("ERROR {}", text(&message)));
    }
}

impl SharedTokenSink for Lines {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        TokenSink::doctype(
            self,
            name.borrow(),
            public_id.borrow(),
            system_id.borrow(),
            force_quirks,
        );
    }
    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        let name = name.as_shared();
        TokenSink::start_tag(self, name.borrow(), self_closing, num_attrs);
    }
    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        let name = name.as_shared();
        TokenSink::tag_attr(self, name.borrow(), value.borrow());
    }
    fn end_tag(&mut self, name: Atom) {
        let name = name.as_shared();
        TokenSink::end_tag(self, name.borrow());
    }
    fn comment(&mut self, body: SharedBuf) {
        TokenSink::comment(self, body.borrow());
    }
    fn chars(&mut self, body: SharedBuf) {
        TokenSink::chars(self, body.borrow());
    }
    fn null_char(&mut self) {
        TokenSink::null_char(self);
    }
    fn eof(&mut self) {
        TokenSink::eof(self);
    }
    fn error(&mut self, message: SharedBuf) {
        TokenSink::error(self, message.borrow());
    }
}

fn run_chunks_with(config: TokenizerConfig, chunks: &[&[u8]]) -> Vec<String> {
    let mut tok = Tokenizer::with_config(ContractCheck::new(Lines::default()), config);
    for chunk in chunks {
        tok.feed(*chunk);
    }
    tok.end();
    let check = tok.free();
    assert!(check.saw_eof());
    check.into_inner().0
}

fn run(input: &str) -> Vec<String> {
    run_chunks_with(TokenizerConfig::default(), &[input.as_bytes()])
}

fn run_with(config: TokenizerConfig, input: &str) -> Vec<String> {
    run_chunks_with(config, &[input.as_bytes()])
}

fn run_bytewise(input: &str) -> Vec<String> {
    let chunks: Vec<&[u8]> = input.as_bytes().chunks(1).collect();
    run_chunks_with(TokenizerConfig::default(), &chunks)
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|line| line.to_string()).collect()
}

#[test]
fn simple_element_with_text() {
    assert_eq!(
        run("<p>Hello</p>"),
        lines(&[
            "START p self_closing=false attrs=0",
            "CHARS \"Hello\"",
            "END p",
            "EOF",
        ])
    );
}

#[test]
fn empty_input_produces_only_eof() {
    assert_eq!(run(""), lines(&["EOF"]));
}

#[test]
fn doctype_with_missing_identifiers_reports_empty_views() {
    assert_eq!(
        run("<!DOCTYPE html>"),
        lines(&[
            "DOCTYPE name=\"html\" public=\"\" system=\"\" quirks=false",
            "EOF"
        ])
    );
}

#[test]
fn doctype_with_public_and_system_identifiers() {
    assert_eq!(
        run(r#"<!doctype HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#),
        lines(&[
            "DOCTYPE name=\"html\" public=\"-//W3C//DTD HTML 4.01//EN\" system=\"http://www.w3.org/TR/html4/strict.dtd\" quirks=false",
            "EOF",
        ])
    );
}

#[test]
fn doctype_without_name_forces_quirks() {
    assert_eq!(
        run("<!DOCTYPE>"),
        lines(&[
            "ERROR missing-doctype-name",
            "DOCTYPE name=\"\" public=\"\" system=\"\" quirks=true",
            "EOF",
        ])
    );
}

#[test]
fn doctype_with_garbage_after_name_is_bogus() {
    assert_eq!(
        run("<!DOCTYPE html bogus>x"),
        lines(&[
            "ERROR invalid-character-sequence-after-doctype-name",
            "DOCTYPE name=\"html\" public=\"\" system=\"\" quirks=true",
            "CHARS \"x\"",
            "EOF",
        ])
    );
}

#[test]
fn doctype_cut_off_by_eof() {
    assert_eq!(
        run("<!DOCTYPE html PUBLIC \"abc"),
        lines(&[
            "ERROR eof-in-doctype",
            "DOCTYPE name=\"html\" public=\"abc\" system=\"\" quirks=true",
            "EOF",
        ])
    );
}

#[test]
fn attributes_arrive_in_order_after_start_tag() {
    assert_eq!(
        run(r#"<a HREF="x" id='y' data-z=w checked>"#),
        lines(&[
            "START a self_closing=false attrs=4",
            "ATTR href=\"x\"",
            "ATTR id=\"y\"",
            "ATTR data-z=\"w\"",
            "ATTR checked=\"\"",
            "EOF",
        ])
    );
}

#[test]
fn duplicate_attribute_keeps_first_and_reports_error() {
    assert_eq!(
        run(r#"<div a="1" A="2">"#),
        lines(&[
            "ERROR duplicate-attribute",
            "START div self_closing=false attrs=1",
            "ATTR a=\"1\"",
            "EOF",
        ])
    );
}

#[test]
fn self_closing_start_tag() {
    assert_eq!(
        run("<br/><img src=x />"),
        lines(&[
            "START br self_closing=true attrs=0",
            "START img self_closing=true attrs=1",
            "ATTR src=\"x\"",
            "EOF",
        ])
    );
}

#[test]
fn end_tag_attributes_are_dropped_with_error() {
    assert_eq!(
        run("</p class=x>"),
        lines(&["ERROR end-tag-with-attributes", "END p", "EOF"])
    );
}

#[test]
fn missing_attribute_value() {
    assert_eq!(
        run("<a href=>"),
        lines(&[
            "ERROR missing-attribute-value",
            "START a self_closing=false attrs=1",
            "ATTR href=\"\"",
            "EOF",
        ])
    );
}

#[test]
fn null_in_data_is_its_own_event() {
    assert_eq!(
        run("a\0b"),
        lines(&[
            "CHARS \"a\"",
            "ERROR unexpected-null-character",
            "NULL",
            "CHARS \"b\"",
            "EOF",
        ])
    );
}

#[test]
fn null_in_tag_name_becomes_replacement_character() {
    assert_eq!(
        run("<a\0>"),
        lines(&[
            "ERROR unexpected-null-character",
            "START a\u{FFFD} self_closing=false attrs=0",
            "EOF",
        ])
    );
}

#[test]
fn named_and_numeric_character_references_in_text() {
    assert_eq!(
        run("&amp;&lt;&#65;&#x42;&notin;"),
        lines(&["CHARS \"&<AB\u{2209}\"", "EOF"])
    );
}

#[test]
fn references_from_the_full_named_table_resolve() {
    assert_eq!(
        run("&check;&Alpha;&star;&frac13;&NotSquareSubset;"),
        vec![
            format!("CHARS {:?}", "\u{2713}\u{391}\u{2606}\u{2153}\u{228F}\u{338}"),
            "EOF".to_string(),
        ]
    );
}

#[test]
fn legacy_reference_without_semicolon_in_text() {
    assert_eq!(
        run("&notit;"),
        lines(&[
            "ERROR missing-semicolon-after-character-reference",
            "CHARS \"\u{ac}it;\"",
            "EOF",
        ])
    );
}

#[test]
fn legacy_reference_in_attribute_followed_by_alnum_stays_literal() {
    assert_eq!(
        run("<a href=\"?x=1&copy=2&amp;y\">"),
        lines(&[
            "START a self_closing=false attrs=1",
            "ATTR href=\"?x=1&copy=2&y\"",
            "EOF",
        ])
    );
}

#[test]
fn unknown_named_reference_is_literal() {
    assert_eq!(
        run("&bogus; & x"),
        lines(&[
            "ERROR unknown-named-character-reference",
            "CHARS \"&bogus; & x\"",
            "EOF",
        ])
    );
}

#[test]
fn numeric_references_are_sanitized() {
    assert_eq!(
        run("&#0;&#x80;&#xD800;"),
        vec![
            "ERROR null-character-reference".to_string(),
            format!("CHARS {:?}", "\u{FFFD}"),
            "ERROR control-character-reference".to_string(),
            format!("CHARS {:?}", "\u{20AC}"),
            "ERROR surrogate-character-reference".to_string(),
            format!("CHARS {:?}", "\u{FFFD}"),
            "EOF".to_string(),
        ]
    );
}

#[test]
fn numeric_reference_without_digits() {
    assert_eq!(
        run("&#;"),
        lines(&[
            "ERROR absence-of-digits-in-numeric-character-reference",
            "CHARS \"&#;\"",
            "EOF",
        ])
    );
}

#[test]
fn character_reference_cut_off_by_eof() {
    assert_eq!(
        run("&#x41"),
        lines(&[
            "ERROR missing-semicolon-after-character-reference",
            "CHARS \"A\"",
            "EOF",
        ])
    );
}

#[test]
fn comments_and_bogus_comments() {
    assert_eq!(
        run("<!-- hi --><!x><?pi?><!---->"),
        lines(&[
            "COMMENT \" hi \"",
            "ERROR incorrectly-opened-comment",
            "COMMENT \"x\"",
            "ERROR unexpected-question-mark-instead-of-tag-name",
            "COMMENT \"?pi?\"",
            "COMMENT \"\"",
            "EOF",
        ])
    );
}

#[test]
fn abrupt_and_bang_closed_comments() {
    assert_eq!(
        run("<!--><!-- a --!>"),
        lines(&[
            "ERROR abrupt-closing-of-empty-comment",
            "COMMENT \"\"",
            "ERROR incorrectly-closed-comment",
            "COMMENT \" a \"",
            "EOF",
        ])
    );
}

#[test]
fn comment_keeps_interior_dashes() {
    assert_eq!(
        run("<!-- a - b -- c --->"),
        lines(&["COMMENT \" a - b -- c -\"", "EOF"])
    );
}

#[test]
fn cdata_outside_foreign_content_is_a_bogus_comment() {
    assert_eq!(
        run("<![CDATA[x]]>"),
        lines(&[
            "ERROR cdata-in-html-content",
            "COMMENT \"[CDATA[x]]\"",
            "EOF"
        ])
    );
}

#[test]
fn eof_inside_comment_emits_it() {
    assert_eq!(
        run("<!-- open"),
        lines(&["ERROR eof-in-comment", "COMMENT \" open\"", "EOF"])
    );
}

#[test]
fn eof_inside_tag_drops_it() {
    assert_eq!(
        run("text<div class=\"a"),
        lines(&["CHARS \"text\"", "ERROR eof-in-tag", "EOF"])
    );
}

#[test]
fn lone_less_than_sign_is_text() {
    assert_eq!(
        run("a < b<"),
        lines(&[
            "CHARS \"a \"",
            "ERROR invalid-first-character-of-tag-name",
            "CHARS \"< b\"",
            "ERROR eof-before-tag-name",
            "CHARS \"<\"",
            "EOF",
        ])
    );
}

#[test]
fn empty_end_tag_is_skipped() {
    assert_eq!(
        run("a</>b"),
        lines(&[
            "CHARS \"a\"",
            "ERROR missing-end-tag-name",
            "CHARS \"b\"",
            "EOF"
        ])
    );
}

#[test]
fn rawtext_initial_state_ends_at_appropriate_end_tag() {
    let config = TokenizerConfig {
        initial_state: InitialState::Rawtext,
        last_start_tag_name: Some("STYLE".to_string()),
        ..TokenizerConfig::default()
    };
    assert_eq!(
        run_with(config, "a<b>&amp;</stylex></style>c"),
        lines(&[
            "CHARS \"a<b>&amp;</stylex>\"",
            "END style",
            "CHARS \"c\"",
            "EOF",
        ])
    );
}

#[test]
fn rcdata_decodes_character_references() {
    let config = TokenizerConfig {
        initial_state: InitialState::Rcdata,
        last_start_tag_name: Some("title".to_string()),
        ..TokenizerConfig::default()
    };
    assert_eq!(
        run_with(config, "x &lt; <y></title>"),
        lines(&["CHARS \"x < <y>\"", "END title", "EOF"])
    );
}

#[test]
fn raw_text_without_last_start_tag_never_closes() {
    let config = TokenizerConfig {
        initial_state: InitialState::ScriptData,
        ..TokenizerConfig::default()
    };
    assert_eq!(
        run_with(config, "if (a </script> b) {}</scr"),
        lines(&["CHARS \"if (a </script> b) {}</scr\"", "EOF"])
    );
}

fn script_config() -> TokenizerConfig {
    TokenizerConfig {
        initial_state: InitialState::ScriptData,
        last_start_tag_name: Some("script".to_string()),
        ..TokenizerConfig::default()
    }
}

#[test]
fn script_comment_hides_nested_script_end_tag() {
    let input = "<!--<script>x</script>y</script>z";
    let expected = lines(&[
        "CHARS \"<!--<script>x</script>y\"",
        "END script",
        "CHARS \"z\"",
        "EOF",
    ]);
    assert_eq!(run_with(script_config(), input), expected);
    let chunks: Vec<&[u8]> = input.as_bytes().chunks(1).collect();
    assert_eq!(run_chunks_with(script_config(), &chunks), expected);
}

#[test]
fn escaped_script_text_still_ends_at_end_tag() {
    assert_eq!(
        run_with(script_config(), "<!-- a </script>b"),
        lines(&["CHARS \"<!-- a \"", "END script", "CHARS \"b\"", "EOF"])
    );
    assert_eq!(
        run_with(script_config(), "<!x</script>"),
        lines(&["CHARS \"<!x\"", "END script", "EOF"])
    );
}

#[test]
fn script_comment_close_returns_to_script_data() {
    assert_eq!(
        run_with(script_config(), "<!-- x -->y</script>"),
        lines(&["CHARS \"<!-- x -->y\"", "END script", "EOF"])
    );
    assert_eq!(
        run_with(script_config(), "<!--<script>a-->b</script>c</script>"),
        lines(&[
            "CHARS \"<!--<script>a-->b\"",
            "END script",
            "CHARS \"c\"",
            "END script",
            "EOF",
        ])
    );
}

#[test]
fn eof_in_escaped_script_text_is_an_error() {
    assert_eq!(
        run_with(script_config(), "<!--x-\0"),
        vec![
            "CHARS \"<!--x-\"".to_string(),
            "ERROR unexpected-null-character".to_string(),
            format!("CHARS {:?}", "\u{FFFD}"),
            "ERROR eof-in-script-html-comment-like-text".to_string(),
            "EOF".to_string(),
        ]
    );
}

#[test]
fn plaintext_swallows_everything() {
    let config = TokenizerConfig {
        initial_state: InitialState::Plaintext,
        ..TokenizerConfig::default()
    };
    assert_eq!(
        run_with(config, "<p>&amp;</plaintext>"),
        lines(&["CHARS \"<p>&amp;</plaintext>\"", "EOF"])
    );
}

#[test]
fn newlines_are_normalized_and_bom_dropped() {
    assert_eq!(
        run("\u{FEFF}a\r\nb\rc\n"),
        lines(&["CHARS \"a\\nb\\nc\\n\"", "EOF"])
    );
}

#[test]
fn bom_is_kept_when_not_discarding() {
    let config = TokenizerConfig {
        discard_bom: false,
        ..TokenizerConfig::default()
    };
    assert_eq!(
        run_with(config, "\u{FEFF}a"),
        vec![format!("CHARS {:?}", "\u{FEFF}a"), "EOF".to_string()]
    );
}

#[test]
fn invalid_utf8_is_replaced() {
    let out = run_chunks_with(TokenizerConfig::default(), &[b"a\xFFb"]);
    assert_eq!(
        out,
        vec![format!("CHARS {:?}", "a\u{FFFD}b"), "EOF".to_string()]
    );
}

#[test]
fn exact_errors_include_state_and_position() {
    let config = TokenizerConfig {
        exact_errors: true,
        ..TokenizerConfig::default()
    };
    let out = run_with(config, "ab\0");
    assert_eq!(out.len(), 4, "{out:?}");
    assert_eq!(out[0], "CHARS \"ab\"");
    assert!(
        out[1].starts_with("ERROR unexpected-null-character in state Data at character 3"),
        "{}",
        out[1]
    );
    assert_eq!(out[2], "NULL");
}

#[test]
fn byte_at_a_time_matches_whole_input() {
    let inputs = [
        "<!DOCTYPE html><html lang=en><head><title>T</title></head>",
        "<p class=\"a b\" id=x>caf\u{e9} &amp; &notin; &#x1F600;</p>",
        "<!-- c -- d --!><!x><?y><![CDATA[z]]></ a>",
        "a\r\n\r\nb\rc<br/>\0&#0;&bogus;&#x80",
        "<a href='x&copy=1' title=\"&lt;\">t</a><div\n\tdata-x\n=\n'1'>",
    ];
    for input in inputs {
        assert_eq!(run(input), run_bytewise(input), "input: {input:?}");
    }
}

#[test]
fn multibyte_characters_split_across_feeds() {
    let bytes = "\u{e9}\u{2209}\u{1F600}".as_bytes();
    let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
    assert_eq!(
        run_chunks_with(TokenizerConfig::default(), &chunks),
        vec![
            format!("CHARS {:?}", "\u{e9}\u{2209}\u{1F600}"),
            "EOF".to_string()
        ]
    );
}

#[test]
fn crlf_split_across_feeds_yields_one_newline() {
    assert_eq!(
        run_chunks_with(TokenizerConfig::default(), &[b"a\r", b"\nb"]),
        lines(&["CHARS \"a\\nb\"", "EOF"])
    );
}

#[test]
fn shared_surface_matches_borrowed_surface() {
    let input = "<!DOCTYPE html><p id=a>x&amp;y<!--c--></p>\0";
    let mut tok = SharedTokenizer::new(ContractCheck::new(Lines::default()));
    tok.feed(input);
    tok.end();
    let shared = tok.free().into_inner().0;
    assert_eq!(shared, run(input));
}

#[test]
fn empty_feed_is_a_no_op() {
    let mut tok = Tokenizer::new(Lines::default());
    tok.feed("");
    assert_eq!(tok.stats().feeds, 0);
    tok.feed("<a>");
    tok.feed(&b""[..]);
    assert_eq!(tok.stats().feeds, 1);
    tok.end();
    assert_eq!(
        tok.free().0,
        lines(&["START a self_closing=false attrs=0", "EOF"])
    );
}

#[test]
fn text_is_held_until_the_next_event() {
    let mut tok = Tokenizer::new(Lines::default());
    tok.feed("abc");
    assert!(tok.sink().0.is_empty());
    tok.feed("<b>");
    assert_eq!(
        tok.sink().0,
        lines(&["CHARS \"abc\"", "START b self_closing=false attrs=0"])
    );
    tok.end();
    assert!(tok.is_ended());
}

#[test]
fn stats_track_feeds_and_tokens() {
    let mut tok = Tokenizer::new(Lines::default());
    tok.feed("<p>");
    tok.feed("a\r\nb</p>");
    tok.end();
    let stats = tok.stats();
    assert_eq!(stats.feeds, 2);
    assert_eq!(stats.bytes_fed, 11);
    assert_eq!(stats.chars_consumed, 10);
    assert_eq!(stats.tokens_emitted, 4);
    assert_eq!(stats.parse_errors, 0);
    assert!(stats.state_transitions > 0);
}

#[test]
#[should_panic(expected = "feed called after end()")]
fn feed_after_end_panics() {
    let mut tok = Tokenizer::new(Lines::default());
    tok.end();
    tok.feed("late");
}

#[test]
#[should_panic(expected = "end called twice")]
fn end_twice_panics() {
    let mut tok = SharedTokenizer::new(Lines::default());
    tok.end();
    tok.end();
}
