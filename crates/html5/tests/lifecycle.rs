use html5::{BorrowedBuf, ContractCheck, SharedTokenizer, TokenSink, Tokenizer, TokenizerConfig};
use html5_test_support::RecordingSink;

/// Counts events; used where only the shape of the stream matters.
#[derive(Default)]
struct Counting {
    events: usize,
    eofs: usize,
}

impl TokenSink for Counting {
    fn doctype(&mut self, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>, _: bool) {
        self.events += 1;
    }
    fn start_tag(&mut self, _: BorrowedBuf<'_>, _: bool, _: usize) {
        self.events += 1;
    }
    fn tag_attr(&mut self, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
    fn end_tag(&mut self, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
    fn comment(&mut self, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
    fn chars(&mut self, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
    fn null_char(&mut self) {
        self.events += 1;
    }
    fn eof(&mut self) {
        self.events += 1;
        self.eofs += 1;
    }
    fn error(&mut self, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
}

#[test]
fn create_then_end_emits_only_eof() {
    let mut tok = Tokenizer::new(Counting::default());
    assert!(!tok.is_ended());
    tok.end();
    assert!(tok.is_ended());
    let sink = tok.free();
    assert_eq!(sink.events, 1);
    assert_eq!(sink.eofs, 1);
}

#[test]
fn eof_is_the_last_callback_for_unterminated_input() {
    for input in ["<div", "<!--", "<!DOCTYPE", "&am", "<a b='", "</", "<![CDATA["] {
        let mut tok = Tokenizer::new(ContractCheck::new(RecordingSink::new()));
        tok.feed(input);
        tok.end();
        let check = tok.free();
        assert!(check.saw_eof(), "input {input:?}");
        let lines = check.into_inner().into_lines();
        assert_eq!(lines.last().map(String::as_str), Some("EOF"), "input {input:?}");
        assert_eq!(
            lines.iter().filter(|line| *line == "EOF").count(),
            1,
            "input {input:?}"
        );
    }
}

#[test]
fn nothing_is_dispatched_after_end() {
    let mut tok = Tokenizer::new(Counting::default());
    tok.feed("<p>text");
    tok.end();
    let events = tok.sink().events;
    assert_eq!(tok.sink().eofs, 1);
    let sink = tok.free();
    assert_eq!(sink.events, events);
}

#[test]
fn handle_can_borrow_its_sink() {
    let mut sink = Counting::default();
    {
        let mut tok = Tokenizer::new(&mut sink);
        tok.feed("<a>");
        tok.end();
    }
    assert_eq!(sink.events, 2);
}

#[test]
fn handle_can_own_a_boxed_sink() {
    let sink: Box<dyn TokenSink> = Box::new(RecordingSink::new());
    let mut tok = Tokenizer::new(sink);
    tok.feed("x");
    tok.end();
    let _sink: Box<dyn TokenSink> = tok.free();
}

#[test]
fn sink_mut_exposes_consumer_context_between_feeds() {
    let mut tok = Tokenizer::new(Counting::default());
    tok.feed("<p>");
    tok.sink_mut().events = 100;
    tok.feed("</p>");
    tok.end();
    assert_eq!(tok.free().events, 102);
}

#[test]
fn stats_report_parse_errors() {
    let mut tok = Tokenizer::with_config(Counting::default(), TokenizerConfig::default());
    tok.feed("<a\0 b=1 b=2>");
    tok.end();
    let stats = tok.stats();
    assert_eq!(stats.parse_errors, 2);
    assert_eq!(stats.feeds, 1);
}

#[test]
#[should_panic(expected = "feed called after end()")]
fn feed_after_end_panics() {
    let mut tok = Tokenizer::new(Counting::default());
    tok.feed("<p>");
    tok.end();
    tok.feed("more");
}

#[test]
#[should_panic(expected = "feed called after end()")]
fn empty_feed_after_end_still_panics() {
    let mut tok = Tokenizer::new(Counting::default());
    tok.end();
    tok.feed("");
}

#[test]
#[should_panic(expected = "end called twice")]
fn end_twice_panics() {
    let mut tok = Tokenizer::new(Counting::default());
    tok.end();
    tok.end();
}

#[test]
#[should_panic(expected = "feed called after end()")]
fn shared_feed_after_end_panics() {
    let mut tok = SharedTokenizer::new(RecordingSink::new());
    tok.end();
    tok.feed("late");
}

#[test]
#[should_panic(expected = "sink contract violated: chars callback after eof")]
fn contract_check_rejects_events_after_eof() {
    let mut check = ContractCheck::new(Counting::default());
    check.eof();
    check.chars("x".into());
}

#[test]
#[should_panic(expected = "beyond the declared attribute count")]
fn contract_check_rejects_extra_attributes() {
    let mut check = ContractCheck::new(Counting::default());
    check.start_tag("a".into(), false, 1);
    check.tag_attr("x".into(), "1".into());
    check.tag_attr("y".into(), "2".into());
}
