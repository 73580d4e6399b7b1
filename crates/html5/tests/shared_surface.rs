use html5::{Atom, ByteSpan, SharedBuf, SharedTokenSink, SharedTokenizer, TokenizerConfig};
use html5_test_support::{run_borrowed, run_shared};

/// Keeps every buffer it is given, to check they stay valid after the
/// callback returns and after the tokenizer is gone.
#[derive(Default)]
struct Retaining {
    tags: Vec<Atom>,
    attrs: Vec<(Atom, SharedBuf)>,
    texts: Vec<SharedBuf>,
    doctype: Option<(SharedBuf, SharedBuf, SharedBuf)>,
    errors: Vec<SharedBuf>,
    eof: bool,
}

impl SharedTokenSink for Retaining {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        _force_quirks: bool,
    ) {
        self.doctype = Some((name, public_id, system_id));
    }
    fn start_tag(&mut self, name: Atom, _self_closing: bool, _num_attrs: usize) {
        self.tags.push(name);
    }
    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        self.attrs.push((name, value));
    }
    fn end_tag(&mut self, name: Atom) {
        self.tags.push(name);
    }
    fn comment(&mut self, text: SharedBuf) {
        self.texts.push(text);
    }
    fn chars(&mut self, text: SharedBuf) {
        self.texts.push(text);
    }
    fn null_char(&mut self) {}
    fn eof(&mut self) {
        self.eof = true;
    }
    fn error(&mut self, message: SharedBuf) {
        self.errors.push(message);
    }
}

fn tokenize(input: &str) -> Retaining {
    let mut tok = SharedTokenizer::new(Retaining::default());
    tok.feed(input);
    tok.end();
    tok.free()
}

#[test]
fn retained_buffers_outlive_the_tokenizer() {
    let sink = tokenize("<!DOCTYPE html><p class=intro>hello<!--note--></p>");
    assert!(sink.eof);
    let texts: Vec<&[u8]> = sink.texts.iter().map(ByteSpan::as_bytes).collect();
    assert_eq!(texts, vec![&b"hello"[..], &b"note"[..]]);
    let (name, public_id, system_id) = sink.doctype.expect("doctype");
    assert_eq!(name.as_bytes(), b"html");
    assert!(public_id.is_empty());
    assert!(system_id.is_empty());
    assert_eq!(sink.attrs[0].1.as_bytes(), b"intro");
}

#[test]
fn start_and_end_tags_share_one_atom() {
    let sink = tokenize("<Section></SECTION>");
    assert_eq!(sink.tags.len(), 2);
    assert_eq!(sink.tags[0], sink.tags[1]);
    assert_eq!(sink.tags[0], Atom::from("section"));
    assert_eq!(sink.tags[0].to_string(), "section");
}

#[test]
fn attribute_names_are_interned_lowercase() {
    let sink = tokenize("<input TYPE=checkbox Checked>");
    let names: Vec<String> = sink.attrs.iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, vec!["type", "checked"]);
    assert!(sink.attrs[1].1.is_empty());
}

#[test]
fn retained_text_can_be_shared_and_extended_independently() {
    let sink = tokenize("abc<br>");
    let text = sink.texts[0].clone();
    assert!(text.ptr_eq(&sink.texts[0]));
    let mut extended = text.clone();
    extended.push_bytes(b"def");
    assert_eq!(extended.as_bytes(), b"abcdef");
    assert_eq!(text.as_bytes(), b"abc");
    assert_eq!(sink.texts[0].as_bytes(), b"abc");
}

#[test]
fn one_batch_shares_one_allocation() {
    let mut tok = SharedTokenizer::new(Retaining::default());
    tok.feed("<!DOCTYPE html><p title=intro>hello<!--note--></p>");
    let sink = tok.sink();
    let (name, _, system_id) = sink.doctype.as_ref().expect("doctype");
    let value = &sink.attrs[0].1;
    assert_eq!(value.as_bytes(), b"intro");
    assert!(name.ptr_eq(value));
    for text in &sink.texts {
        assert!(text.ptr_eq(value));
    }
    assert!(system_id.is_empty());
    assert_eq!(value.share_count(), 4);

    tok.end();
    let sink = tok.free();
    assert!(sink.eof);
    assert_eq!(sink.texts.len(), 2);
}

#[test]
fn separate_feeds_use_separate_allocations() {
    let mut tok = SharedTokenizer::new(Retaining::default());
    tok.feed("one<br>");
    tok.feed("two<br>");
    let sink = tok.free();
    let texts: Vec<&[u8]> = sink.texts.iter().map(ByteSpan::as_bytes).collect();
    assert_eq!(texts, vec![&b"one"[..], &b"two"[..]]);
    assert!(!sink.texts[0].ptr_eq(&sink.texts[1]));
}

#[test]
fn feed_accepts_owned_buffers() {
    let mut tok = SharedTokenizer::new(Retaining::default());
    tok.feed(String::from("<b>"));
    tok.feed(b"bold".to_vec());
    tok.feed(SharedBuf::from("</b>"));
    tok.end();
    let sink = tok.free();
    assert_eq!(sink.tags.len(), 2);
    assert_eq!(sink.texts[0].as_bytes(), b"bold");
}

#[test]
fn error_messages_are_delivered_as_buffers() {
    let sink = tokenize("</>");
    assert_eq!(sink.errors.len(), 1);
    assert_eq!(sink.errors[0].as_bytes(), b"missing-end-tag-name");
}

#[test]
fn both_surfaces_agree_on_mixed_markup() {
    let config = TokenizerConfig::default();
    let input = "<!doctype html><ul><li data-x='1'>&lt;one&gt;<li>two\0</ul><!-- c -->".as_bytes();
    assert_eq!(run_shared(&config, input), run_borrowed(&config, input));
}
