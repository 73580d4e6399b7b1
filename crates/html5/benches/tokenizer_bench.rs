use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html5::{
    Atom, BorrowedBuf, SharedBuf, SharedTokenSink, SharedTokenizer, TokenSink, Tokenizer,
};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let block = "<div class=box><span title=\"a&amp;b\">hello &lt;world&gt;</span><img src=x></div>\n";
    let mut out = String::with_capacity(block.len() * blocks);
    for _ in 0..blocks {
        out.push_str(block);
    }
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    while body.len() < bytes {
        body.push_str("</scri");
        body.push('<');
        body.push_str("pt");
    }
    body.push_str("</script>");
    body
}

/// Counts callbacks and touches every byte it is handed.
#[derive(Default)]
struct Tally {
    events: usize,
    bytes: usize,
}

impl TokenSink for Tally {
    fn doctype(&mut self, n: BorrowedBuf<'_>, p: BorrowedBuf<'_>, s: BorrowedBuf<'_>, _: bool) {
        self.events += 1;
        self.bytes += n.bytes().len() + p.bytes().len() + s.bytes().len();
    }
    fn start_tag(&mut self, name: BorrowedBuf<'_>, _: bool, _: usize) {
        self.events += 1;
        self.bytes += name.bytes().len();
    }
    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        self.events += 1;
        self.bytes += name.bytes().len() + value.bytes().len();
    }
    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        self.events += 1;
        self.bytes += name.bytes().len();
    }
    fn comment(&mut self, text: BorrowedBuf<'_>) {
        self.events += 1;
        self.bytes += text.bytes().len();
    }
    fn chars(&mut self, text: BorrowedBuf<'_>) {
        self.events += 1;
        self.bytes += text.bytes().len();
    }
    fn null_char(&mut self) {
        self.events += 1;
    }
    fn eof(&mut self) {
        self.events += 1;
    }
    fn error(&mut self, _: BorrowedBuf<'_>) {
        self.events += 1;
    }
}

impl SharedTokenSink for Tally {
    fn doctype(&mut self, n: SharedBuf, p: SharedBuf, s: SharedBuf, q: bool) {
        TokenSink::doctype(self, n.borrow(), p.borrow(), s.borrow(), q);
    }
    fn start_tag(&mut self, _: Atom, _: bool, _: usize) {
        self.events += 1;
    }
    fn tag_attr(&mut self, _: Atom, value: SharedBuf) {
        self.events += 1;
        self.bytes += value.borrow().bytes().len();
    }
    fn end_tag(&mut self, _: Atom) {
        self.events += 1;
    }
    fn comment(&mut self, text: SharedBuf) {
        TokenSink::comment(self, text.borrow());
    }
    fn chars(&mut self, text: SharedBuf) {
        TokenSink::chars(self, text.borrow());
    }
    fn null_char(&mut self) {
        self.events += 1;
    }
    fn eof(&mut self) {
        self.events += 1;
    }
    fn error(&mut self, _: SharedBuf) {
        self.events += 1;
    }
}

fn tokenize_borrowed(bytes: &[u8], chunk_size: usize) -> Tally {
    let mut tok = Tokenizer::new(Tally::default());
    for chunk in bytes.chunks(chunk_size) {
        tok.feed(chunk);
    }
    tok.end();
    tok.free()
}

fn tokenize_shared(bytes: &[u8], chunk_size: usize) -> Tally {
    let mut tok = SharedTokenizer::new(Tally::default());
    for chunk in bytes.chunks(chunk_size) {
        tok.feed(chunk);
    }
    tok.end();
    tok.free()
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| {
            let tally = tokenize_borrowed(black_box(input.as_bytes()), usize::MAX);
            black_box(tally.events);
        });
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| {
            let tally = tokenize_borrowed(black_box(input.as_bytes()), usize::MAX);
            black_box(tally.bytes);
        });
    });
}

fn bench_streaming_chunked(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let mut group = c.benchmark_group("bench_streaming_chunked");
    for size in [1usize, 7, 64, 1024] {
        group.bench_function(format!("chunk_{size}"), |b| {
            b.iter(|| {
                let tally = tokenize_borrowed(black_box(input.as_bytes()), size);
                black_box(tally.events);
            });
        });
    }
    group.finish();
}

fn bench_shared_surface(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_shared_surface_large", |b| {
        b.iter(|| {
            let tally = tokenize_shared(black_box(input.as_bytes()), 4096);
            black_box(tally.events);
        });
    });
}

fn bench_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(256 * 1024);
    c.bench_function("bench_rawtext_adversarial", |b| {
        b.iter(|| {
            let mut tok = Tokenizer::with_config(
                Tally::default(),
                html5::TokenizerConfig {
                    initial_state: html5::InitialState::ScriptData,
                    last_start_tag_name: Some("script".to_string()),
                    ..Default::default()
                },
            );
            tok.feed(black_box(input.as_bytes()));
            tok.end();
            black_box(tok.free().events);
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_streaming_chunked,
    bench_shared_surface,
    bench_rawtext_adversarial
);
criterion_main!(benches);
