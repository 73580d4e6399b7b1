//! h5stream CLI
//!
//! Streams an HTML document through the tokenizer and prints one line per
//! sink callback. Diagnostics go through `log`; set `RUST_LOG=debug` (or
//! `RUST_LOG=html5.tokenizer=debug`) to see them on stderr.

mod output;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use html5::{
    ContractCheck, InitialState, SharedBuf, SharedTokenSink, SharedTokenizer, TokenSink,
    Tokenizer, TokenizerConfig, TokenizerStats,
};

use crate::output::{EventWriter, Format};

#[derive(Parser, Debug)]
#[command(name = "h5stream")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Tokenize a file, one callback per line
    h5stream page.html

    # Read stdin in 1-byte chunks through the shared-buffer surface
    cat page.html | h5stream --shared --chunk-size 1

    # Tokenize script content as JSON lines
    h5stream --initial-state script-data --last-start-tag script --format json body.js
"#)]
struct Cli {
    /// Input file; reads stdin when absent or "-"
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Bytes handed to each feed call
    #[arg(long, default_value = "4096")]
    chunk_size: usize,

    /// Deliver refcounted buffers and atoms instead of borrowed views
    #[arg(long)]
    shared: bool,

    /// Report parse errors with state and position
    #[arg(long)]
    exact_errors: bool,

    /// Keep a leading byte order mark as text
    #[arg(long)]
    keep_bom: bool,

    /// Panic if the callback stream breaks the sink contract
    #[arg(long)]
    check: bool,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[arg(long, value_enum, default_value_t = StartState::Data)]
    initial_state: StartState,

    /// Tag name whose end tag closes raw text content
    #[arg(long, value_name = "NAME")]
    last_start_tag: Option<String>,

    /// Print tokenizer counters to stderr when done
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StartState {
    Data,
    Rcdata,
    Rawtext,
    ScriptData,
    Plaintext,
}

impl From<StartState> for InitialState {
    fn from(state: StartState) -> Self {
        match state {
            StartState::Data => InitialState::Data,
            StartState::Rcdata => InitialState::Rcdata,
            StartState::Rawtext => InitialState::Rawtext,
            StartState::ScriptData => InitialState::ScriptData,
            StartState::Plaintext => InitialState::Plaintext,
        }
    }
}

impl Cli {
    fn config(&self) -> TokenizerConfig {
        TokenizerConfig {
            exact_errors: self.exact_errors,
            discard_bom: !self.keep_bom,
            initial_state: self.initial_state.into(),
            last_start_tag_name: self.last_start_tag.clone(),
        }
    }

    fn open_input(&self) -> Result<Box<dyn Read>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(file))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

/// Reads `input` in `chunk_size` pieces, handing each to `feed`.
fn pump(input: &mut dyn Read, chunk_size: usize, mut feed: impl FnMut(&[u8])) -> Result<()> {
    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err).context("failed to read input"),
        };
        feed(&buf[..n]);
    }
}

fn drive_borrowed<S: TokenSink>(
    sink: S,
    config: TokenizerConfig,
    input: &mut dyn Read,
    chunk_size: usize,
) -> Result<(S, TokenizerStats)> {
    let mut tok = Tokenizer::with_config(sink, config);
    pump(input, chunk_size, |chunk| tok.feed(chunk))?;
    tok.end();
    let stats = tok.stats();
    Ok((tok.free(), stats))
}

fn drive_shared<S: SharedTokenSink>(
    sink: S,
    config: TokenizerConfig,
    input: &mut dyn Read,
    chunk_size: usize,
) -> Result<(S, TokenizerStats)> {
    let mut tok = SharedTokenizer::with_config(sink, config);
    pump(input, chunk_size, |chunk| tok.feed(SharedBuf::from(chunk)))?;
    tok.end();
    let stats = tok.stats();
    Ok((tok.free(), stats))
}

fn run<W: Write>(cli: &Cli, writer: EventWriter<W>) -> Result<TokenizerStats> {
    let mut input = cli.open_input()?;
    let config = cli.config();
    let (writer, stats) = match (cli.shared, cli.check) {
        (false, false) => drive_borrowed(writer, config, &mut input, cli.chunk_size)?,
        (true, false) => drive_shared(writer, config, &mut input, cli.chunk_size)?,
        (false, true) => {
            let (check, stats) = drive_borrowed(
                ContractCheck::new(writer),
                config,
                &mut input,
                cli.chunk_size,
            )?;
            log::debug!("contract check passed after {} callbacks", check.callbacks());
            (check.into_inner(), stats)
        }
        (true, true) => {
            let (check, stats) = drive_shared(
                ContractCheck::new(writer),
                config,
                &mut input,
                cli.chunk_size,
            )?;
            log::debug!("contract check passed after {} callbacks", check.callbacks());
            (check.into_inner(), stats)
        }
    };
    writer.finish().context("failed to write output")?;
    Ok(stats)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    if cli.chunk_size == 0 {
        bail!("--chunk-size must be at least 1");
    }

    let stdout = io::stdout().lock();
    let writer = EventWriter::new(BufWriter::new(stdout), cli.format);
    let stats = run(&cli, writer)?;

    if cli.stats {
        eprintln!(
            "feeds={} bytes={} chars={} transitions={} tokens={} errors={}",
            stats.feeds,
            stats.bytes_fed,
            stats.chars_consumed,
            stats.state_transitions,
            stats.tokens_emitted,
            stats.parse_errors
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_all_knobs() {
        let cli = Cli::try_parse_from([
            "h5stream",
            "--shared",
            "--chunk-size",
            "3",
            "--initial-state",
            "script-data",
            "--last-start-tag",
            "script",
            "--format",
            "json",
            "-",
        ])
        .unwrap();
        assert!(cli.shared);
        assert_eq!(cli.chunk_size, 3);
        assert_eq!(cli.format, Format::Json);
        let config = cli.config();
        assert_eq!(config.initial_state, InitialState::ScriptData);
        assert_eq!(config.last_start_tag_name.as_deref(), Some("script"));
        assert!(config.discard_bom);
    }

    #[test]
    fn env_filter_enables_tokenizer_debug_records() {
        env_logger::Builder::new()
            .parse_filters("html5.tokenizer=debug")
            .is_test(true)
            .try_init()
            .unwrap();
        assert!(log::log_enabled!(target: "html5.tokenizer", log::Level::Debug));
        assert!(!log::log_enabled!(target: "h5stream", log::Level::Debug));
    }

    fn render(input: &[u8], chunk_size: usize, shared: bool) -> String {
        let mut out = Vec::new();
        let mut reader = input;
        let writer = EventWriter::new(&mut out, Format::Text);
        let config = TokenizerConfig::default();
        let (writer, _) = if shared {
            drive_shared(writer, config, &mut reader, chunk_size).unwrap()
        } else {
            drive_borrowed(writer, config, &mut reader, chunk_size).unwrap()
        };
        writer.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn chunk_size_and_surface_do_not_change_output() {
        let input = "<p class=x>caf\u{e9} &amp; more</p><!--c-->".as_bytes();
        let expected = render(input, 4096, false);
        for size in [1, 2, 5] {
            assert_eq!(render(input, size, false), expected);
            assert_eq!(render(input, size, true), expected);
        }
    }

    #[test]
    fn stats_count_every_feed() {
        let mut reader: &[u8] = b"<a>bc";
        let (_, stats) = drive_borrowed(
            EventWriter::new(io::sink(), Format::Text),
            TokenizerConfig::default(),
            &mut reader,
            2,
        )
        .unwrap();
        assert_eq!(stats.feeds, 3);
        assert_eq!(stats.bytes_fed, 5);
    }
}
