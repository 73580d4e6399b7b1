//! Sink that writes each callback as one line of text or JSON.

use std::borrow::Cow;
use std::io::{self, Write};

use clap::ValueEnum;
use html5::{Atom, BorrowedBuf, ByteSpan, SharedBuf, SharedTokenSink, TokenSink};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Doctype {
        name: Cow<'a, str>,
        public_id: Cow<'a, str>,
        system_id: Cow<'a, str>,
        force_quirks: bool,
    },
    StartTag {
        name: Cow<'a, str>,
        self_closing: bool,
        num_attrs: usize,
    },
    TagAttr {
        name: Cow<'a, str>,
        value: Cow<'a, str>,
    },
    EndTag {
        name: Cow<'a, str>,
    },
    Comment {
        text: Cow<'a, str>,
    },
    Chars {
        text: Cow<'a, str>,
    },
    NullChar,
    Eof,
    Error {
        message: Cow<'a, str>,
    },
}

impl Event<'_> {
    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Event::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            } => writeln!(
                out,
                "doctype name={name:?} public_id={public_id:?} system_id={system_id:?} force_quirks={force_quirks}"
            ),
            Event::StartTag {
                name,
                self_closing,
                num_attrs,
            } => writeln!(
                out,
                "start_tag {name} self_closing={self_closing} attrs={num_attrs}"
            ),
            Event::TagAttr { name, value } => writeln!(out, "  attr {name}={value:?}"),
            Event::EndTag { name } => writeln!(out, "end_tag {name}"),
            Event::Comment { text } => writeln!(out, "comment {text:?}"),
            Event::Chars { text } => writeln!(out, "chars {text:?}"),
            Event::NullChar => writeln!(out, "null_char"),
            Event::Eof => writeln!(out, "eof"),
            Event::Error { message } => writeln!(out, "error {message}"),
        }
    }
}

/// Writes events as they arrive. The first write failure is kept and every
/// later callback is ignored; [`EventWriter::finish`] reports it.
pub struct EventWriter<W: Write> {
    out: W,
    format: Format,
    failure: Option<io::Error>,
}

impl<W: Write> EventWriter<W> {
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            failure: None,
        }
    }

    pub fn finish(mut self) -> io::Result<()> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.out.flush()
    }

    fn write(&mut self, event: Event<'_>) {
        if self.failure.is_some() {
            return;
        }
        let result = match self.format {
            Format::Text => event.write_text(&mut self.out),
            Format::Json => serde_json::to_writer(&mut self.out, &event)
                .map_err(io::Error::from)
                .and_then(|()| self.out.write_all(b"\n")),
        };
        if let Err(err) = result {
            log::debug!("output failed, ignoring further events: {err}");
            self.failure = Some(err);
        }
    }
}

fn text(buf: &impl ByteSpan) -> Cow<'_, str> {
    buf.to_str_lossy()
}

fn atom(name: Atom) -> Cow<'static, str> {
    Cow::Owned(name.to_string_lossy())
}

impl<W: Write> TokenSink for EventWriter<W> {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        self.write(Event::Doctype {
            name: text(&name),
            public_id: text(&public_id),
            system_id: text(&system_id),
            force_quirks,
        });
    }

    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        self.write(Event::StartTag {
            name: text(&name),
            self_closing,
            num_attrs,
        });
    }

    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        self.write(Event::TagAttr {
            name: text(&name),
            value: text(&value),
        });
    }

    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        self.write(Event::EndTag { name: text(&name) });
    }

    fn comment(&mut self, body: BorrowedBuf<'_>) {
        self.write(Event::Comment { text: text(&body) });
    }

    fn chars(&mut self, body: BorrowedBuf<'_>) {
        self.write(Event::Chars { text: text(&body) });
    }

    fn null_char(&mut self) {
        self.write(Event::NullChar);
    }

    fn eof(&mut self) {
        self.write(Event::Eof);
    }

    fn error(&mut self, message: BorrowedBuf<'_>) {
        self.write(Event::Error {
            message: text(&message),
        });
    }
}

impl<W: Write> SharedTokenSink for EventWriter<W> {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        self.write(Event::Doctype {
            name: text(&name),
            public_id: text(&public_id),
            system_id: text(&system_id),
            force_quirks,
        });
    }

    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        self.write(Event::StartTag {
            name: atom(name),
            self_closing,
            num_attrs,
        });
    }

    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        self.write(Event::TagAttr {
            name: atom(name),
            value: text(&value),
        });
    }

    fn end_tag(&mut self, name: Atom) {
        self.write(Event::EndTag { name: atom(name) });
    }

    fn comment(&mut self, body: SharedBuf) {
        self.write(Event::Comment { text: text(&body) });
    }

    fn chars(&mut self, body: SharedBuf) {
        self.write(Event::Chars { text: text(&body) });
    }

    fn null_char(&mut self) {
        self.write(Event::NullChar);
    }

    fn eof(&mut self) {
        self.write(Event::Eof);
    }

    fn error(&mut self, message: SharedBuf) {
        self.write(Event::Error {
            message: text(&message),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html5::Tokenizer;

    fn render(input: &str, format: Format) -> String {
        let mut out = Vec::new();
        let mut tok = Tokenizer::new(EventWriter::new(&mut out, format));
        tok.feed(input);
        tok.end();
        tok.free().finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_format_lists_one_callback_per_line() {
        assert_eq!(
            render("<a href=x>hi", Format::Text),
            "start_tag a self_closing=false attrs=1\n  attr href=\"x\"\nchars \"hi\"\neof\n"
        );
    }

    #[test]
    fn json_format_tags_each_event() {
        let out = render("<br/>", Format::Json);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "start_tag");
        assert_eq!(lines[0]["name"], "br");
        assert_eq!(lines[0]["self_closing"], true);
        assert_eq!(lines[1]["event"], "eof");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_sticky_and_reported_at_finish() {
        let mut tok = Tokenizer::new(EventWriter::new(Broken, Format::Text));
        tok.feed("<p>a</p>");
        tok.end();
        let err = tok.free().finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
