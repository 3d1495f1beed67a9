//! RTF to plain text conversion.
//!
//! A single-pass byte scanner that keeps visible body text and drops
//! formatting, header tables, and embedded objects. Paragraphs are separated by
//! one blank line.

use encoding_rs::Encoding;

/// Destinations whose content is never visible text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "annotation",
    "atnid",
    "author",
    "buptim",
    "colortbl",
    "comment",
    "creatim",
    "datastore",
    "fldinst",
    "fonttbl",
    "footer",
    "footerf",
    "footerl",
    "footerr",
    "footnote",
    "header",
    "headerf",
    "headerl",
    "headerr",
    "info",
    "keywords",
    "latentstyles",
    "listoverridetable",
    "listtable",
    "listtext",
    "nonshppict",
    "object",
    "operator",
    "pict",
    "pntext",
    "pntxta",
    "pntxtb",
    "printim",
    "revtbl",
    "revtim",
    "rsidtbl",
    "shp",
    "shpinst",
    "stylesheet",
    "subject",
    "themedata",
    "title",
    "xmlnstbl",
];

/// Control words mapped directly to characters.
const SYMBOLS: &[(&str, char)] = &[
    ("bullet", '\u{2022}'),
    ("emdash", '\u{2014}'),
    ("emspace", ' '),
    ("endash", '\u{2013}'),
    ("enspace", ' '),
    ("ldblquote", '\u{201c}'),
    ("line", ' '),
    ("lquote", '\u{2018}'),
    ("qmspace", ' '),
    ("rdblquote", '\u{201d}'),
    ("rquote", '\u{2019}'),
    ("tab", '\t'),
];

/// Longest control word the scanner accepts.
const MAX_WORD_LEN: usize = 32;

/// Converts RTF bytes to plain text.
///
/// Input that is not RTF is returned as plain text with normalised line
/// endings.
#[must_use]
pub fn rtf_to_text(input: &[u8]) -> String {
    if !is_rtf(input) {
        return plain_text(input);
    }
    Scanner::new(input).run()
}

/// Whether the bytes start with an RTF header.
#[must_use]
pub fn is_rtf(input: &[u8]) -> bool {
    let input = input.strip_prefix(b"\xef\xbb\xbf").unwrap_or(input);
    input.trim_ascii_start().starts_with(b"{\\rtf")
}

fn plain_text(input: &[u8]) -> String {
    String::from_utf8_lossy(input)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// Formatting state saved and restored at group boundaries.
#[derive(Debug, Clone, Copy)]
struct GroupState {
    /// Inside a destination that produces no text.
    skip: bool,
    /// Fallback characters following a `\u` escape.
    unicode_skip: usize,
    /// Current paragraph is part of a table.
    in_table: bool,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            skip: false,
            unicode_skip: 1,
            in_table: false,
        }
    }
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    state: GroupState,
    stack: Vec<GroupState>,
    encoding: &'static Encoding,
    /// Code page bytes not yet decoded.
    pending: Vec<u8>,
    /// Fallback characters still to be discarded.
    fallback: usize,
    /// High half of a UTF-16 surrogate pair from `\u`.
    high_surrogate: Option<u32>,
    paragraph: String,
    paragraphs: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            state: GroupState::default(),
            stack: Vec::new(),
            encoding: encoding_rs::WINDOWS_1252,
            pending: Vec::new(),
            fallback: 0,
            high_surrogate: None,
            paragraph: String::new(),
            paragraphs: Vec::new(),
        }
    }

    fn run(mut self) -> String {
        while let Some(&byte) = self.input.get(self.pos) {
            self.pos += 1;
            match byte {
                b'{' => {
                    self.stack.push(self.state);
                    self.fallback = 0;
                }
                b'}' => {
                    self.flush_pending();
                    self.state = self.stack.pop().unwrap_or_default();
                    self.fallback = 0;
                }
                b'\\' => self.control(),
                b'\r' | b'\n' => {}
                _ => self.raw_byte(byte),
            }
        }
        self.end_paragraph();
        self.paragraphs.join("\n\n")
    }

    fn text_visible(&self) -> bool {
        !self.state.skip && !self.state.in_table
    }

    fn raw_byte(&mut self, byte: u8) {
        if self.fallback > 0 {
            self.fallback -= 1;
            return;
        }
        if self.text_visible() {
            self.pending.push(byte);
        }
    }

    fn emit(&mut self, ch: char) {
        if self.fallback > 0 {
            self.fallback -= 1;
            return;
        }
        if self.text_visible() {
            self.flush_pending();
            self.paragraph.push(ch);
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let (decoded, _) = self.encoding.decode_without_bom_handling(&self.pending);
        self.paragraph.push_str(&decoded);
        self.pending.clear();
    }

    fn end_paragraph(&mut self) {
        self.flush_pending();
        let text = self.paragraph.trim();
        if !text.is_empty() {
            self.paragraphs.push(text.to_string());
        }
        self.paragraph.clear();
    }

    fn control(&mut self) {
        let Some(&next) = self.input.get(self.pos) else {
            return;
        };

        if next.is_ascii_alphabetic() {
            let (word, param) = self.read_word();
            self.word(&word, param);
            return;
        }

        self.pos += 1;
        match next {
            b'\'' => self.hex_escape(),
            b'*' => self.state.skip = true,
            b'{' | b'}' | b'\\' => self.emit(char::from(next)),
            b'~' => self.emit('\u{a0}'),
            b'_' => self.emit('\u{2011}'),
            b'\r' | b'\n' => self.paragraph_break(),
            _ => {}
        }
    }

    fn read_word(&mut self) -> (String, Option<i32>) {
        let start = self.pos;
        while self.pos < self.input.len()
            && self.input[self.pos].is_ascii_alphabetic()
            && self.pos - start < MAX_WORD_LEN
        {
            self.pos += 1;
        }
        let word = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();

        let param_start = self.pos;
        if self.input.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        let param = std::str::from_utf8(&self.input[param_start..self.pos])
            .ok()
            .and_then(|s| s.parse::<i32>().ok());
        let has_digits = self.input[param_start..self.pos].iter().any(u8::is_ascii_digit);
        if param.is_none() && !has_digits {
            self.pos = param_start;
        }

        if self.input.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }

        // Out-of-range parameter: the control word is dropped.
        if param.is_none() && has_digits {
            return (String::new(), None);
        }

        (word, param)
    }

    fn hex_escape(&mut self) {
        let byte = self
            .input
            .get(self.pos..self.pos + 2)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok());

        if let Some(byte) = byte {
            self.pos += 2;
            self.raw_byte(byte);
        }
    }

    fn word(&mut self, word: &str, param: Option<i32>) {
        if SKIPPED_DESTINATIONS.contains(&word) {
            self.state.skip = true;
            return;
        }

        if let Some(&(_, ch)) = SYMBOLS.iter().find(|(name, _)| *name == word) {
            self.emit(ch);
            return;
        }

        match word {
            "par" | "sect" | "page" => self.paragraph_break(),
            "pard" => self.state.in_table = false,
            "intbl" => self.state.in_table = true,
            "u" => {
                if let Some(value) = param {
                    self.unicode(value);
                }
            }
            "uc" => {
                self.state.unicode_skip = param.and_then(|p| usize::try_from(p).ok()).unwrap_or(1);
            }
            "bin" => {
                let len = param.and_then(|p| usize::try_from(p).ok()).unwrap_or(0);
                self.pos = (self.pos + len).min(self.input.len());
            }
            "ansicpg" => {
                if let Some(encoding) = param.and_then(encoding_for_codepage) {
                    self.encoding = encoding;
                }
            }
            "mac" => self.encoding = encoding_rs::MACINTOSH,
            _ => {}
        }
    }

    fn paragraph_break(&mut self) {
        if self.state.skip {
            return;
        }
        self.fallback = 0;
        self.end_paragraph();
    }

    fn unicode(&mut self, value: i32) {
        let code = if value < 0 { value + 0x1_0000 } else { value };
        let Ok(code) = u32::try_from(code) else {
            return;
        };

        let ch = match (self.high_surrogate.take(), code) {
            (_, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(code);
                None
            }
            (Some(high), 0xDC00..=0xDFFF) => {
                char::from_u32(0x1_0000 + ((high - 0xD800) << 10) + (code - 0xDC00))
            }
            (_, code) => char::from_u32(code),
        };

        if let Some(ch) = ch {
            self.emit(ch);
        }
        self.fallback = self.state.unicode_skip;
    }
}

fn encoding_for_codepage(codepage: i32) -> Option<&'static Encoding> {
    let label = match codepage {
        437 | 850 | 1252 => return Some(encoding_rs::WINDOWS_1252),
        10000 => return Some(encoding_rs::MACINTOSH),
        65001 => return Some(encoding_rs::UTF_8),
        874 | 1250..=1258 => format!("windows-{codepage}"),
        932 => "shift_jis".to_string(),
        936 => "gbk".to_string(),
        949 => "euc-kr".to_string(),
        950 => "big5".to_string(),
        _ => return None,
    };
    Encoding::for_label(label.as_bytes())
}
