use std::borrow::Cow;

const ESC: char = '\x1b';

/// Level words recognised inside colour codes. `WARNING` must precede `WARN`.
const LEVEL_WORDS: [&str; 4] = ["ERROR", "WARNING", "WARN", "INFO"];

/// Coarse classification of a normalised level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelClass {
    Error,
    Warning,
    Other,
}

impl LevelClass {
    pub fn of(level: &str) -> Self {
        match level {
            "ERROR" => LevelClass::Error,
            "WARNING" | "WARN" => LevelClass::Warning,
            _ => LevelClass::Other,
        }
    }

    pub fn is_problem(self) -> bool {
        !matches!(self, LevelClass::Other)
    }
}

/// Replace colour-wrapped level tokens (`\x1b[0;31mERROR\x1b[0m`) with the bare word.
///
/// Escape sequences that do not wrap a level word are left untouched.
pub fn normalize_levels(line: &str) -> Cow<'_, str> {
    if !line.contains(ESC) {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(pos) = rest.find(ESC) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match wrapped_level(tail) {
            Some((word, consumed)) => {
                out.push_str(word);
                rest = &tail[consumed..];
            }
            None => {
                out.push(ESC);
                rest = &tail[ESC.len_utf8()..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Remove every CSI escape sequence.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains(ESC) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find(ESC) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        rest = &tail[csi_len(tail).unwrap_or(ESC.len_utf8())..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Level column as used for counting: no colour, no padding, upper case.
pub fn normalize_level(raw: &str) -> String {
    strip_ansi(raw).trim().to_uppercase()
}

fn wrapped_level(s: &str) -> Option<(&str, usize)> {
    let open = sgr_len(s)?;
    let after = &s[open..];
    let word = LEVEL_WORDS.iter().find(|w| after.starts_with(**w))?;
    let close = sgr_len(&after[word.len()..])?;
    Some((&after[..word.len()], open + word.len() + close))
}

/// Length of a leading `ESC [ <digits;> m` sequence.
fn sgr_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != 0x1b || bytes[1] != b'[' {
        return None;
    }
    let mut i = 2;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b';') {
        i += 1;
    }
    (i < bytes.len() && bytes[i] == b'm').then_some(i + 1)
}

/// Length of a leading CSI sequence of any kind.
fn csi_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != 0x1b || bytes[1] != b'[' {
        return None;
    }
    let mut i = 2;
    while i < bytes.len() && (0x20..=0x3f).contains(&bytes[i]) {
        i += 1;
    }
    (i < bytes.len() && (0x40..=0x7e).contains(&bytes[i])).then_some(i + 1)
}
