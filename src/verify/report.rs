use std::borrow::Cow;
use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::compare::{CompareOptions, explain_mismatch};
use crate::corpus::{Bullet, BulletStore};

use super::{Failure, FailureKind};

/// How failure diagnostics are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStyle {
    /// Decode `\uXXXX` escapes in bodies before printing.
    pub utf8: bool,
    /// Print the path of the first mismatch instead of both bodies.
    pub diff: bool,
    pub color: bool,
}

/// Prints every collected failure to stdout.
///
/// # Errors
///
/// Returns an error when stdout cannot be written.
pub fn print_failures(
    store: &BulletStore,
    failures: &[Failure],
    style: ReportStyle,
    options: CompareOptions,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for failure in failures {
        if let Some(bullet) = store.get(failure.bullet_index) {
            render_failure(&mut out, bullet, failure, style, options)?;
        }
    }
    out.flush()
}

/// Writes the two diagnostic lines of one failure.
///
/// # Errors
///
/// Returns an error when `out` cannot be written.
pub fn render_failure<W: Write>(
    out: &mut W,
    bullet: &Bullet,
    failure: &Failure,
    style: ReportStyle,
    options: CompareOptions,
) -> io::Result<()> {
    let request_body = display_body(&bullet.request.body, style.utf8);
    let got_body = display_body(&failure.got_body, style.utf8);
    let expected_body = display_body(&bullet.response.body, style.utf8);

    write_label(out, "REQUEST", Color::Cyan, style.color)?;
    queue!(
        out,
        Print(format!(
            " URI:{} BODY:{}\n",
            bullet.request.uri_lossy(),
            request_body
        ))
    )?;

    queue!(out, Print("\t"))?;
    match failure.kind {
        FailureKind::Status => {
            write_label(out, "RESPONSE STATUS", Color::Red, style.color)?;
            queue!(
                out,
                Print(format!(
                    " GOT {} != EXPECT {}. BODY GOT {} / EXPECT {}\n",
                    failure.got_status, failure.expected_status, got_body, expected_body
                ))
            )?;
        }
        FailureKind::Body if style.diff => {
            write_label(out, "RESPONSE BODY", Color::Yellow, style.color)?;
            let detail = explain_mismatch(&bullet.response.body, &failure.got_body, options)
                .map_or_else(|| "bodies differ".to_owned(), |mismatch| mismatch.to_string());
            queue!(out, Print(format!(" MISMATCH AT {}\n", detail)))?;
        }
        FailureKind::Body => {
            write_label(out, "RESPONSE BODY", Color::Yellow, style.color)?;
            queue!(
                out,
                Print(format!(" GOT {} != EXPECT {}\n", got_body, expected_body))
            )?;
        }
    }
    Ok(())
}

fn write_label<W: Write>(out: &mut W, label: &str, color: Color, colored: bool) -> io::Result<()> {
    if colored {
        queue!(out, SetForegroundColor(color), Print(label), ResetColor)
    } else {
        queue!(out, Print(label))
    }
}

fn display_body(body: &[u8], utf8: bool) -> Cow<'_, str> {
    if utf8 {
        Cow::Owned(unescape_for_display(body))
    } else {
        String::from_utf8_lossy(body)
    }
}

/// Replaces `\uXXXX` escapes (surrogate pairs included) with the characters
/// they encode. Every other byte, other escapes included, is kept as is so
/// the result still reads as JSON.
#[must_use]
pub fn unescape_for_display(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut out = String::with_capacity(text.len());
    let mut rest: &str = &text;

    while let Some(pos) = rest.find("\\u") {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        match decode_escape(tail) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = tail.get(consumed..).unwrap_or_default();
            }
            None => {
                out.push_str("\\u");
                rest = tail.get(2..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the escape at the start of `input`, returning the character and
/// the number of bytes it spans.
fn decode_escape(input: &str) -> Option<(char, usize)> {
    let high = hex_unit(input)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high).map(|decoded| (decoded, 6));
    }
    let low = hex_unit(input.get(6..)?)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    let code = high
        .checked_sub(0xD800)?
        .checked_shl(10)?
        .checked_add(low.checked_sub(0xDC00)?)?
        .checked_add(0x1_0000)?;
    char::from_u32(code).map(|decoded| (decoded, 12))
}

fn hex_unit(input: &str) -> Option<u32> {
    let digits = input.strip_prefix("\\u")?.get(..4)?;
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
