//! Structural splitting of JSON text that the strict parser rejected.
//!
//! Only object and array boundaries are located; member values are returned
//! as raw slices and never validated, so a value the comparison does not
//! look at cannot fail it.
use super::mismatch::JsonKind;

/// Raw `(key, value)` members of an object, in document order.
pub(super) type RawMembers<'body> = Vec<(&'body [u8], &'body [u8])>;

/// Guesses the kind of the value starting at the first non-blank byte.
pub(super) fn kind_of(raw: &[u8]) -> Option<JsonKind> {
    let first = raw.get(skip_blank(raw, 0))?;
    match first {
        b'{' => Some(JsonKind::Object),
        b'[' => Some(JsonKind::Array),
        b'"' => Some(JsonKind::String),
        b't' | b'f' => Some(JsonKind::Bool),
        b'n' => Some(JsonKind::Null),
        b'-' | b'0'..=b'9' => Some(JsonKind::Number),
        _ => None,
    }
}

pub(super) fn split_object(raw: &[u8]) -> Option<RawMembers<'_>> {
    let mut pos = skip_blank(raw, 0);
    if raw.get(pos) != Some(&b'{') {
        return None;
    }
    let mut members = Vec::new();
    pos = skip_blank(raw, pos.checked_add(1)?);
    if raw.get(pos) == Some(&b'}') {
        return Some(members);
    }
    loop {
        pos = skip_blank(raw, pos);
        if raw.get(pos) != Some(&b'"') {
            return None;
        }
        let key_end = string_end(raw, pos)?;
        let key = raw.get(pos..key_end)?;
        pos = skip_blank(raw, key_end);
        if raw.get(pos) != Some(&b':') {
            return None;
        }
        let value_start = skip_blank(raw, pos.checked_add(1)?);
        let value_end = value_end(raw, value_start)?;
        members.push((key, raw.get(value_start..value_end)?));
        pos = skip_blank(raw, value_end);
        match raw.get(pos)? {
            b',' => pos = pos.checked_add(1)?,
            b'}' => return Some(members),
            _ => return None,
        }
    }
}

pub(super) fn split_array(raw: &[u8]) -> Option<Vec<&[u8]>> {
    let mut pos = skip_blank(raw, 0);
    if raw.get(pos) != Some(&b'[') {
        return None;
    }
    let mut items = Vec::new();
    pos = skip_blank(raw, pos.checked_add(1)?);
    if raw.get(pos) == Some(&b']') {
        return Some(items);
    }
    loop {
        let item_start = skip_blank(raw, pos);
        let item_end = value_end(raw, item_start)?;
        items.push(raw.get(item_start..item_end)?);
        pos = skip_blank(raw, item_end);
        match raw.get(pos)? {
            b',' => pos = pos.checked_add(1)?,
            b']' => return Some(items),
            _ => return None,
        }
    }
}

fn skip_blank(raw: &[u8], start: usize) -> usize {
    let blanks = raw
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|byte| byte.is_ascii_whitespace()).count());
    start.saturating_add(blanks)
}

/// Offset just past the value starting at `start`.
fn value_end(raw: &[u8], start: usize) -> Option<usize> {
    match raw.get(start)? {
        b'"' => string_end(raw, start),
        b'{' | b'[' => container_end(raw, start),
        _ => {
            let len = raw
                .get(start..)?
                .iter()
                .take_while(|byte| !matches!(byte, b',' | b'}' | b']') && !byte.is_ascii_whitespace())
                .count();
            (len > 0).then(|| start.saturating_add(len))
        }
    }
}

/// Offset just past the closing quote of the string opening at `start`.
fn string_end(raw: &[u8], start: usize) -> Option<usize> {
    let mut pos = start.checked_add(1)?;
    loop {
        match raw.get(pos)? {
            b'"' => return pos.checked_add(1),
            b'\\' => pos = pos.checked_add(2)?,
            _ => pos = pos.checked_add(1)?,
        }
    }
}

fn container_end(raw: &[u8], start: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut pos = start;
    loop {
        match raw.get(pos)? {
            b'"' => {
                pos = string_end(raw, pos)?;
                continue;
            }
            b'{' | b'[' => depth = depth.checked_add(1)?,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return pos.checked_add(1);
                }
            }
            _ => {}
        }
        pos = pos.checked_add(1)?;
    }
}
