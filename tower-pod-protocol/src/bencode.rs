//! Bencode encoding for [`WireValue`]
//!
//! Every value is self-delimiting, so a message needs no outer frame:
//! `i<n>e` integers, `<len>:<bytes>` strings, `l...e` lists and `d...e`
//! maps. Decoding is incremental: an incomplete buffer yields `Ok(None)`
//! rather than an error so the caller can wait for more input.

use bytes::{BufMut, BytesMut};

use crate::value::WireValue;

/// Maximum nesting of lists and maps accepted by the decoder
pub const MAX_DEPTH: usize = 256;

/// Malformed input; the stream cannot be resynchronized past this point
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed bencode at byte {offset}: {reason}")]
pub struct DecodeError {
    pub offset: usize,
    pub reason: &'static str,
}

impl DecodeError {
    fn at(offset: usize, reason: &'static str) -> Self {
        Self { offset, reason }
    }
}

type Parsed = Result<Option<(WireValue, usize)>, DecodeError>;

/// Decode one value from the front of `buf`
///
/// Returns the value and the number of bytes it occupied, or `None` when
/// `buf` holds only a prefix of a value.
pub fn decode(buf: &[u8]) -> Parsed {
    parse(buf, 0, 0)
}

/// Encode a value into a fresh buffer
pub fn encode(value: &WireValue) -> Vec<u8> {
    let mut dst = BytesMut::new();
    encode_into(value, &mut dst);
    dst.to_vec()
}

/// Append the encoding of `value` to `dst`
pub fn encode_into(value: &WireValue, dst: &mut BytesMut) {
    match value {
        WireValue::Int(n) => {
            dst.put_u8(b'i');
            dst.put_slice(n.to_string().as_bytes());
            dst.put_u8(b'e');
        }
        WireValue::Bytes(bytes) => put_bytes(bytes, dst),
        WireValue::List(items) => {
            dst.put_u8(b'l');
            for item in items {
                encode_into(item, dst);
            }
            dst.put_u8(b'e');
        }
        WireValue::Dict(entries) => {
            dst.put_u8(b'd');
            for (key, item) in entries {
                put_bytes(key, dst);
                encode_into(item, dst);
            }
            dst.put_u8(b'e');
        }
    }
}

fn put_bytes(bytes: &[u8], dst: &mut BytesMut) {
    dst.put_slice(bytes.len().to_string().as_bytes());
    dst.put_u8(b':');
    dst.put_slice(bytes);
}

/// Resumable search for the end of one top-level value
///
/// Remembers the position and open container depth reached by the last
/// call, so bytes already passed over are not looked at again while a
/// large value arrives in pieces. Only the structure is followed here; the
/// value is validated by [`decode`] once its end is known. A byte the
/// scanner cannot make sense of ends the scan just past it, which makes
/// [`decode`] report the problem at that offset.
#[derive(Debug, Default, Clone)]
pub struct Scanner {
    pos: usize,
    depth: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the first complete value in `buf`, or `None` if more
    /// input is needed
    ///
    /// `buf` must start where it started on the previous call and only
    /// have grown since. Call [`Scanner::reset`] after consuming a value.
    pub fn scan(&mut self, buf: &[u8]) -> Option<usize> {
        while let Some(&tag) = buf.get(self.pos) {
            let next = match tag {
                b'i' => match scan_int(buf, self.pos) {
                    Step::Next(next) => next,
                    Step::Stop(end) => return Some(end),
                    Step::More => return None,
                },
                b'0'..=b'9' => match scan_bytes(buf, self.pos) {
                    Step::Next(next) => next,
                    Step::Stop(end) => return Some(end),
                    Step::More => return None,
                },
                b'l' | b'd' => {
                    self.depth += 1;
                    if self.depth > MAX_DEPTH {
                        return Some(self.pos + 1);
                    }
                    self.pos + 1
                }
                b'e' if self.depth > 0 => {
                    self.depth -= 1;
                    self.pos + 1
                }
                _ => return Some(self.pos + 1),
            };

            self.pos = next;
            if self.depth == 0 {
                return Some(next);
            }
        }
        None
    }

    /// Forget progress, for a buffer that now starts at a new value
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

enum Step {
    /// Token complete; continue at this offset
    Next(usize),
    /// Hand the buffer up to this offset to the decoder
    Stop(usize),
    /// Token not complete yet
    More,
}

/// Longest digit run a valid integer or length can have
const MAX_DIGITS: usize = 20;

fn scan_int(buf: &[u8], pos: usize) -> Step {
    let start = pos + 1;
    for (i, &b) in buf[start..].iter().enumerate() {
        match b {
            b'e' => return Step::Next(start + i + 1),
            b'0'..=b'9' | b'-' if i <= MAX_DIGITS => {}
            _ => return Step::Stop(start + i + 1),
        }
    }
    Step::More
}

fn scan_bytes(buf: &[u8], pos: usize) -> Step {
    let Some(colon) = buf[pos..].iter().position(|b| !b.is_ascii_digit()) else {
        return if buf.len() - pos > MAX_DIGITS {
            Step::Stop(buf.len())
        } else {
            Step::More
        };
    };
    let colon = pos + colon;
    if buf[colon] != b':' || colon - pos > MAX_DIGITS {
        return Step::Stop(colon + 1);
    }

    let end = std::str::from_utf8(&buf[pos..colon])
        .ok()
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(|len| (colon + 1).checked_add(len));
    match end {
        Some(end) if end <= buf.len() => Step::Next(end),
        Some(_) => Step::More,
        None => Step::Stop(colon + 1),
    }
}

fn parse(buf: &[u8], pos: usize, depth: usize) -> Parsed {
    let Some(&tag) = buf.get(pos) else {
        return Ok(None);
    };

    match tag {
        b'i' => parse_int(buf, pos),
        b'0'..=b'9' => {
            Ok(parse_bytes(buf, pos)?.map(|(bytes, end)| (WireValue::Bytes(bytes), end)))
        }
        b'l' => {
            if depth >= MAX_DEPTH {
                return Err(DecodeError::at(pos, "nesting too deep"));
            }
            let mut items = Vec::new();
            let mut cursor = pos + 1;
            loop {
                match buf.get(cursor) {
                    None => return Ok(None),
                    Some(b'e') => return Ok(Some((WireValue::List(items), cursor + 1))),
                    Some(_) => match parse(buf, cursor, depth + 1)? {
                        None => return Ok(None),
                        Some((item, end)) => {
                            items.push(item);
                            cursor = end;
                        }
                    },
                }
            }
        }
        b'd' => {
            if depth >= MAX_DEPTH {
                return Err(DecodeError::at(pos, "nesting too deep"));
            }
            let mut entries = Vec::new();
            let mut cursor = pos + 1;
            loop {
                match buf.get(cursor) {
                    None => return Ok(None),
                    Some(b'e') => return Ok(Some((WireValue::Dict(entries), cursor + 1))),
                    Some(b'0'..=b'9') => {
                        let Some((key, key_end)) = parse_bytes(buf, cursor)? else {
                            return Ok(None);
                        };
                        let Some((item, end)) = parse(buf, key_end, depth + 1)? else {
                            return Ok(None);
                        };
                        entries.push((key, item));
                        cursor = end;
                    }
                    Some(_) => return Err(DecodeError::at(cursor, "map key must be a string")),
                }
            }
        }
        _ => Err(DecodeError::at(pos, "unexpected byte")),
    }
}

fn parse_int(buf: &[u8], pos: usize) -> Parsed {
    let start = pos + 1;
    let Some(len) = buf[start..].iter().position(|&b| b == b'e') else {
        // Reject garbage early instead of waiting forever for an 'e'
        let tail = &buf[start..];
        let valid_prefix = tail
            .iter()
            .enumerate()
            .all(|(i, &b)| b.is_ascii_digit() || (i == 0 && b == b'-'));
        return if valid_prefix && tail.len() <= 20 {
            Ok(None)
        } else {
            Err(DecodeError::at(start, "invalid integer"))
        };
    };

    let digits = &buf[start..start + len];
    let unsigned = digits.strip_prefix(b"-").unwrap_or(digits);
    let canonical = !unsigned.is_empty()
        && unsigned.iter().all(u8::is_ascii_digit)
        && !(unsigned.len() > 1 && unsigned[0] == b'0')
        && digits != b"-0";
    if !canonical {
        return Err(DecodeError::at(start, "invalid integer"));
    }

    let n = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| DecodeError::at(start, "integer out of range"))?;

    Ok(Some((WireValue::Int(n), start + len + 1)))
}

fn parse_bytes(buf: &[u8], pos: usize) -> Result<Option<(Vec<u8>, usize)>, DecodeError> {
    let Some(colon) = buf[pos..].iter().position(|&b| b == b':') else {
        return if buf[pos..].iter().all(u8::is_ascii_digit) && buf.len() - pos <= 20 {
            Ok(None)
        } else {
            Err(DecodeError::at(pos, "invalid string length"))
        };
    };

    let digits = &buf[pos..pos + colon];
    if digits.is_empty()
        || !digits.iter().all(u8::is_ascii_digit)
        || (digits.len() > 1 && digits[0] == b'0')
    {
        return Err(DecodeError::at(pos, "invalid string length"));
    }

    let len = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| DecodeError::at(pos, "string length out of range"))?;

    let start = pos + colon + 1;
    let end = match start.checked_add(len) {
        Some(end) => end,
        None => return Err(DecodeError::at(pos, "string length out of range")),
    };
    if buf.len() < end {
        return Ok(None);
    }

    Ok(Some((buf[start..end].to_vec(), end)))
}
