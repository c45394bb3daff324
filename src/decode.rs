use crate::value::{Int, Value};
use crate::MAX_NESTING;
use std::str::Utf8Error;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("input ended at offset {0} before the value was complete")]
    Truncated(usize),

    #[error("unexpected trailing data at offset {0}")]
    TrailingBytes(usize),

    #[error("integer token at offset {0} is outside the representable range")]
    OutOfRange(usize),

    #[error("string payload is not well-formed UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize, source: Utf8Error },

    #[error("unsupported header class {class} at offset {offset}")]
    UnsupportedHeader { offset: usize, class: u8 },

    #[error("sequence at offset {0} exceeds the nesting limit")]
    NestingTooDeep(usize),

    #[error("expected {0}, found {1}")]
    UnexpectedType(&'static str, &'static str),
}

/// Types that can be read back from their encoded form.
///
/// `from_dbor` decodes one value from the start of `data` and returns
/// it together with the number of bytes consumed. Error offsets are
/// relative to `data`.
pub trait FromDbor: Sized {
    type Error: From<Error>;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Self::Error>;
}

/// Decodes a single value, requiring that it spans the entire input.
pub fn parse<T: FromDbor>(data: &[u8]) -> Result<T, T::Error> {
    let (value, len) = T::from_dbor(data)?;
    if len < data.len() {
        return Err(Error::TrailingBytes(len).into());
    }
    Ok(value)
}

/// Decodes a single value from the start of the input, returning it
/// together with the number of bytes consumed.
pub fn parse_prefix<T: FromDbor>(data: &[u8]) -> Result<(T, usize), T::Error> {
    T::from_dbor(data)
}

/// Decodes one [`Value`] spanning the entire input, with the default
/// nesting limit of [`MAX_NESTING`].
pub fn decode(data: &[u8]) -> Result<Value, Error> {
    decode_with_depth(data, MAX_NESTING)
}

/// Decodes one [`Value`] spanning the entire input, allowing at most
/// `max_depth` nested sequence levels.
pub fn decode_with_depth(data: &[u8], max_depth: usize) -> Result<Value, Error> {
    let mut cursor = Cursor { data, pos: 0 };
    let value = parse_value(&mut cursor, max_depth)?;
    if cursor.pos < data.len() {
        return Err(Error::TrailingBytes(cursor.pos));
    }
    Ok(value)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take_byte(&mut self) -> Result<u8, Error> {
        let byte = *self.data.get(self.pos).ok_or(Error::Truncated(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Takes a payload of a token-declared length. The declared length
    /// may exceed `usize`, in which case it cannot fit the remaining
    /// input either.
    fn take_payload(&mut self, declared: u128) -> Result<&'a [u8], Error> {
        if declared > self.remaining() as u128 {
            return Err(Error::Truncated(self.data.len()));
        }
        let end = self.pos + declared as usize;
        let payload = &self.data[self.pos..end];
        self.pos = end;
        Ok(payload)
    }
}

/// Completes an integer token whose header byte has been read.
///
/// Direct tokens carry the value in the header's low five bits; an
/// extended token with k tail bytes decodes to
/// `23 + Σ (tail[i] + 1) · 256^i`. The k-byte ranges are disjoint, so
/// every value has exactly one token form. An eight-byte token can
/// exceed 2⁶⁴−1, hence the u128 accumulator.
fn parse_token_tail(header: u8, cursor: &mut Cursor) -> Result<(u8, u128), Error> {
    let class = header >> 5;
    let low = header & 0x1F;
    if low <= 23 {
        return Ok((class, low as u128));
    }
    let tail = cursor.take_payload((low - 23) as u128)?;
    let mut value = 23u128;
    for (i, byte) in tail.iter().enumerate() {
        value += (*byte as u128 + 1) << (8 * i);
    }
    Ok((class, value))
}

fn class_name(class: u8) -> &'static str {
    match class {
        0 => "unsigned integer",
        1 => "negative integer",
        2 => "byte string",
        3 => "text string",
        4 => "sequence",
        _ => "reserved header",
    }
}

fn parse_value(cursor: &mut Cursor, depth: usize) -> Result<Value, Error> {
    let start = cursor.pos;
    let header = cursor.take_byte()?;
    if header == 0xFF {
        return Ok(Value::None);
    }
    // Reserved classes are rejected before the token tail is read.
    if header >> 5 > 4 {
        return Err(Error::UnsupportedHeader {
            offset: start,
            class: header >> 5,
        });
    }
    let (class, value) = parse_token_tail(header, cursor)?;
    match class {
        0 => {
            let n = u64::try_from(value).map_err(|_| Error::OutOfRange(start))?;
            Ok(Value::Integer(Int::from(n)))
        }
        1 => {
            // A well-formed token can carry a magnitude the signed
            // domain cannot hold.
            if value > i64::MAX as u128 {
                return Err(Error::OutOfRange(start));
            }
            Ok(Value::Integer(Int::from(-1 - value as i64)))
        }
        2 => {
            let payload = cursor.take_payload(value)?;
            Ok(Value::ByteString(payload.to_vec()))
        }
        3 => {
            let payload_start = cursor.pos;
            let payload = cursor.take_payload(value)?;
            let text = std::str::from_utf8(payload).map_err(|e| Error::InvalidUtf8 {
                offset: payload_start + e.valid_up_to(),
                source: e,
            })?;
            Ok(Value::Utf8String(text.to_owned()))
        }
        4 => {
            if depth == 0 {
                return Err(Error::NestingTooDeep(start));
            }
            if value > cursor.remaining() as u128 {
                return Err(Error::Truncated(cursor.data.len()));
            }
            let end = cursor.pos + value as usize;
            // Children read from a cursor clipped to the declared
            // payload, so an overrunning child fails as truncated.
            let mut items = Cursor {
                data: &cursor.data[..end],
                pos: cursor.pos,
            };
            let mut children = Vec::new();
            while items.pos < end {
                children.push(parse_value(&mut items, depth - 1)?);
            }
            cursor.pos = end;
            Ok(Value::Sequence(children))
        }
        class => Err(Error::UnsupportedHeader {
            offset: start,
            class,
        }),
    }
}

impl FromDbor for Value {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let mut cursor = Cursor { data, pos: 0 };
        let value = parse_value(&mut cursor, MAX_NESTING)?;
        Ok((value, cursor.pos))
    }
}

/// Reads one header, rejecting `None` and any class other than the
/// expected one.
fn expect_class<'a>(
    data: &'a [u8],
    class: u8,
    expected: &'static str,
) -> Result<(u128, Cursor<'a>), Error> {
    let mut cursor = Cursor { data, pos: 0 };
    let header = cursor.take_byte()?;
    if header == 0xFF {
        return Err(Error::UnexpectedType(expected, "none"));
    }
    if header >> 5 != class {
        return Err(Error::UnexpectedType(expected, class_name(header >> 5)));
    }
    let (_, value) = parse_token_tail(header, &mut cursor)?;
    Ok((value, cursor))
}

impl FromDbor for u64 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (value, cursor) = expect_class(data, 0, "unsigned integer")?;
        let n = u64::try_from(value).map_err(|_| Error::OutOfRange(0))?;
        Ok((n, cursor.pos))
    }
}

impl FromDbor for u32 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = u64::from_dbor(data)?;
        Ok((u32::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for u16 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = u64::from_dbor(data)?;
        Ok((u16::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for u8 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = u64::from_dbor(data)?;
        Ok((u8::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for usize {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = u64::from_dbor(data)?;
        Ok((usize::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for i64 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let mut cursor = Cursor { data, pos: 0 };
        let header = cursor.take_byte()?;
        if header == 0xFF {
            return Err(Error::UnexpectedType("integer", "none"));
        }
        if header >> 5 > 1 {
            return Err(Error::UnexpectedType("integer", class_name(header >> 5)));
        }
        let (class, value) = parse_token_tail(header, &mut cursor)?;
        let n = if class == 0 {
            i64::try_from(value).map_err(|_| Error::OutOfRange(0))?
        } else {
            if value > i64::MAX as u128 {
                return Err(Error::OutOfRange(0));
            }
            -1 - value as i64
        };
        Ok((n, cursor.pos))
    }
}

impl FromDbor for i32 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = i64::from_dbor(data)?;
        Ok((i32::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for i16 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = i64::from_dbor(data)?;
        Ok((i16::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for i8 {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = i64::from_dbor(data)?;
        Ok((i8::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for isize {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (n, len) = i64::from_dbor(data)?;
        Ok((isize::try_from(n).map_err(|_| Error::OutOfRange(0))?, len))
    }
}

impl FromDbor for Int {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let mut cursor = Cursor { data, pos: 0 };
        let header = cursor.take_byte()?;
        if header == 0xFF {
            return Err(Error::UnexpectedType("integer", "none"));
        }
        if header >> 5 > 1 {
            return Err(Error::UnexpectedType("integer", class_name(header >> 5)));
        }
        let (class, value) = parse_token_tail(header, &mut cursor)?;
        let n = if class == 0 {
            Int::from(u64::try_from(value).map_err(|_| Error::OutOfRange(0))?)
        } else {
            if value > i64::MAX as u128 {
                return Err(Error::OutOfRange(0));
            }
            Int::from(-1 - value as i64)
        };
        Ok((n, cursor.pos))
    }
}

impl FromDbor for Vec<u8> {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (len, mut cursor) = expect_class(data, 2, "byte string")?;
        let payload = cursor.take_payload(len)?;
        Ok((payload.to_vec(), cursor.pos))
    }
}

impl FromDbor for String {
    type Error = Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Error> {
        let (len, mut cursor) = expect_class(data, 3, "text string")?;
        let payload_start = cursor.pos;
        let payload = cursor.take_payload(len)?;
        let text = std::str::from_utf8(payload).map_err(|e| Error::InvalidUtf8 {
            offset: payload_start + e.valid_up_to(),
            source: e,
        })?;
        Ok((text.to_owned(), cursor.pos))
    }
}

impl<T> FromDbor for Option<T>
where
    T: FromDbor,
{
    type Error = T::Error;

    fn from_dbor(data: &[u8]) -> Result<(Self, usize), Self::Error> {
        match data.first() {
            None => Err(Error::Truncated(0).into()),
            Some(0xFF) => Ok((None, 1)),
            Some(_) => {
                let (value, len) = T::from_dbor(data)?;
                Ok((Some(value), len))
            }
        }
    }
}

/// Decodes a sequence of uniformly typed items spanning the entire
/// input. `Vec<u8>` cannot serve as the item collection itself because
/// it decodes the byte string class, so sequences get a dedicated
/// entry point instead of a `FromDbor` impl.
pub fn parse_sequence<T: FromDbor>(data: &[u8]) -> Result<Vec<T>, T::Error> {
    let (len, mut cursor) = expect_class(data, 4, "sequence")?;
    let payload = cursor.take_payload(len).map_err(T::Error::from)?;
    if cursor.pos < data.len() {
        return Err(Error::TrailingBytes(cursor.pos).into());
    }
    let mut items = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let (item, used) = T::from_dbor(&payload[offset..])?;
        items.push(item);
        offset += used;
    }
    Ok(items)
}
