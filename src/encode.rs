use crate::value::{Int, Value};
use crate::MAX_NESTING;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("payload of {0} bytes does not fit the length token domain")]
    PayloadTooLong(u128),

    #[error("value nests deeper than the supported sequence depth")]
    NestingTooDeep,
}

pub trait ToDbor {
    /// Appends the encoding of `self` and returns the number of bytes
    /// written.
    fn to_dbor(&self, encoder: &mut Encoder) -> usize;
}

/// An append-only byte buffer with typed emit methods.
#[derive(Default)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    /// Emits the token `(class, value)` in its unique width: values up
    /// to 23 go into the header byte, larger ones are followed by the
    /// shortest tail under the offset numbering
    /// `value = 23 + Σ (tail[i] + 1) · 256^i`.
    fn emit_integer_token(&mut self, class: u8, value: u64) -> usize {
        let header = class << 5;
        if value <= 23 {
            self.data.push(header | value as u8);
            return 1;
        }
        let mut tail = [0u8; 8];
        let mut rest = value - 23;
        let mut k = 0;
        while rest > 0 {
            rest -= 1;
            tail[k] = rest as u8;
            rest >>= 8;
            k += 1;
        }
        self.data.push(header | (23 + k as u8));
        self.data.extend_from_slice(&tail[..k]);
        1 + k
    }

    pub fn emit_none(&mut self) -> usize {
        self.data.push(0xFF);
        1
    }

    pub fn emit<T: ToDbor + ?Sized>(&mut self, value: &T) -> usize {
        value.to_dbor(self)
    }

    pub fn emit_raw(&mut self, data: &[u8]) -> usize {
        self.data.extend_from_slice(data);
        data.len()
    }

    /// Emits a sequence whose items are written by `f`. The items are
    /// buffered first because the header token carries their total
    /// byte length.
    pub fn emit_sequence<F>(&mut self, f: F) -> usize
    where
        F: FnOnce(&mut Encoder),
    {
        let mut items = Encoder::default();
        f(&mut items);
        self.emit_integer_token(4, items.data.len() as u64) + self.emit_raw(&items.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl<T: ToDbor + ?Sized> ToDbor for &T {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        (**self).to_dbor(encoder)
    }
}

impl ToDbor for u64 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(0, *self)
    }
}

impl ToDbor for u32 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(0, *self as u64)
    }
}

impl ToDbor for u16 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(0, *self as u64)
    }
}

impl ToDbor for u8 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(0, *self as u64)
    }
}

impl ToDbor for usize {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(0, *self as u64)
    }
}

fn emit_i64(encoder: &mut Encoder, value: i64) -> usize {
    if value >= 0 {
        encoder.emit_integer_token(0, value as u64)
    } else {
        // −1 − value is the magnitude; stays in range even for i64::MIN.
        encoder.emit_integer_token(1, (-1 - value) as u64)
    }
}

impl ToDbor for i64 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        emit_i64(encoder, *self)
    }
}

impl ToDbor for i32 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        emit_i64(encoder, *self as i64)
    }
}

impl ToDbor for i16 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        emit_i64(encoder, *self as i64)
    }
}

impl ToDbor for i8 {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        emit_i64(encoder, *self as i64)
    }
}

impl ToDbor for isize {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        emit_i64(encoder, *self as i64)
    }
}

impl ToDbor for Int {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        let n = self.get();
        if n >= 0 {
            encoder.emit_integer_token(0, n as u64)
        } else {
            encoder.emit_integer_token(1, (-1 - n) as u64)
        }
    }
}

impl ToDbor for str {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        let bytes = self.as_bytes();
        encoder.emit_integer_token(3, bytes.len() as u64) + encoder.emit_raw(bytes)
    }
}

impl ToDbor for String {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        self.as_str().to_dbor(encoder)
    }
}

impl ToDbor for [u8] {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        encoder.emit_integer_token(2, self.len() as u64) + encoder.emit_raw(self)
    }
}

impl<const N: usize> ToDbor for [u8; N] {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        self.as_slice().to_dbor(encoder)
    }
}

impl ToDbor for Vec<u8> {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        self.as_slice().to_dbor(encoder)
    }
}

impl<T: ToDbor> ToDbor for Option<T> {
    fn to_dbor(&self, encoder: &mut Encoder) -> usize {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.emit_none(),
        }
    }
}

/// Encodes a single value.
pub fn emit<T: ToDbor + ?Sized>(value: &T) -> Vec<u8> {
    let mut encoder = Encoder::default();
    encoder.emit(value);
    encoder.into_bytes()
}

/// Encodes a sequence whose items are written by `f`.
pub fn emit_sequence<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut Encoder),
{
    let mut encoder = Encoder::default();
    encoder.emit_sequence(f);
    encoder.into_bytes()
}

/// Encodes a [`Value`] tree.
///
/// This cannot fail for values built through the checked constructors,
/// except when sequences nest deeper than [`MAX_NESTING`] levels.
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    let mut encoder = Encoder::default();
    emit_value(&mut encoder, value, MAX_NESTING)?;
    Ok(encoder.into_bytes())
}

fn emit_value(encoder: &mut Encoder, value: &Value, depth: usize) -> Result<usize, Error> {
    match value {
        Value::None => Ok(encoder.emit_none()),
        Value::Integer(n) => Ok(encoder.emit(n)),
        Value::ByteString(b) => Ok(encoder.emit(b.as_slice())),
        Value::Utf8String(s) => Ok(encoder.emit(s.as_str())),
        Value::Sequence(children) => {
            if depth == 0 {
                return Err(Error::NestingTooDeep);
            }
            let mut items = Encoder::default();
            for child in children {
                emit_value(&mut items, child, depth - 1)?;
            }
            let payload = items.into_bytes();
            let len = u64::try_from(payload.len())
                .map_err(|_| Error::PayloadTooLong(payload.len() as u128))?;
            Ok(encoder.emit_integer_token(4, len) + encoder.emit_raw(&payload))
        }
    }
}
