use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("integer {0} is outside the supported range")]
    OutOfRange(i128),

    #[error(transparent)]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// An integer in the combined signed/unsigned range −2⁶³ ..= 2⁶⁴−1.
///
/// The range is asymmetric because negative integers travel as the
/// magnitude −n−1 in their own header class, sharing the unsigned
/// 64-bit magnitude domain with non-negative integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(i128);

impl Int {
    pub const MIN: Int = Int(i64::MIN as i128);
    pub const MAX: Int = Int(u64::MAX as i128);

    pub fn new(n: i128) -> Result<Self, Error> {
        if n < Self::MIN.0 || n > Self::MAX.0 {
            Err(Error::OutOfRange(n))
        } else {
            Ok(Int(n))
        }
    }

    pub const fn get(self) -> i128 {
        self.0
    }
}

impl From<u8> for Int {
    fn from(n: u8) -> Self {
        Int(n as i128)
    }
}

impl From<u16> for Int {
    fn from(n: u16) -> Self {
        Int(n as i128)
    }
}

impl From<u32> for Int {
    fn from(n: u32) -> Self {
        Int(n as i128)
    }
}

impl From<u64> for Int {
    fn from(n: u64) -> Self {
        Int(n as i128)
    }
}

impl From<usize> for Int {
    fn from(n: usize) -> Self {
        Int(n as i128)
    }
}

impl From<i8> for Int {
    fn from(n: i8) -> Self {
        Int(n as i128)
    }
}

impl From<i16> for Int {
    fn from(n: i16) -> Self {
        Int(n as i128)
    }
}

impl From<i32> for Int {
    fn from(n: i32) -> Self {
        Int(n as i128)
    }
}

impl From<i64> for Int {
    fn from(n: i64) -> Self {
        Int(n as i128)
    }
}

impl From<isize> for Int {
    fn from(n: isize) -> Self {
        Int(n as i128)
    }
}

impl TryFrom<i128> for Int {
    type Error = Error;

    fn try_from(n: i128) -> Result<Self, Error> {
        Int::new(n)
    }
}

impl TryFrom<u128> for Int {
    type Error = Error;

    fn try_from(n: u128) -> Result<Self, Error> {
        if n > u64::MAX as u128 {
            Err(Error::OutOfRange(i128::try_from(n).unwrap_or(i128::MAX)))
        } else {
            Ok(Int(n as i128))
        }
    }
}

impl TryFrom<Int> for i64 {
    type Error = std::num::TryFromIntError;

    fn try_from(n: Int) -> Result<Self, Self::Error> {
        i64::try_from(n.0)
    }
}

impl TryFrom<Int> for u64 {
    type Error = std::num::TryFromIntError;

    fn try_from(n: Int) -> Result<Self, Self::Error> {
        u64::try_from(n.0)
    }
}

impl std::fmt::Display for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Int {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A level 2 DBOR value.
///
/// Ownership is tree-shaped: a sequence exclusively owns its children,
/// and equality is structural. Construction through the checked
/// entry points ([`Int::new`], [`Value::utf8_from_bytes`]) guarantees
/// that [`crate::encode`] succeeds for any value within the nesting
/// limit.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    None,
    Integer(Int),
    ByteString(Vec<u8>),
    Utf8String(String),
    Sequence(Vec<Value>),
}

impl Value {
    /// Builds an integer value, rejecting input outside −2⁶³ ..= 2⁶⁴−1.
    pub fn integer(n: i128) -> Result<Self, Error> {
        Int::new(n).map(Value::Integer)
    }

    /// Builds a string value from raw octets, rejecting ill-formed UTF-8.
    pub fn utf8_from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        Ok(Value::Utf8String(String::from_utf8(bytes)?))
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Integer(n) => write!(f, "{n:?}"),
            Value::ByteString(b) => write!(f, "{b:?}"),
            Value::Utf8String(s) => write!(f, "{s:?}"),
            Value::Sequence(vs) => f.debug_list().entries(vs).finish(),
        }
    }
}

impl From<Int> for Value {
    fn from(n: Int) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::ByteString(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(vs: Vec<Value>) -> Self {
        Value::Sequence(vs)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}
