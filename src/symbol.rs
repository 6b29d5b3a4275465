//! Fixed-width symbols stored along trie edges

use std::fmt::Debug;
use std::hash::Hash;

/// Record value opening a child level in the encoded format
pub const OPEN: u32 = b'(' as u32;
/// Record value closing the current level
pub const CLOSE: u32 = b')' as u32;
/// Record value marking the preceding node as a stored word
pub const MARK: u32 = b'*' as u32;

/// A fixed-width unit of a stored string
///
/// Every symbol maps to a record value that fits in `WIDTH` little-endian
/// bytes. One trie instance stores strings of a single symbol type.
pub trait Symbol: Copy + Eq + Hash + Debug + 'static {
    /// Size of one record in the encoded format, in bytes
    const WIDTH: usize;

    /// Record value of this symbol
    fn to_record(self) -> u32;

    /// Symbol for a record value, if the value is valid for this type
    fn from_record(value: u32) -> Option<Self>;

    /// Whether this symbol shares its value with a structural record
    fn is_reserved(self) -> bool {
        matches!(self.to_record(), OPEN | CLOSE | MARK)
    }
}

macro_rules! impl_unsigned_symbol {
    ($($ty:ty),*) => {
        $(
            impl Symbol for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn to_record(self) -> u32 {
                    u32::from(self)
                }

                fn from_record(value: u32) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_unsigned_symbol!(u8, u16, u32);

impl Symbol for char {
    const WIDTH: usize = 4;

    fn to_record(self) -> u32 {
        u32::from(self)
    }

    fn from_record(value: u32) -> Option<Self> {
        char::from_u32(value)
    }
}

/// Symbols that text can be split into
///
/// `u8` holds UTF-8 bytes, `u16` UTF-16 code units and `char` Unicode
/// scalar values.
pub trait TextSymbol: Symbol {
    /// Split `text` into symbols
    fn encode_str(text: &str) -> Vec<Self>;

    /// Rebuild text from symbols, replacing invalid sequences
    fn decode_lossy(symbols: &[Self]) -> String;
}

impl TextSymbol for u8 {
    fn encode_str(text: &str) -> Vec<Self> {
        text.as_bytes().to_vec()
    }

    fn decode_lossy(symbols: &[Self]) -> String {
        String::from_utf8_lossy(symbols).into_owned()
    }
}

impl TextSymbol for u16 {
    fn encode_str(text: &str) -> Vec<Self> {
        text.encode_utf16().collect()
    }

    fn decode_lossy(symbols: &[Self]) -> String {
        String::from_utf16_lossy(symbols)
    }
}

impl TextSymbol for char {
    fn encode_str(text: &str) -> Vec<Self> {
        text.chars().collect()
    }

    fn decode_lossy(symbols: &[Self]) -> String {
        symbols.iter().collect()
    }
}
