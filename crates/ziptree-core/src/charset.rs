//! Entry-name character encoding.

use std::fmt;
use std::str::FromStr;

/// Character set of entry names.
///
/// On write, the charset restricts which names are accepted: under `Cp437`
/// every character must exist in code page 437. The container stores ASCII
/// names without the ZIP language-encoding flag and any other name as
/// flagged UTF-8. On read, the charset decides how names without the flag
/// are decoded, which matters for archives produced by older tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Decode raw names as UTF-8, falling back to the container's own
    /// decoding when the bytes are not valid UTF-8.
    #[default]
    Utf8,
    /// Decode unflagged names as IBM code page 437, the ZIP legacy default.
    Cp437,
}

/// Code page 437 characters from 0x80 to 0xFF, in code order.
const CP437_HIGH: &str = "ÇüéâäàåçêëèïîìÄÅ\
                          ÉæÆôöòûùÿÖÜ¢£¥₧ƒ\
                          áíóúñÑªº¿⌐¬½¼¡«»\
                          ░▒▓│┤╡╢╖╕╣║╗╝╜╛┐\
                          └┴┬├─┼╞╟╚╔╩╦╠═╬╧\
                          ╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀\
                          αßΓπΣσµτΦΘΩδ∞φε∩\
                          ≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{a0}";

impl Charset {
    /// Returns `true` if every character of `name` can be stored under this
    /// charset.
    ///
    /// # Examples
    ///
    /// ```
    /// use ziptree_core::Charset;
    ///
    /// assert!(Charset::Cp437.can_encode("café/ñandú.txt"));
    /// assert!(!Charset::Cp437.can_encode("日本.txt"));
    /// assert!(Charset::Utf8.can_encode("日本.txt"));
    /// ```
    #[must_use]
    pub fn can_encode(self, name: &str) -> bool {
        match self {
            Self::Utf8 => true,
            Self::Cp437 => name.chars().all(|c| c.is_ascii() || CP437_HIGH.contains(c)),
        }
    }

    /// Decodes an entry name.
    ///
    /// `raw` is the stored name bytes; `decoded` is the container's
    /// flag-aware rendering of the same name.
    pub(crate) fn decode_name(self, raw: &[u8], decoded: &str) -> String {
        match self {
            Self::Utf8 => match std::str::from_utf8(raw) {
                Ok(name) => name.to_string(),
                Err(_) => decoded.to_string(),
            },
            Self::Cp437 => decoded.to_string(),
        }
    }

    /// Canonical label for this charset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Cp437 => "cp437",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "cp437" | "ibm437" | "437" => Ok(Self::Cp437),
            other => Err(format!("unsupported charset: {other}")),
        }
    }
}
