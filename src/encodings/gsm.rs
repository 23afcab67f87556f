// ABOUTME: GSM 03.38 default alphabet and the Turkish, Spanish and Portuguese national shift tables
// ABOUTME: Each table is a 128-entry base set plus an escape (0x1B) extension set, indexed lazily

use num_enum::TryFromPrimitive;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Escape byte introducing a character from the extension table.
pub const ESCAPE: u8 = 0x1B;

/// Byte written for characters the selected table cannot represent.
const REPLACEMENT: u8 = 0x20;

/// National language shift table identifier, as carried in UDH IEs 0x24/0x25.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GsmShift {
    #[default]
    Default = 0,
    Turkish = 1,
    Spanish = 2,
    Portuguese = 3,
}

impl GsmShift {
    /// Resolve a shift id from a UDH. Unknown ids fall back to the default alphabet.
    pub fn from_id(id: u8) -> Self {
        GsmShift::try_from(id).unwrap_or_default()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub(crate) fn charset(self) -> &'static Charset {
        match self {
            GsmShift::Default => &DEFAULT,
            GsmShift::Turkish => &TURKISH,
            GsmShift::Spanish => &SPANISH,
            GsmShift::Portuguese => &PORTUGUESE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Code {
    Single(u8),
    Escape(u8),
}

/// Lookup maps for one shift table.
pub(crate) struct Charset {
    base: &'static [char; 128],
    encode: HashMap<char, Code>,
    extension: HashMap<u8, char>,
}

impl Charset {
    fn new(
        base: &'static [char; 128],
        ext_encode: &[(char, u8)],
        ext_decode: &[(u8, char)],
    ) -> Self {
        let mut encode = HashMap::with_capacity(base.len() + ext_encode.len());
        for (code, &c) in base.iter().enumerate() {
            encode.insert(c, Code::Single(code as u8));
        }
        // Extension characters win over base characters that share a glyph.
        for &(c, code) in ext_encode {
            encode.insert(c, Code::Escape(code));
        }

        Charset {
            base,
            encode,
            extension: ext_decode.iter().copied().collect(),
        }
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        text.chars().all(|c| self.encode.contains_key(&c))
    }

    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            match self.encode.get(&c) {
                Some(Code::Single(code)) => out.push(*code),
                Some(Code::Escape(code)) => {
                    out.push(ESCAPE);
                    out.push(*code);
                }
                None => out.push(REPLACEMENT),
            }
        }
        out
    }

    pub(crate) fn decode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == ESCAPE {
                if let Some(c) = bytes.get(i + 1).and_then(|next| self.extension.get(next)) {
                    out.push(*c);
                    i += 2;
                    continue;
                }
            }
            out.push(self.base.get(b as usize).copied().unwrap_or(' '));
            i += 1;
        }
        out
    }
}

static DEFAULT: LazyLock<Charset> =
    LazyLock::new(|| Charset::new(&DEFAULT_BASE, DEFAULT_EXT_ENCODE, DEFAULT_EXT_DECODE));
static TURKISH: LazyLock<Charset> =
    LazyLock::new(|| Charset::new(&TURKISH_BASE, TURKISH_EXT_ENCODE, TURKISH_EXT_DECODE));
static SPANISH: LazyLock<Charset> =
    LazyLock::new(|| Charset::new(&DEFAULT_BASE, SPANISH_EXT_ENCODE, SPANISH_EXT_DECODE));
static PORTUGUESE: LazyLock<Charset> = LazyLock::new(|| {
    Charset::new(
        &PORTUGUESE_BASE,
        PORTUGUESE_EXT_ENCODE,
        PORTUGUESE_EXT_DECODE,
    )
});

#[rustfmt::skip]
const DEFAULT_BASE: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì',
    'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ',
    'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'',
    '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W',
    'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

const DEFAULT_EXT_ENCODE: &[(char, u8)] = &[
    ('\u{0C}', 0x0A),
    ('^', 0x14),
    ('{', 0x28),
    ('}', 0x29),
    ('\\', 0x2F),
    ('[', 0x3C),
    ('~', 0x3D),
    (']', 0x3E),
    ('|', 0x40),
    ('€', 0x65),
];

const DEFAULT_EXT_DECODE: &[(u8, char)] = &[
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

#[rustfmt::skip]
const TURKISH_BASE: [char; 128] = [
    '@', '£', '$', '¥', '€', 'é', 'ù', 'ı',
    'ò', 'Ç', '\n', 'Ğ', 'ğ', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ',
    'Σ', 'Θ', 'Ξ', '\u{1B}', 'Ş', 'ş', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'',
    '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', ':', ';', '<', '=', '>', '?',
    'İ', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W',
    'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    'ç', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

const TURKISH_EXT_ENCODE: &[(char, u8)] = &[
    ('\u{0C}', 0x0A),
    ('^', 0x14),
    ('{', 0x28),
    ('}', 0x29),
    ('\\', 0x2F),
    ('[', 0x3C),
    ('~', 0x3D),
    (']', 0x3E),
    ('|', 0x40),
];

const TURKISH_EXT_DECODE: &[(u8, char)] = &[
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x47, 'Ğ'),
    (0x49, 'İ'),
    (0x53, 'Ş'),
    (0x63, 'ç'),
    (0x65, '€'),
    (0x67, 'ğ'),
    (0x69, 'ı'),
    (0x73, 'ş'),
];

// The Spanish table only differs from the default alphabet in its extension set.
const SPANISH_EXT_ENCODE: &[(char, u8)] = &[
    ('ç', 0x09),
    ('\u{0C}', 0x0A),
    ('^', 0x14),
    ('{', 0x28),
    ('}', 0x29),
    ('\\', 0x2F),
    ('[', 0x3C),
    ('~', 0x3D),
    (']', 0x3E),
    ('|', 0x40),
    ('Á', 0x41),
    ('Í', 0x49),
    ('Ó', 0x4F),
    ('Ú', 0x55),
    ('á', 0x61),
    ('€', 0x65),
    ('í', 0x69),
    ('ó', 0x6F),
    ('ú', 0x75),
];

const SPANISH_EXT_DECODE: &[(u8, char)] = &[
    (0x09, 'ç'),
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x41, 'Á'),
    (0x49, 'Í'),
    (0x4F, 'Ó'),
    (0x55, 'Ú'),
    (0x61, 'á'),
    (0x65, '€'),
    (0x69, 'í'),
    (0x6F, 'ó'),
    (0x75, 'ú'),
];

#[rustfmt::skip]
const PORTUGUESE_BASE: [char; 128] = [
    '@', '£', '$', '¥', 'ê', 'é', 'ú', 'í',
    'ó', 'ç', '\n', 'Ô', 'ô', '\r', 'Á', 'á',
    'Δ', '_', 'ª', 'Ç', 'À', '∞', '^', '\\',
    '€', 'Ó', '|', '\u{1B}', 'Â', 'â', 'Ê', 'É',
    ' ', '!', '"', '#', 'º', '%', '&', '\'',
    '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', ':', ';', '<', '=', '>', '?',
    'Í', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W',
    'X', 'Y', 'Z', 'Ã', 'Õ', 'Ú', 'Ü', '§',
    '~', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'ã', 'õ', '`', 'ü', 'à',
];

const PORTUGUESE_EXT_ENCODE: &[(char, u8)] = &[
    ('\u{0C}', 0x0A),
    ('Φ', 0x12),
    ('Γ', 0x13),
    ('^', 0x14),
    ('Ω', 0x15),
    ('Π', 0x16),
    ('Ψ', 0x17),
    ('Σ', 0x18),
    ('Θ', 0x19),
    ('{', 0x28),
    ('}', 0x29),
    ('\\', 0x2F),
    ('[', 0x3C),
    ('~', 0x3D),
    (']', 0x3E),
    ('|', 0x40),
];

const PORTUGUESE_EXT_DECODE: &[(u8, char)] = &[
    (0x05, 'ê'),
    (0x09, 'ç'),
    (0x0A, '\u{0C}'),
    (0x0B, 'Ô'),
    (0x0C, 'ô'),
    (0x0E, 'Á'),
    (0x0F, 'á'),
    (0x12, 'Φ'),
    (0x13, 'Γ'),
    (0x14, '^'),
    (0x15, 'Ω'),
    (0x16, 'Π'),
    (0x17, 'Ψ'),
    (0x18, 'Σ'),
    (0x19, 'Θ'),
    (0x1F, 'Ê'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x41, 'À'),
    (0x49, 'Í'),
    (0x4F, 'Ó'),
    (0x55, 'Ú'),
    (0x5B, 'Ã'),
    (0x5C, 'Õ'),
    (0x61, 'Â'),
    (0x65, '€'),
    (0x69, 'í'),
    (0x6F, 'ó'),
    (0x75, 'ú'),
    (0x7B, 'ã'),
    (0x7C, 'õ'),
    (0x7F, 'â'),
];


#[cfg(test)]
mod tests {
    use super::*;

    fn encode(shift: GsmShift, text: &str) -> Vec<u8> {
        shift.charset().encode(text)
    }

    fn decode(shift: GsmShift, bytes: &[u8]) -> String {
        shift.charset().decode(bytes)
    }

    #[test]
    fn test_default_base_characters() {
        assert_eq!(encode(GsmShift::Default, "@£$¥"), vec![0x00, 0x01, 0x02, 0x03]);
        assert_eq!(decode(GsmShift::Default, &[0x00, 0x01, 0x02, 0x03]), "@£$¥");
    }

    #[test]
    fn test_default_extension_characters() {
        let bytes = vec![
            0x1B, 0x0A, 0x1B, 0x14, 0x1B, 0x28, 0x1B, 0x29, 0x1B, 0x2F, 0x1B, 0x3C, 0x1B, 0x3D,
            0x1B, 0x3E, 0x1B, 0x40, 0x1B, 0x65,
        ];
        assert_eq!(encode(GsmShift::Default, "\u{0C}^{}\\[~]|€"), bytes);
        assert_eq!(decode(GsmShift::Default, &bytes), "\u{0C}^{}\\[~]|€");
    }

    #[test]
    fn test_every_default_character_roundtrips() {
        for (code, c) in DEFAULT_BASE.iter().enumerate() {
            if *c == '\u{1B}' {
                continue;
            }
            let text = c.to_string();
            assert_eq!(encode(GsmShift::Default, &text), vec![code as u8]);
            assert_eq!(decode(GsmShift::Default, &[code as u8]), text);
        }
    }

    #[test]
    fn test_unrepresentable_becomes_space() {
        assert!(!GsmShift::Default.charset().matches("تست"));
        assert_eq!(encode(GsmShift::Default, "aت"), vec![0x61, 0x20]);
        assert_eq!(decode(GsmShift::Default, &[0x61, 0x80, 0xFF]), "a  ");
    }

    #[test]
    fn test_escape_without_extension() {
        assert_eq!(decode(GsmShift::Default, &[0x1B, 0x41]), "\u{1B}A");
        assert_eq!(decode(GsmShift::Default, &[0x41, 0x1B]), "A\u{1B}");
    }

    #[test]
    fn test_turkish_table() {
        assert_eq!(encode(GsmShift::Turkish, "Teşt"), vec![0x54, 0x65, 0x1D, 0x74]);
        assert_eq!(decode(GsmShift::Turkish, &[0x54, 0x65, 0x1D, 0x74]), "Teşt");
        assert_eq!(decode(GsmShift::Turkish, &[0x1B, 0x47]), "Ğ");
    }

    #[test]
    fn test_spanish_table() {
        assert_eq!(encode(GsmShift::Spanish, "í"), vec![0x1B, 0x69]);
        assert_eq!(encode(GsmShift::Spanish, "é"), vec![0x05]);
        assert_eq!(decode(GsmShift::Spanish, &[0x1B, 0x69, 0x05]), "íé");
    }

    #[test]
    fn test_portuguese_table() {
        assert_eq!(encode(GsmShift::Portuguese, "â"), vec![0x1D]);
        assert_eq!(encode(GsmShift::Portuguese, "Σ"), vec![0x1B, 0x18]);

        let bytes = vec![
            0x1B, 0x0A, 0x1B, 0x12, 0x1B, 0x13, 0x1B, 0x14, 0x1B, 0x15, 0x1B, 0x16, 0x1B, 0x17,
            0x1B, 0x18, 0x1B, 0x19, 0x1B, 0x28, 0x1B, 0x29, 0x1B, 0x2F, 0x1B, 0x3C, 0x1B, 0x3D,
            0x1B, 0x3E, 0x1B, 0x40,
        ];
        let text = "\u{0C}ΦΓ^ΩΠΨΣΘ{}\\[~]|";
        assert_eq!(encode(GsmShift::Portuguese, text), bytes);
        assert_eq!(decode(GsmShift::Portuguese, &bytes), text);
    }

    #[test]
    fn test_unknown_shift_falls_back() {
        assert_eq!(GsmShift::from_id(3), GsmShift::Portuguese);
        assert_eq!(GsmShift::from_id(9), GsmShift::Default);
    }
}
