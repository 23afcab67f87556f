// ABOUTME: Text codecs for short message bodies and narrowest-encoding detection
// ABOUTME: Covers GSM 03.38 (with national shift tables), Latin-1 and UCS-2 big-endian

mod gsm;

pub use gsm::{GsmShift, ESCAPE};

/// A character set a message body can be carried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Gsm(GsmShift),
    Latin1,
    Ucs2,
}

impl Encoding {
    /// Candidates in increasing cost order. UCS-2 is last and always matches.
    pub const DETECT_ORDER: [Encoding; 6] = [
        Encoding::Gsm(GsmShift::Default),
        Encoding::Gsm(GsmShift::Turkish),
        Encoding::Gsm(GsmShift::Spanish),
        Encoding::Gsm(GsmShift::Portuguese),
        Encoding::Latin1,
        Encoding::Ucs2,
    ];

    /// Pick the narrowest encoding able to carry `text` unchanged.
    pub fn detect(text: &str) -> Encoding {
        Self::DETECT_ORDER
            .into_iter()
            .find(|encoding| encoding.matches(text))
            .unwrap_or(Encoding::Ucs2)
    }

    /// Map the low nibble of `data_coding` to a codec. 0 is the SMSC
    /// default alphabet, which is GSM.
    pub fn from_data_coding(value: u8) -> Option<Encoding> {
        match value & 0x0F {
            0x00 | 0x01 => Some(Encoding::Gsm(GsmShift::Default)),
            0x03 => Some(Encoding::Latin1),
            0x08 => Some(Encoding::Ucs2),
            _ => None,
        }
    }

    /// The `data_coding` value announcing this encoding.
    pub fn data_coding(&self) -> u8 {
        match self {
            Encoding::Gsm(_) => 0x01,
            Encoding::Latin1 => 0x03,
            Encoding::Ucs2 => 0x08,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Gsm(GsmShift::Default) => "ASCII",
            Encoding::Gsm(GsmShift::Turkish) => "GSM_TR",
            Encoding::Gsm(GsmShift::Spanish) => "GSM_ES",
            Encoding::Gsm(GsmShift::Portuguese) => "GSM_PT",
            Encoding::Latin1 => "LATIN1",
            Encoding::Ucs2 => "UCS2",
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Encoding::Gsm(shift) => shift.charset().matches(text),
            Encoding::Latin1 => text.chars().all(|c| u32::from(c) <= 0xFF),
            Encoding::Ucs2 => true,
        }
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Gsm(shift) => shift.charset().encode(text),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Encoding::Ucs2 => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Gsm(shift) => shift.charset().decode(bytes),
            Encoding::Latin1 => crate::codec::octets_to_string(bytes),
            Encoding::Ucs2 => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
        }
    }
}
