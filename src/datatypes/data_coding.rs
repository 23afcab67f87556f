// ABOUTME: SMPP data_coding values and their mapping onto the text codecs in `encodings`
// ABOUTME: Only the low nibble selects a character set; the high nibble carries GSM message class bits

use crate::encodings::Encoding;
use num_enum::TryFromPrimitive;

/// Data Coding Scheme values defined by SMPP v3.4 Section 5.2.19
///
/// The national GSM shift tables (Turkish, Spanish, Portuguese) all travel
/// as `Ia5`; the table itself is signalled through the User Data Header.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataCoding {
    /// SMSC Default Alphabet (GSM 03.38 on virtually every SMSC)
    SmscDefault = 0x00,
    /// IA5 (CCITT T.50)/ASCII (ANSI X3.4)
    Ia5 = 0x01,
    /// Octet unspecified (8-bit binary)
    OctetUnspecified = 0x02,
    /// Latin 1 (ISO-8859-1)
    Latin1 = 0x03,
    /// Octet unspecified (8-bit binary)
    Binary = 0x04,
    /// JIS (X 0208-1990)
    Jis = 0x05,
    /// Cyrillic (ISO-8859-5)
    Cyrillic = 0x06,
    /// Latin/Hebrew (ISO-8859-8)
    Hebrew = 0x07,
    /// UCS2 (ISO/IEC-10646)
    Ucs2 = 0x08,
    /// Pictogram Encoding
    Pictogram = 0x09,
    /// ISO-2022-JP (Music Codes)
    Iso2022Jp = 0x0A,
    /// Extended Kanji JIS (X 0212-1990)
    ExtendedKanjiJis = 0x0D,
    /// KS C 5601
    KsC5601 = 0x0E,
}

impl DataCoding {
    /// The text codec for a raw `data_coding` byte, if this crate has one.
    pub fn text_encoding(value: u8) -> Option<Encoding> {
        Encoding::from_data_coding(value)
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

impl From<DataCoding> for u8 {
    fn from(value: DataCoding) -> Self {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodings::GsmShift;

    #[test]
    fn test_text_encoding_uses_low_nibble() {
        assert_eq!(
            DataCoding::text_encoding(0x00),
            Some(Encoding::Gsm(GsmShift::Default))
        );
        assert_eq!(DataCoding::text_encoding(0x03), Some(Encoding::Latin1));
        assert_eq!(DataCoding::text_encoding(0x18), Some(Encoding::Ucs2));
        assert_eq!(DataCoding::text_encoding(0x04), None);
    }

    #[test]
    fn test_try_from_byte() {
        assert_eq!(DataCoding::try_from(0x08).unwrap(), DataCoding::Ucs2);
        assert!(DataCoding::try_from(0x0B).is_err());
    }
}
