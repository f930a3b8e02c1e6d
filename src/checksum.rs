//! CRC-32 as used by the Zip format (ISO 3309 / ITU-T V.42, reflected).
//!
//! The lookup table is a pure function of the polynomial and is evaluated at
//! compile time, so every build shares the same table.

/// Reversed representation of the polynomial `0x04C11DB7`.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

static TABLE: [u32; 256] = make_table(POLYNOMIAL);

const fn make_table(polynomial: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut register = n as u32;
        let mut bit = 0;
        while bit < 8 {
            register = if register & 1 != 0 {
                polynomial ^ (register >> 1)
            } else {
                register >> 1
            };
            bit += 1;
        }
        table[n] = register;
        n += 1;
    }
    table
}

/// Incremental CRC-32 state.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    register: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self {
            register: u32::MAX,
        }
    }

    pub fn update(&mut self, buf: &[u8]) {
        let mut register = self.register;
        for byte in buf {
            let index = ((register ^ *byte as u32) & 0xFF) as usize;
            register = TABLE[index] ^ (register >> 8);
        }
        self.register = register;
    }

    pub fn finalize(self) -> u32 {
        !self.register
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Checksum of a whole buffer.
pub fn crc32(buf: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(buf);
    hasher.finalize()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn table_known_values() {
        assert_eq!(TABLE[0], 0);
        assert_eq!(TABLE[1], 0x7707_3096);
        assert_eq!(TABLE[128], 0xEDB8_8320);
        assert_eq!(TABLE[255], 0x2D02_EF8D);
    }

    #[test]
    fn empty_input() {
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn check_value() {
        // The standard "check" input of the CRC catalogue.
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(
            crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn matches_crc32fast() {
        let samples: [&[u8]; 5] = [
            b"<svg/>",
            &[0u8; 10],
            &[0xFFu8; 20],
            b"Some string data",
            &[0x50, 0x4B, 0x03, 0x04, 0x00, 0x7F, 0x80, 0xFE],
        ];

        for sample in samples {
            assert_eq!(crc32(sample), crc32fast::hash(sample), "{:02X?}", sample);
        }
    }

    #[test]
    fn incremental_update() {
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();

        let mut hasher = Crc32::new();
        for chunk in data.chunks(333) {
            hasher.update(chunk);
        }

        assert_eq!(hasher.finalize(), crc32(&data));
        assert_eq!(crc32(&data), crc32fast::hash(&data));
    }
}
