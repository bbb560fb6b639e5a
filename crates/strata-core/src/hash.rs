//! Content hashing for the conversion cache.
//!
//! The hash is CRC-32C (Castagnoli, reflected) seeded with `0xFFFF_FFFF` and
//! deliberately left unfinalized (no output xor), matching the rolling hash
//! the cube map cache key format was defined against. Input is consumed in
//! 8-byte little-endian words with a plain byte tail, which is bit-identical
//! to a straight byte-at-a-time update.

const POLY: u32 = 0x82F6_3B78;

const TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

fn update(crc: u32, byte: u8) -> u32 {
    (crc >> 8) ^ TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize]
}

/// Compute the unfinalized CRC-32C rolling hash of `data`.
pub fn crc32c(data: &[u8]) -> u32 {
    let mut h = 0xFFFF_FFFFu32;
    let mut chunks = data.chunks_exact(8);
    for word in &mut chunks {
        // Word granularity mirrors a hardware crc32 u64 step, which walks
        // the bytes in little-endian order.
        for &b in word {
            h = update(h, b);
        }
    }
    for &b in chunks.remainder() {
        h = update(h, b);
    }
    h
}

/// Build the 64-bit cache key for a byte buffer: length in the high 32 bits,
/// rolling hash in the low 32. Key collisions are accepted as-is; the
/// birthday bound is a documented limitation of this scheme.
pub fn content_key(data: &[u8]) -> u64 {
    ((data.len() as u64) << 32) | u64::from(crc32c(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32c_check_value() {
        // Standard CRC-32C of "123456789" is 0xE3069283 after the final
        // xor; we keep the hash unfinalized.
        assert_eq!(crc32c(b"123456789"), !0xE306_9283);
    }

    #[test]
    fn test_crc32c_stable() {
        let data = b"the same bytes hash the same";
        assert_eq!(crc32c(data), crc32c(data));
        assert_ne!(crc32c(data), crc32c(b"different bytes"));
    }

    #[test]
    fn test_content_key_length_in_high_bits() {
        let data = vec![0u8; 1234];
        assert_eq!(content_key(&data) >> 32, 1234);
    }

    #[test]
    fn test_word_tail_consistency() {
        // 11 bytes exercises one full word plus a 3-byte tail.
        let data: Vec<u8> = (0..11).collect();
        let mut h = 0xFFFF_FFFFu32;
        for &b in &data {
            h = update(h, b);
        }
        assert_eq!(crc32c(&data), h);
    }
}
