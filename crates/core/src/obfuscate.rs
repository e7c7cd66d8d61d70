//! File-level XOR obfuscation. `encode_xor`/`decode_xor` are exact inverses;
//! `is_obfuscated` detects which form a buffer is in by checking for the
//! `"Global"` sentinel the container format always places at offset 20.

const SENTINEL_OFFSET: usize = 20;
const SENTINEL: &[u8] = b"Global";
const SEED: u8 = 0x6B;

/// True when `bytes` does *not* carry the plaintext `"Global"` sentinel at
/// offset 20, meaning it must be de-obfuscated before it can be parsed.
/// Buffers too short to contain the sentinel are treated as obfuscated,
/// since a short buffer can't be a valid plaintext pack either way.
pub fn is_obfuscated(bytes: &[u8]) -> bool {
    match bytes.get(SENTINEL_OFFSET..SENTINEL_OFFSET + SENTINEL.len()) {
        Some(tag) => tag != SENTINEL,
        None => true,
    }
}

/// Reverses `encode_xor`.
pub fn decode_xor(b: &[u8]) -> Vec<u8> {
    if b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0u8; b.len()];
    out[0] = b[0] ^ SEED;
    for i in 1..b.len() {
        out[i] = b[i] ^ b[i - 1];
    }
    out
}

/// Applies the game's chained XOR stream: each byte after the first is
/// XORed against the *previously written output* byte, not the input byte.
pub fn encode_xor(b: &[u8]) -> Vec<u8> {
    if b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0u8; b.len()];
    out[0] = b[0] ^ SEED;
    for i in 1..b.len() {
        out[i] = b[i] ^ out[i - 1];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(decode_xor(&[]).is_empty());
        assert!(encode_xor(&[]).is_empty());
    }

    #[test]
    fn encode_decode_are_inverses() {
        let orig = [0xAAu8, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        let enc = encode_xor(&orig);
        let dec = decode_xor(&enc);
        assert_eq!(dec, orig);
    }

    #[test]
    fn decode_then_encode_is_involution() {
        let orig = [1u8, 2, 3, 4, 5, 250, 17, 0, 0, 9];
        let dec = decode_xor(&orig);
        let enc = encode_xor(&dec);
        assert_eq!(enc, orig);
    }

    #[test]
    fn single_byte_buffer() {
        let orig = [0x42u8];
        let enc = encode_xor(&orig);
        assert_eq!(enc, [0x42 ^ SEED]);
        assert_eq!(decode_xor(&enc), orig);
    }

    #[test]
    fn detects_plaintext_sentinel() {
        let mut buf = vec![0u8; 40];
        buf[20..26].copy_from_slice(b"Global");
        assert!(!is_obfuscated(&buf));
    }

    #[test]
    fn short_buffer_is_treated_as_obfuscated() {
        assert!(is_obfuscated(&[0u8; 10]));
    }

    #[test]
    fn obfuscated_form_is_detected() {
        let mut plain = vec![0u8; 40];
        plain[20..26].copy_from_slice(b"Global");
        let obfuscated = encode_xor(&plain);
        assert!(is_obfuscated(&obfuscated));
        assert!(!is_obfuscated(&decode_xor(&obfuscated)));
    }
}
