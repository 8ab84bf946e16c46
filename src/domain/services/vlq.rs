//! Base64 VLQ encoding of source map segments

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

fn to_vlq_signed(value: i64) -> u64 {
    if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    }
}

/// Encode one mappings segment (`[0, 0, 3, 0]` → `AAGA`).
pub fn encode_segment(values: &[i64]) -> String {
    let mut encoded = String::new();
    for &value in values {
        let mut vlq = to_vlq_signed(value);
        loop {
            let mut digit = vlq & VLQ_BASE_MASK;
            vlq >>= VLQ_BASE_SHIFT;
            if vlq > 0 {
                digit |= VLQ_CONTINUATION_BIT;
            }
            encoded.push(BASE64_ALPHABET[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
    }
    encoded
}
