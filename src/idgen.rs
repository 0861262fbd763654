// Identifier generation for collection entities
// Random nanoid-style ids plus deterministic hash-based ids

use rand::Rng;

/// Length of every entity identifier
pub const UID_LENGTH: usize = 21;

/// nanoid's url alphabet with `-` and `_` removed, so ids stay alphanumeric
pub const UID_ALPHABET: &[u8] = b"useandom26T198340PX75pxJACKVERYMINDBUSHWOLFGQZbfghjklqvwyzrict";

/// Generate a fresh random identifier.
pub fn uid() -> String {
    let mut rng = rand::thread_rng();
    (0..UID_LENGTH)
        .map(|_| UID_ALPHABET[rng.gen_range(0..UID_ALPHABET.len())] as char)
        .collect()
}

/// True when `s` has the shape produced by [`uid`] or [`uid_from_hash`].
pub fn is_valid_uid(s: &str) -> bool {
    s.len() == UID_LENGTH && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 32-bit string hash (`h = h * 31 + unit` over UTF-16 units), rendered in base 36.
pub fn simple_hash(s: &str) -> String {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    to_base36(hash as u32)
}

/// Deterministic identifier: the hash of `s`, right-padded with `0`.
pub fn uid_from_hash(s: &str) -> String {
    let mut id = simple_hash(s);
    while id.len() < UID_LENGTH {
        id.push('0');
    }
    id
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
