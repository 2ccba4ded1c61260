//! The 32-bit name hash shared by scope tables, `string-hash`, and row maps

/// FNV-1a offset basis.
const FNV_OFFSET: u32 = 0x811c_9dc5;

/// FNV-1a prime.
const FNV_PRIME: u32 = 0x0100_0193;

/// Hash a byte string with the interpreter's FNV-1a variant.
///
/// Each byte is sign-extended before the XOR fold, so bytes above `0x7f`
/// perturb all 32 bits. Scope tables, the `string-hash` action, and the
/// row-map helpers in [`crate::table`] all use exactly this function, which
/// keeps script-built and host-built rows interchangeable.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= (b as i8) as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_offset_basis() {
        assert_eq!(hash_bytes(b""), 0x811c_9dc5);
    }

    #[test]
    fn test_known_single_byte() {
        // FNV-1a of "a"
        assert_eq!(hash_bytes(b"a"), 0xe40c_292c);
    }

    #[test]
    fn test_known_collision_pair() {
        // A classic FNV-1a 32-bit collision; name lookups treat these two
        // as the same key.
        assert_eq!(hash_bytes(b"costarring"), hash_bytes(b"liquid"));
        assert_ne!(hash_bytes(b"costarring"), hash_bytes(b"costarrinG"));
    }

    #[test]
    fn test_distinct_common_names() {
        assert_ne!(hash_bytes(b"x"), hash_bytes(b"y"));
        assert_ne!(hash_bytes(b"count"), hash_bytes(b"total"));
    }
}
