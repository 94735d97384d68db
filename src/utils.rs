use std::hash::Hasher;

use fnv::FnvHasher;

/// Stable archive key for an entry name: FNV-1a over its UTF-8 bytes.
pub(crate) fn entry_id(name: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(name.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_is_fnv1a() {
        assert_eq!(entry_id(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(entry_id("a"), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(entry_id("weights"), entry_id("bias"));
    }
}
