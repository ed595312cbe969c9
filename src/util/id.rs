use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;

/// New identifier: decimal epoch milliseconds followed by a 5-char base-36
/// random suffix, so ids minted within the same millisecond still differ.
pub fn new_id() -> String {
    id_at(super::clock::now_millis())
}

/// Identifier with the given time component.
pub fn id_at(millis: i64) -> String {
    let mut rng = rand::rng();
    let mut id = millis.to_string();
    for _ in 0..SUFFIX_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        id.push(ALPHABET[idx] as char);
    }
    id
}

/// Mint ids until one is not rejected by `taken`.
pub fn unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = new_id();
        if !taken(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = id_at(1_700_000_000_000);
        assert!(id.starts_with("1700000000000"));
        assert_eq!(id.len(), 13 + SUFFIX_LEN);
        assert!(
            id[13..]
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_same_tick_ids_differ() {
        let ids: HashSet<String> = (0..200).map(|_| id_at(5)).collect();
        assert!(ids.len() > 190);
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let calls = std::cell::Cell::new(0);
        let id = unique_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert_eq!(calls.get(), 3);
        assert!(!id.is_empty());
    }
}
