//! Perfect hashing over a fixed set of case-insensitive names
//!
//! Header and parameter names are looked up once per occurrence while
//! scanning and decoding, so the lookup has to be constant time and must never
//! confuse an unregistered name with a registered one. [`PerfectHash`] is a
//! hash-and-displace table: keys are first spread over buckets with one hash
//! function, then each bucket gets the smallest seed that places all of its
//! keys in free slots. A lookup computes two hashes and does one
//! case-insensitive comparison against the key stored in the slot.
//!
//! Tables are built once from the compiled-in key lists and never change.

use tracing::trace;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Attempts per bucket before the slot table is grown.
const MAX_SEED: u32 = 1 << 12;

fn hash(key: &[u8], seed: u32) -> u64 {
    let mut h = FNV_OFFSET ^ u64::from(seed).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    for &b in key {
        h ^= u64::from(b.to_ascii_lowercase());
        h = h.wrapping_mul(FNV_PRIME);
    }
    // fold high bits in so small moduli see the whole hash
    h ^ (h >> 29) ^ (h >> 47)
}

/// Collision-free lookup table from case-insensitive names to values.
#[derive(Debug, Clone)]
pub struct PerfectHash<V: Copy + 'static> {
    seeds: Vec<u32>,
    slots: Vec<Option<(&'static str, V)>>,
    max_key_len: usize,
}

impl<V: Copy + 'static> PerfectHash<V> {
    /// Builds a table over `entries`.
    ///
    /// Keys are compared without regard to ASCII case. When the same key
    /// appears more than once the first entry wins.
    pub fn build(entries: &[(&'static str, V)]) -> Self {
        let mut keys: Vec<(&'static str, V)> = Vec::with_capacity(entries.len());
        for &(key, value) in entries {
            if !keys.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)) {
                keys.push((key, value));
            }
        }

        let max_key_len = keys.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let bucket_count = (keys.len() / 2).max(1);
        let mut slot_count = (keys.len() * 2).next_power_of_two().max(2);

        loop {
            if let Some((seeds, slots)) = Self::place(&keys, bucket_count, slot_count) {
                trace!(
                    "perfect hash built: {} keys, {} buckets, {} slots",
                    keys.len(),
                    bucket_count,
                    slot_count
                );
                return PerfectHash {
                    seeds,
                    slots,
                    max_key_len,
                };
            }
            slot_count *= 2;
        }
    }

    fn place(
        keys: &[(&'static str, V)],
        bucket_count: usize,
        slot_count: usize,
    ) -> Option<(Vec<u32>, Vec<Option<(&'static str, V)>>)> {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); bucket_count];
        for (i, (key, _)) in keys.iter().enumerate() {
            let b = (hash(key.as_bytes(), 0) % bucket_count as u64) as usize;
            buckets[b].push(i);
        }

        // largest buckets first, while the table is still mostly empty
        let mut order: Vec<usize> = (0..bucket_count).collect();
        order.sort_by(|a, b| buckets[*b].len().cmp(&buckets[*a].len()));

        let mut seeds = vec![0u32; bucket_count];
        let mut slots: Vec<Option<(&'static str, V)>> = vec![None; slot_count];

        for b in order {
            if buckets[b].is_empty() {
                continue;
            }
            let mut placed = false;
            'seed: for seed in 1..MAX_SEED {
                let mut chosen = Vec::with_capacity(buckets[b].len());
                for &k in &buckets[b] {
                    let slot = (hash(keys[k].0.as_bytes(), seed) % slot_count as u64) as usize;
                    if slots[slot].is_some() || chosen.contains(&slot) {
                        continue 'seed;
                    }
                    chosen.push(slot);
                }
                for (&k, &slot) in buckets[b].iter().zip(chosen.iter()) {
                    slots[slot] = Some(keys[k]);
                }
                seeds[b] = seed;
                placed = true;
                break;
            }
            if !placed {
                return None;
            }
        }

        Some((seeds, slots))
    }

    /// Looks up `name`, ignoring ASCII case.
    pub fn get(&self, name: &[u8]) -> Option<V> {
        if name.is_empty() || name.len() > self.max_key_len {
            return None;
        }
        let bucket = (hash(name, 0) % self.seeds.len() as u64) as usize;
        let seed = self.seeds[bucket];
        if seed == 0 {
            return None;
        }
        let slot = (hash(name, seed) % self.slots.len() as u64) as usize;
        match self.slots[slot] {
            Some((key, value)) if key.as_bytes().eq_ignore_ascii_case(name) => Some(value),
            _ => None,
        }
    }

    /// Number of distinct keys in the table.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[(&str, u8)] = &[
        ("red", 1),
        ("green", 2),
        ("blue", 3),
        ("Cyan", 4),
        ("magenta", 5),
        ("yellow", 6),
        ("black", 7),
        ("x", 8),
    ];

    #[test]
    fn test_every_key_found() {
        let table = PerfectHash::build(COLORS);
        for &(key, value) in COLORS {
            assert_eq!(table.get(key.as_bytes()), Some(value));
            assert_eq!(table.get(key.to_uppercase().as_bytes()), Some(value));
            assert_eq!(table.get(key.to_lowercase().as_bytes()), Some(value));
        }
        assert_eq!(table.len(), COLORS.len());
    }

    #[test]
    fn test_misses() {
        let table = PerfectHash::build(COLORS);
        assert_eq!(table.get(b""), None);
        assert_eq!(table.get(b"purple"), None);
        assert_eq!(table.get(b"re"), None);
        assert_eq!(table.get(b"reds"), None);
        assert_eq!(table.get(b"a-much-longer-name-than-any-key"), None);
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let table = PerfectHash::build(&[("a", 1), ("A", 2), ("b", 3)]);
        assert_eq!(table.get(b"a"), Some(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_single_key_and_empty_table() {
        let table = PerfectHash::build(&[("only", 9u8)]);
        assert_eq!(table.get(b"ONLY"), Some(9));
        assert_eq!(table.get(b"other"), None);

        let empty: PerfectHash<u8> = PerfectHash::build(&[]);
        assert_eq!(empty.get(b"anything"), None);
    }
}
