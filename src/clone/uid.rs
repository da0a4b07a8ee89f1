//! Unique class names for pseudo-element emulation

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

const RANDOM_SPACE: u32 = 36 * 36 * 36 * 36;

/// Produces `u` + 4 random base36 characters + a monotonically increasing index
///
/// Names are unique per generator; one generator lives for one renderer.
#[derive(Debug, Default)]
pub struct UidGenerator {
    index: AtomicUsize,
}

impl UidGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_uid(&self) -> String {
        let index = self.index.fetch_add(1, Ordering::Relaxed);
        let random = rand::rng().random_range(0..RANDOM_SPACE);
        format!("u{}{index}", to_base36(random))
    }
}

/// Four lowercase base36 digits, zero padded
fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = [b'0'; 4];
    for slot in out.iter_mut().rev() {
        *slot = DIGITS[(value % 36) as usize];
        value /= 36;
    }
    out.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_is_padded() {
        assert_eq!(to_base36(0), "0000");
        assert_eq!(to_base36(35), "000z");
        assert_eq!(to_base36(RANDOM_SPACE - 1), "zzzz");
    }

    #[test]
    fn uids_have_prefix_random_part_and_increasing_index() {
        let uids = UidGenerator::new();
        let first = uids.next_uid();
        let second = uids.next_uid();

        assert!(first.starts_with('u'));
        assert_eq!(first.len(), 6);
        assert!(first.ends_with('0'));
        assert!(second.ends_with('1'));
        assert!(first[1..5].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(first, second);
    }

    #[test]
    fn generators_are_independent() {
        let a = UidGenerator::new();
        let b = UidGenerator::new();
        a.next_uid();
        a.next_uid();

        assert!(b.next_uid().ends_with('0'));
    }
}
