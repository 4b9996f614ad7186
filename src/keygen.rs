//! Key generators backing the `txkey` and `rtkey` commands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const TXKEY_LEN: usize = 12;

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Returns a 12 character base62 key derived from the current time in microseconds.
///
/// Keys are strictly increasing within the process, even when the clock stalls or steps back,
/// and since the encoding is fixed width they also sort lexicographically in creation order.
pub fn txkey() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
        .unwrap_or(0);

    let previous = LAST_STAMP
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);

    encode_base62(now.max(previous.saturating_add(1)))
}

/// Returns a random, opaque 32 character hex key.
pub fn rtkey() -> String {
    Uuid::new_v4().simple().to_string()
}

fn encode_base62(mut n: u64) -> String {
    let mut digits = [ALPHABET[0]; TXKEY_LEN];
    for digit in digits.iter_mut().rev() {
        *digit = ALPHABET[(n % 62) as usize];
        n /= 62;
    }
    digits.iter().map(|&b| b as char).collect()
}
