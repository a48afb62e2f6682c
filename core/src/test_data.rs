//! Random values that keep tests isolated against a stateful service.

use chrono::Utc;
use rand::Rng;

use crate::types::NOTE_CATEGORIES;

pub const DEFAULT_PASSWORD_LEN: usize = 10;

const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// `prefix` followed by the epoch milliseconds and a number below 10000.
///
/// Unique enough for sequential use within one run; not collision-proof
/// across processes.
pub fn random_string(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let salt: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{prefix}{millis}{salt}")
}

/// `len` characters drawn uniformly from lowercase ASCII letters and digits.
pub fn random_password(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())]))
        .collect()
}

pub fn random_email(prefix: &str) -> String {
    format!("{}@gmail.com", random_string(prefix))
}

pub fn random_category() -> &'static str {
    NOTE_CATEGORIES[rand::thread_rng().gen_range(0..NOTE_CATEGORIES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_string_starts_with_prefix_then_digits() {
        let value = random_string("TestUser");
        let suffix = value.strip_prefix("TestUser").unwrap();
        // 13-digit millisecond timestamp plus 1 to 4 digits of salt.
        assert!((14..=17).contains(&suffix.len()), "suffix {suffix}");
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn random_string_differs_between_calls() {
        let values: std::collections::HashSet<String> =
            (0..50).map(|_| random_string("u")).collect();
        assert!(values.len() > 1);
    }

    #[test]
    fn random_password_has_requested_length_and_alphabet() {
        for len in [0, 1, DEFAULT_PASSWORD_LEN, 30] {
            let password = random_password(len);
            assert_eq!(password.len(), len);
            assert!(password
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn random_email_is_gmail_address() {
        let email = random_email("dup");
        assert!(email.starts_with("dup"));
        assert!(email.ends_with("@gmail.com"));
    }

    #[test]
    fn random_category_is_accepted_by_service() {
        for _ in 0..20 {
            assert!(NOTE_CATEGORIES.contains(&random_category()));
        }
    }
}
