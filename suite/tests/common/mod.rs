use notes_core::Envelope;
use regex::Regex;

/// Assert a failed envelope whose message matches `pattern`, case-insensitively.
pub fn assert_rejected<T>(envelope: &Envelope<T>, pattern: &str) {
    assert!(!envelope.success, "expected success=false, got {:?}", envelope.message);
    let re = Regex::new(&format!("(?i){pattern}")).unwrap();
    assert!(
        re.is_match(envelope.message()),
        "message {:?} does not match /{pattern}/i",
        envelope.message()
    );
}
