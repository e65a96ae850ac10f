/// Number of leading characters of a token that may appear in logs
const VISIBLE_PREFIX_CHARS: usize = 4;

/// Mask a bearer token for logging.
/// Shows at most the first 4 characters, and nothing at all for short tokens.
pub fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= VISIBLE_PREFIX_CHARS * 2 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(VISIBLE_PREFIX_CHARS).collect();
    format!("{}****", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token_long() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcd****");
    }

    #[test]
    fn test_mask_token_short_hides_everything() {
        assert_eq!(mask_token(""), "****");
        assert_eq!(mask_token("tok-abc"), "****");
        assert_eq!(mask_token("12345678"), "****");
    }

    #[test]
    fn test_mask_token_multibyte() {
        // Must not split inside a UTF-8 sequence
        assert_eq!(mask_token("ééééééééé"), "éééé****");
    }
}
