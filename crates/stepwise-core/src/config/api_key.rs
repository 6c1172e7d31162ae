//! API key helpers

/// Standard environment variable holding a provider's key
pub fn standard_env_var(provider: &str) -> String {
    format!("{}_API_KEY", provider.to_uppercase())
}

/// Mask an API key for safe display
pub fn mask_api_key(key: &str) -> String {
    let len = key.chars().count();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = key.chars().take(6).collect();
    let suffix: String = key.chars().skip(len - 4).collect();
    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_short_keys_entirely() {
        assert_eq!(mask_api_key("abc"), "***");
        assert_eq!(mask_api_key(""), "");
    }

    #[test]
    fn keeps_prefix_and_suffix_of_long_keys() {
        assert_eq!(mask_api_key("gsk_1234567890abcdef"), "gsk_12...cdef");
    }

    #[test]
    fn env_var_name_is_upper_snake() {
        assert_eq!(standard_env_var("groq"), "GROQ_API_KEY");
    }
}
