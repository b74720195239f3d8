use saas_dashboard::infrastructure::observability::sanitize_prompt;

#[test]
fn given_blank_prompt_when_sanitizing_then_marked_empty() {
    assert_eq!(sanitize_prompt("   "), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_unchanged() {
    assert_eq!(sanitize_prompt("  What is Rust?  "), "What is Rust?");
}

#[test]
fn given_long_multibyte_prompt_when_sanitizing_then_truncated_on_char_boundary() {
    let prompt = "ü".repeat(150);

    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.starts_with(&"ü".repeat(100)));
    assert!(sanitized.ends_with("... (150 chars total)"));
}

#[test]
fn given_prompt_with_credentials_when_sanitizing_then_secrets_redacted() {
    let sanitized = sanitize_prompt("use api_key=sk-123 and password=hunter2 please");

    assert!(!sanitized.contains("sk-123"));
    assert!(!sanitized.contains("hunter2"));
    assert!(sanitized.contains("api_key=[REDACTED]"));
    assert!(sanitized.ends_with("please"));
}

#[test]
fn given_bearer_token_in_prompt_when_sanitizing_then_token_hidden() {
    let sanitized = sanitize_prompt("my header is Bearer eyJhbGciOi.abc.def ok");

    assert_eq!(sanitized, "my header is Bearer [REDACTED] ok");
}
