use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_provider_variants() {
    assert_eq!(parse_provider("").unwrap(), AiProvider::Disabled);
    assert_eq!(parse_provider("none").unwrap(), AiProvider::Disabled);
    assert_eq!(parse_provider("OpenRouter").unwrap(), AiProvider::OpenRouter);
    assert_eq!(parse_provider(" gemini ").unwrap(), AiProvider::Gemini);
}

#[test]
fn parse_provider_unknown_fails() {
    let err = parse_provider("claude").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MEDIAINTEL_AI_PROVIDER")
    );
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.normalize_path.is_none());
    assert_eq!(cfg.sentiment_thresholds, SentimentThresholds::default());
    assert_eq!(cfg.top_n, 5);
    assert_eq!(cfg.weights, EngagementWeights::default());
    assert_eq!(cfg.ai.provider, AiProvider::Disabled);
    assert_eq!(cfg.ai.timeout_secs, 8);
    assert_eq!(cfg.ai.openrouter_model, DEFAULT_OPENROUTER_MODEL);
    assert_eq!(cfg.ai.gemini_model, DEFAULT_GEMINI_MODEL);
}

#[test]
fn thresholds_override() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD", "0.5");
    map.insert("MEDIAINTEL_SENTIMENT_NEGATIVE_THRESHOLD", "-0.1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.sentiment_thresholds.positive - 0.5).abs() < f64::EPSILON);
    assert!((cfg.sentiment_thresholds.negative + 0.1).abs() < f64::EPSILON);
}

#[test]
fn thresholds_must_not_cross() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD", "-0.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDIAINTEL_SENTIMENT_NEGATIVE_THRESHOLD"),
        "got: {result:?}"
    );
}

#[test]
fn threshold_rejects_non_number() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD", "high");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD"),
        "got: {result:?}"
    );
}

#[test]
fn threshold_rejects_nan() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD", "NaN");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn top_n_zero_is_invalid() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_TOP_N", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDIAINTEL_TOP_N"),
        "got: {result:?}"
    );
}

#[test]
fn weights_override_and_reject_negative() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_WEIGHT_VIEWS", "0.01");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.weights.views - 0.01).abs() < f64::EPSILON);

    map.insert("MEDIAINTEL_WEIGHT_SHARES", "-2");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDIAINTEL_WEIGHT_SHARES"),
        "got: {result:?}"
    );
}

#[test]
fn openrouter_requires_api_key() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_AI_PROVIDER", "openrouter");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "OPENROUTER_API_KEY"),
        "got: {result:?}"
    );

    map.insert("OPENROUTER_API_KEY", "sk-or-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ai.provider, AiProvider::OpenRouter);
    assert_eq!(cfg.ai.openrouter_api_key.as_deref(), Some("sk-or-test"));
}

#[test]
fn gemini_requires_non_blank_api_key() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_AI_PROVIDER", "gemini");
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "got: {result:?}"
    );
}

#[test]
fn ai_timeout_zero_is_invalid() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_AI_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MEDIAINTEL_AI_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_keys() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_AI_PROVIDER", "gemini");
    map.insert("GEMINI_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn normalize_path_is_read_when_set() {
    let mut map = HashMap::new();
    map.insert("MEDIAINTEL_NORMALIZE_PATH", "./config/normalize.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.normalize_path.as_deref(),
        Some(std::path::Path::new("./config/normalize.yaml"))
    );
}

#[test]
fn load_app_config_reads_env_file_then_process_env() {
    let config = load_app_config().expect("defaults apply without MEDIAINTEL_* variables");
    assert!(config.top_n >= 1);
    assert!(config.ai.timeout_secs >= 1);
}
