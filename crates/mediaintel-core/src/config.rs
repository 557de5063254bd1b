use std::path::PathBuf;

use crate::app_config::{AiConfig, AiProvider, AppConfig, SentimentThresholds};
use crate::record::EngagementWeights;
use crate::ConfigError;

pub(crate) const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.0-flash-001";
pub(crate) const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let log_level = or_default("MEDIAINTEL_LOG_LEVEL", "info");
    let normalize_path = lookup("MEDIAINTEL_NORMALIZE_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let sentiment_thresholds = SentimentThresholds {
        positive: parse_f64("MEDIAINTEL_SENTIMENT_POSITIVE_THRESHOLD", "0.2")?,
        negative: parse_f64("MEDIAINTEL_SENTIMENT_NEGATIVE_THRESHOLD", "-0.2")?,
    };
    if sentiment_thresholds.negative > sentiment_thresholds.positive {
        return Err(invalid(
            "MEDIAINTEL_SENTIMENT_NEGATIVE_THRESHOLD",
            "must not exceed the positive threshold".to_string(),
        ));
    }

    let top_n = parse_usize("MEDIAINTEL_TOP_N", "5")?;
    if top_n == 0 {
        return Err(invalid("MEDIAINTEL_TOP_N", "must be at least 1".to_string()));
    }

    let parse_weight = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let w = parse_f64(var, default)?;
        if w < 0.0 {
            return Err(invalid(var, "weights must not be negative".to_string()));
        }
        Ok(w)
    };
    let weights = EngagementWeights {
        likes: parse_weight("MEDIAINTEL_WEIGHT_LIKES", "1")?,
        shares: parse_weight("MEDIAINTEL_WEIGHT_SHARES", "1")?,
        comments: parse_weight("MEDIAINTEL_WEIGHT_COMMENTS", "1")?,
        views: parse_weight("MEDIAINTEL_WEIGHT_VIEWS", "0")?,
        engagements: parse_weight("MEDIAINTEL_WEIGHT_ENGAGEMENTS", "1")?,
    };

    let ai = build_ai_config(&lookup, parse_u64("MEDIAINTEL_AI_TIMEOUT_SECS", "8")?)?;

    Ok(AppConfig {
        log_level,
        normalize_path,
        sentiment_thresholds,
        top_n,
        weights,
        ai,
    })
}

fn build_ai_config<F>(lookup: &F, timeout_secs: u64) -> Result<AiConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let provider = parse_provider(&lookup("MEDIAINTEL_AI_PROVIDER").unwrap_or_default())?;
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "MEDIAINTEL_AI_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let non_blank = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let openrouter_api_key = non_blank("OPENROUTER_API_KEY");
    let gemini_api_key = non_blank("GEMINI_API_KEY");

    match provider {
        AiProvider::OpenRouter if openrouter_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()));
        }
        AiProvider::Gemini if gemini_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
        }
        _ => {}
    }

    Ok(AiConfig {
        provider,
        timeout_secs,
        openrouter_api_key,
        openrouter_model: non_blank("MEDIAINTEL_OPENROUTER_MODEL")
            .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
        gemini_api_key,
        gemini_model: non_blank("MEDIAINTEL_GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
    })
}

/// Parse `MEDIAINTEL_AI_PROVIDER`. Blank means disabled.
fn parse_provider(s: &str) -> Result<AiProvider, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "" | "none" | "off" => Ok(AiProvider::Disabled),
        "openrouter" => Ok(AiProvider::OpenRouter),
        "gemini" => Ok(AiProvider::Gemini),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEDIAINTEL_AI_PROVIDER".to_string(),
            reason: format!("unknown provider '{other}'; expected none, openrouter, or gemini"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
