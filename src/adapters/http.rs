use crate::domain::model::{AuthGuardCheck, HealthPayload, HealthReport, GUARDED_ROUTES};
use crate::utils::error::{DeployError, Result};
use std::time::Duration;
use url::Url;

/// Smoke-tests a deployed backend through its public `/` and `/health` endpoints.
#[derive(Debug, Clone)]
pub struct HealthClient {
    client: reqwest::Client,
}

impl HealthClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn check(&self, base_url: &str) -> Result<HealthReport> {
        let base = normalize_base(base_url)?;

        let root_url = base.clone();
        tracing::debug!("GET {}", root_url);
        let root = self.client.get(root_url.clone()).send().await?;
        if !root.status().is_success() {
            return Err(DeployError::VerificationError {
                url: root_url.to_string(),
                message: format!("unexpected status {}", root.status()),
            });
        }
        let root_body: serde_json::Value = root.json().await?;
        let root_message = root_body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .ok_or_else(|| DeployError::VerificationError {
                url: root_url.to_string(),
                message: "root response has no message field".to_string(),
            })?;

        let health_url = join(&base, "health")?;
        tracing::debug!("GET {}", health_url);
        let health = self.client.get(health_url.clone()).send().await?;
        let status = health.status();
        let body = health.text().await?;

        // 500 回應仍可能帶有 {"status": "unhealthy", "error": ...}
        let payload: HealthPayload = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(DeployError::VerificationError {
                    url: health_url.to_string(),
                    message: format!("unexpected status {}", status),
                })
            }
        };

        if let Some(error) = &payload.error {
            tracing::warn!("Health endpoint reported an error: {}", error);
        }

        let mut auth_guards = Vec::with_capacity(GUARDED_ROUTES.len());
        for route in GUARDED_ROUTES {
            auth_guards.push(self.check_guard(&base, route).await?);
        }

        Ok(HealthReport {
            base_url: base.to_string(),
            root_message,
            status: payload.status,
            supabase_configured: payload.supabase_configured,
            auth_guards,
        })
    }

    /// Requests a protected route without a bearer token; only the status code is kept.
    async fn check_guard(&self, base: &Url, route: &str) -> Result<AuthGuardCheck> {
        let url = join(base, route)?;
        tracing::debug!("GET {} (no token)", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if status != 401 {
            tracing::warn!("/{} answered {} without a token", route, status);
        }
        Ok(AuthGuardCheck {
            route: format!("/{}", route),
            status,
        })
    }
}

fn normalize_base(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url).map_err(|e| DeployError::InvalidConfigValueError {
        field: "verify.url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn join(base: &Url, segment: &str) -> Result<Url> {
    base.join(segment)
        .map_err(|e| DeployError::InvalidConfigValueError {
            field: "verify.url".to_string(),
            value: base.to_string(),
            reason: format!("Cannot build {} URL: {}", segment, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_gets_trailing_slash() {
        let base = normalize_base("https://api.example.com/v1").unwrap();
        assert_eq!(join(&base, "health").unwrap().as_str(), "https://api.example.com/v1/health");

        let base = normalize_base("https://api.example.com").unwrap();
        assert_eq!(join(&base, "health").unwrap().as_str(), "https://api.example.com/health");
    }

    #[test]
    fn guarded_routes_stay_under_base_path() {
        let base = normalize_base("https://api.example.com/v1").unwrap();
        assert_eq!(
            join(&base, GUARDED_ROUTES[0]).unwrap().as_str(),
            "https://api.example.com/v1/api/auth/me"
        );
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(normalize_base("not a url").is_err());
    }
}
