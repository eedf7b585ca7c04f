use serde::{Deserialize, Serialize};

/// Host that serves store-hosted blobs.
pub const STORAGE_HOST: &str = "firebasestorage.googleapis.com";

/// Connection settings of the hosted backend project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl BackendConfig {
    /// Environment keys read by [`BackendConfig::from_lookup`].
    pub const KEYS: [&'static str; 6] = [
        "OLDGOLD_API_KEY",
        "OLDGOLD_AUTH_DOMAIN",
        "OLDGOLD_PROJECT_ID",
        "OLDGOLD_STORAGE_BUCKET",
        "OLDGOLD_MESSAGING_SENDER_ID",
        "OLDGOLD_APP_ID",
    ];

    /// Build from any key/value source (process env, compile-time env, a
    /// test map). Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let [api_key, auth_domain, project_id, storage_bucket, messaging_sender_id, app_id] =
            Self::KEYS.map(get);
        Self {
            api_key,
            auth_domain,
            project_id,
            storage_bucket,
            messaging_sender_id,
            app_id,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A remote project is usable once it has a key and a project id.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }

    /// Object path of a store-hosted image, or `None` for external URLs.
    /// When a bucket is configured, URLs from other buckets are external.
    pub fn blob_path(&self, url: &str) -> Option<String> {
        if !url.contains(STORAGE_HOST) {
            return None;
        }
        if let Some(bucket) = &self.storage_bucket {
            if !url.contains(&format!("/b/{bucket}/")) {
                return None;
            }
        }
        let (_, rest) = url.split_once("/o/")?;
        let encoded = rest.split(['?', '#']).next().unwrap_or_default();
        let path = urlencoding::decode(encoded).ok()?.into_owned();
        (!path.is_empty()).then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let env: HashMap<&str, &str> = [
            ("OLDGOLD_API_KEY", "key-123"),
            ("OLDGOLD_PROJECT_ID", "oldgold"),
            ("OLDGOLD_STORAGE_BUCKET", " oldgold.appspot.com "),
            ("OLDGOLD_APP_ID", "  "),
        ]
        .into_iter()
        .collect();

        let config = BackendConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(config.is_configured());
        assert_eq!(config.storage_bucket.as_deref(), Some("oldgold.appspot.com"));
        assert_eq!(config.app_id, None);
        assert!(!BackendConfig::default().is_configured());
    }

    #[test]
    fn test_from_json_with_missing_fields() {
        let config = BackendConfig::from_json(r#"{"project_id": "demo"}"#).unwrap();
        assert_eq!(config.project_id.as_deref(), Some("demo"));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_blob_path_decodes_hosted_urls() {
        let config = BackendConfig {
            storage_bucket: Some("oldgold.appspot.com".into()),
            ..Default::default()
        };
        let url = "https://firebasestorage.googleapis.com/v0/b/oldgold.appspot.com/o/listings%2Fu1%2F1700_0_bike.jpg?alt=media&token=t";
        assert_eq!(config.blob_path(url).as_deref(), Some("listings/u1/1700_0_bike.jpg"));

        let other_bucket = "https://firebasestorage.googleapis.com/v0/b/elsewhere/o/x.jpg";
        assert_eq!(config.blob_path(other_bucket), None);
        assert_eq!(config.blob_path("https://i.ibb.co/abc/bike.jpg"), None);
        assert_eq!(BackendConfig::default().blob_path(other_bucket).as_deref(), Some("x.jpg"));
    }
}
