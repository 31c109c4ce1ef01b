#[cfg(test)]
mod test {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use crate::client::{Credentials, FeishuClient};
    use crate::config::proc_loader::{expand_env_vars, parse_config};
    use crate::config::settings::LogFormat;
    use crate::utils::config_loader;
    use crate::utils::constants::{DEFAULT_BASE_URL, DEFAULT_CHUNK_SIZE};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[tokio::test]
    #[serial]
    async fn credentials_are_expanded_from_env() {
        std::env::set_var("FEISHU_TEST_APP_ID", "cli_from_env");
        std::env::remove_var("FEISHU_TEST_APP_SECRET");

        let file = write_config(
            r#"
settings:
  api:
    base_url: "http://127.0.0.1:8080/open-apis/"
    timeout_secs: 3
  logging:
    level: debug
    format: json
credentials:
  app_id: "${FEISHU_TEST_APP_ID}"
  app_secret: "${FEISHU_TEST_APP_SECRET:fallback-secret}"
"#,
        );

        let config = config_loader::run(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.settings.api.base_url, "http://127.0.0.1:8080/open-apis");
        assert_eq!(config.settings.api.timeout_secs, 3);
        assert_eq!(config.settings.api.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.settings.logging.as_ref().unwrap().format, LogFormat::Json);

        let credentials = Credentials::from_config(config.credentials.as_ref().unwrap()).unwrap();
        assert_eq!(credentials.app_id(), "cli_from_env");
        assert_eq!(credentials.app_secret(), "fallback-secret");

        std::env::remove_var("FEISHU_TEST_APP_ID");
    }

    #[tokio::test]
    async fn empty_document_gets_defaults() {
        let config = parse_config("{}".to_owned()).await.unwrap();
        assert_eq!(config.settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.settings.logging.unwrap().level, "info");
        assert!(config.credentials.is_none());
    }

    #[tokio::test]
    async fn invalid_settings_are_rejected() {
        let err = parse_config("settings:\n  api:\n    chunk_size: 0\n".to_owned())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("config is not valid"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = config_loader::run("/nonexistent/feishu.yaml").await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid config format"));
    }

    #[test]
    #[serial]
    fn unset_variable_without_default_expands_to_empty() {
        std::env::remove_var("FEISHU_TEST_UNSET");
        let expanded = expand_env_vars("id: \"${FEISHU_TEST_UNSET}\"").unwrap();
        assert_eq!(expanded, "id: \"\"");
    }

    #[test]
    #[serial]
    fn client_from_env_requires_both_values() {
        std::env::set_var(crate::client::APP_ID_ENV, "cli_env");
        std::env::remove_var(crate::client::APP_SECRET_ENV);
        assert!(FeishuClient::from_env().unwrap_err().is_validation());
        std::env::remove_var(crate::client::APP_ID_ENV);
    }
}
