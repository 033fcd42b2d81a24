use std::{collections::HashMap, fs, time::Duration};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_with(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.backend_config().expect("configured").request_timeout, None);
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let err = load_settings_with(Some(&missing), env_from(&[])).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rag_chat.toml");
    fs::write(
        &path,
        "server_url = \"http://rag.internal:9000\"\nrequest_timeout_secs = 45\nuser_lang = \"de\"\n",
    )
    .expect("write config");

    let settings = load_settings_with(Some(&path), env_from(&[])).expect("settings");

    assert_eq!(
        settings,
        Settings {
            server_url: "http://rag.internal:9000".to_string(),
            request_timeout_secs: Some(45),
            user_lang: Some("de".to_string()),
        }
    );
    assert_eq!(
        settings.backend_config().expect("configured").request_timeout,
        Some(Duration::from_secs(45))
    );
}

#[test]
fn env_overrides_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rag_chat.toml");
    fs::write(&path, "server_url = \"http://from-file\"\nuser_lang = \"de\"\n").expect("write");

    let settings = load_settings_with(
        Some(&path),
        env_from(&[
            ("RAG_CHAT_SERVER_URL", "http://from-env"),
            ("RAG_CHAT_REQUEST_TIMEOUT_SECS", "10"),
            ("RAG_CHAT_USER_LANG", "  "),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://from-env");
    assert_eq!(settings.request_timeout_secs, Some(10));
    assert_eq!(settings.user_lang, None);
}

#[test]
fn invalid_timeout_env_is_ignored() {
    let settings = load_settings_with(
        None,
        env_from(&[("RAG_CHAT_REQUEST_TIMEOUT_SECS", "soon")]),
    )
    .expect("settings");
    assert_eq!(settings.request_timeout_secs, None);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let settings = Settings {
        request_timeout_secs: Some(0),
        ..Settings::default()
    };
    assert_eq!(settings.backend_config().expect("configured").request_timeout, None);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rag_chat.toml");
    fs::write(&path, "server_url = [").expect("write");

    let err = load_settings_with(Some(&path), env_from(&[])).expect_err("must fail");
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn blank_server_url_means_no_backend() {
    let settings = load_settings_with(None, env_from(&[("RAG_CHAT_SERVER_URL", " ")]))
        .expect("settings");
    assert_eq!(settings.server_url, " ");
    assert!(settings.backend_config().is_none());
}
