//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed working directories and env vars.

use std::path::PathBuf;

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use grant_config::{ConfigError, GrantConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
host = "0.0.0.0"
port = 8080
cors_allow_origin = "http://localhost:5173"

[database]
path = "/var/lib/grants/grants.db"

[uploads]
dir = "/var/lib/grants/uploads"
max_file_bytes = 2048
"#,
        )?;

        let config: GrantConfig = Figment::from(Serialized::defaults(GrantConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.cors_allow_origin, "http://localhost:5173");
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/grants/grants.db")
        );
        assert_eq!(config.uploads.dir, PathBuf::from("/var/lib/grants/uploads"));
        assert_eq!(config.uploads.max_file_bytes, 2048);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
port = 4000
"#,
        )?;

        let config: GrantConfig = Figment::from(Serialized::defaults(GrantConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, PathBuf::from("grants.db"));
        assert_eq!(config.uploads.max_file_bytes, 10 * 1024 * 1024);
        Ok(())
    });
}

#[test]
fn local_grants_toml_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "grants.toml",
            r#"
[database]
path = "local.db"
"#,
        )?;

        let config = GrantConfig::load().expect("config loads");
        assert_eq!(config.database.path, PathBuf::from("local.db"));
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "grants.toml",
            r#"
[server]
port = 4000
"#,
        )?;
        jail.set_env("GRANTS_SERVER__PORT", "5000");
        jail.set_env("GRANTS_UPLOADS__DIR", "/tmp/grant-uploads");

        let config = GrantConfig::load().expect("config loads");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.uploads.dir, PathBuf::from("/tmp/grant-uploads"));
        Ok(())
    });
}

#[test]
fn malformed_value_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("GRANTS_SERVER__PORT", "not-a-port");

        let err = GrantConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn env_zero_limit_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("GRANTS_UPLOADS__MAX_FILE_BYTES", "0");

        let config = GrantConfig::load().expect("config loads");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "uploads.max_file_bytes"
        ));
        Ok(())
    });
}
