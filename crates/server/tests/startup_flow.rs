use configs::AppConfig;

#[tokio::test]
async fn test_run_uses_the_config_it_is_given() -> anyhow::Result<()> {
    let mut cfg = AppConfig::default();
    cfg.server.host = "not a host".into();
    cfg.database.url = "sqlite::memory:".into();
    cfg.database.max_connections = 1;
    cfg.database.min_connections = 1;
    cfg.database.auto_migrate = false;
    cfg.auth.jwt_secret = "startup-secret".into();

    let err = server::run(cfg).await.expect_err("address is invalid");
    assert!(err.to_string().contains("server address"), "got {err}");
    Ok(())
}
