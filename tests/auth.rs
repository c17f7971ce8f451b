mod common;

use applytrack::infrastructure::{FileTokenStore, TokenStore, TOKEN_KEY};
use applytrack::{ApplicationGateway, TrackerError};
use common::{anonymous, seed, TestServer, PASSWORD, TOKEN};
use std::sync::Arc;

#[tokio::test]
async fn login_stores_token_and_gateway_uses_it() {
    let server = TestServer::start(seed()).await;
    let tokens = anonymous();
    let auth = server.auth_client(tokens.clone());
    let gateway = server.gateway(tokens.clone());

    assert!(!auth.is_authenticated().unwrap());
    auth.login("sam@example.com", PASSWORD).await.unwrap();

    assert!(auth.is_authenticated().unwrap());
    assert_eq!(tokens.get(TOKEN_KEY).unwrap().as_deref(), Some(TOKEN));

    gateway.list().await.unwrap();
    assert_eq!(
        server.with_state(|s| s.auth_headers.clone()),
        vec![Some(format!("Bearer {TOKEN}"))]
    );
}

#[tokio::test]
async fn rejected_credentials_are_an_auth_error() {
    let server = TestServer::start(seed()).await;
    let tokens = anonymous();
    let auth = server.auth_client(tokens.clone());

    let err = auth.login("sam@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, TrackerError::Auth(_)));
    assert_eq!(tokens.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_makes_next_request_anonymous() {
    let server = TestServer::start(seed()).await;
    let tokens = anonymous();
    let auth = server.auth_client(tokens.clone());
    let gateway = server.gateway(tokens);

    auth.login("sam@example.com", PASSWORD).await.unwrap();
    gateway.list().await.unwrap();
    auth.logout().unwrap();
    gateway.list().await.unwrap();

    assert_eq!(
        server.with_state(|s| s.auth_headers.clone()),
        vec![Some(format!("Bearer {TOKEN}")), None]
    );
}

#[tokio::test]
async fn token_survives_in_file_store() {
    let server = TestServer::start(seed()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(path.clone()).unwrap());
    server
        .auth_client(tokens)
        .login("sam@example.com", PASSWORD)
        .await
        .unwrap();

    let reopened = FileTokenStore::new(path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some(TOKEN));
}
