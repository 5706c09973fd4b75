use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use weibo_core::api;
use weibo_core::oauth2::{
    AccessToken, Credentials, DisplayType, OAuth2Error, OAuthEndpoints, ResponseType,
    TokenManager, TokenState, WebFormLogin,
};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{blocking, init_tracing};

fn manager(base_url: &str) -> anyhow::Result<TokenManager> {
    let credentials = Credentials::new("K", "S").with_callback_url("https://cb");
    Ok(TokenManager::builder(credentials)
        .with_endpoints(OAuthEndpoints::with_base_url(base_url)?)
        .build()?)
}

fn sign(payload_json: &str, secret: &str) -> String {
    let payload = URL_SAFE_NO_PAD.encode(payload_json);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("any key length");
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{signature}.{payload}")
}

#[test]
fn should_build_authorize_url() -> anyhow::Result<()> {
    let credentials = Credentials::new("K", "S").with_callback_url("https://cb");
    let manager = TokenManager::builder(credentials)
        .with_client(weibo_core::ApiClient::builder().with_transport(NoNetwork))
        .build()?;

    let url = manager.authorize_url(ResponseType::Code, Some("xyz"), DisplayType::Default);

    assert_eq!(
        url.query(),
        Some("client_id=K&redirect_uri=https%3A%2F%2Fcb&response_type=code&state=xyz&display=default")
    );
    Ok(())
}

#[derive(Debug)]
struct NoNetwork;

impl weibo_core::HttpTransport for NoNetwork {
    fn execute(
        &self,
        _request: weibo_core::HttpRequest,
    ) -> Result<weibo_core::HttpResponse, weibo_core::TransportError> {
        Err(weibo_core::TransportError::new("network disabled"))
    }
}

#[test]
fn should_decode_signed_request() -> anyhow::Result<()> {
    let credentials = Credentials::new("K", "S");
    let mut manager = TokenManager::builder(credentials)
        .with_client(weibo_core::ApiClient::builder().with_transport(NoNetwork))
        .build()?;

    let signed = sign(r#"{"oauth_token":"T","user_id":"42","expires":"3600"}"#, "S");
    let token = manager.exchange_signed_request(&signed)?.expect("token");

    assert_eq!(token.token(), "T");
    assert_eq!(token.uid(), "42");
    assert_eq!(token.expires_in(), Duration::from_secs(3600));
    assert_eq!(manager.access_token().map(AccessToken::token), Some("T"));

    let unauthorized = sign(r#"{"user_id":"42"}"#, "S");
    assert!(manager.exchange_signed_request(&unauthorized)?.is_none());
    assert_eq!(manager.access_token().map(AccessToken::token), Some("T"));

    let forged = sign(r#"{"oauth_token":"X"}"#, "not-the-secret");
    assert!(matches!(
        manager.exchange_signed_request(&forged),
        Err(OAuth2Error::InvalidSignature)
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_exchange_authorization_code() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/access_token"))
        .and(query_param("source", "K"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "client_id=K&client_secret=S&grant_type=authorization_code&code=abc&redirect_uri=https%3A%2F%2Fcb",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"access_token":"2.00abc","remind_in":"157679999","expires_in":157679999,"uid":"1404376560"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    let base_url = server.uri();

    let token = blocking(move || {
        let mut manager = manager(&base_url)?;
        let token = manager.exchange_authorization_code("abc")?;
        assert_eq!(manager.access_token().map(AccessToken::uid), Some("1404376560"));
        Ok(token)
    })
    .await?;

    assert_eq!(token.token(), "2.00abc");
    assert_eq!(token.expires_in(), Duration::from_secs(157_679_999));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_surface_token_endpoint_error() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"error":"invalid_grant","error_code":21325,"request":"/oauth2/access_token"}"#,
        ))
        .mount(&server)
        .await;
    let base_url = server.uri();

    let code = blocking(move || {
        let mut manager = manager(&base_url)?;
        let error = manager
            .exchange_refresh_token("2.00stale")
            .expect_err("token endpoint rejects the grant");
        Ok(error.service_error().map(|error| error.code.clone()))
    })
    .await?;

    assert_eq!(code.as_deref(), Some("21325"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_probe_token_validity() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/account/get_uid.json"))
        .and(header("authorization", "OAuth2 valid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"uid":42}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2/account/get_uid.json"))
        .and(header("authorization", "OAuth2 expired"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"error":"expired_token","error_code":"21315","request":"/2/account/get_uid.json"}"#,
        ))
        .mount(&server)
        .await;
    let base_url = server.uri();

    let states = blocking(move || {
        let mut manager = manager(&base_url)?;
        manager.set_access_token(AccessToken::new("valid", "42", Duration::from_secs(60)));
        let valid = manager.probe_token_validity()?;
        manager.set_access_token(AccessToken::new("expired", "42", Duration::from_secs(60)));
        let expired = manager.probe_token_validity()?;
        Ok((valid, expired))
    })
    .await?;

    assert_eq!(states, (TokenState::Valid, TokenState::Expired));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_login_through_authorize_form() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    let base_url = server.uri();
    Mock::given(method("POST"))
        .and(path("/oauth2/authorize"))
        .and(header(
            "referer",
            format!(
                "{base_url}/oauth2/authorize?client_id=K&redirect_uri=https%3A%2F%2Fcb&response_type=code&display=default"
            )
            .as_str(),
        ))
        .and(body_string(
            "action=submit&withOfficalFlag=0&ticket=&isLoginSina=&response_type=token&regCallback=&redirect_uri=https%3A%2F%2Fcb&client_id=K&state=&from=&userId=someone&passwd=secret&display=js",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><script>cb({"access_token":"2.00abc","remind_in":"3600","expires_in":3600,"refresh_token":"2.00ref","uid":"42"})</script></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let token = blocking(move || {
        let mut manager = manager(&base_url)?;
        let logged_in = manager.login_with(&WebFormLogin::new()?, "someone", "secret")?;
        assert!(logged_in);
        Ok(manager.clear_access_token())
    })
    .await?
    .expect("token stored");

    assert_eq!(token.token(), "2.00abc");
    assert_eq!(token.refresh_token(), Some("2.00ref"));
    assert_eq!(token.uid(), "42");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_report_failed_login() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>登录名或密码错误</html>"))
        .mount(&server)
        .await;
    let base_url = server.uri();

    let logged_in = blocking(move || {
        let mut manager = manager(&base_url)?;
        Ok(manager.login_with(&WebFormLogin::new()?, "someone", "wrong")?)
    })
    .await?;

    assert!(!logged_in);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn should_call_typed_endpoints() -> anyhow::Result<()> {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/account/get_uid.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"uid":1404376560}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2/common/get_timezone.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"8.0":"(GMT+08:00) 北京"},{"9.0":"(GMT+09:00) 东京"}]"#),
        )
        .mount(&server)
        .await;
    let base_url = server.uri();

    let (uid, timezones) = blocking(move || {
        let mut manager = manager(&base_url)?;
        manager.set_access_token(AccessToken::new("2.00abc", "", Duration::from_secs(60)));
        let uid = api::account::get_uid(&manager)?;
        let timezones = api::common::get_timezone(&manager)?;
        Ok((uid, timezones))
    })
    .await?;

    assert_eq!(uid.uid, "1404376560");
    assert_eq!(
        timezones.get("8.0").map(String::as_str),
        Some("(GMT+08:00) 北京")
    );
    assert_eq!(timezones.len(), 2);
    Ok(())
}
