mod common;

use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use httpmock::prelude::*;
use reqwest::Method;
use tokio::test;
use tracing_subscriber::EnvFilter;

use vcdctl::api::org::list_orgs;
use vcdctl::client::{VcdClient, SESSION_PATH};
use vcdctl::error::VcdError;

use common::{logged_in, org_list, site_for, ACCEPT, TOKEN};

#[test]
async fn test_login_sends_double_encoded_basic_credential() -> Result<()> {
    let server = MockServer::start_async().await;
    let expected = format!(
        "Basic {}",
        general_purpose::STANDARD.encode("administrator:secret")
    );
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SESSION_PATH)
                .header("Authorization", expected.as_str())
                .header("Accept", ACCEPT);
            then.status(200)
                .header("X-VMWARE-VCLOUD-ACCESS-TOKEN", TOKEN);
        })
        .await;

    let mut client = VcdClient::new(&site_for(&server))?;
    assert!(client.token().is_none());
    client.login().await?;

    login.assert_async().await;
    assert_eq!(client.token(), Some(TOKEN));
    Ok(())
}

#[test]
async fn test_login_without_token_header_fails_with_response_details() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SESSION_PATH);
            then.status(200)
                .header("X-Request-Id", "req-7")
                .body("<Session/>");
        })
        .await;

    let mut client = VcdClient::new(&site_for(&server))?;
    let err = client.login().await.unwrap_err();

    match &err {
        VcdError::MissingToken { headers, body, .. } => {
            assert!(headers.contains("x-request-id: req-7"));
            assert_eq!(body, "<Session/>");
        }
        other => panic!("expected MissingToken, got {:?}", other),
    }
    assert!(client.token().is_none());
    Ok(())
}

#[test]
async fn test_authenticated_requests_carry_bearer_and_accept() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    let orgs = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/org")
                .header("Authorization", format!("Bearer {}", TOKEN))
                .header("Accept", ACCEPT);
            then.status(200)
                .body(org_list(&[("beta", "b-2"), ("acme", "a-1")]));
        })
        .await;

    let list = list_orgs(&client).await?;
    orgs.assert_async().await;
    let names: Vec<_> = list.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["acme", "beta"]);
    assert_eq!(list[0].id, "a-1");
    Ok(())
}

#[test]
async fn test_caller_headers_do_not_override_fixed_headers() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    let raw = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/vApp/vapp-1")
                .header("Accept", ACCEPT)
                .header("Authorization", format!("Bearer {}", TOKEN))
                .header("Content-Type", "application/vnd.vmware.vcloud.vm+xml");
            then.status(202).body("<Task/>");
        })
        .await;

    let res = client
        .request(
            Method::PUT,
            "/api/vApp/vapp-1",
            &[
                ("Accept", "text/plain"),
                ("Authorization", "Bearer forged"),
                ("Content-Type", "application/vnd.vmware.vcloud.vm+xml"),
            ],
            Some(b"<Vm/>".to_vec()),
        )
        .await?;

    raw.assert_async().await;
    assert_eq!(res.status.as_u16(), 202);
    assert_eq!(res.text(), "<Task/>");
    Ok(())
}

#[test]
async fn test_error_status_becomes_api_error() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/org");
            then.status(403).body("<Error message=\"forbidden\"/>");
        })
        .await;

    let err = list_orgs(&client).await.unwrap_err();
    match err {
        VcdError::Api { status, body, .. } => {
            assert_eq!(status.as_u16(), 403);
            assert!(body.contains("forbidden"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    Ok(())
}

#[test]
async fn test_unreachable_endpoint_is_transport_error() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut site = site_for(&server);
    site.endpoint = "http://127.0.0.1:9".to_string();
    let mut client = VcdClient::with_timeout(&site, std::time::Duration::from_secs(2))?;

    let err = client.login().await.unwrap_err();
    assert!(matches!(err, VcdError::Transport { .. }));
    assert_eq!(err.exit_code(), 1);
    Ok(())
}

#[test]
async fn test_second_login_sends_credential_not_old_bearer() -> Result<()> {
    let server = MockServer::start_async().await;
    let basic = format!(
        "Basic {}",
        general_purpose::STANDARD.encode("administrator:secret")
    );
    let with_credential = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SESSION_PATH)
                .header("Authorization", basic.as_str());
            then.status(200)
                .header("X-VMWARE-VCLOUD-ACCESS-TOKEN", TOKEN);
        })
        .await;
    let with_bearer = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SESSION_PATH)
                .header("Authorization", format!("Bearer {}", TOKEN));
            then.status(200)
                .header("X-VMWARE-VCLOUD-ACCESS-TOKEN", "stale-session");
        })
        .await;

    let mut client = VcdClient::new(&site_for(&server))?;
    client.login().await?;
    client.login().await?;

    with_credential.assert_hits_async(2).await;
    with_bearer.assert_hits_async(0).await;
    assert_eq!(client.token(), Some(TOKEN));
    Ok(())
}

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
async fn test_debug_trace_logs_request_without_credentials() -> Result<()> {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("vcdctl=debug"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/vApp/vapp-1/action/deploy");
            then.status(202).body("<Task/>");
        })
        .await;

    client
        .request(
            Method::POST,
            "/api/vApp/vapp-1/action/deploy",
            &[("Content-Type", "application/vnd.vmware.vcloud.deployVAppParams+xml")],
            Some(b"<DeployVAppParams powerOn=\"true\"/>".to_vec()),
        )
        .await?;

    let out = logs.contents();
    assert!(out.contains("Method: POST"));
    assert!(out.contains("Path: /api/vApp/vapp-1/action/deploy"));
    assert!(out.contains(&format!("Path: {}", SESSION_PATH)));
    assert!(out.contains("content-type: application/vnd.vmware.vcloud.deployVAppParams+xml"));
    assert!(out.contains(r#"Data: <DeployVAppParams powerOn="true"/>"#));
    assert!(out.contains("authorization: <redacted>"));

    assert!(!out.contains(TOKEN));
    assert!(!out.contains(&general_purpose::STANDARD.encode("administrator:secret")));
    assert!(!out.contains("secret"));
    Ok(())
}
