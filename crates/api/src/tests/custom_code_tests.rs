use designer_ext_core::{
    CodeApplication, ScriptData, ScriptLocation, ScriptRegistrationRequest, TargetType,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{ApiClient, ClientConfig};
use crate::error::ApiError;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

#[tokio::test]
async fn test_get_scripts_unwraps_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/register"))
        .and(query_param("siteId", "site-1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": [
                { "id": "s1", "displayName": "Script1", "version": "1.0.0" },
                { "id": "s2", "displayName": "Script2", "version": "1.0.0",
                  "hostedLocation": "https://cdn.example.com/s2.js" }
            ]
        })))
        .mount(&server)
        .await;

    let scripts = client_for(&server).get_scripts("site-1", "tok").await.unwrap();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[1].hosted_location.as_deref(), Some("https://cdn.example.com/s2.js"));
}

#[tokio::test]
async fn test_missing_result_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let scripts = client_for(&server).get_scripts("site-1", "tok").await.unwrap();
    assert!(scripts.is_empty());
}

#[tokio::test]
async fn test_register_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom-code/register"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(serde_json::json!({
            "siteId": "site-1",
            "isHosted": false,
            "scriptData": {
                "displayName": "Script7",
                "version": "1.0.0",
                "sourceCode": "alert(1)"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "id": "new-id", "displayName": "Script7", "version": "1.0.0" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ScriptRegistrationRequest {
        site_id: "site-1".to_owned(),
        is_hosted: false,
        script_data: ScriptData::new(
            "Script7".to_owned(),
            "1.0.0".to_owned(),
            "alert(1)".to_owned(),
            false,
        ),
    };
    let registered = client_for(&server).register_script(&request, "tok").await.unwrap();
    assert_eq!(registered.map(|s| s.id), Some("new-id".to_owned()));
}

#[tokio::test]
async fn test_register_without_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom-code/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let request = ScriptRegistrationRequest {
        site_id: "site-1".to_owned(),
        is_hosted: true,
        script_data: ScriptData::new(
            "Script8".to_owned(),
            "1.0.0".to_owned(),
            "https://cdn.example.com/a.js".to_owned(),
            true,
        ),
    };
    let registered = client_for(&server).register_script(&request, "tok").await.unwrap();
    assert!(registered.is_none());
}

#[tokio::test]
async fn test_apply_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom-code/apply"))
        .and(body_json(serde_json::json!({
            "scriptId": "s1",
            "targetType": "site",
            "targetId": "site-1",
            "location": "header"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let application = CodeApplication {
        script_id: "s1".to_owned(),
        target_type: TargetType::Site,
        target_id: "site-1".to_owned(),
        location: ScriptLocation::Header,
    };
    client_for(&server).apply_script(&application, "tok").await.unwrap();
}

#[tokio::test]
async fn test_apply_surfaces_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom-code/apply"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let application = CodeApplication {
        script_id: "s1".to_owned(),
        target_type: TargetType::Page,
        target_id: "p1".to_owned(),
        location: ScriptLocation::Footer,
    };
    let err = client_for(&server).apply_script(&application, "tok").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Unauthorized"));
}

#[tokio::test]
async fn test_pages_status_joins_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .and(query_param("targetType", "page"))
        .and(query_param("targetIds", "p1,p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": {
                "p1": { "s1": { "location": "footer" } },
                "p2": {}
            }
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).get_pages_status(&ids(&["p1", "p2"]), "tok").await.unwrap();
    assert_eq!(status.len(), 2);
    assert_eq!(status["p1"]["s1"].location, Some(ScriptLocation::Footer));
    assert!(status["p2"].is_empty());
}

#[tokio::test]
async fn test_malformed_status_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_site_status("site-1", "tok").await.unwrap_err();
    assert!(matches!(err, ApiError::JsonParse { .. }));
    assert_eq!(err.kind(), "malformed_response");
}

#[tokio::test]
async fn test_batch_status_rejects_invalid_site_without_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_batch_status("", &[], "tok").await.is_empty());
    assert!(client.get_batch_status("page", &ids(&["p1"]), "tok").await.is_empty());
}

#[tokio::test]
async fn test_batch_status_merges_site_and_page_batches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .and(query_param("targetType", "site"))
        .and(query_param("targetId", "site-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "site-1": { "s1": { "location": "header" } } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .and(query_param("targetType", "page"))
        .and(query_param("targetIds", "p1,p2,p3,p4,p5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "p1": {}, "p5": { "s2": {} } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .and(query_param("targetType", "page"))
        .and(query_param("targetIds", "p6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "p6": {} }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pages = ids(&["p1", "p2", "p3", "p4", "p5", "p6"]);
    let status = client_for(&server).get_batch_status("site-1", &pages, "tok").await;
    assert!(status.contains_key("site-1"));
    assert!(status.contains_key("p1"));
    assert!(status["p5"].contains_key("s2"));
    assert!(status.contains_key("p6"));
}

#[tokio::test]
async fn test_batch_status_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/custom-code/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let status = client_for(&server).get_batch_status("site-1", &[], "tok").await;
    assert!(status.is_empty());
}
