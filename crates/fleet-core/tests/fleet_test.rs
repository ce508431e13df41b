#![allow(clippy::unwrap_used)]
// End-to-end tests: `Fleet` over a real `FleetClient` against wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleet_core::{CoreError, DesiredState, Fleet, FleetConfig, FleetReportEntry};

async fn setup() -> (MockServer, Fleet) {
    let server = MockServer::start().await;
    let config = FleetConfig::with_endpoint(Url::parse(&server.uri()).unwrap());
    let fleet = Fleet::from_config(&config).unwrap();
    (server, fleet)
}

fn unit_path(name: &str) -> String {
    format!("/fleet/v1/units/{name}")
}

fn definition() -> serde_json::Value {
    json!({
        "Unit": { "Description": "Hello" },
        "Service": { "ExecStart": "/bin/echo hi" }
    })
}

// ── Submit ──────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_sends_translated_payload() {
    let (server, fleet) = setup().await;

    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .and(body_json(json!({
            "name": "hello.service",
            "desiredState": "inactive",
            "options": [
                { "section": "Unit", "name": "Description", "value": "Hello" },
                { "section": "Service", "name": "ExecStart", "value": "/bin/echo hi" }
            ]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    fleet.submit("hello.service", definition()).await.unwrap();
}

#[tokio::test]
async fn submit_with_invalid_name_never_reaches_backend() {
    let (server, fleet) = setup().await;

    let err = fleet
        .submit("hello world.service", definition())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidUnitName { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn double_submit_is_idempotent() {
    let (server, fleet) = setup().await;

    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "code": 409, "message": "unit already exists" }
        })))
        .mount(&server)
        .await;

    fleet.submit("hello.service", definition()).await.unwrap();
    fleet.submit("hello.service", definition()).await.unwrap();

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn submit_propagates_bad_request() {
    let (server, fleet) = setup().await;

    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "invalid unit options" }
        })))
        .mount(&server)
        .await;

    let err = fleet
        .submit("hello.service", definition())
        .await
        .unwrap_err();

    assert!(
        matches!(err, CoreError::Api { status: Some(400), ref message } if message == "invalid unit options"),
        "got {err:?}"
    );
}

// ── Transitions ─────────────────────────────────────────────────────

#[tokio::test]
async fn start_stop_unload_send_exact_bodies() {
    for (verb, state) in [("start", "launched"), ("stop", "loaded"), ("unload", "inactive")] {
        let (server, fleet) = setup().await;

        Mock::given(method("PUT"))
            .and(path(unit_path("web.service")))
            .and(body_json(json!({ "desiredState": state, "name": "web.service" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        match verb {
            "start" => fleet.start("web.service").await.unwrap(),
            "stop" => fleet.stop("web.service").await.unwrap(),
            _ => fleet.unload("web.service").await.unwrap(),
        }

        assert_eq!(server.received_requests().await.unwrap().len(), 1, "{verb}");
    }
}

#[tokio::test]
async fn load_with_definition_creates_then_updates() {
    let (server, fleet) = setup().await;

    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .and(body_json(json!({ "desiredState": "loaded", "name": "hello.service" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(unit_path("hello.service")))
        .respond_with(ResponseTemplate::new(412).set_body_json(json!({
            "error": { "code": 412, "message": "unit already exists" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    fleet
        .load("hello.service", Some(definition()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first: serde_json::Value = requests[0].body_json().unwrap();
    let second: serde_json::Value = requests[1].body_json().unwrap();
    assert_eq!(first["desiredState"], "inactive");
    assert!(first.get("options").is_some());
    assert_eq!(second, json!({ "desiredState": "loaded", "name": "hello.service" }));
}

#[tokio::test]
async fn destroy_deletes_unit() {
    let (server, fleet) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(unit_path("web.service")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    fleet.destroy("web.service").await.unwrap();
}

// ── Status and lookup ───────────────────────────────────────────────

#[tokio::test]
async fn status_reports_current_state() {
    let (server, fleet) = setup().await;

    Mock::given(method("GET"))
        .and(path(unit_path("web.service")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "web.service",
            "desiredState": "launched",
            "currentState": "loaded"
        })))
        .mount(&server)
        .await;

    assert_eq!(fleet.status("web.service").await.unwrap(), DesiredState::Loaded);
}

#[tokio::test]
async fn status_of_missing_unit_is_not_found() {
    let (server, fleet) = setup().await;

    Mock::given(method("GET"))
        .and(path(unit_path("ghost.service")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "unit does not exist" }
        })))
        .mount(&server)
        .await;

    let err = fleet.status("ghost.service").await.unwrap_err();

    assert!(matches!(err, CoreError::UnitNotFound { ref name } if name == "ghost.service"));
}

#[tokio::test]
async fn status_server_error_is_not_not_found() {
    let (server, fleet) = setup().await;

    Mock::given(method("GET"))
        .and(path(unit_path("web.service")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = fleet.status("web.service").await.unwrap_err();

    assert!(!err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn get_unit_state_of_missing_unit_is_not_found() {
    let (server, fleet) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fleet/v1/state"))
        .and(query_param("unitName", "ghost.service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = fleet.get_unit_state("ghost.service").await.unwrap_err();

    assert!(matches!(err, CoreError::UnitNotFound { .. }));
}

// ── Reconciliation ──────────────────────────────────────────────────

#[tokio::test]
async fn list_joins_machines_and_states() {
    let (server, fleet) = setup().await;

    Mock::given(method("GET"))
        .and(path("/fleet/v1/machines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "machines": [{ "id": "m1", "primaryIP": "10.0.0.1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fleet/v1/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "states": [
                {
                    "name": "web.service",
                    "machineID": "m1",
                    "systemdLoadState": "loaded",
                    "systemdActiveState": "active",
                    "systemdSubState": "running"
                },
                { "name": "orphan.service", "machineID": "m7" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = fleet.list().await.unwrap();

    assert_eq!(
        report[0],
        FleetReportEntry {
            name: "web.service".into(),
            load_state: Some("loaded".into()),
            active_state: Some("active".into()),
            sub_state: Some("running".into()),
            machine_id: Some("m1".into()),
            machine_ip: Some("10.0.0.1".into()),
        }
    );
    assert_eq!(report[1].machine_ip, None);

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests.iter().map(|r| r.url.path().to_owned()).collect();
    assert_eq!(order, ["/fleet/v1/machines", "/fleet/v1/state"]);
}
