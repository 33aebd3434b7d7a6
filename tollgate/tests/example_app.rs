use hyper::StatusCode;
use serde_json::json;

#[path = "../examples/validated_api.rs"]
mod validated_api;

#[tokio::test]
async fn example_app_end_to_end() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let client = validated_api::create_app().test_client();

    // --- health: no validation ---
    client.get("/health").send().await.assert_ok();

    // --- body coerced, query published through locals ---
    let resp = client
        .post("/users?page=2")
        .json(&json!({ "name": "ann", "age": "31" }))
        .send()
        .await;
    resp.assert_ok();
    resp.assert_json(json!({
        "created": { "name": "ann", "age": 31 },
        "page": { "page": 2 },
    }));

    // --- every bad field reported with the default payload ---
    let resp = client
        .post("/users")
        .json(&json!({ "name": 7, "tags": ["a", 1] }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let keys: Vec<_> = resp.errors().iter().map(|e| e["key"].clone()).collect();
    assert_eq!(keys, vec![json!("name"), json!("age"), json!("tags.1")]);

    // --- custom payload from the bound validator ---
    client
        .get("/users/abc")
        .send()
        .await
        .assert_json(json!({ "code": "VALIDATION_FAILED", "fields": ["id"] }));
    client
        .get("/users/12")
        .send()
        .await
        .assert_json(json!({ "id": 12 }));

    let resp = client.put("/users/12").json(&json!({})).send().await;
    resp.assert_rejected();
    resp.assert_json(json!({ "code": "VALIDATION_FAILED", "fields": ["name"] }));
}
