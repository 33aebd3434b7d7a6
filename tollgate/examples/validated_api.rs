//! A small user API guarded by schemas.
//!
//! Runs a few requests through the router in-process and prints the results:
//!
//! ```sh
//! cargo run --example validated_api --features full,test
//! ```

use serde_json::{Value, json};
use tollgate::hyper::Method;
use tollgate::schema::{SchemaExt, array, number_from_string, object, optional, string};
use tollgate::{
    Issue, Json, RequestContext, ResponseContext, Router, Schemas, Validator, format_issues,
    plain, validate,
};

async fn create_user(req: RequestContext, res: ResponseContext) -> Json<Value> {
    Json(json!({
        "created": req.body,
        "page": res.locals.typed_query,
    }))
}

async fn show_user(req: RequestContext, _res: ResponseContext) -> Json<Value> {
    Json(json!({ "id": req.params["id"] }))
}

async fn health(_req: RequestContext, _res: ResponseContext) -> &'static str {
    "ok"
}

pub fn create_app() -> Router {
    let user = object([
        ("name", string()),
        ("age", number_from_string()),
        ("tags", optional(array(string()))),
    ]);
    let id = object([("id", number_from_string())]);

    let strict = Validator::with_error_handler(|issues: &[Issue]| {
        json!({
            "code": "VALIDATION_FAILED",
            "fields": format_issues(issues).into_iter().map(|e| e.key).collect::<Vec<_>>(),
        })
    });

    let mut router = Router::new();
    router.get("/health", plain(health));
    router.post(
        "/users",
        validate(
            Schemas::new()
                .query(object([("page", optional(number_from_string()))]))
                .body(user),
            create_user,
        ),
    );
    router.get("/users/{id}", strict.validate_params(Some(id.shared()), show_user));
    router.validated_route(
        Method::PUT,
        "/users/{id}",
        &strict,
        Schemas::new()
            .params(object([("id", number_from_string())]))
            .body(object([("name", string())])),
        show_user,
    );
    router
}

#[allow(dead_code)]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let client = create_app().test_client();

    let resp = client
        .post("/users?page=2")
        .json(&json!({ "name": "ann", "age": "31" }))
        .send()
        .await;
    println!("{} {}", resp.status(), resp.text());

    let resp = client
        .post("/users")
        .json(&json!({ "name": 7, "tags": ["a", 1] }))
        .send()
        .await;
    println!("{} {}", resp.status(), resp.text());

    let resp = client.get("/users/abc").send().await;
    println!("{} {}", resp.status(), resp.text());
}
