//! End-to-end tests: serve the full application on an ephemeral port and drive it over HTTP.

use cafe_finder::storage::MemoryCafeStore;
use cafe_finder::{transport, ApiDocumentation, ApiKey, CafeService};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

const API_KEY: &str = "fwjMpyXFAYP7H8RhkkAavdFPK9rgfC2Q";

async fn spawn_app() -> Result<(String, Arc<MemoryCafeStore>), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryCafeStore::new());
    let app_state = transport::http::AppState {
        service: Arc::new(CafeService::new(store.clone(), ApiKey::new(API_KEY))),
        documentation: Arc::new(ApiDocumentation::builtin()),
    };
    let app = transport::http::create_app(app_state);

    // Bind to an ephemeral port so tests can run in parallel.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((format!("http://127.0.0.1:{}", port), store))
}

fn cafe_form(name: &str, location: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", name.to_string()),
        ("map_url", "https://g.page/cafe".to_string()),
        ("img_url", "https://images.example/cafe.jpg".to_string()),
        ("location", location.to_string()),
        ("seats", "20-30".to_string()),
        ("has_toilet", "True".to_string()),
        ("has_wifi", "False".to_string()),
        ("has_sockets", "true".to_string()),
        ("can_take_calls", "false".to_string()),
        ("coffee_price", "2.5".to_string()),
    ]
}

async fn add_cafe(
    client: &reqwest::Client,
    base_url: &str,
    form: &[(&str, String)],
) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
    let resp = client
        .post(format!("{}/cafe/add", base_url))
        .form(form)
        .send()
        .await?;
    let status = resp.status();
    Ok((status, resp.json::<Value>().await?))
}

async fn all_cafes(client: &reqwest::Client, base_url: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let resp = client
        .get(format!("{}/cafe/all", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    Ok(resp["cafes"].as_array().cloned().unwrap_or_default())
}

#[tokio::test]
async fn cafe_lifecycle_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _store) = spawn_app().await?;
    let client = reqwest::Client::new();

    let (status, body) = add_cafe(&client, &base_url, &cafe_form("Ground", "Peckham")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["success"], "Successfully added the new cafe.");
    add_cafe(&client, &base_url, &cafe_form("Brew", "Hackney")).await?;

    let cafes = all_cafes(&client, &base_url).await?;
    assert_eq!(cafes.len(), 2);
    let ground = cafes.iter().find(|c| c["name"] == "Ground").unwrap();
    assert_eq!(ground["coffee_price"], "£ 2.50");
    assert_eq!(ground["has_toilet"], true);
    assert_eq!(ground["has_wifi"], false);
    let id = ground["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{}/cafe/search", base_url))
        .query(&[("loc", "Peckham")])
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(resp["cafes"].as_array().unwrap().len(), 1);
    assert_eq!(resp["cafes"][0]["name"], "Ground");

    let resp = client
        .get(format!("{}/cafe/random", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(resp["cafe"]["name"] == "Ground" || resp["cafe"]["name"] == "Brew");

    let resp = client
        .patch(format!("{}/cafe/update-price/{}", base_url, id))
        .query(&[("new_price", "3.5")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await?["success"], "Successfully updated the price.");
    let cafes = all_cafes(&client, &base_url).await?;
    let ground = cafes.iter().find(|c| c["id"] == id).unwrap();
    assert_eq!(ground["coffee_price"], "£ 3.50");

    let resp = client
        .delete(format!("{}/cafe/report-closed/{}", base_url, id))
        .query(&[("api-key", API_KEY)])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await?["success"], "this cafe was successfully deleted.");
    assert_eq!(all_cafes(&client, &base_url).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn add_errors_use_the_envelope_and_never_persist() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, store) = spawn_app().await?;
    let client = reqwest::Client::new();
    add_cafe(&client, &base_url, &cafe_form("Ground", "Peckham")).await?;

    let (status, body) = add_cafe(&client, &base_url, &cafe_form("Ground", "Hackney")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid value");
    assert_eq!(body["message"], "a cafe with the 'name' 'Ground' already exists.");

    let mut form = cafe_form("Brew", "Hackney");
    form.retain(|(k, _)| *k != "location" && *k != "img_url");
    let (status, body) = add_cafe(&client, &base_url, &form).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing parameter");
    assert_eq!(
        body["message"],
        "the parameter(s) 'img_url', 'location' is(are) required to add a new cafe."
    );

    let mut form = cafe_form("Brew", "Hackney");
    form.push(("wifi_password", "hunter2".to_string()));
    let (status, body) = add_cafe(&client, &base_url, &form).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "incorrect parameters");
    assert!(body["message"].as_str().unwrap().contains("'wifi_password'"));

    let mut form = cafe_form("Brew", "Hackney");
    form[5].1 = "sometimes".to_string();
    for _ in 0..2 {
        let (status, body) = add_cafe(&client, &base_url, &form).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "the parameter(s) 'has_toilet' must be boolean.");
    }

    let resp = client
        .post(format!("{}/cafe/add", base_url))
        .json(&serde_json::json!({"name": "Json Cafe"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>().await?["error"], "incorrect parameters");

    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn add_accepts_multipart_form_data() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, store) = spawn_app().await?;
    let client = reqwest::Client::new();

    let form = cafe_form("Multipart Cafe", "Bermondsey")
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, (key, value)| form.text(key, value));
    let resp = client
        .post(format!("{}/cafe/add", base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["response"]["success"], "Successfully added the new cafe.");

    let cafes = all_cafes(&client, &base_url).await?;
    assert_eq!(cafes.len(), 1);
    assert_eq!(cafes[0]["name"], "Multipart Cafe");
    assert_eq!(cafes[0]["has_toilet"], true);
    assert_eq!(cafes[0]["coffee_price"], "£ 2.50");

    // Multipart bodies go through the same checks as urlencoded ones.
    let mut fields = cafe_form("Brew", "Hackney");
    fields.retain(|(key, _)| *key != "seats");
    let form = fields
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, (key, value)| form.text(key, value));
    let resp = client
        .post(format!("{}/cafe/add", base_url))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["error"], "missing parameter");
    assert_eq!(body["message"], "the parameter(s) 'seats' is(are) required to add a new cafe.");

    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn read_errors_and_empty_table() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, _store) = spawn_app().await?;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/cafe/random", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.json::<Value>().await?["error"], "not found");

    let resp = client.get(format!("{}/cafe/all", base_url)).send().await?.json::<Value>().await?;
    assert_eq!(resp["cafes"], serde_json::json!([]));

    add_cafe(&client, &base_url, &cafe_form("Ground", "Peckham")).await?;

    let resp = client.get(format!("{}/cafe/search", base_url)).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["error"], "missing parameter");
    assert_eq!(body["message"], "'loc' parameter is missing");

    let resp = client
        .get(format!("{}/cafe/search", base_url))
        .query(&[("loc", "Nowhere")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(all_cafes(&client, &base_url).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_errors() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, store) = spawn_app().await?;
    let client = reqwest::Client::new();
    add_cafe(&client, &base_url, &cafe_form("Ground", "Peckham")).await?;
    let id = all_cafes(&client, &base_url).await?[0]["id"].as_i64().unwrap();

    let resp = client
        .patch(format!("{}/cafe/update-price/{}", base_url, id))
        .query(&[("new_price", "-1")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<Value>().await?;
    assert_eq!(body["error"], "invalid value");
    assert_eq!(
        body["message"],
        "The parameter 'new_price' must be a positive number, but received '-1' instead."
    );

    let resp = client
        .patch(format!("{}/cafe/update-price/{}", base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .patch(format!("{}/cafe/update-price/4242", base_url))
        .query(&[("new_price", "3")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .patch(format!("{}/cafe/update-price/abc", base_url))
        .query(&[("new_price", "3")])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for target in [id.to_string(), "4242".to_string(), "abc".to_string()] {
        let resp = client
            .delete(format!("{}/cafe/report-closed/{}", base_url, target))
            .query(&[("api-key", "guess")])
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = resp.json::<Value>().await?;
        assert_eq!(body["error"], "unauthorized request");
        assert_eq!(body["message"], "make sure you have the correct api-key.");
    }

    let resp = client
        .delete(format!("{}/cafe/report-closed/4242", base_url))
        .query(&[("api-key", API_KEY)])
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn interactive_pages() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, store) = spawn_app().await?;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let html = client.get(format!("{}/add", base_url)).send().await?.text().await?;
    assert!(html.contains("<form method=\"post\" action=\"/add\">"));

    let mut form = cafe_form("Form Cafe", "Soho");
    form[1].1 = "not-a-link".to_string();
    let resp = client.post(format!("{}/add", base_url)).form(&form).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await?;
    assert!(html.contains("Invalid URL."));
    assert!(html.contains("value=\"Form Cafe\""));
    assert!(store.is_empty().await);

    let resp = client
        .post(format!("{}/add", base_url))
        .form(&cafe_form("Form Cafe", "Soho"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/");
    assert_eq!(store.len().await, 1);

    let html = client.get(&base_url).send().await?.text().await?;
    assert!(html.contains("<th>Cafe Name</th>"));
    assert!(html.contains("<td>Form Cafe</td>"));
    assert!(html.contains("<td>£ 2.50</td>"));

    let html = client
        .get(format!("{}/documentation", base_url))
        .send()
        .await?
        .text()
        .await?;
    assert!(html.contains("/cafe/report-closed/{id}"));

    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), StatusCode::OK);

    let openapi = client
        .get(format!("{}/api-docs/openapi.json", base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(openapi["paths"]["/cafe/search"].is_object());

    Ok(())
}
