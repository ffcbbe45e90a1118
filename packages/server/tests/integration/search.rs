use crate::common::{TestApp, routes};

#[tokio::test]
async fn search_with_photo_flag_includes_locator() {
    let app = TestApp::spawn().await;
    let res = app
        .register_item("Drill", "", Some(("drill.png", b"PNG".to_vec())))
        .await;
    let id = res.id().to_string();

    let found = app
        .post_form(routes::SEARCH, &[("id", id.as_str()), ("has_photo", "on")])
        .await;

    assert_eq!(found.status, 200, "{}", found.text);
    assert_eq!(found.body["inventory_name"], "Drill");
    assert_eq!(found.body["photo_url"], res.body["photo_url"]);
}

#[tokio::test]
async fn search_without_photo_flag_omits_field() {
    let app = TestApp::spawn().await;
    let res = app
        .register_item("Drill", "", Some(("drill.png", b"PNG".to_vec())))
        .await;
    let id = res.id().to_string();

    let found = app.post_form(routes::SEARCH, &[("id", id.as_str())]).await;

    assert_eq!(found.status, 200);
    assert!(found.body.get("photo_url").is_none(), "{}", found.text);
}

#[tokio::test]
async fn search_with_flag_on_item_without_photo_returns_null() {
    let app = TestApp::spawn().await;
    let id = app.create_item("Hammer", "steel").await.to_string();

    let found = app
        .post_form(routes::SEARCH, &[("id", id.as_str()), ("has_photo", "true")])
        .await;

    assert_eq!(found.status, 200);
    assert!(found.body["photo_url"].is_null());
    assert!(found.body.get("photo_url").is_some());
}

#[tokio::test]
async fn search_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    let found = app.post_form(routes::SEARCH, &[("id", "7")]).await;

    assert_eq!(found.status, 404);
    assert_eq!(found.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn search_rejects_non_numeric_id() {
    let app = TestApp::spawn().await;

    for bad in ["", "abc", "-1", "0"] {
        let found = app.post_form(routes::SEARCH, &[("id", bad)]).await;
        assert_eq!(found.status, 400, "id {bad:?}: {}", found.text);
        assert_eq!(found.body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn search_requires_id_field() {
    let app = TestApp::spawn().await;

    let found = app.post_form(routes::SEARCH, &[("has_photo", "on")]).await;

    assert_eq!(found.status, 400);
    assert_eq!(found.body["code"], "VALIDATION_ERROR");
}
