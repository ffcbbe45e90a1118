use crate::common::{TestApp, routes};

#[tokio::test]
async fn unknown_upload_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::upload("1718044800123.png")).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn hidden_upload_name_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::upload(".inventory.json")).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn encoded_traversal_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::upload("..%2Fdata%2Finventory.json")).await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn forms_are_served_as_html() {
    let app = TestApp::spawn().await;

    for (path, action) in [
        (routes::REGISTER_FORM, "action=\"/api/v1/inventory\""),
        (routes::SEARCH_FORM, "action=\"/api/v1/search\""),
    ] {
        let (status, content_type, bytes) = app.get_bytes(&app.url(path)).await;
        assert_eq!(status, 200);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(String::from_utf8(bytes).unwrap().contains(action));
    }
}

#[tokio::test]
async fn openapi_document_lists_inventory_paths() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        "/api/v1/inventory",
        "/api/v1/inventory/{id}",
        "/api/v1/inventory/{id}/photo",
        "/api/v1/search",
        "/uploads/{storage_ref}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
