use axum::response::Html;

const REGISTER_FORM: &str = include_str!("../../static/RegisterForm.html");
const SEARCH_FORM: &str = include_str!("../../static/SearchForm.html");

pub async fn register_form() -> Html<&'static str> {
    Html(REGISTER_FORM)
}

pub async fn search_form() -> Html<&'static str> {
    Html(SEARCH_FORM)
}
