use assert_matches::assert_matches;
use completion_api::url::{DEFAULT_CHAT_PATH, DEFAULT_ORIGIN};
use completion_api::{resolve_endpoint, CompletionApiError};

#[test]
fn absent_api_url_resolves_to_same_origin_default_path() {
    let endpoint = resolve_endpoint(None, "https://miniapp.example").expect("endpoint");
    assert_eq!(endpoint.as_str(), "https://miniapp.example/api/gpt/chat");
}

#[test]
fn blank_api_url_and_blank_origin_use_defaults() {
    let endpoint = resolve_endpoint(Some("   "), "").expect("endpoint");
    assert_eq!(endpoint.as_str(), format!("{DEFAULT_ORIGIN}{DEFAULT_CHAT_PATH}"));
}

#[test]
fn absolute_api_url_is_used_unchanged() {
    let endpoint =
        resolve_endpoint(Some("https://api.example/v1/chat"), DEFAULT_ORIGIN).expect("endpoint");
    assert_eq!(endpoint.as_str(), "https://api.example/v1/chat");
}

#[test]
fn relative_api_url_joins_onto_origin() {
    let endpoint =
        resolve_endpoint(Some("/proxy/chat"), "http://localhost:3000/app/").expect("endpoint");
    assert_eq!(endpoint.as_str(), "http://localhost:3000/proxy/chat");
}

#[test]
fn invalid_origin_is_reported() {
    assert_matches!(
        resolve_endpoint(None, "not a url"),
        Err(CompletionApiError::InvalidEndpoint(_))
    );
}
