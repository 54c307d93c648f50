use completion_api::error::parse_error_message;
use pretty_assertions::assert_eq;

#[test]
fn parse_error_message_prefers_error_string() {
    let message = parse_error_message(502, r#"{"error":"upstream unavailable","message":"x"}"#);
    assert_eq!(message, "upstream unavailable");
}

#[test]
fn parse_error_message_reads_error_object_message_then_code() {
    assert_eq!(
        parse_error_message(400, r#"{"error":{"code":"bad_request","message":"invalid model"}}"#),
        "invalid model"
    );
    assert_eq!(
        parse_error_message(429, r#"{"error":{"code":"rate_limited"}}"#),
        "rate_limited"
    );
}

#[test]
fn parse_error_message_falls_back_to_top_level_message() {
    assert_eq!(
        parse_error_message(401, r#"{"message":"token expired"}"#),
        "token expired"
    );
}

#[test]
fn parse_error_message_falls_back_to_reason_phrase() {
    assert_eq!(parse_error_message(500, ""), "Internal Server Error");
    assert_eq!(
        parse_error_message(503, "<html>maintenance</html>"),
        "Service Unavailable"
    );
    assert_eq!(parse_error_message(599, r#"{"error":""}"#), "request failed");
}
