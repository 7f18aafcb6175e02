use super::*;

#[test]
fn wrong_secret_display() {
    let err = RelayError::WrongSecret;
    assert_eq!(err.to_string(), "wrong secret");
    assert_eq!(err.reply(), "wrong secret");
    assert!(err.is_rejection());
}

#[test]
fn visibility_reply_quotes_value() {
    let err = RelayError::Visibility("followers".into());
    assert_eq!(err.reply(), "post visibility: \"followers\"");
}

#[test]
fn local_only_reply() {
    assert_eq!(
        RelayError::LocalOnly.reply(),
        "post visibility: \"local only\""
    );
}

#[test]
fn invalid_payload_hides_parser_detail() {
    let err = RelayError::InvalidPayload("missing field `body` at line 1".into());
    assert!(err.to_string().contains("missing field"));
    assert_eq!(err.reply(), "invalid payload");
}

#[test]
fn upload_failure_is_not_rejection() {
    let err = RelayError::Upload("connection refused".into());
    assert_eq!(err.reply(), "error while uploading media");
    assert!(!err.is_rejection());
}

#[test]
fn publish_failure_display() {
    let err = RelayError::Publish {
        status: 429,
        body: None,
    };
    assert_eq!(err.to_string(), "publish failed with status 429");
    assert_eq!(err.reply(), "error while tweeting");
}

#[test]
fn internal_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("something broke");
    let err: RelayError = anyhow_err.into();
    assert!(matches!(err, RelayError::Internal(_)));
    assert_eq!(err.reply(), "internal error");
    assert!(!err.is_rejection());
}

#[test]
fn publish_request_failure_reply() {
    let err = RelayError::PublishRequest("timed out".into());
    assert_eq!(err.to_string(), "publish request failed: timed out");
    assert_eq!(err.reply(), "error while tweeting");
}
