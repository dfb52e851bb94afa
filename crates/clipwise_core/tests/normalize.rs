use clipwise_core::{normalize_response, normalize_text, NormalizeError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn full_clip(id: &str, start: f64, end: f64) -> Value {
    json!({
        "clip_id": id,
        "s3_url": format!("https://clipwise-v1.s3.amazonaws.com/clips/{id}/{id}.mp4?X-Amz-Signature=sig"),
        "start_time": start,
        "end_time": end,
        "duration": end - start,
        "interest_score": 7,
        "interest_reasons": ["question", "keyword: wow", "emotion", "exclamation"],
        "transcript_text": "So what happens next?",
        "file_size_formatted": "3.2MB",
        "resolution": "1280x720",
        "expires_at": "2030-01-01T00:00:00"
    })
}

#[test]
fn wrapped_and_unwrapped_payloads_normalize_identically() {
    clipwise_logging::initialize_for_tests();
    let payload = json!({
        "video_id": "v1",
        "clips": [full_clip("c1", 0.0, 12.0), full_clip("c2", 30.0, 55.5)]
    });
    let wrapped = json!({ "body": payload.to_string() });
    let enveloped = json!({ "statusCode": 200, "body": payload.to_string() });

    let direct = normalize_response(&payload).expect("direct");
    assert_eq!(normalize_response(&wrapped).expect("wrapped"), direct);
    assert_eq!(normalize_response(&enveloped).expect("enveloped"), direct);

    assert_eq!(direct.session_id, "v1");
    assert_eq!(direct.dropped, 0);
    let ids: Vec<_> = direct.clips.iter().map(|clip| clip.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
}

#[test]
fn clip_fields_are_mapped() {
    let payload = json!({ "video_id": "v1", "clips": [full_clip("c1", 4.0, 19.0)] });
    let clip = normalize_response(&payload).unwrap().clips.remove(0);

    assert_eq!(clip.id, "c1");
    assert!(clip.media_url.as_str().ends_with("X-Amz-Signature=sig"));
    assert_eq!(clip.start_offset, 4.0);
    assert_eq!(clip.end_offset, 19.0);
    assert_eq!(clip.duration, 15.0);
    assert_eq!(clip.interest_score, 7.0);
    assert_eq!(clip.interest_reasons.len(), 4);
    assert_eq!(clip.top_reasons().len(), 3);
    assert_eq!(clip.transcript_excerpt, "So what happens next?");
    assert_eq!(clip.file_size_label, "3.2MB");
    assert_eq!(clip.resolution_label, "1280x720");
    assert_eq!(
        clip.expires_at.map(|at| at.to_rfc3339()),
        Some("2030-01-01T00:00:00+00:00".to_string())
    );
}

#[test]
fn clip_missing_start_time_is_dropped_but_batch_survives() {
    let mut broken = full_clip("broken", 0.0, 5.0);
    broken.as_object_mut().unwrap().remove("start_time");
    let payload = json!({ "video_id": "v1", "clips": [broken, full_clip("ok", 5.0, 10.0)] });

    let normalized = normalize_response(&payload).unwrap();
    assert_eq!(normalized.clips.len(), 1);
    assert_eq!(normalized.clips[0].id, "ok");
    assert_eq!(normalized.dropped, 1);
}

#[test]
fn non_object_clips_and_missing_urls_are_dropped() {
    let mut no_url = full_clip("no_url", 0.0, 5.0);
    no_url.as_object_mut().unwrap().remove("s3_url");
    let payload = json!({ "clips": [42, "c1", no_url, full_clip("ok", 1.0, 2.0)] });

    let normalized = normalize_response(&payload).unwrap();
    assert_eq!(normalized.clips.len(), 1);
    assert_eq!(normalized.dropped, 3);
}

#[test]
fn missing_fields_default() {
    let normalized = normalize_response(&json!({})).unwrap();
    assert_eq!(normalized.session_id, "");
    assert!(normalized.clips.is_empty());

    let no_segments = json!({
        "statusCode": 200,
        "body": "{\"message\": \"No interesting segments found.\"}"
    });
    let normalized = normalize_response(&no_segments).unwrap();
    assert!(normalized.clips.is_empty());

    let alternate_key = normalize_response(&json!({ "sessionId": "s9", "clips": null })).unwrap();
    assert_eq!(alternate_key.session_id, "s9");
}

#[test]
fn invalid_nested_body_is_malformed() {
    let err = normalize_response(&json!({ "body": "{not json" })).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidEnvelope(_)));
}

#[test]
fn non_object_payloads_are_malformed() {
    assert_eq!(
        normalize_response(&json!([1, 2])).unwrap_err(),
        NormalizeError::NotAnObject("an array")
    );
    assert_eq!(
        normalize_response(&json!({ "body": "[]" })).unwrap_err(),
        NormalizeError::NotAnObject("an array")
    );
    assert_eq!(
        normalize_response(&json!({ "clips": {"c1": {}} })).unwrap_err(),
        NormalizeError::ClipsNotAList
    );
    assert!(matches!(
        normalize_text("definitely not json").unwrap_err(),
        NormalizeError::InvalidJson(_)
    ));
}

#[test]
fn envelope_errors_become_rejections() {
    let rejected = json!({
        "statusCode": 400,
        "body": "{\"error\": \"Missing youtube_url in event.\"}"
    });
    assert_eq!(
        normalize_response(&rejected).unwrap_err(),
        NormalizeError::Rejected {
            status: 400,
            message: "Missing youtube_url in event.".to_string()
        }
    );

    let bare = json!({ "statusCode": 503 });
    assert_eq!(
        normalize_response(&bare).unwrap_err(),
        NormalizeError::Rejected {
            status: 503,
            message: "no details provided".to_string()
        }
    );
}

#[test]
fn interest_points_keep_their_order() {
    let mut low = full_clip("low", 0.0, 5.0);
    low["interest_score"] = json!(1);
    let mut high = full_clip("high", 5.0, 10.0);
    high["interest_score"] = json!(5);
    let normalized = normalize_response(&json!({ "clips": [low, high] })).unwrap();

    assert_eq!(normalized.clips[0].score_label(), "1%");
    assert_eq!(normalized.clips[1].score_label(), "5%");
    assert!(normalized.clips[0].interest_score < normalized.clips[1].interest_score);
}
