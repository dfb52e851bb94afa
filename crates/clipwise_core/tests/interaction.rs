use std::path::PathBuf;
use std::sync::Once;

use clipwise_core::{
    update, AppState, CloseOrigin, Effect, MediaUrl, Msg, PlatformCapabilities, ShareOutcome,
    SideEffectAction, SideEffectFailure, SubmissionStatus, COPY_FEEDBACK_DURATION,
};
use pretty_assertions::assert_eq;

const BODY: &str = r#"{
    "video_id": "v1",
    "clips": [
        {"clip_id": "c1", "s3_url": "https://cdn.example.com/c1.mp4?sig=1", "start_time": 0, "end_time": 10,
         "transcript_text": "first clip"},
        {"clip_id": "c2", "s3_url": "https://cdn.example.com/c2.mp4?sig=2", "start_time": 10, "end_time": 20}
    ]
}"#;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(clipwise_logging::initialize_for_tests);
}

fn send(state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    update(state, msg)
}

/// Submits, resolves with [`BODY`] and mounts both clip cards.
fn loaded_state(capabilities: PlatformCapabilities) -> AppState {
    let state = AppState::with_capabilities(capabilities);
    let (state, _) = send(
        state,
        Msg::InputChanged("https://www.youtube.com/watch?v=abc123".to_string()),
    );
    let (state, _) = send(state, Msg::SubmitClicked);
    let (state, _) = send(
        state,
        Msg::SubmissionResolved {
            request_id: 1,
            result: Ok(BODY.to_string()),
        },
    );
    assert_eq!(state.view().status, SubmissionStatus::Succeeded);
    let (state, _) = send(state, mounted("c1"));
    let (state, _) = send(state, mounted("c2"));
    state
}

fn mounted(id: &str) -> Msg {
    Msg::ClipMounted {
        clip_id: id.to_string(),
    }
}

fn c1() -> String {
    "c1".to_string()
}

#[test]
fn toggle_like_twice_restores_value() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    assert!(!state.interaction("c1").unwrap().liked());

    let (state, effects) = send(state, Msg::LikeToggled { clip_id: c1() });
    assert!(effects.is_empty());
    assert!(state.interaction("c1").unwrap().liked());
    assert!(!state.interaction("c2").unwrap().liked());

    let (state, _) = send(state, Msg::LikeToggled { clip_id: c1() });
    assert!(!state.interaction("c1").unwrap().liked());
}

#[test]
fn copy_link_sets_flag_then_reverts_after_delay() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());

    let (state, effects) = send(state, Msg::CopyLinkClicked { clip_id: c1() });
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            clip_id: c1(),
            text: MediaUrl::new("https://cdn.example.com/c1.mp4?sig=1"),
        }]
    );
    assert!(!state.interaction("c1").unwrap().link_copied());

    let (state, effects) = send(
        state,
        Msg::ClipboardWritten {
            clip_id: c1(),
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ScheduleCopyReset {
            clip_id: c1(),
            generation: 1,
            after: COPY_FEEDBACK_DURATION,
        }]
    );
    assert_eq!(COPY_FEEDBACK_DURATION.as_millis(), 2000);
    assert!(state.interaction("c1").unwrap().link_copied());
    assert!(!state.interaction("c2").unwrap().link_copied());

    let (state, _) = send(
        state,
        Msg::CopyFeedbackExpired {
            clip_id: c1(),
            generation: 1,
        },
    );
    assert!(!state.interaction("c1").unwrap().link_copied());
}

#[test]
fn second_copy_outlives_first_timer() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let written = || Msg::ClipboardWritten {
        clip_id: c1(),
        result: Ok(()),
    };

    let (state, _) = send(state, written());
    let (state, effects) = send(state, written());
    assert!(matches!(
        &effects[..],
        [Effect::ScheduleCopyReset { generation: 2, .. }]
    ));

    let (state, _) = send(
        state,
        Msg::CopyFeedbackExpired {
            clip_id: c1(),
            generation: 1,
        },
    );
    assert!(state.interaction("c1").unwrap().link_copied());
}

#[test]
fn clipboard_failure_is_silent_to_the_session() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let before = state.view();

    let failure = SideEffectFailure::new(SideEffectAction::Clipboard, "no display");
    let (state, effects) = send(
        state,
        Msg::ClipboardWritten {
            clip_id: c1(),
            result: Err(failure.clone()),
        },
    );

    assert!(effects.is_empty());
    let after = state.view();
    assert_eq!(after.status, before.status);
    assert_eq!(after.error_message, None);
    assert_eq!(after.clips, before.clips);
    assert_eq!(after.diagnostics, vec!["c1: copy to clipboard failed: no display"]);
    let diagnostic = state.diagnostics().next().unwrap();
    assert_eq!(diagnostic.failure, failure);
}

#[test]
fn preview_opens_and_closes_only_from_outside_surface() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());

    let (state, effects) = send(state, Msg::PreviewOpened { clip_id: c1() });
    assert!(effects.is_empty());
    assert!(state.interaction("c1").unwrap().preview_open());

    let (mut state, _) = send(
        state,
        Msg::PreviewCloseRequested {
            clip_id: c1(),
            origin: CloseOrigin::Surface,
        },
    );
    assert!(state.interaction("c1").unwrap().preview_open());
    state.consume_dirty();

    for origin in [
        CloseOrigin::CloseButton,
        CloseOrigin::DismissKey,
        CloseOrigin::Backdrop,
    ] {
        let (next, _) = send(state, Msg::PreviewOpened { clip_id: c1() });
        let (next, _) = send(
            next,
            Msg::PreviewCloseRequested {
                clip_id: c1(),
                origin,
            },
        );
        assert!(!next.interaction("c1").unwrap().preview_open(), "{origin:?}");
        state = next;
    }
}

#[test]
fn download_runs_once_and_always_clears_flag() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());

    let (state, effects) = send(state, Msg::DownloadClicked { clip_id: c1() });
    assert_eq!(
        effects,
        vec![Effect::DownloadClip {
            clip_id: c1(),
            media_url: MediaUrl::new("https://cdn.example.com/c1.mp4?sig=1"),
        }]
    );
    assert!(state.interaction("c1").unwrap().downloading());

    let (state, effects) = send(state, Msg::DownloadClicked { clip_id: c1() });
    assert!(effects.is_empty());

    let (state, _) = send(
        state,
        Msg::DownloadFinished {
            clip_id: c1(),
            result: Err(SideEffectFailure::new(
                SideEffectAction::Download,
                "http status 403",
            )),
        },
    );
    let view = state.view();
    assert!(!state.interaction("c1").unwrap().downloading());
    assert_eq!(view.status, SubmissionStatus::Succeeded);
    assert_eq!(view.clips.len(), 2);
    assert_eq!(view.diagnostics.len(), 1);

    let (state, effects) = send(state, Msg::DownloadClicked { clip_id: c1() });
    assert_eq!(effects.len(), 1);
    let (state, _) = send(
        state,
        Msg::DownloadFinished {
            clip_id: c1(),
            result: Ok(PathBuf::from("downloads/c1.mp4")),
        },
    );
    assert!(!state.interaction("c1").unwrap().downloading());
    assert_eq!(state.view().diagnostics.len(), 1);
}

#[test]
fn share_uses_native_sheet_when_available() {
    init_logging();
    let state = loaded_state(PlatformCapabilities { native_share: true });

    let (state, effects) = send(state, Msg::ShareClicked { clip_id: c1() });
    let [Effect::ShareClip { clip_id, payload }] = &effects[..] else {
        panic!("expected share effect, got {effects:?}");
    };
    assert_eq!(clip_id, "c1");
    assert_eq!(payload.url, MediaUrl::new("https://cdn.example.com/c1.mp4?sig=1"));
    assert_eq!(payload.text, "first clip");

    let (state, _) = send(
        state,
        Msg::ShareFinished {
            clip_id: c1(),
            result: Ok(ShareOutcome::Cancelled),
        },
    );
    assert!(state.view().diagnostics.is_empty());
}

#[test]
fn share_falls_back_to_copy_link() {
    init_logging();
    let state = loaded_state(PlatformCapabilities { native_share: false });

    let (_state, effects) = send(state, Msg::ShareClicked { clip_id: c1() });
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            clip_id: c1(),
            text: MediaUrl::new("https://cdn.example.com/c1.mp4?sig=1"),
        }]
    );
}

#[test]
fn unmounted_clips_ignore_interactions() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let (state, _) = send(state, Msg::ClipUnmounted { clip_id: c1() });
    assert_eq!(state.interaction("c1"), None);

    let (state, effects) = send(state, Msg::DownloadClicked { clip_id: c1() });
    assert!(effects.is_empty());
    let (state, effects) = send(state, Msg::CopyLinkClicked { clip_id: c1() });
    assert!(effects.is_empty());
    let (state, _) = send(state, Msg::LikeToggled { clip_id: c1() });
    assert_eq!(state.interaction("c1"), None);

    // Remounting starts from fresh state.
    let (state, _) = send(state, mounted("c1"));
    assert_eq!(state.interaction("c1").copied(), Some(Default::default()));
}

#[test]
fn unknown_clip_ids_cannot_be_mounted() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let (state, _) = send(state, mounted("ghost"));
    assert_eq!(state.interaction("ghost"), None);
    assert_eq!(state.mounted_count(), 2);
}

#[test]
fn new_submission_discards_interaction_state() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let (state, _) = send(state, Msg::LikeToggled { clip_id: c1() });
    let (state, _) = send(state, Msg::InputChanged("https://youtu.be/next".to_string()));
    let (state, _) = send(state, Msg::SubmitClicked);

    assert_eq!(state.mounted_count(), 0);
    assert_eq!(state.interaction("c1"), None);

    // A download finishing after its card went away only reaches diagnostics.
    let (state, _) = send(
        state,
        Msg::DownloadFinished {
            clip_id: c1(),
            result: Err(SideEffectFailure::new(SideEffectAction::Download, "gone")),
        },
    );
    assert_eq!(state.view().status, SubmissionStatus::Pending);
    assert_eq!(state.view().diagnostics.len(), 1);
}

#[test]
fn reset_discards_interaction_state() {
    init_logging();
    let state = loaded_state(PlatformCapabilities::default());
    let (state, _) = send(state, Msg::ResetClicked);
    assert_eq!(state.mounted_count(), 0);
    assert!(state.view().clips.is_empty());
}
