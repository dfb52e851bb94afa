use chrono::{DateTime, Utc};
use clipwise_core::{AppViewModel, ClipCardView, SubmissionStatus};

/// Text lines for the current view. Clip numbers are 1-based and match the
/// indices the commands accept.
pub fn render(view: &AppViewModel, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::new();

    let status = match view.status {
        SubmissionStatus::Idle => "Ready",
        SubmissionStatus::Pending => "Processing video...",
        SubmissionStatus::Succeeded => "Done",
        SubmissionStatus::Failed => "Failed",
    };
    match &view.session_id {
        Some(session_id) => lines.push(format!("[{status}] session {session_id}")),
        None => lines.push(format!("[{status}]")),
    }

    if !view.input.is_empty() {
        lines.push(format!("Link: {}", view.input));
    }
    if let Some(input_error) = &view.input_error {
        lines.push(format!("! {input_error}"));
    }
    if let Some(error_message) = &view.error_message {
        lines.push(format!("! {error_message} (type `reset` to dismiss)"));
    }

    if view.status == SubmissionStatus::Succeeded && view.clips.is_empty() {
        lines.push("No interesting segments found.".to_string());
    }
    for (index, card) in view.clips.iter().enumerate() {
        render_card(&mut lines, index + 1, card, now);
    }

    if !view.diagnostics.is_empty() {
        lines.push("Recent problems:".to_string());
        lines.extend(view.diagnostics.iter().map(|d| format!("  - {d}")));
    }
    lines
}

fn render_card(lines: &mut Vec<String>, number: usize, card: &ClipCardView, now: DateTime<Utc>) {
    let mut header = format!(
        "{number}. {}  ({})  score {}",
        card.time_range, card.duration, card.score
    );
    if let Some(interaction) = &card.interaction {
        let mut flags = Vec::new();
        if interaction.liked() {
            flags.push("liked");
        }
        if interaction.link_copied() {
            flags.push("link copied");
        }
        if interaction.downloading() {
            flags.push("downloading");
        }
        if interaction.preview_open() {
            flags.push("preview open");
        }
        if !flags.is_empty() {
            header.push_str(&format!("  [{}]", flags.join(", ")));
        }
    }
    lines.push(header);

    if !card.reasons.is_empty() {
        lines.push(format!("   why: {}", card.reasons.join("; ")));
    }
    if !card.transcript_preview.is_empty() {
        lines.push(format!("   \"{}\"", card.transcript_preview));
    }

    let mut details = Vec::new();
    if !card.file_size.is_empty() {
        details.push(card.file_size.clone());
    }
    if !card.resolution.is_empty() {
        details.push(card.resolution.clone());
    }
    if let Some(expires_at) = card.expires_at {
        details.push(expiry_label(expires_at, now));
    }
    if !details.is_empty() {
        lines.push(format!("   {}", details.join(" | ")));
    }
}

fn expiry_label(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expires_at - now;
    if remaining.num_seconds() <= 0 {
        return "link expired".to_string();
    }
    let minutes = remaining.num_minutes();
    if minutes >= 60 {
        format!("link expires in {}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("link expires in {}m", minutes.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn card() -> ClipCardView {
        ClipCardView {
            clip_id: "abc_1".to_string(),
            time_range: "0:10 - 0:40".to_string(),
            duration: "30.0s".to_string(),
            score: "85%".to_string(),
            reasons: vec!["Laughter".to_string(), "Topic shift".to_string()],
            transcript_preview: "so then he said".to_string(),
            file_size: "2.1 MB".to_string(),
            resolution: "1280x720".to_string(),
            expires_at: Some(now() + Duration::minutes(90)),
            interaction: None,
        }
    }

    #[test]
    fn idle_view_is_one_line() {
        assert_eq!(render(&AppViewModel::default(), now()), vec!["[Ready]"]);
    }

    #[test]
    fn clip_card_lines() {
        let view = AppViewModel {
            status: SubmissionStatus::Succeeded,
            session_id: Some("abc".to_string()),
            clips: vec![card()],
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view, now()),
            vec![
                "[Done] session abc",
                "1. 0:10 - 0:40  (30.0s)  score 85%",
                "   why: Laughter; Topic shift",
                "   \"so then he said\"",
                "   2.1 MB | 1280x720 | link expires in 1h 30m",
            ]
        );
    }

    #[test]
    fn empty_success_says_so() {
        let view = AppViewModel {
            status: SubmissionStatus::Succeeded,
            ..AppViewModel::default()
        };
        assert!(render(&view, now())
            .iter()
            .any(|line| line == "No interesting segments found."));
    }

    #[test]
    fn expired_links_are_flagged() {
        assert_eq!(
            expiry_label(now() - Duration::seconds(1), now()),
            "link expired"
        );
        assert_eq!(
            expiry_label(now() + Duration::seconds(20), now()),
            "link expires in 1m"
        );
    }
}
