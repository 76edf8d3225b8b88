//! Plain-text rendering of clips and sync state.

use std::fmt::Write;

use chrono::{Local, TimeZone};
use sc_app::usecases::SyncStatus;
use sc_core::{Clip, ClipId, ConnectedPeer};

const PREVIEW_CHARS: usize = 60;

/// Local wall-clock time of a millisecond timestamp, as `HH:MM`.
pub fn clock_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

/// Remaining lifetime of an ephemeral clip, rounded up to whole seconds.
pub fn countdown(expires_at: i64, now_ms: i64) -> String {
    let remaining = (expires_at - now_ms).max(0);
    format!("{}s", (remaining + 999) / 1000)
}

/// Numbered history, newest first.
pub fn render_list(clips: &[Clip], selected: Option<&ClipId>, now_ms: i64) -> String {
    if clips.is_empty() {
        return "No clips yet. Copy something!\n".to_string();
    }

    let mut out = String::new();
    for (index, clip) in clips.iter().enumerate() {
        let marker = if Some(&clip.id) == selected { '>' } else { ' ' };
        let star = if clip.is_favorite { '*' } else { ' ' };
        let _ = write!(
            out,
            "{marker}{:>3}. {star} [{}] {}  ({}, {}",
            index + 1,
            clip.kind,
            clip.preview(PREVIEW_CHARS),
            clip.device_name,
            clock_time(clip.timestamp),
        );
        if let Some(expires_at) = clip.expires_at {
            let _ = write!(out, ", expires in {}", countdown(expires_at, now_ms));
        }
        out.push_str(")\n");
        if let Some(summary) = clip.distinct_summary() {
            let _ = writeln!(out, "         {summary}");
        }
    }
    out
}

/// Full view of one clip.
pub fn render_clip(clip: &Clip, now_ms: i64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:      {}", clip.id);
    let _ = writeln!(out, "type:    {}", clip.kind);
    let _ = writeln!(
        out,
        "from:    {} at {}",
        clip.device_name,
        clock_time(clip.timestamp)
    );
    if let Some(summary) = clip.distinct_summary() {
        let _ = writeln!(out, "summary: {summary}");
    }
    if !clip.tags.is_empty() {
        let tags: Vec<String> = clip.tags.iter().map(|tag| format!("#{tag}")).collect();
        let _ = writeln!(out, "tags:    {}", tags.join(" "));
    }
    if clip.is_favorite {
        out.push_str("favorite\n");
    }
    if let Some(expires_at) = clip.expires_at {
        let _ = writeln!(out, "expires in {}", countdown(expires_at, now_ms));
    }
    out.push('\n');
    if clip.kind.is_image() {
        let _ = writeln!(out, "{}", clip.preview(PREVIEW_CHARS));
    } else {
        let _ = writeln!(out, "{}", clip.content);
    }
    out
}

pub fn render_status(status: &SyncStatus, ephemeral_armed: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} on {} ({} peer{})",
        status.label(),
        status.device_name,
        status.peers.len(),
        if status.peers.len() == 1 { "" } else { "s" }
    );
    match &status.device_id {
        Some(id) => {
            let _ = writeln!(out, "device id: {id}");
        }
        None => out.push_str("networking is off\n"),
    }
    if ephemeral_armed {
        out.push_str("next clip self-destructs\n");
    }
    out
}

pub fn render_peers(peers: &[ConnectedPeer]) -> String {
    if peers.is_empty() {
        return "No connected devices.\n".to_string();
    }
    let mut out = String::new();
    for peer in peers {
        let direction = if peer.inbound { "in" } else { "out" };
        let _ = writeln!(
            out,
            "{}  {}  [{direction}] since {}",
            peer.peer_id,
            peer.address,
            peer.connected_at.with_timezone(&Local).format("%H:%M"),
        );
    }
    out
}

pub fn render_share_links(links: &[String]) -> String {
    if links.is_empty() {
        return "No share link yet; the network is not listening.\n".to_string();
    }
    let mut out = String::from("Connect another device with:\n");
    for link in links {
        let _ = writeln!(out, "  syncclip --connect {link}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sc_core::ClipKind;

    fn clip(id: &str, content: &str) -> Clip {
        Clip {
            id: ClipId::from(id),
            content: content.to_string(),
            kind: ClipKind::Text,
            timestamp: 1_700_000_000_000,
            device_id: "AbCdE".to_string(),
            device_name: "Desk".to_string(),
            summary: None,
            tags: Vec::new(),
            is_favorite: false,
            expires_at: None,
        }
    }

    #[test]
    fn countdown_rounds_up_and_never_goes_negative() {
        assert_eq!(countdown(10_000, 9_001), "1s");
        assert_eq!(countdown(70_000, 10_000), "60s");
        assert_eq!(countdown(10_000, 12_000), "0s");
    }

    #[test]
    fn list_marks_selection_favorites_and_expiry() {
        let mut favorite = clip("a", "fn main() {}");
        favorite.kind = ClipKind::Code;
        favorite.is_favorite = true;
        favorite.summary = Some("Rust entry point".to_string());
        let mut secret = clip("b", "hunter2");
        secret.expires_at = Some(1_700_000_030_000);

        let out = render_list(
            &[favorite.clone(), secret],
            Some(&favorite.id),
            1_700_000_000_000,
        );
        let lines: Vec<&str> = out.lines().collect();

        let time = clock_time(1_700_000_000_000);
        assert_eq!(
            lines[0],
            format!(">  1. * [CODE] fn main() {{}}  (Desk, {time})")
        );
        assert_eq!(lines[1], "         Rust entry point");
        assert_eq!(
            lines[2],
            format!("   2.   [TEXT] hunter2  (Desk, {time}, expires in 30s)")
        );
    }

    #[test]
    fn summary_equal_to_content_is_not_repeated() {
        let mut same = clip("a", "hello");
        same.summary = Some("hello".to_string());

        assert_eq!(render_list(&[same], None, 0).lines().count(), 1);
    }

    #[test]
    fn empty_history_has_a_hint() {
        assert_eq!(render_list(&[], None, 0), "No clips yet. Copy something!\n");
    }

    #[test]
    fn clip_view_shows_tags_and_full_content() {
        let mut full = clip("a", "line one\nline two");
        full.tags = vec!["notes".to_string(), "draft".to_string()];

        let out = render_clip(&full, 0);

        assert!(out.contains("tags:    #notes #draft\n"));
        assert!(out.ends_with("line one\nline two\n"));
    }

    #[test]
    fn status_reports_label_and_peer_count() {
        let status = SyncStatus {
            device_id: Some("AbCdE".to_string()),
            device_name: "Desk".to_string(),
            peers: vec![ConnectedPeer {
                peer_id: "12D3KooWPeer".to_string(),
                address: "/ip4/10.0.0.2/tcp/4001".to_string(),
                connected_at: Utc::now(),
                inbound: true,
            }],
            share_links: Vec::new(),
        };

        let out = render_status(&status, true);

        assert!(out.starts_with("SYNC ACTIVE on Desk (1 peer)\n"));
        assert!(out.contains("device id: AbCdE\n"));
        assert!(out.contains("next clip self-destructs\n"));
    }

    #[test]
    fn share_links_are_printed_as_commands() {
        let out = render_share_links(&["/ip4/10.0.0.2/tcp/4001/p2p/12D3KooWA".to_string()]);
        assert!(out.contains("  syncclip --connect /ip4/10.0.0.2/tcp/4001/p2p/12D3KooWA\n"));
        assert!(render_share_links(&[]).starts_with("No share link"));
    }
}
