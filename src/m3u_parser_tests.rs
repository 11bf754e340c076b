//! Tests for M3U playlist parsing

#[cfg(test)]
mod tests {
    use crate::m3u_parser::*;

    #[test]
    fn test_parse_m3u() {
        let content = r#"
#EXTM3U
#EXTINF:-1 tvg-id="cnn" tvg-logo="http://logo/cnn.png" group-title="News",CNN
http://example.com/live/1.m3u8
#EXTINF:-1 tvg-id="bbc" group-title="News",BBC
http://example.com/live/2.m3u8
"#;
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].id, "cnn");
        assert_eq!(channels[0].name, "CNN");
        assert_eq!(channels[0].logo, "http://logo/cnn.png");
        assert_eq!(channels[0].group, "News");
        assert_eq!(channels[0].language, "English");
        assert_eq!(channels[0].url, "http://example.com/live/1.m3u8");
        assert_eq!(channels[1].id, "bbc");
        assert_eq!(channels[1].logo, PLACEHOLDER_LOGO);
    }

    #[test]
    fn test_name_is_text_after_last_comma() {
        let content = "#EXTINF:-1 tvg-id=\"x1\" tvg-logo=\"L\" group-title=\"News\",My Channel, Extra\nhttp://example/stream.m3u8";
        let channels = parse_m3u(content, "Hindi");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "x1");
        assert_eq!(channels[0].name, "Extra");
        assert_eq!(channels[0].logo, "L");
        assert_eq!(channels[0].group, "News");
    }

    #[test]
    fn test_attributes_in_any_order() {
        let content = r#"#EXTINF:-1 group-title="Sports" tvg-logo="http://l/s.png" tvg-id="sp1",Sports One
https://example.com/sp1.m3u8
"#;
        let channels = parse_m3u(content, "Bengali");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "sp1");
        assert_eq!(channels[0].group, "Sports");
        assert_eq!(channels[0].logo, "http://l/s.png");
    }

    #[test]
    fn test_missing_attributes_use_defaults() {
        let content = "#EXTINF:-1,\nhttp://example.com/a.m3u8\n";
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, UNKNOWN_NAME);
        assert_eq!(channels[0].group, DEFAULT_GROUP);
        assert_eq!(channels[0].logo, PLACEHOLDER_LOGO);
        assert!(channels[0].id.starts_with("gen-"));
    }

    #[test]
    fn test_empty_tvg_id_is_synthesized() {
        let content = r#"#EXTINF:-1 tvg-id="" group-title="Music",Tunes
http://example.com/tunes.m3u8
"#;
        let channels = parse_m3u(content, "Hindi");
        assert_eq!(channels.len(), 1);
        assert_eq!(
            channels[0].id,
            synthetic_id("Hindi", "Music", "Tunes", "http://example.com/tunes.m3u8")
        );
    }

    #[test]
    fn test_synthetic_ids_are_deterministic() {
        let content = r#"#EXTINF:-1 group-title="Music",Tunes
http://example.com/tunes.m3u8
#EXTINF:-1 group-title="Music",Tunes
http://example.com/tunes-backup.m3u8
"#;
        let first = parse_m3u(content, "Hindi");
        let second = parse_m3u(content, "Hindi");
        assert_eq!(first, second);
        assert_ne!(first[0].id, first[1].id);
        assert_eq!(first[0].id.len(), "gen-".len() + 12);
    }

    #[test]
    fn test_synthetic_id_is_sha256_prefix() {
        use sha2::{Digest, Sha256};

        let id = synthetic_id("Hindi", "Music", "Tunes", "http://example.com/tunes.m3u8");
        let full = format!(
            "{:x}",
            Sha256::digest(b"Hindi\0Music\0Tunes\0http://example.com/tunes.m3u8\0")
        );
        assert_eq!(id, format!("gen-{}", &full[..12]));
        assert!(id["gen-".len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_metadata_without_url_is_dropped() {
        let content = r#"#EXTM3U
#EXTINF:-1 tvg-id="orphan",Orphan
#EXTINF:-1 tvg-id="ok",Complete
http://example.com/ok.m3u8
#EXTINF:-1 tvg-id="tail",Tail
"#;
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "ok");
    }

    #[test]
    fn test_ignores_comments_and_non_http_lines() {
        let content = r#"#EXTM3U x-tvg-url="http://example.com/epg.xml"
# a comment
#EXTVLCOPT:http-user-agent=Mozilla
#EXTINF:-1 tvg-id="a",Alpha

#EXTVLCOPT:http-referrer=http://example.com
http://example.com/a.m3u8
udp://@233.50.230.1:5000
http://example.com/stray.m3u8
"#;
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "a");
        assert_eq!(channels[0].url, "http://example.com/a.m3u8");
    }

    #[test]
    fn test_unquoted_and_stray_quote_attributes() {
        let content = r#"#EXTINF:0 tvg-logo="https://example.com/logo.png" "tvg-id=unquoted group-title="Deutsch", SRF 1 FHD
http://example.com/srf1
"#;
        let channels = parse_m3u(content, "German");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "unquoted");
        assert_eq!(channels[0].name, "SRF 1 FHD");
        assert_eq!(channels[0].logo, "https://example.com/logo.png");
        assert_eq!(channels[0].group, "Deutsch");
    }

    #[test]
    fn test_attrs_after_duration_comma() {
        let content = r#"#EXTINF:10.000000,TVG-ID="Channel1" group-title="Entertainment",Channel 1
http://example.com/stream1.ts
"#;
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "Channel1");
        assert_eq!(channels[0].group, "Entertainment");
        assert_eq!(channels[0].name, "Channel 1");
    }

    #[test]
    fn test_quoted_logo_with_comma() {
        let content = r#"#EXTINF:-1 tvg-id="q" tvg-logo="http://img/a,b.png" group-title="Kids",Cartoons
http://example.com/q.m3u8
"#;
        let channels = parse_m3u(content, "English");
        assert_eq!(channels[0].logo, "http://img/a,b.png");
        assert_eq!(channels[0].group, "Kids");
        assert_eq!(channels[0].name, "Cartoons");
    }

    #[test]
    fn test_crlf_and_indented_lines() {
        let content = "#EXTM3U\r\n  #EXTINF:-1 tvg-id=\"w\",Windows  \r\n  http://example.com/w.m3u8  \r\n";
        let channels = parse_m3u(content, "English");
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Windows");
        assert_eq!(channels[0].url, "http://example.com/w.m3u8");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_m3u("", "English").is_empty());
        assert!(parse_m3u("#EXTM3U\n", "English").is_empty());
    }
}
