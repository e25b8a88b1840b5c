//! Watchword matching against diff output.

use crate::diff::ConfigDiff;
use driftwatch_types::{AlertEvent, WatchWord};
use regex::Regex;
use tracing::warn;

/// Scans a diff for watched configuration items.
///
/// A watchword matches when any added or deleted line starts with it after
/// leading whitespace. Matching is case-sensitive and token-anchored, so the
/// watchword "router ospf" matches " router ospf 10" but not
/// "ip router-id 1.1.1.1". Each watchword yields at most one event per scan
/// no matter how many lines it matched.
pub fn scan(unique_id: &str, diff: &ConfigDiff, watchwords: &[WatchWord]) -> Vec<AlertEvent> {
    let mut events = Vec::new();
    for watchword in watchwords {
        let pattern = format!(r"^\s*{}", regex::escape(&watchword.word));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(error) => {
                // Escaped input should always compile; log and skip if not.
                warn!(word = %watchword.word, %error, "unusable watchword");
                continue;
            }
        };

        let hit = diff
            .added
            .iter()
            .chain(diff.deleted.iter())
            .any(|line| re.is_match(line));
        if hit {
            events.push(AlertEvent::watchword_changed(&watchword.word, unique_id));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diff_with_added(lines: &[&str]) -> ConfigDiff {
        ConfigDiff {
            added: lines.iter().map(|l| l.to_string()).collect(),
            deleted: Vec::new(),
        }
    }

    #[test]
    fn test_line_start_match_fires_one_event() {
        let diff = diff_with_added(&["router ospf 10", " network 10.0.0.0 0.255.255.255 area 0"]);
        let watchwords = vec![WatchWord::new(1, "router ospf")];

        let events = scan("aabb.cc00.0100", &diff, &watchwords);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].description,
            "watched configuration item 'router ospf' changed on device aabb.cc00.0100"
        );
    }

    #[test]
    fn test_leading_whitespace_is_skipped() {
        let diff = diff_with_added(&["  ip helper-address 10.0.0.5"]);
        let events = scan("id", &diff, &[WatchWord::new(1, "ip helper-address")]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_mid_line_occurrence_does_not_match() {
        let diff = diff_with_added(&["description uplink to router ospf core"]);
        let events = scan("id", &diff, &[WatchWord::new(1, "router ospf")]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let diff = diff_with_added(&["Router Ospf 10"]);
        let events = scan("id", &diff, &[WatchWord::new(1, "router ospf")]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_deleted_lines_also_scanned() {
        let diff = ConfigDiff {
            added: Vec::new(),
            deleted: vec!["ntp server 192.0.2.9".to_string()],
        };
        let events = scan("id", &diff, &[WatchWord::new(1, "ntp server")]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_many_matching_lines_still_one_event_per_watchword() {
        let diff = diff_with_added(&[
            "ip route 10.0.0.0 255.0.0.0 192.0.2.1",
            "ip route 10.1.0.0 255.255.0.0 192.0.2.1",
            "ip route 10.2.0.0 255.255.0.0 192.0.2.1",
        ]);
        let events = scan("id", &diff, &[WatchWord::new(1, "ip route")]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_regex_metacharacters_in_watchword_are_literal() {
        let diff = diff_with_added(&["snmp-server community c0mmun1ty RO"]);
        // A word with regex metacharacters must not match unless literal.
        let events = scan("id", &diff, &[WatchWord::new(1, "snmp.server")]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_multiple_watchwords_each_fire() {
        let diff = diff_with_added(&["router ospf 10", "ntp server 192.0.2.9"]);
        let watchwords = vec![
            WatchWord::new(1, "router ospf"),
            WatchWord::new(2, "ntp server"),
            WatchWord::new(3, "snmp-server"),
        ];
        let events = scan("id", &diff, &watchwords);
        assert_eq!(events.len(), 2);
    }
}
