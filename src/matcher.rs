//! URL matcher façade.
//!
//! Owns the trie root and exposes rule loading plus the multi-phase match
//! predicate. The matcher is safe for concurrent use: rules can be added
//! while other threads are matching, and a rule is visible to every match
//! that is sequenced after the `add_rule` call that inserted it.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::parser::parse_rule;
use crate::tokenizer::tokenize;
use crate::trie::{Node, NodeKey};
use crate::types::NodeKind;

/// Trie-based matcher for URLs, capable of parsing Adblock Plus filters
/// and hosts(5) rules and matching fully qualified URLs against them.
pub struct Matcher {
    root: Arc<Node>,
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::new()),
        }
    }

    /// Add a single rule line.
    ///
    /// Infallible: comments and cosmetic rules are skipped, and rules that
    /// cannot be represented (unknown or `key=value` modifiers, empty
    /// patterns) are dropped with a debug log line. The only failure mode
    /// visible to callers is under-matching.
    pub fn add_rule(&self, rule: &str) {
        match parse_rule(rule) {
            Ok(Some(parsed)) => self.root.insert(&parsed),
            Ok(None) => {}
            Err(error) => debug!(rule, %error, "dropped rule"),
        }
    }

    /// Feed every line of `reader` to [`add_rule`](Self::add_rule) until
    /// the source is exhausted. Read errors are logged and skipped.
    /// Returns the number of lines fed.
    pub fn add_rules<R: BufRead>(&self, reader: R) -> usize {
        let mut count = 0;
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    self.add_rule(&line);
                    count += 1;
                }
                Err(error) => warn!(%error, "failed to read line from rule source"),
            }
        }
        debug!(count, "finished loading rules");
        count
    }

    /// Load rules from a file on disk.
    pub fn add_rules_from_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let file = std::fs::File::open(path.as_ref())?;
        Ok(self.add_rules(std::io::BufReader::new(file)))
    }

    /// True if any rule matches the given URL.
    ///
    /// The URL is expected in fully qualified form
    /// (`https://host/path?query`); no normalization is performed. Anchor
    /// phases are tried in a fixed order and the first hit wins.
    pub fn matches(&self, url: &str) -> bool {
        let all = tokenize(url);
        let mut tokens: &[&str] = &all;

        // Address root: the whole URL must be consumed.
        if let Some(address_root) = self.root.find_child(&NodeKey::anchor(NodeKind::AddressRoot)) {
            if let Some((_, remaining)) = Node::match_tokens(&address_root, tokens) {
                if remaining.is_empty() {
                    return true;
                }
            }
        }
        if Node::match_tokens(&self.root, tokens).is_some() {
            return true;
        }
        if tokens.is_empty() {
            return false;
        }
        tokens = &tokens[1..];

        // Past the scheme literal.
        if Node::match_tokens(&self.root, tokens).is_some() {
            return true;
        }
        if tokens.is_empty() {
            return false;
        }
        tokens = &tokens[1..];

        // Hostname root: hosts-file rules, anchored at the start of the
        // hostname.
        if let Some(hostname_root) = self.root.find_child(&NodeKey::anchor(NodeKind::HostnameRoot))
        {
            if match_hostname(&hostname_root, tokens) {
                return true;
            }
        }

        // Domain segments: try the `||` sub-trie at every label boundary
        // of the hostname.
        let domain_root = self.root.find_child(&NodeKey::anchor(NodeKind::Domain));
        while let Some((first, _)) = tokens.split_first() {
            if *first == "/" {
                break;
            }
            if *first != "." {
                if let Some(domain_root) = &domain_root {
                    if Node::match_tokens(domain_root, tokens).is_some() {
                        return true;
                    }
                }
            }
            if Node::match_tokens(&self.root, tokens).is_some() {
                return true;
            }
            tokens = &tokens[1..];
        }

        // Rest of the URL: scan for free address-parts patterns at every
        // position of the path and query.
        let parts_root = self.root.find_child(&NodeKey::anchor(NodeKind::ExactMatch));
        while !tokens.is_empty() {
            if let Some(parts_root) = &parts_root {
                if Node::match_tokens(parts_root, tokens).is_some() {
                    return true;
                }
            }
            tokens = &tokens[1..];
        }

        false
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a hostname sub-trie against `tokens`, requiring the matched run
/// to end at the end of the hostname (nothing left, or a `/`). When the
/// match stops at a `.`, resume behind the label boundary through the
/// terminal's literal-dot child: a shorter rule accepted greedily must not
/// hide a longer rule sharing its prefix.
fn match_hostname(node: &Arc<Node>, tokens: &[&str]) -> bool {
    let Some((found, remaining)) = Node::match_tokens(node, tokens) else {
        return false;
    };
    match remaining.split_first() {
        None => true,
        Some((&"/", _)) => true,
        Some((&".", rest)) => match found.find_child(&NodeKey::exact(".")) {
            Some(dot_child) => match_hostname(&dot_child, rest),
            None => false,
        },
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher_with(rules: &[&str]) -> Matcher {
        let matcher = Matcher::new();
        for rule in rules {
            matcher.add_rule(rule);
        }
        matcher
    }

    #[test]
    fn test_domain_rule_blocks_hostname() {
        let matcher = matcher_with(&["||ads.example.com^"]);
        assert!(matcher.matches("https://ads.example.com/banner"));
        assert!(!matcher.matches("https://notads.example.com/banner"));
    }

    #[test]
    fn test_domain_rule_matches_at_label_boundary() {
        let matcher = matcher_with(&["||example.com^"]);
        assert!(matcher.matches("https://sub.example.com/x"));
        assert!(matcher.matches("https://example.com/x"));
        assert!(!matcher.matches("https://notexample.com/x"));
    }

    #[test]
    fn test_hosts_rule_blocks_hostname() {
        let matcher = matcher_with(&["0.0.0.0 tracker.test"]);
        assert!(matcher.matches("https://tracker.test/"));
        assert!(matcher.matches("http://tracker.test/beacon?id=1"));
        // Hosts rules are anchored at the start of the hostname.
        assert!(!matcher.matches("https://sub.tracker.test/"));
        assert!(!matcher.matches("https://tracker.test.evil/"));
    }

    #[test]
    fn test_reserved_hostname_is_ignored() {
        let matcher = matcher_with(&["0.0.0.0 localhost"]);
        assert!(!matcher.matches("https://localhost/"));
    }

    #[test]
    fn test_hosts_rule_resumes_past_shorter_rule() {
        // Greedy early acceptance stops at the shorter rule's terminal;
        // the dot-resumption lets the longer rule still match.
        let matcher = matcher_with(&["0.0.0.0 pix.test", "0.0.0.0 pix.test.net"]);
        assert!(matcher.matches("https://pix.test/"));
        assert!(matcher.matches("https://pix.test.net/"));
        assert!(!matcher.matches("https://pix.test.org/"));
    }

    #[test]
    fn test_address_rule_requires_full_url() {
        let matcher = matcher_with(&["|https://example.com/ads|"]);
        assert!(matcher.matches("https://example.com/ads"));
        assert!(!matcher.matches("https://example.com/ads/more"));
        assert!(!matcher.matches("http://example.com/ads"));
    }

    #[test]
    fn test_wildcard_path_rule() {
        let matcher = matcher_with(&["/banner/*/img^$image"]);
        assert!(matcher.matches("https://x.test/banner/123/img.png"));
        assert!(!matcher.matches("https://x.test/banner/img.png"));
    }

    #[test]
    fn test_modifiers_do_not_gate_matching() {
        let matcher = matcher_with(&["||doubleclick.net^$document,~script"]);
        assert!(matcher.matches("https://ads.doubleclick.net/pixel"));
    }

    #[test]
    fn test_key_value_modifier_rule_is_dropped() {
        let matcher = matcher_with(&["||bad.com^$domain=x.com"]);
        assert!(!matcher.matches("https://bad.com/"));
    }

    #[test]
    fn test_empty_rule_set_matches_nothing() {
        let matcher = Matcher::new();
        assert!(!matcher.matches("https://example.com/"));
        assert!(!matcher.matches(""));
    }

    #[test]
    fn test_free_patterns_match_in_path_only() {
        let matcher = matcher_with(&["banner"]);
        assert!(matcher.matches("https://x.test/banner"));
        assert!(matcher.matches("https://x.test/a/banner?x=1"));
        // The path scan starts after the hostname.
        assert!(!matcher.matches("https://banner.example.com/"));
    }

    #[test]
    fn test_ignored_rules_leave_trie_untouched() {
        let matcher = matcher_with(&["||ads.example.com^"]);
        let count = matcher.root.node_count();

        for rule in [
            "! comment",
            "[Adblock Plus 2.0]",
            "@@||allowed.example.com^",
            "example.com##.ad-banner",
            "||tracker.example.com^$domain=x.com",
            "||tracker.example.com^$popup",
            "0.0.0.0 localhost",
            "",
        ] {
            matcher.add_rule(rule);
        }
        assert_eq!(matcher.root.node_count(), count);
    }

    #[test]
    fn test_reinsertion_is_observably_idempotent() {
        let matcher = matcher_with(&["||ads.example.com^"]);
        let count = matcher.root.node_count();
        matcher.add_rule("||ads.example.com^");
        assert_eq!(matcher.root.node_count(), count);
        assert!(matcher.matches("https://ads.example.com/banner"));
    }

    #[test]
    fn test_matching_is_monotone_in_rules() {
        let matcher = matcher_with(&["||ads.example.com^"]);
        assert!(matcher.matches("https://ads.example.com/banner"));

        for rule in ["0.0.0.0 tracker.test", "/banner/*/img^", "||other.net^"] {
            matcher.add_rule(rule);
            assert!(matcher.matches("https://ads.example.com/banner"));
        }
    }

    #[test]
    fn test_match_is_repeatable() {
        let matcher = matcher_with(&["||ads.example.com^", "banner"]);
        for _ in 0..3 {
            assert!(matcher.matches("https://ads.example.com/x"));
            assert!(!matcher.matches("https://example.com/x"));
        }
    }
}
