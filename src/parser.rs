//! Filter rule parser.
//!
//! Classifies a raw rule line into one of five shapes (ignored, hosts
//! line, domain-anchored `||host^`, address-anchored `|url`, or a free
//! address-parts pattern) and emits the anchor kind, token sequence and
//! parsed content-type modifiers for trie insertion.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FilterError, Result};
use crate::tokenizer::tokenize;
use crate::types::{ModifierAction, NodeKind, ParsedRule, RuleModifiers};

/// Capture group for a hostname in `||host^` rules.
const HOSTNAME_CG: &str = r"((?:[\da-z][\da-z_-]*\.)+[\da-z-]*[a-z])";

/// Capture group for a fully qualified URL in `|url` rules.
const URL_CG: &str = r"(https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*))";

/// Optional trailing `$modifiers` capture group.
const MODIFIERS_CG: &str = r"(?:\$(.+))?";

/// Comments, cosmetic rules, `[Adblock Plus 2.0]`-style headers, and
/// (unsupported) exception rules.
static RE_IGNORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:!|#|\[|@@)|(##|#\?#|#\$#|#@#)")
        .expect("RE_IGNORE: hardcoded regex is invalid")
});

/// `0.0.0.0 hostname` / `127.0.0.1 hostname` lines. The hostname capture
/// is deliberately lax (dotless names allowed) so that the reserved names
/// below are recognized and dropped instead of degrading into junk
/// address-parts rules.
static RE_HOSTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0\.0\.0\.0|127\.0\.0\.1) ([0-9a-z][0-9a-z_.-]*)")
        .expect("RE_HOSTS: hardcoded regex is invalid")
});

/// Hostnames that appear in every hosts file and must never become rules.
static RE_HOSTS_IGNORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0\.0\.0\.0|broadcasthost|local|localhost(?:\.localdomain)?|ip6-\w+)$")
        .expect("RE_HOSTS_IGNORE: hardcoded regex is invalid")
});

/// `||hostname^`, optionally followed by `$modifiers`.
static RE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\|\|{HOSTNAME_CG}\^{MODIFIERS_CG}$"))
        .expect("RE_DOMAIN: hardcoded regex is invalid")
});

/// `|url`, optionally right-anchored with a trailing `|` and followed by
/// `$modifiers`. The address-root match phase already requires the whole
/// URL to be consumed, so the right anchor needs no extra machinery.
static RE_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\|{URL_CG}\|?{MODIFIERS_CG}$"))
        .expect("RE_ADDRESS: hardcoded regex is invalid")
});

/// Classify a rule line.
///
/// Returns `Ok(None)` for lines that are skipped without error: comments,
/// cosmetic and exception rules, blank lines, and hosts entries for
/// reserved names. Returns `Err` for rules that are dropped because they
/// cannot be represented (unsupported or unknown modifiers, empty token
/// stream). The tokens in the returned [`ParsedRule`] borrow from `rule`.
pub fn parse_rule(rule: &str) -> Result<Option<ParsedRule<'_>>> {
    if rule.is_empty() || RE_IGNORE.is_match(rule) {
        return Ok(None);
    }

    if let Some(captures) = RE_HOSTS.captures(rule) {
        let hostname = captures.get(1).unwrap().as_str();
        if RE_HOSTS_IGNORE.is_match(hostname) {
            return Ok(None);
        }
        return finish(NodeKind::HostnameRoot, tokenize(hostname), None);
    }

    if let Some(captures) = RE_DOMAIN.captures(rule) {
        let modifiers = capture_modifiers(captures.get(2).map(|m| m.as_str()))?;
        let hostname = captures.get(1).unwrap().as_str();
        return finish(NodeKind::Domain, tokenize(hostname), modifiers);
    }

    if let Some(captures) = RE_ADDRESS.captures(rule) {
        let modifiers = capture_modifiers(captures.get(2).map(|m| m.as_str()))?;
        let url = captures.get(1).unwrap().as_str();
        return finish(NodeKind::AddressRoot, tokenize(url), modifiers);
    }

    // Free address-parts pattern: tokenize the body before any trailing
    // `$modifiers` tail.
    let (body, tail) = match rule.find('$') {
        Some(position) => (&rule[..position], Some(&rule[position + 1..])),
        None => (rule, None),
    };
    let modifiers = capture_modifiers(tail)?;
    finish(NodeKind::ExactMatch, tokenize(body), modifiers)
}

fn finish(
    anchor: NodeKind,
    tokens: Vec<&str>,
    modifiers: Option<RuleModifiers>,
) -> Result<Option<ParsedRule<'_>>> {
    if tokens.is_empty() {
        return Err(FilterError::EmptyRule);
    }
    Ok(Some(ParsedRule {
        anchor,
        tokens,
        modifiers,
    }))
}

fn capture_modifiers(tail: Option<&str>) -> Result<Option<RuleModifiers>> {
    match tail {
        Some(tail) if !tail.is_empty() => Ok(Some(parse_modifiers(tail)?)),
        _ => Ok(None),
    }
}

/// Parse a comma-separated content-type modifier tail.
///
/// Fail-closed: an unknown modifier name, or any `key=value` item, rejects
/// the whole rule. A rule whose scope we cannot represent must not fire
/// overbroadly.
fn parse_modifiers(modifiers: &str) -> Result<RuleModifiers> {
    let mut parsed = RuleModifiers::default();

    for modifier in modifiers.split(',') {
        if modifier.contains('=') {
            return Err(FilterError::UnsupportedModifier(modifier.to_string()));
        }
        let (action, name) = match modifier.strip_prefix('~') {
            Some(name) => (ModifierAction::Exclude, name),
            None => (ModifierAction::Include, modifier),
        };
        let flag = match name {
            "document" => &mut parsed.document,
            "font" => &mut parsed.font,
            "image" => &mut parsed.image,
            "media" => &mut parsed.media,
            "other" => &mut parsed.other,
            "script" => &mut parsed.script,
            "stylesheet" => &mut parsed.stylesheet,
            _ => return Err(FilterError::UnknownModifier(name.to_string())),
        };
        *flag = action;
    }

    Ok(parsed)
}
