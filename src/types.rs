/// Kind of a trie node.
///
/// The four root kinds (`AddressRoot`, `HostnameRoot`, `Domain` and the
/// `ExactMatch` hub for free address-parts patterns) appear only as direct
/// children of the tree root and identify sub-tries with distinct anchor
/// semantics. `Wildcard` and `Separator` nodes can appear anywhere below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A literal token must equal the edge's token string.
    ExactMatch,
    /// Anchor to the start of the full URL (rule prefix `|`).
    AddressRoot,
    /// Anchor to a hostname (hosts-file rules).
    HostnameRoot,
    /// Anchor to a domain label boundary (rule prefix `||`).
    Domain,
    /// Matches exactly one input token (`*`).
    Wildcard,
    /// Matches one separator-class token, or end of input (`^`).
    Separator,
}

/// Tri-state action of a single content-type modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModifierAction {
    #[default]
    Unset,
    Include,
    Exclude,
}

/// Content-type modifiers attached to a rule.
///
/// <https://adguard.com/kb/general/ad-filtering/create-own-filters/#content-type-modifiers>
///
/// Flags are parsed and stored on the terminal node, but do not influence
/// the boolean match result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleModifiers {
    pub document: ModifierAction,
    pub font: ModifierAction,
    pub image: ModifierAction,
    pub media: ModifierAction,
    pub other: ModifierAction,
    pub script: ModifierAction,
    pub stylesheet: ModifierAction,
}

/// A rule line classified into its anchor kind, token sequence and parsed
/// modifiers, ready for trie insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule<'a> {
    /// Root kind of the sub-trie this rule is inserted under.
    pub anchor: NodeKind,
    /// Pattern tokens, borrowed from the rule line.
    pub tokens: Vec<&'a str>,
    /// Content-type modifiers from a trailing `$...`, if any.
    pub modifiers: Option<RuleModifiers>,
}
