//! Rule registry for the block and inline parsing stages
//!
//! Grammar extensions register named (pattern, handler) rules per stage.
//! Rules are kept in an arena with a separate evaluation-order list and a
//! stable name-to-slot index, so that re-registering a name replaces the
//! pattern/handler in place without disturbing the evaluation order.
//! An explicit order hint ("before X" / "after X") repositions the rule;
//! a hint naming an unknown rule is a configuration error.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Parsing stage a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Block,
    Inline,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Block => write!(f, "block"),
            Stage::Inline => write!(f, "inline"),
        }
    }
}

/// Errors that can occur while wiring up rules and extensions
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// An order hint referenced a rule name that is not registered
    UnknownRule { stage: Stage, name: String },
    /// A new rule was registered without a pattern
    MissingPattern { stage: Stage, name: String },
    /// A rule pattern failed to compile
    InvalidPattern { pattern: String, message: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownRule { stage, name } => {
                write!(f, "No rule named '{name}' in the {stage} stage")
            }
            ConfigurationError::MissingPattern { stage, name } => {
                write!(
                    f,
                    "Rule '{name}' is new to the {stage} stage and needs a pattern"
                )
            }
            ConfigurationError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern '{pattern}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Ordering hint for rule registration, relative to an existing rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderHint {
    Before(String),
    After(String),
}

impl OrderHint {
    pub fn before(name: impl Into<String>) -> Self {
        OrderHint::Before(name.into())
    }

    pub fn after(name: impl Into<String>) -> Self {
        OrderHint::After(name.into())
    }

    fn target(&self) -> &str {
        match self {
            OrderHint::Before(name) | OrderHint::After(name) => name,
        }
    }
}

/// Guard predicate over a candidate match: receives the full source and
/// the candidate's byte span, returns false to reject the candidate.
pub type GuardFn = fn(src: &str, start: usize, end: usize) -> bool;

/// A compiled rule pattern.
///
/// The `regex` crate has no lookaround, so context conditions (such as
/// "an inline-math opener must not be preceded by another `$`") are
/// expressed as a guard predicate. A rejected candidate causes the scan
/// to resume one character past the candidate's start.
#[derive(Clone)]
pub struct Pattern {
    re: Regex,
    guard: Option<GuardFn>,
}

impl Pattern {
    /// Compile a pattern from a regex source string
    pub fn new(pattern: &str) -> Result<Self, ConfigurationError> {
        let re = Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Pattern { re, guard: None })
    }

    /// Wrap an already compiled regex
    pub fn from_regex(re: Regex) -> Self {
        Pattern { re, guard: None }
    }

    /// Attach a guard predicate
    pub fn with_guard(mut self, guard: GuardFn) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Match anchored at `pos` (block stage: the cursor always sits at a
    /// line start, and a rule only applies if it matches right there).
    pub fn match_at(&self, src: &str, pos: usize) -> Option<RuleMatch> {
        let caps = self.re.captures_at(src, pos)?;
        let m = caps.get(0)?;
        if m.start() != pos {
            return None;
        }
        if let Some(guard) = self.guard {
            if !guard(src, m.start(), m.end()) {
                return None;
            }
        }
        Some(RuleMatch::from_captures(&caps))
    }

    /// Find the earliest guard-approved match starting at or after `pos`
    /// (inline stage).
    pub fn find_from(&self, src: &str, pos: usize) -> Option<RuleMatch> {
        let mut at = pos;
        while at <= src.len() {
            let caps = self.re.captures_at(src, at)?;
            let m = caps.get(0)?;
            match self.guard {
                Some(guard) if !guard(src, m.start(), m.end()) => {
                    // resume one char past the rejected candidate
                    at = match src[m.start()..].chars().next() {
                        Some(c) => m.start() + c.len_utf8(),
                        None => break,
                    };
                }
                _ => return Some(RuleMatch::from_captures(&caps)),
            }
        }
        None
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("re", &self.re.as_str())
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// A successful rule match, detached from the regex borrow so handlers
/// can mutate the parse state freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Byte offset where the match starts
    pub start: usize,
    /// Byte offset one past the end of the match
    pub end: usize,
    /// Full matched text
    pub text: String,
    /// First capture group, if the pattern has one
    pub inner: Option<String>,
}

impl RuleMatch {
    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let m = caps.get(0).expect("group 0 always participates");
        RuleMatch {
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
            inner: caps.get(1).map(|g| g.as_str().to_string()),
        }
    }
}

/// A named rule: pattern plus stage-specific handler
pub struct Rule<H> {
    pub name: String,
    pub pattern: Pattern,
    pub handler: H,
}

/// Ordered rule collection for one parsing stage.
///
/// Rules live in an arena (`Vec`) addressed by a stable name index;
/// evaluation order is a separate list of arena slots. Replacing a rule
/// by name rewrites its arena slot and keeps its order position unless a
/// new order hint is given.
pub struct RuleSet<H> {
    stage: Stage,
    arena: Vec<Rule<H>>,
    order: Vec<usize>,
    index: HashMap<String, usize>,
}

impl<H> RuleSet<H> {
    /// Create an empty rule set for the given stage
    pub fn new(stage: Stage) -> Self {
        RuleSet {
            stage,
            arena: Vec::new(),
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The stage this set serves
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Insert or replace a rule.
    ///
    /// A `None` pattern on an existing name keeps the compiled pattern and
    /// swaps only the handler (the idiom used to override the built-in
    /// `block_quote` rule). A `None` pattern on a new name is an error.
    pub fn register(
        &mut self,
        name: &str,
        pattern: Option<Pattern>,
        handler: H,
        hint: Option<OrderHint>,
    ) -> Result<(), ConfigurationError> {
        match self.index.get(name).copied() {
            Some(slot) => {
                if let Some(pattern) = pattern {
                    self.arena[slot].pattern = pattern;
                }
                self.arena[slot].handler = handler;
                if let Some(hint) = hint {
                    let mut pos = self.hint_position(&hint)?;
                    if let Some(old) = self.order.iter().position(|&s| s == slot) {
                        self.order.remove(old);
                        if old < pos {
                            pos -= 1;
                        }
                    }
                    self.order.insert(pos, slot);
                }
                Ok(())
            }
            None => {
                let pattern = pattern.ok_or_else(|| ConfigurationError::MissingPattern {
                    stage: self.stage,
                    name: name.to_string(),
                })?;
                // resolve the hint before touching the arena so a failed
                // registration leaves the set unchanged
                let pos = match &hint {
                    Some(hint) => Some(self.hint_position(hint)?),
                    None => None,
                };
                let slot = self.arena.len();
                self.arena.push(Rule {
                    name: name.to_string(),
                    pattern,
                    handler,
                });
                self.index.insert(name.to_string(), slot);
                match pos {
                    Some(pos) => self.order.insert(pos, slot),
                    None => self.order.push(slot),
                }
                Ok(())
            }
        }
    }

    fn hint_position(&self, hint: &OrderHint) -> Result<usize, ConfigurationError> {
        let target = hint.target();
        let slot = self
            .index
            .get(target)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownRule {
                stage: self.stage,
                name: target.to_string(),
            })?;
        let pos = self
            .order
            .iter()
            .position(|&s| s == slot)
            .ok_or_else(|| ConfigurationError::UnknownRule {
                stage: self.stage,
                name: target.to_string(),
            })?;
        Ok(match hint {
            OrderHint::Before(_) => pos,
            OrderHint::After(_) => pos + 1,
        })
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule<H>> {
        self.index.get(name).map(|&slot| &self.arena[slot])
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|&slot| self.arena[slot].name.clone())
            .collect()
    }

    /// Iterate rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &Rule<H>> {
        self.order.iter().map(move |&slot| &self.arena[slot])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler_a() {}
    fn handler_b() {}

    type TestHandler = fn();

    fn set() -> RuleSet<TestHandler> {
        RuleSet::new(Stage::Block)
    }

    fn pat(s: &str) -> Option<Pattern> {
        Some(Pattern::new(s).unwrap())
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut rules = set();
        rules.register("one", pat("a"), handler_a, None).unwrap();
        rules.register("two", pat("b"), handler_a, None).unwrap();
        assert_eq!(rules.rule_names(), vec!["one", "two"]);
    }

    #[test]
    fn test_register_before_hint() {
        let mut rules = set();
        rules.register("list", pat("a"), handler_a, None).unwrap();
        rules
            .register("math", pat("b"), handler_a, Some(OrderHint::before("list")))
            .unwrap();
        assert_eq!(rules.rule_names(), vec!["math", "list"]);
    }

    #[test]
    fn test_register_after_hint() {
        let mut rules = set();
        rules.register("one", pat("a"), handler_a, None).unwrap();
        rules.register("two", pat("b"), handler_a, None).unwrap();
        rules
            .register("mid", pat("c"), handler_a, Some(OrderHint::after("one")))
            .unwrap();
        assert_eq!(rules.rule_names(), vec!["one", "mid", "two"]);
    }

    #[test]
    fn test_unknown_hint_target_is_configuration_error() {
        let mut rules = set();
        let err = rules
            .register("math", pat("a"), handler_a, Some(OrderHint::before("list")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownRule {
                stage: Stage::Block,
                name: "list".to_string(),
            }
        );
        // failed registration must not leave a partial entry behind
        assert!(rules.is_empty());
        assert!(rules.get("math").is_none());
    }

    #[test]
    fn test_replace_keeps_order_slot() {
        let mut rules = set();
        rules.register("one", pat("a"), handler_a, None).unwrap();
        rules.register("two", pat("b"), handler_a, None).unwrap();
        rules.register("three", pat("c"), handler_a, None).unwrap();
        // replace the middle rule, no hint: slot must be preserved
        rules.register("two", pat("B"), handler_b, None).unwrap();
        assert_eq!(rules.rule_names(), vec!["one", "two", "three"]);
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_replace_without_pattern_keeps_compiled_pattern() {
        let mut rules = set();
        rules.register("quote", pat("q+"), handler_a, None).unwrap();
        rules.register("quote", None, handler_b, None).unwrap();
        let rule = rules.get("quote").unwrap();
        assert!(rule.pattern.match_at("qqq", 0).is_some());
    }

    #[test]
    fn test_new_rule_without_pattern_is_configuration_error() {
        let mut rules = set();
        let err = rules.register("ghost", None, handler_a, None).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingPattern { .. }));
    }

    #[test]
    fn test_replace_with_hint_moves_rule() {
        let mut rules = set();
        rules.register("one", pat("a"), handler_a, None).unwrap();
        rules.register("two", pat("b"), handler_a, None).unwrap();
        rules
            .register("two", None, handler_b, Some(OrderHint::before("one")))
            .unwrap();
        assert_eq!(rules.rule_names(), vec!["two", "one"]);
    }

    #[test]
    fn test_invalid_pattern_reports_source() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_match_at_requires_exact_position() {
        let p = Pattern::new("b").unwrap();
        assert!(p.match_at("ab", 0).is_none());
        assert!(p.match_at("ab", 1).is_some());
    }

    #[test]
    fn test_find_from_guard_rescans() {
        fn not_after_x(src: &str, start: usize, _end: usize) -> bool {
            start == 0 || src.as_bytes()[start - 1] != b'x'
        }
        let p = Pattern::new("ab").unwrap().with_guard(not_after_x);
        // first candidate at 1 is preceded by 'x'; the scan must move on
        let m = p.find_from("xab ab", 0).unwrap();
        assert_eq!(m.start, 4);
    }
}
