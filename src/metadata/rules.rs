// src/metadata/rules.rs
// =============================================================================
// Ordered default rules.
//
// When a README yields too few tags, we fall back to guesses based on the
// project name or title. Those guesses are a cascade: the first rule whose
// predicate holds supplies the defaults, and later rules are not consulted.
//
// Writing the cascade as a slice of rules keeps the precedence visible in
// one place and lets tests poke each rule on its own.
// =============================================================================

/// One step of a first-match-wins cascade over some context `C`.
pub struct DefaultRule<C> {
    /// Short label used in logs and tests.
    pub name: &'static str,
    pub applies: fn(&C) -> bool,
    pub defaults: fn(&C) -> Vec<String>,
}

/// The first rule whose predicate holds for `ctx`.
pub fn first_match<'r, C>(rules: &'r [DefaultRule<C>], ctx: &C) -> Option<&'r DefaultRule<C>> {
    rules.iter().find(|rule| (rule.applies)(ctx))
}

/// Defaults supplied by the first matching rule, if any.
pub fn apply_first_match<C>(rules: &[DefaultRule<C>], ctx: &C) -> Option<Vec<String>> {
    first_match(rules, ctx).map(|rule| {
        tracing::debug!(rule = rule.name, "default rule matched");
        (rule.defaults)(ctx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_even(n: &u32) -> bool {
        n % 2 == 0
    }

    fn is_big(n: &u32) -> bool {
        *n > 100
    }

    fn always(_: &u32) -> bool {
        true
    }

    fn label(name: &'static str) -> Vec<String> {
        vec![name.to_string()]
    }

    fn even(_: &u32) -> Vec<String> {
        label("even")
    }

    fn big(_: &u32) -> Vec<String> {
        label("big")
    }

    fn other(_: &u32) -> Vec<String> {
        label("other")
    }

    const RULES: &[DefaultRule<u32>] = &[
        DefaultRule {
            name: "even",
            applies: is_even,
            defaults: even,
        },
        DefaultRule {
            name: "big",
            applies: is_big,
            defaults: big,
        },
        DefaultRule {
            name: "other",
            applies: always,
            defaults: other,
        },
    ];

    #[test]
    fn test_first_match_wins() {
        // 102 is both even and big; the earlier rule takes it
        assert_eq!(first_match(RULES, &102).map(|r| r.name), Some("even"));
        assert_eq!(first_match(RULES, &101).map(|r| r.name), Some("big"));
        assert_eq!(apply_first_match(RULES, &7), Some(vec!["other".to_string()]));
    }

    #[test]
    fn test_no_rule_matches() {
        assert!(apply_first_match(&RULES[..2], &7).is_none());
    }
}
