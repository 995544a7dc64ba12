//! Grammar simplification: eliminate useless rules by intersecting the
//! productive-rule set with the reachable-rule set, each computed as a
//! small fixed-point iteration over the rule list.
//!
//! A rule is *productive* if its right-hand side can derive some terminal
//! string -- terminating rules always are, and a functional rule is
//! productive once every nonterminal it refers to is known productive. A
//! rule is *reachable* if its left-hand side is the start symbol, or some
//! already-reachable rule refers to it. The simplified grammar keeps only
//! rules that are both; a grammar with no productive path to the start
//! symbol simplifies to the empty rule set, not an error.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::grammar::{rhs_symbols, Function, Rule, RuleBody};

pub fn simplify(rules: Vec<Rule>, functions: &[Function], start_symbol: &SmolStr) -> Vec<Rule> {
    let productive = productive_symbols(&rules, functions);
    let reachable = reachable_symbols(&rules, functions, start_symbol, &productive);

    rules
        .into_iter()
        .filter(|rule| is_productive(rule, functions, &productive) && reachable.contains(&rule.symbol))
        .collect()
}

/// Fixed-point over symbols known to derive some terminal string.
fn productive_symbols(rules: &[Rule], functions: &[Function]) -> HashSet<SmolStr> {
    let mut productive: HashSet<SmolStr> = HashSet::new();
    loop {
        let mut changed = false;
        for rule in rules {
            if productive.contains(&rule.symbol) {
                continue;
            }
            if is_productive(rule, functions, &productive) {
                productive.insert(rule.symbol.clone());
                changed = true;
            }
        }
        if !changed {
            return productive;
        }
    }
}

fn is_productive(rule: &Rule, functions: &[Function], productive: &HashSet<SmolStr>) -> bool {
    match &rule.body {
        RuleBody::Terminating(_) => true,
        RuleBody::Functional { .. } => rhs_symbols(rule, functions).iter().all(|s| productive.contains(s)),
    }
}

/// Fixed-point over symbols reachable from the start symbol through rules
/// whose right-hand side is productive (an unproductive rule can never
/// fire, so it shouldn't extend reachability either).
fn reachable_symbols(
    rules: &[Rule],
    functions: &[Function],
    start_symbol: &SmolStr,
    productive: &HashSet<SmolStr>,
) -> HashSet<SmolStr> {
    let mut reachable: HashSet<SmolStr> = HashSet::new();
    reachable.insert(start_symbol.clone());
    loop {
        let mut changed = false;
        for rule in rules {
            if !reachable.contains(&rule.symbol) || !is_productive(rule, functions, productive) {
                continue;
            }
            for symbol in rhs_symbols(rule, functions) {
                if reachable.insert(symbol) {
                    changed = true;
                }
            }
        }
        if !changed {
            return reachable;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{FunctionSpec, Grammar, RuleSpec};

    #[test]
    fn drops_rules_for_unproductive_nonterminals() {
        // B never derives a terminal string (its own rule refers to itself only),
        // so the rule for S that routes through B must also be dropped.
        let functions = vec![
            FunctionSpec::new("f_a", Vec::<&str>::new(), vec![vec!["a"]]),
            FunctionSpec::new("f_b_self", vec!["B"], vec![vec!["B(0)"]]),
            FunctionSpec::new("f_s_via_a", vec!["A"], vec![vec!["A(0)"]]),
            FunctionSpec::new("f_s_via_b", vec!["B"], vec![vec!["B(0)"]]),
        ];
        let rules = vec![
            RuleSpec::new("A", "f_a", Vec::<&str>::new()),
            RuleSpec::new("B", "f_b_self", vec!["B"]),
            RuleSpec::new("S", "f_s_via_a", vec!["A"]),
            RuleSpec::new("S", "f_s_via_b", vec!["B"]),
        ];
        let grammar = Grammar::build(vec!["a"], functions, rules, "S").unwrap();
        assert_eq!(grammar.rule_count(), 2);
        assert!(grammar.rules().iter().all(|r| r.symbol != "B"));
    }

    #[test]
    fn drops_rules_unreachable_from_start() {
        let functions = vec![
            FunctionSpec::new("f_a", Vec::<&str>::new(), vec![vec!["a"]]),
            FunctionSpec::new("f_b", Vec::<&str>::new(), vec![vec!["b"]]),
        ];
        let rules = vec![
            RuleSpec::new("S", "f_a", Vec::<&str>::new()),
            RuleSpec::new("Orphan", "f_b", Vec::<&str>::new()),
        ];
        let grammar = Grammar::build(vec!["a", "b"], functions, rules, "S").unwrap();
        assert_eq!(grammar.rule_count(), 1);
        assert_eq!(grammar.rules()[0].symbol, "S");
    }

    #[test]
    fn total_unproductiveness_simplifies_to_empty_grammar() {
        let functions = vec![FunctionSpec::new("f_self", vec!["S"], vec![vec!["S(0)"]])];
        let rules = vec![RuleSpec::new("S", "f_self", vec!["S"])];
        let grammar = Grammar::build(vec!["a"], functions, rules, "S").unwrap();
        assert!(grammar.is_empty());
    }
}
