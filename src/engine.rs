//! The deductive engine: predict, scan, and combine, driven token by token
//! until each position's sweep reaches a fixed point.
//!
//! A sweep runs predict, then combine, then scan, each over a snapshot
//! taken at the start of its own phase -- so a scan within a sweep never
//! sees an item a combine produced in that same sweep, and the sweep
//! repeats until nothing new lands in the chart.

use std::collections::HashSet;
use std::rc::Rc;

use itertools::Itertools;
use smol_str::SmolStr;

use crate::chart::Chart;
use crate::error::ParseError;
use crate::grammar::{rhs_symbols, Atom, Function, Grammar, RuleBody, RuleId};
use crate::item::{advance_dot, ActionType, ActiveItem, ItemId};
use crate::limits::ParseLimits;
use crate::trace::{extract_trace, Trace};

/// Splits `input` on single ASCII spaces. The empty string tokenizes to an
/// empty token list, which `Parser::parse` treats as automatic
/// non-membership rather than an error.
pub fn tokenize(input: &str) -> Vec<SmolStr> {
    if input.is_empty() {
        return Vec::new();
    }
    input.split(' ').map(SmolStr::new).collect()
}

/// A parser bound to one grammar and one set of limits. Cheap to build --
/// `Grammar` is an `Arc` handle -- so independent parses don't need to
/// share a `Parser` instance.
pub struct Parser {
    grammar: Grammar,
    limits: ParseLimits,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar, limits: ParseLimits::default() }
    }

    pub fn with_limits(grammar: Grammar, limits: ParseLimits) -> Self {
        Self { grammar, limits }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Tokenizes `input` and parses it against this parser's grammar.
    pub fn parse(&self, input: &str) -> Result<Option<Trace>, ParseError> {
        self.parse_tokens(&tokenize(input))
    }

    /// Parses a pre-tokenized input. Exposed for callers that build their
    /// own token vectors rather than going through the space-splitting
    /// tokenizer.
    pub fn parse_tokens(&self, tokens: &[SmolStr]) -> Result<Option<Trace>, ParseError> {
        if tokens.is_empty() {
            return Ok(None);
        }

        let grammar = &self.grammar;
        let mut chart = Chart::new(tokens.to_vec());
        let mut rule_used: HashSet<RuleId> = HashSet::new();
        chart.extend_frontier([grammar.start_symbol().clone()]);

        for (i, token) in tokens.iter().enumerate() {
            let mut sweeps = 0usize;
            loop {
                sweeps += 1;
                if sweeps > self.limits.max_sweeps_per_token {
                    return Err(ParseError::SweepLimitExceeded { token_index: i });
                }
                let before = chart.len();

                let frontier = chart.frontier_snapshot();
                run_predict(&mut chart, grammar, &mut rule_used, i, token, &frontier);

                let donors = chart.donor_ids();
                for donor_id in donors {
                    run_combine(&mut chart, i, donor_id);
                }

                let active = chart.active_ids();
                for active_id in active {
                    run_scan(&mut chart, i, token, active_id);
                }

                if chart.len() == before {
                    break;
                }
            }
            log::trace!("token {i} settled after {sweeps} sweep(s), {} items in chart", chart.len());

            if i + 1 == tokens.len() {
                if let Some(goal_id) = find_goal(&chart, grammar.start_symbol(), tokens) {
                    log::info!("goal found: item {goal_id} on '{}'", grammar.start_symbol());
                    return Ok(Some(extract_trace(&chart, goal_id)));
                }
            }
        }
        Ok(None)
    }
}

/// Parses `input` against `grammar` with default limits.
pub fn parse(grammar: &Grammar, input: &str) -> Result<Option<Trace>, ParseError> {
    Parser::new(grammar.clone()).parse(input)
}

fn find_goal(chart: &Chart, start_symbol: &str, tokens: &[SmolStr]) -> Option<ItemId> {
    chart.complete_on(start_symbol).find(|item| item.found_sequence.as_slice() == tokens).map(|item| item.id)
}

fn run_predict(
    chart: &mut Chart,
    grammar: &Grammar,
    rule_used: &mut HashSet<RuleId>,
    token_index: usize,
    token: &SmolStr,
    frontier: &[SmolStr],
) {
    for symbol in frontier {
        for &rule_id in grammar.rules_for(symbol) {
            if rule_used.contains(&rule_id) {
                continue;
            }
            let rule = match grammar.rule(rule_id) {
                Some(rule) => rule,
                None => continue,
            };

            let result_vector: Vec<Rc<Vec<Atom>>> = match &rule.body {
                RuleBody::Terminating(terminal) => vec![Rc::new(vec![Atom::Terminal(terminal.clone())])],
                RuleBody::Functional { function, actuals } => {
                    let function = grammar.function(*function);
                    function
                        .result_vector
                        .iter()
                        .map(|component| {
                            Rc::new(component.iter().map(|atom| resolve_actual(atom, function, actuals)).collect())
                        })
                        .collect()
                }
            };

            // Starts-with pruning: a component led by a fixed terminal can
            // only begin where that terminal occurs.
            if let Some(Atom::Terminal(t)) = result_vector.first().and_then(|c| c.first()) {
                if t != token {
                    continue;
                }
            }

            rule_used.insert(rule_id);
            chart.extend_frontier(rhs_symbols(rule, grammar.functions()));

            let dimension = result_vector.len();
            for range_order in (0..dimension).permutations(dimension) {
                let item = ActiveItem {
                    id: 0,
                    symbol: rule.symbol.clone(),
                    rule: rule_id,
                    range_order,
                    dot_position: (0, 0),
                    binding: result_vector.clone(),
                    found_start: token_index,
                    found_end: token_index,
                    token_index,
                    found_sequence: Vec::new(),
                    antecedents: Vec::new(),
                    action_type: ActionType::Predict,
                    scanned: false,
                    ignored: false,
                };
                chart.insert(item);
            }
            log::debug!("predicted rule {rule_id} ({symbol}) at token {token_index}");
        }
    }
}

fn resolve_actual(atom: &Atom, function: &Function, actuals: &[SmolStr]) -> Atom {
    match atom {
        Atom::Terminal(t) => Atom::Terminal(t.clone()),
        Atom::Placeholder { arg, component } => {
            let position = function
                .formal_args
                .iter()
                .position(|a| a == arg)
                .expect("placeholders are validated against formal_args at grammar-build time");
            Atom::Placeholder { arg: actuals[position].clone(), component: *component }
        }
    }
}

fn run_scan(chart: &mut Chart, token_index: usize, token: &SmolStr, item_id: ItemId) {
    let item = chart.get(item_id).clone();
    if item.scanned || item.token_index > token_index || item.is_complete() {
        return;
    }
    let (c, k) = item.dot_position;
    let j = item.range_order[c];
    let terminal = match item.binding[j].get(k) {
        Some(Atom::Terminal(t)) => t.clone(),
        _ => return,
    };
    if terminal != *token {
        return;
    }
    chart.mark_scanned(item_id);

    let (new_pos, _) = advance_dot((c, k), item.binding[j].len());
    let mut found_sequence = item.found_sequence.clone();
    found_sequence.push(token.clone());

    let mut scanned = ActiveItem {
        id: 0,
        symbol: item.symbol.clone(),
        rule: item.rule,
        range_order: item.range_order.clone(),
        dot_position: new_pos,
        binding: item.binding.clone(),
        found_start: item.found_start,
        found_end: item.found_end + 1,
        token_index,
        found_sequence,
        antecedents: vec![item.id],
        action_type: ActionType::Scan,
        scanned: false,
        ignored: false,
    };
    if scanned.is_complete() {
        scanned.action_type = ActionType::Complete;
    }
    chart.insert(scanned);
}

fn run_combine(chart: &mut Chart, token_index: usize, donor_id: ItemId) {
    let donor = chart.get(donor_id).clone();
    let donor_completed = donor.completed_components();
    if donor_completed.is_empty() {
        return;
    }
    let consistency_guard: std::collections::HashMap<_, _> = donor_completed.iter().cloned().collect();

    for (key, realized) in &donor_completed {
        let candidates: Vec<ItemId> = chart.waiting_on(key).to_vec();
        for candidate_id in candidates {
            if chart.memoize_pair(candidate_id, donor_id) {
                continue;
            }
            let candidate = chart.get(candidate_id).clone();
            if candidate.token_index > token_index {
                continue;
            }

            // Consistency check: if the candidate already carries completed
            // components and the donor carries more than one, any key
            // shared between them must agree on the realized string.
            if consistency_guard.len() > 1 {
                let candidate_completed = candidate.completed_components();
                let mismatch = candidate_completed
                    .iter()
                    .any(|(k, v)| consistency_guard.get(k).is_some_and(|donor_v| donor_v != v));
                if mismatch {
                    continue;
                }
            }

            let (c, k) = candidate.dot_position;
            let j = candidate.range_order[c];
            let mut new_component = (*candidate.binding[j]).clone();
            new_component[k] = Atom::Terminal(realized.clone());
            let component_len = new_component.len();
            let mut new_binding = candidate.binding.clone();
            new_binding[j] = Rc::new(new_component);

            let (new_pos, _) = advance_dot((c, k), component_len);
            let mut found_sequence = candidate.found_sequence.clone();
            found_sequence.push(realized.clone());

            let mut combined = ActiveItem {
                id: 0,
                symbol: candidate.symbol.clone(),
                rule: candidate.rule,
                range_order: candidate.range_order.clone(),
                dot_position: new_pos,
                binding: new_binding,
                found_start: candidate.found_start,
                found_end: candidate.found_end + 1,
                token_index,
                found_sequence,
                antecedents: vec![candidate.id, donor.id],
                action_type: ActionType::Combine,
                scanned: false,
                ignored: false,
            };
            if combined.is_complete() {
                combined.action_type = ActionType::Complete;
            }
            chart.insert(combined);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_single_space() {
        assert_eq!(tokenize("a b c"), vec![SmolStr::new("a"), SmolStr::new("b"), SmolStr::new("c")]);
    }

    #[test]
    fn tokenize_of_empty_string_is_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn empty_token_stream_is_non_membership_not_an_error() {
        let grammar = Grammar::build(
            vec!["a"],
            vec![crate::grammar::FunctionSpec::new("f", Vec::<&str>::new(), vec![vec!["a"]])],
            vec![crate::grammar::RuleSpec::new("S", "f", Vec::<&str>::new())],
            "S",
        )
        .unwrap();
        assert_eq!(parse(&grammar, "").unwrap(), None);
    }
}
