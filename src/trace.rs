//! Trace extraction: reverse BFS over the antecedents relation, turning a
//! goal item into the chronologically ordered derivation that witnesses it.

use std::collections::{HashSet, VecDeque};

use smol_str::SmolStr;

use crate::chart::Chart;
use crate::item::{ActionType, ActiveItem, DotPosition, ItemId, RangeOrder};
use crate::grammar::RuleId;

/// One step of a derivation, exposed read-only for diagnostics. Mirrors the
/// fields of the internal `ActiveItem` that a consumer can usefully inspect
/// without reaching into chart internals.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub symbol: SmolStr,
    pub rule: RuleId,
    pub range_order: RangeOrder,
    pub dot_position: DotPosition,
    pub binding: Vec<String>,
    pub found_sequence: Vec<SmolStr>,
    pub found_start: usize,
    pub found_end: usize,
    pub token_index: usize,
    pub action_type: ActionType,
    pub antecedents: Vec<ItemId>,
}

impl Item {
    fn from_active(active: &ActiveItem) -> Self {
        let binding = active
            .binding
            .iter()
            .map(|component| component.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))
            .collect();
        Self {
            id: active.id,
            symbol: active.symbol.clone(),
            rule: active.rule,
            range_order: active.range_order.clone(),
            dot_position: active.dot_position,
            binding,
            found_sequence: active.found_sequence.clone(),
            found_start: active.found_start,
            found_end: active.found_end,
            token_index: active.token_index,
            action_type: active.action_type,
            antecedents: active.antecedents.clone(),
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} <- rule#{} [{}] dot={:?} found=\"{}\" antecedents={:?}",
            self.id,
            self.symbol,
            self.rule,
            self.binding.join(" | "),
            self.dot_position,
            self.found_sequence.iter().map(SmolStr::as_str).collect::<Vec<_>>().join(" "),
            self.antecedents,
        )
    }
}

/// The derivation witnessing a successful parse: a topologically reversed
/// list from seed predictions to the goal item.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub items: Vec<Item>,
}

impl Trace {
    pub fn goal(&self) -> &Item {
        self.items.last().expect("a Trace is never constructed empty")
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Walks `antecedents` backward from `goal_id`, producing the list of items
/// that witness the derivation in the order they were first discovered by a
/// reverse breadth-first search -- seed predictions first, goal last.
pub fn extract_trace(chart: &Chart, goal_id: ItemId) -> Trace {
    let mut seen: HashSet<ItemId> = HashSet::new();
    let mut ordered: VecDeque<ItemId> = VecDeque::new();
    let mut queue: VecDeque<ItemId> = VecDeque::new();

    seen.insert(goal_id);
    ordered.push_back(goal_id);
    queue.push_back(goal_id);

    while let Some(id) = queue.pop_front() {
        for &antecedent in &chart.get(id).antecedents {
            if seen.insert(antecedent) {
                ordered.push_front(antecedent);
                queue.push_back(antecedent);
            }
        }
    }

    let items = ordered.into_iter().map(|id| Item::from_active(chart.get(id))).collect();
    Trace { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Atom;
    use crate::item::Binding;
    use std::rc::Rc;

    fn leaf(dot_position: DotPosition, found_end: usize, antecedents: Vec<ItemId>) -> ActiveItem {
        let binding: Binding = vec![Rc::new(vec![Atom::Terminal(SmolStr::new("a")), Atom::Terminal(SmolStr::new("a"))])];
        ActiveItem {
            id: 0,
            symbol: SmolStr::new("S"),
            rule: 0,
            range_order: vec![0],
            dot_position,
            binding,
            found_start: 0,
            found_end,
            token_index: 0,
            found_sequence: vec![SmolStr::new("a"); found_end],
            antecedents,
            action_type: ActionType::Scan,
            scanned: false,
            ignored: false,
        }
    }

    #[test]
    fn trace_is_ordered_from_seed_to_goal() {
        let mut chart = Chart::new(vec![SmolStr::new("a"), SmolStr::new("a")]);
        let seed = chart.insert(leaf((0, 0), 0, vec![])).unwrap();
        let mid = chart.insert(leaf((0, 1), 1, vec![seed])).unwrap();
        let goal = chart.insert(leaf((0, 2), 2, vec![mid])).unwrap();

        let trace = extract_trace(&chart, goal);
        let ids: Vec<_> = trace.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![seed, mid, goal]);
        assert_eq!(trace.goal().id, goal);
    }
}
