//! Active items: the parsing state shared by predict, scan, and combine.
//!
//! An item's binding is a vector of components, one `Rc<Vec<Atom>>` per
//! component. Scan and combine only ever rewrite a single atom within a
//! single component, so advancing an item clones just that component's
//! `Vec<Atom>` into a fresh `Rc`, leaving every other component's `Rc`
//! shared with the parent item -- the persistent-vector strategy the
//! design notes ask for, in place of a full deep copy per step.

use std::rc::Rc;

use smol_str::SmolStr;

use crate::grammar::{Atom, RuleId};

pub type ItemId = usize;

/// A permutation of `[0..dimension)`: `range_order[c]` is the component
/// index scheduled to be realized at scheduled position `c`.
pub type RangeOrder = Vec<usize>;

/// `(c, k)`: `c` indexes into `range_order` (scheduled position), `k`
/// indexes into the atom list of the component scheduled at position `c`.
pub type DotPosition = (usize, usize);

/// One component of a binding: the rule's own atoms, until scan/combine
/// replace a placeholder with its realized terminal.
pub type Component = Rc<Vec<Atom>>;

/// A binding isomorphic to the rule's result vector: one `Component` per
/// result-vector slot, independently shared so that realizing a placeholder
/// in one component never touches the others.
pub type Binding = Vec<Component>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Predict,
    Scan,
    Combine,
    Complete,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionType::Predict => "predict",
            ActionType::Scan => "scan",
            ActionType::Combine => "combine",
            ActionType::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// A rule instance mid-recognition: the dot marks how much of the scheduled
/// component order has been realized against the input.
#[derive(Debug, Clone)]
pub struct ActiveItem {
    pub id: ItemId,
    pub symbol: SmolStr,
    pub rule: RuleId,
    pub range_order: RangeOrder,
    pub dot_position: DotPosition,
    pub binding: Binding,
    pub found_start: usize,
    pub found_end: usize,
    pub token_index: usize,
    pub found_sequence: Vec<SmolStr>,
    pub antecedents: Vec<ItemId>,
    pub action_type: ActionType,
    pub scanned: bool,
    pub ignored: bool,
}

impl ActiveItem {
    /// The component scheduled at the dot's current position.
    pub fn dotted_component(&self) -> usize {
        self.range_order[self.dot_position.0]
    }

    /// The atom immediately after the dot, or `None` if the dot sits past
    /// the last scheduled component (the item is complete).
    pub fn next_atom(&self) -> Option<&Atom> {
        let (c, k) = self.dot_position;
        if c >= self.range_order.len() {
            return None;
        }
        let component = &self.binding[self.range_order[c]];
        component.get(k)
    }

    /// True once the dot has advanced past the last scheduled component.
    pub fn is_complete(&self) -> bool {
        self.dot_position.0 >= self.range_order.len()
    }

    /// True once the dot has just crossed a component boundary, i.e. sits
    /// at `(c, 0)` for some `c` that is not the first scheduled position.
    /// Such items feed combine as right-hand-side donors.
    pub fn is_partially_complete(&self) -> bool {
        self.dot_position.1 == 0 && self.dot_position.0 > 0
    }

    /// The realized strings of every scheduled component fully consumed so
    /// far, keyed as `symbol(j)` where `j` is the component's own index
    /// (not its scheduled position) -- the lookup key combine and the
    /// waiting index both use.
    pub fn completed_components(&self) -> Vec<(SmolStr, SmolStr)> {
        let (c, _) = self.dot_position;
        let mut completed = Vec::new();
        for scheduled in 0..c.min(self.range_order.len()) {
            let component_index = self.range_order[scheduled];
            let component = &self.binding[component_index];
            if component.iter().all(Atom::is_terminal) {
                let realized = component
                    .iter()
                    .filter_map(Atom::as_terminal)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ");
                completed.push((waiting_key(&self.symbol, component_index), SmolStr::new(realized)));
            }
        }
        completed
    }

    /// The fields duplicate detection compares: identical on every field
    /// here means the items are interchangeable regardless of id or
    /// derivation history.
    fn dedup_key(&self) -> DedupKey<'_> {
        DedupKey {
            symbol: &self.symbol,
            rule: self.rule,
            range_order: &self.range_order,
            dot_position: self.dot_position,
            binding: &self.binding,
            found_start: self.found_start,
            found_end: self.found_end,
        }
    }

    pub fn structurally_eq(&self, other: &ActiveItem) -> bool {
        self.dedup_key() == other.dedup_key()
    }

    /// An owned duplicate-detection key, suitable as a `HashSet`/`HashMap`
    /// key: two items with the same key are interchangeable regardless of
    /// `id` or `antecedents`.
    pub fn owned_dedup_key(&self) -> ItemDedupKey {
        ItemDedupKey {
            symbol: self.symbol.clone(),
            rule: self.rule,
            range_order: self.range_order.clone(),
            dot_position: self.dot_position,
            binding: self.binding.clone(),
            found_start: self.found_start,
            found_end: self.found_end,
        }
    }
}

#[derive(PartialEq)]
struct DedupKey<'a> {
    symbol: &'a SmolStr,
    rule: RuleId,
    range_order: &'a RangeOrder,
    dot_position: DotPosition,
    binding: &'a Binding,
    found_start: usize,
    found_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemDedupKey {
    symbol: SmolStr,
    rule: RuleId,
    range_order: RangeOrder,
    dot_position: DotPosition,
    binding: Binding,
    found_start: usize,
    found_end: usize,
}

/// The waiting-index / completed-component lookup key for component `index`
/// of `symbol`, of the syntactic form `Symbol(index)` -- the same shape a
/// placeholder's `Display` produces, so the two line up as plain strings.
pub fn waiting_key(symbol: &str, index: usize) -> SmolStr {
    SmolStr::new(format!("{symbol}({index})"))
}

/// The result of advancing a dot one atom: the new position, and whether
/// that step crossed a component boundary (the component just scheduled
/// finished). Scan and combine share this exactly, per the design notes.
pub fn advance_dot(dot_position: DotPosition, component_len: usize) -> (DotPosition, bool) {
    let (c, k) = dot_position;
    let k_next = k + 1;
    if k_next < component_len {
        ((c, k_next), false)
    } else {
        ((c + 1, 0), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_within_component_does_not_cross_boundary() {
        let (pos, crossed) = advance_dot((0, 0), 3);
        assert_eq!(pos, (0, 1));
        assert!(!crossed);
    }

    #[test]
    fn advance_past_last_atom_crosses_boundary() {
        let (pos, crossed) = advance_dot((0, 2), 3);
        assert_eq!(pos, (1, 0));
        assert!(crossed);
    }

    #[test]
    fn waiting_key_matches_placeholder_display_shape() {
        let atom = Atom::Placeholder { arg: SmolStr::new("A"), component: 2 };
        assert_eq!(atom.to_string(), waiting_key("A", 2).as_str());
    }
}
