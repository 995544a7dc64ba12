//! The chart: the single arena of items an engine sweep reads from and
//! writes to, plus the auxiliary indexes (prediction frontier, waiting
//! index, combine memo) that keep predict and combine from re-deriving
//! work they've already done.
//!
//! Items are appended to the arena and never removed or relocated; their
//! `id` is a stable index. A structurally duplicate insertion does not
//! create a second entry -- it resolves to the id of the item already
//! there, so antecedents always point at one canonical item per
//! `(symbol, rule, range_order, dot_position, binding, found_start,
//! found_end)` combination, matching the "no two non-ignored items are
//! structurally equal" invariant without needing a separate `ignored` pass.

use std::collections::{HashMap, HashSet};

use multimap::MultiMap;
use smol_str::SmolStr;

use crate::grammar::Atom;
use crate::item::{waiting_key, ActiveItem, ItemDedupKey, ItemId};

pub struct Chart {
    items: Vec<ActiveItem>,
    seen: HashMap<ItemDedupKey, ItemId>,
    waiting: MultiMap<SmolStr, ItemId>,
    frontier: HashSet<SmolStr>,
    combine_memo: HashSet<(ItemId, ItemId)>,
    tokens: Vec<SmolStr>,
}

impl Chart {
    pub fn new(tokens: Vec<SmolStr>) -> Self {
        Self {
            items: Vec::new(),
            seen: HashMap::new(),
            waiting: MultiMap::new(),
            frontier: HashSet::new(),
            combine_memo: HashSet::new(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &[SmolStr] {
        &self.tokens
    }

    /// Insert one item, applying the compatibility filter and duplicate
    /// detection. Returns `None` if the item's realized substring cannot
    /// occur in the input. Returns the id of an existing structurally-equal
    /// item if this is a duplicate, or the freshly assigned id otherwise.
    pub fn insert(&mut self, mut item: ActiveItem) -> Option<ItemId> {
        if !self.is_compatible(&item) {
            return None;
        }
        let key = item.owned_dedup_key();
        if let Some(&existing_id) = self.seen.get(&key) {
            return Some(existing_id);
        }
        let id = self.items.len();
        item.id = id;
        if let Some(Atom::Placeholder { arg, component }) = item.next_atom() {
            self.waiting.insert(waiting_key(arg, *component), id);
        }
        self.seen.insert(key, id);
        self.items.push(item);
        Some(id)
    }

    /// Insert every item in `items`, in order, returning the ids accepted
    /// (freshly inserted or resolved to an existing duplicate).
    pub fn insert_all(&mut self, items: impl IntoIterator<Item = ActiveItem>) -> Vec<ItemId> {
        items.into_iter().filter_map(|item| self.insert(item)).collect()
    }

    pub fn get(&self, id: ItemId) -> &ActiveItem {
        &self.items[id]
    }

    pub fn mark_scanned(&mut self, id: ItemId) {
        self.items[id].scanned = true;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items whose dot has not advanced past the last scheduled component.
    pub fn active_ids(&self) -> Vec<ItemId> {
        self.items.iter().filter(|item| !item.is_complete()).map(|item| item.id).collect()
    }

    /// Items eligible as combine donors: dot just crossed a component
    /// boundary, whether or not that boundary is the last one.
    pub fn donor_ids(&self) -> Vec<ItemId> {
        self.items.iter().filter(|item| item.is_partially_complete()).map(|item| item.id).collect()
    }

    /// Complete items on `symbol` (dot past the last scheduled component).
    pub fn complete_on<'a, 'b>(&'a self, symbol: &'b str) -> impl Iterator<Item = &'a ActiveItem> + use<'a, 'b> {
        self.items.iter().filter(move |item| item.is_complete() && item.symbol == symbol)
    }

    pub fn extend_frontier(&mut self, symbols: impl IntoIterator<Item = SmolStr>) {
        self.frontier.extend(symbols);
    }

    pub fn frontier_snapshot(&self) -> Vec<SmolStr> {
        self.frontier.iter().cloned().collect()
    }

    /// Items whose next unconsumed atom is the placeholder reference `key`
    /// (of the form `Symbol(component)`), the combine-side mirror of the
    /// prediction frontier.
    pub fn waiting_on(&self, key: &SmolStr) -> &[ItemId] {
        self.waiting.get_vec(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records the unordered pair as attempted; returns `true` if it was
    /// already memoized (the caller should skip it).
    pub fn memoize_pair(&mut self, a: ItemId, b: ItemId) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        !self.combine_memo.insert(key)
    }

    fn is_compatible(&self, item: &ActiveItem) -> bool {
        is_infix(&item.found_sequence, &self.tokens)
    }
}

/// Whether `needle` occurs as a contiguous run within `haystack`. A single
/// `found_sequence` entry can itself be several space-joined words --
/// `ActiveItem::completed_components` joins a multi-atom component into one
/// `SmolStr` before combine pushes it -- so each entry is split back into
/// its constituent words before the window comparison. That keeps the
/// comparison token-for-token (so `"a"` still never matches inside a token
/// `"cat"`) while correctly treating a joined `"a b"` entry as the two
/// words `"a"`, `"b"` rather than one opaque unit that can only equal a
/// single-word haystack token.
fn is_infix(needle: &[SmolStr], haystack: &[SmolStr]) -> bool {
    let words: Vec<&str> = needle.iter().flat_map(|s| s.split(' ')).collect();
    if words.is_empty() {
        return true;
    }
    if words.len() > haystack.len() {
        return false;
    }
    haystack.windows(words.len()).any(|window| window.iter().map(SmolStr::as_str).eq(words.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ActionType, Binding};
    use std::rc::Rc;

    fn tokens(words: &[&str]) -> Vec<SmolStr> {
        words.iter().map(|w| SmolStr::new(*w)).collect()
    }

    fn sample_item(id: ItemId, found_sequence: &[&str]) -> ActiveItem {
        let binding: Binding = vec![Rc::new(vec![Atom::Terminal(SmolStr::new("a"))])];
        ActiveItem {
            id,
            symbol: SmolStr::new("S"),
            rule: 0,
            range_order: vec![0],
            dot_position: (0, 0),
            binding,
            found_start: 0,
            found_end: found_sequence.len(),
            token_index: 0,
            found_sequence: found_sequence.iter().map(|s| SmolStr::new(*s)).collect(),
            antecedents: vec![],
            action_type: ActionType::Predict,
            scanned: false,
            ignored: false,
        }
    }

    #[test]
    fn compatible_items_are_inserted() {
        let mut chart = Chart::new(tokens(&["a", "b", "c"]));
        let id = chart.insert(sample_item(0, &["a", "b"]));
        assert!(id.is_some());
    }

    #[test]
    fn incompatible_items_are_rejected() {
        let mut chart = Chart::new(tokens(&["a", "b", "c"]));
        let id = chart.insert(sample_item(0, &["b", "a"]));
        assert!(id.is_none());
    }

    #[test]
    fn duplicate_insertion_resolves_to_existing_id() {
        let mut chart = Chart::new(tokens(&["a", "b"]));
        let first = chart.insert(sample_item(0, &["a"])).unwrap();
        let second = chart.insert(sample_item(1, &["a"])).unwrap();
        assert_eq!(first, second);
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn combine_memo_is_symmetric() {
        let mut chart = Chart::new(tokens(&["a"]));
        assert!(!chart.memoize_pair(1, 2));
        assert!(chart.memoize_pair(2, 1));
    }

    #[test]
    fn infix_check_respects_token_boundaries() {
        assert!(!is_infix(&tokens(&["a"]), &tokens(&["cat"])));
        assert!(is_infix(&tokens(&["a", "b"]), &tokens(&["x", "a", "b", "y"])));
    }

    #[test]
    fn infix_check_splits_joined_multi_word_entries() {
        // A single found_sequence entry can itself be a space-joined
        // multi-atom component value (as combine produces for a component
        // with more than one atom); it must still match word-for-word.
        let needle = vec![SmolStr::new("a b")];
        assert!(is_infix(&needle, &tokens(&["x", "a", "b", "y"])));
        assert!(!is_infix(&needle, &tokens(&["x", "ab", "y"])));
    }
}
