//! The MCFG grammar model: functions, rules, and the simplified grammar they
//! compile into.
//!
//! A grammar is built once from plain data (`FunctionSpec`/`RuleSpec`,
//! mirroring the externalizable shape a caller would read off a grammar
//! file or build programmatically) and is immutable and cheaply `Clone`
//! afterwards -- `Grammar` is an `Arc` handle over its rule/function tables,
//! so independent parses can share one grammar without synchronization.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::GrammarError;
use crate::limits::ParseLimits;
use crate::simplify::simplify;

pub type RuleId = usize;
pub type FunctionId = usize;

/// One atom within a function's result vector: either a literal terminal or
/// a reference to a component of one of the function's formal arguments.
/// After substitution during predict/combine, a realized placeholder
/// becomes a `Terminal` holding the concrete substring (see `item::Binding`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Terminal(SmolStr),
    Placeholder { arg: SmolStr, component: usize },
}

impl Atom {
    pub fn as_terminal(&self) -> Option<&SmolStr> {
        match self {
            Atom::Terminal(t) => Some(t),
            Atom::Placeholder { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Atom::Terminal(_))
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Terminal(t) => write!(f, "{t}"),
            Atom::Placeholder { arg, component } => write!(f, "{arg}({component})"),
        }
    }
}

/// One component of a result vector: an ordered sequence of atoms.
pub type RawComponent = Vec<Atom>;

/// A named function: a formal-argument list plus a result vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: SmolStr,
    pub formal_args: Vec<SmolStr>,
    pub result_vector: Vec<RawComponent>,
}

impl Function {
    /// A function's arity in components (its dimension).
    pub fn dimension(&self) -> usize {
        self.result_vector.len()
    }
}

/// The right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleBody {
    /// Terminating rule: the symbol rewrites to a single-component vector
    /// holding this one terminal.
    Terminating(SmolStr),
    /// Nonterminating rule: a function reference plus the actual
    /// nonterminals bound to its formal arguments, positionally.
    Functional { function: FunctionId, actuals: Vec<SmolStr> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub symbol: SmolStr,
    pub body: RuleBody,
}

impl Rule {
    pub fn is_terminating(&self) -> bool {
        matches!(self.body, RuleBody::Terminating(_))
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            RuleBody::Terminating(t) => write!(f, "{} -> '{}'", self.symbol, t),
            RuleBody::Functional { actuals, .. } => {
                write!(f, "{} -> f{}({})", self.symbol, self.id, actuals.join(", "))
            }
        }
    }
}

/// Plain-data description of a function, the externalizable shape a grammar
/// is built from: a name, a formal-argument list, and a result vector where
/// each atom is either a terminal string or a placeholder of the syntactic
/// form `Name(i)`.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    pub name: String,
    pub formal_args: Vec<String>,
    pub result_vector: Vec<Vec<String>>,
}

/// Plain-data description of a rule: a left-hand symbol, a right-hand side
/// (either a terminal, for a terminating rule, or a function name), and the
/// actual nonterminals bound to the function's formal arguments.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub symbol: String,
    pub rhs: String,
    pub actuals: Vec<String>,
}

impl FunctionSpec {
    pub fn new(
        name: impl Into<String>,
        formal_args: Vec<impl Into<String>>,
        result_vector: Vec<Vec<impl Into<String>>>,
    ) -> Self {
        Self {
            name: name.into(),
            formal_args: formal_args.into_iter().map(Into::into).collect(),
            result_vector: result_vector
                .into_iter()
                .map(|component| component.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl RuleSpec {
    pub fn new(
        symbol: impl Into<String>,
        rhs: impl Into<String>,
        actuals: Vec<impl Into<String>>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            rhs: rhs.into(),
            actuals: actuals.into_iter().map(Into::into).collect(),
        }
    }
}

/// An immutable, simplified MCFG: terminals, functions, rules, the start
/// symbol, and the index from nonterminal to the rules whose left-hand side
/// it is.
#[derive(Debug, Clone)]
pub struct Grammar {
    inner: Arc<GrammarInner>,
}

#[derive(Debug)]
struct GrammarInner {
    terminals: HashSet<SmolStr>,
    functions: Vec<Function>,
    rules: Vec<Rule>,
    start_symbol: SmolStr,
    rules_by_symbol: HashMap<SmolStr, Vec<RuleId>>,
}

impl Grammar {
    /// Build a simplified grammar from plain data, with the default `ParseLimits`.
    pub fn build(
        terminals: Vec<impl Into<String>>,
        functions: Vec<FunctionSpec>,
        rules: Vec<RuleSpec>,
        start_symbol: impl Into<String>,
    ) -> Result<Grammar, GrammarError> {
        Self::build_with_limits(terminals, functions, rules, start_symbol, &ParseLimits::default())
    }

    pub fn build_with_limits(
        terminals: Vec<impl Into<String>>,
        functions: Vec<FunctionSpec>,
        rules: Vec<RuleSpec>,
        start_symbol: impl Into<String>,
        limits: &ParseLimits,
    ) -> Result<Grammar, GrammarError> {
        let terminals: HashSet<SmolStr> = terminals.into_iter().map(|t| SmolStr::new(t.into())).collect();
        let start_symbol = SmolStr::new(start_symbol.into());

        let mut function_ids: HashMap<SmolStr, FunctionId> = HashMap::new();
        let mut resolved_functions = Vec::with_capacity(functions.len());
        for spec in functions {
            let name = SmolStr::new(&spec.name);
            let formal_args: Vec<SmolStr> = spec.formal_args.iter().map(SmolStr::new).collect();
            let mut result_vector = Vec::with_capacity(spec.result_vector.len());
            for raw_component in &spec.result_vector {
                let mut component = Vec::with_capacity(raw_component.len());
                for raw_atom in raw_component {
                    component.push(parse_atom(raw_atom, &terminals, &formal_args)?);
                }
                result_vector.push(component);
            }
            if result_vector.len() > limits.max_dimension {
                return Err(GrammarError::MalformedGrammar(format!(
                    "function '{}' has dimension {} exceeding the configured ceiling of {}",
                    spec.name,
                    result_vector.len(),
                    limits.max_dimension
                )));
            }
            let id = resolved_functions.len();
            function_ids.insert(name.clone(), id);
            resolved_functions.push(Function { name, formal_args, result_vector });
        }

        let mut resolved_rules = Vec::with_capacity(rules.len());
        for (id, spec) in rules.into_iter().enumerate() {
            let symbol = SmolStr::new(&spec.symbol);
            let body = if terminals.contains(spec.rhs.as_str()) {
                RuleBody::Terminating(SmolStr::new(&spec.rhs))
            } else {
                let function_id = *function_ids.get(spec.rhs.as_str()).ok_or_else(|| {
                    GrammarError::MalformedGrammar(format!(
                        "rule for '{}' references unknown function '{}'",
                        spec.symbol, spec.rhs
                    ))
                })?;
                let function = &resolved_functions[function_id];
                let actuals: Vec<SmolStr> = spec.actuals.iter().map(SmolStr::new).collect();
                if actuals.len() != function.formal_args.len() {
                    return Err(GrammarError::MalformedGrammar(format!(
                        "rule for '{}' supplies {} actual(s) but function '{}' expects {}",
                        spec.symbol,
                        actuals.len(),
                        function.name,
                        function.formal_args.len()
                    )));
                }
                RuleBody::Functional { function: function_id, actuals }
            };
            resolved_rules.push(Rule { id, symbol, body });
        }

        let resolved_rules = simplify(resolved_rules, &resolved_functions, &start_symbol);

        let mut rules_by_symbol: HashMap<SmolStr, Vec<RuleId>> = HashMap::new();
        for rule in &resolved_rules {
            rules_by_symbol.entry(rule.symbol.clone()).or_default().push(rule.id);
        }

        Ok(Grammar {
            inner: Arc::new(GrammarInner {
                terminals,
                functions: resolved_functions,
                rules: resolved_rules,
                start_symbol,
                rules_by_symbol,
            }),
        })
    }

    pub fn start_symbol(&self) -> &SmolStr {
        &self.inner.start_symbol
    }

    pub fn terminals(&self) -> &HashSet<SmolStr> {
        &self.inner.terminals
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.inner.functions[id]
    }

    pub fn functions(&self) -> &[Function] {
        &self.inner.functions
    }

    /// All rules that survived simplification, in their original declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.inner.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.inner.rules.iter().find(|r| r.id == id)
    }

    pub fn rule_count(&self) -> usize {
        self.inner.rules.len()
    }

    /// The ids of the rules whose left-hand side is `symbol`, or an empty
    /// slice if the symbol has no surviving rules (e.g. it was simplified
    /// away, or never existed).
    pub fn rules_for(&self, symbol: &str) -> &[RuleId] {
        self.inner.rules_by_symbol.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.inner.rules.is_empty()
    }
}

/// Parse a single raw atom string into a terminal or a placeholder
/// reference: an atom is a placeholder only when it is *not* a declared
/// terminal and its shape matches `Name(index)` with `Name` among the
/// enclosing function's formal arguments.
fn parse_atom(raw: &str, terminals: &HashSet<SmolStr>, formal_args: &[SmolStr]) -> Result<Atom, GrammarError> {
    if terminals.contains(raw) {
        return Ok(Atom::Terminal(SmolStr::new(raw)));
    }
    match split_placeholder(raw) {
        Some((name, index)) if formal_args.iter().any(|a| a == name) => {
            Ok(Atom::Placeholder { arg: SmolStr::new(name), component: index })
        }
        Some((name, _)) => Err(GrammarError::MalformedGrammar(format!(
            "placeholder '{raw}' refers to '{name}', which is not a formal argument"
        ))),
        None => Err(GrammarError::MalformedPlaceholder(format!(
            "atom '{raw}' is neither a declared terminal nor shaped like Name(index)"
        ))),
    }
}

/// Split `"Name(3)"` into `("Name", 3)`. Returns `None` if the shape doesn't match.
fn split_placeholder(raw: &str) -> Option<(&str, usize)> {
    let open = raw.find('(')?;
    if !raw.ends_with(')') {
        return None;
    }
    let name = &raw[..open];
    let index_str = &raw[open + 1..raw.len() - 1];
    let index: usize = index_str.parse().ok()?;
    Some((name, index))
}

/// The set of actual nonterminal variables a rule's right-hand side refers
/// to, used by both grammar simplification and the engine's prediction
/// frontier. Terminals and the empty placeholder name are excluded.
pub fn rhs_symbols(rule: &Rule, functions: &[Function]) -> HashSet<SmolStr> {
    let mut symbols = HashSet::new();
    match &rule.body {
        RuleBody::Terminating(_) => {}
        RuleBody::Functional { function, actuals } => {
            let function = &functions[*function];
            for component in &function.result_vector {
                for atom in component {
                    if let Atom::Placeholder { arg, .. } = atom {
                        let position = function.formal_args.iter().position(|a| a == arg).expect(
                            "placeholders are validated against formal_args at grammar-build time",
                        );
                        let actual = &actuals[position];
                        if !actual.is_empty() {
                            symbols.insert(actual.clone());
                        }
                    }
                }
            }
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_function() {
        let err = Grammar::build(
            vec!["a"],
            vec![],
            vec![RuleSpec::new("S", "f1", Vec::<&str>::new())],
            "S",
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::MalformedGrammar(_)));
    }

    #[test]
    fn rejects_arity_mismatch() {
        let functions = vec![FunctionSpec::new("f1", vec!["A"], vec![vec!["A(0)"]])];
        let err = Grammar::build(
            vec!["a"],
            functions,
            vec![RuleSpec::new("S", "f1", vec!["A", "B"])],
            "S",
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::MalformedGrammar(_)));
    }

    #[test]
    fn rejects_placeholder_with_unknown_argument_name() {
        let functions = vec![FunctionSpec::new("f1", vec!["A"], vec![vec!["B(0)"]])];
        let err = Grammar::build(vec!["a"], functions, vec![], "S").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedGrammar(_)));
    }

    #[test]
    fn rejects_malformed_atom() {
        let functions = vec![FunctionSpec::new("f1", vec!["A"], vec![vec!["not-a-terminal-or-ref"]])];
        let err = Grammar::build(vec!["a"], functions, vec![], "S").unwrap_err();
        assert!(matches!(err, GrammarError::MalformedPlaceholder(_)));
    }

    #[test]
    fn builds_and_indexes_a_minimal_grammar() {
        let functions = vec![FunctionSpec::new("f3", Vec::<&str>::new(), vec![vec!["a"]])];
        let rules = vec![RuleSpec::new("S", "f3", Vec::<&str>::new())];
        let grammar = Grammar::build(vec!["a"], functions, rules, "S").unwrap();
        assert_eq!(grammar.rule_count(), 1);
        assert_eq!(grammar.rules_for("S").len(), 1);
        assert!(grammar.rules_for("Nonexistent").is_empty());
    }
}
