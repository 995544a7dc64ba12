//! Hand-built MCFGs exercising the parser's reach: plain context-free
//! recursion, genuinely non-context-free cross-serial and copy languages,
//! a two-component fallback grammar, natural-language coordination, and a
//! movement/crossing-dependency grammar with a competing non-movement
//! start rule. Used by both the unit tests in this crate and the
//! integration tests under `tests/`.

use crate::grammar::{FunctionSpec, Grammar, RuleSpec};

pub struct FixtureCase {
    pub input: &'static str,
    pub accepts: bool,
}

pub struct Fixture {
    pub name: &'static str,
    pub grammar: Grammar,
    pub cases: Vec<FixtureCase>,
}

pub fn all_fixtures() -> Vec<Fixture> {
    vec![copy_language(), cross_serial(), two_component_fallback(), coordination(), movement()]
}

/// `{ www | w in {a,b}+ }`: a nonterminal `A` derives a triple of identical
/// copies of `w`, and `S` concatenates the three copies. Not context-free.
pub fn copy_language() -> Fixture {
    let functions = vec![
        FunctionSpec::new("f1", vec!["A"], vec![vec!["A(0)", "A(1)", "A(2)"]]),
        FunctionSpec::new("f2", vec!["A"], vec![vec!["a", "A(0)"], vec!["a", "A(1)"], vec!["a", "A(2)"]]),
        FunctionSpec::new("f3", vec!["A"], vec![vec!["b", "A(0)"], vec!["b", "A(1)"], vec!["b", "A(2)"]]),
        FunctionSpec::new("f4", Vec::<&str>::new(), vec![vec!["a"], vec!["a"], vec!["a"]]),
        FunctionSpec::new("f5", Vec::<&str>::new(), vec![vec!["b"], vec!["b"], vec!["b"]]),
    ];
    let rules = vec![
        RuleSpec::new("S", "f1", vec!["A"]),
        RuleSpec::new("A", "f2", vec!["A"]),
        RuleSpec::new("A", "f3", vec!["A"]),
        RuleSpec::new("A", "f4", Vec::<&str>::new()),
        RuleSpec::new("A", "f5", Vec::<&str>::new()),
    ];
    let grammar = Grammar::build(vec!["a", "b"], functions, rules, "S").expect("fixture grammar must be well-formed");
    Fixture {
        name: "copy_language",
        grammar,
        cases: vec![FixtureCase { input: "a b a b a b", accepts: true }],
    }
}

/// Cross-serial dependency: `S -> f1(C, A)` where `C`'s two components
/// track a `b`-run of length `n >= 2` around a shared `c`, and `A` is a
/// single literal `a`. `C`'s base case fixes `n = 2`, so `n = 1` is
/// unreachable -- the shortest input that parses is one `b b c` block on
/// each side of the `a`, which also doubles as the negative fixture below.
pub fn cross_serial() -> Fixture {
    let functions = vec![
        FunctionSpec::new("f1", vec!["C", "A"], vec![vec!["C(0)", "A(0)", "C(1)"]]),
        FunctionSpec::new("f2", vec!["A"], vec![vec!["a", "A(0)"]]),
        FunctionSpec::new("f3", Vec::<&str>::new(), vec![vec!["a"]]),
        FunctionSpec::new("f4", vec!["C"], vec![vec!["b", "C(0)"], vec!["b", "C(1)"]]),
        FunctionSpec::new("f5", vec!["C"], vec![vec!["b", "b", "C(0)"], vec!["b", "b", "C(1)"]]),
        FunctionSpec::new("f6", Vec::<&str>::new(), vec![vec!["b", "b", "c"], vec!["b", "b", "c"]]),
    ];
    let rules = vec![
        RuleSpec::new("S", "f1", vec!["C", "A"]),
        RuleSpec::new("A", "f2", vec!["A"]),
        RuleSpec::new("A", "f3", Vec::<&str>::new()),
        RuleSpec::new("C", "f4", vec!["C"]),
        RuleSpec::new("C", "f5", vec!["C"]),
        RuleSpec::new("C", "f6", Vec::<&str>::new()),
    ];
    let grammar =
        Grammar::build(vec!["a", "b", "c"], functions, rules, "S").expect("fixture grammar must be well-formed");
    Fixture {
        name: "cross_serial",
        grammar,
        cases: vec![
            FixtureCase { input: "b b c a b b c", accepts: true },
            FixtureCase { input: "b c a b c", accepts: false },
        ],
    }
}

/// Two-component `B` with a single-component `C` fallback: `S -> f1(B)`
/// concatenates `B`'s two components, `B` can be realized directly
/// (`f2 = [[a],[b]]`), recurse through itself (`f3`), or route through the
/// single-component fallback `C` (`f4`).
pub fn two_component_fallback() -> Fixture {
    let functions = vec![
        FunctionSpec::new("f1", vec!["B"], vec![vec!["B(0)", "B(1)"]]),
        FunctionSpec::new("f2", Vec::<&str>::new(), vec![vec!["a"], vec!["b"]]),
        FunctionSpec::new("f3", vec!["B"], vec![vec!["B(0)"], vec!["B(1)"]]),
        FunctionSpec::new("f4", vec!["C"], vec![vec!["C(0)"], vec!["a"]]),
    ];
    let rules = vec![
        RuleSpec::new("S", "f1", vec!["B"]),
        RuleSpec::new("B", "f2", Vec::<&str>::new()),
        RuleSpec::new("B", "f3", vec!["B"]),
        RuleSpec::new("B", "f4", vec!["C"]),
        RuleSpec::new("C", "a", Vec::<&str>::new()),
    ];
    let grammar = Grammar::build(vec!["a", "b"], functions, rules, "S").expect("fixture grammar must be well-formed");
    Fixture {
        name: "two_component_fallback",
        grammar,
        cases: vec![FixtureCase { input: "a b", accepts: true }],
    }
}

/// A small natural-language fragment covering determiner/adjective-stacked
/// noun phrases, a two-word verb, and `and`-coordination of noun phrases
/// via `NP -> f6(NP, NP)`, all single-component (ordinary context-free
/// shape -- MCFG's extra power is exercised by the other fixtures).
pub fn coordination() -> Fixture {
    let functions = vec![
        FunctionSpec::new("f_s", vec!["NP", "VP"], vec![vec!["NP(0)", "VP(0)"]]),
        FunctionSpec::new("f6", vec!["NP1", "NP2"], vec![vec!["NP1(0)", "and", "NP2(0)"]]),
        FunctionSpec::new("f_np", vec!["Det", "NBar"], vec![vec!["Det(0)", "NBar(0)"]]),
        FunctionSpec::new("f_adjn", vec!["Adj", "NBar"], vec![vec!["Adj(0)", "NBar(0)"]]),
        FunctionSpec::new("f_vp", vec!["NP"], vec![vec!["will", "see", "NP(0)"]]),
    ];
    let rules = vec![
        RuleSpec::new("S", "f_s", vec!["NP", "VP"]),
        RuleSpec::new("NP", "Miki", Vec::<&str>::new()),
        RuleSpec::new("NP", "f6", vec!["NP", "NP"]),
        RuleSpec::new("NP", "f_np", vec!["Det", "NBar"]),
        RuleSpec::new("NBar", "dog", Vec::<&str>::new()),
        RuleSpec::new("NBar", "cat", Vec::<&str>::new()),
        RuleSpec::new("NBar", "cow", Vec::<&str>::new()),
        RuleSpec::new("NBar", "f_adjn", vec!["Adj", "NBar"]),
        RuleSpec::new("Adj", "red", Vec::<&str>::new()),
        RuleSpec::new("Adj", "beautiful", Vec::<&str>::new()),
        RuleSpec::new("Det", "the", Vec::<&str>::new()),
        RuleSpec::new("VP", "f_vp", vec!["NP"]),
    ];
    let terminals =
        vec!["Miki", "and", "the", "dog", "cat", "cow", "red", "beautiful", "will", "see"];
    let grammar = Grammar::build(terminals, functions, rules, "S").expect("fixture grammar must be well-formed");
    Fixture {
        name: "coordination",
        grammar,
        cases: vec![FixtureCase {
            input: "Miki and the dog and the cat will see the red beautiful cow",
            accepts: true,
        }],
    }
}

/// Crossing dependency via movement: `IP` splits a clause into subject,
/// verb, and extracted object across three components; `S -> f0(IP)`
/// fronts the object and inserts `that`, producing a relative clause,
/// while the competing `S -> f5(IP)` rule realizes the same `IP` as a
/// plain declarative with no movement.
pub fn movement() -> Fixture {
    let functions = vec![
        FunctionSpec::new("f0", vec!["IP"], vec![vec!["IP(2)", "that", "IP(0)", "IP(1)"]]),
        FunctionSpec::new("f5", vec!["IP"], vec![vec!["IP(0)", "IP(1)", "IP(2)"]]),
        FunctionSpec::new("f1", vec!["NP", "VP"], vec![vec!["NP(0)"], vec!["VP(0)"], vec!["VP(1)"]]),
        FunctionSpec::new("f_vp", vec!["Det", "N"], vec![vec!["read"], vec!["Det(0)", "N(0)"]]),
    ];
    let rules = vec![
        RuleSpec::new("S", "f0", vec!["IP"]),
        RuleSpec::new("S", "f5", vec!["IP"]),
        RuleSpec::new("IP", "f1", vec!["NP", "VP"]),
        RuleSpec::new("NP", "I", Vec::<&str>::new()),
        RuleSpec::new("VP", "f_vp", vec!["Det", "N"]),
        RuleSpec::new("Det", "the", Vec::<&str>::new()),
        RuleSpec::new("N", "book", Vec::<&str>::new()),
    ];
    let terminals = vec!["I", "read", "the", "book", "that"];
    let grammar = Grammar::build(terminals, functions, rules, "S").expect("fixture grammar must be well-formed");
    Fixture {
        name: "movement",
        grammar,
        cases: vec![
            FixtureCase { input: "the book that I read", accepts: true },
            FixtureCase { input: "I read the book", accepts: true },
        ],
    }
}
