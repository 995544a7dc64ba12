//! Parse and grammar-construction limits.
//!
//! MCFG predict emits one active item per permutation of a rule's
//! component-order, which is exponential in dimension. `max_dimension`
//! bounds that fan-out at grammar-build time, once, rather than letting it
//! surprise a caller mid-parse. `max_sweeps_per_token` is a termination
//! backstop for hand-built grammars that never reach a fixed point.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_dimension: usize,
    pub max_sweeps_per_token: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        // All bundled fixtures top out at dimension 3 (the cross-serial and
        // movement grammars); 6 leaves headroom without inviting a
        // 720-item-per-predict permutation blowup by default.
        Self { max_dimension: 6, max_sweeps_per_token: 10_000 }
    }
}
