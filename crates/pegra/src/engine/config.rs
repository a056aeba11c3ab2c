/// Configuration for a single parse invocation.
///
/// The matcher is recursive; grammar nesting and input nesting both deepen
/// the call stack, so the depth is bounded explicitly and exceeding the
/// bound fails the invocation with
/// [`ParseError::RecursionLimit`](crate::error::ParseError::RecursionLimit)
/// instead of overflowing the thread stack.
///
/// # Example
///
/// ```rust,ignore
/// use pegra::ParseConfig;
///
/// // Default configuration
/// let config = ParseConfig::default();
///
/// // Tighter budget for untrusted inputs
/// let config = ParseConfig {
///     max_recursion_depth: 256,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Maximum matcher recursion depth. Every expression node entered counts
    /// one level.
    pub max_recursion_depth: usize,
}

/// Default recursion budget. Deep enough for heavily nested real-world
/// inputs, shallow enough to fail long before the thread stack does.
pub const DEFAULT_RECURSION_LIMIT: usize = 4096;

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_RECURSION_LIMIT,
        }
    }
}
