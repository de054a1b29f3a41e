//! Configuration for the agent loop.

/// Loop-level settings.
#[derive(Debug, Clone)]
pub struct AgentLoopConfig {
    /// Hard bound on loop iterations. The oracle is an untrusted, possibly
    /// non-terminating decision source, so the loop never runs unbounded.
    /// Default: 25
    pub max_steps: u32,

    /// The question rendered at the top of every reasoning prompt.
    pub question: String,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_steps: 25,
            question: "Find up to 3 services with prices on website".to_string(),
        }
    }
}

impl AgentLoopConfig {
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }
}
