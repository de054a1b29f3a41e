//! The closed action set the oracle can choose from.

use tracing::warn;

use pricescout_core_types::CollapsedElement;

/// Every action the loop knows how to dispatch. The oracle addresses actions
/// by name; anything outside this set terminates the loop gracefully rather
/// than crashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentAction {
    /// Ask the oracle to read prices off the current capture.
    FindPrices,
    /// Ask the oracle to discover the next collapsed section.
    FindCollapsedElements,
    /// Click open a discovered chain and recapture.
    ExpandCollapsedElements,
    /// Terminal action: emit the final payload and stop.
    Done,
}

impl AgentAction {
    /// Resolve an oracle-supplied action name. `None` means unknown; the
    /// caller decides to terminate, not this type.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "find_prices" => Some(Self::FindPrices),
            "find_collapsed_elements" => Some(Self::FindCollapsedElements),
            "expand_collapsed_elements" => Some(Self::ExpandCollapsedElements),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FindPrices => "find_prices",
            Self::FindCollapsedElements => "find_collapsed_elements",
            Self::ExpandCollapsedElements => "expand_collapsed_elements",
            Self::Done => "done",
        }
    }
}

/// Parse the `expand_collapsed_elements` input into a chain.
///
/// The oracle is supposed to echo back the tree JSON it was given, but a
/// malformed echo must not abort the turn: the raw string becomes a single
/// bare-label leaf instead.
pub fn parse_expand_input(input: &str) -> CollapsedElement {
    match serde_json::from_str(input) {
        Ok(node) => node,
        Err(err) => {
            warn!(error = %err, input, "expand input is not a tree; falling back to bare label");
            CollapsedElement::leaf(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        for action in [
            AgentAction::FindPrices,
            AgentAction::FindCollapsedElements,
            AgentAction::ExpandCollapsedElements,
            AgentAction::Done,
        ] {
            assert_eq!(AgentAction::parse(action.name()), Some(action));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(AgentAction::parse("scroll_page"), None);
        assert_eq!(AgentAction::parse(""), None);
        assert_eq!(AgentAction::parse("Find_Prices"), None);
    }

    #[test]
    fn expand_input_parses_tree_json() {
        let node = parse_expand_input(r#"{"label":"Services","children":[{"label":"Lab tests","children":[]}]}"#);
        assert_eq!(node.label, "Services");
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn unparsable_expand_input_falls_back_to_leaf() {
        let node = parse_expand_input("Surgery and diagnostics");
        assert_eq!(node, CollapsedElement::leaf("Surgery and diagnostics"));

        // Valid JSON of the wrong shape also falls back rather than raising.
        let node = parse_expand_input(r#"["Surgery"]"#);
        assert_eq!(node, CollapsedElement::leaf(r#"["Surgery"]"#));
    }
}
