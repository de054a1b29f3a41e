//! Expansion executor: simulated clicks along a collapsed-section chain.

use tracing::debug;

use pricescout_core_types::{ArtifactLocator, CollapsedElement};

use crate::capture::CapturePipeline;
use crate::errors::AgentError;

/// DOM script template; `__EXPANSION_TARGET__` is replaced with the chain as
/// JSON before evaluation.
///
/// Two phases. First, every currently-invisible element gets a mutation
/// observer that forces it back to visible if a later click collapses it;
/// accordion widgets with shared state routinely fold an already-expanded
/// sibling when another one opens. Second, the chain is walked root to leaf,
/// clicking every element whose trimmed, case-folded text equals the label
/// and which carries no navigational `href` (or an empty one). A label that
/// matches nothing is silently skipped: the page structure may have shifted,
/// and expansion stays best-effort.
const EXPANSION_JS: &str = r#"(function () {
  function isVisible(el) {
    const style = window.getComputedStyle(el);
    return style.display !== 'none' &&
           style.visibility !== 'hidden' &&
           style.opacity !== '0';
  }

  function watchHidden(el) {
    const observer = new MutationObserver(() => {
      if (!isVisible(el)) {
        el.style.display = 'block';
        el.style.visibility = 'visible';
        el.style.opacity = '1';
      }
    });
    observer.observe(el, {
      attributes: true,
      attributeOldValue: true,
      attributeFilter: ['style', 'class']
    });
    return observer;
  }

  function expandChain(node) {
    const label = node.label.trim().toLowerCase();
    const matches = [...document.querySelectorAll('*')].filter((el) => {
      const text = (el.textContent || '').trim().toLowerCase();
      if (text !== label) return false;
      const hasHref = el.hasAttribute('href');
      return !hasHref || el.getAttribute('href') === '';
    });
    matches.forEach((el) => el.click());
    node.children.forEach(expandChain);
  }

  [...document.querySelectorAll('*')].forEach((el) => {
    if (!isVisible(el)) {
      el._expansionObserver = watchHidden(el);
    }
  });

  expandChain(__EXPANSION_TARGET__);
  return true;
})()"#;

/// Render the expansion script for one root-to-leaf chain.
pub fn expansion_script(path: &CollapsedElement) -> String {
    let payload = serde_json::to_string(path)
        .unwrap_or_else(|_| String::from(r#"{"label":"","children":[]}"#));
    EXPANSION_JS.replace("__EXPANSION_TARGET__", &payload)
}

/// Expand every node along `path` and take a fresh capture of the result.
pub async fn expand_path(
    pipeline: &mut CapturePipeline,
    url: &str,
    path: &CollapsedElement,
) -> Result<ArtifactLocator, AgentError> {
    debug!(
        chain = %path.chain_path(),
        depth = path.chain_len(),
        "expanding collapsed section chain"
    );
    let script = expansion_script(path);
    pipeline.capture(url, Some(&script)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_chain_as_json() {
        let path = CollapsedElement::new(
            "Services",
            vec![CollapsedElement::leaf("Lab tests")],
        );
        let script = expansion_script(&path);
        assert!(script.contains(r#"{"label":"Services","children":[{"label":"Lab tests","children":[]}]}"#));
        assert!(!script.contains("__EXPANSION_TARGET__"));
    }

    #[test]
    fn script_matches_text_case_insensitively() {
        let script = expansion_script(&CollapsedElement::leaf("Prices"));
        assert!(script.contains(".trim().toLowerCase()"));
    }

    #[test]
    fn script_excludes_navigational_links() {
        let script = expansion_script(&CollapsedElement::leaf("Prices"));
        // Anchor navigation is skipped; empty-href clickables still match.
        assert!(script.contains("hasAttribute('href')"));
        assert!(script.contains("getAttribute('href') === ''"));
    }

    #[test]
    fn script_restores_clobbered_visibility() {
        let script = expansion_script(&CollapsedElement::leaf("Prices"));
        assert!(script.contains("MutationObserver"));
        assert!(script.contains("el.style.display = 'block'"));
        assert!(script.contains("el.style.visibility = 'visible'"));
        assert!(script.contains("el.style.opacity = '1'"));
        assert!(script.contains("attributeFilter: ['style', 'class']"));
    }

    #[test]
    fn script_survives_quotes_in_labels() {
        let script = expansion_script(&CollapsedElement::leaf(r#"Joe's "Special" Menu"#));
        assert!(script.contains(r#"Joe's \"Special\" Menu"#));
    }
}
