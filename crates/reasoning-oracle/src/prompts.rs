//! Prompt templates and context renderers for the oracle calls.

use pricescout_core_types::{CollapsedElement, TranscriptEntry};

/// System instruction for the one-off site description call.
pub const SITE_DESCRIPTION_PROMPT: &str = r#"You are an AI model tasked with generating a brief description of a website based on its screenshot. Your task is to:

1. **Analyze the Screenshot**: Carefully examine the screenshot of the website pricing page to understand the primary focus of what it's selling.
2. **Identify Key Elements**: Identify the main products or services being presented on the page. Pay attention to any prominent headings, banners, or highlighted sections that indicate the purpose of the site.
3. **Generate a Description**: Write 2-3 sentences that describe the website's main purpose, the type of products or services it offers, and any notable features. Ensure that the description is concise and accurately reflects what is visible on the screenshot."#;

/// System instruction for the ReAct controller.
pub const REACT_AGENT_PROMPT: &str = r#"You are an AI agent tasked with finding pricing information on a website. You have access to the following actions:

find_prices(): Analyze the screenshot and identify up to 3 services with their corresponding prices.

find_collapsed_elements(): Examine the screenshot and identify a collapsed element that is likely to contain pricing information when expanded.

expand_collapsed_elements({ "label": "Diagnostics", "children": [] }): Expand the collapsed elements and return a new screenshot which might contain prices. Takes as argument the response from find_collapsed_elements().

done(result): Returns the final result of the agent.

Use the following format:

Question: [The input question you must answer]
Thought: [Your reasoning about what to do next]
Action: [The action to take (find_prices, find_collapsed_elements etc)]
Action Input: [The input for the action. Empty if it is not required]
Observation: [The result of the action]
... (This Thought/Action/Action Input/Observation can repeat as needed)
Thought: [Your final reasoning]
Final Answer: [Your final answer to the original question]"#;

/// Price-extraction instruction, parameterized by the site description.
pub fn build_find_prices_prompt(site_description: &str) -> String {
    format!(
        r#"You are an AI model tasked with identifying up to three services with their prices from a website screenshot. Your task is as follows:

1. **Scan the Screenshot**: Carefully analyze the screenshot for any visible price values. These prices could be in any common format, such as "$100", "100 USD", "£75", "2500 RUB" etc.
2. **Identify Services**: Identify and list up to three services that are associated with these prices. Ensure that the services are clearly defined and located near the price values.
3. **Return the Information**: If you find services with prices, return a list of the service names along with their associated prices. If a service includes a duration then concatenate it to the service name the same way it's displayed on the page.
4. **No Prices Detected**: If no visible prices are found on the screenshot check if there are collapsed items that might hide the prices and if yes then return a message: "No prices are visible. The prices may be hidden under collapsed elements."

<website_description>
{site_description}
</website_description>

### Note:
Do not invent or assume any information not present in the screenshot."#
    )
}

/// Collapsed-element discovery instruction, carrying the already-detected
/// chains and the branch currently under exploration.
pub fn build_identify_collapsed_prompt(
    site_description: &str,
    known_roots: &[CollapsedElement],
    current_branch: Option<&CollapsedElement>,
) -> String {
    let mut prompt = format!(
        r#"You are an AI model tasked with identifying one collapsed element from a website screenshot. Your task is as follows:

1. **Scan the Screenshot**: Analyze the screenshot for any collapsed element that requires interaction (such as clicking) to reveal additional content. These elements are typically related to categories of services or products. Do not consider sidebars, navigation blocks, or footers.
2. **Focus on Sub-Categories**: If a collapsed element is already expanded but contains sub-categories that are still collapsed, return the whole tree with the first collapsed sub-category you find. This should be done regardless of how deep the nesting goes.
3. **Return the Tree**: Identify and return the tree of collapsed elements, exactly as it appears on the screenshot, including the category and its sub-categories with only one child on each level.
4. **Check Current Collapsed Branch**: If <current_collapsed_branch> is provided, examine the screenshot to see if this element is expanded. If it is expanded and no prices are visible, consider any tables, lists, or rows within it as potential collapsed elements. Return the first collapsed sub-category found within this branch, regardless of depth.

<website_description>
{site_description}
</website_description>
"#
    );

    if !known_roots.is_empty() {
        let chains = known_roots
            .iter()
            .map(CollapsedElement::chain_path)
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str(&format!(
            "\n<already_detected_collapsed_elements>\n{chains}\n</already_detected_collapsed_elements>\n"
        ));
    }

    prompt.push_str(
        r#"
### Note:
It is crucial that you do not invent or add any text that is not present on the screenshot. The label of the collapsed element must be an exact match to what is on the page, with no modifications. Do not include counters or numbers in the label unless they are explicitly present in the screenshot.

### EXAMPLE OUTPUT:
{ "label": "Diagnostics", "children": [] }

### EXAMPLE OUTPUT WITH SUB-CATEGORIES:
{ "label": "Diagnostics", "children": [{ "label": "Lab tests", "children": [{ "label": "Blood panel", "children": [] }] }] }
"#,
    );

    if let Some(branch) = current_branch {
        prompt.push_str(&format!(
            "\n<current_collapsed_branch>\n{}\n</current_collapsed_branch>\n",
            branch.chain_path()
        ));
    }

    prompt
}

/// Renders the transcript into the ReAct user prompt: the question, every
/// prior thought/action/input/observation, and a trailing `Thought:` cue.
pub fn render_transcript(question: &str, transcript: &[TranscriptEntry]) -> String {
    let mut prompt = format!("Question: {question}\n");
    for entry in transcript {
        prompt.push_str(&format!(
            "Thought: {}.\nAction: {}.\nAction Input: {}.\nObservation: {}.\n",
            entry.thought, entry.action, entry.input, entry.observation
        ));
    }
    prompt.push_str("Thought: \n");
    prompt
}
