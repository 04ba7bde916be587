//! Prompt templates and fixed document wrappers for each stage.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::util::excerpt;

/// Placeholder used in the revision prompt when no remarks exist.
pub const NO_FEEDBACK: &str = "No feedback was provided.";

/// Character budgets for upstream excerpts embedded in prompts.
///
/// Revision and verification prompts always carry the full article and are
/// not limited here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptLimits {
    #[serde(default = "default_research_for_plan")]
    pub research_for_plan: usize,
    #[serde(default = "default_research_for_article")]
    pub research_for_article: usize,
    #[serde(default = "default_plan_for_article")]
    pub plan_for_article: usize,
    #[serde(default = "default_article_for_persona")]
    pub article_for_persona: usize,
    #[serde(default = "default_restyle")]
    pub article_for_restyle: usize,
    #[serde(default = "default_restyle")]
    pub plan_for_restyle: usize,
}

fn default_research_for_plan() -> usize {
    1000
}

fn default_research_for_article() -> usize {
    800
}

fn default_plan_for_article() -> usize {
    800
}

fn default_article_for_persona() -> usize {
    1000
}

fn default_restyle() -> usize {
    500
}

impl Default for ExcerptLimits {
    fn default() -> Self {
        Self {
            research_for_plan: default_research_for_plan(),
            research_for_article: default_research_for_article(),
            plan_for_article: default_plan_for_article(),
            article_for_persona: default_article_for_persona(),
            article_for_restyle: default_restyle(),
            plan_for_restyle: default_restyle(),
        }
    }
}

pub fn research_prompt(topic: &str) -> String {
    format!(
        r#"Please provide comprehensive research on the topic: "{topic}"

Include:
- Current trends and statistics
- Expert perspectives
- Recent developments
- Practical applications
- Challenges and considerations

Format the response for use in a professional LinkedIn article."#
    )
}

/// Research prompt for a reviewer-requested retry: the reviewer's own prompt
/// when given, otherwise a request for a different angle.
pub fn research_retry_prompt(topic: &str, direction: &str) -> String {
    let direction = direction.trim();
    if direction.is_empty() {
        format!(
            r#"Please provide comprehensive research on the topic: "{topic}" - try a different approach focusing on emerging trends and innovations."#
        )
    } else {
        direction.to_string()
    }
}

pub fn plan_prompt(
    topic: &str,
    research: &str,
    skeleton: Option<&str>,
    limits: &ExcerptLimits,
) -> String {
    focused_plan_prompt(topic, research, skeleton, None, limits)
}

/// Plan prompt steered toward `focus`, e.g. "technical depth".
pub fn plan_focus_prompt(
    topic: &str,
    research: &str,
    skeleton: Option<&str>,
    focus: &str,
    limits: &ExcerptLimits,
) -> String {
    let focus = match focus.trim() {
        "" => "a fresh angle",
        focus => focus,
    };
    focused_plan_prompt(topic, research, skeleton, Some(focus), limits)
}

fn focused_plan_prompt(
    topic: &str,
    research: &str,
    skeleton: Option<&str>,
    focus: Option<&str>,
    limits: &ExcerptLimits,
) -> String {
    let focus = focus.map(|f| format!(" focused on {f}")).unwrap_or_default();
    let skeleton_note = skeleton
        .map(|s| format!("\nIncorporate these skeleton points:\n{s}\n"))
        .unwrap_or_default();
    format!(
        r#"Based on this research:
{research}

Create a detailed article plan{focus} for a LinkedIn post about: "{topic}"

The plan should include:
- Compelling headline options
- Hook/opening statement
- 3-5 main sections with key points
- Supporting statistics to include
- Strong closing and call-to-action
- Suggested hashtags
{skeleton_note}
Format as Markdown with clear structure."#,
        research = excerpt(research, limits.research_for_plan),
    )
}

pub fn article_prompt(topic: &str, research: &str, plan: &str, limits: &ExcerptLimits) -> String {
    format!(
        r#"Write a professional LinkedIn article based on:

Topic: {topic}

Research findings:
{research}

Article plan:
{plan}

Create a complete, engaging LinkedIn article that:
- Starts with a compelling hook
- Is 800-1200 words
- Follows the provided plan structure
- Includes relevant data points and examples
- Has a strong call-to-action at the end
- Uses short paragraphs for readability
- Is professional yet conversational
- Ends with relevant hashtags

Write the complete article ready to post on LinkedIn."#,
        research = excerpt(research, limits.research_for_article),
        plan = excerpt(plan, limits.plan_for_article),
    )
}

/// Rewrite of the current article in a reviewer-chosen style.
pub fn article_style_prompt(
    topic: &str,
    article: &str,
    plan: &str,
    style: &str,
    limits: &ExcerptLimits,
) -> String {
    let style = match style.trim() {
        "" => "more engaging",
        style => style,
    };
    format!(
        r#"Rewrite this LinkedIn article with a {style} style:

Topic: {topic}

Current article:
{article}

Plan:
{plan}

Rewrite the complete article to be {style} while maintaining all key points.
The article should still be 800-1200 words and include hashtags."#,
        article = excerpt(article, limits.article_for_restyle),
        plan = excerpt(plan, limits.plan_for_restyle),
    )
}

/// Revision prompt. Article and remarks are embedded in full.
pub fn revision_prompt(topic: &str, article: &str, remarks: &str) -> String {
    format!(
        r#"Revise this LinkedIn article about "{topic}" using the author's feedback.

CURRENT ARTICLE:
{article}

AUTHOR FEEDBACK:
{remarks}

Rewrite the complete article so that it:
- Addresses every point raised in the feedback
- Keeps the strengths the feedback calls out
- Stays 800-1200 words with short, readable paragraphs
- Keeps a strong call-to-action and relevant hashtags

Return only the revised article, ready to post on LinkedIn."#
    )
}

pub fn verification_prompt(topic: &str, article: &str) -> String {
    format!(
        r#"Analyze this LinkedIn article about "{topic}" and:

1. Extract ALL statistics, percentages, numbers, and specific claims (e.g., "40% adoption", "2023 data", "Apple reported")
2. For each claim, provide:
   - The exact claim from the article
   - Verification status: ✓ VERIFIED, ⚠️ LIKELY (common knowledge), or ❓ NEEDS REVIEW
   - Suggested source or reference
   - Direct link (if available) or how to find it

Format as a structured list.

ARTICLE:
{article}

Provide the verification results in clear markdown format with sections for each claim."#
    )
}

/// Wrap raw verification output in the sources document.
pub fn sources_document(topic: &str, verification: &str, generated_at: DateTime<Local>) -> String {
    format!(
        r#"# Sources & Verification: {topic}

## Statistics & Claims Verification

Below are the key statistics, percentages, and claims extracted from the article, along with verification status and sources.

---

{verification}

---

## How to Use This File

✓ **VERIFIED** = Confirmed accurate, source linked
⚠️ **LIKELY** = Common industry knowledge, generally accepted
❓ **NEEDS REVIEW** = Could not find immediate source, should fact-check before publishing

## Next Steps

1. Review each claim marked with ❓
2. Use the suggested sources to verify or find better references
3. Add direct links to your article using [text](url) format
4. Update this file as you find more sources
5. Once all claims are verified, your article is ready to post!

---

*Generated on: {timestamp}*
"#,
        timestamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
