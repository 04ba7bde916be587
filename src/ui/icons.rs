//! Shared UI icons and emojis.
//!
//! Every icon has a plain-text fallback for terminals without emoji support.

use console::Emoji;

use crate::pipeline::Stage;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static REUSED: Emoji<'_, '_> = Emoji("♻️  ", "=");

// File indicators
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+");
pub static FILE_MISSING: Emoji<'_, '_> = Emoji("⬜ ", "-");

// Stage indicators
pub static RESEARCH: Emoji<'_, '_> = Emoji("🔎 ", "[R]");
pub static PLAN: Emoji<'_, '_> = Emoji("🗺️  ", "[P]");
pub static ARTICLE: Emoji<'_, '_> = Emoji("✍️  ", "[A]");
pub static REVISE: Emoji<'_, '_> = Emoji("🔄 ", "[V]");
pub static VERIFY: Emoji<'_, '_> = Emoji("🔗 ", "[S]");
pub static FEEDBACK: Emoji<'_, '_> = Emoji("💬 ", "[F]");
pub static NEXT: Emoji<'_, '_> = Emoji("👉 ", "->");

pub fn stage_icon(stage: Stage) -> &'static Emoji<'static, 'static> {
    match stage {
        Stage::Research => &RESEARCH,
        Stage::Plan => &PLAN,
        Stage::Article => &ARTICLE,
        Stage::Revise => &REVISE,
        Stage::Verify => &VERIFY,
        Stage::Feedback => &FEEDBACK,
    }
}
