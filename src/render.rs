//! Markdown rendering of an ordered fragment sequence.

use crate::fragment::ContentFragment;
use chrono::{DateTime, Utc};

pub fn render_markdown(
    title: &str,
    fragments: &[ContentFragment],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = format!(
        "# {}\n\n_Generated {}_\n",
        title,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    for fragment in fragments {
        out.push_str(&format!("\n## {}\n\n", fragment.title));
        let body = fragment.body.trim_end();
        if !body.is_empty() {
            out.push_str(body);
            out.push('\n');
        }
    }
    out
}
