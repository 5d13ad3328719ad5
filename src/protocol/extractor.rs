// src/protocol/extractor.rs

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::protocol::CommandPlan;

/// Fenced blocks tagged with a shell dialect, or untagged.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:bash|sh|cmd|powershell)?\r?\n(.*?)\r?\n```")
        .expect("fenced block pattern is valid")
});

/// Pulls commands out of every matching fenced block, in document order.
///
/// Returns an empty plan when nothing matches. This is a pattern match, not a
/// markdown parser: malformed or nested fences are taken as they come.
pub fn extract(text: &str) -> CommandPlan {
    let plan = CommandPlan::from_lines(
        FENCED_BLOCK
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .flat_map(|body| body.as_str().lines()),
    );
    debug!(commands = plan.len(), "extracted commands");
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(plan: &CommandPlan) -> Vec<&str> {
        plan.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn no_fence_yields_empty_plan() {
        assert!(extract("just run ls -la in your terminal").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn tagged_block_lines_are_trimmed_in_order() {
        let text = "Here you go:\n```bash\n  mkdir demo \n\n\tcd demo\ntouch a.txt\n```\nDone.";
        assert_eq!(lines(&extract(text)), vec!["mkdir demo", "cd demo", "touch a.txt"]);
    }

    #[test]
    fn untagged_and_dialect_tags_all_match() {
        for tag in ["", "sh", "cmd", "powershell"] {
            let text = format!("```{tag}\ndir\n```");
            assert_eq!(lines(&extract(&text)), vec!["dir"], "tag {tag:?}");
        }
    }

    #[test]
    fn other_language_tags_are_ignored() {
        assert!(extract("```python\nprint('hi')\n```").is_empty());
    }

    #[test]
    fn multiple_blocks_concatenate_in_document_order() {
        let text = "```bash\necho one\n```\ntext between\n```sh\necho two\necho three\n```";
        assert_eq!(
            lines(&extract(text)),
            vec!["echo one", "echo two", "echo three"]
        );
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = "```bash\r\necho one\r\necho two\r\n```";
        assert_eq!(lines(&extract(text)), vec!["echo one", "echo two"]);
    }

    #[test]
    fn whitespace_only_block_is_empty() {
        assert!(extract("```bash\n   \n\t\n```").is_empty());
    }
}
