//! check command - Apply and verify a script, then print a commit log

use std::path::Path;

use anyhow::{bail, Result};

use super::{build_store, load_config, Context};
use crate::core::model::Commit;
use crate::core::verify::fast_verify;
use crate::ui::output;

/// Apply a script, verify the resulting store, and print its commits.
pub fn check(ctx: &Context, script: &Path) -> Result<()> {
    let config = load_config(ctx)?;
    let store = build_store(&config, script)?;

    let result = fast_verify(&store);
    if !result.ok {
        let errors: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
        bail!(
            "verification failed:\n{}",
            output::format_list(&errors, "  - ")
        );
    }

    let lines: Vec<String> = store.commits().into_iter().map(log_line).collect();
    if !lines.is_empty() {
        output::print(lines.join("\n"), ctx.verbosity);
    }

    output::print(
        format!(
            "ok: {} commits on {} branches, head {} on {}",
            store.commit_count(),
            store.branches().len(),
            store.head().map(|id| id.as_str()).unwrap_or("(none)"),
            store.current_branch()
        ),
        ctx.verbosity,
    );
    Ok(())
}

fn log_line(commit: &Commit) -> String {
    let parents = commit
        .parents
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut line = format!(
        "{:>4} {} [{}] {} <- {}",
        commit.seq,
        commit.id,
        commit.branch,
        commit.display_kind(),
        if parents.is_empty() { "-" } else { parents.as_str() }
    );
    if !commit.tags.is_empty() {
        line.push_str(&format!(" ({})", commit.tags.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{CommitArgs, GraphStore};

    #[test]
    fn log_line_shows_parents_and_tags() {
        let mut store = GraphStore::new();
        store.commit(CommitArgs::new("a").with_id("A")).unwrap();
        let b = store
            .commit(CommitArgs::new("b").with_id("B").with_tag("v1"))
            .unwrap();

        let line = log_line(&b);
        assert!(line.contains("B [main] NORMAL <- A"), "{line}");
        assert!(line.ends_with("(v1)"));
    }
}
