//! Lint: battle core sources must not name the terminal or browser crates.
//!
//! This is a source-text check on grid, solver, combat, state machine,
//! presentation contract, dialog and RNG. It does not follow imports: the
//! machine reads `crate::input`, whose click map is built on a ratatui
//! `Rect`. Only `render.rs`, `mod.rs` (the ratzilla glue) and the
//! crate-level frontend files may name `ratzilla`, `ratatui` or `web_sys`.

use std::fs;
use std::path::Path;

const CORE_FILES: &[&str] = &[
    "grid.rs",
    "rng.rs",
    "solver.rs",
    "combat.rs",
    "machine.rs",
    "presentation.rs",
    "dialog.rs",
];

const FORBIDDEN: &[&str] = &["ratzilla", "web_sys", "ratatui"];

/// Lines mentioning a forbidden crate, skipping comments.
fn find_frontend_refs(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("//") && FORBIDDEN.iter().any(|f| trimmed.contains(f))
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

#[test]
fn battle_core_is_frontend_free() {
    let battle_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/battle");
    let mut all_violations = Vec::new();

    for name in CORE_FILES {
        let path = battle_dir.join(name);
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
        for (line_num, line) in find_frontend_refs(&source) {
            all_violations.push((name, line_num, line));
        }
    }

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Battle core files reference frontend crates.\n\
             Move drawing and browser access into render.rs or the presenter.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  src/battle/{}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_import() {
        let source = "use ratzilla::ratatui::Frame;\nfn f() {}";
        assert_eq!(find_frontend_refs(source), vec![(1, "use ratzilla::ratatui::Frame;".to_string())]);
    }

    #[test]
    fn detects_inline_path() {
        let source = "fn f() {\n    web_sys::console::log_1(&\"x\".into());\n}";
        assert_eq!(find_frontend_refs(source).len(), 1);
    }

    #[test]
    fn ignores_comments() {
        let source = "// drawn with ratzilla\n/// see web_sys docs";
        assert!(find_frontend_refs(source).is_empty());
    }
}
