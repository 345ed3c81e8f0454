//! Dialog scripts: inline colour tags, `<delay>` pauses and a typewriter
//! player that reveals one character per tick of [`CHAR_DELAY_MS`].
//!
//! Script syntax: `<red>`, `<green>` and `<blue>` open a tinted span that the
//! matching close tag ends; a span left open runs to the end of its text.
//! `<delay>` ends the current text block and pauses for [`DELAY_MS`]; a span
//! still open at the delay continues from the start of the next block.
//! Any other tag-looking text is shown verbatim.

use super::presentation::Task;

pub const CHAR_DELAY_MS: f64 = 75.0;
pub const DELAY_MS: f64 = 3000.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("encountered </{0}> before <{0}> in dialog script")]
    UnmatchedClose(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TintColor {
    Red,
    Green,
    Blue,
}

impl TintColor {
    fn tag(self) -> &'static str {
        match self {
            TintColor::Red => "red",
            TintColor::Green => "green",
            TintColor::Blue => "blue",
        }
    }
}

/// A tinted character span. `len == None` runs to the end of the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tint {
    pub color: TintColor,
    pub start: usize,
    pub len: Option<usize>,
}

impl Tint {
    pub fn covers(&self, index: usize) -> bool {
        index >= self.start && self.len.map_or(true, |len| index < self.start + len)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptAction {
    ShowText { text: String, tints: Vec<Tint> },
    Delay { ms: f64 },
}

// ── Parsing ─────────────────────────────────────────────────

enum Token<'a> {
    Text(&'a str),
    Tag(&'a str),
}

/// Split on `<name>` / `</name>` where name is ASCII letters only.
fn tokenize(script: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = script;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let body = after.strip_prefix('/').unwrap_or(after);
        let name_len = body.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        let tag_len = (after.len() - body.len()) + name_len;
        if name_len > 0 && after[tag_len..].starts_with('>') {
            if open > 0 {
                tokens.push(Token::Text(&rest[..open]));
            }
            tokens.push(Token::Tag(&rest[open..open + tag_len + 2]));
            rest = &rest[open + tag_len + 2..];
        } else {
            tokens.push(Token::Text(&rest[..open + 1]));
            rest = after;
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    tokens
}

/// Parse a script into reveal and pause steps. Always yields at least one
/// `ShowText`, so an empty script clears the dialog.
pub fn parse_script(script: &str) -> Result<Vec<ScriptAction>, ScriptError> {
    let mut actions = Vec::new();
    let mut text = String::new();
    let mut tints: Vec<Tint> = Vec::new();
    let mut open: Option<usize> = None;

    for token in tokenize(script) {
        let tag = match token {
            Token::Text(t) => {
                text.push_str(t);
                continue;
            }
            Token::Tag(t) => t.to_ascii_lowercase(),
        };
        let chars = text.chars().count();
        let color = match tag.as_str() {
            "<red>" | "</red>" => Some(TintColor::Red),
            "<green>" | "</green>" => Some(TintColor::Green),
            "<blue>" | "</blue>" => Some(TintColor::Blue),
            _ => None,
        };
        match (tag.as_str(), color) {
            ("<delay>", _) => {
                // An open span carries on into the next block.
                let carried = open.map(|i| tints[i].color);
                actions.push(ScriptAction::ShowText {
                    text: std::mem::take(&mut text),
                    tints: std::mem::take(&mut tints),
                });
                actions.push(ScriptAction::Delay { ms: DELAY_MS });
                open = carried.map(|color| {
                    tints.push(Tint {
                        color,
                        start: 0,
                        len: None,
                    });
                    0
                });
            }
            (t, Some(color)) if t.starts_with("</") => {
                let Some(i) = open.take() else {
                    return Err(ScriptError::UnmatchedClose(color.tag()));
                };
                tints[i].len = Some(chars - tints[i].start);
            }
            (_, Some(color)) => {
                tints.push(Tint {
                    color,
                    start: chars,
                    len: None,
                });
                open = Some(tints.len() - 1);
            }
            (t, None) => text.push_str(t),
        }
    }

    if !text.is_empty() || actions.is_empty() {
        actions.push(ScriptAction::ShowText { text, tints });
    }
    Ok(actions)
}

// ── Player ──────────────────────────────────────────────────

/// Plays one script at a time. Starting a new script cancels the old task.
#[derive(Debug, Default)]
pub struct DialogPlayer {
    actions: Vec<ScriptAction>,
    step: usize,
    elapsed: f64,
    text: String,
    tints: Vec<Tint>,
    revealed: usize,
    task: Option<Task>,
}

impl DialogPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start revealing `script`. The returned task completes after the last
    /// step finishes, or is cancelled when another script supersedes it.
    pub fn play(&mut self, script: &str) -> Result<Task, ScriptError> {
        let actions = parse_script(script)?;
        self.cancel();
        self.actions = actions;
        self.step = 0;
        self.elapsed = 0.0;
        self.text.clear();
        self.tints.clear();
        self.revealed = 0;
        let task = Task::pending();
        self.task = Some(task.clone());
        self.enter_step();
        self.update(0.0);
        Ok(task)
    }

    /// Show the last text block of `script` at once, with no animation.
    pub fn set_text(&mut self, script: &str) -> Result<(), ScriptError> {
        let actions = parse_script(script)?;
        self.cancel();
        let last = actions.into_iter().rev().find_map(|a| match a {
            ScriptAction::ShowText { text, tints } => Some((text, tints)),
            ScriptAction::Delay { .. } => None,
        });
        let (text, tints) = last.unwrap_or_default();
        self.revealed = text.chars().count();
        self.text = text;
        self.tints = tints;
        Ok(())
    }

    /// Stop the current script where it is.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.actions.clear();
        self.step = 0;
    }

    pub fn is_playing(&self) -> bool {
        self.step < self.actions.len()
    }

    pub fn update(&mut self, delta_ms: f64) {
        if !self.is_playing() {
            return;
        }
        self.elapsed += delta_ms;

        while let Some(action) = self.actions.get(self.step) {
            let duration = match action {
                ScriptAction::ShowText { text, .. } => {
                    let len = text.chars().count();
                    self.revealed = ((self.elapsed / CHAR_DELAY_MS) as usize).min(len);
                    len as f64 * CHAR_DELAY_MS
                }
                ScriptAction::Delay { ms } => *ms,
            };
            if self.elapsed < duration {
                return;
            }
            self.elapsed -= duration;
            self.revealed = self.text.chars().count();
            self.step += 1;
            self.enter_step();
        }

        if let Some(task) = self.task.take() {
            task.complete();
        }
    }

    fn enter_step(&mut self) {
        if let Some(ScriptAction::ShowText { text, tints }) = self.actions.get(self.step) {
            self.text = text.clone();
            self.tints = tints.clone();
            self.revealed = 0;
        }
    }

    /// Text revealed so far.
    pub fn visible_text(&self) -> String {
        self.text.chars().take(self.revealed).collect()
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn tints(&self) -> &[Tint] {
        &self.tints
    }

    /// Tint for the character at `index` of the current text, if any.
    pub fn tint_at(&self, index: usize) -> Option<TintColor> {
        self.tints.iter().rev().find(|t| t.covers(index)).map(|t| t.color)
    }
}
