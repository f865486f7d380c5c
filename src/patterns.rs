//! Textual grammars for boxes, task identifiers and placeholders
//!
//! Every grammar is exposed as three explicitly distinct operations:
//! "starts with", "is exactly" and "contains". Callers must pick the right
//! one per call site; the three are never interchangeable.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Default project id when none is given on the command line.
pub const DEFAULT_PROJECT_ID: &str = "TODO";

const PROJECT_ID: &str = "[A-Z]{2,5}";
const BOX: &str = "\\[( |x|…)\\]";
const NUMBER_PLACEHOLDER: &str = "(?:\\?+|x+|X+|n+|N+)";

fn box_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{BOX}")).unwrap())
}

fn project_id_exact_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{PROJECT_ID}$")).unwrap())
}

/// A project identifier: 2-5 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(String);

impl ProjectId {
    /// Parses a string that is exactly a project id.
    pub fn parse(s: &str) -> Option<Self> {
        if project_id_exact_regex().is_match(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self(DEFAULT_PROJECT_ID.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The state encoded by a box marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxState {
    Unchecked,
    Checked,
    InProgress,
}

impl BoxState {
    fn from_contents(contents: &str) -> Option<Self> {
        match contents {
            " " => Some(Self::Unchecked),
            "x" => Some(Self::Checked),
            "…" => Some(Self::InProgress),
            _ => None,
        }
    }

    /// The literal marker as it appears in heading text.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Unchecked => "[ ]",
            Self::Checked => "[x]",
            Self::InProgress => "[…]",
        }
    }

    /// The tri-state checkbox as a list item `checked` field. The
    /// in-progress state has no structural encoding and maps to no box.
    pub fn as_checked(&self) -> Option<bool> {
        match self {
            Self::Unchecked => Some(false),
            Self::Checked => Some(true),
            Self::InProgress => None,
        }
    }
}

/// Returns the box at the start of `s`, with the byte offset just past it.
pub fn leading_box(s: &str) -> Option<(BoxState, usize)> {
    let caps = box_start_regex().captures(s)?;
    let whole = caps.get(0)?;
    let state = BoxState::from_contents(caps.get(1)?.as_str())?;
    Some((state, whole.end()))
}

/// Compiled matchers for one project id's grammars.
#[derive(Debug)]
pub struct Patterns {
    project_id: ProjectId,
    task_id_start: Regex,
    task_id_exact: Regex,
    task_id_contains: Regex,
    placeholder_start: Regex,
    placeholder_contains: Regex,
    box_task_id_start: Regex,
    box_placeholder_start: Regex,
}

impl Patterns {
    pub fn new(project_id: ProjectId) -> Self {
        let pid = project_id.as_str();
        let task_id = format!("{pid}-(?P<number>[0-9]+)");
        let placeholder = format!("{pid}-{NUMBER_PLACEHOLDER}");
        Self {
            project_id,
            task_id_start: Regex::new(&format!("^{task_id}")).unwrap(),
            task_id_exact: Regex::new(&format!("^{task_id}$")).unwrap(),
            task_id_contains: Regex::new(&task_id).unwrap(),
            placeholder_start: Regex::new(&format!("^{placeholder}")).unwrap(),
            placeholder_contains: Regex::new(&placeholder).unwrap(),
            box_task_id_start: Regex::new(&format!("^{BOX} {task_id}")).unwrap(),
            box_placeholder_start: Regex::new(&format!("^(?P<b>{BOX}) {placeholder}")).unwrap(),
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Starts-with: the literal task id at the start of `s`, with the byte
    /// offset just past it.
    pub fn leading_task_id<'a>(&self, s: &'a str) -> Option<(&'a str, usize)> {
        let m = self.task_id_start.find(s)?;
        Some((m.as_str(), m.end()))
    }

    /// Is-exactly: `s` is nothing but a task id.
    pub fn is_task_id(&self, s: &str) -> bool {
        self.task_id_exact.is_match(s)
    }

    /// Contains: the first task id anywhere inside `s`.
    pub fn contained_task_id<'a>(&self, s: &'a str) -> Option<&'a str> {
        self.task_id_contains.find(s).map(|m| m.as_str())
    }

    /// Starts-with: byte offset just past a placeholder at the start of `s`.
    pub fn leading_placeholder(&self, s: &str) -> Option<usize> {
        self.placeholder_start.find(s).map(|m| m.end())
    }

    /// Contains: true if a placeholder occurs anywhere inside `s`.
    pub fn contains_placeholder(&self, s: &str) -> bool {
        self.placeholder_contains.is_match(s)
    }

    /// Starts-with: `s` begins with "box, space, task id".
    pub fn starts_with_box_and_task_id(&self, s: &str) -> bool {
        self.box_task_id_start.is_match(s)
    }

    /// Starts-with: `s` begins with "box, space, placeholder". Returns the
    /// literal box text and the byte offset just past the placeholder.
    pub fn leading_box_and_placeholder<'a>(&self, s: &'a str) -> Option<(&'a str, usize)> {
        let caps = self.box_placeholder_start.captures(s)?;
        let whole = caps.get(0)?;
        let b = caps.name("b")?;
        Some((b.as_str(), whole.end()))
    }

    /// Parses the numeric suffix of a literal task id matched by this
    /// project id. Numbers too large for u64 are ignored.
    pub fn task_id_number(&self, task_id: &str) -> Option<u64> {
        let caps = self.task_id_contains.captures(task_id)?;
        caps.name("number")?.as_str().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_parse() {
        assert!(ProjectId::parse("TODO").is_some());
        assert!(ProjectId::parse("AB").is_some());
        assert!(ProjectId::parse("ABCDE").is_some());
        assert!(ProjectId::parse("A").is_none());
        assert!(ProjectId::parse("ABCDEF").is_none());
        assert!(ProjectId::parse("toDO").is_none());
        assert!(ProjectId::parse("TODO-1").is_none());
    }

    #[test]
    fn test_leading_box() {
        assert_eq!(leading_box("[ ] hi"), Some((BoxState::Unchecked, 3)));
        assert_eq!(leading_box("[x] hi"), Some((BoxState::Checked, 3)));
        let (state, end) = leading_box("[…] hi").unwrap();
        assert_eq!(state, BoxState::InProgress);
        assert_eq!(&"[…] hi"[..end], "[…]");
        assert_eq!(leading_box("hi [ ]"), None);
        assert_eq!(leading_box("[y] hi"), None);
    }

    #[test]
    fn test_task_id_operations_are_distinct() {
        let p = Patterns::new(ProjectId::default());
        // starts-with
        assert_eq!(p.leading_task_id("TODO-12 rest"), Some(("TODO-12", 7)));
        assert_eq!(p.leading_task_id("see TODO-12"), None);
        // is-exactly
        assert!(p.is_task_id("TODO-12"));
        assert!(!p.is_task_id("TODO-12 rest"));
        // contains
        assert_eq!(p.contained_task_id("see TODO-12 here"), Some("TODO-12"));
        assert_eq!(p.contained_task_id("nothing"), None);
    }

    #[test]
    fn test_placeholder() {
        let p = Patterns::new(ProjectId::default());
        assert_eq!(p.leading_placeholder("TODO-??? rest"), Some(8));
        assert_eq!(p.leading_placeholder("TODO-xx rest"), Some(7));
        assert_eq!(p.leading_placeholder("TODO-NN"), Some(7));
        assert_eq!(p.leading_placeholder("TODO-1"), None);
        assert!(p.contains_placeholder("prefix TODO-? suffix"));
    }

    #[test]
    fn test_box_compounds() {
        let p = Patterns::new(ProjectId::default());
        assert!(p.starts_with_box_and_task_id("[ ] TODO-3 stuff"));
        assert!(p.starts_with_box_and_task_id("[x] TODO-3"));
        assert!(!p.starts_with_box_and_task_id("[ ] TODO-? stuff"));
        let (b, end) = p.leading_box_and_placeholder("[x] TODO-?? go").unwrap();
        assert_eq!(b, "[x]");
        assert_eq!(&"[x] TODO-?? go"[..end], "[x] TODO-??");
    }

    #[test]
    fn test_task_id_number() {
        let p = Patterns::new(ProjectId::default());
        assert_eq!(p.task_id_number("TODO-42"), Some(42));
        assert_eq!(p.task_id_number("TODO-0"), Some(0));
        assert_eq!(p.task_id_number("OTHER-1"), None);
    }

    #[test]
    fn test_other_project_id() {
        let p = Patterns::new(ProjectId::parse("AB").unwrap());
        assert!(p.starts_with_box_and_task_id("[ ] AB-1 x"));
        assert_eq!(p.leading_task_id("TODO-1"), None);
    }
}
