//! Top-level class extraction from Python source text.
//!
//! Recovers from source text what `inspect.getmembers` reports for a live
//! module: column-zero `class` statements, their base lists, the first
//! line of a leading docstring, and the names bound by simple assignments
//! in the class body. Nested classes are not module members and are
//! ignored, and names that are merely imported into a module never show
//! up at all — the same "defined in this module" filter reflection gets
//! from `obj.__module__`.
//!
//! This is a line-oriented surface parse, not a full Python grammar. The
//! classification it feeds is an accepted heuristic, so constructs it
//! cannot see (conditionally-defined classes, docstrings built at runtime)
//! are simply missed.

use std::sync::LazyLock;

use regex::Regex;

/// Class header: `class Name(bases):` with an optional base list. Matches
/// against the accumulated (possibly multi-line) header text.
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class\s+([A-Za-z_]\w*)\s*(?:\(([^)]*)\))?\s*:")
        .expect("class regex compiles")
});

/// Simple or annotated assignment: `name = ...` / `name: T = ...`.
/// The trailing guard rejects `==` comparisons.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_]\w*)\s*(?::[^=]+)?=([^=]|$)")
        .expect("attribute regex compiles")
});

/// Opening of a string literal with an optional prefix (`r"""`, `f'''`, ...).
static DOC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*[rRuUbBfF]{0,2}("""|'''|"|')(.*)$"#)
        .expect("docstring regex compiles")
});

/// How many physical lines a class header may span before we give up on it.
const MAX_HEADER_LINES: usize = 20;

/// A top-level class definition recovered from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PyClass {
    pub name: String,
    /// Base expressions, keyword arguments (`metaclass=...`) excluded,
    /// subscripts (`Generic[T]`) stripped. May be dotted (`diagrams.Node`).
    pub bases: Vec<String>,
    /// First line of the class docstring, or empty.
    pub docstring: String,
    /// Names assigned at the top indentation level of the class body.
    pub attrs: Vec<String>,
}

/// Parse all top-level class definitions out of a module's source.
pub(crate) fn parse_classes(source: &str) -> Vec<PyClass> {
    let lines: Vec<&str> = source.lines().collect();
    let mut classes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].starts_with("class ") {
            i += 1;
            continue;
        }

        let Some((header, body_start)) = collect_header(&lines, i) else {
            i += 1;
            continue;
        };
        let Some(caps) = CLASS_RE.captures(&header) else {
            i = body_start;
            continue;
        };

        let name = caps[1].to_owned();
        let bases = caps
            .get(2)
            .map(|m| parse_bases(m.as_str()))
            .unwrap_or_default();

        let (body, next) = collect_body(&lines, body_start);
        let doc_span = docstring_span(&body);

        classes.push(PyClass {
            name,
            bases,
            docstring: extract_docstring(&body, doc_span),
            attrs: extract_attrs(&body, doc_span),
        });
        i = next;
    }

    classes
}

/// Accumulate a class header starting at `start` until it parses, joining
/// continuation lines with a space. Returns the joined header and the
/// index of the first body line.
fn collect_header(lines: &[&str], start: usize) -> Option<(String, usize)> {
    let mut header = String::new();
    for (count, line) in lines[start..].iter().enumerate() {
        if count >= MAX_HEADER_LINES {
            return None;
        }
        if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(line.trim_end());
        if CLASS_RE.is_match(&header) {
            return Some((header, start + count + 1));
        }
    }
    None
}

/// Collect the class body: every following line that is blank, indented,
/// or a comment, up to the next column-zero statement. Blank and comment
/// lines are dropped; the rest keep their indentation.
fn collect_body<'a>(lines: &[&'a str], start: usize) -> (Vec<&'a str>, usize) {
    let mut body = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }
        if !line.starts_with(' ') && !line.starts_with('\t') {
            break;
        }
        body.push(line);
        i += 1;
    }

    (body, i)
}

/// Split a base list on commas, dropping keyword arguments and starred
/// entries and stripping subscripts.
fn parse_bases(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|base| !base.is_empty() && !base.contains('=') && !base.starts_with('*'))
        .map(|base| base.split('[').next().unwrap_or(base).trim().to_owned())
        .filter(|base| !base.is_empty())
        .collect()
}

/// Number of leading body lines occupied by a docstring (0 if the body
/// does not start with one).
fn docstring_span(body: &[&str]) -> usize {
    let Some(first) = body.first() else { return 0 };
    let Some(caps) = DOC_RE.captures(first) else { return 0 };
    let delim = caps.get(1).expect("delimiter group").as_str();
    let rest = caps.get(2).expect("content group").as_str();

    if rest.contains(delim) {
        return 1;
    }
    // An unterminated single-quoted string is a continuation, not a
    // docstring; only triple quotes may span lines.
    if delim.len() == 1 {
        return 0;
    }
    for (idx, line) in body[1..].iter().enumerate() {
        if line.contains(delim) {
            return idx + 2;
        }
    }
    body.len()
}

/// First line of the docstring, trimmed; empty when there is none.
/// Equivalent to `inspect.getdoc(obj).split('\n')[0].strip()`: blank
/// leading lines were already dropped by `collect_body`, so the first
/// content line wins.
fn extract_docstring(body: &[&str], doc_span: usize) -> String {
    if doc_span == 0 {
        return String::new();
    }
    let caps = DOC_RE.captures(body[0]).expect("span implies a match");
    let delim = caps.get(1).expect("delimiter group").as_str();
    let rest = caps.get(2).expect("content group").as_str();

    // Closing delimiter on the opening line: content sits between quotes.
    if let Some(pos) = rest.find(delim) {
        return rest[..pos].trim().to_owned();
    }
    let trimmed = rest.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    // Bare opening quotes: first content line follows.
    for line in &body[1..doc_span] {
        let line = line.trim();
        let content = match line.find(delim) {
            Some(pos) => line[..pos].trim(),
            None => line,
        };
        if !content.is_empty() {
            return content.to_owned();
        }
    }
    String::new()
}

/// Names assigned at the class body's top indentation level, skipping the
/// docstring lines. Order preserved, duplicates dropped.
fn extract_attrs(body: &[&str], doc_span: usize) -> Vec<String> {
    let Some(first) = body.first() else {
        return Vec::new();
    };
    let body_indent = indent_width(first);

    let mut attrs: Vec<String> = Vec::new();
    for line in &body[doc_span..] {
        if indent_width(line) != body_indent {
            continue;
        }
        if let Some(caps) = ATTR_RE.captures(line) {
            let name = caps[1].to_owned();
            if !attrs.contains(&name) {
                attrs.push(name);
            }
        }
    }
    attrs
}

/// Indentation width in columns, tabs counted at the conventional 8.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 8 } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> PyClass {
        let classes = parse_classes(source);
        assert_eq!(classes.len(), 1, "expected one class in {source:?}");
        classes.into_iter().next().unwrap()
    }

    #[test]
    fn test_simple_class_with_docstring_and_attr() {
        let class = parse_one(concat!(
            "class EC2(_Compute):\n",
            "    \"\"\"Elastic Compute Cloud\"\"\"\n",
            "\n",
            "    _icon = \"ec2.png\"\n",
        ));

        assert_eq!(class.name, "EC2");
        assert_eq!(class.bases, vec!["_Compute"]);
        assert_eq!(class.docstring, "Elastic Compute Cloud");
        assert_eq!(class.attrs, vec!["_icon"]);
    }

    #[test]
    fn test_class_without_bases_or_docstring() {
        let class = parse_one("class Node:\n    pass\n");

        assert_eq!(class.name, "Node");
        assert!(class.bases.is_empty());
        assert_eq!(class.docstring, "");
        assert!(class.attrs.is_empty());
    }

    #[test]
    fn test_multiline_docstring_takes_first_line() {
        let class = parse_one(concat!(
            "class S3:\n",
            "    \"\"\"Simple Storage Service.\n",
            "\n",
            "    Second paragraph that must not leak.\n",
            "    \"\"\"\n",
        ));

        assert_eq!(class.docstring, "Simple Storage Service.");
    }

    #[test]
    fn test_docstring_with_bare_opening_quotes() {
        let class = parse_one(concat!(
            "class S3:\n",
            "    \"\"\"\n",
            "    Simple Storage Service\n",
            "    \"\"\"\n",
        ));

        assert_eq!(class.docstring, "Simple Storage Service");
    }

    #[test]
    fn test_multiline_header() {
        let class = parse_one(concat!(
            "class Lambda(\n",
            "    _Compute,\n",
            "    _Serverless,\n",
            "):\n",
            "    pass\n",
        ));

        assert_eq!(class.name, "Lambda");
        assert_eq!(class.bases, vec!["_Compute", "_Serverless"]);
    }

    #[test]
    fn test_keyword_and_subscript_bases_normalized() {
        let class = parse_one(
            "class Widget(Generic[T], base.Node, metaclass=ABCMeta):\n    pass\n",
        );

        assert_eq!(class.bases, vec!["Generic", "base.Node"]);
    }

    #[test]
    fn test_nested_class_is_not_top_level() {
        let classes = parse_classes(concat!(
            "class Outer:\n",
            "    class Inner:\n",
            "        _icon = \"x.png\"\n",
        ));

        let names: Vec<&str> =
            classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer"]);
    }

    #[test]
    fn test_method_locals_are_not_attrs() {
        let class = parse_one(concat!(
            "class EC2:\n",
            "    icon_dir = \"resources/aws\"\n",
            "\n",
            "    def render(self):\n",
            "        size = 42\n",
            "        return size\n",
        ));

        assert_eq!(class.attrs, vec!["icon_dir"]);
    }

    #[test]
    fn test_annotated_assignment_and_comparison() {
        let class = parse_one(concat!(
            "class EC2:\n",
            "    _icon: str = \"ec2.png\"\n",
            "    _flag == True\n",
        ));

        // The annotated assignment binds; the `==` comparison does not.
        assert_eq!(class.attrs, vec!["_icon"]);
    }

    #[test]
    fn test_imports_do_not_produce_classes() {
        let classes = parse_classes(concat!(
            "from diagrams.aws.compute import EC2\n",
            "import diagrams.aws.storage\n",
        ));

        assert!(classes.is_empty());
    }

    #[test]
    fn test_multiple_classes_in_one_module() {
        let classes = parse_classes(concat!(
            "class _Compute:\n",
            "    icon_dir = \"resources/aws/compute\"\n",
            "\n",
            "\n",
            "class EC2(_Compute):\n",
            "    \"\"\"Elastic Compute Cloud\"\"\"\n",
            "\n",
            "\n",
            "class Lambda(_Compute):\n",
            "    pass\n",
        ));

        let names: Vec<&str> =
            classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["_Compute", "EC2", "Lambda"]);
    }

    #[test]
    fn test_single_quote_docstring() {
        let class = parse_one("class EC2:\n    'Elastic Compute Cloud'\n");
        assert_eq!(class.docstring, "Elastic Compute Cloud");
    }

    #[test]
    fn test_comment_lines_inside_body_are_ignored() {
        let class = parse_one(concat!(
            "class EC2:\n",
            "    # marker attribute\n",
            "    _icon = \"ec2.png\"\n",
            "# trailing module comment\n",
        ));

        assert_eq!(class.attrs, vec!["_icon"]);
    }
}
