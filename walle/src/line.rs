//! Shape tests on raw program lines, shared by validation and dispatch.

/// Words that can never name a variable or a label.
pub const RESERVED_WORDS: &[&str] = &[
    "Spawn",
    "Color",
    "Size",
    "DrawLine",
    "DrawCircle",
    "DrawRectangle",
    "Fill",
    "GoTo",
    "GetActualX",
    "GetActualY",
    "GetCanvasSize",
    "GetColorCount",
    "IsBrushColor",
    "IsBrushSize",
    "IsCanvasColor",
    "true",
    "false",
    "and",
    "or",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Letter first, then letters, digits, `_` or `-`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn is_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with('#')
}

/// The text between `keyword(` and the final `)`, if the line has that shape.
pub fn call_arguments<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    line.strip_prefix(keyword)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Splits on commas that sit outside parentheses and string literals.
/// An empty (or all-blank) argument list yields no arguments.
pub fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0;
    for (i, ch) in args.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            ',' if !in_string && depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

/// Strips one pair of surrounding double quotes.
pub fn string_literal(arg: &str) -> Option<&str> {
    arg.trim().strip_prefix('"')?.strip_suffix('"')
}

/// Parentheses outside string literals never close more than they open,
/// and end balanced.
pub fn parentheses_balanced(line: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    for ch in line.chars() {
        match ch {
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
