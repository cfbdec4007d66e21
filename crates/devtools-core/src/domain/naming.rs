//! Identifier conversions shared by model generation and project templates.
//!
//! Two families live here:
//!
//! - **Framework naming** (`camelize`, `lower_camelize`): the
//!   rules the ORM uses to turn table and column names into class and
//!   property names. `camelize` only upper-cases the first letter of every
//!   `_`/`-` separated part and keeps the rest untouched, so `user_id`
//!   becomes `UserId` and `HTTPLog` stays `HTTPLog`.
//! - **Word-based casing** (`to_snake_case`, `to_kebab_case`,
//!   `to_pascal_case`): used for project-name variables in skeletons, where
//!   natural-language input such as `"my store"` is expected.

/// Table or column name to class name: `blog_posts` → `BlogPosts`.
pub fn camelize(input: &str) -> String {
    input
        .split(['_', '-'])
        .map(upper_first)
        .collect::<String>()
}

/// Column name to property name under `--camelize`: `created_at` → `createdAt`.
pub fn lower_camelize(input: &str) -> String {
    lower_first(&camelize(input))
}

/// Whether `input` is usable as a class, property, or namespace segment.
pub fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Namespace such as `App\Models`; a leading backslash is tolerated.
pub fn is_namespace(input: &str) -> bool {
    let trimmed = input.strip_prefix('\\').unwrap_or(input);
    !trimmed.is_empty() && trimmed.split('\\').all(is_identifier)
}

fn upper_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Word-based casing (project names)
// ============================================================================

/// `"My Store"` → `my_store`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// `"My Store"` → `my-store`.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// `"my-store"` → `MyStore`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| upper_first(w)).collect()
}

/// Split on `_`, `-`, whitespace, lower→upper transitions, and acronym ends
/// (`HTTPServer` → `http`, `server`). Words come back lowercased.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase());

            if (c.is_lowercase() && next.is_uppercase()) || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
