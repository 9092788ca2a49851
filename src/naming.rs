//! Canonical name casing and tolerant name matching
//!
//! Anchor's client encoder selects enum variants by their lower-camel name,
//! while IDLs, legacy IDLs and form layers may spell the same name as
//! `PascalCase`, `snake_case` or `SCREAMING_CASE`. Every place that matches a
//! user-supplied name against a declared one goes through [`find_by_name`].

/// Convert a name to lower camel case (`Admin` -> `admin`, `init_pool` -> `initPool`).
pub fn canonicalize(name: &str) -> String {
    let words = split_words(name);
    let mut out = String::with_capacity(name.len());

    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Split on `_`, `-`, whitespace and lower/upper case boundaries.
///
/// An acronym run stays one word: `HTTPServer` -> `HTTP`, `Server`.
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// How a candidate name matched a declared one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    CaseInsensitive,
    Canonical,
    CanonicalCaseInsensitive,
}

/// Match `candidate` against `declared` with the four-way fallback:
/// exact, case-insensitive, canonical, canonical case-insensitive.
pub fn match_name(candidate: &str, declared: &str) -> Option<NameMatch> {
    if candidate == declared {
        return Some(NameMatch::Exact);
    }
    if candidate.eq_ignore_ascii_case(declared) {
        return Some(NameMatch::CaseInsensitive);
    }

    let c = canonicalize(candidate);
    let d = canonicalize(declared);
    if c == d {
        return Some(NameMatch::Canonical);
    }
    if c.eq_ignore_ascii_case(&d) {
        return Some(NameMatch::CanonicalCaseInsensitive);
    }
    None
}

/// Find the item whose name best matches `candidate`.
///
/// Each fallback stage is tried across all items before moving to the next,
/// so an exact match always wins over a looser one.
pub fn find_by_name<'a, T, F>(items: &'a [T], candidate: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let stages = [
        NameMatch::Exact,
        NameMatch::CaseInsensitive,
        NameMatch::Canonical,
        NameMatch::CanonicalCaseInsensitive,
    ];

    let matches: Vec<Option<NameMatch>> = items
        .iter()
        .map(|item| match_name(candidate, name_of(item)))
        .collect();

    stages.iter().find_map(|stage| {
        matches
            .iter()
            .position(|m| m.as_ref() == Some(stage))
            .map(|i| &items[i])
    })
}

/// Look up a key in a JSON object by exact, then canonical name.
pub fn get_field<'a>(
    object: &'a serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Option<&'a serde_json::Value> {
    if let Some(value) = object.get(name) {
        return Some(value);
    }
    let wanted = canonicalize(name);
    object
        .iter()
        .find(|(key, _)| canonicalize(key) == wanted)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Admin"), "admin");
        assert_eq!(canonicalize("admin"), "admin");
        assert_eq!(canonicalize("init_pool"), "initPool");
        assert_eq!(canonicalize("InitPool"), "initPool");
        assert_eq!(canonicalize("SUPER_ADMIN"), "superAdmin");
        assert_eq!(canonicalize("HTTPServer"), "httpServer");
        assert_eq!(canonicalize("v2_pool"), "v2Pool");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_match_stages() {
        assert_eq!(match_name("Admin", "Admin"), Some(NameMatch::Exact));
        assert_eq!(match_name("ADMIN", "Admin"), Some(NameMatch::CaseInsensitive));
        assert_eq!(match_name("superAdmin", "super_admin"), Some(NameMatch::Canonical));
        assert_eq!(match_name("superadmin", "Super_Admin"), Some(NameMatch::CanonicalCaseInsensitive));
        assert_eq!(match_name("user", "Admin"), None);
    }

    #[test]
    fn test_find_prefers_exact() {
        let names = ["admin", "Admin"];
        let found = find_by_name(&names, "Admin", |n| n).unwrap();
        assert_eq!(*found, "Admin");
        let found = find_by_name(&names, "ADMIN", |n| n).unwrap();
        assert_eq!(*found, "admin");
    }

    #[test]
    fn test_get_field_canonical() {
        let obj = serde_json::json!({ "ownerKey": 1, "bump": 2 });
        let obj = obj.as_object().unwrap();
        assert_eq!(get_field(obj, "owner_key"), Some(&serde_json::json!(1)));
        assert_eq!(get_field(obj, "bump"), Some(&serde_json::json!(2)));
        assert_eq!(get_field(obj, "missing"), None);
    }
}
