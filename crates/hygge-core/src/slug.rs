//! Slug assignment.
//!
//! A slug supplied by the caller is used verbatim; otherwise one is
//! derived from the title. Derivation is pure and deterministic:
//! lowercase, fold accented Latin letters to ASCII, collapse every run of
//! non-alphanumerics to a single hyphen, trim hyphens at the ends.
//! Uniqueness is not this module's concern; the service checks for
//! collisions before persisting and the database index backs it up.

/// Pick the slug for a post: the supplied one verbatim when non-empty,
/// otherwise a derivation from the title.
pub fn assign_slug(title: &str, supplied: Option<&str>) -> String {
    match supplied {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => slugify(title),
    }
}

/// Derive a URL-safe slug from arbitrary text.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars() {
        for folded in fold_to_ascii(ch) {
            if folded.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(folded.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }
    }

    slug
}

/// Fold a character to its closest ASCII spelling. Covers the Latin-1
/// letters that show up in titles; anything else non-ASCII is treated as
/// a separator.
fn fold_to_ascii(ch: char) -> impl Iterator<Item = char> {
    let folded: &'static str = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        c if c.is_ascii() => return Folded::Keep(c),
        _ => return Folded::Drop,
    };
    Folded::Str(folded.chars())
}

enum Folded {
    Keep(char),
    Str(std::str::Chars<'static>),
    Drop,
}

impl Iterator for Folded {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Folded::Keep(c) => {
                let c = *c;
                *self = Folded::Drop;
                Some(c)
            }
            Folded::Str(chars) => chars.next(),
            Folded::Drop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_hyphenated_lowercase_slug() {
        assert_eq!(
            assign_slug("Why Slower Mornings Matter", None),
            "why-slower-mornings-matter"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = assign_slug("Why Slower Mornings Matter", None);
        let second = assign_slug("Why Slower Mornings Matter", None);
        assert_eq!(first, second);
    }

    #[test]
    fn supplied_slug_is_used_verbatim() {
        assert_eq!(
            assign_slug("Anything At All", Some("My Custom Slug")),
            "My Custom Slug"
        );
    }

    #[test]
    fn blank_supplied_slug_falls_back_to_derivation() {
        assert_eq!(assign_slug("Hello World", Some("")), "hello-world");
        assert_eq!(assign_slug("Hello World", Some("   ")), "hello-world");
    }

    #[test]
    fn collapses_punctuation_runs_and_trims_hyphens() {
        assert_eq!(slugify("  Hygge!!  &  Home, Sweet Home.  "), "hygge-home-sweet-home");
        assert_eq!(slugify("--already--hyphenated--"), "already-hyphenated");
    }

    #[test]
    fn folds_accented_latin_letters() {
        assert_eq!(slugify("Café Crème & Hyttekos på Fjellet"), "cafe-creme-hyttekos-pa-fjellet");
        assert_eq!(slugify("Überraschung für Österreich"), "uberraschung-fur-osterreich");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("10 Ways to Slow Down in 2026"), "10-ways-to-slow-down-in-2026");
    }
}
