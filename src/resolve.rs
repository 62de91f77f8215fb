//! Slot resolution: mapping a content slot to a concrete shape.
//!
//! Templates are author-supplied and shape names are free-form, so slot
//! lookup is heuristic: an exact name is tried first, then one or more
//! keyword substrings, all case-insensitively and in slide order. A miss
//! is not an error; callers treat it as "slot not present in this
//! template" and silently skip that field's mutation.

use crate::pptx::shapes::Shape;
use crate::pptx::slide::Slide;

/// What kind of shape a slot expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    /// Any shape
    Any,
    /// A shape that can carry a text frame
    Text,
    /// A picture shape
    Picture,
    /// A graphic frame containing a table
    Table,
}

impl SlotTarget {
    fn accepts(&self, shape: &Shape) -> bool {
        match self {
            SlotTarget::Any => true,
            SlotTarget::Text => shape.has_text_frame(),
            SlotTarget::Picture => shape.kind() == crate::pptx::shapes::ShapeKind::Picture,
            SlotTarget::Table => shape.has_table(),
        }
    }
}

/// A slot lookup rule.
///
/// Evaluation order: the exact name (case-insensitive) across all shapes in
/// slide order first, then each keyword in turn as a case-insensitive
/// substring. The first shape satisfying a pass wins. With neither an exact
/// name nor keywords, the rule matches the first shape the target accepts.
#[derive(Debug, Clone)]
pub struct SlotRule {
    exact: Option<String>,
    keywords: Vec<String>,
    target: SlotTarget,
}

impl SlotRule {
    /// Match an exact fully-qualified slot name, falling back to a keyword
    /// substring (e.g. `Header1`, then any name containing `header`).
    pub fn exact_or_contains(exact: &str, keyword: &str, target: SlotTarget) -> Self {
        Self {
            exact: Some(exact.to_string()),
            keywords: vec![keyword.to_lowercase()],
            target,
        }
    }

    /// Match any name containing the keyword.
    pub fn contains(keyword: &str, target: SlotTarget) -> Self {
        Self {
            exact: None,
            keywords: vec![keyword.to_lowercase()],
            target,
        }
    }

    /// Match any name containing one of the keywords, tried in order.
    pub fn keywords(keywords: &[&str], target: SlotTarget) -> Self {
        Self {
            exact: None,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            target,
        }
    }

    /// Match an indexed slot: the formatted name `Prefix{i}` exactly, then
    /// the substring `prefix{i}`.
    pub fn indexed(prefix: &str, index: usize, target: SlotTarget) -> Self {
        Self {
            exact: Some(format!("{prefix}{index}")),
            keywords: vec![format!("{}{index}", prefix.to_lowercase())],
            target,
        }
    }

    /// Match an indexed slot under any of several naming prefixes.
    pub fn indexed_keywords(prefixes: &[&str], index: usize, target: SlotTarget) -> Self {
        Self {
            exact: Some(format!("{}{index}", prefixes[0])),
            keywords: prefixes
                .iter()
                .map(|p| format!("{}{index}", p.to_lowercase()))
                .collect(),
            target,
        }
    }

    /// Match the first shape the target accepts, regardless of name.
    pub fn any_of(target: SlotTarget) -> Self {
        Self {
            exact: None,
            keywords: Vec::new(),
            target,
        }
    }

    fn matches_exact(&self, shape: &Shape) -> bool {
        match &self.exact {
            Some(exact) => shape.name().eq_ignore_ascii_case(exact),
            None => false,
        }
    }
}

/// Resolve a rule to the node index of the first matching shape.
pub fn resolve(slide: &Slide, rule: &SlotRule) -> Option<usize> {
    // Pass 1: exact name
    for (index, shape) in slide.shapes() {
        if rule.target.accepts(shape) && rule.matches_exact(shape) {
            return Some(index);
        }
    }

    // Pass 2: each keyword in rule order, shapes in slide order
    for keyword in &rule.keywords {
        for (index, shape) in slide.shapes() {
            if rule.target.accepts(shape) && shape.name().to_lowercase().contains(keyword) {
                return Some(index);
            }
        }
    }

    // Bare rule: first shape of the right kind
    if rule.exact.is_none() && rule.keywords.is_empty() {
        for (index, shape) in slide.shapes() {
            if rule.target.accepts(shape) {
                return Some(index);
            }
        }
    }

    None
}

/// Resolve every shape matching any of the rule's keywords, in slide order.
///
/// Used by multi-image kinds, which pair an ordered URL list positionally
/// with all image-bearing slots of the group.
pub fn resolve_all(slide: &Slide, rule: &SlotRule) -> Vec<usize> {
    let mut matches = Vec::new();
    for (index, shape) in slide.shapes() {
        if !rule.target.accepts(shape) {
            continue;
        }
        let named = rule.matches_exact(shape)
            || rule
                .keywords
                .iter()
                .any(|k| shape.name().to_lowercase().contains(k));
        if named || (rule.exact.is_none() && rule.keywords.is_empty()) {
            matches.push(index);
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::packuri::PackURI;
    use crate::pptx::fixtures;

    fn slide(shapes: &[String]) -> Slide {
        let xml = fixtures::slide_xml(shapes);
        Slide::parse(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            xml.as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_exact_beats_substring() {
        let slide = slide(&[
            fixtures::text_shape(2, "My header note", "a"),
            fixtures::text_shape(3, "Header1", "b"),
        ]);

        let rule = SlotRule::exact_or_contains("Header1", "header", SlotTarget::Text);
        let index = resolve(&slide, &rule).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "Header1");
    }

    #[test]
    fn test_substring_fallback_case_insensitive() {
        let slide = slide(&[
            fixtures::text_shape(2, "Intro", "a"),
            fixtures::text_shape(3, "PAGE HEADER", "b"),
        ]);

        let rule = SlotRule::exact_or_contains("Header1", "header", SlotTarget::Text);
        let index = resolve(&slide, &rule).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "PAGE HEADER");
    }

    #[test]
    fn test_first_in_slide_order_wins() {
        let slide = slide(&[
            fixtures::text_shape(2, "title a", "a"),
            fixtures::text_shape(3, "title b", "b"),
        ]);

        let rule = SlotRule::contains("title", SlotTarget::Text);
        let index = resolve(&slide, &rule).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "title a");
    }

    #[test]
    fn test_indexed_rule() {
        let slide = slide(&[
            fixtures::text_shape(2, "Stat1", "a"),
            fixtures::text_shape(3, "my stat2 box", "b"),
        ]);

        let index = resolve(&slide, &SlotRule::indexed("Stat", 1, SlotTarget::Text)).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "Stat1");

        let index = resolve(&slide, &SlotRule::indexed("Stat", 2, SlotTarget::Text)).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "my stat2 box");

        assert!(resolve(&slide, &SlotRule::indexed("Stat", 3, SlotTarget::Text)).is_none());
    }

    #[test]
    fn test_target_filters_kind() {
        let slide = slide(&[
            fixtures::text_shape(2, "image caption", "a"),
            fixtures::picture_shape(3, "Image1", "rId2"),
        ]);

        let rule = SlotRule::contains("image", SlotTarget::Picture);
        let index = resolve(&slide, &rule).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "Image1");
    }

    #[test]
    fn test_absence_is_none_not_error() {
        let slide = slide(&[fixtures::text_shape(2, "Body", "a")]);
        let rule = SlotRule::exact_or_contains("Header1", "header", SlotTarget::Text);
        assert!(resolve(&slide, &rule).is_none());
    }

    #[test]
    fn test_any_of_matches_first_of_kind() {
        let slide = slide(&[
            fixtures::text_shape(2, "Title", "a"),
            fixtures::table_shape(3, "Table 1", 2, 2),
        ]);

        let index = resolve(&slide, &SlotRule::any_of(SlotTarget::Table)).unwrap();
        assert_eq!(slide.shape(index).unwrap().name(), "Table 1");
    }

    #[test]
    fn test_resolve_all_in_slide_order() {
        let slide = slide(&[
            fixtures::picture_shape(2, "Logo", "rId2"),
            fixtures::text_shape(3, "Title", "t"),
            fixtures::picture_shape(4, "Image2", "rId3"),
            fixtures::picture_shape(5, "Decoration", "rId4"),
        ]);

        let rule = SlotRule::keywords(&["image", "logo"], SlotTarget::Picture);
        let matches = resolve_all(&slide, &rule);
        let names: Vec<&str> = matches
            .iter()
            .map(|&i| slide.shape(i).unwrap().name())
            .collect();
        assert_eq!(names, vec!["Logo", "Image2"]);
    }
}
