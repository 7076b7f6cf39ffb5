use rivet_core::Segment;

use super::{Extractor, ParseResult, ParsedValue, PatternSegment};

const TEXT_TRIM: &[char] = &[' ', '\n', '\r', '\t'];

impl Extractor {
    fn extract(&self, segment: &Segment) -> Option<ParsedValue> {
        match self {
            Self::Text(re) => {
                let text = segment.field("text").trim_matches(TEXT_TRIM);
                let captures = re.captures(text)?;
                let groups = captures
                    .iter()
                    .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect();
                Some(ParsedValue::Groups(groups))
            }
            Self::At(target) => {
                let qq = segment.field("qq");
                match target {
                    Some(target) if target != qq => None,
                    _ => Some(ParsedValue::Str(qq.to_string())),
                }
            }
            Self::Image => Some(ParsedValue::Str(segment.field("file").to_string())),
            Self::Reply => Some(ParsedValue::Str(segment.field("id").to_string())),
            Self::Custom(extract) => extract(segment),
        }
    }
}

impl PatternSegment {
    fn parse(&self, segment: Option<&Segment>) -> ParseResult {
        let parsed = segment
            .filter(|segment| segment.is(&self.kind))
            .and_then(|segment| {
                self.extractor
                    .extract(segment)
                    .map(|value| ParseResult::matched(value, segment))
            })
            .unwrap_or_else(ParseResult::invalid);
        parsed.named(self.name.as_deref())
    }
}

/// Single greedy pass: the pattern cursor always advances, the message
/// cursor only on a valid match.
pub(super) fn align(pattern: &[PatternSegment], message: &[Segment]) -> Option<Vec<ParseResult>> {
    let has_optional = pattern.iter().any(PatternSegment::is_optional);
    if !has_optional && pattern.len() != message.len() {
        return None;
    }

    let mut results = Vec::with_capacity(pattern.len());
    let mut cursor = 0;
    for element in pattern {
        let parsed = element.parse(message.get(cursor));
        if parsed.is_valid() {
            cursor += 1;
        } else if !element.is_optional() {
            return None;
        }
        results.push(parsed);
    }
    Some(results)
}

#[cfg(test)]
mod tests {
    use super::super::Pattern;
    use super::*;

    fn validity(results: &[ParseResult]) -> Vec<bool> {
        results.iter().map(ParseResult::is_valid).collect()
    }

    #[test]
    fn test_text() {
        let pattern = Pattern::new().text("haha").text("^xixi$");
        assert!(pattern.matches(&[Segment::text("haha"), Segment::text("xixi")]).is_some());
        assert!(pattern.matches(&[Segment::text("haha"), Segment::text("xi")]).is_none());
        assert!(pattern.matches(&[Segment::text("haha")]).is_none());

        let results = pattern
            .matches(&[Segment::text(" 1haha2 "), Segment::text("\txixi\n")])
            .unwrap();
        assert_eq!(results[0].text(), Some(&["haha".to_string()][..]));
        assert_eq!(results[1].source(), Some(&Segment::text("\txixi\n")));
    }

    #[test]
    fn test_image() {
        let pattern = Pattern::new().image().image().image();
        let message = [
            Segment::image("a.jpg"),
            Segment::image("b.jpg"),
            Segment::image("c.jpg"),
        ];
        let results = pattern.matches(&message).unwrap();
        assert_eq!(results[2].image(), Some("c.jpg"));

        assert!(pattern.matches(&message[..2]).is_none());
        assert!(
            pattern
                .matches(&[message[0].clone(), Segment::text("x"), message[2].clone()])
                .is_none()
        );
    }

    #[test]
    fn test_at() {
        let any = Pattern::new().at();
        assert_eq!(any.matches(&[Segment::at(1919810)]).unwrap()[0].at(), Some("1919810"));
        assert!(any.matches(&[Segment::text("1919810")]).is_none());

        let specific = Pattern::new().at_id(1919810);
        assert!(specific.matches(&[Segment::at(1919810)]).is_some());
        assert!(specific.matches(&[Segment::at(114514)]).is_none());
    }

    #[test]
    fn test_reply() {
        let pattern = Pattern::new().reply().text("ok");
        let results = pattern
            .matches(&[Segment::reply(12345), Segment::text("ok")])
            .unwrap();
        assert_eq!(results[0].reply(), Some("12345"));
    }

    #[test]
    fn test_optional_skip_records_invalid_result() {
        let pattern = Pattern::new().text("^hello$").at().optional();
        let results = pattern.matches(&[Segment::text("hello")]).unwrap();
        assert_eq!(validity(&results), [true, false]);
        assert_eq!(results[1].value(), &ParsedValue::Empty);
        assert!(results[1].source().is_none());
        assert_eq!(results[1].at(), None);
    }

    #[test]
    fn test_optional_skip_retries_same_segment() {
        let pattern = Pattern::new()
            .reply()
            .optional()
            .text("cmd")
            .at()
            .optional();

        let results = pattern.matches(&[Segment::text("cmd")]).unwrap();
        assert_eq!(validity(&results), [false, true, false]);

        let results = pattern
            .matches(&[Segment::reply(1), Segment::text("cmd"), Segment::at(2)])
            .unwrap();
        assert_eq!(validity(&results), [true, true, true]);

        // A failing required element after a skip rejects the message.
        assert!(pattern.matches(&[Segment::image("x")]).is_none());
    }

    #[test]
    fn test_trailing_segments_are_ignored_with_optional() {
        let pattern = Pattern::new().text("a").at().optional();
        let results = pattern
            .matches(&[Segment::text("a"), Segment::at(1), Segment::image("x")])
            .unwrap();
        assert_eq!(validity(&results), [true, true]);
    }

    #[test]
    fn test_optional_consumes_same_typed_segment() {
        // The optional element consumes the segment it matches, so the
        // required text that follows finds nothing left.
        let pattern = Pattern::new().text("a").optional().text("a");
        assert!(pattern.matches(&[Segment::text("a")]).is_none());

        let results = pattern.matches(&[Segment::text("a"), Segment::text("a")]).unwrap();
        assert_eq!(validity(&results), [true, true]);
    }

    #[test]
    fn test_capture_groups() {
        let pattern = Pattern::new().text("((ha)+)");
        let results = pattern.matches(&[Segment::text("test haha test")]).unwrap();
        assert_eq!(
            results[0].text().unwrap(),
            ["haha".to_string(), "haha".to_string(), "ha".to_string()]
        );
    }

    #[test]
    fn test_non_participating_group_is_empty() {
        let pattern = Pattern::new().text("(a)|(b)");
        let results = pattern.matches(&[Segment::text("b")]).unwrap();
        assert_eq!(results[0].text().unwrap(), ["b", "", "b"]);
    }

    #[test]
    fn test_custom_segment() {
        let pattern = Pattern::new()
            .segment("face", |segment| {
                segment
                    .get("id")
                    .filter(|id| *id == "14")
                    .map(|id| ParsedValue::Str(id.to_string()))
            })
            .name("smile");
        let results = pattern.matches(&[Segment::face(14)]).unwrap();
        assert_eq!(results[0].name(), Some("smile"));
        assert_eq!(results[0].value(), &ParsedValue::Str("14".into()));
        assert!(pattern.matches(&[Segment::face(1)]).is_none());
    }

    #[test]
    fn test_empty_pattern_and_message() {
        assert_eq!(Pattern::new().matches(&[]), Some(Vec::new()));
        assert!(Pattern::new().matches(&[Segment::text("x")]).is_none());
        assert!(Pattern::new().text("x").matches(&[]).is_none());

        let results = Pattern::new().at().optional().matches(&[]).unwrap();
        assert_eq!(validity(&results), [false]);
    }

    #[test]
    fn test_repeated_matching_is_stable() {
        let pattern = Pattern::new().reply().optional().text(r"(\d+)").at().optional();
        let message = [Segment::text("roll 20"), Segment::at(3)];
        let first = pattern.matches(&message);
        for _ in 0..3 {
            assert_eq!(pattern.matches(&message), first);
        }
    }
}
