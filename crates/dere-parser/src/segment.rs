//! Splitting a document's text into line instances.

use std::sync::Arc;

use dere_core::corpus::Instance;

/// One instance together with its absolute character range in the document.
#[derive(Debug)]
pub struct Segment {
    left: usize,
    right: usize,
    instance: Instance,
}

impl Segment {
    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Whether the absolute range `[left, right)` lies inside this segment.
    pub fn contains(&self, left: usize, right: usize) -> bool {
        self.left <= left && right <= self.right
    }

    pub(crate) fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instance
    }

    pub(crate) fn into_instance(self) -> Instance {
        self.instance
    }
}

/// Split `text` into one instance per physical line, terminator included.
///
/// Ranges are in characters, contiguous, and cover the whole text; a final
/// line without a terminator still forms an instance.
pub fn segment(doc_id: &Arc<str>, text: &str) -> Vec<Segment> {
    let mut right = 0;
    text.split_inclusive('\n')
        .map(|line| {
            let left = right;
            let instance = Instance::new(Arc::clone(doc_id), line);
            right = left + instance.len();
            Segment {
                left,
                right,
                instance,
            }
        })
        .collect()
}

/// First segment whose range contains `[left, right)`.
pub fn owning_segment(segments: &[Segment], left: usize, right: usize) -> Option<usize> {
    segments
        .iter()
        .position(|segment| segment.contains(left, right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ranges(text: &str) -> Vec<(usize, usize)> {
        segment(&Arc::from("d"), text)
            .iter()
            .map(|s| (s.left(), s.right()))
            .collect()
    }

    #[test]
    fn test_lines_keep_terminator() {
        let segments = segment(&Arc::from("d"), "ab\ncd\n");
        let texts: Vec<_> = segments.iter().map(|s| s.instance().text()).collect();
        assert_eq!(texts, ["ab\n", "cd\n"]);
        assert_eq!(ranges("ab\ncd\n"), [(0, 3), (3, 6)]);
    }

    #[test]
    fn test_unterminated_last_line() {
        assert_eq!(ranges("ab\ncd"), [(0, 3), (3, 5)]);
    }

    #[test]
    fn test_empty_text_has_no_instances() {
        assert!(ranges("").is_empty());
    }

    #[test]
    fn test_ranges_count_characters() {
        assert_eq!(ranges("αβ\nγ\n"), [(0, 3), (3, 5)]);
    }

    #[test]
    fn test_owning_segment_boundaries() {
        let segments = segment(&Arc::from("d"), "abc\ndef\n");
        assert_eq!(owning_segment(&segments, 0, 4), Some(0));
        assert_eq!(owning_segment(&segments, 4, 4), Some(0));
        assert_eq!(owning_segment(&segments, 4, 5), Some(1));
        assert_eq!(owning_segment(&segments, 2, 6), None);
        assert_eq!(owning_segment(&segments, 8, 9), None);
    }

    proptest! {
        #[test]
        fn prop_segments_cover_text(text in "[a-zα\n ]{0,64}") {
            let doc_id: Arc<str> = Arc::from("d");
            let segments = segment(&doc_id, &text);

            let mut expected_left = 0;
            for segment in &segments {
                prop_assert_eq!(segment.left(), expected_left);
                prop_assert!(segment.right() > segment.left());
                prop_assert_eq!(segment.right() - segment.left(), segment.instance().len());
                expected_left = segment.right();
            }
            prop_assert_eq!(expected_left, text.chars().count());

            let joined: String = segments.iter().map(|s| s.instance().text()).collect();
            prop_assert_eq!(joined, text);
        }
    }
}
