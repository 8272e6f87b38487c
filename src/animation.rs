//! Line transition animations.
//!
//! Animations are plain iterators of row texts. They never sleep; pacing is
//! done by the display worker that plays them.

/// Slide-in from the right edge.
///
/// Frame `k` of `width + 1` shows the target shifted right by `width - k`
/// blank columns, cut to the row width. Frame 0 is all blanks and the last
/// frame is the target itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideIn {
    target: Vec<char>,
    width: usize,
    step: usize,
}

/// Build a fresh slide-in sequence for `target` on a row of `width` cells.
pub fn slide_in_from_right(target: &str, width: usize) -> SlideIn {
    SlideIn {
        target: target.chars().collect(),
        width,
        step: 0,
    }
}

impl SlideIn {
    fn frame(&self, step: usize) -> String {
        if step == self.width {
            return self.target.iter().collect();
        }
        std::iter::repeat_n(' ', self.width - step)
            .chain(self.target.iter().copied())
            .take(self.width)
            .collect()
    }
}

impl Iterator for SlideIn {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.step > self.width {
            return None;
        }
        let frame = self.frame(self.step);
        self.step += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.width + 1).saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlideIn {}
