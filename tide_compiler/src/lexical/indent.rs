//! Off-side rule bookkeeping

/// Indentation widths on the current nesting path.
///
/// Always non-empty, bottom is 0, strictly increasing toward the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentStack {
    widths: Vec<usize>,
}

/// What the tokenizer must emit for a new line's indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChange {
    Same,
    Indent,
    /// Number of levels closed
    Dedent(usize),
}

/// A dedent to a width that was never pushed; `expected` is the nearest
/// open level below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentMismatch {
    pub expected: usize,
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentStack {
    pub fn new() -> Self {
        Self { widths: vec![0] }
    }

    pub fn top(&self) -> usize {
        self.widths.last().copied().unwrap_or(0)
    }

    /// Number of open blocks
    pub fn depth(&self) -> usize {
        self.widths.len() - 1
    }

    /// Move to `width`, pushing or popping as needed.
    ///
    /// On error the stack is left as it was.
    pub fn change_to(&mut self, width: usize) -> Result<IndentChange, IndentMismatch> {
        let top = self.top();
        if width == top {
            return Ok(IndentChange::Same);
        }
        if width > top {
            self.widths.push(width);
            return Ok(IndentChange::Indent);
        }

        // The bottom 0 always satisfies `w <= width`
        let index = self
            .widths
            .iter()
            .rposition(|&w| w <= width)
            .unwrap_or(0);
        if self.widths[index] != width {
            return Err(IndentMismatch {
                expected: self.widths[index],
            });
        }

        let closed = self.widths.len() - 1 - index;
        self.widths.truncate(index + 1);
        Ok(IndentChange::Dedent(closed))
    }

    /// Pop every open level; returns how many Dedents to emit
    pub fn close_all(&mut self) -> usize {
        let closed = self.depth();
        self.widths.truncate(1);
        closed
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_push_and_pop_levels() {
        let mut stack = IndentStack::new();
        assert_eq!(stack.change_to(0), Ok(IndentChange::Same));
        assert_eq!(stack.change_to(4), Ok(IndentChange::Indent));
        assert_eq!(stack.change_to(8), Ok(IndentChange::Indent));
        assert_eq!(stack.widths(), &[0, 4, 8]);

        assert_eq!(stack.change_to(0), Ok(IndentChange::Dedent(2)));
        assert_eq!(stack.widths(), &[0]);
    }

    #[test]
    fn test_inconsistent_width_is_rejected() {
        let mut stack = IndentStack::new();
        stack.change_to(4).unwrap();
        stack.change_to(8).unwrap();

        assert_matches!(stack.change_to(6), Err(IndentMismatch { expected: 4 }));
        assert_eq!(stack.widths(), &[0, 4, 8]);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_close_all() {
        let mut stack = IndentStack::new();
        stack.change_to(2).unwrap();
        stack.change_to(3).unwrap();

        assert_eq!(stack.close_all(), 2);
        assert_eq!(stack.top(), 0);
        assert_eq!(stack.close_all(), 0);
    }
}
