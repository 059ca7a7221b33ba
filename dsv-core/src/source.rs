use std::iter::Peekable;

/// A sequential source of already decoded characters.
///
/// The parser only ever needs to read the next character, look one
/// character ahead, and ask whether anything is left. Any peekable
/// character iterator is a source:
///
/// ```
/// use dsv_core::Source;
///
/// let mut src = "ab".chars().peekable();
/// assert_eq!(src.peek_char(), Some('a'));
/// assert_eq!(src.next_char(), Some('a'));
/// assert_eq!(src.next_char(), Some('b'));
/// assert!(!src.has_more());
/// ```
pub trait Source {
    /// Consume and return the next character, or `None` at the end of input.
    fn next_char(&mut self) -> Option<char>;

    /// Return the next character without consuming it.
    fn peek_char(&mut self) -> Option<char>;

    /// Returns true if at least one more character can be read.
    fn has_more(&mut self) -> bool {
        self.peek_char().is_some()
    }
}

impl<I: Iterator<Item = char>> Source for Peekable<I> {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        self.next()
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        self.peek().copied()
    }
}

impl<'a, S: Source + ?Sized> Source for &'a mut S {
    #[inline]
    fn next_char(&mut self) -> Option<char> {
        (**self).next_char()
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        (**self).peek_char()
    }

    #[inline]
    fn has_more(&mut self) -> bool {
        (**self).has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn empty() {
        let mut src = "".chars().peekable();
        assert!(!src.has_more());
        assert_eq!(None, src.peek_char());
        assert_eq!(None, src.next_char());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut src = "xy".chars().peekable();
        assert_eq!(Some('x'), src.peek_char());
        assert_eq!(Some('x'), src.peek_char());
        assert_eq!(Some('x'), src.next_char());
        assert!(src.has_more());
        assert_eq!(Some('y'), src.next_char());
        assert!(!src.has_more());
    }

    #[test]
    fn by_reference() {
        fn first<S: Source>(mut src: S) -> Option<char> {
            src.next_char()
        }

        let mut inner = "xy".chars().peekable();
        assert_eq!(Some('x'), first(&mut inner));
        assert_eq!(Some('y'), inner.next_char());
    }
}
