/// A byte-offset range into the source text.
///
/// The language spec doesn't require positions for correct evaluation, but
/// carrying them through costs nothing and makes `PARSER_TRACE` output and
/// future diagnostics more useful. `Span::DUMMY` stands in wherever a node
/// is synthesized rather than parsed (e.g. macro expansion splices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Smallest span that contains both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
