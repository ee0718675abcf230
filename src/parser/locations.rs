#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Location {
    /// Moves the location past `text`, starting a new line after each `\n`.
    pub(super) fn advance(&mut self, text: &str) {
        for chr in text.chars() {
            if chr == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub(super) fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub(super) fn at(location: Location) -> Self {
        Self::new(location, location)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} till {}", self.start, self.end)
        }
    }
}
