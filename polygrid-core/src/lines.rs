/// Line-oriented reader shared by the OFF and VTK grammars

/// Cursor over the lines of an in-memory source file.
///
/// Lines are yielded trimmed, paired with their 1-based number in the raw
/// file. Numbering always counts blank and comment lines so that error
/// messages point at the real location in the file.
pub struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> LineCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }

    /// Next line regardless of content. Used for header lines that would
    /// otherwise be skipped as comments (the VTK version header starts
    /// with `#`).
    pub fn next_raw(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(i, line)| (i + 1, line.trim()))
    }

    /// Next non-empty, non-comment line.
    pub fn next_significant(&mut self) -> Option<(usize, &'a str)> {
        while let Some((number, line)) = self.next_raw() {
            if !line.is_empty() && !line.starts_with('#') {
                return Some((number, line));
            }
        }
        None
    }
}
