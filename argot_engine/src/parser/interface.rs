#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A column width, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Width(usize);

impl Width {
    /// The width, provided it is at least `minimum`.
    pub(crate) fn at_least(width: usize, minimum: usize) -> Option<Self> {
        if width >= minimum {
            Some(Width(width))
        } else {
            None
        }
    }
}

/// Lays out the two column (invocation, help) rows of the help message.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: Width,
    left: Width,
    // At least 2, so long words can be hyphenated.
    middle: Width,
}

// Target 95% of the total width, so the rows don't run right up against the terminal edge.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Assume the average word length is 5.
// Then 17 allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer that fits within `total_width`, stretching the middle column when there is room.
    pub(crate) fn guided(padding: Width, left: Width, middle: Width, total_width: usize) -> Self {
        let non_middle: usize = left.0 + padding.0;
        let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle.0, MINIMUM_MIDDLE_WIDTH);

        if guided_middle + non_middle <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} and middle fit within the target total {target_total_width}.  Selecting middle: {guided_middle}.");
            }

            Self::new(padding, left, Width(guided_middle))
        } else if non_middle < target_total_width {
            let calculated_middle =
                std::cmp::max(target_total_width - non_middle, MINIMUM_MIDDLE_WIDTH);

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} fit within the target total {target_total_width}.  Selecting middle: {calculated_middle}.");
            }

            Self::new(padding, left, Width(calculated_middle))
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} do not fit within the target total {target_total_width}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
            }

            Self::new(padding, left, Width(MINIMUM_MIDDLE_WIDTH))
        }
    }

    pub(crate) fn new(padding: Width, left: Width, middle: Width) -> Self {
        Self {
            padding,
            left,
            middle,
        }
    }

    /// Render one row.
    ///
    /// A `left` wider than the left column is placed on its own line, with the `middle` starting on the next.
    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding.0);
        let left_column_width = self.left.0;
        let middle_parts = chunk(middle, self.middle.0);
        let mut out = Vec::default();

        if left.len() > left_column_width {
            out.push(format!("{:indent$}{left}", ""));

            for part in middle_parts {
                out.push(format!(
                    "{:indent$}{:left_column_width$}{padding}{part}",
                    "", ""
                ));
            }

            return out;
        }

        for (i, part) in middle_parts.iter().enumerate() {
            let left = if i == 0 { left } else { "" };
            out.push(format!(
                "{:indent$}{:left_column_width$}{padding}{part}",
                "", left
            ));
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if !word.is_empty() {
            if current.is_empty() {
                hyphenate(width, &mut lines, &mut current, word);
            } else if current.len() + word.len() + 1 <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = String::default();
                hyphenate(width, &mut lines, &mut current, word);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while left + width < characters.len() {
        let part: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{part}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

/// The output seam of a parser.
///
/// Implement this to redirect the help/usage and error messages (ex: into a log, or a test buffer).
pub trait UserInterface {
    /// Print a regular message (ex: the help message).
    fn print(&self, message: String);

    /// Print an error message.
    fn print_error(&self, message: String);
}

/// Prints to stdout & stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::UserInterface;
    use std::cell::RefCell;
    use std::sync::mpsc;

    #[derive(Default)]
    pub(crate) struct InMemoryInterface {
        message: RefCell<Option<Vec<String>>>,
        error: RefCell<Option<Vec<String>>>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, concatenating the messages.
            self.message
                .borrow_mut()
                .get_or_insert_with(Vec::default)
                .push(message);
        }

        fn print_error(&self, message: String) {
            self.error
                .borrow_mut()
                .get_or_insert_with(Vec::default)
                .push(message);
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume(self) -> (Option<String>, Option<String>) {
            let InMemoryInterface { message, error } = self;

            (
                message.take().map(|messages| messages.join("\n")),
                error.take().map(|errors| errors.join("\n")),
            )
        }

        pub(crate) fn consume_message(self) -> String {
            let (message, error) = self.consume();
            assert_eq!(error, None);
            message.unwrap()
        }

        pub(crate) fn consume_error(self) -> String {
            let (message, error) = self.consume();
            assert_eq!(message, None);
            error.unwrap()
        }
    }

    pub(crate) fn channel_interface() -> (SenderInterface, ReceiverInterface) {
        let (message_tx, message_rx) = mpsc::channel();
        let (error_tx, error_rx) = mpsc::channel();
        let sender = SenderInterface {
            message_tx,
            error_tx,
        };
        let receiver = ReceiverInterface {
            message_rx,
            error_rx,
        };
        (sender, receiver)
    }

    /// Hands its output over to a `ReceiverInterface`, so the output may be inspected after the parser (which owns the interface) is gone.
    pub(crate) struct SenderInterface {
        message_tx: mpsc::Sender<Option<String>>,
        error_tx: mpsc::Sender<Option<String>>,
    }

    impl Drop for SenderInterface {
        fn drop(&mut self) {
            self.message_tx.send(None).unwrap();
            self.error_tx.send(None).unwrap();
        }
    }

    impl UserInterface for SenderInterface {
        fn print(&self, message: String) {
            self.message_tx.send(Some(message)).unwrap();
        }

        fn print_error(&self, message: String) {
            self.error_tx.send(Some(message)).unwrap();
        }
    }

    pub(crate) struct ReceiverInterface {
        message_rx: mpsc::Receiver<Option<String>>,
        error_rx: mpsc::Receiver<Option<String>>,
    }

    impl ReceiverInterface {
        pub(crate) fn consume(self) -> (Option<String>, Option<String>) {
            let ReceiverInterface {
                message_rx,
                error_rx,
            } = self;

            (drain(message_rx), drain(error_rx))
        }

        pub(crate) fn consume_message(self) -> String {
            let (message, error) = self.consume();
            assert_eq!(error, None);
            message.unwrap()
        }

        pub(crate) fn consume_error(self) -> String {
            let (message, error) = self.consume();
            assert_eq!(message, None);
            error.unwrap()
        }
    }

    fn drain(receiver: mpsc::Receiver<Option<String>>) -> Option<String> {
        let mut values = Vec::default();

        while let Some(message) = receiver.recv().unwrap() {
            values.push(message);
        }

        if values.is_empty() {
            None
        } else {
            Some(values.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::util::*;
    use super::*;
    use rstest::rstest;

    fn renderer(left: usize, middle: usize) -> ColumnRenderer {
        ColumnRenderer::new(
            Width::at_least(2, 1).unwrap(),
            Width::at_least(left, 1).unwrap(),
            Width::at_least(middle, 2).unwrap(),
        )
    }

    #[rstest]
    #[case(0, 1, None)]
    #[case(1, 2, None)]
    #[case(2, 2, Some(Width(2)))]
    #[case(9, 1, Some(Width(9)))]
    fn width_at_least(
        #[case] width: usize,
        #[case] minimum: usize,
        #[case] expected: Option<Width>,
    ) {
        assert_eq!(Width::at_least(width, minimum), expected);
    }

    #[test]
    fn column_renderer_simple() {
        let lines = renderer(5, 20).render(0, "abc", "some help");
        assert_eq!(lines, vec!["abc    some help"]);
    }

    #[test]
    fn column_renderer_indent() {
        let lines = renderer(5, 20).render(2, "abc", "some help");
        assert_eq!(lines, vec!["  abc    some help"]);
    }

    #[test]
    fn column_renderer_middle_overflow() {
        let lines = renderer(3, 10).render(0, "abc", "one two three four");
        assert_eq!(
            lines,
            vec!["abc  one two", "     three four"]
        );
    }

    #[test]
    fn column_renderer_middle_empty() {
        let lines = renderer(5, 10).render(1, "abc", "");
        assert_eq!(lines, vec![" abc"]);
    }

    #[test]
    fn column_renderer_left_overflow() {
        let lines = renderer(3, 10).render(0, "abcdef", "help");
        assert_eq!(lines, vec!["abcdef", "     help"]);
    }

    #[rstest]
    #[case(20, 10, 17)]
    #[case(20, 100, 20)]
    #[case(80, 100, 80)]
    #[case(120, 100, 90)]
    #[case(120, 50, 42)]
    #[case(120, 4, 17)]
    fn column_renderer_guided(
        #[case] middle: usize,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        let renderer = ColumnRenderer::guided(Width(2), Width(3), Width(middle), total);
        assert_eq!(renderer.middle, Width(expected));
    }

    #[rstest]
    #[case("", 5, vec![])]
    #[case("a b c", 5, vec!["a b c"])]
    #[case("a b c d", 5, vec!["a b c", "d"])]
    #[case("abcdefgh", 4, vec!["abc-", "def-", "gh"])]
    #[case("abcd", 4, vec!["abcd"])]
    #[case("x abcde", 4, vec!["x", "abc-", "de"])]
    fn chunk_paragraph(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }

    #[test]
    fn in_memory_interface() {
        let interface = InMemoryInterface::default();
        interface.print("a".to_string());
        interface.print("b".to_string());
        assert_eq!(interface.consume_message(), "a\nb");

        let interface = InMemoryInterface::default();
        interface.print_error("x".to_string());
        assert_eq!(interface.consume_error(), "x");
    }

    #[test]
    fn channel_interface_drained() {
        let (sender, receiver) = channel_interface();
        sender.print("a".to_string());
        sender.print_error("b".to_string());
        drop(sender);
        assert_eq!(receiver.consume(), (Some("a".to_string()), Some("b".to_string())));
    }
}
