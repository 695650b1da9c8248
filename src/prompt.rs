//! Interactive prompting for table edits.
//!
//! Generic over the input and output streams, so the dialogue can be driven
//! by in-memory buffers under test and by stdin/stdout in the binary.

use crate::editor::InsertionRequest;
use std::io;
use std::io::BufRead;
use std::io::Write;

/// Reply to a yes/no/quit question
enum Answer {
    Yes,
    No,
    Quit,
}

/// Outcome of the per-table dialogue
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    /// Proceed with the given (possibly empty) insertion request
    Edit(InsertionRequest),
    /// Stop processing the remaining tables
    Quit,
}

/// Line-oriented prompter over arbitrary input and output streams
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Prompter<R, W> {
        Prompter { input, output }
    }

    /// Writes a message followed by a newline
    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    /// Runs the dialogue for one table: whether and where to insert a row,
    /// then whether and where to insert a column. Declining both yields an
    /// empty request; `q` at either question quits outright.
    pub fn table_decision(&mut self, rows: usize, cols: usize) -> io::Result<Decision> {
        let row = match self.confirm("Insert a new row? (y/n/q): ")? {
            Answer::Quit => return Ok(Decision::Quit),
            Answer::Yes => self.position("row", rows + 1)?,
            Answer::No => None,
        };
        let col = match self.confirm("Insert a new column? (y/n/q): ")? {
            Answer::Quit => return Ok(Decision::Quit),
            Answer::Yes => self.position("column", cols + 1)?,
            Answer::No => None,
        };
        Ok(Decision::Edit(InsertionRequest::new(row, col)))
    }

    /// Reads one trimmed, lowercased line; `None` on end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    /// Asks a yes/no/quit question; anything other than `y` or `q` declines.
    /// End of input counts as quit.
    fn confirm(&mut self, prompt: &str) -> io::Result<Answer> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let answer = match self.read_line()? {
            None => Answer::Quit,
            Some(line) => match line.as_str() {
                "q" => Answer::Quit,
                "y" => Answer::Yes,
                _ => Answer::No,
            },
        };
        Ok(answer)
    }

    /// Asks for a 1-based position up to `limit`, re-prompting on invalid
    /// input until the answer is valid or the user opts out with `q`
    fn position(&mut self, axis: &str, limit: usize) -> io::Result<Option<usize>> {
        loop {
            write!(
                self.output,
                "At which {} position? (1-{}, 'q' to skip): ",
                axis, limit
            )?;
            self.output.flush()?;
            match self.read_line()? {
                None => return Ok(None),
                Some(line) if line == "q" => return Ok(None),
                Some(line) => {
                    if let Ok(position) = line.parse::<usize>() {
                        if (1..=limit).contains(&position) {
                            return Ok(Some(position));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Position;
    use std::io::Cursor;

    fn decide(script: &str, rows: usize, cols: usize) -> (Decision, String) {
        let mut output = Vec::new();
        let decision = Prompter::new(Cursor::new(script), &mut output)
            .table_decision(rows, cols)
            .unwrap();
        (decision, String::from_utf8(output).unwrap())
    }

    #[test]
    fn row_only_dialogue() {
        let (decision, _) = decide("y\n2\nn\n", 2, 2);

        assert_eq!(
            decision,
            Decision::Edit(InsertionRequest { row: Position::At(2), col: Position::Absent })
        );
    }

    #[test]
    fn row_and_column_dialogue() {
        let (decision, _) = decide("y\n3\ny\n1\n", 2, 2);

        assert_eq!(
            decision,
            Decision::Edit(InsertionRequest { row: Position::At(3), col: Position::At(1) })
        );
    }

    #[test]
    fn declining_both_yields_empty_request() {
        let (decision, _) = decide("n\nn\n", 2, 2);

        assert_eq!(decision, Decision::Edit(InsertionRequest::default()));
    }

    #[test]
    fn invalid_positions_are_reprompted() {
        let (decision, output) = decide("y\nabc\n9\n0\n2\nn\n", 2, 2);

        assert_eq!(
            decision,
            Decision::Edit(InsertionRequest { row: Position::At(2), col: Position::Absent })
        );
        assert_eq!(output.matches("At which row position?").count(), 4);
    }

    #[test]
    fn position_prompt_accepts_the_append_bound() {
        let (decision, _) = decide("y\n3\nn\n", 2, 2);

        assert_eq!(
            decision,
            Decision::Edit(InsertionRequest { row: Position::At(3), col: Position::Absent })
        );
    }

    #[test]
    fn skipping_the_position_leaves_the_axis_absent() {
        let (decision, _) = decide("y\nq\nn\n", 2, 2);

        assert_eq!(decision, Decision::Edit(InsertionRequest::default()));
    }

    #[test]
    fn quit_at_the_row_question() {
        let (decision, _) = decide("q\n", 2, 2);

        assert_eq!(decision, Decision::Quit);
    }

    #[test]
    fn quit_at_the_column_question_discards_the_row() {
        let (decision, _) = decide("y\n1\nq\n", 2, 2);

        assert_eq!(decision, Decision::Quit);
    }

    #[test]
    fn end_of_input_counts_as_quit() {
        let (decision, _) = decide("", 2, 2);

        assert_eq!(decision, Decision::Quit);
    }
}
