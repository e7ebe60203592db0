//! Interactive quiz loop over a [`QuizSession`].
//!
//! One command per input line:
//!
//! | Phase    | Input         | Effect                          |
//! |----------|---------------|---------------------------------|
//! | active   | Enter or `f`  | flip the card                   |
//! | active   | `y` / `n`     | answer (only once flipped)      |
//! | active   | `x`           | explain the current card        |
//! | active   | `q`           | abandon the quiz                |
//! | finished | `r`           | restart with a fresh shuffle    |
//! | finished | `j` / `c`     | export the deck as JSON / CSV   |
//! | finished | `q` or Enter  | back to the title               |

use std::io::Write;
use std::path::PathBuf;

use flashcard_core::{ExportFormat, Phase, QuizSession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::client::TextGenerator;
use crate::error::AppError;
use crate::pipeline::{Generator, EXPLANATION_FAILED};

pub struct QuizRunner<'a, G, R, W> {
    session: &'a mut QuizSession,
    generator: &'a Generator<G>,
    input: Lines<R>,
    out: W,
    export_dir: PathBuf,
}

impl<'a, G, R, W> QuizRunner<'a, G, R, W>
where
    G: TextGenerator,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        session: &'a mut QuizSession,
        generator: &'a Generator<G>,
        input: R,
        out: W,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            generator,
            input: input.lines(),
            out,
            export_dir,
        }
    }

    /// Drive the session until the user returns to the title or input ends.
    pub async fn run(mut self) -> Result<(), AppError> {
        loop {
            match self.session.phase() {
                Phase::Idle => return Ok(()),
                Phase::Active => {
                    self.show_card()?;
                    let Some(line) = self.input.next_line().await? else {
                        return Ok(());
                    };
                    self.on_active(line.trim()).await?;
                }
                Phase::Finished => {
                    self.show_summary()?;
                    let Some(line) = self.input.next_line().await? else {
                        return Ok(());
                    };
                    self.on_finished(line.trim()).await?;
                }
            }
        }
    }

    async fn on_active(&mut self, command: &str) -> Result<(), AppError> {
        match command {
            "" | "f" => {
                self.session.flip_card();
            }
            "y" | "n" if !self.session.is_flipped() => {
                writeln!(self.out, "Flip the card first.")?;
            }
            "y" => {
                self.session.handle_answer(true)?;
            }
            "n" => {
                self.session.handle_answer(false)?;
            }
            "x" => self.explain().await?,
            "q" => self.session.reset_app(),
            other => writeln!(self.out, "Unknown command: {}", other)?,
        }
        Ok(())
    }

    async fn on_finished(&mut self, command: &str) -> Result<(), AppError> {
        match command {
            "r" => self.session.restart_quiz()?,
            "j" => self.export(ExportFormat::Json).await?,
            "c" => self.export(ExportFormat::Csv).await?,
            "" | "q" => self.session.reset_app(),
            other => writeln!(self.out, "Unknown command: {}", other)?,
        }
        Ok(())
    }

    fn show_card(&mut self) -> Result<(), AppError> {
        let (Some(card), Some(progress)) = (self.session.current_card(), self.session.progress())
        else {
            return Ok(());
        };

        writeln!(
            self.out,
            "\nQuestion {} / {} ({:.0}%)",
            progress.position,
            progress.total,
            progress.percent()
        )?;
        writeln!(self.out, "Q: {}", card.front_text)?;
        if self.session.is_flipped() {
            writeln!(self.out, "A: {}", card.back_text)?;
            writeln!(self.out, "[y] correct  [n] incorrect  [x] explain  [q] quit")?;
        } else {
            writeln!(self.out, "[Enter] flip  [x] explain  [q] quit")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn show_summary(&mut self) -> Result<(), AppError> {
        let Some(summary) = self.session.summary() else {
            return Ok(());
        };
        let correct_pct = summary.correct_ratio() * 100.0;

        writeln!(self.out, "\nQuiz finished!")?;
        writeln!(self.out, "Correct:   {} ({:.0}%)", summary.correct, correct_pct)?;
        writeln!(
            self.out,
            "Incorrect: {} ({:.0}%)",
            summary.incorrect,
            if summary.total == 0 { 0.0 } else { 100.0 - correct_pct }
        )?;
        writeln!(
            self.out,
            "[r] restart  [j] export JSON  [c] export CSV  [q] back to title"
        )?;
        self.out.flush()?;
        Ok(())
    }

    async fn explain(&mut self) -> Result<(), AppError> {
        if self.session.is_elaborating() || self.session.current_card().is_none() {
            return Ok(());
        }
        writeln!(self.out, "Generating explanation...")?;
        self.out.flush()?;

        let Some((ticket, card)) = self.session.begin_elaboration() else {
            return Ok(());
        };
        let result = self.generator.explain(&card).await;
        if !self.session.finish_elaboration(ticket) {
            return Ok(());
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "explanation failed");
                format!("{} ({})", EXPLANATION_FAILED, e)
            }
        };
        writeln!(self.out, "\n{}\n", text.trim())?;
        Ok(())
    }

    async fn export(&mut self, format: ExportFormat) -> Result<(), AppError> {
        let content = format.render(self.session.deck())?;
        let path = self.export_dir.join(format.file_name());
        tokio::fs::write(&path, content).await?;
        writeln!(self.out, "Saved {}", path.display())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedGenerator;
    use flashcard_core::{snapshot, Card};
    use pretty_assertions::assert_eq;

    fn deck() -> Vec<Card> {
        vec![Card::new("Q1", "A1"), Card::new("Q2", "A2")]
    }

    fn active_session() -> QuizSession {
        let mut session = QuizSession::with_deck(deck());
        session.start_quiz().unwrap();
        session
    }

    async fn drive(
        session: &mut QuizSession,
        generator: &Generator<CannedGenerator>,
        script: &str,
        export_dir: PathBuf,
    ) -> String {
        let mut out = Vec::new();
        QuizRunner::new(session, generator, script.as_bytes(), &mut out, export_dir)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_full_quiz_then_back_to_title() {
        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::ok("unused"));

        let out = drive(&mut session, &generator, "\ny\nf\nn\nq\n", PathBuf::from(".")).await;

        assert!(out.contains("Question 1 / 2 (50%)"));
        assert!(out.contains("Question 2 / 2 (100%)"));
        assert!(out.contains("Correct:   1 (50%)"));
        assert!(out.contains("Incorrect: 1 (50%)"));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.deck().is_empty());
    }

    #[tokio::test]
    async fn test_answer_requires_flip() {
        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::ok("unused"));

        let out = drive(&mut session, &generator, "y\n", PathBuf::from(".")).await;

        assert!(out.contains("Flip the card first."));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.cursor(), 0);
    }

    #[tokio::test]
    async fn test_end_of_input_keeps_session() {
        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::ok("unused"));

        drive(&mut session, &generator, "\ny\n", PathBuf::from(".")).await;

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.correct_count(), 1);
    }

    #[tokio::test]
    async fn test_explain_shows_text() {
        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::ok("## Conclusion 💡\nBecause."));

        let out = drive(&mut session, &generator, "x\n", PathBuf::from(".")).await;

        assert!(out.contains("## Conclusion 💡\nBecause."));
        assert!(!session.is_elaborating());
        assert_eq!(generator.client().calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_explain_failure_is_not_fatal() {
        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::failing("quota exceeded"));

        let out = drive(&mut session, &generator, "x\n\ny\n", PathBuf::from(".")).await;

        assert!(out.contains(EXPLANATION_FAILED));
        assert!(out.contains("quota exceeded"));
        assert_eq!(session.cursor(), 1);
    }

    #[tokio::test]
    async fn test_restart_and_export_from_summary() {
        let dir = std::env::temp_dir().join(format!("flashcards-quiz-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut session = active_session();
        let generator = Generator::new(CannedGenerator::ok("unused"));
        let out = drive(
            &mut session,
            &generator,
            "\nn\n\nn\nj\nc\nr\n",
            dir.clone(),
        )
        .await;

        assert!(out.contains("Correct:   0 (0%)"));
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.correct_count(), 0);

        let json = std::fs::read_to_string(dir.join("flashcards.json")).unwrap();
        let mut exported = snapshot::from_json(&json).unwrap();
        exported.sort_by(|a, b| a.front_text.cmp(&b.front_text));
        assert_eq!(exported, deck());

        let csv = std::fs::read_to_string(dir.join("wordholic_cards.csv")).unwrap();
        assert!(csv.starts_with(snapshot::CSV_HEADER));
        assert_eq!(csv.lines().count(), 3);

        std::fs::remove_dir_all(dir).ok();
    }
}
