//! Country guesser: click the named country on the globe.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::config::QUIZ_QUESTION_COUNT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizMode {
    #[default]
    EntireWorld,
}

impl QuizMode {
    pub const ALL: [QuizMode; 1] = [QuizMode::EntireWorld];

    pub fn value(self) -> &'static str {
        match self {
            QuizMode::EntireWorld => "entire-world",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizMode::EntireWorld => "Entire world",
        }
    }
}

impl FromStr for QuizMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizMode::ALL
            .into_iter()
            .find(|mode| mode.value() == s)
            .ok_or_else(|| QuizError::UnknownMode(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    EmptyPool,
    UnknownMode(String),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::EmptyPool => write!(f, "no countries to draw questions from"),
            QuizError::UnknownMode(mode) => write!(f, "unknown quiz mode: {mode}"),
        }
    }
}

impl std::error::Error for QuizError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizStatus {
    #[default]
    NotStarted,
    Started,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub index: usize,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Correct { clicked: String },
    Wrong { clicked: String },
}

impl Answer {
    pub fn is_correct(&self) -> bool {
        matches!(self, Answer::Correct { .. })
    }

    pub fn clicked(&self) -> &str {
        match self {
            Answer::Correct { clicked } | Answer::Wrong { clicked } => clicked,
        }
    }
}

/// Draw `count` answers from `pool` without replacement. Only a pool smaller than
/// `count` repeats answers, starting over on a fresh copy once it runs dry.
pub fn generate_quiz<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<Question> {
    if pool.is_empty() {
        return Vec::new();
    }
    let mut remaining = Vec::new();
    (0..count)
        .map(|index| {
            if remaining.is_empty() {
                remaining = pool.to_vec();
            }
            let pick = rng.gen_range(0..remaining.len());
            Question {
                index,
                answer: remaining.swap_remove(pick),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct CountryGuesser {
    pool: Vec<String>,
    mode: QuizMode,
    status: QuizStatus,
    questions: Vec<Question>,
    current: usize,
    correct: usize,
    pending: Option<Answer>,
}

impl CountryGuesser {
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn set_pool(&mut self, pool: Vec<String>) {
        self.pool = pool;
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: QuizMode) {
        self.mode = mode;
    }

    pub fn status(&self) -> QuizStatus {
        self.status
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.status {
            QuizStatus::Started => self.questions.get(self.current),
            _ => None,
        }
    }

    /// One-based position of the active question.
    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn pending(&self) -> Option<&Answer> {
        self.pending.as_ref()
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Start, or restart, with a fresh set of questions.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizError> {
        if self.pool.is_empty() {
            return Err(QuizError::EmptyPool);
        }
        self.questions = generate_quiz(&self.pool, QUIZ_QUESTION_COUNT, rng);
        self.current = 0;
        self.correct = 0;
        self.pending = None;
        self.status = QuizStatus::Started;
        tracing::info!(mode = self.mode.value(), questions = self.questions.len(), "quiz started");
        Ok(())
    }

    /// Grade a clicked country. Ignored unless a question is waiting for an answer.
    pub fn answer(&mut self, clicked: &str) -> Option<&Answer> {
        if self.pending.is_some() {
            return None;
        }
        let question = self.current_question()?;
        let answer = if question.answer == clicked {
            self.correct += 1;
            Answer::Correct {
                clicked: clicked.to_string(),
            }
        } else {
            Answer::Wrong {
                clicked: clicked.to_string(),
            }
        };
        tracing::debug!(clicked, correct = answer.is_correct(), "answer graded");
        self.pending = Some(answer);
        self.pending.as_ref()
    }

    /// Skip or move on. Advancing from the last question completes the quiz.
    pub fn next_question(&mut self) {
        if self.status != QuizStatus::Started {
            return;
        }
        self.pending = None;
        if self.is_last_question() {
            self.status = QuizStatus::Completed;
            tracing::info!(correct = self.correct, total = self.total(), "quiz completed");
        } else {
            self.current += 1;
        }
    }

    pub fn quit(&mut self) {
        self.status = QuizStatus::NotStarted;
        self.questions.clear();
        self.current = 0;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn nordics() -> Vec<String> {
        ["Norway", "Sweden", "Denmark", "Finland"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn draws_three_unique_answers_from_pool() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let questions = generate_quiz(&nordics(), 3, &mut rng);
            let answers: HashSet<_> = questions.iter().map(|q| q.answer.as_str()).collect();
            assert_eq!(questions.len(), 3);
            assert_eq!(answers.len(), 3);
            assert!(answers.iter().all(|a| nordics().iter().any(|n| n == a)));
            assert_eq!(
                questions.iter().map(|q| q.index).collect::<Vec<_>>(),
                vec![0, 1, 2]
            );
        }
    }

    #[test]
    fn small_pool_repeats_only_after_running_dry() {
        let pool = vec!["Norway".to_string(), "Sweden".to_string()];
        let mut rng = StdRng::seed_from_u64(7);
        let questions = generate_quiz(&pool, 3, &mut rng);
        assert_eq!(questions.len(), 3);
        assert_ne!(questions[0].answer, questions[1].answer);
    }

    #[test]
    fn exact_answer_scores_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut quiz = CountryGuesser::new(nordics());
        quiz.start(&mut rng).unwrap();

        let target = quiz.current_question().unwrap().answer.clone();
        assert!(quiz.answer(&target).unwrap().is_correct());
        assert_eq!(quiz.answer(&target), None);
        assert_eq!(quiz.correct(), 1);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut quiz = CountryGuesser::new(nordics());
        quiz.start(&mut rng).unwrap();

        let target = quiz.current_question().unwrap().answer.to_lowercase();
        let answer = quiz.answer(&target).unwrap();
        assert!(!answer.is_correct());
        assert_eq!(answer.clicked(), target);
        assert_eq!(quiz.correct(), 0);
    }

    #[test]
    fn completes_after_advancing_past_last_question() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut quiz = CountryGuesser::new(nordics());
        quiz.start(&mut rng).unwrap();

        for n in 1..=3 {
            assert_eq!(quiz.status(), QuizStatus::Started);
            assert_eq!(quiz.question_number(), n);
            let target = quiz.current_question().unwrap().answer.clone();
            quiz.answer(&target);
            quiz.next_question();
        }

        assert_eq!(quiz.status(), QuizStatus::Completed);
        assert_eq!(quiz.correct(), 3);
        assert!(quiz.correct() <= quiz.total());
        assert_eq!(quiz.answer("Norway"), None);

        quiz.next_question();
        assert_eq!(quiz.status(), QuizStatus::Completed);
    }

    #[test]
    fn skipping_advances_without_scoring() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut quiz = CountryGuesser::new(nordics());
        quiz.start(&mut rng).unwrap();

        quiz.next_question();
        assert_eq!(quiz.question_number(), 2);
        assert_eq!(quiz.correct(), 0);
        assert!(quiz.pending().is_none());
    }

    #[test]
    fn restart_resets_score_and_quit_discards_quiz() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut quiz = CountryGuesser::new(nordics());
        quiz.start(&mut rng).unwrap();
        let target = quiz.current_question().unwrap().answer.clone();
        quiz.answer(&target);

        quiz.start(&mut rng).unwrap();
        assert_eq!(quiz.correct(), 0);
        assert_eq!(quiz.question_number(), 1);
        assert!(quiz.pending().is_none());

        quiz.quit();
        assert_eq!(quiz.status(), QuizStatus::NotStarted);
        assert!(quiz.current_question().is_none());
        assert_eq!(quiz.answer("Norway"), None);
    }

    #[test]
    fn empty_pool_is_an_error_and_keeps_state() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut quiz = CountryGuesser::new(Vec::new());
        assert_eq!(quiz.start(&mut rng), Err(QuizError::EmptyPool));
        assert_eq!(quiz.status(), QuizStatus::NotStarted);
    }

    #[test]
    fn mode_parses_from_its_value() {
        assert_eq!("entire-world".parse::<QuizMode>(), Ok(QuizMode::EntireWorld));
        assert_eq!(
            "mode1".parse::<QuizMode>(),
            Err(QuizError::UnknownMode("mode1".into()))
        );
    }
}
