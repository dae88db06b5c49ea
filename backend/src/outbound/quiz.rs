//! Static daily quiz adapter.
//!
//! Remote quiz generation is an external capability and stays out of this
//! repository; this adapter serves the fixed fallback question those
//! deployments would fall back to anyway.

use crate::domain::ports::{QuizSource, QuizSourceError};
use crate::domain::quiz::Quiz;

/// Quiz source returning one fixed environmental question.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticQuizSource;

impl QuizSource for StaticQuizSource {
    fn daily(&self) -> Result<Quiz, QuizSourceError> {
        Ok(Quiz {
            question: "Which habit does the most to cut your daily carbon footprint?".to_owned(),
            options: vec![
                "A. Using disposable tableware".to_owned(),
                "B. Taking public transport".to_owned(),
                "C. Driving everywhere, however short the trip".to_owned(),
                "D. Leaving lights on in empty rooms".to_owned(),
            ],
            answer: "B".to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn the_answer_names_an_option() {
        let quiz = StaticQuizSource.daily().expect("static source");
        assert!(
            quiz.options
                .iter()
                .any(|option| option.starts_with(&quiz.answer))
        );
        assert_eq!(quiz.options.len(), 4);
    }
}
