//! Live survey types

use serde::{Deserialize, Serialize};

use super::{QuestionId, SurveyId};

/// A live survey advanced by the host one question at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<SurveyQuestion>,
    /// Unset until the first advance, then 0, 1, ...
    #[serde(rename = "currQuestion", default)]
    pub curr_question: Option<u32>,
}

impl Survey {
    /// Move to the next question, starting at 0 when unset
    pub fn advance(&mut self) -> u32 {
        let next = self.curr_question.map_or(0, |i| i + 1);
        self.curr_question = Some(next);
        next
    }

    /// The question currently shown, if the index points at one
    pub fn current_question(&self) -> Option<&SurveyQuestion> {
        self.curr_question
            .and_then(|i| self.questions.get(i as usize))
    }

    /// Mutable access to the current question
    pub fn current_question_mut(&mut self) -> Option<&mut SurveyQuestion> {
        let idx = self.curr_question? as usize;
        self.questions.get_mut(idx)
    }
}

/// One question of a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: QuestionId,
    #[serde(rename = "surveyId")]
    pub survey_id: SurveyId,
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub answers: Vec<SurveyAnswer>,
}

/// A submitted answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub id: u64,
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    pub answer: String,
}

/// Answer submission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyAnswerInput {
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey_with(n: u64) -> Survey {
        Survey {
            id: 1,
            name: "Poll".to_string(),
            questions: (0..n)
                .map(|i| SurveyQuestion {
                    id: i + 10,
                    survey_id: 1,
                    prompt: format!("Q{}", i),
                    choices: vec![],
                    answers: vec![],
                })
                .collect(),
            curr_question: None,
        }
    }

    #[test]
    fn test_advance_starts_at_zero() {
        let mut survey = survey_with(2);
        assert!(survey.current_question().is_none());
        assert_eq!(survey.advance(), 0);
        assert_eq!(survey.current_question().unwrap().id, 10);
        assert_eq!(survey.advance(), 1);
        assert_eq!(survey.current_question().unwrap().id, 11);
    }

    #[test]
    fn test_advance_past_end_has_no_current_question() {
        let mut survey = survey_with(1);
        survey.advance();
        survey.advance();
        assert_eq!(survey.curr_question, Some(1));
        assert!(survey.current_question_mut().is_none());
    }
}
