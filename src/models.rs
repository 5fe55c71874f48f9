use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::err::Error;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub grade: String,
    pub maths: i64,
    pub science: i64,
    pub english: i64,
    pub hindi: i64,
    pub computer: i64,
    pub email: String,
    pub phone: String,
}

impl StudentRecord {
    pub fn marks(&self) -> Marks {
        Marks {
            maths: self.maths,
            science: self.science,
            english: self.english,
            hindi: self.hindi,
            computer: self.computer,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub ssid: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Register and login submit the same two fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The five subject scores of one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marks {
    pub maths: i64,
    pub science: i64,
    pub english: i64,
    pub hindi: i64,
    pub computer: i64,
}

impl Marks {
    pub const SUBJECTS: i64 = 5;

    pub fn total(&self) -> i64 {
        self.maths + self.science + self.english + self.hindi + self.computer
    }

    pub fn average(&self) -> f64 {
        self.total() as f64 / Self::SUBJECTS as f64
    }
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub grade: String,
    pub marks: Marks,
    pub email: String,
    pub phone: String,
}

/// Raw add/edit form payload. Score fields arrive as text and are converted
/// exactly once, at this boundary; handlers only ever see typed values.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentForm {
    pub name: String,
    pub grade: String,
    pub maths: String,
    pub science: String,
    pub english: String,
    pub hindi: String,
    pub computer: String,
    pub email: String,
    pub phone: String,
}

impl StudentForm {
    pub fn into_new_student(self) -> Result<NewStudent, Error> {
        let marks = Marks {
            maths: parse_score("maths", &self.maths)?,
            science: parse_score("science", &self.science)?,
            english: parse_score("english", &self.english)?,
            hindi: parse_score("hindi", &self.hindi)?,
            computer: parse_score("computer", &self.computer)?,
        };
        Ok(NewStudent {
            name: self.name,
            grade: self.grade,
            marks,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Raw add_marks form payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MarksForm {
    pub maths: String,
    pub science: String,
    pub english: String,
    pub hindi: String,
    pub computer: String,
}

impl MarksForm {
    pub fn into_marks(self) -> Result<Marks, Error> {
        Ok(Marks {
            maths: parse_score("maths", &self.maths)?,
            science: parse_score("science", &self.science)?,
            english: parse_score("english", &self.english)?,
            hindi: parse_score("hindi", &self.hindi)?,
            computer: parse_score("computer", &self.computer)?,
        })
    }
}

// Scores must be whole numbers; no range bound is enforced.
fn parse_score(field: &'static str, raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Validation { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(maths: &str) -> StudentForm {
        StudentForm {
            name: "Asha Rao".to_string(),
            grade: "10A".to_string(),
            maths: maths.to_string(),
            science: "85".to_string(),
            english: "78".to_string(),
            hindi: "88".to_string(),
            computer: "95".to_string(),
            email: "asha@example.com".to_string(),
            phone: "555-0101".to_string(),
        }
    }

    #[test]
    fn scores_parse_with_surrounding_whitespace() {
        let new = form(" 90 ").into_new_student().unwrap();
        assert_eq!(new.marks.maths, 90);
        assert_eq!(new.marks.computer, 95);
    }

    #[test]
    fn non_numeric_score_names_the_offending_field() {
        let err = form("ninety").into_new_student().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "maths" }));
    }

    #[test]
    fn empty_score_is_rejected() {
        let err = form("").into_new_student().unwrap_err();
        assert!(matches!(err, Error::Validation { field: "maths" }));
    }

    #[test]
    fn marks_total_and_average() {
        let marks = form("90").into_new_student().unwrap().marks;
        assert_eq!(marks.total(), 436);
        assert!((marks.average() - 87.2).abs() < 1e-9);
    }

    #[test]
    fn marks_form_converts() {
        let marks = MarksForm {
            maths: "10".to_string(),
            science: "20".to_string(),
            english: "30".to_string(),
            hindi: "40".to_string(),
            computer: "50".to_string(),
        }
        .into_marks()
        .unwrap();
        assert_eq!(marks.total(), 150);
    }
}
