//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::{DomainError, DomainResult};

/// Name given to records created without an explicit name.
pub const DEFAULT_NAME: &str = "John Doe";

/// Invitation status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    /// Invited, nothing received yet
    #[default]
    Pending,
    Paid,
    Delivered,
}

impl State {
    pub const ALL: [State; 3] = [State::Pending, State::Paid, State::Delivered];

    /// Canonical literal as stored and exported.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Pending => "PENDING",
            State::Paid => "PAID",
            State::Delivered => "DELIVERED",
        }
    }

    /// Exact match against the canonical literals.
    pub fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a state from free text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown state '{0}' (expected one of PENDING, PAID, DELIVERED)")]
pub struct ParseStateError(pub String);

/// Case-insensitive parsing, meant for user input.
///
/// Documents are validated against the exact literals, see [`State::from_literal`].
impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::from_literal(&upper).ok_or_else(|| ParseStateError(s.to_string()))
    }
}

/// Name and invitation state, shared by students, friends and teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub state: State,
}

impl Person {
    pub fn new(name: impl Into<String>, state: State) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    /// Apply an optional rename and an optional state change.
    pub fn update(&mut self, name: Option<String>, state: Option<State>) {
        apply_update(&mut self.name, &mut self.state, name, state);
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, State::default())
    }
}

/// A student and the friends they bring along.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub state: State,
    /// Display order is array order
    pub friends: Vec<Person>,
}

impl Student {
    pub fn new(name: impl Into<String>, state: State) -> Self {
        Self {
            name: name.into(),
            state,
            friends: Vec::new(),
        }
    }

    pub fn with_friends(mut self, friends: Vec<Person>) -> Self {
        self.friends = friends;
        self
    }

    /// Friends are left as they are.
    pub fn update(&mut self, name: Option<String>, state: Option<State>) {
        apply_update(&mut self.name, &mut self.state, name, state);
    }
}

impl Default for Student {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, State::default())
    }
}

fn apply_update(
    name: &mut String,
    state: &mut State,
    new_name: Option<String>,
    new_state: Option<State>,
) {
    if let Some(new_name) = new_name {
        *name = new_name;
    }
    if let Some(new_state) = new_state {
        *state = new_state;
    }
}

pub type Teacher = Person;

/// Root entity: everything that is persisted and exchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
}

impl Document {
    pub fn new(students: Vec<Student>, teachers: Vec<Teacher>) -> Self {
        Self { students, teachers }
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.teachers.is_empty()
    }

    /// Number of people in the document, friends included.
    pub fn headcount(&self) -> usize {
        self.students
            .iter()
            .map(|s| 1 + s.friends.len())
            .sum::<usize>()
            + self.teachers.len()
    }

    /// Append a student. Missing name/state fall back to the form defaults.
    pub fn add_student(&mut self, name: Option<String>, state: Option<State>) -> usize {
        let mut student = Student::default();
        student.update(name, state);
        self.students.push(student);
        self.students.len() - 1
    }

    pub fn remove_student(&mut self, index: usize) -> DomainResult<Student> {
        check_index("students", index, self.students.len())?;
        Ok(self.students.remove(index))
    }

    pub fn update_student(
        &mut self,
        index: usize,
        name: Option<String>,
        state: Option<State>,
    ) -> DomainResult<()> {
        self.student_mut(index)?.update(name, state);
        Ok(())
    }

    pub fn add_friend(
        &mut self,
        student: usize,
        name: Option<String>,
        state: Option<State>,
    ) -> DomainResult<usize> {
        let friends = &mut self.student_mut(student)?.friends;
        friends.push(new_person(name, state));
        Ok(friends.len() - 1)
    }

    pub fn remove_friend(&mut self, student: usize, index: usize) -> DomainResult<Person> {
        let friends = &mut self.student_mut(student)?.friends;
        check_index(&format!("students[{student}].friends"), index, friends.len())?;
        Ok(friends.remove(index))
    }

    pub fn update_friend(
        &mut self,
        student: usize,
        index: usize,
        name: Option<String>,
        state: Option<State>,
    ) -> DomainResult<()> {
        let friends = &mut self.student_mut(student)?.friends;
        check_index(&format!("students[{student}].friends"), index, friends.len())?;
        friends[index].update(name, state);
        Ok(())
    }

    pub fn add_teacher(&mut self, name: Option<String>, state: Option<State>) -> usize {
        self.teachers.push(new_person(name, state));
        self.teachers.len() - 1
    }

    pub fn remove_teacher(&mut self, index: usize) -> DomainResult<Teacher> {
        check_index("teachers", index, self.teachers.len())?;
        Ok(self.teachers.remove(index))
    }

    pub fn update_teacher(
        &mut self,
        index: usize,
        name: Option<String>,
        state: Option<State>,
    ) -> DomainResult<()> {
        check_index("teachers", index, self.teachers.len())?;
        self.teachers[index].update(name, state);
        Ok(())
    }

    fn student_mut(&mut self, index: usize) -> DomainResult<&mut Student> {
        check_index("students", index, self.students.len())?;
        Ok(&mut self.students[index])
    }
}

fn new_person(name: Option<String>, state: Option<State>) -> Person {
    let mut person = Person::default();
    person.update(name, state);
    person
}

fn check_index(collection: &str, index: usize, len: usize) -> DomainResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(DomainError::IndexOutOfRange {
            collection: collection.to_string(),
            index,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_name_when_adding_student_then_uses_form_defaults() {
        let mut doc = Document::default();

        let idx = doc.add_student(None, None);

        assert_eq!(idx, 0);
        assert_eq!(doc.students[0].name, DEFAULT_NAME);
        assert_eq!(doc.students[0].state, State::Pending);
        assert!(doc.students[0].friends.is_empty());
    }

    #[test]
    fn given_friends_when_removing_middle_then_order_is_kept() {
        let mut doc = Document::default();
        doc.add_student(Some("Alice".into()), None);
        for name in ["a", "b", "c"] {
            doc.add_friend(0, Some(name.into()), None).unwrap();
        }

        let removed = doc.remove_friend(0, 1).unwrap();

        assert_eq!(removed.name, "b");
        let names: Vec<_> = doc.students[0].friends.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn given_bad_index_when_updating_friend_then_reports_collection() {
        let mut doc = Document::default();
        doc.add_student(None, None);

        let err = doc.update_friend(0, 3, None, Some(State::Paid)).unwrap_err();

        assert_eq!(
            err.to_string(),
            "index 3 out of range for students[0].friends (length 0)"
        );
    }

    #[test]
    fn given_any_state_when_updating_then_transition_is_allowed() {
        let mut doc = Document::default();
        doc.add_teacher(Some("Carol".into()), Some(State::Delivered));

        doc.update_teacher(0, None, Some(State::Pending)).unwrap();

        assert_eq!(doc.teachers[0].state, State::Pending);
        assert_eq!(doc.teachers[0].name, "Carol");
    }

    #[test]
    fn given_mixed_case_when_parsing_state_then_accepts() {
        assert_eq!("paid".parse::<State>().unwrap(), State::Paid);
        assert_eq!(" Delivered ".parse::<State>().unwrap(), State::Delivered);
        assert!("SHIPPED".parse::<State>().is_err());
    }

    #[test]
    fn given_literal_lookup_when_case_differs_then_rejects() {
        assert_eq!(State::from_literal("PAID"), Some(State::Paid));
        assert_eq!(State::from_literal("paid"), None);
    }

    #[test]
    fn given_document_when_counting_then_includes_friends() {
        let doc = Document::new(
            vec![Student::new("Alice", State::Pending)
                .with_friends(vec![Person::new("Bob", State::Paid)])],
            vec![Person::new("Carol", State::Delivered)],
        );

        assert_eq!(doc.headcount(), 3);
        assert!(!doc.is_empty());
    }

    #[test]
    fn given_default_student_when_created_then_matches_form_defaults() {
        let student = Student::default();

        assert_eq!(student.name, DEFAULT_NAME);
        assert_eq!(student.state, State::Pending);
        assert!(student.friends.is_empty());
    }

    #[test]
    fn given_student_with_friends_when_updating_state_then_keeps_name_and_friends() {
        let mut student =
            Student::new("Alice", State::Pending).with_friends(vec![Person::default()]);

        student.update(None, Some(State::Paid));

        assert_eq!(student.name, "Alice");
        assert_eq!(student.state, State::Paid);
        assert_eq!(student.friends.len(), 1);
    }
}
