//! Structural validation of candidate documents
//!
//! Walks an untyped JSON value and either produces a normalized [`Document`]
//! or a [`ValidationError`] listing every offending field with its path.
//! There are no cross-field rules: duplicate names and arbitrary state
//! transitions are fine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::{Document, Person, State, Student};
use crate::domain::error::{FieldError, FieldErrorReason, ValidationError};

/// Path used for errors on the root value itself.
pub const ROOT_PATH: &str = "document";

const DOCUMENT_FIELDS: &[&str] = &["students", "teachers"];
const STUDENT_FIELDS: &[&str] = &["name", "state", "friends"];
const PERSON_FIELDS: &[&str] = &["name", "state"];

/// Policy for fields the document shape does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Ignore unknown fields and drop them on normalization
    #[default]
    Lenient,
    /// Report unknown fields as errors
    Strict,
}

impl ValidationMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Validate an untyped value and normalize it into a [`Document`].
pub fn validate(value: &Value, mode: ValidationMode) -> Result<Document, ValidationError> {
    let mut walker = Walker {
        mode,
        errors: Vec::new(),
    };
    let document = walker.document(value);
    match document {
        Some(doc) if walker.errors.is_empty() => Ok(doc),
        _ => Err(ValidationError::new(walker.errors)),
    }
}

/// Re-check a typed document.
///
/// Types already rule out bad states and missing fields, so this only
/// catches empty names introduced by edits.
pub fn validate_document(document: &Document) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    for (i, student) in document.students.iter().enumerate() {
        let path = index("students", i);
        check_name(&student.name, &path, &mut errors);
        for (j, friend) in student.friends.iter().enumerate() {
            check_name(&friend.name, &index(&child(&path, "friends"), j), &mut errors);
        }
    }
    for (i, teacher) in document.teachers.iter().enumerate() {
        check_name(&teacher.name, &index("teachers", i), &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

fn check_name(name: &str, record_path: &str, errors: &mut Vec<FieldError>) {
    if name.is_empty() {
        errors.push(FieldError {
            path: child(record_path, "name"),
            reason: FieldErrorReason::Empty,
        });
    }
}

struct Walker {
    mode: ValidationMode,
    errors: Vec<FieldError>,
}

impl Walker {
    fn document(&mut self, value: &Value) -> Option<Document> {
        let obj = self.object(value, ROOT_PATH)?;
        self.unknown_fields(obj, "", DOCUMENT_FIELDS);

        let students = self.array(obj, "", "students", |w, item, path| w.student(item, path));
        let teachers = self.array(obj, "", "teachers", |w, item, path| w.person(item, path));

        Some(Document::new(students?, teachers?))
    }

    fn student(&mut self, value: &Value, path: &str) -> Option<Student> {
        let obj = self.object(value, path)?;
        self.unknown_fields(obj, path, STUDENT_FIELDS);

        let name = self.name(obj, path);
        let state = self.state(obj, path);
        let friends = self.array(obj, path, "friends", |w, item, p| w.person(item, p));

        Some(Student {
            name: name?,
            state: state?,
            friends: friends?,
        })
    }

    fn person(&mut self, value: &Value, path: &str) -> Option<Person> {
        let obj = self.object(value, path)?;
        self.unknown_fields(obj, path, PERSON_FIELDS);

        let name = self.name(obj, path);
        let state = self.state(obj, path);

        Some(Person::new(name?, state?))
    }

    fn name(&mut self, obj: &Map<String, Value>, record: &str) -> Option<String> {
        let path = child(record, "name");
        match obj.get("name") {
            None => self.fail(path, FieldErrorReason::Missing),
            Some(Value::String(s)) if s.is_empty() => {
                self.fail(path, FieldErrorReason::Empty)
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => self.wrong_type(path, "string", other),
        }
    }

    fn state(&mut self, obj: &Map<String, Value>, record: &str) -> Option<State> {
        let path = child(record, "state");
        match obj.get("state") {
            None => self.fail(path, FieldErrorReason::Missing),
            Some(Value::String(s)) => match State::from_literal(s) {
                Some(state) => Some(state),
                None => self.fail(path, FieldErrorReason::UnknownVariant { value: s.clone() }),
            },
            Some(other) => self.wrong_type(path, "string", other),
        }
    }

    /// Validate every element of an array field, keeping going after errors
    /// so that all offending elements get reported.
    fn array<T>(
        &mut self,
        obj: &Map<String, Value>,
        record: &str,
        key: &str,
        mut item: impl FnMut(&mut Self, &Value, &str) -> Option<T>,
    ) -> Option<Vec<T>> {
        let path = child(record, key);
        let elements = match obj.get(key) {
            None => return self.fail(path, FieldErrorReason::Missing),
            Some(Value::Array(elements)) => elements,
            Some(other) => return self.wrong_type(path, "array", other),
        };

        let mut out = Vec::with_capacity(elements.len());
        let mut ok = true;
        for (i, element) in elements.iter().enumerate() {
            match item(self, element, &index(&path, i)) {
                Some(v) => out.push(v),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(obj) => Some(obj),
            other => self.wrong_type(path.to_string(), "object", other),
        }
    }

    fn unknown_fields(&mut self, obj: &Map<String, Value>, record: &str, known: &[&str]) {
        if self.mode == ValidationMode::Lenient {
            return;
        }
        for key in obj.keys().filter(|k| !known.contains(&k.as_str())) {
            self.errors.push(FieldError {
                path: child(record, key),
                reason: FieldErrorReason::UnknownField,
            });
        }
    }

    fn wrong_type<T>(&mut self, path: String, expected: &'static str, found: &Value) -> Option<T> {
        self.fail(
            path,
            FieldErrorReason::WrongType {
                expected,
                found: type_name(found),
            },
        )
    }

    fn fail<T>(&mut self, path: String, reason: FieldErrorReason) -> Option<T> {
        self.errors.push(FieldError { path, reason });
        None
    }
}

fn child(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
