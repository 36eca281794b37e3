//! Assignment password gate
//!
//! Maps an assignment id and a password attempt to the page the visitor is
//! sent to: one URL for the right password, another for anything else.

use std::collections::BTreeMap;

const NOTES_URL: &str =
    "https://docs.google.com/document/d/1aTY8vtHXxVROZyldSZ051JbU3wNq1N7ZW0g1w1fj1Wg/edit?usp=sharing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub password: String,
    pub correct_url: String,
    pub wrong_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordGate {
    assignments: BTreeMap<String, Assignment>,
}

impl PasswordGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assignments published on the site.
    pub fn builtin() -> Self {
        let mut gate = Self::new();
        let entries = [
            ("bio-13.12", "13.1.13.2.13.12", "https://www.youtube.com/watch?v=oefAI2x2CQM"),
            ("hug-babyprez", "leboxadodelababado", "https://www.youtube.com/watch?v=PMCCFtpZXpI"),
            ("spiralflowers1", "spiralwee.uno", "https://jeroo.org/docs/JerooDocJava.pdf"),
            ("hughug2", "mathewthomas", "https://www.youtube.com/watch?v=oefAI2x2CQM"),
            ("u2hw9alg2", "kulkarni29", "https://www.youtube.com/watch?v=PMCCFtpZXpI"),
            ("912dj", "diabolicaljournals129", "https://jeroo.org/docs/JerooDocJava.pdf"),
        ];
        for (id, password, wrong) in entries {
            gate.insert(id, password, NOTES_URL, wrong);
        }
        gate
    }

    pub fn insert(&mut self, id: &str, password: &str, correct_url: &str, wrong_url: &str) {
        self.assignments.insert(
            id.to_string(),
            Assignment {
                password: password.to_string(),
                correct_url: correct_url.to_string(),
                wrong_url: wrong_url.to_string(),
            },
        );
    }

    /// Redirect target for an attempt, or `None` for an unknown assignment.
    /// The comparison is exact and case-sensitive.
    pub fn resolve(&self, id: &str, attempt: &str) -> Option<&str> {
        let assignment = self.assignments.get(id)?;
        if attempt == assignment.password {
            Some(&assignment.correct_url)
        } else {
            Some(&assignment.wrong_url)
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }
}

const MAX_FIELD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Assignment,
    Password,
}

/// Text entry state for the gate tab.
pub struct GateForm {
    pub gate: PasswordGate,
    pub assignment: String,
    pub password: String,
    pub focus: Field,
    /// Outcome of the last submission
    pub result: Option<Result<String, String>>,
}

impl GateForm {
    pub fn new(gate: PasswordGate) -> Self {
        Self {
            gate,
            assignment: String::new(),
            password: String::new(),
            focus: Field::Assignment,
            result: None,
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_ascii_graphic() {
            return;
        }
        let field = self.field_mut();
        if field.chars().count() < MAX_FIELD_LEN {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    /// Enter on the id field moves to the password; on the password it submits.
    pub fn enter(&mut self) {
        match self.focus {
            Field::Assignment => self.focus = Field::Password,
            Field::Password => self.submit(),
        }
    }

    pub fn submit(&mut self) {
        let id = self.assignment.trim();
        self.result = Some(match self.gate.resolve(id, &self.password) {
            Some(url) => {
                log::info!("gate: assignment {} redirected", id);
                Ok(url.to_string())
            }
            None => Err(format!("No assignment named \"{}\"", id)),
        });
        self.password.clear();
        self.focus = Field::Assignment;
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Assignment => &mut self.assignment,
            Field::Password => &mut self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_contract() {
        let gate = PasswordGate::builtin();
        assert_eq!(gate.len(), 6);
        assert_eq!(gate.resolve("bio-13.12", "13.1.13.2.13.12"), Some(NOTES_URL));
        assert_eq!(
            gate.resolve("bio-13.12", "13.1.13.2.13.1"),
            Some("https://www.youtube.com/watch?v=oefAI2x2CQM")
        );
        assert_eq!(
            gate.resolve("spiralflowers1", "SPIRALWEE.UNO"),
            Some("https://jeroo.org/docs/JerooDocJava.pdf")
        );
        assert_eq!(gate.resolve("nope", "anything"), None);
    }

    #[test]
    fn test_builtin_covers_both_site_pages() {
        let gate = PasswordGate::builtin();
        for (id, password) in [
            ("bio-13.12", "13.1.13.2.13.12"),
            ("hug-babyprez", "leboxadodelababado"),
            ("spiralflowers1", "spiralwee.uno"),
            ("hughug2", "mathewthomas"),
            ("u2hw9alg2", "kulkarni29"),
            ("912dj", "diabolicaljournals129"),
        ] {
            assert_eq!(gate.resolve(id, password), Some(NOTES_URL), "{}", id);
        }
        assert_eq!(gate.resolve("912dj", ""), Some("https://jeroo.org/docs/JerooDocJava.pdf"));
    }

    #[test]
    fn test_form_flow() {
        let mut gate = PasswordGate::new();
        gate.insert("a1", "pw", "https://right", "https://wrong");
        let mut form = GateForm::new(gate);
        for c in "a1".chars() {
            form.push(c);
        }
        form.enter();
        assert_eq!(form.focus, Field::Password);
        form.push('p');
        form.push('x');
        form.backspace();
        form.push('w');
        form.enter();
        assert_eq!(form.result, Some(Ok("https://right".to_string())));
        assert!(form.password.is_empty());
        assert_eq!(form.focus, Field::Assignment);
    }

    #[test]
    fn test_form_unknown_assignment() {
        let mut form = GateForm::new(PasswordGate::new());
        form.push('z');
        form.enter();
        form.enter();
        assert!(matches!(form.result, Some(Err(_))));
    }
}
