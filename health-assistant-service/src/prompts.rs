//! Prompt templates sent to the completion provider.
//!
//! Each template is a fixed text with named `{variable}` slots. The set of
//! templates is closed, so they are modelled as an enum and every variant
//! declares the variables it needs.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("Template '{template}' requires variable '{variable}'")]
    MissingVariable {
        template: &'static str,
        variable: &'static str,
    },
}

/// The three prompts of a consultation, in the order their sections appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// What the condition is and what causes it.
    ConditionExplanation,
    /// Signs, home care, which doctor to see and warning signs.
    /// Fed with the output of `ConditionExplanation`.
    CareAdvice,
    /// Which department to visit and how urgently.
    DepartmentRecommendation,
}

const CONDITION_EXPLANATION: &str = "\
Explain the medical condition '{condition}' in very simple language that a village person can understand.
Use easy words and avoid medical jargon. Structure your response as:

What is {condition}?
- Simple explanation in 2-3 sentences

What causes it?
- List main causes in simple points

Keep it short and easy to understand.";

const CARE_ADVICE: &str = "\
Based on this condition information: {condition_info}

Now explain the symptoms, treatment, and doctor recommendations in very simple language for village people. Structure your response as:

What signs should you look for?
- List symptoms in simple words (like \"pain\", \"swelling\", \"fever\")
- Use everyday language, not medical terms

What can you do at home?
- Simple home remedies or first aid
- When to rest, use ice, drink water, etc.

Which doctor should you see?
- Recommend the specific medical department/specialty (like Medicine, Gynecology, Gastroenterology, Cardiology, Orthopedics, Dermatology, ENT, Pediatrics, Psychiatry, etc.)
- Explain why this doctor is the right choice for this condition
- Mention if it's urgent or can wait

When should you see a doctor immediately?
- Warning signs that need urgent medical help
- Use simple, clear language

Keep everything short and easy to understand. Use bullet points.";

static DEPARTMENT_RECOMMENDATION: Lazy<String> = Lazy::new(|| {
    let departments = Department::ALL
        .iter()
        .map(|d| format!("- {} ({})", d.name(), d.scope()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\
For the health condition '{{condition}}', recommend the most appropriate medical department/specialist.

Choose from these common departments:
{departments}

Respond with:
**Recommended Department:** [Department Name]
**Why:** [Simple explanation of why this department is best for this condition]
**Urgency:** [Urgent/Soon/Routine] - [brief explanation]"
    )
});

impl PromptTemplate {
    pub const ALL: [PromptTemplate; 3] = [
        PromptTemplate::ConditionExplanation,
        PromptTemplate::CareAdvice,
        PromptTemplate::DepartmentRecommendation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PromptTemplate::ConditionExplanation => "condition_explanation",
            PromptTemplate::CareAdvice => "care_advice",
            PromptTemplate::DepartmentRecommendation => "department_recommendation",
        }
    }

    /// Substitution variables the template requires.
    pub fn variables(self) -> &'static [&'static str] {
        match self {
            PromptTemplate::ConditionExplanation => &["condition"],
            PromptTemplate::CareAdvice => &["condition_info"],
            PromptTemplate::DepartmentRecommendation => &["condition"],
        }
    }

    /// Raw template text with its `{variable}` slots.
    pub fn text(self) -> &'static str {
        match self {
            PromptTemplate::ConditionExplanation => CONDITION_EXPLANATION,
            PromptTemplate::CareAdvice => CARE_ADVICE,
            PromptTemplate::DepartmentRecommendation => DEPARTMENT_RECOMMENDATION.as_str(),
        }
    }

    /// Fill every declared slot from `bindings`.
    ///
    /// Substituted values are inserted verbatim and never re-scanned for slots.
    pub fn render(self, bindings: &[(&str, &str)]) -> Result<String, PromptError> {
        let mut rendered = self.text().to_string();

        for &variable in self.variables() {
            let value = bindings
                .iter()
                .find(|(name, _)| *name == variable)
                .map(|(_, value)| *value)
                .ok_or(PromptError::MissingVariable {
                    template: self.name(),
                    variable,
                })?;

            rendered = substitute(&rendered, variable, value);
        }

        Ok(rendered)
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn substitute(template: &str, variable: &str, value: &str) -> String {
    let slot = format!("{{{variable}}}");
    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;

    while let Some(pos) = rest.find(&slot) {
        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + slot.len()..];
    }
    out.push_str(rest);
    out
}

/// Medical departments the recommendation prompt may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    GeneralMedicine,
    Cardiology,
    Gastroenterology,
    Gynecology,
    Orthopedics,
    Dermatology,
    Ent,
    Pediatrics,
    Psychiatry,
    Neurology,
    Urology,
    Ophthalmology,
    EmergencyMedicine,
}

impl Department {
    pub const ALL: [Department; 13] = [
        Department::GeneralMedicine,
        Department::Cardiology,
        Department::Gastroenterology,
        Department::Gynecology,
        Department::Orthopedics,
        Department::Dermatology,
        Department::Ent,
        Department::Pediatrics,
        Department::Psychiatry,
        Department::Neurology,
        Department::Urology,
        Department::Ophthalmology,
        Department::EmergencyMedicine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Department::GeneralMedicine => "General Medicine",
            Department::Cardiology => "Cardiology",
            Department::Gastroenterology => "Gastroenterology",
            Department::Gynecology => "Gynecology",
            Department::Orthopedics => "Orthopedics",
            Department::Dermatology => "Dermatology",
            Department::Ent => "ENT",
            Department::Pediatrics => "Pediatrics",
            Department::Psychiatry => "Psychiatry",
            Department::Neurology => "Neurology",
            Department::Urology => "Urology",
            Department::Ophthalmology => "Ophthalmology",
            Department::EmergencyMedicine => "Emergency Medicine",
        }
    }

    /// What the department handles, as shown to the model.
    pub fn scope(self) -> &'static str {
        match self {
            Department::GeneralMedicine => "for general health issues, fever, infections",
            Department::Cardiology => "for heart problems, chest pain, blood pressure",
            Department::Gastroenterology => "for stomach, digestive issues, acidity",
            Department::Gynecology => "for women's health, periods, pregnancy",
            Department::Orthopedics => "for bone, joint, muscle problems",
            Department::Dermatology => "for skin, hair, nail problems",
            Department::Ent => "for ear, nose, throat problems",
            Department::Pediatrics => "for children's health issues",
            Department::Psychiatry => "for mental health, depression, anxiety",
            Department::Neurology => "for headaches, seizures, nerve problems",
            Department::Urology => "for kidney, bladder, urinary problems",
            Department::Ophthalmology => "for eye problems",
            Department::EmergencyMedicine => "for urgent/serious conditions",
        }
    }

    /// Pick the department out of a recommendation answer.
    ///
    /// Looks at the `**Recommended Department:**` line first and falls back to
    /// the first department named anywhere in the text.
    pub fn from_recommendation(text: &str) -> Option<Department> {
        const MARKER: &str = "Recommended Department:";

        let marked = text.lines().find_map(|line| {
            let (_, after) = line.split_once(MARKER)?;
            let value = after.trim().trim_start_matches('*').trim();
            Department::find_in(value)
        });

        marked.or_else(|| Department::find_in(text))
    }

    fn find_in(text: &str) -> Option<Department> {
        let lowered = text.to_lowercase();
        Department::ALL
            .iter()
            .filter_map(|d| find_word(&lowered, &d.name().to_lowercase()).map(|pos| (pos, *d)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, d)| d)
    }
}

/// Position of `needle` in `haystack` where it is not part of a longer word.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(pos, _)| pos).find(|&pos| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown department: {}", wanted))
    }
}
