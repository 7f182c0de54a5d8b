//! Consultation pipeline.
//!
//! A consultation is three completions:
//! condition → explanation → care advice, and condition → department.
//! The department call does not depend on the other two, so it runs alongside
//! the explanation/advice chain.

use crate::prompts::{Department, PromptError, PromptTemplate};
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use std::sync::Arc;
use thiserror::Error;

pub const CONDITION_HEADER: &str = "🏥 **What is this condition?**";
pub const ADVICE_HEADER: &str = "💡 **Signs, Home Care & Treatment**";
pub const DEPARTMENT_HEADER: &str = "👨‍⚕️ **Which Doctor to See**";
pub const DISCLAIMER: &str = "🚨 **Important**: This is only for information. Always talk to a doctor or health worker for proper treatment. Don't ignore serious symptoms!";

#[derive(Error, Debug)]
pub enum ConsultationError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The three raw completions of one consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    pub condition_info: String,
    pub advice: String,
    pub department: String,
}

impl Consultation {
    /// Combine the sections under their headers, disclaimer last.
    pub fn render(&self) -> String {
        format!(
            "{CONDITION_HEADER}\n{}\n\n{ADVICE_HEADER}\n{}\n\n{DEPARTMENT_HEADER}\n{}\n\n{DISCLAIMER}",
            self.condition_info, self.advice, self.department
        )
    }

    pub fn recommended_department(&self) -> Option<Department> {
        Department::from_recommendation(&self.department)
    }
}

#[derive(Clone)]
pub struct HealthAssistant {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
}

impl HealthAssistant {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Run the full pipeline for `condition`, passed to the prompts unmodified.
    pub async fn consult(&self, condition: &str) -> Result<Consultation, ConsultationError> {
        let condition_binding = [("condition", condition)];

        let explain_and_advise = async {
            let condition_info = self
                .run(PromptTemplate::ConditionExplanation, &condition_binding)
                .await?;
            let advice = self
                .run(
                    PromptTemplate::CareAdvice,
                    &[("condition_info", condition_info.as_str())],
                )
                .await?;
            Ok::<_, ConsultationError>((condition_info, advice))
        };
        let recommend = self.run(PromptTemplate::DepartmentRecommendation, &condition_binding);

        let ((condition_info, advice), department) =
            tokio::try_join!(explain_and_advise, recommend)?;

        Ok(Consultation {
            condition_info,
            advice,
            department,
        })
    }

    async fn run(
        &self,
        template: PromptTemplate,
        bindings: &[(&str, &str)],
    ) -> Result<String, ConsultationError> {
        let prompt = template.render(bindings)?;

        tracing::debug!(
            template = %template,
            prompt_len = prompt.len(),
            "Requesting completion"
        );

        let response = self.provider.complete(&prompt, &self.params).await?;

        tracing::debug!(
            template = %template,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Completion received"
        );

        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;

    fn assistant(provider: Arc<MockTextProvider>) -> HealthAssistant {
        HealthAssistant::new(provider, GenerationParams::default())
    }

    #[tokio::test]
    async fn chains_second_prompt_off_first_output() {
        let provider = Arc::new(MockTextProvider::echo());
        let consultation = assistant(provider.clone()).consult("fever").await.unwrap();

        let first_prompt = PromptTemplate::ConditionExplanation
            .render(&[("condition", "fever")])
            .unwrap();
        assert_eq!(consultation.condition_info, format!("ECHO:{first_prompt}"));

        let second_prompt = PromptTemplate::CareAdvice
            .render(&[("condition_info", consultation.condition_info.as_str())])
            .unwrap();
        assert_eq!(consultation.advice, format!("ECHO:{second_prompt}"));

        assert_eq!(provider.calls(), 3);
        assert!(provider.prompts().contains(&second_prompt));
    }

    #[tokio::test]
    async fn department_prompt_uses_raw_condition() {
        let provider = Arc::new(MockTextProvider::echo());
        let raw = "  chest pain after running ";
        let consultation = assistant(provider).consult(raw).await.unwrap();

        let expected = PromptTemplate::DepartmentRecommendation
            .render(&[("condition", raw)])
            .unwrap();
        assert_eq!(consultation.department, format!("ECHO:{expected}"));
        assert!(!consultation.department.contains("ECHO:ECHO:"));
    }

    #[tokio::test]
    async fn provider_failure_is_propagated() {
        let provider = Arc::new(MockTextProvider::failing("quota exceeded"));
        let err = assistant(provider).consult("fever").await.unwrap_err();

        assert!(matches!(err, ConsultationError::Provider(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn render_orders_sections_and_ends_with_disclaimer() {
        let consultation = Consultation {
            condition_info: "info".to_string(),
            advice: "advice".to_string(),
            department: "**Recommended Department:** ENT".to_string(),
        };
        let text = consultation.render();

        let positions: Vec<usize> = [
            CONDITION_HEADER,
            "info",
            ADVICE_HEADER,
            "advice",
            DEPARTMENT_HEADER,
        ]
        .iter()
        .map(|needle| text.find(*needle).expect("section missing"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.ends_with(DISCLAIMER));
        assert_eq!(consultation.recommended_department(), Some(Department::Ent));
    }
}
