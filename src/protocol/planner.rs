// src/protocol/planner.rs

use tracing::{debug, instrument, warn};

use crate::config::{Config, DEFAULT_MAX_NEW_TOKENS};
use crate::error::GenerationError;
use crate::platform::Platform;
use crate::tools::{GenerationParameters, GenerationRequest, HttpTransport, Transport};

/// Asks the model for a command sequence that accomplishes a task.
pub struct PlanGenerator {
    transport: Box<dyn Transport>,
    platform: Platform,
    max_new_tokens: u32,
}

impl PlanGenerator {
    pub fn new(transport: Box<dyn Transport>, platform: Platform) -> Self {
        Self {
            transport,
            platform,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    /// Generator backed by the HTTP service described in `config`.
    pub fn from_config(config: &Config, platform: Platform) -> Result<Self, GenerationError> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self {
            transport: Box::new(transport),
            platform,
            max_new_tokens: config.max_new_tokens,
        })
    }

    pub fn request_for(&self, task: &str) -> GenerationRequest {
        GenerationRequest {
            inputs: format!(
                "Generate {} and ONE safe terminal command to: {}. Return only commands in a code block.",
                self.platform.dialect(),
                task
            ),
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
            },
        }
    }

    #[instrument(skip_all, fields(platform = %self.platform))]
    pub fn try_generate(&self, task: &str) -> Result<String, GenerationError> {
        let request = self.request_for(task);
        let text = self.transport.generate(&request)?;
        debug!(chars = text.len(), "generated plan text");
        Ok(text)
    }

    /// Generated text for `task`, or an empty string if the service failed.
    pub fn generate(&self, task: &str) -> String {
        self.try_generate(task).unwrap_or_else(|err| {
            warn!(error = %err, "plan generation failed");
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    struct Recording {
        seen: Rc<RefCell<Vec<GenerationRequest>>>,
        reply: Option<String>,
    }

    impl Transport for Recording {
        fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply
                .clone()
                .ok_or(GenerationError::Timeout(Duration::from_secs(30)))
        }
    }

    #[test]
    fn instruction_names_host_dialect() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let generator = PlanGenerator::new(
            Box::new(Recording {
                seen: seen.clone(),
                reply: Some("```bash\nls\n```".into()),
            }),
            Platform::Unix,
        );

        assert_eq!(generator.generate("list files"), "```bash\nls\n```");
        let requests = seen.borrow();
        assert_eq!(
            requests[0].inputs,
            "Generate bash and ONE safe terminal command to: list files. Return only commands in a code block."
        );
        assert_eq!(requests[0].parameters.max_new_tokens, 200);
    }

    #[test]
    fn windows_instruction_asks_for_cmd() {
        let generator = PlanGenerator::new(
            Box::new(Recording {
                seen: Rc::default(),
                reply: None,
            }),
            Platform::Windows,
        );
        assert!(generator.request_for("x").inputs.starts_with("Generate Windows CMD "));
    }

    #[test]
    fn failure_yields_empty_text() {
        let generator = PlanGenerator::new(
            Box::new(Recording {
                seen: Rc::default(),
                reply: None,
            }),
            Platform::Unix,
        );
        assert_eq!(generator.generate("anything"), "");
        assert!(matches!(
            generator.try_generate("anything"),
            Err(GenerationError::Timeout(_))
        ));
    }

    #[test]
    fn request_serializes_to_service_shape() {
        let generator = PlanGenerator::new(
            Box::new(Recording {
                seen: Rc::default(),
                reply: None,
            }),
            Platform::Unix,
        );
        let body = serde_json::to_value(generator.request_for("t")).unwrap();
        assert_eq!(body["parameters"]["max_new_tokens"], 200);
        assert!(body["inputs"].as_str().unwrap().contains("to: t."));
    }
}
