// src/cli/check.rs - Setup verification (`chat-agent check`)

use std::sync::Arc;

use crate::core::types::Role;
use crate::infra::config::Config;
use crate::provider::openai::OpenAIProvider;
use crate::provider::{ChatRequest, CompletionProvider, WireMessage};
use crate::security::credentials::{Credential, CredentialResolver, PLACEHOLDER_KEY};

const TEST_MESSAGE: &str = "Hello! This is a test message.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStep {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckStep {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Resolve the key, then send one short request. Stops at the first
/// failing step.
pub async fn run_checks<F>(
    resolver: &CredentialResolver,
    model: &str,
    connect: F,
) -> Vec<CheckStep>
where
    F: FnOnce(&Credential) -> Arc<dyn CompletionProvider>,
{
    let mut steps = Vec::new();

    let credential = match resolver.resolve() {
        Ok(c) => c,
        Err(e) => {
            steps.push(CheckStep::fail("api key", e.to_string()));
            return steps;
        }
    };
    if credential.expose() == PLACEHOLDER_KEY {
        steps.push(CheckStep::fail(
            "api key",
            format!("{} still holds the placeholder value", credential.source()),
        ));
        return steps;
    }
    let mut detail = format!("{} from {}", credential.masked(), credential.source());
    for w in credential.warnings() {
        detail.push_str(&format!(" (warning: {w})"));
    }
    steps.push(CheckStep::pass("api key", detail));

    let provider = connect(&credential);
    let request = ChatRequest {
        model: model.to_string(),
        messages: vec![WireMessage {
            role: Role::User,
            content: TEST_MESSAGE.to_string(),
        }],
        max_tokens: 10,
        temperature: 0.0,
    };
    match provider.complete(request).await {
        Ok(resp) => steps.push(CheckStep::pass(
            "api connection",
            format!("model {} replied: {}", resp.model, resp.content.trim()),
        )),
        Err(e) => steps.push(CheckStep::fail("api connection", e.user_message())),
    }
    steps
}

pub async fn run_check(config: &Config, explicit_key: Option<String>) -> anyhow::Result<()> {
    let resolver = CredentialResolver::from_config(&config.credentials).with_explicit(explicit_key);
    let provider_config = config.provider.clone();
    let steps = run_checks(&resolver, &config.session.model, |c| {
        Arc::new(OpenAIProvider::from_config(
            c.expose().to_string(),
            &provider_config,
        )) as Arc<dyn CompletionProvider>
    })
    .await;

    for step in &steps {
        let marker = if step.passed { "ok" } else { "FAIL" };
        eprintln!("  [{}] {}: {}", marker, step.name, step.detail);
    }

    if steps.iter().all(|s| s.passed) {
        eprintln!("\nAll checks passed. Run `chat-agent` to start chatting.");
        Ok(())
    } else {
        anyhow::bail!("setup check failed")
    }
}
