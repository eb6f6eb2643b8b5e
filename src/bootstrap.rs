//! Wiring: builds the provider, engines, handlers and router state from
//! configuration.

use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use crate::adapters::ai::{DisabledAIProvider, OpenAIConfig, OpenAIProvider};
use crate::adapters::catalog::StaticCardCatalog;
use crate::adapters::http::{AppState, CatalogHandlers, DivinationHandlers};
use crate::adapters::storage::InMemorySessionStore;
use crate::application::handlers::divination::{
    GetDivinationStatusHandler, QuickDivinationHandler, SessionLocks, StartDivinationHandler,
    SubmitStepHandler,
};
use crate::config::{
    AiConfig, AiProvider, AppConfig, ConfigError, DivinationConfig, ServerConfig, ValidationError,
};
use crate::domain::catalog::CatalogError;
use crate::domain::flow::{FlowEngine, FlowError, Narrator, StepContext};
use crate::ports::{AIError, AIProvider, CardCatalog, SessionStore};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("flow graph error: {0}")]
    Flow(#[from] FlowError),
    #[error("AI provider error: {0}")]
    Provider(#[from] AIError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(server: &ServerConfig) {
    let make_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(&server.log_level))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let installed = if server.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(make_filter())
            .with_target(true)
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Picks the narration backend named by configuration.
pub fn build_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, BootstrapError> {
    let provider: Arc<dyn AIProvider> = match config.provider {
        AiProvider::OpenAI => {
            let key = api_key(&config.openai_api_key, "OPENAI_API_KEY")?;
            let mut openai = OpenAIConfig::new(key).with_model(&config.openai_model);
            if let Some(url) = &config.openai_base_url {
                openai = openai.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(tuned(openai, config))?)
        }
        AiProvider::DeepSeek => {
            let key = api_key(&config.deepseek_api_key, "DEEPSEEK_API_KEY")?;
            let mut deepseek = OpenAIConfig::deepseek(key).with_model(&config.deepseek_model);
            if let Some(url) = &config.deepseek_base_url {
                deepseek = deepseek.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(tuned(deepseek, config))?)
        }
        AiProvider::Disabled => Arc::new(DisabledAIProvider::new()),
    };

    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "AI provider ready");
    Ok(provider)
}

fn api_key(key: &Option<Secret<String>>, name: &'static str) -> Result<String, BootstrapError> {
    key.as_ref()
        .map(|k| k.expose_secret().clone())
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::from(ValidationError::MissingRequired(name)).into())
}

fn tuned(openai: OpenAIConfig, config: &AiConfig) -> OpenAIConfig {
    openai
        .with_timeout(config.timeout())
        .with_max_retries(config.max_retries)
}

/// Builds the router state from configuration.
pub fn build_app_state(config: &AppConfig) -> Result<AppState, BootstrapError> {
    let provider = build_provider(&config.ai)?;
    app_state_with_provider(provider, &config.ai, &config.divination)
}

/// Builds the router state around an existing provider.
pub fn app_state_with_provider(
    provider: Arc<dyn AIProvider>,
    ai: &AiConfig,
    divination: &DivinationConfig,
) -> Result<AppState, BootstrapError> {
    let catalog: Arc<dyn CardCatalog> = Arc::new(StaticCardCatalog::standard()?);
    let narrator = Narrator::new(provider, divination.persona_name.clone())
        .with_max_tokens(ai.max_tokens)
        .with_temperature(ai.temperature)
        .with_timeout(ai.narration_timeout());
    let ctx = StepContext::new(catalog.clone(), narrator).with_draw_seed(divination.draw_seed);

    let interactive = Arc::new(FlowEngine::interactive(ctx.clone())?);
    let quick = Arc::new(FlowEngine::quick(ctx)?);
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let divination_handlers = DivinationHandlers::new(
        Arc::new(StartDivinationHandler::new(store.clone(), interactive.clone())),
        Arc::new(SubmitStepHandler::new(
            store.clone(),
            interactive,
            SessionLocks::new(),
        )),
        Arc::new(GetDivinationStatusHandler::new(store)),
        Arc::new(QuickDivinationHandler::new(quick)),
        catalog.clone(),
    );

    Ok(AppState {
        divination: divination_handlers,
        catalog: CatalogHandlers::new(catalog),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_provider_needs_no_key() {
        let config = AiConfig {
            provider: AiProvider::Disabled,
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.provider_info().name, "disabled");
    }

    #[test]
    fn deepseek_provider_uses_configured_model() {
        let config = AiConfig {
            provider: AiProvider::DeepSeek,
            deepseek_api_key: Some(Secret::new("sk-test".to_string())),
            deepseek_model: "deepseek-reasoner".to_string(),
            ..Default::default()
        };
        let info = build_provider(&config).unwrap().provider_info();
        assert_eq!(info.name, "deepseek");
        assert_eq!(info.model, "deepseek-reasoner");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let result = build_provider(&AiConfig::default());
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }

    #[test]
    fn app_state_builds_from_disabled_config() {
        let config = AppConfig {
            ai: AiConfig {
                provider: AiProvider::Disabled,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(build_app_state(&config).is_ok());
    }
}
