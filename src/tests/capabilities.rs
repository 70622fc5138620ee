// Unit Tests for the Capability Table
//
// UNIT UNDER TEST: Provider, CapabilityTable, ModelEntry, build_handler
//
// BUSINESS RESPONSIBILITY:
//   - Accept one canonical provider naming with documented aliases
//   - Decide which models each provider serves
//   - Name the first missing environment key for a model
//   - Build handlers through static bindings
//
// TEST COVERAGE:
//   - Provider parsing and aliases
//   - Lookup errors for unknown providers and models
//   - Required configuration checks
//   - Custom registration and unbound models
//   - Direct handler factory

use crate::capabilities::{build_handler, CapabilityTable, Provider};
use crate::env::{EnvVar, MapEnv};
use crate::error::LlmError;
use crate::tests::helpers::{create_stub_table, create_test_env, echo_binding, model_map};

#[cfg(test)]
mod provider_names {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_aliases_from_the_capability_enumeration() {
        assert_eq!("OPENAI_NATIVE".parse::<Provider>().unwrap(), Provider::OpenAINative);
        assert_eq!("OPENAI_COMPATIBLE_AZURE".parse::<Provider>().unwrap(), Provider::OpenAICompatibleAzure);
        assert_eq!("OPENAI_COMPATIBLE_CLAUDE".parse::<Provider>().unwrap(), Provider::OpenAICompatibleClaude);
        assert_eq!("AWS_BEDROCK_CLAUDE".parse::<Provider>().unwrap(), Provider::Bedrock);
        assert_eq!(" aws-bedrock ".parse::<Provider>().unwrap(), Provider::Bedrock);
    }

    #[test]
    fn test_unknown_provider_is_not_found() {
        let err = "mistral".parse::<Provider>().unwrap_err();
        assert!(matches!(err, LlmError::ProviderNotFound { ref provider } if provider == "mistral"));
    }
}

#[cfg(test)]
mod lookup {
    use super::*;

    #[test]
    fn test_builtin_table_covers_every_provider() {
        let table = CapabilityTable::builtin();

        for provider in Provider::ALL {
            assert!(
                !table.supported_models(provider).is_empty(),
                "{provider} should have models"
            );
        }
        assert_eq!(
            table.supported_models(Provider::OpenAICompatibleClaude),
            vec!["anthropic.claude-3-5-sonnet-20240620-v1:0"]
        );
        assert_eq!(table.supported_models(Provider::OpenAINative), vec!["gpt-4o", "gpt-4o-mini"]);
    }

    #[test]
    fn test_resolve_known_pair() {
        let table = CapabilityTable::builtin();

        let entry = table.resolve("anthropic", "claude-3-5-sonnet-20241022").unwrap();

        assert_eq!(entry.provider, Provider::Anthropic);
        assert_eq!(entry.required_config, vec![EnvVar::AnthropicApiKey]);
        assert_eq!(entry.binding.unwrap().name(), "AnthropicHandler");
    }

    #[test]
    fn test_resolve_is_case_insensitive_on_model() {
        let table = CapabilityTable::builtin();
        let entry = table.resolve("OPENAI_NATIVE", " GPT-4o ").unwrap();
        assert_eq!(entry.model_id, "gpt-4o");
    }

    #[test]
    fn test_unknown_model_under_known_provider() {
        let table = CapabilityTable::builtin();

        let err = table.resolve("openai-native", "gpt-4-turbo").unwrap_err();

        assert!(matches!(err, LlmError::ModelNotFound { .. }));
    }

    #[test]
    fn test_provider_absent_from_custom_table() {
        let table = create_stub_table();

        let err = table.resolve("gemini", "gemini-2.0-flash-001").unwrap_err();

        assert!(matches!(err, LlmError::ProviderNotFound { .. }));
    }

    #[test]
    fn test_unbound_model_has_no_handler() {
        let table = create_stub_table();

        let err = table.resolve("anthropic", "unbound-model").unwrap().binding().unwrap_err();

        assert!(matches!(err, LlmError::HandlerNotFound { .. }));
    }

    #[test]
    fn test_register_replaces_existing_entry() {
        let mut table = CapabilityTable::builtin();
        table.register(Provider::Gemini, "gemini-2.0-flash-001", vec![], Some(echo_binding()));

        let entry = table.resolve("gemini", "gemini-2.0-flash-001").unwrap();

        assert!(entry.required_config.is_empty());
        assert_eq!(entry.binding.unwrap().name(), "EchoHandler");
    }
}

#[cfg(test)]
mod required_config {
    use super::*;

    #[test]
    fn test_names_first_missing_key() {
        let table = CapabilityTable::builtin();
        let entry = table.resolve("openai-compatible-azure", "gpt-4o").unwrap();
        let env = MapEnv::new().with_var(EnvVar::AzureAiApiKey, "key");

        let err = entry.check_required_config(&env).unwrap_err();

        assert!(matches!(err, LlmError::MissingConfiguration { ref key } if key == "AZUREAI_API_BASE"));
    }

    #[test]
    fn test_openai_requires_an_api_key() {
        let table = CapabilityTable::builtin();
        let entry = table.resolve("openai", "gpt-4o").unwrap();

        let err = entry.check_required_config(&MapEnv::new()).unwrap_err();

        assert!(matches!(err, LlmError::MissingConfiguration { ref key } if key == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_azure_openai_key_satisfies_openai_key() {
        let table = CapabilityTable::builtin();
        let entry = table.resolve("openai", "gpt-4o").unwrap();
        let env = MapEnv::new().with_var(EnvVar::AzureOpenAiApiKey, "azure-key");

        assert!(entry.check_required_config(&env).is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let table = CapabilityTable::builtin();
        let entry = table.resolve("anthropic", "claude-3-haiku-20240307").unwrap();
        let env = MapEnv::new().with_var(EnvVar::AnthropicApiKey, "  ");

        assert!(entry.check_required_config(&env).is_err());
    }

    #[test]
    fn test_defaults_satisfy_requirements() {
        let table = CapabilityTable::builtin();

        let entry = table.resolve("ollama", "llama3.1").unwrap();
        assert!(entry.check_required_config(&MapEnv::new()).is_ok());

        let entry = table.resolve("bedrock", "anthropic.claude-3-haiku-20240307-v1:0").unwrap();
        assert!(entry.check_required_config(&create_test_env()).is_ok());
    }
}

#[cfg(test)]
mod factory {
    use super::*;

    #[test]
    fn test_blank_provider_lists_allowed_values() {
        let err = build_handler("  ", &model_map("gpt-4o"), &create_test_env()).unwrap_err();

        assert!(matches!(err, LlmError::ConfigurationError { .. }));
        assert!(err.to_string().contains("openai-compatible-claude"));
    }

    #[test]
    fn test_builds_each_builtin_handler() {
        let env = create_test_env();
        let cases = [
            ("openai", "gpt-4o"),
            ("openai-native", "gpt-4o-mini"),
            ("anthropic", "claude-3-5-haiku-20241022"),
            ("bedrock", "anthropic.claude-3-5-sonnet-20241022-v2:0"),
            ("gemini", "gemini-1.5-pro-002"),
            ("ollama", "llama3.2"),
            ("openai-compatible-azure", "gpt-4o"),
            ("openai-compatible-claude", "anthropic.claude-3-5-sonnet-20240620-v1:0"),
        ];

        for (provider, model) in cases {
            let handler = build_handler(provider, &model_map(model), &env)
                .unwrap_or_else(|e| panic!("{provider} failed to build: {e}"));
            assert_eq!(handler.provider_name(), provider);
            assert_eq!(handler.get_model().id, model);
        }
    }

    #[test]
    fn test_handler_construction_error_propagates() {
        let err = build_handler("anthropic", &model_map("claude-3-5-sonnet-20241022"), &MapEnv::new())
            .unwrap_err();

        assert!(matches!(err, LlmError::InvalidApiKey { .. }));
    }
}
