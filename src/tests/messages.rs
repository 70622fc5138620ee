// Unit Tests for Conversation Messages
//
// UNIT UNDER TEST: prepare_messages, parse_chat_history, validate_conversation
//
// BUSINESS RESPONSIBILITY:
//   - Put the system message first and the user prompt last
//   - Reject empty prompts before any provider call
//   - Convert the wire chat history shape into typed messages
//   - Refuse conversations the providers cannot accept
//
// TEST COVERAGE:
//   - Message ordering with and without system message and history
//   - Blank prompt rejection
//   - Chat history parsing, including malformed input
//   - Conversation ordering rules

use crate::error::LlmError;
use crate::messages::{
    parse_chat_history, prepare_messages, validate_conversation, Message, MessageRole,
};
use serde_json::json;

#[cfg(test)]
mod prepare {
    use super::*;

    #[test]
    fn test_orders_system_history_then_prompt() {
        // Arrange
        let history = vec![Message::user("Hi"), Message::assistant("Hello!")];

        // Act
        let messages = prepare_messages("What next?", &history, Some("You are helpful assistant")).unwrap();

        // Assert
        assert_eq!(
            messages,
            vec![
                Message::system("You are helpful assistant"),
                Message::user("Hi"),
                Message::assistant("Hello!"),
                Message::user("What next?"),
            ]
        );
    }

    #[test]
    fn test_prompt_only() {
        let messages = prepare_messages("Hello", &[], None).unwrap();
        assert_eq!(messages, vec![Message::user("Hello")]);
    }

    #[test]
    fn test_blank_system_message_is_skipped() {
        let messages = prepare_messages("Hello", &[], Some("  ")).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_blank_prompt_is_rejected() {
        let err = prepare_messages(" \n", &[], None).unwrap_err();

        assert!(matches!(err, LlmError::InvalidRequest { .. }));
        assert_eq!(err.user_message(), "Invalid prompt provided.");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_system_turns_inside_history_are_dropped() {
        let history = vec![Message::system("sneaky"), Message::user("Hi")];

        let messages = prepare_messages("Next", &history, None).unwrap();

        assert!(messages.iter().all(|m| m.role != MessageRole::System));
        assert_eq!(messages.len(), 2);
    }
}

#[cfg(test)]
mod chat_history {
    use super::*;

    #[test]
    fn test_parses_wire_shape() {
        let value = json!([{"user": "Hi"}, {"assistant": "Hello!"}, {"USER": "More"}]);

        let history = parse_chat_history(&value).unwrap();

        assert_eq!(
            history,
            vec![Message::user("Hi"), Message::assistant("Hello!"), Message::user("More")]
        );
    }

    #[test]
    fn test_null_is_empty_history() {
        assert!(parse_chat_history(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_malformed_history() {
        assert!(parse_chat_history(&json!({"user": "Hi"})).is_err());
        assert!(parse_chat_history(&json!(["Hi"])).is_err());
        assert!(parse_chat_history(&json!([{"user": 42}])).is_err());
        assert!(parse_chat_history(&json!([{"tool": "x"}])).is_err());
    }
}

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn test_accepts_well_formed_conversation() {
        let messages = vec![
            Message::system("Be brief"),
            Message::user("Hi"),
            Message::assistant("Hello"),
            Message::user("Bye"),
        ];
        assert!(validate_conversation(&messages).is_ok());
    }

    #[test]
    fn test_rejects_empty_conversation() {
        assert!(matches!(
            validate_conversation(&[]),
            Err(LlmError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_rejects_late_system_message() {
        let messages = vec![Message::user("Hi"), Message::system("late"), Message::user("Bye")];
        assert!(validate_conversation(&messages).is_err());
    }

    #[test]
    fn test_rejects_conversation_not_ending_with_user() {
        let messages = vec![Message::user("Hi"), Message::assistant("Hello")];
        assert!(validate_conversation(&messages).is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(" Assistant ".parse::<MessageRole>().unwrap(), MessageRole::Assistant);
        assert!("tool".parse::<MessageRole>().is_err());
        assert_eq!(MessageRole::System.to_string(), "system");
    }
}
