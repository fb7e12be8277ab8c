use serde_json::json;

use talento::assistant::{ChatMessage, build_prompt, extract_text};

fn message(role: &str, content: &str) -> ChatMessage {
    ChatMessage {
        role: role.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn prompt_lists_turns_and_hands_over_to_the_assistant() {
    let prompt = build_prompt(&[
        message("user", "  Hola "),
        message("model", "¿En qué te ayudo?"),
        message("user", "Quiero pedir vacaciones"),
    ]);

    assert!(prompt.contains("Recursos Humanos"));
    assert!(prompt.contains(
        "Empleado: Hola\nAsistente: ¿En qué te ayudo?\nEmpleado: Quiero pedir vacaciones\n"
    ));
    assert!(prompt.ends_with("Asistente:"));
}

#[test]
fn text_parts_of_the_first_candidate_are_joined() {
    let response = json!({
        "candidates": [
            { "content": { "parts": [{ "text": "Puedes " }, { "text": "solicitarlas en el portal." }] } },
            { "content": { "parts": [{ "text": "ignorado" }] } }
        ]
    });
    assert_eq!(
        extract_text(&response).as_deref(),
        Some("Puedes solicitarlas en el portal.")
    );
}

#[test]
fn responses_without_text_yield_none() {
    assert_eq!(extract_text(&json!({})), None);
    assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    assert_eq!(
        extract_text(&json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] })),
        None
    );
}
