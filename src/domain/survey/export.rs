//! CSV export of collected answers.

use super::registry::FieldRegistry;
use super::state::InterviewState;
use crate::domain::foundation::ConversationId;

/// Column holding the display name, rendered as `@name`.
pub const USERNAME_COLUMN: &str = "username";

/// Renders one header row plus one row per conversation.
pub fn render_csv(registry: &FieldRegistry, rows: &[(ConversationId, InterviewState)]) -> String {
    let mut out = String::new();

    let header: Vec<&str> = std::iter::once(USERNAME_COLUMN)
        .chain(registry.names().iter().map(String::as_str))
        .collect();
    push_row(&mut out, &header);

    for (_, state) in rows {
        let username = state
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("@{}", name))
            .unwrap_or_default();

        let mut cells = vec![username];
        cells.extend((0..registry.len()).map(|i| state.field_value(i).unwrap_or_default().to_string()));
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        push_row(&mut out, &cells);
    }

    out
}

fn push_row(out: &mut String, cells: &[&str]) {
    let line = cells.iter().map(|c| escape(c)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec!["name".to_string(), "email".to_string()])
    }

    #[test]
    fn header_only_without_conversations() {
        assert_eq!(render_csv(&registry(), &[]), "username,name,email\r\n");
    }

    #[test]
    fn rows_follow_registry_order() {
        let registry = registry();
        let mut state = InterviewState::new(0);
        state.display_name = Some("ana".to_string());
        state.set_field(&registry, 1, "a@b.com").unwrap();

        let csv = render_csv(
            &registry,
            &[(ConversationId::new("1").unwrap(), state)],
        );
        assert_eq!(csv, "username,name,email\r\n@ana,,a@b.com\r\n");
    }

    #[test]
    fn cells_with_separators_are_quoted() {
        let registry = registry();
        let mut state = InterviewState::new(0);
        state.set_field(&registry, 0, "Doe, \"Jane\"").unwrap();
        state.set_field(&registry, 1, "line1\nline2").unwrap();

        let csv = render_csv(&registry, &[(ConversationId::new("1").unwrap(), state)]);
        assert!(csv.ends_with(",\"Doe, \"\"Jane\"\"\",\"line1\nline2\"\r\n"));
    }
}
