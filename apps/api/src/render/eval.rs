//! Directive-tree evaluation against resume content.
//!
//! The root scope is the resume's personal-info fields flattened to the top
//! level (the placeholder vocabulary of the templates), plus `summary` and
//! the section arrays. `#each` pushes each array element as an inner scope;
//! lookups walk the scope stack innermost-first.

use serde_json::{Map, Value};

use crate::models::resume::{ResumeData, ResumeSettings};
use crate::render::parser::{Cond, Node};
use crate::render::RenderError;

/// Builds the root evaluation scope. Fields hidden by visibility settings are
/// removed so the corresponding placeholders and conditionals resolve empty.
pub fn build_scope(data: &ResumeData, settings: &ResumeSettings) -> Result<Value, RenderError> {
    let document = serde_json::to_value(data)?;
    let mut root = Map::new();

    if let Value::Object(fields) = &document {
        if let Some(Value::Object(personal)) = fields.get("personalInfo") {
            for (key, value) in personal {
                root.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in fields {
            if key != "personalInfo" {
                root.insert(key.clone(), value.clone());
            }
        }
    }

    if !settings.show_website {
        root.remove("website");
    }
    if !settings.show_linked_in {
        root.remove("linkedin");
    }
    if !settings.show_github {
        root.remove("github");
    }
    if !settings.show_photo {
        root.remove("photo");
    }
    if !settings.show_address {
        for field in ["address", "city", "state", "zipCode", "country"] {
            root.remove(field);
        }
    }

    Ok(Value::Object(root))
}

pub fn evaluate<'a>(
    nodes: &[Node],
    scopes: &mut Vec<&'a Value>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Placeholder(path) => out.push_str(&stringify(lookup(scopes, path))),
            Node::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if truthy(lookup(scopes, &cond.path), cond) {
                    then
                } else {
                    otherwise
                };
                evaluate(branch, scopes, out)?;
            }
            Node::Each { path, body } => {
                let elements = match lookup(scopes, path) {
                    Some(Value::Array(elements)) => elements,
                    // A section the content schema doesn't have is a template
                    // configuration defect, not an empty render.
                    _ => return Err(RenderError::MissingSection(path.clone())),
                };
                for element in elements {
                    scopes.push(element);
                    let result = evaluate(body, scopes, out);
                    scopes.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}

/// Resolves a dotted path against the scope stack, innermost scope first.
/// A scope claims the path when its first segment is present; unresolved
/// tails inside a claiming scope yield `None` (rendered empty).
fn lookup<'a>(scopes: &[&'a Value], path: &str) -> Option<&'a Value> {
    for scope in scopes.iter().rev() {
        if path == "this" {
            return Some(scope);
        }
        let mut segments = path.split('.');
        let first = segments.next()?;
        let Some(mut current) = scope.get(first) else {
            continue;
        };
        for segment in segments {
            match current.get(segment) {
                Some(next) => current = next,
                None => return None,
            }
        }
        return Some(current);
    }
    None
}

fn truthy(value: Option<&Value>, cond: &Cond) -> bool {
    let Some(value) = value else {
        return false;
    };
    if cond.length {
        return match value {
            Value::Array(a) => !a.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => false,
        };
    }
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

/// Missing and composite values substitute as empty string — the output must
/// never carry an error or raw directive syntax for an absent field.
fn stringify(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::parser::parse;
    use serde_json::json;

    fn render(template: &str, scope: &Value) -> Result<String, RenderError> {
        let nodes = parse(template).unwrap();
        let mut out = String::new();
        evaluate(&nodes, &mut vec![scope], &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_placeholder_substitution_and_missing_fields_render_empty() {
        let scope = json!({"firstName": "Ada", "email": ""});
        let out = render("{{firstName}}|{{email}}|{{phone}}", &scope).unwrap();
        assert_eq!(out, "Ada||");
    }

    #[test]
    fn test_each_renders_once_per_element_in_order() {
        let scope = json!({"skills": [{"name": "Rust"}, {"name": "SQL"}, {"name": "Go"}]});
        let out = render("{{#each skills}}[{{name}}]{{/each}}", &scope).unwrap();
        assert_eq!(out, "[Rust][SQL][Go]");
    }

    #[test]
    fn test_each_over_empty_array_emits_nothing() {
        let scope = json!({"skills": []});
        let out = render("a{{#each skills}}[{{name}}]{{/each}}b", &scope).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_each_over_missing_section_is_an_error() {
        let scope = json!({"skills": []});
        let err = render("{{#each publications}}x{{/each}}", &scope).unwrap_err();
        assert!(matches!(err, RenderError::MissingSection(s) if s == "publications"));
    }

    #[test]
    fn test_conditional_resolves_per_element() {
        let scope = json!({"experience": [
            {"endDate": "2021-06", "current": false},
            {"endDate": "2019-01", "current": true},
        ]});
        let out = render(
            "{{#each experience}}({{#if current}}Present{{else}}{{endDate}}{{/if}}){{/each}}",
            &scope,
        )
        .unwrap();
        assert_eq!(out, "(2021-06)(Present)");
    }

    #[test]
    fn test_length_condition_gates_section() {
        let scope = json!({"education": []});
        let out = render(
            "{{#if education.length}}<h2>Education</h2>{{/if}}",
            &scope,
        )
        .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_this_iterates_string_arrays() {
        let scope = json!({"technologies": ["Rust", "Postgres"]});
        let out = render("{{#each technologies}}<li>{{this}}</li>{{/each}}", &scope).unwrap();
        assert_eq!(out, "<li>Rust</li><li>Postgres</li>");
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let scope = json!({"name": "outer", "skills": [{"name": "inner"}]});
        let out = render("{{name}}-{{#each skills}}{{name}}{{/each}}", &scope).unwrap();
        assert_eq!(out, "outer-inner");
    }

    #[test]
    fn test_build_scope_flattens_personal_info() {
        let mut data = ResumeData::default();
        data.personal_info.first_name = "Ada".to_string();
        data.personal_info.website = Some("https://ada.dev".to_string());
        data.summary = "Engineer".to_string();
        let scope = build_scope(&data, &ResumeSettings::default()).unwrap();

        assert_eq!(scope["firstName"], json!("Ada"));
        assert_eq!(scope["website"], json!("https://ada.dev"));
        assert_eq!(scope["summary"], json!("Engineer"));
        assert!(scope["experience"].is_array());
        assert!(scope.get("personalInfo").is_none());
    }

    #[test]
    fn test_visibility_toggles_remove_fields() {
        let mut data = ResumeData::default();
        data.personal_info.website = Some("https://ada.dev".to_string());
        data.personal_info.address = "12 Analytical Row".to_string();
        let settings = ResumeSettings {
            show_website: false,
            show_address: false,
            ..Default::default()
        };
        let scope = build_scope(&data, &settings).unwrap();

        assert!(scope.get("website").is_none());
        assert!(scope.get("address").is_none());
        let out = render("{{#if website}}shown{{/if}}{{address}}", &scope).unwrap();
        assert_eq!(out, "");
    }
}
