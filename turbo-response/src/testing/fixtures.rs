//! A todo model, its form and templates, shared by tests

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::ModelForm;
use crate::template::TeraRenderer;
use crate::Model;

/// Full form template
pub const FORM_TEMPLATE: &str = "form.html";

/// Templates every fixture view renders from
pub const TEMPLATES: [(&str, &str); 7] = [
    (
        "form.html",
        r#"<form id="todo-form" method="post"><input name="description" value="{{ form.description }}"></form>"#,
    ),
    (
        "_form.html",
        r#"<form id="todo-form" method="post">{% for field, messages in errors %}{% for message in messages %}<p class="error">{{ field }}: {{ message }}</p>{% endfor %}{% endfor %}<input name="description" value="{{ form.description }}"></form>"#,
    ),
    ("simple.html", "<div>my content</div>"),
    (
        "target.html",
        "<span>{{ fragment_action }} {{ fragment_target }}</span>",
    ),
    ("frame.html", "<nav>{{ frame_target }}</nav>"),
    ("list.html", "<h2>{{ slug }}</h2>"),
    (
        "confirm_delete.html",
        "<p>Delete {{ object.description }}?</p>",
    ),
];

/// Todo item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Model)]
pub struct Todo {
    /// Primary key
    #[model(pk)]
    pub id: Option<i64>,
    /// What to do
    pub description: String,
}

impl Todo {
    /// Unsaved todo
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
        }
    }
}

/// Form editing a [`Todo`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TodoForm {
    /// What to do
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
}

impl ModelForm<Todo> for TodoForm {
    fn from_instance(instance: &Todo) -> Self {
        Self {
            description: instance.description.clone(),
        }
    }

    fn save_into(self, instance: Option<Todo>) -> Todo {
        let mut todo = instance.unwrap_or_default();
        todo.description = self.description;
        todo
    }
}

/// Renderer loaded with [`TEMPLATES`]
///
/// # Panics
///
/// Panics if a fixture template fails to parse.
#[must_use]
pub fn renderer() -> Arc<TeraRenderer> {
    Arc::new(TeraRenderer::from_raw(TEMPLATES).expect("Fixture templates must parse"))
}
