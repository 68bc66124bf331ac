//! Todo list served with turbo-response views
//!
//! Run from this directory: `RUST_LOG=debug cargo run`. Settings come from
//! `turbo.toml`, overridable with `TURBO__*` variables.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::{extract::State, response::Html, routing::get, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use turbo_response::prelude::*;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Model)]
struct Todo {
    #[model(pk)]
    id: Option<u32>,
    description: String,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
struct TodoForm {
    #[validate(length(min = 1, max = 200, message = "Enter between 1 and 200 characters."))]
    description: String,
}

impl ModelForm<Todo> for TodoForm {
    fn from_instance(todo: &Todo) -> Self {
        Self {
            description: todo.description.clone(),
        }
    }

    fn save_into(self, todo: Option<Todo>) -> Todo {
        let mut todo = todo.unwrap_or_default();
        todo.description = self.description;
        todo
    }
}

#[derive(Clone)]
struct AppState {
    store: Arc<MemoryStore<Todo>>,
    renderer: Arc<TeraRenderer>,
}

async fn list(State(state): State<AppState>) -> Result<Html<String>, TurboError> {
    let mut context = RenderContext::new();
    context.insert("todos", &state.store.all())?;
    Ok(Html(state.renderer.render("todos/list.html", &context)?))
}

fn build_router(settings: &TurboConfig, state: AppState) -> Result<Router> {
    let create = CreateView::<Todo, TodoForm>::new(
        ViewConfig::from_settings(settings)
            .template_name("todos/form.html")
            .target("todo-form")
            .success_url("/todos/"),
        state.store.clone(),
        state.renderer.clone(),
    )?;
    let update = UpdateView::<Todo, TodoForm>::new(
        ViewConfig::from_settings(settings)
            .template_name("todos/form.html")
            .target("todo-form")
            .success_url("/todos/"),
        state.store.clone(),
        state.renderer.clone(),
    )?;
    let delete = DeleteView::<Todo>::new(
        ViewConfig::from_settings(settings).template_name("todos/confirm_delete.html"),
        state.store.clone(),
        state.renderer.clone(),
    )?;
    let nav = FrameTemplateView::new(
        ViewConfig::from_settings(settings).template_name("nav.html").target("nav"),
        state.renderer.clone(),
    )?;

    Ok(Router::new()
        .route("/todos/", get(list).with_state(state))
        .route("/todos/new", create.as_view())
        .route("/todos/:pk/edit", update.as_view())
        .route("/todos/:pk/delete", delete.as_view())
        .route("/nav", nav.as_view()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = TurboConfig::load(Some(Path::new("turbo.toml")))?;
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        renderer: Arc::new(TeraRenderer::from_config(&settings)?),
    };
    for description in ["Buy milk", "Water the plants"] {
        state.store.save(Todo {
            id: None,
            description: description.to_owned(),
        })
        .await?;
    }

    let app = build_router(&settings, state)?;

    info!(addr = %settings.bind_addr, "todo demo listening");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
