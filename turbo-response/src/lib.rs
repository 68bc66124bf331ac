//! Fragment-stream responses for axum views
//!
//! A view renders either a whole page or an HTML fragment wrapped as
//!
//! ```html
//! <fragment-stream action="replace" target="todo-form"><template>...</template></fragment-stream>
//! ```
//!
//! so a client-side runtime can patch the element with id `target` in place.
//! Form views re-render their partial template as a fragment when a
//! submission fails validation; delete views answer with a `remove` fragment
//! aimed at the deleted entity.
//!
//! - [`fragment`] - actions and the wire format
//! - [`shaper`] - picks content type, template and fragment context keys
//! - [`response`] - [`ViewResponse`] and its tagged [`Body`]
//! - [`views`] - stream, frame, form, create, update and delete views
//! - [`store`] / [`forms`] / [`template`] - the seams views are built on
//! - [`config`] - settings from a TOML file and `TURBO__*` variables
//! - [`testing`] - helpers for testing views

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

extern crate self as turbo_response;

pub mod config;
pub mod error;
pub mod forms;
pub mod fragment;
pub mod response;
pub mod shaper;
pub mod store;
pub mod template;
pub mod testing;
pub mod views;

pub use config::TurboConfig;
pub use error::TurboError;
pub use fragment::{Action, Fragment, Frame, StreamBatch};
pub use response::{Body, RenderContext, Rendered, ViewResponse};
pub use shaper::{Outcome, RenderMode, ResponseShaper, Target};
pub use store::{MemoryStore, Model, Store};
pub use template::{TemplateRenderer, TeraRenderer};
pub use turbo_response_macros::Model;

/// Everything needed to declare and route views
pub mod prelude {
    pub use crate::config::TurboConfig;
    pub use crate::error::TurboError;
    pub use crate::forms::{FormData, ModelForm, ValidationErrors};
    pub use crate::fragment::{Action, Fragment, Frame, StreamBatch};
    pub use crate::response::{RenderContext, ViewResponse};
    pub use crate::shaper::Target;
    pub use crate::store::{MemoryStore, Model, Store};
    pub use crate::template::{TemplateRenderer, TeraRenderer};
    pub use crate::views::{
        CreateView, DeleteView, FormView, FrameTemplateView, FrameView, PendingDelete,
        StreamTemplateView, StreamView, UpdateView, ViewConfig,
    };
    pub use turbo_response_macros::Model;
}
