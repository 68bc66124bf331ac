//! Form data and validation
//!
//! A form is a plain struct deserialized from the urlencoded POST body and
//! checked with the `validator` crate. Give every field `#[serde(default)]`
//! (or put it on the struct) so an empty submission deserializes and then
//! fails *validation*, which re-renders the form, rather than failing
//! extraction, which would be a 4xx.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use turbo_response::forms::{validate, FormData};
//! use validator::Validate;
//!
//! #[derive(Default, Serialize, Deserialize, Validate)]
//! #[serde(default)]
//! struct Search {
//!     #[validate(length(min = 1, message = "This field is required."))]
//!     query: String,
//! }
//!
//! let errors = validate(&Search::default()).unwrap_err();
//! assert_eq!(errors.for_field("query"), ["This field is required."]);
//! ```

mod error;

use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

pub use error::ValidationErrors;

use crate::store::Model;

/// Context key holding the form values
pub const FORM_KEY: &str = "form";

/// Context key holding field errors
pub const ERRORS_KEY: &str = "errors";

/// Context key holding the entity an edit/delete view works on
pub const OBJECT_KEY: &str = "object";

/// Anything a view can bind a submission to
pub trait FormData: DeserializeOwned + Serialize + Validate + Default + Send + 'static {}

impl<T> FormData for T where T: DeserializeOwned + Serialize + Validate + Default + Send + 'static {}

/// A form that creates or edits a [`Model`]
pub trait ModelForm<M: Model>: FormData {
    /// Initial values for editing `instance`
    fn from_instance(instance: &M) -> Self;

    /// Apply the cleaned values: to `instance` when editing, to a new entity when creating
    fn save_into(self, instance: Option<M>) -> M;
}

/// Run the form's validators
///
/// # Errors
///
/// Returns the field errors when any validator fails.
pub fn validate<F: Validate>(form: &F) -> Result<(), ValidationErrors> {
    form.validate().map_err(ValidationErrors::from)
}
