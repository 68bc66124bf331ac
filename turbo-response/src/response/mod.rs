//! View responses
//!
//! Instead of checking the context for fragment keys at the last moment,
//! every view returns a [`ViewResponse`] whose [`Body`] already says which
//! markup it carries. The content type follows from the body variant.

mod context;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

pub use context::{
    RenderContext, FRAGMENT_ACTION, FRAGMENT_TARGET, FRAME_TARGET, IS_FRAGMENT_RESPONSE,
};

use crate::fragment::{Fragment, Frame, StreamBatch};

/// Content type of a normal HTML response
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type of a fragment-stream response
pub const FRAGMENT_STREAM_CONTENT_TYPE: &str = "text/html; fragment-stream; charset=utf-8";

/// Response body, tagged by how it is wrapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Full HTML page, sent as-is
    Full(String),
    /// Single fragment-stream
    Stream(Fragment),
    /// Several fragment-streams
    Streams(StreamBatch),
    /// Frame
    Frame(Frame),
}

impl Body {
    /// Content type header for this body
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Stream(_) | Self::Streams(_) => FRAGMENT_STREAM_CONTENT_TYPE,
            Self::Full(_) | Self::Frame(_) => HTML_CONTENT_TYPE,
        }
    }

    /// Final markup
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Full(html) => html.clone(),
            Self::Stream(fragment) => fragment.render(),
            Self::Streams(batch) => batch.render(),
            Self::Frame(frame) => frame.render(),
        }
    }

    /// The fragment, if this is a single stream
    #[must_use]
    pub const fn fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Stream(fragment) => Some(fragment),
            _ => None,
        }
    }
}

/// A rendered response, kept inspectable until it is turned into HTTP
#[derive(Debug, Clone)]
pub struct Rendered {
    /// HTTP status
    pub status: StatusCode,
    /// Template used to render the body, if any
    pub template_name: Option<String>,
    /// Context the template was rendered with
    pub context: RenderContext,
    /// Wrapped body
    pub body: Body,
}

impl Rendered {
    /// 200 response with no template
    #[must_use]
    pub fn new(body: Body) -> Self {
        Self {
            status: StatusCode::OK,
            template_name: None,
            context: RenderContext::new(),
            body,
        }
    }

    /// Record the template and context used
    #[must_use]
    pub fn with_template(mut self, template_name: impl Into<String>, context: RenderContext) -> Self {
        self.template_name = Some(template_name.into());
        self.context = context;
        self
    }

    /// Override the status
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Content type header for this response
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.body.content_type()
    }
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.body.content_type())],
            self.body.render(),
        )
            .into_response()
    }
}

/// What a view hands back to axum
#[derive(Debug, Clone)]
pub enum ViewResponse {
    /// Rendered markup
    Rendered(Rendered),
    /// See-other redirect to a URL
    Redirect(String),
}

impl ViewResponse {
    /// Full HTML response
    #[must_use]
    pub fn full(html: impl Into<String>) -> Self {
        Self::Rendered(Rendered::new(Body::Full(html.into())))
    }

    /// Single fragment-stream response
    #[must_use]
    pub fn stream(fragment: Fragment) -> Self {
        Self::Rendered(Rendered::new(Body::Stream(fragment)))
    }

    /// Multi-fragment response
    #[must_use]
    pub fn streams(batch: StreamBatch) -> Self {
        Self::Rendered(Rendered::new(Body::Streams(batch)))
    }

    /// Frame response
    #[must_use]
    pub fn frame(frame: Frame) -> Self {
        Self::Rendered(Rendered::new(Body::Frame(frame)))
    }

    /// Redirect response
    #[must_use]
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Redirect(url.into())
    }

    /// HTTP status this response will carry
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Rendered(rendered) => rendered.status,
            Self::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    /// Content type, for rendered responses
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Rendered(rendered) => Some(rendered.content_type()),
            Self::Redirect(_) => None,
        }
    }

    /// The rendered part, if this is not a redirect
    #[must_use]
    pub const fn rendered(&self) -> Option<&Rendered> {
        match self {
            Self::Rendered(rendered) => Some(rendered),
            Self::Redirect(_) => None,
        }
    }

    /// Template used, if any
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.rendered()?.template_name.as_deref()
    }

    /// Render context, if this is not a redirect
    #[must_use]
    pub fn context(&self) -> Option<&RenderContext> {
        self.rendered().map(|rendered| &rendered.context)
    }

    /// Redirect target, if this is a redirect
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::Redirect(url) => Some(url),
            Self::Rendered(_) => None,
        }
    }

    /// Final body markup; empty for redirects
    #[must_use]
    pub fn body(&self) -> String {
        self.rendered()
            .map(|rendered| rendered.body.render())
            .unwrap_or_default()
    }
}

impl From<Rendered> for ViewResponse {
    fn from(rendered: Rendered) -> Self {
        Self::Rendered(rendered)
    }
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Rendered(rendered) => rendered.into_response(),
            Self::Redirect(url) => Redirect::to(&url).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Action;
    use crate::testing::body_string;

    #[test]
    fn test_content_type_follows_body() {
        let fragment = Fragment::new(Action::Replace, "t", "x").unwrap();
        assert_eq!(Body::Stream(fragment).content_type(), FRAGMENT_STREAM_CONTENT_TYPE);
        assert_eq!(Body::Full("x".into()).content_type(), HTML_CONTENT_TYPE);
        assert_eq!(
            Body::Frame(Frame::new("t", "x").unwrap()).content_type(),
            HTML_CONTENT_TYPE
        );
        assert_eq!(
            Body::Streams(StreamBatch::new()).content_type(),
            FRAGMENT_STREAM_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_stream_into_response() {
        let fragment = Fragment::new(Action::Replace, "test", "hello").unwrap();
        let response = ViewResponse::stream(fragment).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            FRAGMENT_STREAM_CONTENT_TYPE
        );
        assert_eq!(
            body_string(response).await,
            r#"<fragment-stream action="replace" target="test"><template>hello</template></fragment-stream>"#
        );
    }

    #[tokio::test]
    async fn test_redirect_into_response() {
        let view_response = ViewResponse::redirect("/done/");
        assert_eq!(view_response.redirect_url(), Some("/done/"));
        assert!(view_response.content_type().is_none());
        assert!(view_response.body().is_empty());

        let response = view_response.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/done/");
    }

    #[test]
    fn test_rendered_records_template() {
        let rendered = Rendered::new(Body::Full("<p></p>".into()))
            .with_template("page.html", RenderContext::new().with("k", "v"))
            .with_status(StatusCode::CREATED);
        let response = ViewResponse::from(rendered);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.template_name(), Some("page.html"));
        assert!(response.context().unwrap().contains_key("k"));
    }
}
